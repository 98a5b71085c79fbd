// エラーハンドリング統合テスト
#[path = "../fixtures/mod.rs"]
mod fixtures;

use bookz::{
    core::error::ErrorSeverity,
    engine::{create_quiet_orchestrator, ConversionOrchestrator},
    services::{MemoryOutcomeLog, NoOpProgressReporter},
    walker::{MockDirectoryWalker, WalkEntry},
    ConvertError, RunConfig,
};
use fixtures::{setup_library, StubConverter};
use std::fs;
use tempfile::TempDir;

#[tokio::test]
async fn test_nonexistent_root_directory() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("does-not-exist");

    let converter = StubConverter::new();
    let error = create_quiet_orchestrator(converter.clone())
        .run(&RunConfig::new(&missing))
        .await
        .unwrap_err();

    assert!(matches!(error, ConvertError::InvalidInputDir { .. }));
    assert!(error.is_user_error());
    assert_eq!(converter.calls(), 0);
    assert!(!missing.exists());
}

#[tokio::test]
async fn test_root_is_a_file() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("book.epub");
    fs::write(&file, "epub").unwrap();

    let error = create_quiet_orchestrator(StubConverter::new())
        .run(&RunConfig::new(&file))
        .await
        .unwrap_err();

    assert!(matches!(error, ConvertError::InvalidInputDir { .. }));
    assert!(error.to_string().contains("book.epub"));
}

#[tokio::test]
async fn test_output_path_occupied_by_file() {
    let temp_dir = TempDir::new().unwrap();
    setup_library(temp_dir.path());
    fs::write(temp_dir.path().join("mobi"), "not a directory").unwrap();

    let converter = StubConverter::new();
    let error = create_quiet_orchestrator(converter.clone())
        .run(&RunConfig::new(temp_dir.path()))
        .await
        .unwrap_err();

    assert!(matches!(error, ConvertError::OutputDirCreateFailed { .. }));
    assert_eq!(error.severity(), ErrorSeverity::High);
    // 何も起動しない
    assert_eq!(converter.calls(), 0);
}

#[tokio::test]
async fn test_enumeration_error_waits_for_dispatched_jobs() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().to_path_buf();

    let mut mock_walker = MockDirectoryWalker::new();
    let walk_root = root.clone();
    mock_walker.expect_walk().times(1).returning(move |_, _| {
        Box::new(
            vec![
                Ok(WalkEntry::new(walk_root.join("a.epub"), false)),
                Ok(WalkEntry::new(walk_root.join("b.txt"), false)),
                Err(anyhow::anyhow!("permission denied")),
                Ok(WalkEntry::new(walk_root.join("c.pdf"), false)),
            ]
            .into_iter(),
        )
    });

    let converter = StubConverter::new();
    let orchestrator = ConversionOrchestrator::new(
        mock_walker,
        converter.clone(),
        NoOpProgressReporter::new(),
        MemoryOutcomeLog::new(),
    );

    let error = orchestrator.run(&RunConfig::new(&root)).await.unwrap_err();

    assert!(matches!(error, ConvertError::EnumerationFailed { .. }));
    assert!(format!("{error}").contains("permission denied"));
    // エラー前に配信した2件は完了している
    assert_eq!(converter.calls(), 2);
    assert_eq!(orchestrator.sink().recorded_count(), 2);
    assert!(root.join("mobi").join("a.mobi").exists());
    assert!(root.join("mobi").join("b.mobi").exists());
    assert!(!root.join("mobi").join("c.mobi").exists());
}

#[tokio::test]
async fn test_invalid_configuration_is_rejected_before_work() {
    let temp_dir = TempDir::new().unwrap();
    setup_library(temp_dir.path());

    let invalid_configs = vec![
        RunConfig::new(temp_dir.path()).with_max_workers(0),
        RunConfig::new(temp_dir.path()).with_queue_capacity(0),
        RunConfig::new(temp_dir.path()).with_timeout_secs(Some(0)),
        RunConfig::new(temp_dir.path()).with_output_subdir("../escape"),
        RunConfig::new(temp_dir.path()).with_output_subdir(""),
        RunConfig::new(temp_dir.path()).with_allowed_extensions(Vec::<String>::new()),
    ];

    for config in invalid_configs {
        let converter = StubConverter::new();
        let error = create_quiet_orchestrator(converter.clone())
            .run(&config)
            .await
            .unwrap_err();

        assert!(
            matches!(error, ConvertError::Configuration { .. }),
            "unexpected error: {error}"
        );
        assert_eq!(converter.calls(), 0);
    }
    assert!(!temp_dir.path().join("mobi").exists());
}

#[tokio::test]
async fn test_unreadable_file_is_a_job_failure_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("good.epub"), "epub").unwrap();
    fs::write(temp_dir.path().join("bad.epub"), "epub").unwrap();

    let summary = create_quiet_orchestrator(StubConverter::new().failing_on(["bad.epub"]))
        .run(&RunConfig::new(temp_dir.path()))
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
    assert!(!summary.all_succeeded());
}
