// 並列実行・完了待機・タイムアウトの統合テスト
#[path = "../fixtures/mod.rs"]
mod fixtures;

use bookz::{engine::create_quiet_orchestrator, JobFailure, RunConfig};
use fixtures::{HangingConverter, PanickingConverter, StubConverter};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn create_books(root: &Path, count: usize) {
    for i in 0..count {
        let dir = root.join(format!("shelf{}", i % 7));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("book{i:04}.epub")), "epub").unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_dispatched_job_completes_before_return() {
    let temp_dir = TempDir::new().unwrap();
    create_books(temp_dir.path(), 300);

    let converter = StubConverter::new().with_delay(Duration::from_millis(1));
    let orchestrator = create_quiet_orchestrator(converter.clone());
    let summary = orchestrator
        .run(&RunConfig::new(temp_dir.path()).with_max_workers(16))
        .await
        .unwrap();

    assert_eq!(summary.dispatched, 300);
    assert_eq!(summary.completed(), 300);
    assert_eq!(converter.calls(), 300);
    assert_eq!(orchestrator.sink().recorded_count(), 300);
    assert_eq!(fs::read_dir(temp_dir.path().join("mobi")).unwrap().count(), 300);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_worker_limit_bounds_concurrency() {
    let temp_dir = TempDir::new().unwrap();
    create_books(temp_dir.path(), 40);

    let converter = StubConverter::new().with_delay(Duration::from_millis(10));
    let summary = create_quiet_orchestrator(converter.clone())
        .run(&RunConfig::new(temp_dir.path()).with_max_workers(3))
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 40);
    assert!(converter.peak_concurrency() <= 3);
    assert!(converter.peak_concurrency() >= 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_small_queue_does_not_deadlock() {
    let temp_dir = TempDir::new().unwrap();
    create_books(temp_dir.path(), 50);

    let converter = StubConverter::new();
    let summary = create_quiet_orchestrator(converter.clone())
        .run(
            &RunConfig::new(temp_dir.path())
                .with_max_workers(1)
                .with_queue_capacity(1),
        )
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 50);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_hanging_conversion_times_out() {
    let temp_dir = TempDir::new().unwrap();
    create_books(temp_dir.path(), 5);
    fs::write(temp_dir.path().join("stuck.pdf"), "pdf").unwrap();

    let orchestrator = create_quiet_orchestrator(HangingConverter::new("stuck.pdf"));
    let start = Instant::now();
    let summary = orchestrator
        .run(&RunConfig::new(temp_dir.path()).with_timeout_secs(Some(1)))
        .await
        .unwrap();

    assert!(start.elapsed() < Duration::from_secs(30));
    assert_eq!(summary.dispatched, 6);
    assert_eq!(summary.succeeded, 5);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.timed_out, 1);

    let records = orchestrator.sink().records().unwrap();
    let stuck = records
        .iter()
        .find(|r| r.input_path.ends_with("stuck.pdf"))
        .unwrap();
    assert!(!stuck.success);
    assert_eq!(
        stuck.error.as_deref(),
        Some(JobFailure::TimedOut { after: Duration::from_secs(1) }.to_string().as_str())
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_panicking_conversion_is_isolated() {
    let temp_dir = TempDir::new().unwrap();
    create_books(temp_dir.path(), 10);
    fs::write(temp_dir.path().join("poison.txt"), "txt").unwrap();

    let orchestrator = create_quiet_orchestrator(PanickingConverter::new("poison.txt"));
    let summary = orchestrator
        .run(&RunConfig::new(temp_dir.path()).with_max_workers(2))
        .await
        .unwrap();

    assert_eq!(summary.dispatched, 11);
    assert_eq!(summary.succeeded, 10);
    assert_eq!(summary.failed, 1);

    let records = orchestrator.sink().records().unwrap();
    let poisoned = records
        .iter()
        .find(|r| r.input_path.ends_with("poison.txt"))
        .unwrap();
    assert!(poisoned.error.as_deref().unwrap().contains("converter crashed"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_repeated_runs_are_independent() {
    let temp_dir = TempDir::new().unwrap();
    create_books(temp_dir.path(), 20);
    let config = RunConfig::new(temp_dir.path()).with_max_workers(4);

    for _ in 0..3 {
        let converter = StubConverter::new();
        let summary = create_quiet_orchestrator(converter.clone())
            .run(&config)
            .await
            .unwrap();
        assert_eq!(summary.succeeded, 20);
        assert_eq!(converter.calls(), 20);
    }
}
