// ConversionOrchestrator - 依存性注入によるバッチ変換エンジン
// 入力検証、出力ディレクトリの準備、パイプライン実行をまとめる

use super::pipeline::ConversionPipeline;
use crate::{
    converter::ConversionInvoker,
    core::{ConvertError, ConvertResult, OutcomeSink, ProgressReporter, RunConfig, RunSummary},
    walker::DirectoryWalker,
};
use std::io;
use std::path::Path;
use std::sync::Arc;

/// バッチ変換エンジン
///
/// 走査、変換、進捗報告、結果記録の各依存をコンストラクタで受け取る。
/// 並列処理で共有するためにすべて `Arc` で保持する。
pub struct ConversionOrchestrator<W, C, R, S> {
    walker: Arc<W>,
    converter: Arc<C>,
    reporter: Arc<R>,
    sink: Arc<S>,
}

impl<W, C, R, S> ConversionOrchestrator<W, C, R, S>
where
    W: DirectoryWalker + 'static,
    C: ConversionInvoker + 'static,
    R: ProgressReporter + 'static,
    S: OutcomeSink + 'static,
{
    pub fn new(walker: W, converter: C, reporter: R, sink: S) -> Self {
        Self {
            walker: Arc::new(walker),
            converter: Arc::new(converter),
            reporter: Arc::new(reporter),
            sink: Arc::new(sink),
        }
    }

    /// ディレクトリ配下の対象ファイルをすべて変換する
    ///
    /// 個別ジョブの失敗はサマリーに集計され、エラーにはならない。
    pub async fn run(&self, config: &RunConfig) -> ConvertResult<RunSummary> {
        config.validate()?;

        ensure_input_dir(&config.root_dir).await?;
        let output_dir = config.output_dir();
        ensure_output_dir(&output_dir).await?;

        tracing::debug!(
            output = %output_dir.display(),
            workers = config.max_workers,
            timeout = ?config.timeout(),
            policy = ?config.collision_policy,
            "Output directory ready"
        );

        let pipeline = ConversionPipeline::new(Arc::clone(&self.walker), Arc::clone(&self.converter));
        pipeline
            .execute(config, Arc::clone(&self.reporter), Arc::clone(&self.sink))
            .await
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// 入力ディレクトリの存在確認
pub async fn ensure_input_dir(root: &Path) -> ConvertResult<()> {
    let metadata = tokio::fs::metadata(root).await.map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            ConvertError::invalid_input_dir(root, "存在しません")
        } else {
            ConvertError::invalid_input_dir(root, e.to_string())
        }
    })?;

    if !metadata.is_dir() {
        return Err(ConvertError::invalid_input_dir(root, "ディレクトリではありません"));
    }
    Ok(())
}

/// 出力ディレクトリを作成する。既存のディレクトリはそのまま使う
pub async fn ensure_output_dir(output_dir: &Path) -> ConvertResult<()> {
    match tokio::fs::create_dir(output_dir).await {
        Ok(()) => {
            tracing::debug!(output = %output_dir.display(), "Created output directory");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            let metadata = tokio::fs::metadata(output_dir)
                .await
                .map_err(|e| ConvertError::output_dir_create_failed(output_dir, e))?;
            if metadata.is_dir() {
                Ok(())
            } else {
                Err(ConvertError::output_dir_create_failed(
                    output_dir,
                    io::Error::new(io::ErrorKind::AlreadyExists, "path exists and is not a directory"),
                ))
            }
        }
        Err(e) => Err(ConvertError::output_dir_create_failed(output_dir, e)),
    }
}
