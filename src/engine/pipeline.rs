// Pipeline - Producer-Consumer パイプライン
// 走査、並列変換、結果収集をつなぎ、全ジョブの完了を待機する

use super::{
    barrier::CompletionBarrier,
    consumer::spawn_workers,
    producer::{spawn_dispatcher, DispatchPlan, Dispatched},
};
use crate::{
    converter::ConversionInvoker,
    core::{ConvertError, ConvertResult, OutcomeSink, ProgressReporter, RunConfig, RunSummary},
    services::spawn_outcome_collector,
    walker::DirectoryWalker,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

pub struct ConversionPipeline<W, C> {
    walker: Arc<W>,
    converter: Arc<C>,
}

impl<W, C> ConversionPipeline<W, C>
where
    W: DirectoryWalker + 'static,
    C: ConversionInvoker + 'static,
{
    pub fn new(walker: Arc<W>, converter: Arc<C>) -> Self {
        Self { walker, converter }
    }

    /// 走査から全ジョブ完了までを実行する
    ///
    /// 走査エラーは、それまでに配信したジョブがすべて終わってから返す。
    /// 結果の記録に失敗した場合も、サマリーの確定と完了報告は行う。
    pub async fn execute<R, S>(
        &self,
        config: &RunConfig,
        reporter: Arc<R>,
        sink: Arc<S>,
    ) -> ConvertResult<RunSummary>
    where
        R: ProgressReporter + 'static,
        S: OutcomeSink + 'static,
    {
        let start_time = Instant::now();

        let (work_tx, work_rx) = mpsc::channel::<Dispatched>(config.queue_capacity);
        let (result_tx, result_rx) = mpsc::channel(config.queue_capacity);
        let barrier = CompletionBarrier::new();

        reporter.report_started(&config.root_dir).await;

        // Collector起動
        let collector_handle =
            spawn_outcome_collector(result_rx, Arc::clone(&reporter), Arc::clone(&sink));

        // ワーカープール起動。result_tx は各ワーカーが所有する
        let worker_handles = spawn_workers(
            Arc::clone(&self.converter),
            work_rx,
            result_tx,
            config.timeout(),
            config.max_workers,
        );

        // Dispatcher起動
        let dispatch_result = spawn_dispatcher(
            Arc::clone(&self.walker),
            DispatchPlan::from_config(config),
            barrier.clone(),
            work_tx,
        )
        .await;

        // 配信済みジョブの完了を待機
        barrier.wait().await;
        tracing::debug!(jobs = barrier.registered(), "All dispatched jobs completed");

        for handle in worker_handles {
            if let Err(error) = handle.await {
                tracing::error!(error = %error, "Worker task failed");
            }
        }

        let dispatch_result = dispatch_result.map_err(ConvertError::task).and_then(|r| r);
        let collected = collector_handle.await.map_err(ConvertError::task)?;
        let mut summary = collected.summary;

        summary.dispatched = barrier.registered();
        summary.elapsed_ms = start_time.elapsed().as_millis() as u64;
        if let Ok(stats) = &dispatch_result {
            summary.renamed = stats.renamed;
            summary.skipped = stats.skipped;
        }

        // 記録に失敗していてもサマリーは確定させる
        let finalized = sink.finalize(&summary).await;
        if let Err(error) = &finalized {
            tracing::error!(error = %error, "Failed to finalize outcomes");
        }
        reporter.report_completed(&summary).await;

        // 走査エラー、記録エラー、確定エラーの順に優先する
        dispatch_result?;
        if let Some(error) = collected.record_error {
            return Err(ConvertError::persistence(error));
        }
        finalized.map_err(ConvertError::persistence)?;

        Ok(summary)
    }
}
