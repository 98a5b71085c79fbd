// Collector - 結果収集と集計

use crate::core::{OutcomeSink, ProgressReporter, RunSummary, TaskOutcome};
use std::sync::Arc;
use tokio::sync::mpsc;

/// 収集の結果。記録に失敗してもサマリーは失われない
#[derive(Debug, Default)]
pub struct CollectedOutcomes {
    pub summary: RunSummary,
    /// 最初に発生した記録エラー
    pub record_error: Option<anyhow::Error>,
}

/// Collector: 結果チャンネルが閉じるまで受信し、サマリーを集計する
///
/// 記録に失敗しても受信は続ける。
pub fn spawn_outcome_collector<R, S>(
    mut result_rx: mpsc::Receiver<TaskOutcome>,
    reporter: Arc<R>,
    sink: Arc<S>,
) -> tokio::task::JoinHandle<CollectedOutcomes>
where
    R: ProgressReporter + 'static,
    S: OutcomeSink + 'static,
{
    tokio::spawn(async move {
        let mut collected = CollectedOutcomes::default();

        while let Some(outcome) = result_rx.recv().await {
            collected.summary.record(&outcome);
            reporter
                .report_outcome(&outcome, collected.summary.completed())
                .await;

            if let Err(error) = sink.record(&outcome).await {
                tracing::error!(error = %error, "Failed to record outcome");
                collected.record_error.get_or_insert(error);
            }
        }

        collected
    })
}
