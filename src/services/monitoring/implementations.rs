// 進捗監視の具象実装

use crate::core::{ProgressReporter, RunSummary, TaskOutcome};
use async_trait::async_trait;
use std::path::Path;

/// tracing によるログ出力の進捗報告実装
#[derive(Debug, Clone)]
pub struct LogProgressReporter {
    /// 何件ごとに進捗を info で出すか（0 なら出さない）
    progress_interval: usize,
}

impl Default for LogProgressReporter {
    fn default() -> Self {
        Self {
            progress_interval: 25,
        }
    }
}

impl LogProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    fn should_report_progress(&self, completed: usize) -> bool {
        self.progress_interval > 0 && completed % self.progress_interval == 0
    }
}

#[async_trait]
impl ProgressReporter for LogProgressReporter {
    async fn report_started(&self, root_dir: &Path) {
        tracing::info!(root = %root_dir.display(), "Starting conversion run");
    }

    async fn report_outcome(&self, outcome: &TaskOutcome, completed: usize) {
        match outcome.error() {
            None => tracing::debug!(
                file = %outcome.job.base_name(),
                output = %outcome.job.output_path().display(),
                elapsed_ms = outcome.elapsed.as_millis() as u64,
                "Converted"
            ),
            Some(error) => tracing::error!(
                file = %outcome.job.base_name(),
                "Error converting {}: {}",
                outcome.job.base_name(),
                error
            ),
        }

        if self.should_report_progress(completed) {
            tracing::info!(completed, "Progress");
        }
    }

    async fn report_completed(&self, summary: &RunSummary) {
        tracing::info!(
            dispatched = summary.dispatched,
            succeeded = summary.succeeded,
            failed = summary.failed,
            timed_out = summary.timed_out,
            renamed = summary.renamed,
            skipped = summary.skipped,
            elapsed_ms = summary.elapsed_ms,
            "Conversion run finished"
        );
    }
}

/// 何もしない進捗報告実装（テスト用）
#[derive(Debug, Default, Clone)]
pub struct NoOpProgressReporter;

impl NoOpProgressReporter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProgressReporter for NoOpProgressReporter {
    async fn report_started(&self, _root_dir: &Path) {}

    async fn report_outcome(&self, _outcome: &TaskOutcome, _completed: usize) {}

    async fn report_completed(&self, _summary: &RunSummary) {}
}
