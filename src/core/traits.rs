// 変換バッチ処理のトレイト定義
// 進捗報告と結果記録の抽象化インターフェース

use super::types::{RunSummary, TaskOutcome};
use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use std::path::Path;

/// 進捗報告の抽象化トレイト
#[automock]
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    /// 処理開始時の報告
    async fn report_started(&self, root_dir: &Path);

    /// 一件のジョブが完了した時の報告（`completed` はそれまでの完了数）
    async fn report_outcome(&self, outcome: &TaskOutcome, completed: usize);

    /// 処理完了時の報告
    async fn report_completed(&self, summary: &RunSummary);
}

// ProgressReporter for Box<dyn ProgressReporter>
#[async_trait]
impl ProgressReporter for Box<dyn ProgressReporter> {
    async fn report_started(&self, root_dir: &Path) {
        self.as_ref().report_started(root_dir).await
    }

    async fn report_outcome(&self, outcome: &TaskOutcome, completed: usize) {
        self.as_ref().report_outcome(outcome, completed).await
    }

    async fn report_completed(&self, summary: &RunSummary) {
        self.as_ref().report_completed(summary).await
    }
}

/// 変換結果の追記専用ログ
#[automock]
#[async_trait]
pub trait OutcomeSink: Send + Sync {
    /// 結果を一件記録
    async fn record(&self, outcome: &TaskOutcome) -> Result<()>;

    /// 全ジョブ完了後の確定処理
    async fn finalize(&self, summary: &RunSummary) -> Result<()>;
}

// OutcomeSink for Box<dyn OutcomeSink>
#[async_trait]
impl OutcomeSink for Box<dyn OutcomeSink> {
    async fn record(&self, outcome: &TaskOutcome) -> Result<()> {
        self.as_ref().record(outcome).await
    }

    async fn finalize(&self, summary: &RunSummary) -> Result<()> {
        self.as_ref().finalize(summary).await
    }
}
