// 結果記録の具象実装

use crate::core::{OutcomeRecord, OutcomeSink, RunSummary, TaskOutcome};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::Mutex as AsyncMutex;

/// メモリ上に結果を保持する実装（テスト・ライブラリ利用向け）
#[derive(Debug, Clone, Default)]
pub struct MemoryOutcomeLog {
    records: Arc<Mutex<Vec<OutcomeRecord>>>,
    summary: Arc<Mutex<Option<RunSummary>>>,
}

impl MemoryOutcomeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 記録済みの結果を取得
    pub fn records(&self) -> Result<Vec<OutcomeRecord>> {
        let records = self
            .records
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {e}"))?;
        Ok(records.clone())
    }

    pub fn recorded_count(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// finalize で渡されたサマリー
    pub fn final_summary(&self) -> Option<RunSummary> {
        self.summary.lock().ok().and_then(|s| s.clone())
    }

    pub fn is_finalized(&self) -> bool {
        self.final_summary().is_some()
    }
}

#[async_trait]
impl OutcomeSink for MemoryOutcomeLog {
    async fn record(&self, outcome: &TaskOutcome) -> Result<()> {
        self.records
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {e}"))?
            .push(OutcomeRecord::from(outcome));
        Ok(())
    }

    async fn finalize(&self, summary: &RunSummary) -> Result<()> {
        *self
            .summary
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {e}"))? = Some(summary.clone());
        Ok(())
    }
}

/// JSONレポートの形式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub timestamp: String,
    pub summary: RunSummary,
    pub outcomes: Vec<OutcomeRecord>,
}

/// 実行終了時にJSONレポートを書き出す実装
#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    file_path: PathBuf,
    records: Arc<AsyncMutex<Vec<OutcomeRecord>>>,
}

impl JsonReportWriter {
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
            records: Arc::new(AsyncMutex::new(Vec::new())),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

#[async_trait]
impl OutcomeSink for JsonReportWriter {
    async fn record(&self, outcome: &TaskOutcome) -> Result<()> {
        self.records.lock().await.push(OutcomeRecord::from(outcome));
        Ok(())
    }

    async fn finalize(&self, summary: &RunSummary) -> Result<()> {
        let mut outcomes = self.records.lock().await.clone();
        // 完了順は不定なので入力パス順に並べて出力する
        outcomes.sort_by(|a, b| a.input_path.cmp(&b.input_path));

        let report = RunReport {
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: summary.clone(),
            outcomes,
        };

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create report directory: {}", parent.display()))?;
            }
        }

        let content = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        tokio::fs::write(&self.file_path, content)
            .await
            .with_context(|| format!("Failed to write report: {}", self.file_path.display()))?;

        tracing::info!(report = %self.file_path.display(), "Run report written");
        Ok(())
    }
}
