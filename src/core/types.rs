// 変換処理に関連するデータ型定義

use super::error::JobFailure;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 単一の変換ジョブ（入力パスと出力パスの組）
///
/// 分類器が生成した後は変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Job {
    input_path: PathBuf,
    output_path: PathBuf,
}

impl Job {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
        }
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// ログ出力用の入力ファイル名
    pub fn base_name(&self) -> String {
        self.input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input_path.display().to_string())
    }
}

/// 個別ジョブの実行結果
///
/// ジョブごとに一度だけ生成される。
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOutcome {
    pub job: Job,
    pub result: Result<(), JobFailure>,
    pub elapsed: Duration,
}

impl TaskOutcome {
    pub fn succeeded(job: Job, elapsed: Duration) -> Self {
        Self {
            job,
            result: Ok(()),
            elapsed,
        }
    }

    pub fn failed(job: Job, failure: JobFailure, elapsed: Duration) -> Self {
        Self {
            job,
            result: Err(failure),
            elapsed,
        }
    }

    pub fn success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&JobFailure> {
        self.result.as_ref().err()
    }
}

/// レポート出力用の結果レコード
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub input_path: String,
    pub output_path: String,
    pub success: bool,
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl From<&TaskOutcome> for OutcomeRecord {
    fn from(outcome: &TaskOutcome) -> Self {
        Self {
            input_path: outcome.job.input_path().display().to_string(),
            output_path: outcome.job.output_path().display().to_string(),
            success: outcome.success(),
            error: outcome.error().map(|e| e.to_string()),
            elapsed_ms: outcome.elapsed.as_millis() as u64,
        }
    }
}

/// 実行全体のサマリー
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// キューに投入されたジョブ数
    pub dispatched: usize,
    pub succeeded: usize,
    /// 失敗したジョブ数（タイムアウトを含む）
    pub failed: usize,
    pub timed_out: usize,
    /// 出力パス衝突により連番付きの名前で出力したファイル数
    #[serde(default)]
    pub renamed: usize,
    /// 出力パス衝突によりスキップしたファイル数
    pub skipped: usize,
    pub elapsed_ms: u64,
}

impl RunSummary {
    /// 結果一件をサマリーに反映
    pub fn record(&mut self, outcome: &TaskOutcome) {
        match &outcome.result {
            Ok(()) => self.succeeded += 1,
            Err(failure) => {
                self.failed += 1;
                if failure.is_timeout() {
                    self.timed_out += 1;
                }
            }
        }
    }

    pub fn completed(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
