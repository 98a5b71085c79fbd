// 変換バッチ処理のエラー型定義
// 実行全体を止める致命的エラーと、ジョブ単位の非致命的エラーを分離する

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// 実行全体を中断する致命的エラー
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("入力ディレクトリが不正です: {} - {reason}", path.display())]
    InvalidInputDir { path: PathBuf, reason: String },

    #[error("出力ディレクトリの作成に失敗しました: {} - {source}", path.display())]
    OutputDirCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("ファイル列挙エラー: {} - {source}", path.display())]
    EnumerationFailed {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("設定エラー: {message}")]
    Configuration { message: String },

    #[error("タスクエラー: {source}")]
    Task {
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("永続化エラー: {source}")]
    Persistence {
        #[source]
        source: anyhow::Error,
    },

    #[error("内部エラー: {source}")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl ConvertError {
    pub fn invalid_input_dir(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::InvalidInputDir {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn output_dir_create_failed(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::OutputDirCreateFailed {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn enumeration_failed(path: impl AsRef<Path>, source: anyhow::Error) -> Self {
        Self::EnumerationFailed {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn task(source: tokio::task::JoinError) -> Self {
        Self::Task { source }
    }

    pub fn persistence(source: anyhow::Error) -> Self {
        Self::Persistence { source }
    }

    pub fn internal(source: anyhow::Error) -> Self {
        Self::Internal { source }
    }

    /// エラーの重要度を取得
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidInputDir { .. } | Self::Configuration { .. } => ErrorSeverity::High,
            Self::OutputDirCreateFailed { .. } | Self::EnumerationFailed { .. } => {
                ErrorSeverity::High
            }
            Self::Persistence { .. } => ErrorSeverity::Medium,
            Self::Task { .. } | Self::Internal { .. } => ErrorSeverity::Critical,
        }
    }

    /// ユーザー起因（設定・入力の誤り）かどうか
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInputDir { .. } | Self::Configuration { .. }
        )
    }
}

/// エラーの重要度レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

/// 単一ジョブの失敗理由（実行全体は継続する）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobFailure {
    #[error("変換失敗: {diagnostic}")]
    Conversion { diagnostic: String },

    #[error("タイムアウト: {}秒以内に変換が完了しませんでした", after.as_secs_f64())]
    TimedOut { after: Duration },

    #[error("変換タスクがパニックしました: {message}")]
    Panicked { message: String },
}

impl JobFailure {
    pub fn conversion(diagnostic: impl Into<String>) -> Self {
        Self::Conversion {
            diagnostic: diagnostic.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

/// 実行結果型
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;

/// 設定検証の結果型
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// 設定検証エラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("バリデーションエラー: {field} - {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<ValidationError> for ConvertError {
    fn from(error: ValidationError) -> Self {
        ConvertError::Configuration {
            message: error.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for ConvertError {
    fn from(error: tokio::task::JoinError) -> Self {
        ConvertError::Task { source: error }
    }
}

impl From<anyhow::Error> for ConvertError {
    fn from(error: anyhow::Error) -> Self {
        ConvertError::Internal { source: error }
    }
}
