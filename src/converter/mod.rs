use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use std::path::Path;

pub mod command;

/// 実際のフォーマット変換を行う外部コラボレーター
///
/// 呼び出し側から見て同期的に完了すること、失敗しても共有状態を壊さないことだけを要求する。
#[automock]
#[async_trait]
pub trait ConversionInvoker: Send + Sync {
    /// `input` を変換して `output` に書き出す。失敗時のエラーメッセージが診断情報になる
    async fn convert(&self, input: &Path, output: &Path) -> Result<()>;
}

// ConversionInvoker for Box<dyn ConversionInvoker>
#[async_trait]
impl ConversionInvoker for Box<dyn ConversionInvoker> {
    async fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        self.as_ref().convert(input, output).await
    }
}
