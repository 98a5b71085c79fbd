// 高レベル公開API
// ConversionOrchestrator を簡単に使用できるようにするための便利な関数

use super::ConversionOrchestrator;
use crate::{
    converter::{command::CommandConverter, ConversionInvoker},
    core::{ConvertResult, OutcomeSink, RunConfig, RunSummary},
    services::{JsonReportWriter, LogProgressReporter, MemoryOutcomeLog, NoOpProgressReporter},
    walker::local::LocalWalker,
};
use std::path::Path;

/// CLI が使う標準構成のエンジン
pub type DefaultOrchestrator =
    ConversionOrchestrator<LocalWalker, CommandConverter, LogProgressReporter, Box<dyn OutcomeSink>>;

/// 設定から標準構成のエンジンを作成
///
/// `report_path` を指定すると実行終了時にJSONレポートを書き出す。
pub fn create_default_orchestrator(config: &RunConfig, report_path: Option<&Path>) -> DefaultOrchestrator {
    let sink: Box<dyn OutcomeSink> = match report_path {
        Some(path) => Box::new(JsonReportWriter::new(path)),
        None => Box::new(MemoryOutcomeLog::new()),
    };

    ConversionOrchestrator::new(
        LocalWalker::new().with_follow_links(config.follow_links),
        CommandConverter::from_config(config),
        LogProgressReporter::new(),
        sink,
    )
}

/// 静音版のエンジンを作成（テスト・ライブラリ利用向け）
pub fn create_quiet_orchestrator<C>(
    converter: C,
) -> ConversionOrchestrator<LocalWalker, C, NoOpProgressReporter, MemoryOutcomeLog>
where
    C: ConversionInvoker + 'static,
{
    ConversionOrchestrator::new(
        LocalWalker::new(),
        converter,
        NoOpProgressReporter::new(),
        MemoryOutcomeLog::new(),
    )
}

/// 標準構成で一度だけ変換を実行する
pub async fn convert_directory(config: &RunConfig) -> ConvertResult<RunSummary> {
    create_default_orchestrator(config, None).run(config).await
}
