// 結果記録機能
// 結果収集、メモリ保持、JSONレポート出力

pub mod collector;
pub mod implementations;

pub use collector::{spawn_outcome_collector, CollectedOutcomes};
pub use implementations::{JsonReportWriter, MemoryOutcomeLog, RunReport};
