// サービス層 - 機能別のビジネスロジック

pub mod conversion;
pub mod monitoring;
pub mod persistence;

pub use conversion::execute_job;
pub use monitoring::{LogProgressReporter, NoOpProgressReporter};
pub use persistence::{spawn_outcome_collector, JsonReportWriter, MemoryOutcomeLog, RunReport};
