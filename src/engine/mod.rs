// エンジン層 - 並列処理とオーケストレーション
// サービス層を組み合わせて高レベルな処理を提供

pub mod api;
pub mod barrier;
pub mod consumer;
pub mod orchestrator;
mod pipeline;
pub mod producer;

pub use api::{
    convert_directory, create_default_orchestrator, create_quiet_orchestrator, DefaultOrchestrator,
};
pub use barrier::{CompletionBarrier, CompletionToken};
pub use orchestrator::ConversionOrchestrator;
pub use pipeline::ConversionPipeline;
pub use producer::{DispatchPlan, DispatchStats};
