// bookz - ディレクトリ配下の電子書籍を外部変換器で一括変換する
//
// 走査スレッドがジョブを配信し、ワーカープールが変換器を呼び出し、
// 全ジョブの完了をバリアで待機してから結果を集計する。

pub mod classifier;
pub mod cli;
pub mod converter;
pub mod core;
pub mod engine;
pub mod services;
pub mod walker;

pub use classifier::PathClassifier;
pub use converter::{command::CommandConverter, ConversionInvoker};
pub use core::{
    CollisionPolicy, ConvertError, ConvertResult, Job, JobFailure, OutcomeSink, ProgressReporter,
    RunConfig, RunSummary, TaskOutcome,
};
pub use engine::{
    convert_directory, create_default_orchestrator, create_quiet_orchestrator, CompletionBarrier,
    ConversionOrchestrator,
};
pub use walker::{local::LocalWalker, DirectoryWalker, WalkEntry};
