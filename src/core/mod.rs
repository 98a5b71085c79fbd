// コアレイヤー - 基盤となるトレイト、型、エラー、設定の定義
// 他のレイヤーから参照される基本的な抽象化を提供

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{CollisionPolicy, RunConfig};
pub use error::{ConvertError, ConvertResult, JobFailure, ValidationError};
pub use traits::{OutcomeSink, ProgressReporter};
pub use types::{Job, OutcomeRecord, RunSummary, TaskOutcome};
