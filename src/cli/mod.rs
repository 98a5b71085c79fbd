// CLI層 - コマンドライン引数の定義と処理
// ユーザーインターフェースとアプリケーションロジックの橋渡し

pub mod args;
pub mod commands;

pub use args::{Cli, CollisionArg};
pub use commands::{build_run_config, describe_failure, execute_convert};
