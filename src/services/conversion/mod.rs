// 変換処理機能
// 単一ジョブの実行と失敗の隔離

pub mod worker;

pub use worker::execute_job;
