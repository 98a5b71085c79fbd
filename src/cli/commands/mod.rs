pub mod convert;

pub use convert::{build_run_config, describe_failure, execute_convert};
