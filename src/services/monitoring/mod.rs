pub mod implementations;

pub use implementations::{LogProgressReporter, NoOpProgressReporter};
