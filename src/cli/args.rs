use crate::core::CollisionPolicy;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bookz")]
#[command(about = "Batch-convert a directory of e-books with an external converter")]
#[command(version)]
pub struct Cli {
    /// Root directory to scan for e-books
    #[arg(long)]
    pub dir: PathBuf,

    /// Forward converter output and enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Output subdirectory created under the root directory
    #[arg(long)]
    pub output_subdir: Option<String>,

    /// Extension of converted files
    #[arg(long = "target-ext")]
    pub target_ext: Option<String>,

    /// Input extension to convert (repeatable, replaces the default set)
    #[arg(long = "ext")]
    pub extensions: Vec<String>,

    /// Maximum number of conversions running at once
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Per-file timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// What to do when two inputs map to the same output file
    #[arg(long = "on-collision", value_enum)]
    pub on_collision: Option<CollisionArg>,

    /// Converter executable
    #[arg(long)]
    pub converter: Option<PathBuf>,

    /// Extra argument passed to the converter after input and output (repeatable)
    #[arg(long = "converter-arg", allow_hyphen_values = true)]
    pub converter_args: Vec<String>,

    /// Write a JSON report of every outcome to this file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Follow symbolic links while scanning
    #[arg(long)]
    pub follow_links: bool,

    /// JSON configuration file; flags given on the command line take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Exit with status 2 when any file failed to convert
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CollisionArg {
    /// Append -1, -2, ... to later outputs
    Rename,
    /// Let later conversions overwrite earlier ones
    Overwrite,
    /// Skip later inputs with a colliding output
    Skip,
}

impl From<CollisionArg> for CollisionPolicy {
    fn from(arg: CollisionArg) -> Self {
        match arg {
            CollisionArg::Rename => CollisionPolicy::Rename,
            CollisionArg::Overwrite => CollisionPolicy::Overwrite,
            CollisionArg::Skip => CollisionPolicy::Skip,
        }
    }
}
