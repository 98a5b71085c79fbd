// 外部プロセス（calibre の ebook-convert など）による変換

use super::ConversionInvoker;
use crate::core::RunConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// エラーメッセージに含める標準エラー出力の最大行数
const STDERR_TAIL_LINES: usize = 5;

/// `<program> <input> <output> [args...]` を実行する変換器
#[derive(Debug, Clone)]
pub struct CommandConverter {
    program: PathBuf,
    extra_args: Vec<String>,
    verbose: bool,
}

impl CommandConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
            verbose: false,
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(&config.converter)
            .with_args(config.converter_args.clone())
            .with_verbose(config.verbose)
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// true なら変換器の標準出力と標準エラー出力をそのまま流す
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait]
impl ConversionInvoker for CommandConverter {
    async fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        tracing::debug!(
            program = %self.program.display(),
            input = %input.display(),
            output = %output.display(),
            "Launching converter"
        );

        // verbose 時は出力をそのまま流し、それ以外は診断用に標準エラー出力だけ取り込む
        let (stdout, stderr) = if self.verbose {
            (Stdio::inherit(), Stdio::inherit())
        } else {
            (Stdio::null(), Stdio::piped())
        };

        // タイムアウトでタスクが中断された場合に子プロセスも終了させる
        let result = Command::new(&self.program)
            .arg(input)
            .arg(output)
            .args(&self.extra_args)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("Failed to launch converter: {}", self.program.display()))?;

        let stderr = String::from_utf8_lossy(&result.stderr);
        let tail = stderr_tail(&stderr);

        if result.status.success() {
            if !tail.is_empty() {
                tracing::debug!(input = %input.display(), stderr = %tail, "Converter reported warnings");
            }
            return Ok(());
        }

        if tail.is_empty() {
            anyhow::bail!("{}", result.status);
        }
        anyhow::bail!("{}: {}", result.status, tail)
    }
}

fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join(" | ")
}
