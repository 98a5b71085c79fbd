use crate::cli::args::Cli;
use crate::core::{ConvertError, RunConfig, RunSummary};
use crate::engine::create_default_orchestrator;
use anyhow::{Context, Result};

/// コマンドライン引数と設定ファイルから実行設定を組み立てる
///
/// 設定ファイルの値は、明示的に指定されたフラグで上書きされる。
pub fn build_run_config(cli: &Cli) -> Result<RunConfig> {
    let mut config = match &cli.config {
        Some(path) => RunConfig::from_json_file(path)?,
        None => RunConfig::default(),
    };

    config = config.with_root_dir(&cli.dir);

    if cli.verbose {
        config = config.with_verbose(true);
    }
    if let Some(subdir) = &cli.output_subdir {
        config = config.with_output_subdir(subdir.as_str());
    }
    if let Some(ext) = &cli.target_ext {
        config = config.with_target_extension(ext);
    }
    if !cli.extensions.is_empty() {
        config = config.with_allowed_extensions(&cli.extensions);
    }
    if let Some(workers) = cli.workers {
        config = config.with_max_workers(workers);
    }
    if cli.timeout.is_some() {
        config = config.with_timeout_secs(cli.timeout);
    }
    if let Some(policy) = cli.on_collision {
        config = config.with_collision_policy(policy.into());
    }
    if let Some(converter) = &cli.converter {
        config = config.with_converter(converter);
    }
    if !cli.converter_args.is_empty() {
        config = config.with_converter_args(cli.converter_args.clone());
    }
    if cli.follow_links {
        config = config.with_follow_links(true);
    }

    config
        .validate()
        .map_err(ConvertError::from)
        .context("Invalid configuration")?;
    Ok(config)
}

/// Execute convert command
pub async fn execute_convert(cli: &Cli) -> Result<RunSummary> {
    let config = build_run_config(cli)?;

    println!("📚 電子書籍一括変換ツール");
    println!("📂 対象ディレクトリ: {}", config.root_dir.display());
    println!("📁 出力ディレクトリ: {}", config.output_dir().display());
    println!("⚙️  最大並列数: {}", config.max_workers);

    let orchestrator = create_default_orchestrator(&config, cli.report.as_deref());
    let summary = orchestrator.run(&config).await?;

    print_summary(&summary);
    if let Some(report) = &cli.report {
        println!("📄 レポートは {} に保存されました", report.display());
    }

    Ok(summary)
}

/// 致命的エラーを表示用の文字列にする。実行エラーには重要度を付ける
pub fn describe_failure(error: &anyhow::Error) -> String {
    let Some(convert_error) = error.downcast_ref::<ConvertError>() else {
        return format!("{error:#}");
    };

    let mut message = format!("[{}] {error:#}", convert_error.severity().as_str());
    if convert_error.is_user_error() {
        message.push_str("\n💡 入力ディレクトリと設定の内容を確認してください");
    }
    message
}

fn print_summary(summary: &RunSummary) {
    println!("\n✅ 変換完了!");
    println!("📊 変換結果:");
    println!("   - 対象ファイル数: {}", summary.dispatched);
    println!("   - 成功: {}", summary.succeeded);
    println!("   - 失敗: {}", summary.failed);
    if summary.timed_out > 0 {
        println!("   - うちタイムアウト: {}", summary.timed_out);
    }
    if summary.renamed > 0 {
        println!("   - 出力名の衝突で名前を変更: {}", summary.renamed);
    }
    if summary.skipped > 0 {
        println!("   - 出力名の衝突でスキップ: {}", summary.skipped);
    }
    println!("   - 総処理時間: {:.2}秒", summary.elapsed_ms as f64 / 1000.0);

    if !summary.all_succeeded() {
        println!("⚠️  {}個のファイルで変換に失敗しました", summary.failed);
    }
}
