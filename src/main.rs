use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use style_ai_rust::{cli, config, error, orchestrator, process};
use cli::Cli;
use config::Config;
use error::Result;
use orchestrator::{Orchestrator, RunOptions, RunSummary};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    // 進捗表示(stdout)と混ざらないようstderrに出す
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_summary(summary: &RunSummary) {
    if summary.dry_run {
        println!("ドライラン: {}件を解析予定", summary.planned.len());
        for job in &summary.planned {
            println!("  - [{}#{}] {} {}", job.category, job.index, job.id, job.media_url);
        }
        println!("\n✅ ドライラン完了（変更なし） スキップ: {}件", summary.skipped);
        return;
    }

    if summary.saved {
        println!("✔ データセットを保存しました");
    }
    println!(
        "\n✅ 完了 成功: {}件 / エラー: {}件 / スキップ: {}件",
        summary.processed, summary.errors, summary.skipped
    );
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.apply_overrides(&mut config);

    println!("🎨 style-ai - スタイル解析\n");
    println!("[1/3] 設定と外部ツールを確認中...");
    let orchestrator = Orchestrator::new(config, Arc::new(process::TokioProcessRunner));
    orchestrator.preflight()?;
    println!("✔ 設定・外部ツールOK\n");

    println!(
        "[2/3] {}を解析中...{}",
        orchestrator.config().data_path.display(),
        if cli.dry_run { " (ドライラン)" } else { "" }
    );
    let summary = orchestrator
        .execute(RunOptions {
            dry_run: cli.dry_run,
            limit: cli.limit,
            verbose: cli.verbose,
            show_progress: true,
        })
        .await?;
    println!("✔ {}件のジョブを選定\n", summary.selected);

    println!("[3/3] 結果");
    print_summary(&summary);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✖ {}", e);
            ExitCode::FAILURE
        }
    }
}
