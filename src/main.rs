use anyhow::{Context, Result};
use clap::Parser;
use colored::control as color_control;
use sediment::cli::commands::apply::{ApplyCommand, ApplyCommandHandler, ApplyMode};
use sediment::cli::commands::generate::{GenerateCommand, GenerateCommandHandler};
use sediment::cli::commands::init::{InitCommand, InitCommandHandler};
use sediment::cli::commands::rollback::{RollbackCommand, RollbackCommandHandler};
use sediment::cli::commands::status::{StatusCommand, StatusCommandHandler};
use sediment::cli::{Cli, Commands};
use sediment::core::config::Dialect;
use std::env;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    sqlx::any::install_default_drivers();

    // CLIをパースして実行
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // 非同期ランタイムを作成して実行
    let runtime = tokio::runtime::Runtime::new()
        .context("Failed to create Tokio runtime")
        .unwrap_or_else(|e| {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        });

    let result = runtime.block_on(run_command(cli));

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// 診断ログを標準エラーへ出力する（RUST_LOG が優先）
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "sediment=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// コマンドを実行する
async fn run_command(cli: Cli) -> Result<String> {
    // --no-color フラグの処理
    if cli.no_color {
        color_control::set_override(false);
    }

    // プロジェクトのルートパスを取得
    let project_path = env::current_dir()?;
    let config_path = cli.config;
    let env = cli.env;

    match cli.command {
        Commands::Init { dialect, force } => {
            let dialect: Dialect = dialect.parse()?;
            let handler = InitCommandHandler::new();
            let command = InitCommand {
                project_path,
                dialect,
                force,
            };
            handler.execute(&command)
        }

        Commands::Sync => {
            let handler = ApplyCommandHandler::new();
            let command = ApplyCommand {
                project_path,
                config_path,
                env,
                mode: ApplyMode::All,
            };
            handler.execute(&command).await
        }

        Commands::Up => {
            let handler = ApplyCommandHandler::new();
            let command = ApplyCommand {
                project_path,
                config_path,
                env,
                mode: ApplyMode::Next,
            };
            handler.execute(&command).await
        }

        Commands::Down { yes } => {
            let handler = RollbackCommandHandler::new();
            let command = RollbackCommand {
                project_path,
                config_path,
                env,
                yes,
            };
            handler.execute(&command).await
        }

        Commands::Status { format } => {
            let handler = StatusCommandHandler::new();
            let command = StatusCommand {
                project_path,
                config_path,
                env,
                format,
            };
            handler.execute(&command).await
        }

        Commands::New { words } => {
            let handler = GenerateCommandHandler::new();
            let command = GenerateCommand {
                project_path,
                config_path,
                words,
            };
            let path = handler.execute(&command)?;
            Ok(format!("Created {}", path))
        }
    }
}
