// statusコマンドハンドラー
//
// マイグレーション状態の確認機能を実装します。
// - ローカルのマイグレーションと台帳の照合
// - 適用済み/未適用の状態表示（テーブル形式またはJSON）
// - ファイルが失われた適用済みマイグレーションの検出

use crate::cli::command_context::CommandContext;
use crate::cli::OutputFormat;
use crate::core::migration::StatusReport;
use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

/// statusコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct StatusCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// カスタム設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// 環境名
    pub env: String,
    /// 出力フォーマット
    pub format: OutputFormat,
}

/// statusコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct StatusCommandHandler {}

impl StatusCommandHandler {
    /// 新しいStatusCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// statusコマンドを実行
    ///
    /// テキスト形式では、ファイルが見つからない適用済みマイグレーションがある場合に
    /// 一覧を出力したうえでエラーを返す。
    pub async fn execute(&self, command: &StatusCommand) -> Result<String> {
        let context = CommandContext::load_with_config(
            command.project_path.clone(),
            command.config_path.clone(),
        )?;
        let migrator = context.connect_migrator(&command.env, |_| {}).await?;
        let report = migrator.status().await?;
        debug!(
            available = report.available.len(),
            applied = report.applied.len(),
            "Loaded migration status"
        );

        match command.format {
            OutputFormat::Json => serde_json::to_string_pretty(&report)
                .with_context(|| "Failed to serialize status report"),
            OutputFormat::Text => {
                let table = self.format_status(&report);
                if report.not_available.is_empty() {
                    Ok(table)
                } else {
                    println!("{}", table);
                    Err(anyhow!(self.format_missing(&report)))
                }
            }
        }
    }

    /// 状態テーブルをフォーマット
    pub fn format_status(&self, report: &StatusReport) -> String {
        let mut output = String::new();
        output.push_str("status  name\n");
        output.push_str("------  ----\n");

        for name in &report.available {
            let status = if report.is_applied(name) {
                format!("{:<7}", "ok").green().to_string()
            } else {
                format!("{:<7}", "-")
            };
            output.push_str(&format!("{} {}\n", status, name));
        }

        output.trim_end().to_string()
    }

    /// ファイルが失われたマイグレーションのメッセージ
    pub fn format_missing(&self, report: &StatusReport) -> String {
        format!("MISSING FILEs: {}", report.not_available.join(", "))
    }
}
