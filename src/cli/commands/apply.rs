// sync / up コマンドハンドラー
//
// 未適用マイグレーションの適用を実装します。
// - sync: 未適用のマイグレーションをすべて順番に適用
// - up: 次の1件だけを適用

use crate::cli::command_context::CommandContext;
use crate::cli::commands::stdout_logger;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use tracing::debug;

/// 適用範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// 最新まで適用
    All,
    /// 次の1件のみ適用
    Next,
}

/// sync / up コマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct ApplyCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// カスタム設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// 対象環境
    pub env: String,
    /// 適用範囲
    pub mode: ApplyMode,
}

/// sync / up コマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct ApplyCommandHandler {}

impl ApplyCommandHandler {
    /// 新しいApplyCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// コマンドを実行（ユニットごとのログは標準出力へ）
    pub async fn execute(&self, command: &ApplyCommand) -> Result<String> {
        self.execute_with_logger(command, stdout_logger()).await
    }

    /// ログシンクを指定してコマンドを実行
    ///
    /// # Returns
    ///
    /// 成功時は結果のサマリー、未適用がなければ `up-to-date`
    pub async fn execute_with_logger(
        &self,
        command: &ApplyCommand,
        logger: impl Fn(&str) + Send + Sync + 'static,
    ) -> Result<String> {
        let context = CommandContext::load_with_config(
            command.project_path.clone(),
            command.config_path.clone(),
        )?;
        let migrator = context.connect_migrator(&command.env, logger).await?;

        let applied = match command.mode {
            ApplyMode::All => migrator.sync().await,
            ApplyMode::Next => migrator
                .step_up()
                .await
                .map(|name| name.into_iter().collect::<Vec<_>>()),
        }
        .with_context(|| "Migration run aborted")?;
        debug!(mode = ?command.mode, count = applied.len(), "Applied pending migrations");

        if applied.is_empty() {
            return Ok("up-to-date".to_string());
        }

        Ok(self.format_summary(&applied))
    }

    /// 適用結果のサマリー
    pub fn format_summary(&self, applied: &[String]) -> String {
        format!(
            "{} {} migration(s) applied.",
            "✓".green(),
            applied.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_summary() {
        let handler = ApplyCommandHandler::new();
        let summary = handler.format_summary(&["000".to_string(), "001".to_string()]);

        assert!(summary.contains("2 migration(s) applied."));
    }
}
