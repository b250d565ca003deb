// downコマンドハンドラー
//
// 最後に適用されたマイグレーションの取り消しを実装します。
// データ削除を伴う可能性があるため、実行前に確認を求めます。

use crate::cli::command_context::CommandContext;
use crate::cli::commands::stdout_logger;
use anyhow::{Context, Result};
use inquire::Confirm;
use std::path::PathBuf;

/// downコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct RollbackCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// カスタム設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// 対象環境
    pub env: String,
    /// 確認をスキップ
    pub yes: bool,
}

/// downコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct RollbackCommandHandler {}

impl RollbackCommandHandler {
    /// 新しいRollbackCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// コマンドを実行（確認は対話プロンプトで行う）
    pub async fn execute(&self, command: &RollbackCommand) -> Result<String> {
        self.execute_with(command, prompt_confirmation, stdout_logger())
            .await
    }

    /// 確認関数とログシンクを指定してコマンドを実行
    pub async fn execute_with(
        &self,
        command: &RollbackCommand,
        confirm: impl Fn(&str) -> Result<bool>,
        logger: impl Fn(&str) + Send + Sync + 'static,
    ) -> Result<String> {
        let context = CommandContext::load_with_config(
            command.project_path.clone(),
            command.config_path.clone(),
        )?;
        let migrator = context.connect_migrator(&command.env, logger).await?;

        if command.yes {
            return match migrator
                .step_down()
                .await
                .with_context(|| "Failed to undo migration")?
            {
                Some(name) => Ok(format!("Undid {}", name)),
                None => Ok("nothing to down".to_string()),
            };
        }

        let report = migrator.status().await?;
        let Some(name) = report.last_applied().map(str::to_string) else {
            return Ok("nothing to down".to_string());
        };

        if !confirm(&self.confirmation_message(&name))? {
            return Ok(format!("Skipped undoing {}", name));
        }

        migrator
            .down(std::slice::from_ref(&name))
            .await
            .with_context(|| format!("Failed to undo migration {}", name))?;

        Ok(format!("Undid {}", name))
    }

    /// 確認メッセージ
    pub fn confirmation_message(&self, name: &str) -> String {
        format!(
            "Do you really want to undo {}, which may involve deleting data?",
            name
        )
    }
}

/// 対話的に確認を行う（既定はNo）
fn prompt_confirmation(message: &str) -> Result<bool> {
    Confirm::new(message)
        .with_default(false)
        .prompt()
        .with_context(|| "Failed to read confirmation")
}
