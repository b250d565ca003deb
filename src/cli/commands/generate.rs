// newコマンドハンドラー
//
// 空のマイグレーションの雛形を作成します。
// ディレクトリ名: `{YYYY-MM-DD-HHMMSS}-{説明}`（辞書順が作成順になる）

use crate::adapters::catalog::{DOWN_FILE, UP_FILE};
use crate::cli::command_context::CommandContext;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static NON_ALNUM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("sanitize regex must compile"));

const UP_TEMPLATE: &str = "-- Forward migration. Statements are separated by semicolons.\n";
const DOWN_TEMPLATE: &str = "-- Inverse of up.sql.\n";

/// newコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct GenerateCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// カスタム設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// 説明の単語列
    pub words: Vec<String>,
}

/// newコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct GenerateCommandHandler {}

impl GenerateCommandHandler {
    /// 新しいGenerateCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// newコマンドを実行
    ///
    /// # Returns
    ///
    /// 作成したディレクトリのプロジェクトからの相対パス
    pub fn execute(&self, command: &GenerateCommand) -> Result<String> {
        let context = CommandContext::load_with_config(
            command.project_path.clone(),
            command.config_path.clone(),
        )?;
        let migrations_dir = context.ensure_migrations_dir()?;

        let path = self.create_migration(&migrations_dir, &command.words, Utc::now())?;

        Ok(path
            .strip_prefix(&command.project_path)
            .unwrap_or(&path)
            .display()
            .to_string())
    }

    /// マイグレーションの雛形ディレクトリを作成
    pub fn create_migration(
        &self,
        migrations_dir: &Path,
        words: &[String],
        now: DateTime<Utc>,
    ) -> Result<PathBuf> {
        let name = self.migration_name(words, now)?;
        let path = migrations_dir.join(&name);
        if path.exists() {
            return Err(anyhow!("Migration already exists: {:?}", path));
        }

        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create migration directory: {:?}", path))?;
        fs::write(path.join(UP_FILE), UP_TEMPLATE)
            .with_context(|| format!("Failed to write {}", UP_FILE))?;
        fs::write(path.join(DOWN_FILE), DOWN_TEMPLATE)
            .with_context(|| format!("Failed to write {}", DOWN_FILE))?;

        Ok(path)
    }

    /// タイムスタンプと説明からマイグレーション名を生成
    pub fn migration_name(&self, words: &[String], now: DateTime<Utc>) -> Result<String> {
        let description = self.sanitize_description(&words.join(" "));
        if description.is_empty() {
            return Err(anyhow!(
                "Migration description must contain at least one letter or digit"
            ));
        }

        Ok(format!("{}-{}", now.format("%Y-%m-%d-%H%M%S"), description))
    }

    /// 説明をファイル名用にサニタイズ
    pub fn sanitize_description(&self, description: &str) -> String {
        let lowered = description.to_lowercase();
        NON_ALNUM_REGEX
            .replace_all(&lowered, "_")
            .trim_matches('_')
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_sanitize_description() {
        let handler = GenerateCommandHandler::new();

        assert_eq!(handler.sanitize_description("Create Users table"), "create_users_table");
        assert_eq!(handler.sanitize_description("  add-email!! column "), "add_email_column");
        assert_eq!(handler.sanitize_description("!!!"), "");
    }

    #[test]
    fn test_migration_name() {
        let handler = GenerateCommandHandler::new();
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap();

        let name = handler
            .migration_name(&words(&["create", "users"]), now)
            .unwrap();
        assert_eq!(name, "2024-01-02-150405-create_users");

        assert!(handler.migration_name(&words(&["--"]), now).is_err());
    }

    #[test]
    fn test_create_migration() {
        let temp_dir = TempDir::new().unwrap();
        let handler = GenerateCommandHandler::new();
        let now = Utc.with_ymd_and_hms(2024, 1, 2, 15, 4, 5).unwrap();

        let path = handler
            .create_migration(temp_dir.path(), &words(&["create", "users"]), now)
            .unwrap();

        assert!(path.join("up.sql").is_file());
        assert!(path.join("down.sql").is_file());

        // 同名の雛形は作成しない
        assert!(handler
            .create_migration(temp_dir.path(), &words(&["create", "users"]), now)
            .is_err());
    }
}
