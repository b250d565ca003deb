// initコマンドハンドラー
//
// プロジェクトの初期化処理を実装します。
// - マイグレーションディレクトリの作成（migrations/）
// - デフォルト設定ファイルの生成（.sediment.yaml）
// - 初期化済みプロジェクトの検出

use crate::core::config::{Config, DatabaseConfig, Dialect};
use crate::core::naming;
use crate::services::config_loader::ConfigLoader;
use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// initコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct InitCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// データベース方言
    pub dialect: Dialect,
    /// 強制的に初期化（既存の設定を上書き）
    pub force: bool,
}

/// initコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct InitCommandHandler {}

impl InitCommandHandler {
    /// 新しいInitCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// initコマンドを実行
    pub fn execute(&self, command: &InitCommand) -> Result<String> {
        if self.is_already_initialized(&command.project_path) && !command.force {
            return Err(anyhow!(
                "Project is already initialized. Use --force option to force re-initialization."
            ));
        }

        let migrations_dir = command.project_path.join(naming::MIGRATIONS_DIR);
        fs::create_dir_all(&migrations_dir).with_context(|| {
            format!(
                "Failed to create migrations/ directory: {:?}",
                migrations_dir
            )
        })?;

        let config = self.default_config(command.dialect);
        let yaml = ConfigLoader::to_yaml(&config)?;
        let config_path = command.project_path.join(Config::DEFAULT_CONFIG_PATH);
        fs::write(&config_path, yaml)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(format!(
            "Project initialized ({}). Edit {} to configure the database connection.",
            command.dialect,
            Config::DEFAULT_CONFIG_PATH
        ))
    }

    /// プロジェクトが既に初期化されているかチェック
    pub fn is_already_initialized(&self, project_path: &Path) -> bool {
        project_path.join(Config::DEFAULT_CONFIG_PATH).exists()
    }

    /// 方言ごとのデフォルト設定を作成
    pub fn default_config(&self, dialect: Dialect) -> Config {
        let database = match dialect {
            Dialect::SQLite => format!("{}.db", naming::APP_NAME),
            Dialect::PostgreSQL | Dialect::MySQL => format!("{}_db", naming::APP_NAME),
        };
        let user = match dialect {
            Dialect::PostgreSQL => Some("postgres".to_string()),
            Dialect::MySQL => Some("root".to_string()),
            Dialect::SQLite => None,
        };

        let db_config = DatabaseConfig {
            host: "localhost".to_string(),
            port: match dialect {
                Dialect::SQLite => None,
                _ => Some(dialect.default_port()),
            },
            database,
            user,
            password: None,
            timeout: Some(30),
        };

        let mut environments = HashMap::new();
        environments.insert("development".to_string(), db_config);

        Config {
            version: "1.0".to_string(),
            dialect,
            migrations_dir: PathBuf::from(naming::MIGRATIONS_DIR),
            table_name: naming::DEFAULT_TABLE_NAME.to_string(),
            environments,
        }
    }
}
