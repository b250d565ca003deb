// コマンド共通コンテキスト
//
// 設定ファイル読み込み・パス解決・マイグレーター構築の重複をCLI層で集約する。

use crate::adapters::catalog::DirectoryCatalog;
use crate::adapters::database::DatabaseConnectionService;
use crate::core::config::{Config, DatabaseConfig, Dialect};
use crate::services::config_loader::ConfigLoader;
use crate::services::migrator::{Migrator, MigratorOptions};
use anyhow::{anyhow, Context, Result};
use sqlx::AnyPool;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// CLIコマンド共通の実行コンテキスト
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub project_path: PathBuf,
    pub config_path: PathBuf,
    pub config: Config,
}

impl CommandContext {
    /// プロジェクトルートから設定を読み込んでコンテキストを作成
    pub fn load(project_path: PathBuf) -> Result<Self> {
        Self::load_with_config(project_path, None)
    }

    /// カスタム設定ファイルパスを指定してコンテキストを作成
    pub fn load_with_config(
        project_path: PathBuf,
        custom_config_path: Option<PathBuf>,
    ) -> Result<Self> {
        let config_path = custom_config_path
            .unwrap_or_else(|| project_path.join(Config::DEFAULT_CONFIG_PATH));

        if !config_path.exists() {
            return Err(anyhow!(
                "Config file not found: {:?}. Please initialize the project first with the `init` command.",
                config_path
            ));
        }

        let config =
            ConfigLoader::from_file(&config_path).with_context(|| "Failed to read config file")?;

        Ok(Self {
            project_path,
            config_path,
            config,
        })
    }

    /// マイグレーションディレクトリの絶対パス
    pub fn migrations_dir(&self) -> PathBuf {
        self.project_path.join(&self.config.migrations_dir)
    }

    /// マイグレーションディレクトリを用意して返す（存在しなければ作成）
    pub fn ensure_migrations_dir(&self) -> Result<PathBuf> {
        let path = self.migrations_dir();
        if !path.is_dir() {
            fs::create_dir_all(&path).with_context(|| {
                format!("Failed to create migrations directory: {:?}", path)
            })?;
            debug!(path = %path.display(), "Created migrations directory");
        }
        Ok(path)
    }

    /// 環境に応じたデータベース設定を取得（環境変数上書き込み）
    pub fn database_config(&self, env: &str) -> Result<DatabaseConfig> {
        let config = self
            .config
            .get_database_config(env)
            .with_context(|| format!("Config for environment '{}' not found", env))?;
        Ok(ConfigLoader::apply_env_overrides(&config))
    }

    /// データベース方言を取得
    pub fn dialect(&self) -> Dialect {
        self.config.dialect
    }

    /// 接続プールを作成
    pub async fn connect_pool(&self, env: &str) -> Result<AnyPool> {
        let db_service = DatabaseConnectionService::new();
        let db_config = self.database_config(env)?;

        let pool = match ConfigLoader::database_url_override() {
            Some(url) => {
                debug!("Using connection string from environment");
                db_service
                    .create_pool_from_url(self.dialect(), &url, db_config.timeout)
                    .await
            }
            None => db_service.create_pool(self.dialect(), &db_config).await,
        };

        pool.with_context(|| "Failed to connect to database")
    }

    /// マイグレーターを構築し、マイグレーションディレクトリと台帳テーブルを用意する
    ///
    /// # Arguments
    ///
    /// * `env` - 対象環境
    /// * `logger` - ユニットごとに呼ばれるログシンク
    pub async fn connect_migrator(
        &self,
        env: &str,
        logger: impl Fn(&str) + Send + Sync + 'static,
    ) -> Result<Migrator> {
        let migrations_dir = self.ensure_migrations_dir()?;
        let pool = self.connect_pool(env).await?;

        let options = MigratorOptions::default()
            .table_name(self.config.table_name.clone())
            .logger(logger);
        let migrator = Migrator::new(
            pool,
            self.dialect(),
            Arc::new(DirectoryCatalog::new(migrations_dir)),
            options,
        )?;

        migrator
            .setup()
            .await
            .with_context(|| "Failed to create migration ledger table")?;

        Ok(migrator)
    }
}
