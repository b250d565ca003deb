// 設定ファイル管理
//
// プロジェクトの設定ファイル（YAML形式）の構造定義と検証、
// 環境別のデータベース接続設定の管理を行います。

use crate::core::naming;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

/// データベース方言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[serde(rename = "postgresql")]
    PostgreSQL,
    #[serde(rename = "mysql")]
    MySQL,
    #[serde(rename = "sqlite")]
    SQLite,
}

impl Dialect {
    /// 方言ごとの既定ポート（SQLiteは0）
    pub fn default_port(&self) -> u16 {
        match self {
            Dialect::PostgreSQL => 5432,
            Dialect::MySQL => 3306,
            Dialect::SQLite => 0,
        }
    }

    /// n番目（1始まり）のバインドパラメータのプレースホルダー
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Dialect::PostgreSQL => format!("${}", index),
            Dialect::MySQL | Dialect::SQLite => "?".to_string(),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::PostgreSQL => write!(f, "postgresql"),
            Dialect::MySQL => write!(f, "mysql"),
            Dialect::SQLite => write!(f, "sqlite"),
        }
    }
}

impl FromStr for Dialect {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "postgresql" | "postgres" => Ok(Dialect::PostgreSQL),
            "mysql" => Ok(Dialect::MySQL),
            "sqlite" => Ok(Dialect::SQLite),
            other => Err(anyhow!(
                "Unsupported database dialect: {}. Please specify one of: postgresql, mysql, sqlite.",
                other
            )),
        }
    }
}

/// プロジェクト設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 設定ファイルのバージョン
    pub version: String,

    /// データベース方言
    pub dialect: Dialect,

    /// マイグレーションディレクトリ
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: PathBuf,

    /// 台帳テーブル名
    #[serde(default = "default_table_name")]
    pub table_name: String,

    /// 環境別のデータベース設定
    pub environments: HashMap<String, DatabaseConfig>,
}

fn default_migrations_dir() -> PathBuf {
    PathBuf::from(naming::MIGRATIONS_DIR)
}

fn default_table_name() -> String {
    naming::DEFAULT_TABLE_NAME.to_string()
}

impl Config {
    /// デフォルトの設定ファイルパス
    pub const DEFAULT_CONFIG_PATH: &'static str = naming::CONFIG_FILE;

    /// 指定された環境のデータベース設定を取得
    pub fn get_database_config(&self, environment: &str) -> Result<DatabaseConfig> {
        self.environments.get(environment).cloned().ok_or_else(|| {
            let mut available: Vec<_> = self.environments.keys().collect();
            available.sort();
            anyhow!(
                "Environment '{}' not found. Available environments: {:?}",
                environment,
                available
            )
        })
    }

    /// 設定の妥当性を検証
    pub fn validate(&self) -> Result<()> {
        if self.version.is_empty() {
            return Err(anyhow!("Config file version is not specified"));
        }

        if self.environments.is_empty() {
            return Err(anyhow!(
                "At least one environment configuration is required"
            ));
        }

        naming::validate_table_name(&self.table_name)
            .with_context(|| "Invalid ledger table name")?;

        for (env_name, db_config) in &self.environments {
            db_config
                .validate()
                .with_context(|| format!("Invalid config for environment '{}'", env_name))?;
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(yaml: &str) -> Result<Self, Self::Err> {
        serde_saphyr::from_str(yaml).with_context(|| "Failed to parse config file")
    }
}

/// データベース接続設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// ホスト名（SQLiteの場合は不要）
    #[serde(default = "default_host")]
    pub host: String,

    /// ポート番号（省略時は方言の既定値）
    #[serde(default)]
    pub port: Option<u16>,

    /// データベース名（SQLiteの場合はファイルパス）
    pub database: String,

    /// ユーザー名
    pub user: Option<String>,

    /// パスワード
    pub password: Option<String>,

    /// 接続タイムアウト（秒）
    pub timeout: Option<u64>,
}

fn default_host() -> String {
    "localhost".to_string()
}

impl DatabaseConfig {
    /// Validate database configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.is_empty() {
            return Err(anyhow!("Database name is not specified"));
        }

        Ok(())
    }

    /// 方言を考慮したポート番号
    pub fn port_or_default(&self, dialect: Dialect) -> u16 {
        self.port.unwrap_or_else(|| dialect.default_port())
    }
}
