// データベース接続アダプター
//
// SQLxを使用したデータベース接続の管理を行います。
// PostgreSQL、MySQL、SQLiteに対応した統一されたインターフェースを提供します。

use crate::adapters::connection_string;
use crate::core::config::{DatabaseConfig, Dialect};
use crate::core::error::MigrationError;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use std::time::Duration;

/// 既定の接続取得タイムアウト（秒）
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// データベース接続サービス
///
/// データベース接続プールの初期化と管理を行います。
#[derive(Debug, Clone, Default)]
pub struct DatabaseConnectionService {}

impl DatabaseConnectionService {
    /// 新しいDatabaseConnectionServiceを作成
    pub fn new() -> Self {
        Self {}
    }

    /// データベース接続文字列を構築
    pub fn build_connection_string(&self, dialect: Dialect, config: &DatabaseConfig) -> String {
        connection_string::build_connection_string(dialect, config)
    }

    /// データベース接続プールを作成
    ///
    /// # Arguments
    ///
    /// * `dialect` - データベース方言
    /// * `config` - データベース設定
    pub async fn create_pool(
        &self,
        dialect: Dialect,
        config: &DatabaseConfig,
    ) -> Result<AnyPool, MigrationError> {
        let connection_string = self.build_connection_string(dialect, config);
        self.create_pool_from_url(dialect, &connection_string, config.timeout)
            .await
    }

    /// 接続文字列からデータベース接続プールを作成
    pub async fn create_pool_from_url(
        &self,
        dialect: Dialect,
        url: &str,
        timeout_secs: Option<u64>,
    ) -> Result<AnyPool, MigrationError> {
        sqlx::any::install_default_drivers();

        self.create_pool_options(dialect, timeout_secs)
            .connect(url)
            .await
            .map_err(|e| {
                MigrationError::storage(
                    format!("Failed to create {} connection pool: {}", dialect, e),
                    None,
                )
            })
    }

    /// プールオプションを作成
    ///
    /// マイグレーションは逐次実行のため、接続数は少数で十分。
    /// SQLiteはインメモリDBを共有するため単一接続に固定する。
    pub fn create_pool_options(&self, dialect: Dialect, timeout_secs: Option<u64>) -> AnyPoolOptions {
        let max_connections = match dialect {
            Dialect::SQLite => 1,
            Dialect::PostgreSQL | Dialect::MySQL => 2,
        };
        AnyPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(
                timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ))
    }
}
