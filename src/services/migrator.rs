// マイグレーター
//
// 台帳・カタログ・照合・実行を1つにまとめた呼び出し口。
// status → up/down のサイクルを繰り返すことで、途中失敗からも再開できます。

use crate::adapters::ledger::Ledger;
use crate::core::config::Dialect;
use crate::core::error::MigrationError;
use crate::core::migration::{Direction, StatusReport};
use crate::core::naming::DEFAULT_TABLE_NAME;
use crate::services::executor::{noop_logger, Executor, LogSink};
use crate::services::reconciler;
use crate::services::traits::MigrationSource;
use sqlx::AnyPool;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// マイグレーターの生成オプション
#[derive(Clone)]
pub struct MigratorOptions {
    /// 台帳テーブル名
    pub table_name: String,
    /// ユニットごとのログシンク
    pub logger: LogSink,
}

impl Default for MigratorOptions {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            logger: noop_logger(),
        }
    }
}

impl MigratorOptions {
    /// 台帳テーブル名を設定
    pub fn table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// ログシンクを設定
    pub fn logger(mut self, logger: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }
}

impl fmt::Debug for MigratorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigratorOptions")
            .field("table_name", &self.table_name)
            .finish_non_exhaustive()
    }
}

/// マイグレーター
#[derive(Clone)]
pub struct Migrator {
    pool: AnyPool,
    catalog: Arc<dyn MigrationSource>,
    ledger: Ledger,
    executor: Executor,
}

impl Migrator {
    /// 新しいMigratorを作成
    ///
    /// # Arguments
    ///
    /// * `pool` - データベース接続プール
    /// * `dialect` - データベース方言
    /// * `catalog` - マイグレーションの供給元
    /// * `options` - 台帳テーブル名とログシンク
    pub fn new(
        pool: AnyPool,
        dialect: Dialect,
        catalog: Arc<dyn MigrationSource>,
        options: MigratorOptions,
    ) -> Result<Self, MigrationError> {
        let ledger = Ledger::new(options.table_name, dialect)?;
        let executor = Executor::new(pool.clone(), catalog.clone(), ledger.clone())
            .with_logger(options.logger);

        Ok(Self {
            pool,
            catalog,
            ledger,
            executor,
        })
    }

    /// 台帳
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// 接続プール
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// 台帳テーブルを用意（毎回の起動時に呼んでよい）
    pub async fn setup(&self) -> Result<(), MigrationError> {
        self.ledger.ensure_schema(&self.pool).await
    }

    /// 現在の状態レポートを計算
    ///
    /// カタログと台帳は独立に読み込まれ、両者の間でスナップショットは共有されない。
    pub async fn status(&self) -> Result<StatusReport, MigrationError> {
        let available = self.catalog.list().await?;
        let applied = self.ledger.list_applied(&self.pool).await?;
        let report = reconciler::status(&available, &applied);

        debug!(
            available = report.available.len(),
            applied = report.applied.len(),
            not_applied = report.not_applied.len(),
            not_available = report.not_available.len(),
            "Computed migration status"
        );

        Ok(report)
    }

    /// 指定した名前を順に適用
    pub async fn up(&self, names: &[String]) -> Result<Vec<String>, MigrationError> {
        self.executor.apply(names, Direction::Up).await
    }

    /// 指定した名前を順に取り消し
    pub async fn down(&self, names: &[String]) -> Result<Vec<String>, MigrationError> {
        self.executor.apply(names, Direction::Down).await
    }

    /// 未適用のマイグレーションをすべて適用
    pub async fn sync(&self) -> Result<Vec<String>, MigrationError> {
        let report = self.status().await?;
        if report.is_up_to_date() {
            return Ok(Vec::new());
        }
        self.up(&report.not_applied).await
    }

    /// 次の未適用マイグレーションを1つだけ適用
    pub async fn step_up(&self) -> Result<Option<String>, MigrationError> {
        let report = self.status().await?;
        let Some(name) = report.next_pending() else {
            return Ok(None);
        };
        let name = name.to_string();
        self.up(std::slice::from_ref(&name)).await?;
        Ok(Some(name))
    }

    /// 最後に適用したマイグレーションを1つだけ取り消し
    pub async fn step_down(&self) -> Result<Option<String>, MigrationError> {
        let report = self.status().await?;
        let Some(name) = report.last_applied() else {
            return Ok(None);
        };
        let name = name.to_string();
        self.down(std::slice::from_ref(&name)).await?;
        Ok(Some(name))
    }
}

impl fmt::Debug for Migrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migrator")
            .field("ledger", &self.ledger)
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}
