// マイグレーション実行サービス
//
// 指定された名前の列を順番に、1ユニット1トランザクションで適用/取り消しします。
// ユニットの効果と台帳の更新は同じトランザクションでコミットされ、
// 失敗した時点でロールバックして処理を中断します。

use crate::adapters::ledger::Ledger;
use crate::core::error::MigrationError;
use crate::core::migration::Direction;
use crate::services::traits::{MigrationSource, MigrationUnit};
use sqlx::{Any, AnyPool, Transaction};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// ユニットごとに呼ばれるログシンク
///
/// `[up] <name>` / `[down] <name>` 形式の1行を受け取る。
pub type LogSink = Arc<dyn Fn(&str) + Send + Sync>;

/// 何もしないログシンク
pub fn noop_logger() -> LogSink {
    Arc::new(|_line: &str| {})
}

/// マイグレーション実行サービス
#[derive(Clone)]
pub struct Executor {
    pool: AnyPool,
    catalog: Arc<dyn MigrationSource>,
    ledger: Ledger,
    logger: LogSink,
}

impl Executor {
    /// 新しいExecutorを作成（ログシンクは何もしない）
    pub fn new(pool: AnyPool, catalog: Arc<dyn MigrationSource>, ledger: Ledger) -> Self {
        Self {
            pool,
            catalog,
            ledger,
            logger: noop_logger(),
        }
    }

    /// ログシンクを設定
    pub fn with_logger(mut self, logger: LogSink) -> Self {
        self.logger = logger;
        self
    }

    /// 台帳
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// 指定された順序でマイグレーションを適用/取り消し
    ///
    /// 各ユニットは独立したトランザクションで実行される。
    /// 途中で失敗した場合、それ以前のユニットはコミット済みのまま残り、
    /// 以降のユニットには触れずにエラーを返す。
    ///
    /// # Returns
    ///
    /// この呼び出しでコミットされたマイグレーション名
    pub async fn apply(
        &self,
        names: &[String],
        direction: Direction,
    ) -> Result<Vec<String>, MigrationError> {
        let mut committed = Vec::with_capacity(names.len());

        for name in names {
            (self.logger)(&direction.log_line(name));
            info!(direction = %direction, name = %name, "Running migration");

            let unit = self.catalog.load(name).await?;
            self.run_in_transaction(name, unit.as_ref(), direction).await?;

            committed.push(name.clone());
        }

        debug!(direction = %direction, count = committed.len(), "Migrations committed");
        Ok(committed)
    }

    /// 1ユニットを1トランザクションで実行
    ///
    /// トランザクションはスコープを抜けると必ずコミットかロールバックされる。
    async fn run_in_transaction(
        &self,
        name: &str,
        unit: &dyn MigrationUnit,
        direction: Direction,
    ) -> Result<(), MigrationError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            MigrationError::storage(format!("Failed to start transaction: {}", e), None)
        })?;

        match self.run_unit(&mut tx, name, unit, direction).await {
            Ok(()) => {
                tx.commit().await.map_err(|e| {
                    MigrationError::storage(
                        format!("Failed to commit migration '{}': {}", name, e),
                        None,
                    )
                })?;
                info!(direction = %direction, name = %name, "Migration committed");
                Ok(())
            }
            Err(error) => {
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(
                        name = %name,
                        error = %rollback_error,
                        "Failed to roll back migration transaction"
                    );
                }
                Err(error)
            }
        }
    }

    /// ユニットの効果と台帳更新を同じトランザクション上で実行
    async fn run_unit(
        &self,
        tx: &mut Transaction<'static, Any>,
        name: &str,
        unit: &dyn MigrationUnit,
        direction: Direction,
    ) -> Result<(), MigrationError> {
        unit.run(direction, &mut **tx)
            .await
            .map_err(|source| MigrationError::Effect {
                name: name.to_string(),
                direction,
                source,
            })?;

        match direction {
            Direction::Up => self.ledger.record_applied(&mut **tx, name).await,
            Direction::Down => self.ledger.record_reverted(&mut **tx, name).await,
        }
    }
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("ledger", &self.ledger)
            .finish_non_exhaustive()
    }
}
