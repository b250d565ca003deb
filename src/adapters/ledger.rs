// マイグレーション台帳
//
// 適用済みマイグレーション名を記録するテーブルの管理を担当します。
// 記録・削除はExecutorが開いたトランザクション上で行い、台帳自身はトランザクションを開きません。

use crate::core::config::Dialect;
use crate::core::error::MigrationError;
use crate::core::naming::{self, DEFAULT_TABLE_NAME};
use sqlx::{AnyConnection, AnyPool, Row};
use tracing::debug;

/// マイグレーション台帳
///
/// 1カラム（name）のみを主キーに持つテーブルを操作します。
#[derive(Debug, Clone)]
pub struct Ledger {
    table_name: String,
    dialect: Dialect,
}

impl Ledger {
    /// テーブル名を指定して台帳を作成
    ///
    /// # Arguments
    ///
    /// * `table_name` - 台帳テーブル名（識別子として検証される）
    /// * `dialect` - データベース方言
    pub fn new(table_name: impl Into<String>, dialect: Dialect) -> Result<Self, MigrationError> {
        let table_name = table_name.into();
        naming::validate_table_name(&table_name)?;
        Ok(Self {
            table_name,
            dialect,
        })
    }

    /// 既定のテーブル名（migration）で台帳を作成
    pub fn with_default_table(dialect: Dialect) -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            dialect,
        }
    }

    /// 台帳テーブル名
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// 台帳テーブル作成SQLを生成
    pub fn generate_create_table_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {} (\n    name VARCHAR(255) NOT NULL,\n    PRIMARY KEY (name)\n)",
            self.table_name
        )
    }

    /// 適用済み一覧取得のSELECT SQLを生成
    pub fn generate_list_applied_sql(&self) -> String {
        format!("SELECT name FROM {} ORDER BY name ASC", self.table_name)
    }

    /// 適用記録のINSERT SQLを生成
    pub fn generate_record_applied_sql(&self) -> String {
        format!(
            "INSERT INTO {} (name) VALUES ({})",
            self.table_name,
            self.dialect.placeholder(1)
        )
    }

    /// 取り消し記録のDELETE SQLを生成
    pub fn generate_record_reverted_sql(&self) -> String {
        format!(
            "DELETE FROM {} WHERE name = {}",
            self.table_name,
            self.dialect.placeholder(1)
        )
    }

    /// 台帳テーブルを作成（既に存在する場合は何もしない）
    pub async fn ensure_schema(&self, pool: &AnyPool) -> Result<(), MigrationError> {
        let sql = self.generate_create_table_sql();

        sqlx::query(&sql).execute(pool).await.map_err(|e| {
            MigrationError::storage(
                format!("Failed to create migration ledger table: {}", e),
                Some(&sql),
            )
        })?;

        Ok(())
    }

    /// 適用済みマイグレーション名を辞書順で取得
    pub async fn list_applied(&self, pool: &AnyPool) -> Result<Vec<String>, MigrationError> {
        let sql = self.generate_list_applied_sql();

        let rows = sqlx::query(&sql).fetch_all(pool).await.map_err(|e| {
            MigrationError::storage(
                format!("Failed to read migration ledger: {}", e),
                Some(&sql),
            )
        })?;

        let mut names = rows
            .iter()
            .map(|row| row.try_get::<String, _>(0))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                MigrationError::storage(
                    format!("Failed to decode migration ledger row: {}", e),
                    Some(&sql),
                )
            })?;

        // 照合順序に依存せずバイト順に揃える
        names.sort();
        debug!(table = %self.table_name, count = names.len(), "Loaded ledger snapshot");

        Ok(names)
    }

    /// 適用済みとして記録
    ///
    /// 既に記録済みの場合は一意制約違反となり `Conflict` を返す。
    pub async fn record_applied(
        &self,
        conn: &mut AnyConnection,
        name: &str,
    ) -> Result<(), MigrationError> {
        let sql = self.generate_record_applied_sql();

        sqlx::query(&sql)
            .bind(name)
            .execute(conn)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    MigrationError::Conflict {
                        name: name.to_string(),
                    }
                }
                _ => MigrationError::storage(
                    format!("Failed to record migration '{}': {}", name, e),
                    Some(&sql),
                ),
            })?;

        Ok(())
    }

    /// 取り消し済みとして記録を削除（存在しなくてもエラーにしない）
    pub async fn record_reverted(
        &self,
        conn: &mut AnyConnection,
        name: &str,
    ) -> Result<(), MigrationError> {
        let sql = self.generate_record_reverted_sql();

        sqlx::query(&sql)
            .bind(name)
            .execute(conn)
            .await
            .map_err(|e| {
                MigrationError::storage(
                    format!("Failed to remove migration record '{}': {}", name, e),
                    Some(&sql),
                )
            })?;

        Ok(())
    }
}
