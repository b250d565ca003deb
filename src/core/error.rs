// エラー型定義
//
// マイグレーション実行全体で使用されるエラー型を提供します。
// thiserrorを使用して、Storage / NotFound / SourceRead / UnitLoad / Conflict / Effect を定義します。

use crate::core::migration::Direction;
use thiserror::Error;

/// マイグレーションユニットが返す不透明なエラー
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// マイグレーションエラー
///
/// 台帳・カタログ・ユニット実行の各段階で発生するエラーを表現します。
/// Executorはこれらから回復せず、そのまま呼び出し元へ返します。
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Storage error (ledger unreachable or misconfigured)
    #[error("Storage error: {message}")]
    Storage {
        /// エラーメッセージ
        message: String,
        /// 失敗したSQL
        sql: Option<String>,
    },

    /// Source location not found
    #[error("Migration directory not found: {path}")]
    NotFound {
        /// ディレクトリパス
        path: String,
    },

    /// Source location exists but cannot be enumerated
    #[error("Failed to read migration directory {path}: {reason}")]
    SourceRead {
        /// ディレクトリパス
        path: String,
        /// 失敗理由
        reason: String,
    },

    /// Unit load error
    #[error("Failed to load migration '{name}': {reason}")]
    UnitLoad {
        /// マイグレーション名
        name: String,
        /// 失敗理由
        reason: String,
    },

    /// Ledger uniqueness violation
    #[error("Migration '{name}' is already recorded as applied")]
    Conflict {
        /// マイグレーション名
        name: String,
    },

    /// The unit's own up/down failed
    #[error("Migration '{name}' failed during {direction}: {source}")]
    Effect {
        /// マイグレーション名
        name: String,
        /// 実行方向
        direction: Direction,
        /// ユニットが返したエラー（そのまま保持）
        #[source]
        source: BoxError,
    },

    /// Invalid ledger table name
    #[error("Invalid table name '{name}': {reason}")]
    InvalidTableName {
        /// テーブル名
        name: String,
        /// 不正な理由
        reason: String,
    },
}

impl MigrationError {
    /// SQL付きのストレージエラーを作成
    pub fn storage(message: impl Into<String>, sql: Option<&str>) -> Self {
        MigrationError::Storage {
            message: message.into(),
            sql: sql.map(str::to_string),
        }
    }

    /// ストレージエラーかどうか
    pub fn is_storage(&self) -> bool {
        matches!(self, MigrationError::Storage { .. })
    }

    /// ディレクトリ不在エラーかどうか
    pub fn is_not_found(&self) -> bool {
        matches!(self, MigrationError::NotFound { .. })
    }

    /// ディレクトリ読み込みエラーかどうか
    pub fn is_source_read(&self) -> bool {
        matches!(self, MigrationError::SourceRead { .. })
    }

    /// ユニット読み込みエラーかどうか
    pub fn is_unit_load(&self) -> bool {
        matches!(self, MigrationError::UnitLoad { .. })
    }

    /// 台帳の一意制約違反かどうか
    pub fn is_conflict(&self) -> bool {
        matches!(self, MigrationError::Conflict { .. })
    }

    /// ユニット実行エラーかどうか
    pub fn is_effect(&self) -> bool {
        matches!(self, MigrationError::Effect { .. })
    }

    /// テーブル名不正エラーかどうか
    pub fn is_invalid_table_name(&self) -> bool {
        matches!(self, MigrationError::InvalidTableName { .. })
    }

    /// 失敗したSQLを取得
    pub fn sql(&self) -> Option<&str> {
        match self {
            MigrationError::Storage { sql, .. } => sql.as_deref(),
            _ => None,
        }
    }
}
