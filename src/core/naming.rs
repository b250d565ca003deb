// 命名ポリシー
//
// アプリケーション名と関連パス、台帳テーブル名の単一ソースを提供します。

use crate::core::error::MigrationError;
use regex::Regex;
use std::sync::LazyLock;

/// 現行アプリケーション名
pub const APP_NAME: &str = "sediment";

/// 既定の設定ファイル名
pub const CONFIG_FILE: &str = ".sediment.yaml";

/// 既定のマイグレーションディレクトリ
pub const MIGRATIONS_DIR: &str = "migrations";

/// 既定の台帳テーブル名
pub const DEFAULT_TABLE_NAME: &str = "migration";

/// 環境変数のプレフィックス
pub const ENV_PREFIX: &str = "SEDIMENT";

static IDENTIFIER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex must compile")
});

/// 台帳テーブル名を検証
///
/// テーブル名はSQLへ直接埋め込まれるため、識別子として安全な文字列のみ許可します。
pub fn validate_table_name(name: &str) -> Result<(), MigrationError> {
    if name.is_empty() {
        return Err(MigrationError::InvalidTableName {
            name: name.to_string(),
            reason: "Table name must not be empty".to_string(),
        });
    }

    if name.len() > 63 {
        return Err(MigrationError::InvalidTableName {
            name: name.to_string(),
            reason: "Table name must be at most 63 characters".to_string(),
        });
    }

    if !IDENTIFIER_REGEX.is_match(name) {
        return Err(MigrationError::InvalidTableName {
            name: name.to_string(),
            reason: "Table name must start with a letter or underscore and contain only letters, digits and underscores".to_string(),
        });
    }

    Ok(())
}
