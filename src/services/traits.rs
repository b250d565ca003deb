// サービストレイト定義
//
// マイグレーションユニットとその供給元（カタログ）を抽象化するトレイト群。
// ユニットは名前から解決されるだけで、中身の効果はExecutorからは不透明です。

use crate::core::error::{BoxError, MigrationError};
use crate::core::migration::Direction;
use async_trait::async_trait;
use sqlx::AnyConnection;
use std::sync::Arc;

/// マイグレーションユニット
///
/// 順方向（up）と逆方向（down）の2つの操作を持つ。
/// どちらもExecutorが開いたトランザクション上の接続を受け取る。
#[async_trait]
pub trait MigrationUnit: Send + Sync {
    /// スキーマを適用
    async fn up(&self, conn: &mut AnyConnection) -> Result<(), BoxError>;

    /// スキーマを元に戻す
    async fn down(&self, conn: &mut AnyConnection) -> Result<(), BoxError>;

    /// 方向に応じてupまたはdownを実行
    async fn run(&self, direction: Direction, conn: &mut AnyConnection) -> Result<(), BoxError> {
        match direction {
            Direction::Up => self.up(conn).await,
            Direction::Down => self.down(conn).await,
        }
    }
}

/// マイグレーションの供給元（カタログ）
///
/// `list` は呼び出しのたびに再計算され、キャッシュされない。
#[async_trait]
pub trait MigrationSource: Send + Sync {
    /// 利用可能なマイグレーション名を辞書順で返す
    async fn list(&self) -> Result<Vec<String>, MigrationError>;

    /// 名前をマイグレーションユニットに解決
    async fn load(&self, name: &str) -> Result<Arc<dyn MigrationUnit>, MigrationError>;
}
