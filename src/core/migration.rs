// マイグレーションドメインモデル
//
// 実行方向（Direction）と、カタログ・台帳の差分を表すStatusReportを提供します。
// マイグレーション名は単なる文字列で、辞書順がそのまま適用順になります。

use serde::{Deserialize, Serialize};
use std::fmt;

/// マイグレーションの実行方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// 適用
    Up,
    /// 取り消し
    Down,
}

impl Direction {
    /// ログシンクへ渡す1行を生成
    ///
    /// 形式: `[up] <name>` / `[down] <name>`
    pub fn log_line(&self, name: &str) -> String {
        format!("[{}] {}", self, name)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// マイグレーション状態レポート
///
/// カタログと台帳のスナップショットから毎回計算される一時的な値。
/// 永続化はされません。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    /// ソース上に存在するマイグレーション（辞書順）
    pub available: Vec<String>,
    /// 台帳に記録済みのマイグレーション（辞書順）
    pub applied: Vec<String>,
    /// available − applied（availableの順序を保持）
    pub not_applied: Vec<String>,
    /// applied − available（appliedの順序を保持）
    pub not_available: Vec<String>,
}

impl StatusReport {
    /// 未適用のマイグレーションがないかどうか
    pub fn is_up_to_date(&self) -> bool {
        self.not_applied.is_empty()
    }

    /// 指定したマイグレーションが適用済みかどうか
    pub fn is_applied(&self, name: &str) -> bool {
        self.applied.iter().any(|applied| applied == name)
    }

    /// 次に適用すべきマイグレーション
    pub fn next_pending(&self) -> Option<&str> {
        self.not_applied.first().map(String::as_str)
    }

    /// 最後に適用されたマイグレーション
    pub fn last_applied(&self) -> Option<&str> {
        self.applied.last().map(String::as_str)
    }
}
