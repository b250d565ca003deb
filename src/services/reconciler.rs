// 照合サービス
//
// カタログと台帳のスナップショットから状態レポートを計算する純粋関数。
// I/Oを持たず、同じ入力に対して常に同じ出力を返します。

use crate::core::migration::StatusReport;
use std::collections::HashSet;

/// 状態レポートを計算
///
/// - `not_applied` = available − applied（availableの順序を保持）
/// - `not_available` = applied − available（appliedの順序を保持）
///
/// # Arguments
///
/// * `available` - カタログのスナップショット
/// * `applied` - 台帳のスナップショット
pub fn status(available: &[String], applied: &[String]) -> StatusReport {
    let applied_set: HashSet<&str> = applied.iter().map(String::as_str).collect();
    let available_set: HashSet<&str> = available.iter().map(String::as_str).collect();

    let not_applied = available
        .iter()
        .filter(|name| !applied_set.contains(name.as_str()))
        .cloned()
        .collect();
    let not_available = applied
        .iter()
        .filter(|name| !available_set.contains(name.as_str()))
        .cloned()
        .collect();

    StatusReport {
        available: available.to_vec(),
        applied: applied.to_vec(),
        not_applied,
        not_available,
    }
}
