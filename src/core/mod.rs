// Core Domain
// 実行方向・状態レポート・設定・エラーといった、I/Oを持たないドメイン定義

pub mod config;
pub mod error;
pub mod migration;
pub mod naming;
