// Adapters
// データベースとファイルシステムへのアクセスを抽象化

pub mod catalog;
pub mod connection_string;
pub mod database;
pub mod ledger;
pub mod sql_unit;
