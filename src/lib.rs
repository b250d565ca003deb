// Sedimentライブラリのエントリーポイント
//
// モジュール構造:
// - cli: CLIレイヤー（ユーザー入力の受付とコマンドルーティング）
// - core: コアドメイン（設定、マイグレーション状態、エラー）
// - adapters: データベース台帳とマイグレーションカタログへのアクセス
// - services: 照合と実行のオーケストレーション

pub mod adapters;
pub mod cli;
pub mod core;
pub mod services;
