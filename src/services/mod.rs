// Services Layer
// ドメインロジックを実行するサービス層

pub mod config_loader;
pub mod executor;
pub mod migrator;
pub mod reconciler;
pub mod traits;
