// 設定ファイル読み込みサービス
//
// core::config の純粋性を保つため、ファイルI/Oと環境変数による上書きはこのサービスに集約する。

use crate::core::config::{Config, DatabaseConfig};
use crate::core::naming::ENV_PREFIX;
use anyhow::{Context, Result};
use std::path::Path;

/// 設定ファイル読み込みサービス
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    /// YAMLファイルから設定を読み込み、検証する
    pub fn from_file(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = content.parse()?;
        config.validate()?;
        Ok(config)
    }

    /// 設定をYAML文字列に変換
    pub fn to_yaml(config: &Config) -> Result<String> {
        serde_saphyr::to_string(config).with_context(|| "Failed to serialize config")
    }

    /// 接続文字列の上書き（`SEDIMENT_DATABASE_URL`）
    pub fn database_url_override() -> Option<String> {
        std::env::var(format!("{}_DATABASE_URL", ENV_PREFIX))
            .ok()
            .filter(|url| !url.is_empty())
    }

    /// 環境変数による上書きを適用
    ///
    /// `SEDIMENT_DB_HOST`, `SEDIMENT_DB_PORT`, `SEDIMENT_DB_NAME`,
    /// `SEDIMENT_DB_USER`, `SEDIMENT_DB_PASSWORD` を参照する。
    pub fn apply_env_overrides(base: &DatabaseConfig) -> DatabaseConfig {
        Self::apply_overrides(base, |key| std::env::var(format!("{}_DB_{}", ENV_PREFIX, key)).ok())
    }

    /// 任意の取得関数で上書きを適用
    pub fn apply_overrides(
        base: &DatabaseConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> DatabaseConfig {
        let mut config = base.clone();

        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.parse::<u16>().ok()) {
            config.port = Some(port);
        }
        if let Some(database) = lookup("NAME") {
            config.database = database;
        }
        if let Some(user) = lookup("USER") {
            config.user = Some(user);
        }
        if let Some(password) = lookup("PASSWORD") {
            config.password = Some(password);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn base_config() -> DatabaseConfig {
        DatabaseConfig {
            host: "localhost".to_string(),
            port: None,
            database: "app_db".to_string(),
            user: Some("postgres".to_string()),
            password: None,
            timeout: None,
        }
    }

    #[test]
    fn test_apply_overrides() {
        let vars: HashMap<&str, &str> = [("HOST", "db.internal"), ("PORT", "6543"), ("PASSWORD", "secret")]
            .into_iter()
            .collect();

        let config = ConfigLoader::apply_overrides(&base_config(), |key| {
            vars.get(key).map(|v| v.to_string())
        });

        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, Some(6543));
        assert_eq!(config.database, "app_db");
        assert_eq!(config.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_invalid_port_override_is_ignored() {
        let config = ConfigLoader::apply_overrides(&base_config(), |key| {
            (key == "PORT").then(|| "not-a-port".to_string())
        });

        assert_eq!(config.port, None);
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".sediment.yaml");
        std::fs::write(
            &path,
            "version: \"1.0\"\ndialect: sqlite\ntable_name: z_migration\nenvironments:\n  development:\n    database: app.db\n",
        )
        .unwrap();

        let config = ConfigLoader::from_file(&path).unwrap();
        assert_eq!(config.table_name, "z_migration");
        assert!(config.environments.contains_key("development"));
    }

    #[test]
    fn test_from_file_missing() {
        let temp_dir = TempDir::new().unwrap();
        assert!(ConfigLoader::from_file(&temp_dir.path().join("missing.yaml")).is_err());
    }
}
