// テスト共通ヘルパー
//
// テスト全体で共有されるユーティリティ関数を集約する。
// テストファイルから `mod common;` で利用可能。

use anyhow::Result;
use async_trait::async_trait;
use sediment::core::config::{Config, DatabaseConfig, Dialect};
use sediment::core::error::BoxError;
use sediment::services::config_loader::ConfigLoader;
use sediment::services::traits::MigrationUnit;
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::{AnyConnection, AnyPool};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// インメモリSQLiteの接続プールを作成
///
/// 接続が1本だけなので、プール全体で同じデータベースを共有する。
#[allow(dead_code)]
pub async fn memory_pool() -> AnyPool {
    install_default_drivers();
    AnyPoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite")
}

/// マイグレーションディレクトリにユニットを作成
#[allow(dead_code)]
pub fn write_unit(dir: &Path, name: &str, up_sql: &str, down_sql: &str) {
    let unit_dir = dir.join(name);
    fs::create_dir_all(&unit_dir).unwrap();
    fs::write(unit_dir.join("up.sql"), up_sql).unwrap();
    fs::write(unit_dir.join("down.sql"), down_sql).unwrap();
}

/// テーブルを作成/削除するだけのユニット
#[allow(dead_code)]
pub fn write_table_unit(dir: &Path, name: &str, table: &str) {
    write_unit(
        dir,
        name,
        &format!("CREATE TABLE {} (id INTEGER PRIMARY KEY);", table),
        &format!("DROP TABLE {};", table),
    );
}

/// テーブルの存在確認
#[allow(dead_code)]
pub async fn table_exists(pool: &AnyPool, table: &str) -> bool {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
    )
    .bind(table)
    .fetch_one(pool)
    .await
    .unwrap();
    count > 0
}

/// ログ行を収集するシンク
#[allow(dead_code)]
pub fn collecting_logger() -> (
    Arc<Mutex<Vec<String>>>,
    impl Fn(&str) + Send + Sync + 'static,
) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = lines.clone();
    (lines, move |line: &str| {
        sink.lock().unwrap().push(line.to_string())
    })
}

/// 文字列スライスをVec<String>に変換
#[allow(dead_code)]
pub fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// 呼び出しを記録するだけのユニット
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct RecordingUnit {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub label: String,
}

#[allow(dead_code)]
impl RecordingUnit {
    pub fn new(label: &str, calls: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            calls,
            label: label.to_string(),
        }
    }
}

#[async_trait]
impl MigrationUnit for RecordingUnit {
    async fn up(&self, _conn: &mut AnyConnection) -> Result<(), BoxError> {
        self.calls.lock().unwrap().push(format!("up:{}", self.label));
        Ok(())
    }

    async fn down(&self, _conn: &mut AnyConnection) -> Result<(), BoxError> {
        self.calls.lock().unwrap().push(format!("down:{}", self.label));
        Ok(())
    }
}

/// 常に失敗するユニット
#[allow(dead_code)]
pub struct FailingUnit;

#[async_trait]
impl MigrationUnit for FailingUnit {
    async fn up(&self, _conn: &mut AnyConnection) -> Result<(), BoxError> {
        Err("boom".into())
    }

    async fn down(&self, _conn: &mut AnyConnection) -> Result<(), BoxError> {
        Err("boom".into())
    }
}

/// テスト用のConfig作成ヘルパー
#[allow(dead_code)]
pub fn create_test_config(database_path: &str) -> Config {
    let mut environments = HashMap::new();
    environments.insert(
        "development".to_string(),
        DatabaseConfig {
            host: String::new(),
            port: None,
            database: database_path.to_string(),
            user: None,
            password: None,
            timeout: None,
        },
    );

    Config {
        version: "1.0".to_string(),
        dialect: Dialect::SQLite,
        migrations_dir: PathBuf::from("migrations"),
        table_name: "migration".to_string(),
        environments,
    }
}

/// テスト用のプロジェクトディレクトリを作成（SQLiteファイルDB）
#[allow(dead_code)]
pub fn setup_test_project() -> Result<(TempDir, PathBuf)> {
    let temp_dir = TempDir::new()?;
    let project_path = temp_dir.path().to_path_buf();

    let database = project_path.join("test.db");
    let config = create_test_config(&database.display().to_string());
    fs::write(
        project_path.join(Config::DEFAULT_CONFIG_PATH),
        ConfigLoader::to_yaml(&config)?,
    )?;
    fs::create_dir_all(project_path.join("migrations"))?;

    Ok((temp_dir, project_path))
}
