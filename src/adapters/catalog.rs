// マイグレーションカタログ
//
// 利用可能なマイグレーションの列挙と、名前からユニットへの解決を行います。
// - DirectoryCatalog: ディレクトリ上の `<name>/up.sql`, `<name>/down.sql`
// - RegistryCatalog: コードで登録したユニット

use crate::adapters::sql_unit::SqlMigrationUnit;
use crate::core::error::MigrationError;
use crate::services::traits::{MigrationSource, MigrationUnit};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// アップグレードSQLのファイル名
pub const UP_FILE: &str = "up.sql";

/// ダウングレードSQLのファイル名
pub const DOWN_FILE: &str = "down.sql";

/// ディレクトリベースのカタログ
///
/// `.` で始まらない全エントリをマイグレーション名として扱います。
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    dir: PathBuf,
}

impl DirectoryCatalog {
    /// 新しいDirectoryCatalogを作成
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// カタログのディレクトリ
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn source_read_error(&self, error: io::Error) -> MigrationError {
        MigrationError::SourceRead {
            path: self.dir.display().to_string(),
            reason: error.to_string(),
        }
    }

    fn read_script(&self, name: &str, unit_dir: &Path, file: &str) -> Result<String, MigrationError> {
        let path = unit_dir.join(file);
        if !path.is_file() {
            return Err(MigrationError::UnitLoad {
                name: name.to_string(),
                reason: format!("{} is missing", file),
            });
        }

        fs::read_to_string(&path).map_err(|e| MigrationError::UnitLoad {
            name: name.to_string(),
            reason: format!("Failed to read {:?}: {}", path, e),
        })
    }
}

#[async_trait]
impl MigrationSource for DirectoryCatalog {
    async fn list(&self) -> Result<Vec<String>, MigrationError> {
        if !self.dir.is_dir() {
            return Err(MigrationError::NotFound {
                path: self.dir.display().to_string(),
            });
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| self.source_read_error(e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| self.source_read_error(e))?;

            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                warn!(entry = ?entry.file_name(), "Skipping non UTF-8 migration entry");
                continue;
            };

            // .で始まるエントリはスキップ
            if name.starts_with('.') {
                continue;
            }

            names.push(name);
        }

        names.sort();
        debug!(dir = %self.dir.display(), count = names.len(), "Listed available migrations");

        Ok(names)
    }

    async fn load(&self, name: &str) -> Result<Arc<dyn MigrationUnit>, MigrationError> {
        if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
            return Err(MigrationError::UnitLoad {
                name: name.to_string(),
                reason: "Invalid migration name".to_string(),
            });
        }

        let unit_dir = self.dir.join(name);
        if !unit_dir.exists() {
            return Err(MigrationError::UnitLoad {
                name: name.to_string(),
                reason: format!("{:?} does not exist", unit_dir),
            });
        }
        if !unit_dir.is_dir() {
            return Err(MigrationError::UnitLoad {
                name: name.to_string(),
                reason: format!(
                    "{:?} is not a migration directory containing {} and {}",
                    unit_dir, UP_FILE, DOWN_FILE
                ),
            });
        }

        let up_sql = self.read_script(name, &unit_dir, UP_FILE)?;
        let down_sql = self.read_script(name, &unit_dir, DOWN_FILE)?;

        Ok(Arc::new(SqlMigrationUnit::new(name, up_sql, down_sql)))
    }
}

/// コードで登録したユニットを提供するカタログ
#[derive(Clone, Default)]
pub struct RegistryCatalog {
    units: BTreeMap<String, Arc<dyn MigrationUnit>>,
}

impl RegistryCatalog {
    /// 空のRegistryCatalogを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// ユニットを登録（同名のユニットは置き換える）
    pub fn register(&mut self, name: impl Into<String>, unit: impl MigrationUnit + 'static) {
        self.units.insert(name.into(), Arc::new(unit));
    }

    /// ユニットを登録してselfを返す
    pub fn with_unit(mut self, name: impl Into<String>, unit: impl MigrationUnit + 'static) -> Self {
        self.register(name, unit);
        self
    }
}

impl fmt::Debug for RegistryCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryCatalog")
            .field("units", &self.units.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[async_trait]
impl MigrationSource for RegistryCatalog {
    async fn list(&self) -> Result<Vec<String>, MigrationError> {
        Ok(self.units.keys().cloned().collect())
    }

    async fn load(&self, name: &str) -> Result<Arc<dyn MigrationUnit>, MigrationError> {
        self.units
            .get(name)
            .cloned()
            .ok_or_else(|| MigrationError::UnitLoad {
                name: name.to_string(),
                reason: "No migration registered under this name".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_unit(dir: &Path, name: &str, up: Option<&str>, down: Option<&str>) {
        let unit_dir = dir.join(name);
        fs::create_dir_all(&unit_dir).unwrap();
        if let Some(up) = up {
            fs::write(unit_dir.join(UP_FILE), up).unwrap();
        }
        if let Some(down) = down {
            fs::write(unit_dir.join(DOWN_FILE), down).unwrap();
        }
    }

    #[tokio::test]
    async fn test_list_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = DirectoryCatalog::new(temp_dir.path().join("missing"));

        let err = catalog.list().await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_sorted_and_skips_hidden() {
        let temp_dir = TempDir::new().unwrap();
        write_unit(temp_dir.path(), "001.js", Some(""), Some(""));
        write_unit(temp_dir.path(), "000.js", Some(""), Some(""));
        fs::write(temp_dir.path().join(".DS_Store"), "").unwrap();

        let catalog = DirectoryCatalog::new(temp_dir.path());
        let names = catalog.list().await.unwrap();

        assert_eq!(names, vec!["000.js".to_string(), "001.js".to_string()]);
    }

    #[tokio::test]
    async fn test_load_sql_unit() {
        let temp_dir = TempDir::new().unwrap();
        write_unit(
            temp_dir.path(),
            "000.js",
            Some("CREATE TABLE foo (bar TEXT);"),
            Some("DROP TABLE foo;"),
        );

        let catalog = DirectoryCatalog::new(temp_dir.path());
        assert!(catalog.load("000.js").await.is_ok());
    }

    #[tokio::test]
    async fn test_load_missing_down_script() {
        let temp_dir = TempDir::new().unwrap();
        write_unit(temp_dir.path(), "000.js", Some("CREATE TABLE foo (bar TEXT);"), None);

        let catalog = DirectoryCatalog::new(temp_dir.path());
        let err = catalog.load("000.js").await.err().unwrap();

        assert!(err.is_unit_load());
        assert!(err.to_string().contains("down.sql"));
    }

    #[tokio::test]
    async fn test_load_plain_file_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("000.sql"), "CREATE TABLE foo (bar TEXT);").unwrap();

        let catalog = DirectoryCatalog::new(temp_dir.path());
        let err = catalog.load("000.sql").await.err().unwrap();

        assert!(err.is_unit_load());
    }

    #[tokio::test]
    async fn test_load_rejects_path_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let catalog = DirectoryCatalog::new(temp_dir.path());

        assert!(catalog.load("../etc").await.err().unwrap().is_unit_load());
        assert!(catalog.load("..").await.err().unwrap().is_unit_load());
    }

    #[test]
    fn test_source_read_error_is_not_storage() {
        let catalog = DirectoryCatalog::new("/srv/migrations");
        let error = catalog.source_read_error(io::Error::from(io::ErrorKind::PermissionDenied));

        assert!(error.is_source_read());
        assert!(!error.is_storage());
        assert!(error.to_string().contains("/srv/migrations"));
    }

    #[tokio::test]
    async fn test_registry_catalog() {
        let catalog = RegistryCatalog::new()
            .with_unit("001", SqlMigrationUnit::new("001", "", ""))
            .with_unit("000", SqlMigrationUnit::new("000", "", ""));

        assert_eq!(
            catalog.list().await.unwrap(),
            vec!["000".to_string(), "001".to_string()]
        );
        assert!(catalog.load("000").await.is_ok());
        assert!(catalog.load("002").await.err().unwrap().is_unit_load());
    }
}
