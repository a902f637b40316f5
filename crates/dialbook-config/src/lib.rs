use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use dialbook_core::domain::{normalize_db_name, DuplicatePolicy};
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "dialbook";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_DB_NAME: &str = "contact_database";
pub const DEFAULT_IMPORT_FILE: &str = "contact_list.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub import: ImportConfig,
}

/// Connection settings. `path` wins over `name` when both are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub name: String,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    pub default_file: PathBuf,
    pub on_duplicate: DuplicatePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                name: DEFAULT_DB_NAME.to_string(),
                path: None,
            },
            import: ImportConfig {
                default_file: PathBuf::from(DEFAULT_IMPORT_FILE),
                on_duplicate: DuplicatePolicy::Skip,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid database.name value: {0:?}")]
    InvalidDatabaseName(String),
    #[error("invalid {field} value: must not be empty")]
    EmptyPath { field: &'static str },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    database: Option<DatabaseFile>,
    import: Option<ImportFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DatabaseFile {
    name: Option<String>,
    path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ImportFile {
    default_file: Option<PathBuf>,
    on_duplicate: Option<DuplicatePolicy>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(database) = parsed.database {
        if let Some(name) = database.name {
            let Some(valid) = normalize_db_name(&name) else {
                return Err(ConfigError::InvalidDatabaseName(name));
            };
            config.database.name = valid.to_string();
        }
        if let Some(path) = database.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::EmptyPath {
                    field: "database.path",
                });
            }
            config.database.path = Some(path);
        }
    }

    if let Some(import) = parsed.import {
        if let Some(default_file) = import.default_file {
            if default_file.as_os_str().is_empty() {
                return Err(ConfigError::EmptyPath {
                    field: "import.default_file",
                });
            }
            config.import.default_file = default_file;
        }
        if let Some(policy) = import.on_duplicate {
            config.import.on_duplicate = policy;
        }
    }

    Ok(config)
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        load_at_path, merge_config, AppConfig, ConfigError, ConfigFile, DatabaseFile, ImportFile,
    };
    use dialbook_core::domain::DuplicatePolicy;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn restrict_permissions(path: &Path) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path).expect("metadata").permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).expect("chmod");
        }
    }

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            database: Some(DatabaseFile {
                name: Some(" crm ".to_string()),
                path: None,
            }),
            import: Some(ImportFile {
                default_file: Some(PathBuf::from("people.json")),
                on_duplicate: Some(DuplicatePolicy::Update),
            }),
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.database.name, "crm");
        assert_eq!(merged.import.default_file, PathBuf::from("people.json"));
        assert_eq!(merged.import.on_duplicate, DuplicatePolicy::Update);
    }

    #[test]
    fn merge_config_rejects_database_name_with_separator() {
        let parsed = ConfigFile {
            database: Some(DatabaseFile {
                name: Some("../elsewhere".to_string()),
                path: None,
            }),
            import: None,
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDatabaseName(_)));
    }

    #[test]
    fn merge_config_rejects_names_the_data_dir_cannot_hold() {
        for name in ["my db", ".hidden"] {
            let parsed = ConfigFile {
                database: Some(DatabaseFile {
                    name: Some(name.to_string()),
                    path: None,
                }),
                import: None,
            };
            let err = merge_config(parsed).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidDatabaseName(_)), "{name}");
        }
    }

    #[test]
    fn empty_file_yields_defaults() {
        let parsed = ConfigFile {
            database: None,
            import: None,
        };
        assert_eq!(merge_config(parsed).expect("merge"), AppConfig::default());
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("config file not found"));
        assert!(load_at_path(&missing, false).expect("optional").is_none());
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[database]\npath = \"/tmp/contacts.sqlite3\"\n[import]\non_duplicate = \"update\"\n",
        )
        .expect("write config");
        restrict_permissions(&path);

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(
            config.database.path,
            Some(PathBuf::from("/tmp/contacts.sqlite3"))
        );
        assert_eq!(config.database.name, "contact_database");
        assert_eq!(config.import.on_duplicate, DuplicatePolicy::Update);
    }

    #[test]
    fn load_at_path_rejects_unknown_keys() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[database]\nhost = \"localhost\"\n").expect("write config");
        restrict_permissions(&path);

        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn load_at_path_rejects_world_readable_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "").expect("write config");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("chmod");

        let err = load_at_path(&path, true).unwrap_err();
        assert!(matches!(err, ConfigError::InsecurePermissions(_)));
    }
}
