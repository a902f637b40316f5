use crate::error::{Result, StoreError};
use dialbook_core::domain::normalize_db_name;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "dialbook";
const DB_EXTENSION: &str = "sqlite3";

pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os("XDG_DATA_HOME") {
        let path = PathBuf::from(dir);
        if path.as_os_str().is_empty() {
            return Err(StoreError::InvalidDataPath(path));
        }
        return Ok(path.join(APP_DIR));
    }

    let home = dirs::home_dir().ok_or(StoreError::MissingHomeDir)?;
    Ok(home.join(".local").join("share").join(APP_DIR))
}

pub fn ensure_data_dir() -> Result<PathBuf> {
    let dir = data_dir()?;
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    restrict_dir_permissions(&dir)?;
    Ok(dir)
}

/// Database file for the named database inside the data directory.
pub fn db_path(name: &str) -> Result<PathBuf> {
    let name = validate_db_name(name)?;
    Ok(db_path_in(&ensure_data_dir()?, name))
}

pub fn db_path_in(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.{DB_EXTENSION}"))
}

/// Picks the database file: an explicit path wins, otherwise the named
/// database in the data directory. Parent directories are created on demand.
pub fn resolve_db_path(custom: Option<PathBuf>, name: &str) -> Result<PathBuf> {
    let Some(path) = custom else {
        return db_path(name);
    };
    if path.as_os_str().is_empty() {
        return Err(StoreError::InvalidDataPath(path));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
            restrict_dir_permissions(parent)?;
        }
    }
    Ok(path)
}

fn validate_db_name(name: &str) -> Result<&str> {
    normalize_db_name(name).ok_or_else(|| StoreError::InvalidDataPath(PathBuf::from(name)))
}

#[cfg(unix)]
fn restrict_dir_permissions(dir: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let perms = fs::Permissions::from_mode(0o700);
    fs::set_permissions(dir, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_dir_permissions(_dir: &Path) -> Result<()> {
    Ok(())
}
