use std::fmt;
use std::path::{Path, PathBuf};

pub const MEMORY_DB_URL: &str = "sqlite::memory:";

#[derive(Debug)]
pub enum ConfigError {
    InvalidDbUrl { raw: String },
    Io(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ConfigError::Io(err) => write!(f, "cannot prepare database file: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidDbUrl { .. } => None,
            ConfigError::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Turn a bare path or `sqlite:` URL into an absolute `sqlite://` URL.
///
/// # Errors
///
/// Returns `ConfigError::InvalidDbUrl` for a blank value.
pub fn normalize_sqlite_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidDbUrl { raw: raw.to_owned() });
    }
    if trimmed == MEMORY_DB_URL {
        return Ok(trimmed.to_owned());
    }

    let path_str = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    Ok(format!("sqlite://{}", absolute.display()))
}

/// Create the database file (and its parent dirs) so sqlx can open it.
///
/// # Errors
///
/// Returns `ConfigError` when the URL has no path or the file cannot be created.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), ConfigError> {
    if db_url == MEMORY_DB_URL {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ConfigError::InvalidDbUrl {
            raw: db_url.to_owned(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ConfigError::InvalidDbUrl {
            raw: db_url.to_owned(),
        });
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}
