use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::AgendaConfig;

pub const CONFIG_FILE: &str = "agenda.toml";

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "AGENDA_DATA_DIR";

const CONFIG_TEMPLATE: &str = r##"# agenda configuration. Every key is optional; defaults shown.

[calendar]
file = "calendar_data.json"
# Used when a spoken command has no "with ..." / "about ..." part
default_title = "Voice Scheduled Meeting"
default_description = "Auto-created from voice input"
# Window for `agenda calendar next`
reminder_minutes = 10

[tasks]
file = "focusflow_tasks.json"

[inbox]
file = "email_inbox.json"
read_limit = 5
"##;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("{path} already exists (use --force to overwrite)")]
    AlreadyExists { path: PathBuf },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Resolve the data directory: explicit override, then `AGENDA_DATA_DIR`,
/// then `$XDG_DATA_HOME/agenda`, then `$HOME/.local/share/agenda`.
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Ok(dir) = std::env::var(DATA_DIR_ENV)
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }
    let data_home = std::env::var("XDG_DATA_HOME")
        .ok()
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".local").join("share"));
    data_home.join("agenda")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Read `agenda.toml` from the data directory. A missing file means defaults;
/// a malformed one is an error.
pub fn read_config(data_dir: &Path) -> Result<AgendaConfig, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("no {}, using defaults", path.display());
            return Ok(AgendaConfig::default());
        }
        Err(e) => return Err(ConfigError::ReadError { path, source: e }),
    };
    toml::from_str(&text).map_err(|e| ConfigError::ParseError { path, source: e })
}

/// Create the data directory and write a commented default `agenda.toml`.
pub fn write_default_config(data_dir: &Path, force: bool) -> Result<PathBuf, ConfigError> {
    let path = data_dir.join(CONFIG_FILE);
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists { path });
    }
    fs::create_dir_all(data_dir)
        .and_then(|()| fs::write(&path, CONFIG_TEMPLATE))
        .map_err(|e| ConfigError::WriteError {
            path: path.clone(),
            source: e,
        })?;
    Ok(path)
}
