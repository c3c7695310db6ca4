//! Runtime configuration read from the process environment.
//!
//! | Variable             | Meaning                          | Default               |
//! |----------------------|----------------------------------|-----------------------|
//! | `MINDNOTE_DB_PATH`   | SQLite database file             | in-memory store       |
//! | `MINDNOTE_LOG_LEVEL` | `trace|debug|info|warn|error`    | `default_log_level()` |
//! | `MINDNOTE_LOG_DIR`   | absolute directory for log files | logging disabled      |

use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "MINDNOTE_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "MINDNOTE_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "MINDNOTE_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// `None` selects an in-memory database.
    pub db_path: Option<PathBuf>,
    pub log_level: &'static str,
    /// `None` leaves file logging off.
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let log_level = match read(LOG_LEVEL_VAR) {
            Some(level) => normalize_level(&level)?,
            None => default_log_level(),
        };
        let log_dir = read(LOG_DIR_VAR)
            .map(|dir| normalize_log_dir(&dir))
            .transpose()?;
        let db_path = read(DB_PATH_VAR).map(|path| PathBuf::from(path.trim()));

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_VAR, LOG_DIR_VAR, LOG_LEVEL_VAR};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn config_from(pairs: &[(&str, &str)]) -> Result<CoreConfig, String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        CoreConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.db_path, None);
        assert_eq!(config.log_dir, None);
        assert_eq!(config.log_level, default_log_level());
    }

    #[test]
    fn values_are_normalized() {
        let config = config_from(&[
            (DB_PATH_VAR, " /var/lib/mindnote/notes.db "),
            (LOG_LEVEL_VAR, "WARNING"),
            (LOG_DIR_VAR, "/var/log/mindnote"),
        ])
        .unwrap();
        assert_eq!(
            config.db_path,
            Some(PathBuf::from("/var/lib/mindnote/notes.db"))
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/mindnote")));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(config_from(&[(LOG_LEVEL_VAR, "loud")]).is_err());
        assert!(config_from(&[(LOG_DIR_VAR, "relative/logs")]).is_err());
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = config_from(&[(DB_PATH_VAR, "  "), (LOG_LEVEL_VAR, "")]).unwrap();
        assert_eq!(config.db_path, None);
        assert_eq!(config.log_level, default_log_level());
    }
}
