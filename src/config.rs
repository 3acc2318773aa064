//! Runtime settings read from the environment.
//!
//! | Variable                      | Default          |
//! |-------------------------------|------------------|
//! | `CARDIOLENS_MODEL_PATH`       | `models`         |
//! | `CARDIOLENS_REQUIRE_MANIFEST` | `false`          |
//! | `CARDIOLENS_LOG_MODE`         | `auto`           |
//! | `CARDIOLENS_LOG_FILE`         | `cardiolens.log` |

use std::path::PathBuf;

use crate::CardiolensError;

pub const MODEL_PATH_ENV: &str = "CARDIOLENS_MODEL_PATH";
pub const REQUIRE_MANIFEST_ENV: &str = "CARDIOLENS_REQUIRE_MANIFEST";
pub const LOG_MODE_ENV: &str = "CARDIOLENS_LOG_MODE";
pub const LOG_FILE_ENV: &str = "CARDIOLENS_LOG_FILE";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal (the TUI owns it), stdout otherwise
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Result<Self, CardiolensError> {
        match value {
            "auto" => Ok(Self::Auto),
            "file" => Ok(Self::File),
            "stdout" => Ok(Self::Stdout),
            other => Err(CardiolensError::Config(format!(
                "{LOG_MODE_ENV} must be one of auto, file, stdout (got {other:?})"
            ))),
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::Auto => interactive,
            Self::File => true,
            Self::Stdout => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub model_path: PathBuf,
    pub require_manifest: bool,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models"),
            require_manifest: false,
            log_mode: LogMode::Auto,
            log_file: PathBuf::from("cardiolens.log"),
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Errors
    /// Returns `CardiolensError::Config` on an unrecognised log mode.
    pub fn from_env() -> Result<Self, CardiolensError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup (the environment in
    /// production, a map in tests).
    ///
    /// # Errors
    /// Returns `CardiolensError::Config` on an unrecognised log mode.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CardiolensError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_mode = match lookup(LOG_MODE_ENV) {
            Some(v) => LogMode::parse(v.trim())?,
            None => defaults.log_mode,
        };

        Ok(Self {
            model_path: lookup(MODEL_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            require_manifest: lookup(REQUIRE_MANIFEST_ENV)
                .map(|v| parse_bool(&v))
                .unwrap_or(defaults.require_manifest),
            log_mode,
            log_file: lookup(LOG_FILE_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
        })
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "yes" | "YES")
}
