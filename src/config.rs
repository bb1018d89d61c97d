use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils::{self, Profile};

pub const DATABASE_FILE_NAME: &str = "todos.db";
pub const LOG_FILE_NAME: &str = "todo.log";

/// Runtime settings resolved from the profile and command-line overrides.
/// Nothing is read from disk or the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub profile: Profile,
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    pub log_path: PathBuf,
    pub log_level: String,
    pub theme: Theme,
}

/// Colour strings understood by `parse_color`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub fg: String,
    pub highlight: String,
    pub subtle: String,
    pub badge_fg: String,
    pub badge_bg: String,
    pub error: String,
    pub pending: String,
    pub in_progress: String,
    pub done: String,
    pub closed: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: "white".to_string(),
            highlight: "#7D56F4".to_string(),
            subtle: "#626262".to_string(),
            badge_fg: "#FFFFFF".to_string(),
            badge_bg: "#3498DB".to_string(),
            error: "#E74C3C".to_string(),
            pending: "#888888".to_string(),
            in_progress: "#F1C40F".to_string(),
            done: "#2ECC71".to_string(),
            closed: "#E74C3C".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine the home directory")]
    HomeDirError,
}

impl Config {
    /// Resolve paths for `profile` under the current user's home directory
    pub fn load_with_profile(
        profile: Profile,
        database_override: Option<&str>,
        verbose: bool,
    ) -> Result<Self, ConfigError> {
        let home = utils::home_dir().ok_or(ConfigError::HomeDirError)?;
        Ok(Self::for_home(&home, profile, database_override, verbose))
    }

    pub fn for_home(
        home: &Path,
        profile: Profile,
        database_override: Option<&str>,
        verbose: bool,
    ) -> Self {
        let data_dir = utils::get_data_dir(home, profile);
        let database_path = match database_override {
            Some(path) => utils::expand_path(path),
            None => data_dir.join(DATABASE_FILE_NAME),
        };
        let log_path = data_dir.join(LOG_FILE_NAME);
        let log_level = if verbose { "debug" } else { "info" };

        Self {
            profile,
            data_dir,
            database_path,
            log_path,
            log_level: log_level.to_string(),
            theme: Theme::default(),
        }
    }
}
