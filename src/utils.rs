use directories::BaseDirs;
use std::path::{Path, PathBuf};

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    /// Name of the per-user data directory under the home directory
    pub fn data_dir_name(self) -> &'static str {
        match self {
            Profile::Dev => ".todo-tui-dev",
            Profile::Prod => ".todo-tui",
        }
    }
}

/// The current user's home directory
pub fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Get the data directory for a profile, rooted at `home`
pub fn get_data_dir(home: &Path, profile: Profile) -> PathBuf {
    home.join(profile.data_dir_name())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Create `path` and any missing parents, readable only by the owner
#[cfg(unix)]
pub fn create_private_dir(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(path)
}

#[cfg(not(unix))]
pub fn create_private_dir(path: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(path)
}

const ELLIPSIS: &str = "...";

/// Shorten `text` to `max_width` characters, marking the cut with "...".
/// The result never exceeds `max_width`, even when the ellipsis itself doesn't fit.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    if max_width < ELLIPSIS.len() {
        return ELLIPSIS[..max_width].to_string();
    }
    let keep = max_width - ELLIPSIS.len();
    text.chars().take(keep).collect::<String>() + ELLIPSIS
}
