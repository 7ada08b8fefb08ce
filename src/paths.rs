use crate::error::ConfigError;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "config.json";
const HOME_CONFIG_DIR: &str = ".traymenu";
const APP_DIR: &str = "traymenu";

pub fn home_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::NoHomeDir)
}

/// Expands a leading `~/` against `home`. Other paths are returned as-is.
pub fn expand_home(path: &str, home: &Path) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// Directories searched for `config.json`, in priority order. Without a home
/// directory only the working directory and the XDG location are searched.
pub fn config_candidates(home: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILENAME)];
    if let Some(home) = home {
        candidates.push(home.join(HOME_CONFIG_DIR).join(CONFIG_FILENAME));
    }

    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join(APP_DIR).join(CONFIG_FILENAME));
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_home_cases() {
        let home = Path::new("/home/alice");
        let cases = [
            ("~/icons/run.png", "/home/alice/icons/run.png"),
            ("~/", "/home/alice/"),
            ("/usr/share/icon.png", "/usr/share/icon.png"),
            ("relative/icon.png", "relative/icon.png"),
            ("~other/icon.png", "~other/icon.png"),
            ("~", "~"),
        ];

        for (input, expected) in cases {
            assert_eq!(expand_home(input, home), PathBuf::from(expected), "input: {:?}", input);
        }
    }

    #[test]
    fn config_candidates_start_with_working_directory() {
        let home = Path::new("/home/alice");

        let candidates = config_candidates(Some(home));

        assert_eq!(candidates[0], PathBuf::from("config.json"));
        assert_eq!(candidates[1], PathBuf::from("/home/alice/.traymenu/config.json"));
        for path in &candidates {
            assert!(path.ends_with(CONFIG_FILENAME), "path {:?} should end with {}", path, CONFIG_FILENAME);
        }
    }

    #[test]
    fn config_candidates_without_home_keep_working_directory() {
        let candidates = config_candidates(None);

        assert_eq!(candidates[0], PathBuf::from("config.json"));
        assert!(
            candidates.iter().all(|path| !path.to_string_lossy().contains(HOME_CONFIG_DIR)),
            "no home-based candidate expected: {:?}",
            candidates
        );
    }
}
