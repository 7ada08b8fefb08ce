use crate::error::ConfigError;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;

/// A menu entry exactly as written in `config.json`. Validation happens in
/// [`crate::menu::MenuTree::build`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawMenuItem {
    #[serde(default, alias = "title")]
    pub title: String,
    #[serde(default, alias = "tooltip")]
    pub tooltip: String,
    #[serde(default, alias = "icon")]
    pub icon: Option<String>,
    #[serde(default, alias = "items", alias = "children")]
    pub items: Option<Vec<RawMenuItem>>,
    #[serde(default, alias = "action", alias = "command")]
    pub action: Option<String>,
    #[serde(default, alias = "cancellableAction", alias = "cancellable")]
    pub cancellable_action: bool,
    /// Seconds to wait after a stop request before killing the process group.
    #[serde(default, alias = "stopTimeout")]
    pub stop_timeout: Option<u64>,
}

pub fn load() -> Result<RawMenuItem, ConfigError> {
    let home = dirs::home_dir();
    if home.is_none() {
        log::warn!("No home directory, skipping ~/.traymenu");
    }
    load_from(&paths::config_candidates(home.as_deref()))
}

/// Loads the first candidate that exists. Missing files are skipped, any
/// other read or parse failure is returned.
pub fn load_from(candidates: &[PathBuf]) -> Result<RawMenuItem, ConfigError> {
    for path in candidates {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No config at {:?}", path);
                continue;
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.clone(),
                    source,
                })
            }
        };

        let config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;

        log::info!("Loaded config from {:?}", path);
        return Ok(config);
    }

    Err(ConfigError::NotFound {
        searched: candidates.to_vec(),
    })
}
