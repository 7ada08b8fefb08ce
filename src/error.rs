use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No config found (searched: {})", display_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    #[error("Failed to read config at `{}`: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config at `{}`: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Menu item `{}` defines both Items and Action, exactly one is allowed", .title)]
    Ambiguous { title: String },

    #[error("Menu item `{}` defines neither Items nor Action, exactly one is required", .title)]
    Incomplete { title: String },

    #[error("The root menu `{}` must define Items", .title)]
    RootNotSubmenu { title: String },

    #[error("Could not determine home directory")]
    NoHomeDir,
}

#[derive(Error, Debug)]
pub enum IconLoadError {
    #[error("Could not load icon `{}`: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Could not decode icon: {}", .0)]
    Decode(#[from] image::ImageError),
}

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Failed to start `{}`: {}", .command, .source)]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("Failed to signal process group {}: {}", .group, .source)]
    Signal {
        group: i32,
        source: std::io::Error,
    },

    #[error("`{}` failed: {}", .command, .status)]
    Exit { command: String, status: ExitStatus },

    #[error("Failed to wait for `{}`: {}", .command, .source)]
    Wait {
        command: String,
        source: std::io::Error,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
