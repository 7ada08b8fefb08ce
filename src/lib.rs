#[cfg(not(unix))]
compile_error!("traymenu relies on Unix process groups");

pub mod actions;
pub mod config;
pub mod error;
pub mod icons;
pub mod menu;
pub mod paths;
pub mod tray;
