#[cfg(target_os = "linux")]
mod linux;

use crate::actions::{Activator, RenderCommand};
use crate::icons::IconCache;
use crate::menu::MenuTree;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

pub enum PlatformTray {
    #[cfg(target_os = "linux")]
    Linux,
}

#[cfg(target_os = "linux")]
pub async fn create_tray(
    tree: Arc<MenuTree>,
    icons: Arc<IconCache>,
    activators: Vec<Activator>,
    render_rx: mpsc::UnboundedReceiver<RenderCommand>,
    shutdown_tx: broadcast::Sender<()>,
) -> Result<PlatformTray> {
    linux::create_tray(tree, icons, activators, render_rx, shutdown_tx).await?;
    Ok(PlatformTray::Linux)
}

#[cfg(not(target_os = "linux"))]
pub async fn create_tray(
    _tree: Arc<MenuTree>,
    _icons: Arc<IconCache>,
    _activators: Vec<Activator>,
    _render_rx: mpsc::UnboundedReceiver<RenderCommand>,
    _shutdown_tx: broadcast::Sender<()>,
) -> Result<PlatformTray> {
    anyhow::bail!("The tray frontend is only available on Linux")
}
