pub mod icon;
pub mod platform;

use crate::actions::{Activator, RenderCommand};
use crate::icons::IconCache;
use crate::menu::MenuTree;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

pub struct TrayManager {
    _tray: platform::PlatformTray,
}

impl TrayManager {
    /// Shows the tray. Returns once the menu is built, or with the error that
    /// prevented it.
    pub async fn new(
        tree: Arc<MenuTree>,
        icons: Arc<IconCache>,
        activators: Vec<Activator>,
        render_rx: mpsc::UnboundedReceiver<RenderCommand>,
        shutdown_tx: broadcast::Sender<()>,
    ) -> Result<Self> {
        let tray = platform::create_tray(tree, icons, activators, render_rx, shutdown_tx).await?;
        Ok(Self { _tray: tray })
    }
}
