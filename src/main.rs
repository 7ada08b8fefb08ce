use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use traymenu::actions::{ActionEngine, ChannelRenderer, ShellSpawner};
use traymenu::icons::IconCache;
use traymenu::menu::MenuTree;
use traymenu::tray::TrayManager;
use traymenu::{config, paths};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    log::info!("Starting traymenu...");

    let raw = config::load()?;
    let tree = Arc::new(MenuTree::build(raw).context("Invalid menu configuration")?);

    let icons = Arc::new(IconCache::new(paths::home_dir()?));
    icons.preload(&tree).context("Failed to load menu icons")?;

    let (renderer, render_rx) = ChannelRenderer::new();
    let mut engine = ActionEngine::new(Arc::new(ShellSpawner::new()), Arc::new(renderer));
    let activators = engine.register_tree(&tree).into_values().collect();
    log::info!("Registered {} action(s)", engine.len());

    let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);
    let _tray = TrayManager::new(tree, icons, activators, render_rx, shutdown_tx).await?;

    log::info!("Ready");

    shutdown_rx.recv().await.ok();
    log::info!("Shutdown signal received, exiting...");

    if tokio::time::timeout(SHUTDOWN_GRACE, engine.join()).await.is_err() {
        log::warn!("Some actions were still running after {:?}", SHUTDOWN_GRACE);
    }
    Ok(())
}
