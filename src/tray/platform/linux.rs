use crate::actions::{Activator, RenderCommand};
use crate::icons::IconCache;
use crate::menu::builder::{build_menu, BuiltMenu};
use crate::menu::router::{EventRouter, HandlerResult};
use crate::menu::{ItemId, MenuTree};
use crate::tray::icon::create_tray_icon;
use anyhow::{Context, Result};
use gtk::{self, glib};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tray_icon::menu::{IconMenuItem, MenuEvent};
use tray_icon::{TrayIcon, TrayIconBuilder};

const EVENT_POLL_INTERVAL: std::time::Duration = std::time::Duration::from_millis(100);

pub async fn create_tray(
    tree: Arc<MenuTree>,
    icons: Arc<IconCache>,
    activators: Vec<Activator>,
    render_rx: mpsc::UnboundedReceiver<RenderCommand>,
    shutdown_tx: broadcast::Sender<()>,
) -> Result<()> {
    let (ready_tx, ready_rx) = oneshot::channel::<Result<()>>();

    std::thread::spawn(move || {
        let tray_icon = match init_tray(&tree, &icons, activators, render_rx, shutdown_tx) {
            Ok(tray_icon) => {
                let _ = ready_tx.send(Ok(()));
                tray_icon
            }
            Err(e) => {
                let _ = ready_tx.send(Err(e));
                return;
            }
        };

        gtk::main();
        drop(tray_icon);
        log::debug!("GTK loop finished");
    });

    wait_ready(ready_rx).await
}

async fn wait_ready(ready_rx: oneshot::Receiver<Result<()>>) -> Result<()> {
    ready_rx
        .await
        .context("Tray thread exited before the menu was ready")?
}

fn init_tray(
    tree: &MenuTree,
    icons: &IconCache,
    activators: Vec<Activator>,
    render_rx: mpsc::UnboundedReceiver<RenderCommand>,
    shutdown_tx: broadcast::Sender<()>,
) -> Result<TrayIcon> {
    gtk::init().context("Failed to initialize GTK")?;

    let (tray_icon, items) = create_tray_icon_with_menu(tree, icons)?;

    let mut router = EventRouter::with_quit();
    router.add_activators(activators);
    setup_event_loop(router, items, render_rx, shutdown_tx);

    Ok(tray_icon)
}

fn create_tray_icon_with_menu(
    tree: &MenuTree,
    icons: &IconCache,
) -> Result<(TrayIcon, HashMap<ItemId, IconMenuItem>)> {
    let BuiltMenu { menu, items } = build_menu(tree, icons)?;

    let mut builder = TrayIconBuilder::new()
        .with_menu(Box::new(menu))
        .with_title(&tree.title);
    if !tree.tooltip.is_empty() {
        builder = builder.with_tooltip(&tree.tooltip);
    }
    if let Some(path) = &tree.icon {
        builder = builder.with_icon(create_tray_icon(icons, path)?);
    }

    let tray_icon = builder.build().context("Failed to create tray icon")?;
    Ok((tray_icon, items))
}

fn setup_event_loop(
    router: EventRouter,
    items: HashMap<ItemId, IconMenuItem>,
    mut render_rx: mpsc::UnboundedReceiver<RenderCommand>,
    shutdown_tx: broadcast::Sender<()>,
) {
    let menu_receiver = MenuEvent::receiver();

    glib::timeout_add_local(EVENT_POLL_INTERVAL, move || {
        apply_render_commands(&mut render_rx, &items);
        process_pending_events(menu_receiver, &router, &shutdown_tx)
    });
}

fn apply_render_commands(
    render_rx: &mut mpsc::UnboundedReceiver<RenderCommand>,
    items: &HashMap<ItemId, IconMenuItem>,
) {
    while let Ok(command) = render_rx.try_recv() {
        match command {
            RenderCommand::SetTitle { item, text } => match items.get(&item) {
                Some(menu_item) => menu_item.set_text(&text),
                None => log::warn!("Title update for unknown item: {}", item),
            },
        }
    }
}

fn process_pending_events(
    receiver: &tray_icon::menu::MenuEventReceiver,
    router: &EventRouter,
    shutdown_tx: &broadcast::Sender<()>,
) -> glib::ControlFlow {
    while let Ok(event) = receiver.try_recv() {
        if handle_menu_event(&event.id.0, router, shutdown_tx) {
            return glib::ControlFlow::Break;
        }
    }
    glib::ControlFlow::Continue
}

fn handle_menu_event(
    event_id: &str,
    router: &EventRouter,
    shutdown_tx: &broadcast::Sender<()>,
) -> bool {
    log::debug!("Menu event: {}", event_id);

    let result = router.route(event_id);
    if let Err(e) = &result {
        log::error!("Error handling menu event: {}", e);
        return false;
    }

    let should_quit = matches!(result, Ok(HandlerResult::Quit));
    if !should_quit {
        return false;
    }

    log::info!("Quitting application");
    gtk::main_quit();
    let _ = shutdown_tx.send(());
    true
}
