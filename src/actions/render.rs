use crate::menu::ItemId;
use tokio::sync::mpsc;

/// The engine's only view of the tray: it can relabel an item.
pub trait ItemRenderer: Send + Sync + 'static {
    fn set_title(&self, item: &ItemId, text: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    SetTitle { item: ItemId, text: String },
}

/// Forwards updates to the tray thread, which owns the native menu items.
pub struct ChannelRenderer {
    tx: mpsc::UnboundedSender<RenderCommand>,
}

impl ChannelRenderer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RenderCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ItemRenderer for ChannelRenderer {
    fn set_title(&self, item: &ItemId, text: &str) {
        let command = RenderCommand::SetTitle {
            item: item.clone(),
            text: text.to_string(),
        };
        if self.tx.send(command).is_err() {
            log::debug!("Tray closed, dropping title update for {}", item);
        }
    }
}
