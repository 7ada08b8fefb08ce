//! Per-leaf execution of menu commands.
//!
//! Every leaf gets its own task fed by an activation mailbox. Plain leaves
//! spawn one process per click; cancellable leaves toggle a single long-running
//! process group between `Start:` and `Stop:`.

mod fire;
pub mod process;
pub mod render;
mod toggle;

pub use process::{ChildProcess, ProcessGroupId, ProcessSpawner, ShellSpawner, StopSignal};
pub use render::{ChannelRenderer, ItemRenderer, RenderCommand};
pub use toggle::{ExecutionState, ProcessHandle};

use crate::menu::{ItemId, LeafAction, MenuNode, MenuTree};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::Stream;

pub fn start_label(title: &str) -> String {
    format!("Start: {}", title)
}

pub fn stop_label(title: &str) -> String {
    format!("Stop: {}", title)
}

#[derive(Debug, Clone)]
pub(crate) struct LeafContext {
    pub id: ItemId,
    pub title: String,
    pub command: String,
}

/// Handle the tray uses to deliver clicks to one leaf.
#[derive(Debug, Clone)]
pub struct Activator {
    id: ItemId,
    tx: mpsc::UnboundedSender<()>,
}

impl Activator {
    /// Creates a mailbox for `id`: the activator side and the stream of clicks.
    pub fn channel(id: ItemId) -> (Self, UnboundedReceiverStream<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { id, tx }, UnboundedReceiverStream::new(rx))
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Queues a click. Never blocks.
    pub fn activate(&self) {
        if self.tx.send(()).is_err() {
            log::warn!("[{}] Action is no longer running, click ignored", self.id);
        }
    }
}

pub struct ActionEngine<S, R> {
    spawner: Arc<S>,
    renderer: Arc<R>,
    tasks: Vec<JoinHandle<()>>,
}

impl<S: ProcessSpawner, R: ItemRenderer> ActionEngine<S, R> {
    pub fn new(spawner: Arc<S>, renderer: Arc<R>) -> Self {
        Self {
            spawner,
            renderer,
            tasks: Vec::new(),
        }
    }

    /// Starts the task for one leaf and returns its mailbox. Must be called
    /// from within a tokio runtime.
    pub fn register(&mut self, node: &MenuNode, action: &LeafAction) -> Activator {
        let (activator, activations) = Activator::channel(node.id.clone());
        self.spawn_leaf(node, action, activations);
        activator
    }

    pub fn register_tree(&mut self, tree: &MenuTree) -> HashMap<ItemId, Activator> {
        tree.leaves()
            .map(|(node, action)| (node.id.clone(), self.register(node, action)))
            .collect()
    }

    /// Drives one leaf from an arbitrary activation stream. The task ends once
    /// the stream is exhausted and no process of a cancellable leaf is left.
    pub fn spawn_leaf<A>(&mut self, node: &MenuNode, action: &LeafAction, activations: A)
    where
        A: Stream<Item = ()> + Unpin + Send + 'static,
    {
        let leaf = LeafContext {
            id: node.id.clone(),
            title: node.title.clone(),
            command: action.command.clone(),
        };
        log::debug!(
            "[{}] Registered {} action: {}",
            leaf.id,
            if action.cancellable { "start/stop" } else { "fire-and-forget" },
            leaf.command
        );

        let spawner = Arc::clone(&self.spawner);
        let handle = if action.cancellable {
            let machine = toggle::ToggleLeaf::new(leaf, action.stop_timeout, spawner, Arc::clone(&self.renderer));
            tokio::spawn(machine.run(activations))
        } else {
            tokio::spawn(fire::run(leaf, activations, spawner))
        };
        self.tasks.push(handle);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Waits for every leaf task. Only returns after all activators are gone.
    pub async fn join(self) {
        for task in self.tasks {
            if let Err(e) = task.await {
                log::error!("Action task failed: {}", e);
            }
        }
    }
}
