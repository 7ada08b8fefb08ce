use super::process::{ChildProcess, ProcessSpawner};
use super::LeafContext;
use crate::error::ActionError;
use std::io;
use std::process::ExitStatus;
use std::sync::Arc;
use tokio_stream::{Stream, StreamExt};

/// Every activation spawns its own process; runs of the same leaf overlap.
pub(super) async fn run<S, A>(leaf: LeafContext, mut activations: A, spawner: Arc<S>)
where
    S: ProcessSpawner,
    A: Stream<Item = ()> + Unpin,
{
    while activations.next().await.is_some() {
        log::info!("Executing: {}", leaf.command);

        let child = match spawner.spawn(&leaf.command, false) {
            Ok(child) => child,
            Err(source) => {
                let err = ActionError::Spawn { command: leaf.command.clone(), source };
                log::error!("[{}] {}", leaf.id, err);
                continue;
            }
        };

        let leaf = leaf.clone();
        tokio::spawn(async move {
            let result = child.wait().await;
            report_exit(&leaf, result);
        });
    }

    log::debug!("[{}] Activation stream closed", leaf.id);
}

fn report_exit(leaf: &LeafContext, result: io::Result<ExitStatus>) {
    match result {
        Ok(status) if status.success() => log::debug!("[{}] Finished: {}", leaf.id, leaf.command),
        Ok(status) => {
            let err = ActionError::Exit { command: leaf.command.clone(), status };
            log::error!("[{}] {}", leaf.id, err);
        }
        Err(source) => {
            let err = ActionError::Wait { command: leaf.command.clone(), source };
            log::error!("[{}] {}", leaf.id, err);
        }
    }
}
