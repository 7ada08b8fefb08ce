use super::process::{ChildProcess, ProcessGroupId, ProcessSpawner, StopSignal};
use super::render::ItemRenderer;
use super::{start_label, stop_label, LeafContext};
use crate::error::ActionError;
use std::io;
use std::process::ExitStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{self, Instant};
use tokio_stream::{Stream, StreamExt};

type WaitOutcome = Result<io::Result<ExitStatus>, oneshot::error::RecvError>;

pub enum ExecutionState {
    Idle,
    Running(ProcessHandle),
}

pub struct ProcessHandle {
    pub group: ProcessGroupId,
    exited: oneshot::Receiver<io::Result<ExitStatus>>,
    stop_requested: bool,
    kill_deadline: Option<Instant>,
}

enum Event {
    Activated,
    Exited(WaitOutcome),
    KillDeadline,
    Closed,
}

/// Start/stop state machine of one cancellable leaf. Owned by a single task,
/// so transitions never interleave.
pub(super) struct ToggleLeaf<S, R> {
    leaf: LeafContext,
    stop_timeout: Option<Duration>,
    spawner: Arc<S>,
    renderer: Arc<R>,
    state: ExecutionState,
}

impl<S: ProcessSpawner, R: ItemRenderer> ToggleLeaf<S, R> {
    pub(super) fn new(
        leaf: LeafContext,
        stop_timeout: Option<Duration>,
        spawner: Arc<S>,
        renderer: Arc<R>,
    ) -> Self {
        Self {
            leaf,
            stop_timeout,
            spawner,
            renderer,
            state: ExecutionState::Idle,
        }
    }

    pub(super) async fn run<A>(mut self, mut activations: A)
    where
        A: Stream<Item = ()> + Unpin,
    {
        self.renderer.set_title(&self.leaf.id, &start_label(&self.leaf.title));
        let mut closed = false;

        loop {
            let event = match &mut self.state {
                ExecutionState::Idle if closed => break,
                ExecutionState::Idle => match activations.next().await {
                    Some(()) => Event::Activated,
                    None => Event::Closed,
                },
                ExecutionState::Running(handle) => {
                    let deadline = handle.kill_deadline;
                    // Exits win over queued clicks so a click after the process
                    // died starts a new one instead of signalling a dead group
                    tokio::select! {
                        biased;
                        outcome = &mut handle.exited => Event::Exited(outcome),
                        _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                            Event::KillDeadline
                        }
                        next = activations.next(), if !closed => match next {
                            Some(()) => Event::Activated,
                            None => Event::Closed,
                        },
                    }
                }
            };

            match event {
                Event::Activated => self.on_activate(),
                Event::Exited(outcome) => self.on_exit(outcome),
                Event::KillDeadline => self.on_kill_deadline(),
                Event::Closed => {
                    closed = true;
                    if matches!(self.state, ExecutionState::Running(_)) {
                        log::info!("[{}] Shutting down, stopping running action", self.leaf.id);
                        self.request_stop();
                    }
                }
            }
        }

        log::debug!("[{}] Activation stream closed", self.leaf.id);
    }

    fn on_activate(&mut self) {
        match self.state {
            ExecutionState::Idle => self.start(),
            ExecutionState::Running(_) => self.request_stop(),
        }
    }

    fn start(&mut self) {
        log::info!("Executing: {}", self.leaf.command);

        let child = match self.spawner.spawn(&self.leaf.command, true) {
            Ok(child) => child,
            Err(source) => {
                let err = ActionError::Spawn { command: self.leaf.command.clone(), source };
                log::error!("[{}] {}", self.leaf.id, err);
                return;
            }
        };

        let group = child.id() as ProcessGroupId;
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let _ = tx.send(child.wait().await);
        });

        self.state = ExecutionState::Running(ProcessHandle {
            group,
            exited: rx,
            stop_requested: false,
            kill_deadline: None,
        });
        self.renderer.set_title(&self.leaf.id, &stop_label(&self.leaf.title));
    }

    fn request_stop(&mut self) {
        let ExecutionState::Running(handle) = &mut self.state else {
            return;
        };

        log::info!("Interrupting process group {}", -handle.group);
        if let Err(source) = self.spawner.signal(handle.group, StopSignal::Interrupt) {
            let err = ActionError::Signal { group: handle.group, source };
            log::error!("[{}] {}", self.leaf.id, err);
            return;
        }

        handle.stop_requested = true;
        if let (Some(timeout), None) = (self.stop_timeout, handle.kill_deadline) {
            handle.kill_deadline = Some(Instant::now() + timeout);
        }
    }

    fn on_kill_deadline(&mut self) {
        let ExecutionState::Running(handle) = &mut self.state else {
            return;
        };

        // Fires once per stop request
        handle.kill_deadline = None;
        log::warn!("[{}] Process group {} ignored interrupt, killing", self.leaf.id, handle.group);
        if let Err(source) = self.spawner.signal(handle.group, StopSignal::Kill) {
            let err = ActionError::Signal { group: handle.group, source };
            log::error!("[{}] {}", self.leaf.id, err);
        }
    }

    fn on_exit(&mut self, outcome: WaitOutcome) {
        let stop_requested = match &self.state {
            ExecutionState::Running(handle) => handle.stop_requested,
            ExecutionState::Idle => false,
        };

        match outcome {
            Ok(Ok(status)) if status.success() => {}
            Ok(Ok(status)) if stop_requested => {
                log::info!("[{}] Stopped: {}", self.leaf.id, status);
            }
            Ok(Ok(status)) => {
                let err = ActionError::Exit { command: self.leaf.command.clone(), status };
                log::error!("[{}] {}", self.leaf.id, err);
            }
            Ok(Err(source)) => {
                let err = ActionError::Wait { command: self.leaf.command.clone(), source };
                log::error!("[{}] {}", self.leaf.id, err);
            }
            Err(_) => log::warn!("[{}] Wait task ended without an exit status", self.leaf.id),
        }

        log::info!("Execution finished: {}", self.leaf.command);
        self.state = ExecutionState::Idle;
        self.renderer.set_title(&self.leaf.id, &start_label(&self.leaf.title));
    }
}
