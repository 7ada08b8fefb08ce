use std::future::Future;
use std::io;
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, Command};

/// Process-group id. A leader started with a new group has `pgid == pid`.
pub type ProcessGroupId = i32;

const DEFAULT_SHELL: &str = "bash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    /// Graceful stop request (SIGINT), what a Ctrl+C in a terminal sends.
    Interrupt,
    Kill,
}

impl StopSignal {
    fn as_raw(self) -> libc::c_int {
        match self {
            StopSignal::Interrupt => libc::SIGINT,
            StopSignal::Kill => libc::SIGKILL,
        }
    }
}

pub trait ChildProcess: Send + 'static {
    fn id(&self) -> u32;
    fn wait(self) -> impl Future<Output = io::Result<ExitStatus>> + Send;
}

/// OS boundary of the action engine.
pub trait ProcessSpawner: Send + Sync + 'static {
    type Child: ChildProcess;

    fn spawn(&self, command: &str, new_group: bool) -> io::Result<Self::Child>;

    /// Signals every process in `group`, not only its leader.
    fn signal(&self, group: ProcessGroupId, signal: StopSignal) -> io::Result<()>;
}

/// Runs commands through `<shell> -c`, inheriting stdout and stderr.
pub struct ShellSpawner {
    shell: String,
}

impl ShellSpawner {
    pub fn new() -> Self {
        Self::with_shell(DEFAULT_SHELL)
    }

    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self { shell: shell.into() }
    }
}

impl Default for ShellSpawner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessSpawner for ShellSpawner {
    type Child = ShellChild;

    fn spawn(&self, command: &str, new_group: bool) -> io::Result<ShellChild> {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        if new_group {
            cmd.process_group(0);
        }

        let child = cmd.spawn()?;
        let pid = child
            .id()
            .ok_or_else(|| io::Error::other("spawned process has no pid"))?;
        Ok(ShellChild { pid, child })
    }

    fn signal(&self, group: ProcessGroupId, signal: StopSignal) -> io::Result<()> {
        if group <= 0 {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "invalid process group"));
        }

        // Negative pid addresses the whole group
        let result = unsafe { libc::kill(-group, signal.as_raw()) };
        if result == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

pub struct ShellChild {
    pid: u32,
    child: Child,
}

impl ChildProcess for ShellChild {
    fn id(&self) -> u32 {
        self.pid
    }

    fn wait(mut self) -> impl Future<Output = io::Result<ExitStatus>> + Send {
        async move { self.child.wait().await }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn spawn_reports_exit_status() {
        let spawner = ShellSpawner::new();
        let cases = [("true", true), ("exit 3", false)];

        for (command, success) in cases {
            let child = spawner.spawn(command, false).unwrap();
            let status = child.wait().await.unwrap();
            assert_eq!(status.success(), success, "command: {:?}", command);
        }
    }

    #[tokio::test]
    async fn new_group_leader_owns_its_group() {
        // Arrange
        let spawner = ShellSpawner::new();
        let child = spawner.spawn("sleep 5", true).unwrap();
        let pid = child.id() as ProcessGroupId;

        // Act
        let pgid = unsafe { libc::getpgid(pid) };
        spawner.signal(pid, StopSignal::Interrupt).unwrap();
        let status = child.wait().await.unwrap();

        // Assert
        assert_eq!(pgid, pid);
        assert!(!status.success());
    }

    #[test]
    fn signal_rejects_non_positive_group() {
        let spawner = ShellSpawner::new();

        for group in [0, -1] {
            let err = spawner.signal(group, StopSignal::Interrupt).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        }
    }

    #[tokio::test]
    async fn spawn_fails_for_missing_shell() {
        let spawner = ShellSpawner::with_shell("/nonexistent/shell");

        assert!(spawner.spawn("true", false).is_err());
    }
}
