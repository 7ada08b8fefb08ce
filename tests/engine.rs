use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use traymenu::actions::{ActionEngine, ItemRenderer, ShellSpawner};
use traymenu::config::RawMenuItem;
use traymenu::menu::{ItemId, MenuTree};

#[derive(Default)]
struct RecordingRenderer {
    titles: Mutex<Vec<String>>,
}

impl RecordingRenderer {
    fn last_title(&self) -> Option<String> {
        self.titles.lock().unwrap().last().cloned()
    }
}

impl ItemRenderer for RecordingRenderer {
    fn set_title(&self, _item: &ItemId, text: &str) {
        self.titles.lock().unwrap().push(text.to_string());
    }
}

async fn eventually(timeout: Duration, description: &str, condition: impl Fn() -> bool) {
    let result = tokio::time::timeout(timeout, async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(result.is_ok(), "timed out waiting for: {}", description);
}

fn single_leaf_tree(json_leaf: &str) -> MenuTree {
    let json = format!(r#"{{ "Title": "Root", "Items": [ {} ] }}"#, json_leaf);
    let raw: RawMenuItem = serde_json::from_str(&json).unwrap();
    MenuTree::build(raw).unwrap()
}

#[tokio::test]
async fn build_scenario_start_then_stop() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("started");
    let leaf = format!(
        r#"{{ "title": "Build", "command": "touch {} && sleep 5", "cancellable": true }}"#,
        marker.display()
    );
    let tree = single_leaf_tree(&leaf);
    let renderer = Arc::new(RecordingRenderer::default());
    let mut engine = ActionEngine::new(Arc::new(ShellSpawner::new()), Arc::clone(&renderer));
    let activators = engine.register_tree(&tree);
    let build = &activators[&ItemId::from("item:0")];

    // Act: start
    build.activate();

    // Assert
    eventually(Duration::from_secs(3), "process started", || marker.exists()).await;
    assert_eq!(renderer.last_title().as_deref(), Some("Stop: Build"));

    // Act: stop before the command finishes on its own
    build.activate();

    // Assert
    eventually(Duration::from_secs(3), "start label after exit", || {
        renderer.last_title().as_deref() == Some("Start: Build")
    })
    .await;
    assert_eq!(
        *renderer.titles.lock().unwrap(),
        vec!["Start: Build", "Stop: Build", "Start: Build"]
    );
}

/// Zombies count as gone: they have exited and only wait to be reaped.
fn is_alive(pid: i32) -> bool {
    let Ok(stat) = std::fs::read_to_string(format!("/proc/{}/stat", pid)) else {
        return false;
    };
    let state = stat.rsplit(") ").next().and_then(|rest| rest.chars().next());
    state != Some('Z')
}

#[tokio::test]
async fn stop_reaches_children_of_the_shell() {
    // Arrange: the shell runs a nested shell in the foreground, which records
    // its pid and becomes `sleep`
    let dir = TempDir::new().unwrap();
    let pid_file = dir.path().join("child.pid");
    let leaf = format!(
        r#"{{ "title": "Watch", "command": "bash -c 'echo $$ > {}; exec sleep 30'; echo done", "cancellable": true }}"#,
        pid_file.display()
    );
    let tree = single_leaf_tree(&leaf);
    let renderer = Arc::new(RecordingRenderer::default());
    let mut engine = ActionEngine::new(Arc::new(ShellSpawner::new()), Arc::clone(&renderer));
    let activators = engine.register_tree(&tree);
    let watch = &activators[&ItemId::from("item:0")];
    watch.activate();
    eventually(Duration::from_secs(3), "child pid written", || {
        std::fs::read_to_string(&pid_file).map(|s| s.ends_with('\n')).unwrap_or(false)
    })
    .await;
    let child_pid: i32 = std::fs::read_to_string(&pid_file).unwrap().trim().parse().unwrap();
    assert!(is_alive(child_pid));

    // Act
    watch.activate();

    // Assert
    eventually(Duration::from_secs(3), "child gone", || !is_alive(child_pid)).await;
    eventually(Duration::from_secs(3), "start label", || {
        renderer.last_title().as_deref() == Some("Start: Watch")
    })
    .await;
}

#[tokio::test]
async fn fire_and_forget_runs_every_activation() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let leaf = format!(r#"{{ "Title": "Tick", "Action": "echo tick >> {}" }}"#, out.display());
    let tree = single_leaf_tree(&leaf);
    let renderer = Arc::new(RecordingRenderer::default());
    let mut engine = ActionEngine::new(Arc::new(ShellSpawner::new()), Arc::clone(&renderer));
    let activators = engine.register_tree(&tree);

    // Act
    for _ in 0..4 {
        activators[&ItemId::from("item:0")].activate();
    }

    // Assert
    let count_lines = || {
        std::fs::read_to_string(&out)
            .map(|s| s.lines().count())
            .unwrap_or(0)
    };
    eventually(Duration::from_secs(3), "four runs", || count_lines() == 4).await;
    assert!(renderer.last_title().is_none());
}

#[tokio::test]
async fn failing_command_does_not_block_later_runs() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    let leaf = format!(
        r#"{{ "Title": "Flaky", "Action": "echo run >> {} ; exit 7" }}"#,
        out.display()
    );
    let tree = single_leaf_tree(&leaf);
    let mut engine = ActionEngine::new(
        Arc::new(ShellSpawner::new()),
        Arc::new(RecordingRenderer::default()),
    );
    let activators = engine.register_tree(&tree);

    // Act
    activators[&ItemId::from("item:0")].activate();
    activators[&ItemId::from("item:0")].activate();

    // Assert
    eventually(Duration::from_secs(3), "two runs", || {
        std::fs::read_to_string(&out).map(|s| s.lines().count() == 2).unwrap_or(false)
    })
    .await;
}
