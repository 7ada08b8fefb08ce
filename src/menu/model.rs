use crate::config::RawMenuItem;
use crate::error::ConfigError;
use std::fmt;
use std::time::Duration;

/// Position-derived id of a menu entry, e.g. `item:0.2` for the third child
/// of the first top-level entry. Doubles as the native menu id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemId(String);

impl ItemId {
    fn from_path(path: &[usize]) -> Self {
        let joined = path.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(".");
        Self(format!("item:{}", joined))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeafAction {
    pub command: String,
    pub cancellable: bool,
    pub stop_timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Submenu(Vec<MenuNode>),
    Leaf(LeafAction),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuNode {
    pub id: ItemId,
    pub title: String,
    pub tooltip: String,
    pub icon: Option<String>,
    pub kind: NodeKind,
}

impl MenuNode {
    pub fn action(&self) -> Option<&LeafAction> {
        match &self.kind {
            NodeKind::Leaf(action) => Some(action),
            NodeKind::Submenu(_) => None,
        }
    }

    pub fn children(&self) -> &[MenuNode] {
        match &self.kind {
            NodeKind::Submenu(children) => children,
            NodeKind::Leaf(_) => &[],
        }
    }
}

/// The validated, read-only menu. The root itself only carries the tray's
/// display metadata; `items` are the top-level entries.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuTree {
    pub title: String,
    pub tooltip: String,
    pub icon: Option<String>,
    pub items: Vec<MenuNode>,
}

impl MenuTree {
    pub fn build(raw: RawMenuItem) -> Result<Self, ConfigError> {
        let Some(children) = raw.items.filter(|items| !items.is_empty()) else {
            return Err(ConfigError::RootNotSubmenu { title: raw.title });
        };
        if raw.action.is_some() {
            return Err(ConfigError::Ambiguous { title: raw.title });
        }

        let items = build_children(children, &[])?;
        Ok(Self {
            title: raw.title,
            tooltip: raw.tooltip,
            icon: raw.icon,
            items,
        })
    }

    /// Depth-first, declared-order traversal of every node below the root.
    pub fn walk(&self) -> impl Iterator<Item = &MenuNode> + '_ {
        let mut nodes = Vec::new();
        collect(&self.items, &mut nodes);
        nodes.into_iter()
    }

    pub fn leaves(&self) -> impl Iterator<Item = (&MenuNode, &LeafAction)> + '_ {
        self.walk().filter_map(|node| node.action().map(|action| (node, action)))
    }
}

fn collect<'a>(nodes: &'a [MenuNode], out: &mut Vec<&'a MenuNode>) {
    for node in nodes {
        out.push(node);
        collect(node.children(), out);
    }
}

fn build_children(raw: Vec<RawMenuItem>, parent: &[usize]) -> Result<Vec<MenuNode>, ConfigError> {
    raw.into_iter()
        .enumerate()
        .map(|(idx, item)| {
            let mut path = parent.to_vec();
            path.push(idx);
            build_node(item, &path)
        })
        .collect()
}

fn build_node(raw: RawMenuItem, path: &[usize]) -> Result<MenuNode, ConfigError> {
    let children = raw.items.filter(|items| !items.is_empty());

    let kind = match (children, raw.action) {
        (Some(_), Some(_)) => return Err(ConfigError::Ambiguous { title: raw.title }),
        (None, None) => return Err(ConfigError::Incomplete { title: raw.title }),
        (Some(children), None) => {
            if raw.cancellable_action {
                log::warn!("Ignoring CancellableAction on submenu `{}`", raw.title);
            }
            NodeKind::Submenu(build_children(children, path)?)
        }
        (None, Some(command)) => {
            if raw.stop_timeout.is_some() && !raw.cancellable_action {
                log::warn!("Ignoring StopTimeout on non-cancellable item `{}`", raw.title);
            }
            NodeKind::Leaf(LeafAction {
                command,
                cancellable: raw.cancellable_action,
                stop_timeout: raw
                    .stop_timeout
                    .filter(|_| raw.cancellable_action)
                    .map(Duration::from_secs),
            })
        }
    };

    Ok(MenuNode {
        id: ItemId::from_path(path),
        title: raw.title,
        tooltip: raw.tooltip,
        icon: raw.icon,
        kind,
    })
}
