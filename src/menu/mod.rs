pub mod model;
pub mod router;

#[cfg(target_os = "linux")]
pub mod builder;

pub use model::{ItemId, LeafAction, MenuNode, MenuTree, NodeKind};
