use crate::error::IconLoadError;
use crate::menu::MenuTree;
use crate::paths;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

/// Decoded icon pixels, ready for the tray.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaIcon {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Icon file contents keyed by expanded path. Shared between the startup
/// sequence and the tray thread through an `Arc`.
pub struct IconCache {
    home: PathBuf,
    entries: Mutex<HashMap<PathBuf, Arc<[u8]>>>,
}

impl IconCache {
    pub fn new(home: PathBuf) -> Self {
        Self {
            home,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn resolve(&self, path: &str) -> Result<Arc<[u8]>, IconLoadError> {
        let path = paths::expand_home(path, &self.home);

        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(bytes) = entries.get(&path) {
            return Ok(Arc::clone(bytes));
        }

        let bytes: Arc<[u8]> = std::fs::read(&path)
            .map_err(|source| IconLoadError::Read {
                path: path.clone(),
                source,
            })?
            .into();
        entries.insert(path, Arc::clone(&bytes));
        Ok(bytes)
    }

    pub fn resolve_rgba(&self, path: &str) -> Result<RgbaIcon, IconLoadError> {
        let bytes = self.resolve(path)?;
        decode_rgba(&bytes)
    }

    /// Resolves and decodes every icon in the tree so a broken icon is
    /// reported before anything is shown. Returns the number of icon
    /// references checked.
    pub fn preload(&self, tree: &MenuTree) -> Result<usize, IconLoadError> {
        let mut checked = 0;
        let icons = std::iter::once(tree.icon.as_deref())
            .chain(tree.walk().map(|node| node.icon.as_deref()))
            .flatten();

        for icon in icons {
            self.resolve_rgba(icon)?;
            checked += 1;
        }

        log::debug!("Preloaded {} icon reference(s)", checked);
        Ok(checked)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaIcon, IconLoadError> {
    let image = image::load_from_memory(bytes)?.into_rgba8();
    let (width, height) = image.dimensions();
    Ok(RgbaIcon {
        rgba: image.into_raw(),
        width,
        height,
    })
}
