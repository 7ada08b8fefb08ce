use crate::icons::IconCache;
use anyhow::Result;
use tray_icon::Icon;

pub fn create_tray_icon(icons: &IconCache, path: &str) -> Result<Icon> {
    let decoded = icons.resolve_rgba(path)?;
    Ok(Icon::from_rgba(decoded.rgba, decoded.width, decoded.height)?)
}

/// Icon for a menu entry. Failures only cost the entry its icon.
pub fn create_menu_icon(icons: &IconCache, path: &str) -> Option<tray_icon::menu::Icon> {
    let decoded = match icons.resolve_rgba(path) {
        Ok(decoded) => decoded,
        Err(e) => {
            log::error!("{}", e);
            return None;
        }
    };

    match tray_icon::menu::Icon::from_rgba(decoded.rgba, decoded.width, decoded.height) {
        Ok(icon) => Some(icon),
        Err(e) => {
            log::error!("Invalid icon {}: {}", path, e);
            None
        }
    }
}
