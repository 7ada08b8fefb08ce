use super::router::QUIT_ID;
use super::{ItemId, MenuNode, MenuTree, NodeKind};
use crate::icons::IconCache;
use crate::tray::icon::create_menu_icon;
use anyhow::Result;
use std::collections::HashMap;
use tray_icon::menu::{IconMenuItem, IsMenuItem, Menu, MenuItem, PredefinedMenuItem, Submenu};

pub struct BuiltMenu {
    pub menu: Menu,
    /// Leaf entries by id, kept so the engine's title updates can be applied.
    pub items: HashMap<ItemId, IconMenuItem>,
}

pub fn build_menu(tree: &MenuTree, icons: &IconCache) -> Result<BuiltMenu> {
    let menu = Menu::new();
    let mut items = HashMap::new();

    for node in &tree.items {
        let entry = create_entry(node, icons, &mut items)?;
        menu.append(entry.as_ref())?;
    }

    menu.append(&PredefinedMenuItem::separator())?;
    let quit_item = MenuItem::with_id(QUIT_ID, "Quit", true, None);
    menu.append(&quit_item)?;

    Ok(BuiltMenu { menu, items })
}

fn create_entry(
    node: &MenuNode,
    icons: &IconCache,
    items: &mut HashMap<ItemId, IconMenuItem>,
) -> Result<Box<dyn IsMenuItem>> {
    match &node.kind {
        NodeKind::Submenu(children) => {
            log::debug!("Creating submenu with ID: {}", node.id);
            let submenu = Submenu::with_id(node.id.as_str(), &node.title, true);
            for child in children {
                let entry = create_entry(child, icons, items)?;
                submenu.append(entry.as_ref())?;
            }
            Ok(Box::new(submenu))
        }
        NodeKind::Leaf(_) => {
            let icon = node.icon.as_deref().and_then(|path| create_menu_icon(icons, path));
            let item = IconMenuItem::with_id(node.id.as_str(), &node.title, true, icon, None);
            items.insert(node.id.clone(), item.clone());
            Ok(Box::new(item))
        }
    }
}
