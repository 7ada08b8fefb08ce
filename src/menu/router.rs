use crate::actions::Activator;
use anyhow::Result;
use std::collections::HashMap;

pub const QUIT_ID: &str = "__quit__";

pub enum EventHandler {
    Activate(Activator),
    Sync(Box<dyn Fn(&str) -> Result<HandlerResult> + Send + Sync>),
}

#[derive(Debug, PartialEq)]
pub enum HandlerResult {
    Continue,
    Quit,
}

/// Maps native menu ids to what a click on them does.
pub struct EventRouter {
    routes: HashMap<String, EventHandler>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    pub fn with_quit() -> Self {
        let mut router = Self::new();
        router.add(
            QUIT_ID,
            EventHandler::Sync(Box::new(|_| {
                log::info!("Quit requested");
                Ok(HandlerResult::Quit)
            })),
        );
        router
    }

    pub fn add(&mut self, event_id: impl Into<String>, handler: EventHandler) {
        let event_id = event_id.into();
        if self.routes.insert(event_id.clone(), handler).is_some() {
            log::warn!("Replacing route for event: {}", event_id);
        }
    }

    pub fn add_activators(&mut self, activators: impl IntoIterator<Item = Activator>) {
        for activator in activators {
            let id = activator.id().to_string();
            self.add(id, EventHandler::Activate(activator));
        }
    }

    pub fn route(&self, event_id: &str) -> Result<HandlerResult> {
        match self.routes.get(event_id) {
            Some(EventHandler::Activate(activator)) => {
                activator.activate();
                Ok(HandlerResult::Continue)
            }
            Some(EventHandler::Sync(f)) => f(event_id),
            None => {
                log::warn!("No route found for event: {}", event_id);
                Ok(HandlerResult::Continue)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::ItemId;
    use tokio_stream::StreamExt;

    #[tokio::test]
    async fn added_activators_are_routed_by_their_item_id() {
        let (first, mut first_clicks) = Activator::channel(ItemId::from("item:0"));
        let (second, mut second_clicks) = Activator::channel(ItemId::from("item:1.0"));
        let mut router = EventRouter::with_quit();

        router.add_activators(vec![first, second]);

        assert_eq!(router.len(), 3);
        assert_eq!(router.route("item:1.0").unwrap(), HandlerResult::Continue);
        assert_eq!(second_clicks.next().await, Some(()));
        drop(router);
        assert_eq!(first_clicks.next().await, None);
    }
}
