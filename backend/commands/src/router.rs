//! Predicate-based message router: the first matching route handles a message.

use std::sync::Arc;

use tracing::{debug, error};

use remocon_core::{IncomingMessage, Replier};

use crate::dispatch::MessageHandler;

type Predicate = Box<dyn Fn(&IncomingMessage) -> bool + Send + Sync>;

struct Route {
    name: &'static str,
    predicate: Predicate,
    handler: Arc<dyn MessageHandler>,
}

/// Ordered list of `(predicate, handler)` routes.
///
/// Predicates are evaluated for every message regardless of who sent it;
/// access control lives in the handlers (see `AdminGate`).
#[derive(Default)]
pub struct MessageRouter {
    routes: Vec<Route>,
}

impl MessageRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. Earlier routes take priority.
    pub fn route(
        mut self,
        name: &'static str,
        predicate: impl Fn(&IncomingMessage) -> bool + Send + Sync + 'static,
        handler: Arc<dyn MessageHandler>,
    ) -> Self {
        self.routes.push(Route { name, predicate: Box::new(predicate), handler });
        self
    }

    pub fn route_names(&self) -> Vec<&'static str> {
        self.routes.iter().map(|r| r.name).collect()
    }

    /// Hand `message` to the first matching route.
    ///
    /// Returns the route name, or `None` if nothing matched. Handler errors
    /// are logged here and never propagated to the transport loop.
    pub async fn handle(&self, bot: Arc<dyn Replier>, message: IncomingMessage) -> Option<&'static str> {
        let route = self.routes.iter().find(|r| (r.predicate)(&message))?;
        debug!(route = route.name, chat_id = message.chat_id, "Routing message");
        let chat_id = message.chat_id;
        if let Err(e) = route.handler.handle(bot, message).await {
            error!(route = route.name, chat_id, error = %format!("{e:#}"), "Message handler failed");
        }
        Some(route.name)
    }
}
