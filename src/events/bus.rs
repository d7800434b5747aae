//! In-process publish/subscribe channel for board UI actions.
//!
//! Delivery is synchronous: [`EventBus::emit`] runs every matching handler,
//! in subscription order, before it returns. Handlers registered for a
//! specific event run first, then wildcard handlers. Nothing is queued or
//! persisted, and emitting an event nobody listens to does nothing.

use crate::events::KanbanEvent;
use serde_json::Value;
use std::{collections::HashMap, fmt};
use tracing::trace;
use uuid::Uuid;

/// Handler for a single event; receives the payload untouched
pub type EventHandler = Box<dyn FnMut(Option<&Value>) + Send>;

/// Handler invoked for every event
pub type WildcardHandler = Box<dyn FnMut(KanbanEvent, Option<&Value>) + Send>;

/// Handle returned by a subscription, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<KanbanEvent, Vec<(SubscriptionId, EventHandler)>>,
    wildcard: Vec<(SubscriptionId, WildcardHandler)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `event`
    pub fn subscribe<F>(&mut self, event: KanbanEvent, handler: F) -> SubscriptionId
    where
        F: FnMut(Option<&Value>) + Send + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers
            .entry(event)
            .or_default()
            .push((id, Box::new(handler)));
        trace!(%event, %id, "handler subscribed");
        id
    }

    /// Registers `handler` for every event
    pub fn subscribe_all<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(KanbanEvent, Option<&Value>) + Send + 'static,
    {
        let id = SubscriptionId::new();
        self.wildcard.push((id, Box::new(handler)));
        trace!(%id, "wildcard handler subscribed");
        id
    }

    /// Removes the handler registered for `event` under `id`
    ///
    /// Returns false when no such handler exists.
    pub fn unsubscribe(&mut self, event: KanbanEvent, id: SubscriptionId) -> bool {
        let Some(handlers) = self.handlers.get_mut(&event) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        let removed = handlers.len() != before;
        if handlers.is_empty() {
            self.handlers.remove(&event);
        }
        removed
    }

    /// Removes a wildcard handler
    pub fn unsubscribe_all(&mut self, id: SubscriptionId) -> bool {
        let before = self.wildcard.len();
        self.wildcard.retain(|(handler_id, _)| *handler_id != id);
        self.wildcard.len() != before
    }

    /// Synchronously delivers `payload` to every handler of `event`
    pub fn emit(&mut self, event: KanbanEvent, payload: Option<&Value>) {
        let handlers = self.handlers.get_mut(&event);
        trace!(
            %event,
            handlers = handlers.as_ref().map_or(0, |h| h.len()),
            wildcard = self.wildcard.len(),
            "emitting event"
        );

        if let Some(handlers) = handlers {
            for (_, handler) in handlers.iter_mut() {
                handler(payload);
            }
        }
        for (_, handler) in self.wildcard.iter_mut() {
            handler(event, payload);
        }
    }

    /// Number of handlers registered specifically for `event`
    pub fn handler_count(&self, event: KanbanEvent) -> usize {
        self.handlers.get(&event).map_or(0, Vec::len)
    }

    /// Drops every handler, wildcard ones included
    pub fn clear(&mut self) {
        self.handlers.clear();
        self.wildcard.clear();
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<KanbanEvent, usize> = self
            .handlers
            .iter()
            .map(|(event, handlers)| (*event, handlers.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("handlers", &counts)
            .field("wildcard", &self.wildcard.len())
            .finish()
    }
}
