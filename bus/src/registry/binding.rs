//! The per-event-type routing entry.

use std::any::TypeId;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::contract::{Handler, Resolution};
use crate::listener::{ListenerId, Subscriber};

/// An event type, the single handler it is routed through, and the listeners registered
/// for it.
///
/// The event type and handler never change after the binding is created; only the
/// listener list does. Listeners are kept in registration order and compared by identity.
pub struct Binding {
    event_type: TypeId,
    event_name: &'static str,
    handler: Handler,
    listeners: RwLock<Vec<Arc<Subscriber>>>,
}

impl Binding {
    pub(crate) fn new(resolution: &Resolution) -> Self {
        Self {
            event_type: resolution.event_type(),
            event_name: resolution.event_name(),
            handler: *resolution.handler(),
            listeners: RwLock::new(Vec::new()),
        }
    }

    #[inline]
    pub fn event_type(&self) -> TypeId {
        self.event_type
    }

    #[inline]
    pub fn event_name(&self) -> &'static str {
        self.event_name
    }

    #[inline]
    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    /// Snapshot of the current listeners, in dispatch order.
    pub fn listeners(&self) -> Vec<Arc<Subscriber>> {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|listener| listener.id() == id)
    }

    pub fn len(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append `subscriber` unless a listener with the same identity is already present.
    pub(crate) fn insert(&self, subscriber: Arc<Subscriber>) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        if listeners.iter().any(|listener| listener.id() == subscriber.id()) {
            return false;
        }
        listeners.push(subscriber);
        true
    }

    /// Remove the listener with identity `id`, if present.
    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        match listeners.iter().position(|listener| listener.id() == id) {
            Some(pos) => {
                // Keep registration order for the remaining listeners.
                listeners.remove(pos);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("event", &self.event_name)
            .field("handler", &self.handler)
            .field("listeners", &self.listeners())
            .finish()
    }
}
