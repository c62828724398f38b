//! The root event marker.
//!
//! Every value broadcast through a [`Registry`](crate::Registry) implements [`Event`].
//! Events are immutable facts and are routed purely by their concrete type: the registry
//! never looks at the payload.
//!
//! # Example
//!
//! ```rust,ignore
//! use rusty_bus::Event;
//!
//! #[derive(Debug, Event)]
//! struct ColorEvent {
//!     color: &'static str,
//! }
//! ```

use std::any::{Any, TypeId};
use std::fmt;

/// Marker trait for event types.
///
/// Events must be:
/// - `'static`: Routing is keyed by `TypeId`
/// - `Send + Sync`: A registry may be shared across threads
/// - `Debug`: For diagnostics and logging
///
/// Use `#[derive(Event)]` rather than implementing this by hand.
pub trait Event: Any + Send + Sync + fmt::Debug + 'static {
    /// Downcast support for handlers receiving the event through `&dyn Event`.
    fn as_any(&self) -> &dyn Any;

    /// Full type name of the concrete event.
    fn event_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl dyn Event {
    /// The exact runtime type of this event. Never the type of a wrapper or supertype.
    #[inline]
    pub fn event_type(&self) -> TypeId {
        self.as_any().type_id()
    }

    /// Attempt to view the event as a concrete `E`.
    #[inline]
    pub fn downcast_ref<E: Event>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, crate::Event)]
    struct Ping(u32);

    #[derive(Debug, crate::Event)]
    struct Pong;

    #[test]
    fn event_type_is_the_concrete_type() {
        // Given
        let ping = Ping(1);
        let event: &dyn Event = &ping;

        // Then
        assert_eq!(event.event_type(), TypeId::of::<Ping>());
        assert_ne!(event.event_type(), TypeId::of::<Pong>());
    }

    #[test]
    fn event_name_is_the_full_type_name() {
        let event: &dyn Event = &Pong;
        assert!(event.event_name().ends_with("::Pong"));
    }

    #[test]
    fn downcast_to_concrete() {
        // Given
        let event: &dyn Event = &Ping(7);

        // When
        let ping = event.downcast_ref::<Ping>();
        let pong = event.downcast_ref::<Pong>();

        // Then
        assert_eq!(ping.map(|p| p.0), Some(7));
        assert!(pong.is_none());
    }
}
