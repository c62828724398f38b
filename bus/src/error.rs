//! Registry error model.
//!
//! Every failure is surfaced to the caller; the registry never retries. Validation and
//! conflict errors are raised at registration time, so a malformed or competing contract
//! is rejected before any event is fired. Unregistered-event and dispatch errors are raised
//! by [`Registry::fire_event`](crate::Registry::fire_event).

use thiserror::Error;

use crate::contract::{Handler, ListenerError};
use crate::listener::{ListenerId, Subscriber};

/// Result type used across the registry.
pub type Result<T> = std::result::Result<T, Error>;

/// A capability contract does not have the shape the registry can route.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("event listener {contract} must have a single method, found {found}")]
    MethodCount { contract: &'static str, found: usize },

    #[error("event listener {contract}.{method}() must return void, found {found}")]
    NonVoidReturn {
        contract: &'static str,
        method: &'static str,
        found: String,
    },

    #[error("event listener {contract}.{method}() must have a single argument, found {found}")]
    ArgumentCount {
        contract: &'static str,
        method: &'static str,
        found: usize,
    },

    #[error("event listener {contract}.{method}() must have an argument of Event type, found {found}")]
    NonEventArgument {
        contract: &'static str,
        method: &'static str,
        found: &'static str,
    },

    #[error("event listener {contract}.{method}() has no dispatch entry")]
    NotDispatchable {
        contract: &'static str,
        method: &'static str,
    },
}

/// Two different contract/handler pairs claim the same event type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("event {event} is already routed through {bound}::{bound_handler}(), cannot route it through {requested}::{requested_handler}()")]
pub struct ConflictError {
    pub event: &'static str,
    pub bound: &'static str,
    pub bound_handler: &'static str,
    pub requested: &'static str,
    pub requested_handler: &'static str,
}

impl ConflictError {
    pub(crate) fn new(event: &'static str, bound: &Handler, requested: &Handler) -> Self {
        Self {
            event,
            bound: bound.contract(),
            bound_handler: bound.name(),
            requested: requested.contract(),
            requested_handler: requested.name(),
        }
    }
}

/// An event was fired whose exact type was never bound.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("event {event} does not have a registered listener")]
pub struct UnregisteredEventError {
    pub event: &'static str,
}

/// A listener's handler failed.
#[derive(Debug, Error)]
#[error("failed to dispatch event {event} to listener {listener_type}@{listener} via {handler}()")]
pub struct DispatchError {
    pub event: &'static str,
    pub listener: ListenerId,
    pub listener_type: &'static str,
    pub handler: &'static str,
    #[source]
    pub source: ListenerError,
}

impl DispatchError {
    pub(crate) fn new(
        event: &'static str,
        subscriber: &Subscriber,
        handler: &Handler,
        source: ListenerError,
    ) -> Self {
        Self {
            event,
            listener: subscriber.id(),
            listener_type: subscriber.type_name(),
            handler: handler.name(),
            source,
        }
    }
}

/// Any registry failure.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    Unregistered(#[from] UnregisteredEventError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Every failure of one fire call under [`DispatchPolicy::Collect`](crate::DispatchPolicy::Collect).
    #[error("{} listener(s) failed", .0.len())]
    DispatchAll(Vec<DispatchError>),
}

impl Error {
    /// The dispatch failures carried by this error, if any.
    pub fn dispatch_failures(&self) -> &[DispatchError] {
        match self {
            Error::Dispatch(err) => std::slice::from_ref(err),
            Error::DispatchAll(errs) => errs,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_message_names_both_routes() {
        // Given
        let err = ConflictError {
            event: "ColorEvent",
            bound: "Paint",
            bound_handler: "on_paint",
            requested: "Tint",
            requested_handler: "on_tint",
        };

        // Then
        assert_eq!(
            err.to_string(),
            "event ColorEvent is already routed through Paint::on_paint(), cannot route it through Tint::on_tint()"
        );
    }

    #[test]
    fn unregistered_message() {
        let err = Error::from(UnregisteredEventError { event: "ColorEvent" });
        assert_eq!(err.to_string(), "event ColorEvent does not have a registered listener");
        assert!(err.dispatch_failures().is_empty());
    }

    #[test]
    fn dispatch_error_keeps_its_source() {
        // Given
        let err = DispatchError {
            event: "ColorEvent",
            listener: ListenerId::from_addr(0x10),
            listener_type: "Panel",
            handler: "on_paint",
            source: "boom".into(),
        };

        // When
        let source = std::error::Error::source(&err).map(|s| s.to_string());

        // Then
        assert_eq!(source.as_deref(), Some("boom"));
        assert_eq!(
            err.to_string(),
            "failed to dispatch event ColorEvent to listener Panel@0x10 via on_paint()"
        );
    }
}
