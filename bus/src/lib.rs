//! # rusty_bus
//!
//! An in-process, type-routed publish/subscribe dispatcher. Producers fire immutable
//! [`Event`] values; consumers register interest through narrow single-method capability
//! contracts; the [`Registry`] routes each fired event to every registered listener whose
//! contract matches the event's concrete type.
//!
//! ## Architecture
//! ```text
//!   register_listeners(&listener)
//!            │
//!            ▼
//!   ┌──────────────────────┐   Listener::capabilities()
//!   │ discover_capabilities│ ─────────────────────────► [dyn Paint, dyn Reset, ...]
//!   └──────────┬───────────┘
//!              ▼ per contract
//!   ┌──────────────────────┐   miss: Capability::contract()
//!   │    BindingCache      │ ─────────────────────────► validate_and_extract()
//!   └──────────┬───────────┘
//!              ▼ (event type, handler)
//!   ┌──────────────────────────────────────────────────┐
//!   │ Registry: event TypeId ──► Binding               │
//!   │           (handler + listeners in reg. order)    │
//!   └──────────┬───────────────────────────────────────┘
//!              ▲
//!   fire_event(&event) ── LogHook::on_fired ── lookup by exact type
//!              │
//!              └─► for each listener: LogHook::on_dispatched, handler(listener, event)
//! ```
//!
//! ## Features
//! | Area | Description | Key types |
//! |------|-------------|-----------|
//! | **Events** | Marker for routable values | [`Event`], `#[derive(Event)]` |
//! | **Contracts** | Single-handler capability traits | [`Capability`], [`Contract`], `#[capability]` |
//! | **Listeners** | Consumers and their discovered capabilities | [`Listener`], [`Capabilities`], `#[derive(Listener)]` |
//! | **Routing** | Registration, dispatch, diagnostics | [`Registry`], [`Binding`] |
//! | **Observation** | Optional fire/dispatch hooks | [`LogHook`], [`ConsoleHook`], [`RecordHook`], [`ChannelHook`] |
//! | **Errors** | Validation, conflict, unregistered and dispatch failures | [`Error`] |
//!
//! ## Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use rusty_bus::{Event, Handled, Listener, Registry, capability};
//!
//! #[derive(Debug, Event)]
//! struct RedEvent;
//!
//! #[capability]
//! trait RedEventListener: Listener {
//!     fn on_red(&self, event: &RedEvent) -> Handled;
//! }
//!
//! #[derive(Listener)]
//! #[listens(RedEventListener)]
//! struct RedPanel;
//!
//! impl RedEventListener for RedPanel {
//!     fn on_red(&self, _event: &RedEvent) -> Handled {
//!         Ok(())
//!     }
//! }
//!
//! let registry = Registry::new();
//! registry.register_listeners(&Arc::new(RedPanel))?;
//! registry.fire_event(&RedEvent)?;
//! ```

extern crate self as rusty_bus;

mod cache;
pub mod contract;
pub mod error;
pub mod event;
pub mod hook;
pub mod listener;
pub mod logger;
pub mod registry;

pub use contract::{
    Capability, Contract, Handled, Handler, ListenerError, Method, Output, Param, Resolution,
    validate_and_extract,
};
pub use error::{
    ConflictError, DispatchError, Error, Result, UnregisteredEventError, ValidationError,
};
pub use event::Event;
pub use hook::{ChannelHook, ConsoleHook, HookMessage, LogHook, RecordHook};
pub use listener::{Capabilities, Listener, ListenerId, Subscriber, discover_capabilities};
pub use registry::{Binding, DispatchPolicy, Registry, RegistryConfig};

pub use rusty_bus_macros::{Event, Listener, capability};

#[doc(hidden)]
pub mod __private {
    pub use crate::contract::{Probe, ViaEvent, ViaPlain, mismatch};
}
