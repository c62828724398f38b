//! Observation hooks for fired and dispatched events.
//!
//! A [`LogHook`] is optional and absent by default, in which case the registry does no
//! observation work at all. When set, it is notified:
//! - once per [`fire_event`](crate::Registry::fire_event) call, before the binding lookup
//!   ([`LogHook::on_fired`])
//! - once per listener, immediately before its handler runs ([`LogHook::on_dispatched`])
//!
//! # Implementations
//!
//! | Hook | Output |
//! |------|--------|
//! | [`ConsoleHook`] | one line per notification on stdout or stderr |
//! | [`RecordHook`] | one `log` record per notification |
//! | [`ChannelHook`] | a [`HookMessage`] per notification over a crossbeam channel |

mod channel;
mod console;
mod record;

pub use channel::{ChannelHook, HookMessage};
pub use console::ConsoleHook;
pub use record::RecordHook;

use crate::contract::Handler;
use crate::event::Event;
use crate::listener::Subscriber;

/// Observer of registry traffic. Not part of routing state.
pub trait LogHook: Send + Sync {
    /// `event` was fired.
    fn on_fired(&self, event: &dyn Event);

    /// `event` is about to be handed to `listener` through `handler`.
    fn on_dispatched(&self, event: &dyn Event, listener: &Subscriber, handler: &Handler);
}

/// Line written for a fired event: `EventBus: fired 'RedEvent'`.
pub fn fired_line(event: &dyn Event) -> String {
    format!("EventBus: fired '{}'", short_name(event.event_name()))
}

/// Line written for a dispatch: `EventBus: dispatched 'RedEvent' to RedPanel@0x..->on_red()`.
pub fn dispatched_line(event: &dyn Event, listener: &Subscriber, handler: &Handler) -> String {
    format!(
        "EventBus: dispatched '{}' to {}@{}->{}()",
        short_name(event.event_name()),
        short_name(listener.type_name()),
        listener.id(),
        handler.name()
    )
}

/// Strip the module path from a type name, keeping any generic arguments as written.
pub fn short_name(type_name: &str) -> &str {
    let end = type_name.find('<').unwrap_or(type_name.len());
    let start = type_name[..end].rfind("::").map_or(0, |pos| pos + 2);
    &type_name[start..]
}
