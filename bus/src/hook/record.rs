use log::{Level, log};

use crate::contract::Handler;
use crate::event::Event;
use crate::hook::{LogHook, dispatched_line, fired_line};
use crate::listener::Subscriber;

/// Target used for every record emitted by [`RecordHook`].
pub const TARGET: &str = "rusty_bus::dispatch";

/// Emits each notification as a `log` record, for applications with a logger installed.
#[derive(Debug, Clone, Copy)]
pub struct RecordHook {
    level: Level,
}

impl RecordHook {
    pub const fn new(level: Level) -> Self {
        Self { level }
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }
}

impl Default for RecordHook {
    fn default() -> Self {
        Self::new(Level::Debug)
    }
}

impl LogHook for RecordHook {
    fn on_fired(&self, event: &dyn Event) {
        log!(target: TARGET, self.level, "{}", fired_line(event));
    }

    fn on_dispatched(&self, event: &dyn Event, listener: &Subscriber, handler: &Handler) {
        log!(target: TARGET, self.level, "{}", dispatched_line(event, listener, handler));
    }
}
