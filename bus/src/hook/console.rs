use std::io::Write;

use crate::contract::Handler;
use crate::event::Event;
use crate::hook::{LogHook, dispatched_line, fired_line};
use crate::listener::Subscriber;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Writes one line per notification to a console stream.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleHook {
    stream: Stream,
}

impl ConsoleHook {
    pub const fn stdout() -> Self {
        Self {
            stream: Stream::Stdout,
        }
    }

    pub const fn stderr() -> Self {
        Self {
            stream: Stream::Stderr,
        }
    }

    fn write_line(&self, line: &str) {
        // A closed console must not fail dispatch.
        let _ = match self.stream {
            Stream::Stdout => writeln!(std::io::stdout().lock(), "{line}"),
            Stream::Stderr => writeln!(std::io::stderr().lock(), "{line}"),
        };
    }
}

impl Default for ConsoleHook {
    fn default() -> Self {
        Self::stdout()
    }
}

impl LogHook for ConsoleHook {
    fn on_fired(&self, event: &dyn Event) {
        self.write_line(&fired_line(event));
    }

    fn on_dispatched(&self, event: &dyn Event, listener: &Subscriber, handler: &Handler) {
        self.write_line(&dispatched_line(event, listener, handler));
    }
}
