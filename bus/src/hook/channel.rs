use crossbeam::channel::{Receiver, Sender, unbounded};

use crate::contract::Handler;
use crate::event::Event;
use crate::hook::LogHook;
use crate::listener::{ListenerId, Subscriber};

/// A single notification, as delivered by [`ChannelHook`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookMessage {
    Fired {
        event: &'static str,
    },
    Dispatched {
        event: &'static str,
        listener: ListenerId,
        listener_type: &'static str,
        handler: &'static str,
    },
}

/// Forwards notifications over a crossbeam channel.
///
/// Sends never block; once the receiver is gone, notifications are dropped.
pub struct ChannelHook {
    sender: Sender<HookMessage>,
}

impl ChannelHook {
    pub fn new(sender: Sender<HookMessage>) -> Self {
        Self { sender }
    }

    pub fn with_receiver() -> (Self, Receiver<HookMessage>) {
        let (sender, receiver) = unbounded();
        (Self::new(sender), receiver)
    }
}

impl LogHook for ChannelHook {
    fn on_fired(&self, event: &dyn Event) {
        let _ = self.sender.try_send(HookMessage::Fired {
            event: event.event_name(),
        });
    }

    fn on_dispatched(&self, event: &dyn Event, listener: &Subscriber, handler: &Handler) {
        let _ = self.sender.try_send(HookMessage::Dispatched {
            event: event.event_name(),
            listener: listener.id(),
            listener_type: listener.type_name(),
            handler: handler.name(),
        });
    }
}
