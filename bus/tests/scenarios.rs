use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rusty_bus::{
    ChannelHook, DispatchPolicy, Error, Event, Handled, HookMessage, Listener, ListenerId,
    Registry, RegistryConfig, ValidationError, capability,
};

#[derive(Debug, Clone, PartialEq, Event)]
struct ColorEvent {
    color: String,
}

impl ColorEvent {
    fn new(color: &str) -> Self {
        Self {
            color: color.to_string(),
        }
    }
}

#[capability]
trait Paint: Listener {
    fn on_paint(&self, event: &ColorEvent) -> Handled;
}

#[capability]
trait Repaint: Listener {
    fn on_repaint(&self, event: ColorEvent);
}

#[capability]
trait Counted: Listener {
    fn on_count(&self, count: &String);
}

#[capability]
trait Answering: Listener {
    fn on_question(&self, event: &ColorEvent) -> bool;
}

#[derive(Default, Listener)]
#[listens(Paint)]
struct Canvas {
    received: Mutex<Vec<usize>>,
    calls: AtomicUsize,
    fail: bool,
}

impl Canvas {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Paint for Canvas {
    fn on_paint(&self, event: &ColorEvent) -> Handled {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received
            .lock()
            .unwrap()
            .push(event as *const ColorEvent as usize);
        if self.fail {
            return Err(format!("cannot paint {}", event.color).into());
        }
        Ok(())
    }
}

#[derive(Default, Listener)]
#[listens(Repaint)]
struct Copier {
    copies: Mutex<Vec<ColorEvent>>,
}

impl Repaint for Copier {
    fn on_repaint(&self, event: ColorEvent) {
        self.copies.lock().unwrap().push(event);
    }
}

#[derive(Listener)]
#[listens(Counted)]
struct Counter;

impl Counted for Counter {
    fn on_count(&self, _count: &String) {}
}

#[derive(Listener)]
#[listens(Answering)]
struct Oracle;

impl Answering for Oracle {
    fn on_question(&self, _event: &ColorEvent) -> bool {
        true
    }
}

#[capability]
trait Formatting: Listener {
    fn on_format(&self, event: &ColorEvent) -> std::fmt::Result;
}

#[derive(Listener)]
#[listens(Formatting)]
struct Formatter;

impl Formatting for Formatter {
    fn on_format(&self, _event: &ColorEvent) -> std::fmt::Result {
        Ok(())
    }
}

#[test]
fn delivers_the_fired_instance() {
    // Given
    let registry = Registry::new();
    let canvas = Arc::new(Canvas::default());
    registry.register_listeners(&canvas).unwrap();
    let event = ColorEvent::new("red");

    // When
    registry.fire_event(&event).unwrap();

    // Then
    assert_eq!(canvas.calls(), 1);
    assert_eq!(
        *canvas.received.lock().unwrap(),
        vec![&event as *const ColorEvent as usize]
    );
}

#[test]
fn firing_without_a_binding_is_an_error() {
    // Given
    let registry = Registry::new();

    // When
    let result = registry.fire_event(&ColorEvent::new("red"));

    // Then
    let Err(Error::Unregistered(err)) = result else {
        panic!("expected an unregistered event error");
    };
    assert!(err.event.ends_with("ColorEvent"));
    assert!(err.to_string().contains("does not have a registered listener"));
}

#[test]
fn unregistered_listener_is_not_invoked() {
    // Given
    let registry = Registry::new();
    let canvas = Arc::new(Canvas::default());
    registry.register_listeners(&canvas).unwrap();

    // When
    let removed = registry.unregister_listeners(&canvas);
    let result = registry.fire_event(&ColorEvent::new("red"));

    // Then
    assert_eq!(removed, 1);
    assert!(result.is_ok());
    assert_eq!(canvas.calls(), 0);
    assert_eq!(registry.listener_count::<ColorEvent>(), 0);
    assert!(registry.is_bound::<ColorEvent>());
}

#[test]
fn fail_fast_stops_at_the_first_failure() {
    // Given
    let registry = Registry::new();
    let first = Arc::new(Canvas::failing());
    let second = Arc::new(Canvas::default());
    registry.register_listeners(&first).unwrap();
    registry.register_listeners(&second).unwrap();

    // When
    let result = registry.fire_event(&ColorEvent::new("red"));

    // Then
    let Err(Error::Dispatch(err)) = result else {
        panic!("expected a dispatch error");
    };
    assert_eq!(err.listener, ListenerId::of(&first));
    assert_eq!(err.handler, "on_paint");
    assert_eq!(err.source.to_string(), "cannot paint red");
    assert_eq!(first.calls(), 1);
    assert_eq!(second.calls(), 0);
}

#[test]
fn collect_policy_reaches_every_listener() {
    // Given
    let registry = Registry::with_config(RegistryConfig::with_policy(DispatchPolicy::Collect));
    let first = Arc::new(Canvas::failing());
    let second = Arc::new(Canvas::default());
    let third = Arc::new(Canvas::failing());
    for canvas in [&first, &second, &third] {
        registry.register_listeners(canvas).unwrap();
    }

    // When
    let err = registry.fire_event(&ColorEvent::new("blue")).unwrap_err();

    // Then
    let failed: Vec<ListenerId> = err.dispatch_failures().iter().map(|f| f.listener).collect();
    assert_eq!(failed, vec![ListenerId::of(&first), ListenerId::of(&third)]);
    assert_eq!(second.calls(), 1);
}

#[test]
fn listeners_run_in_registration_order() {
    // Given
    let registry = Registry::new();
    let (hook, receiver) = ChannelHook::with_receiver();
    registry.set_log_hook(hook);
    let canvases: Vec<Arc<Canvas>> = (0..4).map(|_| Arc::new(Canvas::default())).collect();
    for canvas in &canvases {
        registry.register_listeners(canvas).unwrap();
    }

    // When
    registry.fire_event(&ColorEvent::new("red")).unwrap();

    // Then
    let order: Vec<ListenerId> = receiver
        .try_iter()
        .filter_map(|message| match message {
            HookMessage::Dispatched { listener, .. } => Some(listener),
            HookMessage::Fired { .. } => None,
        })
        .collect();
    let expected: Vec<ListenerId> = canvases.iter().map(ListenerId::of).collect();
    assert_eq!(order, expected);
}

#[test]
fn non_event_argument_is_rejected() {
    // Given
    let registry = Registry::new();

    // When
    let result = registry.register_listeners(&Arc::new(Counter));

    // Then
    let Err(Error::Validation(ValidationError::NonEventArgument { method, found, .. })) = result
    else {
        panic!("expected a non-event argument error");
    };
    assert_eq!(method, "on_count");
    assert!(found.ends_with("String"));
    assert_eq!(registry.binding_count(), 0);
}

#[test]
fn non_void_return_is_rejected() {
    // Given
    let registry = Registry::new();

    // When
    let result = registry.register_listeners(&Arc::new(Oracle));

    // Then
    let Err(Error::Validation(ValidationError::NonVoidReturn { method, found, .. })) = result
    else {
        panic!("expected a non-void return error");
    };
    assert_eq!(method, "on_question");
    assert_eq!(found, "bool");
    assert!(!registry.is_bound::<ColorEvent>());
}

#[test]
fn result_alias_without_arguments_counts_as_non_void() {
    // Given
    let registry = Registry::new();

    // When
    let result = registry.register_listeners(&Arc::new(Formatter));

    // Then
    let Err(Error::Validation(ValidationError::NonVoidReturn { method, found, .. })) = result
    else {
        panic!("expected a non-void return error");
    };
    assert_eq!(method, "on_format");
    assert!(found.ends_with("Result"));
    assert!(!registry.is_bound::<ColorEvent>());
}

#[test]
fn by_value_handler_receives_a_copy() {
    // Given
    let registry = Registry::new();
    let copier = Arc::new(Copier::default());
    registry.register_listeners(&copier).unwrap();
    let event = ColorEvent::new("green");

    // When
    registry.fire_event(&event).unwrap();

    // Then
    assert_eq!(*copier.copies.lock().unwrap(), vec![event]);
}

#[test]
fn competing_contract_for_a_bound_event_conflicts() {
    // Given
    let registry = Registry::new();
    registry
        .register_listeners(&Arc::new(Canvas::default()))
        .unwrap();

    // When
    let result = registry.register_listeners(&Arc::new(Copier::default()));

    // Then
    let Err(Error::Conflict(err)) = result else {
        panic!("expected a conflict error");
    };
    assert_eq!(err.bound_handler, "on_paint");
    assert_eq!(err.requested_handler, "on_repaint");
    assert_eq!(registry.listener_count::<ColorEvent>(), 1);
}

#[test]
fn describe_lists_bound_listeners() {
    // Given
    let registry = Registry::new();
    let canvas = Arc::new(Canvas::default());
    registry.register_listeners(&canvas).unwrap();

    // When
    let text = registry.describe();

    // Then
    assert!(text.starts_with("Registry@0x"));
    assert!(text.contains("  EVENT: "));
    assert!(text.contains("ColorEvent"));
    assert!(text.contains(&format!("Canvas@{}", ListenerId::of(&canvas))));
}
