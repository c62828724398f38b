//! Capability contracts and their structural validation.
//!
//! A capability contract is a narrow trait declaring interest in exactly one event type
//! through exactly one handler method. The registry never inspects a trait directly.
//! Instead each contract publishes a [`Contract`] descriptor through the [`Capability`]
//! trait, and [`validate_and_extract`] turns that descriptor into a [`Resolution`]: the
//! bound event type plus a callable [`Handler`].
//!
//! # Describing a contract
//!
//! The `#[capability]` attribute writes the descriptor for you:
//!
//! ```rust,ignore
//! use rusty_bus::{Handled, Listener, capability};
//!
//! #[capability]
//! pub trait Paint: Listener {
//!     fn on_paint(&self, event: &ColorEvent) -> Handled;
//! }
//! ```
//!
//! Descriptors can also be assembled by hand, which is how a startup-time registration
//! table is expressed:
//!
//! ```rust,ignore
//! impl Capability for dyn Paint {
//!     fn contract() -> Contract {
//!         Contract::of::<dyn Paint>().method(
//!             Method::new("on_paint")
//!                 .returns(Output::Fallible)
//!                 .param(Param::event::<ColorEvent>())
//!                 .invoke(|listener, event| { /* downcast and call */ }),
//!         )
//!     }
//! }
//! ```
//!
//! # Validation rules
//!
//! Checked in order, each producing its own [`ValidationError`] variant:
//! 1. exactly one abstract method
//! 2. the method produces no value (`()` or [`Handled`])
//! 3. the method takes exactly one argument besides the receiver
//! 4. that argument is an [`Event`]
//!
//! A method passing all four but carrying no invoker is reported as not dispatchable.

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

use crate::error::ValidationError;
use crate::event::Event;

/// Error raised by a listener's handler.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Return type for fallible handlers.
pub type Handled = Result<(), ListenerError>;

/// Erased handler call: the listener handle (an `Arc<dyn Contract>`) and the event.
pub type Invoke = fn(&(dyn Any + Send + Sync), &dyn Event) -> Handled;

/// Implemented for `dyn Contract` of every capability trait.
///
/// Only traits that extend [`Listener`](crate::Listener) can be annotated with
/// `#[capability]`, so a contract without the listener marker never reaches the registry.
pub trait Capability: 'static {
    /// The structural descriptor of this contract.
    fn contract() -> Contract;
}

/// What a handler method produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Returns nothing.
    Unit,
    /// Returns [`Handled`]: nothing on success, a [`ListenerError`] on failure.
    Fallible,
    /// Returns a value, named by its type.
    Value(&'static str),
}

impl Output {
    /// `true` if the method produces no value.
    #[inline]
    pub fn is_void(&self) -> bool {
        matches!(self, Output::Unit | Output::Fallible)
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Unit => write!(f, "()"),
            Output::Fallible => write!(f, "Handled"),
            Output::Value(name) => write!(f, "{name}"),
        }
    }
}

/// A single handler parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    type_id: TypeId,
    type_name: &'static str,
    is_event: bool,
}

impl Param {
    /// A parameter of event type `E`.
    #[inline]
    pub fn event<E: Event>() -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            type_name: std::any::type_name::<E>(),
            is_event: true,
        }
    }

    /// A parameter of some non-event type.
    #[inline]
    pub fn plain<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            is_event: false,
        }
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn is_event(&self) -> bool {
        self.is_event
    }
}

/// One abstract method of a contract.
#[derive(Clone)]
pub struct Method {
    name: &'static str,
    output: Output,
    params: Vec<Param>,
    invoke: Option<Invoke>,
}

impl Method {
    /// A method with no parameters returning `()`.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            output: Output::Unit,
            params: Vec::new(),
            invoke: None,
        }
    }

    /// Set the output shape.
    pub fn returns(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    /// Append a parameter.
    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Attach the erased call used at dispatch time.
    pub fn invoke(mut self, invoke: Invoke) -> Self {
        self.invoke = Some(invoke);
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn output(&self) -> Output {
        self.output
    }

    #[inline]
    pub fn params(&self) -> &[Param] {
        &self.params
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("output", &self.output)
            .field("params", &self.params)
            .field("invokable", &self.invoke.is_some())
            .finish()
    }
}

/// Structural descriptor of a capability contract.
#[derive(Debug, Clone)]
pub struct Contract {
    id: TypeId,
    name: &'static str,
    methods: Vec<Method>,
}

impl Contract {
    /// An empty descriptor identified by the contract type `C` (usually `dyn Trait`).
    pub fn of<C: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<C>(),
            name: std::any::type_name::<C>(),
            methods: Vec::new(),
        }
    }

    /// Append an abstract method.
    pub fn method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }
}

/// The handler a binding invokes on each of its listeners.
#[derive(Clone, Copy)]
pub struct Handler {
    contract_id: TypeId,
    contract: &'static str,
    name: &'static str,
    invoke: Invoke,
}

impl Handler {
    /// Name of the contract the handler belongs to.
    #[inline]
    pub fn contract(&self) -> &'static str {
        self.contract
    }

    /// Name of the handler method.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Two handlers are the same route if they come from the same contract and method.
    #[inline]
    pub fn same_route(&self, other: &Handler) -> bool {
        self.contract_id == other.contract_id && self.name == other.name
    }

    #[inline]
    pub(crate) fn call(&self, listener: &(dyn Any + Send + Sync), event: &dyn Event) -> Handled {
        (self.invoke)(listener, event)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}()", self.contract, self.name)
    }
}

/// A validated contract: the event type it binds and the handler to call.
#[derive(Debug, Clone, Copy)]
pub struct Resolution {
    event: Param,
    handler: Handler,
}

impl Resolution {
    #[inline]
    pub fn event_type(&self) -> TypeId {
        self.event.type_id()
    }

    #[inline]
    pub fn event_name(&self) -> &'static str {
        self.event.type_name()
    }

    #[inline]
    pub fn handler(&self) -> &Handler {
        &self.handler
    }
}

/// Validate a contract descriptor and extract its event type and handler.
pub fn validate_and_extract(contract: &Contract) -> Result<Resolution, ValidationError> {
    let [method] = contract.methods() else {
        return Err(ValidationError::MethodCount {
            contract: contract.name(),
            found: contract.methods().len(),
        });
    };

    if !method.output().is_void() {
        return Err(ValidationError::NonVoidReturn {
            contract: contract.name(),
            method: method.name(),
            found: method.output().to_string(),
        });
    }

    let [param] = method.params() else {
        return Err(ValidationError::ArgumentCount {
            contract: contract.name(),
            method: method.name(),
            found: method.params().len(),
        });
    };

    if !param.is_event() {
        return Err(ValidationError::NonEventArgument {
            contract: contract.name(),
            method: method.name(),
            found: param.type_name(),
        });
    }

    let invoke = method.invoke.ok_or(ValidationError::NotDispatchable {
        contract: contract.name(),
        method: method.name(),
    })?;

    Ok(Resolution {
        event: *param,
        handler: Handler {
            contract_id: contract.id(),
            contract: contract.name(),
            name: method.name(),
            invoke,
        },
    })
}

/// Error returned by generated invokers when a handle or event has an unexpected type.
#[doc(hidden)]
pub fn mismatch(contract: &'static str, expected: &'static str) -> ListenerError {
    format!("{contract}: dispatch received a value that is not {expected}").into()
}

/// Autoref probe used by `#[capability]` to tell event parameters from plain ones.
///
/// `(&Probe::<T>::new()).param()` resolves to [`ViaEvent`] when `T: Event` and falls back
/// to [`ViaPlain`] otherwise, so a non-event parameter is reported by validation instead
/// of failing to compile.
#[doc(hidden)]
pub struct Probe<T: ?Sized>(PhantomData<fn() -> *const T>);

impl<T: ?Sized> Probe<T> {
    #[inline]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: ?Sized> Default for Probe<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[doc(hidden)]
pub trait ViaEvent {
    fn param(&self) -> Param;
}

impl<T: Event> ViaEvent for Probe<T> {
    #[inline]
    fn param(&self) -> Param {
        Param::event::<T>()
    }
}

#[doc(hidden)]
pub trait ViaPlain {
    fn param(&self) -> Param;
}

impl<T: ?Sized + 'static> ViaPlain for &Probe<T> {
    #[inline]
    fn param(&self) -> Param {
        Param::plain::<T>()
    }
}
