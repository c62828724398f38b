//! Central registry and dispatcher for all event bindings.
//!
//! This module provides [`Registry`], which owns the mapping from event type to
//! [`Binding`] and routes every fired event to the listeners of that binding.
//!
//! # Overview
//!
//! - **Registration**: a listener's capability contracts are discovered, validated (once
//!   per contract, through the binding cache) and bound to their event types
//! - **Routing**: an event type is routed through exactly one contract/handler pair for
//!   the registry's lifetime; a second, different pair is a [`ConflictError`]
//! - **Dispatch**: [`fire_event()`](Registry::fire_event) looks up the binding for the
//!   event's exact type and invokes its handler on each listener, synchronously, in
//!   registration order
//!
//! # Type Erasure
//!
//! Bindings are stored in creation order and indexed by event `TypeId` in a sharded
//! concurrent map. Listeners are held as `Arc<dyn Contract>` handles behind `dyn Any`; the
//! handler downcasts them back at dispatch time.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use rusty_bus::{ConsoleHook, Event, Handled, Listener, Registry, capability};
//!
//! #[derive(Debug, Event)]
//! struct ColorEvent { color: &'static str }
//!
//! #[capability]
//! trait Paint: Listener {
//!     fn on_paint(&self, event: &ColorEvent) -> Handled;
//! }
//!
//! #[derive(Listener)]
//! #[listens(Paint)]
//! struct Canvas;
//!
//! impl Paint for Canvas {
//!     fn on_paint(&self, event: &ColorEvent) -> Handled {
//!         println!("painting {}", event.color);
//!         Ok(())
//!     }
//! }
//!
//! let registry = Registry::new();
//! let canvas = Arc::new(Canvas);
//! registry.set_log_hook(ConsoleHook::stdout()).register_listeners(&canvas)?;
//! registry.fire_event(&ColorEvent { color: "red" })?;
//! ```
//!
//! # Thread Safety
//!
//! `Registry` is `Send + Sync`. No registry lock is held while handlers run, so a handler
//! may fire further events or register and unregister listeners. The listener list is
//! snapshotted when dispatch starts: such changes apply from the next fire call.

mod binding;
mod config;

pub use binding::Binding;
pub use config::{DispatchPolicy, RegistryConfig};

use std::any::TypeId;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use dashmap::DashMap;
use log::debug;

use crate::cache::BindingCache;
use crate::contract::Resolution;
use crate::error::{ConflictError, DispatchError, Error, Result, UnregisteredEventError};
use crate::event::Event;
use crate::hook::LogHook;
use crate::listener::{Listener, ListenerId, Subscriber, discover_capabilities};

/// Routes fired events to the listeners registered for their exact type.
pub struct Registry {
    config: RegistryConfig,

    /// Validated contracts, keyed by contract type.
    cache: BindingCache,

    /// Event type to slot in `bindings`. Lock-free reads.
    index: DashMap<TypeId, usize>,

    /// Every binding ever created, in creation order. Never shrinks.
    bindings: RwLock<Vec<Arc<Binding>>>,

    hook: RwLock<Option<Arc<dyn LogHook>>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates a new, empty registry with fail-fast dispatch and no log hook.
    #[inline]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            cache: BindingCache::new(),
            index: DashMap::new(),
            bindings: RwLock::new(Vec::new()),
            hook: RwLock::new(None),
        }
    }

    /// The process-wide registry.
    ///
    /// Created on first use; concurrent first callers all observe the same instance.
    /// Prefer an explicitly constructed registry passed to its collaborators.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::new)
    }

    #[inline]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Install `hook`, replacing any previous one.
    pub fn set_log_hook<H: LogHook + 'static>(&self, hook: H) -> &Self {
        self.set_shared_log_hook(Arc::new(hook))
    }

    /// Install a hook that is shared with other owners.
    pub fn set_shared_log_hook(&self, hook: Arc<dyn LogHook>) -> &Self {
        *self.hook.write().unwrap_or_else(PoisonError::into_inner) = Some(hook);
        self
    }

    /// Remove the log hook, if any.
    pub fn clear_log_hook(&self) -> &Self {
        *self.hook.write().unwrap_or_else(PoisonError::into_inner) = None;
        self
    }

    /// Register `listener` under every capability contract it implements.
    ///
    /// Registration is all-or-nothing: every contract is validated and checked for
    /// routing conflicts before any binding is touched. Registering an instance that is
    /// already present is a no-op.
    ///
    /// Returns the number of bindings the listener was newly added to.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if a contract is malformed
    /// - [`Error::Conflict`] if a contract's event type is already routed through a
    ///   different contract or handler, or two of the listener's contracts claim the same
    ///   event type
    pub fn register_listeners<L: Listener + ?Sized>(&self, listener: &Arc<L>) -> Result<usize> {
        let caps = discover_capabilities(listener);
        let owner = caps.owner();
        let type_name = L::type_name(listener);

        let mut planned: Vec<(Arc<Resolution>, Arc<Subscriber>)> = Vec::with_capacity(caps.len());
        for offer in caps.into_offers() {
            let resolution = self.cache.resolve(offer.contract_id, offer.describe)?;
            if let Some((other, _)) = planned
                .iter()
                .find(|(seen, _)| seen.event_type() == resolution.event_type())
            {
                return Err(ConflictError::new(
                    resolution.event_name(),
                    other.handler(),
                    resolution.handler(),
                )
                .into());
            }
            planned.push((resolution, offer.subscriber));
        }

        // Conflicts are checked and bindings created under one write lock, so two
        // registrations cannot both claim a fresh event type.
        let mut bindings = self.write_bindings();
        for (resolution, _) in &planned {
            if let Some(existing) = self.lookup(&bindings, resolution.event_type())
                && !existing.handler().same_route(resolution.handler())
            {
                return Err(ConflictError::new(
                    resolution.event_name(),
                    existing.handler(),
                    resolution.handler(),
                )
                .into());
            }
        }

        let mut added = 0;
        for (resolution, subscriber) in planned {
            let binding = match self.lookup(&bindings, resolution.event_type()) {
                Some(binding) => binding,
                None => {
                    let binding = Arc::new(Binding::new(&resolution));
                    bindings.push(Arc::clone(&binding));
                    self.index.insert(resolution.event_type(), bindings.len() - 1);
                    debug!(
                        "bound {} to {:?}",
                        resolution.event_name(),
                        resolution.handler()
                    );
                    binding
                }
            };
            if binding.insert(subscriber) {
                added += 1;
            }
        }

        debug!("registered {type_name}@{owner} with {added} new binding(s)");
        Ok(added)
    }

    /// Remove `listener` from every binding it is registered with.
    ///
    /// Absent listeners are not an error. Bindings stay in place even when they become
    /// empty. Returns the number of bindings the listener was removed from.
    pub fn unregister_listeners<L: ?Sized>(&self, listener: &Arc<L>) -> usize {
        let id = ListenerId::of(listener);
        let removed = self
            .read_bindings()
            .iter()
            .filter(|binding| binding.remove(id))
            .count();
        if removed > 0 {
            debug!(
                "unregistered {}@{} from {} binding(s)",
                std::any::type_name::<L>(),
                id,
                removed
            );
        }
        removed
    }

    /// Deliver `event` to every listener bound to its exact type.
    ///
    /// # Errors
    ///
    /// - [`Error::Unregistered`] if no binding exists for the event's exact type, even
    ///   if some compatible contract exists but was never registered
    /// - [`Error::Dispatch`] for the first failing handler under
    ///   [`DispatchPolicy::FailFast`]; later listeners are not invoked
    /// - [`Error::DispatchAll`] with every failure under [`DispatchPolicy::Collect`]
    pub fn fire_event(&self, event: &dyn Event) -> Result<()> {
        let hook = self.hook();
        if let Some(hook) = &hook {
            hook.on_fired(event);
        }

        let binding = self
            .binding_of(event.event_type())
            .ok_or(UnregisteredEventError {
                event: event.event_name(),
            })?;

        let handler = binding.handler();
        let mut failures = Vec::new();
        for listener in binding.listeners() {
            if let Some(hook) = &hook {
                hook.on_dispatched(event, &listener, handler);
            }
            if let Err(source) = handler.call(listener.handle(), event) {
                let err = DispatchError::new(event.event_name(), &listener, handler, source);
                match self.config.policy {
                    DispatchPolicy::FailFast => return Err(err.into()),
                    DispatchPolicy::Collect => failures.push(err),
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::DispatchAll(failures))
        }
    }

    /// Diagnostic listing of every binding and its listeners.
    pub fn describe(&self) -> String {
        self.to_string()
    }

    /// The binding for event type `E`, if one was ever created.
    pub fn binding<E: Event>(&self) -> Option<Arc<Binding>> {
        self.binding_of(TypeId::of::<E>())
    }

    #[inline]
    pub fn is_bound<E: Event>(&self) -> bool {
        self.index.contains_key(&TypeId::of::<E>())
    }

    /// Number of listeners currently registered for `E`.
    pub fn listener_count<E: Event>(&self) -> usize {
        self.binding::<E>().map_or(0, |binding| binding.len())
    }

    #[inline]
    pub fn binding_count(&self) -> usize {
        self.read_bindings().len()
    }

    /// `true` if contract `C` has been validated by this registry.
    #[inline]
    pub fn is_resolved<C: ?Sized + 'static>(&self) -> bool {
        self.cache.contains(TypeId::of::<C>())
    }

    /// Number of distinct contracts validated so far.
    #[inline]
    pub fn resolved_count(&self) -> usize {
        self.cache.len()
    }

    fn binding_of(&self, event_type: TypeId) -> Option<Arc<Binding>> {
        let slot = self.index.get(&event_type).map(|slot| *slot)?;
        self.read_bindings().get(slot).cloned()
    }

    fn lookup(&self, bindings: &[Arc<Binding>], event_type: TypeId) -> Option<Arc<Binding>> {
        let slot = self.index.get(&event_type).map(|slot| *slot)?;
        bindings.get(slot).cloned()
    }

    fn hook(&self) -> Option<Arc<dyn LogHook>> {
        self.hook
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn read_bindings(&self) -> RwLockReadGuard<'_, Vec<Arc<Binding>>> {
        self.bindings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_bindings(&self) -> RwLockWriteGuard<'_, Vec<Arc<Binding>>> {
        self.bindings.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Display for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Registry@{:#x}", self as *const Self as usize)?;
        for binding in self.read_bindings().iter() {
            writeln!(f, "  EVENT: {}", binding.event_name())?;
            for listener in binding.listeners() {
                writeln!(f, "    LISTENER: {}@{}", listener.type_name(), listener.id())?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("config", &self.config)
            .field("bindings", &self.binding_count())
            .field("hooked", &self.hook().is_some())
            .finish()
    }
}
