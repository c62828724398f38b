//! Listeners and capability discovery.
//!
//! A listener is any `Send + Sync` value that implements one or more capability contracts.
//! The registry learns which contracts through [`Listener::capabilities`], normally
//! generated with `#[derive(Listener)]`:
//!
//! ```rust,ignore
//! use rusty_bus::Listener;
//!
//! #[derive(Listener)]
//! #[listens(RedEventListener, ResetEventListener)]
//! struct RedPanel { /* ... */ }
//! ```
//!
//! Listeners are registered through an `Arc`. The data address of that `Arc` is the
//! listener's identity ([`ListenerId`]); two structurally equal listeners are still two
//! listeners.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use log::warn;

use crate::contract::{Capability, Contract};

/// Root marker for anything that can be registered with a [`Registry`](crate::Registry).
pub trait Listener: Send + Sync + 'static {
    /// Announce every capability contract this listener implements.
    fn capabilities(self: Arc<Self>, caps: &mut Capabilities);

    /// Full type name of the concrete listener, also when held as `dyn Listener`.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Identity of a registered listener instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(usize);

impl ListenerId {
    /// The identity of the value behind `listener`.
    #[inline]
    pub fn of<L: ?Sized>(listener: &Arc<L>) -> Self {
        Self(Arc::as_ptr(listener) as *const () as usize)
    }

    #[inline]
    pub const fn from_addr(addr: usize) -> Self {
        Self(addr)
    }

    #[inline]
    pub const fn addr(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A listener instance as held by one binding.
///
/// The handle is the listener erased to the contract it was offered under
/// (an `Arc<dyn Contract>` inside `dyn Any`).
pub struct Subscriber {
    id: ListenerId,
    type_name: &'static str,
    handle: Box<dyn Any + Send + Sync>,
}

impl Subscriber {
    #[inline]
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Full type name of the concrete listener.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub(crate) fn handle(&self) -> &(dyn Any + Send + Sync) {
        self.handle.as_ref()
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.type_name, self.id)
    }
}

/// One contract offered by a listener.
pub(crate) struct Offer {
    pub(crate) contract_id: TypeId,
    pub(crate) contract_name: &'static str,
    pub(crate) describe: fn() -> Contract,
    pub(crate) subscriber: Arc<Subscriber>,
}

/// The capability contracts a single listener implements.
pub struct Capabilities {
    owner: ListenerId,
    type_name: &'static str,
    offers: Vec<Offer>,
}

impl Capabilities {
    fn new(owner: ListenerId, type_name: &'static str) -> Self {
        Self {
            owner,
            type_name,
            offers: Vec::new(),
        }
    }

    /// Offer `listener` under contract `C`.
    ///
    /// `listener` must be the listener being discovered, coerced to the contract
    /// (`caps.add::<dyn Paint>(self.clone())`). Offering the same contract twice is a no-op.
    pub fn add<C>(&mut self, listener: Arc<C>) -> &mut Self
    where
        C: ?Sized + Capability + Send + Sync,
    {
        let id = ListenerId::of(&listener);
        if id != self.owner {
            warn!(
                "skipping {} offered by {}@{}: handle belongs to {}",
                std::any::type_name::<C>(),
                self.type_name,
                self.owner,
                id
            );
            return self;
        }

        let contract_id = TypeId::of::<C>();
        if self.contains_id(contract_id) {
            return self;
        }

        self.offers.push(Offer {
            contract_id,
            contract_name: std::any::type_name::<C>(),
            describe: C::contract,
            subscriber: Arc::new(Subscriber {
                id,
                type_name: self.type_name,
                handle: Box::new(listener),
            }),
        });
        self
    }

    /// Identity of the listener being discovered.
    #[inline]
    pub fn owner(&self) -> ListenerId {
        self.owner
    }

    /// `true` if contract `C` has been offered.
    #[inline]
    pub fn contains<C: ?Sized + 'static>(&self) -> bool {
        self.contains_id(TypeId::of::<C>())
    }

    /// Names of the offered contracts, in the order they were offered.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.offers.iter().map(|offer| offer.contract_name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.offers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    fn contains_id(&self, contract_id: TypeId) -> bool {
        self.offers.iter().any(|offer| offer.contract_id == contract_id)
    }

    pub(crate) fn into_offers(self) -> Vec<Offer> {
        self.offers
    }
}

/// Discover every capability contract implemented by `listener`.
pub fn discover_capabilities<L: Listener + ?Sized>(listener: &Arc<L>) -> Capabilities {
    let mut caps = Capabilities::new(ListenerId::of(listener), L::type_name(listener));
    Arc::clone(listener).capabilities(&mut caps);
    caps
}
