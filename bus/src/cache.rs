//! Per-contract memo of validated resolutions.

use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;
use log::debug;

use crate::contract::{Contract, Resolution, validate_and_extract};
use crate::error::ValidationError;

/// Memoizes [`validate_and_extract`] per contract type.
///
/// Only successful resolutions are kept. A malformed contract is validated again (and
/// rejected again) on every attempt. Lookups are lock-free reads on a sharded map.
#[derive(Default)]
pub(crate) struct BindingCache {
    resolved: DashMap<TypeId, Arc<Resolution>>,
}

impl BindingCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Resolve the contract identified by `contract_id`, building its descriptor with
    /// `describe` only on a miss.
    pub(crate) fn resolve(
        &self,
        contract_id: TypeId,
        describe: fn() -> Contract,
    ) -> Result<Arc<Resolution>, ValidationError> {
        // Fast path: already validated
        if let Some(hit) = self.resolved.get(&contract_id) {
            return Ok(Arc::clone(hit.value()));
        }

        let contract = describe();
        let resolution = Arc::new(validate_and_extract(&contract)?);
        debug!(
            "resolved {} to {:?} for {}",
            contract.name(),
            resolution.handler(),
            resolution.event_name()
        );

        // Another thread may have raced us here; keep whichever landed first.
        let entry = self.resolved.entry(contract_id).or_insert(resolution);
        Ok(Arc::clone(entry.value()))
    }

    #[inline]
    pub(crate) fn contains(&self, contract_id: TypeId) -> bool {
        self.resolved.contains_key(&contract_id)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.resolved.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::contract::{Method, Output, Param};

    #[derive(Debug, crate::Event)]
    struct Tick;

    struct Clock;
    struct Broken;

    static DESCRIBED: AtomicUsize = AtomicUsize::new(0);

    fn clock() -> Contract {
        DESCRIBED.fetch_add(1, Ordering::SeqCst);
        Contract::of::<Clock>().method(
            Method::new("on_tick")
                .returns(Output::Unit)
                .param(Param::event::<Tick>())
                .invoke(|_, _| Ok(())),
        )
    }

    fn broken() -> Contract {
        Contract::of::<Broken>()
    }

    #[test]
    fn resolves_once_per_contract() {
        // Given
        let cache = BindingCache::new();
        let before = DESCRIBED.load(Ordering::SeqCst);

        // When
        let first = cache.resolve(TypeId::of::<Clock>(), clock).unwrap();
        let second = cache.resolve(TypeId::of::<Clock>(), clock).unwrap();

        // Then
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(DESCRIBED.load(Ordering::SeqCst) - before, 1);
        assert!(cache.contains(TypeId::of::<Clock>()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failures_are_not_cached() {
        // Given
        let cache = BindingCache::new();

        // When
        let first = cache.resolve(TypeId::of::<Broken>(), broken);
        let second = cache.resolve(TypeId::of::<Broken>(), broken);

        // Then
        assert!(matches!(first, Err(ValidationError::MethodCount { .. })));
        assert!(matches!(second, Err(ValidationError::MethodCount { .. })));
        assert!(!cache.contains(TypeId::of::<Broken>()));
        assert_eq!(cache.len(), 0);
    }
}
