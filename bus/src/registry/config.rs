//! Construction-time registry settings.

/// What [`Registry::fire_event`](crate::Registry::fire_event) does when a handler fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchPolicy {
    /// Stop at the first failing listener and return [`Error::Dispatch`](crate::Error::Dispatch).
    /// Listeners after it are not invoked for that fire call; earlier deliveries stand.
    #[default]
    FailFast,

    /// Invoke every listener, then return
    /// [`Error::DispatchAll`](crate::Error::DispatchAll) if any of them failed.
    Collect,
}

/// Registry settings. The default matches fail-fast dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryConfig {
    pub policy: DispatchPolicy,
}

impl RegistryConfig {
    #[inline]
    pub const fn with_policy(policy: DispatchPolicy) -> Self {
        Self { policy }
    }
}
