//! Shared vs fresh provisioning.
//!
//! Every binding can be provisioned both ways; the choice is made per
//! resolution (and per constructor parameter), not at registration time.

use std::fmt;

/// How a resolution obtains its instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provision {
    /// Reuse the single cached instance for the binding, creating it on the
    /// first request. All shared resolutions of one key observe the same
    /// instance for the container's lifetime.
    Shared,

    /// Invoke the binding's recipe and hand back an uncached instance.
    ///
    /// Used for per-use objects such as a pane model rebuilt on every
    /// refresh.
    Fresh,
}

impl Provision {
    /// Whether this mode stores its result in the instance cache.
    #[inline]
    pub fn is_cached(&self) -> bool {
        matches!(self, Provision::Shared)
    }
}

impl fmt::Display for Provision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provision::Shared => write!(f, "shared"),
            Provision::Fresh => write!(f, "fresh"),
        }
    }
}
