//! Binding registry.
//!
//! Maps [`ServiceKey`]s to recipes. Written while the container is being
//! bootstrapped, read-only once it is built — lookups after that point need
//! no locking.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::key::ServiceKey;
use crate::recipe::RecipeFn;

/// A single declared binding.
#[derive(Clone)]
pub(crate) struct Binding {
    pub key: ServiceKey,
    pub recipe: RecipeFn,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding").field("key", &self.key).finish()
    }
}

/// Stores all declared bindings.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    bindings: HashMap<ServiceKey, Binding>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the binding. The last declaration for a key wins; replacing an
    /// earlier one is deliberate and silent, logged at debug level only.
    pub fn bind(&mut self, binding: Binding) {
        let key = binding.key.clone();
        if self.bindings.insert(key.clone(), binding).is_some() {
            debug!(key = %key, "replaced binding");
        } else {
            debug!(key = %key, "declared binding");
        }
    }

    pub fn lookup(&self, key: &ServiceKey) -> Option<&Binding> {
        self.bindings.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ServiceKey> {
        self.bindings.keys()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }
}
