//! Realized-instance cache.
//!
//! Holds the shared instance for every binding that has been provisioned
//! shared at least once. The first request for a key creates the instance;
//! every later request, on any thread, observes that same instance.
//!
//! Layout: one `OnceCell` slot per key inside a concurrent map. Reads of an
//! initialized slot are lock-free; racing first requests agree on a single
//! slot under the map's shard lock and then serialize on the cell, so the
//! recipe runs at most once per key. The map lock is never held while a
//! recipe runs, which keeps recursive resolution of other keys safe.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::trace;

use crate::error::Result;
use crate::key::ServiceKey;
use crate::recipe::ErasedInstance;

#[derive(Default)]
pub(crate) struct InstanceCache {
    slots: DashMap<ServiceKey, Arc<OnceCell<ErasedInstance>>>,
}

impl InstanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached instance for `key`, invoking `make` at most once
    /// per key over the cache's lifetime. Concurrent first requests block on
    /// the same slot until the winning caller has stored the instance.
    ///
    /// A failed `make` stores nothing; the next request tries again.
    pub fn get_or_create(
        &self,
        key: &ServiceKey,
        make: impl FnOnce() -> Result<ErasedInstance>,
    ) -> Result<ErasedInstance> {
        let slot = self.slot(key);
        if let Some(existing) = slot.get() {
            trace!(key = %key, "cache hit");
            return Ok(existing.clone());
        }
        trace!(key = %key, "cache miss");
        slot.get_or_try_init(make).map(|instance| instance.clone())
    }

    /// Invokes `make` unconditionally; the result is never cached.
    pub fn create_fresh(
        &self,
        make: impl FnOnce() -> Result<ErasedInstance>,
    ) -> Result<ErasedInstance> {
        make()
    }

    /// Number of realized shared instances.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.get().is_some()).count()
    }

    fn slot(&self, key: &ServiceKey) -> Arc<OnceCell<ErasedInstance>> {
        if let Some(slot) = self.slots.get(key) {
            return Arc::clone(&slot);
        }
        // entry() re-checks under the shard write lock, so racing threads
        // end up holding the same slot
        Arc::clone(&self.slots.entry(key.clone()).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContainerError;
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn erased(value: u32) -> ErasedInstance {
        Arc::new(value)
    }

    #[test]
    fn creates_once_then_reuses() {
        let cache = InstanceCache::new();
        let key = ServiceKey::of::<u32>();
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_create(&key, || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(erased(9))
            })
            .unwrap();
        let second = cache
            .get_or_create(&key, || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(erased(9))
            })
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_keys_get_distinct_slots() {
        let cache = InstanceCache::new();

        let plain = cache
            .get_or_create(&ServiceKey::of::<u32>(), || Ok(erased(1)))
            .unwrap();
        let scoped = cache
            .get_or_create(&ServiceKey::scoped::<u32>("mirror"), || Ok(erased(2)))
            .unwrap();

        assert!(!Arc::ptr_eq(&plain, &scoped));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn fresh_never_caches() {
        let cache = InstanceCache::new();
        let calls = AtomicUsize::new(0);
        let mut make = || {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(erased(3))
        };

        let first = cache.create_fresh(&mut make).unwrap();
        let second = cache.create_fresh(&mut make).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn failed_creation_is_not_cached() {
        let cache = InstanceCache::new();
        let key = ServiceKey::of::<u32>();

        let failed = cache.get_or_create(&key, || {
            Err(ContainerError::ConstructionFailed {
                key: ServiceKey::of::<u32>(),
                source: "first attempt fails".into(),
            })
        });
        assert!(failed.is_err());
        assert_eq!(cache.len(), 0);

        let recovered = cache.get_or_create(&key, || Ok(erased(4))).unwrap();
        assert_eq!(*recovered.downcast::<u32>().unwrap(), 4);
    }

    #[test]
    fn racing_first_requests_create_exactly_once() {
        const THREADS: usize = 8;

        let cache = InstanceCache::new();
        let key = ServiceKey::of::<u32>();
        let calls = AtomicUsize::new(0);
        let barrier = Barrier::new(THREADS);

        let instances: Vec<ErasedInstance> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        cache
                            .get_or_create(&key, || {
                                calls.fetch_add(1, Ordering::SeqCst);
                                Ok(erased(11))
                            })
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        for instance in &instances[1..] {
            assert!(Arc::ptr_eq(&instances[0], instance));
        }
    }
}
