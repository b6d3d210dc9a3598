//! Read-only resolution façade.
//!
//! A [`Locator`] is what consumers get instead of the container itself:
//! it can resolve shared or fresh instances, by capability alone or by
//! capability plus scope key, but it has no registration surface — holders
//! cannot re-wire the graph.

use std::fmt;

use crate::container::Container;
use crate::error::Result;

/// Resolution-only handle over a [`Container`].
///
/// Cheap to clone; every clone shares the container's registry and cache.
/// Recipes obtain one through [`Resolver::locator`](crate::recipe::Resolver::locator),
/// which is also how the locator registers itself as a binding:
///
/// ```
/// use arkiv_container::prelude::*;
///
/// let container = Container::builder()
///     .provide::<Locator, _>(|r| Ok(r.locator()))
///     .provide_value(7u32)
///     .build();
///
/// let locator: Locator = container.resolve().expect("locator bound");
/// assert_eq!(locator.get::<u32>().expect("value bound"), 7);
/// ```
#[derive(Clone)]
pub struct Locator {
    container: Container,
}

impl Locator {
    pub(crate) fn new(container: Container) -> Self {
        Self { container }
    }

    /// Shared instance of `T` from the default scope.
    pub fn get<T: Clone + Send + Sync + 'static>(&self) -> Result<T> {
        self.container.resolve()
    }

    /// Shared instance of `T` from an explicit scope.
    pub fn get_in<T: Clone + Send + Sync + 'static>(&self, scope: &'static str) -> Result<T> {
        self.container.resolve_in(scope)
    }

    /// Fresh instance of `T` from the default scope.
    pub fn create<T: Clone + Send + Sync + 'static>(&self) -> Result<T> {
        self.container.resolve_fresh()
    }

    /// Fresh instance of `T` from an explicit scope.
    pub fn create_in<T: Clone + Send + Sync + 'static>(&self, scope: &'static str) -> Result<T> {
        self.container.resolve_fresh_in(scope)
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locator")
            .field("container", &self.container)
            .finish()
    }
}
