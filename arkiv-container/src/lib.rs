//! Service container core for Arkiv.
//!
//! Bindings are declared once at startup through a [`ContainerBuilder`],
//! frozen into a [`Container`], and resolved either shared (one cached
//! instance per binding) or fresh (a new instance per request). Consumers
//! receive a [`Locator`], which can resolve but never re-wire the graph.

pub mod cache;
pub mod container;
pub mod error;
pub mod key;
pub mod locator;
pub mod provider;
pub mod provision;
pub mod recipe;
pub mod registry;

pub use container::prelude;
pub use container::{Container, ContainerBuilder};
pub use error::{ContainerError, Result};
pub use key::ServiceKey;
pub use locator::Locator;
pub use provider::{Provider, ProviderRegistry};
pub use provision::Provision;
pub use recipe::{Dep, RecipeFn, Resolver, recipe};
