//! Error types for container operations.
//!
//! Every container-level failure is a configuration defect: it is surfaced
//! loudly, with enough context to point at the bootstrap line that needs
//! fixing, and never papered over with a default value.

use std::fmt;

use arkiv_support::rendering::{render_chain, shorten_type_name};

use crate::key::ServiceKey;

/// Main error type for all container operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// The requested (capability, scope key) pair has no binding.
    #[error("{}", .0)]
    NotRegistered(NotRegisteredError),

    /// A binding's recipe re-entered its own resolution on this thread.
    #[error("{}", .0)]
    CircularResolution(CircularResolutionError),

    /// A recipe failed, or produced a value of an unexpected type.
    #[error("failed to construct {key}: {source}")]
    ConstructionFailed {
        key: ServiceKey,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// A resolution hit a key that was never registered.
#[derive(Debug)]
pub struct NotRegisteredError {
    /// The binding that was requested.
    pub requested: ServiceKey,
    /// The binding whose recipe was running when the request failed, if any.
    pub required_by: Option<ServiceKey>,
    /// Registered bindings with similar names, for typo hunting.
    pub suggestions: Vec<String>,
}

impl fmt::Display for NotRegisteredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no binding for {}", self.requested)?;

        if let Some(ref parent) = self.required_by {
            write!(f, "\n  required while constructing {parent}")?;
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  similarly named bindings:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  hint: declare it during bootstrap, e.g. .provide::<{}>(..)",
            shorten_type_name(self.requested.type_name())
        )
    }
}

/// A dependency cycle among bindings, caught at resolve time.
///
/// The chain runs from the first resolution of the offending key back to
/// its re-entry, so the cycle is visible end to end.
#[derive(Debug)]
pub struct CircularResolutionError {
    pub chain: Vec<ServiceKey>,
}

impl fmt::Display for CircularResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let links: Vec<String> = self
            .chain
            .iter()
            .map(|key| shorten_type_name(&key.to_string()))
            .collect();
        write!(f, "circular resolution detected:\n  {}", render_chain(&links))?;
        write!(
            f,
            "\n  hint: let one side take the locator and resolve lazily instead"
        )
    }
}

/// Convenient result type for container operations.
pub type Result<T> = std::result::Result<T, ContainerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_registered_names_the_key() {
        let err = ContainerError::NotRegistered(NotRegisteredError {
            requested: ServiceKey::of::<String>(),
            required_by: Some(ServiceKey::of::<u64>()),
            suggestions: vec!["alloc::string::String".into()],
        });

        let text = err.to_string();
        assert!(text.contains("no binding"));
        assert!(text.contains("String"));
        assert!(text.contains("required while constructing"));
        assert!(text.contains("similarly named"));
    }

    #[test]
    fn not_registered_without_context_stays_short() {
        let err = NotRegisteredError {
            requested: ServiceKey::of::<u32>(),
            required_by: None,
            suggestions: vec![],
        };

        let text = err.to_string();
        assert!(!text.contains("required while constructing"));
        assert!(!text.contains("similarly named"));
        assert!(text.contains("hint"));
    }

    #[test]
    fn cycle_renders_the_chain() {
        let err = ContainerError::CircularResolution(CircularResolutionError {
            chain: vec![
                ServiceKey::of::<String>(),
                ServiceKey::of::<u64>(),
                ServiceKey::of::<String>(),
            ],
        });

        let text = err.to_string();
        assert!(text.contains("circular"));
        assert!(text.contains("→"));
        assert!(text.contains("String"));
    }

    #[test]
    fn construction_failure_carries_source() {
        let err = ContainerError::ConstructionFailed {
            key: ServiceKey::of::<String>(),
            source: "disk on fire".into(),
        };

        let text = err.to_string();
        assert!(text.contains("failed to construct"));
        assert!(text.contains("disk on fire"));
    }
}
