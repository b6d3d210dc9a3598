//! Binding identity keys.
//!
//! A [`ServiceKey`] identifies one binding in the container: the capability
//! type being satisfied, plus an optional scope key that separates multiple
//! bindings of the same capability ("source" vs "mirror" scanners, say).

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies a binding by capability type and scope key.
///
/// Capabilities are ordinary Rust types — in practice `Arc<Concrete>` or
/// `Arc<dyn Abstraction>`, so that shared resolutions hand out cheap clones
/// of one underlying instance. When no scope key is given the binding lives
/// in the process-wide default scope.
///
/// # Examples
/// ```
/// use arkiv_container::key::ServiceKey;
///
/// let plain = ServiceKey::of::<String>();
/// assert!(plain.type_name().contains("String"));
/// assert_eq!(plain.scope(), None);
///
/// let keyed = ServiceKey::scoped::<String>("mirror");
/// assert_eq!(keyed.scope(), Some("mirror"));
/// assert_ne!(plain, keyed);
/// ```
#[derive(Clone)]
pub struct ServiceKey {
    type_id: TypeId,
    type_name: &'static str,
    scope: Option<&'static str>,
}

impl ServiceKey {
    /// Key for capability `T` in the default scope.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            scope: None,
        }
    }

    /// Key for capability `T` under an explicit scope key.
    ///
    /// Scoped keys allow several bindings of the same capability to live
    /// side by side.
    ///
    /// ```
    /// use arkiv_container::key::ServiceKey;
    ///
    /// let source = ServiceKey::scoped::<String>("source");
    /// let mirror = ServiceKey::scoped::<String>("mirror");
    /// assert_ne!(source, mirror);
    /// ```
    #[inline]
    pub fn scoped<T: ?Sized + 'static>(scope: &'static str) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            scope: Some(scope),
        }
    }

    /// The capability's [`TypeId`].
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Human-readable capability name, used in error messages.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// The scope key, or `None` for the default scope.
    #[inline]
    pub fn scope(&self) -> Option<&'static str> {
        self.scope
    }
}

// Two keys are the same binding iff capability AND scope key match.
impl PartialEq for ServiceKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.scope == other.scope
    }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.scope.hash(state);
    }
}

impl fmt::Debug for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            Some(scope) => write!(f, "ServiceKey({}, scope={scope:?})", self.type_name),
            None => write!(f, "ServiceKey({})", self.type_name),
        }
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            Some(scope) => write!(f, "{} [scope {scope:?}]", self.type_name),
            None => write!(f, "{}", self.type_name),
        }
    }
}
