//! Request-scoped context for service handles
//!
//! A `ServiceContext` is an immutable bag of values keyed by type. Services
//! publish their handles into it when they start, and capability
//! implementations look them up again when they are invoked. Deriving a
//! context never changes the one it was derived from.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Immutable, type-keyed context passed to every capability call.
///
/// Crates should attach values under a private key type so no other crate
/// can read or shadow them:
///
/// ```
/// # use kvconf_core::ServiceContext;
/// struct Handle(u16);
///
/// let base = ServiceContext::background();
/// let ctx = base.with_value(Handle(8500));
///
/// assert_eq!(ctx.value::<Handle>().map(|h| h.0), Some(8500));
/// assert!(!base.contains::<Handle>());
/// ```
#[derive(Clone, Default)]
pub struct ServiceContext {
    values: Arc<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl ServiceContext {
    /// The empty root context
    pub fn background() -> Self {
        Self::default()
    }

    /// Derive a new context carrying `value`
    ///
    /// A value of the same type already present is shadowed in the derived
    /// context only.
    pub fn with_value<T: Any + Send + Sync>(&self, value: T) -> Self {
        let mut values = (*self.values).clone();
        values.insert(TypeId::of::<T>(), Arc::new(value));
        Self {
            values: Arc::new(values),
        }
    }

    /// Look up the value of type `T`, if any
    pub fn value<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Check whether a value of type `T` is present
    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContext")
            .field("values", &self.values.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Port(u16);

    #[derive(Debug, PartialEq)]
    struct Host(&'static str);

    #[test]
    fn test_background_is_empty() {
        let ctx = ServiceContext::background();
        assert!(ctx.is_empty());
        assert!(ctx.value::<Port>().is_none());
    }

    #[test]
    fn test_with_value_leaves_parent_untouched() {
        let base = ServiceContext::background();
        let derived = base.with_value(Port(8500));

        assert_eq!(derived.value::<Port>(), Some(&Port(8500)));
        assert!(base.value::<Port>().is_none());
        assert!(base.is_empty());
    }

    #[test]
    fn test_values_accumulate() {
        let ctx = ServiceContext::background()
            .with_value(Port(8500))
            .with_value(Host("127.0.0.1"));

        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.value::<Port>(), Some(&Port(8500)));
        assert_eq!(ctx.value::<Host>(), Some(&Host("127.0.0.1")));
    }

    #[test]
    fn test_shadowing_only_affects_derived() {
        let first = ServiceContext::background().with_value(Port(8500));
        let second = first.with_value(Port(8501));

        assert_eq!(first.value::<Port>(), Some(&Port(8500)));
        assert_eq!(second.value::<Port>(), Some(&Port(8501)));
        assert_eq!(second.len(), 1);
    }
}
