use core::fmt;
use std::any::Any;
use std::sync::Arc;

/// Shared handle to a service object, or null.
///
/// The registry owns the lifetime of the underlying service; a handle only
/// keeps the object reachable while it is tracked. Two handles compare equal
/// when they point at the same object (or are both null).
pub struct ServiceHandle<T: ?Sized>(Option<Arc<T>>);

/// Handle to an object of unknown contract, the tracked type of untyped
/// tracking.
pub type AnyHandle = ServiceHandle<dyn Any + Send + Sync>;

impl<T: ?Sized> ServiceHandle<T> {
    pub fn new(service: Arc<T>) -> Self {
        Self(Some(service))
    }

    pub const fn null() -> Self {
        Self(None)
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    pub fn get(&self) -> Option<&T> {
        self.0.as_deref()
    }

    pub fn as_arc(&self) -> Option<&Arc<T>> {
        self.0.as_ref()
    }

    /// Takes the object out, leaving the handle null.
    pub fn take(&mut self) -> Option<Arc<T>> {
        self.0.take()
    }

    pub fn reset(&mut self) {
        self.0 = None;
    }

    pub fn into_arc(self) -> Option<Arc<T>> {
        self.0
    }

    /// Identity comparison that ignores trait-object metadata.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>(),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: ?Sized> Clone for ServiceHandle<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: ?Sized> Default for ServiceHandle<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: ?Sized> PartialEq for ServiceHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T: ?Sized> Eq for ServiceHandle<T> {}

impl<T: ?Sized> From<Arc<T>> for ServiceHandle<T> {
    fn from(service: Arc<T>) -> Self {
        Self::new(service)
    }
}

impl<T: ?Sized> From<Option<Arc<T>>> for ServiceHandle<T> {
    fn from(service: Option<Arc<T>>) -> Self {
        Self(service)
    }
}

impl<T: ?Sized> fmt::Debug for ServiceHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(service) => write!(
                f,
                "ServiceHandle<{}>({:p})",
                core::any::type_name::<T>(),
                Arc::as_ptr(service).cast::<()>()
            ),
            None => write!(f, "ServiceHandle<{}>(null)", core::any::type_name::<T>()),
        }
    }
}
