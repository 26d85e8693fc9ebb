use core::fmt;
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::handle::ServiceHandle;

/// A service contract that can be published in an [`InterfaceMap`].
///
/// The id is the key the contract is stored under; it must be unique per
/// contract across a registry. Usually declared with [`service_interface!`].
///
/// [`service_interface!`]: crate::service_interface
pub trait ServiceInterface: 'static {
    const INTERFACE_ID: &'static str;
}

/// Declares the interface id of a service contract.
///
/// ```
/// use service_tracking::{service_interface, ServiceInterface};
///
/// pub trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// service_interface!(dyn Clock, "org.example.Clock");
///
/// assert_eq!(<dyn Clock as ServiceInterface>::INTERFACE_ID, "org.example.Clock");
/// ```
#[macro_export]
macro_rules! service_interface {
    ($contract:ty, $id:expr) => {
        impl $crate::ServiceInterface for $contract {
            const INTERFACE_ID: &'static str = $id;
        }
    };
}

type InterfaceObject = Arc<dyn Any + Send + Sync>;

/// Interface id to instance mapping of one service registration.
///
/// A service published under several contracts exposes one entry per
/// contract. Typed entries are stored as `Arc<S>` behind `dyn Any`, so a
/// contract that is itself a trait object can be recovered with
/// [`InterfaceMap::service`].
#[derive(Clone, Default)]
pub struct InterfaceMap {
    entries: BTreeMap<String, InterfaceObject>,
}

impl InterfaceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, interface_id: &str) -> bool {
        self.entries.contains_key(interface_id)
    }

    pub fn interface_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Publishes `service` under its contract's interface id, replacing any
    /// previous entry.
    pub fn insert<S>(&mut self, service: Arc<S>) -> &mut Self
    where
        S: ServiceInterface + Send + Sync + ?Sized,
    {
        self.entries.insert(S::INTERFACE_ID.to_owned(), Arc::new(service));
        self
    }

    /// Builder form of [`InterfaceMap::insert`].
    pub fn with<S>(mut self, service: Arc<S>) -> Self
    where
        S: ServiceInterface + Send + Sync + ?Sized,
    {
        self.insert(service);
        self
    }

    /// Stores an already type-erased object under an arbitrary id.
    pub fn insert_raw(&mut self, interface_id: impl Into<String>, object: InterfaceObject) {
        self.entries.insert(interface_id.into(), object);
    }

    pub fn get_raw(&self, interface_id: &str) -> Option<&InterfaceObject> {
        self.entries.get(interface_id)
    }

    pub fn remove(&mut self, interface_id: &str) -> Option<InterfaceObject> {
        self.entries.remove(interface_id)
    }

    /// Typed handle for contract `S`; null when the contract is not
    /// published or the entry was not stored through [`InterfaceMap::insert`].
    pub fn service<S>(&self) -> ServiceHandle<S>
    where
        S: ServiceInterface + ?Sized,
    {
        self.entries
            .get(S::INTERFACE_ID)
            .and_then(|object| object.downcast_ref::<Arc<S>>())
            .cloned()
            .into()
    }
}

impl PartialEq for InterfaceMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().zip(other.entries.iter()).all(|((ka, va), (kb, vb))| {
                ka == kb && Arc::as_ptr(va).cast::<()>() == Arc::as_ptr(vb).cast::<()>()
            })
    }
}

impl Eq for InterfaceMap {}

impl fmt::Debug for InterfaceMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}
