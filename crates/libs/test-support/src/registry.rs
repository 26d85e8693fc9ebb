use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use service_tracking::{
    InterfaceMap, ServiceContext, ServiceId, ServiceInterface, ServiceReference, Untyped,
};

#[derive(Default)]
struct Registrations {
    next_id: u64,
    services: BTreeMap<ServiceId, (i32, InterfaceMap)>,
    released: Vec<ServiceId>,
}

/// In-memory service registry.
///
/// Ids are handed out from 1 in registration order. Releases reported by a
/// tracker are recorded so tests can check that every tracked service was
/// given back.
#[derive(Default)]
pub struct MemoryContext {
    inner: Mutex<Registrations>,
}

impl MemoryContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Registrations> {
        self.inner.lock().expect("memory context lock poisoned")
    }

    pub fn register(&self, interfaces: InterfaceMap, ranking: i32) -> ServiceReference<Untyped> {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = ServiceId(inner.next_id);
        inner.services.insert(id, (ranking, interfaces));
        ServiceReference::new(id, ranking)
    }

    /// Registers `service` under its one contract.
    pub fn register_as<S>(&self, service: Arc<S>, ranking: i32) -> ServiceReference<S>
    where
        S: ServiceInterface + Send + Sync + ?Sized,
    {
        self.register(InterfaceMap::new().with(service), ranking).cast()
    }

    /// Changes the ranking of a live registration.
    pub fn set_ranking(&self, id: ServiceId, ranking: i32) -> Option<ServiceReference<Untyped>> {
        let mut inner = self.lock();
        let entry = inner.services.get_mut(&id)?;
        entry.0 = ranking;
        Some(ServiceReference::new(id, ranking))
    }

    pub fn unregister(&self, id: ServiceId) -> Option<ServiceReference<Untyped>> {
        let (ranking, _) = self.lock().services.remove(&id)?;
        Some(ServiceReference::new(id, ranking))
    }

    pub fn len(&self) -> usize {
        self.lock().services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().services.is_empty()
    }

    /// Ids released so far, in release order.
    pub fn released(&self) -> Vec<ServiceId> {
        self.lock().released.clone()
    }
}

impl ServiceContext for MemoryContext {
    fn service_interfaces(&self, id: ServiceId) -> InterfaceMap {
        self.lock().services.get(&id).map(|(_, interfaces)| interfaces.clone()).unwrap_or_default()
    }

    fn release_service(&self, id: ServiceId) {
        self.lock().released.push(id);
    }
}
