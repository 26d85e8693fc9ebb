use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// Registry-assigned identifier of one service registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ServiceId(pub u64);

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Service type marker for services identified only by their interface map.
///
/// Uninhabited: it is only ever used as a type parameter.
#[derive(Debug)]
pub enum Untyped {}

/// Opaque handle to a registered service, typed by the contract `S` it was
/// looked up under.
///
/// References are produced by a registry; they carry no payload beyond the
/// registration id and its ranking. Ordering follows service ranking: a
/// higher ranking compares greater, and on equal ranking the older
/// registration (lower id) compares greater.
pub struct ServiceReference<S: ?Sized> {
    id: ServiceId,
    ranking: i32,
    _service: PhantomData<fn(&S)>,
}

impl<S: ?Sized> ServiceReference<S> {
    /// Builds a reference. Intended for registry implementations.
    pub fn new(id: ServiceId, ranking: i32) -> Self {
        Self { id, ranking, _service: PhantomData }
    }

    pub fn id(&self) -> ServiceId {
        self.id
    }

    pub fn ranking(&self) -> i32 {
        self.ranking
    }

    /// Same registration, current ranking replaced.
    pub fn with_ranking(self, ranking: i32) -> Self {
        Self::new(self.id, ranking)
    }

    /// Views the same registration under another contract.
    pub fn cast<U: ?Sized>(self) -> ServiceReference<U> {
        ServiceReference::new(self.id, self.ranking)
    }

    /// Drops the contract type, leaving a reference for untyped tracking.
    pub fn erase(self) -> ServiceReference<Untyped> {
        self.cast()
    }
}

impl<S: ?Sized> Clone for ServiceReference<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for ServiceReference<S> {}

impl<S: ?Sized> PartialEq for ServiceReference<S> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.ranking == other.ranking
    }
}

impl<S: ?Sized> Eq for ServiceReference<S> {}

impl<S: ?Sized> Hash for ServiceReference<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.ranking.hash(state);
    }
}

impl<S: ?Sized> Ord for ServiceReference<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ranking.cmp(&other.ranking).then_with(|| other.id.cmp(&self.id))
    }
}

impl<S: ?Sized> PartialOrd for ServiceReference<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: ?Sized> fmt::Debug for ServiceReference<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceReference")
            .field("service", &core::any::type_name::<S>())
            .field("id", &self.id)
            .field("ranking", &self.ranking)
            .finish()
    }
}

impl<S: ?Sized> fmt::Display for ServiceReference<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "service#{}", self.id)
    }
}
