use std::sync::{Mutex, MutexGuard};

use service_tracking::{
    ServiceId, ServiceReference, ServiceTrackerCustomizer, TrackedArg, TrackedFor,
    TrackedOutput, TrackerError,
};

/// One customizer callback, as seen by [`RecordingCustomizer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Call {
    Adding(ServiceId),
    Modified(ServiceId),
    Removed(ServiceId),
}

impl Call {
    pub fn id(&self) -> ServiceId {
        match self {
            Self::Adding(id) | Self::Modified(id) | Self::Removed(id) => *id,
        }
    }
}

/// Wraps a customizer and logs every callback before delegating.
pub struct RecordingCustomizer<C> {
    inner: C,
    calls: Mutex<Vec<Call>>,
}

impl<C> RecordingCustomizer<C> {
    pub fn new(inner: C) -> Self {
        Self { inner, calls: Mutex::new(Vec::new()) }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Call>> {
        self.calls.lock().expect("recorded calls lock poisoned")
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().clone()
    }

    /// Calls made for one service, in order.
    pub fn calls_for(&self, id: ServiceId) -> Vec<Call> {
        self.lock().iter().copied().filter(|call| call.id() == id).collect()
    }

    fn record(&self, call: Call) {
        log::trace!("recorded {call:?}");
        self.lock().push(call);
    }
}

impl<S, T, C> ServiceTrackerCustomizer<S, T> for RecordingCustomizer<C>
where
    S: ?Sized,
    T: TrackedFor<S>,
    C: ServiceTrackerCustomizer<S, T>,
{
    fn adding_service(
        &self,
        reference: &ServiceReference<S>,
    ) -> Result<TrackedOutput<S, T>, TrackerError> {
        self.record(Call::Adding(reference.id()));
        self.inner.adding_service(reference)
    }

    fn modified_service(&self, reference: &ServiceReference<S>, service: TrackedArg<'_, S, T>) {
        self.record(Call::Modified(reference.id()));
        self.inner.modified_service(reference, service)
    }

    fn removed_service(&self, reference: &ServiceReference<S>, service: TrackedArg<'_, S, T>) {
        self.record(Call::Removed(reference.id()));
        self.inner.removed_service(reference, service)
    }
}
