use std::sync::Arc;

use crate::error::TrackerError;
use crate::handle::ServiceHandle;
use crate::reference::ServiceReference;
use crate::selector::{TrackedArg, TrackedFor, TrackedOutput};

/// Customizes what a service tracker stores for each matching service and
/// observes the service's lifecycle.
///
/// `S` is the contract the services are tracked under and `T` the tracked
/// representation; together they fix the bundle (see
/// [`TrackedFor`]) and with it the signatures below.
///
/// Calls for one service arrive in order and never overlap, but calls for
/// different services may run concurrently, hence `&self` and
/// `Send + Sync`. The tracker never holds a lock while calling in, so
/// implementations may register, modify or unregister services from a
/// callback; they should not do so while holding locks of their own.
///
/// Per service the tracker moves `Untracked -> Tracked -> Untracked`:
/// an accepted `adding_service` starts tracking, any number of
/// `modified_service` calls follow, and `removed_service` ends it.
pub trait ServiceTrackerCustomizer<S: ?Sized, T: TrackedFor<S> = ServiceHandle<S>>:
    Send + Sync
{
    /// A matching service is about to be tracked.
    ///
    /// Returns the value to store for `reference`. Returning the bundle's
    /// absent value (null handle, non-present value, empty map) declines
    /// tracking. Ownership of whatever the value holds moves to the caller.
    /// An `Err` fails this add only; the service stays untracked.
    fn adding_service(
        &self,
        reference: &ServiceReference<S>,
    ) -> Result<TrackedOutput<S, T>, TrackerError>;

    /// The properties of a tracked service changed.
    fn modified_service(&self, reference: &ServiceReference<S>, service: TrackedArg<'_, S, T>);

    /// A service stopped being tracked.
    ///
    /// The caller disposes `service` once this returns; anything the value
    /// owns beyond what disposal releases must be released here.
    fn removed_service(&self, reference: &ServiceReference<S>, service: TrackedArg<'_, S, T>);
}

impl<S, T, C> ServiceTrackerCustomizer<S, T> for &C
where
    S: ?Sized,
    T: TrackedFor<S>,
    C: ServiceTrackerCustomizer<S, T> + ?Sized,
{
    fn adding_service(
        &self,
        reference: &ServiceReference<S>,
    ) -> Result<TrackedOutput<S, T>, TrackerError> {
        (**self).adding_service(reference)
    }

    fn modified_service(&self, reference: &ServiceReference<S>, service: TrackedArg<'_, S, T>) {
        (**self).modified_service(reference, service)
    }

    fn removed_service(&self, reference: &ServiceReference<S>, service: TrackedArg<'_, S, T>) {
        (**self).removed_service(reference, service)
    }
}

impl<S, T, C> ServiceTrackerCustomizer<S, T> for Box<C>
where
    S: ?Sized,
    T: TrackedFor<S>,
    C: ServiceTrackerCustomizer<S, T> + ?Sized,
{
    fn adding_service(
        &self,
        reference: &ServiceReference<S>,
    ) -> Result<TrackedOutput<S, T>, TrackerError> {
        (**self).adding_service(reference)
    }

    fn modified_service(&self, reference: &ServiceReference<S>, service: TrackedArg<'_, S, T>) {
        (**self).modified_service(reference, service)
    }

    fn removed_service(&self, reference: &ServiceReference<S>, service: TrackedArg<'_, S, T>) {
        (**self).removed_service(reference, service)
    }
}

impl<S, T, C> ServiceTrackerCustomizer<S, T> for Arc<C>
where
    S: ?Sized,
    T: TrackedFor<S>,
    C: ServiceTrackerCustomizer<S, T> + ?Sized,
{
    fn adding_service(
        &self,
        reference: &ServiceReference<S>,
    ) -> Result<TrackedOutput<S, T>, TrackerError> {
        (**self).adding_service(reference)
    }

    fn modified_service(&self, reference: &ServiceReference<S>, service: TrackedArg<'_, S, T>) {
        (**self).modified_service(reference, service)
    }

    fn removed_service(&self, reference: &ServiceReference<S>, service: TrackedArg<'_, S, T>) {
        (**self).removed_service(reference, service)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::handle::AnyHandle;
    use crate::interface_map::InterfaceMap;
    use crate::reference::{ServiceId, Untyped};
    use crate::traits::PresenceFlag;

    trait Printer: Send + Sync {
        fn name(&self) -> &str;
    }

    crate::service_interface!(dyn Printer, "test.Printer");

    struct Laser;

    impl Printer for Laser {
        fn name(&self) -> &str {
            "laser"
        }
    }

    /// Tracks printers as a queue depth instead of the printer itself.
    #[derive(Default, Debug, PartialEq)]
    struct QueueDepth(Option<usize>);

    impl PresenceFlag for QueueDepth {
        fn is_present(&self) -> bool {
            self.0.is_some()
        }
    }

    crate::tracked_value!(dyn Printer => QueueDepth);

    #[derive(Default)]
    struct DepthCustomizer {
        modified: AtomicUsize,
        removed: Mutex<Vec<ServiceId>>,
    }

    impl ServiceTrackerCustomizer<dyn Printer, QueueDepth> for DepthCustomizer {
        fn adding_service(
            &self,
            reference: &ServiceReference<dyn Printer>,
        ) -> Result<QueueDepth, TrackerError> {
            if reference.ranking() < 0 {
                return Ok(QueueDepth::default());
            }
            Ok(QueueDepth(Some(0)))
        }

        fn modified_service(
            &self,
            _reference: &ServiceReference<dyn Printer>,
            service: &mut QueueDepth,
        ) {
            if let Some(depth) = service.0.as_mut() {
                *depth += 1;
            }
            self.modified.fetch_add(1, Ordering::SeqCst);
        }

        fn removed_service(
            &self,
            reference: &ServiceReference<dyn Printer>,
            _service: &mut QueueDepth,
        ) {
            self.removed.lock().expect("removed lock").push(reference.id());
        }
    }

    struct FixedPrinter(Arc<dyn Printer>);

    impl ServiceTrackerCustomizer<dyn Printer> for FixedPrinter {
        fn adding_service(
            &self,
            _reference: &ServiceReference<dyn Printer>,
        ) -> Result<ServiceHandle<dyn Printer>, TrackerError> {
            Ok(ServiceHandle::new(Arc::clone(&self.0)))
        }

        fn modified_service(
            &self,
            _reference: &ServiceReference<dyn Printer>,
            _service: &ServiceHandle<dyn Printer>,
        ) {
        }

        fn removed_service(
            &self,
            _reference: &ServiceReference<dyn Printer>,
            _service: &ServiceHandle<dyn Printer>,
        ) {
        }
    }

    struct Rejecting;

    impl ServiceTrackerCustomizer<Untyped, AnyHandle> for Rejecting {
        fn adding_service(
            &self,
            reference: &ServiceReference<Untyped>,
        ) -> Result<InterfaceMap, TrackerError> {
            Err(TrackerError::customizer(reference.id(), "rejected"))
        }

        fn modified_service(&self, _reference: &ServiceReference<Untyped>, _map: &InterfaceMap) {}

        fn removed_service(&self, _reference: &ServiceReference<Untyped>, _map: &InterfaceMap) {}
    }

    #[test]
    fn value_customizer_receives_mutable_value() {
        let customizer = DepthCustomizer::default();
        let reference = ServiceReference::<dyn Printer>::new(ServiceId(1), 0);

        let mut depth = customizer.adding_service(&reference).expect("add");
        assert!(depth.is_present());
        customizer.modified_service(&reference, &mut depth);
        customizer.modified_service(&reference, &mut depth);
        assert_eq!(depth, QueueDepth(Some(2)));
        assert_eq!(customizer.modified.load(Ordering::SeqCst), 2);

        customizer.removed_service(&reference, &mut depth);
        assert_eq!(*customizer.removed.lock().expect("removed lock"), vec![ServiceId(1)]);
    }

    #[test]
    fn declining_returns_absent_value() {
        let customizer = DepthCustomizer::default();
        let reference = ServiceReference::<dyn Printer>::new(ServiceId(2), -1);
        let depth = customizer.adding_service(&reference).expect("add");
        assert!(!depth.is_present());
    }

    fn add_through<C: ServiceTrackerCustomizer<dyn Printer>>(
        customizer: C,
        reference: &ServiceReference<dyn Printer>,
    ) -> Result<ServiceHandle<dyn Printer>, TrackerError> {
        customizer.adding_service(reference)
    }

    #[test]
    fn shared_and_boxed_customizers_forward() {
        let printer: Arc<dyn Printer> = Arc::new(Laser);
        let shared: Arc<dyn ServiceTrackerCustomizer<dyn Printer>> =
            Arc::new(FixedPrinter(Arc::clone(&printer)));
        let boxed: Box<dyn ServiceTrackerCustomizer<dyn Printer>> =
            Box::new(FixedPrinter(printer));
        let reference = ServiceReference::<dyn Printer>::new(ServiceId(3), 0);

        let from_arc = shared.adding_service(&reference).expect("add");
        let from_box = boxed.adding_service(&reference).expect("add");
        let from_ref = add_through(&*boxed, &reference).expect("add");
        assert_eq!(from_arc, from_box);
        assert_eq!(from_box, from_ref);
        assert_eq!(from_arc.get().map(|p| p.name()), Some("laser"));
    }

    #[test]
    fn customizer_errors_surface_to_caller() {
        let reference = ServiceReference::<Untyped>::new(ServiceId(9), 0);
        let err = Rejecting.adding_service(&reference).expect_err("rejected");
        assert_eq!(err, TrackerError::customizer(ServiceId(9), "rejected"));
    }
}
