//! The customizer used when the integrator supplies none.
//!
//! It asks the registry for the service's interfaces, derives the bundle's
//! canonical form from them and converts. Only bundles with a synthesized
//! conversion qualify, so tracking a distinct handle or a value without a
//! custom customizer is rejected at build time:
//!
//! ```compile_fail
//! use service_tracking::{
//!     distinct_handle, DefaultCustomizer, InterfaceMap, ServiceContext, ServiceHandle,
//!     ServiceId, ServiceTrackerCustomizer,
//! };
//!
//! pub trait Clock: Send + Sync {}
//! pub trait Calendar: Send + Sync {}
//!
//! distinct_handle!(dyn Clock => dyn Calendar);
//!
//! struct Registry;
//!
//! impl ServiceContext for Registry {
//!     fn service_interfaces(&self, _id: ServiceId) -> InterfaceMap {
//!         InterfaceMap::new()
//!     }
//! }
//!
//! fn track_with<C: ServiceTrackerCustomizer<dyn Clock, ServiceHandle<dyn Calendar>>>(_: C) {}
//!
//! track_with(DefaultCustomizer::new(Registry));
//! ```
//!
//! ```compile_fail
//! use service_tracking::{
//!     tracked_value, DefaultCustomizer, InterfaceMap, ServiceContext, ServiceId,
//!     ServiceTrackerCustomizer,
//! };
//!
//! pub trait Clock: Send + Sync {}
//!
//! tracked_value!(dyn Clock => Option<u64>);
//!
//! struct Registry;
//!
//! impl ServiceContext for Registry {
//!     fn service_interfaces(&self, _id: ServiceId) -> InterfaceMap {
//!         InterfaceMap::new()
//!     }
//! }
//!
//! fn track_with<C: ServiceTrackerCustomizer<dyn Clock, Option<u64>>>(_: C) {}
//!
//! track_with(DefaultCustomizer::new(Registry));
//! ```

use std::sync::Arc;

use crate::customizer::ServiceTrackerCustomizer;
use crate::error::TrackerError;
use crate::interface_map::InterfaceMap;
use crate::reference::{ServiceId, ServiceReference};
use crate::selector::{TrackedArg, TrackedFor, TrackedOutput, TraitsOf};
use crate::traits::{SynthesizedConversion, TrackingTraits};

/// The registry as seen by a tracker.
pub trait ServiceContext: Send + Sync {
    /// Interfaces published by registration `id`; empty once it is gone.
    fn service_interfaces(&self, id: ServiceId) -> InterfaceMap;

    /// Gives back the use of `id` taken when it was tracked.
    fn release_service(&self, id: ServiceId) {
        let _ = id;
    }
}

impl<C: ServiceContext + ?Sized> ServiceContext for Arc<C> {
    fn service_interfaces(&self, id: ServiceId) -> InterfaceMap {
        (**self).service_interfaces(id)
    }

    fn release_service(&self, id: ServiceId) {
        (**self).release_service(id)
    }
}

impl<C: ServiceContext + ?Sized> ServiceContext for &C {
    fn service_interfaces(&self, id: ServiceId) -> InterfaceMap {
        (**self).service_interfaces(id)
    }

    fn release_service(&self, id: ServiceId) {
        (**self).release_service(id)
    }
}

/// Customizer that tracks whatever the registry publishes for the
/// contract, unchanged.
///
/// ```
/// use std::sync::Arc;
/// use service_tracking::{
///     service_interface, DefaultCustomizer, InterfaceMap, ServiceContext, ServiceId,
///     ServiceReference, ServiceTrackerCustomizer,
/// };
///
/// pub trait Clock: Send + Sync {
///     fn now(&self) -> u64;
/// }
///
/// service_interface!(dyn Clock, "org.example.Clock");
///
/// struct Fixed;
///
/// impl Clock for Fixed {
///     fn now(&self) -> u64 {
///         1_700_000_000
///     }
/// }
///
/// struct Registry;
///
/// impl ServiceContext for Registry {
///     fn service_interfaces(&self, _id: ServiceId) -> InterfaceMap {
///         let clock: Arc<dyn Clock> = Arc::new(Fixed);
///         InterfaceMap::new().with(clock)
///     }
/// }
///
/// let customizer: &dyn ServiceTrackerCustomizer<dyn Clock> = &DefaultCustomizer::new(Registry);
/// let reference = ServiceReference::<dyn Clock>::new(ServiceId(1), 0);
/// let clock = customizer.adding_service(&reference).expect("tracked clock");
/// assert_eq!(clock.get().map(|c| c.now()), Some(1_700_000_000));
/// ```
#[derive(Debug)]
pub struct DefaultCustomizer<C> {
    context: C,
    name: String,
}

impl<C: ServiceContext> DefaultCustomizer<C> {
    pub fn new(context: C) -> Self {
        Self { context, name: "tracker".to_owned() }
    }

    /// Sets the tracker name used in log lines.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &C {
        &self.context
    }
}

impl<S, T, C> ServiceTrackerCustomizer<S, T> for DefaultCustomizer<C>
where
    S: ?Sized,
    T: TrackedFor<S>,
    T::Traits: SynthesizedConversion,
    C: ServiceContext,
{
    fn adding_service(
        &self,
        reference: &ServiceReference<S>,
    ) -> Result<TrackedOutput<S, T>, TrackerError> {
        let interfaces = self.context.service_interfaces(reference.id());
        let canonical = <TraitsOf<S, T> as SynthesizedConversion>::canonical_from(&interfaces);
        let tracked = <TraitsOf<S, T> as TrackingTraits>::convert_to_tracked(&canonical)?;
        if !<TraitsOf<S, T> as TrackingTraits>::is_valid(&tracked) {
            log::debug!(
                "tracker({}): {} publishes nothing usable ({} interfaces)",
                self.name,
                reference,
                interfaces.len()
            );
        }
        Ok(tracked)
    }

    fn modified_service(&self, reference: &ServiceReference<S>, _service: TrackedArg<'_, S, T>) {
        log::trace!("tracker({}): {} modified", self.name, reference);
    }

    fn removed_service(&self, reference: &ServiceReference<S>, _service: TrackedArg<'_, S, T>) {
        log::trace!("tracker({}): releasing {}", self.name, reference);
        self.context.release_service(reference.id());
    }
}
