use core::marker::PhantomData;

use crate::error::TrackerError;
use crate::handle::ServiceHandle;
use crate::interface_map::{InterfaceMap, ServiceInterface};

use super::{SynthesizedConversion, TrackingTraits};

/// Bundle for tracking contract `S` as a handle to the same contract.
///
/// The only typed bundle with a synthesized conversion: the canonical
/// service handle is passed through unchanged.
pub struct SameService<S: ?Sized> {
    _service: PhantomData<fn(&S)>,
}

impl<S: ?Sized + 'static> TrackingTraits for SameService<S> {
    type Service = S;
    type Tracked = ServiceHandle<S>;
    type Output = ServiceHandle<S>;
    type Arg<'a> = &'a ServiceHandle<S>;
    type Canonical = ServiceHandle<S>;

    fn is_valid(tracked: &ServiceHandle<S>) -> bool {
        !tracked.is_null()
    }

    fn default_value() -> ServiceHandle<S> {
        ServiceHandle::null()
    }

    fn dispose(tracked: &mut ServiceHandle<S>) {
        tracked.reset();
    }

    fn convert_to_tracked(service: &ServiceHandle<S>) -> Result<ServiceHandle<S>, TrackerError> {
        Ok(service.clone())
    }

    fn as_arg(tracked: &mut ServiceHandle<S>) -> &ServiceHandle<S> {
        tracked
    }
}

impl<S: ServiceInterface + ?Sized> SynthesizedConversion for SameService<S> {
    fn canonical_from(interfaces: &InterfaceMap) -> ServiceHandle<S> {
        interfaces.service::<S>()
    }
}

/// Bundle for tracking contract `S` as a handle to some other type `U`.
///
/// Exists to be paired with a custom customizer: there is no general way to
/// turn an `S` into a `U`, so [`TrackingTraits::convert_to_tracked`] faults.
pub struct DistinctHandle<S: ?Sized, U: ?Sized> {
    _service: PhantomData<fn(&S)>,
    _target: PhantomData<fn(&U)>,
}

impl<S: ?Sized + 'static, U: ?Sized + 'static> TrackingTraits for DistinctHandle<S, U> {
    type Service = S;
    type Tracked = ServiceHandle<U>;
    type Output = ServiceHandle<U>;
    type Arg<'a> = &'a ServiceHandle<U>;
    type Canonical = ServiceHandle<S>;

    fn is_valid(tracked: &ServiceHandle<U>) -> bool {
        !tracked.is_null()
    }

    fn default_value() -> ServiceHandle<U> {
        ServiceHandle::null()
    }

    fn dispose(tracked: &mut ServiceHandle<U>) {
        tracked.reset();
    }

    fn convert_to_tracked(_service: &ServiceHandle<S>) -> Result<ServiceHandle<U>, TrackerError> {
        let err = TrackerError::customizer_required::<S, ServiceHandle<U>>();
        log::warn!("tracker: {err}");
        Err(err)
    }

    fn as_arg(tracked: &mut ServiceHandle<U>) -> &ServiceHandle<U> {
        tracked
    }
}
