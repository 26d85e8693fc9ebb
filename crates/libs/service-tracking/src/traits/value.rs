use core::marker::PhantomData;

use crate::error::TrackerError;
use crate::handle::ServiceHandle;

use super::TrackingTraits;

/// A value that can say whether it holds something.
///
/// `false` means "absent"; a default-constructed value must report `false`.
pub trait PresenceFlag {
    fn is_present(&self) -> bool;
}

impl PresenceFlag for bool {
    fn is_present(&self) -> bool {
        *self
    }
}

impl<T> PresenceFlag for Option<T> {
    fn is_present(&self) -> bool {
        self.is_some()
    }
}

/// Bundle for tracking contract `S` as a self-contained value `V`.
///
/// Like [`DistinctHandle`](super::DistinctHandle) it has no default
/// conversion; a custom customizer builds the value.
pub struct ValueTraits<S: ?Sized, V> {
    _service: PhantomData<fn(&S)>,
    _value: PhantomData<fn() -> V>,
}

impl<S, V> TrackingTraits for ValueTraits<S, V>
where
    S: ?Sized + 'static,
    V: Default + PresenceFlag + 'static,
{
    type Service = S;
    type Tracked = V;
    type Output = V;
    type Arg<'a> = &'a mut V;
    type Canonical = ServiceHandle<S>;

    fn is_valid(tracked: &V) -> bool {
        tracked.is_present()
    }

    fn default_value() -> V {
        V::default()
    }

    /// Drops the held value in place; whatever it owned is released by its
    /// own `Drop`.
    fn dispose(tracked: &mut V) {
        *tracked = V::default();
    }

    fn convert_to_tracked(_service: &ServiceHandle<S>) -> Result<V, TrackerError> {
        let err = TrackerError::customizer_required::<S, V>();
        log::warn!("tracker: {err}");
        Err(err)
    }

    fn as_arg(tracked: &mut V) -> &mut V {
        tracked
    }
}
