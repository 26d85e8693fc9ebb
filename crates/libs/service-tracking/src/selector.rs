//! Resolution of a `(service, tracked)` pair to its behavior bundle.
//!
//! [`TrackedFor<S>`] is implemented on the tracked type. Two impls come with
//! the crate and two are declared per pair with a macro:
//!
//! - `ServiceHandle<S>` for a published contract `S` (one with a
//!   [`ServiceInterface`] id) resolves to [`SameService<S>`];
//! - `AnyHandle` for [`Untyped`] resolves to [`InterfaceMapTraits`];
//! - [`distinct_handle!`] binds `ServiceHandle<U>` for `S` to
//!   [`DistinctHandle<S, U>`](crate::traits::DistinctHandle);
//! - [`tracked_value!`] binds a presence-flag value `V` for `S` to
//!   [`ValueTraits<S, V>`](crate::traits::ValueTraits).
//!
//! Coherence keeps the rules disjoint. A pair with no impl does not compile:
//!
//! ```compile_fail
//! use service_tracking::{TraitsOf, TrackingTraits};
//!
//! pub trait Clock: Send + Sync {}
//!
//! // `String` is not a recognised tracked shape for `dyn Clock`.
//! let _ = <TraitsOf<dyn Clock, String> as TrackingTraits>::default_value();
//! ```
//!
//! and a second binding for a pair that already resolves is rejected as
//! conflicting:
//!
//! ```compile_fail
//! use service_tracking::distinct_handle;
//!
//! pub trait Clock: Send + Sync {}
//!
//! service_tracking::service_interface!(dyn Clock, "org.example.Clock");
//!
//! // `ServiceHandle<dyn Clock>` already resolves to `SameService<dyn Clock>`.
//! distinct_handle!(dyn Clock => dyn Clock);
//! ```
//!
//! The untyped marker has no contract of its own, so it is only trackable
//! as an [`AnyHandle`]:
//!
//! ```compile_fail
//! use service_tracking::{ServiceHandle, TraitsOf, TrackingTraits, Untyped};
//!
//! let _ = <TraitsOf<Untyped, ServiceHandle<Untyped>> as TrackingTraits>::default_value();
//! ```
//!
//! [`distinct_handle!`]: crate::distinct_handle
//! [`tracked_value!`]: crate::tracked_value

use crate::handle::{AnyHandle, ServiceHandle};
use crate::interface_map::ServiceInterface;
use crate::reference::Untyped;
use crate::traits::{InterfaceMapTraits, SameService, TrackingTraits};

/// Selects the behavior bundle for tracking contract `S` as `Self`.
pub trait TrackedFor<S: ?Sized>: Sized + 'static {
    type Traits: TrackingTraits<Service = S, Tracked = Self>;
}

impl<S: ServiceInterface + ?Sized> TrackedFor<S> for ServiceHandle<S> {
    type Traits = SameService<S>;
}

impl TrackedFor<Untyped> for AnyHandle {
    type Traits = InterfaceMapTraits;
}

/// The bundle resolved for `(S, T)`.
pub type TraitsOf<S, T> = <T as TrackedFor<S>>::Traits;

/// `TrackedReturnType` of `(S, T)`: what `adding_service` produces.
pub type TrackedOutput<S, T> = <TraitsOf<S, T> as TrackingTraits>::Output;

/// `TrackedArgType` of `(S, T)`: what `modified_service` and
/// `removed_service` receive.
pub type TrackedArg<'a, S, T> = <TraitsOf<S, T> as TrackingTraits>::Arg<'a>;

/// Binds `ServiceHandle<$target>` as a tracked type for contract `$service`.
///
/// The pair has no synthesized conversion, so it is only usable with a
/// custom customizer.
///
/// ```
/// use service_tracking::{distinct_handle, ServiceHandle, TraitsOf, TrackingTraits};
///
/// pub trait Clock: Send + Sync {}
/// pub trait Calendar: Send + Sync {}
///
/// distinct_handle!(dyn Clock => dyn Calendar);
///
/// type Bundle = TraitsOf<dyn Clock, ServiceHandle<dyn Calendar>>;
/// assert!(!<Bundle as TrackingTraits>::is_valid(&<Bundle as TrackingTraits>::default_value()));
/// ```
#[macro_export]
macro_rules! distinct_handle {
    ($service:ty => $target:ty) => {
        impl $crate::TrackedFor<$service> for $crate::ServiceHandle<$target> {
            type Traits = $crate::traits::DistinctHandle<$service, $target>;
        }
    };
}

/// Binds a presence-flag value type as a tracked type for contract
/// `$service`.
///
/// ```
/// use service_tracking::{tracked_value, TraitsOf, TrackingTraits};
///
/// pub trait Clock: Send + Sync {}
///
/// tracked_value!(dyn Clock => Option<u64>);
///
/// type Bundle = TraitsOf<dyn Clock, Option<u64>>;
/// let mut offset = Some(30);
/// assert!(<Bundle as TrackingTraits>::is_valid(&offset));
/// <Bundle as TrackingTraits>::dispose(&mut offset);
/// assert_eq!(offset, <Bundle as TrackingTraits>::default_value());
/// ```
#[macro_export]
macro_rules! tracked_value {
    ($service:ty => $value:ty) => {
        impl $crate::TrackedFor<$service> for $value {
            type Traits = $crate::traits::ValueTraits<$service, $value>;
        }
    };
}
