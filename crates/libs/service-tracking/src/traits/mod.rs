//! Behavior bundles.
//!
//! A bundle is a zero-sized marker type implementing [`TrackingTraits`] for
//! one `(service, tracked)` pair. It answers four questions for the tracker:
//! is a stored value live, what does "absent" look like, how is a value
//! released, and how is the value built from the service's canonical form.
//!
//! | Bundle | Tracked as | Absent value | Default conversion |
//! |---|---|---|---|
//! | [`SameService<S>`] | `ServiceHandle<S>` | null | identity |
//! | [`DistinctHandle<S, U>`] | `ServiceHandle<U>` | null | none |
//! | [`ValueTraits<S, V>`] | `V` | `V::default()` | none |
//! | [`InterfaceMapTraits`] | `InterfaceMap` | empty map | identity |

mod handle;
mod untyped;
mod value;

pub use handle::{DistinctHandle, SameService};
pub use untyped::InterfaceMapTraits;
pub use value::{PresenceFlag, ValueTraits};

use crate::error::TrackerError;
use crate::interface_map::InterfaceMap;
use crate::reference::ServiceReference;

/// The operations and types bound to one `(service, tracked)` pair.
pub trait TrackingTraits: 'static {
    /// The contract the service is tracked under.
    type Service: ?Sized;
    /// The representation the customizer author asked for.
    type Tracked;
    /// What `adding_service` returns and the tracker stores.
    type Output: 'static;
    /// How a stored value is handed to `modified_service`/`removed_service`.
    type Arg<'a>;
    /// The service's canonical form, input of `convert_to_tracked`.
    type Canonical;

    fn is_valid(tracked: &Self::Output) -> bool;

    /// The "absent" value. Never valid.
    fn default_value() -> Self::Output;

    /// Releases a stored value, leaving it equal to `default_value()`.
    fn dispose(tracked: &mut Self::Output);

    /// Builds the tracked value from the canonical service form.
    ///
    /// Bundles without a lossless default fail with
    /// [`TrackerError::CustomizerRequired`] instead of returning an absent
    /// value, which would read as "do not track".
    ///
    /// Bundles are stateless and do not know which tracker calls them, so
    /// the fault is logged under the bare `tracker:` prefix; trackers log
    /// under `tracker({name}):`.
    fn convert_to_tracked(service: &Self::Canonical) -> Result<Self::Output, TrackerError>;

    /// Borrows a stored value in argument form.
    fn as_arg(tracked: &mut Self::Output) -> Self::Arg<'_>;
}

/// Bundles whose conversion can be synthesized from the registry's view of
/// a service. Only the identity mappings implement it.
pub trait SynthesizedConversion: TrackingTraits {
    fn canonical_from(interfaces: &InterfaceMap) -> Self::Canonical;
}

/// `ServiceReferenceType` of a bundle.
pub type ReferenceOf<Tr> = ServiceReference<<Tr as TrackingTraits>::Service>;
