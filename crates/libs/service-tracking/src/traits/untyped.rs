use crate::error::TrackerError;
use crate::handle::AnyHandle;
use crate::interface_map::InterfaceMap;
use crate::reference::Untyped;

use super::{SynthesizedConversion, TrackingTraits};

/// Bundle for untyped tracking: the customizer works with the full
/// interface map of each service.
pub struct InterfaceMapTraits;

impl TrackingTraits for InterfaceMapTraits {
    type Service = Untyped;
    type Tracked = AnyHandle;
    type Output = InterfaceMap;
    type Arg<'a> = &'a InterfaceMap;
    type Canonical = InterfaceMap;

    fn is_valid(tracked: &InterfaceMap) -> bool {
        !tracked.is_empty()
    }

    fn default_value() -> InterfaceMap {
        InterfaceMap::new()
    }

    fn dispose(tracked: &mut InterfaceMap) {
        tracked.clear();
    }

    fn convert_to_tracked(service: &InterfaceMap) -> Result<InterfaceMap, TrackerError> {
        Ok(service.clone())
    }

    fn as_arg(tracked: &mut InterfaceMap) -> &InterfaceMap {
        tracked
    }
}

impl SynthesizedConversion for InterfaceMapTraits {
    fn canonical_from(interfaces: &InterfaceMap) -> InterfaceMap {
        interfaces.clone()
    }
}
