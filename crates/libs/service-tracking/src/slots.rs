use core::fmt;
use std::collections::BTreeMap;

use crate::config::TrackingConfig;
use crate::customizer::ServiceTrackerCustomizer;
use crate::error::TrackerError;
use crate::reference::{ServiceId, ServiceReference};
use crate::selector::{TrackedFor, TrackedOutput, TraitsOf};
use crate::traits::TrackingTraits;

/// Registry event for one service, as delivered to a tracker.
pub enum ServiceEvent<S: ?Sized> {
    Registered(ServiceReference<S>),
    Modified(ServiceReference<S>),
    Unregistering(ServiceReference<S>),
}

impl<S: ?Sized> ServiceEvent<S> {
    pub fn reference(&self) -> ServiceReference<S> {
        match self {
            Self::Registered(reference)
            | Self::Modified(reference)
            | Self::Unregistering(reference) => *reference,
        }
    }
}

impl<S: ?Sized> Clone for ServiceEvent<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for ServiceEvent<S> {}

impl<S: ?Sized> fmt::Debug for ServiceEvent<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Registered(_) => "Registered",
            Self::Modified(_) => "Modified",
            Self::Unregistering(_) => "Unregistering",
        };
        f.debug_tuple(kind).field(&self.reference()).finish()
    }
}

/// What applying an event did to the tracked set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotChange {
    /// The customizer accepted the service and its value is stored.
    Added,
    /// The service stays untracked: the customizer returned an absent value
    /// or the tracker is full.
    Declined,
    Modified,
    /// The service left the tracked set; its value was disposed.
    Removed,
    /// Nothing to do for this event.
    Ignored,
}

struct Slot<S: ?Sized, T: TrackedFor<S>> {
    reference: ServiceReference<S>,
    value: TrackedOutput<S, T>,
}

/// The tracked values of one tracker, keyed by registration.
///
/// Drives a [`ServiceTrackerCustomizer`] from registry events and owns what
/// it returns. Callers serialize access; nothing here locks.
pub struct TrackedSlots<S: ?Sized, T: TrackedFor<S>> {
    config: TrackingConfig,
    slots: BTreeMap<ServiceId, Slot<S, T>>,
}

impl<S: ?Sized, T: TrackedFor<S>> TrackedSlots<S, T> {
    pub fn new() -> Self {
        Self { config: TrackingConfig::default(), slots: BTreeMap::new() }
    }

    pub fn with_config(config: TrackingConfig) -> Result<Self, TrackerError> {
        config.validate()?;
        Ok(Self { config, slots: BTreeMap::new() })
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, id: ServiceId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn get(&self, id: ServiceId) -> Option<&TrackedOutput<S, T>> {
        self.slots.get(&id).map(|slot| &slot.value)
    }

    /// References of every tracked service, by id.
    pub fn references(&self) -> impl Iterator<Item = ServiceReference<S>> + '_ {
        self.slots.values().map(|slot| slot.reference)
    }

    /// The tracked service that ranks highest.
    pub fn highest_ranked(&self) -> Option<(ServiceReference<S>, &TrackedOutput<S, T>)> {
        self.slots
            .values()
            .max_by(|a, b| a.reference.cmp(&b.reference))
            .map(|slot| (slot.reference, &slot.value))
    }

    /// Applies one registry event.
    ///
    /// An `Err` comes from the customizer's `adding_service`; the service is
    /// left untracked and later events for it are handled as usual.
    pub fn apply<C>(
        &mut self,
        customizer: &C,
        event: ServiceEvent<S>,
    ) -> Result<SlotChange, TrackerError>
    where
        C: ServiceTrackerCustomizer<S, T> + ?Sized,
    {
        match event {
            ServiceEvent::Registered(reference) => self.add(customizer, reference),
            ServiceEvent::Modified(reference) => self.modify(customizer, reference),
            ServiceEvent::Unregistering(reference) => {
                if self.remove(customizer, reference.id()) {
                    Ok(SlotChange::Removed)
                } else {
                    log::debug!("tracker({}): {} was not tracked", self.config.name, reference);
                    Ok(SlotChange::Ignored)
                }
            }
        }
    }

    /// Stops tracking `id`. Returns `false` if it was not tracked.
    pub fn remove<C>(&mut self, customizer: &C, id: ServiceId) -> bool
    where
        C: ServiceTrackerCustomizer<S, T> + ?Sized,
    {
        let Some(mut slot) = self.slots.remove(&id) else {
            return false;
        };
        log::trace!("tracker({}): removing {}", self.config.name, slot.reference);
        customizer.removed_service(
            &slot.reference,
            <TraitsOf<S, T> as TrackingTraits>::as_arg(&mut slot.value),
        );
        <TraitsOf<S, T> as TrackingTraits>::dispose(&mut slot.value);
        true
    }

    /// Stops tracking everything, in id order. Returns how many services
    /// were removed.
    pub fn close<C>(&mut self, customizer: &C) -> usize
    where
        C: ServiceTrackerCustomizer<S, T> + ?Sized,
    {
        let ids: Vec<ServiceId> = self.slots.keys().copied().collect();
        let removed = ids.into_iter().filter(|id| self.remove(customizer, *id)).count();
        if removed > 0 {
            log::debug!("tracker({}): closed, {} services released", self.config.name, removed);
        }
        removed
    }

    fn add<C>(
        &mut self,
        customizer: &C,
        reference: ServiceReference<S>,
    ) -> Result<SlotChange, TrackerError>
    where
        C: ServiceTrackerCustomizer<S, T> + ?Sized,
    {
        if self.slots.contains_key(&reference.id()) {
            log::debug!("tracker({}): {} already tracked", self.config.name, reference);
            return Ok(SlotChange::Ignored);
        }
        if let Some(max) = self.config.max_tracked {
            if self.slots.len() >= max {
                log::warn!(
                    "tracker({}): capacity {} reached, declining {}",
                    self.config.name,
                    max,
                    reference
                );
                return Ok(SlotChange::Declined);
            }
        }

        let value = customizer.adding_service(&reference).map_err(|err| {
            log::debug!("tracker({}): adding {} failed: {}", self.config.name, reference, err);
            err
        })?;
        if !<TraitsOf<S, T> as TrackingTraits>::is_valid(&value) {
            log::debug!("tracker({}): {} declined", self.config.name, reference);
            return Ok(SlotChange::Declined);
        }

        log::trace!("tracker({}): tracking {}", self.config.name, reference);
        self.slots.insert(reference.id(), Slot { reference, value });
        Ok(SlotChange::Added)
    }

    fn modify<C>(
        &mut self,
        customizer: &C,
        reference: ServiceReference<S>,
    ) -> Result<SlotChange, TrackerError>
    where
        C: ServiceTrackerCustomizer<S, T> + ?Sized,
    {
        match self.slots.get_mut(&reference.id()) {
            Some(slot) => {
                slot.reference = reference;
                customizer.modified_service(
                    &slot.reference,
                    <TraitsOf<S, T> as TrackingTraits>::as_arg(&mut slot.value),
                );
                Ok(SlotChange::Modified)
            }
            None if self.config.track_on_modified => self.add(customizer, reference),
            None => {
                log::debug!(
                    "tracker({}): ignoring change of untracked {}",
                    self.config.name,
                    reference
                );
                Ok(SlotChange::Ignored)
            }
        }
    }
}

impl<S: ?Sized, T: TrackedFor<S>> Default for TrackedSlots<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized, T: TrackedFor<S>> fmt::Debug for TrackedSlots<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackedSlots")
            .field("name", &self.config.name)
            .field("tracked", &self.slots.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::handle::ServiceHandle;

    trait Codec: Send + Sync {
        fn id(&self) -> u8;
    }

    crate::service_interface!(dyn Codec, "test.Codec");

    struct Opus;

    impl Codec for Opus {
        fn id(&self) -> u8 {
            111
        }
    }

    /// Accepts services with a non-negative ranking and records callbacks.
    #[derive(Default)]
    struct Recorder {
        adds: AtomicUsize,
        modified: Mutex<Vec<ServiceId>>,
        removed: Mutex<Vec<ServiceId>>,
    }

    impl ServiceTrackerCustomizer<dyn Codec> for Recorder {
        fn adding_service(
            &self,
            reference: &ServiceReference<dyn Codec>,
        ) -> Result<ServiceHandle<dyn Codec>, TrackerError> {
            self.adds.fetch_add(1, Ordering::SeqCst);
            if reference.ranking() == i32::MIN {
                return Err(TrackerError::customizer(reference.id(), "refused"));
            }
            if reference.ranking() < 0 {
                return Ok(ServiceHandle::null());
            }
            let codec: Arc<dyn Codec> = Arc::new(Opus);
            Ok(codec.into())
        }

        fn modified_service(
            &self,
            reference: &ServiceReference<dyn Codec>,
            _service: &ServiceHandle<dyn Codec>,
        ) {
            self.modified.lock().expect("modified lock").push(reference.id());
        }

        fn removed_service(
            &self,
            reference: &ServiceReference<dyn Codec>,
            service: &ServiceHandle<dyn Codec>,
        ) {
            assert!(!service.is_null());
            self.removed.lock().expect("removed lock").push(reference.id());
        }
    }

    fn codec(id: u64, ranking: i32) -> ServiceReference<dyn Codec> {
        ServiceReference::new(ServiceId(id), ranking)
    }

    type Slots = TrackedSlots<dyn Codec, ServiceHandle<dyn Codec>>;

    #[test]
    fn register_then_unregister() {
        let recorder = Recorder::default();
        let mut slots = Slots::new();

        let change = slots.apply(&recorder, ServiceEvent::Registered(codec(1, 0))).expect("apply");
        assert_eq!(change, SlotChange::Added);
        assert_eq!(slots.get(ServiceId(1)).and_then(|c| c.get()).map(|c| c.id()), Some(111));

        let change =
            slots.apply(&recorder, ServiceEvent::Unregistering(codec(1, 0))).expect("apply");
        assert_eq!(change, SlotChange::Removed);
        assert!(slots.is_empty());
        assert_eq!(*recorder.removed.lock().expect("removed lock"), vec![ServiceId(1)]);
    }

    #[test]
    fn declined_service_is_not_stored() {
        let recorder = Recorder::default();
        let mut slots = Slots::new();

        let change = slots.apply(&recorder, ServiceEvent::Registered(codec(2, -1))).expect("apply");
        assert_eq!(change, SlotChange::Declined);
        assert!(!slots.contains(ServiceId(2)));

        let change =
            slots.apply(&recorder, ServiceEvent::Unregistering(codec(2, -1))).expect("apply");
        assert_eq!(change, SlotChange::Ignored);
        assert!(recorder.removed.lock().expect("removed lock").is_empty());
    }

    #[test]
    fn customizer_error_leaves_service_untracked() {
        let recorder = Recorder::default();
        let mut slots = Slots::new();

        let err = slots
            .apply(&recorder, ServiceEvent::Registered(codec(3, i32::MIN)))
            .expect_err("refused");
        assert_eq!(err, TrackerError::customizer(ServiceId(3), "refused"));
        assert!(slots.is_empty());
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let recorder = Recorder::default();
        let mut slots = Slots::new();

        slots.apply(&recorder, ServiceEvent::Registered(codec(4, 0))).expect("apply");
        let change = slots.apply(&recorder, ServiceEvent::Registered(codec(4, 0))).expect("apply");
        assert_eq!(change, SlotChange::Ignored);
        assert_eq!(recorder.adds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn modification_updates_reference() {
        let recorder = Recorder::default();
        let mut slots = Slots::new();

        slots.apply(&recorder, ServiceEvent::Registered(codec(5, 0))).expect("apply");
        let change = slots.apply(&recorder, ServiceEvent::Modified(codec(5, 9))).expect("apply");
        assert_eq!(change, SlotChange::Modified);
        assert_eq!(slots.references().map(|r| r.ranking()).collect::<Vec<_>>(), vec![9]);
        assert_eq!(*recorder.modified.lock().expect("modified lock"), vec![ServiceId(5)]);
    }

    #[test]
    fn modification_of_untracked_follows_config() {
        let recorder = Recorder::default();

        let mut eager = Slots::new();
        let change = eager.apply(&recorder, ServiceEvent::Modified(codec(6, 0))).expect("apply");
        assert_eq!(change, SlotChange::Added);

        let config = TrackingConfig { track_on_modified: false, ..TrackingConfig::default() };
        let mut strict = Slots::with_config(config).expect("valid config");
        let change = strict.apply(&recorder, ServiceEvent::Modified(codec(6, 0))).expect("apply");
        assert_eq!(change, SlotChange::Ignored);
        assert!(strict.is_empty());
    }

    #[test]
    fn capacity_declines_without_calling_customizer() {
        let recorder = Recorder::default();
        let config = TrackingConfig { max_tracked: Some(1), ..TrackingConfig::default() };
        let mut slots = Slots::with_config(config).expect("valid config");

        slots.apply(&recorder, ServiceEvent::Registered(codec(7, 0))).expect("apply");
        let change = slots.apply(&recorder, ServiceEvent::Registered(codec(8, 0))).expect("apply");
        assert_eq!(change, SlotChange::Declined);
        assert_eq!(recorder.adds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn highest_ranked_prefers_ranking_then_older_id() {
        let recorder = Recorder::default();
        let mut slots = Slots::new();
        for (id, ranking) in [(10, 1), (11, 5), (12, 5)] {
            slots.apply(&recorder, ServiceEvent::Registered(codec(id, ranking))).expect("apply");
        }

        let (best, _) = slots.highest_ranked().expect("tracked services");
        assert_eq!(best.id(), ServiceId(11));
    }

    #[test]
    fn close_removes_all_in_id_order() {
        let recorder = Recorder::default();
        let mut slots = Slots::new();
        for id in [22, 20, 21] {
            slots.apply(&recorder, ServiceEvent::Registered(codec(id, 0))).expect("apply");
        }

        assert_eq!(slots.close(&recorder), 3);
        assert!(slots.is_empty());
        assert_eq!(
            *recorder.removed.lock().expect("removed lock"),
            vec![ServiceId(20), ServiceId(21), ServiceId(22)]
        );
        assert_eq!(slots.close(&recorder), 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = TrackingConfig { max_tracked: Some(0), ..TrackingConfig::default() };
        let err = Slots::with_config(config).expect_err("zero capacity");
        assert!(matches!(err, TrackerError::InvalidConfig { .. }));
    }
}
