//! Customizer contract for service trackers.
//!
//! A service tracker follows the registrations of one contract in a service
//! registry and keeps a value per matching service. What that value is gets
//! decided at compile time from the `(service, tracked)` type pair:
//!
//! - the same contract, as a [`ServiceHandle<S>`], for contracts declared
//!   with [`service_interface!`];
//! - some other handle type, bound with [`distinct_handle!`];
//! - a self-contained value with a presence flag, bound with
//!   [`tracked_value!`];
//! - the whole [`InterfaceMap`] for [`Untyped`] tracking.
//!
//! Each pair resolves to a behavior bundle ([`traits`]) that fixes the
//! signatures of [`ServiceTrackerCustomizer`]. [`DefaultCustomizer`] covers
//! the pairs that need no custom code, and [`TrackedSlots`] drives any
//! customizer from registry events.
//!
//! ```
//! use std::sync::Arc;
//! use service_tracking::{
//!     tracked_value, ServiceEvent, ServiceId, ServiceReference, ServiceTrackerCustomizer,
//!     SlotChange, TrackedSlots, TrackerError,
//! };
//!
//! pub trait Printer: Send + Sync {}
//!
//! /// Jobs queued on a printer, tracked instead of the printer itself.
//! #[derive(Default)]
//! pub struct Queue(Option<Vec<String>>);
//!
//! impl service_tracking::PresenceFlag for Queue {
//!     fn is_present(&self) -> bool {
//!         self.0.is_some()
//!     }
//! }
//!
//! tracked_value!(dyn Printer => Queue);
//!
//! struct Spooler;
//!
//! impl ServiceTrackerCustomizer<dyn Printer, Queue> for Spooler {
//!     fn adding_service(&self, _: &ServiceReference<dyn Printer>) -> Result<Queue, TrackerError> {
//!         Ok(Queue(Some(Vec::new())))
//!     }
//!
//!     fn modified_service(&self, _: &ServiceReference<dyn Printer>, queue: &mut Queue) {
//!         if let Some(jobs) = queue.0.as_mut() {
//!             jobs.push("reprint".to_owned());
//!         }
//!     }
//!
//!     fn removed_service(&self, _: &ServiceReference<dyn Printer>, queue: &mut Queue) {
//!         queue.0.take();
//!     }
//! }
//!
//! let spooler = Arc::new(Spooler);
//! let mut slots = TrackedSlots::<dyn Printer, Queue>::new();
//! let printer = ServiceReference::new(ServiceId(1), 0);
//!
//! assert_eq!(slots.apply(&spooler, ServiceEvent::Registered(printer))?, SlotChange::Added);
//! assert_eq!(slots.apply(&spooler, ServiceEvent::Modified(printer))?, SlotChange::Modified);
//! assert_eq!(slots.get(ServiceId(1)).and_then(|q| q.0.as_ref()).map(Vec::len), Some(1));
//! assert_eq!(slots.apply(&spooler, ServiceEvent::Unregistering(printer))?, SlotChange::Removed);
//! # Ok::<(), TrackerError>(())
//! ```

mod config;
mod customizer;
mod error;
mod handle;
mod interface_map;
mod reference;
mod selector;
mod slots;
mod synthesized;
pub mod traits;

pub use config::TrackingConfig;
pub use customizer::ServiceTrackerCustomizer;
pub use error::TrackerError;
pub use handle::{AnyHandle, ServiceHandle};
pub use interface_map::{InterfaceMap, ServiceInterface};
pub use reference::{ServiceId, ServiceReference, Untyped};
pub use selector::{TrackedArg, TrackedFor, TrackedOutput, TraitsOf};
pub use slots::{ServiceEvent, SlotChange, TrackedSlots};
pub use synthesized::{DefaultCustomizer, ServiceContext};
pub use traits::{PresenceFlag, ReferenceOf, SynthesizedConversion, TrackingTraits};
