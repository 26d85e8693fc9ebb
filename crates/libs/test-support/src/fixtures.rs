use std::sync::atomic::{AtomicUsize, Ordering};

use service_tracking::{distinct_handle, service_interface, tracked_value, PresenceFlag};

pub trait Greeter: Send + Sync {
    fn greet(&self, name: &str) -> String;
}

pub trait Counter: Send + Sync {
    fn increment(&self) -> usize;
    fn count(&self) -> usize;
}

service_interface!(dyn Greeter, "test.Greeter");
service_interface!(dyn Counter, "test.Counter");

// Greeters tracked through the counter they also publish.
distinct_handle!(dyn Greeter => dyn Counter);
// Counters tracked as the lease granted to them.
tracked_value!(dyn Counter => Lease);

/// One object published as both a greeter and a counter; each greeting
/// bumps the count.
#[derive(Debug, Default)]
pub struct Plain {
    greetings: AtomicUsize,
}

impl Greeter for Plain {
    fn greet(&self, name: &str) -> String {
        self.increment();
        format!("hello, {name}")
    }
}

impl Counter for Plain {
    fn increment(&self) -> usize {
        self.greetings.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn count(&self) -> usize {
        self.greetings.load(Ordering::SeqCst)
    }
}

/// Standalone counter.
#[derive(Debug, Default)]
pub struct Tally(AtomicUsize);

impl Counter for Tally {
    fn increment(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// A tracked value: the lease granted to a service, absent when `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lease(pub Option<u32>);

impl PresenceFlag for Lease {
    fn is_present(&self) -> bool {
        self.0.is_some()
    }
}
