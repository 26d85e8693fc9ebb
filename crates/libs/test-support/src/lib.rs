//! Shared harness for the service-tracking integration tests.

mod fixtures;
mod recording;
mod registry;

use std::sync::Once;

pub use fixtures::{Counter, Greeter, Lease, Plain, Tally};
pub use recording::{Call, RecordingCustomizer};
pub use registry::MemoryContext;

static LOGGING: Once = Once::new();

/// Routes `log` output through the test harness. Safe to call from every
/// test; honours `RUST_LOG`.
pub fn init_logging() {
    LOGGING.call_once(|| {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
            .is_test(true)
            .try_init();
    });
}
