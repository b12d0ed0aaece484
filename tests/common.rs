#![allow(dead_code)]

use std::sync::{Arc, Once};

use ferrymq::core::clock::ManualClock;
use ferrymq::Broker;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = ferrymq::logging::init_logging();
    });
}

/// Broker on a manual clock starting at `start_ms`.
pub fn broker_at(start_ms: u64) -> (Broker, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start_ms));
    (Broker::with_clock(clock.clone()), clock)
}
