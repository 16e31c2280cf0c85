//! Common test utilities for cleanclip-content-core integration tests

pub mod mock_repos;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use cleanclip_content_core::ContentService;
use cleanclip_types::FixedClock;

#[allow(unused_imports)]
pub use mock_repos::{InMemoryStore, StaleReadDeliveries};

/// Content service with every repository backed by one store
#[allow(dead_code)]
pub fn content_service(
    store: &Arc<InMemoryStore>,
    clock: &FixedClock,
) -> ContentService<InMemoryStore, InMemoryStore, InMemoryStore> {
    ContentService::new(
        Arc::clone(store),
        Arc::clone(store),
        Arc::clone(store),
        Arc::new(clock.clone()),
    )
}

#[allow(dead_code)]
pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}
