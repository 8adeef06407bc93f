//! Correlation reference generation
//!
//! Generated references look like `task-<unix-seconds>-<8 lowercase hex>`.
//! They are unlikely to collide but are not a uniqueness guarantee.

use std::sync::Arc;

use corezoid_domain::constants::{REFERENCE_PREFIX, REFERENCE_SUFFIX_LEN};

use crate::ports::{Clock, SystemClock};

/// Produces references for operations the caller did not name.
pub trait ReferenceGenerator: Send + Sync {
    /// A fresh reference for the next unnamed operation.
    fn next_reference(&self) -> String;
}

/// Default generator: clock seconds plus a random suffix.
#[derive(Clone)]
pub struct TimestampReferenceGenerator {
    clock: Arc<dyn Clock>,
}

impl TimestampReferenceGenerator {
    /// Generator reading the current second from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl Default for TimestampReferenceGenerator {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl ReferenceGenerator for TimestampReferenceGenerator {
    fn next_reference(&self) -> String {
        let random = uuid::Uuid::new_v4().simple().to_string();
        let suffix = &random[..REFERENCE_SUFFIX_LEN];
        format!("{REFERENCE_PREFIX}-{}-{suffix}", self.clock.unix_seconds())
    }
}

impl<F> ReferenceGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn next_reference(&self) -> String {
        self()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use regex::Regex;

    use super::*;

    struct FrozenClock(i64);

    impl Clock for FrozenClock {
        fn unix_seconds(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn generated_reference_has_expected_shape() {
        let generator = TimestampReferenceGenerator::new(Arc::new(FrozenClock(1_700_000_000)));
        let reference = generator.next_reference();
        let pattern = Regex::new(r"^task-1700000000-[0-9a-f]{8}$").unwrap();
        assert!(pattern.is_match(&reference), "unexpected reference {reference}");
    }

    #[test]
    fn consecutive_references_differ() {
        let generator = TimestampReferenceGenerator::new(Arc::new(FrozenClock(1)));
        let references: HashSet<String> = (0..50).map(|_| generator.next_reference()).collect();
        assert_eq!(references.len(), 50);
    }

    #[test]
    fn closures_can_stand_in_for_a_generator() {
        let generator = || "fixed-ref".to_string();
        assert_eq!(generator.next_reference(), "fixed-ref");
    }
}
