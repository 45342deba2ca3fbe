//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::runtime::Clock;
use crate::tree::{Child, Root};

/// A clock that never waits, remembering what it was asked to sleep for.
#[derive(Default)]
pub struct ImmediateClock {
    slept: Mutex<Vec<Duration>>,
}

impl ImmediateClock {
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for ImmediateClock {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

/// Creates the full tree on an `ImmediateClock` with no chain delay.
pub fn test_root() -> Root {
    Root::new(Child::new(Arc::new(ImmediateClock::default()), Duration::ZERO))
}
