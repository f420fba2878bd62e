//! Per-action-class busy flags.
//!
//! A flag is held through a guard; dropping the guard clears it, so early
//! returns and `?` never leave a flag stuck on.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct BusyFlag {
    held: AtomicBool,
}

impl BusyFlag {
    /// Claim the flag, or `None` if an operation of this class is in flight.
    pub fn try_acquire(&self) -> Option<BusyGuard<'_>> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard { flag: self })
    }

    pub fn is_busy(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct BusyGuard<'a> {
    flag: &'a BusyFlag,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.held.store(false, Ordering::Release);
    }
}

/// The action classes that may overlap with each other.
#[derive(Debug, Default)]
pub struct BusyFlags {
    pub collections: BusyFlag,
    pub content: BusyFlag,
    pub settings: BusyFlag,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BusySnapshot {
    pub collections: bool,
    pub content: bool,
    pub settings: bool,
}

impl BusyFlags {
    pub fn snapshot(&self) -> BusySnapshot {
        BusySnapshot {
            collections: self.collections.is_busy(),
            content: self.content.is_busy(),
            settings: self.settings.is_busy(),
        }
    }
}
