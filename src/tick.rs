//! Millisecond system clock
//!
//! `tick()` is called every millisecond from the high priority executor and
//! is the only writer. Thread-mode code reads the counters and uses
//! [`SecondsWatcher`] to redraw only when the seconds value changes.

use portable_atomic::{AtomicU32, Ordering};

use crate::config::TICKS_PER_SECOND;

pub struct SysClock {
    millis: AtomicU32,
    /// Ticks into the current second, independent of `millis` wrapping
    sub_millis: AtomicU32,
    seconds: AtomicU32,
}

impl SysClock {
    pub const fn new() -> Self {
        Self {
            millis: AtomicU32::new(0),
            sub_millis: AtomicU32::new(0),
            seconds: AtomicU32::new(0),
        }
    }

    /// Count one millisecond
    pub fn tick(&self) {
        // Single writer: load/store keeps this free of read-modify-write
        // atomics, which Cortex-M0+ lacks
        let millis = self.millis.load(Ordering::Relaxed).wrapping_add(1);
        self.millis.store(millis, Ordering::Relaxed);

        let sub_millis = self.sub_millis.load(Ordering::Relaxed) + 1;
        if sub_millis >= TICKS_PER_SECOND {
            self.sub_millis.store(0, Ordering::Relaxed);
            let seconds = self.seconds.load(Ordering::Relaxed).wrapping_add(1);
            self.seconds.store(seconds, Ordering::Release);
        } else {
            self.sub_millis.store(sub_millis, Ordering::Relaxed);
        }
    }

    pub fn millis(&self) -> u32 {
        self.millis.load(Ordering::Relaxed)
    }

    pub fn seconds(&self) -> u32 {
        self.seconds.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.millis.store(0, Ordering::Relaxed);
        self.sub_millis.store(0, Ordering::Relaxed);
        self.seconds.store(0, Ordering::Release);
    }
}

impl Default for SysClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Remembers the last seconds value seen by the main loop
pub struct SecondsWatcher {
    last: u32,
}

impl SecondsWatcher {
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    /// The new seconds value, once per change
    pub fn poll(&mut self, clock: &SysClock) -> Option<u32> {
        let now = clock.seconds();
        if now == self.last {
            None
        } else {
            self.last = now;
            Some(now)
        }
    }
}

impl Default for SecondsWatcher {
    fn default() -> Self {
        Self::new()
    }
}
