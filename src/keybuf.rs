//! Keypad sample ring buffer
//!
//! One slot per scan cycle, each slot holding a pressed mask per keypad
//! column (bit set = pressed). The scanner runs in the tick context and is
//! the only writer; the resolver runs in thread mode and only reads.
//!
//! Every column field and the cursor are word-sized atomics, so a reader
//! always sees a whole mask. The scanner fills the slot after the cursor and
//! then publishes it by advancing, which makes "advance + write" look like
//! one step to a reader that latches the cursor first. A window read can
//! still straddle a scan; the capacity margin over the debounce window keeps
//! that to the oldest sample of the window.

use portable_atomic::{AtomicU8, AtomicUsize, Ordering};

/// Mask stored for a column with no key down
pub const RELEASED: u8 = 0;

/// Read-only view of the sample history, as seen by the resolver
pub trait SampleHistory {
    /// Index of the most recently published slot
    fn latest(&self) -> usize;

    /// Mask of `column` recorded `offset` scans before the slot at `cursor`
    fn sample_at(&self, cursor: usize, offset: usize, column: usize) -> u8;

    /// Number of slots kept
    fn capacity(&self) -> usize;
}

pub struct KeyBuffer<const SLOTS: usize, const COLUMNS: usize> {
    cursor: AtomicUsize,
    slots: [[AtomicU8; COLUMNS]; SLOTS],
}

impl<const SLOTS: usize, const COLUMNS: usize> KeyBuffer<SLOTS, COLUMNS> {
    /// A buffer with every slot released and the cursor at slot 0
    pub const fn new() -> Self {
        assert!(SLOTS > 0);
        Self {
            cursor: AtomicUsize::new(0),
            slots: [const { [const { AtomicU8::new(RELEASED) }; COLUMNS] }; SLOTS],
        }
    }

    /// Zero the cursor and mark every key released in every slot.
    ///
    /// Must run before the tick source is armed.
    pub fn reset(&self) {
        self.cursor.store(0, Ordering::Release);
        for slot in self.slots.iter() {
            for column in slot.iter() {
                column.store(RELEASED, Ordering::Relaxed);
            }
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    pub const fn capacity(&self) -> usize {
        SLOTS
    }

    /// Move the cursor to the next slot, wrapping, and return it
    pub fn advance(&self) -> usize {
        let next = Self::next_slot(self.cursor.load(Ordering::Relaxed));
        self.cursor.store(next, Ordering::Release);
        next
    }

    /// Store `mask` for `column` in the current slot
    pub fn write(&self, column: usize, mask: u8) {
        self.store(self.cursor.load(Ordering::Relaxed), column, mask);
    }

    /// Store `mask` for `column` in the slot the next [`advance`] publishes
    ///
    /// [`advance`]: KeyBuffer::advance
    pub fn stage(&self, column: usize, mask: u8) {
        self.store(Self::next_slot(self.cursor.load(Ordering::Relaxed)), column, mask);
    }

    /// Mask of `column` recorded `offset` scans ago (0 = current slot)
    pub fn read(&self, offset: usize, column: usize) -> u8 {
        self.sample_at(self.cursor(), offset, column)
    }

    fn store(&self, slot: usize, column: usize, mask: u8) {
        // Out-of-range columns are dropped; this runs in the tick context
        if let Some(cell) = self.slots[slot].get(column) {
            cell.store(mask, Ordering::Relaxed);
        }
    }

    const fn next_slot(cursor: usize) -> usize {
        (cursor + 1) % SLOTS
    }
}

impl<const SLOTS: usize, const COLUMNS: usize> SampleHistory for KeyBuffer<SLOTS, COLUMNS> {
    fn latest(&self) -> usize {
        self.cursor()
    }

    fn sample_at(&self, cursor: usize, offset: usize, column: usize) -> u8 {
        debug_assert!(offset < SLOTS);
        let slot = (cursor % SLOTS + SLOTS - offset % SLOTS) % SLOTS;
        self.slots[slot]
            .get(column)
            .map_or(RELEASED, |cell| cell.load(Ordering::Relaxed))
    }

    fn capacity(&self) -> usize {
        SLOTS
    }
}

impl<const SLOTS: usize, const COLUMNS: usize> Default for KeyBuffer<SLOTS, COLUMNS> {
    fn default() -> Self {
        Self::new()
    }
}
