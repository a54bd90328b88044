//! Debounced key state queries
//!
//! `key_check` looks at the last `KEY_CHECK_COUNT` samples of the key's
//! column. Every sample pressed means On, every sample released means Off,
//! anything else is reported as Transitioning. A single odd sample is
//! enough to hold a key in Transitioning.

use crate::config::{KEY_CHECK_COUNT, KEY_COUNT};
use crate::keybuf::SampleHistory;
use crate::types::{KeyEdge, KeyId, KeyState};

/// Debounced state of key number `key_id` (1-12).
///
/// Numbers outside the keypad return [`KeyState::Invalid`] without touching
/// the history. Safe to call from thread mode at any time.
pub fn key_check<H: SampleHistory + ?Sized>(history: &H, key_id: i32) -> KeyState {
    match KeyId::new(key_id) {
        Some(key) => key_state(history, key),
        None => KeyState::Invalid,
    }
}

/// Debounced state of an already validated key
pub fn key_state<H: SampleHistory + ?Sized>(history: &H, key: KeyId) -> KeyState {
    debug_assert!(KEY_CHECK_COUNT < history.capacity());

    // Latch the cursor once so a scan landing mid-read shifts at most the
    // oldest sample instead of the whole window
    let cursor = history.latest();
    let pressed = (0..KEY_CHECK_COUNT)
        .filter(|&offset| history.sample_at(cursor, offset, key.column()) & key.mask() != 0)
        .count();

    KeyState::from_count(pressed, KEY_CHECK_COUNT)
}

// ===================================================================
// Edge Detection
// ===================================================================

/// Turns repeated state queries into press/release edges.
///
/// Only settled results move the remembered state, so a key bouncing
/// through Transitioning reports a single edge once it settles.
pub struct KeyWatcher {
    pressed: [bool; KEY_COUNT],
}

impl KeyWatcher {
    /// All keys start released, matching a freshly reset buffer
    pub const fn new() -> Self {
        Self {
            pressed: [false; KEY_COUNT],
        }
    }

    /// Feed one resolved state, returning the edge it completes if any
    pub fn update(&mut self, key: KeyId, state: KeyState) -> Option<KeyEdge> {
        let pressed = match state {
            KeyState::On => true,
            KeyState::Off => false,
            KeyState::Transitioning | KeyState::Invalid => return None,
        };

        let slot = &mut self.pressed[key.index()];
        if *slot == pressed {
            return None;
        }
        *slot = pressed;

        Some(if pressed {
            KeyEdge::Pressed(key)
        } else {
            KeyEdge::Released(key)
        })
    }

    /// Query every key and return the first edge found
    pub fn poll<H: SampleHistory + ?Sized>(&mut self, history: &H) -> Option<KeyEdge> {
        KeyId::all().find_map(|key| self.update(key, key_state(history, key)))
    }

    pub fn is_pressed(&self, key: KeyId) -> bool {
        self.pressed[key.index()]
    }
}

impl Default for KeyWatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KEYBUF_SIZE;
    use crate::keybuf::KeyBuffer;
    use std::cell::Cell;

    type Buffer = KeyBuffer<KEYBUF_SIZE, 4>;

    /// Push one sample per entry (oldest first) for a single column
    fn feed(buf: &Buffer, column: usize, masks: &[u8]) {
        for &mask in masks {
            buf.stage(column, mask);
            buf.advance();
        }
    }

    /// History wrapper that counts every access
    struct Counting<'a> {
        inner: &'a Buffer,
        reads: Cell<usize>,
    }

    impl SampleHistory for Counting<'_> {
        fn latest(&self) -> usize {
            self.reads.set(self.reads.get() + 1);
            self.inner.latest()
        }

        fn sample_at(&self, cursor: usize, offset: usize, column: usize) -> u8 {
            self.reads.set(self.reads.get() + 1);
            self.inner.sample_at(cursor, offset, column)
        }

        fn capacity(&self) -> usize {
            self.inner.capacity()
        }
    }

    #[test]
    fn invalid_ids_do_not_read_history() {
        let buf = Buffer::new();
        feed(&buf, 0, &[0b111; 5]);
        let counting = Counting {
            inner: &buf,
            reads: Cell::new(0),
        };

        for id in [0, 13, -1, 100, i32::MIN] {
            assert_eq!(key_check(&counting, id), KeyState::Invalid);
        }
        assert_eq!(counting.reads.get(), 0);

        key_check(&counting, 1);
        assert_eq!(counting.reads.get(), 1 + KEY_CHECK_COUNT);
    }

    #[test]
    fn fresh_buffer_reads_off() {
        let buf = Buffer::new();
        assert_eq!(key_check(&buf, 5), KeyState::Off);
    }

    #[test]
    fn only_the_window_counts() {
        let buf = Buffer::new();
        // Old bounce followed by a full window of presses on key 1
        feed(&buf, 0, &[0b001, 0, 0b001, 0b001, 0b001, 0b001, 0b001]);
        assert_eq!(key_check(&buf, 1), KeyState::On);
        // Neighbouring bits in the same column stay released
        assert_eq!(key_check(&buf, 2), KeyState::Off);
        assert_eq!(key_check(&buf, 3), KeyState::Off);
    }

    #[test]
    fn single_odd_sample_anywhere_holds_transition() {
        for odd in 0..KEY_CHECK_COUNT {
            let buf = Buffer::new();
            let mut masks = [0b100u8; KEY_CHECK_COUNT];
            masks[odd] = 0;
            feed(&buf, 2, &masks);
            assert_eq!(key_check(&buf, 9), KeyState::Transitioning, "odd sample {}", odd);
        }
    }

    #[test]
    fn repeated_queries_agree() {
        let buf = Buffer::new();
        feed(&buf, 1, &[0b010, 0b010, 0, 0b010, 0b010]);
        let first = key_check(&buf, 5);
        for _ in 0..10 {
            assert_eq!(key_check(&buf, 5), first);
        }
    }

    #[test]
    fn watcher_reports_settled_edges_once() {
        let key = KeyId::new(7).unwrap();
        let mut watcher = KeyWatcher::new();

        assert_eq!(watcher.update(key, KeyState::Off), None);
        assert_eq!(watcher.update(key, KeyState::Transitioning), None);
        assert_eq!(watcher.update(key, KeyState::On), Some(KeyEdge::Pressed(key)));
        assert_eq!(watcher.update(key, KeyState::On), None);
        assert!(watcher.is_pressed(key));
        assert_eq!(watcher.update(key, KeyState::Transitioning), None);
        assert_eq!(watcher.update(key, KeyState::Invalid), None);
        assert_eq!(watcher.update(key, KeyState::Off), Some(KeyEdge::Released(key)));
        assert!(!watcher.is_pressed(key));
    }

    #[test]
    fn watcher_poll_finds_pressed_key() {
        let buf = Buffer::new();
        let mut watcher = KeyWatcher::new();
        assert_eq!(watcher.poll(&buf), None);

        feed(&buf, 3, &[0b001; KEY_CHECK_COUNT]);
        let key = KeyId::new(10).unwrap();
        assert_eq!(watcher.poll(&buf), Some(KeyEdge::Pressed(key)));
        assert_eq!(watcher.poll(&buf), None);
    }
}
