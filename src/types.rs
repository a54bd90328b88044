//! Common types and data structures used across the ufopad application
//!
//! This module contains the key identifiers, debounce results and scan
//! configuration shared by the scanner, resolver and application tasks.

use core::ops::Range;

use crate::config::{KEY_COLUMNS, KEY_LABELS, KEY_MAX, KEY_MIN, KEY_ROWS};

/// A valid keypad key, numbered 1-12 like sw1-sw12 on the schematic.
///
/// Keys 1-9 are the digit keys, 10, 11 and 12 are `*`, `0` and `#`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyId(u8);

impl KeyId {
    /// Validate a raw key number
    pub const fn new(number: i32) -> Option<Self> {
        if number < KEY_MIN || number > KEY_MAX {
            None
        } else {
            Some(Self(number as u8))
        }
    }

    /// Iterate over every key in number order
    pub fn all() -> impl Iterator<Item = KeyId> {
        (KEY_MIN..=KEY_MAX).filter_map(KeyId::new)
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    /// Scan-select column holding this key
    pub const fn column(self) -> usize {
        (self.0 as usize - 1) / KEY_ROWS
    }

    /// Row bit within the column mask
    pub const fn bit(self) -> usize {
        (self.0 as usize - 1) % KEY_ROWS
    }

    pub const fn mask(self) -> u8 {
        1 << self.bit()
    }

    /// Zero-based index, for per-key tables
    pub const fn index(self) -> usize {
        self.0 as usize - 1
    }

    /// Printed legend
    pub const fn label(self) -> char {
        KEY_LABELS[self.index()]
    }
}

/// Debounced state of a key, recomputed on every query
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyState {
    /// The key number is outside 1-12
    Invalid,
    /// Released for the whole debounce window
    Off,
    /// Pressed for the whole debounce window
    On,
    /// The window holds both pressed and released samples
    Transitioning,
}

impl KeyState {
    /// Classify `pressed` hits out of `window` samples
    pub const fn from_count(pressed: usize, window: usize) -> Self {
        if pressed == window {
            KeyState::On
        } else if pressed == 0 {
            KeyState::Off
        } else {
            KeyState::Transitioning
        }
    }

    /// Whether this is a settled On/Off result
    pub const fn is_stable(self) -> bool {
        matches!(self, KeyState::On | KeyState::Off)
    }
}

/// Stable key change reported by [`crate::resolver::KeyWatcher`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEdge {
    Pressed(KeyId),
    Released(KeyId),
}

impl KeyEdge {
    pub fn key(&self) -> KeyId {
        match self {
            KeyEdge::Pressed(k) => *k,
            KeyEdge::Released(k) => *k,
        }
    }
}

/// Which columns the scanner actively drives on every tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanPlan {
    /// Re-scan a single column; the others keep whatever each slot last held
    Single(usize),
    /// Re-scan every column into each slot
    AllColumns,
}

impl ScanPlan {
    pub const fn is_valid(&self) -> bool {
        match self {
            ScanPlan::Single(column) => *column < KEY_COLUMNS,
            ScanPlan::AllColumns => true,
        }
    }

    /// Columns visited by one scan cycle
    pub fn columns(&self) -> Range<usize> {
        match *self {
            ScanPlan::Single(column) => column..(column + 1).min(KEY_COLUMNS),
            ScanPlan::AllColumns => 0..KEY_COLUMNS,
        }
    }

    /// Whether keys in `column` receive fresh samples
    pub fn scans(&self, column: usize) -> bool {
        self.columns().contains(&column)
    }
}
