//! Keypad column scanning
//!
//! The scanner runs once per tick from the high priority executor. Each
//! call drives the planned column(s) low, reads the three row lines, turns
//! the active-low reading into a pressed mask and records it in the sample
//! buffer. Misreads are not reported here; the debounce window absorbs them.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::{KEY_COLUMNS, KEY_ROWS, KEY_ROW_MASK};
use crate::keybuf::KeyBuffer;
use crate::logging::debug;
use crate::types::ScanPlan;

/// Hardware needed to scan the keypad matrix
pub trait KeypadPort {
    /// Drive `column`'s select line low and every other select line high
    fn select_column(&mut self, column: usize);

    /// Raw row levels for the selected column, bit n = row n, 0 = pressed
    fn read_rows(&mut self) -> u8;

    /// Put every select line back to its idle (high) level
    fn release(&mut self);
}

impl<P: KeypadPort + ?Sized> KeypadPort for &mut P {
    fn select_column(&mut self, column: usize) {
        (**self).select_column(column)
    }

    fn read_rows(&mut self) -> u8 {
        (**self).read_rows()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

// ===================================================================
// GPIO Keypad
// ===================================================================

/// Keypad wired straight to GPIO: one select output per column, one input
/// with pull-up per row.
///
/// Only these pins are ever touched, so neighbouring pins on the same bank
/// keep their levels.
pub struct GpioKeypad<O, I> {
    selects: [O; KEY_COLUMNS],
    rows: [I; KEY_ROWS],
}

impl<O: OutputPin, I: InputPin> GpioKeypad<O, I> {
    pub fn new(selects: [O; KEY_COLUMNS], rows: [I; KEY_ROWS]) -> Self {
        Self { selects, rows }
    }
}

impl<O: OutputPin, I: InputPin> KeypadPort for GpioKeypad<O, I> {
    fn select_column(&mut self, column: usize) {
        for (index, pin) in self.selects.iter_mut().enumerate() {
            let _ = if index == column {
                pin.set_low()
            } else {
                pin.set_high()
            };
        }
    }

    fn read_rows(&mut self) -> u8 {
        let mut raw = 0u8;
        for (row, pin) in self.rows.iter_mut().enumerate() {
            // An unreadable line counts as released
            if pin.is_high().unwrap_or(true) {
                raw |= 1 << row;
            }
        }
        raw
    }

    fn release(&mut self) {
        for pin in self.selects.iter_mut() {
            let _ = pin.set_high();
        }
    }
}

// ===================================================================
// Scanner
// ===================================================================

pub struct KeyScanner<P> {
    port: P,
    plan: ScanPlan,
}

impl<P: KeypadPort> KeyScanner<P> {
    pub fn new(port: P, plan: ScanPlan) -> Self {
        Self { port, plan }
    }

    pub fn plan(&self) -> ScanPlan {
        self.plan
    }

    /// Idle the select lines and clear the sample history.
    ///
    /// Call once before the tick source starts calling [`sense`].
    ///
    /// [`sense`]: KeyScanner::sense
    pub fn init<const SLOTS: usize>(&mut self, buf: &KeyBuffer<SLOTS, KEY_COLUMNS>) {
        self.port.release();
        buf.reset();
        debug!("Keypad scanner ready: {:?}, {} slots", self.plan, SLOTS);
    }

    /// Record one scan cycle into the next buffer slot
    pub fn sense<const SLOTS: usize>(&mut self, buf: &KeyBuffer<SLOTS, KEY_COLUMNS>) {
        for column in self.plan.columns() {
            self.port.select_column(column);
            let raw = self.port.read_rows();
            buf.stage(column, pressed_mask(raw));
        }
        self.port.release();
        buf.advance();
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn into_port(self) -> P {
        self.port
    }
}

/// Convert an active-low row reading into a pressed mask
pub const fn pressed_mask(raw: u8) -> u8 {
    !raw & KEY_ROW_MASK
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Port that answers every column with a fixed raw reading per column
    struct FixedPort {
        raw: [u8; KEY_COLUMNS],
        selected: Option<usize>,
        visited: Vec<usize>,
        released: usize,
    }

    impl FixedPort {
        fn new(raw: [u8; KEY_COLUMNS]) -> Self {
            Self {
                raw,
                selected: None,
                visited: Vec::new(),
                released: 0,
            }
        }
    }

    impl KeypadPort for FixedPort {
        fn select_column(&mut self, column: usize) {
            self.selected = Some(column);
            self.visited.push(column);
        }

        fn read_rows(&mut self) -> u8 {
            self.selected.map_or(0xff, |c| self.raw[c])
        }

        fn release(&mut self) {
            self.selected = None;
            self.released += 1;
        }
    }

    #[test]
    fn inverts_active_low_reading() {
        assert_eq!(pressed_mask(0xff), 0);
        assert_eq!(pressed_mask(0b1111_1000), 0b111);
        assert_eq!(pressed_mask(0b101), 0b010);
    }

    #[test]
    fn single_plan_touches_only_its_column() {
        let buf = KeyBuffer::<10, KEY_COLUMNS>::new();
        let port = FixedPort::new([0b110; KEY_COLUMNS]);
        let mut scanner = KeyScanner::new(port, ScanPlan::Single(3));
        scanner.init(&buf);
        scanner.sense(&buf);

        assert_eq!(buf.cursor(), 1);
        assert_eq!(buf.read(0, 3), 0b001);
        for column in 0..3 {
            assert_eq!(buf.read(0, column), 0);
        }
        let port = scanner.into_port();
        assert_eq!(port.visited, vec![3]);
        assert_eq!(port.selected, None);
    }

    #[test]
    fn all_columns_plan_fills_the_slot() {
        let buf = KeyBuffer::<10, KEY_COLUMNS>::new();
        let raw = [0b110, 0b101, 0b011, 0b111];
        let mut scanner = KeyScanner::new(FixedPort::new(raw), ScanPlan::AllColumns);
        scanner.sense(&buf);

        assert_eq!(buf.read(0, 0), 0b001);
        assert_eq!(buf.read(0, 1), 0b010);
        assert_eq!(buf.read(0, 2), 0b100);
        assert_eq!(buf.read(0, 3), 0);
        assert_eq!(scanner.into_port().visited, vec![0, 1, 2, 3]);
    }

    #[test]
    fn lines_are_released_after_every_cycle() {
        let buf = KeyBuffer::<10, KEY_COLUMNS>::new();
        let mut scanner = KeyScanner::new(FixedPort::new([0xff; KEY_COLUMNS]), ScanPlan::Single(0));
        scanner.init(&buf);
        for _ in 0..3 {
            scanner.sense(&buf);
        }
        // One from init, one per cycle
        assert_eq!(scanner.into_port().released, 4);
    }

    // -- embedded-hal pins ------------------------------------------------

    /// Shared wire level, true = high
    #[derive(Clone)]
    struct Wire(Rc<Cell<bool>>);

    impl Wire {
        fn new(level: bool) -> Self {
            Self(Rc::new(Cell::new(level)))
        }
    }

    impl embedded_hal::digital::ErrorType for Wire {
        type Error = Infallible;
    }

    impl OutputPin for Wire {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0.set(true);
            Ok(())
        }
    }

    impl InputPin for Wire {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.0.get())
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.0.get())
        }
    }

    #[test]
    fn gpio_keypad_drives_one_column_low() {
        let selects: [Wire; KEY_COLUMNS] = core::array::from_fn(|_| Wire::new(false));
        let rows: [Wire; KEY_ROWS] = core::array::from_fn(|_| Wire::new(true));
        let probes = selects.clone();
        let mut keypad = GpioKeypad::new(selects, rows);

        keypad.select_column(2);
        let levels: Vec<bool> = probes.iter().map(|w| w.0.get()).collect();
        assert_eq!(levels, vec![true, true, false, true]);

        keypad.release();
        assert!(probes.iter().all(|w| w.0.get()));
    }

    #[test]
    fn gpio_keypad_reads_rows_active_low() {
        let selects: [Wire; KEY_COLUMNS] = core::array::from_fn(|_| Wire::new(true));
        let rows: [Wire; KEY_ROWS] = core::array::from_fn(|_| Wire::new(true));
        let row_probe = rows.clone();
        let mut keypad = GpioKeypad::new(selects, rows);

        assert_eq!(keypad.read_rows(), 0b111);
        row_probe[1].0.set(false);
        assert_eq!(keypad.read_rows(), 0b101);
        assert_eq!(pressed_mask(keypad.read_rows()), 0b010);
    }
}
