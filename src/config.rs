//! Hardware configuration for ufopad
//! RP2040 board with a 3x4 keypad, ST7735 display and a speaker on PWM

use crate::types::ScanPlan;

// ===================================================================
// Keypad Layout
// ===================================================================

pub const KEY_COLUMNS: usize = 4; // Scan-select lines (1-3, 4-6, 7-9, *0#)
pub const KEY_ROWS: usize = 3; // Row input lines per column
pub const KEY_MIN: i32 = 1; // Lowest key number (sw1)
pub const KEY_MAX: i32 = (KEY_COLUMNS * KEY_ROWS) as i32; // Highest key number (sw12)
pub const KEY_COUNT: usize = KEY_COLUMNS * KEY_ROWS;
pub const KEY_ROW_MASK: u8 = (1u8 << KEY_ROWS) - 1; // 0b111

/// Printed legend of each key, indexed by `key number - 1`
pub const KEY_LABELS: [char; KEY_COUNT] = [
    '1', '2', '3', '4', '5', '6', '7', '8', '9', '*', '0', '#',
];

// ===================================================================
// Debounce Configuration
// ===================================================================

pub const KEYBUF_SIZE: usize = 10; // Ring buffer slots
pub const KEY_CHECK_COUNT: usize = 5; // Samples that must agree
pub const KEY_SCAN_PERIOD_US: u64 = 4_000; // 5 samples span 20ms

/// Only the `*0#` column is re-scanned every tick
pub const KEY_SCAN_PLAN: ScanPlan = ScanPlan::Single(3);

// ===================================================================
// System Clock
// ===================================================================

pub const SYS_TICK_PERIOD_US: u64 = 1_000; // 1ms tick
pub const TICKS_PER_SECOND: u32 = 1_000;

// ===================================================================
// Tone Generator
// ===================================================================

pub const MAX_TONE_HZ: u32 = 20_000;
pub const TONE_QUEUE_DEPTH: usize = 4;
pub const KEY_BEEP_MS: u32 = 200;
pub const KEY_BEEP_VOLUME: u8 = 32;
/// Beep pitch of key 1; each following key is one step higher
pub const KEY_BEEP_BASE_HZ: u32 = 250;
pub const KEY_BEEP_STEP_HZ: u32 = 50;

// ===================================================================
// GPIO Pin Assignments - Raspberry Pi Pico
// ===================================================================

pub const KEY_SELECT_PINS: [u8; KEY_COLUMNS] = [2, 3, 4, 5]; // Active-low outputs
pub const KEY_ROW_PINS: [u8; KEY_ROWS] = [6, 7, 8]; // Inputs with pull-up
pub const SPEAKER_PIN: u8 = 14; // PWM slice 7, channel A
pub const LED_STATUS_PIN: u8 = 25; // Built-in LED on Pico

// SPI Display Interface
pub const SPI_MOSI_PIN: u8 = 19;
pub const SPI_SCK_PIN: u8 = 18;
pub const SPI_BAUDRATE: u32 = 10_000_000; // 10MHz SPI clock
pub const DISPLAY_CS_PIN: u8 = 17;
pub const DISPLAY_DC_PIN: u8 = 16;
pub const DISPLAY_RST_PIN: u8 = 15;

// ===================================================================
// Display Configuration
// ===================================================================

pub const DISPLAY_WIDTH: u32 = 160;
pub const DISPLAY_HEIGHT: u32 = 128;
pub const DISPLAY_REFRESH_MS: u64 = 50;

// ===================================================================
// Status
// ===================================================================

pub const STATUS_REPORT_SECONDS: u32 = 60;

// ===================================================================
// Invariants
// ===================================================================

const _: () = assert!(KEY_CHECK_COUNT > 0);
// The window must never reach the slot being rewritten by the scanner
const _: () = assert!(KEYBUF_SIZE > KEY_CHECK_COUNT + 2);
const _: () = assert!(KEY_ROWS <= 8);
const _: () = assert!(KEY_LABELS.len() == KEY_COUNT);
const _: () = assert!(KEY_SCAN_PLAN.is_valid());
