//! Shared state between the tick context and the application
//!
//! Everything here is written from the high priority executor or read from
//! thread mode. The buffer and clock are single-writer atomics; tone
//! requests go the other way through a channel.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::config::{KEYBUF_SIZE, KEY_COLUMNS, TONE_QUEUE_DEPTH};
use crate::keybuf::KeyBuffer;
use crate::tick::SysClock;
use crate::tone::Tone;

pub type KeypadBuffer = KeyBuffer<KEYBUF_SIZE, KEY_COLUMNS>;

/// Keypad samples, written by the scan task, read by `key_check`
pub static KEY_BUFFER: KeypadBuffer = KeyBuffer::new();

/// Millisecond clock, advanced by the tick task
pub static SYS_CLOCK: SysClock = SysClock::new();

/// Tone requests from the application to the tone task
/// Buffer size: 4 (a newer request replaces the one playing)
pub static TONE_CHANNEL: Channel<CriticalSectionRawMutex, Tone, TONE_QUEUE_DEPTH> = Channel::new();
