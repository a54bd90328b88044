//! ufopad - keypad, clock and tone firmware for RP2040
//!
//! This library provides the input and timing subsystems of a small
//! training board: a debounced 3x4 matrix keypad, a millisecond system
//! clock with a decimal counter display, and a single-tone speaker output.
//!
//! ## Architecture
//! - **Tick context**: keypad scanning, clock and tone run on a high
//!   priority interrupt executor, preempting the application
//! - **Thread mode**: the application polls debounced key states and draws
//! - **Shared state**: single-writer atomics, no locks in the tick path
//! - **Host builds**: everything except `hardware` builds and tests on the
//!   host; the board layer is behind the `rp2040` feature

#![cfg_attr(not(test), no_std)]

mod logging;

pub mod channels;
pub mod config;
pub mod display;
pub mod keybuf;
pub mod resolver;
pub mod scanner;
pub mod supervisor;
pub mod tick;
pub mod tone;
pub mod types;

#[cfg(feature = "rp2040")]
pub mod hardware;

pub use resolver::key_check;
pub use types::{KeyEdge, KeyId, KeyState, ScanPlan};
