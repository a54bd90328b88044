//! Counter and key status display
//!
//! Draws two text lines on any RGB565 `DrawTarget`: the uptime counter in
//! large digits, and the most recent key with its debounced state below it.
//! On the board the target is the ST7735 panel; tests draw into a
//! `MockDisplay`.

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};
use heapless::String;

use crate::types::{KeyId, KeyState};

const COUNTER_ORIGIN: Point = Point::new(4, 4);
const COUNTER_HEIGHT: u32 = 20;
const KEY_ORIGIN: Point = Point::new(4, 32);
const KEY_HEIGHT: u32 = 10;

/// Enough for every `u32`
pub type DecimalString = String<10>;

/// Decimal digits of `value`, most significant first ("0" for zero)
pub fn format_decimal(value: u32) -> DecimalString {
    let mut text = DecimalString::new();
    // Ten digits always fit
    let _ = write!(text, "{}", value);
    text
}

pub fn state_text(state: KeyState) -> &'static str {
    match state {
        KeyState::Off => "OFF",
        KeyState::On => "ON",
        KeyState::Transitioning => "...",
        KeyState::Invalid => "--",
    }
}

pub struct CounterDisplay {
    foreground: Rgb565,
    background: Rgb565,
}

impl CounterDisplay {
    pub const fn new(foreground: Rgb565, background: Rgb565) -> Self {
        Self {
            foreground,
            background,
        }
    }

    pub fn clear<D: DrawTarget<Color = Rgb565>>(&self, target: &mut D) -> Result<(), D::Error> {
        target.clear(self.background)
    }

    /// Replace the counter line with `value`
    pub fn draw_counter<D>(&self, target: &mut D, value: u32) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let style = MonoTextStyle::new(&FONT_10X20, self.foreground);
        self.blank_line(target, COUNTER_ORIGIN, COUNTER_HEIGHT)?;
        Text::with_baseline(&format_decimal(value), COUNTER_ORIGIN, style, Baseline::Top)
            .draw(target)?;
        Ok(())
    }

    /// Replace the key line with `key` and its state
    pub fn draw_key<D>(&self, target: &mut D, key: KeyId, state: KeyState) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let mut line: String<16> = String::new();
        let _ = write!(line, "KEY {} {}", key.label(), state_text(state));

        let style = MonoTextStyle::new(&FONT_6X10, self.foreground);
        self.blank_line(target, KEY_ORIGIN, KEY_HEIGHT)?;
        Text::with_baseline(&line, KEY_ORIGIN, style, Baseline::Top).draw(target)?;
        Ok(())
    }

    fn blank_line<D>(&self, target: &mut D, origin: Point, height: u32) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let width = target.bounding_box().size.width.saturating_sub(origin.x as u32);
        target.fill_solid(&Rectangle::new(origin, Size::new(width, height)), self.background)
    }
}

impl Default for CounterDisplay {
    fn default() -> Self {
        Self::new(Rgb565::WHITE, Rgb565::BLACK)
    }
}
