//! Single tone generator
//!
//! A tone is played by switching an analog output between the requested
//! volume and zero on every tick, with one tick every half audio period.
//! The length is counted in ticks; once it runs out the output is parked at
//! zero and the generator goes idle.

use core::fmt;

use crate::config::MAX_TONE_HZ;

/// Microseconds in one half of a 1 Hz period
const HALF_SECOND_US: u32 = 500_000;

/// Anything that can hold an output level (DAC channel, PWM duty, ...)
pub trait AnalogOutput {
    fn set_level(&mut self, level: u8);
}

impl<T: AnalogOutput + ?Sized> AnalogOutput for &mut T {
    fn set_level(&mut self, level: u8) {
        (**self).set_level(level)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToneError {
    /// A pitch of 0 Hz has no period
    ZeroFrequency,
    /// Pitch above [`MAX_TONE_HZ`]
    FrequencyTooHigh(u32),
}

impl fmt::Display for ToneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToneError::ZeroFrequency => write!(f, "tone frequency is zero"),
            ToneError::FrequencyTooHigh(hz) => {
                write!(f, "tone frequency {} Hz above {} Hz", hz, MAX_TONE_HZ)
            }
        }
    }
}

/// A validated tone request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tone {
    /// Tick interval, half of the audio period
    pub half_period_us: u32,
    /// Number of ticks the tone lasts
    pub ticks: u32,
    /// Output level while the wave is high
    pub volume: u8,
}

impl Tone {
    pub fn new(hz: u32, msec: u32, volume: u8) -> Result<Self, ToneError> {
        if hz == 0 {
            return Err(ToneError::ZeroFrequency);
        }
        if hz > MAX_TONE_HZ {
            return Err(ToneError::FrequencyTooHigh(hz));
        }

        let half_period_us = HALF_SECOND_US / hz;
        let ticks = msec.saturating_mul(1000) / half_period_us;

        Ok(Self {
            half_period_us,
            ticks,
            volume,
        })
    }
}

pub struct ToneGenerator {
    count: u32,
    limit: u32,
    volume: u8,
    playing: bool,
}

impl ToneGenerator {
    pub const fn new() -> Self {
        Self {
            count: 0,
            limit: 0,
            volume: 0,
            playing: false,
        }
    }

    /// Start `tone` from its first tick, replacing whatever was playing
    pub fn start(&mut self, tone: &Tone) {
        self.count = 0;
        self.limit = tone.ticks;
        self.volume = tone.volume;
        self.playing = true;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Advance one half period. Returns whether the tone is still playing.
    pub fn on_tick<O: AnalogOutput>(&mut self, out: &mut O) -> bool {
        if !self.playing {
            return false;
        }

        self.count += 1;
        if self.count > self.limit {
            self.stop(out);
            return false;
        }

        out.set_level(if self.count % 2 == 1 { self.volume } else { 0 });
        true
    }

    /// Silence the output and go idle
    pub fn stop<O: AnalogOutput>(&mut self, out: &mut O) {
        out.set_level(0);
        self.playing = false;
    }
}

impl Default for ToneGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        levels: Vec<u8>,
    }

    impl AnalogOutput for Recorder {
        fn set_level(&mut self, level: u8) {
            self.levels.push(level);
        }
    }

    #[test]
    fn timing_from_pitch_and_length() {
        let tone = Tone::new(250, 200, 32).unwrap();
        assert_eq!(tone.half_period_us, 2000);
        assert_eq!(tone.ticks, 100);
        assert_eq!(tone.volume, 32);

        let tone = Tone::new(440, 1000, 255).unwrap();
        assert_eq!(tone.half_period_us, 1136);
        assert_eq!(tone.ticks, 880);
    }

    #[test]
    fn invalid_pitches_are_rejected() {
        assert_eq!(Tone::new(0, 100, 10), Err(ToneError::ZeroFrequency));
        assert_eq!(
            Tone::new(MAX_TONE_HZ + 1, 100, 10),
            Err(ToneError::FrequencyTooHigh(MAX_TONE_HZ + 1))
        );
        assert!(Tone::new(MAX_TONE_HZ, 100, 10).is_ok());
    }

    #[test]
    fn square_wave_then_silence() {
        let tone = Tone::new(1000, 2, 40).unwrap();
        assert_eq!(tone.ticks, 4);

        let mut out = Recorder::default();
        let mut generator = ToneGenerator::new();
        generator.start(&tone);

        let mut ticks = 0;
        while generator.on_tick(&mut out) {
            ticks += 1;
        }
        assert_eq!(ticks, 4);
        assert_eq!(out.levels, vec![40, 0, 40, 0, 0]);
        assert!(!generator.is_playing());
        assert!(!generator.on_tick(&mut out));
        assert_eq!(out.levels.len(), 5);
    }

    #[test]
    fn restart_begins_a_new_wave() {
        let mut out = Recorder::default();
        let mut generator = ToneGenerator::new();
        generator.start(&Tone::new(1000, 10, 9).unwrap());
        generator.on_tick(&mut out);
        generator.on_tick(&mut out);

        generator.start(&Tone::new(1000, 1, 50).unwrap());
        assert!(generator.on_tick(&mut out));
        assert!(generator.on_tick(&mut out));
        assert!(!generator.on_tick(&mut out));
        assert_eq!(out.levels, vec![9, 0, 50, 0, 0]);
    }

    #[test]
    fn error_messages() {
        assert_eq!(ToneError::ZeroFrequency.to_string(), "tone frequency is zero");
        assert_eq!(
            ToneError::FrequencyTooHigh(30_000).to_string(),
            "tone frequency 30000 Hz above 20000 Hz"
        );
    }
}
