//! Hardware abstraction and initialization
//!
//! Pin setup for the keypad, speaker, display and status LED, plus the
//! tasks that run on the high priority executor and stand in for timer
//! interrupts: keypad scanning, the millisecond clock and tone output.

use embassy_executor::{SendSpawner, SpawnError};
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::SPI0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::spi::{Blocking, Config as SpiConfig, Spi};
use embassy_rp::Peripherals;
use embassy_time::{Delay, Duration, Ticker, Timer};
use embedded_hal_bus::spi::{ExclusiveDevice, NoDelay};
use fixed::traits::ToFixed;
use st7735_lcd::{Orientation, ST7735};

use crate::channels::{KEY_BUFFER, SYS_CLOCK, TONE_CHANNEL};
use crate::config::*;
use crate::logging::{debug, info, warn};
use crate::scanner::{GpioKeypad, KeyScanner};
use crate::tick::SecondsWatcher;
use crate::tone::{AnalogOutput, ToneGenerator};

pub type BoardKeypad = GpioKeypad<Output<'static>, Input<'static>>;

pub type BoardDisplay = ST7735<
    ExclusiveDevice<Spi<'static, SPI0, Blocking>, Output<'static>, NoDelay>,
    Output<'static>,
    Output<'static>,
>;

// ===================================================================
// Speaker
// ===================================================================

/// Speaker driven by a PWM channel whose duty cycle acts as the DAC level
pub struct PwmSpeaker {
    pwm: Pwm<'static>,
    config: PwmConfig,
}

impl PwmSpeaker {
    pub fn new(pwm: Pwm<'static>, config: PwmConfig) -> Self {
        Self { pwm, config }
    }

    /// PWM settings with one duty step per output level
    pub fn default_config() -> PwmConfig {
        let mut config = PwmConfig::default();
        config.top = u8::MAX as u16;
        config.divider = 1u8.to_fixed();
        config.compare_a = 0;
        config
    }
}

impl AnalogOutput for PwmSpeaker {
    fn set_level(&mut self, level: u8) {
        self.config.compare_a = level as u16;
        self.pwm.set_config(&self.config);
    }
}

// ===================================================================
// Board
// ===================================================================

pub struct Board {
    pub keypad: BoardKeypad,
    pub speaker: PwmSpeaker,
    pub display: BoardDisplay,
    pub status_led: Output<'static>,
}

impl Board {
    /// Configure every pin used by the firmware.
    ///
    /// Select lines start high (no column addressed) and row lines get
    /// pull-ups, so an idle keypad reads all ones.
    pub fn new(p: Peripherals) -> Self {
        info!(
            "Keypad pins: select {:?}, rows {:?}",
            KEY_SELECT_PINS, KEY_ROW_PINS
        );
        let keypad = GpioKeypad::new(
            [
                Output::new(p.PIN_2, Level::High),
                Output::new(p.PIN_3, Level::High),
                Output::new(p.PIN_4, Level::High),
                Output::new(p.PIN_5, Level::High),
            ],
            [
                Input::new(p.PIN_6, Pull::Up),
                Input::new(p.PIN_7, Pull::Up),
                Input::new(p.PIN_8, Pull::Up),
            ],
        );

        info!("Speaker on GPIO {}", SPEAKER_PIN);
        let speaker_config = PwmSpeaker::default_config();
        let speaker = PwmSpeaker::new(
            Pwm::new_output_a(p.PWM_SLICE7, p.PIN_14, speaker_config.clone()),
            speaker_config,
        );

        let mut spi_config = SpiConfig::default();
        spi_config.frequency = SPI_BAUDRATE;
        let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
        let cs = Output::new(p.PIN_17, Level::High);
        let dc = Output::new(p.PIN_16, Level::Low);
        let rst = Output::new(p.PIN_15, Level::High);
        // Infallible: RP2040 GPIO writes cannot fail
        let device = match ExclusiveDevice::new_no_delay(spi, cs) {
            Ok(device) => device,
            Err(never) => match never {},
        };
        let mut display = ST7735::new(device, dc, rst, true, false, DISPLAY_WIDTH, DISPLAY_HEIGHT);
        if display.init(&mut Delay).is_err() {
            warn!("Display init failed");
        }
        if display.set_orientation(&Orientation::Landscape).is_err() {
            warn!("Display orientation failed");
        }
        info!("Display {}x{} ready", DISPLAY_WIDTH, DISPLAY_HEIGHT);

        Self {
            keypad,
            speaker,
            display,
            status_led: Output::new(p.PIN_25, Level::Low),
        }
    }
}

/// Spawn the tick-context tasks on the high priority executor.
///
/// The scanner must already be initialized against `KEY_BUFFER`.
pub fn start_tick_tasks(
    spawner: SendSpawner,
    scanner: KeyScanner<BoardKeypad>,
    speaker: PwmSpeaker,
) -> Result<(), SpawnError> {
    spawner.spawn(sys_tick_task())?;
    spawner.spawn(keypad_scan_task(scanner))?;
    spawner.spawn(tone_task(speaker))?;
    Ok(())
}

// ===================================================================
// Tick Tasks
// ===================================================================

#[embassy_executor::task]
pub async fn keypad_scan_task(mut scanner: KeyScanner<BoardKeypad>) {
    info!("Keypad scan task started ({}us)", KEY_SCAN_PERIOD_US);
    let mut ticker = Ticker::every(Duration::from_micros(KEY_SCAN_PERIOD_US));
    loop {
        ticker.next().await;
        scanner.sense(&KEY_BUFFER);
    }
}

#[embassy_executor::task]
pub async fn sys_tick_task() {
    info!("System tick task started ({}us)", SYS_TICK_PERIOD_US);
    let mut ticker = Ticker::every(Duration::from_micros(SYS_TICK_PERIOD_US));
    loop {
        ticker.next().await;
        SYS_CLOCK.tick();
    }
}

#[embassy_executor::task]
pub async fn tone_task(mut speaker: PwmSpeaker) {
    info!("Tone task started");
    let receiver = TONE_CHANNEL.receiver();
    let mut generator = ToneGenerator::new();

    loop {
        let mut tone = receiver.receive().await;

        // A request arriving mid-tone restarts playback with the new tone
        'playing: loop {
            debug!("Playing tone: {}us half period, {} ticks", tone.half_period_us, tone.ticks);
            generator.start(&tone);
            let mut ticker = Ticker::every(Duration::from_micros(tone.half_period_us as u64));

            loop {
                match select(receiver.receive(), ticker.next()).await {
                    Either::First(next) => {
                        tone = next;
                        continue 'playing;
                    }
                    Either::Second(()) => {
                        if !generator.on_tick(&mut speaker) {
                            break 'playing;
                        }
                    }
                }
            }
        }
    }
}

// ===================================================================
// Status LED Task
// ===================================================================

/// Blink the status LED once per second of system clock
#[embassy_executor::task]
pub async fn status_task(mut status_led: Output<'static>) {
    info!("Status LED task started");
    let mut seconds = SecondsWatcher::new();

    loop {
        Timer::after(Duration::from_millis(10)).await;
        if seconds.poll(&SYS_CLOCK).is_some() {
            status_led.set_high();
            Timer::after(Duration::from_millis(100)).await;
            status_led.set_low();
        }
    }
}
