//! ufopad - keypad console firmware
//!
//! Scans the 3x4 keypad in the tick context and, from thread mode, beeps and
//! shows the key whenever one settles pressed or released. The uptime
//! counter is redrawn once per second.
//!
//! Hardware: Raspberry Pi Pico (RP2040)
//! Keypad: 4 active-low select lines, 3 row inputs with pull-ups
//! Display: ST7735 TFT (160x128) over SPI0
//! Speaker: PWM slice 7 channel A

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{Executor, InterruptExecutor};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_time::{Duration, Ticker};
use panic_halt as _;
use defmt_rtt as _; // global logger
use static_cell::StaticCell;

use ufopad::channels::{KEY_BUFFER, SYS_CLOCK, TONE_CHANNEL};
use ufopad::config::*;
use ufopad::display::CounterDisplay;
use ufopad::hardware::{self, Board, BoardDisplay};
use ufopad::resolver::KeyWatcher;
use ufopad::scanner::KeyScanner;
use ufopad::supervisor::AppSupervisor;
use ufopad::tick::SecondsWatcher;
use ufopad::tone::Tone;
use ufopad::{KeyEdge, KeyId, KeyState};

/// Runs the tick-context tasks at P1, above thread mode
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_LOW: StaticCell<Executor> = StaticCell::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

#[cortex_m_rt::entry]
fn main() -> ! {
    let p = embassy_rp::init(Default::default());

    let supervisor = AppSupervisor::new("keypad console");
    supervisor.print_startup_banner();

    let Board {
        keypad,
        speaker,
        display,
        status_led,
    } = Board::new(p);

    // The buffer must be reset before the scan ticker is armed
    let mut scanner = KeyScanner::new(keypad, KEY_SCAN_PLAN);
    scanner.init(&KEY_BUFFER);
    SYS_CLOCK.reset();

    interrupt::SWI_IRQ_1.set_priority(Priority::P1);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    unwrap!(hardware::start_tick_tasks(high_spawner, scanner, speaker));

    info!("ufopad initialized successfully");

    let executor = EXECUTOR_LOW.init(Executor::new());
    executor.run(|spawner| {
        unwrap!(spawner.spawn(hardware::status_task(status_led)));
        unwrap!(spawner.spawn(console_task(display, supervisor)));
    })
}

/// Beep pitch for a key, rising with the key number
fn key_tone(key: KeyId) -> Option<Tone> {
    let hz = KEY_BEEP_BASE_HZ + KEY_BEEP_STEP_HZ * key.index() as u32;
    match Tone::new(hz, KEY_BEEP_MS, KEY_BEEP_VOLUME) {
        Ok(tone) => Some(tone),
        Err(e) => {
            warn!("No tone for key {}: {:?}", key.number(), e);
            None
        }
    }
}

#[embassy_executor::task]
async fn console_task(mut display: BoardDisplay, mut supervisor: AppSupervisor) {
    info!("Console task started");

    let screen = CounterDisplay::default();
    let mut keys = KeyWatcher::new();
    let mut seconds = SecondsWatcher::new();
    let tones = TONE_CHANNEL.sender();

    if screen.clear(&mut display).is_err() || screen.draw_counter(&mut display, 0).is_err() {
        warn!("Display clear failed");
    }

    let mut ticker = Ticker::every(Duration::from_millis(DISPLAY_REFRESH_MS));
    loop {
        ticker.next().await;

        while let Some(edge) = keys.poll(&KEY_BUFFER) {
            let (key, state) = match edge {
                KeyEdge::Pressed(key) => (key, KeyState::On),
                KeyEdge::Released(key) => (key, KeyState::Off),
            };
            debug!("Key {} ({}) {:?}", key.number(), key.label(), state);

            if state == KeyState::On {
                if let Some(tone) = key_tone(key) {
                    if tones.try_send(tone).is_err() {
                        warn!("Tone queue full, dropping beep");
                    }
                }
            }
            if screen.draw_key(&mut display, key, state).is_err() {
                warn!("Display write failed");
            }
        }

        if let Some(now) = seconds.poll(&SYS_CLOCK) {
            if screen.draw_counter(&mut display, now).is_err() {
                warn!("Display write failed");
            }
            supervisor.on_seconds(now);
        }
    }
}
