//! ufopad - seconds counter firmware
//!
//! This binary only runs the system clock:
//! - 1ms tick on the high priority executor
//! - uptime seconds redrawn on the display when they change
//! - status LED blinks once per second

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_time::{Duration, Timer};
use panic_halt as _;
use defmt_rtt as _;

use ufopad::channels::SYS_CLOCK;
use ufopad::display::CounterDisplay;
use ufopad::hardware::{self, Board};
use ufopad::supervisor::AppSupervisor;
use ufopad::tick::SecondsWatcher;

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Main application entry point for the seconds counter
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    let mut supervisor = AppSupervisor::new("clock");
    supervisor.print_startup_banner();

    let Board {
        mut display,
        status_led,
        ..
    } = Board::new(p);

    SYS_CLOCK.reset();
    interrupt::SWI_IRQ_1.set_priority(Priority::P1);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    unwrap!(high_spawner.spawn(hardware::sys_tick_task()));
    unwrap!(spawner.spawn(hardware::status_task(status_led)));

    info!("Clock firmware initialized successfully");

    let screen = CounterDisplay::default();
    if screen.clear(&mut display).is_err() {
        warn!("Display clear failed");
    }

    let mut seconds = SecondsWatcher::new();
    loop {
        // Everything besides the tick happens here
        Timer::after(Duration::from_millis(10)).await;

        if let Some(now) = seconds.poll(&SYS_CLOCK) {
            if screen.draw_counter(&mut display, now).is_err() {
                warn!("Display write failed");
            }
            supervisor.on_seconds(now);
        }
    }
}
