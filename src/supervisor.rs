//! Application supervisor and monitoring
//!
//! Startup banner and periodic uptime reports, driven from the system clock
//! rather than a timer of its own.

use crate::config::{
    KEYBUF_SIZE, KEY_CHECK_COUNT, KEY_COLUMNS, KEY_COUNT, KEY_ROWS, KEY_SCAN_PERIOD_US,
    KEY_SCAN_PLAN, STATUS_REPORT_SECONDS,
};
use crate::logging::info;

/// Application supervisor responsible for monitoring
pub struct AppSupervisor {
    name: &'static str,
    last_report: u32,
}

impl AppSupervisor {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            last_report: 0,
        }
    }

    /// Print application startup banner with keypad configuration
    pub fn print_startup_banner(&self) {
        info!("========================================");
        info!("ufopad {}", self.name);
        info!("========================================");
        info!("Hardware: RP2040 (Raspberry Pi Pico)");
        info!("Keys: {} ({}x{} matrix)", KEY_COUNT, KEY_COLUMNS, KEY_ROWS);
        info!(
            "Debounce: {} of {} samples every {}us",
            KEY_CHECK_COUNT, KEYBUF_SIZE, KEY_SCAN_PERIOD_US
        );
        info!("Scan plan: {:?}", KEY_SCAN_PLAN);
        info!("========================================");
    }

    /// Report uptime once every `STATUS_REPORT_SECONDS`.
    ///
    /// Returns whether a report was printed.
    pub fn on_seconds(&mut self, uptime_seconds: u32) -> bool {
        if uptime_seconds.wrapping_sub(self.last_report) < STATUS_REPORT_SECONDS {
            return false;
        }
        self.last_report = uptime_seconds;

        let minutes = uptime_seconds / 60;
        let hours = minutes / 60;
        let remaining_minutes = minutes % 60;

        if hours > 0 {
            info!("Status: Uptime {}h{}m", hours, remaining_minutes);
        } else {
            info!("Status: Uptime {}m", minutes);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_period() {
        let mut supervisor = AppSupervisor::new("test");
        supervisor.print_startup_banner();

        assert!(!supervisor.on_seconds(1));
        assert!(!supervisor.on_seconds(59));
        assert!(supervisor.on_seconds(60));
        assert!(!supervisor.on_seconds(61));
        assert!(!supervisor.on_seconds(119));
        assert!(supervisor.on_seconds(120));
        assert!(supervisor.on_seconds(3600 * 2));
    }
}
