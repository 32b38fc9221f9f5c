//! Threshold scanning and the bounded rolling alert log.
//!
//! A pure scan over the freshly composed readings: an unchanged low-SOC
//! condition re-alerts on every tick it is observed. Ids come from a
//! process-lifetime counter, so they stay strictly increasing even after
//! the log has been trimmed.

use std::collections::VecDeque;

use super::metrics::VOLTAGE_NOMINAL_V;
use super::types::{
    ALERT_CAPACITY, Alert, AlertSeverity, StorageReading, SystemMetrics, WeatherReading,
};

/// Pack SOC below this raises a warning (%).
pub const SOC_CRITICAL_PCT: f32 = 30.0;
/// Pack SOC below this (but not critical) raises an info alert (%).
pub const SOC_LOW_PCT: f32 = 50.0;
/// Cloud cover above this raises an info alert (%).
pub const CLOUD_COVER_HIGH_PCT: f32 = 70.0;
/// Voltage deviation from nominal above this raises a warning (V).
pub const VOLTAGE_DEVIATION_V: f32 = 10.0;

/// Alert scanner owning the rolling log.
#[derive(Debug, Clone, Default)]
pub struct AlertEngine {
    log: VecDeque<Alert>,
    emitted: u64,
}

impl AlertEngine {
    pub fn new() -> Self {
        Self {
            log: VecDeque::with_capacity(ALERT_CAPACITY),
            emitted: 0,
        }
    }

    /// Number of alerts currently retained.
    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Total alerts emitted over the process lifetime (also the id of the
    /// most recent alert).
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    fn raise(&mut self, severity: AlertSeverity, message: String, time: &str) {
        self.emitted += 1;
        self.log.push_back(Alert {
            id: self.emitted,
            severity,
            message,
            time: time.to_string(),
        });
    }

    /// Scans one tick's readings, appends any matches, trims the log to the
    /// most recent [`ALERT_CAPACITY`] entries, and returns the retained log
    /// oldest-first.
    pub fn scan(
        &mut self,
        storage: &StorageReading,
        weather: &WeatherReading,
        metrics: &SystemMetrics,
        time: &str,
    ) -> Vec<Alert> {
        for pack in &storage.battery_packs {
            if pack.soc < SOC_CRITICAL_PCT {
                self.raise(
                    AlertSeverity::Warning,
                    format!("Battery Pack {} SOC critically low ({:.0}%)", pack.id, pack.soc),
                    time,
                );
            } else if pack.soc < SOC_LOW_PCT {
                self.raise(
                    AlertSeverity::Info,
                    format!("Battery Pack {} SOC below 50% ({:.0}%)", pack.id, pack.soc),
                    time,
                );
            }
        }

        if weather.cloud_cover > CLOUD_COVER_HIGH_PCT {
            self.raise(
                AlertSeverity::Info,
                "High cloud cover detected - solar generation reduced".to_string(),
                time,
            );
        }

        if (metrics.power_quality.voltage - VOLTAGE_NOMINAL_V).abs() > VOLTAGE_DEVIATION_V {
            self.raise(
                AlertSeverity::Warning,
                format!("Voltage deviation: {:.1}V", metrics.power_quality.voltage),
                time,
            );
        }

        while self.log.len() > ALERT_CAPACITY {
            self.log.pop_front();
        }

        self.log.iter().cloned().collect()
    }
}
