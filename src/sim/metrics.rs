//! Cosmetic system metrics and the uptime accumulator.

use rand::{SeedableRng, rngs::StdRng};

use super::types::{PowerQuality, SystemMetrics, UPTIME_CEILING_PCT, round1, round2, uniform};

/// Nominal bus voltage (V). Shared with the alert engine's deviation check.
pub const VOLTAGE_NOMINAL_V: f32 = 230.0;
/// Nominal grid frequency (Hz).
pub const FREQUENCY_NOMINAL_HZ: f32 = 50.0;

/// Overall efficiency: base plus noise, capped.
const EFFICIENCY_BASE_PCT: f32 = 90.0;
const EFFICIENCY_NOISE_LO_PCT: f32 = -2.0;
const EFFICIENCY_NOISE_HI_PCT: f32 = 3.0;
const EFFICIENCY_CAP_PCT: f32 = 95.0;
/// Power quality noise bounds.
const VOLTAGE_NOISE_V: f32 = 5.0;
const FREQUENCY_NOISE_HZ: f32 = 0.1;
const THD_MIN_PCT: f32 = 1.0;
const THD_MAX_PCT: f32 = 2.5;
/// Per-tick uptime drift bounds (% points), skewed upward.
const UPTIME_DRIFT_LO_PCT: f32 = -0.01;
const UPTIME_DRIFT_HI_PCT: f32 = 0.02;

/// Metrics generator. Carries the uptime accumulator across ticks.
#[derive(Debug, Clone)]
pub struct MetricsModel {
    uptime_pct: f32,
    rng: StdRng,
}

impl MetricsModel {
    pub fn new(initial_uptime_pct: f32, seed: u64) -> Self {
        Self {
            uptime_pct: initial_uptime_pct.min(UPTIME_CEILING_PCT),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Current unrounded uptime accumulator (%).
    pub fn uptime_pct(&self) -> f32 {
        self.uptime_pct
    }

    /// Draws this tick's metrics and nudges the uptime accumulator.
    pub fn measure(&mut self) -> SystemMetrics {
        let efficiency = (EFFICIENCY_BASE_PCT
            + uniform(&mut self.rng, EFFICIENCY_NOISE_LO_PCT, EFFICIENCY_NOISE_HI_PCT))
        .min(EFFICIENCY_CAP_PCT);

        let voltage =
            VOLTAGE_NOMINAL_V + uniform(&mut self.rng, -VOLTAGE_NOISE_V, VOLTAGE_NOISE_V);
        let frequency = FREQUENCY_NOMINAL_HZ
            + uniform(&mut self.rng, -FREQUENCY_NOISE_HZ, FREQUENCY_NOISE_HZ);
        let thd = uniform(&mut self.rng, THD_MIN_PCT, THD_MAX_PCT);

        self.uptime_pct = (self.uptime_pct
            + uniform(&mut self.rng, UPTIME_DRIFT_LO_PCT, UPTIME_DRIFT_HI_PCT))
        .min(UPTIME_CEILING_PCT);

        SystemMetrics {
            overall_efficiency: round1(efficiency),
            uptime: round2(self.uptime_pct),
            power_quality: PowerQuality {
                voltage: round1(voltage),
                frequency: round2(frequency),
                thd: round1(thd),
            },
        }
    }
}
