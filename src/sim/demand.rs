//! Diurnal electrical demand synthesis.
//!
//! Same sinusoidal shape as the solar daylight curve but peaking at hour 18
//! (evening), half a phase away from solar noon. The two curves are kept as
//! distinct formulas on purpose.

use std::f32::consts::PI;

use rand::{SeedableRng, rngs::StdRng};

use super::types::{DemandReading, round1, uniform};

/// Hour of day the load curve peaks at.
pub const DEMAND_PEAK_HOUR: f32 = 18.0;
/// Additive load noise bounds (kW), skewed upward.
const DEMAND_NOISE_LO_KW: f32 = -5.0;
const DEMAND_NOISE_HI_KW: f32 = 10.0;
/// Critical-load share draw range.
const CRITICAL_SHARE_MIN: f32 = 0.35;
const CRITICAL_SHARE_MAX: f32 = 0.45;
/// Cosmetic peak-reduction effectiveness draw range (%).
const PEAK_REDUCTION_MIN_PCT: f32 = 20.0;
const PEAK_REDUCTION_MAX_PCT: f32 = 30.0;

/// Load profile generator. No cross-tick state.
#[derive(Debug, Clone)]
pub struct DemandModel {
    base_kw: f32,
    amp_kw: f32,
    floor_kw: f32,
    rng: StdRng,
}

impl DemandModel {
    pub fn new(base_kw: f32, amp_kw: f32, floor_kw: f32, seed: u64) -> Self {
        Self {
            base_kw,
            amp_kw,
            floor_kw,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Load breakdown for the given fractional hour.
    pub fn profile(&mut self, hour: f32) -> DemandReading {
        // sin(π·(hour−12)/12) peaks at DEMAND_PEAK_HOUR and bottoms at 6.
        let base = self.base_kw + self.amp_kw * (PI * (hour - 12.0) / 12.0).sin();
        let base = base.max(self.floor_kw);

        let total = base + uniform(&mut self.rng, DEMAND_NOISE_LO_KW, DEMAND_NOISE_HI_KW);
        let critical = total * uniform(&mut self.rng, CRITICAL_SHARE_MIN, CRITICAL_SHARE_MAX);
        let flexible = total - critical;
        let peak_reduction =
            uniform(&mut self.rng, PEAK_REDUCTION_MIN_PCT, PEAK_REDUCTION_MAX_PCT);

        DemandReading {
            total_load: round1(total),
            critical_loads: round1(critical),
            flexible_loads: round1(flexible),
            peak_reduction: round1(peak_reduction),
        }
    }
}
