//! Generation models: solar PV array, wind turbine, and biogas plant.
//!
//! Each source combines a simple physical formula with bounded uniform
//! noise from its own seeded RNG; outputs are floored at zero so total
//! generation can never go negative. The solar array has a dataset-backed
//! variant mirroring the weather model.

use std::sync::Arc;

use rand::{SeedableRng, rngs::StdRng};

use crate::dataset::PlantDataset;

use super::types::{
    BiogasReading, BiogasStatus, SolarReading, WeatherReading, WindReading, round0, round1,
    uniform,
};

/// Cell temperature at which the panel's nameplate efficiency applies (°C).
const SOLAR_REFERENCE_TEMP_C: f32 = 25.0;
/// Inverter efficiency draw range.
const INVERTER_EFFICIENCY_MIN: f32 = 0.93;
const INVERTER_EFFICIENCY_MAX: f32 = 0.97;
/// Additive noise bound on solar DC and AC power (kW).
const SOLAR_NOISE_KW: f32 = 2.0;
/// Module heating above ambient per kW/m² of irradiance (°C).
const MODULE_TEMP_RISE_C_PER_KW_M2: f32 = 20.0;
/// Divisor for the display efficiency when DC power is near zero.
const EFFICIENCY_DC_FLOOR_KW: f32 = 0.1;

/// Wind turbine cut-in speed (m/s); no output below this.
pub const WIND_CUT_IN_MPS: f32 = 3.0;
/// Wind speed at which the power curve flattens (m/s).
pub const WIND_RATED_MPS: f32 = 12.0;
/// Power curve ceiling (kW).
pub const WIND_CEILING_KW: f32 = 25.0;
/// Turbine efficiency draw range.
const WIND_EFFICIENCY_MIN: f32 = 0.87;
const WIND_EFFICIENCY_MAX: f32 = 0.92;
/// Additive noise bound on wind power (kW).
const WIND_NOISE_KW: f32 = 1.0;

/// Additive noise bound on biogas power (kW).
const BIOGAS_NOISE_KW: f32 = 2.0;
/// Biogas plant efficiency draw range.
const BIOGAS_EFFICIENCY_MIN: f32 = 0.89;
const BIOGAS_EFFICIENCY_MAX: f32 = 0.94;

/// Piecewise turbine power curve before efficiency and noise: zero below
/// cut-in, `0.5·v^2.5` capped at the ceiling up to rated speed, flat after.
pub fn wind_power_curve(speed_mps: f32) -> f32 {
    if speed_mps < WIND_CUT_IN_MPS {
        0.0
    } else if speed_mps < WIND_RATED_MPS {
        (0.5 * speed_mps.powf(2.5)).min(WIND_CEILING_KW)
    } else {
        WIND_CEILING_KW
    }
}

/// Solar PV output derived from irradiance and ambient temperature.
#[derive(Debug, Clone)]
pub struct SyntheticSolar {
    panel_area_m2: f32,
    base_efficiency: f32,
    temp_coefficient_per_c: f32,
    rng: StdRng,
}

impl SyntheticSolar {
    /// # Arguments
    ///
    /// * `panel_area_m2` - Total array area
    /// * `base_efficiency` - Nameplate efficiency at the reference temperature
    /// * `temp_coefficient_per_c` - Efficiency change per °C above reference
    ///   (negative for real panels)
    /// * `seed` - RNG seed
    pub fn new(
        panel_area_m2: f32,
        base_efficiency: f32,
        temp_coefficient_per_c: f32,
        seed: u64,
    ) -> Self {
        Self {
            panel_area_m2,
            base_efficiency,
            temp_coefficient_per_c,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Derives the PV reading from the weather. At zero irradiance the
    /// reading is all-zero with no noise, so night output is exactly dark.
    pub fn output(&mut self, weather: &WeatherReading) -> SolarReading {
        let irradiance = weather.irradiance;
        if irradiance <= 0.0 {
            return SolarReading {
                dc_power: 0.0,
                ac_power: 0.0,
                efficiency: 0.0,
                irradiance,
                module_temp: weather.temperature,
            };
        }

        let efficiency = self.base_efficiency
            + self.temp_coefficient_per_c * (weather.temperature - SOLAR_REFERENCE_TEMP_C);
        let dc = (irradiance / 1000.0) * self.panel_area_m2 * efficiency;
        let ac = dc * uniform(&mut self.rng, INVERTER_EFFICIENCY_MIN, INVERTER_EFFICIENCY_MAX);
        let dc = (dc + uniform(&mut self.rng, -SOLAR_NOISE_KW, SOLAR_NOISE_KW)).max(0.0);
        let ac = (ac + uniform(&mut self.rng, -SOLAR_NOISE_KW, SOLAR_NOISE_KW)).max(0.0);

        SolarReading {
            dc_power: round1(dc),
            ac_power: round1(ac),
            efficiency: round1(ac / dc.max(EFFICIENCY_DC_FLOOR_KW) * 100.0),
            irradiance,
            module_temp: round1(
                weather.temperature + (irradiance / 1000.0) * MODULE_TEMP_RISE_C_PER_KW_M2,
            ),
        }
    }
}

/// Solar PV output read from the historical plant dataset.
#[derive(Debug, Clone)]
pub struct DatasetSolar {
    dataset: Arc<PlantDataset>,
    synthetic: SyntheticSolar,
}

impl DatasetSolar {
    pub fn new(dataset: Arc<PlantDataset>, synthetic: SyntheticSolar) -> Self {
        Self { dataset, synthetic }
    }

    /// Reads the nearest time-of-day record, falling back to synthesis on a
    /// miss.
    pub fn output(&mut self, weather: &WeatherReading, hour: f32) -> SolarReading {
        let Some(rec) = self.dataset.nearest(hour) else {
            return self.synthetic.output(weather);
        };

        let dc = rec.dc_power_kw.max(0.0);
        let ac = rec.ac_power_kw.max(0.0);
        let efficiency = if dc > 0.0 {
            round1(ac / dc.max(EFFICIENCY_DC_FLOOR_KW) * 100.0)
        } else {
            0.0
        };

        SolarReading {
            dc_power: round1(dc),
            ac_power: round1(ac),
            efficiency,
            irradiance: round0(rec.irradiation),
            module_temp: round1(rec.module_temp_c),
        }
    }
}

/// Solar source selected at startup, mirroring [`super::weather::WeatherModel`].
#[derive(Debug, Clone)]
pub enum SolarModel {
    Synthetic(SyntheticSolar),
    Dataset(DatasetSolar),
}

impl SolarModel {
    pub fn output(&mut self, weather: &WeatherReading, hour: f32) -> SolarReading {
        match self {
            Self::Synthetic(m) => m.output(weather),
            Self::Dataset(m) => m.output(weather, hour),
        }
    }
}

/// Wind turbine with the piecewise power curve.
#[derive(Debug, Clone)]
pub struct WindTurbine {
    rng: StdRng,
}

impl WindTurbine {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Output at the given wind speed. Below cut-in the reading is exactly
    /// zero power (no noise), matching a parked turbine.
    pub fn output(&mut self, wind_speed_mps: f32) -> WindReading {
        let curve_kw = wind_power_curve(wind_speed_mps);
        let efficiency = uniform(&mut self.rng, WIND_EFFICIENCY_MIN, WIND_EFFICIENCY_MAX);
        let mut power = curve_kw * efficiency;
        if curve_kw > 0.0 {
            power += uniform(&mut self.rng, -WIND_NOISE_KW, WIND_NOISE_KW);
        }

        WindReading {
            power: round1(power.max(0.0)),
            wind_speed: wind_speed_mps,
            efficiency: round1(efficiency * 100.0),
        }
    }
}

/// Near-constant biogas generator.
#[derive(Debug, Clone)]
pub struct BiogasPlant {
    base_output_kw: f32,
    reduced_threshold_kw: f32,
    rng: StdRng,
}

impl BiogasPlant {
    pub fn new(base_output_kw: f32, reduced_threshold_kw: f32, seed: u64) -> Self {
        Self {
            base_output_kw,
            reduced_threshold_kw,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn output(&mut self) -> BiogasReading {
        let power =
            (self.base_output_kw + uniform(&mut self.rng, -BIOGAS_NOISE_KW, BIOGAS_NOISE_KW))
                .max(0.0);
        let status = if power > self.reduced_threshold_kw {
            BiogasStatus::Operational
        } else {
            BiogasStatus::Reduced
        };
        let efficiency = uniform(&mut self.rng, BIOGAS_EFFICIENCY_MIN, BIOGAS_EFFICIENCY_MAX);

        BiogasReading {
            power: round1(power),
            status,
            efficiency: round1(efficiency * 100.0),
        }
    }
}
