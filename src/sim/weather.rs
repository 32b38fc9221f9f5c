//! Ambient weather synthesis.
//!
//! The only deterministic driver is the hour of day; everything else is
//! bounded uniform noise drawn from the model's own seeded RNG. The
//! dataset-backed variant substitutes measured temperature and irradiation
//! for the synthetic draws and derives cloud cover from irradiation, falling
//! back to full synthesis when the lookup misses.

use std::f32::consts::PI;
use std::sync::Arc;

use rand::{SeedableRng, rngs::StdRng};

use crate::dataset::PlantDataset;

use super::types::{
    IRRADIANCE_MAX_W_M2, WIND_SPEED_MAX_MPS, WeatherReading, round0, round1, uniform,
};

/// First daylight hour (inclusive).
pub const SUNRISE_HOUR: f32 = 6.0;
/// Last daylight hour (inclusive).
pub const SUNSET_HOUR: f32 = 18.0;
/// Length of the daylight window in hours.
const DAYLIGHT_SPAN_HOURS: f32 = 12.0;

/// Wind speed noise bounds (m/s), asymmetric like the reference profile.
const WIND_NOISE_LO_MPS: f32 = -2.0;
const WIND_NOISE_HI_MPS: f32 = 3.0;
/// Ambient temperature noise bound (°C), symmetric.
const TEMPERATURE_NOISE_C: f32 = 3.0;
/// Relative humidity draw bounds (%).
const HUMIDITY_LO_PCT: f32 = 50.0;
const HUMIDITY_HI_PCT: f32 = 85.0;
/// Divisor mapping measured irradiation to a cloud-cover estimate.
const IRRADIATION_TO_CLOUD_DIVISOR: f32 = 10.0;

/// Sinusoidal daylight factor: 0 outside `[SUNRISE_HOUR, SUNSET_HOUR]`,
/// peaking at 1.0 at solar noon (hour 12).
pub fn daylight_factor(hour: f32) -> f32 {
    if (SUNRISE_HOUR..=SUNSET_HOUR).contains(&hour) {
        (PI * (hour - SUNRISE_HOUR) / DAYLIGHT_SPAN_HOURS).sin().max(0.0)
    } else {
        0.0
    }
}

/// Fully self-contained randomized weather.
#[derive(Debug, Clone)]
pub struct SyntheticWeather {
    peak_irradiance_w_m2: f32,
    irradiance_noise_w_m2: f32,
    base_temperature_c: f32,
    base_wind_speed_mps: f32,
    cloud_factor_min: f32,
    cloud_factor_max: f32,
    rng: StdRng,
}

impl SyntheticWeather {
    /// Creates a synthetic weather model.
    ///
    /// # Arguments
    ///
    /// * `peak_irradiance_w_m2` - Clear-sky irradiance at solar noon
    /// * `irradiance_noise_w_m2` - Symmetric irradiance noise bound (0 disables)
    /// * `base_temperature_c` - Mean ambient temperature
    /// * `base_wind_speed_mps` - Mean wind speed
    /// * `cloud_factor_min` / `cloud_factor_max` - Cloud attenuation draw range
    /// * `seed` - RNG seed for reproducible draws
    pub fn new(
        peak_irradiance_w_m2: f32,
        irradiance_noise_w_m2: f32,
        base_temperature_c: f32,
        base_wind_speed_mps: f32,
        cloud_factor_min: f32,
        cloud_factor_max: f32,
        seed: u64,
    ) -> Self {
        Self {
            peak_irradiance_w_m2,
            irradiance_noise_w_m2: irradiance_noise_w_m2.max(0.0),
            base_temperature_c,
            base_wind_speed_mps,
            cloud_factor_min,
            cloud_factor_max,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn draw_wind_speed(&mut self) -> f32 {
        (self.base_wind_speed_mps + uniform(&mut self.rng, WIND_NOISE_LO_MPS, WIND_NOISE_HI_MPS))
            .clamp(0.0, WIND_SPEED_MAX_MPS)
    }

    fn draw_humidity(&mut self) -> f32 {
        uniform(&mut self.rng, HUMIDITY_LO_PCT, HUMIDITY_HI_PCT)
    }

    /// Produces a reading for the given fractional hour. Irradiance is
    /// exactly zero outside the daylight window (noise applies only while
    /// the sun is up).
    pub fn sample(&mut self, hour: f32) -> WeatherReading {
        let cloud_factor = uniform(&mut self.rng, self.cloud_factor_min, self.cloud_factor_max);

        let factor = daylight_factor(hour);
        let irradiance = if factor > 0.0 {
            let noise = uniform(
                &mut self.rng,
                -self.irradiance_noise_w_m2,
                self.irradiance_noise_w_m2,
            );
            (self.peak_irradiance_w_m2 * factor * cloud_factor + noise)
                .clamp(0.0, IRRADIANCE_MAX_W_M2)
        } else {
            0.0
        };

        let wind_speed = self.draw_wind_speed();
        let temperature = self.base_temperature_c
            + uniform(&mut self.rng, -TEMPERATURE_NOISE_C, TEMPERATURE_NOISE_C);
        let humidity = self.draw_humidity();
        let cloud_cover = (1.0 - cloud_factor) * 100.0;

        WeatherReading {
            temperature: round1(temperature),
            humidity: round0(humidity),
            wind_speed: round1(wind_speed),
            irradiance: round0(irradiance),
            cloud_cover: round0(cloud_cover),
        }
    }
}

/// Weather backed by the historical plant dataset. Temperature and
/// irradiation come from the nearest time-of-day record; wind and humidity
/// are not in the dataset and stay synthetic.
#[derive(Debug, Clone)]
pub struct DatasetWeather {
    dataset: Arc<PlantDataset>,
    synthetic: SyntheticWeather,
}

impl DatasetWeather {
    pub fn new(dataset: Arc<PlantDataset>, synthetic: SyntheticWeather) -> Self {
        Self { dataset, synthetic }
    }

    /// Produces a reading, falling back to full synthesis when the dataset
    /// has no record for this time of day.
    pub fn sample(&mut self, hour: f32) -> WeatherReading {
        let Some(rec) = self.dataset.nearest(hour) else {
            return self.synthetic.sample(hour);
        };

        let irradiance = rec.irradiation.clamp(0.0, IRRADIANCE_MAX_W_M2);
        let cloud_cover = (100.0 - irradiance / IRRADIATION_TO_CLOUD_DIVISOR).max(0.0);
        let wind_speed = self.synthetic.draw_wind_speed();
        let humidity = self.synthetic.draw_humidity();

        WeatherReading {
            temperature: round1(rec.ambient_temp_c),
            humidity: round0(humidity),
            wind_speed: round1(wind_speed),
            irradiance: round0(irradiance),
            cloud_cover: round0(cloud_cover),
        }
    }
}

/// Weather source selected at startup: either the historical dataset or the
/// self-contained formulas.
#[derive(Debug, Clone)]
pub enum WeatherModel {
    Synthetic(SyntheticWeather),
    Dataset(DatasetWeather),
}

impl WeatherModel {
    pub fn sample(&mut self, hour: f32) -> WeatherReading {
        match self {
            Self::Synthetic(m) => m.sample(hour),
            Self::Dataset(m) => m.sample(hour),
        }
    }
}
