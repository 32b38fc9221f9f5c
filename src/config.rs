//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::sim::types::{IRRADIANCE_MAX_W_M2, SOC_MAX_PCT, SOC_MIN_PCT};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run timing, seeding, and clock parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Synthetic weather parameters.
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Solar array parameters.
    #[serde(default)]
    pub solar: SolarConfig,
    /// Biogas plant parameters.
    #[serde(default)]
    pub biogas: BiogasConfig,
    /// Battery bank parameters.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Demand profile parameters.
    #[serde(default)]
    pub demand: DemandConfig,
    /// System metrics parameters.
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// Optional historical dataset source.
    #[serde(default)]
    pub dataset: DatasetConfig,
}

/// Run timing, seeding, and clock parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Master random seed.
    pub seed: u64,
    /// Number of ticks to run (must be > 0).
    pub ticks: usize,
    /// Pause between ticks in milliseconds (0 runs flat out).
    pub interval_ms: u64,
    /// Fractional hour added to the wall clock.
    pub hour_offset: f32,
    /// Pin the hour of day instead of reading the wall clock (mainly for
    /// demos and tests). Must be in `[0, 24)`.
    pub fixed_hour: Option<f32>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            ticks: 24,
            interval_ms: 0,
            hour_offset: 0.0,
            fixed_hour: None,
        }
    }
}

/// Synthetic weather parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeatherConfig {
    /// Mean ambient temperature (°C).
    pub base_temperature_c: f32,
    /// Mean wind speed (m/s).
    pub base_wind_speed_mps: f32,
    /// Clear-sky irradiance at solar noon (W/m²).
    pub peak_irradiance_w_m2: f32,
    /// Symmetric irradiance noise bound (W/m², 0 disables).
    pub irradiance_noise_w_m2: f32,
    /// Cloud attenuation draw range (1.0 = clear sky).
    pub cloud_factor_min: f32,
    pub cloud_factor_max: f32,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_temperature_c: 28.5,
            base_wind_speed_mps: 8.2,
            peak_irradiance_w_m2: 875.0,
            irradiance_noise_w_m2: 50.0,
            cloud_factor_min: 0.7,
            cloud_factor_max: 1.0,
        }
    }
}

/// Solar array parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    /// Total panel area (m²).
    pub panel_area_m2: f32,
    /// Nameplate efficiency at the reference cell temperature (0..=1).
    pub base_efficiency: f32,
    /// Efficiency change per °C above reference (negative for real panels).
    pub temp_coefficient_per_c: f32,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            panel_area_m2: 300.0,
            base_efficiency: 0.20,
            temp_coefficient_per_c: -0.004,
        }
    }
}

/// Biogas plant parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BiogasConfig {
    /// Nominal output (kW).
    pub base_output_kw: f32,
    /// Output below this reports "reduced" status (kW).
    pub reduced_threshold_kw: f32,
}

impl Default for BiogasConfig {
    fn default() -> Self {
        Self {
            base_output_kw: 18.5,
            reduced_threshold_kw: 15.0,
        }
    }
}

/// Battery bank parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Initial SOC per pack (%); the list length sets the pack count.
    pub initial_soc_pct: Vec<f32>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            initial_soc_pct: vec![72.0, 68.0, 65.0, 63.0],
        }
    }
}

/// Demand profile parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemandConfig {
    /// Mean load (kW).
    pub base_kw: f32,
    /// Sinusoidal amplitude (kW).
    pub amp_kw: f32,
    /// Load floor (kW).
    pub floor_kw: f32,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            base_kw: 40.0,
            amp_kw: 20.0,
            floor_kw: 25.0,
        }
    }
}

/// System metrics parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsConfig {
    /// Uptime accumulator starting value (%).
    pub initial_uptime_pct: f32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            initial_uptime_pct: 99.7,
        }
    }
}

/// Optional historical dataset source.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetConfig {
    /// Path to a generation-data CSV. Absent or unreadable falls back to
    /// fully synthetic weather and solar.
    pub path: Option<String>,
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.ticks"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario (the reference microgrid parameters).
    pub fn baseline() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            weather: WeatherConfig::default(),
            solar: SolarConfig::default(),
            biogas: BiogasConfig::default(),
            storage: StorageConfig::default(),
            demand: DemandConfig::default(),
            metrics: MetricsConfig::default(),
            dataset: DatasetConfig::default(),
        }
    }

    /// Returns the overcast preset: heavy cloud attenuation and cooler air,
    /// enough to trip the high-cloud-cover alert.
    pub fn overcast() -> Self {
        Self {
            weather: WeatherConfig {
                base_temperature_c: 24.0,
                cloud_factor_min: 0.15,
                cloud_factor_max: 0.45,
                ..WeatherConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Returns the low-reserve preset: depleted packs and an evening-heavy
    /// load, keeping the bank in deficit and the SOC alerts firing.
    pub fn low_reserve() -> Self {
        Self {
            storage: StorageConfig {
                initial_soc_pct: vec![28.0, 31.0, 26.0, 34.0],
            },
            demand: DemandConfig {
                base_kw: 55.0,
                ..DemandConfig::default()
            },
            ..Self::baseline()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "overcast", "low_reserve"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "overcast" => Ok(Self::overcast()),
            "low_reserve" => Ok(Self::low_reserve()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let s = &self.simulation;
        if s.ticks == 0 {
            errors.push(ConfigError {
                field: "simulation.ticks".into(),
                message: "must be > 0".into(),
            });
        }
        if let Some(hour) = s.fixed_hour {
            if !(0.0..24.0).contains(&hour) {
                errors.push(ConfigError {
                    field: "simulation.fixed_hour".into(),
                    message: "must be in [0, 24)".into(),
                });
            }
        }

        let w = &self.weather;
        if w.peak_irradiance_w_m2 <= 0.0 || w.peak_irradiance_w_m2 > IRRADIANCE_MAX_W_M2 {
            errors.push(ConfigError {
                field: "weather.peak_irradiance_w_m2".into(),
                message: format!("must be in (0, {IRRADIANCE_MAX_W_M2}]"),
            });
        }
        if w.irradiance_noise_w_m2 < 0.0 {
            errors.push(ConfigError {
                field: "weather.irradiance_noise_w_m2".into(),
                message: "must be >= 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&w.cloud_factor_min)
            || !(0.0..=1.0).contains(&w.cloud_factor_max)
            || w.cloud_factor_min > w.cloud_factor_max
        {
            errors.push(ConfigError {
                field: "weather.cloud_factor_min".into(),
                message: "cloud factor range must satisfy 0 <= min <= max <= 1".into(),
            });
        }

        let sol = &self.solar;
        if sol.panel_area_m2 <= 0.0 {
            errors.push(ConfigError {
                field: "solar.panel_area_m2".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&sol.base_efficiency) || sol.base_efficiency == 0.0 {
            errors.push(ConfigError {
                field: "solar.base_efficiency".into(),
                message: "must be in (0, 1]".into(),
            });
        }

        if self.biogas.base_output_kw < 0.0 {
            errors.push(ConfigError {
                field: "biogas.base_output_kw".into(),
                message: "must be >= 0".into(),
            });
        }

        let st = &self.storage;
        if st.initial_soc_pct.is_empty() {
            errors.push(ConfigError {
                field: "storage.initial_soc_pct".into(),
                message: "at least one pack required".into(),
            });
        }
        for (i, soc) in st.initial_soc_pct.iter().enumerate() {
            if !(SOC_MIN_PCT..=SOC_MAX_PCT).contains(soc) {
                errors.push(ConfigError {
                    field: format!("storage.initial_soc_pct[{i}]"),
                    message: format!("must be in [{SOC_MIN_PCT}, {SOC_MAX_PCT}]"),
                });
            }
        }

        let d = &self.demand;
        if d.base_kw <= 0.0 {
            errors.push(ConfigError {
                field: "demand.base_kw".into(),
                message: "must be > 0".into(),
            });
        }
        if d.amp_kw < 0.0 {
            errors.push(ConfigError {
                field: "demand.amp_kw".into(),
                message: "must be >= 0".into(),
            });
        }
        if d.floor_kw < 0.0 {
            errors.push(ConfigError {
                field: "demand.floor_kw".into(),
                message: "must be >= 0".into(),
            });
        }

        let m = &self.metrics;
        if m.initial_uptime_pct <= 0.0 || m.initial_uptime_pct > 100.0 {
            errors.push(ConfigError {
                field: "metrics.initial_uptime_pct".into(),
                message: "must be in (0, 100]".into(),
            });
        }

        errors
    }
}
