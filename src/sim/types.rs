//! Snapshot data model, named physical bounds, and display rounding.
//!
//! Field names follow the dashboard's JSON contract (camelCase, plus a few
//! explicit renames such as `overallSOC`), so every struct here serializes
//! exactly as the frontend consumes it.

use std::fmt;

use chrono::{DateTime, Local};
use rand::{Rng, rngs::StdRng};
use serde::Serialize;

/// Number of battery packs in the storage bank.
pub const BATTERY_PACK_COUNT: usize = 4;
/// Lower bound for every pack's state of charge (%).
pub const SOC_MIN_PCT: f32 = 20.0;
/// Upper bound for every pack's state of charge (%).
pub const SOC_MAX_PCT: f32 = 95.0;
/// Physical ceiling for solar irradiance (W/m²).
pub const IRRADIANCE_MAX_W_M2: f32 = 1200.0;
/// Physical ceiling for wind speed (m/s).
pub const WIND_SPEED_MAX_MPS: f32 = 20.0;
/// Rolling historical series capacity (FIFO eviction beyond this).
pub const HISTORY_CAPACITY: usize = 50;
/// Rolling alert log capacity (FIFO eviction beyond this).
pub const ALERT_CAPACITY: usize = 10;
/// Nameplate storage capacity reported in every snapshot (kWh).
pub const STORAGE_CAPACITY_KWH: f32 = 150.0;
/// Net power above which the bank reports charging (kW).
pub const CHARGE_BAND_KW: f32 = 5.0;
/// Net power below which the bank reports discharging (kW).
pub const DISCHARGE_BAND_KW: f32 = -5.0;
/// Maximum reported charging power (kW).
pub const CHARGE_CAP_KW: f32 = 15.0;
/// Maximum reported discharging power (kW).
pub const DISCHARGE_CAP_KW: f32 = 20.0;
/// Uptime accumulator ceiling (%).
pub const UPTIME_CEILING_PCT: f32 = 100.0;

/// Ambient weather conditions for one tick. Recomputed every tick, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReading {
    /// Ambient temperature (°C).
    pub temperature: f32,
    /// Relative humidity (%).
    pub humidity: f32,
    /// Wind speed (m/s), clamped to `[0, WIND_SPEED_MAX_MPS]`.
    pub wind_speed: f32,
    /// Solar irradiance (W/m²), clamped to `[0, IRRADIANCE_MAX_W_M2]`.
    pub irradiance: f32,
    /// Cloud cover (%).
    pub cloud_cover: f32,
}

/// Solar PV output for one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarReading {
    /// DC-side power (kW), floored at zero.
    pub dc_power: f32,
    /// AC-side power after inverter losses (kW), floored at zero.
    pub ac_power: f32,
    /// Display conversion efficiency (%), `ac / max(dc, 0.1) * 100`.
    pub efficiency: f32,
    /// Irradiance the reading was derived from (W/m²).
    pub irradiance: f32,
    /// Panel module temperature (°C).
    pub module_temp: f32,
}

/// Wind turbine output for one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindReading {
    /// Generated power (kW), floored at zero.
    pub power: f32,
    /// Wind speed the reading was derived from (m/s).
    pub wind_speed: f32,
    /// Drawn turbine efficiency (%).
    pub efficiency: f32,
}

/// Biogas plant operating state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BiogasStatus {
    Operational,
    Reduced,
}

/// Biogas generator output for one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiogasReading {
    /// Generated power (kW), floored at zero.
    pub power: f32,
    /// `Operational` above the reduced-output threshold, `Reduced` below.
    pub status: BiogasStatus,
    /// Drawn plant efficiency (%).
    pub efficiency: f32,
}

/// Combined generation breakdown. `total_generation` is always the sum of
/// the three source powers and therefore never negative.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReading {
    pub solar: SolarReading,
    pub wind: WindReading,
    pub cbg: BiogasReading,
    /// `solar.ac_power + wind.power + cbg.power` (kW).
    pub total_generation: f32,
}

/// Per-pack battery view as reported in a snapshot. The authoritative SOC
/// state lives in the storage model; this is the rounded display form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryPack {
    /// Pack identifier, 1-based.
    pub id: u8,
    /// State of charge (%), within `[SOC_MIN_PCT, SOC_MAX_PCT]`.
    pub soc: f32,
    /// State of health (%).
    pub soh: u8,
    /// Pack temperature (°C).
    pub temp: f32,
    /// Terminal voltage (V), derived linearly from SOC around 48 V nominal.
    pub voltage: f32,
}

/// Storage subsystem breakdown for one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageReading {
    /// Mean SOC across all packs (%).
    #[serde(rename = "overallSOC")]
    pub overall_soc: f32,
    /// Nameplate capacity (kWh).
    pub total_capacity: f32,
    /// Aggregate charging power (kW), zero unless net power is in the
    /// charging band.
    pub charge_power: f32,
    /// Aggregate discharging power (kW), zero unless net power is in the
    /// discharging band.
    pub discharge_power: f32,
    pub battery_packs: Vec<BatteryPack>,
}

/// Demand-side breakdown for one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandReading {
    /// Total load (kW).
    pub total_load: f32,
    /// Critical (non-sheddable) share of the load (kW).
    pub critical_loads: f32,
    /// Flexible remainder (kW).
    pub flexible_loads: f32,
    /// Cosmetic peak-reduction effectiveness figure (%).
    pub peak_reduction: f32,
}

/// Power quality figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerQuality {
    /// Bus voltage (V), nominally 230.
    pub voltage: f32,
    /// Grid frequency (Hz), nominally 50.
    pub frequency: f32,
    /// Total harmonic distortion (%).
    pub thd: f32,
}

/// System-level performance metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemMetrics {
    /// Overall system efficiency (%).
    pub overall_efficiency: f32,
    /// Uptime accumulator (%), capped at `UPTIME_CEILING_PCT`.
    pub uptime: f32,
    pub power_quality: PowerQuality,
}

/// Alert severity. Serializes under the JSON key `type` with lowercase
/// values, matching the dashboard contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
}

/// A threshold-violation alert. Ids are strictly increasing for the
/// lifetime of the process but restart from 1 on every run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub id: u64,
    #[serde(rename = "type")]
    pub severity: AlertSeverity,
    pub message: String,
    /// Wall-clock label of the tick that raised the alert ("HH:MM").
    pub time: String,
}

/// One point of the rolling historical series. Insertion order is
/// chronological and semantically meaningful.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalPoint {
    /// Wall-clock label ("HH:MM").
    pub time: String,
    /// Total generation at that tick (kW).
    pub generation: f32,
    /// Total demand at that tick (kW).
    pub demand: f32,
    /// Overall efficiency at that tick (%).
    pub efficiency: f32,
}

/// The full output of one tick. Immutable once produced; safe to share with
/// any number of viewers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub timestamp: DateTime<Local>,
    pub generation: GenerationReading,
    pub storage: StorageReading,
    pub demand: DemandReading,
    pub system_metrics: SystemMetrics,
    pub weather: WeatherReading,
    /// Rolling alert log, at most `ALERT_CAPACITY` entries, oldest first.
    pub alerts: Vec<Alert>,
    /// Rolling historical series, at most `HISTORY_CAPACITY` entries,
    /// oldest first.
    pub historical_data: Vec<HistoricalPoint>,
}

impl Snapshot {
    /// Net power for this tick: total generation minus total demand (kW).
    /// Positive means surplus, negative means deficit.
    pub fn net_power_kw(&self) -> f32 {
        self.generation.total_generation - self.demand.total_load
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] gen={:>5.1} kW (solar={:.1} wind={:.1} cbg={:.1}) | \
             load={:>5.1} kW | net={:>+6.1} kW | SOC={:>3.0}% | \
             eff={:.1}% | up={:.2}% | alerts={}",
            self.timestamp.format("%H:%M:%S"),
            self.generation.total_generation,
            self.generation.solar.ac_power,
            self.generation.wind.power,
            self.generation.cbg.power,
            self.demand.total_load,
            self.net_power_kw(),
            self.storage.overall_soc,
            self.system_metrics.overall_efficiency,
            self.system_metrics.uptime,
            self.alerts.len(),
        )
    }
}

/// Uniform draw in `[lo, hi)`, degenerating to `lo` when the range is empty
/// (keeps zero-noise configurations out of `random_range`, which panics on
/// an empty range).
pub(crate) fn uniform(rng: &mut StdRng, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        return lo;
    }
    rng.random_range(lo..hi)
}

/// Round to the nearest integer, keeping `f32` for serialization.
pub(crate) fn round0(v: f32) -> f32 {
    v.round()
}

/// Round to one decimal place.
pub(crate) fn round1(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}

/// Round to two decimal places.
pub(crate) fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}
