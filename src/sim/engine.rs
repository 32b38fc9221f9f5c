//! Simulator orchestration: one call advances every model and composes the
//! full snapshot.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::config::ScenarioConfig;
use crate::dataset::PlantDataset;

use super::alerts::AlertEngine;
use super::clock::SimClock;
use super::demand::DemandModel;
use super::generation::{BiogasPlant, DatasetSolar, SolarModel, SyntheticSolar, WindTurbine};
use super::metrics::MetricsModel;
use super::storage::StorageModel;
use super::types::{GenerationReading, HISTORY_CAPACITY, HistoricalPoint, Snapshot, round1};
use super::weather::{DatasetWeather, SyntheticWeather, WeatherModel};

/// The simulation state machine. Owns every model and all cross-tick state
/// (battery SOCs, uptime, the alert log, the historical window); a single
/// owner advancing it serializes all mutation.
///
/// Holds typed model fields rather than trait objects since the subsystem
/// set is fixed.
pub struct Simulator {
    clock: SimClock,
    weather: WeatherModel,
    solar: SolarModel,
    wind: WindTurbine,
    biogas: BiogasPlant,
    demand: DemandModel,
    storage: StorageModel,
    metrics: MetricsModel,
    alerts: AlertEngine,
    history: VecDeque<HistoricalPoint>,
}

impl Simulator {
    /// Assembles a simulator from pre-built models.
    #[expect(clippy::too_many_arguments)]
    pub fn new(
        clock: SimClock,
        weather: WeatherModel,
        solar: SolarModel,
        wind: WindTurbine,
        biogas: BiogasPlant,
        demand: DemandModel,
        storage: StorageModel,
        metrics: MetricsModel,
    ) -> Self {
        Self {
            clock,
            weather,
            solar,
            wind,
            biogas,
            demand,
            storage,
            metrics,
            alerts: AlertEngine::new(),
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Builds a simulator from a validated scenario configuration. When a
    /// dataset is supplied, the weather and solar models read from it and
    /// fall back to synthesis per tick; otherwise both are fully synthetic.
    pub fn from_config(config: &ScenarioConfig, dataset: Option<Arc<PlantDataset>>) -> Self {
        let seed = config.simulation.seed;
        let clock = match config.simulation.fixed_hour {
            Some(hour) => SimClock::fixed_hour(hour),
            None => SimClock::wall_with_offset(config.simulation.hour_offset),
        };

        let w = &config.weather;
        let synthetic_weather = SyntheticWeather::new(
            w.peak_irradiance_w_m2,
            w.irradiance_noise_w_m2,
            w.base_temperature_c,
            w.base_wind_speed_mps,
            w.cloud_factor_min,
            w.cloud_factor_max,
            seed,
        );

        // Offset seeds decorrelate the per-model noise streams.
        let s = &config.solar;
        let synthetic_solar = SyntheticSolar::new(
            s.panel_area_m2,
            s.base_efficiency,
            s.temp_coefficient_per_c,
            seed.wrapping_add(1),
        );

        let (weather, solar) = match dataset {
            Some(ds) => (
                WeatherModel::Dataset(DatasetWeather::new(Arc::clone(&ds), synthetic_weather)),
                SolarModel::Dataset(DatasetSolar::new(ds, synthetic_solar)),
            ),
            None => (
                WeatherModel::Synthetic(synthetic_weather),
                SolarModel::Synthetic(synthetic_solar),
            ),
        };

        let b = &config.biogas;
        let d = &config.demand;
        Self::new(
            clock,
            weather,
            solar,
            WindTurbine::new(seed.wrapping_add(2)),
            BiogasPlant::new(b.base_output_kw, b.reduced_threshold_kw, seed.wrapping_add(3)),
            DemandModel::new(d.base_kw, d.amp_kw, d.floor_kw, seed.wrapping_add(4)),
            StorageModel::new(&config.storage.initial_soc_pct, seed.wrapping_add(5)),
            MetricsModel::new(config.metrics.initial_uptime_pct, seed.wrapping_add(6)),
        )
    }

    /// Advances one tick and returns the composed snapshot.
    ///
    /// Stage order is fixed: weather feeds generation, generation and demand
    /// feed net power, net power feeds storage, and the alert scan sees the
    /// fully composed readings. The call always succeeds; out-of-range
    /// values are clamped by the models, never surfaced.
    ///
    /// Not a pure function: repeated calls advance battery SOC, uptime, the
    /// alert log, and the historical window even if the clock has not moved.
    pub fn produce_snapshot(&mut self) -> Snapshot {
        let time = self.clock.now();

        let weather = self.weather.sample(time.hour);
        let solar = self.solar.output(&weather, time.hour);
        let wind = self.wind.output(weather.wind_speed);
        let cbg = self.biogas.output();
        let total_generation = round1(solar.ac_power + wind.power + cbg.power);
        let generation = GenerationReading {
            solar,
            wind,
            cbg,
            total_generation,
        };

        let demand = self.demand.profile(time.hour);
        let net_power_kw = generation.total_generation - demand.total_load;

        let storage = self.storage.step(net_power_kw);
        let system_metrics = self.metrics.measure();

        let label = time.label();
        let alerts = self.alerts.scan(&storage, &weather, &system_metrics, &label);

        self.history.push_back(HistoricalPoint {
            time: label,
            generation: generation.total_generation,
            demand: demand.total_load,
            efficiency: system_metrics.overall_efficiency,
        });
        while self.history.len() > HISTORY_CAPACITY {
            self.history.pop_front();
        }

        Snapshot {
            timestamp: time.timestamp,
            generation,
            storage,
            demand,
            system_metrics,
            weather,
            alerts,
            historical_data: self.history.iter().cloned().collect(),
        }
    }

    /// Storage bank accessor (for inspecting authoritative SOC state).
    pub fn storage(&self) -> &StorageModel {
        &self.storage
    }

    /// Current length of the rolling historical window.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Total alerts emitted over the process lifetime.
    pub fn alerts_emitted(&self) -> u64 {
        self.alerts.emitted()
    }
}
