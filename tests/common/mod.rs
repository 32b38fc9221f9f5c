//! Shared test fixtures for integration tests.

use std::sync::Arc;

use microgrid_sim::config::ScenarioConfig;
use microgrid_sim::dataset::{PlantDataset, PlantRecord};
use microgrid_sim::sim::engine::Simulator;

/// Baseline config with the clock pinned to the given hour.
pub fn fixed_hour_config(hour: f32) -> ScenarioConfig {
    let mut cfg = ScenarioConfig::baseline();
    cfg.simulation.fixed_hour = Some(hour);
    cfg
}

/// Fully synthetic simulator pinned to solar noon.
pub fn noon_simulator() -> Simulator {
    Simulator::from_config(&fixed_hour_config(12.0), None)
}

/// Fully synthetic simulator pinned to midnight.
pub fn midnight_simulator() -> Simulator {
    Simulator::from_config(&fixed_hour_config(0.0), None)
}

/// Simulator with depleted packs and an oversized evening load, so the bank
/// stays pinned at the SOC floor and every tick raises four warnings.
pub fn depleted_simulator() -> Simulator {
    let mut cfg = fixed_hour_config(18.0);
    cfg.storage.initial_soc_pct = vec![20.0, 20.0, 20.0, 20.0];
    cfg.demand.base_kw = 80.0;
    Simulator::from_config(&cfg, None)
}

/// A small dataset with one record per daylight quarter.
pub fn daylight_dataset() -> Arc<PlantDataset> {
    Arc::new(PlantDataset::from_records(vec![
        PlantRecord {
            seconds_of_day: 6 * 3600,
            dc_power_kw: 2.1,
            ac_power_kw: 2.0,
            ambient_temp_c: 22.4,
            module_temp_c: 23.9,
            irradiation: 95.0,
        },
        PlantRecord {
            seconds_of_day: 12 * 3600,
            dc_power_kw: 52.3,
            ac_power_kw: 50.1,
            ambient_temp_c: 27.8,
            module_temp_c: 44.2,
            irradiation: 640.0,
        },
        PlantRecord {
            seconds_of_day: 18 * 3600,
            dc_power_kw: 1.4,
            ac_power_kw: 1.3,
            ambient_temp_c: 24.1,
            module_temp_c: 25.0,
            irradiation: 40.0,
        },
    ]))
}
