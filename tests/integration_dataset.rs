//! Integration tests for the dataset-backed weather and solar models.

mod common;

use std::sync::Arc;

use microgrid_sim::config::ScenarioConfig;
use microgrid_sim::dataset::PlantDataset;
use microgrid_sim::sim::engine::Simulator;
use microgrid_sim::sim::types::{SOC_MAX_PCT, SOC_MIN_PCT};

fn dataset_simulator(hour: f32, dataset: Arc<PlantDataset>) -> Simulator {
    Simulator::from_config(&common::fixed_hour_config(hour), Some(dataset))
}

#[test]
fn noon_snapshot_reads_the_noon_record() {
    let mut sim = dataset_simulator(12.0, common::daylight_dataset());
    let s = sim.produce_snapshot();

    // Weather comes from the record: measured irradiation, derived cover.
    assert_eq!(s.weather.irradiance, 640.0);
    assert_eq!(s.weather.cloud_cover, 36.0); // 100 - 640/10
    assert_eq!(s.weather.temperature, 27.8);

    // Solar comes from the same record, in kW.
    assert_eq!(s.generation.solar.dc_power, 52.3);
    assert_eq!(s.generation.solar.ac_power, 50.1);
    assert_eq!(s.generation.solar.module_temp, 44.2);
}

#[test]
fn lookup_matches_nearest_time_of_day() {
    // 16:30 is closer to the 18:00 record than to noon.
    let mut sim = dataset_simulator(16.5, common::daylight_dataset());
    let s = sim.produce_snapshot();
    assert_eq!(s.weather.irradiance, 40.0);
    assert_eq!(s.generation.solar.ac_power, 1.3);
}

#[test]
fn wind_and_humidity_stay_synthetic_with_a_dataset() {
    let mut sim = dataset_simulator(12.0, common::daylight_dataset());
    for _ in 0..50 {
        let s = sim.produce_snapshot();
        // Base wind 8.2 with [-2, 3) noise.
        assert!(s.weather.wind_speed >= 6.2 && s.weather.wind_speed <= 11.2);
        assert!(s.weather.humidity >= 50.0 && s.weather.humidity <= 85.0);
    }
}

#[test]
fn empty_dataset_behaves_like_synthetic() {
    let mut sim = dataset_simulator(12.0, Arc::new(PlantDataset::default()));
    for _ in 0..50 {
        let s = sim.produce_snapshot();
        // Synthetic noon band: peak times cloud factor, ±50 noise.
        assert!(s.weather.irradiance >= 562.0 && s.weather.irradiance <= 925.0);
        assert!(s.generation.solar.ac_power > 10.0);
    }
}

#[test]
fn dataset_snapshots_preserve_core_invariants() {
    let mut sim = dataset_simulator(12.0, common::daylight_dataset());
    for _ in 0..50 {
        let s = sim.produce_snapshot();
        let sum =
            s.generation.solar.ac_power + s.generation.wind.power + s.generation.cbg.power;
        assert!((s.generation.total_generation - sum).abs() <= 0.06);
        for pack in &s.storage.battery_packs {
            assert!(pack.soc >= SOC_MIN_PCT && pack.soc <= SOC_MAX_PCT);
        }
    }
}

#[test]
fn overcast_record_raises_the_cloud_alert() {
    // 95 W/m² at dawn derives 90.5% cover, past the 70% threshold.
    let mut sim = dataset_simulator(6.0, common::daylight_dataset());
    let s = sim.produce_snapshot();
    assert!(s.weather.cloud_cover > 70.0);
    assert!(
        s.alerts.iter().any(|a| a.message.contains("cloud cover")),
        "expected a cloud cover alert, got {:?}",
        s.alerts
    );
}

#[test]
fn csv_sourced_dataset_feeds_the_simulator() {
    let csv = "\
DATE_TIME,DC_POWER,AC_POWER,AMBIENT_TEMPERATURE,MODULE_TEMPERATURE,IRRADIATION
15/05/2020 12:00,30000,29000,27.0,41.0,780
15/05/2020 12:00,30000,29400,27.0,41.0,780
";
    let dataset = PlantDataset::from_csv_reader(csv.as_bytes()).unwrap();
    let mut sim = Simulator::from_config(
        &common::fixed_hour_config(12.0),
        Some(Arc::new(dataset)),
    );
    let s = sim.produce_snapshot();
    // Two inverters summed: 60 kW DC, 58.4 kW AC.
    assert_eq!(s.generation.solar.dc_power, 60.0);
    assert_eq!(s.generation.solar.ac_power, 58.4);
    assert_eq!(s.weather.irradiance, 780.0);
}

#[test]
fn dataset_and_synthetic_runs_share_the_output_shape() {
    let mut with_dataset = dataset_simulator(12.0, common::daylight_dataset());
    let mut synthetic = Simulator::from_config(&common::fixed_hour_config(12.0), None);

    let a = serde_json::to_value(with_dataset.produce_snapshot()).unwrap();
    let b = serde_json::to_value(synthetic.produce_snapshot()).unwrap();

    let keys = |v: &serde_json::Value| -> Vec<String> {
        v.as_object()
            .map(|o| o.keys().cloned().collect())
            .unwrap_or_default()
    };
    assert_eq!(keys(&a), keys(&b));
    assert_eq!(keys(&a["generation"]["solar"]), keys(&b["generation"]["solar"]));
    assert_eq!(keys(&a["weather"]), keys(&b["weather"]));
}

#[test]
fn baseline_config_has_no_dataset_path() {
    assert!(ScenarioConfig::baseline().dataset.path.is_none());
}
