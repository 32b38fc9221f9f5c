//! Battery storage bank.
//!
//! The only model that carries physical state across ticks: each pack's SOC
//! drifts from its previous value by a bounded random step in the direction
//! of the net power balance, then gets clamped back into
//! `[SOC_MIN_PCT, SOC_MAX_PCT]`. The clamp is what keeps long uptimes from
//! drifting into impossible charge levels.

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::types::{
    BatteryPack, CHARGE_BAND_KW, CHARGE_CAP_KW, DISCHARGE_BAND_KW, DISCHARGE_CAP_KW,
    SOC_MAX_PCT, SOC_MIN_PCT, STORAGE_CAPACITY_KWH, StorageReading, round0, round1, uniform,
};

/// Maximum per-tick SOC gain while charging (% points).
const SOC_CHARGE_STEP_MAX_PCT: f32 = 0.2;
/// Maximum per-tick SOC loss while discharging (% points). Larger than the
/// charge step: the bank drains faster than it fills.
const SOC_DISCHARGE_STEP_MAX_PCT: f32 = 0.3;
/// State-of-health draw range (%).
const SOH_MIN_PCT: u8 = 93;
const SOH_MAX_PCT: u8 = 98;
/// Pack temperature draw range (°C).
const PACK_TEMP_MIN_C: f32 = 23.0;
const PACK_TEMP_MAX_C: f32 = 26.0;
/// Nominal pack voltage (V) and its linear SOC sensitivity.
const NOMINAL_VOLTAGE_V: f32 = 48.0;
const VOLTS_PER_SOC_PCT: f32 = 0.02;
/// SOC at which the pack sits exactly at nominal voltage (%).
const SOC_VOLTAGE_MIDPOINT_PCT: f32 = 50.0;

/// Battery pack bank. Owns the authoritative per-pack SOC values.
#[derive(Debug, Clone)]
pub struct StorageModel {
    socs: Vec<f32>,
    rng: StdRng,
}

impl StorageModel {
    /// Creates a bank with one pack per initial SOC value, clamping each
    /// into the operating window.
    ///
    /// # Panics
    ///
    /// Panics if `initial_soc_pct` is empty.
    pub fn new(initial_soc_pct: &[f32], seed: u64) -> Self {
        assert!(!initial_soc_pct.is_empty(), "at least one battery pack required");
        Self {
            socs: initial_soc_pct
                .iter()
                .map(|s| s.clamp(SOC_MIN_PCT, SOC_MAX_PCT))
                .collect(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Current per-pack SOC values (%).
    pub fn socs(&self) -> &[f32] {
        &self.socs
    }

    /// Advances every pack one tick for the given net power and returns the
    /// storage breakdown. Positive net power charges, non-positive
    /// discharges; every pack ends inside `[SOC_MIN_PCT, SOC_MAX_PCT]`.
    pub fn step(&mut self, net_power_kw: f32) -> StorageReading {
        for soc in &mut self.socs {
            if net_power_kw > 0.0 {
                *soc += uniform(&mut self.rng, 0.0, SOC_CHARGE_STEP_MAX_PCT);
            } else {
                *soc -= uniform(&mut self.rng, 0.0, SOC_DISCHARGE_STEP_MAX_PCT);
            }
            *soc = soc.clamp(SOC_MIN_PCT, SOC_MAX_PCT);
        }

        let overall_soc = self.socs.iter().sum::<f32>() / self.socs.len() as f32;

        let (charge_power, discharge_power) = if net_power_kw > CHARGE_BAND_KW {
            (net_power_kw.min(CHARGE_CAP_KW), 0.0)
        } else if net_power_kw < DISCHARGE_BAND_KW {
            (0.0, net_power_kw.abs().min(DISCHARGE_CAP_KW))
        } else {
            (0.0, 0.0)
        };

        let battery_packs = self
            .socs
            .iter()
            .enumerate()
            .map(|(i, &soc)| BatteryPack {
                id: (i + 1) as u8,
                soc: round0(soc),
                soh: self.rng.random_range(SOH_MIN_PCT..=SOH_MAX_PCT),
                temp: round1(uniform(&mut self.rng, PACK_TEMP_MIN_C, PACK_TEMP_MAX_C)),
                voltage: round1(
                    NOMINAL_VOLTAGE_V + (soc - SOC_VOLTAGE_MIDPOINT_PCT) * VOLTS_PER_SOC_PCT,
                ),
            })
            .collect();

        StorageReading {
            overall_soc: round0(overall_soc),
            total_capacity: STORAGE_CAPACITY_KWH,
            charge_power: round1(charge_power),
            discharge_power: round1(discharge_power),
            battery_packs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INITIAL: [f32; 4] = [72.0, 68.0, 65.0, 63.0];

    #[test]
    fn initial_socs_are_clamped() {
        let bank = StorageModel::new(&[10.0, 50.0, 99.0], 42);
        assert_eq!(bank.socs(), &[SOC_MIN_PCT, 50.0, SOC_MAX_PCT]);
    }

    #[test]
    #[should_panic]
    fn empty_bank_panics() {
        StorageModel::new(&[], 42);
    }

    #[test]
    fn soc_stays_in_bounds_under_sustained_discharge() {
        let mut bank = StorageModel::new(&INITIAL, 42);
        for _ in 0..1000 {
            let reading = bank.step(-30.0);
            for pack in &reading.battery_packs {
                assert!(pack.soc >= SOC_MIN_PCT && pack.soc <= SOC_MAX_PCT);
            }
        }
        // Long deficit drains every pack to the floor.
        for &soc in bank.socs() {
            assert!((soc - SOC_MIN_PCT).abs() < SOC_DISCHARGE_STEP_MAX_PCT);
        }
    }

    #[test]
    fn soc_stays_in_bounds_under_sustained_charge() {
        let mut bank = StorageModel::new(&INITIAL, 42);
        for _ in 0..1000 {
            bank.step(30.0);
        }
        for &soc in bank.socs() {
            assert!(soc <= SOC_MAX_PCT);
            assert!((soc - SOC_MAX_PCT).abs() < SOC_CHARGE_STEP_MAX_PCT);
        }
    }

    #[test]
    fn drift_follows_net_power_sign() {
        let mut bank = StorageModel::new(&[60.0; 4], 42);
        bank.step(10.0);
        assert!(bank.socs().iter().all(|&s| s >= 60.0));

        let mut bank = StorageModel::new(&[60.0; 4], 42);
        bank.step(-10.0);
        assert!(bank.socs().iter().all(|&s| s <= 60.0));
    }

    #[test]
    fn charge_band_caps_at_fifteen() {
        let mut bank = StorageModel::new(&INITIAL, 42);
        let r = bank.step(10.0);
        assert_eq!(r.charge_power, 10.0);
        assert_eq!(r.discharge_power, 0.0);

        let r = bank.step(40.0);
        assert_eq!(r.charge_power, CHARGE_CAP_KW);
    }

    #[test]
    fn discharge_band_caps_at_twenty() {
        let mut bank = StorageModel::new(&INITIAL, 42);
        let r = bank.step(-10.0);
        assert_eq!(r.charge_power, 0.0);
        assert_eq!(r.discharge_power, 10.0);

        let r = bank.step(-55.0);
        assert_eq!(r.discharge_power, DISCHARGE_CAP_KW);
    }

    #[test]
    fn small_imbalance_is_idle() {
        let mut bank = StorageModel::new(&INITIAL, 42);
        for net in [-5.0, -2.0, 0.0, 3.0, 5.0] {
            let r = bank.step(net);
            assert_eq!(r.charge_power, 0.0, "net {net}");
            assert_eq!(r.discharge_power, 0.0, "net {net}");
        }
    }

    #[test]
    fn pack_view_fields_in_range() {
        let mut bank = StorageModel::new(&INITIAL, 42);
        let r = bank.step(0.0);
        assert_eq!(r.battery_packs.len(), 4);
        assert_eq!(r.total_capacity, STORAGE_CAPACITY_KWH);
        for (i, pack) in r.battery_packs.iter().enumerate() {
            assert_eq!(pack.id as usize, i + 1);
            assert!(pack.soh >= SOH_MIN_PCT && pack.soh <= SOH_MAX_PCT);
            assert!(pack.temp >= PACK_TEMP_MIN_C && pack.temp <= PACK_TEMP_MAX_C);
        }
    }

    #[test]
    fn voltage_tracks_soc_linearly() {
        let mut bank = StorageModel::new(&[SOC_VOLTAGE_MIDPOINT_PCT], 42);
        let r = bank.step(0.0);
        // One idle tick moves SOC by at most 0.3 points (±0.006 V).
        assert!((r.battery_packs[0].voltage - NOMINAL_VOLTAGE_V).abs() <= 0.1);

        let mut bank = StorageModel::new(&[95.0], 42);
        let r = bank.step(50.0);
        assert_eq!(r.battery_packs[0].voltage, 48.9);
    }

    #[test]
    fn overall_soc_is_pack_mean() {
        let mut bank = StorageModel::new(&[40.0, 60.0], 42);
        let r = bank.step(0.0);
        // Mean moves by at most the discharge step before rounding.
        assert!((r.overall_soc - 50.0).abs() <= 1.0);
    }
}
