//! Tick driver: advances the simulator on a cadence and fans each snapshot
//! out to a sink.
//!
//! The simulator itself never suspends and owns no cadence policy; the
//! driver decides how often to tick and who sees the result. Holding the
//! simulator by exclusive reference is the single serialization point — one
//! tick completes fully before the next begins.

use std::thread;
use std::time::Duration;

use crate::sim::engine::Simulator;
use crate::sim::types::Snapshot;

/// Runs `ticks` back-to-back ticks, handing each snapshot to `on_snapshot`
/// before collecting it. Returns all snapshots in tick order.
pub fn run_ticks(
    simulator: &mut Simulator,
    ticks: usize,
    mut on_snapshot: impl FnMut(usize, &Snapshot),
) -> Vec<Snapshot> {
    let mut snapshots = Vec::with_capacity(ticks);
    for t in 0..ticks {
        let snapshot = simulator.produce_snapshot();
        on_snapshot(t, &snapshot);
        snapshots.push(snapshot);
    }
    snapshots
}

/// Like [`run_ticks`], sleeping `interval` between consecutive ticks (but
/// not after the last one). A zero interval runs flat out.
pub fn run_with_interval(
    simulator: &mut Simulator,
    ticks: usize,
    interval: Duration,
    mut on_snapshot: impl FnMut(usize, &Snapshot),
) -> Vec<Snapshot> {
    if interval.is_zero() {
        return run_ticks(simulator, ticks, on_snapshot);
    }

    let mut snapshots = Vec::with_capacity(ticks);
    for t in 0..ticks {
        let snapshot = simulator.produce_snapshot();
        on_snapshot(t, &snapshot);
        snapshots.push(snapshot);
        if t + 1 < ticks {
            thread::sleep(interval);
        }
    }
    snapshots
}

#[cfg(test)]
mod tests {
    use crate::config::ScenarioConfig;

    use super::*;

    fn fixed_noon_simulator() -> Simulator {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.fixed_hour = Some(12.0);
        Simulator::from_config(&cfg, None)
    }

    #[test]
    fn runs_requested_tick_count() {
        let mut sim = fixed_noon_simulator();
        let snapshots = run_ticks(&mut sim, 7, |_, _| {});
        assert_eq!(snapshots.len(), 7);
        assert_eq!(sim.history_len(), 7);
    }

    #[test]
    fn sink_sees_every_snapshot_in_order() {
        let mut sim = fixed_noon_simulator();
        let mut seen = Vec::new();
        let snapshots = run_ticks(&mut sim, 5, |t, snap| {
            seen.push((t, snap.generation.total_generation));
        });
        assert_eq!(seen.len(), 5);
        for (t, (seen_t, gen_val)) in seen.iter().enumerate() {
            assert_eq!(t, *seen_t);
            assert_eq!(*gen_val, snapshots[t].generation.total_generation);
        }
    }

    #[test]
    fn zero_ticks_is_a_no_op() {
        let mut sim = fixed_noon_simulator();
        let mut called = false;
        let snapshots = run_ticks(&mut sim, 0, |_, _| called = true);
        assert!(snapshots.is_empty());
        assert!(!called);
        assert_eq!(sim.history_len(), 0);
    }

    #[test]
    fn zero_interval_matches_run_ticks() {
        let mut a = fixed_noon_simulator();
        let mut b = fixed_noon_simulator();
        let fast = run_ticks(&mut a, 4, |_, _| {});
        let timed = run_with_interval(&mut b, 4, Duration::ZERO, |_, _| {});
        assert_eq!(fast, timed);
    }
}
