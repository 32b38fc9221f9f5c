/// Threshold scanning and the rolling alert log.
pub mod alerts;
/// Tick time source (wall clock or pinned hour).
pub mod clock;
pub mod demand;
pub mod engine;
pub mod generation;
pub mod metrics;
/// Battery pack bank, the cross-tick SOC state.
pub mod storage;
pub mod types;
pub mod weather;
