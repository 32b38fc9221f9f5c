//! CSV export for snapshot telemetry.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::Snapshot;

/// Column header for CSV telemetry export.
const HEADER: &str = "tick,time,solar_ac_kw,wind_kw,biogas_kw,total_generation_kw,\
                      total_load_kw,net_kw,overall_soc_pct,charge_kw,discharge_kw,\
                      overall_efficiency_pct,uptime_pct,alert_count";

/// Exports a snapshot run to a CSV file at the given path.
///
/// Writes a header row followed by one data row per tick. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `snapshots` - Complete run output in tick order
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(snapshots: &[Snapshot], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(snapshots, buf)
}

/// Writes a snapshot run as CSV to any writer.
///
/// # Arguments
///
/// * `snapshots` - Complete run output in tick order
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(snapshots: &[Snapshot], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(HEADER.split(',').map(str::trim))?;

    // Data rows
    for (t, s) in snapshots.iter().enumerate() {
        wtr.write_record(&[
            t.to_string(),
            s.timestamp.format("%H:%M").to_string(),
            format!("{:.1}", s.generation.solar.ac_power),
            format!("{:.1}", s.generation.wind.power),
            format!("{:.1}", s.generation.cbg.power),
            format!("{:.1}", s.generation.total_generation),
            format!("{:.1}", s.demand.total_load),
            format!("{:.1}", s.net_power_kw()),
            format!("{:.0}", s.storage.overall_soc),
            format!("{:.1}", s.storage.charge_power),
            format!("{:.1}", s.storage.discharge_power),
            format!("{:.1}", s.system_metrics.overall_efficiency),
            format!("{:.2}", s.system_metrics.uptime),
            s.alerts.len().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
