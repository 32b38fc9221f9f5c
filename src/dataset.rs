//! Historical plant dataset backing the dataset-driven weather and solar
//! models.
//!
//! The source file is a generation-data CSV with one row per inverter per
//! timestamp (`DATE_TIME` in `%d/%m/%Y %H:%M` format). Loading aggregates
//! rows twice: inverter rows at the same timestamp are summed (power, in kW
//! after the /1000 conversion) and averaged (temperatures, irradiation),
//! then timestamps sharing a time of day are averaged across dates. Lookups
//! match by nearest time of day, wrapping across midnight.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use chrono::{NaiveDateTime, Timelike};

/// Seconds in a day, for circular time-of-day distance.
const DAY_SECS: u32 = 86_400;

/// Timestamp format used by the plant export.
const DATE_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Aggregated plant reading for one time-of-day slot.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantRecord {
    /// Seconds since midnight for this slot.
    pub seconds_of_day: u32,
    /// Summed inverter DC power (kW).
    pub dc_power_kw: f32,
    /// Summed inverter AC power (kW).
    pub ac_power_kw: f32,
    /// Mean ambient temperature (°C).
    pub ambient_temp_c: f32,
    /// Mean module temperature (°C).
    pub module_temp_c: f32,
    /// Mean plane-of-array irradiation.
    pub irradiation: f32,
}

/// Error raised while loading a plant dataset. Lookup itself never fails;
/// a miss is reported as `None` and the caller falls back to synthesis.
#[derive(Debug)]
pub enum DatasetError {
    Io(io::Error),
    Csv(csv::Error),
    /// A required column is absent from the header row.
    MissingColumn(String),
    /// A `DATE_TIME` cell did not parse with the expected format.
    Timestamp(String),
    /// A numeric cell did not parse as a float.
    Number { column: String, value: String },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "dataset I/O error: {e}"),
            Self::Csv(e) => write!(f, "dataset CSV error: {e}"),
            Self::MissingColumn(name) => write!(f, "dataset is missing column \"{name}\""),
            Self::Timestamp(value) => {
                write!(f, "timestamp \"{value}\" does not match {DATE_TIME_FORMAT}")
            }
            Self::Number { column, value } => {
                write!(f, "column \"{column}\" value \"{value}\" is not a number")
            }
        }
    }
}

impl std::error::Error for DatasetError {}

impl From<io::Error> for DatasetError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<csv::Error> for DatasetError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e)
    }
}

/// Per-timestamp accumulator for the first aggregation stage.
#[derive(Debug, Clone, Copy, Default)]
struct TimestampAcc {
    dc_sum: f32,
    ac_sum: f32,
    ambient_sum: f32,
    module_sum: f32,
    irradiation_sum: f32,
    rows: u32,
}

/// A time-of-day indexed plant dataset.
#[derive(Debug, Clone, Default)]
pub struct PlantDataset {
    /// Sorted by `seconds_of_day`, at most one record per slot.
    records: Vec<PlantRecord>,
}

impl PlantDataset {
    /// Builds a dataset from pre-aggregated records (mainly for tests).
    pub fn from_records(mut records: Vec<PlantRecord>) -> Self {
        records.sort_by_key(|r| r.seconds_of_day);
        Self { records }
    }

    /// Loads and aggregates a generation-data CSV file.
    ///
    /// # Errors
    ///
    /// Returns a [`DatasetError`] if the file cannot be read, a required
    /// column is missing, or a cell fails to parse.
    pub fn from_csv_path(path: &Path) -> Result<Self, DatasetError> {
        let file = File::open(path)?;
        Self::from_csv_reader(io::BufReader::new(file))
    }

    /// Loads and aggregates generation-data CSV from any reader.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PlantDataset::from_csv_path`].
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut rdr = csv::Reader::from_reader(reader);

        let headers = rdr.headers()?.clone();
        let col = |name: &str| -> Result<usize, DatasetError> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
        };
        let date_time = col("DATE_TIME")?;
        let dc_power = col("DC_POWER")?;
        let ac_power = col("AC_POWER")?;
        let ambient = col("AMBIENT_TEMPERATURE")?;
        let module = col("MODULE_TEMPERATURE")?;
        let irradiation = col("IRRADIATION")?;

        // Stage 1: sum inverter rows sharing a full timestamp.
        let mut by_timestamp: BTreeMap<NaiveDateTime, TimestampAcc> = BTreeMap::new();
        for record in rdr.records() {
            let record = record?;
            let cell = |idx: usize| record.get(idx).unwrap_or("");

            let ts = NaiveDateTime::parse_from_str(cell(date_time), DATE_TIME_FORMAT)
                .map_err(|_| DatasetError::Timestamp(cell(date_time).to_string()))?;

            let num = |idx: usize, name: &str| -> Result<f32, DatasetError> {
                cell(idx).trim().parse::<f32>().map_err(|_| DatasetError::Number {
                    column: name.to_string(),
                    value: cell(idx).to_string(),
                })
            };

            let acc = by_timestamp.entry(ts).or_default();
            acc.dc_sum += num(dc_power, "DC_POWER")?;
            acc.ac_sum += num(ac_power, "AC_POWER")?;
            acc.ambient_sum += num(ambient, "AMBIENT_TEMPERATURE")?;
            acc.module_sum += num(module, "MODULE_TEMPERATURE")?;
            acc.irradiation_sum += num(irradiation, "IRRADIATION")?;
            acc.rows += 1;
        }

        // Stage 2: average the per-timestamp aggregates across dates that
        // share a time of day. Inverter power is W in the export; report kW.
        let mut by_slot: BTreeMap<u32, (f32, f32, f32, f32, f32, u32)> = BTreeMap::new();
        for (ts, acc) in &by_timestamp {
            let rows = acc.rows as f32;
            let slot = by_slot
                .entry(ts.time().num_seconds_from_midnight())
                .or_insert((0.0, 0.0, 0.0, 0.0, 0.0, 0));
            slot.0 += acc.dc_sum / 1000.0;
            slot.1 += acc.ac_sum / 1000.0;
            slot.2 += acc.ambient_sum / rows;
            slot.3 += acc.module_sum / rows;
            slot.4 += acc.irradiation_sum / rows;
            slot.5 += 1;
        }

        let records = by_slot
            .into_iter()
            .map(|(secs, (dc, ac, amb, md, irr, n))| {
                let n = n as f32;
                PlantRecord {
                    seconds_of_day: secs,
                    dc_power_kw: dc / n,
                    ac_power_kw: ac / n,
                    ambient_temp_c: amb / n,
                    module_temp_c: md / n,
                    irradiation: irr / n,
                }
            })
            .collect();

        Ok(Self { records })
    }

    /// The record whose time of day is closest to `hour` (fractional hours),
    /// measuring distance circularly across midnight. `None` when empty.
    pub fn nearest(&self, hour: f32) -> Option<&PlantRecord> {
        let target = (hour.rem_euclid(24.0) * 3600.0) as u32 % DAY_SECS;
        self.records.iter().min_by_key(|r| {
            let d = r.seconds_of_day.abs_diff(target);
            d.min(DAY_SECS - d)
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
