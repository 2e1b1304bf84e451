//! CSV ingestion for weather and measured-energy series.
//!
//! Ingestion is deliberately forgiving about data quality and loud about
//! it: missing columns zero-fill, non-numeric cells coerce to zero, and
//! rows with unparseable timestamps drop — each case is counted in an
//! [`ImportReport`] returned to the caller alongside the series, because
//! zero-filled irradiance silently biases modeled yield toward zero and
//! the caller must be able to see that, not just find it in a log.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::StringRecord;
use tracing::warn;

use crate::error::{Error, Result};
use crate::weather::{WeatherSample, WeatherSeries};

/// Required weather columns beyond the time column.
const REQUIRED_COLUMNS: [&str; 7] = [
    "dni", "ghi", "dhi", "air_temp", "albedo", "zenith", "azimuth",
];

/// Time column name.
const TIME_COLUMN: &str = "time";

/// Data-quality accounting for one import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Required columns absent from the header, filled with zeros.
    pub zero_filled_columns: Vec<String>,
    /// Cells that failed numeric parsing and were coerced to zero.
    pub coerced_cells: usize,
    /// Rows dropped for unparseable timestamps.
    pub dropped_rows: usize,
    /// Data rows seen in the file.
    pub total_rows: usize,
}

impl ImportReport {
    /// Whether any zero-fill, coercion, or row drop occurred. A degraded
    /// import still simulates, but its results are biased toward zero
    /// irradiance.
    pub fn is_degraded(&self) -> bool {
        !self.zero_filled_columns.is_empty() || self.coerced_cells > 0 || self.dropped_rows > 0
    }
}

/// A loaded weather series together with its quality report.
#[derive(Debug, Clone)]
pub struct WeatherImport {
    /// The usable, ordered series.
    pub series: WeatherSeries,
    /// Data-quality accounting for the load.
    pub report: ImportReport,
}

/// Loads a weather series from a CSV file.
///
/// # Errors
///
/// Fails on I/O or CSV-structure errors, a missing `time` column, or
/// when no row yields a usable timestamp.
pub fn load_weather_csv(path: &Path) -> Result<WeatherImport> {
    let file = File::open(path)?;
    read_weather_csv(file, path)
}

/// Reads a weather series from any reader; `path` is used only for
/// error reporting.
pub fn read_weather_csv<R: Read>(reader: R, path: &Path) -> Result<WeatherImport> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column_index = |name: &str| headers.iter().position(|h| h.trim() == name);

    let Some(time_idx) = column_index(TIME_COLUMN) else {
        return Err(Error::MissingTimeColumn {
            path: path.to_path_buf(),
            column: TIME_COLUMN,
        });
    };

    let mut report = ImportReport::default();
    let mut required = [None; REQUIRED_COLUMNS.len()];
    for (i, &name) in REQUIRED_COLUMNS.iter().enumerate() {
        required[i] = column_index(name);
        if required[i].is_none() {
            warn!(column = %name, "required weather column missing; filling with zeros");
            report.zero_filled_columns.push(name.to_string());
        }
    }
    let [dni, ghi, dhi, air_temp, albedo, zenith, azimuth] = required;

    let cloud_opacity = column_index("cloud_opacity");
    let relative_humidity = column_index("relative_humidity");
    let wind_speed = column_index("wind_speed_10m");

    let mut samples = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        report.total_rows += 1;

        let Some(timestamp) = record.get(time_idx).and_then(parse_timestamp) else {
            report.dropped_rows += 1;
            continue;
        };

        samples.push(WeatherSample {
            timestamp,
            dni: numeric(&record, dni, &mut report),
            ghi: numeric(&record, ghi, &mut report),
            dhi: numeric(&record, dhi, &mut report),
            air_temp_c: numeric(&record, air_temp, &mut report),
            albedo: numeric(&record, albedo, &mut report),
            zenith_deg: numeric(&record, zenith, &mut report),
            azimuth_deg: numeric(&record, azimuth, &mut report),
            cloud_opacity_pct: optional_numeric(&record, cloud_opacity, &mut report),
            relative_humidity_pct: optional_numeric(&record, relative_humidity, &mut report),
            wind_speed_ms: optional_numeric(&record, wind_speed, &mut report),
        });
    }

    if samples.is_empty() && report.dropped_rows > 0 {
        return Err(Error::AllRowsDropped {
            path: path.to_path_buf(),
            dropped: report.dropped_rows,
        });
    }

    if report.dropped_rows > 0 {
        warn!(
            dropped = report.dropped_rows,
            total = report.total_rows,
            "dropped rows with unparseable timestamps"
        );
    }
    if report.coerced_cells > 0 {
        warn!(cells = report.coerced_cells, "coerced non-numeric cells to zero");
    }

    let series = WeatherSeries::new(samples)?;
    Ok(WeatherImport { series, report })
}

/// Loads a measured daily-energy series from a `date,energy_kwh` CSV.
///
/// Rows with unparseable dates are dropped; non-numeric energies coerce
/// to zero, matching the weather policy.
///
/// # Errors
///
/// Fails on I/O or CSV-structure errors, a missing `date` column, or
/// when every row's date fails to parse.
pub fn load_measured_daily_csv(path: &Path) -> Result<BTreeMap<NaiveDate, f64>> {
    let file = File::open(path)?;
    read_measured_daily_csv(file, path)
}

/// Reads a measured daily-energy series from any reader.
pub fn read_measured_daily_csv<R: Read>(reader: R, path: &Path) -> Result<BTreeMap<NaiveDate, f64>> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let Some(date_idx) = headers.iter().position(|h| h.trim() == "date") else {
        return Err(Error::MissingTimeColumn {
            path: path.to_path_buf(),
            column: "date",
        });
    };
    let energy_idx = headers.iter().position(|h| h.trim() == "energy_kwh");

    let mut daily = BTreeMap::new();
    let mut dropped = 0usize;
    for record in csv_reader.records() {
        let record = record?;
        let Some(date) = record
            .get(date_idx)
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        else {
            dropped += 1;
            continue;
        };
        let energy = energy_idx
            .and_then(|i| record.get(i))
            .and_then(|s| s.trim().parse::<f64>().ok())
            .unwrap_or(0.0);
        daily.insert(date, energy);
    }

    if daily.is_empty() {
        return Err(Error::AllRowsDropped {
            path: path.to_path_buf(),
            dropped,
        });
    }
    if dropped > 0 {
        warn!(dropped, "dropped measured rows with unparseable dates");
    }
    Ok(daily)
}

/// Accepts RFC 3339 or naive `%Y-%m-%d %H:%M[:%S]` timestamps; naive
/// values are taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Value of a required column: zero when the column is absent, coerced
/// to zero (and counted) when the cell is not numeric.
fn numeric(record: &StringRecord, index: Option<usize>, report: &mut ImportReport) -> f64 {
    let Some(index) = index else { return 0.0 };
    match record.get(index).map(str::trim) {
        Some(cell) if !cell.is_empty() => cell.parse().unwrap_or_else(|_| {
            report.coerced_cells += 1;
            0.0
        }),
        _ => {
            report.coerced_cells += 1;
            0.0
        }
    }
}

/// Value of an optional column: `None` when the column is absent.
fn optional_numeric(
    record: &StringRecord,
    index: Option<usize>,
    report: &mut ImportReport,
) -> Option<f64> {
    index.map(|i| numeric(record, Some(i), report))
}
