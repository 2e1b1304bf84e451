//! CSV export for energy series and sweep results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::aggregate::EnergySeries;
use crate::sim::sweep::SweepResult;

/// Column header for hourly energy export.
const HOURLY_HEADER: &str = "hour,energy_kwh";
/// Column header for daily energy export.
const DAILY_HEADER: &str = "date,energy_kwh";
/// Column header for sweep cell export.
const SWEEP_HEADER: &str = "tilt_deg,azimuth_deg,total_kwh";

/// Exports the hourly energy series to a CSV file at the given path.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_hourly_csv(energy: &EnergySeries, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_hourly_csv(energy, io::BufWriter::new(file))
}

/// Writes the hourly energy series as CSV to any writer.
///
/// One row per covered hour in ascending order; absent buckets produce
/// no row. Output is deterministic for identical inputs.
pub fn write_hourly_csv(energy: &EnergySeries, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HOURLY_HEADER.split(','))?;
    for (&(date, hour), &kwh) in energy.hourly() {
        wtr.write_record(&[format!("{date}T{hour:02}:00"), format!("{kwh:.6}")])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Exports the daily energy series to a CSV file at the given path.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_daily_csv(energy: &EnergySeries, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_daily_csv(energy, io::BufWriter::new(file))
}

/// Writes the daily energy series as CSV to any writer.
pub fn write_daily_csv(energy: &EnergySeries, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(DAILY_HEADER.split(','))?;
    for (&date, &kwh) in energy.daily() {
        wtr.write_record(&[date.to_string(), format!("{kwh:.6}")])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Exports the sweep cell table to a CSV file at the given path.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_sweep_csv(result: &SweepResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_sweep_csv(result, io::BufWriter::new(file))
}

/// Writes every sweep cell as CSV in grid order.
pub fn write_sweep_csv(result: &SweepResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(SWEEP_HEADER.split(','))?;
    for cell in &result.cells {
        wtr.write_record(&[
            format!("{:.1}", cell.tilt_deg),
            format!("{:.1}", cell.azimuth_deg),
            format!("{:.6}", cell.total_kwh),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::model::power::PowerSample;

    fn sample_energy() -> EnergySeries {
        let start = Utc.with_ymd_and_hms(2023, 6, 1, 10, 0, 0).unwrap();
        let samples: Vec<_> = (0..30)
            .map(|i| PowerSample {
                timestamp: start + Duration::hours(i),
                aoi_deg: 0.0,
                poa_direct: 0.0,
                poa_diffuse: 0.0,
                poa_ground_reflected: 0.0,
                poa_total: 0.0,
                module_temp_c: 25.0,
                dc_power_w: 500.0,
                ac_power_w: 480.0,
                actual_power_w: 450.0,
            })
            .collect();
        EnergySeries::from_power(&samples)
    }

    #[test]
    fn hourly_export_has_header_and_one_row_per_bucket() {
        let energy = sample_energy();
        let mut buf = Vec::new();
        write_hourly_csv(&energy, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], HOURLY_HEADER);
        assert_eq!(lines.len(), 1 + energy.hourly().len());
        assert!(lines[1].starts_with("2023-06-01T10:00,"));
    }

    #[test]
    fn daily_export_round_trips_through_csv_parser() {
        let energy = sample_energy();
        let mut buf = Vec::new();
        write_daily_csv(&energy, &mut buf).unwrap();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let mut rows = 0;
        for record in rdr.records() {
            let record = record.unwrap();
            assert!(record[1].parse::<f64>().is_ok());
            rows += 1;
        }
        assert_eq!(rows, energy.daily().len());
    }

    #[test]
    fn exports_are_deterministic() {
        let energy = sample_energy();
        let mut a = Vec::new();
        let mut b = Vec::new();
        write_hourly_csv(&energy, &mut a).unwrap();
        write_hourly_csv(&energy, &mut b).unwrap();
        assert_eq!(a, b);
    }
}
