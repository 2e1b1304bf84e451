//! Time-weighted integration of power into hourly, daily, monthly, and
//! annual energy buckets.
//!
//! The canonical path is two-stage mean-then-sum: instantaneous power is
//! resampled to an hourly mean (kW × 1 h = kWh), hourly energies sum into
//! days, days into months. Summing raw sub-hourly samples directly is NOT
//! equivalent when bucket boundaries and sample boundaries disagree, so
//! every total here derives from the hourly stage. Buckets with no
//! underlying samples are absent from the maps, never zero-filled; gaps
//! in the input (DST jumps, logger outages) produce no synthesized
//! energy.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Timelike};

use crate::model::power::PowerSample;

/// Hour bucket key: calendar date plus hour-of-day (0–23).
pub type HourKey = (NaiveDate, u32);
/// Month bucket key: year plus month (1–12).
pub type MonthKey = (i32, u32);

/// Bucketed energy aggregation of a power series, in kWh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnergySeries {
    hourly: BTreeMap<HourKey, f64>,
    daily: BTreeMap<NaiveDate, f64>,
    monthly: BTreeMap<MonthKey, f64>,
    total_kwh: f64,
}

impl EnergySeries {
    /// Aggregates delivered power (`actual_power_w`) into energy buckets.
    pub fn from_power(samples: &[PowerSample]) -> Self {
        let mut sums: BTreeMap<HourKey, (f64, usize)> = BTreeMap::new();
        for sample in samples {
            let key = (sample.timestamp.date_naive(), sample.timestamp.hour());
            let entry = sums.entry(key).or_insert((0.0, 0));
            entry.0 += sample.actual_power_w;
            entry.1 += 1;
        }

        // Hourly energy: mean power over the hour (kW) × 1 h.
        let hourly: BTreeMap<HourKey, f64> = sums
            .into_iter()
            .map(|(key, (sum_w, n))| (key, sum_w / n as f64 / 1000.0))
            .collect();

        let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for (&(date, _), &kwh) in &hourly {
            *daily.entry(date).or_insert(0.0) += kwh;
        }

        let mut monthly: BTreeMap<MonthKey, f64> = BTreeMap::new();
        for (&date, &kwh) in &daily {
            *monthly.entry((date.year(), date.month())).or_insert(0.0) += kwh;
        }

        let total_kwh = monthly.values().sum();

        Self {
            hourly,
            daily,
            monthly,
            total_kwh,
        }
    }

    /// Hourly energy buckets (kWh).
    pub fn hourly(&self) -> &BTreeMap<HourKey, f64> {
        &self.hourly
    }

    /// Daily energy buckets (kWh).
    pub fn daily(&self) -> &BTreeMap<NaiveDate, f64> {
        &self.daily
    }

    /// Monthly energy buckets (kWh).
    pub fn monthly(&self) -> &BTreeMap<MonthKey, f64> {
        &self.monthly
    }

    /// Total energy across all buckets (kWh).
    pub fn total_kwh(&self) -> f64 {
        self.total_kwh
    }
}
