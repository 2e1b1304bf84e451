//! Scalar yield KPIs derived from a completed simulation run.

use std::fmt;

use crate::config::ArrayConfig;
use crate::model::power::PowerSample;
use crate::sim::aggregate::EnergySeries;

/// Aggregate yield indicators for one scenario run.
///
/// Computed post-hoc from the power samples and energy series so the
/// report always agrees with the exported data.
#[derive(Debug, Clone)]
pub struct YieldReport {
    /// Total delivered energy (kWh).
    pub total_kwh: f64,
    /// Peak AC power over the run (W).
    pub peak_ac_w: f64,
    /// Delivered energy over rated capacity × covered hours (0.0–1.0).
    pub capacity_factor: f64,
    /// Delivered energy per rated kWp (kWh/kWp).
    pub specific_yield_kwh_per_kwp: f64,
}

impl YieldReport {
    /// Computes all KPIs from a completed run.
    ///
    /// The capacity factor denominator uses the hours actually covered
    /// by the energy series, so gap hours do not dilute the ratio.
    pub fn from_run(samples: &[PowerSample], energy: &EnergySeries, config: &ArrayConfig) -> Self {
        let peak_ac_w = samples.iter().map(|s| s.ac_power_w).fold(0.0, f64::max);

        let rated_kw = config.rated_power_w() / 1000.0;
        let covered_hours = energy.hourly().len() as f64;
        let capacity_factor = if rated_kw > 0.0 && covered_hours > 0.0 {
            energy.total_kwh() / (rated_kw * covered_hours)
        } else {
            0.0
        };
        let specific_yield_kwh_per_kwp = if rated_kw > 0.0 {
            energy.total_kwh() / rated_kw
        } else {
            0.0
        };

        Self {
            total_kwh: energy.total_kwh(),
            peak_ac_w,
            capacity_factor,
            specific_yield_kwh_per_kwp,
        }
    }
}

impl fmt::Display for YieldReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Yield Report ---")?;
        writeln!(f, "Total energy:      {:.2} kWh", self.total_kwh)?;
        writeln!(f, "Peak AC power:     {:.1} W", self.peak_ac_w)?;
        writeln!(f, "Capacity factor:   {:.1}%", self.capacity_factor * 100.0)?;
        write!(
            f,
            "Specific yield:    {:.1} kWh/kWp",
            self.specific_yield_kwh_per_kwp
        )
    }
}
