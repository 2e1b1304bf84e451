//! Power conversion: temperature derate, DC→AC, clipping, shading, and
//! system losses.
//!
//! The chain order is normative: temperature derate → DC at STC →
//! humidity derate → inverter conversion and array scaling → inverter
//! clip → shading derate → system losses. Clipping, shading, and losses
//! do not commute; reordering them changes results.

use chrono::{DateTime, NaiveTime, Utc};

use crate::config::ArrayConfig;

/// Standard Test Conditions reference irradiance (W/m²). Rated panel
/// power is defined against this value.
pub const STC_IRRADIANCE_W_M2: f64 = 1000.0;

/// Derived electrical state for one timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerSample {
    /// Timestamp of the underlying weather sample (UTC).
    pub timestamp: DateTime<Utc>,
    /// Angle of incidence (degrees).
    pub aoi_deg: f64,
    /// POA beam component (W/m²).
    pub poa_direct: f64,
    /// POA sky-diffuse component (W/m²).
    pub poa_diffuse: f64,
    /// POA ground-reflected component (W/m²).
    pub poa_ground_reflected: f64,
    /// Total POA irradiance (W/m²).
    pub poa_total: f64,
    /// Estimated module temperature (°C).
    pub module_temp_c: f64,
    /// Array DC power after temperature and humidity derates (W).
    pub dc_power_w: f64,
    /// Array AC power after inverter conversion and clipping (W).
    pub ac_power_w: f64,
    /// Delivered power after shading and system losses (W).
    pub actual_power_w: f64,
}

/// DC, AC, and delivered power for one timestamp (W, array-level).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerBreakdown {
    /// Array DC power after temperature and humidity derates.
    pub dc_power_w: f64,
    /// Array AC power after inverter conversion and clipping.
    pub ac_power_w: f64,
    /// Delivered power after shading and system losses.
    pub actual_power_w: f64,
}

/// Runs the conversion chain for one timestamp.
///
/// `relative_humidity_pct` only participates when present and when the
/// configured derate coefficient is non-zero; the derate factor is
/// clamped to [0, 1] so extreme inputs cannot flip the sign. DC power
/// floors at zero when the temperature derate drives panel power
/// negative.
pub fn power_output(
    poa_total_w_m2: f64,
    module_temp_c: f64,
    relative_humidity_pct: Option<f64>,
    time_of_day: NaiveTime,
    config: &ArrayConfig,
) -> PowerBreakdown {
    // 1. Temperature-derated panel power at the current cell temperature.
    let panel_power_w = config.panel_power_max_w
        * (1.0 + config.temp_coeff_per_c * (module_temp_c - config.noct_c));

    // 2. Per-panel DC at the current irradiance, referenced to STC.
    let mut dc_panel_w = (panel_power_w * poa_total_w_m2 / STC_IRRADIANCE_W_M2).max(0.0);

    // 3. Optional humidity derate.
    if let Some(rh) = relative_humidity_pct
        && config.humidity_derate_per_pct > 0.0
    {
        let factor = (1.0 - config.humidity_derate_per_pct * rh.clamp(0.0, 100.0)).clamp(0.0, 1.0);
        dc_panel_w *= factor;
    }

    let dc_power_w = dc_panel_w * f64::from(config.num_panels);

    // 4. Inverter conversion at array scale.
    let mut ac_power_w = dc_power_w * config.inverter_efficiency;

    // 5. Inverter clipping.
    if let Some(capacity_w) = config.inverter_capacity_w {
        ac_power_w = ac_power_w.min(capacity_w);
    }

    // 6. Shading windows matching this time of day.
    let mut actual_power_w = ac_power_w;
    for window in &config.shading_windows {
        if window.contains(time_of_day) {
            actual_power_w *= window.factor;
        }
    }

    // 7. Ordered system losses.
    for loss in &config.loss_factors {
        actual_power_w *= loss.factor;
    }

    PowerBreakdown {
        dc_power_w,
        ac_power_w,
        actual_power_w,
    }
}
