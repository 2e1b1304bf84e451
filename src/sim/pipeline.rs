//! The per-sample simulation pass: geometry → irradiance → thermal →
//! power conversion.
//!
//! The pass is a pure function of `(WeatherSeries, ArrayConfig)`: no
//! stage mutates its inputs and no state is carried between samples, so
//! repeated runs are bit-identical and sweep cells can evaluate
//! concurrently over a shared series.

use crate::config::ArrayConfig;
use crate::model::geometry::angle_of_incidence;
use crate::model::irradiance::poa_irradiance;
use crate::model::power::{PowerSample, power_output};
use crate::model::thermal::module_temperature;
use crate::weather::{WeatherSample, WeatherSeries};

/// Runs the full pipeline over a weather series, producing one
/// [`PowerSample`] per weather sample in timestamp order.
pub fn simulate(weather: &WeatherSeries, config: &ArrayConfig) -> Vec<PowerSample> {
    weather
        .samples()
        .iter()
        .map(|sample| step(sample, config))
        .collect()
}

/// Evaluates one weather sample against the array configuration.
fn step(sample: &WeatherSample, config: &ArrayConfig) -> PowerSample {
    let aoi_deg = angle_of_incidence(
        sample.zenith_deg,
        sample.azimuth_deg,
        config.tilt_deg,
        config.surface_azimuth_deg,
        config.aoi_limit,
    );

    let poa = poa_irradiance(sample, config.tilt_deg, aoi_deg);
    let poa_total = poa.total();

    let module_temp_c =
        module_temperature(poa_total, sample.air_temp_c, config.noct_c, config.g_ref_w_m2);

    let breakdown = power_output(
        poa_total,
        module_temp_c,
        sample.relative_humidity_pct,
        sample.timestamp.time(),
        config,
    );

    PowerSample {
        timestamp: sample.timestamp,
        aoi_deg,
        poa_direct: poa.direct,
        poa_diffuse: poa.sky_diffuse,
        poa_ground_reflected: poa.ground_reflected,
        poa_total,
        module_temp_c,
        dc_power_w: breakdown.dc_power_w,
        ac_power_w: breakdown.ac_power_w,
        actual_power_w: breakdown.actual_power_w,
    }
}
