//! Weather time series: input samples, ordered series, and a synthetic
//! clear-day generator for running without a data file.

use chrono::{DateTime, Duration, Timelike, Utc};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::config::SyntheticWeatherConfig;
use crate::error::{Error, Result};

/// One timestamped weather record.
///
/// Irradiance components are in W/m², temperatures in °C, solar position
/// angles in degrees. The three optional fields are only used when the
/// source data provides them.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSample {
    /// Observation timestamp (UTC).
    pub timestamp: DateTime<Utc>,
    /// Direct normal irradiance (W/m²).
    pub dni: f64,
    /// Global horizontal irradiance (W/m²).
    pub ghi: f64,
    /// Diffuse horizontal irradiance (W/m²).
    pub dhi: f64,
    /// Ambient air temperature (°C).
    pub air_temp_c: f64,
    /// Ground albedo (0.0–1.0).
    pub albedo: f64,
    /// Solar zenith angle (degrees; 0 = sun overhead).
    pub zenith_deg: f64,
    /// Solar azimuth angle (degrees; 180 = due south).
    pub azimuth_deg: f64,
    /// Cloud opacity (0–100 %), if observed.
    pub cloud_opacity_pct: Option<f64>,
    /// Relative humidity (0–100 %), if observed.
    pub relative_humidity_pct: Option<f64>,
    /// Wind speed at 10 m (m/s), if observed.
    pub wind_speed_ms: Option<f64>,
}

/// An ordered, read-only weather time series.
///
/// Construction sorts samples by timestamp, so out-of-order input is
/// accepted and re-ordered rather than rejected. Gaps in the cadence are
/// legal; downstream aggregation treats empty buckets as absent. The
/// series is immutable once built.
#[derive(Debug, Clone)]
pub struct WeatherSeries {
    samples: Vec<WeatherSample>,
}

impl WeatherSeries {
    /// Builds a series from raw samples.
    ///
    /// Samples are stably sorted by timestamp, preserving input order for
    /// duplicate timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySeries`] if `samples` is empty — an empty
    /// series is not a valid state to continue in.
    pub fn new(mut samples: Vec<WeatherSample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::EmptySeries);
        }
        samples.sort_by_key(|s| s.timestamp);
        Ok(Self { samples })
    }

    /// All samples in ascending timestamp order.
    pub fn samples(&self) -> &[WeatherSample] {
        &self.samples
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`: an empty series cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Timestamp of the first sample.
    pub fn start(&self) -> DateTime<Utc> {
        self.samples[0].timestamp
    }

    /// Timestamp of the last sample.
    pub fn end(&self) -> DateTime<Utc> {
        self.samples[self.samples.len() - 1].timestamp
    }
}

/// Gaussian noise via the Box–Muller transform.
///
/// Returns a sample from N(0, `std_dev`²), or 0.0 when `std_dev <= 0`.
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}

/// Half-sine daylight fraction for an hour of day.
///
/// Returns 0.0 outside `[sunrise_hour, sunset_hour)` and rises to 1.0 at
/// the midpoint of the daylight interval.
fn daylight_frac(hour: f64, sunrise_hour: f64, sunset_hour: f64) -> f64 {
    if hour < sunrise_hour || hour >= sunset_hour {
        return 0.0;
    }
    let span = sunset_hour - sunrise_hour;
    (std::f64::consts::PI * (hour - sunrise_hour) / span).sin().max(0.0)
}

/// Generates a synthetic clear-sky-ish weather series.
///
/// Irradiance follows a half-sine daylight profile scaled by the
/// configured peaks, with optional multiplicative gaussian noise. The sun
/// sweeps east to west (azimuth 90°→270°) across the daylight interval
/// while the zenith tracks the daylight fraction. Output is deterministic
/// for a given `(config, seed)` pair.
pub fn synthetic_series(config: &SyntheticWeatherConfig, seed: u64) -> Result<WeatherSeries> {
    let mut rng = StdRng::seed_from_u64(seed);
    let steps_per_day = (24 * 60) / config.step_minutes as usize;
    let step = Duration::minutes(config.step_minutes as i64);

    let mut samples = Vec::with_capacity(config.days as usize * steps_per_day);
    let mut t = config.start;
    for _ in 0..config.days {
        for _ in 0..steps_per_day {
            let hour = f64::from(t.hour())
                + f64::from(t.minute()) / 60.0
                + f64::from(t.second()) / 3600.0;
            let frac = daylight_frac(hour, config.sunrise_hour, config.sunset_hour);

            let noise = 1.0 + gaussian_noise(&mut rng, config.noise_std);
            let dni = (config.peak_dni * frac * noise).max(0.0);
            let ghi = (config.peak_ghi * frac * noise).max(0.0);
            let dhi = (config.peak_dhi * frac * noise).max(0.0);

            // Sun path: zenith follows the daylight fraction down from the
            // horizon to the configured minimum; azimuth sweeps 90°..270°.
            let zenith_deg = 90.0 - (90.0 - config.min_zenith_deg) * frac;
            let azimuth_deg = if frac > 0.0 {
                let day_progress = (hour - config.sunrise_hour)
                    / (config.sunset_hour - config.sunrise_hour);
                90.0 + 180.0 * day_progress
            } else {
                0.0
            };

            let air_temp_c = config.air_temp_mean_c + config.air_temp_amplitude_c * frac;

            samples.push(WeatherSample {
                timestamp: t,
                dni,
                ghi,
                dhi,
                air_temp_c,
                albedo: config.albedo,
                zenith_deg,
                azimuth_deg,
                cloud_opacity_pct: None,
                relative_humidity_pct: None,
                wind_speed_ms: None,
            });
            t += step;
        }
    }

    WeatherSeries::new(samples)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::config::SyntheticWeatherConfig;

    fn sample_at(ts: DateTime<Utc>) -> WeatherSample {
        WeatherSample {
            timestamp: ts,
            dni: 800.0,
            ghi: 500.0,
            dhi: 200.0,
            air_temp_c: 25.0,
            albedo: 0.2,
            zenith_deg: 30.0,
            azimuth_deg: 180.0,
            cloud_opacity_pct: None,
            relative_humidity_pct: None,
            wind_speed_ms: None,
        }
    }

    #[test]
    fn empty_series_is_rejected() {
        assert!(matches!(WeatherSeries::new(Vec::new()), Err(Error::EmptySeries)));
    }

    #[test]
    fn out_of_order_samples_are_sorted() {
        let t0 = Utc.with_ymd_and_hms(2023, 6, 1, 10, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2023, 6, 1, 10, 5, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2023, 6, 1, 10, 10, 0).unwrap();

        let series =
            WeatherSeries::new(vec![sample_at(t2), sample_at(t0), sample_at(t1)]).unwrap();
        let stamps: Vec<_> = series.samples().iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps, vec![t0, t1, t2]);
        assert_eq!(series.start(), t0);
        assert_eq!(series.end(), t2);
    }

    #[test]
    fn gaussian_noise_zero_std_is_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(gaussian_noise(&mut rng, 0.0), 0.0);
        assert_eq!(gaussian_noise(&mut rng, -1.0), 0.0);
    }

    #[test]
    fn daylight_frac_shape() {
        assert_eq!(daylight_frac(3.0, 6.0, 18.0), 0.0);
        assert_eq!(daylight_frac(18.0, 6.0, 18.0), 0.0);
        assert!(daylight_frac(6.5, 6.0, 18.0) < 0.2);
        assert!(daylight_frac(12.0, 6.0, 18.0) > 0.99);
    }

    #[test]
    fn synthetic_series_is_deterministic_per_seed() {
        let cfg = SyntheticWeatherConfig::default();
        let a = synthetic_series(&cfg, 42).unwrap();
        let b = synthetic_series(&cfg, 42).unwrap();
        assert_eq!(a.samples(), b.samples());
    }

    #[test]
    fn synthetic_series_differs_across_seeds() {
        let cfg = SyntheticWeatherConfig {
            noise_std: 0.1,
            ..SyntheticWeatherConfig::default()
        };
        let a = synthetic_series(&cfg, 1).unwrap();
        let b = synthetic_series(&cfg, 2).unwrap();
        assert_ne!(a.samples(), b.samples());
    }

    #[test]
    fn synthetic_series_has_expected_cadence_and_no_night_irradiance() {
        let cfg = SyntheticWeatherConfig::default();
        let series = synthetic_series(&cfg, 7).unwrap();
        assert_eq!(series.len(), cfg.days as usize * (24 * 60 / cfg.step_minutes as usize));

        for s in series.samples() {
            let hour = f64::from(s.timestamp.hour());
            if hour < cfg.sunrise_hour || hour >= cfg.sunset_hour {
                assert_eq!(s.dni, 0.0, "night sample at {} has dni", s.timestamp);
            }
            assert!(s.dni >= 0.0 && s.ghi >= 0.0 && s.dhi >= 0.0);
        }
    }
}
