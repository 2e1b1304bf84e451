//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use serde::Deserialize;

use crate::error::Result;
use crate::model::AoiLimit;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Panel array, inverter, and loss parameters.
    pub array: ArrayConfig,
    /// Synthetic weather generator parameters (used when no CSV is given).
    pub weather: SyntheticWeatherConfig,
    /// Orientation sweep grid bounds.
    pub sweep: SweepConfig,
    /// Modeled-vs-measured validation parameters.
    pub validation: ValidationConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Immutable PV array configuration for one scenario.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArrayConfig {
    /// Panel tilt from horizontal (degrees; 0 = flat, 90 = vertical).
    pub tilt_deg: f64,
    /// Panel azimuth (degrees; 180 = facing south).
    pub surface_azimuth_deg: f64,
    /// Rated panel power at STC (W).
    pub panel_power_max_w: f64,
    /// Number of identical panels in the array.
    pub num_panels: u32,
    /// Power temperature coefficient (1/°C, typically negative).
    pub temp_coeff_per_c: f64,
    /// Nominal operating cell temperature (°C).
    pub noct_c: f64,
    /// Reference irradiance for the thermal model (W/m²; 800 or 1000
    /// depending on scenario).
    pub g_ref_w_m2: f64,
    /// Angle-of-incidence clamp policy.
    pub aoi_limit: AoiLimit,
    /// Inverter DC→AC conversion efficiency (0.0–1.0).
    pub inverter_efficiency: f64,
    /// Inverter AC output ceiling (W); `None` disables clipping.
    pub inverter_capacity_w: Option<f64>,
    /// DC derate per percentage point of relative humidity; 0 disables.
    pub humidity_derate_per_pct: f64,
    /// Ordered multiplicative system loss factors, applied last.
    pub loss_factors: Vec<LossFactor>,
    /// Time-of-day shading windows with partial derate factors.
    pub shading_windows: Vec<ShadingWindow>,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            tilt_deg: 25.0,
            surface_azimuth_deg: 180.0,
            panel_power_max_w: 390.0,
            num_panels: 10,
            temp_coeff_per_c: -0.0045,
            noct_c: 45.0,
            g_ref_w_m2: 800.0,
            aoi_limit: AoiLimit::Hemisphere,
            inverter_efficiency: 0.96,
            inverter_capacity_w: None,
            humidity_derate_per_pct: 0.0,
            loss_factors: vec![
                LossFactor::new("conductor", 0.98),
                LossFactor::new("mismatch", 0.98),
                LossFactor::new("soiling", 0.97),
            ],
            shading_windows: Vec::new(),
        }
    }
}

impl ArrayConfig {
    /// Total rated DC capacity of the array (W).
    pub fn rated_power_w(&self) -> f64 {
        self.panel_power_max_w * f64::from(self.num_panels)
    }
}

/// One named multiplicative derate (conductor, mismatch, soiling, ...).
///
/// Order in the list is the order of application.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LossFactor {
    /// Label used in config diagnostics.
    pub name: String,
    /// Multiplicative factor (0.0–1.0].
    pub factor: f64,
}

impl LossFactor {
    /// Creates a named loss factor.
    pub fn new(name: &str, factor: f64) -> Self {
        Self {
            name: name.to_string(),
            factor,
        }
    }
}

/// A time-of-day interval during which output is partially shaded.
///
/// The interval is half-open: a timestamp is shaded when its time of day
/// falls in `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShadingWindow {
    /// Window start (inclusive).
    pub start: NaiveTime,
    /// Window end (exclusive).
    pub end: NaiveTime,
    /// Multiplicative derate while shaded (observed range 0.85–0.99).
    pub factor: f64,
}

impl ShadingWindow {
    /// Whether `time` falls inside this window.
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time < self.end
    }
}

/// Synthetic weather generator parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyntheticWeatherConfig {
    /// First sample timestamp (UTC).
    pub start: DateTime<Utc>,
    /// Number of days to generate (must be > 0).
    pub days: u32,
    /// Sample cadence in minutes (must divide a day evenly).
    pub step_minutes: u32,
    /// Peak direct normal irradiance (W/m²).
    pub peak_dni: f64,
    /// Peak global horizontal irradiance (W/m²).
    pub peak_ghi: f64,
    /// Peak diffuse horizontal irradiance (W/m²).
    pub peak_dhi: f64,
    /// Hour of sunrise (0–24).
    pub sunrise_hour: f64,
    /// Hour of sunset (0–24, after sunrise).
    pub sunset_hour: f64,
    /// Solar zenith at the daylight midpoint (degrees).
    pub min_zenith_deg: f64,
    /// Night-time air temperature (°C).
    pub air_temp_mean_c: f64,
    /// Daytime temperature swing added at full daylight (°C).
    pub air_temp_amplitude_c: f64,
    /// Ground albedo (0.0–1.0).
    pub albedo: f64,
    /// Multiplicative gaussian noise on irradiance (0 disables).
    pub noise_std: f64,
    /// Generator seed.
    pub seed: u64,
}

impl Default for SyntheticWeatherConfig {
    fn default() -> Self {
        Self {
            start: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            days: 365,
            step_minutes: 5,
            peak_dni: 800.0,
            peak_ghi: 500.0,
            peak_dhi: 200.0,
            sunrise_hour: 6.0,
            sunset_hour: 18.0,
            min_zenith_deg: 25.0,
            air_temp_mean_c: 12.0,
            air_temp_amplitude_c: 12.0,
            albedo: 0.2,
            noise_std: 0.0,
            seed: 42,
        }
    }
}

/// Orientation sweep grid: Cartesian tilt × azimuth ranges.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SweepConfig {
    /// Minimum tilt (degrees, inclusive).
    pub tilt_min_deg: f64,
    /// Maximum tilt (degrees, inclusive).
    pub tilt_max_deg: f64,
    /// Tilt step (degrees, > 0).
    pub tilt_step_deg: f64,
    /// Minimum azimuth (degrees, inclusive).
    pub azimuth_min_deg: f64,
    /// Maximum azimuth (degrees, inclusive).
    pub azimuth_max_deg: f64,
    /// Azimuth step (degrees, > 0).
    pub azimuth_step_deg: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            tilt_min_deg: 0.0,
            tilt_max_deg: 90.0,
            tilt_step_deg: 5.0,
            azimuth_min_deg: 90.0,
            azimuth_max_deg: 270.0,
            azimuth_step_deg: 10.0,
        }
    }
}

/// Validation alignment parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationConfig {
    /// Maximum nearest-match distance between a measured date and a
    /// modeled date (days). Pairs further apart are dropped.
    pub max_offset_days: i64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self { max_offset_days: 1 }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"array.tilt_deg"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario: a 10-panel south-facing rooftop
    /// array over a noise-free synthetic year, Gref = 800 W/m²,
    /// hemisphere AOI clamp, no inverter clipping.
    pub fn baseline() -> Self {
        Self {
            array: ArrayConfig::default(),
            weather: SyntheticWeatherConfig::default(),
            sweep: SweepConfig::default(),
            validation: ValidationConfig::default(),
        }
    }

    /// Returns the rooftop-clipped preset: an undersized inverter with a
    /// clipping ceiling, a morning chimney-shadow window, and a mild
    /// humidity derate over a noisier synthetic year.
    pub fn rooftop_clipped() -> Self {
        Self {
            array: ArrayConfig {
                num_panels: 14,
                inverter_capacity_w: Some(4000.0),
                humidity_derate_per_pct: 0.0005,
                shading_windows: vec![ShadingWindow {
                    start: NaiveTime::from_hms_opt(7, 30, 0).unwrap(),
                    end: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                    factor: 0.9,
                }],
                ..ArrayConfig::default()
            },
            weather: SyntheticWeatherConfig {
                noise_std: 0.08,
                ..SyntheticWeatherConfig::default()
            },
            sweep: SweepConfig::default(),
            validation: ValidationConfig::default(),
        }
    }

    /// Returns the desert-highref preset: Gref = 1000 W/m², full AOI
    /// range, high-albedo ground, and a hot site.
    pub fn desert_highref() -> Self {
        Self {
            array: ArrayConfig {
                tilt_deg: 30.0,
                g_ref_w_m2: 1000.0,
                aoi_limit: AoiLimit::Full,
                ..ArrayConfig::default()
            },
            weather: SyntheticWeatherConfig {
                peak_dni: 950.0,
                peak_ghi: 650.0,
                peak_dhi: 120.0,
                air_temp_mean_c: 24.0,
                air_temp_amplitude_c: 16.0,
                albedo: 0.4,
                ..SyntheticWeatherConfig::default()
            },
            sweep: SweepConfig::default(),
            validation: ValidationConfig::default(),
        }
    }

    /// Looks up a built-in preset by name.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the unknown preset.
    pub fn from_preset(name: &str) -> std::result::Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "rooftop_clipped" => Ok(Self::rooftop_clipped()),
            "desert_highref" => Ok(Self::desert_highref()),
            other => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{other}\" (expected baseline, rooftop_clipped, or desert_highref)"
                ),
            )),
        }
    }

    /// Loads a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse as
    /// a scenario.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let cfg = toml::from_str(&raw)?;
        Ok(cfg)
    }

    /// Validates all cross-field constraints, returning every violation.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let a = &self.array;

        if !(0.0..=90.0).contains(&a.tilt_deg) {
            errors.push(ConfigError::new("array.tilt_deg", "must be within [0, 90]"));
        }
        if !(0.0..=360.0).contains(&a.surface_azimuth_deg) {
            errors.push(ConfigError::new(
                "array.surface_azimuth_deg",
                "must be within [0, 360]",
            ));
        }
        if a.panel_power_max_w <= 0.0 {
            errors.push(ConfigError::new("array.panel_power_max_w", "must be > 0"));
        }
        if a.num_panels == 0 {
            errors.push(ConfigError::new("array.num_panels", "must be > 0"));
        }
        if a.g_ref_w_m2 <= 0.0 {
            errors.push(ConfigError::new("array.g_ref_w_m2", "must be > 0"));
        }
        if !(a.inverter_efficiency > 0.0 && a.inverter_efficiency <= 1.0) {
            errors.push(ConfigError::new(
                "array.inverter_efficiency",
                "must be within (0, 1]",
            ));
        }
        if let Some(cap) = a.inverter_capacity_w
            && cap <= 0.0
        {
            errors.push(ConfigError::new("array.inverter_capacity_w", "must be > 0"));
        }
        if a.humidity_derate_per_pct < 0.0 {
            errors.push(ConfigError::new(
                "array.humidity_derate_per_pct",
                "must be >= 0",
            ));
        }
        for (i, loss) in a.loss_factors.iter().enumerate() {
            if !(loss.factor > 0.0 && loss.factor <= 1.0) {
                errors.push(ConfigError::new(
                    format!("array.loss_factors[{i}].factor"),
                    "must be within (0, 1]",
                ));
            }
        }
        for (i, window) in a.shading_windows.iter().enumerate() {
            if window.start >= window.end {
                errors.push(ConfigError::new(
                    format!("array.shading_windows[{i}]"),
                    "start must precede end",
                ));
            }
            if !(window.factor > 0.0 && window.factor <= 1.0) {
                errors.push(ConfigError::new(
                    format!("array.shading_windows[{i}].factor"),
                    "must be within (0, 1]",
                ));
            }
        }

        let w = &self.weather;
        if w.days == 0 {
            errors.push(ConfigError::new("weather.days", "must be > 0"));
        }
        if w.step_minutes == 0 || (24 * 60) % w.step_minutes != 0 {
            errors.push(ConfigError::new(
                "weather.step_minutes",
                "must be > 0 and divide a day evenly",
            ));
        }
        if !(0.0..24.0).contains(&w.sunrise_hour)
            || !(0.0..=24.0).contains(&w.sunset_hour)
            || w.sunrise_hour >= w.sunset_hour
        {
            errors.push(ConfigError::new(
                "weather.sunrise_hour",
                "sunrise must precede sunset within [0, 24]",
            ));
        }
        if !(0.0..=1.0).contains(&w.albedo) {
            errors.push(ConfigError::new("weather.albedo", "must be within [0, 1]"));
        }

        let s = &self.sweep;
        if s.tilt_step_deg <= 0.0 {
            errors.push(ConfigError::new("sweep.tilt_step_deg", "must be > 0"));
        }
        if s.azimuth_step_deg <= 0.0 {
            errors.push(ConfigError::new("sweep.azimuth_step_deg", "must be > 0"));
        }
        if s.tilt_min_deg > s.tilt_max_deg {
            errors.push(ConfigError::new(
                "sweep.tilt_min_deg",
                "must not exceed tilt_max_deg",
            ));
        }
        if s.azimuth_min_deg > s.azimuth_max_deg {
            errors.push(ConfigError::new(
                "sweep.azimuth_min_deg",
                "must not exceed azimuth_max_deg",
            ));
        }

        if self.validation.max_offset_days < 0 {
            errors.push(ConfigError::new(
                "validation.max_offset_days",
                "must be >= 0",
            ));
        }

        errors
    }
}
