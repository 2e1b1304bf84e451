//! Angle-of-incidence computation for a fixed-tilt surface.

use serde::Deserialize;

/// Upper clamp bound for the angle of incidence.
///
/// Both policies are in legitimate use: clamping at 90° discards
/// back-of-plane geometry outright (the sun behind the panel contributes
/// no direct irradiance), while 180° retains the full geometric angle and
/// leaves the zeroing to the irradiance stage. The choice is a scenario
/// input, not a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AoiLimit {
    /// Clamp to [0°, 90°]: front hemisphere only.
    #[default]
    Hemisphere,
    /// Clamp to [0°, 180°]: keep the full geometric angle.
    Full,
}

impl AoiLimit {
    /// The upper bound in degrees this policy clamps to.
    pub fn bound_deg(self) -> f64 {
        match self {
            Self::Hemisphere => 90.0,
            Self::Full => 180.0,
        }
    }
}

/// Angle of incidence between the sun and the panel surface normal, in
/// degrees.
///
/// Computed as
/// `acos(cos(zenith)·cos(tilt) + sin(zenith)·sin(tilt)·cos(sun_azimuth − panel_azimuth))`.
/// The cosine sum is clamped to [-1, 1] before `acos` — floating rounding
/// can push it marginally outside the domain — and the result is clamped
/// to `[0, limit.bound_deg()]`.
pub fn angle_of_incidence(
    zenith_deg: f64,
    sun_azimuth_deg: f64,
    tilt_deg: f64,
    panel_azimuth_deg: f64,
    limit: AoiLimit,
) -> f64 {
    let zenith = zenith_deg.to_radians();
    let tilt = tilt_deg.to_radians();
    let azimuth_delta = (sun_azimuth_deg - panel_azimuth_deg).to_radians();

    let cos_aoi = zenith.cos() * tilt.cos() + zenith.sin() * tilt.sin() * azimuth_delta.cos();
    let aoi_deg = cos_aoi.clamp(-1.0, 1.0).acos().to_degrees();
    aoi_deg.clamp(0.0, limit.bound_deg())
}
