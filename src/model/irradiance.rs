//! Plane-of-array irradiance from raw irradiance components.
//!
//! Sky diffuse uses the isotropic-sky model, not an anisotropic
//! (e.g. Perez) transposition. That under-estimates diffuse gain at low
//! tilts and over-estimates it at high tilts, which is an accepted
//! trade-off at this model fidelity.

use crate::weather::WeatherSample;

/// The three additive POA components, each individually non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoaIrradiance {
    /// Beam component on the tilted plane (W/m²).
    pub direct: f64,
    /// Isotropic sky-diffuse component (W/m²).
    pub sky_diffuse: f64,
    /// Ground-reflected component (W/m²).
    pub ground_reflected: f64,
}

impl PoaIrradiance {
    /// Total plane-of-array irradiance: the plain sum of the three
    /// components (W/m²).
    pub fn total(&self) -> f64 {
        self.direct + self.sky_diffuse + self.ground_reflected
    }
}

/// Decomposes a weather sample into POA components for a panel at
/// `tilt_deg` given the precomputed angle of incidence.
///
/// - direct: `dni · cos(aoi)`, floored at 0 (sun behind the plane
///   contributes nothing), attenuated by `1 − cloud_opacity/100` when
///   cloud data is present;
/// - sky diffuse: `dhi · (1 + cos tilt) / 2`;
/// - ground reflected: `ghi · albedo · (1 − cos tilt) / 2`.
///
/// Negative sensor readings in any input clip the affected component to
/// zero rather than propagating.
pub fn poa_irradiance(sample: &WeatherSample, tilt_deg: f64, aoi_deg: f64) -> PoaIrradiance {
    let tilt_cos = tilt_deg.to_radians().cos();

    let mut direct = (sample.dni * aoi_deg.to_radians().cos()).max(0.0);
    if let Some(opacity) = sample.cloud_opacity_pct {
        direct *= 1.0 - opacity.clamp(0.0, 100.0) / 100.0;
    }

    let sky_diffuse = (sample.dhi * (1.0 + tilt_cos) / 2.0).max(0.0);
    let ground_reflected = (sample.ghi * sample.albedo * (1.0 - tilt_cos) / 2.0).max(0.0);

    PoaIrradiance {
        direct,
        sky_diffuse,
        ground_reflected,
    }
}
