//! Leaf physics models for the PV yield pipeline.

/// Solar geometry: angle of incidence between sun and panel normal.
pub mod geometry;
/// Plane-of-array irradiance decomposition.
pub mod irradiance;
/// Power conversion chain from irradiance to AC output.
pub mod power;
/// Module temperature estimation.
pub mod thermal;

// Re-export the main types for convenience
pub use geometry::AoiLimit;
pub use geometry::angle_of_incidence;
pub use irradiance::PoaIrradiance;
pub use power::PowerSample;
pub use thermal::module_temperature;
