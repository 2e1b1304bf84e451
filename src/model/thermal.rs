//! Module temperature from POA irradiance and ambient temperature.

/// Linear NOCT approximation of module cell temperature (°C):
/// `noct + (poa_total / g_ref) · (28 − air_temp)`.
///
/// `g_ref_w_m2` is the reference irradiance the NOCT rating is scaled
/// against; deployed scenarios use both 800 and 1000 W/m², and the value
/// materially changes derating at high irradiance, so it is a required
/// scenario input rather than a constant.
pub fn module_temperature(
    poa_total_w_m2: f64,
    air_temp_c: f64,
    noct_c: f64,
    g_ref_w_m2: f64,
) -> f64 {
    noct_c + (poa_total_w_m2 / g_ref_w_m2) * (28.0 - air_temp_c)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn zero_irradiance_sits_at_noct() {
        assert_relative_eq!(module_temperature(0.0, 10.0, 45.0, 800.0), 45.0);
    }

    #[test]
    fn reference_irradiance_adds_full_ambient_delta() {
        // At poa == g_ref the correction term is exactly (28 − air_temp).
        assert_relative_eq!(module_temperature(800.0, 25.0, 45.0, 800.0), 48.0);
        assert_relative_eq!(module_temperature(1000.0, 25.0, 45.0, 1000.0), 48.0);
    }

    #[test]
    fn g_ref_choice_changes_the_estimate() {
        let at_800 = module_temperature(900.0, 20.0, 45.0, 800.0);
        let at_1000 = module_temperature(900.0, 20.0, 45.0, 1000.0);
        assert!(at_800 > at_1000);
    }

    #[test]
    fn hot_ambient_cools_the_correction() {
        // air_temp above 28 °C flips the correction term negative.
        let t = module_temperature(800.0, 35.0, 45.0, 800.0);
        assert!(t < 45.0);
        assert_relative_eq!(t, 38.0);
    }
}
