//! Utilities for temperature conversion, the temperature response of the
//! photosynthetic rate parameters, and water vapour pressure.

use crate::constants::{
    GAS_CONSTANT_J_MOL_K, MM_WATER_G_MOL, TO_KELVIN, TREF_K,
};
use crate::params::{RateParam, temp_response_profile};

/// Converts Celsius to Kelvin.
pub fn celsius_to_kelvin(temp_c: f64) -> f64 {
    temp_c + TO_KELVIN
}

/// Converts Kelvin to Celsius.
pub fn kelvin_to_celsius(temp_k: f64) -> f64 {
    temp_k - TO_KELVIN
}

/// Adjusts a rate parameter from its 25 °C value to the organ temperature.
///
/// Every parameter carries an Arrhenius activation term; the capacity
/// parameters (Vc_max, Jmax, TPU) additionally carry an entropy-based
/// deactivation term that gives them a temperature optimum. Kinetic
/// constants and the CO2 compensation point have no deactivation.
///
/// # Arguments
/// - `param`: which rate parameter is being adjusted
/// - `value_25c`: parameter value at 25 °C
/// - `organ_temp_c`: organ temperature in °C
///
/// # Returns
/// Parameter value at the organ temperature
pub fn temperature_adjust(param: RateParam, value_25c: f64, organ_temp_c: f64) -> f64 {
    let tk = celsius_to_kelvin(organ_temp_c);
    let profile = temp_response_profile(param)
        .expect("temperature response table covers every rate parameter");

    // Gas constant in kJ mol-1 K-1 to match the enthalpy units
    let r_kj = GAS_CONSTANT_J_MOL_K * 1e-3;

    let f_activation = ((profile.delta_ha_kj_mol * (tk - TREF_K)) / (r_kj * TREF_K * tk)).exp();

    let f_deactivation = match profile.deactivation {
        Some(d) => {
            (1.0 + ((TREF_K * d.delta_s_kj_mol_k - d.delta_hd_kj_mol) / (TREF_K * r_kj)).exp())
                / (1.0 + ((tk * d.delta_s_kj_mol_k - d.delta_hd_kj_mol) / (tk * r_kj)).exp())
        }
        None => 1.0,
    };

    value_25c * f_activation * f_deactivation
}

/// Saturated vapour pressure of air at `temp_c` (kPa), Tetens form.
pub fn saturation_vapour_pressure(temp_c: f64) -> f64 {
    0.611 * ((17.4 * temp_c) / (239.0 + temp_c)).exp()
}

/// Analytic slope of the saturation-vapour-pressure curve (kPa K-1),
/// used when organ and air temperature coincide and the finite difference
/// degenerates. The denominator takes the air temperature in Kelvin, as
/// calibrated.
pub fn svp_slope_at_air(air_temp_c: f64) -> f64 {
    let ta_k = celsius_to_kelvin(air_temp_c);
    ((17.4 * 239.0) / (ta_k + 239.0).powi(2)) * saturation_vapour_pressure(air_temp_c)
}

/// Converts a water flux from mm s-1 to mmol m-2 s-1, using 1 mm = 1 kg m-2.
pub fn water_flux_mm_s_to_mmol_m2_s(flux_mm_s: f64) -> f64 {
    (flux_mm_s * 1e6) / MM_WATER_G_MOL
}
