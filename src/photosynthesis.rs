// src/photosynthesis.rs - Farquhar assimilation and Ball-Woodrow-Berry
// stomatal conductance. Stateless scalar biochemistry; the coupling to organ
// temperature and Ci lives in the solver.

use crate::constants::{
    GAMMA25_UMOL_MOL, GB_MOL_M2_S, GSMIN_MOL_M2_S, KC25_UMOL_MOL, KO25_UMOL_MOL, O2_UMOL_MOL,
    RD_HALF_DECAY_PAR, RD_LIGHT_FLOOR, THETA_CURVATURE,
};
use crate::params::{NitrogenParams, RateParam};
use crate::temp_utils::temperature_adjust;

/// Assimilation rates of one organ at a given (Ts, Ci), µmol CO2 m-2 s-1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assimilation {
    /// Gross assimilation, never negative
    pub ag: f64,
    /// Net assimilation, Ag - Rd when Ag > 0
    pub an: f64,
    /// Mitochondrial respiration in light
    pub rd: f64,
}

/// Farquhar model of C3 photosynthesis with regulation by organ temperature
/// and nitrogen. Gross assimilation is the minimum of the RuBisCO-limited,
/// electron-transport-limited and triose-phosphate-limited rates, each built
/// from nitrogen-scaled capacities adjusted to the organ temperature.
///
/// # Arguments
/// - `par`: absorbed PAR, µmol m-2 s-1
/// - `surfacic_nitrogen`: capacity driver, g N m-2
/// - `organ_temp_c`: organ temperature, °C
/// - `ci`: internal CO2, µmol mol-1
pub fn assimilation(
    par: f64,
    surfacic_nitrogen: f64,
    organ_temp_c: f64,
    ci: f64,
    nitrogen: &NitrogenParams,
) -> Assimilation {
    // RuBisCO kinetics at the organ temperature
    let kc = temperature_adjust(RateParam::Kc, KC25_UMOL_MOL, organ_temp_c);
    let ko = temperature_adjust(RateParam::Ko, KO25_UMOL_MOL, organ_temp_c);
    let gamma = temperature_adjust(RateParam::Gamma, GAMMA25_UMOL_MOL, organ_temp_c);

    // RuBisCO-limited carboxylation rate
    let vc_max25 = nitrogen.s_vcmax25 * (surfacic_nitrogen - nitrogen.n_min_vcmax25);
    let vc_max = temperature_adjust(RateParam::VcMax, vc_max25, organ_temp_c);
    let ac = (vc_max * (ci - gamma)) / (ci + kc * (1.0 + O2_UMOL_MOL / ko));

    // RuBP regeneration-limited rate via electron transport
    let alpha = nitrogen.s_alpha * surfacic_nitrogen + nitrogen.beta;
    let jmax25 = nitrogen.s_jmax25 * (surfacic_nitrogen - nitrogen.n_min_jmax25);
    let jmax = temperature_adjust(RateParam::Jmax, jmax25, organ_temp_c);

    // Electron transport rate, quadratic smoothing with curvature THETA
    let j = ((jmax + alpha * par)
        - ((jmax + alpha * par).powi(2) - 4.0 * THETA_CURVATURE * alpha * par * jmax).sqrt())
        / (2.0 * THETA_CURVATURE);
    let aj = (j * (ci - gamma)) / (4.0 * ci + 8.0 * gamma);

    // Triose phosphate utilisation-limited rate
    let tpu25 = nitrogen.s_tpu25 * (surfacic_nitrogen - nitrogen.n_min_tpu25);
    let tpu = temperature_adjust(RateParam::Tpu, tpu25, organ_temp_c);
    let vo_max = (vc_max * ko * gamma) / (0.5 * kc * O2_UMOL_MOL);
    let vo = (vo_max * O2_UMOL_MOL) / (O2_UMOL_MOL + ko * (1.0 + ci / kc));
    let ap = (1.0 - gamma / ci) * (3.0 * tpu + vo);

    let ag = ac.min(aj).min(ap);

    // Respiration in light decays from the dark value to a 33 % floor as PAR
    // increases, halving every RD_HALF_DECAY_PAR
    let rdark25 = nitrogen.s_rdark25 * (surfacic_nitrogen - nitrogen.n_min_rdark25);
    let rdark = temperature_adjust(RateParam::Rdark, rdark25, organ_temp_c);
    let rd = rdark
        * (RD_LIGHT_FLOOR + (1.0 - RD_LIGHT_FLOOR) * 0.5_f64.powf(par / RD_HALF_DECAY_PAR));

    // Ag <= 0 when Ci is below the compensation point or nitrogen is below
    // threshold: no net assimilation in either case
    if ag <= 0.0 {
        Assimilation { ag: 0.0, an: 0.0, rd }
    } else {
        Assimilation { ag, an: ag - rd, rd }
    }
}

/// Ball, Woodrow and Berry (1987) model of stomatal conductance to water
/// vapour, mol m-2 s-1. Uses Ag rather than An, after Muller et al. (2005).
/// The GSMIN term is always present, so the dark-conductance floor holds by
/// construction.
pub fn stomatal_conductance(
    ag: f64,
    an: f64,
    surfacic_nitrogen: f64,
    ambient_co2: f64,
    rh: f64,
    nitrogen: &NitrogenParams,
) -> f64 {
    // CO2 concentration at the organ surface, from Prieto et al. (2012)
    let cs = ambient_co2 - an * (1.37 / GB_MOL_M2_S);
    // Scaling factor dependence on surfacic nitrogen
    let m = nitrogen.delta1 * surfacic_nitrogen.powf(nitrogen.delta2);
    GSMIN_MOL_M2_S + m * ((ag * rh) / cs)
}

/// Internal CO2 concentration from the diffusion balance through stomata and
/// boundary layer, µmol mol-1. The 1.6 factor converts gsw to a CO2
/// conductance; 1.37 is its boundary-layer analogue, (1.6)^(2/3).
pub fn internal_co2(ambient_co2: f64, an: f64, gsw: f64) -> f64 {
    ambient_co2 - an * ((1.6 / gsw) + (1.37 / GB_MOL_M2_S))
}
