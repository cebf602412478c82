// Photosynthetic parameters (resolution-independent biochemistry)
pub const O2_UMOL_MOL: f64 = 21000.0; // Intercellular O2, µmol mol(air)-1. Bernacchi et al. (2001)
pub const KC25_UMOL_MOL: f64 = 404.0; // RuBisCO affinity for CO2 at 25 °C, µmol mol-1. Bernacchi et al. (2001)
pub const KO25_UMOL_MOL: f64 = 278.4e3; // RuBisCO affinity for O2 at 25 °C, µmol mol-1. Bernacchi et al. (2001)
pub const GAMMA25_UMOL_MOL: f64 = 39.0; // CO2 compensation point at 25 °C, µmol mol-1. Braune et al. (2009)
pub const THETA_CURVATURE: f64 = 0.72; // Curvature parameter of the J quadratic, dimensionless

// Dark respiration attenuation in light. Muller et al. (2005), eq. 19
pub const RD_LIGHT_FLOOR: f64 = 0.33; // Fraction of dark respiration left under saturating light
pub const RD_HALF_DECAY_PAR: f64 = 15.0; // PAR halving the light-sensitive fraction, µmol m-2 s-1

// Stomatal conductance parameters
pub const GSMIN_MOL_M2_S: f64 = 0.05; // Minimum gsw, measured in the dark. Braune et al. (2009)
pub const GB_MOL_M2_S: f64 = 3.5; // Boundary layer conductance to water vapour. Muller et al. (2005)

// Physical constants for the canopy microclimate and energy balance
pub const WIND_ATTENUATION_A: f64 = 2.5; // Wind extinction within a wheat canopy. Campbell and Norman (1998)
pub const PSYCHROMETRIC_GAMMA_KPA_K: f64 = 66e-3; // Psychrometric constant, kPa K-1 (mean value)
pub const VON_KARMAN_K: f64 = 0.40; // Von Kármán's constant, dimensionless
pub const LATENT_HEAT_VAPORIZATION_J_KG: f64 = 2260e3; // Latent heat of vaporisation of water, J kg-1
pub const RHOCP_J_M3_K: f64 = 1256.0; // Volumetric heat capacity of air, J m-3 K-1
pub const REFERENCE_WIND_HEIGHT_M: f64 = 2.0; // Height at which the reference wind Ur is measured, m
pub const GAS_CONSTANT_J_MOL_K: f64 = 8.3144; // Universal gas constant, J mol-1 K-1
pub const ATMOSPHERIC_PRESSURE_PA: f64 = 1.01325e5; // Standard atmospheric pressure, Pa
pub const PAR_TO_GLOBAL_RADIATION: f64 = 1.53; // Absorbed PAR to absorbed global radiation
pub const PAR_W_M2_TO_UMOL_M2_S: f64 = 4.55; // 1 W m-2 of PAR = 4.55 µmol m-2 s-1. Goudriaan and van Laar (1994)
pub const MIN_WIND_SPEED_M_S: f64 = 0.1; // Floor on the reference wind before any log-profile computation

pub const TO_KELVIN: f64 = 273.15;
pub const TREF_K: f64 = 298.15; // Reference temperature of the Arrhenius responses, K

// Molar masses, g mol-1
pub const MM_WATER_G_MOL: f64 = 18.0;
pub const MM_NITROGEN_G_MOL: f64 = 14.0;
pub const MM_CARBON_G_MOL: f64 = 12.0;

// Solver settings
pub const CI_INIT_RATIO: f64 = 0.7; // Ci starts at 0.7 × ambient CO2
pub const DELTA_CONVERGENCE: f64 = 0.01; // Relative tolerance on Ci and Ts
pub const MAX_SOLVER_ITERATIONS: u32 = 30; // Hard cap, convergence or not
pub const EFFICIENCY_STEM: f64 = 0.78; // Assimilation discount of non-lamina organs
pub const DEFAULT_SURFACIC_NITROGEN_G_M2: f64 = 2.0; // Used when no nitrogen input is provided
