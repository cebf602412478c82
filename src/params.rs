// src/params.rs - Parameter tables and model configuration

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Rate parameters whose value depends on organ temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateParam {
    VcMax,
    Jmax,
    Tpu,
    Kc,
    Ko,
    Gamma,
    Rdark,
}

/// Entropy-based deactivation terms. Only the capacity parameters
/// (Vc_max, Jmax, TPU) have a temperature optimum; kinetic constants and the
/// CO2 compensation point keep rising with temperature.
#[derive(Debug, Clone, Copy)]
pub struct Deactivation {
    /// Enthalpy of deactivation, kJ mol-1
    pub delta_hd_kj_mol: f64,
    /// Entropy term, kJ mol-1 K-1
    pub delta_s_kj_mol_k: f64,
}

/// Temperature response of one rate parameter. Values derived from
/// Braune et al. (2009), except Kc, Ko and Rdark (Bernacchi et al., 2001).
#[derive(Debug, Clone, Copy)]
pub struct TempResponseProfile {
    pub param: RateParam,
    /// Enthalpy of activation, kJ mol-1
    pub delta_ha_kj_mol: f64,
    pub deactivation: Option<Deactivation>,
}

pub static TEMP_RESPONSE_PROFILES: Lazy<HashMap<RateParam, TempResponseProfile>> = Lazy::new(|| {
    use RateParam::*;
    let mut m = HashMap::new();

    m.insert(VcMax, TempResponseProfile {
        param: VcMax,
        delta_ha_kj_mol: 89.7,
        deactivation: Some(Deactivation { delta_hd_kj_mol: 149.3, delta_s_kj_mol_k: 0.486 }),
    });

    m.insert(Jmax, TempResponseProfile {
        param: Jmax,
        delta_ha_kj_mol: 48.9,
        deactivation: Some(Deactivation { delta_hd_kj_mol: 152.3, delta_s_kj_mol_k: 0.495 }),
    });

    m.insert(Tpu, TempResponseProfile {
        param: Tpu,
        delta_ha_kj_mol: 47.0,
        deactivation: Some(Deactivation { delta_hd_kj_mol: 152.3, delta_s_kj_mol_k: 0.495 }),
    });

    m.insert(Kc, TempResponseProfile {
        param: Kc,
        delta_ha_kj_mol: 79.43,
        deactivation: None,
    });

    m.insert(Ko, TempResponseProfile {
        param: Ko,
        delta_ha_kj_mol: 36.38,
        deactivation: None,
    });

    m.insert(Gamma, TempResponseProfile {
        param: Gamma,
        delta_ha_kj_mol: 35.0,
        deactivation: None,
    });

    m.insert(Rdark, TempResponseProfile {
        param: Rdark,
        delta_ha_kj_mol: 46.39,
        deactivation: None,
    });

    m
});

pub fn temp_response_profile(param: RateParam) -> Option<&'static TempResponseProfile> {
    TEMP_RESPONSE_PROFILES.get(&param)
}

/// Nitrogen dependence of the photosynthetic capacities, derived from
/// Braune et al. (2009) and Evers et al. (2010).
///
/// Slopes relate each capacity at 25 °C to surfacic nitrogen; a surfacic
/// nitrogen below the matching minimum yields a non-positive capacity by
/// construction of the linear response, which the assimilation rule then
/// turns into Ag = 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NitrogenParams {
    /// Slope of Vc_max25 vs surfacic nitrogen, µmol CO2 g-1 N s-1
    pub s_vcmax25: f64,
    /// Slope of Jmax25 vs surfacic nitrogen, µmol e- g-1 N s-1
    pub s_jmax25: f64,
    /// Slope of TPU25 vs surfacic nitrogen, µmol CO2 g-1 N s-1
    pub s_tpu25: f64,
    /// Slope of Rdark25 vs surfacic nitrogen, µmol CO2 g-1 N s-1
    pub s_rdark25: f64,
    /// Slope of alpha vs surfacic nitrogen, mol e- m2 mol-1 photon g-1 N
    pub s_alpha: f64,
    /// Minimum surfacic nitrogen for each capacity, g N m-2
    pub n_min_vcmax25: f64,
    pub n_min_jmax25: f64,
    pub n_min_tpu25: f64,
    pub n_min_rdark25: f64,
    /// Intercept of the alpha response, mol e- mol-1 photon
    pub beta: f64,
    /// Power-law parameters of the Ball-Berry scaling factor m
    pub delta1: f64,
    pub delta2: f64,
}

impl Default for NitrogenParams {
    fn default() -> Self {
        Self {
            s_vcmax25: 84.965,
            s_jmax25: 117.6,
            s_tpu25: 9.25,
            s_rdark25: 0.493,
            s_alpha: 0.0413,
            n_min_vcmax25: 0.0,
            n_min_jmax25: 0.0,
            n_min_tpu25: 0.0,
            n_min_rdark25: 0.0,
            beta: 0.2101 + 0.0083,
            delta1: 14.7,
            delta2: -0.548,
        }
    }
}

/// Model variant selecting how organ nutrient pools are normalized into the
/// photosynthetic capacity driver. Chosen once at configuration load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelVersion {
    Barillot2016,
    SurfacicProteins,
    #[serde(rename = "SurfacicProteins_Retroinhibition")]
    SurfacicProteinsRetroinhibition,
}

impl ModelVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelVersion::Barillot2016 => "Barillot2016",
            ModelVersion::SurfacicProteins => "SurfacicProteins",
            ModelVersion::SurfacicProteinsRetroinhibition => "SurfacicProteins_Retroinhibition",
        }
    }

    /// Parse the configuration selector. Unrecognized selectors are a fatal
    /// configuration error, detected once at load time rather than per organ.
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "Barillot2016" => Ok(ModelVersion::Barillot2016),
            "SurfacicProteins" => Ok(ModelVersion::SurfacicProteins),
            "SurfacicProteins_Retroinhibition" => Ok(ModelVersion::SurfacicProteinsRetroinhibition),
            other => Err(format!(
                "unknown model version '{}': expected Barillot2016, SurfacicProteins or SurfacicProteins_Retroinhibition",
                other
            )),
        }
    }
}

/// Immutable configuration for a batch of organ solves. May only be updated
/// between batches, never while solves are running.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub version: ModelVersion,
    pub nitrogen: NitrogenParams,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            version: ModelVersion::Barillot2016,
            nitrogen: NitrogenParams::default(),
        }
    }
}

impl ModelConfig {
    pub fn new(version: ModelVersion) -> Self {
        Self {
            version,
            nitrogen: NitrogenParams::default(),
        }
    }

    /// Merge a partial JSON override into the configuration, e.g.
    /// `{"version": "SurfacicProteins", "nitrogen": {"delta1": 15.2}}`.
    /// The update hook for the orchestration layer between batches.
    pub fn update_from_json(&mut self, json_str: &str) -> Result<(), String> {
        let patch: Value = serde_json::from_str(json_str)
            .map_err(|e| format!("failed to parse parameter overrides: {}", e))?;
        let mut current = serde_json::to_value(&*self)
            .map_err(|e| format!("failed to serialize current configuration: {}", e))?;
        merge_json(&mut current, &patch);
        *self = serde_json::from_value(current)
            .map_err(|e| format!("invalid parameter overrides: {}", e))?;
        Ok(())
    }
}

fn merge_json(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target_map), Value::Object(patch_map)) => {
            for (key, patch_value) in patch_map {
                match target_map.get_mut(key) {
                    Some(target_value) => merge_json(target_value, patch_value),
                    None => {
                        target_map.insert(key.clone(), patch_value.clone());
                    }
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}
