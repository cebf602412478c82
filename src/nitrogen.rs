// src/nitrogen.rs - Mass balance of organ nitrogen pools into surfacic inputs
//
// Photosynthesis should properly be related to proteins (RuBisCO), but the
// Farquhar calibrations used here were fitted on total N measurements, so the
// capacity driver is expressed as surfacic nitrogen in g N m-2 whichever
// variant produces it.

use crate::constants::{MM_CARBON_G_MOL, MM_NITROGEN_G_MOL};
use crate::params::ModelVersion;
use serde::{Deserialize, Serialize};

/// Photosynthetic proteins as a fraction of the non-structural nitrogen the
/// capacity slopes were calibrated on.
pub const PHOTOSYNTHETIC_PROTEIN_N_FRACTION: f64 = 0.66;

/// Half-saturation of the carbohydrate feedback on the capacity driver, g m-2.
pub const KI_WSC_G_M2: f64 = 25.0;

/// Nutrient pools of one element, as delivered by the plant-architecture
/// collaborator. Amounts are per element; `green_area_m2` normalizes them to
/// surfacic contents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NitrogenPools {
    /// Nitrates, µmol N
    pub nitrates_umol_n: f64,
    /// Amino acids, µmol N
    pub amino_acids_umol_n: f64,
    /// Proteins, µmol N
    pub proteins_umol_n: f64,
    /// Structural nitrogen, g
    pub nstruct_g: f64,
    /// Green area, m2
    pub green_area_m2: f64,
    /// Sucrose, µmol C
    pub sucrose_umol_c: f64,
    /// Starch, µmol C
    pub starch_umol_c: f64,
    /// Fructan, µmol C
    pub fructan_umol_c: f64,
}

/// Surfacic content of total nitrogen (g N m-2).
pub fn surfacic_nitrogen(
    nitrates_umol_n: f64,
    amino_acids_umol_n: f64,
    proteins_umol_n: f64,
    nstruct_g: f64,
    green_area_m2: f64,
) -> f64 {
    let mass_n_tot =
        (nitrates_umol_n + amino_acids_umol_n + proteins_umol_n) * 1e-6 * MM_NITROGEN_G_MOL
            + nstruct_g;
    mass_n_tot / green_area_m2
}

/// Surfacic content of non-structural nitrogen (g N m-2).
pub fn surfacic_nonstructural_nitrogen(
    nitrates_umol_n: f64,
    amino_acids_umol_n: f64,
    proteins_umol_n: f64,
    green_area_m2: f64,
) -> f64 {
    let mass_n_tot =
        (nitrates_umol_n + amino_acids_umol_n + proteins_umol_n) * 1e-6 * MM_NITROGEN_G_MOL;
    mass_n_tot / green_area_m2
}

/// Surfacic content of photosynthetic proteins (g N m-2).
pub fn surfacic_photosynthetic_proteins(proteins_umol_n: f64, green_area_m2: f64) -> f64 {
    let mass_n_prot = proteins_umol_n * 1e-6 * MM_NITROGEN_G_MOL;
    mass_n_prot / green_area_m2
}

/// Surfacic content of water-soluble carbohydrates (g C m-2).
pub fn surfacic_water_soluble_carbohydrates(
    sucrose_umol_c: f64,
    starch_umol_c: f64,
    fructan_umol_c: f64,
    green_area_m2: f64,
) -> f64 {
    let mass_c = (sucrose_umol_c + starch_umol_c + fructan_umol_c) * 1e-6 * MM_CARBON_G_MOL;
    mass_c / green_area_m2
}

/// Normalizes the nutrient pools of one element into the single capacity
/// driver consumed by the solver, according to the configured model variant.
pub fn capacity_driver(version: ModelVersion, pools: &NitrogenPools) -> f64 {
    match version {
        ModelVersion::Barillot2016 => surfacic_nitrogen(
            pools.nitrates_umol_n,
            pools.amino_acids_umol_n,
            pools.proteins_umol_n,
            pools.nstruct_g,
            pools.green_area_m2,
        ),
        ModelVersion::SurfacicProteins => proteins_driver(pools),
        ModelVersion::SurfacicProteinsRetroinhibition => {
            let wsc = surfacic_water_soluble_carbohydrates(
                pools.sucrose_umol_c,
                pools.starch_umol_c,
                pools.fructan_umol_c,
                pools.green_area_m2,
            );
            // Saturating feedback: accumulated carbohydrates depress the
            // effective capacity without ever driving it negative.
            proteins_driver(pools) / (1.0 + wsc / KI_WSC_G_M2)
        }
    }
}

fn proteins_driver(pools: &NitrogenPools) -> f64 {
    surfacic_photosynthetic_proteins(pools.proteins_umol_n, pools.green_area_m2)
        / PHOTOSYNTHETIC_PROTEIN_N_FRACTION
}
