// Integration tests for the per-timestep gas-exchange batch.
// Builds a small main-stem canopy (upper metamers of a wheat plant around
// anthesis) and checks the output contract element by element.

use farquhar_organ_rust::constants::GSMIN_MOL_M2_S;
use farquhar_organ_rust::nitrogen::NitrogenPools;
use farquhar_organ_rust::organ::{AxisId, ElementId, ElementVisibility, OrganType};
use farquhar_organ_rust::params::{ModelConfig, ModelVersion};
use farquhar_organ_rust::simulation::{AxisInputs, ElementInputs, NitrogenInput, Simulation};
use farquhar_organ_rust::solver::Weather;
use more_asserts::{assert_ge, assert_gt, assert_le, assert_lt};
use std::collections::HashMap;

const CANOPY_HEIGHT_M: f64 = 0.78;
const SAM_TEMPERATURE_C: f64 = 17.5;

fn element(
    organ: OrganType,
    width_m: f64,
    height_m: Option<f64>,
    par: f64,
    surfacic_nitrogen: f64,
) -> ElementInputs {
    ElementInputs {
        organ,
        width_m,
        height_m,
        par_umol_m2_s: par,
        nitrogen: NitrogenInput::Surfacic(surfacic_nitrogen),
    }
}

fn id(metamer: u32, organ: OrganType, element: ElementVisibility) -> ElementId {
    ElementId::new(1, "MS", metamer, organ, element)
}

/// Upper metamers of a flowering main stem: three blades, two sheaths, two
/// internodes (one hidden without geometry), a peduncle and the ear.
fn setup_inputs() -> HashMap<ElementId, ElementInputs> {
    use ElementVisibility::{Hidden, Visible};
    use OrganType::*;

    HashMap::from([
        (id(9, Blade, Visible), element(Blade, 0.018, Some(0.32), 95.0, 0.79)),
        (id(9, Sheath, Visible), element(Sheath, 0.0036, Some(0.19), 28.0, 1.05)),
        (id(10, Blade, Visible), element(Blade, 0.018, Some(0.43), 240.0, 1.15)),
        (id(10, Internode, Hidden), element(Internode, 0.0023, None, 0.0, 2.26)),
        (id(10, Sheath, Visible), element(Sheath, 0.0034, Some(0.30), 60.0, 1.96)),
        (id(11, Blade, Visible), element(Blade, 0.018, Some(0.60), 510.0, 1.90)),
        (id(11, Internode, Visible), element(Internode, 0.0034, Some(0.39), 105.0, 1.58)),
        (id(11, Sheath, Visible), element(Sheath, 0.0026, Some(0.48), 180.0, 4.45)),
        (id(12, Peduncle, Visible), element(Peduncle, 0.003, Some(0.58), 310.0, 1.77)),
        (id(13, Ear, Visible), element(Ear, 0.0102, Some(0.65), 420.0, 6.75)),
    ])
}

fn setup_axes() -> HashMap<AxisId, AxisInputs> {
    HashMap::from([(
        AxisId {
            plant: 1,
            axis: "MS".to_string(),
        },
        AxisInputs {
            sam_temperature_c: SAM_TEMPERATURE_C,
            canopy_height_m: CANOPY_HEIGHT_M,
        },
    )])
}

fn anthesis_weather() -> Weather {
    Weather {
        air_temp_c: 18.8,
        ambient_co2_umol_mol: 360.0,
        relative_humidity: 0.68,
        wind_ref_m_s: 3.171,
    }
}

#[test]
fn test_batch_satisfies_the_output_contract() {
    let mut sim = Simulation::new(ModelConfig::default());
    sim.initialize(setup_inputs(), setup_axes());
    sim.run(&anthesis_weather());

    assert_eq!(sim.outputs.len(), setup_inputs().len());

    for (element_id, out) in &sim.outputs {
        println!(
            "   {} | Ag {:8.3} An {:8.3} Rd {:6.3} Tr {:7.3} Ts {:6.2} gsw {:6.3}",
            element_id, out.ag, out.an, out.rd, out.tr, out.ts, out.gsw
        );

        assert!(out.ag.is_finite() && out.an.is_finite() && out.rd.is_finite());
        assert!(out.tr.is_finite() && out.ts.is_finite() && out.gsw.is_finite());
        assert_ge!(out.ag, 0.0);
        assert_ge!(out.tr, 0.0);

        if element_id.element == ElementVisibility::Hidden {
            continue;
        }
        assert_le!(out.an, out.ag);
        assert_ge!(out.gsw, GSMIN_MOL_M2_S);
        // an organ cannot drift arbitrarily far from the air it sits in
        assert_gt!(out.ts, 18.8 - 15.0);
        assert_lt!(out.ts, 18.8 + 25.0);
    }

    // the lit upper blade assimilates vigorously
    let flag_leaf = &sim.outputs[&id(11, OrganType::Blade, ElementVisibility::Visible)];
    assert_gt!(flag_leaf.ag, 5.0);
    assert_gt!(flag_leaf.gsw, GSMIN_MOL_M2_S);
}

#[test]
fn test_geometry_passes_through_to_the_outputs() {
    let mut sim = Simulation::new(ModelConfig::default());
    sim.initialize(setup_inputs(), setup_axes());
    sim.run(&anthesis_weather());

    let ear = &sim.outputs[&id(13, OrganType::Ear, ElementVisibility::Visible)];
    assert_eq!(ear.width_m, 0.0102);
    assert_eq!(ear.height_m, Some(0.65));
}

#[test]
fn test_hidden_internode_inherits_the_meristem_temperature() {
    let mut sim = Simulation::new(ModelConfig::default());
    sim.initialize(setup_inputs(), setup_axes());
    sim.run(&anthesis_weather());

    let hidden = &sim.outputs[&id(10, OrganType::Internode, ElementVisibility::Hidden)];
    assert_eq!(hidden.ag, 0.0);
    assert_eq!(hidden.an, 0.0);
    assert_eq!(hidden.rd, 0.0);
    assert_eq!(hidden.tr, 0.0);
    assert_eq!(hidden.gsw, 0.0);
    assert_eq!(hidden.ts, SAM_TEMPERATURE_C);
}

#[test]
fn test_batch_is_idempotent() {
    let mut sim = Simulation::new(ModelConfig::default());
    sim.initialize(setup_inputs(), setup_axes());
    sim.run(&anthesis_weather());
    let first: HashMap<_, _> = sim
        .outputs
        .iter()
        .map(|(k, v)| (k.clone(), (v.ag, v.an, v.rd, v.tr, v.ts, v.gsw)))
        .collect();

    sim.run(&anthesis_weather());
    for (element_id, repeated) in &sim.outputs {
        let (ag, an, rd, tr, ts, gsw) = first[element_id];
        assert_eq!(repeated.ag, ag);
        assert_eq!(repeated.an, an);
        assert_eq!(repeated.rd, rd);
        assert_eq!(repeated.tr, tr);
        assert_eq!(repeated.ts, ts);
        assert_eq!(repeated.gsw, gsw);
    }
}

#[test]
fn test_pools_nitrogen_input_feeds_the_configured_variant() {
    let pools = NitrogenPools {
        nitrates_umol_n: 80.0,
        amino_acids_umol_n: 60.0,
        proteins_umol_n: 250.0,
        nstruct_g: 0.004,
        green_area_m2: 0.0035,
        sucrose_umol_c: 300.0,
        starch_umol_c: 100.0,
        fructan_umol_c: 40.0,
    };
    let blade_id = id(11, OrganType::Blade, ElementVisibility::Visible);
    let mut inputs = HashMap::new();
    inputs.insert(
        blade_id.clone(),
        ElementInputs {
            organ: OrganType::Blade,
            width_m: 0.018,
            height_m: Some(0.60),
            par_umol_m2_s: 510.0,
            nitrogen: NitrogenInput::Pools(pools),
        },
    );

    let mut totals = Vec::new();
    for version in [
        ModelVersion::Barillot2016,
        ModelVersion::SurfacicProteins,
        ModelVersion::SurfacicProteinsRetroinhibition,
    ] {
        let mut sim = Simulation::new(ModelConfig::new(version));
        sim.initialize(inputs.clone(), setup_axes());
        sim.run(&anthesis_weather());
        let out = &sim.outputs[&blade_id];
        assert_gt!(out.ag, 0.0, "variant {:?} should assimilate", version);
        totals.push(out.ag);
    }

    // carbohydrate feedback makes the retroinhibited variant the weakest of
    // the two proteins-driven formulations
    assert_lt!(totals[2], totals[1]);
}

#[test]
fn test_unknown_model_version_fails_at_configuration_load() {
    let err = ModelVersion::from_str("Braune2009").unwrap_err();
    assert!(err.contains("Braune2009"));

    let mut sim = Simulation::new(ModelConfig::default());
    assert!(sim.update_parameters(r#"{"version": "Braune2009"}"#).is_err());
    // a rejected override leaves the configuration untouched
    assert_eq!(sim.config.version, ModelVersion::Barillot2016);
}
