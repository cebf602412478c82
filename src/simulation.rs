// src/simulation.rs - Per-timestep front-end: runs the organ solver over a
// whole set of elements and collects the outputs by element identity.

use crate::nitrogen::{NitrogenPools, capacity_driver};
use crate::organ::{AxisId, ElementId, OrganType};
use crate::params::ModelConfig;
use crate::solver::{GasExchange, OrganState, SolveReport, Weather, solve_organ};
use colored::Colorize;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Nitrogen input of one element: either the already-aggregated surfacic
/// content, the raw nutrient pools (aggregated per the configured model
/// version), or nothing at all (the default nitrogen applies).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum NitrogenInput {
    Default,
    /// g N m-2
    Surfacic(f64),
    Pools(NitrogenPools),
}

/// Inputs of one element, as delivered by the architecture and
/// light-interception collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementInputs {
    pub organ: OrganType,
    /// Leaf width or organ diameter, m
    pub width_m: f64,
    /// Height from soil, m. `None` marks an element without resolved
    /// geometry (hidden, or too small): it bypasses the solver entirely.
    pub height_m: Option<f64>,
    /// Absorbed PAR, µmol m-2 s-1
    pub par_umol_m2_s: f64,
    pub nitrogen: NitrogenInput,
}

/// Per-axis inputs shared by the elements it carries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AxisInputs {
    /// Apical meristem temperature, °C; inherited by elements that bypass
    /// the solver
    pub sam_temperature_c: f64,
    /// Canopy height, m
    pub canopy_height_m: f64,
}

/// Outputs of one element, with geometry passed through for downstream
/// consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementOutputs {
    /// Gross assimilation, µmol m-2 s-1
    pub ag: f64,
    /// Net assimilation, µmol m-2 s-1
    pub an: f64,
    /// Respiration in light, µmol m-2 s-1
    pub rd: f64,
    /// Transpiration, mmol m-2 s-1
    pub tr: f64,
    /// Organ temperature, °C
    pub ts: f64,
    /// Stomatal conductance to water vapour, mol m-2 s-1
    pub gsw: f64,
    pub width_m: f64,
    pub height_m: Option<f64>,
}

impl ElementOutputs {
    fn bypass(sam_temperature_c: f64, inputs: &ElementInputs) -> Self {
        ElementOutputs {
            ag: 0.0,
            an: 0.0,
            rd: 0.0,
            tr: 0.0,
            ts: sam_temperature_c,
            gsw: 0.0,
            width_m: inputs.width_m,
            height_m: inputs.height_m,
        }
    }

    fn from_gas_exchange(gx: &GasExchange, inputs: &ElementInputs) -> Self {
        ElementOutputs {
            ag: gx.ag,
            an: gx.an,
            rd: gx.rd,
            tr: gx.tr,
            ts: gx.ts,
            gsw: gx.gsw,
            width_m: inputs.width_m,
            height_m: inputs.height_m,
        }
    }
}

/// Runs the gas-exchange solver over every element of a timestep.
///
/// Each element's solve is independent: solves run as a parallel map over
/// the element collection, with the configuration read-only for the whole
/// batch. Configuration updates happen only between batches, through
/// `update_parameters`.
pub struct Simulation {
    pub config: ModelConfig,
    pub elements: HashMap<ElementId, ElementInputs>,
    pub axes: HashMap<AxisId, AxisInputs>,
    pub outputs: HashMap<ElementId, ElementOutputs>,
    /// Print a per-batch summary in addition to the per-organ warnings
    pub verbose: bool,
}

impl Simulation {
    pub fn new(config: ModelConfig) -> Self {
        Simulation {
            config,
            elements: HashMap::new(),
            axes: HashMap::new(),
            outputs: HashMap::new(),
            verbose: false,
        }
    }

    /// Merge a partial JSON parameter override into the configuration.
    /// Must only be called between batches, never while `run` is active.
    pub fn update_parameters(&mut self, json_str: &str) -> Result<(), String> {
        self.config.update_from_json(json_str)
    }

    /// Replace the element and axis inputs for the coming timestep.
    pub fn initialize(
        &mut self,
        elements: HashMap<ElementId, ElementInputs>,
        axes: HashMap<AxisId, AxisInputs>,
    ) {
        self.elements = elements;
        self.axes = axes;
        self.outputs.clear();
    }

    /// Solve every element against the shared ambient drivers and collect
    /// the outputs. Non-convergence is reported per organ and never aborts
    /// the batch.
    pub fn run(&mut self, weather: &Weather) {
        let results: Vec<(ElementId, ElementOutputs, SolveReport)> = self
            .elements
            .par_iter()
            .filter_map(|(id, inputs)| self.solve_element(id, inputs, weather))
            .collect();

        let mut unconverged = 0usize;
        for (id, outputs, report) in results {
            if !report.converged() {
                unconverged += 1;
                for failure in &report.failures {
                    eprintln!(
                        "{}",
                        format!(
                            "{} {} cannot converge, previous = {:.6}, current = {:.6}",
                            id,
                            failure.quantity.as_str(),
                            failure.previous,
                            failure.current
                        )
                        .yellow()
                    );
                }
            }
            self.outputs.insert(id, outputs);
        }

        if self.verbose {
            println!(
                "gas exchange: {} elements solved, {} unconverged",
                self.outputs.len(),
                unconverged
            );
        }
    }

    fn solve_element(
        &self,
        id: &ElementId,
        inputs: &ElementInputs,
        weather: &Weather,
    ) -> Option<(ElementId, ElementOutputs, SolveReport)> {
        let axis_id = id.axis_id();
        // calculation only for the main stem
        if !axis_id.is_main_stem() {
            return None;
        }

        let Some(axis) = self.axes.get(&axis_id) else {
            eprintln!(
                "{}",
                format!("no axis inputs for {}: element skipped", id).yellow()
            );
            return None;
        };

        match inputs.height_m {
            // No resolved geometry: no gas exchange; the element tracks the
            // apical meristem temperature of its axis
            None => Some((
                id.clone(),
                ElementOutputs::bypass(axis.sam_temperature_c, inputs),
                SolveReport::default(),
            )),
            Some(height_m) => {
                let surfacic_nitrogen = match &inputs.nitrogen {
                    NitrogenInput::Default => None,
                    NitrogenInput::Surfacic(sln) => Some(*sln),
                    NitrogenInput::Pools(pools) => {
                        Some(capacity_driver(self.config.version, pools))
                    }
                };

                let state = OrganState {
                    organ: inputs.organ,
                    width_m: inputs.width_m,
                    height_m,
                    canopy_height_m: axis.canopy_height_m,
                    par_umol_m2_s: inputs.par_umol_m2_s,
                    surfacic_nitrogen_g_m2: surfacic_nitrogen,
                };

                let (gx, report) = solve_organ(&state, weather, &self.config);
                Some((
                    id.clone(),
                    ElementOutputs::from_gas_exchange(&gx, inputs),
                    report,
                ))
            }
        }
    }
}
