// src/organ.rs - Organ taxonomy and element identity within the plant hierarchy

use crate::constants::EFFICIENCY_STEM;
use serde::{Deserialize, Serialize};

/// Photosynthetic organ types modeled by the gas-exchange solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrganType {
    Blade,
    Internode,
    Sheath,
    Peduncle,
    Ear,
}

/// Forced-convection regime used for the boundary layer resistance to heat.
/// Blades behave as horizontal flat plates; every other organ is a vertical
/// cylinder whose characteristic dimension is its diameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvectionRegime {
    FlatPlate,
    Cylinder,
}

impl OrganType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganType::Blade => "blade",
            OrganType::Internode => "internode",
            OrganType::Sheath => "sheath",
            OrganType::Peduncle => "peduncle",
            OrganType::Ear => "ear",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "blade" => Some(OrganType::Blade),
            "internode" => Some(OrganType::Internode),
            "sheath" => Some(OrganType::Sheath),
            "peduncle" => Some(OrganType::Peduncle),
            "ear" => Some(OrganType::Ear),
            _ => None,
        }
    }

    pub fn convection_regime(&self) -> ConvectionRegime {
        match self {
            OrganType::Blade => ConvectionRegime::FlatPlate,
            _ => ConvectionRegime::Cylinder,
        }
    }

    /// Gross assimilation efficiency relative to a lamina. Applied once,
    /// after convergence.
    pub fn assimilation_efficiency(&self) -> f64 {
        match self {
            OrganType::Blade => 1.0,
            _ => EFFICIENCY_STEM,
        }
    }
}

/// Whether an element is exposed to light or enclosed by the sheath of the
/// preceding metamer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementVisibility {
    Visible,
    Hidden,
}

impl ElementVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementVisibility::Visible => "visible",
            ElementVisibility::Hidden => "hidden",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "visible" => Some(ElementVisibility::Visible),
            "hidden" => Some(ElementVisibility::Hidden),
            _ => None,
        }
    }
}

/// Identity of an axis within a plant. The main stem carries the label "MS".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AxisId {
    pub plant: u32,
    pub axis: String,
}

impl AxisId {
    pub fn is_main_stem(&self) -> bool {
        self.axis == "MS"
    }
}

/// Identity of a photosynthetic element: its position in the plant hierarchy.
/// Owned by the architecture collaborator; the solver only keys results by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId {
    pub plant: u32,
    pub axis: String,
    pub metamer: u32,
    pub organ: OrganType,
    pub element: ElementVisibility,
}

impl ElementId {
    pub fn new(plant: u32, axis: &str, metamer: u32, organ: OrganType, element: ElementVisibility) -> Self {
        ElementId {
            plant,
            axis: axis.to_string(),
            metamer,
            organ,
            element,
        }
    }

    pub fn axis_id(&self) -> AxisId {
        AxisId {
            plant: self.plant,
            axis: self.axis.clone(),
        }
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}, {})",
            self.plant,
            self.axis,
            self.metamer,
            self.organ.as_str(),
            self.element.as_str()
        )
    }
}
