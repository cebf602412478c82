pub mod constants;
pub mod organ;
pub mod params;
pub mod temp_utils;
pub mod nitrogen;
pub mod photosynthesis;
pub mod energy_balance;
pub mod solver;
pub mod simulation;
