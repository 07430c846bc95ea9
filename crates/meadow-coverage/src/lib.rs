//! Mowable surface: grass blades, their cut state, and coverage accounting.
#![forbid(unsafe_code)]

mod blade;
mod bucket;
mod grid;
mod ledger;
mod scatter;

pub use blade::{Blade, CutState};
pub use grid::{CoverageGrid, CoverageStats, MaterializeOutcome};
pub use scatter::scatter_blades;
