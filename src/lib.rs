//! Simulation core of an open-world lawn-mowing game: streaming terrain,
//! mowable coverage, procedural scenery and discovery.
#![forbid(unsafe_code)]

pub mod cli;
pub mod drive;
pub mod event;
pub mod save;
pub mod sim;

pub use drive::SerpentinePath;
pub use save::SessionRecord;
pub use sim::{Simulation, TickInput, TickReport};

pub use meadow_coverage as coverage;
pub use meadow_geom as geom;
pub use meadow_runtime as runtime;
pub use meadow_scenery as scenery;
pub use meadow_world as world;
