//! Chunk addressing, worldgen parameters, and the stateless elevation function.
#![forbid(unsafe_code)]

mod chunk_coord;
pub mod depression;
mod error;
pub mod hash;
mod height_field;
mod noise;
mod obstacle;
mod terrain;
pub mod worldgen;

pub use chunk_coord::{ChunkCoord, MAX_CHUNK_INDEX};
pub use depression::Depression;
pub use error::ConfigError;
pub use hash::ChunkHash;
pub use height_field::HeightFieldChunk;
pub use noise::NoiseField;
pub use obstacle::{Obstacle, ObstacleMap};
pub use terrain::{HeightSource, LocalElevation, Terrain};
pub use worldgen::{
    MAX_LOAD_RADIUS, MAX_REPEATED_OBJECTS, MowPolicy, WorldGenConfig, WorldGenParams,
};
