//! Chunk streaming around a moving focal point (slim, single writer).
#![forbid(unsafe_code)]

mod streamer;

pub use streamer::{ChunkState, ChunkStreamer, StreamStats, StreamUpdate};
