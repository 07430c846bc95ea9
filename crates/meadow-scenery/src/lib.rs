//! Deterministic scenery placement and one-shot discovery.
#![forbid(unsafe_code)]

mod discovery;
mod kind;
mod placement;
mod placer;

pub use discovery::{DiscoveryEvent, DiscoveryTracker};
pub use kind::{KindInfo, SceneryKind};
pub use placement::plan_chunk;
pub use placer::{ObjectId, SceneryObject, SceneryPlacer};
