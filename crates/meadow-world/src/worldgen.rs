use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::ConfigError;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default)]
    pub world: World,
    #[serde(default)]
    pub height: Height,
    #[serde(default)]
    pub depressions: Depressions,
    #[serde(default)]
    pub walkable: Walkable,
    #[serde(default)]
    pub streaming: Streaming,
    #[serde(default)]
    pub grass: Grass,
    #[serde(default)]
    pub mowing: Mowing,
    #[serde(default)]
    pub scenery: Scenery,
    #[serde(default)]
    pub discovery: Discovery,
}

#[derive(Clone, Debug, Deserialize)]
pub struct World {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: f32,
    #[serde(default = "default_grid_cells")]
    pub grid_cells: usize,
}
fn default_chunk_size() -> f32 {
    50.0
}
fn default_grid_cells() -> usize {
    25
}
impl Default for World {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            grid_cells: default_grid_cells(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Height {
    #[serde(default = "default_height_freq")]
    pub frequency: f32,
    #[serde(default = "default_octaves")]
    pub octaves: i32,
    #[serde(default = "default_persistence")]
    pub persistence: f32,
    #[serde(default = "default_lacunarity")]
    pub lacunarity: f32,
    #[serde(default = "default_amplitude")]
    pub amplitude: f32,
    #[serde(default = "default_shape_exponent")]
    pub shape_exponent: f32,
    #[serde(default)]
    pub base_height: f32,
}
fn default_height_freq() -> f32 {
    0.008
}
fn default_octaves() -> i32 {
    3
}
fn default_persistence() -> f32 {
    0.5
}
fn default_lacunarity() -> f32 {
    2.0
}
fn default_amplitude() -> f32 {
    6.0
}
fn default_shape_exponent() -> f32 {
    2.2
}
impl Default for Height {
    fn default() -> Self {
        Self {
            frequency: default_height_freq(),
            octaves: default_octaves(),
            persistence: default_persistence(),
            lacunarity: default_lacunarity(),
            amplitude: default_amplitude(),
            shape_exponent: default_shape_exponent(),
            base_height: 0.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Depressions {
    #[serde(default = "default_depression_prob")]
    pub probability: f32,
    #[serde(default = "default_depression_max")]
    pub max_per_chunk: u32,
    #[serde(default = "default_radius_min")]
    pub radius_min: f32,
    #[serde(default = "default_radius_max")]
    pub radius_max: f32,
    #[serde(default = "default_depth_min")]
    pub depth_min: f32,
    #[serde(default = "default_depth_max")]
    pub depth_max: f32,
}
fn default_depression_prob() -> f32 {
    0.25
}
fn default_depression_max() -> u32 {
    1
}
fn default_radius_min() -> f32 {
    5.0
}
fn default_radius_max() -> f32 {
    12.0
}
fn default_depth_min() -> f32 {
    1.5
}
fn default_depth_max() -> f32 {
    3.0
}
impl Default for Depressions {
    fn default() -> Self {
        Self {
            probability: default_depression_prob(),
            max_per_chunk: default_depression_max(),
            radius_min: default_radius_min(),
            radius_max: default_radius_max(),
            depth_min: default_depth_min(),
            depth_max: default_depth_max(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Walkable {
    #[serde(default = "default_walk_min")]
    pub min_height: f32,
    #[serde(default = "default_walk_max")]
    pub max_height: f32,
}
fn default_walk_min() -> f32 {
    -0.6
}
fn default_walk_max() -> f32 {
    5.5
}
impl Default for Walkable {
    fn default() -> Self {
        Self {
            min_height: default_walk_min(),
            max_height: default_walk_max(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Streaming {
    #[serde(default = "default_load_radius")]
    pub load_radius: i32,
    /// 0 disables the per-tick budget.
    #[serde(default)]
    pub max_loads_per_tick: usize,
}
fn default_load_radius() -> i32 {
    2
}
impl Default for Streaming {
    fn default() -> Self {
        Self {
            load_radius: default_load_radius(),
            max_loads_per_tick: 0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Grass {
    #[serde(default = "default_blades_per_chunk")]
    pub blades_per_chunk: u32,
    #[serde(default = "default_population_cap")]
    pub population_cap: usize,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    #[serde(default = "default_scale_min")]
    pub scale_min: f32,
    #[serde(default = "default_scale_max")]
    pub scale_max: f32,
}
fn default_blades_per_chunk() -> u32 {
    1500
}
fn default_population_cap() -> usize {
    60_000
}
fn default_cell_size() -> f32 {
    2.0
}
fn default_scale_min() -> f32 {
    0.7
}
fn default_scale_max() -> f32 {
    1.3
}
impl Default for Grass {
    fn default() -> Self {
        Self {
            blades_per_chunk: default_blades_per_chunk(),
            population_cap: default_population_cap(),
            cell_size: default_cell_size(),
            scale_min: default_scale_min(),
            scale_max: default_scale_max(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MowPolicyName {
    Omnidirectional,
    ForwardArc,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Mowing {
    #[serde(default = "default_mow_radius")]
    pub radius: f32,
    #[serde(default = "default_mow_policy")]
    pub policy: MowPolicyName,
    /// Full opening angle of the forward arc, in degrees.
    #[serde(default = "default_arc_degrees")]
    pub arc_degrees: f32,
}
fn default_mow_radius() -> f32 {
    0.8
}
fn default_mow_policy() -> MowPolicyName {
    MowPolicyName::Omnidirectional
}
fn default_arc_degrees() -> f32 {
    120.0
}
impl Default for Mowing {
    fn default() -> Self {
        Self {
            radius: default_mow_radius(),
            policy: default_mow_policy(),
            arc_degrees: default_arc_degrees(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Scenery {
    #[serde(default = "default_structure_prob")]
    pub structure_probability: f32,
    #[serde(default = "default_paddock_prob")]
    pub enclosure_probability: f32,
    #[serde(default = "default_tree_max")]
    pub tree_max: u32,
    #[serde(default = "default_fence_prob")]
    pub fence_probability: f32,
    #[serde(default = "default_fence_min")]
    pub fence_segments_min: u32,
    #[serde(default = "default_fence_max")]
    pub fence_segments_max: u32,
    #[serde(default = "default_segment_length")]
    pub segment_length: f32,
    #[serde(default = "default_outbuilding_prob")]
    pub outbuilding_probability: f32,
    #[serde(default = "default_mailbox_prob")]
    pub mailbox_probability: f32,
    #[serde(default = "default_bench_prob")]
    pub bench_probability: f32,
    #[serde(default = "default_edge_margin")]
    pub edge_margin: f32,
}
fn default_structure_prob() -> f32 {
    0.18
}
fn default_paddock_prob() -> f32 {
    0.5
}
fn default_tree_max() -> u32 {
    6
}
fn default_fence_prob() -> f32 {
    0.3
}
fn default_fence_min() -> u32 {
    3
}
fn default_fence_max() -> u32 {
    7
}
fn default_segment_length() -> f32 {
    2.5
}
fn default_outbuilding_prob() -> f32 {
    0.15
}
fn default_mailbox_prob() -> f32 {
    0.2
}
fn default_bench_prob() -> f32 {
    0.15
}
fn default_edge_margin() -> f32 {
    3.0
}
impl Default for Scenery {
    fn default() -> Self {
        Self {
            structure_probability: default_structure_prob(),
            enclosure_probability: default_paddock_prob(),
            tree_max: default_tree_max(),
            fence_probability: default_fence_prob(),
            fence_segments_min: default_fence_min(),
            fence_segments_max: default_fence_max(),
            segment_length: default_segment_length(),
            outbuilding_probability: default_outbuilding_prob(),
            mailbox_probability: default_mailbox_prob(),
            bench_probability: default_bench_prob(),
            edge_margin: default_edge_margin(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Discovery {
    #[serde(default = "default_discovery_radius")]
    pub radius: f32,
}
fn default_discovery_radius() -> f32 {
    6.0
}
impl Default for Discovery {
    fn default() -> Self {
        Self {
            radius: default_discovery_radius(),
        }
    }
}

/// Which blades a mow pass may cut.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MowPolicy {
    /// Everything strictly inside the radius.
    Omnidirectional,
    /// Inside the radius and within `half_angle` radians of the heading.
    ForwardArc { half_angle: f32 },
}

// Flattened params used in tight loops (snapshot of config)
#[derive(Clone, Debug)]
pub struct WorldGenParams {
    pub chunk_size: f32,
    pub grid_cells: usize,
    pub height_frequency: f32,
    pub octaves: i32,
    pub persistence: f32,
    pub lacunarity: f32,
    pub amplitude: f32,
    pub shape_exponent: f32,
    pub base_height: f32,
    pub depression_probability: f32,
    pub depressions_max: u32,
    pub depression_radius_min: f32,
    pub depression_radius_max: f32,
    pub depression_depth_min: f32,
    pub depression_depth_max: f32,
    pub walkable_min: f32,
    pub walkable_max: f32,
    pub load_radius: i32,
    pub max_loads_per_tick: Option<usize>,
    pub blades_per_chunk: u32,
    pub population_cap: usize,
    pub blade_cell_size: f32,
    pub blade_scale_min: f32,
    pub blade_scale_max: f32,
    pub mow_radius: f32,
    pub mow_policy: MowPolicy,
    pub structure_probability: f32,
    pub enclosure_probability: f32,
    pub tree_max: u32,
    pub fence_probability: f32,
    pub fence_segments_min: u32,
    pub fence_segments_max: u32,
    pub fence_segment_length: f32,
    pub outbuilding_probability: f32,
    pub mailbox_probability: f32,
    pub bench_probability: f32,
    pub edge_margin: f32,
    pub discovery_radius: f32,
}

/// Upper bound on `tree_max` and on fence run length. Together with the
/// single-instance kinds this keeps a chunk's object count inside a `u16` ordinal.
pub const MAX_REPEATED_OBJECTS: u32 = 256;

/// Streaming radius ceiling, in chunks.
pub const MAX_LOAD_RADIUS: i32 = 64;

impl Default for WorldGenParams {
    fn default() -> Self {
        Self::from_config(&WorldGenConfig::default())
    }
}

impl WorldGenParams {
    pub fn from_config(cfg: &WorldGenConfig) -> Self {
        let chunk_size = if cfg.world.chunk_size > 0.0 {
            cfg.world.chunk_size
        } else {
            default_chunk_size()
        };
        // Depressions may only reach one chunk over, so the 3x3 neighbourhood sees all of them.
        let radius_cap = chunk_size / 1.5;
        let radius_min = cfg.depressions.radius_min.clamp(0.0, radius_cap);
        let radius_max = cfg.depressions.radius_max.clamp(radius_min, radius_cap);
        let depth_min = cfg.depressions.depth_min.max(0.0);
        let depth_max = cfg.depressions.depth_max.max(depth_min);
        let fence_min = cfg.scenery.fence_segments_min.clamp(1, MAX_REPEATED_OBJECTS);
        let scale_min = cfg.grass.scale_min.max(0.0);
        let mow_policy = match cfg.mowing.policy {
            MowPolicyName::Omnidirectional => MowPolicy::Omnidirectional,
            MowPolicyName::ForwardArc => MowPolicy::ForwardArc {
                half_angle: (cfg.mowing.arc_degrees.clamp(0.0, 360.0) * 0.5).to_radians(),
            },
        };
        Self {
            chunk_size,
            grid_cells: cfg.world.grid_cells.max(1),
            height_frequency: cfg.height.frequency,
            octaves: cfg.height.octaves.clamp(2, 4),
            persistence: cfg.height.persistence,
            lacunarity: cfg.height.lacunarity,
            amplitude: cfg.height.amplitude,
            shape_exponent: cfg.height.shape_exponent.max(0.01),
            base_height: cfg.height.base_height,
            depression_probability: cfg.depressions.probability.clamp(0.0, 1.0),
            depressions_max: cfg.depressions.max_per_chunk,
            depression_radius_min: radius_min,
            depression_radius_max: radius_max,
            depression_depth_min: depth_min,
            depression_depth_max: depth_max,
            walkable_min: cfg.walkable.min_height,
            walkable_max: cfg.walkable.max_height,
            load_radius: cfg.streaming.load_radius.clamp(0, MAX_LOAD_RADIUS),
            max_loads_per_tick: match cfg.streaming.max_loads_per_tick {
                0 => None,
                n => Some(n),
            },
            blades_per_chunk: cfg.grass.blades_per_chunk,
            population_cap: cfg.grass.population_cap,
            blade_cell_size: cfg.grass.cell_size.max(0.25),
            blade_scale_min: scale_min,
            blade_scale_max: cfg.grass.scale_max.max(scale_min),
            mow_radius: cfg.mowing.radius.max(0.0),
            mow_policy,
            structure_probability: cfg.scenery.structure_probability.clamp(0.0, 1.0),
            enclosure_probability: cfg.scenery.enclosure_probability.clamp(0.0, 1.0),
            tree_max: cfg.scenery.tree_max.min(MAX_REPEATED_OBJECTS),
            fence_probability: cfg.scenery.fence_probability.clamp(0.0, 1.0),
            fence_segments_min: fence_min,
            fence_segments_max: cfg
                .scenery
                .fence_segments_max
                .clamp(fence_min, MAX_REPEATED_OBJECTS),
            fence_segment_length: cfg.scenery.segment_length.max(0.1),
            outbuilding_probability: cfg.scenery.outbuilding_probability.clamp(0.0, 1.0),
            mailbox_probability: cfg.scenery.mailbox_probability.clamp(0.0, 1.0),
            bench_probability: cfg.scenery.bench_probability.clamp(0.0, 1.0),
            edge_margin: cfg.scenery.edge_margin.clamp(0.0, chunk_size * 0.25),
            discovery_radius: cfg.discovery.radius.max(0.0),
        }
    }

    /// Distance between adjacent height samples.
    #[inline]
    pub fn grid_spacing(&self) -> f32 {
        self.chunk_size / self.grid_cells as f32
    }

    #[inline]
    pub fn is_walkable(&self, height: f32) -> bool {
        height >= self.walkable_min && height <= self.walkable_max
    }

    /// Ground area one blade stands for when accounting mowed area.
    #[inline]
    pub fn area_per_blade(&self) -> f32 {
        if self.blades_per_chunk == 0 {
            return 0.0;
        }
        self.chunk_size * self.chunk_size / self.blades_per_chunk as f32
    }
}

pub fn parse_params(src: &str, path: &Path) -> Result<WorldGenParams, ConfigError> {
    let cfg: WorldGenConfig = toml::from_str(src).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(WorldGenParams::from_config(&cfg))
}

pub fn load_params_from_path(path: &Path) -> Result<WorldGenParams, ConfigError> {
    let s = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_params(&s, path)
}
