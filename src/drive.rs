use meadow_geom::Vec3;

use crate::sim::TickInput;

/// Back-and-forth lanes along +x, stepping +z between lanes.
#[derive(Clone, Copy, Debug)]
pub struct SerpentinePath {
    pub origin: Vec3,
    pub lane_length: f32,
    pub lane_spacing: f32,
    /// Distance covered per tick.
    pub speed: f32,
}

impl SerpentinePath {
    pub fn new(origin: Vec3, lane_length: f32, lane_spacing: f32, speed: f32) -> Self {
        Self {
            origin,
            lane_length: lane_length.max(f32::EPSILON),
            lane_spacing: lane_spacing.max(0.0),
            speed: speed.max(0.0),
        }
    }

    pub fn sample(&self, tick: u64) -> TickInput {
        let s = tick as f64 * self.speed as f64;
        let lane_len = self.lane_length as f64;
        let cycle = lane_len + self.lane_spacing as f64;
        let lane = (s / cycle).floor();
        let r = s - lane * cycle;
        let forward = (lane as u64) % 2 == 0;
        let z = lane * self.lane_spacing as f64;
        let (x, z, heading) = if r < lane_len {
            let x = if forward { r } else { lane_len - r };
            let dir = if forward { 1.0 } else { -1.0 };
            (x, z, Vec3::new(dir, 0.0, 0.0))
        } else {
            let x = if forward { lane_len } else { 0.0 };
            (x, z + (r - lane_len), Vec3::FORWARD)
        };
        TickInput {
            position: self.origin + Vec3::new(x as f32, 0.0, z as f32),
            heading,
        }
    }
}
