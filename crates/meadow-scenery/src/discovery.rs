use hashbrown::HashSet;
use meadow_geom::Vec3;
use meadow_world::hash::hash3;

use crate::{ObjectId, SceneryKind, SceneryObject};

const SALT_LABEL: u32 = 0x1A_BE1;

#[derive(Clone, Debug, PartialEq)]
pub struct DiscoveryEvent {
    pub id: ObjectId,
    pub kind: SceneryKind,
    pub label: String,
    pub position: Vec3,
}

/// Session-wide record of what has been found. Outlives chunk eviction.
#[derive(Debug)]
pub struct DiscoveryTracker {
    seed: i32,
    found: HashSet<ObjectId>,
    labels: Vec<String>,
}

impl DiscoveryTracker {
    pub fn new(seed: i32) -> Self {
        Self {
            seed,
            found: HashSet::new(),
            labels: Vec::new(),
        }
    }

    pub fn is_discovered(&self, id: ObjectId) -> bool {
        self.found.contains(&id)
    }

    pub fn count(&self) -> usize {
        self.found.len()
    }

    /// Labels in the order their objects were discovered.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label_for(&self, id: ObjectId, kind: SceneryKind) -> &'static str {
        let pool = kind.info().labels;
        let c = id.coord();
        let bits = hash3(
            self.seed as u32,
            c.cx,
            c.cz,
            SALT_LABEL ^ ((id.ordinal() as u32) << 20),
        );
        pool[bits as usize % pool.len()]
    }

    /// Marks the closest eligible object and reports it. Ties on distance go to the lower id.
    pub fn check<'a>(
        &mut self,
        focal: Vec3,
        radius: f32,
        objects: impl Iterator<Item = &'a mut SceneryObject>,
    ) -> Option<DiscoveryEvent> {
        if radius.is_nan() || radius <= 0.0 {
            return None;
        }
        let r2 = radius * radius;
        let mut best: Option<(f32, &'a mut SceneryObject)> = None;
        for o in objects {
            if o.discovered || !o.kind.is_discoverable() || self.found.contains(&o.id) {
                continue;
            }
            let d2 = o.position.planar_distance_sq(focal);
            if !(d2 < r2) {
                continue;
            }
            let closer = match &best {
                None => true,
                Some((bd, b)) => d2 < *bd || (d2 == *bd && o.id < b.id),
            };
            if closer {
                best = Some((d2, o));
            }
        }
        let (_, o) = best?;
        o.discovered = true;
        self.found.insert(o.id);
        let label = self.label_for(o.id, o.kind).to_string();
        self.labels.push(label.clone());
        log::info!(target: "discovery", "found {} ({})", label, o.kind.name());
        Some(DiscoveryEvent {
            id: o.id,
            kind: o.kind,
            label,
            position: o.position,
        })
    }
}
