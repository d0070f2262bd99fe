//! Plain course data, as supplied and consumed by file codecs

use crate::entities::*;
use serde::{Deserialize, Serialize};

/// Every entity collection of one course, in file order
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Course {
    pub enemy_points: Vec<EnemyPoint>,
    pub checkpoint_groups: Vec<CheckpointGroup>,
    pub routes: Vec<Route>,
    pub objects: Vec<MapObject>,
    pub start_points: Vec<KartStartPoint>,
    pub areas: Vec<Area>,
    pub cameras: Vec<Camera>,
    pub light_params: Vec<LightParam>,
    pub mg_entries: Vec<MgEntry>,
}

impl Course {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of entities, counting checkpoints and route points
    pub fn entity_count(&self) -> usize {
        self.enemy_points.len()
            + self.checkpoint_groups.len()
            + self.checkpoint_groups.iter().map(|g| g.points.len()).sum::<usize>()
            + self.routes.len()
            + self.routes.iter().map(|r| r.points.len()).sum::<usize>()
            + self.objects.len()
            + self.start_points.len()
            + self.areas.len()
            + self.cameras.len()
            + self.light_params.len()
            + self.mg_entries.len()
    }
}
