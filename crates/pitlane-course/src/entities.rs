//! Entity data types
//!
//! Every raw field the course format carries is kept here, including the ones
//! nobody understands yet, so a load/save cycle is lossless.

use pitlane_core::{PitlaneError, Result, Rotation, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Unknown numeric parameters preserved opaquely, keyed by parameter name
pub type RawParams = BTreeMap<String, f32>;

/// Raw parameter that gives an entity an emitter radius glyph
pub const EMIT_RADIUS_PARAM: &str = "mEmitRadius";

/// A signed 16-bit index into another collection.
///
/// `-1` (0xFFFF on disk) means "no reference". Any other value is kept exactly
/// as read, even if it is negative or past the end of its target collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexRef(pub i16);

impl IndexRef {
    pub const NONE: Self = Self(-1);

    pub fn to(index: usize) -> Self {
        Self(index as i16)
    }

    pub fn raw(&self) -> i16 {
        self.0
    }

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// The referenced index, if this is a non-negative reference
    pub fn index(&self) -> Option<usize> {
        (self.0 >= 0).then_some(self.0 as usize)
    }

    /// True when this is neither the sentinel nor a valid index for `len`
    pub fn is_dangling(&self, len: usize) -> bool {
        !self.is_none() && self.index().map_or(true, |i| i >= len)
    }

    /// Fix up this reference after element `removed` left the target collection
    pub fn repair_after_removal(&mut self, removed: usize) {
        if let Some(i) = self.index() {
            if i == removed {
                *self = Self::NONE;
            } else if i > removed {
                self.0 -= 1;
            }
        }
    }
}

impl Default for IndexRef {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for IndexRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn default_one() -> Vec3 {
    Vec3::ONE
}

/// A node of the enemy/item path network
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyPoint {
    pub position: Vec3,
    #[serde(default)]
    pub point_setting: u16,
    /// Link to another enemy point
    #[serde(default)]
    pub link: IndexRef,
    #[serde(default)]
    pub scale: f32,
    #[serde(default)]
    pub group_setting: u16,
    /// Index of the owning checkpoint group
    #[serde(default)]
    pub group: u8,
    #[serde(default)]
    pub point_setting2: u8,
    #[serde(default)]
    pub unk1: u8,
    #[serde(default)]
    pub unk2: u16,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: RawParams,
}

impl EnemyPoint {
    pub fn new(position: Vec3, group: u8) -> Self {
        Self {
            position,
            point_setting: 0,
            link: IndexRef::NONE,
            scale: 0.0,
            group_setting: 0,
            group,
            point_setting2: 0,
            unk1: 0,
            unk2: 0,
            params: RawParams::new(),
        }
    }
}

/// A checkpoint line between two positions
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub start: Vec3,
    pub end: Vec3,
    #[serde(default)]
    pub unk1: u8,
    #[serde(default)]
    pub unk2: u8,
    #[serde(default)]
    pub unk3: u8,
    #[serde(default)]
    pub unk4: u8,
}

impl Checkpoint {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Self {
            start,
            end,
            ..Default::default()
        }
    }

    pub fn midpoint(&self) -> Vec3 {
        self.start.lerp(&self.end, 0.5)
    }
}

/// Number of previous/next group slots a checkpoint group has
pub const GROUP_LINK_SLOTS: usize = 4;

/// An ordered run of checkpoints linked to neighbouring groups
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckpointGroup {
    #[serde(default)]
    pub group_link: u16,
    #[serde(default = "unset_links")]
    pub prev_groups: [IndexRef; GROUP_LINK_SLOTS],
    #[serde(default = "unset_links")]
    pub next_groups: [IndexRef; GROUP_LINK_SLOTS],
    #[serde(default)]
    pub points: Vec<Checkpoint>,
}

fn unset_links() -> [IndexRef; GROUP_LINK_SLOTS] {
    [IndexRef::NONE; GROUP_LINK_SLOTS]
}

impl Default for CheckpointGroup {
    fn default() -> Self {
        Self {
            group_link: 0,
            prev_groups: unset_links(),
            next_groups: unset_links(),
            points: Vec::new(),
        }
    }
}

impl CheckpointGroup {
    /// Next-group indices that are set, skipping sentinels
    pub fn next_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.next_groups.iter().filter_map(IndexRef::index)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub position: Vec3,
    #[serde(default)]
    pub unk: u32,
}

/// An ordered path followed by moving objects and cameras
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub unk1: u8,
    #[serde(default)]
    pub unk2: u8,
    #[serde(default)]
    pub points: Vec<RoutePoint>,
}

/// A placed course object
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default = "default_one")]
    pub scale: Vec3,
    /// Object type code, looked up in the object name table
    pub object_id: u16,
    /// Route this object follows
    #[serde(default)]
    pub path_id: IndexRef,
    #[serde(default)]
    pub unk_28: u16,
    #[serde(default)]
    pub unk_2a: u16,
    #[serde(default)]
    pub presence_filter: u8,
    #[serde(default)]
    pub presence: u8,
    #[serde(default)]
    pub unk_flag: u8,
    #[serde(default)]
    pub unk_2f: u8,
    #[serde(default)]
    pub userdata: [i16; 8],
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: RawParams,
}

impl MapObject {
    pub fn new(position: Vec3, object_id: u16) -> Self {
        Self {
            position,
            rotation: Rotation::IDENTITY,
            scale: Vec3::ONE,
            object_id,
            path_id: IndexRef::NONE,
            unk_28: 0,
            unk_2a: 0,
            presence_filter: 0,
            presence: 0,
            unk_flag: 0,
            unk_2f: 0,
            userdata: [0; 8],
            params: RawParams::new(),
        }
    }
}

/// A kart spawn point
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KartStartPoint {
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default = "default_one")]
    pub scale: Vec3,
    #[serde(default)]
    pub pole_position: u8,
    #[serde(default)]
    pub player_id: u8,
    #[serde(default)]
    pub unk: u16,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: RawParams,
}

impl KartStartPoint {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Rotation::IDENTITY,
            scale: Vec3::ONE,
            pole_position: 0,
            player_id: 0xFF,
            unk: 0,
            params: RawParams::new(),
        }
    }
}

/// A trigger volume
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default = "default_one")]
    pub scale: Vec3,
    #[serde(default)]
    pub shape: u8,
    #[serde(default)]
    pub area_type: u8,
    /// Camera triggered by this area
    #[serde(default)]
    pub camera: IndexRef,
    #[serde(default)]
    pub feather_i: u32,
    #[serde(default)]
    pub feather_j: u32,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: RawParams,
}

impl Area {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Rotation::IDENTITY,
            scale: Vec3::ONE,
            shape: 0,
            area_type: 0,
            camera: IndexRef::NONE,
            feather_i: 0,
            feather_j: 0,
            params: RawParams::new(),
        }
    }
}

/// Longest camera name the course format stores
pub const CAMERA_NAME_LEN: usize = 4;

/// A replay/intro camera
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default)]
    pub start: Vec3,
    #[serde(default)]
    pub end: Vec3,
    #[serde(default)]
    pub cam_type: u8,
    #[serde(default)]
    pub fov: u16,
    #[serde(default)]
    pub duration: u16,
    #[serde(default)]
    pub start_camera: u8,
    /// Route the camera travels along
    #[serde(default)]
    pub route: IndexRef,
    /// Camera that takes over when this one finishes
    #[serde(default)]
    pub next_camera: IndexRef,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: RawParams,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Rotation::IDENTITY,
            start: Vec3::ZERO,
            end: Vec3::ZERO,
            cam_type: 0,
            fov: 45,
            duration: 0,
            start_camera: 0,
            route: IndexRef::NONE,
            next_camera: IndexRef::NONE,
            name: String::new(),
            params: RawParams::new(),
        }
    }

    /// Set the name, right-aligned to the stored width
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        if name.chars().count() > CAMERA_NAME_LEN {
            return Err(PitlaneError::ParseError(format!(
                "camera name '{}' is longer than {} characters",
                name, CAMERA_NAME_LEN
            )));
        }
        self.name = format!("{:>width$}", name, width = CAMERA_NAME_LEN);
        Ok(())
    }
}

/// Course lighting colours. Not positional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LightParam {
    #[serde(default)]
    pub color1: [u8; 4],
    #[serde(default)]
    pub color2: [u8; 4],
    #[serde(default)]
    pub unk: Vec3,
}

/// Battle-mode settings row. Not positional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MgEntry {
    #[serde(default)]
    pub unk1: u16,
    #[serde(default)]
    pub unk2: u16,
    #[serde(default)]
    pub unk3: u16,
    #[serde(default)]
    pub unk4: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_ref_sentinel() {
        assert!(IndexRef::NONE.is_none());
        assert_eq!(IndexRef::NONE.index(), None);
        assert!(!IndexRef::NONE.is_dangling(0));
        assert_eq!(IndexRef::default(), IndexRef::NONE);
    }

    #[test]
    fn test_index_ref_dangling() {
        assert!(!IndexRef::to(2).is_dangling(3));
        assert!(IndexRef::to(3).is_dangling(3));
        assert!(IndexRef(-5).is_dangling(10));
    }

    #[test]
    fn test_index_ref_repair() {
        let mut at = IndexRef::to(2);
        at.repair_after_removal(2);
        assert!(at.is_none());

        let mut after = IndexRef::to(5);
        after.repair_after_removal(2);
        assert_eq!(after, IndexRef::to(4));

        let mut before = IndexRef::to(1);
        before.repair_after_removal(2);
        assert_eq!(before, IndexRef::to(1));

        // raw negatives are preserved
        let mut raw = IndexRef(-7);
        raw.repair_after_removal(0);
        assert_eq!(raw, IndexRef(-7));
    }

    #[test]
    fn test_group_link_iteration_skips_sentinels() {
        let mut group = CheckpointGroup::default();
        assert_eq!(group.next_indices().count(), 0);
        group.next_groups[1] = IndexRef::to(3);
        assert_eq!(group.next_indices().collect::<Vec<_>>(), vec![3]);
    }

    #[test]
    fn test_camera_name() {
        let mut cam = Camera::new(Vec3::ZERO);
        cam.set_name("ab").unwrap();
        assert_eq!(cam.name, "  ab");
        assert!(cam.set_name("toolong").is_err());
    }
}
