//! Tagged views over the entity variants

use crate::entities::*;
use crate::names::ObjectNameTable;
use pitlane_core::{Rotation, Vec3};
use std::fmt;

/// Discriminant of an entity variant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    EnemyPoint,
    CheckpointGroup,
    Checkpoint,
    Route,
    RoutePoint,
    MapObject,
    KartStartPoint,
    Area,
    Camera,
    LightParam,
    MgEntry,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::EnemyPoint => "EnemyPoint",
            EntityKind::CheckpointGroup => "CheckpointGroup",
            EntityKind::Checkpoint => "Checkpoint",
            EntityKind::Route => "Route",
            EntityKind::RoutePoint => "RoutePoint",
            EntityKind::MapObject => "MapObject",
            EntityKind::KartStartPoint => "KartStartPoint",
            EntityKind::Area => "Area",
            EntityKind::Camera => "Camera",
            EntityKind::LightParam => "LightParam",
            EntityKind::MgEntry => "MgEntry",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coloured placeholder cubes used for point-like entities
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Plain,
    Red,
    Blue,
}

/// How an entity asks to be drawn
#[derive(Clone, Debug, PartialEq)]
pub enum Visual {
    /// Resolve this type name through the model registry
    Named(String),
    /// Draw a marker cube
    Marker(MarkerKind),
    /// Draw the generic placeholder shape
    Generic,
}

/// Borrowed view of one entity
#[derive(Clone, Copy, Debug)]
pub enum EntityRef<'a> {
    EnemyPoint(&'a EnemyPoint),
    CheckpointGroup(&'a CheckpointGroup),
    Checkpoint(&'a Checkpoint),
    Route(&'a Route),
    RoutePoint(&'a RoutePoint),
    MapObject(&'a MapObject),
    KartStartPoint(&'a KartStartPoint),
    Area(&'a Area),
    Camera(&'a Camera),
    LightParam(&'a LightParam),
    MgEntry(&'a MgEntry),
}

/// Mutable view of one entity
#[derive(Debug)]
pub enum EntityMut<'a> {
    EnemyPoint(&'a mut EnemyPoint),
    CheckpointGroup(&'a mut CheckpointGroup),
    Checkpoint(&'a mut Checkpoint),
    Route(&'a mut Route),
    RoutePoint(&'a mut RoutePoint),
    MapObject(&'a mut MapObject),
    KartStartPoint(&'a mut KartStartPoint),
    Area(&'a mut Area),
    Camera(&'a mut Camera),
    LightParam(&'a mut LightParam),
    MgEntry(&'a mut MgEntry),
}

impl<'a> EntityRef<'a> {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::EnemyPoint(_) => EntityKind::EnemyPoint,
            EntityRef::CheckpointGroup(_) => EntityKind::CheckpointGroup,
            EntityRef::Checkpoint(_) => EntityKind::Checkpoint,
            EntityRef::Route(_) => EntityKind::Route,
            EntityRef::RoutePoint(_) => EntityKind::RoutePoint,
            EntityRef::MapObject(_) => EntityKind::MapObject,
            EntityRef::KartStartPoint(_) => EntityKind::KartStartPoint,
            EntityRef::Area(_) => EntityKind::Area,
            EntityRef::Camera(_) => EntityKind::Camera,
            EntityRef::LightParam(_) => EntityKind::LightParam,
            EntityRef::MgEntry(_) => EntityKind::MgEntry,
        }
    }

    /// Anchor position in authoring space. Checkpoints report their start.
    pub fn position(&self) -> Option<Vec3> {
        match self {
            EntityRef::EnemyPoint(e) => Some(e.position),
            EntityRef::Checkpoint(c) => Some(c.start),
            EntityRef::RoutePoint(p) => Some(p.position),
            EntityRef::MapObject(o) => Some(o.position),
            EntityRef::KartStartPoint(k) => Some(k.position),
            EntityRef::Area(a) => Some(a.position),
            EntityRef::Camera(c) => Some(c.position),
            EntityRef::CheckpointGroup(_)
            | EntityRef::Route(_)
            | EntityRef::LightParam(_)
            | EntityRef::MgEntry(_) => None,
        }
    }

    pub fn rotation(&self) -> Option<Rotation> {
        match self {
            EntityRef::MapObject(o) => Some(o.rotation),
            EntityRef::KartStartPoint(k) => Some(k.rotation),
            EntityRef::Area(a) => Some(a.rotation),
            EntityRef::Camera(c) => Some(c.rotation),
            _ => None,
        }
    }

    /// Non-uniform scale in authoring axes
    pub fn scale(&self) -> Option<Vec3> {
        match self {
            EntityRef::MapObject(o) => Some(o.scale),
            EntityRef::KartStartPoint(k) => Some(k.scale),
            EntityRef::Area(a) => Some(a.scale),
            _ => None,
        }
    }

    pub fn params(&self) -> Option<&'a RawParams> {
        match *self {
            EntityRef::EnemyPoint(e) => Some(&e.params),
            EntityRef::MapObject(o) => Some(&o.params),
            EntityRef::KartStartPoint(k) => Some(&k.params),
            EntityRef::Area(a) => Some(&a.params),
            EntityRef::Camera(c) => Some(&c.params),
            _ => None,
        }
    }

    /// Positive emitter radius from the raw parameters, if any
    pub fn emit_radius(&self) -> Option<f32> {
        self.params()
            .and_then(|p| p.get(EMIT_RADIUS_PARAM).copied())
            .filter(|r| *r > 0.0)
    }

    /// Type name shown in lists and used for model lookup
    pub fn type_name(&self, names: &ObjectNameTable) -> String {
        match self {
            EntityRef::MapObject(o) => names.label(o.object_id).to_string(),
            other => other.kind().name().to_string(),
        }
    }

    /// What the renderer should draw for this entity, or `None` if nothing
    pub fn visual(&self, names: &ObjectNameTable) -> Option<Visual> {
        match self {
            EntityRef::EnemyPoint(_) => Some(Visual::Marker(MarkerKind::Plain)),
            EntityRef::Checkpoint(_) => Some(Visual::Marker(MarkerKind::Red)),
            EntityRef::RoutePoint(_) => Some(Visual::Marker(MarkerKind::Blue)),
            EntityRef::MapObject(o) => Some(Visual::Named(names.label(o.object_id).to_string())),
            EntityRef::KartStartPoint(_) | EntityRef::Area(_) | EntityRef::Camera(_) => {
                Some(Visual::Generic)
            }
            EntityRef::CheckpointGroup(_)
            | EntityRef::Route(_)
            | EntityRef::LightParam(_)
            | EntityRef::MgEntry(_) => None,
        }
    }
}

impl<'a> EntityMut<'a> {
    pub fn kind(&self) -> EntityKind {
        self.reborrow().kind()
    }

    pub fn reborrow(&self) -> EntityRef<'_> {
        match self {
            EntityMut::EnemyPoint(e) => EntityRef::EnemyPoint(e),
            EntityMut::CheckpointGroup(g) => EntityRef::CheckpointGroup(g),
            EntityMut::Checkpoint(c) => EntityRef::Checkpoint(c),
            EntityMut::Route(r) => EntityRef::Route(r),
            EntityMut::RoutePoint(p) => EntityRef::RoutePoint(p),
            EntityMut::MapObject(o) => EntityRef::MapObject(o),
            EntityMut::KartStartPoint(k) => EntityRef::KartStartPoint(k),
            EntityMut::Area(a) => EntityRef::Area(a),
            EntityMut::Camera(c) => EntityRef::Camera(c),
            EntityMut::LightParam(l) => EntityRef::LightParam(l),
            EntityMut::MgEntry(m) => EntityRef::MgEntry(m),
        }
    }

    /// Move the entity's anchor. Checkpoints move both ends together.
    pub fn set_position(&mut self, position: Vec3) -> bool {
        match self {
            EntityMut::EnemyPoint(e) => e.position = position,
            EntityMut::Checkpoint(c) => {
                let delta = position - c.start;
                c.start = position;
                c.end = c.end + delta;
            }
            EntityMut::RoutePoint(p) => p.position = position,
            EntityMut::MapObject(o) => o.position = position,
            EntityMut::KartStartPoint(k) => k.position = position,
            EntityMut::Area(a) => a.position = position,
            EntityMut::Camera(c) => c.position = position,
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positional_variants_have_no_visual() {
        let names = ObjectNameTable::default();
        let group = CheckpointGroup::default();
        let light = LightParam::default();
        assert!(EntityRef::CheckpointGroup(&group).visual(&names).is_none());
        assert!(EntityRef::LightParam(&light).visual(&names).is_none());
        assert!(EntityRef::LightParam(&light).position().is_none());
    }

    #[test]
    fn test_object_visual_uses_name_table() {
        let names = ObjectNameTable::from_pairs([("GeoItemBox", 1)]);
        let obj = MapObject::new(Vec3::ZERO, 1);
        assert_eq!(
            EntityRef::MapObject(&obj).visual(&names),
            Some(Visual::Named("GeoItemBox".into()))
        );

        let unknown = MapObject::new(Vec3::ZERO, 9999);
        assert_eq!(EntityRef::MapObject(&unknown).type_name(&names), "INVALID");
    }

    #[test]
    fn test_emit_radius_requires_positive_value() {
        let mut obj = MapObject::new(Vec3::ZERO, 1);
        assert_eq!(EntityRef::MapObject(&obj).emit_radius(), None);

        obj.params.insert(EMIT_RADIUS_PARAM.into(), 0.0);
        assert_eq!(EntityRef::MapObject(&obj).emit_radius(), None);

        obj.params.insert(EMIT_RADIUS_PARAM.into(), 400.0);
        assert_eq!(EntityRef::MapObject(&obj).emit_radius(), Some(400.0));
    }

    #[test]
    fn test_set_position_moves_checkpoint_pair() {
        let mut cp = Checkpoint::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0));
        let mut view = EntityMut::Checkpoint(&mut cp);
        assert!(view.set_position(Vec3::new(5.0, 1.0, 0.0)));
        assert_eq!(cp.end, Vec3::new(15.0, 1.0, 0.0));

        let mut route = Route::default();
        assert!(!EntityMut::Route(&mut route).set_position(Vec3::ZERO));
    }
}
