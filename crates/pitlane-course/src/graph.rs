//! CourseGraph - the mutable entity graph with stable ids

use crate::course::Course;
use crate::entities::*;
use crate::entity::{EntityKind, EntityMut, EntityRef};
use crate::fields::{self, FieldKind, FieldValue, RefTarget};
use crate::names::ObjectNameTable;
use bimap::BiMap;
use pitlane_core::{EntityId, IdAllocator, PitlaneError, Result};
use std::collections::HashSet;
use std::fmt;

/// Storage location of an entity inside the course collections
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    EnemyPoint(usize),
    CheckpointGroup(usize),
    Checkpoint { group: usize, index: usize },
    Route(usize),
    RoutePoint { route: usize, index: usize },
    MapObject(usize),
    KartStartPoint(usize),
    Area(usize),
    Camera(usize),
    LightParam(usize),
    MgEntry(usize),
}

/// A cross-reference that is neither the sentinel nor a valid index
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceIssue {
    pub source: EntityId,
    pub kind: EntityKind,
    pub field: String,
    pub value: i64,
    pub target: &'static str,
    pub target_len: usize,
}

impl fmt::Display for ReferenceIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} = {} is INVALID ({} has {} entries)",
            self.kind, self.source, self.field, self.value, self.target, self.target_len
        )
    }
}

/// The course entity graph
///
/// Wraps the plain `Course` collections with:
/// - Stable EntityId mapping (ids survive edits and deletions of siblings)
/// - Reference repair on delete
/// - Selection state
pub struct CourseGraph {
    course: Course,
    /// Bidirectional mapping: EntityId <-> storage slot
    index: BiMap<EntityId, Slot>,
    ids: IdAllocator,
    selection: HashSet<EntityId>,
}

impl Default for CourseGraph {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! typed_access {
    ($get:ident, $get_mut:ident, $variant:ident, $ty:ty) => {
        pub fn $get(&self, id: EntityId) -> Result<&$ty> {
            match self.get(id) {
                Some(EntityRef::$variant(e)) => Ok(e),
                Some(_) => Err(PitlaneError::WrongEntityKind {
                    id,
                    expected: stringify!($variant),
                }),
                None => Err(PitlaneError::EntityNotFound(id)),
            }
        }

        pub fn $get_mut(&mut self, id: EntityId) -> Result<&mut $ty> {
            match self.get_mut(id) {
                Some(EntityMut::$variant(e)) => Ok(e),
                Some(_) => Err(PitlaneError::WrongEntityKind {
                    id,
                    expected: stringify!($variant),
                }),
                None => Err(PitlaneError::EntityNotFound(id)),
            }
        }
    };
}

/// Reject a reference that would dangle in a collection of `len` entries
fn check_new_ref(r: IndexRef, len: usize, collection: &'static str) -> Result<()> {
    if r.is_dangling(len) {
        return Err(PitlaneError::IndexOutOfRange {
            collection,
            index: r.raw() as i64,
            len,
        });
    }
    Ok(())
}

impl CourseGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::from_parts(Course::new())
    }

    /// Take ownership of decoded course data, assigning ids in stable order
    pub fn from_parts(course: Course) -> Self {
        let mut graph = Self {
            course,
            index: BiMap::new(),
            ids: IdAllocator::new(),
            selection: HashSet::new(),
        };
        for slot in graph.slots() {
            let id = graph.ids.allocate();
            graph.index.insert(id, slot);
        }
        log::debug!("Course graph built with {} entities", graph.index.len());
        graph
    }

    /// Plain course data, for saving
    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index.contains_left(&id)
    }

    pub fn slot(&self, id: EntityId) -> Option<Slot> {
        self.index.get_by_left(&id).copied()
    }

    pub fn id_of(&self, slot: Slot) -> Option<EntityId> {
        self.index.get_by_right(&slot).copied()
    }

    pub fn kind(&self, id: EntityId) -> Option<EntityKind> {
        self.get(id).map(|e| e.kind())
    }

    /// All slots in stable iteration order
    fn slots(&self) -> Vec<Slot> {
        let c = &self.course;
        let mut slots = Vec::with_capacity(c.entity_count());
        slots.extend((0..c.enemy_points.len()).map(Slot::EnemyPoint));
        for (group, g) in c.checkpoint_groups.iter().enumerate() {
            slots.push(Slot::CheckpointGroup(group));
            slots.extend((0..g.points.len()).map(|index| Slot::Checkpoint { group, index }));
        }
        for (route, r) in c.routes.iter().enumerate() {
            slots.push(Slot::Route(route));
            slots.extend((0..r.points.len()).map(|index| Slot::RoutePoint { route, index }));
        }
        slots.extend((0..c.objects.len()).map(Slot::MapObject));
        slots.extend((0..c.start_points.len()).map(Slot::KartStartPoint));
        slots.extend((0..c.areas.len()).map(Slot::Area));
        slots.extend((0..c.cameras.len()).map(Slot::Camera));
        slots.extend((0..c.light_params.len()).map(Slot::LightParam));
        slots.extend((0..c.mg_entries.len()).map(Slot::MgEntry));
        slots
    }

    fn entity_at(&self, slot: Slot) -> Option<EntityRef<'_>> {
        let c = &self.course;
        Some(match slot {
            Slot::EnemyPoint(i) => EntityRef::EnemyPoint(c.enemy_points.get(i)?),
            Slot::CheckpointGroup(i) => EntityRef::CheckpointGroup(c.checkpoint_groups.get(i)?),
            Slot::Checkpoint { group, index } => {
                EntityRef::Checkpoint(c.checkpoint_groups.get(group)?.points.get(index)?)
            }
            Slot::Route(i) => EntityRef::Route(c.routes.get(i)?),
            Slot::RoutePoint { route, index } => {
                EntityRef::RoutePoint(c.routes.get(route)?.points.get(index)?)
            }
            Slot::MapObject(i) => EntityRef::MapObject(c.objects.get(i)?),
            Slot::KartStartPoint(i) => EntityRef::KartStartPoint(c.start_points.get(i)?),
            Slot::Area(i) => EntityRef::Area(c.areas.get(i)?),
            Slot::Camera(i) => EntityRef::Camera(c.cameras.get(i)?),
            Slot::LightParam(i) => EntityRef::LightParam(c.light_params.get(i)?),
            Slot::MgEntry(i) => EntityRef::MgEntry(c.mg_entries.get(i)?),
        })
    }

    fn entity_at_mut(&mut self, slot: Slot) -> Option<EntityMut<'_>> {
        let c = &mut self.course;
        Some(match slot {
            Slot::EnemyPoint(i) => EntityMut::EnemyPoint(c.enemy_points.get_mut(i)?),
            Slot::CheckpointGroup(i) => {
                EntityMut::CheckpointGroup(c.checkpoint_groups.get_mut(i)?)
            }
            Slot::Checkpoint { group, index } => EntityMut::Checkpoint(
                c.checkpoint_groups.get_mut(group)?.points.get_mut(index)?,
            ),
            Slot::Route(i) => EntityMut::Route(c.routes.get_mut(i)?),
            Slot::RoutePoint { route, index } => {
                EntityMut::RoutePoint(c.routes.get_mut(route)?.points.get_mut(index)?)
            }
            Slot::MapObject(i) => EntityMut::MapObject(c.objects.get_mut(i)?),
            Slot::KartStartPoint(i) => EntityMut::KartStartPoint(c.start_points.get_mut(i)?),
            Slot::Area(i) => EntityMut::Area(c.areas.get_mut(i)?),
            Slot::Camera(i) => EntityMut::Camera(c.cameras.get_mut(i)?),
            Slot::LightParam(i) => EntityMut::LightParam(c.light_params.get_mut(i)?),
            Slot::MgEntry(i) => EntityMut::MgEntry(c.mg_entries.get_mut(i)?),
        })
    }

    /// Iterate all entities in stable order: enemy points, checkpoint groups
    /// each followed by their checkpoints, routes each followed by their
    /// points, objects, start points, areas, cameras, light params, MG entries.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, EntityRef<'_>)> + '_ {
        self.slots().into_iter().filter_map(move |slot| {
            let id = self.id_of(slot)?;
            Some((id, self.entity_at(slot)?))
        })
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.iter().map(|(id, _)| id).collect()
    }

    pub fn get(&self, id: EntityId) -> Option<EntityRef<'_>> {
        self.entity_at(self.slot(id)?)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<EntityMut<'_>> {
        let slot = self.slot(id)?;
        self.entity_at_mut(slot)
    }

    typed_access!(enemy_point, enemy_point_mut, EnemyPoint, EnemyPoint);
    typed_access!(checkpoint_group, checkpoint_group_mut, CheckpointGroup, CheckpointGroup);
    typed_access!(checkpoint, checkpoint_mut, Checkpoint, Checkpoint);
    typed_access!(route, route_mut, Route, Route);
    typed_access!(route_point, route_point_mut, RoutePoint, RoutePoint);
    typed_access!(object, object_mut, MapObject, MapObject);
    typed_access!(start_point, start_point_mut, KartStartPoint, KartStartPoint);
    typed_access!(area, area_mut, Area, Area);
    typed_access!(camera, camera_mut, Camera, Camera);
    typed_access!(light_param, light_param_mut, LightParam, LightParam);
    typed_access!(mg_entry, mg_entry_mut, MgEntry, MgEntry);

    // ---- adding ----

    fn register(&mut self, slot: Slot) -> EntityId {
        let id = self.ids.allocate();
        self.index.insert(id, slot);
        id
    }

    fn container_index(&self, id: EntityId, kind: EntityKind) -> Result<usize> {
        match (self.slot(id), kind) {
            (Some(Slot::CheckpointGroup(i)), EntityKind::CheckpointGroup) => Ok(i),
            (Some(Slot::Route(i)), EntityKind::Route) => Ok(i),
            (Some(_), _) => Err(PitlaneError::WrongEntityKind {
                id,
                expected: kind.name(),
            }),
            (None, _) => Err(PitlaneError::EntityNotFound(id)),
        }
    }

    pub fn add_enemy_point(&mut self, point: EnemyPoint) -> Result<EntityId> {
        let groups = self.course.checkpoint_groups.len();
        if point.group as usize >= groups {
            return Err(PitlaneError::IndexOutOfRange {
                collection: "checkpoint_groups",
                index: point.group as i64,
                len: groups,
            });
        }
        let index = self.course.enemy_points.len();
        check_new_ref(point.link, index + 1, "enemy_points")?;
        self.course.enemy_points.push(point);
        Ok(self.register(Slot::EnemyPoint(index)))
    }

    /// Add a checkpoint group together with any checkpoints it already holds
    pub fn add_checkpoint_group(&mut self, group: CheckpointGroup) -> Result<EntityId> {
        let index = self.course.checkpoint_groups.len();
        for r in group.prev_groups.iter().chain(group.next_groups.iter()) {
            check_new_ref(*r, index + 1, "checkpoint_groups")?;
        }
        let points = group.points.len();
        self.course.checkpoint_groups.push(group);
        let id = self.register(Slot::CheckpointGroup(index));
        for point in 0..points {
            self.register(Slot::Checkpoint {
                group: index,
                index: point,
            });
        }
        Ok(id)
    }

    pub fn add_checkpoint(&mut self, group_id: EntityId, checkpoint: Checkpoint) -> Result<EntityId> {
        let group = self.container_index(group_id, EntityKind::CheckpointGroup)?;
        let points = &mut self.course.checkpoint_groups[group].points;
        let index = points.len();
        points.push(checkpoint);
        Ok(self.register(Slot::Checkpoint { group, index }))
    }

    /// Add a route together with any points it already holds
    pub fn add_route(&mut self, route: Route) -> EntityId {
        let index = self.course.routes.len();
        let points = route.points.len();
        self.course.routes.push(route);
        let id = self.register(Slot::Route(index));
        for point in 0..points {
            self.register(Slot::RoutePoint {
                route: index,
                index: point,
            });
        }
        id
    }

    pub fn add_route_point(&mut self, route_id: EntityId, point: RoutePoint) -> Result<EntityId> {
        let route = self.container_index(route_id, EntityKind::Route)?;
        let points = &mut self.course.routes[route].points;
        let index = points.len();
        points.push(point);
        Ok(self.register(Slot::RoutePoint { route, index }))
    }

    pub fn add_object(&mut self, object: MapObject) -> Result<EntityId> {
        check_new_ref(object.path_id, self.course.routes.len(), "routes")?;
        let index = self.course.objects.len();
        self.course.objects.push(object);
        Ok(self.register(Slot::MapObject(index)))
    }

    pub fn add_start_point(&mut self, start: KartStartPoint) -> EntityId {
        let index = self.course.start_points.len();
        self.course.start_points.push(start);
        self.register(Slot::KartStartPoint(index))
    }

    pub fn add_area(&mut self, area: Area) -> Result<EntityId> {
        check_new_ref(area.camera, self.course.cameras.len(), "cameras")?;
        let index = self.course.areas.len();
        self.course.areas.push(area);
        Ok(self.register(Slot::Area(index)))
    }

    pub fn add_camera(&mut self, camera: Camera) -> Result<EntityId> {
        let index = self.course.cameras.len();
        check_new_ref(camera.route, self.course.routes.len(), "routes")?;
        check_new_ref(camera.next_camera, index + 1, "cameras")?;
        self.course.cameras.push(camera);
        Ok(self.register(Slot::Camera(index)))
    }

    pub fn add_light_param(&mut self, light: LightParam) -> EntityId {
        let index = self.course.light_params.len();
        self.course.light_params.push(light);
        self.register(Slot::LightParam(index))
    }

    pub fn add_mg_entry(&mut self, entry: MgEntry) -> EntityId {
        let index = self.course.mg_entries.len();
        self.course.mg_entries.push(entry);
        self.register(Slot::MgEntry(index))
    }

    // ---- deleting ----

    /// Move index entries whose slot `remap` rewrites
    fn remap_slots(&mut self, remap: impl Fn(Slot) -> Option<Slot>) {
        let moved: Vec<(EntityId, Slot)> = self
            .index
            .iter()
            .filter_map(|(id, slot)| remap(*slot).map(|new| (*id, new)))
            .collect();
        for (id, _) in &moved {
            self.index.remove_by_left(id);
        }
        for (id, slot) in moved {
            self.index.insert(id, slot);
        }
    }

    /// Forget every entity whose slot matches `pred`
    fn forget_slots(&mut self, pred: impl Fn(&Slot) -> bool) {
        let gone: Vec<EntityId> = self
            .index
            .iter()
            .filter(|(_, slot)| pred(slot))
            .map(|(id, _)| *id)
            .collect();
        for id in gone {
            self.index.remove_by_left(&id);
            self.selection.remove(&id);
        }
    }

    /// Delete an entity and repair references to it.
    ///
    /// References to the deleted index become the sentinel; references to
    /// later entries of the same collection shift down by one. Deleting a
    /// group or route also deletes its checkpoints or points. A checkpoint
    /// group that still owns enemy points cannot be deleted.
    pub fn delete(&mut self, id: EntityId) -> Result<()> {
        let slot = self.slot(id).ok_or(PitlaneError::EntityNotFound(id))?;
        let c = &mut self.course;

        match slot {
            Slot::EnemyPoint(i) => {
                c.enemy_points.remove(i);
                for e in &mut c.enemy_points {
                    e.link.repair_after_removal(i);
                }
            }
            Slot::CheckpointGroup(g) => {
                let members = c.enemy_points.iter().filter(|e| e.group as usize == g).count();
                if members > 0 {
                    return Err(PitlaneError::GroupInUse { group: g, members });
                }
                c.checkpoint_groups.remove(g);
                for e in &mut c.enemy_points {
                    if e.group as usize > g {
                        e.group -= 1;
                    }
                }
                for group in &mut c.checkpoint_groups {
                    for r in group.prev_groups.iter_mut().chain(group.next_groups.iter_mut()) {
                        r.repair_after_removal(g);
                    }
                }
            }
            Slot::Checkpoint { group, index } => {
                c.checkpoint_groups[group].points.remove(index);
            }
            Slot::Route(r) => {
                c.routes.remove(r);
                for o in &mut c.objects {
                    o.path_id.repair_after_removal(r);
                }
                for cam in &mut c.cameras {
                    cam.route.repair_after_removal(r);
                }
            }
            Slot::RoutePoint { route, index } => {
                c.routes[route].points.remove(index);
            }
            Slot::MapObject(i) => {
                c.objects.remove(i);
            }
            Slot::KartStartPoint(i) => {
                c.start_points.remove(i);
            }
            Slot::Area(i) => {
                c.areas.remove(i);
            }
            Slot::Camera(i) => {
                c.cameras.remove(i);
                for a in &mut c.areas {
                    a.camera.repair_after_removal(i);
                }
                for cam in &mut c.cameras {
                    cam.next_camera.repair_after_removal(i);
                }
            }
            Slot::LightParam(i) => {
                c.light_params.remove(i);
            }
            Slot::MgEntry(i) => {
                c.mg_entries.remove(i);
            }
        }

        self.index.remove_by_left(&id);
        self.selection.remove(&id);

        match slot {
            Slot::CheckpointGroup(g) => {
                self.forget_slots(|s| matches!(s, Slot::Checkpoint { group, .. } if *group == g));
                self.remap_slots(|s| match s {
                    Slot::CheckpointGroup(k) if k > g => Some(Slot::CheckpointGroup(k - 1)),
                    Slot::Checkpoint { group, index } if group > g => Some(Slot::Checkpoint {
                        group: group - 1,
                        index,
                    }),
                    _ => None,
                });
            }
            Slot::Route(r) => {
                self.forget_slots(|s| matches!(s, Slot::RoutePoint { route, .. } if *route == r));
                self.remap_slots(|s| match s {
                    Slot::Route(k) if k > r => Some(Slot::Route(k - 1)),
                    Slot::RoutePoint { route, index } if route > r => Some(Slot::RoutePoint {
                        route: route - 1,
                        index,
                    }),
                    _ => None,
                });
            }
            Slot::Checkpoint { group, index } => self.remap_slots(|s| match s {
                Slot::Checkpoint { group: g, index: k } if g == group && k > index => {
                    Some(Slot::Checkpoint { group, index: k - 1 })
                }
                _ => None,
            }),
            Slot::RoutePoint { route, index } => self.remap_slots(|s| match s {
                Slot::RoutePoint { route: r, index: k } if r == route && k > index => {
                    Some(Slot::RoutePoint { route, index: k - 1 })
                }
                _ => None,
            }),
            flat => self.remap_slots(|s| shift_flat(s, flat)),
        }

        log::debug!("Deleted {:?} {}", slot, id);
        Ok(())
    }

    // ---- validation ----

    /// Report every cross-reference that is neither the sentinel nor a
    /// valid index. Nothing is modified.
    pub fn check_references(&self) -> Vec<ReferenceIssue> {
        let c = &self.course;
        let mut issues = Vec::new();
        let mut report = |slot: Slot, kind, field: String, value: i64, target, target_len| {
            if let Some(source) = self.id_of(slot) {
                issues.push(ReferenceIssue {
                    source,
                    kind,
                    field,
                    value,
                    target,
                    target_len,
                });
            }
        };

        for (i, e) in c.enemy_points.iter().enumerate() {
            if e.link.is_dangling(c.enemy_points.len()) {
                report(
                    Slot::EnemyPoint(i),
                    EntityKind::EnemyPoint,
                    "link".into(),
                    e.link.raw() as i64,
                    "enemy_points",
                    c.enemy_points.len(),
                );
            }
            if e.group as usize >= c.checkpoint_groups.len() {
                report(
                    Slot::EnemyPoint(i),
                    EntityKind::EnemyPoint,
                    "group".into(),
                    e.group as i64,
                    "checkpoint_groups",
                    c.checkpoint_groups.len(),
                );
            }
        }

        for (i, g) in c.checkpoint_groups.iter().enumerate() {
            let links = [("prev_groups", &g.prev_groups), ("next_groups", &g.next_groups)];
            for (name, refs) in links {
                for (slot_no, r) in refs.iter().enumerate() {
                    if r.is_dangling(c.checkpoint_groups.len()) {
                        report(
                            Slot::CheckpointGroup(i),
                            EntityKind::CheckpointGroup,
                            format!("{}[{}]", name, slot_no),
                            r.raw() as i64,
                            "checkpoint_groups",
                            c.checkpoint_groups.len(),
                        );
                    }
                }
            }
        }

        for (i, o) in c.objects.iter().enumerate() {
            if o.path_id.is_dangling(c.routes.len()) {
                report(
                    Slot::MapObject(i),
                    EntityKind::MapObject,
                    "path_id".into(),
                    o.path_id.raw() as i64,
                    "routes",
                    c.routes.len(),
                );
            }
        }

        for (i, a) in c.areas.iter().enumerate() {
            if a.camera.is_dangling(c.cameras.len()) {
                report(
                    Slot::Area(i),
                    EntityKind::Area,
                    "camera".into(),
                    a.camera.raw() as i64,
                    "cameras",
                    c.cameras.len(),
                );
            }
        }

        for (i, cam) in c.cameras.iter().enumerate() {
            if cam.route.is_dangling(c.routes.len()) {
                report(
                    Slot::Camera(i),
                    EntityKind::Camera,
                    "route".into(),
                    cam.route.raw() as i64,
                    "routes",
                    c.routes.len(),
                );
            }
            if cam.next_camera.is_dangling(c.cameras.len()) {
                report(
                    Slot::Camera(i),
                    EntityKind::Camera,
                    "next_camera".into(),
                    cam.next_camera.raw() as i64,
                    "cameras",
                    c.cameras.len(),
                );
            }
        }

        issues
    }

    /// Objects whose type code is missing from the name table
    pub fn unknown_object_codes(&self, names: &ObjectNameTable) -> Vec<(EntityId, u16)> {
        self.course
            .objects
            .iter()
            .enumerate()
            .filter(|(_, o)| !names.contains(o.object_id))
            .filter_map(|(i, o)| Some((self.id_of(Slot::MapObject(i))?, o.object_id)))
            .collect()
    }

    // ---- editing panel binding ----

    /// Labelled field values for the entity's editor table
    pub fn field_rows(&self, id: EntityId, names: &ObjectNameTable) -> Result<Vec<(&'static str, String)>> {
        let entity = self.get(id).ok_or(PitlaneError::EntityNotFound(id))?;
        Ok(fields::read_fields(entity, names).unwrap_or_default())
    }

    /// Set one field through the entity's editor table
    ///
    /// Reference fields only take -1 or an index into their target collection.
    pub fn set_field(&mut self, id: EntityId, label: &str, value: FieldValue) -> Result<()> {
        let kind = self.kind(id).ok_or(PitlaneError::EntityNotFound(id))?;
        let field_kind = fields::field_table(kind).and_then(|t| t.kind_of(label));
        if let (Some(FieldKind::Ref(target)), FieldValue::Int(n)) = (field_kind, value) {
            let len = self.ref_target_len(target);
            if n != IndexRef::NONE.raw() as i64 && !(0..len as i64).contains(&n) {
                return Err(PitlaneError::IndexOutOfRange {
                    collection: target.collection(),
                    index: n,
                    len,
                });
            }
        }
        let entity = self.get_mut(id).ok_or(PitlaneError::EntityNotFound(id))?;
        fields::write_field(entity, label, value)
    }

    fn ref_target_len(&self, target: RefTarget) -> usize {
        match target {
            RefTarget::EnemyPoints => self.course.enemy_points.len(),
            RefTarget::CheckpointGroups => self.course.checkpoint_groups.len(),
            RefTarget::Routes => self.course.routes.len(),
        }
    }

    // ---- selection ----

    pub fn set_selected(&mut self, id: EntityId, selected: bool) -> Result<()> {
        if !self.contains(id) {
            return Err(PitlaneError::EntityNotFound(id));
        }
        if selected {
            self.selection.insert(id);
        } else {
            self.selection.remove(&id);
        }
        Ok(())
    }

    /// Flip selection for an entity, returning the new state
    pub fn toggle_selected(&mut self, id: EntityId) -> Result<bool> {
        let now = !self.is_selected(id);
        self.set_selected(id, now)?;
        Ok(now)
    }

    pub fn is_selected(&self, id: EntityId) -> bool {
        self.selection.contains(&id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected ids, ascending
    pub fn selection(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.selection.iter().copied().collect();
        ids.sort();
        ids
    }
}

/// Shift entries of the flat collection `removed` belonged to
fn shift_flat(slot: Slot, removed: Slot) -> Option<Slot> {
    match (slot, removed) {
        (Slot::EnemyPoint(k), Slot::EnemyPoint(i)) if k > i => Some(Slot::EnemyPoint(k - 1)),
        (Slot::MapObject(k), Slot::MapObject(i)) if k > i => Some(Slot::MapObject(k - 1)),
        (Slot::KartStartPoint(k), Slot::KartStartPoint(i)) if k > i => {
            Some(Slot::KartStartPoint(k - 1))
        }
        (Slot::Area(k), Slot::Area(i)) if k > i => Some(Slot::Area(k - 1)),
        (Slot::Camera(k), Slot::Camera(i)) if k > i => Some(Slot::Camera(k - 1)),
        (Slot::LightParam(k), Slot::LightParam(i)) if k > i => Some(Slot::LightParam(k - 1)),
        (Slot::MgEntry(k), Slot::MgEntry(i)) if k > i => Some(Slot::MgEntry(k - 1)),
        _ => None,
    }
}
