//! Per-frame draw and pick list building over the visible entities

use crate::picking::encode_id;
use pitlane_core::{authoring_to_world, Vec3};
use pitlane_course::{Course, CourseGraph, EntityKind, ObjectNameTable};
use pitlane_render::{DrawList, EntityRenderer, ModelRegistry, PickList};

const ENEMY_PATH: [f32; 4] = [0.9, 0.2, 0.2, 1.0];
const ENEMY_LINK: [f32; 4] = [0.9, 0.2, 0.9, 1.0];
const CHECKPOINT_PATH: [f32; 4] = [0.9, 0.75, 0.1, 1.0];
const ROUTE_PATH: [f32; 4] = [0.2, 0.4, 1.0, 1.0];

/// Which entity categories the viewport shows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visibility {
    pub enemy_points: bool,
    pub checkpoints: bool,
    pub routes: bool,
    pub objects: bool,
    pub start_points: bool,
    pub areas: bool,
    pub cameras: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            enemy_points: true,
            checkpoints: true,
            routes: true,
            objects: true,
            start_points: true,
            areas: true,
            cameras: true,
        }
    }
}

impl Visibility {
    pub fn shows(&self, kind: EntityKind) -> bool {
        match kind {
            EntityKind::EnemyPoint => self.enemy_points,
            EntityKind::CheckpointGroup | EntityKind::Checkpoint => self.checkpoints,
            EntityKind::Route | EntityKind::RoutePoint => self.routes,
            EntityKind::MapObject => self.objects,
            EntityKind::KartStartPoint => self.start_points,
            EntityKind::Area => self.areas,
            EntityKind::Camera => self.cameras,
            EntityKind::LightParam | EntityKind::MgEntry => false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Viewport {
    pub visibility: Visibility,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normal-pass draws for every visible entity, with path overlays
    pub fn build_draw_list(
        &self,
        graph: &CourseGraph,
        registry: &ModelRegistry,
        names: &ObjectNameTable,
    ) -> DrawList {
        let mut renderer = EntityRenderer::new(registry, names);
        let mut list = DrawList::new();

        for (id, entity) in graph.iter() {
            if self.visibility.shows(entity.kind()) {
                renderer.render_entity(entity, graph.is_selected(id), &mut list);
            }
        }

        let course = graph.course();
        if self.visibility.enemy_points {
            draw_enemy_paths(course, &mut renderer, &mut list);
        }
        if self.visibility.checkpoints {
            draw_checkpoint_paths(course, &mut renderer, &mut list);
        }
        if self.visibility.routes {
            draw_route_paths(course, &mut renderer, &mut list);
        }

        debug_assert_eq!(renderer.stack_depth(), 0);
        list
    }

    /// Pick-pass draws for every visible entity, coloured by id
    pub fn build_pick_list(
        &self,
        graph: &CourseGraph,
        registry: &ModelRegistry,
        names: &ObjectNameTable,
    ) -> PickList {
        let mut renderer = EntityRenderer::new(registry, names);
        let mut list = PickList::new();

        for (id, entity) in graph.iter() {
            if !self.visibility.shows(entity.kind()) {
                continue;
            }
            match encode_id(id.raw()) {
                Some(color) => renderer.render_entity_pick_mode(entity, color.to_rgba(), &mut list),
                None => log::warn!("Entity {} cannot be encoded for picking", id),
            }
        }
        list
    }

    /// World-space box around every visible entity anchor
    pub fn world_bounds(&self, graph: &CourseGraph) -> Option<(Vec3, Vec3)> {
        let mut points = graph
            .iter()
            .filter(|(_, e)| self.visibility.shows(e.kind()))
            .filter_map(|(_, e)| e.position())
            .map(authoring_to_world);

        let first = points.next()?;
        Some(points.fold((first, first), |(min, max), p| {
            (
                Vec3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z)),
                Vec3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z)),
            )
        }))
    }
}

/// Consecutive points of the same group form a path; `link` jumps between paths
fn draw_enemy_paths(course: &Course, renderer: &mut EntityRenderer<'_>, list: &mut DrawList) {
    let points = &course.enemy_points;
    for pair in points.windows(2) {
        if pair[0].group == pair[1].group {
            renderer.draw_line(pair[0].position, pair[1].position, ENEMY_PATH, list);
            renderer.draw_arrow_head(pair[0].position, pair[1].position, list);
        }
    }
    for (i, point) in points.iter().enumerate() {
        if let Some(target) = point.link.index().and_then(|j| points.get(j)) {
            if point.link.index() != Some(i) {
                renderer.draw_line(point.position, target.position, ENEMY_LINK, list);
            }
        }
    }
}

/// Midpoint chain inside each group, then an arrow to each next group
fn draw_checkpoint_paths(course: &Course, renderer: &mut EntityRenderer<'_>, list: &mut DrawList) {
    let groups = &course.checkpoint_groups;
    for group in groups {
        for pair in group.points.windows(2) {
            renderer.draw_line(pair[0].midpoint(), pair[1].midpoint(), CHECKPOINT_PATH, list);
        }

        let Some(last) = group.points.last() else {
            continue;
        };
        for next in group.next_indices() {
            // Dangling next-group references are reported by check_references, not drawn
            let Some(first) = groups.get(next).and_then(|g| g.points.first()) else {
                continue;
            };
            renderer.draw_line(last.midpoint(), first.midpoint(), CHECKPOINT_PATH, list);
            renderer.draw_arrow_head(last.midpoint(), first.midpoint(), list);
        }
    }
}

fn draw_route_paths(course: &Course, renderer: &mut EntityRenderer<'_>, list: &mut DrawList) {
    for route in &course.routes {
        for pair in route.points.windows(2) {
            renderer.draw_line(pair[0].position, pair[1].position, ROUTE_PATH, list);
            renderer.draw_arrow_head(pair[0].position, pair[1].position, list);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picking::{decode_color, PickColor};
    use pitlane_course::{
        Checkpoint, CheckpointGroup, EnemyPoint, IndexRef, MapObject, Route, RoutePoint,
    };
    use pitlane_render::RegistryConfig;

    fn registry() -> ModelRegistry {
        ModelRegistry::new(RegistryConfig::default())
    }

    fn sample_graph() -> CourseGraph {
        let mut graph = CourseGraph::new();
        let group = graph.add_checkpoint_group(CheckpointGroup::default()).unwrap();
        graph
            .add_checkpoint(group, Checkpoint::new(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0)))
            .unwrap();
        graph.add_enemy_point(EnemyPoint::new(Vec3::new(0.0, 0.0, 0.0), 0)).unwrap();
        graph.add_enemy_point(EnemyPoint::new(Vec3::new(500.0, 0.0, 0.0), 0)).unwrap();
        graph.add_object(MapObject::new(Vec3::new(0.0, 0.0, 1000.0), 1)).unwrap();
        graph
    }

    #[test]
    fn test_hidden_kinds_are_skipped() {
        let graph = sample_graph();
        let registry = registry();
        let names = ObjectNameTable::default();

        let mut viewport = Viewport::new();
        let all = viewport.build_pick_list(&graph, &registry, &names).draws.len();

        viewport.visibility.objects = false;
        let without_objects = viewport.build_pick_list(&graph, &registry, &names).draws.len();
        assert_eq!(without_objects, all - 1);
    }

    #[test]
    fn test_pick_colors_decode_to_entity_ids() {
        let graph = sample_graph();
        let registry = registry();
        let names = ObjectNameTable::default();
        let list = Viewport::new().build_pick_list(&graph, &registry, &names);

        assert!(!list.is_empty());
        for draw in &list.draws {
            let id = decode_color(PickColor::from_rgba(draw.color)).unwrap();
            assert!(graph.contains(pitlane_core::EntityId::from_raw(id)));
        }
    }

    #[test]
    fn test_selection_flag_reaches_draws() {
        let mut graph = sample_graph();
        let object = graph
            .ids()
            .into_iter()
            .find(|id| graph.kind(*id) == Some(EntityKind::MapObject))
            .unwrap();
        graph.set_selected(object, true).unwrap();

        let registry = registry();
        let names = ObjectNameTable::default();
        let list = Viewport::new().build_draw_list(&graph, &registry, &names);
        let selected: Vec<_> = list.commands.iter().filter(|c| c.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].handle, registry.fallback());
    }

    #[test]
    fn test_enemy_path_overlay() {
        let graph = sample_graph();
        let registry = registry();
        let names = ObjectNameTable::default();

        let mut viewport = Viewport::new();
        viewport.visibility.checkpoints = false;
        let list = viewport.build_draw_list(&graph, &registry, &names);

        let arrows = list
            .commands
            .iter()
            .filter(|c| c.handle == registry.arrow_head())
            .count();
        assert_eq!(arrows, 1);
        assert!(list.lines.iter().any(|l| l.color == ENEMY_PATH));
    }

    #[test]
    fn test_route_polyline() {
        let mut graph = CourseGraph::new();
        let route = graph.add_route(Route::default());
        for x in [0.0, 100.0, 200.0] {
            let point = RoutePoint {
                position: Vec3::new(x, 0.0, 0.0),
                ..Default::default()
            };
            graph.add_route_point(route, point).unwrap();
        }

        let registry = registry();
        let list = Viewport::new().build_draw_list(&graph, &registry, &ObjectNameTable::default());
        let route_lines = list.lines.iter().filter(|l| l.color == ROUTE_PATH).count();
        assert_eq!(route_lines, 2);
    }

    #[test]
    fn test_group_links_skip_sentinels_and_dangling() {
        // A dangling link can only arrive through a loaded course
        let mut group = CheckpointGroup::default();
        group.next_groups[0] = IndexRef(7);
        group.points.push(Checkpoint::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)));
        let mut course = Course::new();
        course.checkpoint_groups.push(group);
        let graph = CourseGraph::from_parts(course);

        let registry = registry();
        let list = Viewport::new().build_draw_list(&graph, &registry, &ObjectNameTable::default());
        assert!(list.commands.iter().all(|c| c.handle != registry.arrow_head()));
    }

    #[test]
    fn test_world_bounds_swaps_axes() {
        let graph = sample_graph();
        let (min, max) = Viewport::new().world_bounds(&graph).unwrap();
        // Authoring z = 1000 on the object becomes world -y
        assert_eq!(min.y, -1000.0);
        assert_eq!(max.x, 500.0);
        assert!(Viewport::new().world_bounds(&CourseGraph::new()).is_none());
    }
}
