//! Entity renderer - turns course entities into draw and pick commands
//!
//! Every public draw goes through one push/pop scope on the transform stack,
//! so sibling entities never inherit each other's transforms and the stack
//! depth after a call always equals the depth before it.

use crate::draw_list::{DrawList, PickList};
use crate::registry::{ModelHandle, ModelRegistry};
use crate::transform_stack::TransformStack;
use pitlane_core::math::mat4_transform_point;
use pitlane_core::{authoring_scale_to_world, authoring_to_world, Mat4, Vec3};
use pitlane_course::{Checkpoint, EntityRef, MarkerKind, ObjectNameTable, Visual};

/// Height of the emitter-radius cylinder glyph
pub const EMITTER_HEIGHT: f32 = 50.0;

const CHECKPOINT_LINE: [f32; 4] = [1.0, 0.85, 0.1, 1.0];
const FACING_LINE: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Facing indicator drawn on generic placeholders, in model space
const FACING_STRIP: [Vec3; 3] = [
    Vec3::new(0.0, 0.0, 750.0),
    Vec3::ZERO,
    Vec3::new(1000.0, 0.0, 0.0),
];

pub struct EntityRenderer<'a> {
    registry: &'a ModelRegistry,
    names: &'a ObjectNameTable,
    stack: TransformStack,
}

impl<'a> EntityRenderer<'a> {
    pub fn new(registry: &'a ModelRegistry, names: &'a ObjectNameTable) -> Self {
        Self {
            registry,
            names,
            stack: TransformStack::new(),
        }
    }

    pub fn registry(&self) -> &'a ModelRegistry {
        self.registry
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    /// Draw one entity with selection highlighting.
    ///
    /// Order inside the scope: translate (axis-swapped), emitter glyph in its
    /// own scope, rotate, scale, then the resolved model.
    pub fn render_entity(&mut self, entity: EntityRef<'_>, selected: bool, list: &mut DrawList) {
        if let EntityRef::Checkpoint(checkpoint) = entity {
            self.render_checkpoint(checkpoint, selected, list);
            return;
        }
        let (Some(visual), Some(position)) = (entity.visual(self.names), entity.position()) else {
            return;
        };

        let registry = self.registry;
        let emit_radius = entity.emit_radius();
        self.stack.scoped(|stack| {
            stack.translate(authoring_to_world(position));

            if let Some(radius) = emit_radius {
                stack.scoped(|stack| {
                    stack.scale(Vec3::new(radius / 2.0, radius / 2.0, EMITTER_HEIGHT));
                    list.push_model(registry.cylinder(), stack.top(), false, false);
                });
            }

            apply_orientation(stack, &entity);
            let model = stack.top();

            match visual {
                Visual::Named(name) => match registry.lookup(&name) {
                    Some(handle) => {
                        list.push_model(handle, model, registry.is_textured(handle), selected)
                    }
                    None => list.push_model(registry.fallback(), model, false, selected),
                },
                Visual::Marker(kind) => list.push_model(registry.marker(kind), model, false, selected),
                Visual::Generic => {
                    list.push_model(registry.fallback(), model, false, selected);
                    push_local_strip(list, &model, &FACING_STRIP, FACING_LINE);
                }
            }
        });
    }

    /// Draw one entity as flat `color` for the pick pass. Same transforms as
    /// [`Self::render_entity`], without the emitter glyph or overlays.
    pub fn render_entity_pick_mode(&mut self, entity: EntityRef<'_>, color: [u8; 4], list: &mut PickList) {
        if let EntityRef::Checkpoint(checkpoint) = entity {
            let marker = self.registry.marker(MarkerKind::Red);
            for end in [checkpoint.start, checkpoint.end] {
                let model = self.placed(end);
                list.push(marker, model, color);
            }
            return;
        }
        let (Some(visual), Some(position)) = (entity.visual(self.names), entity.position()) else {
            return;
        };

        let handle = self.visual_handle(&visual);
        self.stack.scoped(|stack| {
            stack.translate(authoring_to_world(position));
            apply_orientation(stack, &entity);
            list.push(handle, stack.top(), color);
        });
    }

    /// Checkpoints are a red marker at each end joined by a line
    fn render_checkpoint(&mut self, checkpoint: &Checkpoint, selected: bool, list: &mut DrawList) {
        let marker = self.registry.marker(MarkerKind::Red);
        for end in [checkpoint.start, checkpoint.end] {
            let model = self.placed(end);
            list.push_model(marker, model, false, selected);
        }
        let color = if selected {
            self.registry.config().display.highlight_color.to_array()
        } else {
            CHECKPOINT_LINE
        };
        self.draw_line(checkpoint.start, checkpoint.end, color, list);
    }

    fn visual_handle(&self, visual: &Visual) -> ModelHandle {
        match visual {
            Visual::Named(name) => self.registry.resolve(name),
            Visual::Marker(kind) => self.registry.marker(*kind),
            Visual::Generic => self.registry.fallback(),
        }
    }

    /// World matrix of a bare authoring-space position
    fn placed(&mut self, position: Vec3) -> Mat4 {
        self.stack.scoped(|stack| {
            stack.translate(authoring_to_world(position));
            stack.top()
        })
    }

    /// Unit sphere at `position`, uniformly scaled
    pub fn draw_sphere(&mut self, position: Vec3, scale: f32, list: &mut DrawList) {
        let handle = self.registry.sphere();
        self.stack.scoped(|stack| {
            stack.translate(authoring_to_world(position));
            stack.scale(Vec3::new(scale, scale, scale));
            list.push_model(handle, stack.top(), false, false);
        });
    }

    /// Unit cylinder standing on `position`, `height` along world up
    pub fn draw_cylinder(&mut self, position: Vec3, radius: f32, height: f32, list: &mut DrawList) {
        let handle = self.registry.cylinder();
        self.stack.scoped(|stack| {
            stack.translate(authoring_to_world(position));
            stack.scale(Vec3::new(radius, radius, height));
            list.push_model(handle, stack.top(), false, false);
        });
    }

    /// Arrow head at `to`, pointing away from `from` along the ground plane
    pub fn draw_arrow_head(&mut self, from: Vec3, to: Vec3, list: &mut DrawList) {
        let handle = self.registry.arrow_head();
        let scale = self.registry.config().display.arrow_scale;
        let heading = ground_heading(from, to);
        self.stack.scoped(|stack| {
            stack.translate(authoring_to_world(to));
            stack.multiply(&heading);
            stack.scale(Vec3::new(scale, scale, scale));
            list.push_model(handle, stack.top(), false, false);
        });
    }

    /// Line between two authoring-space points
    pub fn draw_line(&mut self, from: Vec3, to: Vec3, color: [f32; 4], list: &mut DrawList) {
        let top = self.stack.top();
        list.push_line(
            mat4_transform_point(&top, authoring_to_world(from)),
            mat4_transform_point(&top, authoring_to_world(to)),
            color,
        );
    }
}

/// Stored rotation, then scale in world axes
fn apply_orientation(stack: &mut TransformStack, entity: &EntityRef<'_>) {
    if let Some(rotation) = entity.rotation() {
        stack.multiply(&rotation.matrix());
    }
    if let Some(scale) = entity.scale() {
        stack.scale(authoring_scale_to_world(scale));
    }
}

/// Rotation about world up turning +X toward `to - from` seen from above.
/// A vertical or zero direction keeps +X.
fn ground_heading(from: Vec3, to: Vec3) -> Mat4 {
    let dir = authoring_to_world(to - from);
    let flat = Vec3::new(dir.x, dir.y, 0.0);
    let (c, s) = if flat.length() > f32::EPSILON {
        let n = flat.normalized();
        (n.x, n.y)
    } else {
        (1.0, 0.0)
    };
    [
        [c, s, 0.0, 0.0],
        [-s, c, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

fn push_local_strip(list: &mut DrawList, model: &Mat4, points: &[Vec3], color: [f32; 4]) {
    for pair in points.windows(2) {
        list.push_line(
            mat4_transform_point(model, pair[0]),
            mat4_transform_point(model, pair[1]),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;
    use pitlane_core::math::mat4_origin;
    use pitlane_core::Rotation;
    use pitlane_course::{
        Area, Camera, CheckpointGroup, CourseGraph, EnemyPoint, KartStartPoint, LightParam,
        MapObject, MgEntry, Route, RoutePoint, EMIT_RADIUS_PARAM,
    };

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    fn names() -> ObjectNameTable {
        ObjectNameTable::from_pairs([("GeoItemBox", 1), ("GeoCannon", 7)])
    }

    /// A graph holding one entity of every kind
    fn every_kind() -> CourseGraph {
        let mut graph = CourseGraph::new();
        let group = graph.add_checkpoint_group(CheckpointGroup::default()).unwrap();
        graph.add_enemy_point(EnemyPoint::new(Vec3::new(1.0, 2.0, 3.0), 0)).unwrap();
        graph
            .add_checkpoint(group, Checkpoint::new(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0)))
            .unwrap();
        let route = graph.add_route(Route::default());
        graph.add_route_point(route, RoutePoint::default()).unwrap();
        let mut object = MapObject::new(Vec3::new(5.0, 6.0, 7.0), 1);
        object.rotation = Rotation::new(10.0, 20.0, 30.0);
        object.params.insert(EMIT_RADIUS_PARAM.to_string(), 400.0);
        graph.add_object(object).unwrap();
        graph.add_object(MapObject::new(Vec3::ZERO, 9999)).unwrap();
        graph.add_start_point(KartStartPoint::new(Vec3::ZERO));
        graph.add_area(Area::new(Vec3::ZERO)).unwrap();
        graph.add_camera(Camera::new(Vec3::ZERO)).unwrap();
        graph.add_light_param(LightParam::default());
        graph.add_mg_entry(MgEntry::default());
        graph
    }

    #[test]
    fn test_axis_convention() {
        let registry = ModelRegistry::new(RegistryConfig::default());
        let names = names();
        let mut renderer = EntityRenderer::new(&registry, &names);
        let point = EnemyPoint::new(Vec3::new(1.0, 2.0, 3.0), 0);

        let mut list = DrawList::new();
        renderer.render_entity(EntityRef::EnemyPoint(&point), false, &mut list);
        assert_eq!(list.commands.len(), 1);
        assert_eq!(mat4_origin(&list.commands[0].model), Vec3::new(1.0, -3.0, 2.0));
        assert_eq!(list.commands[0].handle, registry.marker(MarkerKind::Plain));
    }

    #[test]
    fn test_stack_balanced_for_every_kind() {
        let registry = ModelRegistry::new(RegistryConfig::default());
        let names = names();
        let graph = every_kind();
        let mut renderer = EntityRenderer::new(&registry, &names);

        for (id, entity) in graph.iter() {
            let mut list = DrawList::new();
            renderer.render_entity(entity, true, &mut list);
            assert_eq!(renderer.stack_depth(), 0, "render_entity left stack unbalanced for {:?}", entity.kind());

            let mut picks = PickList::new();
            renderer.render_entity_pick_mode(entity, [0, 0, id.raw() as u8, 255], &mut picks);
            assert_eq!(renderer.stack_depth(), 0);
        }

        let mut list = DrawList::new();
        renderer.draw_sphere(Vec3::ZERO, 2.0, &mut list);
        renderer.draw_cylinder(Vec3::ZERO, 2.0, 3.0, &mut list);
        renderer.draw_arrow_head(Vec3::ZERO, Vec3::X, &mut list);
        renderer.draw_line(Vec3::ZERO, Vec3::X, [1.0; 4], &mut list);
        assert_eq!(renderer.stack_depth(), 0);
        assert_eq!(list.commands.len(), 3);
        assert_eq!(list.lines.len(), 1);
    }

    #[test]
    fn test_repeated_render_is_identical() {
        let registry = ModelRegistry::new(RegistryConfig::default());
        let names = names();
        let graph = every_kind();
        let mut renderer = EntityRenderer::new(&registry, &names);

        let mut first = DrawList::new();
        let mut second = DrawList::new();
        for (_, entity) in graph.iter() {
            renderer.render_entity(entity, false, &mut first);
        }
        for (_, entity) in graph.iter() {
            renderer.render_entity(entity, false, &mut second);
        }
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_positional_kinds_draw_nothing() {
        let registry = ModelRegistry::new(RegistryConfig::default());
        let names = names();
        let mut renderer = EntityRenderer::new(&registry, &names);
        let mut list = DrawList::new();
        let mut picks = PickList::new();

        let group = CheckpointGroup::default();
        let route = Route::default();
        let light = LightParam::default();
        let mg = MgEntry::default();
        for entity in [
            EntityRef::CheckpointGroup(&group),
            EntityRef::Route(&route),
            EntityRef::LightParam(&light),
            EntityRef::MgEntry(&mg),
        ] {
            renderer.render_entity(entity, false, &mut list);
            renderer.render_entity_pick_mode(entity, [1, 2, 3, 255], &mut picks);
        }
        assert!(list.is_empty());
        assert!(picks.is_empty());
    }

    #[test]
    fn test_unmapped_object_draws_untextured_fallback() {
        let mut registry = ModelRegistry::new(RegistryConfig::default());
        let names = names();
        let cannon = MapObject::new(Vec3::ZERO, 7);
        let unknown = MapObject::new(Vec3::ZERO, 9999);

        {
            let mut renderer = EntityRenderer::new(&registry, &names);
            let mut list = DrawList::new();
            renderer.render_entity(EntityRef::MapObject(&cannon), true, &mut list);
            renderer.render_entity(EntityRef::MapObject(&unknown), false, &mut list);
            for command in &list.commands {
                assert_eq!(command.handle, registry.fallback());
                assert!(!command.textured);
            }
            assert!(list.commands[0].selected);
        }

        // A mesh registered later is picked up by the next render
        let handle = registry.register_mesh_text("GeoCannon", TRIANGLE).unwrap();
        let mut renderer = EntityRenderer::new(&registry, &names);
        let mut list = DrawList::new();
        renderer.render_entity(EntityRef::MapObject(&cannon), false, &mut list);
        assert_eq!(list.commands[0].handle, handle);
    }

    #[test]
    fn test_emitter_cylinder_in_own_scope() {
        let registry = ModelRegistry::new(RegistryConfig::default());
        let names = names();
        let mut renderer = EntityRenderer::new(&registry, &names);

        let mut object = MapObject::new(Vec3::new(10.0, 20.0, 30.0), 1);
        object.rotation = Rotation::new(0.0, 90.0, 0.0);
        object.params.insert(EMIT_RADIUS_PARAM.to_string(), 400.0);

        let mut list = DrawList::new();
        renderer.render_entity(EntityRef::MapObject(&object), false, &mut list);
        assert_eq!(list.commands.len(), 2);

        let glyph = &list.commands[0];
        assert_eq!(glyph.handle, registry.cylinder());
        // Unrotated, scaled (r/2, r/2, 50)
        assert_eq!(glyph.model[0][0], 200.0);
        assert_eq!(glyph.model[1][1], 200.0);
        assert_eq!(glyph.model[2][2], EMITTER_HEIGHT);
        assert_eq!(mat4_origin(&glyph.model), Vec3::new(10.0, -30.0, 20.0));

        // The model itself is rotated 90 degrees about world Z and not scaled by the glyph
        let body = &list.commands[1];
        let x_axis = mat4_transform_point(&body.model, Vec3::X) - mat4_origin(&body.model);
        assert!(approx(x_axis, Vec3::Y));
    }

    #[test]
    fn test_zero_radius_has_no_glyph() {
        let registry = ModelRegistry::new(RegistryConfig::default());
        let names = names();
        let mut renderer = EntityRenderer::new(&registry, &names);
        let mut object = MapObject::new(Vec3::ZERO, 1);
        object.params.insert(EMIT_RADIUS_PARAM.to_string(), 0.0);

        let mut list = DrawList::new();
        renderer.render_entity(EntityRef::MapObject(&object), false, &mut list);
        assert_eq!(list.commands.len(), 1);
    }

    #[test]
    fn test_scale_applied_in_world_axes() {
        let registry = ModelRegistry::new(RegistryConfig::default());
        let names = names();
        let mut renderer = EntityRenderer::new(&registry, &names);
        let mut object = MapObject::new(Vec3::ZERO, 1);
        object.scale = Vec3::new(1.0, 2.0, 3.0);

        let mut list = DrawList::new();
        renderer.render_entity(EntityRef::MapObject(&object), false, &mut list);
        let m = list.commands[0].model;
        assert_eq!((m[0][0], m[1][1], m[2][2]), (1.0, 3.0, 2.0));
    }

    #[test]
    fn test_pick_mode_matches_normal_transforms() {
        let registry = ModelRegistry::new(RegistryConfig::default());
        let names = names();
        let graph = every_kind();
        let mut renderer = EntityRenderer::new(&registry, &names);

        for (_, entity) in graph.iter() {
            let mut list = DrawList::new();
            let mut picks = PickList::new();
            renderer.render_entity(entity, false, &mut list);
            renderer.render_entity_pick_mode(entity, [9, 8, 7, 255], &mut picks);

            let drawn: Vec<_> = list
                .commands
                .iter()
                .filter(|c| c.handle != registry.cylinder())
                .map(|c| (c.handle, c.model))
                .collect();
            let picked: Vec<_> = picks.draws.iter().map(|p| (p.handle, p.model)).collect();
            assert_eq!(drawn, picked, "pick transforms differ for {:?}", entity.kind());
            assert!(picks.draws.iter().all(|p| p.color == [9, 8, 7, 255]));
        }
    }

    #[test]
    fn test_checkpoint_draws_both_ends_and_line() {
        let registry = ModelRegistry::new(RegistryConfig::default());
        let names = names();
        let mut renderer = EntityRenderer::new(&registry, &names);
        let checkpoint = Checkpoint::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(100.0, 0.0, 50.0));

        let mut list = DrawList::new();
        renderer.render_entity(EntityRef::Checkpoint(&checkpoint), false, &mut list);
        assert_eq!(list.commands.len(), 2);
        assert_eq!(mat4_origin(&list.commands[1].model), Vec3::new(100.0, -50.0, 0.0));
        assert_eq!(list.lines.len(), 1);
        assert_eq!(list.lines[0].to, Vec3::new(100.0, -50.0, 0.0));
    }

    #[test]
    fn test_arrow_head_orientation_and_scale() {
        let registry = ModelRegistry::new(RegistryConfig::default());
        let names = names();
        let mut renderer = EntityRenderer::new(&registry, &names);

        // Authoring +Z is world -Y
        let mut list = DrawList::new();
        renderer.draw_arrow_head(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), &mut list);
        let m = list.commands[0].model;
        assert_eq!(mat4_origin(&m), Vec3::new(0.0, -10.0, 0.0));
        let forward = mat4_transform_point(&m, Vec3::X) - mat4_origin(&m);
        assert!(approx(forward, Vec3::new(0.0, -300.0, 0.0)));
    }

    #[test]
    fn test_generic_visual_gets_facing_strip() {
        let registry = ModelRegistry::new(RegistryConfig::default());
        let names = names();
        let mut renderer = EntityRenderer::new(&registry, &names);
        let start = KartStartPoint::new(Vec3::ZERO);

        let mut list = DrawList::new();
        renderer.render_entity(EntityRef::KartStartPoint(&start), false, &mut list);
        assert_eq!(list.commands[0].handle, registry.fallback());
        assert_eq!(list.lines.len(), 2);
    }
}
