//! Course saving to TOML files

use crate::format::{CourseFile, CourseMetadata};
use pitlane_core::Result;
use pitlane_course::CourseGraph;
use std::fs;
use std::path::Path;

/// Save a course graph to a TOML file
pub fn save_course<P: AsRef<Path>>(
    path: P,
    graph: &CourseGraph,
    meta: &CourseMetadata,
) -> Result<()> {
    let content = save_course_string(graph, meta)?;
    fs::write(path.as_ref(), content)?;
    log::info!("Saved course '{}' to {}", meta.name, path.as_ref().display());
    Ok(())
}

/// Save a course graph to a TOML string
pub fn save_course_string(graph: &CourseGraph, meta: &CourseMetadata) -> Result<String> {
    let file = graph_to_course_file(graph, meta);
    let content = toml::to_string_pretty(&file)?;
    Ok(content)
}

/// Snapshot a CourseGraph into a CourseFile
pub fn graph_to_course_file(graph: &CourseGraph, meta: &CourseMetadata) -> CourseFile {
    CourseFile {
        course: meta.clone(),
        data: graph.course().clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{load_course, load_course_string};
    use pitlane_core::{Rotation, Vec3};
    use pitlane_course::{
        CheckpointGroup, EnemyPoint, IndexRef, MapObject, ObjectNameTable, Route, RoutePoint,
    };

    fn sample_graph() -> CourseGraph {
        let mut graph = CourseGraph::new();
        graph.add_checkpoint_group(CheckpointGroup::default()).unwrap();
        let mut ep = EnemyPoint::new(Vec3::new(1.0, 2.0, 3.0), 0);
        ep.unk2 = 0xBEEF;
        graph.add_enemy_point(ep).unwrap();
        graph.add_route(Route {
            unk1: 3,
            points: vec![RoutePoint {
                position: Vec3::new(5.0, 0.0, 5.0),
                unk: 77,
            }],
            ..Default::default()
        });
        graph
    }

    #[test]
    fn test_save_course_string() {
        let graph = sample_graph();
        let toml = save_course_string(&graph, &CourseMetadata::new("Test")).unwrap();
        assert!(toml.contains("[course]"));
        assert!(toml.contains("name = \"Test\""));
        assert!(toml.contains("enemy_points"));
    }

    #[test]
    fn test_unknown_object_code_round_trip() {
        let names = ObjectNameTable::from_pairs([("GeoItemBox", 1)]);
        let mut graph = sample_graph();
        let mut obj = MapObject::new(Vec3::new(-10.0, 4.5, 300.25), 9999);
        obj.userdata = [1, -2, 3, -4, 5, -6, 32767, -32768];
        obj.rotation = Rotation::new(0.0, 90.0, 0.0);
        obj.path_id = IndexRef::to(0);
        obj.params.insert("mEmitRadius".into(), 120.0);
        let id = graph.add_object(obj.clone()).unwrap();
        assert_eq!(names.label(graph.object(id).unwrap().object_id), "INVALID");

        let toml = save_course_string(&graph, &CourseMetadata::new("rt")).unwrap();
        let (reloaded, meta) = load_course_string(&toml).unwrap();

        assert_eq!(meta.name, "rt");
        assert_eq!(reloaded.course().objects[0], obj);
        assert_eq!(reloaded.course(), graph.course());
    }

    #[test]
    fn test_sentinel_groups_round_trip() {
        let graph = sample_graph();
        let toml = save_course_string(&graph, &CourseMetadata::new("groups")).unwrap();
        let (reloaded, _) = load_course_string(&toml).unwrap();

        let group = &reloaded.course().checkpoint_groups[0];
        assert!(group.prev_groups.iter().all(IndexRef::is_none));
        assert!(group.next_groups.iter().all(IndexRef::is_none));
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("course.toml");
        let graph = sample_graph();

        save_course(&path, &graph, &CourseMetadata::new("file")).unwrap();
        let (reloaded, _) = load_course(&path).unwrap();
        assert_eq!(reloaded.len(), graph.len());
        assert_eq!(reloaded.course().enemy_points[0].unk2, 0xBEEF);
        assert_eq!(reloaded.course().routes[0].points[0].unk, 77);
    }
}
