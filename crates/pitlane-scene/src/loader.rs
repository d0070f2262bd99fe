//! Course loading from TOML files

use crate::format::{CourseFile, CourseMetadata};
use pitlane_core::Result;
use pitlane_course::CourseGraph;
use std::fs;
use std::path::Path;

/// Load a course from a TOML file
pub fn load_course<P: AsRef<Path>>(path: P) -> Result<(CourseGraph, CourseMetadata)> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let loaded = load_course_string(&content)?;
    log::info!(
        "Loaded course '{}' from {} ({} entities)",
        loaded.1.name,
        path.display(),
        loaded.0.len()
    );
    Ok(loaded)
}

/// Load a course from a TOML string
pub fn load_course_string(content: &str) -> Result<(CourseGraph, CourseMetadata)> {
    let file: CourseFile = toml::from_str(content)?;
    let graph = CourseGraph::from_parts(file.data);

    for issue in graph.check_references() {
        log::warn!("{}", issue);
    }

    Ok((graph, file.course))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitlane_course::{EntityKind, IndexRef};

    #[test]
    fn test_load_course_string() {
        let toml = r#"
[course]
name = "Luigi Circuit"

[[checkpoint_groups]]
group_link = 0
prev_groups = [-1, -1, -1, -1]
next_groups = [-1, -1, -1, -1]

[[checkpoint_groups.points]]
start = { x = 0.0, y = 0.0, z = 0.0 }
end = { x = 100.0, y = 0.0, z = 0.0 }

[[enemy_points]]
position = { x = 1.0, y = 2.0, z = 3.0 }
group = 0
link = -1
scale = 800.0

[[objects]]
position = { x = 10.0, y = 0.0, z = -5.0 }
object_id = 1
params = { mEmitRadius = 250.0 }
"#;

        let (graph, meta) = load_course_string(toml).unwrap();
        assert_eq!(meta.name, "Luigi Circuit");
        assert_eq!(meta.version, "1.0");
        assert_eq!(graph.len(), 4);

        let kinds: Vec<EntityKind> = graph.iter().map(|(_, e)| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                EntityKind::EnemyPoint,
                EntityKind::CheckpointGroup,
                EntityKind::Checkpoint,
                EntityKind::MapObject
            ]
        );

        let ep = graph.course().enemy_points[0].clone();
        assert_eq!(ep.link, IndexRef::NONE);
        assert_eq!(ep.scale, 800.0);

        let obj = &graph.course().objects[0];
        assert_eq!(obj.params.get("mEmitRadius"), Some(&250.0));
        assert_eq!(obj.path_id, IndexRef::NONE);
        assert_eq!(obj.userdata, [0; 8]);
    }

    #[test]
    fn test_load_keeps_out_of_range_references() {
        let toml = r#"
[course]
name = "broken"

[[objects]]
position = { x = 0.0, y = 0.0, z = 0.0 }
object_id = 4
path_id = 12
"#;
        let (graph, _) = load_course_string(toml).unwrap();
        assert_eq!(graph.course().objects[0].path_id, IndexRef(12));
        assert_eq!(graph.check_references().len(), 1);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        assert!(load_course_string("[course\nname=").is_err());
        // missing metadata table
        assert!(load_course_string("[[objects]]\nobject_id = 1").is_err());
    }
}
