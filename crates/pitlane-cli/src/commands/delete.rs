//! Entity deletion with reference repair

use anyhow::{Context, Result};
use pitlane_core::EntityId;
use pitlane_scene::{load_course, save_course};
use std::path::Path;

pub fn run(course: &Path, id: u32, output: Option<&Path>) -> Result<()> {
    let (mut graph, meta) = load_course(course)
        .with_context(|| format!("Failed to load course {}", course.display()))?;

    let id = EntityId::from_raw(id);
    let kind = graph
        .kind(id)
        .with_context(|| format!("No entity with id {}", id))?;
    graph
        .delete(id)
        .with_context(|| format!("Failed to delete {} {}", kind, id))?;

    let target = output.unwrap_or(course);
    save_course(target, &graph, &meta)
        .with_context(|| format!("Failed to save course to {}", target.display()))?;

    println!("Deleted {} {}; saved {}", kind, id, target.display());
    Ok(())
}
