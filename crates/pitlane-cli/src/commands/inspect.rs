//! Course listing and per-entity field dump

use super::Session;
use anyhow::{Context, Result};
use pitlane_core::EntityId;
use std::path::Path;

pub fn run(course: &Path, id: Option<u32>, config: Option<&Path>) -> Result<()> {
    let session = Session::open(course, config)?;
    let graph = &session.graph;

    if let Some(raw) = id {
        let id = EntityId::from_raw(raw);
        let kind = graph
            .kind(id)
            .with_context(|| format!("No entity with id {}", raw))?;
        println!("{} {}", kind.name(), id);
        let rows = graph.field_rows(id, &session.names)?;
        if rows.is_empty() {
            println!("  (no editable fields)");
        }
        for (label, value) in rows {
            println!("  {:<24} {}", label, value);
        }
        return Ok(());
    }

    println!("Course: {} (v{})", session.meta.name, session.meta.version);
    if let Some(description) = &session.meta.description {
        println!("  {}", description);
    }
    println!("Entities: {}", graph.len());

    for (id, entity) in graph.iter() {
        let name = entity.type_name(&session.names);
        match entity.position() {
            Some(p) => println!(
                "  {:>6}  {:<16} {:<24} ({:.1}, {:.1}, {:.1})",
                id.to_string(),
                entity.kind().name(),
                name,
                p.x,
                p.y,
                p.z
            ),
            None => println!("  {:>6}  {:<16} {}", id.to_string(), entity.kind().name(), name),
        }
    }
    Ok(())
}
