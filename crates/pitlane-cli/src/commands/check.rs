//! Reference and object-code validation

use super::Session;
use anyhow::{bail, Result};
use std::path::Path;

pub fn run(course: &Path, strict: bool, config: Option<&Path>) -> Result<()> {
    let session = Session::open(course, config)?;
    let graph = &session.graph;

    let issues = graph.check_references();
    let unknown = graph.unknown_object_codes(&session.names);

    if issues.is_empty() && unknown.is_empty() {
        println!("No issues found in '{}'.", session.meta.name);
        return Ok(());
    }

    if !issues.is_empty() {
        println!("Dangling references ({}):", issues.len());
        for issue in &issues {
            println!("  {}", issue);
        }
    }

    if !unknown.is_empty() {
        if session.names.is_empty() {
            log::warn!("Object name table is empty; every object code is reported as unknown");
        }
        println!("Unknown object codes ({}):", unknown.len());
        for (id, code) in &unknown {
            println!("  MapObject {}: object_id = {} is INVALID", id, code);
        }
    }

    let total = issues.len() + unknown.len();
    if strict {
        bail!("{} issue(s) found", total);
    }
    println!("\n{} issue(s) found.", total);
    Ok(())
}
