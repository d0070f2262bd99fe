//! Headless pick at one pixel

use super::{check_pixel, Gpu, Session, ViewArgs};
use anyhow::Result;
use pitlane_viewer::Viewport;
use std::path::Path;

pub fn run(course: &Path, x: u32, y: u32, view: &ViewArgs, config: Option<&Path>) -> Result<()> {
    check_pixel(view, x, y)?;
    let session = Session::open(course, config)?;
    let viewport = Viewport::new();
    let camera = session.camera(&viewport, view);

    let gpu = Gpu::new(view, &session.registry)?;
    let buffer = gpu.pick(&session, &viewport, &camera)?;

    match buffer.entity_at(x, y) {
        Some(id) => {
            let entity = session.graph.get(id);
            let kind = entity.map(|e| e.kind().to_string()).unwrap_or_else(|| "?".into());
            let name = entity.map(|e| e.type_name(&session.names)).unwrap_or_default();
            println!("({}, {}) -> {} {} {}", x, y, kind, id, name);
        }
        None => println!("({}, {}) -> nothing", x, y),
    }
    Ok(())
}
