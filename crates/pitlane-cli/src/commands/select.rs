//! Click-to-select against a headless pick pass

use super::{check_pixel, Gpu, Session, ViewArgs};
use anyhow::Result;
use pitlane_viewer::{apply_pick, SelectMode, Viewport};
use std::path::PathBuf;

pub struct SelectArgs {
    pub course: PathBuf,
    pub x: u32,
    pub y: u32,
    pub selected: Vec<u32>,
    pub toggle: bool,
    pub view: ViewArgs,
    pub config: Option<PathBuf>,
}

pub fn run(args: SelectArgs) -> Result<()> {
    check_pixel(&args.view, args.x, args.y)?;
    let mut session = Session::open(&args.course, args.config.as_deref())?;
    session.preselect(&args.selected)?;

    let viewport = Viewport::new();
    let camera = session.camera(&viewport, &args.view);
    let gpu = Gpu::new(&args.view, &session.registry)?;
    let hit = gpu.pick(&session, &viewport, &camera)?.entity_at(args.x, args.y);

    let mode = if args.toggle {
        SelectMode::Toggle
    } else {
        SelectMode::Replace
    };
    apply_pick(&mut session.graph, hit, mode)?;

    let selection = session.graph.selection();
    if selection.is_empty() {
        println!("Selection: (empty)");
    } else {
        let ids: Vec<String> = selection.iter().map(|id| id.to_string()).collect();
        println!("Selection: {}", ids.join(", "));
    }
    Ok(())
}
