//! Headless course-to-PNG render command

use super::{Gpu, Session, ViewArgs};
use anyhow::{Context, Result};
use pitlane_viewer::Viewport;
use std::path::PathBuf;

pub struct RenderArgs {
    pub course: PathBuf,
    pub output: PathBuf,
    pub selected: Vec<u32>,
    pub pick_output: Option<PathBuf>,
    pub view: ViewArgs,
    pub config: Option<PathBuf>,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let mut session = Session::open(&args.course, args.config.as_deref())?;
    session.preselect(&args.selected)?;

    let viewport = Viewport::new();
    let camera = session.camera(&viewport, &args.view);
    let gpu = Gpu::new(&args.view, &session.registry)?;
    let ctx = &gpu.ctx;

    let list = viewport.build_draw_list(&session.graph, &session.registry, &session.names);
    log::info!("{} model draws, {} lines", list.commands.len(), list.lines.len());
    gpu.frame
        .render(&ctx.device, &ctx.queue, &camera, &list, &ctx.color_view, &ctx.depth_view);

    let pixels = ctx.read_pixels().context("Failed to read rendered pixels")?;
    let img = image::RgbaImage::from_raw(ctx.width, ctx.height, pixels)
        .context("Failed to create image from pixel data")?;
    img.save(&args.output)
        .with_context(|| format!("Failed to save image to {}", args.output.display()))?;
    println!("Rendered {}x{} image to {}", ctx.width, ctx.height, args.output.display());

    if let Some(path) = &args.pick_output {
        let buffer = gpu.pick(&session, &viewport, &camera)?;
        let img = image::RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.into_pixels())
            .context("Failed to create image from pick data")?;
        img.save(path)
            .with_context(|| format!("Failed to save pick image to {}", path.display()))?;
        println!("Wrote pick target to {}", path.display());
    }

    Ok(())
}
