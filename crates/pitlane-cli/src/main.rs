//! Pitlane CLI - inspect, check and render racing-course files

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, delete, inspect, pick, render, select, ViewArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pitlane")]
#[command(about = "Course editor core: inspect, validate, render and pick course entities", long_about = None)]
#[command(version)]
struct Cli {
    /// Registry configuration file (defaults to pitlane.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List a course's entities, or the fields of one entity
    Inspect {
        /// Path to course file
        course: PathBuf,

        /// Show the field table of this entity id
        #[arg(long)]
        id: Option<u32>,
    },

    /// Report dangling cross-references and unknown object codes
    Check {
        /// Path to course file
        course: PathBuf,

        /// Exit with an error if any issue is found
        #[arg(long)]
        strict: bool,
    },

    /// Render a course to a PNG image (headless)
    Render {
        /// Path to course file
        course: PathBuf,

        /// Output image path
        #[arg(short, long, default_value = "course.png")]
        output: PathBuf,

        /// Entity ids to draw highlighted
        #[arg(long, value_delimiter = ',')]
        selected: Vec<u32>,

        /// Also write the pick target to this path
        #[arg(long)]
        pick_output: Option<PathBuf>,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Report the entity under a pixel
    Pick {
        /// Path to course file
        course: PathBuf,

        /// Pixel column
        x: u32,

        /// Pixel row, 0 at the top
        y: u32,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Delete an entity and repair references to it
    Delete {
        /// Path to course file
        course: PathBuf,

        /// Entity id to delete
        id: u32,

        /// Write the result here instead of overwriting the course
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Apply a click at a pixel to a selection and print the result
    Select {
        /// Path to course file
        course: PathBuf,

        /// Pixel column
        x: u32,

        /// Pixel row, 0 at the top
        y: u32,

        /// Entity ids selected before the click
        #[arg(long, value_delimiter = ',')]
        selected: Vec<u32>,

        /// Toggle the hit entity instead of replacing the selection
        #[arg(long)]
        toggle: bool,

        #[command(flatten)]
        view: ViewArgs,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Inspect { course, id } => inspect::run(&course, id, config),
        Commands::Check { course, strict } => check::run(&course, strict, config),
        Commands::Render {
            course,
            output,
            selected,
            pick_output,
            view,
        } => render::run(render::RenderArgs {
            course,
            output,
            selected,
            pick_output,
            view,
            config: cli.config.clone(),
        }),
        Commands::Pick { course, x, y, view } => pick::run(&course, x, y, &view, config),
        Commands::Delete { course, id, output } => delete::run(&course, id, output.as_deref()),
        Commands::Select {
            course,
            x,
            y,
            selected,
            toggle,
            view,
        } => select::run(select::SelectArgs {
            course,
            x,
            y,
            selected,
            toggle,
            view,
            config: cli.config.clone(),
        }),
    }
}
