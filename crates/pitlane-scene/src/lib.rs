//! Pitlane Scene - TOML course snapshots
//!
//! Loads and saves a course's entity collections as a TOML document. Entity
//! ids are session identity and are never written.

mod format;
mod loader;
mod saver;

pub use format::{CourseFile, CourseMetadata};
pub use loader::{load_course, load_course_string};
pub use saver::{graph_to_course_file, save_course, save_course_string};
