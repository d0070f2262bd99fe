//! Pitlane Viewer - viewport frame building and mouse picking
//!
//! Walks the visible entities of a course each frame to produce draw and
//! pick lists, decodes the read-back pick image into entity ids, and writes
//! the resulting selection back into the graph.

pub mod picking;
pub mod selection;
pub mod viewport;

pub use picking::{decode_color, encode_id, PickBuffer, PickColor, BACKGROUND, MAX_PICK_ID};
pub use selection::{apply_pick, SelectMode};
pub use viewport::{Viewport, Visibility};
