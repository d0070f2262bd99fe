//! Pitlane Course - The course entity graph
//!
//! Holds the typed entities of one racing course (enemy paths, checkpoints,
//! routes, objects, cameras, areas, start points) with their cross-references,
//! and the compile-time field tables editing panels bind to.

mod course;
mod entities;
mod entity;
pub mod fields;
mod graph;
mod names;

pub use course::Course;
pub use entities::{
    Area, Camera, Checkpoint, CheckpointGroup, EnemyPoint, IndexRef, KartStartPoint, LightParam,
    MapObject, MgEntry, RawParams, Route, RoutePoint, EMIT_RADIUS_PARAM,
};
pub use entity::{EntityKind, EntityMut, EntityRef, MarkerKind, Visual};
pub use fields::{field_table, FieldKind, FieldSpec, FieldTable, FieldValue, RefTarget};
pub use graph::{CourseGraph, ReferenceIssue, Slot};
pub use names::{ObjectNameTable, INVALID_LABEL};
