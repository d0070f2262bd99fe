//! Retained per-frame draw state produced by the entity renderer

use crate::registry::ModelHandle;
use pitlane_core::{Mat4, Vec3};

/// One model draw in the normal pass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    pub handle: ModelHandle,
    /// World matrix (column-major)
    pub model: Mat4,
    /// Sample the model's texture; false draws vertex colours only
    pub textured: bool,
    pub selected: bool,
}

/// A world-space line segment
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineSegment {
    pub from: Vec3,
    pub to: Vec3,
    pub color: [f32; 4],
}

/// Everything the normal pass draws this frame
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
    pub lines: Vec<LineSegment>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.lines.is_empty()
    }

    pub fn push_model(&mut self, handle: ModelHandle, model: Mat4, textured: bool, selected: bool) {
        self.commands.push(DrawCommand {
            handle,
            model,
            textured,
            selected,
        });
    }

    pub fn push_line(&mut self, from: Vec3, to: Vec3, color: [f32; 4]) {
        self.lines.push(LineSegment { from, to, color });
    }
}

/// One flat-coloured draw in the pick pass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickDraw {
    pub handle: ModelHandle,
    pub model: Mat4,
    /// RGBA8 id colour written verbatim to the pick target
    pub color: [u8; 4],
}

/// Everything the pick pass draws this frame
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PickList {
    pub draws: Vec<PickDraw>,
}

impl PickList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.draws.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    pub fn push(&mut self, handle: ModelHandle, model: Mat4, color: [u8; 4]) {
        self.draws.push(PickDraw {
            handle,
            model,
            color,
        });
    }
}
