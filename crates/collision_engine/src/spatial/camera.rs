//! Camera region consumed by the broad-phase

use serde::{Serialize, Deserialize};

use crate::physics::collision::Aabb;

/// Extra room kept around the viewport on each side
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferMargins {
    /// Margin left of the viewport
    pub left: f32,
    /// Margin above the viewport
    pub top: f32,
    /// Margin right of the viewport
    pub right: f32,
    /// Margin below the viewport
    pub bottom: f32,
}

impl BufferMargins {
    /// Same margin on every side
    pub fn uniform(margin: f32) -> Self {
        Self { left: margin, top: margin, right: margin, bottom: margin }
    }
}

/// Camera viewport plus per-side buffers, refreshed by the game once per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraRegion {
    /// Left edge of the viewport
    pub left: f32,
    /// Top edge of the viewport
    pub top: f32,
    /// Viewport width
    pub width: f32,
    /// Viewport height
    pub height: f32,
    /// Buffer around the viewport
    #[serde(default)]
    pub buffer: BufferMargins,
}

impl CameraRegion {
    /// Viewport without buffers
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height, buffer: BufferMargins::default() }
    }

    /// Replace the buffers
    pub fn with_buffer(mut self, buffer: BufferMargins) -> Self {
        self.buffer = buffer;
        self
    }

    /// Same buffer on every side
    pub fn with_uniform_buffer(self, margin: f32) -> Self {
        self.with_buffer(BufferMargins::uniform(margin))
    }

    /// Move the viewport, keeping its size and buffers
    pub fn move_to(&mut self, left: f32, top: f32) {
        self.left = left;
        self.top = top;
    }

    /// Bounds of the bare viewport
    pub fn viewport(&self) -> Aabb {
        Aabb::from_edges(self.left, self.top, self.left + self.width, self.top + self.height)
    }

    /// Bounds of the viewport grown by its buffers
    pub fn query_aabb(&self) -> Aabb {
        self.viewport()
            .expanded(self.buffer.left, self.buffer.top, self.buffer.right, self.buffer.bottom)
    }
}
