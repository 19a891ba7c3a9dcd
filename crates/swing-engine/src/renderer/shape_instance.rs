use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::components::shape::{Color, Shape, ShapeComponent};

/// Per-instance data for the shell's 2D shape renderer.
/// 16 floats = 64 bytes per instance.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ShapeInstance {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    /// 0 = circle, 1 = box.
    pub kind: f32,
    /// Circle: radius in both. Box: width and height.
    pub width: f32,
    pub height: f32,
    pub fill: [f32; 4],
    pub stroke: [f32; 4],
    pub stroke_width: f32,
    pub _pad: f32,
}

impl ShapeInstance {
    pub const FLOATS: usize = 16;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub const KIND_CIRCLE: f32 = 0.0;
    pub const KIND_BOX: f32 = 1.0;

    pub fn from_component(pos: Vec2, rotation: f32, shape: &ShapeComponent) -> Self {
        let (kind, width, height) = match shape.shape {
            Shape::Circle { radius } => (Self::KIND_CIRCLE, radius, radius),
            Shape::Box { width, height } => (Self::KIND_BOX, width, height),
        };
        Self {
            x: pos.x,
            y: pos.y,
            rotation,
            kind,
            width,
            height,
            fill: shape.fill.to_array(),
            stroke: shape.stroke.to_array(),
            stroke_width: shape.stroke_width,
            _pad: 0.0,
        }
    }
}

/// Instances written each frame, read by the shell after `tick`.
pub struct ShapeBuffer {
    instances: Vec<ShapeInstance>,
    max: usize,
}

impl ShapeBuffer {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(max: usize) -> Self {
        Self {
            instances: Vec::with_capacity(max),
            max,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Append an instance. Instances past capacity are dropped.
    pub fn push(&mut self, instance: ShapeInstance) {
        if self.instances.len() < self.max {
            self.instances.push(instance);
        }
    }

    pub fn draw_circle(&mut self, pos: Vec2, radius: f32, color: Color) {
        self.push(ShapeInstance::from_component(
            pos,
            0.0,
            &ShapeComponent::circle(radius, color),
        ));
    }

    pub fn draw_box(&mut self, pos: Vec2, size: Vec2, rotation: f32, color: Color) {
        self.push(ShapeInstance::from_component(
            pos,
            rotation,
            &ShapeComponent::rect(size.x, size.y, color),
        ));
    }

    pub fn instances(&self) -> &[ShapeInstance] {
        &self.instances
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for ShapeBuffer {
    fn default() -> Self {
        Self::new()
    }
}
