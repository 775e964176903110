//! Renderer backend contract
//!
//! The core emits ordered draw ops per drawable element, one element at a
//! time, in depth-sort order, with already-projected coordinates. Backends
//! never see texture ids; paints arrive resolved. The core never queries
//! pixel state back.

use crate::math::Vector;
use crate::paint::{Paint, PaintRef};

/// Fixed draw-op surface every backend implements. Points are render-space;
/// backends read only x and y.
pub trait RenderBackend {
    fn begin_path(&mut self);
    fn move_to(&mut self, point: Vector);
    fn line_to(&mut self, point: Vector);
    fn curve_to(&mut self, cp0: Vector, cp1: Vector, end: Vector);
    fn close_path(&mut self);
    /// No-op when `enabled` is false or `width` is 0.
    fn stroke(&mut self, enabled: bool, paint: PaintRef<'_>, width: f64);
    /// No-op when `enabled` is false.
    fn fill(&mut self, enabled: bool, paint: PaintRef<'_>);
    /// Closes the current element; every path gets exactly one.
    fn end_element(&mut self);
}

/// One recorded draw op.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    BeginPath,
    MoveTo(Vector),
    LineTo(Vector),
    CurveTo { cp0: Vector, cp1: Vector, end: Vector },
    ClosePath,
    Stroke { paint: Paint, width: f64 },
    Fill { paint: Paint },
    EndElement,
}

/// Retained reference backend: records the op stream instead of drawing.
/// The test suite inspects it; immediate-mode backends mirror its behavior.
#[derive(Debug, Default)]
pub struct DisplayListBackend {
    ops: Vec<DrawOp>,
}

impl DisplayListBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Ops split per element, for element-level assertions.
    pub fn elements(&self) -> Vec<&[DrawOp]> {
        self.ops.split_inclusive(|op| *op == DrawOp::EndElement).collect()
    }
}

impl RenderBackend for DisplayListBackend {
    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn move_to(&mut self, point: Vector) {
        self.ops.push(DrawOp::MoveTo(point));
    }

    fn line_to(&mut self, point: Vector) {
        self.ops.push(DrawOp::LineTo(point));
    }

    fn curve_to(&mut self, cp0: Vector, cp1: Vector, end: Vector) {
        self.ops.push(DrawOp::CurveTo { cp0, cp1, end });
    }

    fn close_path(&mut self) {
        self.ops.push(DrawOp::ClosePath);
    }

    fn stroke(&mut self, enabled: bool, paint: PaintRef<'_>, width: f64) {
        if !enabled || width <= 0.0 {
            return;
        }
        self.ops.push(DrawOp::Stroke { paint: paint.to_paint(), width });
    }

    fn fill(&mut self, enabled: bool, paint: PaintRef<'_>) {
        if !enabled {
            return;
        }
        self.ops.push(DrawOp::Fill { paint: paint.to_paint() });
    }

    fn end_element(&mut self) {
        self.ops.push(DrawOp::EndElement);
    }
}
