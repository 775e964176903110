//! Draw-op emission
//!
//! Walks the sorted flat list and turns each drawable into backend calls.
//! Run `update_graph` first; rendering reads the render-space state the
//! update pass produced.

mod backend;
pub(crate) mod surfaces;

pub use backend::{DisplayListBackend, DrawOp, RenderBackend};

use uuid::Uuid;

use crate::error::{SceneError, SceneResult};
use crate::math::{TAU, Vector};
use crate::paint::PaintRef;
use crate::path::{ARC_HANDLE_LENGTH, Command};
use crate::scene::{Node, NodeKind, Scene, ShapeData, SolidExtra};

impl Scene {
    /// Emit draw ops for everything below `root`, back to front.
    pub fn render_graph(
        &mut self,
        root: Uuid,
        backend: &mut impl RenderBackend,
    ) -> SceneResult<()> {
        if !self.contains(root) {
            return Err(SceneError::NodeNotFound(root));
        }
        self.ensure_flat(root);
        let items = self.flat_graph_of(root).to_vec();
        for id in items {
            self.render_item(id, backend)?;
        }
        Ok(())
    }

    fn render_item(&self, id: Uuid, backend: &mut impl RenderBackend) -> SceneResult<()> {
        let node = self.get(id)?;
        match &node.kind {
            // transform holders and composite roots draw nothing themselves
            NodeKind::Anchor | NodeKind::Composite(_) => Ok(()),
            NodeKind::Shape(shape) => self.render_shape(node, shape, backend),
            NodeKind::Group(group) => {
                if !group.visible {
                    return Ok(());
                }
                surfaces::render_group_surface(self, group, backend)?;
                for item in node.flat_graph.clone() {
                    self.render_item(item, backend)?;
                }
                Ok(())
            }
        }
    }

    fn render_shape(
        &self,
        node: &Node,
        shape: &ShapeData,
        backend: &mut impl RenderBackend,
    ) -> SceneResult<()> {
        if !shape.style.visible || shape.commands.is_empty() {
            return Ok(());
        }
        // solid silhouettes draw under their base, and regardless of the
        // base's own backface setting
        match shape.solid {
            SolidExtra::None => {}
            SolidExtra::Cone { apex, .. } => {
                surfaces::render_cone_surface(self, node, shape, apex, backend)?;
            }
            SolidExtra::Hemisphere { .. } => {
                surfaces::render_dome(self, node, shape, backend)?;
            }
        }
        if shape.style.backface.is_hidden() && shape.is_facing_back() {
            return Ok(());
        }
        let paint = self.resolve_paint(shape.render_paint())?;
        let line_width = shape.style.line_width();
        if shape.commands.len() == 1 {
            let center = shape.commands[0].end_render_point();
            render_dot(center, line_width, paint, backend);
            return Ok(());
        }
        render_path(shape, backend);
        backend.stroke(line_width > 0.0, paint, line_width);
        backend.fill(shape.style.fill, paint);
        backend.end_element();
        Ok(())
    }
}

fn render_path(shape: &ShapeData, backend: &mut impl RenderBackend) {
    backend.begin_path();
    let mut previous = Vector::ZERO;
    for command in shape.commands() {
        let points = command.render_points();
        match command.command() {
            Command::Move => backend.move_to(points[0]),
            Command::Line => backend.line_to(points[0]),
            Command::Bezier => backend.curve_to(points[0], points[1], points[2]),
            Command::Arc => {
                let (cp0, cp1) = command.arc_control_points(previous);
                backend.curve_to(cp0, cp1, points[1]);
            }
        }
        previous = command.end_render_point();
    }
    // a bare two-point line stays open no matter what
    let is_two_point_line =
        shape.commands().len() == 2 && shape.commands()[1].command() == Command::Line;
    if shape.style.closed && !is_two_point_line {
        backend.close_path();
    }
}

/// Filled circle of diameter `line_width`, as four quarter-turn Beziers.
/// Stands in for single-point paths, which some surfaces cannot stroke.
fn render_dot(
    center: Vector,
    line_width: f64,
    paint: PaintRef<'_>,
    backend: &mut impl RenderBackend,
) {
    if line_width <= 0.0 {
        return;
    }
    let radius = line_width / 2.0;
    backend.begin_path();
    backend.move_to(circle_point(center, radius, 0.0));
    for quarter in 0..4 {
        let start_angle = quarter as f64 / 4.0 * TAU;
        let end_angle = start_angle + TAU / 4.0;
        let (cp0, cp1, end) = quarter_arc(center, radius, start_angle, end_angle);
        backend.curve_to(cp0, cp1, end);
    }
    backend.fill(true, paint);
    backend.end_element();
}

pub(crate) fn circle_point(center: Vector, radius: f64, angle: f64) -> Vector {
    Vector::new(center.x + angle.cos() * radius, center.y + angle.sin() * radius, center.z)
}

/// Cubic approximation of a quarter circle, with the same 9/16 handle rule
/// arc path commands use: both control points pull toward the corner of the
/// bounding square.
pub(crate) fn quarter_arc(
    center: Vector,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
) -> (Vector, Vector, Vector) {
    let start = circle_point(center, radius, start_angle);
    let end = circle_point(center, radius, end_angle);
    let corner = Vector::new(
        center.x + start_angle.cos() * radius + end_angle.cos() * radius,
        center.y + start_angle.sin() * radius + end_angle.sin() * radius,
        center.z,
    );
    let mut cp0 = start;
    cp0.lerp(corner, ARC_HANDLE_LENGTH);
    let mut cp1 = end;
    cp1.lerp(corner, ARC_HANDLE_LENGTH);
    (cp0, cp1, end)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::{DisplayListBackend, DrawOp};
    use crate::math::{TAU, Vector};
    use crate::paint::Backface;
    use crate::scene::{Placement, Scene, Style};
    use crate::shapes::{EllipseOptions, ShapeOptions};

    fn ops_of(scene: &mut Scene, root: uuid::Uuid) -> Vec<DrawOp> {
        let mut backend = DisplayListBackend::new();
        scene.update_graph(root).unwrap();
        scene.render_graph(root, &mut backend).unwrap();
        backend.ops().to_vec()
    }

    #[test]
    fn unit_ellipse_renders_four_arc_beziers() {
        let mut scene = Scene::new();
        let ellipse = scene.add_ellipse(None, EllipseOptions::default()).unwrap();
        let ops = ops_of(&mut scene, ellipse);

        let curves: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::CurveTo { end, .. } => Some(*end),
                _ => None,
            })
            .collect();
        assert_eq!(curves.len(), 4);
        let expected = [(0.5, 0.0), (0.0, 0.5), (-0.5, 0.0), (0.0, -0.5)];
        for (end, (x, y)) in curves.iter().zip(expected) {
            assert_relative_eq!(end.x, x, epsilon = 1e-9);
            assert_relative_eq!(end.y, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn hidden_backface_stops_and_resumes_draw_ops() {
        let mut scene = Scene::new();
        let shape = scene
            .add_shape(
                None,
                ShapeOptions {
                    path: vec![
                        crate::path::PathStep::xy(-1.0, 0.0),
                        crate::path::PathStep::xy(1.0, 0.0),
                        crate::path::PathStep::xy(0.0, 1.0),
                    ],
                    style: Style { backface: Backface::Hidden, ..Default::default() },
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!ops_of(&mut scene, shape).is_empty());

        // past a quarter turn the face points away
        scene.node_mut(shape).unwrap().rotate.y = TAU / 4.0 + 0.1;
        assert!(ops_of(&mut scene, shape).is_empty());

        scene.node_mut(shape).unwrap().rotate.y = 0.0;
        assert!(!ops_of(&mut scene, shape).is_empty());
    }

    #[test]
    fn backface_paint_substitutes_when_facing_back() {
        let mut scene = Scene::new();
        let shape = scene
            .add_shape(
                None,
                ShapeOptions {
                    path: vec![
                        crate::path::PathStep::xy(-1.0, 0.0),
                        crate::path::PathStep::xy(1.0, 0.0),
                        crate::path::PathStep::xy(0.0, 1.0),
                    ],
                    style: Style {
                        backface: Backface::Painted("#e62".into()),
                        fill: true,
                        ..Default::default()
                    },
                    ..Default::default()
                },
            )
            .unwrap();
        scene.node_mut(shape).unwrap().rotate.y = TAU / 2.0;
        let ops = ops_of(&mut scene, shape);
        let fill = ops.iter().find_map(|op| match op {
            DrawOp::Fill { paint: crate::paint::Paint::Color(color) } => Some(color.as_str()),
            _ => None,
        });
        assert_eq!(fill, Some("#e62"));
    }

    #[test]
    fn single_point_shape_renders_filled_dot() {
        let mut scene = Scene::new();
        let dot = scene
            .add_shape(
                None,
                ShapeOptions {
                    style: Style { stroke: 4.0, ..Default::default() },
                    ..Default::default()
                },
            )
            .unwrap();
        let ops = ops_of(&mut scene, dot);
        let curves = ops.iter().filter(|op| matches!(op, DrawOp::CurveTo { .. })).count();
        assert_eq!(curves, 4);
        assert!(ops.iter().any(|op| matches!(op, DrawOp::Fill { .. })));
        assert!(!ops.iter().any(|op| matches!(op, DrawOp::Stroke { .. })));
        // dot lands on the circle of radius stroke/2
        let DrawOp::MoveTo(start) = ops[1] else { panic!("expected move") };
        assert_relative_eq!(start.x, 2.0);
    }

    #[test]
    fn two_point_line_never_closes() {
        let mut scene = Scene::new();
        let line = scene
            .add_shape(
                None,
                ShapeOptions {
                    path: vec![
                        crate::path::PathStep::xy(0.0, 0.0),
                        crate::path::PathStep::xy(5.0, 0.0),
                    ],
                    style: Style { closed: true, ..Default::default() },
                    ..Default::default()
                },
            )
            .unwrap();
        let ops = ops_of(&mut scene, line);
        assert!(!ops.iter().any(|op| matches!(op, DrawOp::ClosePath)));
    }
}
