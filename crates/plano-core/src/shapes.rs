//! Flat shape builders
//!
//! Every builder creates one node in the arena and returns its id. Options
//! structs carry the full parameter set with drawing-friendly defaults, so
//! call sites only name what they change.

use uuid::Uuid;

use crate::error::SceneResult;
use crate::math::Vector;
use crate::path::PathStep;
use crate::scene::{Form, GroupData, Node, NodeKind, Placement, Scene, ShapeData, Style};

/// Path step generators for the parametric shapes. All paths live on the
/// xy plane, y pointing down.
pub mod forms {
    use crate::math::TAU;
    use crate::path::PathStep;

    pub fn rect_path(width: f64, height: f64) -> Vec<PathStep> {
        let x = width / 2.0;
        let y = height / 2.0;
        vec![
            PathStep::xy(-x, -y),
            PathStep::xy(x, -y),
            PathStep::xy(x, y),
            PathStep::xy(-x, y),
        ]
    }

    /// Rect with quarter-circle corners. The radius is clamped to the short
    /// side; straight runs that collapse to nothing are dropped.
    pub fn rounded_rect_path(width: f64, height: f64, corner_radius: f64) -> Vec<PathStep> {
        let x_a = width / 2.0;
        let y_a = height / 2.0;
        let radius = corner_radius.min(x_a.min(y_a));
        let x_b = x_a - radius;
        let y_b = y_a - radius;

        let mut path = vec![
            PathStep::xy(x_b, -y_a),
            arc_xy(x_a, -y_a, x_a, -y_b),
        ];
        if y_b != 0.0 {
            path.push(PathStep::xy(x_a, y_b));
        }
        path.push(arc_xy(x_a, y_a, x_b, y_a));
        if x_b != 0.0 {
            path.push(PathStep::xy(-x_b, y_a));
        }
        path.push(arc_xy(-x_a, y_a, -x_a, y_b));
        if y_b != 0.0 {
            path.push(PathStep::xy(-x_a, -y_b));
        }
        path.push(arc_xy(-x_a, -y_a, -x_b, -y_a));
        if x_b != 0.0 {
            path.push(PathStep::xy(x_b, -y_a));
        }
        path
    }

    /// One to four quarter arcs, clockwise from the top.
    pub fn ellipse_path(width: f64, height: f64, quarters: u32) -> Vec<PathStep> {
        let x = width / 2.0;
        let y = height / 2.0;
        let mut path = vec![
            PathStep::xy(0.0, -y),
            arc_xy(x, -y, x, 0.0),
        ];
        if quarters > 1 {
            path.push(arc_xy(x, y, 0.0, y));
        }
        if quarters > 2 {
            path.push(arc_xy(-x, y, -x, 0.0));
        }
        if quarters > 3 {
            path.push(arc_xy(-x, -y, 0.0, -y));
        }
        path
    }

    /// Regular polygon with the first vertex straight up.
    pub fn polygon_path(sides: u32, radius: f64) -> Vec<PathStep> {
        (0..sides)
            .map(|i| {
                let theta = i as f64 / sides as f64 * TAU - TAU / 4.0;
                PathStep::xy(theta.cos() * radius, theta.sin() * radius)
            })
            .collect()
    }

    fn arc_xy(corner_x: f64, corner_y: f64, end_x: f64, end_y: f64) -> PathStep {
        PathStep::Arc([
            crate::math::Vector::new(corner_x, corner_y, 0.0),
            crate::math::Vector::new(end_x, end_y, 0.0),
        ])
    }
}

#[derive(Debug, Clone)]
pub struct ShapeOptions {
    pub place: Placement,
    pub path: Vec<PathStep>,
    /// Direction the shape faces, for backface culling.
    pub front: Vector,
    pub style: Style,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self {
            place: Placement::default(),
            // a bare shape is a dot at its origin
            path: vec![PathStep::point(0.0, 0.0, 0.0)],
            front: Vector::unit_z(),
            style: Style::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RectOptions {
    pub place: Placement,
    pub width: f64,
    pub height: f64,
    pub style: Style,
}

impl Default for RectOptions {
    fn default() -> Self {
        Self { place: Placement::default(), width: 1.0, height: 1.0, style: Style::default() }
    }
}

#[derive(Debug, Clone)]
pub struct RoundedRectOptions {
    pub place: Placement,
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    pub style: Style,
}

impl Default for RoundedRectOptions {
    fn default() -> Self {
        Self {
            place: Placement::default(),
            width: 1.0,
            height: 1.0,
            corner_radius: 0.25,
            style: Style { closed: false, ..Default::default() },
        }
    }
}

#[derive(Debug, Clone)]
pub struct EllipseOptions {
    pub place: Placement,
    pub diameter: f64,
    /// Overrides the diameter on its axis.
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// 1 to 4 quarter arcs, clockwise from the top.
    pub quarters: u32,
    pub style: Style,
}

impl Default for EllipseOptions {
    fn default() -> Self {
        Self {
            place: Placement::default(),
            diameter: 1.0,
            width: None,
            height: None,
            quarters: 4,
            style: Style { closed: false, ..Default::default() },
        }
    }
}

#[derive(Debug, Clone)]
pub struct PolygonOptions {
    pub place: Placement,
    pub sides: u32,
    pub radius: f64,
    pub style: Style,
}

impl Default for PolygonOptions {
    fn default() -> Self {
        Self { place: Placement::default(), sides: 3, radius: 0.5, style: Style::default() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GroupOptions {
    pub place: Placement,
    /// Re-sort contents every update.
    pub update_sort: bool,
}

impl Scene {
    /// Invisible transform holder.
    pub fn add_anchor(&mut self, parent: Option<Uuid>, place: Placement) -> SceneResult<Uuid> {
        self.insert(Node::new(NodeKind::Anchor, place), parent)
    }

    pub fn add_group(&mut self, parent: Option<Uuid>, options: GroupOptions) -> SceneResult<Uuid> {
        let data = GroupData { update_sort: options.update_sort, ..Default::default() };
        self.insert(Node::new(NodeKind::Group(data), options.place), parent)
    }

    /// Free-form path shape.
    pub fn add_shape(&mut self, parent: Option<Uuid>, options: ShapeOptions) -> SceneResult<Uuid> {
        let data = ShapeData::new(Form::Path(options.path), options.front, options.style);
        self.insert(Node::new(NodeKind::Shape(data), options.place), parent)
    }

    pub fn add_rect(&mut self, parent: Option<Uuid>, options: RectOptions) -> SceneResult<Uuid> {
        let form = Form::Rect { width: options.width, height: options.height };
        self.add_form(parent, form, options.style, options.place)
    }

    pub fn add_rounded_rect(
        &mut self,
        parent: Option<Uuid>,
        options: RoundedRectOptions,
    ) -> SceneResult<Uuid> {
        let form = Form::RoundedRect {
            width: options.width,
            height: options.height,
            corner_radius: options.corner_radius,
        };
        self.add_form(parent, form, options.style, options.place)
    }

    pub fn add_ellipse(
        &mut self,
        parent: Option<Uuid>,
        options: EllipseOptions,
    ) -> SceneResult<Uuid> {
        let form = Form::Ellipse {
            diameter: options.diameter,
            width: options.width,
            height: options.height,
            quarters: options.quarters.clamp(1, 4),
        };
        self.add_form(parent, form, options.style, options.place)
    }

    pub fn add_polygon(
        &mut self,
        parent: Option<Uuid>,
        options: PolygonOptions,
    ) -> SceneResult<Uuid> {
        let form = Form::Polygon { sides: options.sides.max(3), radius: options.radius };
        self.add_form(parent, form, options.style, options.place)
    }

    fn add_form(
        &mut self,
        parent: Option<Uuid>,
        form: Form,
        style: Style,
        place: Placement,
    ) -> SceneResult<Uuid> {
        let data = ShapeData::new(form, Vector::unit_z(), style);
        self.insert(Node::new(NodeKind::Shape(data), place), parent)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::forms;
    use crate::path::{Command, PathStep, compile_path};

    #[test]
    fn unit_ellipse_is_four_arcs() {
        let steps = forms::ellipse_path(1.0, 1.0, 4);
        assert_eq!(steps.len(), 5);
        let arcs = steps.iter().filter(|step| matches!(step, PathStep::Arc(_))).count();
        assert_eq!(arcs, 4);
        // quarter endpoints sit on the axes at half the diameter
        let PathStep::Arc([corner, end]) = steps[1] else { panic!("expected arc") };
        assert_relative_eq!(corner.x, 0.5);
        assert_relative_eq!(corner.y, -0.5);
        assert_relative_eq!(end.x, 0.5);
        assert_relative_eq!(end.y, 0.0);
    }

    #[test]
    fn half_ellipse_stops_at_the_bottom() {
        let steps = forms::ellipse_path(2.0, 2.0, 2);
        assert_eq!(steps.len(), 3);
        let PathStep::Arc([_, end]) = steps[2] else { panic!("expected arc") };
        assert_relative_eq!(end.x, 0.0);
        assert_relative_eq!(end.y, 1.0);
    }

    #[test]
    fn rounded_rect_clamps_radius_to_short_side() {
        // radius 5 on a 2x1 rect clamps to 0.5: the short sides collapse
        // and their straight runs disappear
        let steps = forms::rounded_rect_path(2.0, 1.0, 5.0);
        let straight_runs =
            steps.iter().filter(|step| matches!(step, PathStep::Point(_))).count();
        // the start point plus the two long-side runs
        assert_eq!(straight_runs, 3);
        let arcs = steps.iter().filter(|step| matches!(step, PathStep::Arc(_))).count();
        assert_eq!(arcs, 4);
    }

    #[test]
    fn polygon_first_vertex_points_up() {
        let steps = forms::polygon_path(4, 1.0);
        assert_eq!(steps.len(), 4);
        let PathStep::Point(first) = steps[0] else { panic!("expected point") };
        assert_relative_eq!(first.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(first.y, -1.0);
    }

    #[test]
    fn rect_compiles_to_move_then_lines() {
        let commands = compile_path(&forms::rect_path(2.0, 2.0));
        assert_eq!(commands.len(), 4);
        assert_eq!(commands[0].command(), Command::Move);
        assert!(commands[1..].iter().all(|c| c.command() == Command::Line));
    }
}
