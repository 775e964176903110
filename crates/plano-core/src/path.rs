//! Path steps and drawing commands
//!
//! A shape's geometry is declared as a list of [`PathStep`]s and compiled
//! into [`PathCommand`]s. Each command keeps its immutable source points
//! plus render points that are reset to the source and re-transformed by
//! the node chain every update.

use crate::math::Vector;

/// Handle-length fraction for the single-cubic quarter-arc approximation.
/// Tuned for visual fidelity; not a generic arc conversion. Keep exact.
pub const ARC_HANDLE_LENGTH: f64 = 9.0 / 16.0;

/// Drawing instruction tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move,
    Line,
    Bezier,
    /// Rounded corner: corner point plus end point, rendered as one cubic
    /// Bezier anchored on the previous command's endpoint.
    Arc,
}

/// One declarative path entry.
#[derive(Debug, Clone, PartialEq)]
pub enum PathStep {
    /// Bare point: a line segment (the first step of a path always compiles
    /// to a move regardless).
    Point(Vector),
    Move(Vector),
    Line(Vector),
    /// Two control points then the endpoint.
    Bezier([Vector; 3]),
    /// Corner point then endpoint.
    Arc([Vector; 2]),
}

impl PathStep {
    pub fn point(x: f64, y: f64, z: f64) -> Self {
        PathStep::Point(Vector::new(x, y, z))
    }

    /// Point on the xy drawing plane.
    pub fn xy(x: f64, y: f64) -> Self {
        PathStep::Point(Vector::new(x, y, 0.0))
    }
}

impl From<Vector> for PathStep {
    fn from(point: Vector) -> Self {
        PathStep::Point(point)
    }
}

/// A compiled drawing instruction.
#[derive(Debug, Clone)]
pub struct PathCommand {
    command: Command,
    points: Vec<Vector>,
    render_points: Vec<Vector>,
}

impl PathCommand {
    pub fn new(command: Command, points: Vec<Vector>) -> Self {
        let render_points = points.clone();
        Self { command, points, render_points }
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn render_points(&self) -> &[Vector] {
        &self.render_points
    }

    /// The point the pen rests on after this command.
    pub fn end_render_point(&self) -> Vector {
        *self.render_points.last().expect("path command has at least one point")
    }

    /// Restore render points to the source points.
    pub(crate) fn reset(&mut self) {
        self.render_points.copy_from_slice(&self.points);
    }

    pub(crate) fn transform(&mut self, translation: Vector, rotation: Vector, scale: Vector) {
        for point in &mut self.render_points {
            point.transform(translation, rotation, scale);
        }
    }

    /// Bezier control points for an arc command, derived fresh every render
    /// from the previous endpoint and the current corner/end render points.
    pub fn arc_control_points(&self, previous: Vector) -> (Vector, Vector) {
        let corner = self.render_points[0];
        let end = self.render_points[1];
        let mut cp0 = previous;
        cp0.lerp(corner, ARC_HANDLE_LENGTH);
        let mut cp1 = end;
        cp1.lerp(corner, ARC_HANDLE_LENGTH);
        (cp0, cp1)
    }
}

/// Compile a declarative path. The first step always becomes a move; an
/// empty path compiles to a single move at the origin so every shape has a
/// well-defined endpoint.
pub fn compile_path(steps: &[PathStep]) -> Vec<PathCommand> {
    if steps.is_empty() {
        return vec![PathCommand::new(Command::Move, vec![Vector::ZERO])];
    }
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let (command, points) = match step {
                PathStep::Point(p) | PathStep::Line(p) => (Command::Line, vec![*p]),
                PathStep::Move(p) => (Command::Move, vec![*p]),
                PathStep::Bezier(pts) => (Command::Bezier, pts.to_vec()),
                PathStep::Arc(pts) => (Command::Arc, pts.to_vec()),
            };
            let command = if i == 0 { Command::Move } else { command };
            PathCommand::new(command, points)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_first_step_becomes_move() {
        let commands = compile_path(&[PathStep::xy(1.0, 2.0), PathStep::xy(3.0, 4.0)]);
        assert_eq!(commands[0].command(), Command::Move);
        assert_eq!(commands[1].command(), Command::Line);
    }

    #[test]
    fn test_empty_path_compiles_to_origin_move() {
        let commands = compile_path(&[]);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].command(), Command::Move);
        assert!(commands[0].end_render_point().is_same(Vector::ZERO));
    }

    #[test]
    fn test_arc_control_points_are_nine_sixteenths_lerps() {
        // non-trivial triple: previous endpoint, corner, end
        let previous = Vector::new(2.0, -1.0, 0.5);
        let corner = Vector::new(4.0, 3.0, 0.0);
        let end = Vector::new(1.0, 5.0, -2.0);
        let command = PathCommand::new(Command::Arc, vec![corner, end]);

        let (cp0, cp1) = command.arc_control_points(previous);
        let k = ARC_HANDLE_LENGTH;
        assert_abs_diff_eq!(cp0.x, (corner.x - previous.x) * k + previous.x);
        assert_abs_diff_eq!(cp0.y, (corner.y - previous.y) * k + previous.y);
        assert_abs_diff_eq!(cp0.z, (corner.z - previous.z) * k + previous.z);
        assert_abs_diff_eq!(cp1.x, (corner.x - end.x) * k + end.x);
        assert_abs_diff_eq!(cp1.y, (corner.y - end.y) * k + end.y);
        assert_abs_diff_eq!(cp1.z, (corner.z - end.z) * k + end.z);
    }

    #[test]
    fn test_reset_restores_source_points() {
        let mut command = PathCommand::new(Command::Line, vec![Vector::new(1.0, 1.0, 1.0)]);
        command.transform(Vector::new(5.0, 0.0, 0.0), Vector::ZERO, Vector::ONE);
        assert_abs_diff_eq!(command.end_render_point().x, 6.0);
        command.reset();
        assert!(command.end_render_point().is_same(Vector::new(1.0, 1.0, 1.0)));
    }
}
