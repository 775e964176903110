//! Solid silhouette surfaces
//!
//! Cones, cylinders, horns and funnels read the projected radii of their end
//! caps and the apparent displacement between cap centers, then place
//! tangent points for the connecting outline. When the tangent condition
//! fails the surface is suppressed for the frame and only the caps render.

use uuid::Uuid;

use crate::error::{SceneError, SceneResult};
use crate::math::{TAU, Vector};
use crate::render::{RenderBackend, circle_point, quarter_arc};
use crate::scene::{GroupData, GroupSurface, Node, Scene, ShapeData};

pub(crate) fn render_group_surface(
    scene: &Scene,
    group: &GroupData,
    backend: &mut impl RenderBackend,
) -> SceneResult<()> {
    match &group.surface {
        GroupSurface::None => Ok(()),
        GroupSurface::Cylinder { front_base, rear_base } => {
            render_cylinder_surface(scene, group, *front_base, *rear_base, backend)
        }
        GroupSurface::Horn {
            front_base,
            rear_base,
            front_diameter,
            rear_diameter,
            render_normal,
            ..
        } => render_horn_surface(
            scene,
            group,
            *front_base,
            *rear_base,
            *front_diameter,
            *rear_diameter,
            *render_normal,
            backend,
        ),
        GroupSurface::Funnel { front_base, rear_base } => {
            render_funnel_surface(scene, group, *front_base, *rear_base, backend)
        }
    }
}

/// Thick line between the cap centers, stroked at the projected cap
/// diameter plus the cap's own line width.
fn render_cylinder_surface(
    scene: &Scene,
    group: &GroupData,
    front_base: Uuid,
    rear_base: Uuid,
    backend: &mut impl RenderBackend,
) -> SceneResult<()> {
    let (front, front_shape) = cap_of(scene, front_base)?;
    let (rear, _) = cap_of(scene, rear_base)?;
    let scale = front_shape.render_normal.magnitude();
    let diameter = front_shape.form.diameter().unwrap_or(0.0);
    let width = diameter * scale + front_shape.style.line_width();

    let paint = scene.resolve_paint(&group.color)?;
    backend.begin_path();
    backend.move_to(front.render_origin);
    backend.line_to(rear.render_origin);
    backend.stroke(true, paint, width);
    backend.end_element();
    Ok(())
}

/// Tangent quad between two dot caps of different radii.
#[allow(clippy::too_many_arguments)]
fn render_horn_surface(
    scene: &Scene,
    group: &GroupData,
    front_base: Uuid,
    rear_base: Uuid,
    front_diameter: f64,
    rear_diameter: f64,
    render_normal: Vector,
    backend: &mut impl RenderBackend,
) -> SceneResult<()> {
    let (front, _) = cap_of(scene, front_base)?;
    let (rear, _) = cap_of(scene, rear_base)?;
    let scale = render_normal.magnitude();
    let front_radius = front_diameter / 2.0 * scale;
    let rear_radius = rear_diameter / 2.0 * scale;

    let mut apex = rear.render_origin;
    apex.subtract(front.render_origin);
    let apex_distance = apex.magnitude_2d();
    // caps swallow the surface when one projects inside the other
    if apex_distance <= (rear_radius - front_radius).abs() {
        return Ok(());
    }

    let angle = apex.y.atan2(apex.x);
    let spread = ((front_radius - rear_radius) / apex_distance).acos();
    let front_a = circle_point(front.render_origin, front_radius, angle + spread);
    let rear_a = circle_point(rear.render_origin, rear_radius, angle + spread);
    let rear_b = circle_point(rear.render_origin, rear_radius, angle - spread);
    let front_b = circle_point(front.render_origin, front_radius, angle - spread);

    let paint = scene.resolve_paint(&group.color)?;
    backend.begin_path();
    backend.move_to(front_a);
    backend.line_to(rear_a);
    backend.line_to(rear_b);
    backend.line_to(front_b);
    backend.stroke(group.stroke > 0.0, paint, group.stroke);
    backend.fill(group.fill, paint);
    backend.end_element();
    Ok(())
}

/// Tangent quad between two ellipse caps. The apex-visibility padding of a
/// quarter radius per cap is a tuned constant, not derived geometry.
fn render_funnel_surface(
    scene: &Scene,
    group: &GroupData,
    front_base: Uuid,
    rear_base: Uuid,
    backend: &mut impl RenderBackend,
) -> SceneResult<()> {
    let (front, front_shape) = cap_of(scene, front_base)?;
    let (rear, rear_shape) = cap_of(scene, rear_base)?;
    let scale = front_shape.render_normal.magnitude();
    let front_radius = front_shape.form.diameter().unwrap_or(0.0) / 2.0 * scale;
    let rear_radius = rear_shape.form.diameter().unwrap_or(0.0) / 2.0 * scale;

    let mut apex = rear.render_origin;
    apex.subtract(front.render_origin);
    let normal_distance = front_shape.render_normal.magnitude_2d();
    let eccen_angle = (normal_distance / scale).acos();
    let bigger_radius = front_radius.max(rear_radius);
    let eccen_percent = if front_radius == 0.0 || rear_radius == 0.0 {
        1.0
    } else {
        (front_radius - rear_radius).abs() / bigger_radius
    };
    let eccen = eccen_angle.sin() * eccen_percent.sqrt();

    let apex_distance = apex.magnitude_2d() + front_radius / 4.0 + rear_radius / 4.0;
    let apex_visible =
        front_radius * eccen < apex_distance && rear_radius * eccen < apex_distance;
    if !apex_visible {
        return Ok(());
    }

    let apex_angle =
        front_shape.render_normal.y.atan2(front_shape.render_normal.x) + TAU / 2.0;
    let project_front_length = (apex_distance + front_radius) / eccen;
    let project_rear_length = (apex_distance + rear_radius) / eccen;
    let project_front_angle = (front_radius / project_front_length).acos();
    let project_rear_angle = (rear_radius / -project_rear_length).acos();

    let mut front_a = Vector::new(
        project_front_angle.cos() * front_radius * eccen,
        project_front_angle.sin() * front_radius,
        0.0,
    );
    let mut rear_a = Vector::new(
        project_rear_angle.cos() * rear_radius * eccen,
        project_rear_angle.sin() * rear_radius,
        0.0,
    );
    let mut front_b = front_a;
    front_b.y *= -1.0;
    let mut rear_b = rear_a;
    rear_b.y *= -1.0;

    front_a.rotate_z(apex_angle);
    front_b.rotate_z(apex_angle);
    front_a.add(front.render_origin);
    front_b.add(front.render_origin);
    // rear tangents sit on the opposite side of the rear cap
    rear_a.rotate_z(apex_angle + TAU / 2.0);
    rear_b.rotate_z(apex_angle + TAU / 2.0);
    rear_a.add(rear.render_origin);
    rear_b.add(rear.render_origin);

    let paint = scene.resolve_paint(&group.color)?;
    backend.begin_path();
    backend.move_to(front_a);
    backend.line_to(rear_b);
    backend.line_to(rear_a);
    backend.line_to(front_b);
    backend.stroke(group.stroke > 0.0, paint, group.stroke);
    backend.fill(group.fill, paint);
    backend.end_element();
    Ok(())
}

/// Triangle from the base tangent points through the apex.
pub(crate) fn render_cone_surface(
    scene: &Scene,
    node: &Node,
    shape: &ShapeData,
    apex: Uuid,
    backend: &mut impl RenderBackend,
) -> SceneResult<()> {
    let apex_origin = scene.get(apex)?.render_origin;
    let mut render_apex = apex_origin;
    render_apex.subtract(node.render_origin);

    let scale = shape.render_normal.magnitude();
    let apex_distance = render_apex.magnitude_2d();
    let normal_distance = shape.render_normal.magnitude_2d();
    let eccen = (normal_distance / scale).acos().sin();
    let radius = shape.form.diameter().unwrap_or(0.0) / 2.0 * scale;
    // apex hidden behind the base ellipse; NaN from degenerate scale also
    // lands here
    if !(radius * eccen < apex_distance) {
        return Ok(());
    }

    let apex_angle = shape.render_normal.y.atan2(shape.render_normal.x) + TAU / 2.0;
    let project_length = apex_distance / eccen;
    let project_angle = (radius / project_length).acos();

    let mut tangent_a =
        Vector::new(project_angle.cos() * radius * eccen, project_angle.sin() * radius, 0.0);
    let mut tangent_b = tangent_a;
    tangent_b.y *= -1.0;
    tangent_a.rotate_z(apex_angle);
    tangent_b.rotate_z(apex_angle);
    tangent_a.add(node.render_origin);
    tangent_b.add(node.render_origin);

    let line_width = shape.style.line_width();
    let paint = scene.resolve_paint(&shape.style.color)?;
    backend.begin_path();
    backend.move_to(tangent_a);
    backend.line_to(apex_origin);
    backend.line_to(tangent_b);
    backend.stroke(line_width > 0.0, paint, line_width);
    backend.fill(shape.style.fill, paint);
    backend.end_element();
    Ok(())
}

/// Semicircle silhouette of a dome, bulging away from the contour angle,
/// drawn as two quarter-turn Beziers.
pub(crate) fn render_dome(
    scene: &Scene,
    node: &Node,
    shape: &ShapeData,
    backend: &mut impl RenderBackend,
) -> SceneResult<()> {
    let contour_angle = shape.render_normal.y.atan2(shape.render_normal.x);
    let radius = shape.form.diameter().unwrap_or(0.0) / 2.0 * shape.render_normal.magnitude();
    let center = node.render_origin;

    let start_angle = contour_angle + TAU / 4.0;
    let line_width = shape.style.line_width();
    let paint = scene.resolve_paint(&shape.style.color)?;
    backend.begin_path();
    backend.move_to(circle_point(center, radius, start_angle));
    for quarter in 0..2 {
        let a0 = start_angle + quarter as f64 * TAU / 4.0;
        let (cp0, cp1, end) = quarter_arc(center, radius, a0, a0 + TAU / 4.0);
        backend.curve_to(cp0, cp1, end);
    }
    backend.stroke(line_width > 0.0, paint, line_width);
    backend.fill(shape.style.fill, paint);
    backend.end_element();
    Ok(())
}

fn cap_of(scene: &Scene, id: Uuid) -> SceneResult<(&Node, &ShapeData)> {
    let node = scene.get(id)?;
    let shape = node.shape().ok_or(SceneError::KindMismatch { id, expected: "Shape" })?;
    Ok((node, shape))
}
