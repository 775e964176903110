//! Hemisphere solid: ellipse base plus an apex anchor at half the diameter,
//! with a dome silhouette.

use uuid::Uuid;

use crate::error::SceneResult;
use crate::math::Vector;
use crate::scene::{Form, Node, NodeKind, Placement, Scene, ShapeData, SolidExtra, Style};

#[derive(Debug, Clone)]
pub struct HemisphereOptions {
    pub place: Placement,
    pub diameter: f64,
    pub style: Style,
}

impl Default for HemisphereOptions {
    fn default() -> Self {
        Self {
            place: Placement::default(),
            diameter: 1.0,
            style: Style { fill: true, closed: false, ..Default::default() },
        }
    }
}

impl Scene {
    /// Returns the base shape id; the apex anchor is its child.
    pub fn add_hemisphere(
        &mut self,
        parent: Option<Uuid>,
        options: HemisphereOptions,
    ) -> SceneResult<Uuid> {
        let form =
            Form::Ellipse { diameter: options.diameter, width: None, height: None, quarters: 4 };
        let shape = ShapeData::new(form, Vector::unit_z(), options.style);
        let base = self.insert(Node::new(NodeKind::Shape(shape), options.place), parent)?;
        let apex = self
            .add_anchor(Some(base), Placement::at(Vector::new(0.0, 0.0, options.diameter / 2.0)))?;
        if let Some(shape) = self.get_mut(base)?.shape_mut() {
            shape.solid = SolidExtra::Hemisphere { apex };
        }
        Ok(base)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::render::{DisplayListBackend, DrawOp};
    use crate::scene::Scene;
    use crate::solids::HemisphereOptions;

    #[test]
    fn sort_value_uses_the_dome_centroid() {
        let mut scene = Scene::new();
        let dome = scene
            .add_hemisphere(None, HemisphereOptions { diameter: 8.0, ..Default::default() })
            .unwrap();
        scene.update_graph(dome).unwrap();
        // base at z=0, apex at z=4, centroid 3/8 of the way
        assert_relative_eq!(scene.node(dome).unwrap().sort_value(), 1.5, epsilon = 1e-9);
    }

    #[test]
    fn dome_renders_two_quarter_arcs_plus_base() {
        let mut scene = Scene::new();
        let dome = scene
            .add_hemisphere(None, HemisphereOptions { diameter: 2.0, ..Default::default() })
            .unwrap();
        scene.update_graph(dome).unwrap();
        let mut backend = DisplayListBackend::new();
        scene.render_graph(dome, &mut backend).unwrap();

        let elements = backend.elements();
        assert_eq!(elements.len(), 2);
        let dome_curves = elements[0]
            .iter()
            .filter_map(|op| match op {
                DrawOp::CurveTo { end, .. } => Some(*end),
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(dome_curves.len(), 2);
        // semicircle endpoints sit a radius apart on the contour line
        let DrawOp::MoveTo(start) = elements[0][1] else { panic!("expected move") };
        let end = dome_curves[1];
        let span = ((end.x - start.x).powi(2) + (end.y - start.y).powi(2)).sqrt();
        assert_relative_eq!(span, 2.0, epsilon = 1e-9);
    }
}
