//! Cone solid: ellipse base plus an apex anchor driving the silhouette
//! triangle and the depth centroid.

use uuid::Uuid;

use crate::error::SceneResult;
use crate::math::Vector;
use crate::scene::{Form, Node, NodeKind, Placement, Scene, ShapeData, SolidExtra, Style};

#[derive(Debug, Clone)]
pub struct ConeOptions {
    pub place: Placement,
    pub diameter: f64,
    /// Distance from base to apex along the local z axis.
    pub length: f64,
    pub style: Style,
}

impl Default for ConeOptions {
    fn default() -> Self {
        Self {
            place: Placement::default(),
            diameter: 1.0,
            length: 1.0,
            style: Style { fill: true, closed: false, ..Default::default() },
        }
    }
}

impl Scene {
    /// Returns the base shape id; the apex anchor is its child.
    pub fn add_cone(&mut self, parent: Option<Uuid>, options: ConeOptions) -> SceneResult<Uuid> {
        let form =
            Form::Ellipse { diameter: options.diameter, width: None, height: None, quarters: 4 };
        let shape = ShapeData::new(form, Vector::unit_z(), options.style);
        let base = self.insert(Node::new(NodeKind::Shape(shape), options.place), parent)?;
        let apex =
            self.add_anchor(Some(base), Placement::at(Vector::new(0.0, 0.0, options.length)))?;
        if let Some(shape) = self.get_mut(base)?.shape_mut() {
            shape.solid = SolidExtra::Cone { apex, length: options.length };
        }
        Ok(base)
    }
}
