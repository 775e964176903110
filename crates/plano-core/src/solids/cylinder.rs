//! Cylinder solid: two ellipse caps joined by a thick-stroked spine.

use uuid::Uuid;

use crate::error::SceneResult;
use crate::math::{TAU, Vector};
use crate::paint::{Backface, Paint};
use crate::scene::{
    CompositeData, CompositeKind, Form, GroupData, GroupSurface, Node, NodeKind, Placement, Scene,
    ShapeData, Style,
};
use crate::solids::{SolidHandle, cap_backface};

#[derive(Debug, Clone)]
pub struct CylinderOptions {
    pub place: Placement,
    pub diameter: f64,
    pub length: f64,
    pub color: Paint,
    pub stroke: f64,
    pub fill: bool,
    pub visible: bool,
    /// Overrides the paint shown when the front cap faces the viewer.
    pub front_face: Option<Paint>,
    pub backface: Backface,
}

impl Default for CylinderOptions {
    fn default() -> Self {
        Self {
            place: Placement::default(),
            diameter: 1.0,
            length: 1.0,
            color: Paint::default(),
            stroke: 1.0,
            fill: true,
            visible: true,
            front_face: None,
            backface: Backface::Visible,
        }
    }
}

impl Scene {
    pub fn add_cylinder(
        &mut self,
        parent: Option<Uuid>,
        options: CylinderOptions,
    ) -> SceneResult<SolidHandle> {
        let base_backface = cap_backface(self, &options.backface)?;
        let front_backface = match &options.front_face {
            Some(paint) => Backface::Painted(self.clone_paint(paint)?),
            None => base_backface.clone(),
        };
        let group_color = self.clone_paint(&options.color)?;

        let composite = CompositeData {
            kind: CompositeKind::Cylinder {
                diameter: options.diameter,
                length: options.length,
                front_face: options.front_face.clone(),
                group: Uuid::nil(),
                front_base: Uuid::nil(),
                rear_base: Uuid::nil(),
            },
            color: options.color.clone(),
            stroke: options.stroke,
            fill: options.fill,
            visible: options.visible,
        };
        let root = self.insert(Node::new(NodeKind::Composite(composite), options.place), parent)?;

        let group_data = GroupData {
            update_sort: true,
            visible: options.visible,
            color: group_color,
            stroke: options.stroke,
            ..Default::default()
        };
        let group =
            self.insert(Node::new(NodeKind::Group(group_data), Placement::default()), Some(root))?;

        let base_z = options.length / 2.0;
        let front_base = self.add_cap(
            group,
            &options,
            front_backface,
            Placement {
                translate: Vector::new(0.0, 0.0, base_z),
                rotate: Vector::new(0.0, TAU / 2.0, 0.0),
                ..Default::default()
            },
        )?;
        let rear_base = self.add_cap(
            group,
            &options,
            base_backface,
            Placement::at(Vector::new(0.0, 0.0, -base_z)),
        )?;

        if let Some(data) = self.get_mut(group)?.group_mut() {
            data.surface = GroupSurface::Cylinder { front_base, rear_base };
        }
        if let Some(composite) = self.get_mut(root)?.composite_mut() {
            if let CompositeKind::Cylinder { group: g, front_base: f, rear_base: r, .. } =
                &mut composite.kind
            {
                *g = group;
                *f = front_base;
                *r = rear_base;
            }
        }
        Ok(SolidHandle { root, group, front_base, rear_base })
    }

    fn add_cap(
        &mut self,
        group: Uuid,
        options: &CylinderOptions,
        backface: Backface,
        place: Placement,
    ) -> SceneResult<Uuid> {
        let style = Style {
            color: self.clone_paint(&options.color)?,
            stroke: options.stroke,
            fill: options.fill,
            closed: false,
            visible: options.visible,
            backface,
        };
        let form = Form::Ellipse {
            diameter: options.diameter,
            width: None,
            height: None,
            quarters: 4,
        };
        let shape = ShapeData::new(form, Vector::unit_z(), style);
        self.insert(Node::new(NodeKind::Shape(shape), place), Some(group))
    }
}

#[cfg(test)]
mod tests {
    use crate::math::TAU;
    use crate::render::{DisplayListBackend, DrawOp};
    use crate::scene::Scene;
    use crate::solids::CylinderOptions;

    #[test]
    fn cap_order_flips_with_orientation() {
        let mut scene = Scene::new();
        let cylinder = scene.add_cylinder(None, CylinderOptions::default()).unwrap();
        scene.update_graph(cylinder.root).unwrap();
        let order = scene.flat_graph_of(cylinder.group).to_vec();
        assert_eq!(order, [cylinder.rear_base, cylinder.front_base]);

        scene.node_mut(cylinder.root).unwrap().rotate.y = TAU / 2.0;
        scene.update_graph(cylinder.root).unwrap();
        let order = scene.flat_graph_of(cylinder.group).to_vec();
        assert_eq!(order, [cylinder.front_base, cylinder.rear_base]);
    }

    #[test]
    fn surface_stroke_covers_projected_diameter() {
        let mut scene = Scene::new();
        let cylinder = scene
            .add_cylinder(
                None,
                CylinderOptions { diameter: 4.0, stroke: 1.0, ..Default::default() },
            )
            .unwrap();
        scene.update_graph(cylinder.root).unwrap();
        let mut backend = DisplayListBackend::new();
        scene.render_graph(cylinder.root, &mut backend).unwrap();

        // first stroked element is the surface spine
        let width = backend.ops().iter().find_map(|op| match op {
            DrawOp::Stroke { width, .. } => Some(*width),
            _ => None,
        });
        assert_eq!(width, Some(5.0));
    }
}
