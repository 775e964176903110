//! Funnel solid: two ellipse caps of different diameters bridged by a
//! tangent quad.

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
pub struct FunnelOptions {
    pub place: Placement,
    pub front_diameter: f64,
    pub rear_diameter: f64,
    pub length: f64,
    pub color: Paint,
    pub stroke: f64,
    pub fill: bool,
    pub visible: bool,
    pub front_face: Option<Paint>,
    pub backface: Backface,
}

impl Default for FunnelOptions {
    fn default() -> Self {
        Self {
            place: Placement::default(),
            front_diameter: 1.0,
            rear_diameter: 1.0,
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
    pub fn add_funnel(
        &mut self,
        parent: Option<Uuid>,
        options: FunnelOptions,
    ) -> SceneResult<SolidHandle> {
        let base_backface = cap_backface(self, &options.backface)?;
        let front_backface = match &options.front_face {
            Some(paint) => Backface::Painted(self.clone_paint(paint)?),
            None => base_backface.clone(),
        };
        let group_color = self.clone_paint(&options.color)?;

        let composite = CompositeData {
            kind: CompositeKind::Funnel {
                front_diameter: options.front_diameter,
                rear_diameter: options.rear_diameter,
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
            fill: options.fill,
            surface: GroupSurface::None,
        };
        let group =
            self.insert(Node::new(NodeKind::Group(group_data), Placement::default()), Some(root))?;

        let base_z = options.length / 2.0;
        let front_base = self.add_funnel_cap(
            group,
            &options,
            options.front_diameter,
            front_backface,
            Placement {
                translate: Vector::new(0.0, 0.0, base_z - options.front_diameter / 2.0),
                rotate: Vector::new(0.0, TAU / 2.0, 0.0),
                ..Default::default()
            },
        )?;
        let rear_base = self.add_funnel_cap(
            group,
            &options,
            options.rear_diameter,
            base_backface,
            Placement::at(Vector::new(0.0, 0.0, -base_z + options.rear_diameter / 2.0)),
        )?;

        if let Some(data) = self.get_mut(group)?.group_mut() {
            data.surface = GroupSurface::Funnel { front_base, rear_base };
        }
        if let Some(composite) = self.get_mut(root)?.composite_mut() {
            if let CompositeKind::Funnel { group: g, front_base: f, rear_base: r, .. } =
                &mut composite.kind
            {
                *g = group;
                *f = front_base;
                *r = rear_base;
            }
        }
        Ok(SolidHandle { root, group, front_base, rear_base })
    }

    fn add_funnel_cap(
        &mut self,
        group: Uuid,
        options: &FunnelOptions,
        diameter: f64,
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
        let form = Form::Ellipse { diameter, width: None, height: None, quarters: 4 };
        let shape = ShapeData::new(form, Vector::unit_z(), style);
        self.insert(Node::new(NodeKind::Shape(shape), place), Some(group))
    }
}

#[cfg(test)]
mod tests {
    use crate::render::{DisplayListBackend, DrawOp};
    use crate::scene::Scene;
    use crate::solids::FunnelOptions;

    fn surface_line_count(scene: &mut Scene, root: uuid::Uuid) -> usize {
        scene.update_graph(root).unwrap();
        let mut backend = DisplayListBackend::new();
        scene.render_graph(root, &mut backend).unwrap();
        let elements = backend.elements();
        elements[0].iter().filter(|op| matches!(op, DrawOp::LineTo(_))).count()
    }

    #[test]
    fn surface_quad_appears_side_on() {
        let mut scene = Scene::new();
        let funnel = scene
            .add_funnel(
                None,
                FunnelOptions {
                    front_diameter: 1.0,
                    rear_diameter: 3.0,
                    length: 8.0,
                    ..Default::default()
                },
            )
            .unwrap();
        scene.node_mut(funnel.root).unwrap().rotate.y = crate::math::TAU / 4.0;
        assert_eq!(surface_line_count(&mut scene, funnel.root), 3);
    }

    #[test]
    fn sharp_taper_head_on_suppresses_the_quad() {
        let mut scene = Scene::new();
        // head-on, the wide front cap eclipses the narrow rear one; the
        // padded apex-visibility check fails and only the caps draw
        let funnel = scene
            .add_funnel(
                None,
                FunnelOptions {
                    front_diameter: 4.0,
                    rear_diameter: 0.4,
                    length: 8.0,
                    ..Default::default()
                },
            )
            .unwrap();
        scene.update_graph(funnel.root).unwrap();
        let mut backend = DisplayListBackend::new();
        scene.render_graph(funnel.root, &mut backend).unwrap();
        assert_eq!(backend.elements().len(), 2);
    }
}
