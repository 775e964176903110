//! Horn solid: two dot caps of different diameters bridged by a tangent
//! quad.

use uuid::Uuid;

use crate::error::SceneResult;
use crate::math::{TAU, Vector};
use crate::paint::{Backface, Paint};
use crate::path::PathStep;
use crate::scene::{
    CompositeData, CompositeKind, Form, GroupData, GroupSurface, Node, NodeKind, Placement, Scene,
    ShapeData, Style,
};
use crate::solids::{SolidHandle, cap_backface};

#[derive(Debug, Clone)]
pub struct HornOptions {
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

impl Default for HornOptions {
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
    pub fn add_horn(
        &mut self,
        parent: Option<Uuid>,
        options: HornOptions,
    ) -> SceneResult<SolidHandle> {
        let base_backface = cap_backface(self, &options.backface)?;
        let front_backface = match &options.front_face {
            Some(paint) => Backface::Painted(self.clone_paint(paint)?),
            None => base_backface.clone(),
        };
        let group_color = self.clone_paint(&options.color)?;

        let composite = CompositeData {
            kind: CompositeKind::Horn {
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
        // each cap recedes by half its diameter so the dot stays inside the
        // solid's length
        let front_base = self.add_horn_cap(
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
        let rear_base = self.add_horn_cap(
            group,
            &options,
            options.rear_diameter,
            base_backface,
            Placement::at(Vector::new(0.0, 0.0, -base_z + options.rear_diameter / 2.0)),
        )?;

        if let Some(data) = self.get_mut(group)?.group_mut() {
            data.surface = GroupSurface::Horn {
                front_base,
                rear_base,
                front_diameter: options.front_diameter,
                rear_diameter: options.rear_diameter,
                front: Vector::unit_z(),
                render_front: Vector::unit_z(),
                render_normal: Vector::ZERO,
            };
        }
        if let Some(composite) = self.get_mut(root)?.composite_mut() {
            if let CompositeKind::Horn { group: g, front_base: f, rear_base: r, .. } =
                &mut composite.kind
            {
                *g = group;
                *f = front_base;
                *r = rear_base;
            }
        }
        Ok(SolidHandle { root, group, front_base, rear_base })
    }

    fn add_horn_cap(
        &mut self,
        group: Uuid,
        options: &HornOptions,
        diameter: f64,
        backface: Backface,
        place: Placement,
    ) -> SceneResult<Uuid> {
        let style = Style {
            color: self.clone_paint(&options.color)?,
            // a dot's diameter is its stroke
            stroke: diameter + options.stroke,
            fill: options.fill,
            visible: options.visible,
            backface,
            ..Default::default()
        };
        let form = Form::Path(vec![PathStep::point(0.0, 0.0, 0.0)]);
        let shape = ShapeData::new(form, Vector::unit_z(), style);
        self.insert(Node::new(NodeKind::Shape(shape), place), Some(group))
    }
}
