//! Composite solids
//!
//! Each builder assembles a small internal graph (a non-drawing composite
//! root, a sorting group, caps) and returns the ids involved. Shared
//! properties are written through `Scene` setters that store the value on
//! the root and propagate it to every owned part in one explicit pass.

mod cone;
mod cuboid;
mod cylinder;
mod funnel;
mod hemisphere;
mod horn;

pub use cone::ConeOptions;
pub use cuboid::BoxOptions;
pub use cylinder::CylinderOptions;
pub use funnel::FunnelOptions;
pub use hemisphere::HemisphereOptions;
pub use horn::HornOptions;

use uuid::Uuid;

use crate::error::{SceneError, SceneResult};
use crate::paint::Paint;
use crate::scene::{CompositeKind, Face, FaceSetting, Form, GroupSurface, NodeKind, Scene};

/// Node ids of a built cylinder, horn or funnel.
#[derive(Debug, Clone, Copy)]
pub struct SolidHandle {
    /// Composite root; property setters target this id.
    pub root: Uuid,
    pub group: Uuid,
    pub front_base: Uuid,
    pub rear_base: Uuid,
}

impl Scene {
    /// Set the paint of a drawable, propagating through composite parts.
    /// An explicitly painted box face keeps its own color.
    pub fn set_color(&mut self, id: Uuid, color: Paint) -> SceneResult<()> {
        let node = self.get_mut(id)?;
        match &mut node.kind {
            NodeKind::Anchor => Err(kind_error(id)),
            NodeKind::Shape(shape) => {
                shape.style.color = color;
                Ok(())
            }
            NodeKind::Group(group) => {
                group.color = color;
                Ok(())
            }
            NodeKind::Composite(composite) => {
                composite.color = color.clone();
                match &composite.kind {
                    CompositeKind::Cylinder { group, front_base, rear_base, .. }
                    | CompositeKind::Horn { group, front_base, rear_base, .. }
                    | CompositeKind::Funnel { group, front_base, rear_base, .. } => {
                        let (group, caps) = (*group, [*front_base, *rear_base]);
                        for cap in caps {
                            let paint = self.clone_paint(&color)?;
                            if let Some(shape) = self.get_mut(cap)?.shape_mut() {
                                shape.style.color = paint;
                            }
                        }
                        let paint = self.clone_paint(&color)?;
                        if let Some(data) = self.get_mut(group)?.group_mut() {
                            data.color = paint;
                        }
                        Ok(())
                    }
                    CompositeKind::Box(data) => {
                        // skip faces that carry their own paint
                        let targets: Vec<Uuid> = data
                            .faces
                            .iter()
                            .zip(data.face_rects)
                            .filter(|(setting, _)| !matches!(setting, FaceSetting::Painted(_)))
                            .filter_map(|(_, rect)| rect)
                            .collect();
                        for rect in targets {
                            let paint = self.clone_paint(&color)?;
                            if let Some(shape) = self.get_mut(rect)?.shape_mut() {
                                shape.style.color = paint;
                            }
                        }
                        Ok(())
                    }
                }
            }
        }
    }

    pub fn set_stroke(&mut self, id: Uuid, stroke: f64) -> SceneResult<()> {
        let node = self.get_mut(id)?;
        match &mut node.kind {
            NodeKind::Anchor => Err(kind_error(id)),
            NodeKind::Shape(shape) => {
                shape.style.stroke = stroke;
                Ok(())
            }
            NodeKind::Group(group) => {
                group.stroke = stroke;
                Ok(())
            }
            NodeKind::Composite(composite) => {
                composite.stroke = stroke;
                match composite.kind.clone() {
                    CompositeKind::Cylinder { group, front_base, rear_base, .. }
                    | CompositeKind::Funnel { group, front_base, rear_base, .. } => {
                        for cap in [front_base, rear_base] {
                            if let Some(shape) = self.get_mut(cap)?.shape_mut() {
                                shape.style.stroke = stroke;
                            }
                        }
                        if let Some(data) = self.get_mut(group)?.group_mut() {
                            data.stroke = stroke;
                        }
                    }
                    CompositeKind::Horn {
                        group,
                        front_base,
                        rear_base,
                        front_diameter,
                        rear_diameter,
                        ..
                    } => {
                        // dot caps fold the cap diameter into their stroke
                        for (cap, diameter) in
                            [(front_base, front_diameter), (rear_base, rear_diameter)]
                        {
                            if let Some(shape) = self.get_mut(cap)?.shape_mut() {
                                shape.style.stroke = diameter + stroke;
                            }
                        }
                        if let Some(data) = self.get_mut(group)?.group_mut() {
                            data.stroke = stroke;
                        }
                    }
                    CompositeKind::Box(data) => {
                        for rect in data.face_rects.into_iter().flatten() {
                            if let Some(shape) = self.get_mut(rect)?.shape_mut() {
                                shape.style.stroke = stroke;
                            }
                        }
                    }
                }
                Ok(())
            }
        }
    }

    pub fn set_fill(&mut self, id: Uuid, fill: bool) -> SceneResult<()> {
        self.for_each_part(id, |scene, part| {
            let node = scene.get_mut(part)?;
            match &mut node.kind {
                NodeKind::Shape(shape) => shape.style.fill = fill,
                NodeKind::Group(group) => group.fill = fill,
                NodeKind::Composite(composite) => composite.fill = fill,
                NodeKind::Anchor => {}
            }
            Ok(())
        })
    }

    pub fn set_visible(&mut self, id: Uuid, visible: bool) -> SceneResult<()> {
        self.for_each_part(id, |scene, part| {
            let node = scene.get_mut(part)?;
            match &mut node.kind {
                NodeKind::Shape(shape) => shape.style.visible = visible,
                NodeKind::Group(group) => group.visible = visible,
                NodeKind::Composite(composite) => composite.visible = visible,
                NodeKind::Anchor => {}
            }
            Ok(())
        })
    }

    /// Resize a cylinder's caps.
    pub fn set_diameter(&mut self, id: Uuid, diameter: f64) -> SceneResult<()> {
        let node = self.get_mut(id)?;
        let NodeKind::Composite(composite) = &mut node.kind else {
            return Err(kind_error(id));
        };
        let CompositeKind::Cylinder { diameter: stored, front_base, rear_base, .. } =
            &mut composite.kind
        else {
            return Err(kind_error(id));
        };
        *stored = diameter;
        let caps = [*front_base, *rear_base];
        for cap in caps {
            if let Some(shape) = self.get_mut(cap)?.shape_mut() {
                if let Form::Ellipse { diameter: cap_diameter, .. } = &mut shape.form {
                    *cap_diameter = diameter;
                }
                shape.update_path();
            }
        }
        Ok(())
    }

    /// Resize a horn's or funnel's front cap, re-deriving the cap geometry
    /// and its distance from the solid's center.
    pub fn set_front_diameter(&mut self, id: Uuid, diameter: f64) -> SceneResult<()> {
        self.set_end_diameter(id, diameter, true)
    }

    pub fn set_rear_diameter(&mut self, id: Uuid, diameter: f64) -> SceneResult<()> {
        self.set_end_diameter(id, diameter, false)
    }

    fn set_end_diameter(&mut self, id: Uuid, diameter: f64, is_front: bool) -> SceneResult<()> {
        let node = self.get_mut(id)?;
        let NodeKind::Composite(composite) = &mut node.kind else {
            return Err(kind_error(id));
        };
        let stroke = composite.stroke;
        let (cap, group, length, is_horn) = match &mut composite.kind {
            CompositeKind::Horn {
                front_diameter,
                rear_diameter,
                length,
                group,
                front_base,
                rear_base,
                ..
            } => {
                let (stored, cap) =
                    if is_front { (front_diameter, front_base) } else { (rear_diameter, rear_base) };
                *stored = diameter;
                (*cap, Some(*group), *length, true)
            }
            CompositeKind::Funnel {
                front_diameter,
                rear_diameter,
                length,
                front_base,
                rear_base,
                ..
            } => {
                let (stored, cap) =
                    if is_front { (front_diameter, front_base) } else { (rear_diameter, rear_base) };
                *stored = diameter;
                (*cap, None, *length, false)
            }
            _ => return Err(kind_error(id)),
        };

        let base_z = length / 2.0 - diameter / 2.0;
        let cap_node = self.get_mut(cap)?;
        cap_node.translate.z = if is_front { base_z } else { -base_z };
        if let Some(shape) = cap_node.shape_mut() {
            if is_horn {
                shape.style.stroke = diameter + stroke;
            } else if let Form::Ellipse { diameter: cap_diameter, .. } = &mut shape.form {
                *cap_diameter = diameter;
                shape.update_path();
            }
        }
        // horn surface tracks cap diameters itself
        if let Some(group) = group {
            if let Some(GroupSurface::Horn { front_diameter, rear_diameter, .. }) =
                self.get_mut(group)?.group_mut().map(|data| &mut data.surface)
            {
                if is_front {
                    *front_diameter = diameter;
                } else {
                    *rear_diameter = diameter;
                }
            }
        }
        Ok(())
    }

    /// Show, hide or repaint one box face. The face rect is created or
    /// removed on visibility toggles and its transform re-derived from the
    /// box dimensions on every write.
    pub fn set_box_face(&mut self, id: Uuid, face: Face, setting: FaceSetting) -> SceneResult<()> {
        cuboid::set_box_face(self, id, face, setting)
    }

    /// Run one closure over a node and, for composites, every owned part.
    fn for_each_part(
        &mut self,
        id: Uuid,
        mut apply: impl FnMut(&mut Scene, Uuid) -> SceneResult<()>,
    ) -> SceneResult<()> {
        let mut parts = vec![id];
        if let NodeKind::Composite(composite) = &self.get(id)?.kind {
            match &composite.kind {
                CompositeKind::Cylinder { group, front_base, rear_base, .. }
                | CompositeKind::Horn { group, front_base, rear_base, .. }
                | CompositeKind::Funnel { group, front_base, rear_base, .. } => {
                    parts.extend([*group, *front_base, *rear_base]);
                }
                CompositeKind::Box(data) => {
                    parts.extend(data.face_rects.into_iter().flatten());
                }
            }
        }
        for part in parts {
            apply(self, part)?;
        }
        Ok(())
    }
}

/// Cap backfaces default to visible; a painted composite backface carries
/// through to each cap with its own texture instance.
fn cap_backface(
    scene: &mut Scene,
    backface: &crate::paint::Backface,
) -> SceneResult<crate::paint::Backface> {
    Ok(match backface {
        crate::paint::Backface::Painted(paint) => {
            crate::paint::Backface::Painted(scene.clone_paint(paint)?)
        }
        _ => crate::paint::Backface::Visible,
    })
}

fn kind_error(id: Uuid) -> SceneError {
    SceneError::KindMismatch { id, expected: "drawable or composite" }
}

#[cfg(test)]
mod tests {
    use crate::paint::Paint;
    use crate::scene::{Face, FaceSetting, Placement, Scene};
    use crate::solids::{BoxOptions, CylinderOptions, HornOptions};

    #[test]
    fn composite_color_reaches_caps_and_group() {
        let mut scene = Scene::new();
        let cylinder = scene.add_cylinder(None, CylinderOptions::default()).unwrap();
        scene.set_color(cylinder.root, Paint::from("#ea0")).unwrap();

        let cap = scene.node(cylinder.front_base).unwrap().shape().unwrap();
        assert_eq!(cap.style.color.color(), Some("#ea0"));
        let group = scene.node(cylinder.group).unwrap().group().unwrap();
        assert_eq!(group.color.color(), Some("#ea0"));
    }

    #[test]
    fn horn_stroke_folds_in_cap_diameter() {
        let mut scene = Scene::new();
        let horn = scene
            .add_horn(
                None,
                HornOptions { front_diameter: 3.0, rear_diameter: 1.0, ..Default::default() },
            )
            .unwrap();
        scene.set_stroke(horn.root, 2.0).unwrap();
        let front = scene.node(horn.front_base).unwrap().shape().unwrap();
        assert_eq!(front.style.stroke, 5.0);
        let rear = scene.node(horn.rear_base).unwrap().shape().unwrap();
        assert_eq!(rear.style.stroke, 3.0);
    }

    #[test]
    fn painted_face_survives_composite_color_write() {
        let mut scene = Scene::new();
        let cube = scene.add_box(None, BoxOptions::default()).unwrap();
        scene
            .set_box_face(cube, Face::Top, FaceSetting::Painted(Paint::from("#c25")))
            .unwrap();
        scene.set_color(cube, Paint::from("#fff")).unwrap();

        let composite = scene.node(cube).unwrap().composite().unwrap();
        let crate::scene::CompositeKind::Box(data) = &composite.kind else { unreachable!() };
        let top = data.face_rects[Face::Top.index()].unwrap();
        let front = data.face_rects[Face::Front.index()].unwrap();
        let top_color = scene.node(top).unwrap().shape().unwrap().style.color.clone();
        let front_color = scene.node(front).unwrap().shape().unwrap().style.color.clone();
        assert_eq!(top_color.color(), Some("#c25"));
        assert_eq!(front_color.color(), Some("#fff"));
    }

    #[test]
    fn front_diameter_write_moves_the_cap() {
        let mut scene = Scene::new();
        let horn = scene
            .add_horn(None, HornOptions { length: 4.0, ..Default::default() })
            .unwrap();
        scene.set_front_diameter(horn.root, 2.0).unwrap();
        // cap recedes by half its diameter from the end of the solid
        assert_eq!(scene.node(horn.front_base).unwrap().translate.z, 1.0);
        assert_eq!(scene.node(horn.front_base).unwrap().shape().unwrap().style.stroke, 3.0);
    }

    #[test]
    fn anchors_reject_style_writes() {
        let mut scene = Scene::new();
        let anchor = scene.add_anchor(None, Placement::default()).unwrap();
        assert!(scene.set_color(anchor, Paint::from("#fff")).is_err());
    }
}
