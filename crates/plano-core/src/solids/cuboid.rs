//! Box solid: six rect faces derived from width/height/depth.

use uuid::Uuid;

use crate::error::SceneResult;
use crate::math::{TAU, Vector};
use crate::paint::{Backface, Paint};
use crate::scene::{
    BoxData, CompositeData, CompositeKind, Face, FaceSetting, Form, Node, NodeKind, Placement,
    Scene, ShapeData, Style,
};

#[derive(Debug, Clone)]
pub struct BoxOptions {
    pub place: Placement,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub color: Paint,
    pub stroke: f64,
    pub fill: bool,
    pub visible: bool,
    pub backface: Backface,
    pub faces: [FaceSetting; 6],
}

impl Default for BoxOptions {
    fn default() -> Self {
        Self {
            place: Placement::default(),
            width: 1.0,
            height: 1.0,
            depth: 1.0,
            color: Paint::default(),
            stroke: 1.0,
            fill: true,
            visible: true,
            backface: Backface::Visible,
            faces: [const { FaceSetting::Visible }; 6],
        }
    }
}

impl Scene {
    /// Axis-aligned box; returns the composite root id.
    pub fn add_box(&mut self, parent: Option<Uuid>, options: BoxOptions) -> SceneResult<Uuid> {
        let data = BoxData {
            width: options.width,
            height: options.height,
            depth: options.depth,
            backface: options.backface,
            front: Vector::unit_z(),
            faces: [const { FaceSetting::Hidden }; 6],
            face_rects: [None; 6],
        };
        let composite = CompositeData {
            kind: CompositeKind::Box(data),
            color: options.color,
            stroke: options.stroke,
            fill: options.fill,
            visible: options.visible,
        };
        let root = self.insert(Node::new(NodeKind::Composite(composite), options.place), parent)?;
        for face in Face::ALL {
            self.set_box_face(root, face, options.faces[face.index()].clone())?;
        }
        Ok(root)
    }
}

pub(super) fn set_box_face(
    scene: &mut Scene,
    id: Uuid,
    face: Face,
    setting: FaceSetting,
) -> SceneResult<()> {
    let node = scene.get(id)?;
    let Some(composite) = node.composite() else {
        return Err(crate::error::SceneError::KindMismatch { id, expected: "Box composite" });
    };
    let CompositeKind::Box(data) = &composite.kind else {
        return Err(crate::error::SceneError::KindMismatch { id, expected: "Box composite" });
    };
    let existing = data.face_rects[face.index()];
    let (width, height, depth) = (data.width, data.height, data.depth);
    let backface = data.backface.clone();
    let (stroke, fill, visible) = (composite.stroke, composite.fill, composite.visible);
    let base_color = composite.color.clone();

    if matches!(setting, FaceSetting::Hidden) {
        if let Some(rect) = existing {
            scene.remove(rect)?;
        }
        store_face(scene, id, face, setting, None)?;
        return Ok(());
    }

    let color = match &setting {
        FaceSetting::Painted(paint) => scene.clone_paint(paint)?,
        _ => scene.clone_paint(&base_color)?,
    };
    let (rect_w, rect_h, place) = face_placement(face, width, height, depth);

    let rect = if let Some(rect) = existing {
        let rect_node = scene.get_mut(rect)?;
        rect_node.translate = place.translate;
        rect_node.rotate = place.rotate;
        if let Some(shape) = rect_node.shape_mut() {
            shape.form = Form::Rect { width: rect_w, height: rect_h };
            shape.update_path();
            shape.style.color = color;
        }
        rect
    } else {
        let style = Style { color, stroke, fill, visible, backface, ..Default::default() };
        let shape = ShapeData::new(Form::Rect { width: rect_w, height: rect_h }, Vector::unit_z(), style);
        scene.insert(Node::new(NodeKind::Shape(shape), place), Some(id))?
    };
    store_face(scene, id, face, setting, Some(rect))
}

fn store_face(
    scene: &mut Scene,
    id: Uuid,
    face: Face,
    setting: FaceSetting,
    rect: Option<Uuid>,
) -> SceneResult<()> {
    if let Some(composite) = scene.get_mut(id)?.composite_mut() {
        if let CompositeKind::Box(data) = &mut composite.kind {
            data.faces[face.index()] = setting;
            data.face_rects[face.index()] = rect;
        }
    }
    Ok(())
}

/// Size and placement of one face rect, looking out of the box.
fn face_placement(face: Face, width: f64, height: f64, depth: f64) -> (f64, f64, Placement) {
    match face {
        Face::Front => (
            width,
            height,
            Placement::at(Vector::new(0.0, 0.0, depth / 2.0)),
        ),
        Face::Rear => (
            width,
            height,
            Placement {
                translate: Vector::new(0.0, 0.0, -depth / 2.0),
                rotate: Vector::new(0.0, TAU / 2.0, 0.0),
                ..Default::default()
            },
        ),
        Face::Left => (
            depth,
            height,
            Placement {
                translate: Vector::new(-width / 2.0, 0.0, 0.0),
                rotate: Vector::new(0.0, -TAU / 4.0, 0.0),
                ..Default::default()
            },
        ),
        Face::Right => (
            depth,
            height,
            Placement {
                translate: Vector::new(width / 2.0, 0.0, 0.0),
                rotate: Vector::new(0.0, TAU / 4.0, 0.0),
                ..Default::default()
            },
        ),
        Face::Top => (
            width,
            depth,
            Placement {
                translate: Vector::new(0.0, -height / 2.0, 0.0),
                rotate: Vector::new(-TAU / 4.0, 0.0, 0.0),
                ..Default::default()
            },
        ),
        Face::Bottom => (
            width,
            depth,
            Placement {
                translate: Vector::new(0.0, height / 2.0, 0.0),
                rotate: Vector::new(TAU / 4.0, 0.0, 0.0),
                ..Default::default()
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use crate::scene::{CompositeKind, Face, FaceSetting, Scene};
    use crate::solids::BoxOptions;

    fn face_rect(scene: &Scene, root: uuid::Uuid, face: Face) -> Option<uuid::Uuid> {
        let composite = scene.node(root).unwrap().composite().unwrap();
        let CompositeKind::Box(data) = &composite.kind else { unreachable!() };
        data.face_rects[face.index()]
    }

    #[test]
    fn box_starts_with_six_faces() {
        let mut scene = Scene::new();
        let root = scene.add_box(None, BoxOptions::default()).unwrap();
        assert_eq!(scene.children_of(root).len(), 6);
    }

    #[test]
    fn hiding_a_face_removes_its_rect() {
        let mut scene = Scene::new();
        let root = scene.add_box(None, BoxOptions::default()).unwrap();
        let rect = face_rect(&scene, root, Face::Rear).unwrap();
        scene.set_box_face(root, Face::Rear, FaceSetting::Hidden).unwrap();
        assert!(!scene.contains(rect));
        assert_eq!(scene.children_of(root).len(), 5);

        scene.set_box_face(root, Face::Rear, FaceSetting::Visible).unwrap();
        assert_eq!(scene.children_of(root).len(), 6);
    }

    #[test]
    fn side_faces_use_depth_for_width() {
        let mut scene = Scene::new();
        let root = scene
            .add_box(None, BoxOptions { width: 2.0, height: 3.0, depth: 4.0, ..Default::default() })
            .unwrap();
        let left = face_rect(&scene, root, Face::Left).unwrap();
        let shape = scene.node(left).unwrap().shape().unwrap();
        let crate::scene::Form::Rect { width, height } = &shape.form else { panic!("expected rect") };
        assert_eq!(*width, 4.0);
        assert_eq!(*height, 3.0);
        assert_eq!(scene.node(left).unwrap().translate.x, -1.0);
    }
}
