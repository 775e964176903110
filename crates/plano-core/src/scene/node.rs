//! Node representation
//!
//! Every scene element is one [`Node`] in the arena: a local transform plus
//! a kind tag carrying the kind-specific state. Kind-specific behavior
//! (path generation, sort value, custom render) dispatches on the tag.

use uuid::Uuid;

use crate::math::Vector;
use crate::paint::{Backface, Paint};
use crate::path::{PathCommand, PathStep, compile_path};

/// Local transform bundle for a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub translate: Vector,
    /// Radians per axis, applied Z then Y then X.
    pub rotate: Vector,
    /// Multiplicative per axis.
    pub scale: Vector,
}

impl Default for Placement {
    fn default() -> Self {
        Self { translate: Vector::ZERO, rotate: Vector::ZERO, scale: Vector::ONE }
    }
}

impl Placement {
    pub fn at(translate: Vector) -> Self {
        Self { translate, ..Default::default() }
    }

    pub fn rotated(rotate: Vector) -> Self {
        Self { rotate, ..Default::default() }
    }
}

/// A scene-graph element.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: Uuid,
    pub translate: Vector,
    pub rotate: Vector,
    pub scale: Vector,
    /// Local reference point, normally zero.
    pub origin: Vector,
    /// World-space origin of the last update; recomputed every frame.
    pub render_origin: Vector,
    pub kind: NodeKind,
    /// Cached flattened subtree (internal child list for groups).
    pub(crate) flat_graph: Vec<Uuid>,
    /// Set whenever the child set changes; cleared on rebuild.
    pub(crate) flat_dirty: bool,
    /// Painter's-algorithm depth of the last update.
    pub(crate) sort_value: f64,
}

impl Node {
    pub(crate) fn new(kind: NodeKind, place: Placement) -> Self {
        Self {
            id: Uuid::new_v4(),
            translate: place.translate,
            rotate: place.rotate,
            scale: place.scale,
            origin: Vector::ZERO,
            render_origin: Vector::ZERO,
            kind,
            flat_graph: Vec::new(),
            flat_dirty: true,
            sort_value: 0.0,
        }
    }

    /// Depth value from the last `update_graph`.
    pub fn sort_value(&self) -> f64 {
        self.sort_value
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group(_))
    }

    pub fn shape(&self) -> Option<&ShapeData> {
        match &self.kind {
            NodeKind::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn shape_mut(&mut self) -> Option<&mut ShapeData> {
        match &mut self.kind {
            NodeKind::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn group(&self) -> Option<&GroupData> {
        match &self.kind {
            NodeKind::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn group_mut(&mut self) -> Option<&mut GroupData> {
        match &mut self.kind {
            NodeKind::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn composite(&self) -> Option<&CompositeData> {
        match &self.kind {
            NodeKind::Composite(composite) => Some(composite),
            _ => None,
        }
    }

    pub fn composite_mut(&mut self) -> Option<&mut CompositeData> {
        match &mut self.kind {
            NodeKind::Composite(composite) => Some(composite),
            _ => None,
        }
    }

    /// Stable type tag, also used by graph (de)serialization.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Anchor => "Anchor",
            NodeKind::Group(_) => "Group",
            NodeKind::Shape(shape) => match shape.solid {
                SolidExtra::Cone { .. } => "Cone",
                SolidExtra::Hemisphere { .. } => "Hemisphere",
                SolidExtra::None => match shape.form {
                    Form::Path(_) => "Shape",
                    Form::Rect { .. } => "Rect",
                    Form::RoundedRect { .. } => "RoundedRect",
                    Form::Ellipse { .. } => "Ellipse",
                    Form::Polygon { .. } => "Polygon",
                },
            },
            NodeKind::Composite(composite) => match composite.kind {
                CompositeKind::Cylinder { .. } => "Cylinder",
                CompositeKind::Horn { .. } => "Horn",
                CompositeKind::Funnel { .. } => "Funnel",
                CompositeKind::Box(_) => "Box",
            },
        }
    }
}

/// Kind tag plus kind-specific state.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pure transform holder; renders nothing.
    Anchor,
    Shape(ShapeData),
    Group(GroupData),
    /// Composite-solid root (cylinder, horn, funnel, box); renders nothing
    /// itself, its parts are ordinary child nodes.
    Composite(CompositeData),
}

/// Visual style shared by all drawable shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub color: Paint,
    /// Stroke width; 0 disables stroking.
    pub stroke: f64,
    pub fill: bool,
    pub closed: bool,
    pub visible: bool,
    pub backface: Backface,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: Paint::default(),
            stroke: 1.0,
            fill: false,
            closed: true,
            visible: true,
            backface: Backface::Visible,
        }
    }
}

impl Style {
    /// Effective stroke width, 0 when stroking is off.
    pub fn line_width(&self) -> f64 {
        if self.stroke > 0.0 { self.stroke } else { 0.0 }
    }
}

/// Declarative geometry of a shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Form {
    /// Free-form path.
    Path(Vec<PathStep>),
    Rect { width: f64, height: f64 },
    RoundedRect { width: f64, height: f64, corner_radius: f64 },
    Ellipse { diameter: f64, width: Option<f64>, height: Option<f64>, quarters: u32 },
    Polygon { sides: u32, radius: f64 },
}

impl Form {
    /// Diameter for circular forms, used by solid surface math.
    pub fn diameter(&self) -> Option<f64> {
        match self {
            Form::Ellipse { diameter, .. } => Some(*diameter),
            _ => None,
        }
    }
}

/// Extra state for shapes that depict rotationally-symmetric solids.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SolidExtra {
    None,
    /// Apex anchor plus slant length; draws the silhouette triangle before
    /// the base ellipse.
    Cone { apex: Uuid, length: f64 },
    /// Apex anchor at half the diameter; draws the dome silhouette before
    /// the base ellipse.
    Hemisphere { apex: Uuid },
}

/// A drawable path element.
#[derive(Debug, Clone)]
pub struct ShapeData {
    pub form: Form,
    pub(crate) commands: Vec<PathCommand>,
    /// Surface-normal reference direction in local space.
    pub front: Vector,
    pub render_front: Vector,
    /// `render_origin - render_front`; positive z means facing back.
    pub render_normal: Vector,
    pub style: Style,
    pub solid: SolidExtra,
}

impl ShapeData {
    pub(crate) fn new(form: Form, front: Vector, style: Style) -> Self {
        let commands = compile_path(&form_path_steps(&form));
        Self {
            form,
            commands,
            front,
            render_front: front,
            render_normal: Vector::ZERO,
            style,
            solid: SolidExtra::None,
        }
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Recompile commands from the current form; call after mutating it.
    pub(crate) fn update_path(&mut self) {
        self.commands = compile_path(&form_path_steps(&self.form));
    }

    pub fn is_facing_back(&self) -> bool {
        self.render_normal.z > 0.0
    }

    /// Regular color, or the backface override when facing back.
    pub fn render_paint(&self) -> &Paint {
        match (&self.style.backface, self.is_facing_back()) {
            (Backface::Painted(paint), true) => paint,
            _ => &self.style.color,
        }
    }
}

pub(crate) fn form_path_steps(form: &Form) -> Vec<PathStep> {
    use crate::shapes::forms;
    match form {
        Form::Path(steps) => steps.clone(),
        Form::Rect { width, height } => forms::rect_path(*width, *height),
        Form::RoundedRect { width, height, corner_radius } => {
            forms::rounded_rect_path(*width, *height, *corner_radius)
        }
        Form::Ellipse { diameter, width, height, quarters } => {
            forms::ellipse_path(width.unwrap_or(*diameter), height.unwrap_or(*diameter), *quarters)
        }
        Form::Polygon { sides, radius } => forms::polygon_path(*sides, *radius),
    }
}

/// A sorting-boundary subtree: one opaque sortable unit to its parent,
/// internally re-sorted on demand.
#[derive(Debug, Clone)]
pub struct GroupData {
    /// Re-sort the internal list every update; used by composite solids
    /// whose cap ordering flips with orientation.
    pub update_sort: bool,
    pub visible: bool,
    /// Paint and stroke for the surface outline, when one is attached.
    pub color: Paint,
    pub stroke: f64,
    pub fill: bool,
    pub surface: GroupSurface,
}

impl Default for GroupData {
    fn default() -> Self {
        Self {
            update_sort: false,
            visible: true,
            color: Paint::default(),
            stroke: 1.0,
            fill: true,
            surface: GroupSurface::None,
        }
    }
}

/// Silhouette surface drawn by a group before its sorted children.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupSurface {
    None,
    /// Thick stroked line between the two cap centers.
    Cylinder { front_base: Uuid, rear_base: Uuid },
    /// Tangent quad between two dot caps; tracks its own normal reference
    /// for foreshortening.
    Horn {
        front_base: Uuid,
        rear_base: Uuid,
        front_diameter: f64,
        rear_diameter: f64,
        front: Vector,
        render_front: Vector,
        render_normal: Vector,
    },
    /// Tangent quad between two ellipse caps.
    Funnel { front_base: Uuid, rear_base: Uuid },
}

/// Composite-solid root state: stored parameters plus part handles. Writes
/// to the shared properties go through `Scene` setters, which propagate to
/// every owned part explicitly.
#[derive(Debug, Clone)]
pub struct CompositeData {
    pub kind: CompositeKind,
    pub color: Paint,
    pub stroke: f64,
    pub fill: bool,
    pub visible: bool,
}

#[derive(Debug, Clone)]
pub enum CompositeKind {
    Cylinder {
        diameter: f64,
        length: f64,
        front_face: Option<Paint>,
        group: Uuid,
        front_base: Uuid,
        rear_base: Uuid,
    },
    Horn {
        front_diameter: f64,
        rear_diameter: f64,
        length: f64,
        front_face: Option<Paint>,
        group: Uuid,
        front_base: Uuid,
        rear_base: Uuid,
    },
    Funnel {
        front_diameter: f64,
        rear_diameter: f64,
        length: f64,
        front_face: Option<Paint>,
        group: Uuid,
        front_base: Uuid,
        rear_base: Uuid,
    },
    Box(BoxData),
}

/// Box faces, in the fixed order used by `BoxData` arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Front,
    Rear,
    Left,
    Right,
    Top,
    Bottom,
}

impl Face {
    pub const ALL: [Face; 6] =
        [Face::Front, Face::Rear, Face::Left, Face::Right, Face::Top, Face::Bottom];

    pub fn index(self) -> usize {
        match self {
            Face::Front => 0,
            Face::Rear => 1,
            Face::Left => 2,
            Face::Right => 3,
            Face::Top => 4,
            Face::Bottom => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Face::Front => "frontFace",
            Face::Rear => "rearFace",
            Face::Left => "leftFace",
            Face::Right => "rightFace",
            Face::Top => "topFace",
            Face::Bottom => "bottomFace",
        }
    }
}

/// Per-face display setting for a box.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FaceSetting {
    Hidden,
    /// Shown with the box color.
    #[default]
    Visible,
    /// Shown with its own paint; not overwritten by later box-color writes.
    Painted(Paint),
}

#[derive(Debug, Clone)]
pub struct BoxData {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub backface: Backface,
    pub front: Vector,
    pub faces: [FaceSetting; 6],
    /// Face rect nodes, present only while the face is shown.
    pub face_rects: [Option<Uuid>; 6],
}
