//! Flat-styled pseudo-3D illustration engine
//!
//! Models a scene as a tree of nodes with per-axis translate/rotate/scale,
//! projects everything onto the drawing plane with painter's-algorithm
//! depth sorting, and hands flat stroke/fill calls to a pluggable backend.
//!
//! - [`scene::Scene`] - Arena-based scene graph, update and sort pipeline
//! - [`shapes`] - Primitive shape builders (rect, ellipse, polygon, paths)
//! - [`solids`] - Composite solids (cylinder, horn, funnel, cone, box)
//! - [`render::RenderBackend`] - Draw-op interface for output surfaces
//! - [`texture`] - Gradient texture mapping for fills and strokes
//! - [`io`] - JSON tree-literal export and revive
//!
//! # Example
//!
//! ```
//! use plano_core::{EllipseOptions, Scene, Style};
//! use plano_core::render::DisplayListBackend;
//!
//! let mut scene = Scene::new();
//! let root = scene.add_anchor(None, Default::default()).unwrap();
//! scene
//!     .add_ellipse(
//!         Some(root),
//!         EllipseOptions {
//!             diameter: 2.0,
//!             style: Style { stroke: 0.5, ..Default::default() },
//!             ..Default::default()
//!         },
//!     )
//!     .unwrap();
//!
//! scene.update_graph(root).unwrap();
//! let mut backend = DisplayListBackend::new();
//! scene.render_graph(root, &mut backend).unwrap();
//! ```

pub mod error;
pub mod io;
pub mod math;
pub mod paint;
pub mod path;
pub mod render;
pub mod scene;
pub mod shapes;
pub mod solids;
pub mod texture;

pub use error::{SceneError, SceneResult};
pub use io::{export_graph, import_graph};
pub use math::{TAU, Vector};
pub use paint::{Backface, Paint, PaintRef};
pub use path::{Command, PathCommand, PathStep};
pub use scene::*;
pub use shapes::{
    EllipseOptions, GroupOptions, PolygonOptions, RectOptions, RoundedRectOptions, ShapeOptions,
};
pub use solids::{
    BoxOptions, ConeOptions, CylinderOptions, FunnelOptions, HemisphereOptions, HornOptions,
    SolidHandle,
};
pub use texture::{ColorStop, Gradient, Quad, Texture, TextureOptions};
