//! Stroke and fill paints
//!
//! A paint is either a flat CSS-style color or a handle to a [`Texture`]
//! owned by the scene. Backends receive an already-resolved [`PaintRef`];
//! they never see raw texture ids.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::texture::Texture;

/// Default shape color.
pub const DEFAULT_COLOR: &str = "#333";

/// Flat color or texture handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Paint {
    /// CSS-style color value, passed through to the backend verbatim.
    Color(String),
    /// Gradient texture owned by the scene. One shape per texture instance;
    /// sharing a handle across shapes would transform it twice per frame.
    Texture(Uuid),
}

impl Paint {
    /// Flat color value, `None` for texture paints.
    pub fn color(&self) -> Option<&str> {
        match self {
            Paint::Color(value) => Some(value),
            Paint::Texture(_) => None,
        }
    }

    pub fn texture_id(&self) -> Option<Uuid> {
        match self {
            Paint::Texture(id) => Some(*id),
            Paint::Color(_) => None,
        }
    }
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Color(DEFAULT_COLOR.to_string())
    }
}

impl From<&str> for Paint {
    fn from(value: &str) -> Self {
        Paint::Color(value.to_string())
    }
}

impl From<String> for Paint {
    fn from(value: String) -> Self {
        Paint::Color(value)
    }
}

/// Paint with any texture handle resolved, as handed to backends.
#[derive(Debug, Clone, Copy)]
pub enum PaintRef<'a> {
    Color(&'a str),
    Texture(&'a Texture),
}

impl PaintRef<'_> {
    /// Owned form, for retained backends that record draw ops.
    pub fn to_paint(&self) -> Paint {
        match self {
            PaintRef::Color(value) => Paint::Color((*value).to_string()),
            PaintRef::Texture(texture) => Paint::Texture(texture.id),
        }
    }
}

/// How a shape treats its away-facing side.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Backface {
    /// Rendered with the regular color.
    #[default]
    Visible,
    /// Skipped entirely while facing back.
    Hidden,
    /// Rendered with this paint instead of the regular color.
    Painted(Paint),
}

impl Backface {
    pub fn is_hidden(&self) -> bool {
        matches!(self, Backface::Hidden)
    }
}

impl From<bool> for Backface {
    fn from(visible: bool) -> Self {
        if visible { Backface::Visible } else { Backface::Hidden }
    }
}

impl From<Paint> for Backface {
    fn from(paint: Paint) -> Self {
        Backface::Painted(paint)
    }
}

impl From<&str> for Backface {
    fn from(value: &str) -> Self {
        Backface::Painted(Paint::from(value))
    }
}
