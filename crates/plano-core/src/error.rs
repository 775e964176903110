//! Error types for scene-graph operations

use thiserror::Error;
use uuid::Uuid;

/// Error type for scene operations.
///
/// Geometric edge cases (degenerate apex vectors, invisible tangents) are
/// never errors; they suppress the affected draw instead.
#[derive(Debug, Clone, Error)]
pub enum SceneError {
    #[error("Node not found: {0}")]
    NodeNotFound(Uuid),

    #[error("Texture not found: {0}")]
    TextureNotFound(Uuid),

    #[error("Attaching {child} under {parent} would create a cycle")]
    WouldCreateCycle { parent: Uuid, child: Uuid },

    #[error("Node {id} is not a {expected}")]
    KindMismatch { id: Uuid, expected: &'static str },

    #[error("Malformed graph: {0}")]
    MalformedGraph(String),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
