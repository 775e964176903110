//! Scene-graph arena
//!
//! Nodes are stored in an id-keyed arena with separate parent and children
//! maps; attach/detach update both sides and reject cycles. The flattened
//! draw list is cached per root (and per group) behind an explicit dirty
//! flag that is set on any child-set change.

mod node;
mod sort;
mod transforms;

pub use node::*;

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::{SceneError, SceneResult};
use crate::paint::{Paint, PaintRef};
use crate::texture::{Texture, TextureOptions};

/// Mutable shared state for a whole node hierarchy, plus the texture store.
///
/// Single-threaded by design: callers drive mutation, `update_graph` and
/// `render_graph` from one logical thread, once per displayed frame.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: HashMap<Uuid, Node>,
    children: HashMap<Uuid, Vec<Uuid>>,
    parent: HashMap<Uuid, Uuid>,
    textures: HashMap<Uuid, Texture>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: Uuid) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Mutable node access; transforms may be edited freely between frames.
    pub fn node_mut(&mut self, id: Uuid) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub(crate) fn get(&self, id: Uuid) -> SceneResult<&Node> {
        self.nodes.get(&id).ok_or(SceneError::NodeNotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: Uuid) -> SceneResult<&mut Node> {
        self.nodes.get_mut(&id).ok_or(SceneError::NodeNotFound(id))
    }

    pub fn children_of(&self, id: Uuid) -> &[Uuid] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parent_of(&self, id: Uuid) -> Option<Uuid> {
        self.parent.get(&id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Insert a freshly-built node, optionally under a parent.
    pub(crate) fn insert(&mut self, node: Node, parent: Option<Uuid>) -> SceneResult<Uuid> {
        let id = node.id;
        if let Some(parent_id) = parent {
            if !self.contains(parent_id) {
                return Err(SceneError::NodeNotFound(parent_id));
            }
        }
        self.nodes.insert(id, node);
        if let Some(parent_id) = parent {
            self.attach(parent_id, id)?;
        }
        Ok(id)
    }

    /// Make `child` a child of `parent`, detaching it from any previous
    /// parent first. Both sides are updated together.
    pub fn attach(&mut self, parent: Uuid, child: Uuid) -> SceneResult<()> {
        if !self.contains(parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        if !self.contains(child) {
            return Err(SceneError::NodeNotFound(child));
        }
        if self.would_create_cycle(parent, child) {
            return Err(SceneError::WouldCreateCycle { parent, child });
        }
        if self.parent_of(child) == Some(parent) {
            return Ok(());
        }
        self.detach(child)?;
        self.children.entry(parent).or_default().push(child);
        self.parent.insert(child, parent);
        self.mark_flat_dirty_from(parent);
        Ok(())
    }

    /// Remove `child` from its parent, leaving it as a detached root.
    pub fn detach(&mut self, child: Uuid) -> SceneResult<()> {
        if !self.contains(child) {
            return Err(SceneError::NodeNotFound(child));
        }
        if let Some(parent_id) = self.parent.remove(&child) {
            if let Some(siblings) = self.children.get_mut(&parent_id) {
                siblings.retain(|id| *id != child);
            }
            self.mark_flat_dirty_from(parent_id);
        }
        Ok(())
    }

    /// Remove a node and its whole subtree, dropping owned textures.
    pub fn remove(&mut self, id: Uuid) -> SceneResult<()> {
        if !self.contains(id) {
            return Err(SceneError::NodeNotFound(id));
        }
        self.detach(id)?;

        // collect the subtree breadth-first
        let mut to_remove = vec![id];
        let mut i = 0;
        while i < to_remove.len() {
            to_remove.extend_from_slice(self.children_of(to_remove[i]));
            i += 1;
        }

        for node_id in to_remove {
            if let Some(node) = self.nodes.remove(&node_id) {
                for texture_id in owned_texture_ids(&node) {
                    self.textures.remove(&texture_id);
                }
            }
            self.children.remove(&node_id);
            self.parent.remove(&node_id);
        }
        Ok(())
    }

    /// True if `child` is `parent` or one of its ancestors.
    pub(crate) fn would_create_cycle(&self, parent: Uuid, child: Uuid) -> bool {
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == child {
                return true;
            }
            current = self.parent_of(id);
        }
        false
    }

    /// Invalidate flattened-list caches on `id` and its ancestors. A group
    /// absorbs the change: anything above it sees the group as one opaque
    /// item, so propagation stops after marking the group itself.
    pub(crate) fn mark_flat_dirty_from(&mut self, id: Uuid) {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.nodes.get_mut(&node_id) else { break };
            node.flat_dirty = true;
            if node.is_group() {
                break;
            }
            current = self.parent_of(node_id);
        }
    }

    // ----- textures ----- //

    pub fn add_texture(&mut self, options: TextureOptions) -> Uuid {
        let texture = Texture::new(options);
        let id = texture.id;
        self.textures.insert(id, texture);
        id
    }

    pub fn texture(&self, id: Uuid) -> Option<&Texture> {
        self.textures.get(&id)
    }

    /// New texture instance with the same definition; composite builders use
    /// this so every part owns its own instance.
    pub fn clone_texture(&mut self, id: Uuid) -> SceneResult<Uuid> {
        let texture =
            self.textures.get(&id).ok_or(SceneError::TextureNotFound(id))?.clone_instance();
        let clone_id = texture.id;
        self.textures.insert(clone_id, texture);
        Ok(clone_id)
    }

    /// Clone of a paint that never shares a texture instance.
    pub(crate) fn clone_paint(&mut self, paint: &Paint) -> SceneResult<Paint> {
        match paint {
            Paint::Color(value) => Ok(Paint::Color(value.clone())),
            Paint::Texture(id) => Ok(Paint::Texture(self.clone_texture(*id)?)),
        }
    }

    /// Resolve a paint for a backend call.
    pub(crate) fn resolve_paint<'a>(&'a self, paint: &'a Paint) -> SceneResult<PaintRef<'a>> {
        match paint {
            Paint::Color(value) => Ok(PaintRef::Color(value)),
            Paint::Texture(id) => self
                .textures
                .get(id)
                .map(PaintRef::Texture)
                .ok_or(SceneError::TextureNotFound(*id)),
        }
    }

    pub(crate) fn texture_mut(&mut self, id: Uuid) -> Option<&mut Texture> {
        self.textures.get_mut(&id)
    }
}

/// Texture instances referenced by a node's paints.
pub(crate) fn owned_texture_ids(node: &Node) -> Vec<Uuid> {
    let mut ids = Vec::new();
    let (style_paints, group_paint) = match &node.kind {
        NodeKind::Shape(shape) => (Some(&shape.style), None),
        NodeKind::Group(group) => (None, Some(&group.color)),
        _ => (None, None),
    };
    if let Some(style) = style_paints {
        if let Some(id) = style.color.texture_id() {
            ids.push(id);
        }
        if let crate::paint::Backface::Painted(paint) = &style.backface {
            if let Some(id) = paint.texture_id() {
                ids.push(id);
            }
        }
    }
    if let Some(paint) = group_paint {
        if let Some(id) = paint.texture_id() {
            ids.push(id);
        }
    }
    ids
}
