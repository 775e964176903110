//! Frame update: world-transform propagation
//!
//! `update_node` rebuilds a subtree's render state from scratch every call:
//! reset to local values, update children depth-first, then apply the node's
//! own transform cumulatively to itself and every descendant. A node's world
//! state is therefore its local state run through each ancestor transform in
//! leaf-to-root order.

use uuid::Uuid;

use crate::math::Vector;
use crate::scene::{GroupSurface, NodeKind, Scene, owned_texture_ids};

impl Scene {
    /// Recompute render state below `id`; no-op for unknown ids.
    pub(crate) fn update_node(&mut self, id: Uuid) {
        self.reset_node(id);

        // collect children IDs first to avoid borrow issues
        let child_ids: Vec<Uuid> = self.children_of(id).to_vec();
        for child_id in child_ids {
            self.update_node(child_id);
        }

        let Some(node) = self.node(id) else { return };
        let (translate, rotate, scale) = (node.translate, node.rotate, node.scale);
        self.transform_subtree(id, translate, rotate, scale);
    }

    fn reset_node(&mut self, id: Uuid) {
        let mut texture_ids = Vec::new();
        if let Some(node) = self.nodes.get_mut(&id) {
            node.render_origin = node.origin;
            match &mut node.kind {
                NodeKind::Shape(shape) => {
                    shape.render_front = shape.front;
                    shape.render_normal = Vector::ZERO;
                    for command in &mut shape.commands {
                        command.reset();
                    }
                }
                NodeKind::Group(group) => {
                    if let GroupSurface::Horn { front, render_front, render_normal, .. } =
                        &mut group.surface
                    {
                        *render_front = *front;
                        *render_normal = Vector::ZERO;
                    }
                }
                _ => {}
            }
            texture_ids = owned_texture_ids(node);
        }
        for texture_id in texture_ids {
            if let Some(texture) = self.texture_mut(texture_id) {
                texture.reset();
            }
        }
    }

    /// Apply one transform to a node's render state and, with the same
    /// arguments, to every descendant.
    pub(crate) fn transform_subtree(
        &mut self,
        id: Uuid,
        translate: Vector,
        rotate: Vector,
        scale: Vector,
    ) {
        let mut texture_ids = Vec::new();
        if let Some(node) = self.nodes.get_mut(&id) {
            node.render_origin.transform(translate, rotate, scale);
            match &mut node.kind {
                NodeKind::Shape(shape) => {
                    for command in &mut shape.commands {
                        command.transform(translate, rotate, scale);
                    }
                    shape.render_front.transform(translate, rotate, scale);
                    shape.render_normal = node.render_origin;
                    shape.render_normal.subtract(shape.render_front);
                }
                NodeKind::Group(group) => {
                    if let GroupSurface::Horn { render_front, render_normal, .. } =
                        &mut group.surface
                    {
                        render_front.transform(translate, rotate, scale);
                        *render_normal = node.render_origin;
                        render_normal.subtract(*render_front);
                    }
                }
                _ => {}
            }
            texture_ids = owned_texture_ids(node);
        }
        for texture_id in texture_ids {
            if let Some(texture) = self.texture_mut(texture_id) {
                texture.transform(translate, rotate, scale);
            }
        }

        let child_ids: Vec<Uuid> = self.children_of(id).to_vec();
        for child_id in child_ids {
            self.transform_subtree(child_id, translate, rotate, scale);
        }
    }
}
