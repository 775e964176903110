//! Flattening and painter's-algorithm depth sort
//!
//! Groups are sorting boundaries: to its parent a group is one opaque item,
//! sorted by the average depth of its contents; internally it keeps its own
//! flattened list. Flattened lists are cached and rebuilt only when the
//! dirty flag set by attach/detach says so.

use std::cmp::Ordering;

use uuid::Uuid;

use crate::error::{SceneError, SceneResult};
use crate::math::lerp;
use crate::scene::{NodeKind, Scene, SolidExtra};

impl Scene {
    /// Recompute world transforms and depth order below `root`. Call once
    /// per frame before rendering.
    pub fn update_graph(&mut self, root: Uuid) -> SceneResult<()> {
        if !self.contains(root) {
            return Err(SceneError::NodeNotFound(root));
        }
        self.update_node(root);
        self.ensure_flat(root);

        let items = self.flat_graph_of(root).to_vec();
        for id in &items {
            self.update_sort_value(*id);
        }
        self.sort_flat_list(root);
        tracing::debug!(root = %root, items = items.len(), "updated render graph");
        Ok(())
    }

    /// Flattened draw list of the last update, back to front.
    pub fn flat_graph_of(&self, id: Uuid) -> &[Uuid] {
        self.node(id).map(|node| node.flat_graph.as_slice()).unwrap_or(&[])
    }

    /// Rebuild this node's flattened list if dirty, then make sure every
    /// group inside it has a fresh internal list too.
    pub(crate) fn ensure_flat(&mut self, id: Uuid) {
        let dirty = self.node(id).map(|node| node.flat_dirty).unwrap_or(false);
        if dirty {
            self.rebuild_flat(id);
        }
        let items = self.flat_graph_of(id).to_vec();
        for item in items {
            if item != id && self.node(item).map(|node| node.is_group()).unwrap_or(false) {
                self.ensure_flat(item);
            }
        }
    }

    fn rebuild_flat(&mut self, id: Uuid) {
        let Some(node) = self.node(id) else { return };
        let mut list = Vec::new();
        // a group's own list holds only its contents
        if !node.is_group() {
            list.push(id);
        }
        let child_ids: Vec<Uuid> = self.children_of(id).to_vec();
        for child_id in child_ids {
            self.collect_flat(child_id, &mut list);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.flat_graph = list;
            node.flat_dirty = false;
        }
    }

    /// Push `id` and, unless it is a group, its flattened descendants.
    fn collect_flat(&self, id: Uuid, out: &mut Vec<Uuid>) {
        let Some(node) = self.node(id) else { return };
        out.push(id);
        if node.is_group() {
            return;
        }
        for child_id in self.children_of(id) {
            self.collect_flat(*child_id, out);
        }
    }

    fn update_sort_value(&mut self, id: Uuid) {
        let Some(node) = self.node(id) else { return };
        let sort_value = match &node.kind {
            NodeKind::Anchor | NodeKind::Composite(_) => node.render_origin.z,
            NodeKind::Shape(shape) => {
                let mut value = shape_depth(shape);
                match shape.solid {
                    SolidExtra::None => {}
                    SolidExtra::Cone { apex, .. } => {
                        self.update_sort_value(apex);
                        let apex_depth = self.sort_value_of(apex);
                        value = lerp(value, apex_depth, 1.0 / 3.0);
                    }
                    SolidExtra::Hemisphere { apex } => {
                        self.update_sort_value(apex);
                        let apex_depth = self.sort_value_of(apex);
                        value = lerp(value, apex_depth, 3.0 / 8.0);
                    }
                }
                value
            }
            NodeKind::Group(group) => {
                let update_sort = group.update_sort;
                self.ensure_flat(id);
                let items = self.flat_graph_of(id).to_vec();
                for item in &items {
                    self.update_sort_value(*item);
                }
                let value = if items.is_empty() {
                    // nothing to average over
                    self.node(id).map(|node| node.render_origin.z).unwrap_or(0.0)
                } else {
                    let sum: f64 = items.iter().map(|item| self.sort_value_of(*item)).sum();
                    sum / items.len() as f64
                };
                if update_sort {
                    self.sort_flat_list(id);
                }
                value
            }
        };
        if let Some(node) = self.nodes.get_mut(&id) {
            node.sort_value = sort_value;
        }
    }

    pub(crate) fn sort_value_of(&self, id: Uuid) -> f64 {
        self.node(id).map(|node| node.sort_value).unwrap_or(0.0)
    }

    /// Stable ascending sort; equal depths keep insertion order.
    fn sort_flat_list(&mut self, id: Uuid) {
        let mut items = self.flat_graph_of(id).to_vec();
        items.sort_by(|a, b| {
            self.sort_value_of(*a)
                .partial_cmp(&self.sort_value_of(*b))
                .unwrap_or(Ordering::Equal)
        });
        if let Some(node) = self.nodes.get_mut(&id) {
            node.flat_graph = items;
        }
    }
}

/// Mean depth of a shape's path end points. When the path closes back on
/// its exact start the duplicate point is left out of the average.
fn shape_depth(shape: &crate::scene::ShapeData) -> f64 {
    let points: Vec<_> =
        shape.commands.iter().map(|command| command.end_render_point()).collect();
    if points.is_empty() {
        return 0.0;
    }
    let mut count = points.len();
    if count > 2 && points[0].is_same(points[count - 1]) {
        count -= 1;
    }
    let sum: f64 = points[..count].iter().map(|point| point.z).sum();
    sum / count as f64
}
