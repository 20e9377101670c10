//! In-memory retained-tree surface.
//!
//! Keeps every group and node in insertion order so backends (and tests)
//! can walk the tree deterministically.

use super::{GroupId, NodeAttrs, NodeId, Surface};
use indexmap::IndexMap;
use kurbo::Point;

/// A container group in the retained tree.
#[derive(Debug, Clone)]
pub struct GroupRecord {
    pub id: GroupId,
    pub parent: Option<GroupId>,
    pub class: String,
}

/// A shape node in the retained tree.
#[derive(Debug, Clone)]
pub struct NodeRecord {
    pub id: NodeId,
    pub group: GroupId,
    pub class: String,
    pub attrs: NodeAttrs,
    pub visible: bool,
}

/// Headless [`Surface`] implementation backed by plain maps.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    origin: Point,
    groups: IndexMap<GroupId, GroupRecord>,
    nodes: IndexMap<NodeId, NodeRecord>,
    next_id: u64,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Surface whose top-left sits at `origin` in client coordinates.
    pub fn with_origin(origin: Point) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeRecord> {
        self.nodes.get(&id)
    }

    pub fn group(&self, id: GroupId) -> Option<&GroupRecord> {
        self.groups.get(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Groups in creation order.
    pub fn groups(&self) -> impl Iterator<Item = &GroupRecord> {
        self.groups.values()
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeRecord> {
        self.nodes.values()
    }

    /// Nodes attached to `group`, in creation order.
    pub fn nodes_in(&self, group: GroupId) -> impl Iterator<Item = &NodeRecord> {
        self.nodes.values().filter(move |n| n.group == group)
    }

    /// Groups whose parent is `parent`, in creation order.
    pub fn groups_in(&self, parent: Option<GroupId>) -> impl Iterator<Item = &GroupRecord> {
        self.groups.values().filter(move |g| g.parent == parent)
    }
}

impl Surface for MemorySurface {
    fn origin(&self) -> Point {
        self.origin
    }

    fn create_group(&mut self, parent: Option<GroupId>, class: &str) -> GroupId {
        let id = GroupId(self.next_id());
        self.groups.insert(
            id,
            GroupRecord {
                id,
                parent,
                class: class.to_string(),
            },
        );
        id
    }

    fn remove_group(&mut self, group: GroupId) {
        let children: Vec<GroupId> = self
            .groups
            .values()
            .filter(|g| g.parent == Some(group))
            .map(|g| g.id)
            .collect();
        for child in children {
            self.remove_group(child);
        }
        self.nodes.retain(|_, n| n.group != group);
        self.groups.shift_remove(&group);
    }

    fn create_node(&mut self, group: GroupId, class: &str, attrs: NodeAttrs) -> NodeId {
        let id = NodeId(self.next_id());
        self.nodes.insert(
            id,
            NodeRecord {
                id,
                group,
                class: class.to_string(),
                attrs,
                visible: false,
            },
        );
        id
    }

    fn set_attrs(&mut self, node: NodeId, attrs: NodeAttrs) {
        if let Some(record) = self.nodes.get_mut(&node) {
            record.attrs = attrs;
        }
    }

    fn set_visible(&mut self, node: NodeId, visible: bool) {
        if let Some(record) = self.nodes.get_mut(&node) {
            record.visible = visible;
        }
    }

    fn reparent(&mut self, node: NodeId, group: GroupId) {
        if let Some(record) = self.nodes.get_mut(&node) {
            record.group = group;
        }
    }

    fn parent_of(&self, node: NodeId) -> Option<GroupId> {
        self.nodes.get(&node).map(|n| n.group)
    }

    fn rendered_position(&self, node: NodeId) -> Option<Point> {
        self.nodes.get(&node).map(|n| match n.attrs {
            NodeAttrs::Circle { cx, cy, .. } => Point::new(cx, cy),
            NodeAttrs::Rect { x, y, .. } => Point::new(x, y),
        })
    }

    fn remove_node(&mut self, node: NodeId) {
        self.nodes.shift_remove(&node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use peniko::Color;

    fn circle(cx: f64, cy: f64) -> NodeAttrs {
        NodeAttrs::Circle {
            cx,
            cy,
            r: 3.0,
            fill: Color::from_rgba8(0, 0, 0, 255),
            stroke: Color::from_rgba8(0, 0, 0, 255),
            stroke_width: 1.0,
        }
    }

    #[test]
    fn test_nodes_created_hidden() {
        let mut surface = MemorySurface::new();
        let group = surface.create_group(None, "canvas");
        let node = surface.create_node(group, "block-point", circle(10.0, 20.0));

        assert!(!surface.node(node).unwrap().visible);
        surface.set_visible(node, true);
        assert!(surface.node(node).unwrap().visible);
    }

    #[test]
    fn test_rendered_position_follows_attrs() {
        let mut surface = MemorySurface::new();
        let group = surface.create_group(None, "canvas");
        let node = surface.create_node(group, "block-point", circle(10.0, 20.0));

        assert_eq!(surface.rendered_position(node), Some(Point::new(10.0, 20.0)));

        surface.set_attrs(node, circle(33.0, 44.0));
        assert_eq!(surface.rendered_position(node), Some(Point::new(33.0, 44.0)));
    }

    #[test]
    fn test_reparent_moves_node() {
        let mut surface = MemorySurface::new();
        let a = surface.create_group(None, "a");
        let b = surface.create_group(None, "b");
        let node = surface.create_node(a, "block-point", circle(0.0, 0.0));

        assert_eq!(surface.parent_of(node), Some(a));
        surface.reparent(node, b);
        assert_eq!(surface.parent_of(node), Some(b));
    }

    #[test]
    fn test_remove_group_drops_subtree() {
        let mut surface = MemorySurface::new();
        let root = surface.create_group(None, "canvas");
        let inner = surface.create_group(Some(root), "plane");
        let node = surface.create_node(inner, "block-point", circle(0.0, 0.0));

        surface.remove_group(root);
        assert!(surface.node(node).is_none());
        assert!(surface.group(inner).is_none());
        assert_eq!(surface.node_count(), 0);
    }

    #[test]
    fn test_remove_node_is_ignored_for_unknown_id() {
        let mut surface = MemorySurface::new();
        surface.remove_node(NodeId(99));
        assert_eq!(surface.node_count(), 0);
    }
}
