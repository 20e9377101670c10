//! Rectangle implement: an axis-aligned, unfilled body.

use super::{black, selection_blue, Implement, ImplementKind};
use crate::surface::{GroupId, NodeAttrs, NodeId, Surface};
use kurbo::Point;
use log::warn;
use serde::{Deserialize, Serialize};

const RECT_CLASS: &str = "construction-rectangle";

/// Geometry and selection flag of a rectangle body.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectData {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub selected: bool,
}

/// Implement for a rectangle body.
#[derive(Debug, Clone, Default)]
pub struct RectangleImplement {
    id: Option<String>,
    pub data: RectData,
    node: Option<NodeId>,
    group: Option<GroupId>,
}

impl RectangleImplement {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }

    fn attrs(&self) -> NodeAttrs {
        let (stroke, stroke_width) = if self.data.selected {
            (selection_blue(), 2.0)
        } else {
            (black(), 1.0)
        };
        NodeAttrs::Rect {
            x: self.data.x,
            y: self.data.y,
            width: self.data.width,
            height: self.data.height,
            fill: None,
            stroke,
            stroke_width,
        }
    }
}

impl Implement for RectangleImplement {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn assign_id(&mut self, id: String) {
        if let Some(existing) = &self.id {
            warn!("rectangle implement already has id '{existing}', ignoring '{id}'");
            return;
        }
        self.id = Some(id);
    }

    fn kind(&self) -> ImplementKind {
        ImplementKind::Rectangle
    }

    fn node(&self) -> Option<NodeId> {
        self.node
    }

    fn group(&self) -> Option<GroupId> {
        self.group
    }

    fn create_visual(&mut self, surface: &mut dyn Surface, group: GroupId) {
        self.group = Some(group);
        if self.node.is_none() {
            self.node = Some(surface.create_node(group, RECT_CLASS, self.attrs()));
        }
        self.update_visual(surface);
        if let Some(node) = self.node {
            surface.set_visible(node, true);
        }
    }

    fn update_visual(&self, surface: &mut dyn Surface) {
        if let Some(node) = self.node {
            surface.set_attrs(node, self.attrs());
        }
    }

    fn hit_test(&self, _surface: &dyn Surface, pos: Point, _tolerance: f64) -> bool {
        if self.node.is_none() {
            return false;
        }
        // Bounding-box containment; tolerance applies to point handles only.
        pos.x >= self.data.x
            && pos.x <= self.data.x + self.data.width
            && pos.y >= self.data.y
            && pos.y <= self.data.y + self.data.height
    }

    fn remove_visual(&mut self, surface: &mut dyn Surface) {
        if let Some(node) = self.node.take() {
            surface.remove_node(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    fn committed_rect(surface: &mut MemorySurface) -> (RectangleImplement, GroupId) {
        let group = surface.create_group(None, "canvas");
        let mut rect = RectangleImplement::new();
        rect.data = RectData {
            x: 10.0,
            y: 10.0,
            width: 100.0,
            height: 50.0,
            selected: false,
        };
        rect.create_visual(surface, group);
        (rect, group)
    }

    #[test]
    fn test_hit_test_is_containment() {
        let mut surface = MemorySurface::new();
        let (rect, _) = committed_rect(&mut surface);

        assert!(rect.hit_test(&surface, Point::new(60.0, 35.0), 0.0));
        assert!(rect.hit_test(&surface, Point::new(10.0, 10.0), 0.0));
        // Tolerance does not inflate the box.
        assert!(!rect.hit_test(&surface, Point::new(111.0, 35.0), 8.0));
    }

    #[test]
    fn test_body_is_unfilled() {
        let mut surface = MemorySurface::new();
        let (rect, _) = committed_rect(&mut surface);

        match surface.node(rect.node().unwrap()).unwrap().attrs {
            NodeAttrs::Rect { fill, stroke, .. } => {
                assert!(fill.is_none());
                assert_eq!(stroke, black());
            }
            _ => panic!("rectangle renders as a rect"),
        }
    }

    #[test]
    fn test_create_visual_is_idempotent() {
        let mut surface = MemorySurface::new();
        let (mut rect, group) = committed_rect(&mut surface);
        rect.create_visual(&mut surface, group);
        assert_eq!(surface.node_count(), 1);
    }
}
