//! Point implement: a small filled circle.

use super::{black, hover_grey, selection_blue, Implement, ImplementKind, POINT_RADIUS};
use crate::surface::{GroupId, NodeAttrs, NodeId, Surface};
use kurbo::Point;
use log::warn;
use serde::{Deserialize, Serialize};

const POINT_CLASS: &str = "block-point";

/// Geometry and interaction flags of a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointData {
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub selected: bool,
    pub hovered: bool,
}

impl Default for PointData {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            r: POINT_RADIUS,
            selected: false,
            hovered: false,
        }
    }
}

/// Implement for a single point.
#[derive(Debug, Clone, Default)]
pub struct PointImplement {
    id: Option<String>,
    pub data: PointData,
    node: Option<NodeId>,
    group: Option<GroupId>,
}

impl PointImplement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a fresh drawing cycle: the visual must already be removed.
    pub(crate) fn clear_id(&mut self) {
        self.id = None;
    }

    fn attrs(&self) -> NodeAttrs {
        // Selection wins over hover; both fall back to plain black/black.
        let (fill, stroke, stroke_width) = if self.data.selected {
            (black(), selection_blue(), 2.0)
        } else if self.data.hovered {
            (hover_grey(), black(), 1.0)
        } else {
            (black(), black(), 1.0)
        };
        NodeAttrs::Circle {
            cx: self.data.x,
            cy: self.data.y,
            r: self.data.r,
            fill,
            stroke,
            stroke_width,
        }
    }
}

impl Implement for PointImplement {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn assign_id(&mut self, id: String) {
        if let Some(existing) = &self.id {
            warn!("point implement already has id '{existing}', ignoring '{id}'");
            return;
        }
        self.id = Some(id);
    }

    fn kind(&self) -> ImplementKind {
        ImplementKind::Point
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
            self.node = Some(surface.create_node(group, POINT_CLASS, self.attrs()));
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

    fn hit_test(&self, surface: &dyn Surface, pos: Point, tolerance: f64) -> bool {
        let Some(node) = self.node else {
            return false;
        };
        // Query the rendered center, not the cached data, so hits stay
        // correct when the handle was moved externally.
        let Some(center) = surface.rendered_position(node) else {
            return false;
        };
        (pos - center).hypot() <= tolerance
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

    #[test]
    fn test_create_visual_is_idempotent() {
        let mut surface = MemorySurface::new();
        let group = surface.create_group(None, "canvas");
        let mut point = PointImplement::new();

        point.create_visual(&mut surface, group);
        point.create_visual(&mut surface, group);

        assert_eq!(surface.node_count(), 1);
    }

    #[test]
    fn test_create_remove_create_round_trip() {
        let mut surface = MemorySurface::new();
        let group = surface.create_group(None, "canvas");
        let mut point = PointImplement::new();

        point.create_visual(&mut surface, group);
        point.remove_visual(&mut surface);
        point.remove_visual(&mut surface); // idempotent
        point.create_visual(&mut surface, group);

        assert_eq!(surface.node_count(), 1);
        assert_eq!(surface.parent_of(point.node().unwrap()), Some(group));
    }

    #[test]
    fn test_hit_test_is_reflexive_at_rendered_center() {
        let mut surface = MemorySurface::new();
        let group = surface.create_group(None, "canvas");
        let mut point = PointImplement::new();
        point.data.x = 50.0;
        point.data.y = 60.0;
        point.create_visual(&mut surface, group);

        let center = Point::new(50.0, 60.0);
        assert!(point.hit_test(&surface, center, 0.0));
        assert!(point.hit_test(&surface, center, POINT_RADIUS));
        assert!(point.hit_test(&surface, Point::new(52.0, 61.0), 8.0));
        assert!(!point.hit_test(&surface, Point::new(200.0, 200.0), 8.0));
    }

    #[test]
    fn test_hit_test_without_visual_misses() {
        let surface = MemorySurface::new();
        let point = PointImplement::new();
        assert!(!point.hit_test(&surface, Point::ZERO, 8.0));
    }

    #[test]
    fn test_hit_test_uses_rendered_position() {
        let mut surface = MemorySurface::new();
        let group = surface.create_group(None, "canvas");
        let mut point = PointImplement::new();
        point.create_visual(&mut surface, group);

        // Move the handle behind the implement's back.
        surface.set_attrs(
            point.node().unwrap(),
            NodeAttrs::Circle {
                cx: 90.0,
                cy: 90.0,
                r: POINT_RADIUS,
                fill: black(),
                stroke: black(),
                stroke_width: 1.0,
            },
        );

        assert!(point.hit_test(&surface, Point::new(90.0, 90.0), 1.0));
        assert!(!point.hit_test(&surface, Point::new(0.0, 0.0), 8.0));
    }

    #[test]
    fn test_selected_styling_wins_over_hover() {
        let mut surface = MemorySurface::new();
        let group = surface.create_group(None, "canvas");
        let mut point = PointImplement::new();
        point.data.selected = true;
        point.data.hovered = true;
        point.create_visual(&mut surface, group);

        match surface.node(point.node().unwrap()).unwrap().attrs {
            NodeAttrs::Circle {
                stroke,
                stroke_width,
                fill,
                ..
            } => {
                assert_eq!(stroke, selection_blue());
                assert!((stroke_width - 2.0).abs() < f64::EPSILON);
                assert_eq!(fill, black());
            }
            _ => panic!("point renders as a circle"),
        }
    }

    #[test]
    fn test_id_is_immutable_once_assigned() {
        let mut point = PointImplement::new();
        point.assign_id("point-1".to_string());
        point.assign_id("point-2".to_string());
        assert_eq!(point.id(), Some("point-1"));
    }
}
