//! Drawing implements: the data + visual half of each shape.

mod point;
mod rectangle;

pub use point::{PointData, PointImplement};
pub use rectangle::{RectData, RectangleImplement};

use crate::surface::{GroupId, NodeId, Surface};
use kurbo::Point;
use peniko::Color;

/// Default rendered radius of a point, in surface units.
pub const POINT_RADIUS: f64 = 3.0;

/// Shape kind tag carried by every implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImplementKind {
    Point,
    Rectangle,
}

/// Shared contract of all implements.
///
/// `create_visual` is idempotent: a second call refreshes the existing
/// handle instead of attaching a duplicate. `update_visual` is a no-op
/// without a handle, and `remove_visual` may be called repeatedly.
pub trait Implement {
    /// Unique id, assigned no later than placement commit.
    fn id(&self) -> Option<&str>;

    /// Assign the id. Once set the id is immutable; a second assignment is
    /// logged and ignored.
    fn assign_id(&mut self, id: String);

    fn kind(&self) -> ImplementKind;

    fn node(&self) -> Option<NodeId>;

    fn group(&self) -> Option<GroupId>;

    fn create_visual(&mut self, surface: &mut dyn Surface, group: GroupId);

    fn update_visual(&self, surface: &mut dyn Surface);

    /// Whether the point at surface-local `pos` lies within `tolerance` of
    /// this implement.
    fn hit_test(&self, surface: &dyn Surface, pos: Point, tolerance: f64) -> bool;

    fn remove_visual(&mut self, surface: &mut dyn Surface);
}

pub(crate) fn black() -> Color {
    Color::from_rgba8(0, 0, 0, 255)
}

pub(crate) fn selection_blue() -> Color {
    Color::from_rgba8(0, 0, 255, 255)
}

pub(crate) fn hover_grey() -> Color {
    Color::from_rgba8(128, 128, 128, 255)
}
