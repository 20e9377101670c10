//! Canvas surface abstraction.
//!
//! The engine never draws pixels itself; it manipulates renderable handles
//! through this capability and leaves rasterization to the backend.

mod memory;

pub use memory::{GroupRecord, MemorySurface, NodeRecord};

use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Handle to a renderable shape node owned by a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// Handle to a container group inside a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u64);

/// Typed attribute record applied to a node, variant per shape kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeAttrs {
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: Color,
        stroke: Color,
        stroke_width: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        /// `None` renders as an unfilled outline.
        fill: Option<Color>,
        stroke: Color,
        stroke_width: f64,
    },
}

/// Capability to manage renderable handles inside a hierarchical group
/// structure.
///
/// Nodes are created hidden; callers apply attributes and then toggle
/// visibility, so a half-configured shape never flashes on screen.
pub trait Surface {
    /// Top-left of the surface in client coordinates. The dispatcher
    /// subtracts this from every pointer event.
    fn origin(&self) -> Point;

    /// Create a container group. `None` parents the group at the root.
    fn create_group(&mut self, parent: Option<GroupId>, class: &str) -> GroupId;

    /// Remove a group together with everything attached below it.
    fn remove_group(&mut self, group: GroupId);

    /// Create a shape node inside `group`, initially hidden.
    fn create_node(&mut self, group: GroupId, class: &str, attrs: NodeAttrs) -> NodeId;

    /// Re-apply the full attribute record of an existing node.
    fn set_attrs(&mut self, node: NodeId, attrs: NodeAttrs);

    fn set_visible(&mut self, node: NodeId, visible: bool);

    /// Move a node into another group.
    fn reparent(&mut self, node: NodeId, group: GroupId);

    /// Group a node is currently attached to, if the node exists.
    fn parent_of(&self, node: NodeId) -> Option<GroupId>;

    /// Position of the node as currently rendered. Hit-testing reads this
    /// rather than cached geometry so externally moved handles still
    /// register hits.
    fn rendered_position(&self, node: NodeId) -> Option<Point>;

    /// Detach and discard a node. Unknown ids are ignored.
    fn remove_node(&mut self, node: NodeId);
}
