//! Geometric constructions: stateful controllers pairing a state machine
//! with one or more drawing implements.

mod plane;
mod point;
mod rectangle;

pub use plane::PlaneConstruction;
pub use point::{PointConstruction, PointState};
pub use rectangle::{RectangleConstruction, RectangleHit, RectangleState};

use crate::event::{Flow, InputEvent, InputTarget};
use crate::implements::Implement;
use crate::surface::{GroupId, Surface};
use kurbo::Point;
use log::warn;
use thiserror::Error;

/// Hit tolerance for interactive picking, in surface units.
pub const HIT_TOLERANCE: f64 = 8.0;

/// Errors raised by scene mutations. All of them are recoverable: the
/// operation is aborted and no state changes.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("child '{0}' already exists in this plane")]
    DuplicateChild(String),
    #[error("implement for '{0}' has no visual or group context")]
    MissingContext(String),
    #[error("construction keyed as '{key}' owns implement id {actual:?}")]
    IdMismatch {
        key: String,
        actual: Option<String>,
    },
    #[error("unknown tool identifier '{0}'")]
    UnknownTool(String),
}

/// Notification a construction leaves for its owner to drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionChange {
    Moved,
}

/// A placed or in-progress interactive shape.
pub enum Construction {
    Point(PointConstruction),
    Rectangle(RectangleConstruction),
    Plane(PlaneConstruction),
}

impl Construction {
    pub fn selected(&self) -> bool {
        match self {
            Construction::Point(c) => c.selected(),
            Construction::Rectangle(c) => c.selected(),
            Construction::Plane(_) => false,
        }
    }

    pub fn select(&mut self, surface: &mut dyn Surface) {
        match self {
            Construction::Point(c) => c.select(surface),
            Construction::Rectangle(c) => c.select(surface),
            Construction::Plane(_) => {}
        }
    }

    pub fn deselect(&mut self, surface: &mut dyn Surface) {
        match self {
            Construction::Point(c) => c.deselect(surface),
            Construction::Rectangle(c) => c.deselect(surface),
            Construction::Plane(_) => {}
        }
    }

    pub fn hit_test(&self, surface: &dyn Surface, pos: Point, tolerance: f64) -> bool {
        match self {
            Construction::Point(c) => c.hit_test(surface, pos, tolerance),
            Construction::Rectangle(c) => c.hit_test(surface, pos, tolerance),
            Construction::Plane(c) => c.hit_child_id(surface, pos).is_some(),
        }
    }

    /// Hover toggle driven by the scene container's idle rescan.
    pub fn set_hovered(&mut self, surface: &mut dyn Surface, hovered: bool) {
        match self {
            Construction::Point(c) => c.set_hovered(surface, hovered),
            Construction::Rectangle(c) => c.set_hovered(surface, hovered),
            Construction::Plane(_) => {}
        }
    }

    /// Arm the construction for interactive placement.
    pub fn start_drawing(&mut self, surface: &mut dyn Surface) {
        match self {
            Construction::Point(c) => c.start_drawing(surface),
            Construction::Rectangle(c) => c.start_drawing(surface),
            Construction::Plane(_) => warn!("a plane cannot be drawn as a task"),
        }
    }

    /// Remove the construction from interaction, destroying its visuals.
    pub fn stop(&mut self, surface: &mut dyn Surface) {
        match self {
            Construction::Point(c) => c.stop(surface),
            Construction::Rectangle(c) => c.stop(surface),
            Construction::Plane(c) => c.stop(surface),
        }
    }

    /// Id of the primary implement, if assigned.
    pub fn implement_id(&self) -> Option<&str> {
        match self {
            Construction::Point(c) => c.implement().id(),
            Construction::Rectangle(c) => c.implement().id(),
            Construction::Plane(_) => None,
        }
    }

    /// Whether the primary implement has a live visual and group context.
    pub fn has_visual_context(&self) -> bool {
        match self {
            Construction::Point(c) => {
                c.implement().node().is_some() && c.implement().group().is_some()
            }
            Construction::Rectangle(c) => {
                c.implement().node().is_some() && c.implement().group().is_some()
            }
            Construction::Plane(c) => c.group().is_some(),
        }
    }

    /// Make sure every visual exists and is parented under `group`.
    pub fn ensure_visual(&mut self, surface: &mut dyn Surface, group: GroupId) {
        match self {
            Construction::Point(c) => c.ensure_visual(surface, group),
            Construction::Rectangle(c) => c.ensure_visual(surface, group),
            Construction::Plane(c) => {
                c.create_visual(surface, Some(group));
            }
        }
    }

    pub fn as_point(&self) -> Option<&PointConstruction> {
        match self {
            Construction::Point(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_point_mut(&mut self) -> Option<&mut PointConstruction> {
        match self {
            Construction::Point(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_rectangle(&self) -> Option<&RectangleConstruction> {
        match self {
            Construction::Rectangle(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_rectangle_mut(&mut self) -> Option<&mut RectangleConstruction> {
        match self {
            Construction::Rectangle(c) => Some(c),
            _ => None,
        }
    }
}

impl InputTarget for Construction {
    fn accept_mouse_down(&mut self, surface: &mut dyn Surface, event: &mut InputEvent) -> Flow {
        match self {
            Construction::Point(c) => c.accept_mouse_down(surface, event),
            Construction::Rectangle(c) => c.accept_mouse_down(surface, event),
            Construction::Plane(c) => c.accept_mouse_down(surface, event),
        }
    }

    fn accept_mouse_up(&mut self, surface: &mut dyn Surface, event: &mut InputEvent) -> Flow {
        match self {
            Construction::Point(c) => c.accept_mouse_up(surface, event),
            Construction::Rectangle(c) => c.accept_mouse_up(surface, event),
            Construction::Plane(c) => c.accept_mouse_up(surface, event),
        }
    }

    fn accept_mouse_move(&mut self, surface: &mut dyn Surface, event: &mut InputEvent) -> Flow {
        match self {
            Construction::Point(c) => c.accept_mouse_move(surface, event),
            Construction::Rectangle(c) => c.accept_mouse_move(surface, event),
            Construction::Plane(c) => c.accept_mouse_move(surface, event),
        }
    }

    fn accept_mouse_click(&mut self, surface: &mut dyn Surface, event: &mut InputEvent) -> Flow {
        match self {
            Construction::Point(c) => c.accept_mouse_click(surface, event),
            Construction::Rectangle(c) => c.accept_mouse_click(surface, event),
            Construction::Plane(c) => c.accept_mouse_click(surface, event),
        }
    }

    fn accept_key_down(&mut self, surface: &mut dyn Surface, event: &mut InputEvent) -> Flow {
        match self {
            Construction::Point(c) => c.accept_key_down(surface, event),
            Construction::Rectangle(c) => c.accept_key_down(surface, event),
            Construction::Plane(c) => c.accept_key_down(surface, event),
        }
    }

    fn accept_key_up(&mut self, surface: &mut dyn Surface, event: &mut InputEvent) -> Flow {
        match self {
            Construction::Point(c) => c.accept_key_up(surface, event),
            Construction::Rectangle(c) => c.accept_key_up(surface, event),
            Construction::Plane(c) => c.accept_key_up(surface, event),
        }
    }

    fn accept_key_press(&mut self, surface: &mut dyn Surface, event: &mut InputEvent) -> Flow {
        match self {
            Construction::Point(c) => c.accept_key_press(surface, event),
            Construction::Rectangle(c) => c.accept_key_press(surface, event),
            Construction::Plane(c) => c.accept_key_press(surface, event),
        }
    }
}
