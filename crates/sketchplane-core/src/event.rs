//! Input event vocabulary and the routing contract.

use crate::surface::Surface;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// The raw event kinds the dispatcher captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    MouseDown,
    MouseUp,
    MouseMove,
    MouseClick,
    KeyDown,
    KeyUp,
    KeyPress,
    /// Captured so the host can suppress the browser menu, but never routed.
    ContextMenu,
}

impl EventKind {
    pub fn is_mouse(self) -> bool {
        matches!(
            self,
            EventKind::MouseDown | EventKind::MouseUp | EventKind::MouseMove | EventKind::MouseClick
        )
    }
}

/// A captured input event.
///
/// `client` is the pointer position as delivered by the host; `local` is the
/// surface-relative position the dispatcher computes before routing. Targets
/// read `local` and set `handled` to request propagation suppression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputEvent {
    pub kind: EventKind,
    pub client: Point,
    pub local: Point,
    pub key: Option<String>,
    pub handled: bool,
}

impl InputEvent {
    /// A mouse event at `client` coordinates.
    pub fn mouse(kind: EventKind, client: Point) -> Self {
        Self {
            kind,
            client,
            local: client,
            key: None,
            handled: false,
        }
    }

    /// A keyboard event carrying a key identifier.
    pub fn keyboard(kind: EventKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            client: Point::ZERO,
            local: Point::ZERO,
            key: Some(key.into()),
            handled: false,
        }
    }
}

/// What a routed target asks of the dispatcher after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Keep routing to this target.
    #[default]
    Continue,
    /// The construction finished placement; hand it to the scene container.
    Yield,
}

/// A routable input target: one accept method per event kind, defaulting to
/// a no-op so states only override what they care about.
pub trait InputTarget {
    fn accept_mouse_down(&mut self, _surface: &mut dyn Surface, _event: &mut InputEvent) -> Flow {
        Flow::Continue
    }

    fn accept_mouse_up(&mut self, _surface: &mut dyn Surface, _event: &mut InputEvent) -> Flow {
        Flow::Continue
    }

    fn accept_mouse_move(&mut self, _surface: &mut dyn Surface, _event: &mut InputEvent) -> Flow {
        Flow::Continue
    }

    fn accept_mouse_click(&mut self, _surface: &mut dyn Surface, _event: &mut InputEvent) -> Flow {
        Flow::Continue
    }

    fn accept_key_down(&mut self, _surface: &mut dyn Surface, _event: &mut InputEvent) -> Flow {
        Flow::Continue
    }

    fn accept_key_up(&mut self, _surface: &mut dyn Surface, _event: &mut InputEvent) -> Flow {
        Flow::Continue
    }

    fn accept_key_press(&mut self, _surface: &mut dyn Surface, _event: &mut InputEvent) -> Flow {
        Flow::Continue
    }
}
