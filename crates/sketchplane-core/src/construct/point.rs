//! Point construction: placement, hover, selection and drag of a point.

use super::{ConstructionChange, HIT_TOLERANCE};
use crate::event::{Flow, InputEvent, InputTarget};
use crate::implements::{Implement, PointImplement};
use crate::surface::{GroupId, Surface};
use kurbo::Point;
use log::debug;
use uuid::Uuid;

/// States of a point's life cycle.
///
/// `Enqueued` and `AwaitingPlacement` cover interactive placement while the
/// point is the current task; the rest cycle after it has been handed to
/// the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointState {
    /// Waiting for the first pointer contact after `start_drawing`.
    Enqueued,
    /// Tracking the pointer until a down/up pair commits the position.
    /// `has_down` is the per-activation commit flag: once a down has been
    /// seen, moves stop tracking so a drag cannot commit mid-flight.
    AwaitingPlacement { has_down: bool },
    /// Neutral: placed, neither hovered nor selected.
    Neutral,
    /// Pointer is over the point.
    Hover,
    /// Mouse is down on the point; every move drags it.
    Dragging,
    Selected,
}

/// Controller for a single interactive point.
pub struct PointConstruction {
    implement: PointImplement,
    state: PointState,
    selected: bool,
    group: GroupId,
    change: Option<ConstructionChange>,
}

impl PointConstruction {
    pub fn new(group: GroupId) -> Self {
        Self {
            implement: PointImplement::new(),
            state: PointState::Neutral,
            selected: false,
            group,
            change: None,
        }
    }

    pub fn state(&self) -> PointState {
        self.state
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    pub fn implement(&self) -> &PointImplement {
        &self.implement
    }

    pub fn position(&self) -> Point {
        Point::new(self.implement.data.x, self.implement.data.y)
    }

    /// Arm for a fresh placement cycle.
    pub fn start_drawing(&mut self, surface: &mut dyn Surface) {
        self.implement.remove_visual(surface);
        self.implement.clear_id();
        self.selected = false;
        self.state = PointState::Enqueued;
        debug!("point construction armed for drawing");
    }

    /// Write the next state and run the mandatory on-entry refresh.
    fn transition(&mut self, surface: &mut dyn Surface, next: PointState) {
        self.state = next;
        self.refresh_visual(surface);
    }

    /// Push the current selection/hover flags into the implement and
    /// re-apply its styling.
    pub fn refresh_visual(&mut self, surface: &mut dyn Surface) {
        self.implement.data.selected = self.selected;
        self.implement.data.hovered = self.state == PointState::Hover;
        self.implement.update_visual(surface);
    }

    pub fn select(&mut self, surface: &mut dyn Surface) {
        if !self.selected {
            self.selected = true;
            debug!("point selected");
            self.refresh_visual(surface);
        }
    }

    /// Deselect and settle back into the neutral state.
    pub fn deselect(&mut self, surface: &mut dyn Surface) {
        if self.selected {
            self.selected = false;
            debug!("point deselected");
            self.transition(surface, PointState::Neutral);
        }
    }

    /// Move the point. `internal` suppresses the observer notification;
    /// external moves leave a `Moved` change for the owner to drain.
    pub fn update_position(&mut self, surface: &mut dyn Surface, pos: Point, internal: bool) {
        self.implement.data.x = pos.x;
        self.implement.data.y = pos.y;
        self.implement.update_visual(surface);
        if !internal {
            self.change = Some(ConstructionChange::Moved);
        }
    }

    pub fn take_change(&mut self) -> Option<ConstructionChange> {
        self.change.take()
    }

    pub fn hit_test(&self, surface: &dyn Surface, pos: Point, tolerance: f64) -> bool {
        self.implement.hit_test(surface, pos, tolerance)
    }

    /// Hover toggle from the plane's idle rescan. Only flips between the
    /// neutral and hover states; anything else is left alone.
    pub fn set_hovered(&mut self, surface: &mut dyn Surface, hovered: bool) {
        match (self.state, hovered) {
            (PointState::Neutral, true) => self.transition(surface, PointState::Hover),
            (PointState::Hover, false) => self.transition(surface, PointState::Neutral),
            _ => {}
        }
    }

    pub fn create_visual(&mut self, surface: &mut dyn Surface) {
        self.implement.create_visual(surface, self.group);
    }

    /// Make sure the visual exists and lives under `group`, moving it if a
    /// previous owner parented it elsewhere.
    pub fn ensure_visual(&mut self, surface: &mut dyn Surface, group: GroupId) {
        self.group = group;
        if let Some(node) = self.implement.node() {
            if surface.parent_of(node) != Some(group) {
                surface.reparent(node, group);
            }
        }
        self.implement.create_visual(surface, group);
    }

    /// Remove from interaction and destroy the visual.
    pub fn stop(&mut self, surface: &mut dyn Surface) {
        self.selected = false;
        self.state = PointState::Neutral;
        self.implement.remove_visual(surface);
    }

    /// Position the preview under the pointer, creating the visual lazily.
    fn place_preview(&mut self, surface: &mut dyn Surface, pos: Point) {
        self.implement.data.x = pos.x;
        self.implement.data.y = pos.y;
        if self.implement.node().is_none() {
            self.implement.create_visual(surface, self.group);
        }
        self.implement.update_visual(surface);
    }
}

impl InputTarget for PointConstruction {
    fn accept_mouse_down(&mut self, surface: &mut dyn Surface, event: &mut InputEvent) -> Flow {
        let pos = event.local;
        match self.state {
            PointState::Enqueued => {
                self.place_preview(surface, pos);
                self.transition(surface, PointState::AwaitingPlacement { has_down: false });
                // Drawing-by-click: replay the down into the new state so a
                // single click both positions and commits.
                self.accept_mouse_down(surface, event)
            }
            PointState::AwaitingPlacement { .. } => {
                self.place_preview(surface, pos);
                self.change = Some(ConstructionChange::Moved);
                // Commit step: the id exists from here on.
                if self.implement.id().is_none() {
                    self.implement.assign_id(format!("point-{}", Uuid::new_v4()));
                }
                self.state = PointState::AwaitingPlacement { has_down: true };
                debug!("point placed at ({}, {}), waiting for mouse up", pos.x, pos.y);
                event.handled = true;
                Flow::Continue
            }
            PointState::Neutral => {
                if self.hit_test(surface, pos, HIT_TOLERANCE) {
                    self.select(surface);
                    self.transition(surface, PointState::Dragging);
                }
                Flow::Continue
            }
            PointState::Hover => {
                if self.hit_test(surface, pos, HIT_TOLERANCE) {
                    self.select(surface);
                    self.transition(surface, PointState::Dragging);
                } else {
                    self.deselect(surface);
                    self.transition(surface, PointState::Neutral);
                }
                Flow::Continue
            }
            PointState::Selected => {
                if self.hit_test(surface, pos, HIT_TOLERANCE) {
                    self.transition(surface, PointState::Dragging);
                }
                Flow::Continue
            }
            PointState::Dragging => Flow::Continue,
        }
    }

    fn accept_mouse_up(&mut self, surface: &mut dyn Surface, event: &mut InputEvent) -> Flow {
        let pos = event.local;
        match self.state {
            PointState::AwaitingPlacement { has_down: true } => {
                debug!("point placement finished, yielding control");
                self.transition(surface, PointState::Neutral);
                event.handled = true;
                Flow::Yield
            }
            PointState::Dragging => {
                self.update_position(surface, pos, false);
                self.transition(surface, PointState::Selected);
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    fn accept_mouse_move(&mut self, surface: &mut dyn Surface, event: &mut InputEvent) -> Flow {
        let pos = event.local;
        match self.state {
            PointState::Enqueued => {
                self.place_preview(surface, pos);
                self.transition(surface, PointState::AwaitingPlacement { has_down: false });
            }
            PointState::AwaitingPlacement { has_down } => {
                // After the commit down, moves no longer track the pointer.
                if !has_down {
                    self.update_position(surface, pos, false);
                }
            }
            PointState::Neutral => {
                if !self.selected && self.hit_test(surface, pos, HIT_TOLERANCE) {
                    self.transition(surface, PointState::Hover);
                }
            }
            PointState::Hover => {
                if self.hit_test(surface, pos, HIT_TOLERANCE) {
                    self.refresh_visual(surface);
                } else {
                    self.deselect(surface);
                    self.transition(surface, PointState::Neutral);
                }
            }
            PointState::Dragging => {
                self.update_position(surface, pos, false);
            }
            PointState::Selected => {
                self.refresh_visual(surface);
            }
        }
        Flow::Continue
    }

    fn accept_mouse_click(&mut self, surface: &mut dyn Surface, event: &mut InputEvent) -> Flow {
        let pos = event.local;
        match self.state {
            PointState::AwaitingPlacement { .. } => {
                event.handled = true;
            }
            PointState::Neutral => {
                if self.hit_test(surface, pos, HIT_TOLERANCE) {
                    self.select(surface);
                    self.transition(surface, PointState::Selected);
                }
            }
            PointState::Hover => {
                if self.hit_test(surface, pos, HIT_TOLERANCE) {
                    self.select(surface);
                    self.transition(surface, PointState::Selected);
                } else {
                    self.deselect(surface);
                    self.transition(surface, PointState::Neutral);
                }
            }
            _ => {}
        }
        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::surface::MemorySurface;

    fn armed_point(surface: &mut MemorySurface) -> PointConstruction {
        let group = surface.create_group(None, "canvas");
        let mut point = PointConstruction::new(group);
        point.start_drawing(surface);
        point
    }

    fn mouse(kind: EventKind, x: f64, y: f64) -> InputEvent {
        InputEvent::mouse(kind, Point::new(x, y))
    }

    #[test]
    fn test_move_places_preview_and_advances() {
        let mut surface = MemorySurface::new();
        let mut point = armed_point(&mut surface);

        point.accept_mouse_move(&mut surface, &mut mouse(EventKind::MouseMove, 50.0, 60.0));

        assert_eq!(point.state(), PointState::AwaitingPlacement { has_down: false });
        assert_eq!(point.position(), Point::new(50.0, 60.0));
        assert!(surface.node(point.implement().node().unwrap()).unwrap().visible);
    }

    #[test]
    fn test_down_up_commits_exactly_once() {
        let mut surface = MemorySurface::new();
        let mut point = armed_point(&mut surface);

        point.accept_mouse_move(&mut surface, &mut mouse(EventKind::MouseMove, 50.0, 60.0));
        point.accept_mouse_down(&mut surface, &mut mouse(EventKind::MouseDown, 50.0, 60.0));
        assert!(point.implement().id().is_some());

        let flow = point.accept_mouse_up(&mut surface, &mut mouse(EventKind::MouseUp, 50.0, 60.0));
        assert_eq!(flow, Flow::Yield);
        assert_eq!(point.state(), PointState::Neutral);

        // A stray second up must not commit again.
        let flow = point.accept_mouse_up(&mut surface, &mut mouse(EventKind::MouseUp, 50.0, 60.0));
        assert_eq!(flow, Flow::Continue);
    }

    #[test]
    fn test_up_without_down_does_not_commit() {
        let mut surface = MemorySurface::new();
        let mut point = armed_point(&mut surface);

        point.accept_mouse_move(&mut surface, &mut mouse(EventKind::MouseMove, 50.0, 60.0));
        let flow = point.accept_mouse_up(&mut surface, &mut mouse(EventKind::MouseUp, 50.0, 60.0));

        assert_eq!(flow, Flow::Continue);
        assert_eq!(point.state(), PointState::AwaitingPlacement { has_down: false });
    }

    #[test]
    fn test_moves_after_down_stop_tracking() {
        let mut surface = MemorySurface::new();
        let mut point = armed_point(&mut surface);

        point.accept_mouse_move(&mut surface, &mut mouse(EventKind::MouseMove, 50.0, 60.0));
        point.accept_mouse_down(&mut surface, &mut mouse(EventKind::MouseDown, 50.0, 60.0));
        point.accept_mouse_move(&mut surface, &mut mouse(EventKind::MouseMove, 80.0, 90.0));

        assert_eq!(point.position(), Point::new(50.0, 60.0));
    }

    #[test]
    fn test_single_click_places_and_commits() {
        let mut surface = MemorySurface::new();
        let mut point = armed_point(&mut surface);

        // Down with no prior move: the enqueued state replays the down.
        point.accept_mouse_down(&mut surface, &mut mouse(EventKind::MouseDown, 30.0, 40.0));
        assert_eq!(point.state(), PointState::AwaitingPlacement { has_down: true });
        assert_eq!(point.position(), Point::new(30.0, 40.0));

        let flow = point.accept_mouse_up(&mut surface, &mut mouse(EventKind::MouseUp, 30.0, 40.0));
        assert_eq!(flow, Flow::Yield);
    }

    fn committed_point(surface: &mut MemorySurface, x: f64, y: f64) -> PointConstruction {
        let mut point = armed_point(surface);
        point.accept_mouse_move(surface, &mut mouse(EventKind::MouseMove, x, y));
        point.accept_mouse_down(surface, &mut mouse(EventKind::MouseDown, x, y));
        point.accept_mouse_up(surface, &mut mouse(EventKind::MouseUp, x, y));
        point
    }

    #[test]
    fn test_hover_toggle() {
        let mut surface = MemorySurface::new();
        let mut point = committed_point(&mut surface, 50.0, 60.0);

        point.accept_mouse_move(&mut surface, &mut mouse(EventKind::MouseMove, 52.0, 61.0));
        assert_eq!(point.state(), PointState::Hover);
        assert!(point.implement().data.hovered);

        point.accept_mouse_move(&mut surface, &mut mouse(EventKind::MouseMove, 200.0, 200.0));
        assert_eq!(point.state(), PointState::Neutral);
        assert!(!point.implement().data.hovered);
    }

    #[test]
    fn test_drag_follows_and_commits_on_up() {
        let mut surface = MemorySurface::new();
        let mut point = committed_point(&mut surface, 50.0, 60.0);

        point.accept_mouse_down(&mut surface, &mut mouse(EventKind::MouseDown, 50.0, 60.0));
        assert_eq!(point.state(), PointState::Dragging);
        assert!(point.selected());

        point.accept_mouse_move(&mut surface, &mut mouse(EventKind::MouseMove, 120.0, 130.0));
        assert_eq!(point.position(), Point::new(120.0, 130.0));

        point.accept_mouse_up(&mut surface, &mut mouse(EventKind::MouseUp, 125.0, 135.0));
        assert_eq!(point.state(), PointState::Selected);
        assert_eq!(point.position(), Point::new(125.0, 135.0));
    }

    #[test]
    fn test_selected_point_can_be_redragged() {
        let mut surface = MemorySurface::new();
        let mut point = committed_point(&mut surface, 50.0, 60.0);

        point.accept_mouse_down(&mut surface, &mut mouse(EventKind::MouseDown, 50.0, 60.0));
        point.accept_mouse_up(&mut surface, &mut mouse(EventKind::MouseUp, 50.0, 60.0));
        assert_eq!(point.state(), PointState::Selected);

        point.accept_mouse_down(&mut surface, &mut mouse(EventKind::MouseDown, 50.0, 60.0));
        assert_eq!(point.state(), PointState::Dragging);
    }

    #[test]
    fn test_external_move_leaves_change_notification() {
        let mut surface = MemorySurface::new();
        let mut point = committed_point(&mut surface, 10.0, 10.0);

        point.update_position(&mut surface, Point::new(20.0, 20.0), true);
        assert!(point.take_change().is_none());

        point.update_position(&mut surface, Point::new(30.0, 30.0), false);
        assert_eq!(point.take_change(), Some(ConstructionChange::Moved));
        assert!(point.take_change().is_none());
    }
}
