//! Rectangle construction: two-point creation, corner handles and
//! corner-driven relayout.

use super::{HIT_TOLERANCE, PointConstruction};
use crate::event::{Flow, InputEvent, InputTarget};
use crate::implements::{Implement, RectangleImplement};
use crate::surface::{GroupId, Surface};
use kurbo::Point;
use log::debug;
use uuid::Uuid;

const TOP_LEFT: usize = 0;
const TOP_RIGHT: usize = 1;
const BOTTOM_LEFT: usize = 2;
const BOTTOM_RIGHT: usize = 3;

/// States of a rectangle's life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectangleState {
    /// Waiting for the mouse-up that fixes the first corner.
    AwaitingCornerA,
    /// Live-tracking the opposite corner until the finalizing mouse-up.
    AwaitingCornerB,
    /// Placed: selection, hover handles and corner dragging.
    Idle,
}

/// What part of a rectangle a hit-test landed on. Corners take priority
/// over the body so handle grabs are never shadowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectangleHit {
    Corner(usize),
    Body,
}

/// Controller for an interactive rectangle. The four corner handles are
/// full point constructions owned (and observed) by the rectangle.
pub struct RectangleConstruction {
    implement: RectangleImplement,
    corners: [PointConstruction; 4],
    state: RectangleState,
    selected: bool,
    group: GroupId,
    point_a: Option<Point>,
    active_corner: Option<usize>,
}

impl RectangleConstruction {
    pub fn new(group: GroupId) -> Self {
        Self {
            implement: RectangleImplement::new(),
            corners: [
                PointConstruction::new(group),
                PointConstruction::new(group),
                PointConstruction::new(group),
                PointConstruction::new(group),
            ],
            state: RectangleState::AwaitingCornerA,
            selected: false,
            group,
            point_a: None,
            active_corner: None,
        }
    }

    pub fn state(&self) -> RectangleState {
        self.state
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    pub fn implement(&self) -> &RectangleImplement {
        &self.implement
    }

    pub fn corners(&self) -> &[PointConstruction; 4] {
        &self.corners
    }

    /// Bounding box as (x, y, width, height).
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let d = &self.implement.data;
        (d.x, d.y, d.width, d.height)
    }

    pub fn start_drawing(&mut self, surface: &mut dyn Surface) {
        self.implement.remove_visual(surface);
        self.implement.clear_id();
        for corner in &mut self.corners {
            corner.stop(surface);
        }
        self.implement.data.x = 0.0;
        self.implement.data.y = 0.0;
        self.implement.data.width = 0.0;
        self.implement.data.height = 0.0;
        self.selected = false;
        self.point_a = None;
        self.active_corner = None;
        self.state = RectangleState::AwaitingCornerA;
        debug!("rectangle construction armed, ready to define corner A");
    }

    fn transition(&mut self, surface: &mut dyn Surface, next: RectangleState) {
        self.state = next;
        self.refresh_visual(surface);
    }

    pub fn refresh_visual(&mut self, surface: &mut dyn Surface) {
        self.implement.data.selected = self.selected;
        self.implement.update_visual(surface);
        for corner in &mut self.corners {
            corner.refresh_visual(surface);
        }
    }

    pub fn select(&mut self, surface: &mut dyn Surface) {
        if !self.selected {
            self.selected = true;
            debug!("rectangle selected");
            self.refresh_visual(surface);
            self.show_handles(surface);
        }
    }

    pub fn deselect(&mut self, surface: &mut dyn Surface) {
        if self.selected {
            self.selected = false;
            debug!("rectangle deselected");
            self.hide_handles(surface);
            self.refresh_visual(surface);
        }
    }

    /// Fix the first corner and bring up the zero-size preview body.
    fn set_point_a(&mut self, surface: &mut dyn Surface, pos: Point) {
        self.point_a = Some(pos);
        self.implement.data.x = pos.x;
        self.implement.data.y = pos.y;
        self.implement.data.width = 0.0;
        self.implement.data.height = 0.0;
        self.implement.create_visual(surface, self.group);
        self.corners[TOP_LEFT].update_position(surface, pos, true);
        self.corners[TOP_LEFT].create_visual(surface);
    }

    /// Recompute the preview body from corner A and the tracked pointer.
    fn track_point_b(&mut self, surface: &mut dyn Surface, pos: Point) {
        let Some(a) = self.point_a else {
            return;
        };
        self.implement.data.x = a.x.min(pos.x);
        self.implement.data.y = a.y.min(pos.y);
        self.implement.data.width = (pos.x - a.x).abs();
        self.implement.data.height = (pos.y - a.y).abs();
        self.implement.update_visual(surface);
        if self.corners[BOTTOM_RIGHT].implement().node().is_none() {
            self.corners[BOTTOM_RIGHT].create_visual(surface);
        }
        self.update_corner_positions(surface);
    }

    /// Final styling and handle display once both corners are fixed.
    fn finalise(&mut self, surface: &mut dyn Surface) {
        if self.implement.id().is_none() {
            self.implement.assign_id(format!("rect-{}", Uuid::new_v4()));
        }
        self.implement.update_visual(surface);
        self.show_handles(surface);
    }

    /// Snap all four corner handles onto the current bounding box.
    fn update_corner_positions(&mut self, surface: &mut dyn Surface) {
        let d = self.implement.data;
        self.corners[TOP_LEFT].update_position(surface, Point::new(d.x, d.y), true);
        self.corners[TOP_RIGHT].update_position(surface, Point::new(d.x + d.width, d.y), true);
        self.corners[BOTTOM_LEFT].update_position(surface, Point::new(d.x, d.y + d.height), true);
        self.corners[BOTTOM_RIGHT]
            .update_position(surface, Point::new(d.x + d.width, d.y + d.height), true);
    }

    /// Relayout after a corner moved: the body becomes the min/max box over
    /// all four corners, so the result is independent of which corner was
    /// dragged.
    fn recompute_from_corners(&mut self, surface: &mut dyn Surface) {
        let xs = self.corners.iter().map(|c| c.position().x);
        let ys = self.corners.iter().map(|c| c.position().y);
        let min_x = xs.clone().fold(f64::INFINITY, f64::min);
        let max_x = xs.fold(f64::NEG_INFINITY, f64::max);
        let min_y = ys.clone().fold(f64::INFINITY, f64::min);
        let max_y = ys.fold(f64::NEG_INFINITY, f64::max);

        self.implement.data.x = min_x;
        self.implement.data.y = min_y;
        self.implement.data.width = max_x - min_x;
        self.implement.data.height = max_y - min_y;
        self.implement.update_visual(surface);
        self.update_corner_positions(surface);
    }

    pub fn show_handles(&mut self, surface: &mut dyn Surface) {
        for corner in &mut self.corners {
            corner.create_visual(surface);
            corner.refresh_visual(surface);
        }
    }

    pub fn hide_handles(&mut self, surface: &mut dyn Surface) {
        for corner in &mut self.corners {
            corner.stop(surface);
        }
    }

    /// Corner handles are checked before the body.
    pub fn hit_test_detail(
        &self,
        surface: &dyn Surface,
        pos: Point,
        tolerance: f64,
    ) -> Option<RectangleHit> {
        for (index, corner) in self.corners.iter().enumerate() {
            if corner.hit_test(surface, pos, tolerance) {
                return Some(RectangleHit::Corner(index));
            }
        }
        if self.implement.hit_test(surface, pos, tolerance) {
            return Some(RectangleHit::Body);
        }
        None
    }

    pub fn hit_test(&self, surface: &dyn Surface, pos: Point, tolerance: f64) -> bool {
        self.hit_test_detail(surface, pos, tolerance).is_some()
    }

    /// Hover toggle from the plane's idle rescan: handles appear while the
    /// pointer is over an unselected rectangle.
    pub fn set_hovered(&mut self, surface: &mut dyn Surface, hovered: bool) {
        if self.state != RectangleState::Idle || self.selected {
            return;
        }
        if hovered {
            self.show_handles(surface);
        } else {
            self.hide_handles(surface);
        }
    }

    pub fn ensure_visual(&mut self, surface: &mut dyn Surface, group: GroupId) {
        self.group = group;
        if let Some(node) = self.implement.node() {
            if surface.parent_of(node) != Some(group) {
                surface.reparent(node, group);
            }
        }
        self.implement.create_visual(surface, group);
        for corner in &mut self.corners {
            corner.ensure_visual(surface, group);
        }
    }

    pub fn stop(&mut self, surface: &mut dyn Surface) {
        self.selected = false;
        self.active_corner = None;
        self.implement.remove_visual(surface);
        for corner in &mut self.corners {
            corner.stop(surface);
        }
    }

    /// Forward an event to the corner currently being dragged, then react
    /// to any movement it reports.
    fn drive_active_corner(
        &mut self,
        surface: &mut dyn Surface,
        event: &mut InputEvent,
        index: usize,
    ) {
        match event.kind {
            crate::event::EventKind::MouseMove => {
                self.corners[index].accept_mouse_move(surface, event);
            }
            crate::event::EventKind::MouseUp => {
                self.corners[index].accept_mouse_up(surface, event);
            }
            _ => {}
        }
        if self.corners[index].take_change().is_some() {
            self.recompute_from_corners(surface);
        }
        event.handled = true;
    }
}

impl InputTarget for RectangleConstruction {
    fn accept_mouse_down(&mut self, surface: &mut dyn Surface, event: &mut InputEvent) -> Flow {
        if self.state != RectangleState::Idle {
            return Flow::Continue;
        }
        match self.hit_test_detail(surface, event.local, HIT_TOLERANCE) {
            Some(RectangleHit::Corner(index)) => {
                debug!("hit on corner handle {index}, delegating to point");
                if !self.selected {
                    self.select(surface);
                }
                self.corners[index].accept_mouse_down(surface, event);
                self.active_corner = Some(index);
                event.handled = true;
            }
            Some(RectangleHit::Body) => {
                self.select(surface);
                event.handled = true;
            }
            None => {}
        }
        Flow::Continue
    }

    fn accept_mouse_up(&mut self, surface: &mut dyn Surface, event: &mut InputEvent) -> Flow {
        let pos = event.local;
        match self.state {
            RectangleState::AwaitingCornerA => {
                self.set_point_a(surface, pos);
                self.state = RectangleState::AwaitingCornerB;
                debug!("corner A set at ({}, {})", pos.x, pos.y);
                Flow::Continue
            }
            RectangleState::AwaitingCornerB => {
                self.track_point_b(surface, pos);
                self.finalise(surface);
                self.transition(surface, RectangleState::Idle);
                debug!("corner B set, rectangle finalised, yielding control");
                event.handled = true;
                Flow::Yield
            }
            RectangleState::Idle => {
                if let Some(index) = self.active_corner.take() {
                    self.drive_active_corner(surface, event, index);
                }
                Flow::Continue
            }
        }
    }

    fn accept_mouse_move(&mut self, surface: &mut dyn Surface, event: &mut InputEvent) -> Flow {
        let pos = event.local;
        match self.state {
            RectangleState::AwaitingCornerA => {}
            RectangleState::AwaitingCornerB => {
                self.track_point_b(surface, pos);
            }
            RectangleState::Idle => {
                if let Some(index) = self.active_corner {
                    self.drive_active_corner(surface, event, index);
                } else if self.selected || self.hit_test(surface, pos, HIT_TOLERANCE) {
                    self.show_handles(surface);
                } else {
                    self.hide_handles(surface);
                }
            }
        }
        Flow::Continue
    }

    fn accept_mouse_click(&mut self, surface: &mut dyn Surface, event: &mut InputEvent) -> Flow {
        if self.state == RectangleState::Idle
            && self.hit_test_detail(surface, event.local, HIT_TOLERANCE).is_some()
        {
            self.select(surface);
        }
        Flow::Continue
    }
}
