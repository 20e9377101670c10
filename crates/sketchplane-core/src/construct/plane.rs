//! Geometric plane: the scene container for placed constructions.

use super::{Construction, HIT_TOLERANCE, SceneError};
use crate::event::{Flow, InputEvent, InputTarget};
use crate::surface::{GroupId, Surface};
use indexmap::IndexMap;
use kurbo::Point;
use log::debug;

/// Holds every placed construction, keyed by implement id in insertion
/// order, and runs the idle hover/select logic whenever no drawing task is
/// active. At most one child is selected at any time.
#[derive(Default)]
pub struct PlaneConstruction {
    group: Option<GroupId>,
    children: IndexMap<String, Construction>,
    selected_child: Option<String>,
}

impl PlaneConstruction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the plane's own render group under `parent` (idempotent).
    pub fn create_visual(&mut self, surface: &mut dyn Surface, parent: Option<GroupId>) -> GroupId {
        match self.group {
            Some(group) => group,
            None => {
                let group = surface.create_group(parent, "geometric-plane");
                self.group = Some(group);
                group
            }
        }
    }

    pub fn group(&self) -> Option<GroupId> {
        self.group
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, id: &str) -> Option<&Construction> {
        self.children.get(id)
    }

    pub fn child_mut(&mut self, id: &str) -> Option<&mut Construction> {
        self.children.get_mut(id)
    }

    /// Children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Construction)> {
        self.children.iter().map(|(id, c)| (id.as_str(), c))
    }

    /// Id of the currently selected child, if any.
    pub fn selected_child(&self) -> Option<&str> {
        self.selected_child.as_deref()
    }

    /// Add a placed construction under `id`.
    ///
    /// Rejected without any state change when the id is already taken, when
    /// the construction's implement has no visual/group context, or when
    /// `id` is not the implement's own id.
    pub fn add_child(
        &mut self,
        surface: &mut dyn Surface,
        id: &str,
        mut child: Construction,
    ) -> Result<(), SceneError> {
        if self.children.contains_key(id) {
            return Err(SceneError::DuplicateChild(id.to_string()));
        }
        match child.implement_id() {
            Some(actual) if actual == id => {}
            actual => {
                return Err(SceneError::IdMismatch {
                    key: id.to_string(),
                    actual: actual.map(String::from),
                });
            }
        }
        if !child.has_visual_context() {
            return Err(SceneError::MissingContext(id.to_string()));
        }
        let Some(group) = self.group else {
            return Err(SceneError::MissingContext(id.to_string()));
        };

        child.ensure_visual(surface, group);
        self.children.insert(id.to_string(), child);
        debug!("child '{id}' added to plane ({} total)", self.children.len());
        Ok(())
    }

    /// Remove a child, destroying its visuals. Unknown ids are ignored.
    pub fn remove_child(&mut self, surface: &mut dyn Surface, id: &str) {
        if let Some(mut child) = self.children.shift_remove(id) {
            child.deselect(surface);
            child.stop(surface);
            if self.selected_child.as_deref() == Some(id) {
                self.selected_child = None;
            }
            debug!("child '{id}' removed from plane");
        }
    }

    /// First child reporting a hit, scanning in insertion order.
    pub fn hit_child_id(&self, surface: &dyn Surface, pos: Point) -> Option<String> {
        self.children
            .iter()
            .find(|(_, child)| child.hit_test(surface, pos, HIT_TOLERANCE))
            .map(|(id, _)| id.clone())
    }

    /// Deselect the selected child, if any.
    fn deselect_current(&mut self, surface: &mut dyn Surface) {
        if let Some(prev) = self.selected_child.take() {
            if let Some(child) = self.children.get_mut(&prev) {
                child.deselect(surface);
            }
        }
    }

    /// Select `id`, deselecting any previously selected child first.
    fn select_child(&mut self, surface: &mut dyn Surface, id: &str) {
        if self.selected_child.as_deref() != Some(id) {
            self.deselect_current(surface);
        }
        if let Some(child) = self.children.get_mut(id) {
            child.select(surface);
            self.selected_child = Some(id.to_string());
        }
    }

    /// Remove every child and the plane's own group.
    pub fn stop(&mut self, surface: &mut dyn Surface) {
        let ids: Vec<String> = self.children.keys().cloned().collect();
        for id in ids {
            self.remove_child(surface, &id);
        }
        if let Some(group) = self.group.take() {
            surface.remove_group(group);
        }
    }

    /// Select-and-forward shared by mouse-down and click.
    fn pick(&mut self, surface: &mut dyn Surface, event: &mut InputEvent) {
        match self.hit_child_id(surface, event.local) {
            Some(id) => {
                debug!("hit on child '{id}', delegating event");
                self.select_child(surface, &id);
                if let Some(child) = self.children.get_mut(&id) {
                    match event.kind {
                        crate::event::EventKind::MouseDown => {
                            child.accept_mouse_down(surface, event);
                        }
                        crate::event::EventKind::MouseClick => {
                            child.accept_mouse_click(surface, event);
                        }
                        _ => {}
                    }
                }
                event.handled = true;
            }
            None => {
                self.deselect_current(surface);
                event.handled = true;
            }
        }
    }
}

impl InputTarget for PlaneConstruction {
    fn accept_mouse_down(&mut self, surface: &mut dyn Surface, event: &mut InputEvent) -> Flow {
        self.pick(surface, event);
        Flow::Continue
    }

    fn accept_mouse_click(&mut self, surface: &mut dyn Surface, event: &mut InputEvent) -> Flow {
        self.pick(surface, event);
        Flow::Continue
    }

    fn accept_mouse_up(&mut self, surface: &mut dyn Surface, event: &mut InputEvent) -> Flow {
        if let Some(id) = self.selected_child.clone() {
            if let Some(child) = self.children.get_mut(&id) {
                child.accept_mouse_up(surface, event);
                event.handled = true;
            }
        }
        Flow::Continue
    }

    fn accept_mouse_move(&mut self, surface: &mut dyn Surface, event: &mut InputEvent) -> Flow {
        if let Some(id) = self.selected_child.clone() {
            // A selected child gets every move exclusively, for dragging.
            if let Some(child) = self.children.get_mut(&id) {
                child.accept_mouse_move(surface, event);
                event.handled = true;
            }
        } else {
            // Full rescan: toggle hover on every non-selected child from
            // the current hit-test result.
            let pos = event.local;
            for (_, child) in self.children.iter_mut() {
                if child.selected() {
                    continue;
                }
                let hovered = child.hit_test(surface, pos, HIT_TOLERANCE);
                child.set_hovered(surface, hovered);
            }
        }
        Flow::Continue
    }
}
