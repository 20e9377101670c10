//! The dispatcher: single point of input-event capture and task handoff.

use crate::construct::{Construction, PlaneConstruction};
use crate::event::{EventKind, Flow, InputEvent, InputTarget};
use crate::queue::TaskQueue;
use crate::surface::{GroupId, Surface};
use log::{debug, error, info, warn};

/// Process-wide engine context: owns the surface, the root plane, the task
/// queue and at most one in-progress drawing task.
///
/// Every captured event is delivered to exactly one target — the current
/// task if present, else the root plane. When a task yields, its implement
/// is added to the plane under the implement's own pre-assigned id and the
/// next queued task (if any) is started.
pub struct Engine<S: Surface> {
    surface: S,
    plane: PlaneConstruction,
    plane_group: GroupId,
    queue: TaskQueue,
    current_task: Option<Construction>,
}

impl<S: Surface> Engine<S> {
    /// Initialize with a surface; creates the root canvas group and the
    /// plane's render group inside it.
    pub fn new(mut surface: S) -> Self {
        let canvas_group = surface.create_group(None, "canvas");
        let mut plane = PlaneConstruction::new();
        let plane_group = plane.create_visual(&mut surface, Some(canvas_group));
        info!("engine initialized, routing to the root plane");
        Self {
            surface,
            plane,
            plane_group,
            queue: TaskQueue::new(),
            current_task: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn plane(&self) -> &PlaneConstruction {
        &self.plane
    }

    pub fn plane_mut(&mut self) -> &mut PlaneConstruction {
        &mut self.plane
    }

    /// Render group new constructions should be bound to.
    pub fn plane_group(&self) -> GroupId {
        self.plane_group
    }

    pub fn queue(&self) -> &TaskQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut TaskQueue {
        &mut self.queue
    }

    pub fn current_task(&self) -> Option<&Construction> {
        self.current_task.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.current_task.is_none()
    }

    /// Enqueue a drawing task. The engine is the queue's first responder:
    /// when idle, the task is promoted and armed immediately.
    pub fn enqueue_task(&mut self, task: Construction) {
        self.queue.enqueue(task);
        if self.current_task.is_none() {
            self.start_next_task();
        }
    }

    fn start_next_task(&mut self) {
        match self.queue.dequeue() {
            Some(mut task) => {
                task.start_drawing(&mut self.surface);
                debug!("new current task started");
                self.current_task = Some(task);
            }
            None => {
                debug!("task queue empty, reverting to plane routing");
                self.current_task = None;
            }
        }
    }

    /// Route one captured event. Never panics; malformed situations are
    /// logged and the next event starts from clean state.
    pub fn dispatch(&mut self, event: &mut InputEvent) {
        event.handled = false;
        if event.kind.is_mouse() {
            event.local = (event.client - self.surface.origin()).to_point();
        }

        let flow = match self.current_task.as_mut() {
            Some(task) => route(task, &mut self.surface, event),
            None => route(&mut self.plane, &mut self.surface, event),
        };

        if flow == Some(Flow::Yield) {
            self.yield_current_task();
        }
    }

    /// Hand the finished task's implement to the plane and start the next
    /// queued task, or fall back to idle routing.
    fn yield_current_task(&mut self) {
        let Some(task) = self.current_task.take() else {
            return;
        };
        match task.implement_id().map(String::from) {
            Some(id) => {
                info!("current task yielded, adding '{id}' to the plane");
                if let Err(err) = self.plane.add_child(&mut self.surface, &id, task) {
                    error!("could not add yielded construction: {err}");
                }
            }
            // A task must assign its id at placement commit; yielding
            // without one is a contract violation.
            None => error!("yielded task has no implement id, dropping it"),
        }
        self.start_next_task();
    }
}

/// Map an event kind onto the matching accept method of `target`. Unknown
/// kinds are dropped with a warning and never reach a target.
fn route(
    target: &mut dyn InputTarget,
    surface: &mut dyn Surface,
    event: &mut InputEvent,
) -> Option<Flow> {
    match event.kind {
        EventKind::MouseDown => Some(target.accept_mouse_down(surface, event)),
        EventKind::MouseUp => Some(target.accept_mouse_up(surface, event)),
        EventKind::MouseMove => Some(target.accept_mouse_move(surface, event)),
        EventKind::MouseClick => Some(target.accept_mouse_click(surface, event)),
        EventKind::KeyDown => Some(target.accept_key_down(surface, event)),
        EventKind::KeyUp => Some(target.accept_key_up(surface, event)),
        EventKind::KeyPress => Some(target.accept_key_press(surface, event)),
        EventKind::ContextMenu => {
            warn!("unroutable event kind {:?}, dropping", event.kind);
            None
        }
    }
}
