//! FIFO queue of constructions waiting to be drawn.

use crate::construct::Construction;
use log::{debug, warn};
use std::collections::VecDeque;

/// Identity token for a registered enqueue listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerToken(usize);

type EnqueueListener = Box<dyn FnMut(&Construction)>;

/// Ordered waiting list of pending drawing tasks.
///
/// Listeners are notified synchronously at enqueue time, in registration
/// order, before `enqueue` returns — an observer can always react before
/// anything can be dequeued.
#[derive(Default)]
pub struct TaskQueue {
    tasks: VecDeque<Construction>,
    listeners: Vec<(usize, EnqueueListener)>,
    next_token: usize,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, task: Construction) {
        self.tasks.push_back(task);
        debug!("task enqueued, queue length {}", self.tasks.len());
        if let Some(task) = self.tasks.back() {
            for (_, listener) in self.listeners.iter_mut() {
                listener(task);
            }
        }
    }

    /// Pop the front task. Never panics; an empty queue yields `None`.
    pub fn dequeue(&mut self) -> Option<Construction> {
        let task = self.tasks.pop_front();
        if task.is_none() {
            warn!("dequeue from an empty task queue");
        }
        task
    }

    pub fn front(&self) -> Option<&Construction> {
        self.tasks.front()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Register an enqueue listener; the token removes it again.
    pub fn add_listener(
        &mut self,
        listener: impl FnMut(&Construction) + 'static,
    ) -> ListenerToken {
        let token = self.next_token;
        self.next_token += 1;
        self.listeners.push((token, Box::new(listener)));
        ListenerToken(token)
    }

    pub fn remove_listener(&mut self, token: ListenerToken) {
        self.listeners.retain(|(t, _)| *t != token.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::PointConstruction;
    use crate::surface::GroupId;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn task() -> Construction {
        Construction::Point(PointConstruction::new(GroupId(1)))
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = TaskQueue::new();
        queue.enqueue(task());
        queue.enqueue(task());
        assert_eq!(queue.len(), 2);

        assert!(queue.dequeue().is_some());
        assert!(queue.dequeue().is_some());
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn test_empty_dequeue_returns_none() {
        let mut queue = TaskQueue::new();
        assert!(queue.dequeue().is_none());
        assert!(queue.front().is_none());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_listeners_notified_synchronously_in_order() {
        let mut queue = TaskQueue::new();
        let calls = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&calls);
        queue.add_listener(move |_| first.borrow_mut().push("first"));
        let second = Rc::clone(&calls);
        queue.add_listener(move |_| second.borrow_mut().push("second"));

        queue.enqueue(task());
        // Both listeners ran before enqueue returned.
        assert_eq!(*calls.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_listener_removal_by_token() {
        let mut queue = TaskQueue::new();
        let calls = Rc::new(RefCell::new(0));

        let counter = Rc::clone(&calls);
        let token = queue.add_listener(move |_| *counter.borrow_mut() += 1);

        queue.enqueue(task());
        assert_eq!(*calls.borrow(), 1);

        queue.remove_listener(token);
        queue.enqueue(task());
        assert_eq!(*calls.borrow(), 1);
    }
}
