//! Deferred scene changes queued from inside a running frame.
//!
//! Hooks and callbacks never hold the [`SceneManager`](crate::SceneManager),
//! so they queue a request instead; the owner of the manager applies the
//! queue with [`SceneManager::apply_requests`](crate::SceneManager::apply_requests)
//! at a point where no scene is borrowed.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A scene change waiting to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneRequest {
    /// [`SceneManager::transition_to_scene`](crate::SceneManager::transition_to_scene).
    Transition(String),
    /// [`SceneManager::set_scene`](crate::SceneManager::set_scene).
    SetScene { name: String, index: usize },
}

/// Cloneable queue of [`SceneRequest`]s. Clones share the same queue.
///
/// Every scene added to a manager carries a handle to that manager's queue
/// (see [`Scene::requests`](crate::Scene::requests)); clone it into timer
/// callbacks or behaviors that need to change scenes.
#[derive(Debug, Clone, Default)]
pub struct SceneRequests {
    queue: Rc<RefCell<VecDeque<SceneRequest>>>,
}

impl SceneRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a transition to `name`.
    pub fn transition_to(&self, name: impl Into<String>) {
        self.push(SceneRequest::Transition(name.into()));
    }

    /// Queue moving `name` into slot `index`.
    pub fn set_scene(&self, name: impl Into<String>, index: usize) {
        self.push(SceneRequest::SetScene {
            name: name.into(),
            index,
        });
    }

    pub fn push(&self, request: SceneRequest) {
        self.queue.borrow_mut().push_back(request);
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Whether `other` shares this handle's queue.
    pub fn same_queue(&self, other: &SceneRequests) -> bool {
        Rc::ptr_eq(&self.queue, &other.queue)
    }

    /// Take the next request, oldest first.
    pub(crate) fn pop(&self) -> Option<SceneRequest> {
        self.queue.borrow_mut().pop_front()
    }

    pub(crate) fn clear(&self) -> usize {
        let mut queue = self.queue.borrow_mut();
        let dropped = queue.len();
        queue.clear();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_queue() {
        let requests = SceneRequests::new();
        let clone = requests.clone();
        clone.transition_to("level");
        requests.set_scene("menu", 2);

        assert_eq!(requests.len(), 2);
        assert!(requests.same_queue(&clone));
        assert!(!requests.same_queue(&SceneRequests::new()));
        assert_eq!(
            clone.pop(),
            Some(SceneRequest::Transition("level".to_string()))
        );
        assert_eq!(
            clone.pop(),
            Some(SceneRequest::SetScene {
                name: "menu".to_string(),
                index: 2
            })
        );
        assert!(requests.is_empty());
    }

    #[test]
    fn test_clear_reports_dropped() {
        let requests = SceneRequests::new();
        requests.transition_to("a");
        requests.transition_to("b");
        assert_eq!(requests.clear(), 2);
        assert_eq!(requests.pop(), None);
    }
}
