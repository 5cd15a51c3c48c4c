use std::fmt;
use std::path::PathBuf;

/// Handle returned by [`Subscribers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Notifications published by a [`crate::Session`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// An edit started or extended a debounce burst.
    EditQueued { burst_started: bool },
    /// The error overlay was cleared ahead of a pending compile.
    OverlayCleared,
    CompileSucceeded,
    CompileFailed { log: String },
    Resized { width: u32, height: u32 },
    Exported { path: PathBuf },
}

type Handler<E> = Box<dyn FnMut(&E)>;

/// Ordered handler registry. Handlers run in registration order.
pub struct Subscribers<E> {
    handlers: Vec<(SubscriptionId, Handler<E>)>,
    next_id: u64,
}

impl<E> Subscribers<E> {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Removes a handler. Returns false when `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(existing, _)| *existing != id);
        self.handlers.len() != before
    }

    pub fn publish(&mut self, event: &E) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl<E> Default for Subscribers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Subscribers<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn delivers_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut subscribers = Subscribers::<u32>::new();
        for tag in ["a", "b", "c"] {
            let log = Rc::clone(&log);
            subscribers.subscribe(move |value| log.borrow_mut().push(format!("{tag}{value}")));
        }

        subscribers.publish(&1);
        assert_eq!(*log.borrow(), ["a1", "b1", "c1"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let hits = Rc::new(RefCell::new(0));
        let mut subscribers = Subscribers::<()>::new();
        let id = {
            let hits = Rc::clone(&hits);
            subscribers.subscribe(move |_| *hits.borrow_mut() += 1)
        };

        subscribers.publish(&());
        assert_eq!(subscribers.len(), 1);
        assert!(subscribers.unsubscribe(id));
        assert!(!subscribers.unsubscribe(id));
        subscribers.publish(&());

        assert_eq!(*hits.borrow(), 1);
        assert!(subscribers.is_empty());
    }
}
