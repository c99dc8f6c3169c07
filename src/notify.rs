//! Typed change notification for graph mutations.
//!
//! Subscribers register a callback and receive a [`ChangeEvent`] after
//! every mutating operation, synchronously and in registration order.
//! The registry is opaque to the algorithms; they only report which
//! operation ran.

use std::fmt;

/// Which mutating operation just completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeEvent {
    Load,
    Join,
    Clean,
    Fragment,
    Rebuild,
    Merge,
    Removal,
    Transform,
    Clear,
}

/// Handle returned by [`ChangeNotifier::subscribe`]; pass it back to
/// unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(ChangeEvent)>;

/// Ordered subscriber registry.
#[derive(Default)]
pub struct ChangeNotifier {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback)>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; it will be invoked after every mutation
    /// until unsubscribed.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(ChangeEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns `false` if the id was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Number of live subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Invoke every subscriber with `event`, in registration order.
    pub fn notify(&mut self, event: ChangeEvent) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback(event);
        }
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn subscribers_fire_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = ChangeNotifier::new();
        for tag in ["first", "second", "third"] {
            let seen = Rc::clone(&seen);
            notifier.subscribe(move |ev| seen.borrow_mut().push((tag, ev)));
        }
        notifier.notify(ChangeEvent::Clean);
        assert_eq!(
            *seen.borrow(),
            vec![
                ("first", ChangeEvent::Clean),
                ("second", ChangeEvent::Clean),
                ("third", ChangeEvent::Clean)
            ]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0usize));
        let mut notifier = ChangeNotifier::new();
        let handle = {
            let count = Rc::clone(&count);
            notifier.subscribe(move |_| *count.borrow_mut() += 1)
        };
        notifier.notify(ChangeEvent::Load);
        assert!(notifier.unsubscribe(handle));
        assert!(!notifier.unsubscribe(handle));
        notifier.notify(ChangeEvent::Load);
        assert_eq!(*count.borrow(), 1);
    }
}
