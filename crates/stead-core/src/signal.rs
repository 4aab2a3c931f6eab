//! Typed publish/subscribe primitive.
//!
//! Every piece of game state that the UI cares about announces its changes
//! through a [`Signal`]. A signal is parameterized by its event type, so
//! subscribers never downcast payloads; the event enums themselves live in
//! [`crate::events`].
//!
//! The whole engine is synchronous and single-threaded, hence `Rc` rather
//! than `Arc`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Callback<E> = Rc<RefCell<dyn FnMut(&E) -> bool>>;

/// A notification channel for one kind of event.
///
/// Subscribers are invoked in registration order. Each callback returns
/// whether it handled the event; `fire` OR-combines the results but never
/// short-circuits, so every subscriber sees every event.
pub struct Signal<E> {
    subscribers: RefCell<Vec<Callback<E>>>,
}

impl<E> Default for Signal<E> {
    fn default() -> Self {
        Self {
            subscribers: RefCell::new(Vec::new()),
        }
    }
}

impl<E> Signal<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback. There is no unsubscribe: the set of observers is
    /// fixed at wiring time for the lifetime of a game, matching how the
    /// rendering layer attaches once at startup.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: FnMut(&E) -> bool + 'static,
    {
        self.subscribers
            .borrow_mut()
            .push(Rc::new(RefCell::new(callback)));
    }

    /// Invoke every subscriber with `event`, in registration order.
    ///
    /// The subscriber list is snapshotted before dispatch, so a callback may
    /// subscribe or fire this same signal again without corrupting the
    /// iteration; a callback that re-fires mid-dispatch is skipped in the
    /// nested pass instead of being re-entered. Returns true if any
    /// subscriber reported the event handled.
    pub fn fire(&self, event: &E) -> bool {
        let snapshot: Vec<Callback<E>> = self.subscribers.borrow().clone();
        let mut handled = false;
        for subscriber in snapshot {
            if let Ok(mut callback) = subscriber.try_borrow_mut() {
                handled |= (&mut *callback)(event);
            }
        }
        handled
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }
}

impl<E> fmt::Debug for Signal<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
