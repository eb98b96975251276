//! Single-value broadcast channel.
//!
//! A `Channel<T>` holds the current value and an ordered subscriber list.
//! `set` stores the value and calls every subscriber synchronously, in
//! subscription order. `subscribe` calls the new subscriber once, right away,
//! with the current value. Handles are cheap `Rc` clones of the same channel.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;

struct Shared<T> {
    value: RefCell<T>,
    subscribers: RefCell<Vec<(u64, Callback<T>)>>,
    next_id: Cell<u64>,
    normalize: Option<fn(T) -> T>,
}

pub struct Channel<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: Clone + 'static> Channel<T> {
    pub fn new(initial: T) -> Self {
        Self::build(initial, None)
    }

    /// Every stored value (the initial one included) goes through `normalize`.
    pub fn with_normalizer(initial: T, normalize: fn(T) -> T) -> Self {
        Self::build(normalize(initial), Some(normalize))
    }

    fn build(initial: T, normalize: Option<fn(T) -> T>) -> Self {
        Self {
            shared: Rc::new(Shared {
                value: RefCell::new(initial),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                normalize,
            }),
        }
    }

    pub fn get(&self) -> T {
        self.shared.value.borrow().clone()
    }

    /// Store `value` and notify every current subscriber.
    ///
    /// Subscribers may call back into this channel; they are iterated from
    /// a snapshot so no borrow is held while they run.
    pub fn set(&self, value: T) {
        let value = match self.shared.normalize {
            Some(normalize) => normalize(value),
            None => value,
        };
        *self.shared.value.borrow_mut() = value.clone();

        let snapshot: Vec<Callback<T>> = self
            .shared
            .subscribers
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in snapshot {
            callback(&value);
        }
    }

    /// Register `callback` and replay the current value to it.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let id = self.shared.next_id.get();
        self.shared.next_id.set(id + 1);

        let callback: Callback<T> = Rc::new(callback);
        self.shared
            .subscribers
            .borrow_mut()
            .push((id, Rc::clone(&callback)));

        let weak: Weak<Shared<T>> = Rc::downgrade(&self.shared);
        let subscription = Subscription::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared
                    .subscribers
                    .borrow_mut()
                    .retain(|(subscriber, _)| *subscriber != id);
            }
        });

        let current = self.get();
        callback(&current);
        subscription
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.borrow().len()
    }
}

impl<T: fmt::Debug> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("value", &self.shared.value.borrow())
            .field("subscribers", &self.shared.subscribers.borrow().len())
            .finish()
    }
}

/// Releases its subscriber when dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// All subscriptions of one attached component.
#[derive(Debug, Default)]
pub struct SubscriptionSet {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    /// Drop every subscription, newest first.
    pub fn clear(&mut self) {
        while let Some(subscription) = self.subscriptions.pop() {
            drop(subscription);
        }
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
