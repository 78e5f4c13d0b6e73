// Copyright 2025 the Lightbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-threaded observable value cells.
//!
//! A [`Signal`] is the channel type the viewport exchanges state through: the
//! host writes the desired zoom level, image handle, rotation, and policy
//! flags; the viewport writes back the realized zoom level, edge-overflow
//! flags, indicator visibility, and zoom pulses. Clones share the same cell,
//! so both sides hold the same channel by value.
//!
//! Subscribers run synchronously inside [`Signal::set`], in subscription
//! order. The subscriber list is snapshotted before delivery, so a subscriber
//! may freely subscribe, unsubscribe, or set the same signal again while it
//! runs; a callback that (transitively) sets its own signal is skipped for
//! that nested delivery rather than re-entered.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

type Callback<T> = Rc<RefCell<dyn FnMut(&T)>>;

struct Inner<T> {
    value: T,
    next_id: u64,
    subscribers: Vec<(u64, Callback<T>)>,
}

/// A shared, observable value.
///
/// Cloning is cheap and yields a handle to the same underlying cell.
pub struct Signal<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("subscribers", &self.inner.borrow().subscribers.len())
            .finish_non_exhaustive()
    }
}

impl<T: Clone> Signal<T> {
    /// Creates a signal holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Returns a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Stores `value` and notifies all subscribers.
    ///
    /// Subscribers are notified even when the new value equals the old one;
    /// deduplication is the subscriber's concern.
    pub fn set(&self, value: T) {
        self.inner.borrow_mut().value = value.clone();
        self.notify(&value);
    }

    /// Registers a callback invoked on every subsequent [`Signal::set`].
    ///
    /// The returned token cancels delivery via [`Signal::unsubscribe`].
    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let callback: Callback<T> = Rc::new(RefCell::new(callback));
        inner.subscribers.push((id, callback));
        Subscription { id }
    }

    /// Removes a subscriber.
    ///
    /// A no-op if the subscription was already removed. A subscriber removed
    /// in the middle of a notification pass may still observe that pass.
    pub fn unsubscribe(&self, subscription: Subscription) {
        self.inner
            .borrow_mut()
            .subscribers
            .retain(|(id, _)| *id != subscription.id);
    }

    /// Returns the number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self, value: &T) {
        let snapshot: Vec<Callback<T>> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in snapshot {
            // A callback already running further up the stack is skipped
            // instead of re-entered.
            if let Ok(mut callback) = callback.try_borrow_mut() {
                callback(value);
            }
        }
    }
}

/// Token identifying one subscriber of a [`Signal`].
#[derive(Debug)]
pub struct Subscription {
    id: u64,
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn get_returns_the_latest_set() {
        let signal = Signal::new(3_i32);
        assert_eq!(signal.get(), 3);
        signal.set(7);
        assert_eq!(signal.get(), 7);
    }

    #[test]
    fn clones_share_the_cell() {
        let signal = Signal::new(1_i32);
        let alias = signal.clone();
        alias.set(2);
        assert_eq!(signal.get(), 2);
    }

    #[test]
    fn subscribers_observe_every_set() {
        let signal = Signal::new(0_i32);
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let _sub = signal.subscribe(move |value| sink.borrow_mut().push(*value));

        signal.set(1);
        signal.set(1);
        signal.set(2);
        assert_eq!(*log.borrow(), vec![1, 1, 2]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let signal = Signal::new(0_i32);
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let sub = signal.subscribe(move |value| sink.borrow_mut().push(*value));

        signal.set(1);
        signal.unsubscribe(sub);
        signal.set(2);
        assert_eq!(*log.borrow(), vec![1]);
        assert_eq!(signal.subscriber_count(), 0);
    }

    #[test]
    fn reentrant_set_from_a_subscriber_is_safe() {
        let signal = Signal::new(0_i32);
        let alias = signal.clone();
        let _sub = signal.subscribe(move |value| {
            // Writing back from inside the notification must not recurse
            // into this callback again.
            if *value == 1 {
                alias.set(2);
            }
        });

        signal.set(1);
        assert_eq!(signal.get(), 2);
    }

    #[test]
    fn subscribers_are_notified_in_subscription_order() {
        let signal = Signal::new(0_i32);
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in [10, 20] {
            let sink = Rc::clone(&log);
            let _sub = signal.subscribe(move |value| sink.borrow_mut().push(tag + *value));
        }

        signal.set(1);
        assert_eq!(*log.borrow(), vec![11, 21]);
    }
}
