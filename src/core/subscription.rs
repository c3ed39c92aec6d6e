//! Subscription bookkeeping for decorations.

use std::fmt::Debug;
use std::slice::Iter;

use tracing::{trace, warn};

use crate::core::types::HandlerId;

/// A live binding of one event to one handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription<T> {
    /// The handle issued by the host.
    pub id: HandlerId,
    /// The event it is bound to.
    pub event: T,
}

/// An ordered set of subscriptions owned by a single decoration.
///
/// A `SubscriptionSet` is populated all at once with [`subscribe_all`][1],
/// and emptied all at once with [`unsubscribe_all`][2]. It is never
/// partially populated: either it holds one handle for every event it
/// was given, or it holds none.
///
/// [1]: SubscriptionSet::subscribe_all
/// [2]: SubscriptionSet::unsubscribe_all
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionSet<T> {
    subs: Vec<Subscription<T>>,
}

impl<T> Default for SubscriptionSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SubscriptionSet<T> {
    /// Creates a new, empty `SubscriptionSet`.
    pub fn new() -> Self {
        Self { subs: Vec::new() }
    }

    /// The number of live handles.
    #[inline]
    pub fn len(&self) -> usize {
        self.subs.len()
    }

    /// Whether the set holds no handles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Iterates over the live subscriptions in registration order.
    pub fn iter(&self) -> Iter<'_, Subscription<T>> {
        self.subs.iter()
    }
}

impl<T: Copy + Debug> SubscriptionSet<T> {

    /// Connects every event in `events`, in order, recording the
    /// handle returned by `connect` for each.
    ///
    /// No-op if the set is already populated.
    pub fn subscribe_all<F>(&mut self, events: &[T], mut connect: F)
    where
        F: FnMut(T) -> HandlerId,
    {
        if !self.subs.is_empty() {
            warn!("subscription set already holds {} handles", self.subs.len());
            return
        }

        for &event in events {
            let id = connect(event);
            trace!("subscribed {:?} as {}", event, id);
            self.subs.push(Subscription { id, event });
        }
    }

    /// Disconnects every handle in registration order, then clears the set.
    ///
    /// No-op if the set is empty.
    pub fn unsubscribe_all<F>(&mut self, mut disconnect: F)
    where
        F: FnMut(HandlerId),
    {
        for sub in self.subs.drain(..) {
            trace!("unsubscribing {:?} ({})", sub.event, sub.id);
            disconnect(sub.id);
        }
    }

    /// Returns the event bound to a live handle.
    pub fn lookup(&self, id: HandlerId) -> Option<T> {
        self.subs.iter().find(|s| s.id == id).map(|s| s.event)
    }
}

impl<'a, T> IntoIterator for &'a SubscriptionSet<T> {
    type Item = &'a Subscription<T>;
    type IntoIter = Iter<'a, Subscription<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.subs.iter()
    }
}
