//! Typed events with token-based unsubscription
//!
//! Key principles:
//! - Listeners are closures receiving the event payload by reference
//! - `subscribe` hands back a token; the token is the only way to unsubscribe
//! - Listeners run synchronously, in subscription order

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle returned by [`Event::subscribe`]
    pub struct ListenerToken;
}

type Listener<T> = Box<dyn FnMut(&T)>;

/// A list of listeners for payloads of type `T`
pub struct Event<T> {
    listeners: SlotMap<ListenerToken, Listener<T>>,
    order: Vec<ListenerToken>,
}

impl<T> Event<T> {
    /// Create an event with no listeners
    pub fn new() -> Self {
        Self {
            listeners: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Register `listener`, returning its token
    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> ListenerToken {
        let token = self.listeners.insert(Box::new(listener));
        self.order.push(token);
        token
    }

    /// Remove the listener behind `token`
    ///
    /// Returns false when the token was already removed.
    pub fn unsubscribe(&mut self, token: ListenerToken) -> bool {
        if self.listeners.remove(token).is_none() {
            return false;
        }
        self.order.retain(|&t| t != token);
        true
    }

    /// Call every listener with `payload`
    pub fn invoke(&mut self, payload: &T) {
        for token in &self.order {
            if let Some(listener) = self.listeners.get_mut(*token) {
                listener(payload);
            }
        }
    }

    /// Whether `token` is still subscribed
    pub fn is_subscribed(&self, token: ListenerToken) -> bool {
        self.listeners.contains_key(token)
    }

    /// Number of listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether there are no listeners
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Remove every listener
    pub fn clear(&mut self) {
        self.listeners.clear();
        self.order.clear();
    }
}

impl<T> Default for Event<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Event").field("listeners", &self.listeners.len()).finish()
    }
}
