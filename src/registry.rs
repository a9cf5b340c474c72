//! Action registry
//!
//! Holds the row's current action set in insertion order. Content and
//! background views are produced lazily, at most once per registered action,
//! and cached for as long as the action stays registered. Replacing the set
//! with one of identical identity keeps those caches.

use std::cell::OnceCell;
use std::rc::Rc;

use crate::action::{ActionDescriptor, ActionKey, Edge, SwipeAction};

pub struct ActionEntry<V> {
    action: Rc<dyn SwipeAction<V>>,
    content: OnceCell<V>,
    background: OnceCell<Option<V>>,
}

impl<V> ActionEntry<V> {
    fn new(action: Rc<dyn SwipeAction<V>>) -> Self {
        Self {
            action,
            content: OnceCell::new(),
            background: OnceCell::new(),
        }
    }

    pub fn action(&self) -> &Rc<dyn SwipeAction<V>> {
        &self.action
    }

    pub fn key(&self) -> ActionKey {
        self.action.key()
    }

    /// The action's content view, produced on first access
    pub fn content(&self) -> &V {
        self.content.get_or_init(|| {
            tracing::trace!(action = %self.action.key(), "materializing content");
            self.action.make_content()
        })
    }

    pub fn background(&self) -> Option<&V> {
        self.background
            .get_or_init(|| self.action.make_background())
            .as_ref()
    }

    pub fn is_materialized(&self) -> bool {
        self.content.get().is_some()
    }
}

pub struct ActionRegistry<V> {
    entries: Vec<ActionEntry<V>>,
}

impl<V> Default for ActionRegistry<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> ActionRegistry<V> {
    pub fn new(actions: Vec<Rc<dyn SwipeAction<V>>>) -> Self {
        Self {
            entries: actions.into_iter().map(ActionEntry::new).collect(),
        }
    }

    pub fn has_identity_of(&self, actions: &[Rc<dyn SwipeAction<V>>]) -> bool {
        self.entries.len() == actions.len()
            && self
                .entries
                .iter()
                .zip(actions)
                .all(|(entry, action)| entry.key() == action.key())
    }

    /// Replace the action set; returns whether the identity changed
    ///
    /// With an unchanged identity the new action objects are swapped in but
    /// materialized views are kept.
    pub fn replace(&mut self, actions: Vec<Rc<dyn SwipeAction<V>>>) -> bool {
        if self.has_identity_of(&actions) {
            for (entry, action) in self.entries.iter_mut().zip(actions) {
                entry.action = action;
            }
            false
        } else {
            *self = Self::new(actions);
            true
        }
    }

    pub fn get(&self, key: &ActionKey) -> Option<&ActionEntry<V>> {
        self.entries.iter().find(|entry| &entry.key() == key)
    }

    /// Entries on `edge`, nearest-edge-first
    pub fn on_edge(&self, edge: Edge) -> impl Iterator<Item = &ActionEntry<V>> {
        self.entries
            .iter()
            .filter(move |entry| entry.action.edge() == edge)
    }

    pub fn descriptors(&self) -> Vec<ActionDescriptor> {
        self.entries
            .iter()
            .map(|entry| entry.action.descriptor())
            .collect()
    }
}
