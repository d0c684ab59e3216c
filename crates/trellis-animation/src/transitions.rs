//! Ordered, observable registry of transitions owned by one object.
//!
//! Lookup is a linear first-match scan. Several entries may target the same
//! property; only the first one is ever used and later ones are inert.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use trellis_core::PropertyId;

use crate::transition::Transition;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CollectionChange {
    Added { index: usize },
    Removed { index: usize },
    Moved { from: usize, to: usize },
    Reset,
}

type Listener = Rc<dyn Fn(&CollectionChange)>;

#[derive(Default)]
struct TransitionsInner {
    items: RefCell<Vec<Rc<dyn Transition>>>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener_id: Cell<u64>,
}

/// Shared handle to a transition list. Clones alias the same list and
/// equality is identity.
#[derive(Clone, Default)]
pub struct Transitions {
    inner: Rc<TransitionsInner>,
}

impl Transitions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Rc<dyn Transition>> {
        self.inner.items.borrow().get(index).cloned()
    }

    pub fn to_vec(&self) -> Vec<Rc<dyn Transition>> {
        self.inner.items.borrow().clone()
    }

    /// First transition targeting `property`, in list order.
    pub fn find(&self, property: PropertyId) -> Option<Rc<dyn Transition>> {
        self.inner
            .items
            .borrow()
            .iter()
            .find(|transition| transition.property() == property)
            .cloned()
    }

    pub fn add(&self, transition: impl Transition + 'static) {
        self.push(Rc::new(transition));
    }

    pub fn push(&self, transition: Rc<dyn Transition>) {
        let index = {
            let mut items = self.inner.items.borrow_mut();
            items.push(transition);
            items.len() - 1
        };
        self.notify(CollectionChange::Added { index });
    }

    /// Inserts at `index`, clamped to the end of the list.
    pub fn insert(&self, index: usize, transition: Rc<dyn Transition>) {
        let index = {
            let mut items = self.inner.items.borrow_mut();
            let index = index.min(items.len());
            items.insert(index, transition);
            index
        };
        self.notify(CollectionChange::Added { index });
    }

    pub fn remove(&self, index: usize) -> Option<Rc<dyn Transition>> {
        let removed = {
            let mut items = self.inner.items.borrow_mut();
            (index < items.len()).then(|| items.remove(index))
        };
        if removed.is_some() {
            self.notify(CollectionChange::Removed { index });
        }
        removed
    }

    /// Moves the entry at `from` to `to`. Returns `false` if either is out of range.
    pub fn move_item(&self, from: usize, to: usize) -> bool {
        {
            let mut items = self.inner.items.borrow_mut();
            if from >= items.len() || to >= items.len() {
                return false;
            }
            let item = items.remove(from);
            items.insert(to, item);
        }
        if from != to {
            self.notify(CollectionChange::Moved { from, to });
        }
        true
    }

    pub fn clear(&self) {
        let had_items = {
            let mut items = self.inner.items.borrow_mut();
            let had_items = !items.is_empty();
            items.clear();
            had_items
        };
        if had_items {
            self.notify(CollectionChange::Reset);
        }
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(&CollectionChange) + 'static) -> CollectionSubscription {
        let id = self.inner.next_listener_id.get();
        self.inner.next_listener_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        CollectionSubscription {
            list: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    pub fn ptr_eq(a: &Transitions, b: &Transitions) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    fn notify(&self, change: CollectionChange) {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(&change);
        }
    }
}

impl PartialEq for Transitions {
    fn eq(&self, other: &Self) -> bool {
        Transitions::ptr_eq(self, other)
    }
}

impl Eq for Transitions {}

impl fmt::Debug for Transitions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self.inner.items.borrow();
        f.debug_struct("Transitions")
            .field("len", &items.len())
            .field(
                "properties",
                &items.iter().map(|t| t.property()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl FromIterator<Rc<dyn Transition>> for Transitions {
    fn from_iter<I: IntoIterator<Item = Rc<dyn Transition>>>(iter: I) -> Self {
        let transitions = Transitions::new();
        transitions.inner.items.borrow_mut().extend(iter);
        transitions
    }
}

/// Listener registration on a [`Transitions`] list. Dropping it unsubscribes.
pub struct CollectionSubscription {
    list: Weak<TransitionsInner>,
    id: Option<u64>,
}

impl Drop for CollectionSubscription {
    fn drop(&mut self) {
        if let (Some(id), Some(list)) = (self.id.take(), self.list.upgrade()) {
            list.listeners.borrow_mut().retain(|(entry, _)| *entry != id);
        }
    }
}

#[cfg(test)]
#[path = "tests/transitions_tests.rs"]
mod tests;
