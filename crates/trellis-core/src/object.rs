//! Object property store with change notification.
//!
//! Styled values are kept per priority layer. The effective value is the
//! `Animation` layer when one is present, otherwise the highest ranked base
//! layer, otherwise the property default.
//!
//! Notification rules:
//! * a non-animation write or clear notifies when the base value (ignoring the
//!   animation layer) changes. `old` is the previous effective value, which
//!   may be an animated one.
//! * an animation write or clear notifies when the effective value changes.
//!
//! The class handler runs first, then observers in subscription order. No
//! interior borrow is held while they run, so they may write back into the
//! object.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::collections::map::HashMap;
use crate::error::{HandlerError, PropertyError};
use crate::priority::BindingPriority;
use crate::property::{DirectProperty, PropertyDescriptor, PropertyId, StyledProperty};
use crate::runtime::RuntimeHandle;
use crate::value::{AnyValue, PropertyType};

static NEXT_OBJECT_ID: AtomicUsize = AtomicUsize::new(1);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct PropertyChange {
    pub property: PropertyDescriptor,
    pub old: AnyValue,
    pub new: AnyValue,
    pub priority: BindingPriority,
}

impl PropertyChange {
    pub fn is_animation(&self) -> bool {
        self.priority.is_animation()
    }

    pub fn old_value<T: PropertyType>(&self) -> Option<&T> {
        self.old.downcast_ref::<T>()
    }

    pub fn new_value<T: PropertyType>(&self) -> Option<&T> {
        self.new.downcast_ref::<T>()
    }
}

/// Class-level reaction to property changes, run before any observer.
pub trait PropertyChangeHandler {
    fn property_changed(
        &self,
        object: &UiObject,
        change: &PropertyChange,
    ) -> Result<(), HandlerError>;
}

type Observer = Rc<dyn Fn(&UiObject, &PropertyChange)>;

struct ValueEntry {
    property: PropertyDescriptor,
    default: AnyValue,
    layers: BTreeMap<BindingPriority, AnyValue>,
}

impl ValueEntry {
    fn new(property: PropertyDescriptor, default: AnyValue) -> Self {
        Self {
            property,
            default,
            layers: BTreeMap::new(),
        }
    }

    fn effective(&self) -> AnyValue {
        self.layers
            .values()
            .next()
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }

    fn base(&self) -> AnyValue {
        self.layers
            .iter()
            .find(|(priority, _)| !priority.is_animation())
            .map(|(_, value)| value.clone())
            .unwrap_or_else(|| self.default.clone())
    }

    fn apply(&mut self, priority: BindingPriority, value: Option<AnyValue>) -> Option<PropertyChange> {
        let before = self.effective();
        let old_base = self.base();
        match value {
            Some(value) => {
                self.layers.insert(priority, value);
            }
            None => {
                self.layers.remove(&priority)?;
            }
        }
        let (changed, new) = if priority.is_animation() {
            let after = self.effective();
            (after != before, after)
        } else {
            let new_base = self.base();
            (new_base != old_base, new_base)
        };
        changed.then(|| PropertyChange {
            property: self.property,
            old: before,
            new,
            priority,
        })
    }
}

struct ObjectInner {
    id: ObjectId,
    type_name: &'static str,
    runtime: RuntimeHandle,
    values: RefCell<HashMap<PropertyId, ValueEntry>>,
    handler: RefCell<Option<Rc<dyn PropertyChangeHandler>>>,
    observers: RefCell<Vec<(u64, Observer)>>,
    next_observer_id: Cell<u64>,
}

/// A node of the object tree. Clones share identity.
#[derive(Clone)]
pub struct UiObject {
    inner: Rc<ObjectInner>,
}

#[derive(Clone)]
pub struct WeakUiObject(Weak<ObjectInner>);

impl WeakUiObject {
    pub fn upgrade(&self) -> Option<UiObject> {
        self.0.upgrade().map(|inner| UiObject { inner })
    }
}

impl UiObject {
    pub fn new(type_name: &'static str, runtime: RuntimeHandle) -> Self {
        Self {
            inner: Rc::new(ObjectInner {
                id: ObjectId(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed)),
                type_name,
                runtime,
                values: RefCell::new(HashMap::new()),
                handler: RefCell::new(None),
                observers: RefCell::new(Vec::new()),
                next_observer_id: Cell::new(1),
            }),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.inner.id
    }

    pub fn type_name(&self) -> &'static str {
        self.inner.type_name
    }

    pub fn runtime(&self) -> RuntimeHandle {
        self.inner.runtime.clone()
    }

    pub fn downgrade(&self) -> WeakUiObject {
        WeakUiObject(Rc::downgrade(&self.inner))
    }

    pub fn ptr_eq(a: &UiObject, b: &UiObject) -> bool {
        Rc::ptr_eq(&a.inner, &b.inner)
    }

    /// Installs the class handler and returns the one it replaced.
    pub fn set_change_handler(
        &self,
        handler: Rc<dyn PropertyChangeHandler>,
    ) -> Option<Rc<dyn PropertyChangeHandler>> {
        self.inner.handler.replace(Some(handler))
    }

    pub fn get_value<T: PropertyType>(&self, property: &StyledProperty<T>) -> T {
        self.read(property, ValueEntry::effective)
    }

    /// Value ignoring any animation layer.
    pub fn get_base_value<T: PropertyType>(&self, property: &StyledProperty<T>) -> T {
        self.read(property, ValueEntry::base)
    }

    fn read<T: PropertyType>(
        &self,
        property: &StyledProperty<T>,
        select: fn(&ValueEntry) -> AnyValue,
    ) -> T {
        self.inner
            .values
            .borrow()
            .get(&property.id())
            .and_then(|entry| select(entry).downcast::<T>())
            .unwrap_or_else(|| property.default_value().clone())
    }

    pub fn is_set<T: PropertyType>(
        &self,
        property: &StyledProperty<T>,
        priority: BindingPriority,
    ) -> bool {
        self.inner
            .values
            .borrow()
            .get(&property.id())
            .is_some_and(|entry| entry.layers.contains_key(&priority))
    }

    /// `true` while an animation layer overrides the property.
    pub fn is_animating(&self, property: PropertyId) -> bool {
        self.inner
            .values
            .borrow()
            .get(&property)
            .is_some_and(|entry| entry.layers.contains_key(&BindingPriority::Animation))
    }

    pub fn set_value<T: PropertyType>(
        &self,
        property: &StyledProperty<T>,
        value: T,
    ) -> Result<(), PropertyError> {
        self.set_value_with_priority(property, value, BindingPriority::LocalValue)
    }

    pub fn set_value_with_priority<T: PropertyType>(
        &self,
        property: &StyledProperty<T>,
        value: T,
        priority: BindingPriority,
    ) -> Result<(), PropertyError> {
        let change = {
            let mut values = self.inner.values.borrow_mut();
            let entry = values.entry(property.id()).or_insert_with(|| {
                ValueEntry::new(*property.descriptor(), property.erased_default())
            });
            let change = entry.apply(priority, Some(AnyValue::new(value)));
            change
        };
        match change {
            Some(change) => self.notify(&change),
            None => Ok(()),
        }
    }

    pub fn clear_value<T: PropertyType>(
        &self,
        property: &StyledProperty<T>,
        priority: BindingPriority,
    ) -> Result<(), PropertyError> {
        self.clear_value_by_id(property.id(), priority)
    }

    /// Removes one priority layer of a property known only by id.
    pub fn clear_value_by_id(
        &self,
        property: PropertyId,
        priority: BindingPriority,
    ) -> Result<(), PropertyError> {
        let change = self
            .inner
            .values
            .borrow_mut()
            .get_mut(&property)
            .and_then(|entry| entry.apply(priority, None));
        match change {
            Some(change) => self.notify(&change),
            None => Ok(()),
        }
    }

    /// Stores `value` into the backing field of a direct property and raises
    /// a change if it differs from the current one. Returns whether it did.
    pub fn set_and_raise<T: PropertyType>(
        &self,
        property: &DirectProperty<T>,
        field: &RefCell<T>,
        value: T,
    ) -> Result<bool, PropertyError> {
        let old = {
            let mut slot = field.borrow_mut();
            if *slot == value {
                return Ok(false);
            }
            std::mem::replace(&mut *slot, value.clone())
        };
        self.raise_property_changed(PropertyChange {
            property: *property.descriptor(),
            old: AnyValue::new(old),
            new: AnyValue::new(value),
            priority: BindingPriority::LocalValue,
        })?;
        Ok(true)
    }

    pub fn raise_property_changed(&self, change: PropertyChange) -> Result<(), PropertyError> {
        self.notify(&change)
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, observer: impl Fn(&UiObject, &PropertyChange) + 'static) -> Subscription {
        let id = self.inner.next_observer_id.get();
        self.inner.next_observer_id.set(id + 1);
        self.inner
            .observers
            .borrow_mut()
            .push((id, Rc::new(observer)));
        Subscription {
            object: Rc::downgrade(&self.inner),
            id: Some(id),
        }
    }

    fn notify(&self, change: &PropertyChange) -> Result<(), PropertyError> {
        log::trace!(
            "{self}: {} {:?} -> {:?} at {:?}",
            change.property,
            change.old,
            change.new,
            change.priority
        );
        let handler = self.inner.handler.borrow().clone();
        let handled = match handler {
            Some(handler) => handler.property_changed(self, change),
            None => Ok(()),
        };
        let observers: Vec<Observer> = self
            .inner
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();
        for observer in observers {
            observer(self, change);
        }
        handled.map_err(PropertyError::Handler)
    }
}

impl fmt::Display for UiObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.inner.type_name, self.inner.id)
    }
}

impl fmt::Debug for UiObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiObject")
            .field("id", &self.inner.id)
            .field("type_name", &self.inner.type_name)
            .finish()
    }
}

/// Observer registration. Dropping it unsubscribes.
pub struct Subscription {
    object: Weak<ObjectInner>,
    id: Option<u64>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let (Some(id), Some(object)) = (self.id.take(), self.object.upgrade()) {
            object.observers.borrow_mut().retain(|(entry, _)| *entry != id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
#[path = "tests/object_tests.rs"]
mod tests;
