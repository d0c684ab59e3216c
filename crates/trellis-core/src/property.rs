//! Property descriptors.
//!
//! A descriptor is created once, usually in a `Lazy` static, and then passed
//! by reference. Identity is the [`PropertyId`] allocated at construction,
//! so two descriptors with the same owner and name are still different
//! properties.

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::value::{AnyValue, PropertyType};

static NEXT_PROPERTY_ID: AtomicUsize = AtomicUsize::new(1);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(usize);

impl PropertyId {
    fn next() -> Self {
        PropertyId(NEXT_PROPERTY_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Value lives in the object's priority store.
    Styled,
    /// Value lives in a field of the owner, which raises its own notifications.
    Direct,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyDescriptor {
    id: PropertyId,
    owner: &'static str,
    name: &'static str,
    kind: PropertyKind,
}

impl PropertyDescriptor {
    fn register(owner: &'static str, name: &'static str, kind: PropertyKind) -> Self {
        Self {
            id: PropertyId::next(),
            owner,
            name,
            kind,
        }
    }

    pub fn id(&self) -> PropertyId {
        self.id
    }

    pub fn owner(&self) -> &'static str {
        self.owner
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> PropertyKind {
        self.kind
    }
}

impl fmt::Display for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)
    }
}

/// A property whose value is resolved from priority layers on the object.
pub struct StyledProperty<T> {
    descriptor: PropertyDescriptor,
    default: T,
}

impl<T: PropertyType> StyledProperty<T> {
    pub fn register(owner: &'static str, name: &'static str, default: T) -> Self {
        Self {
            descriptor: PropertyDescriptor::register(owner, name, PropertyKind::Styled),
            default,
        }
    }

    pub fn descriptor(&self) -> &PropertyDescriptor {
        &self.descriptor
    }

    pub fn id(&self) -> PropertyId {
        self.descriptor.id
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub(crate) fn erased_default(&self) -> AnyValue {
        AnyValue::new(self.default.clone())
    }
}

impl<T: Clone> Clone for StyledProperty<T> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor,
            default: self.default.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for StyledProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyledProperty")
            .field("descriptor", &self.descriptor)
            .field("default", &self.default)
            .finish()
    }
}

/// A property backed by a field on its owner.
pub struct DirectProperty<T> {
    descriptor: PropertyDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<T: PropertyType> DirectProperty<T> {
    pub fn register(owner: &'static str, name: &'static str) -> Self {
        Self {
            descriptor: PropertyDescriptor::register(owner, name, PropertyKind::Direct),
            _marker: PhantomData,
        }
    }

    pub fn descriptor(&self) -> &PropertyDescriptor {
        &self.descriptor
    }

    pub fn id(&self) -> PropertyId {
        self.descriptor.id
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }
}

impl<T> Clone for DirectProperty<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for DirectProperty<T> {}

impl<T> fmt::Debug for DirectProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectProperty")
            .field("descriptor", &self.descriptor)
            .finish()
    }
}
