use std::any::{type_name, Any};
use std::fmt;
use std::rc::Rc;

/// Bound for anything that can be stored in a property.
pub trait PropertyType: Any + Clone + PartialEq + fmt::Debug {}

impl<T> PropertyType for T where T: Any + Clone + PartialEq + fmt::Debug {}

trait ErasedValue: fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn eq_erased(&self, other: &dyn ErasedValue) -> bool;
    fn value_type_name(&self) -> &'static str;
}

impl<T: PropertyType> ErasedValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_erased(&self, other: &dyn ErasedValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| other == self)
    }

    fn value_type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// Type-erased property value carried by change notifications.
///
/// Cloning shares the underlying allocation. Equality compares the wrapped
/// values, and values of different types are never equal.
#[derive(Clone)]
pub struct AnyValue(Rc<dyn ErasedValue>);

impl AnyValue {
    pub fn new<T: PropertyType>(value: T) -> Self {
        AnyValue(Rc::new(value))
    }

    pub fn is<T: Any>(&self) -> bool {
        self.0.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn downcast<T: PropertyType>(&self) -> Option<T> {
        self.downcast_ref::<T>().cloned()
    }

    pub fn type_name(&self) -> &'static str {
        self.0.value_type_name()
    }

    pub fn ptr_eq(a: &AnyValue, b: &AnyValue) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }
}

impl PartialEq for AnyValue {
    fn eq(&self, other: &Self) -> bool {
        AnyValue::ptr_eq(self, other) || self.0.eq_erased(&*other.0)
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}
