/// Origin of a property write.
///
/// Ordering follows precedence: a smaller variant wins over a larger one when
/// both hold a value for the same property.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum BindingPriority {
    /// Written by a running transition or animation.
    Animation,
    /// Set directly on the object by application code.
    #[default]
    LocalValue,
    /// Set by a style whose trigger currently matches.
    StyleTrigger,
    /// Set by the templated parent.
    TemplatedParent,
    /// Set by a style setter.
    Style,
}

impl BindingPriority {
    pub fn is_animation(self) -> bool {
        matches!(self, BindingPriority::Animation)
    }

    /// `true` when a value at `self` hides a value at `other`.
    pub fn outranks(self, other: BindingPriority) -> bool {
        self < other
    }
}
