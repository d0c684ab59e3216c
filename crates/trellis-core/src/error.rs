use std::error::Error;

/// Error produced by a change handler while a property change is dispatched.
pub type HandlerError = Box<dyn Error + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    /// The class handler rejected a change. The written value stays committed.
    #[error(transparent)]
    Handler(HandlerError),
}

impl PropertyError {
    /// Returns the handler's error as `E` if that is what it was.
    pub fn downcast_handler<E: Error + 'static>(&self) -> Option<&E> {
        match self {
            PropertyError::Handler(inner) => inner.downcast_ref::<E>(),
        }
    }
}
