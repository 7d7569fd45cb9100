use std::fmt::{self, Debug, Display, Formatter};

/// An error raised by the decorator itself rather than by the task.
///
/// Caller-facing error types must implement `From<Error<P::Error>>` so these
/// failures travel through the same completion handler as task failures.
pub enum Error<E> {
    /// The pool could not supply a resource
    Acquire(E),
    /// The task dropped its lease without completing it
    Abandoned,
}

impl<E> Error<E> {
    /// Access the pool error, if this is an acquisition failure.
    pub fn acquire_error(&self) -> Option<&E> {
        match self {
            Self::Acquire(err) => Some(err),
            Self::Abandoned => None,
        }
    }

    /// Unwrap the pool error, if this is an acquisition failure.
    pub fn into_acquire_error(self) -> Option<E> {
        match self {
            Self::Acquire(err) => Some(err),
            Self::Abandoned => None,
        }
    }

    pub fn is_abandoned(&self) -> bool {
        matches!(self, Self::Abandoned)
    }
}

impl<E: Debug> Debug for Error<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self {
            Self::Acquire(err) => f.debug_tuple("Error::Acquire").field(err).finish(),
            Self::Abandoned => write!(f, "Error::Abandoned"),
        }
    }
}

impl<E: Display> Display for Error<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self {
            Self::Acquire(err) => write!(f, "Resource acquisition failed: {}", err),
            Self::Abandoned => write!(f, "The task dropped its lease without completing"),
        }
    }
}

impl<E: Debug + Display> std::error::Error for Error<E> {}

/// A configuration error.
#[derive(Debug)]
pub struct ConfigError(pub String);

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Config error: {}", &self.0)
    }
}

impl std::error::Error for ConfigError {}
