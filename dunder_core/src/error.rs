use std::fmt;
use std::panic::Location;

use thiserror::Error;

pub type DispatchResult<T> = ::std::result::Result<T, self::Failure>;

/// The closed set of ways a dispatch can fail.
///
/// Callers branch on these instead of catching a generic error, the `Display`
/// of each variant is the runtime error class it would surface as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    #[error("AttributeError")]
    AttributeMissing,

    #[error("TypeError: unsupported operand type(s)")]
    UnsupportedOperand,

    #[error("TypeError: unorderable types")]
    UnorderableTypes,

    #[error("TypeError: invalid key type")]
    WrongKeyType,

    /// Reserved: "no element at this position". Derived iteration stops on it.
    #[error("IndexError")]
    IndexOutOfRange,

    #[error("KeyError")]
    KeyNotFound,

    #[error("ValueError: __len__() should return >= 0")]
    InvalidLength,

    #[error("TypeError: unhashable type")]
    Unhashable,

    #[error("TypeError: operation not supported")]
    Unsupported,

    #[error("TypeError: invalid arguments")]
    InvalidArguments,

    /// Signalled by user code, a handler or a protected block.
    #[error("Exception")]
    Raised,
}

#[derive(Debug, Clone, Copy)]
pub struct TracePoint {
    pub location: &'static Location<'static>,
}

/// A typed dispatch failure with an optional detail message and the trail of
/// locations it was propagated through.
#[derive(Debug, Clone)]
pub struct Failure {
    pub kind: ErrorKind,
    pub detail: Option<Box<str>>,
    pub trace: Vec<TracePoint>,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.kind, detail),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for Failure {}

impl From<ErrorKind> for Failure {
    #[track_caller]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl<T> From<Failure> for DispatchResult<T> {
    fn from(failure: Failure) -> Self {
        Err(failure)
    }
}

pub trait FailureExt {
    fn trace(self) -> Self;
}

impl<T> FailureExt for DispatchResult<T> {
    #[track_caller]
    fn trace(self) -> Self {
        match self {
            ok @ Ok(_) => ok,
            Err(failure) => Err(failure.trace()),
        }
    }
}

impl Failure {
    #[track_caller]
    pub fn new(kind: ErrorKind) -> Self {
        let this = Self {
            kind,
            detail: None,
            trace: Vec::with_capacity(2),
        };

        this.trace()
    }

    #[track_caller]
    pub fn trace(mut self) -> Self {
        self.trace.push(TracePoint {
            location: Location::caller(),
        });

        self
    }

    pub fn with_detail<S>(mut self, detail: S) -> Self
    where
        S: AsRef<str>,
    {
        self.detail = Some(detail.as_ref().into());
        self
    }

    #[inline]
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    #[track_caller]
    pub fn attribute_missing(type_name: &str, attr: &str) -> Self {
        Self::new(ErrorKind::AttributeMissing)
            .with_detail(format!("'{}' object has no attribute '{}'", type_name, attr))
    }

    #[track_caller]
    pub fn unsupported_operand(op: impl fmt::Display, left: &str, right: &str) -> Self {
        Self::new(ErrorKind::UnsupportedOperand).with_detail(format!(
            "unsupported operand type(s) for {}: '{}' and '{}'",
            op, left, right
        ))
    }

    #[track_caller]
    pub fn unorderable(op: impl fmt::Display, left: &str, right: &str) -> Self {
        Self::new(ErrorKind::UnorderableTypes).with_detail(format!(
            "'{}' not supported between instances of '{}' and '{}'",
            op, left, right
        ))
    }

    #[track_caller]
    pub fn wrong_key_type(type_name: &str, key_type: &str) -> Self {
        Self::new(ErrorKind::WrongKeyType).with_detail(format!(
            "{} indices must be integers or slices, not {}",
            type_name, key_type
        ))
    }

    #[track_caller]
    pub fn index_out_of_range(type_name: &str) -> Self {
        Self::new(ErrorKind::IndexOutOfRange)
            .with_detail(format!("{} index out of range", type_name))
    }

    #[track_caller]
    pub fn key_not_found(key: impl fmt::Display) -> Self {
        Self::new(ErrorKind::KeyNotFound).with_detail(key.to_string())
    }

    #[track_caller]
    pub fn invalid_length(type_name: &str) -> Self {
        Self::new(ErrorKind::InvalidLength).with_detail(format!(
            "'{}'.__len__() should return a non-negative integer",
            type_name
        ))
    }

    #[track_caller]
    pub fn unhashable(type_name: &str) -> Self {
        Self::new(ErrorKind::Unhashable).with_detail(format!("unhashable type: '{}'", type_name))
    }

    #[track_caller]
    pub fn unsupported<S: AsRef<str>>(message: S) -> Self {
        Self::new(ErrorKind::Unsupported).with_detail(message)
    }

    #[track_caller]
    pub fn invalid_arguments<S: AsRef<str>>(message: S) -> Self {
        Self::new(ErrorKind::InvalidArguments).with_detail(message)
    }

    #[track_caller]
    pub fn raised<S: AsRef<str>>(message: S) -> Self {
        Self::new(ErrorKind::Raised).with_detail(message)
    }
}
