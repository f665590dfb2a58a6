//! Module: error
//! Responsibility: caller-facing failure taxonomy for sorted iterators.
//! Does not own: upstream order verification (assertion failures, see `config`).
//! Boundary: every fallible iterator operation returns `SortedError`.

use std::fmt;
use thiserror::Error as ThisError;

///
/// SortedError
///
/// Structured iterator failure with a stable classification.
/// All failures are local, synchronous contract violations by the caller;
/// none are retryable.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct SortedError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl SortedError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct the failure raised when `next` is demanded past the end.
    #[must_use]
    pub fn no_such_element(origin: ErrorOrigin) -> Self {
        Self::new(
            ErrorClass::NoSuchElement,
            origin,
            format!("{origin} iterator has no further elements"),
        )
    }

    /// Construct a generic illegal-argument failure.
    pub fn illegal_argument(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::IllegalArgument, origin, message)
    }

    /// Construct the failure raised by a `forward` target behind the cursor.
    #[must_use]
    pub fn monotonicity_violation(origin: ErrorOrigin, order_label: &str) -> Self {
        Self::illegal_argument(
            origin,
            format!(
                "{origin} iterator cannot forward to a target preceding the last returned element under {order_label} order"
            ),
        )
    }

    #[must_use]
    pub const fn is_illegal_argument(&self) -> bool {
        matches!(self.class, ErrorClass::IllegalArgument)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorClass
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorClass {
    NoSuchElement,
    IllegalArgument,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NoSuchElement => "no_such_element",
            Self::IllegalArgument => "illegal_argument",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
///
/// Which combinator raised the failure.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorOrigin {
    Base,
    Navigable,
    Mapped,
    Filtered,
    Limited,
    TakeWhile,
    Distinct,
    Merged,
    Intersected,
    Lifecycle,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Base => "base",
            Self::Navigable => "navigable",
            Self::Mapped => "mapped",
            Self::Filtered => "filtered",
            Self::Limited => "limited",
            Self::TakeWhile => "take_while",
            Self::Distinct => "distinct",
            Self::Merged => "merged",
            Self::Intersected => "intersected",
            Self::Lifecycle => "lifecycle",
        };
        write!(f, "{label}")
    }
}
