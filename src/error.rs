use core::fmt;

/// Errors reported by [`TwoThreeSet`](crate::TwoThreeSet) operations.
///
/// Expected outcomes such as inserting a duplicate or removing an absent
/// value are reported through `bool` returns, not through this type; only
/// precondition violations and permanently unsupported operations surface
/// here.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// `first()` or `last()` was called on an empty set.
    EmptyCollection,
    /// The requested operation is not supported by this collection,
    /// independent of its state. Carries the operation name.
    Unsupported(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyCollection => f.write_str("empty collection"),
            Error::Unsupported(operation) => write!(f, "not supported: {operation}"),
        }
    }
}

impl core::error::Error for Error {}
