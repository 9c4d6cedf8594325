//! Error values returned by sequences and their views.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T, E = SequenceError> = std::result::Result<T, E>;

/// Every way a sequence operation can fail.
///
/// The first group are argument errors, raised when a caller passes an index,
/// count or setting the target cannot accept. The second group are state
/// errors, raised when the target is in a state that forbids the operation.
/// Neither is transient; repeating the same call fails the same way.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SequenceError {
    /// An index did not address an element.
    #[error("index out of bounds: the len is {len} but the index is {index}")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Length of the target at the time of the call.
        len: usize,
    },

    /// A `(start, count)` window did not fit inside the target.
    #[error("range out of bounds: {count} elements from {start} exceed the len {len}")]
    RangeOutOfBounds {
        /// First index of the window.
        start: usize,
        /// Number of elements in the window.
        count: usize,
        /// Length of the target at the time of the call.
        len: usize,
    },

    /// A setting or size argument was rejected.
    #[error("invalid argument `{name}`: {message}")]
    InvalidArgument {
        /// Name of the argument.
        name: &'static str,
        /// Why it was rejected.
        message: String,
    },

    /// Destination storage cannot hold the elements being copied.
    #[error("destination too small: {required} slots required but {available} available")]
    DestinationTooSmall {
        /// Slots the copy needs.
        required: usize,
        /// Slots left in the destination.
        available: usize,
    },

    /// The operation needs at least one element.
    #[error("sequence is empty")]
    Empty,

    /// The target does not permit mutation.
    #[error("sequence is read-only")]
    ReadOnly,

    /// The underlying sequence changed after the enumerator was created.
    #[error("sequence was modified during enumeration")]
    Modified,

    /// A live window has no fixed range to derive a narrower window from.
    #[error("window is live and cannot be converted into a ranged window")]
    LiveWindow,
}

impl SequenceError {
    pub(crate) fn invalid_arg(name: &'static str, message: impl Into<String>) -> SequenceError {
        SequenceError::InvalidArgument {
            name,
            message: message.into(),
        }
    }

    /// Returns `true` for errors caused by an argument rather than by the
    /// state of the target.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            SequenceError::IndexOutOfRange { .. }
                | SequenceError::RangeOutOfBounds { .. }
                | SequenceError::InvalidArgument { .. }
                | SequenceError::DestinationTooSmall { .. }
        )
    }
}

/// Fails unless `index` addresses one of `len` elements.
#[inline]
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(SequenceError::IndexOutOfRange { index, len })
    }
}

/// Fails unless `count` elements starting at `start` fit in `len`.
#[inline]
pub(crate) fn check_range(start: usize, count: usize, len: usize) -> Result<()> {
    match start.checked_add(count) {
        Some(end) if end <= len => Ok(()),
        _ => Err(SequenceError::RangeOutOfBounds { start, count, len }),
    }
}
