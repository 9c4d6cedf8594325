//! A growable circular buffer that reads as either a stack or a queue, and a
//! family of views over it.
//!
//! [`Sequence`] has `O(1)` amortized adds and removals at both ends and
//! `O(1)` indexing. Its [`Behavior`] decides which end is the *front*: the
//! oldest element for a queue, the newest for a stack. Index `0` is always
//! the front, so the same code reads either kind in the order it would be
//! taken.
//!
//! [`BoundedSequence`] caps a sequence at a maximum size and evicts the
//! oldest elements in batches once the cap is hit.
//!
//! Every sequence and view implements [`SequenceView`], the read contract the
//! views are built on:
//!
//! - [`FixedWindow`], a read-only window that is either live or pinned to a
//!   fixed range
//! - [`MutableWindow`], a window whose range, direction and delegate change
//!   at will
//! - [`Snapshot`], an immutable copy
//! - [`TransformView`], a lazy per-element mapping
//! - [`ChainedView`], several views read back to back
//!
//! Enumerators capture the source's [`version`](SequenceView::version) and
//! fail with [`SequenceError::Modified`] once it changes, instead of skipping
//! or repeating elements.
//!
//! # Feature Flags
//! The **ringseq** crate has the following cargo feature flags:
//!
//! - `serde`
//!   - Optional
//!   - Derive `Serialize` and `Deserialize` for [`Behavior`],
//!     [`SequenceConfig`] and [`BoundedConfig`]
//!
//! # Logging
//!
//! Storage reallocation and window clamping are reported through `tracing`
//! at `TRACE` level, evictions at `DEBUG`. Nothing is logged unless the
//! application installs a subscriber.
//!
//! # Examples
//! ```
//! use ringseq::{Behavior, Sequence, SequenceView};
//!
//! let mut stack = Sequence::with_capacity(2, Behavior::Stack);
//! stack.add(1);
//! stack.add(2);
//! stack.add(3);
//! assert_eq!(stack.capacity(), 4);
//! assert_eq!(stack.to_vec(), Ok(vec![3, 2, 1]));
//!
//! let shared = stack.into_shared();
//! let window = shared.clone().read_only_window(1, 2).unwrap();
//! assert_eq!(window.to_vec(), Ok(vec![2, 1]));
//!
//! // A pinned window is not re-checked; it now reaches past the end.
//! assert_eq!(shared.borrow_mut().take(), Ok(3));
//! assert_eq!(window.at(0), Ok(1));
//! assert!(window.to_vec().is_err());
//! ```

pub use odds::IndexRange as RangeArgument;

mod behavior;
mod bounded;
pub mod config;
pub mod error;
mod sequence;
mod utils;
pub mod view;

pub use behavior::Behavior;
pub use bounded::{BoundedSequence, EvictionHandler};
pub use config::{BoundedConfig, SequenceConfig};
pub use error::{Result, SequenceError};
pub use sequence::{IntoIter, Iter, IterMut, Sequence};
pub use view::{ChainedView, Cursor, FixedWindow, MutableWindow, SequenceView, Shared, Snapshot,
               TransformView, ViewIter};
