//! A `Sequence` that never holds more than a fixed number of elements.

use std::fmt;
use std::ops::Deref;

use tracing::debug;

use crate::behavior::Behavior;
use crate::config::{self, BoundedConfig};
use crate::error::{Result, SequenceError};
use crate::sequence::{Iter, Sequence};
use crate::view::SequenceView;

/// Callback receiving the elements a [`BoundedSequence`] evicted, in logical
/// order.
pub type EvictionHandler<T> = Box<dyn FnMut(Vec<T>)>;

/// A [`Sequence`] capped at `maximum_size` elements.
///
/// Once the cap is reached, adding evicts from the end opposite the one being
/// added to: the front of a queue (its oldest elements) or the back of a
/// stack (also its oldest). Each eviction removes `overhead` elements more
/// than strictly necessary, so that the next `overhead` adds go through
/// without evicting again.
///
/// Adding a single element to a full sequence evicts
/// `(len - maximum_size) + overhead + 1` elements, the extra one making room
/// for the new element. Adding a batch inserts the whole batch first and then
/// evicts `(len - maximum_size) + overhead` once.
///
/// Read access goes through `Deref<Target = Sequence<T>>`; mutation is limited
/// to the methods below, which keep the cap.
///
/// # Examples
///
/// ```
/// use ringseq::{Behavior, BoundedSequence};
///
/// let mut recent = BoundedSequence::new(3, 1, Behavior::Queue).unwrap();
/// recent.add_range(vec![1, 2, 3]);
/// recent.add(4);
/// assert_eq!(recent.iter().copied().collect::<Vec<_>>(), vec![3, 4]);
/// ```
pub struct BoundedSequence<T> {
    inner: Sequence<T>,
    maximum_size: usize,
    overhead: usize,
    trim_on_evict: bool,
    on_evict: Option<EvictionHandler<T>>,
}

impl<T> BoundedSequence<T> {
    /// Creates an empty bounded sequence with room for `maximum_size`
    /// elements.
    ///
    /// Fails unless `maximum_size >= 1` and `overhead <= maximum_size`.
    pub fn new(maximum_size: usize, overhead: usize, behavior: Behavior) -> Result<Self> {
        config::validate_fixed_size(maximum_size, overhead)?;
        Ok(BoundedSequence {
            inner: Sequence::with_capacity(maximum_size, behavior),
            maximum_size,
            overhead,
            trim_on_evict: false,
            on_evict: None,
        })
    }

    /// Creates an empty bounded sequence from validated settings.
    pub fn with_config(config: BoundedConfig) -> Result<Self> {
        config.validate()?;
        Ok(BoundedSequence {
            inner: Sequence::with_config(config.sequence)?,
            maximum_size: config.maximum_size,
            overhead: config.overhead,
            trim_on_evict: config.trim_on_evict,
            on_evict: None,
        })
    }

    #[inline]
    pub fn maximum_size(&self) -> usize {
        self.maximum_size
    }

    #[inline]
    pub fn overhead(&self) -> usize {
        self.overhead
    }

    #[inline]
    pub fn trim_on_evict(&self) -> bool {
        self.trim_on_evict
    }

    /// Shrink the storage back to `maximum_size` after every eviction.
    pub fn set_trim_on_evict(&mut self, trim: bool) {
        self.trim_on_evict = trim;
    }

    /// Registers `handler` to receive every batch of evicted elements,
    /// replacing any previous handler.
    pub fn on_evict<F>(&mut self, handler: F)
        where F: FnMut(Vec<T>) + 'static
    {
        self.on_evict = Some(Box::new(handler));
    }

    /// Drops the eviction handler, if any.
    pub fn clear_on_evict(&mut self) {
        self.on_evict = None;
    }

    /// Changes the cap. If the sequence now holds more than `maximum_size`
    /// elements, the excess plus `overhead` is evicted right away.
    ///
    /// On failure the sequence is unchanged.
    pub fn set_fixed_size(&mut self, maximum_size: usize, overhead: usize) -> Result<()> {
        config::validate_fixed_size(maximum_size, overhead)?;
        debug!(maximum_size, overhead, len = self.inner.len(), "changed bounded sequence size");
        self.maximum_size = maximum_size;
        self.overhead = overhead;
        self.evict_excess();
        Ok(())
    }

    /// Adds an element at the active end, evicting first if the sequence is
    /// full.
    pub fn add(&mut self, element: T) {
        self.make_room();
        self.inner.add(element);
    }

    /// Adds every element of `elements`, then evicts once if the sequence
    /// went over the cap.
    pub fn add_range<I: IntoIterator<Item = T>>(&mut self, elements: I) {
        self.inner.add_range(elements);
        self.evict_excess();
    }

    /// Inserts an element at logical `index`, evicting first if the sequence
    /// is full. `index` refers to the contents before eviction; if the
    /// element it pointed at was evicted, the new element lands at the
    /// nearest surviving position.
    pub fn insert(&mut self, index: usize, element: T) -> Result<()> {
        if index > self.inner.len() {
            return Err(SequenceError::IndexOutOfRange { index, len: self.inner.len() });
        }
        let evicted = self.make_room();
        let index = match self.inner.behavior() {
            Behavior::Queue => index.saturating_sub(evicted),
            Behavior::Stack => index.min(self.inner.len()),
        };
        self.inner.insert(index, element)
    }

    /// Removes the front element.
    #[inline]
    pub fn take(&mut self) -> Result<T> {
        self.inner.take()
    }

    /// Removes `count` front elements.
    #[inline]
    pub fn take_range(&mut self, count: usize) -> Result<Vec<T>> {
        self.inner.take_range(count)
    }

    #[inline]
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        self.inner.remove_at(index)
    }

    #[inline]
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        self.inner.move_item(from, to)
    }

    #[inline]
    pub fn set(&mut self, index: usize, element: T) -> Result<T> {
        self.inner.set(index, element)
    }

    /// Removes every element. The eviction handler is not called.
    #[inline]
    pub fn clear(&mut self) {
        self.inner.clear()
    }

    /// Iterates the elements by reference, front to back.
    ///
    /// Shadows [`SequenceView::iter`], which yields owned `Result`s.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        self.inner.iter()
    }

    /// Gives up the cap and returns the underlying sequence.
    pub fn into_inner(self) -> Sequence<T> {
        self.inner
    }

    /// Evicts ahead of a single add. Returns the number of elements evicted.
    fn make_room(&mut self) -> usize {
        let len = self.inner.len();
        if len < self.maximum_size {
            return 0;
        }
        let count = len.min(len - self.maximum_size + self.overhead + 1);
        self.evict(count)
    }

    /// Evicts after a batch add or a change of cap.
    fn evict_excess(&mut self) -> usize {
        let len = self.inner.len();
        if len <= self.maximum_size {
            return 0;
        }
        let count = len.min(len - self.maximum_size + self.overhead);
        self.evict(count)
    }

    fn evict(&mut self, count: usize) -> usize {
        debug_assert!(count <= self.inner.len());
        let removed = match self.inner.behavior() {
            Behavior::Queue => self.inner.pop_front_up_to(count),
            Behavior::Stack => self.inner.pop_back_up_to(count),
        };
        let evicted = removed.len();
        debug!(evicted,
               len = self.inner.len(),
               maximum_size = self.maximum_size,
               overhead = self.overhead,
               "evicted from bounded sequence");
        if self.trim_on_evict {
            self.inner.resize_storage(self.maximum_size);
        }
        if let Some(handler) = self.on_evict.as_mut() {
            handler(removed);
        }
        evicted
    }
}

impl<T> Deref for BoundedSequence<T> {
    type Target = Sequence<T>;

    #[inline]
    fn deref(&self) -> &Sequence<T> {
        &self.inner
    }
}

impl<T> Extend<T> for BoundedSequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.add_range(iter);
    }
}

impl<T: fmt::Debug> fmt::Debug for BoundedSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("BoundedSequence")
            .field("elements", &self.inner)
            .field("maximum_size", &self.maximum_size)
            .field("overhead", &self.overhead)
            .field("trim_on_evict", &self.trim_on_evict)
            .finish()
    }
}

impl<T: Clone> SequenceView for BoundedSequence<T> {
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        self.inner.len()
    }

    fn at(&self, index: usize) -> Result<T> {
        self.inner.at(index)
    }

    #[inline]
    fn version(&self) -> u64 {
        self.inner.version()
    }

    #[inline]
    fn is_stack(&self) -> bool {
        self.inner.is_stack()
    }

    fn poke(&mut self, element: T) -> Result<()> {
        self.inner.poke(element)
    }
}
