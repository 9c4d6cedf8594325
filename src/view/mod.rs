//! The read contract shared by sequences and every view over them.
//!
//! A view never owns the elements it shows. To keep a view alive while the
//! owner goes on mutating the sequence, put the sequence behind a
//! [`Shared`] handle: the owner mutates through `borrow_mut`, the view
//! borrows for the duration of a single call.
//!
//! ```
//! use ringseq::{Sequence, SequenceError, SequenceView};
//!
//! let shared = Sequence::from_iter(1..=3).into_shared();
//! let doubled = shared.clone().map_view(|x: i32| x * 2);
//! assert_eq!(doubled.to_vec(), Ok(vec![2, 4, 6]));
//!
//! let mut cursor = doubled.iter();
//! assert_eq!(cursor.next(), Some(Ok(2)));
//! shared.borrow_mut().add(4);
//! assert_eq!(cursor.next(), Some(Err(SequenceError::Modified)));
//! assert_eq!(doubled.to_vec(), Ok(vec![2, 4, 6, 8]));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{check_index, check_range, Result, SequenceError};

mod chain;
mod fixed;
mod mutable;
mod snapshot;
mod transform;

pub use self::chain::ChainedView;
pub use self::fixed::FixedWindow;
pub use self::mutable::MutableWindow;
pub use self::snapshot::Snapshot;
pub use self::transform::TransformView;

/// Shared, single-threaded handle to a sequence or view.
pub type Shared<V> = Rc<RefCell<V>>;

/// Boxed enumerator returned by [`SequenceView::iter_range`]. Every step
/// yields either the next element or the error that stopped enumeration.
pub type Cursor<'a, T> = Box<dyn Iterator<Item = Result<T>> + 'a>;

/// Read access to a sequence of elements, independent of how they are
/// stored.
///
/// Implementors provide [`len`], [`at`], [`version`] and [`is_stack`];
/// everything else has a default built on those four. Elements are returned
/// by value, which for a transform view means freshly computed.
///
/// [`len`]: SequenceView::len
/// [`at`]: SequenceView::at
/// [`version`]: SequenceView::version
/// [`is_stack`]: SequenceView::is_stack
pub trait SequenceView {
    /// Element type.
    type Item;

    /// Number of elements currently visible.
    fn len(&self) -> usize;

    /// Element at logical `index`.
    fn at(&self, index: usize) -> Result<Self::Item>;

    /// Modification stamp. Changes whenever the visible elements may have
    /// changed.
    fn version(&self) -> u64;

    /// Whether the underlying ordering is last in, first out.
    fn is_stack(&self) -> bool;

    /// Returns `true` if no element is visible.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The front element.
    fn peek(&self) -> Result<Self::Item> {
        if self.is_empty() {
            return Err(SequenceError::Empty);
        }
        self.at(0)
    }

    /// The element `index` positions behind the front.
    fn peek_at(&self, index: usize) -> Result<Self::Item> {
        if self.is_empty() {
            return Err(SequenceError::Empty);
        }
        check_index(index, self.len())?;
        self.at(index)
    }

    /// Replaces the front element. Views are read-only and refuse.
    fn poke(&mut self, _element: Self::Item) -> Result<()> {
        Err(SequenceError::ReadOnly)
    }

    /// Enumerates `count` elements starting at `start`, back to front when
    /// `reverse` is set. The window is validated here; the cursor then fails
    /// with [`SequenceError::Modified`] on every step once [`version`]
    /// changes.
    ///
    /// [`version`]: SequenceView::version
    fn iter_range(&self, start: usize, count: usize, reverse: bool) -> Result<Cursor<'_, Self::Item>> {
        check_range(start, count, self.len())?;
        Ok(Box::new(ViewIter::new(self, start, count, reverse)))
    }

    /// Enumerates every element front to back.
    fn iter(&self) -> Cursor<'_, Self::Item> {
        self.iter_range(0, self.len(), false)
            .unwrap_or_else(|err| Box::new(std::iter::once(Err(err))))
    }

    /// Enumerates every element back to front.
    fn iter_rev(&self) -> Cursor<'_, Self::Item> {
        self.iter_range(0, self.len(), true)
            .unwrap_or_else(|err| Box::new(std::iter::once(Err(err))))
    }

    /// Copies every element into a new vector, front first.
    fn to_vec(&self) -> Result<Vec<Self::Item>> {
        self.iter().collect()
    }

    /// Copies `count` elements starting at `start` into a new vector.
    fn to_vec_range(&self, start: usize, count: usize) -> Result<Vec<Self::Item>> {
        self.iter_range(start, count, false)?.collect()
    }

    /// Copies every element into `dest`, starting at `dest_index`.
    fn copy_to(&self, dest: &mut [Self::Item], dest_index: usize) -> Result<()> {
        self.copy_range_to(0, dest, dest_index, self.len())
    }

    /// Copies `count` elements starting at `start` into `dest`, starting at
    /// `dest_index`. Nothing is written unless the whole copy fits.
    fn copy_range_to(&self,
                     start: usize,
                     dest: &mut [Self::Item],
                     dest_index: usize,
                     count: usize)
                     -> Result<()> {
        check_range(start, count, self.len())?;
        let available = dest.len().saturating_sub(dest_index);
        if count > available {
            return Err(SequenceError::DestinationTooSmall { required: count, available });
        }
        if count == 0 {
            return Ok(());
        }
        let elements = self.to_vec_range(start, count)?;
        for (slot, element) in dest[dest_index..].iter_mut().zip(elements) {
            *slot = element;
        }
        Ok(())
    }

    /// Copies the visible elements into an immutable [`Snapshot`].
    fn snapshot(&self) -> Result<Snapshot<Self::Item>> {
        Ok(Snapshot::with_stack(self.to_vec()?, self.is_stack()))
    }

    /// Wraps `self` in a read-only window that mirrors it entirely.
    fn read_only_view(self) -> FixedWindow<Self>
        where Self: Sized
    {
        FixedWindow::live(self)
    }

    /// Wraps `self` in a read-only window pinned to `count` elements from
    /// `start`.
    ///
    /// A [`FixedWindow`] answers this itself and composes the offsets, so a
    /// window of a window reads the original delegate directly.
    fn read_only_window(self, start: usize, count: usize) -> Result<FixedWindow<Self>>
        where Self: Sized
    {
        FixedWindow::ranged(self, start, count)
    }

    /// Wraps `self` in a view that maps every element through `f` on access.
    fn map_view<U, F>(self, f: F) -> TransformView<Self, F>
        where Self: Sized,
              F: Fn(Self::Item) -> U
    {
        TransformView::new(self, f)
    }

    /// Starts a chain with `self` as its only member.
    fn into_chain(self) -> ChainedView<Self::Item>
        where Self: Sized + 'static
    {
        let mut chain = ChainedView::new();
        chain.push(self);
        chain
    }

    /// Wraps `self` in a live window whose range and direction can change.
    fn into_viewer(self) -> MutableWindow<Self>
        where Self: Sized
    {
        MutableWindow::new(self)
    }
}

/// Index-based cursor over any view. Captures the view's version at creation
/// and compares it before every step.
pub struct ViewIter<'a, V: ?Sized> {
    view: &'a V,
    version: u64,
    front: usize,
    back: usize,
    reverse: bool,
}

impl<'a, V: SequenceView + ?Sized> ViewIter<'a, V> {
    /// Cursor over `count` elements of `view` from `start`. The window is not
    /// validated; out-of-range positions surface as errors from `at`.
    pub fn new(view: &'a V, start: usize, count: usize, reverse: bool) -> Self {
        ViewIter {
            view,
            version: view.version(),
            front: start,
            back: start + count,
            reverse,
        }
    }
}

impl<'a, V: SequenceView + ?Sized> Iterator for ViewIter<'a, V> {
    type Item = Result<V::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.view.version() != self.version {
            return Some(Err(SequenceError::Modified));
        }
        if self.front == self.back {
            return None;
        }
        let index = if self.reverse {
            self.back -= 1;
            self.back
        } else {
            self.front += 1;
            self.front - 1
        };
        Some(self.view.at(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        if self.view.version() != self.version {
            // Modified: yields errors without end.
            return (remaining, None);
        }
        (remaining, Some(remaining))
    }
}

impl<'v, V: SequenceView + ?Sized> SequenceView for &'v V {
    type Item = V::Item;

    fn len(&self) -> usize {
        (**self).len()
    }

    fn at(&self, index: usize) -> Result<V::Item> {
        (**self).at(index)
    }

    fn version(&self) -> u64 {
        (**self).version()
    }

    fn is_stack(&self) -> bool {
        (**self).is_stack()
    }

    fn iter_range(&self, start: usize, count: usize, reverse: bool) -> Result<Cursor<'_, V::Item>> {
        (**self).iter_range(start, count, reverse)
    }
}

/// Shared handles borrow the cell once per call, so the owner may mutate
/// between calls. Cursors over a handle re-borrow on every step.
impl<V: SequenceView + ?Sized> SequenceView for Rc<RefCell<V>> {
    type Item = V::Item;

    fn len(&self) -> usize {
        self.borrow().len()
    }

    fn at(&self, index: usize) -> Result<V::Item> {
        self.borrow().at(index)
    }

    fn version(&self) -> u64 {
        self.borrow().version()
    }

    fn is_stack(&self) -> bool {
        self.borrow().is_stack()
    }

    fn poke(&mut self, element: V::Item) -> Result<()> {
        self.borrow_mut().poke(element)
    }

    fn to_vec_range(&self, start: usize, count: usize) -> Result<Vec<V::Item>> {
        self.borrow().to_vec_range(start, count)
    }

    fn to_vec(&self) -> Result<Vec<V::Item>> {
        self.borrow().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Behavior, Sequence};

    #[test]
    fn cursor_reports_modification_on_every_step() {
        let shared = Sequence::from_vec(vec![1, 2, 3], Behavior::Queue).into_shared();
        let mut cursor = shared.iter();
        assert_eq!(cursor.next(), Some(Ok(1)));
        shared.borrow_mut().add(4);
        for _ in 0..3 {
            assert_eq!(cursor.next(), Some(Err(SequenceError::Modified)));
        }
    }

    #[test]
    fn size_hint_is_unbounded_once_modified() {
        let shared = Sequence::from_vec(vec![1, 2], Behavior::Queue).into_shared();
        let mut cursor = shared.iter();
        assert_eq!(cursor.size_hint(), (2, Some(2)));
        assert_eq!(cursor.next(), Some(Ok(1)));
        assert_eq!(cursor.size_hint(), (1, Some(1)));
        shared.borrow_mut().add(3);
        assert_eq!(cursor.size_hint(), (1, None));
        assert_eq!(cursor.by_ref().take(5).filter(Result::is_err).count(), 5);
    }

    #[test]
    fn cursor_survives_reads() {
        let shared = Sequence::from_vec(vec![1, 2, 3], Behavior::Queue).into_shared();
        let mut cursor = shared.iter_rev();
        assert_eq!(cursor.next(), Some(Ok(3)));
        assert_eq!(shared.borrow().len(), 3);
        assert_eq!(cursor.collect::<Result<Vec<_>>>(), Ok(vec![2, 1]));
    }

    #[test]
    fn windowed_enumeration() {
        let sequence: Sequence<_> = (0..10).collect();
        assert_eq!(sequence.to_vec_range(3, 4), Ok(vec![3, 4, 5, 6]));
        assert_eq!(sequence.iter_range(8, 2, true).unwrap().collect::<Result<Vec<_>>>(),
                   Ok(vec![9, 8]));
        assert_eq!(sequence.to_vec_range(8, 3).unwrap_err(),
                   SequenceError::RangeOutOfBounds { start: 8, count: 3, len: 10 });
        assert!(sequence.iter_range(10, 0, false).is_ok());
    }

    #[test]
    fn copy_range_into_slice() {
        let sequence = Sequence::from_vec(vec![1, 2, 3, 4], Behavior::Stack);
        let mut dest = [0; 5];
        sequence.copy_range_to(1, &mut dest, 2, 3).unwrap();
        assert_eq!(dest, [0, 0, 3, 2, 1]);
        assert_eq!(sequence.copy_to(&mut dest, 2),
                   Err(SequenceError::DestinationTooSmall { required: 4, available: 3 }));
        assert_eq!(dest, [0, 0, 3, 2, 1]);
        sequence.copy_to(&mut dest, 1).unwrap();
        assert_eq!(dest, [0, 4, 3, 2, 1]);
    }

    #[test]
    fn peek_at_bounds() {
        let sequence: Sequence<_> = (0..3).collect();
        assert_eq!(sequence.peek_at(2), Ok(2));
        assert_eq!(sequence.peek_at(3), Err(SequenceError::IndexOutOfRange { index: 3, len: 3 }));
        let empty: Sequence<u8> = Sequence::new();
        assert_eq!(empty.peek_at(0), Err(SequenceError::Empty));
    }

    #[test]
    fn poke_through_handle() {
        let mut shared = Sequence::from_vec(vec![1, 2], Behavior::Queue).into_shared();
        shared.poke(10).unwrap();
        assert_eq!(shared.to_vec(), Ok(vec![10, 2]));
        let guard = shared.borrow();
        let mut borrowed: &Sequence<i32> = &guard;
        assert_eq!(borrowed.poke(5), Err(SequenceError::ReadOnly));
    }

    #[test]
    fn snapshot_is_detached() {
        let shared = Sequence::from_vec(vec![1, 2, 3], Behavior::Stack).into_shared();
        let snapshot = shared.snapshot().unwrap();
        shared.borrow_mut().add(4);
        assert_eq!(snapshot.to_vec(), Ok(vec![3, 2, 1]));
        assert!(snapshot.is_stack());
        assert_eq!(shared.to_vec(), Ok(vec![4, 3, 2, 1]));
    }
}
