use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::mem;

use tracing::trace;

use super::SequenceView;
use crate::error::{check_index, check_range, Result};

/// A window over another view whose range, direction and delegate can all be
/// changed after construction.
///
/// Like [`FixedWindow`](super::FixedWindow), the window is either live or
/// pinned to `(start, count)`. A pinned range is checked when it is set; if
/// the delegate shrinks afterwards, [`check_range`](MutableWindow::check_range)
/// reports it and can clamp the range back into bounds.
///
/// With [`set_reverse`](MutableWindow::set_reverse) the window presents its
/// range back to front: index `0` becomes the last element of the range.
///
/// Every change to the range, direction or delegate moves the window's
/// [`version`](SequenceView::version), so a cursor opened before the change
/// fails with [`SequenceError::Modified`](crate::SequenceError::Modified).
#[derive(Clone, Debug)]
pub struct MutableWindow<V> {
    delegate: V,
    range: Option<(usize, usize)>,
    reverse: bool,
    generation: u64,
}

impl<V: SequenceView> MutableWindow<V> {
    /// A live, forward window over `delegate`.
    pub fn new(delegate: V) -> Self {
        MutableWindow {
            delegate,
            range: None,
            reverse: false,
            generation: 0,
        }
    }

    /// A forward window pinned to `count` elements of `delegate` from `start`.
    pub fn with_range(delegate: V, start: usize, count: usize) -> Result<Self> {
        let mut window = MutableWindow::new(delegate);
        window.set_range(start, count)?;
        Ok(window)
    }

    /// Pins the window to `count` elements from `start`, checked against the
    /// delegate's current length. On failure the window is unchanged.
    pub fn set_range(&mut self, start: usize, count: usize) -> Result<()> {
        check_range(start, count, self.delegate.len())?;
        self.range = Some((start, count));
        self.touch();
        Ok(())
    }

    /// Returns `true` if the pinned range still fits the delegate. A live
    /// window always fits.
    ///
    /// If the range no longer fits and `adjust_now` is set, it is clamped: a
    /// start past the end moves to the last element with a count of zero,
    /// otherwise the count shrinks to what is left after the start. Without
    /// `adjust_now` nothing changes.
    pub fn check_range(&mut self, adjust_now: bool) -> bool {
        let (start, count) = match self.range {
            Some(range) => range,
            None => return true,
        };
        let len = self.delegate.len();
        if check_range(start, count, len).is_ok() {
            return true;
        }
        if adjust_now {
            let adjusted = if start > 0 && start >= len {
                (len.saturating_sub(1), 0)
            } else {
                (start, count.min(len - start))
            };
            trace!(from = ?(start, count), to = ?adjusted, len, "clamped window range");
            self.range = Some(adjusted);
            self.touch();
        }
        false
    }

    /// Swaps in a new delegate and returns the old one. With `adjust_range`
    /// set, the pinned range is clamped to the new delegate.
    pub fn set_collection(&mut self, delegate: V, adjust_range: bool) -> V {
        let previous = mem::replace(&mut self.delegate, delegate);
        self.touch();
        if adjust_range {
            self.check_range(true);
        }
        previous
    }
}

impl<V> MutableWindow<V> {
    /// Unpins the window so it mirrors the whole delegate again.
    pub fn set_live(&mut self) {
        self.range = None;
        self.touch();
    }

    pub fn set_reverse(&mut self, reverse: bool) {
        self.reverse = reverse;
        self.touch();
    }

    #[inline]
    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    /// The pinned `(start, count)`, or `None` for a live window.
    #[inline]
    pub fn range(&self) -> Option<(usize, usize)> {
        self.range
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        self.range.is_none()
    }

    pub fn delegate(&self) -> &V {
        &self.delegate
    }

    pub fn into_inner(self) -> V {
        self.delegate
    }

    #[inline]
    fn touch(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }
}

impl<V: SequenceView> SequenceView for MutableWindow<V> {
    type Item = V::Item;

    fn len(&self) -> usize {
        match self.range {
            Some((_, count)) => count,
            None => self.delegate.len(),
        }
    }

    fn at(&self, index: usize) -> Result<V::Item> {
        let len = self.len();
        check_index(index, len)?;
        let offset = if self.reverse { len - 1 - index } else { index };
        let start = self.range.map_or(0, |(start, _)| start);
        self.delegate.at(start + offset)
    }

    fn version(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.generation.hash(&mut hasher);
        self.delegate.version().hash(&mut hasher);
        hasher.finish()
    }

    #[inline]
    fn is_stack(&self) -> bool {
        self.delegate.is_stack()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::{Behavior, Sequence, SequenceError};

    fn shared(n: i32) -> crate::Shared<Sequence<i32>> {
        Sequence::from_vec((0..n).collect(), Behavior::Queue).into_shared()
    }

    #[test]
    fn range_and_reverse() {
        let sequence = shared(8);
        let mut viewer = sequence.clone().into_viewer();
        assert!(viewer.is_live());
        assert_eq!(viewer.len(), 8);

        viewer.set_range(2, 3).unwrap();
        assert_eq!(viewer.to_vec(), Ok(vec![2, 3, 4]));
        viewer.set_reverse(true);
        assert!(viewer.is_reverse());
        assert_eq!(viewer.to_vec(), Ok(vec![4, 3, 2]));
        assert_eq!(viewer.peek(), Ok(4));
        assert_eq!(viewer.iter_rev().collect::<Result<Vec<_>>>(), Ok(vec![2, 3, 4]));

        assert_eq!(viewer.set_range(6, 3),
                   Err(SequenceError::RangeOutOfBounds { start: 6, count: 3, len: 8 }));
        assert_eq!(viewer.range(), Some((2, 3)));

        viewer.set_live();
        assert_eq!(viewer.at(0), Ok(7));
    }

    #[test]
    fn check_range_clamps_count() {
        let sequence = shared(6);
        let mut viewer = MutableWindow::with_range(sequence.clone(), 2, 4).unwrap();
        sequence.borrow_mut().drain(4..).unwrap();

        assert!(!viewer.check_range(false));
        assert_eq!(viewer.range(), Some((2, 4)));
        assert!(!viewer.check_range(true));
        assert_eq!(viewer.range(), Some((2, 2)));
        assert!(viewer.check_range(true));
        assert_eq!(viewer.range(), Some((2, 2)));
        assert_eq!(viewer.to_vec(), Ok(vec![2, 3]));
    }

    #[test]
    fn check_range_clamps_start() {
        let sequence = shared(6);
        let mut viewer = MutableWindow::with_range(sequence.clone(), 4, 2).unwrap();
        sequence.borrow_mut().drain(3..).unwrap();

        assert!(!viewer.check_range(true));
        assert_eq!(viewer.range(), Some((2, 0)));
        assert!(viewer.is_empty());
        assert!(viewer.check_range(true));
        assert_eq!(viewer.range(), Some((2, 0)));

        sequence.borrow_mut().clear();
        assert!(!viewer.check_range(true));
        assert_eq!(viewer.range(), Some((0, 0)));
        assert!(viewer.check_range(false));
    }

    #[test]
    fn set_collection_retargets() {
        let mut viewer = MutableWindow::with_range(shared(10), 5, 5).unwrap();
        let previous = viewer.set_collection(shared(3), false);
        assert_eq!(previous.borrow().len(), 10);
        assert_eq!(viewer.range(), Some((5, 5)));
        assert!(viewer.at(0).is_err());

        viewer.set_collection(shared(7), true);
        assert_eq!(viewer.range(), Some((5, 2)));
        assert_eq!(viewer.to_vec(), Ok(vec![5, 6]));
    }

    #[test]
    fn live_window_always_fits() {
        let sequence = shared(2);
        let mut viewer = MutableWindow::new(sequence.clone());
        sequence.borrow_mut().clear();
        assert!(viewer.check_range(true));
        assert!(viewer.is_live());
        assert_eq!(viewer.peek(), Err(SequenceError::Empty));
    }

    #[test]
    fn cursor_fails_after_retargeting() {
        let viewer = Rc::new(RefCell::new(MutableWindow::new(shared(4))));
        let mut cursor = viewer.iter();
        assert_eq!(cursor.next(), Some(Ok(0)));
        let replacement = Sequence::from_vec(vec![10, 20, 30, 40], Behavior::Queue).into_shared();
        viewer.borrow_mut().set_collection(replacement, true);
        assert_eq!(cursor.next(), Some(Err(SequenceError::Modified)));
        assert_eq!(cursor.next(), Some(Err(SequenceError::Modified)));
    }

    #[test]
    fn cursor_fails_after_range_or_direction_change() {
        let viewer = Rc::new(RefCell::new(MutableWindow::with_range(shared(10), 0, 4).unwrap()));
        let mut cursor = viewer.iter();
        assert_eq!(cursor.next(), Some(Ok(0)));
        viewer.borrow_mut().set_range(6, 4).unwrap();
        assert_eq!(cursor.next(), Some(Err(SequenceError::Modified)));

        let mut cursor = viewer.iter();
        assert_eq!(cursor.next(), Some(Ok(6)));
        viewer.borrow_mut().set_reverse(true);
        assert_eq!(cursor.next(), Some(Err(SequenceError::Modified)));

        let mut cursor = viewer.iter();
        viewer.borrow_mut().set_live();
        assert_eq!(cursor.next(), Some(Err(SequenceError::Modified)));
    }

    #[test]
    fn version_ignores_reads_and_fitting_checks() {
        let mut viewer = MutableWindow::with_range(shared(6), 1, 3).unwrap();
        let before = viewer.version();
        assert_eq!(viewer.to_vec(), Ok(vec![1, 2, 3]));
        assert!(viewer.check_range(true));
        assert_eq!(viewer.version(), before);

        viewer.delegate().borrow_mut().drain(2..).unwrap();
        let shrunk = viewer.version();
        assert_ne!(shrunk, before);
        assert!(!viewer.check_range(false));
        assert_eq!(viewer.version(), shrunk);
        assert!(!viewer.check_range(true));
        assert_ne!(viewer.version(), shrunk);
    }
}
