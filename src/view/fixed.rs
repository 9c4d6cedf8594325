use super::{Cursor, SequenceView};
use crate::error::{check_index, check_range, Result, SequenceError};

/// A read-only window over another view.
///
/// A window is either *live*, mirroring every element of its delegate as the
/// delegate grows and shrinks, or *ranged*, pinned to `count` elements from
/// `start`. A ranged window is checked against the delegate once, when it is
/// created; if the delegate later shrinks, reads past its end fail with the
/// delegate's own error.
///
/// # Examples
///
/// ```
/// use ringseq::{Sequence, SequenceView};
///
/// let sequence: Sequence<_> = (0..10).collect();
/// let window = (&sequence).read_only_window(2, 5).unwrap();
/// assert_eq!(window.to_vec(), Ok(vec![2, 3, 4, 5, 6]));
///
/// let narrower = window.subrange(1, 2).unwrap();
/// assert_eq!(narrower.range(), Some((3, 2)));
/// assert_eq!(narrower.to_vec(), Ok(vec![3, 4]));
/// ```
#[derive(Clone, Debug)]
pub struct FixedWindow<V> {
    delegate: V,
    range: Option<(usize, usize)>,
}

impl<V: SequenceView> FixedWindow<V> {
    /// Mirrors every element of `delegate`.
    pub fn live(delegate: V) -> Self {
        FixedWindow { delegate, range: None }
    }

    /// Pins the window to `count` elements of `delegate` from `start`.
    pub fn ranged(delegate: V, start: usize, count: usize) -> Result<Self> {
        check_range(start, count, delegate.len())?;
        Ok(FixedWindow {
            delegate,
            range: Some((start, count)),
        })
    }

    /// A narrower window over the same delegate, `count` elements from
    /// `start` relative to this window. Offsets are composed, so the result
    /// reads straight from the delegate.
    ///
    /// Fails with [`SequenceError::LiveWindow`] on a live window.
    pub fn subrange(&self, start: usize, count: usize) -> Result<FixedWindow<V>>
        where V: Clone
    {
        let (offset, len) = self.range.ok_or(SequenceError::LiveWindow)?;
        check_range(start, count, len)?;
        Ok(FixedWindow {
            delegate: self.delegate.clone(),
            range: Some((offset + start, count)),
        })
    }

    /// Re-pins the window to `count` elements from `start`, relative to what
    /// it shows now. Unlike the [`SequenceView`] factory this does not nest:
    /// the result is a window straight over the same delegate.
    pub fn read_only_window(self, start: usize, count: usize) -> Result<FixedWindow<V>> {
        match self.range {
            Some((offset, len)) => {
                check_range(start, count, len)?;
                Ok(FixedWindow {
                    delegate: self.delegate,
                    range: Some((offset + start, count)),
                })
            }
            None => FixedWindow::ranged(self.delegate, start, count),
        }
    }
}

impl<V> FixedWindow<V> {
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
}

impl<V: SequenceView> SequenceView for FixedWindow<V> {
    type Item = V::Item;

    fn len(&self) -> usize {
        match self.range {
            Some((_, count)) => count,
            None => self.delegate.len(),
        }
    }

    fn at(&self, index: usize) -> Result<V::Item> {
        match self.range {
            Some((start, count)) => {
                check_index(index, count)?;
                self.delegate.at(start + index)
            }
            None => self.delegate.at(index),
        }
    }

    #[inline]
    fn version(&self) -> u64 {
        self.delegate.version()
    }

    #[inline]
    fn is_stack(&self) -> bool {
        self.delegate.is_stack()
    }

    fn iter_range(&self, start: usize, count: usize, reverse: bool) -> Result<Cursor<'_, V::Item>> {
        match self.range {
            Some((offset, len)) => {
                check_range(start, count, len)?;
                self.delegate.iter_range(offset + start, count, reverse)
            }
            None => self.delegate.iter_range(start, count, reverse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Behavior, Sequence};

    #[test]
    fn live_window_follows_delegate() {
        let shared = Sequence::from_vec(vec![1, 2], Behavior::Queue).into_shared();
        let window = shared.clone().read_only_view();
        assert!(window.is_live());
        assert_eq!(window.range(), None);
        assert_eq!(window.len(), 2);

        shared.borrow_mut().add(3);
        assert_eq!(window.len(), 3);
        assert_eq!(window.to_vec(), Ok(vec![1, 2, 3]));
        assert_eq!(window.version(), shared.borrow().version());
    }

    #[test]
    fn ranged_window_is_validated_once() {
        let shared = Sequence::from_vec(vec![1, 2, 3, 4], Behavior::Queue).into_shared();
        assert_eq!(FixedWindow::ranged(shared.clone(), 3, 2).unwrap_err(),
                   SequenceError::RangeOutOfBounds { start: 3, count: 2, len: 4 });

        let window = FixedWindow::ranged(shared.clone(), 1, 3).unwrap();
        assert_eq!(window.to_vec(), Ok(vec![2, 3, 4]));
        assert_eq!(window.at(3), Err(SequenceError::IndexOutOfRange { index: 3, len: 3 }));

        shared.borrow_mut().take().unwrap();
        assert_eq!(window.len(), 3);
        assert_eq!(window.at(0), Ok(3));
        assert_eq!(window.at(2), Err(SequenceError::IndexOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn subrange_composes_offsets() {
        let sequence: Sequence<_> = (0..10).collect();
        let outer = FixedWindow::ranged(&sequence, 2, 6).unwrap();
        let inner = outer.subrange(1, 4).unwrap();
        assert_eq!(inner.range(), Some((3, 4)));
        let innermost = inner.subrange(2, 2).unwrap();
        assert_eq!(innermost.range(), Some((5, 2)));
        assert_eq!(innermost.to_vec(), Ok(vec![5, 6]));
        assert!(std::ptr::eq(*innermost.delegate(), &sequence));
        assert!(inner.subrange(3, 2).is_err());
    }

    #[test]
    fn window_of_a_window_reads_the_delegate() {
        let sequence: Sequence<_> = (0..10).collect();
        let outer: FixedWindow<&Sequence<i32>> = (&sequence).read_only_window(2, 6).unwrap();
        let inner: FixedWindow<&Sequence<i32>> = outer.clone().read_only_window(1, 4).unwrap();
        assert_eq!(inner.range(), Some((3, 4)));
        assert_eq!(inner.to_vec(), Ok(vec![3, 4, 5, 6]));
        assert!(std::ptr::eq(*inner.delegate(), &sequence));
        assert_eq!(outer.read_only_window(4, 3).unwrap_err(),
                   SequenceError::RangeOutOfBounds { start: 4, count: 3, len: 6 });

        let pinned = (&sequence).read_only_view().read_only_window(7, 3).unwrap();
        assert_eq!(pinned.range(), Some((7, 3)));
        assert_eq!(pinned.to_vec(), Ok(vec![7, 8, 9]));
    }

    #[test]
    fn live_window_has_no_subrange() {
        let sequence: Sequence<_> = (0..3).collect();
        let window = (&sequence).read_only_view();
        assert_eq!(window.subrange(0, 1).unwrap_err(), SequenceError::LiveWindow);
    }

    #[test]
    fn refuses_poke_and_reads_in_reverse() {
        let sequence = Sequence::from_vec(vec![1, 2, 3], Behavior::Stack);
        let mut window = FixedWindow::ranged(&sequence, 0, 2).unwrap();
        assert_eq!(window.poke(7), Err(SequenceError::ReadOnly));
        assert!(window.is_stack());
        assert_eq!(window.iter_rev().collect::<Result<Vec<_>>>(), Ok(vec![2, 3]));
        assert_eq!(window.snapshot().unwrap().into_vec(), vec![3, 2]);
        assert_eq!(window.into_inner().len(), 3);
    }
}
