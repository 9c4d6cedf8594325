use std::slice;

use super::SequenceView;
use crate::error::{Result, SequenceError};

/// An immutable copy of a sequence's elements.
///
/// A snapshot owns its elements, so nothing can change underneath it and its
/// [`version`](SequenceView::version) is constant. Every other view produces
/// one through [`SequenceView::snapshot`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Snapshot<T> {
    elements: Box<[T]>,
    stack: bool,
}

impl<T> Snapshot<T> {
    /// Adopts `elements` without copying. Index `0` is the front.
    pub fn from_vec(elements: Vec<T>) -> Self {
        Snapshot::with_stack(elements, false)
    }

    /// Adopts `elements`, recording whether they came from a stack.
    pub fn with_stack(elements: Vec<T>, stack: bool) -> Self {
        Snapshot {
            elements: elements.into_boxed_slice(),
            stack,
        }
    }

    /// Copies `elements`.
    pub fn copy_from(elements: &[T]) -> Self
        where T: Clone
    {
        Snapshot::from_vec(elements.to_vec())
    }

    /// The elements, front first.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    /// Iterates the elements by reference, front first.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.elements.iter()
    }

    /// Gives the elements back.
    pub fn into_vec(self) -> Vec<T> {
        self.elements.into_vec()
    }
}

impl<T> From<Vec<T>> for Snapshot<T> {
    fn from(elements: Vec<T>) -> Self {
        Snapshot::from_vec(elements)
    }
}

impl<T> std::iter::FromIterator<T> for Snapshot<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Snapshot::from_vec(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a Snapshot<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl<T: Clone> SequenceView for Snapshot<T> {
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        self.elements.len()
    }

    fn at(&self, index: usize) -> Result<T> {
        self.elements
            .get(index)
            .cloned()
            .ok_or(SequenceError::IndexOutOfRange { index, len: self.elements.len() })
    }

    #[inline]
    fn version(&self) -> u64 {
        0
    }

    #[inline]
    fn is_stack(&self) -> bool {
        self.stack
    }

    fn to_vec(&self) -> Result<Vec<T>> {
        Ok(self.elements.to_vec())
    }

    fn snapshot(&self) -> Result<Snapshot<T>> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Behavior, Sequence};

    #[test]
    fn reads() {
        let snapshot = Snapshot::copy_from(&[1, 2, 3]);
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.peek(), Ok(1));
        assert_eq!(snapshot.at(2), Ok(3));
        assert_eq!(snapshot.at(3), Err(SequenceError::IndexOutOfRange { index: 3, len: 3 }));
        assert_eq!(snapshot.to_vec_range(1, 2), Ok(vec![2, 3]));
        assert_eq!(snapshot.iter_rev().collect::<Result<Vec<_>>>(), Ok(vec![3, 2, 1]));
        assert_eq!(snapshot.version(), 0);
        assert!(!snapshot.is_stack());
        assert_eq!(snapshot.iter().sum::<i32>(), 6);
    }

    #[test]
    fn refuses_poke() {
        let mut snapshot: Snapshot<_> = (0..3).collect();
        assert_eq!(snapshot.poke(9), Err(SequenceError::ReadOnly));
        assert_eq!(snapshot.as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn clone_of_sequence_is_unaffected_by_mutation() {
        for behavior in [Behavior::Queue, Behavior::Stack] {
            let mut sequence = Sequence::with_capacity(2, behavior);
            sequence.add_range(0..5);
            let snapshot = sequence.snapshot().unwrap();
            assert_eq!(snapshot.to_vec(), sequence.to_vec());
            assert_eq!(snapshot.is_stack(), behavior.is_stack());

            sequence.take().unwrap();
            sequence.add(9);
            assert_ne!(snapshot.to_vec(), sequence.to_vec());
            assert_eq!(snapshot.len(), 5);
            let again = snapshot.snapshot().unwrap();
            assert_eq!(again, snapshot);
            assert_eq!(again.into_vec(), snapshot.as_slice().to_vec());
        }
    }
}
