use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter;
use std::ops::{Index, IndexMut};

use super::{IntoIter, Iter, IterMut, Sequence};
use crate::error::{Result, SequenceError};
use crate::view::SequenceView;

impl<T: Clone> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        Sequence {
            buf: self.buf.clone(),
            head: self.head,
            tail: self.tail,
            len: self.len,
            version: self.version,
            behavior: self.behavior,
            grow_factor: self.grow_factor,
        }
    }
}

impl<T> Default for Sequence<T> {
    #[inline]
    fn default() -> Self {
        Sequence::new()
    }
}

/// Two sequences are equal when they hold equal elements in the same logical
/// order, regardless of behavior, capacity or wraparound.
impl<T: PartialEq> PartialEq for Sequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Sequence<T> {}

#[cfg(test)]
impl<'a, T: PartialEq> PartialEq<&'a [T]> for Sequence<T> {
    fn eq(&self, other: &&'a [T]) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(l, r)| l == r)
    }
}

#[cfg(test)]
impl<T: PartialEq> PartialEq<Vec<T>> for Sequence<T> {
    fn eq(&self, other: &Vec<T>) -> bool {
        *self == &other[..]
    }
}

impl<T: Hash> Hash for Sequence<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for element in self.iter() {
            element.hash(state);
        }
    }
}

impl<T> Index<usize> for Sequence<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        let len = self.len();
        match self.get(index) {
            Some(element) => element,
            None => panic!("index out of bounds: the len is {} but the index is {}", len, index),
        }
    }
}

impl<T> IndexMut<usize> for Sequence<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.get_mut(index) {
            Some(element) => element,
            None => panic!("index out of bounds: the len is {} but the index is {}", len, index),
        }
    }
}

impl<T> iter::FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut sequence = Sequence::new();
        sequence.extend(iter);
        sequence
    }
}

impl<T> IntoIterator for Sequence<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { inner: self }
    }
}

impl<'a, T> IntoIterator for &'a Sequence<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Sequence<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// Extend the `Sequence` with an iterator, adding each element at the active
/// end as [`add`](Sequence::add) would.
impl<T> Extend<T> for Sequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.add_range(iter);
    }
}

impl<T: fmt::Debug> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self).finish()
    }
}

impl<T: Clone> SequenceView for Sequence<T> {
    type Item = T;

    #[inline]
    fn len(&self) -> usize {
        Sequence::len(self)
    }

    fn at(&self, index: usize) -> Result<T> {
        self.get(index)
            .cloned()
            .ok_or(SequenceError::IndexOutOfRange { index, len: Sequence::len(self) })
    }

    #[inline]
    fn version(&self) -> u64 {
        Sequence::version(self)
    }

    #[inline]
    fn is_stack(&self) -> bool {
        Sequence::is_stack(self)
    }

    /// Replaces the front element.
    fn poke(&mut self, element: T) -> Result<()> {
        if self.is_empty() {
            return Err(SequenceError::Empty);
        }
        self.set(0, element).map(drop)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use crate::{Behavior, Sequence, SequenceError, SequenceView};

    fn hash_of<T: std::hash::Hash>(value: &T) -> u64 {
        use std::hash::Hasher;
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn eq_ignores_layout() {
        let mut wrapped = Sequence::with_capacity(4, Behavior::Queue);
        wrapped.add_range(0..4);
        wrapped.take_range(2).unwrap();
        wrapped.add_range(4..6);

        let straight: Sequence<_> = (2..6).collect();
        assert_eq!(wrapped, straight);
        assert_eq!(wrapped, vec![2, 3, 4, 5]);
        assert_eq!(hash_of(&wrapped), hash_of(&straight));

        let stack = Sequence::from_vec(vec![5, 4, 3, 2], Behavior::Stack);
        assert_eq!(stack, straight);
    }

    #[test]
    fn index() {
        let mut tester = Sequence::with_capacity(4, Behavior::Queue);
        tester.add(1);
        tester.add(2);
        tester.add(3);
        assert_eq!(tester[0], 1);
        // take 1 <- [2, 3]
        assert_eq!(tester.take(), Ok(1));
        assert_eq!(tester[0], 2);
        // push_front 0 -> [0, 2, 3]
        tester.push_front(0);
        assert_eq!(tester[0], 0);
        tester[2] = 30;
        // [0, 2] -> 30 pop_back
        assert_eq!(tester.pop_back(), Some(30));
        assert_eq!(tester[1], 2);
    }

    #[test]
    #[should_panic(expected = "index out of bounds: the len is 2 but the index is 2")]
    fn index_overflow() {
        let mut tester = Sequence::new();
        tester.add(1);
        tester.add(2);
        let _ = tester[2];
    }

    #[test]
    fn debug_and_clone() {
        let mut tester = Sequence::with_behavior(Behavior::Stack);
        tester.extend(vec![1, 2, 3]);
        assert_eq!(format!("{:?}", tester), "[3, 2, 1]");
        let copy = tester.clone();
        tester.take().unwrap();
        assert_eq!(format!("{:?}", copy), "[3, 2, 1]");
        assert_eq!(format!("{:?}", tester), "[2, 1]");
    }

    #[test]
    fn view_contract() {
        let mut tester = Sequence::with_behavior(Behavior::Stack);
        assert_eq!(tester.peek(), Err(SequenceError::Empty));
        assert_eq!(tester.poke(1), Err(SequenceError::Empty));
        tester.extend(vec![1, 2, 3]);
        assert_eq!(tester.at(0), Ok(3));
        assert_eq!(tester.peek(), Ok(3));
        assert_eq!(tester.peek_at(2), Ok(1));
        assert_eq!(tester.at(3), Err(SequenceError::IndexOutOfRange { index: 3, len: 3 }));
        tester.poke(30).unwrap();
        assert_eq!(tester.to_vec(), Ok(vec![30, 2, 1]));
        assert!(SequenceView::is_stack(&tester));
    }
}
