use std::iter::Chain;
use std::slice;

use super::Sequence;

/// `Sequence` iterator, front to back.
#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    slots: Chain<slice::Iter<'a, Option<T>>, slice::Iter<'a, Option<T>>>,
    reverse: bool,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(super) fn new(a: &'a [Option<T>], b: &'a [Option<T>], reverse: bool, len: usize) -> Self {
        Iter {
            slots: a.iter().chain(b.iter()),
            reverse,
            remaining: len,
        }
    }
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots.clone(),
            reverse: self.reverse,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        let slot = if self.reverse { self.slots.next_back() } else { self.slots.next() };
        let element = slot?.as_ref()?;
        self.remaining -= 1;
        Some(element)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        let slot = if self.reverse { self.slots.next() } else { self.slots.next_back() };
        let element = slot?.as_ref()?;
        self.remaining -= 1;
        Some(element)
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

/// `Sequence` mutable iterator, front to back.
#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
pub struct IterMut<'a, T: 'a> {
    slots: Chain<slice::IterMut<'a, Option<T>>, slice::IterMut<'a, Option<T>>>,
    reverse: bool,
    remaining: usize,
}

impl<'a, T> IterMut<'a, T> {
    pub(super) fn new(a: &'a mut [Option<T>],
                      b: &'a mut [Option<T>],
                      reverse: bool,
                      len: usize)
                      -> Self {
        IterMut {
            slots: a.iter_mut().chain(b.iter_mut()),
            reverse,
            remaining: len,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        let slot = if self.reverse { self.slots.next_back() } else { self.slots.next() };
        let element = slot?.as_mut()?;
        self.remaining -= 1;
        Some(element)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a mut T> {
        let slot = if self.reverse { self.slots.next() } else { self.slots.next_back() };
        let element = slot?.as_mut()?;
        self.remaining -= 1;
        Some(element)
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

/// By-value `Sequence` iterator, front to back.
#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
pub struct IntoIter<T> {
    pub(super) inner: Sequence<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.raw_pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.inner.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.inner.raw_pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

#[cfg(test)]
mod tests {
    use crate::{Behavior, Sequence};

    #[test]
    fn iter_wrapped_queue() {
        let mut tester = Sequence::with_capacity(3, Behavior::Queue);
        tester.add(1);
        tester.add(2);
        {
            let mut iter = tester.iter();
            assert_eq!(iter.size_hint(), (2, Some(2)));
            assert_eq!(iter.next(), Some(&1));
            assert_eq!(iter.next(), Some(&2));
            assert_eq!(iter.next(), None);
            assert_eq!(iter.size_hint(), (0, Some(0)));
        }
        tester.take().unwrap();
        tester.add(3);
        tester.add(4);
        {
            let mut iter = (&tester).into_iter();
            assert_eq!(iter.next(), Some(&2));

            // test clone
            let mut iter2 = iter.clone();
            assert_eq!(iter.next(), Some(&3));
            assert_eq!(iter.next_back(), Some(&4));
            assert_eq!(iter.next(), None);
            assert_eq!(iter2.next(), Some(&3));
            assert_eq!(iter2.next(), Some(&4));
            assert_eq!(iter2.next(), None);
        }
    }

    #[test]
    fn iter_wrapped_stack() {
        let mut tester = Sequence::with_capacity(3, Behavior::Stack);
        tester.push_back(1);
        tester.push(2);
        tester.push(3);
        assert_eq!(tester.iter().collect::<Vec<_>>(), vec![&3, &2, &1]);
        assert_eq!(tester.iter().rev().collect::<Vec<_>>(), vec![&1, &2, &3]);
    }

    #[test]
    fn iter_mut_updates_in_place() {
        for behavior in [Behavior::Queue, Behavior::Stack] {
            let mut tester = Sequence::with_capacity(2, behavior);
            tester.push_back(1);
            tester.push_back(2);
            tester.push_back(3);
            {
                let mut iter = tester.iter_mut();
                assert_eq!(iter.size_hint(), (3, Some(3)));
                if let Some(n) = iter.next() {
                    *n += 10;
                }
                if let Some(n) = iter.next_back() {
                    *n += 30;
                }
            }
            assert_eq!(tester.iter().copied().collect::<Vec<_>>(), vec![11, 2, 33]);
        }
    }

    #[test]
    fn into_iter_both_ends() {
        let tester: Sequence<_> = (0..5).collect();
        let mut iter = tester.into_iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some(0));
        assert_eq!(iter.next_back(), Some(4));
        assert_eq!(iter.collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}
