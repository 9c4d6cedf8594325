use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use tracing::trace;

use crate::behavior::Behavior;
use crate::config::{self, SequenceConfig, DEFAULT_CAPACITY, DEFAULT_GROW_FACTOR};
use crate::error::{check_index, check_range, Result, SequenceError};
use crate::utils::*;
use crate::RangeArgument;

mod iterator_impls;
mod trait_impls;

pub use self::iterator_impls::{IntoIter, Iter, IterMut};

/// A growable ring buffer that is readable as either a stack or a queue.
///
/// Elements live in a circular slot array. Adding to either end is `O(1)`
/// amortized; when the array is full it is replaced by a larger one
/// (`capacity * grow_factor`, rounded up) with the elements copied unwrapped.
///
/// Index `0` is the logical *front*: the element [`take`] removes next. In
/// queue mode that is the oldest element, in stack mode the newest. See
/// [`Behavior`].
///
/// Every structural mutation increments [`version`]; enumerators created
/// through [`SequenceView`](crate::SequenceView) capture it and fail with
/// [`SequenceError::Modified`] once it changes.
///
/// [`take`]: Sequence::take
/// [`version`]: Sequence::version
///
/// # Examples
///
/// ```
/// use ringseq::{Behavior, Sequence};
///
/// let mut queue = Sequence::new();
/// queue.add(1);
/// queue.add(2);
/// assert_eq!(queue.take(), Ok(1));
///
/// let mut stack = Sequence::with_behavior(Behavior::Stack);
/// stack.add(1);
/// stack.add(2);
/// assert_eq!(stack.take(), Ok(2));
/// ```
pub struct Sequence<T> {
    buf: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    len: usize,
    version: u64,
    behavior: Behavior,
    grow_factor: f64,
}

impl<T> Sequence<T> {
    #[inline]
    fn cap(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    fn wrap_add(&self, index: usize, addend: usize) -> usize {
        wrap_add(index, addend, self.cap())
    }

    #[inline]
    fn wrap_sub(&self, index: usize, subtrahend: usize) -> usize {
        wrap_sub(index, subtrahend, self.cap())
    }

    #[inline]
    fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    /// Physical slot of logical `index`. Caller guarantees `index < len`.
    #[inline]
    fn physical(&self, index: usize) -> usize {
        debug_assert!(index < self.len);
        match self.behavior {
            Behavior::Queue => self.wrap_add(self.head, index),
            Behavior::Stack => self.wrap_sub(self.tail, index + 1),
        }
    }

    #[inline]
    fn is_full(&self) -> bool {
        self.len == self.cap()
    }

    #[inline]
    fn grow_if_full(&mut self) {
        if self.is_full() {
            let capacity = grown_capacity(self.cap(), self.grow_factor);
            self.reallocate(capacity);
        }
    }

    /// Replaces the slot array with one of `capacity` slots, copying the
    /// occupied slots unwrapped to its start.
    fn reallocate(&mut self, capacity: usize) {
        debug_assert!(capacity >= self.len);
        let old_capacity = self.cap();
        let mut slots = Vec::with_capacity(capacity);
        for offset in 0..self.len {
            let index = self.wrap_add(self.head, offset);
            slots.push(self.buf[index].take());
        }
        slots.resize_with(capacity, || None);
        self.buf = slots.into_boxed_slice();
        self.head = 0;
        self.tail = if capacity == 0 { 0 } else { self.len % capacity };
        trace!(from = old_capacity, to = capacity, len = self.len, "resized sequence storage");
    }

    // Raw physical end operations. These never touch the version.

    fn push_head(&mut self, element: T) {
        self.grow_if_full();
        self.head = self.wrap_sub(self.head, 1);
        self.buf[self.head] = Some(element);
        self.len += 1;
    }

    fn push_tail(&mut self, element: T) {
        self.grow_if_full();
        self.buf[self.tail] = Some(element);
        self.tail = self.wrap_add(self.tail, 1);
        self.len += 1;
    }

    fn pop_head(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let element = self.buf[self.head].take();
        self.head = self.wrap_add(self.head, 1);
        self.len -= 1;
        element
    }

    fn pop_tail(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.tail = self.wrap_sub(self.tail, 1);
        self.len -= 1;
        self.buf[self.tail].take()
    }

    fn raw_push_front(&mut self, element: T) {
        match self.behavior {
            Behavior::Queue => self.push_head(element),
            Behavior::Stack => self.push_tail(element),
        }
    }

    fn raw_push_back(&mut self, element: T) {
        match self.behavior {
            Behavior::Queue => self.push_tail(element),
            Behavior::Stack => self.push_head(element),
        }
    }

    fn raw_pop_front(&mut self) -> Option<T> {
        match self.behavior {
            Behavior::Queue => self.pop_head(),
            Behavior::Stack => self.pop_tail(),
        }
    }

    fn raw_pop_back(&mut self) -> Option<T> {
        match self.behavior {
            Behavior::Queue => self.pop_tail(),
            Behavior::Stack => self.pop_head(),
        }
    }

    /// Opens an empty slot before the front; old logical indices shift by one.
    fn open_front_slot(&mut self) {
        self.grow_if_full();
        match self.behavior {
            Behavior::Queue => self.head = self.wrap_sub(self.head, 1),
            Behavior::Stack => self.tail = self.wrap_add(self.tail, 1),
        }
        self.len += 1;
    }

    /// Opens an empty slot after the back.
    fn open_back_slot(&mut self) {
        self.grow_if_full();
        match self.behavior {
            Behavior::Queue => self.tail = self.wrap_add(self.tail, 1),
            Behavior::Stack => self.head = self.wrap_sub(self.head, 1),
        }
        self.len += 1;
    }

    /// Releases the (already emptied) front slot.
    fn close_front_slot(&mut self) {
        match self.behavior {
            Behavior::Queue => self.head = self.wrap_add(self.head, 1),
            Behavior::Stack => self.tail = self.wrap_sub(self.tail, 1),
        }
        self.len -= 1;
    }

    /// Releases the (already emptied) back slot.
    fn close_back_slot(&mut self) {
        match self.behavior {
            Behavior::Queue => self.tail = self.wrap_sub(self.tail, 1),
            Behavior::Stack => self.head = self.wrap_add(self.head, 1),
        }
        self.len -= 1;
    }

    /// Physical index ranges of the occupied slots, split where they wrap.
    fn physical_ranges(&self) -> (Range<usize>, Range<usize>) {
        if self.head + self.len <= self.cap() {
            (self.head..self.head + self.len, 0..0)
        } else {
            (self.head..self.cap(), 0..self.tail)
        }
    }

    fn physical_slices(&self) -> (&[Option<T>], &[Option<T>]) {
        let (first, second) = self.physical_ranges();
        (&self.buf[first], &self.buf[second])
    }

    fn physical_slices_mut(&mut self) -> (&mut [Option<T>], &mut [Option<T>]) {
        let (first, second) = self.physical_ranges();
        let (front, back) = self.buf.split_at_mut(first.start);
        (&mut back[..first.len()], &mut front[second])
    }
}

impl<T> Sequence<T> {
    /// Creates an empty queue-mode `Sequence`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringseq::Sequence;
    ///
    /// let sequence: Sequence<u32> = Sequence::new();
    /// assert!(sequence.is_empty());
    /// assert!(!sequence.is_stack());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Sequence::with_capacity(DEFAULT_CAPACITY, Behavior::Queue)
    }

    /// Creates an empty `Sequence` with the given behavior.
    #[inline]
    pub fn with_behavior(behavior: Behavior) -> Self {
        Sequence::with_capacity(DEFAULT_CAPACITY, behavior)
    }

    /// Creates an empty `Sequence` with room for `capacity` elements before
    /// it has to grow.
    pub fn with_capacity(capacity: usize, behavior: Behavior) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Sequence {
            buf: slots.into_boxed_slice(),
            head: 0,
            tail: 0,
            len: 0,
            version: 0,
            behavior,
            grow_factor: DEFAULT_GROW_FACTOR,
        }
    }

    /// Creates an empty `Sequence` from validated settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringseq::{Sequence, SequenceConfig};
    ///
    /// let config = SequenceConfig { grow_factor: 1.0, ..SequenceConfig::default() };
    /// assert!(Sequence::<u8>::with_config(config).is_err());
    /// ```
    pub fn with_config(config: SequenceConfig) -> Result<Self> {
        config.validate()?;
        let mut sequence = Sequence::with_capacity(config.capacity, config.behavior);
        sequence.grow_factor = config.grow_factor;
        Ok(sequence)
    }

    /// Adopts the elements of `elements` without cloning them. The result
    /// holds the same elements as adding each one in order would.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringseq::{Behavior, Sequence};
    ///
    /// let stack = Sequence::from_vec(vec![1, 2, 3], Behavior::Stack);
    /// assert_eq!(stack.iter().collect::<Vec<_>>(), vec![&3, &2, &1]);
    /// ```
    pub fn from_vec(elements: Vec<T>, behavior: Behavior) -> Self {
        let len = elements.len();
        let buf: Box<[Option<T>]> = elements.into_iter().map(Some).collect();
        Sequence {
            buf,
            head: 0,
            tail: 0,
            len,
            version: 0,
            behavior,
            grow_factor: DEFAULT_GROW_FACTOR,
        }
    }

    /// Wraps the sequence in a shared handle that views can hold while the
    /// owner keeps mutating it.
    pub fn into_shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    /// Returns the number of elements in the sequence.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the sequence holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the sequence can hold before growing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap()
    }

    /// Returns the stack or queue behavior.
    #[inline]
    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    /// Returns `true` in stack mode.
    #[inline]
    pub fn is_stack(&self) -> bool {
        self.behavior.is_stack()
    }

    /// Returns the factor applied to the capacity on growth.
    #[inline]
    pub fn grow_factor(&self) -> f64 {
        self.grow_factor
    }

    /// Changes the growth factor. It must be greater than one.
    pub fn set_grow_factor(&mut self, grow_factor: f64) -> Result<()> {
        config::validate_grow_factor(grow_factor)?;
        self.grow_factor = grow_factor;
        Ok(())
    }

    /// Returns the modification stamp.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Retrieves an element by logical index.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringseq::Sequence;
    ///
    /// let sequence: Sequence<_> = vec![3, 4, 5].into_iter().collect();
    /// assert_eq!(sequence.get(1), Some(&4));
    /// assert_eq!(sequence.get(3), None);
    /// ```
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            self.buf[self.physical(index)].as_ref()
        } else {
            None
        }
    }

    /// Retrieves an element by logical index, mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            let index = self.physical(index);
            self.buf[index].as_mut()
        } else {
            None
        }
    }

    /// Provides a reference to the front element: the one `take` returns.
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Provides a reference to the back element: the last one `take` would
    /// return.
    pub fn back(&self) -> Option<&T> {
        self.len.checked_sub(1).and_then(|last| self.get(last))
    }

    /// Returns `true` if the sequence contains an element equal to `x`.
    pub fn contains(&self, x: &T) -> bool
        where T: PartialEq
    {
        self.iter().any(|element| element == x)
    }

    /// Front-to-back iterator over borrowed elements.
    pub fn iter(&self) -> Iter<'_, T> {
        let (a, b) = self.physical_slices();
        Iter::new(a, b, self.is_stack(), self.len)
    }

    /// Front-to-back iterator over mutable elements.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        let reverse = self.is_stack();
        let len = self.len;
        let (a, b) = self.physical_slices_mut();
        IterMut::new(a, b, reverse, len)
    }

    /// Adds an element in front of the current front.
    ///
    /// ```text
    /// 1 -(+)-> [_, _, _] => [1, _, _]
    /// 2 -(+)-> [1, _, _] => [2, 1, _]
    /// ```
    pub fn push_front(&mut self, element: T) {
        self.raw_push_front(element);
        self.touch();
    }

    /// Adds an element behind the current back.
    ///
    /// ```text
    /// [_, _, _] <-(+)- 1 => [1, _, _]
    /// [1, _, _] <-(+)- 2 => [1, 2, _]
    /// ```
    pub fn push_back(&mut self, element: T) {
        self.raw_push_back(element);
        self.touch();
    }

    /// Removes the front element, or returns `None` if the sequence is empty.
    pub fn pop_front(&mut self) -> Option<T> {
        let element = self.raw_pop_front()?;
        self.touch();
        Some(element)
    }

    /// Removes the back element, or returns `None` if the sequence is empty.
    pub fn pop_back(&mut self) -> Option<T> {
        let element = self.raw_pop_back()?;
        self.touch();
        Some(element)
    }

    /// Removes `count` elements from the front, returned front first.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringseq::Sequence;
    ///
    /// let mut sequence: Sequence<_> = (1..=5).collect();
    /// assert_eq!(sequence.pop_front_range(2), Ok(vec![1, 2]));
    /// assert!(sequence.pop_front_range(4).is_err());
    /// ```
    pub fn pop_front_range(&mut self, count: usize) -> Result<Vec<T>> {
        check_range(0, count, self.len)?;
        Ok(self.pop_front_up_to(count))
    }

    /// Removes at most `count` elements from the front, front first.
    pub(crate) fn pop_front_up_to(&mut self, count: usize) -> Vec<T> {
        let count = count.min(self.len);
        let mut removed = Vec::with_capacity(count);
        removed.extend((0..count).filter_map(|_| self.raw_pop_front()));
        if count > 0 {
            self.touch();
        }
        removed
    }

    /// Removes `count` elements from the back, returned in logical order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringseq::Sequence;
    ///
    /// let mut sequence: Sequence<_> = (1..=5).collect();
    /// assert_eq!(sequence.pop_back_range(2), Ok(vec![4, 5]));
    /// ```
    pub fn pop_back_range(&mut self, count: usize) -> Result<Vec<T>> {
        check_range(0, count, self.len)?;
        Ok(self.pop_back_up_to(count))
    }

    /// Removes at most `count` elements from the back, in logical order.
    pub(crate) fn pop_back_up_to(&mut self, count: usize) -> Vec<T> {
        let count = count.min(self.len);
        let mut removed = Vec::with_capacity(count);
        removed.extend((0..count).filter_map(|_| self.raw_pop_back()));
        removed.reverse();
        if count > 0 {
            self.touch();
        }
        removed
    }

    /// Adds an element at the active end: the back of a queue, the top
    /// (front) of a stack.
    pub fn add(&mut self, element: T) {
        match self.behavior {
            Behavior::Queue => self.push_back(element),
            Behavior::Stack => self.push_front(element),
        }
    }

    /// Adds every element of `elements` in order, as `add` would.
    pub fn add_range<I: IntoIterator<Item = T>>(&mut self, elements: I) {
        let before = self.len;
        for element in elements {
            match self.behavior {
                Behavior::Queue => self.raw_push_back(element),
                Behavior::Stack => self.raw_push_front(element),
            }
        }
        if self.len != before {
            self.touch();
        }
    }

    /// Removes the front element: dequeues from a queue, pops from a stack.
    pub fn take(&mut self) -> Result<T> {
        self.pop_front().ok_or(SequenceError::Empty)
    }

    /// Removes `count` front elements, in the order `take` would return them.
    pub fn take_range(&mut self, count: usize) -> Result<Vec<T>> {
        self.pop_front_range(count)
    }

    /// Alias of [`add`](Sequence::add), for stack-mode call sites.
    #[inline]
    pub fn push(&mut self, element: T) {
        self.add(element)
    }

    /// Alias of [`take`](Sequence::take), for stack-mode call sites.
    #[inline]
    pub fn pop(&mut self) -> Result<T> {
        self.take()
    }

    /// Alias of [`add`](Sequence::add), for queue-mode call sites.
    #[inline]
    pub fn enqueue(&mut self, element: T) {
        self.add(element)
    }

    /// Alias of [`take`](Sequence::take), for queue-mode call sites.
    #[inline]
    pub fn dequeue(&mut self) -> Result<T> {
        self.take()
    }

    /// Inserts an element at logical `index`. Whichever end is closer to the
    /// insertion point is moved to make room.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringseq::Sequence;
    ///
    /// let mut sequence: Sequence<_> = vec![10, 12].into_iter().collect();
    /// sequence.insert(1, 11).unwrap();
    /// assert_eq!(sequence.iter().copied().collect::<Vec<_>>(), vec![10, 11, 12]);
    /// ```
    pub fn insert(&mut self, index: usize, element: T) -> Result<()> {
        if index > self.len {
            return Err(SequenceError::IndexOutOfRange { index, len: self.len });
        }
        if index < self.len / 2 {
            // [a b c d] -> [_ a b c d] -> [a _ b c d]
            self.open_front_slot();
            for i in 0..index {
                let (dst, src) = (self.physical(i), self.physical(i + 1));
                self.buf[dst] = self.buf[src].take();
            }
        } else {
            // [a b c d] -> [a b c d _] -> [a b c _ d]
            self.open_back_slot();
            for i in (index + 1..self.len).rev() {
                let (dst, src) = (self.physical(i), self.physical(i - 1));
                self.buf[dst] = self.buf[src].take();
            }
        }
        let slot = self.physical(index);
        self.buf[slot] = Some(element);
        self.touch();
        Ok(())
    }

    /// Removes and returns the element at logical `index`. Whichever end is
    /// closer to the removal point is moved to close the gap.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        check_index(index, self.len)?;
        let slot = self.physical(index);
        let element = self.buf[slot].take();
        if index < self.len / 2 {
            for i in (0..index).rev() {
                let (dst, src) = (self.physical(i + 1), self.physical(i));
                self.buf[dst] = self.buf[src].take();
            }
            self.close_front_slot();
        } else {
            for i in index..self.len - 1 {
                let (dst, src) = (self.physical(i), self.physical(i + 1));
                self.buf[dst] = self.buf[src].take();
            }
            self.close_back_slot();
        }
        self.touch();
        element.ok_or(SequenceError::IndexOutOfRange { index, len: self.len })
    }

    /// Moves the element at `from` so that it ends up at `to`, shifting the
    /// elements in between by one.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        check_index(from, self.len)?;
        check_index(to, self.len)?;
        if from == to {
            return Ok(());
        }
        if from < to {
            for i in from..to {
                let (a, b) = (self.physical(i), self.physical(i + 1));
                self.buf.swap(a, b);
            }
        } else {
            for i in (to..from).rev() {
                let (a, b) = (self.physical(i), self.physical(i + 1));
                self.buf.swap(a, b);
            }
        }
        self.touch();
        Ok(())
    }

    /// Replaces the element at logical `index`, returning the old one.
    pub fn set(&mut self, index: usize, element: T) -> Result<T> {
        check_index(index, self.len)?;
        let slot = self.physical(index);
        let old = self.buf[slot].replace(element);
        self.touch();
        old.ok_or(SequenceError::IndexOutOfRange { index, len: self.len })
    }

    /// Removes the elements in `range` (logical indices) and returns them in
    /// logical order.
    ///
    /// # Examples
    ///
    /// ```
    /// use ringseq::Sequence;
    ///
    /// let mut sequence: Sequence<_> = (0..6).collect();
    /// assert_eq!(sequence.drain(2..4), Ok(vec![2, 3]));
    /// assert_eq!(sequence.iter().copied().collect::<Vec<_>>(), vec![0, 1, 4, 5]);
    ///
    /// // A full range clears all contents
    /// assert_eq!(sequence.drain(..), Ok(vec![0, 1, 4, 5]));
    /// assert!(sequence.is_empty());
    /// ```
    pub fn drain<R>(&mut self, range: R) -> Result<Vec<T>>
        where R: RangeArgument<usize>
    {
        let len = self.len;
        let start = range.start().unwrap_or(0);
        let end = range.end().unwrap_or(len);
        if start > end || end > len {
            return Err(SequenceError::RangeOutOfBounds {
                start,
                count: end.saturating_sub(start),
                len,
            });
        }
        if start == 0 {
            return self.pop_front_range(end);
        }
        if end == len {
            return self.pop_back_range(end - start);
        }
        let mut after: Vec<T> = Vec::with_capacity(len - end);
        after.extend((end..len).filter_map(|_| self.raw_pop_back()));
        let mut removed: Vec<T> = Vec::with_capacity(end - start);
        removed.extend((start..end).filter_map(|_| self.raw_pop_back()));
        removed.reverse();
        while let Some(element) = after.pop() {
            self.raw_push_back(element);
        }
        self.touch();
        Ok(removed)
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        if self.len == 0 {
            return;
        }
        for slot in self.buf.iter_mut() {
            *slot = None;
        }
        self.head = 0;
        self.tail = 0;
        self.len = 0;
        self.touch();
    }

    /// Makes room for at least `additional` more elements without growing.
    pub fn reserve(&mut self, additional: usize) {
        let required = self.len.saturating_add(additional);
        if required > self.cap() {
            let capacity = required.max(grown_capacity(self.cap(), self.grow_factor));
            self.reallocate(capacity);
        }
    }

    /// Shrinks the storage to exactly the current length.
    pub fn trim(&mut self) {
        if self.cap() != self.len {
            self.reallocate(self.len);
        }
    }

    /// Replaces the storage with one of exactly `capacity` slots.
    ///
    /// Fails if `capacity` is smaller than the current length.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<()> {
        if capacity < self.len {
            return Err(SequenceError::invalid_arg(
                "capacity",
                format!("must not be less than the len {}, got {}", self.len, capacity),
            ));
        }
        self.resize_storage(capacity);
        Ok(())
    }

    /// Resizes the storage to `capacity` slots, or to the length if that is
    /// larger.
    pub(crate) fn resize_storage(&mut self, capacity: usize) {
        let capacity = capacity.max(self.len);
        if capacity != self.cap() {
            self.reallocate(capacity);
        }
    }
}
