use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::vec;

use super::{Cursor, SequenceView};
use crate::error::{check_range, Result, SequenceError};

/// A member of a [`ChainedView`].
pub type Member<T> = Rc<dyn SequenceView<Item = T>>;

/// Several views read back to back as one sequence.
///
/// Members are held in slots. An empty slot (`None`) is a placeholder of
/// length zero: it is skipped when reading but keeps its position, so member
/// indices stay stable. Nothing is cached; [`len`](SequenceView::len) is
/// summed from the members on every call and indexing walks the members
/// from the first.
///
/// # Examples
///
/// ```
/// use ringseq::{ChainedView, Sequence, SequenceView};
///
/// let head = Sequence::from_iter(1..=2).into_shared();
/// let mut chain = head.clone().into_chain();
/// chain.push_empty();
/// chain.push(Sequence::from_iter(10..=11));
///
/// assert_eq!(chain.to_vec(), Ok(vec![1, 2, 10, 11]));
/// head.borrow_mut().add(3);
/// assert_eq!(chain.len(), 5);
/// assert_eq!(chain.at(2), Ok(3));
/// ```
pub struct ChainedView<T> {
    members: Vec<Option<Member<T>>>,
}

impl<T> ChainedView<T> {
    /// An empty chain.
    pub fn new() -> Self {
        ChainedView { members: Vec::new() }
    }

    pub fn from_members<I>(members: I) -> Self
        where I: IntoIterator<Item = Option<Member<T>>>
    {
        ChainedView { members: members.into_iter().collect() }
    }

    /// Appends `view` as the last member.
    pub fn push<V>(&mut self, view: V)
        where V: SequenceView<Item = T> + 'static
    {
        self.members.push(Some(Rc::new(view)));
    }

    /// Appends an empty slot.
    pub fn push_empty(&mut self) {
        self.members.push(None);
    }

    /// Inserts a slot at `index`, shifting later members back.
    pub fn insert(&mut self, index: usize, member: Option<Member<T>>) -> Result<()> {
        if index > self.members.len() {
            return Err(SequenceError::IndexOutOfRange { index, len: self.members.len() });
        }
        self.members.insert(index, member);
        Ok(())
    }

    /// Inserts `view` as a member at `index`, shifting later members back.
    pub fn insert_view<V>(&mut self, index: usize, view: V) -> Result<()>
        where V: SequenceView<Item = T> + 'static
    {
        self.insert(index, Some(Rc::new(view)))
    }

    /// Replaces the slot at `index`, returning what it held.
    pub fn set(&mut self, index: usize, member: Option<Member<T>>) -> Result<Option<Member<T>>> {
        let len = self.members.len();
        match self.members.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, member)),
            None => Err(SequenceError::IndexOutOfRange { index, len }),
        }
    }

    /// Removes the slot at `index`, returning what it held.
    pub fn remove(&mut self, index: usize) -> Result<Option<Member<T>>> {
        if index >= self.members.len() {
            return Err(SequenceError::IndexOutOfRange { index, len: self.members.len() });
        }
        Ok(self.members.remove(index))
    }

    /// Number of slots, empty ones included.
    #[inline]
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// The member in slot `index`, if the slot exists and is filled.
    pub fn member(&self, index: usize) -> Option<&Member<T>> {
        self.members.get(index)?.as_ref()
    }

    /// Removes every slot.
    pub fn clear(&mut self) {
        self.members.clear();
    }

    fn present(&self) -> impl Iterator<Item = &Member<T>> {
        self.members.iter().flatten()
    }

    /// Finds the shortest run of consecutive slots that covers `count`
    /// elements from `*start`, and returns it as a new chain sharing the same
    /// members. On success `*start` is rewritten to the window's position
    /// inside the returned chain.
    ///
    /// Returns `None` if the window does not fit. A window of zero elements
    /// yields an empty chain and a start of `0`.
    ///
    /// ```
    /// use ringseq::{ChainedView, Sequence, SequenceView};
    ///
    /// let mut chain = ChainedView::new();
    /// chain.push(Sequence::from_iter(0..3));
    /// chain.push(Sequence::from_iter(3..6));
    /// chain.push(Sequence::from_iter(6..9));
    ///
    /// let mut start = 4;
    /// let sub = chain.try_extract_range(&mut start, 3).unwrap();
    /// assert_eq!((sub.member_count(), start), (2, 1));
    /// assert_eq!(sub.to_vec_range(start, 3), Ok(vec![4, 5, 6]));
    /// ```
    pub fn try_extract_range(&self, start: &mut usize, count: usize) -> Option<ChainedView<T>> {
        let end = start.checked_add(count)?;
        if end > self.len() {
            return None;
        }
        if count == 0 {
            *start = 0;
            return Some(ChainedView::new());
        }
        let mut first_offset = None;
        let mut members = Vec::new();
        let mut offset = 0;
        for slot in &self.members {
            let member_len = slot.as_ref().map_or(0, |member| member.len());
            if first_offset.is_none() {
                if member_len > 0 && offset + member_len > *start {
                    first_offset = Some(offset);
                    members.push(slot.clone());
                }
            } else if offset < end {
                members.push(slot.clone());
            } else {
                break;
            }
            offset += member_len;
        }
        *start -= first_offset?;
        Some(ChainedView { members })
    }
}

impl<T> SequenceView for ChainedView<T> {
    type Item = T;

    fn len(&self) -> usize {
        self.present().map(|member| member.len()).sum()
    }

    fn at(&self, index: usize) -> Result<T> {
        let mut local = index;
        for member in self.present() {
            let len = member.len();
            if local < len {
                return member.at(local);
            }
            local -= len;
        }
        Err(SequenceError::IndexOutOfRange { index, len: self.len() })
    }

    /// Folds the slot layout, the identity of every member and every
    /// member's own version.
    fn version(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.members.len().hash(&mut hasher);
        for slot in &self.members {
            match slot {
                Some(member) => {
                    (Rc::as_ptr(member) as *const () as usize).hash(&mut hasher);
                    member.version().hash(&mut hasher);
                }
                None => 0usize.hash(&mut hasher),
            }
        }
        hasher.finish()
    }

    /// The ordering of the first filled slot; a chain with none is a queue.
    fn is_stack(&self) -> bool {
        self.present().next().map_or(false, |member| member.is_stack())
    }

    fn iter_range(&self, start: usize, count: usize, reverse: bool) -> Result<Cursor<'_, T>> {
        check_range(start, count, self.len())?;
        let end = start + count;
        let mut segments: Vec<Segment<'_, T>> = Vec::new();
        let mut offset = 0;
        for member in self.present() {
            let len = member.len();
            let (from, to) = (start.max(offset), end.min(offset + len));
            if from < to {
                segments.push((&**member, from - offset, to - from));
            }
            offset += len;
        }
        if reverse {
            segments.reverse();
        }
        Ok(Box::new(ChainIter {
            chain: self,
            version: self.version(),
            segments: segments.into_iter(),
            current: None,
            reverse,
        }))
    }
}

type Segment<'a, T> = (&'a dyn SequenceView<Item = T>, usize, usize);

/// Walks the member cursors one after another, checking the chain's own
/// version before every step.
struct ChainIter<'a, T> {
    chain: &'a ChainedView<T>,
    version: u64,
    segments: vec::IntoIter<Segment<'a, T>>,
    current: Option<Cursor<'a, T>>,
    reverse: bool,
}

impl<'a, T> Iterator for ChainIter<'a, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Result<T>> {
        if self.chain.version() != self.version {
            return Some(Err(SequenceError::Modified));
        }
        loop {
            if let Some(cursor) = self.current.as_mut() {
                if let Some(element) = cursor.next() {
                    return Some(element);
                }
                self.current = None;
            }
            let (member, start, count) = self.segments.next()?;
            match member.iter_range(start, count, self.reverse) {
                Ok(cursor) => self.current = Some(cursor),
                Err(err) => return Some(Err(err)),
            }
        }
    }
}

impl<T> Clone for ChainedView<T> {
    fn clone(&self) -> Self {
        ChainedView { members: self.members.clone() }
    }
}

impl<T> Default for ChainedView<T> {
    fn default() -> Self {
        ChainedView::new()
    }
}

impl<T> fmt::Debug for ChainedView<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ChainedView")
            .field("members", &self.members.len())
            .field("len", &self.len())
            .finish()
    }
}
