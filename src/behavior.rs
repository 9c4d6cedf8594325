//! Behavior semantics for `Sequence`.

/// Selects which end of a `Sequence` is its logical front.
///
/// Both behaviors share the same storage; only the end that `add` writes to
/// and the direction of logical indexing differ. Index `0` is always the
/// element `take` would remove next.
///
/// ### Queue (FIFO):
///
/// `add` appends to the **back**; `take` removes from the **front**. The
/// front is the oldest element.
///
/// ```text
/// add 1, 2, 3  =>  [1, 2, 3]  take -> 1
/// ```
///
/// ### Stack (LIFO):
///
/// `add` pushes onto the **front**; `take` pops from the **front**. The
/// front is the newest element.
///
/// ```text
/// add 1, 2, 3  =>  [3, 2, 1]  take -> 3
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Behavior {
    /// First in, first out.
    #[default]
    Queue,
    /// Last in, first out.
    Stack,
}

impl Behavior {
    /// Returns `true` for `Behavior::Stack`.
    #[inline]
    pub fn is_stack(self) -> bool {
        self == Behavior::Stack
    }
}
