use std::fmt;

use super::{Cursor, SequenceView};
use crate::error::Result;

/// A view that maps every element of its delegate through a function.
///
/// Nothing is cached: `f` runs on every access, so it should be cheap and
/// free of side effects. Length, version and ordering are the delegate's.
///
/// # Examples
///
/// ```
/// use ringseq::{Sequence, SequenceView};
///
/// let sequence: Sequence<u32> = (1..=3).collect();
/// let labels = (&sequence).map_view(|n: u32| format!("#{}", n));
/// assert_eq!(labels.to_vec(), Ok(vec!["#1".to_string(), "#2".to_string(), "#3".to_string()]));
/// ```
pub struct TransformView<V, F> {
    delegate: V,
    f: F,
}

impl<V, F> TransformView<V, F> {
    /// Maps the elements of `delegate` through `f`.
    pub fn new(delegate: V, f: F) -> Self {
        TransformView { delegate, f }
    }

    /// The view being mapped.
    pub fn delegate(&self) -> &V {
        &self.delegate
    }

    /// Unwraps the delegate, dropping the function.
    pub fn into_inner(self) -> V {
        self.delegate
    }
}

impl<V, F, U> SequenceView for TransformView<V, F>
    where V: SequenceView,
          F: Fn(V::Item) -> U
{
    type Item = U;

    #[inline]
    fn len(&self) -> usize {
        self.delegate.len()
    }

    fn at(&self, index: usize) -> Result<U> {
        self.delegate.at(index).map(&self.f)
    }

    #[inline]
    fn version(&self) -> u64 {
        self.delegate.version()
    }

    #[inline]
    fn is_stack(&self) -> bool {
        self.delegate.is_stack()
    }

    fn iter_range(&self, start: usize, count: usize, reverse: bool) -> Result<Cursor<'_, U>> {
        let inner = self.delegate.iter_range(start, count, reverse)?;
        Ok(Box::new(inner.map(move |element| element.map(&self.f))))
    }
}

impl<V: fmt::Debug, F> fmt::Debug for TransformView<V, F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TransformView").field("delegate", &self.delegate).finish()
    }
}
