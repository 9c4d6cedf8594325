#[inline]
pub fn wrap_add(index: usize, addend: usize, capacity: usize) -> usize {
    debug_assert!(addend <= capacity);
    (index + addend) % capacity
}

#[inline]
pub fn wrap_sub(index: usize, subtrahend: usize, capacity: usize) -> usize {
    debug_assert!(subtrahend <= capacity);
    (index + capacity - subtrahend) % capacity
}

/// Capacity after one growth step. Always at least one more slot than before,
/// so a zero-capacity or trimmed buffer can still grow.
#[inline]
pub fn grown_capacity(capacity: usize, grow_factor: f64) -> usize {
    let scaled = (capacity as f64 * grow_factor).ceil() as usize;
    scaled.max(capacity + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping() {
        assert_eq!(wrap_add(3, 2, 4), 1);
        assert_eq!(wrap_add(0, 4, 4), 0);
        assert_eq!(wrap_sub(0, 1, 4), 3);
        assert_eq!(wrap_sub(2, 2, 4), 0);
    }

    #[test]
    fn growth() {
        assert_eq!(grown_capacity(2, 2.0), 4);
        assert_eq!(grown_capacity(3, 1.5), 5);
        assert_eq!(grown_capacity(0, 2.0), 1);
        assert_eq!(grown_capacity(1, 1.01), 2);
    }
}
