//! Construction settings for `Sequence` and `BoundedSequence`.
//!
//! With the `serde` feature enabled both settings types can be loaded from
//! any serde format; missing fields fall back to their defaults.

use crate::behavior::Behavior;
use crate::error::{Result, SequenceError};

/// Capacity a `Sequence` allocates when none is given.
pub const DEFAULT_CAPACITY: usize = 16;

/// Growth factor a `Sequence` uses when none is given.
pub const DEFAULT_GROW_FACTOR: f64 = 2.0;

/// Settings for a growable `Sequence`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SequenceConfig {
    /// Number of slots allocated up front.
    pub capacity: usize,
    /// Multiplier applied to the capacity when the buffer is full. Must be
    /// greater than one.
    pub grow_factor: f64,
    /// Stack or queue ordering.
    pub behavior: Behavior,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        SequenceConfig {
            capacity: DEFAULT_CAPACITY,
            grow_factor: DEFAULT_GROW_FACTOR,
            behavior: Behavior::Queue,
        }
    }
}

impl SequenceConfig {
    /// Default settings with the given behavior.
    pub fn with_behavior(behavior: Behavior) -> Self {
        SequenceConfig { behavior, ..SequenceConfig::default() }
    }

    /// Checks the settings without allocating anything.
    pub fn validate(&self) -> Result<()> {
        validate_grow_factor(self.grow_factor)
    }
}

/// Settings for a `BoundedSequence`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoundedConfig {
    /// Largest number of elements retained. Must be at least one.
    pub maximum_size: usize,
    /// Extra elements evicted whenever eviction happens, so that the next
    /// `overhead` adds need no eviction. At most `maximum_size`.
    pub overhead: usize,
    /// Shrink the backing storage to `maximum_size` after evicting.
    pub trim_on_evict: bool,
    /// Settings of the underlying sequence.
    pub sequence: SequenceConfig,
}

impl Default for BoundedConfig {
    fn default() -> Self {
        BoundedConfig {
            maximum_size: DEFAULT_CAPACITY,
            overhead: 0,
            trim_on_evict: false,
            sequence: SequenceConfig::default(),
        }
    }
}

impl BoundedConfig {
    /// Settings for a bounded sequence of `maximum_size` elements.
    pub fn new(maximum_size: usize, overhead: usize) -> Self {
        BoundedConfig {
            maximum_size,
            overhead,
            ..BoundedConfig::default()
        }
    }

    /// Checks the settings without allocating anything.
    pub fn validate(&self) -> Result<()> {
        validate_fixed_size(self.maximum_size, self.overhead)?;
        self.sequence.validate()
    }
}

pub(crate) fn validate_grow_factor(grow_factor: f64) -> Result<()> {
    if grow_factor.is_finite() && grow_factor > 1.0 {
        Ok(())
    } else {
        Err(SequenceError::invalid_arg(
            "grow_factor",
            format!("must be a finite number greater than 1, got {}", grow_factor),
        ))
    }
}

pub(crate) fn validate_fixed_size(maximum_size: usize, overhead: usize) -> Result<()> {
    if maximum_size < 1 {
        return Err(SequenceError::invalid_arg("maximum_size", "must be at least 1"));
    }
    if overhead > maximum_size {
        return Err(SequenceError::invalid_arg(
            "overhead",
            format!("must not exceed the maximum size {}, got {}", maximum_size, overhead),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SequenceConfig::default().validate().is_ok());
        assert!(BoundedConfig::default().validate().is_ok());
        assert_eq!(SequenceConfig::with_behavior(Behavior::Stack).behavior, Behavior::Stack);
    }

    #[test]
    fn rejects_bad_grow_factor() {
        for factor in [1.0, 0.5, -2.0, f64::NAN, f64::INFINITY] {
            let config = SequenceConfig { grow_factor: factor, ..SequenceConfig::default() };
            assert!(config.validate().is_err(), "factor {} accepted", factor);
        }
    }

    #[test]
    fn rejects_bad_fixed_size() {
        assert!(BoundedConfig::new(0, 0).validate().is_err());
        assert!(BoundedConfig::new(3, 4).validate().is_err());
        assert!(BoundedConfig::new(3, 3).validate().is_ok());
        assert!(BoundedConfig::new(1, 0).validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn loads_partial_settings() {
        let config: BoundedConfig =
            serde_json::from_str(r#"{ "maximum_size": 8, "sequence": { "behavior": "stack" } }"#)
                .unwrap();
        assert_eq!(config.maximum_size, 8);
        assert_eq!(config.overhead, 0);
        assert_eq!(config.sequence.behavior, Behavior::Stack);
        assert_eq!(config.sequence.grow_factor, DEFAULT_GROW_FACTOR);
    }
}
