//! Configuration for the prefix adapters

use serde::{Deserialize, Serialize};

use super::error::PrefixError;

/// Default number of leading bytes captured (512B)
pub const DEFAULT_PREFIX_CAPACITY: usize = 512;

/// Largest prefix an adapter will allocate (16MB)
pub const MAX_PREFIX_CAPACITY: usize = 16 * 1024 * 1024;

/// Stack buffer used by bulk-transfer copy loops (8KB)
pub const COPY_BUFFER_SIZE: usize = 8 * 1024;

/// Options shared by [`PrefixReader`](super::PrefixReader) and
/// [`PrefixWriter`](super::PrefixWriter)
///
/// A capacity of zero is accepted and turns the adapter into a plain
/// pass-through.
///
/// # Examples
/// ```
/// use embeddenator_prefix::PrefixOptions;
///
/// let opts: PrefixOptions = serde_json::from_str(r#"{ "capacity": 64 }"#).unwrap();
/// assert_eq!(opts.capacity, 64);
/// assert!(opts.validate().is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefixOptions {
    /// Maximum number of leading bytes retained
    pub capacity: usize,
}

impl Default for PrefixOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_PREFIX_CAPACITY,
        }
    }
}

impl PrefixOptions {
    /// Options with the given capacity
    pub const fn with_capacity(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Check that the options can be used to build an adapter
    pub fn validate(&self) -> Result<(), PrefixError> {
        if self.capacity > MAX_PREFIX_CAPACITY {
            return Err(PrefixError::CapacityTooLarge {
                requested: self.capacity,
                max: MAX_PREFIX_CAPACITY,
            });
        }
        Ok(())
    }
}
