//! Bounded prefix storage shared by the reader and writer adapters
//!
//! The storage is allocated once at construction and never regrown, so
//! resetting an adapter for reuse only rewinds the filled length.

/// Fixed-capacity byte buffer with a filled length
///
/// Only `storage[..len()]` is meaningful. The filled length grows until the
/// buffer is cleared and never exceeds the capacity.
///
/// # Examples
/// ```
/// use embeddenator_prefix::PrefixBuffer;
///
/// let mut buffer = PrefixBuffer::with_capacity(4);
/// assert_eq!(buffer.capture(b"abcdef"), 4);
/// assert_eq!(buffer.as_slice(), b"abcd");
/// assert!(buffer.is_full());
/// ```
pub struct PrefixBuffer {
    storage: Box<[u8]>,
    filled: usize,
}

impl PrefixBuffer {
    /// Allocate a buffer holding at most `capacity` bytes
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: vec![0u8; capacity].into_boxed_slice(),
            filled: 0,
        }
    }

    /// Maximum number of bytes the buffer holds
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of bytes captured so far
    pub fn len(&self) -> usize {
        self.filled
    }

    /// Whether nothing has been captured
    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    /// Whether the buffer reached its capacity
    pub fn is_full(&self) -> bool {
        self.filled == self.storage.len()
    }

    /// Number of bytes that can still be captured
    pub fn remaining(&self) -> usize {
        self.storage.len() - self.filled
    }

    /// Captured bytes
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[..self.filled]
    }

    /// Copy as many leading bytes of `data` as fit, returning how many were taken
    pub fn capture(&mut self, data: &[u8]) -> usize {
        let n = self.remaining().min(data.len());
        self.storage[self.filled..self.filled + n].copy_from_slice(&data[..n]);
        self.filled += n;
        n
    }

    /// Uncommitted tail of the storage, for reading directly into the buffer
    pub fn spare_mut(&mut self) -> &mut [u8] {
        &mut self.storage[self.filled..]
    }

    /// Commit `n` bytes previously written into [`spare_mut`](Self::spare_mut)
    ///
    /// # Panics
    /// Panics if `n` exceeds [`remaining`](Self::remaining).
    pub fn advance(&mut self, n: usize) {
        assert!(n <= self.remaining(), "advance past prefix capacity");
        self.filled += n;
    }

    /// Forget captured bytes; the capacity is kept
    pub fn clear(&mut self) {
        self.filled = 0;
    }
}

impl std::fmt::Debug for PrefixBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefixBuffer")
            .field("capacity", &self.capacity())
            .field("filled", &self.filled)
            .finish()
    }
}
