//! Prefix-capturing reader
//!
//! [`PrefixReader`] eagerly captures the first bytes of a source when it is
//! reset, then serves reads from the captured copy before passing through to
//! the source itself. The captured bytes stay available through
//! [`PrefixReader::prefix`] for the lifetime of the binding.

use std::fmt;
use std::io::{self, BufRead, Read, Write};

use super::buffer::PrefixBuffer;
use super::error::PrefixError;
use super::options::PrefixOptions;
use super::transfer::{copy_loop, write_all_counted, Prefixed, WriteTo};

/// Reader adapter that records the first `capacity` bytes of its source
///
/// Reads return exactly the bytes the source would have returned, in order.
/// The read position moves through the captured bytes first and then through
/// the untouched remainder of the source.
///
/// # Examples
/// ```
/// use embeddenator_prefix::PrefixReader;
/// use std::io::{Cursor, Read};
///
/// let source = Cursor::new(b"MAGIC and the rest".to_vec());
/// let mut reader = PrefixReader::with_source(source, 5).unwrap();
/// assert_eq!(reader.prefix(), b"MAGIC");
///
/// let mut all = String::new();
/// reader.read_to_string(&mut all).unwrap();
/// assert_eq!(all, "MAGIC and the rest");
/// ```
pub struct PrefixReader<R> {
    source: Option<R>,
    buffer: PrefixBuffer,
    cursor: usize,
    exhausted: bool,
    pending: Option<io::Error>,
}

impl<R> PrefixReader<R> {
    /// Create an unbound reader; bind a source with [`reset`](Self::reset)
    pub fn new(capacity: usize) -> Result<Self, PrefixError> {
        Self::with_options(PrefixOptions::with_capacity(capacity))
    }

    /// Create an unbound reader from options
    pub fn with_options(options: PrefixOptions) -> Result<Self, PrefixError> {
        options.validate()?;
        Ok(Self {
            source: None,
            buffer: PrefixBuffer::with_capacity(options.capacity),
            cursor: 0,
            exhausted: false,
            pending: None,
        })
    }

    /// Bytes captured from the start of the current source
    pub fn prefix(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// Maximum number of bytes captured per source
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Read position within the captured prefix
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Captured bytes not yet handed to a caller
    pub fn buffered(&self) -> &[u8] {
        &self.buffer.as_slice()[self.cursor..]
    }

    /// Whether a source is currently bound
    pub fn is_bound(&self) -> bool {
        self.source.is_some()
    }

    /// Shared access to the source
    pub fn get_ref(&self) -> Option<&R> {
        self.source.as_ref()
    }

    /// Mutable access to the source
    ///
    /// Reading from the source directly skips the adapter's read position.
    pub fn get_mut(&mut self) -> Option<&mut R> {
        self.source.as_mut()
    }

    /// Consume the reader and return the source, discarding undelivered
    /// captured bytes
    pub fn into_inner(self) -> Option<R> {
        self.source
    }

    /// Release the source
    ///
    /// Captured bytes that were not yet read can still be read afterwards;
    /// past them reads fail with [`io::ErrorKind::NotConnected`].
    pub fn close(&mut self) -> io::Result<()> {
        if self.source.take().is_some() {
            trace_event!(captured = self.buffer.len(), "prefix reader closed");
        }
        Ok(())
    }
}

impl<R: Read> PrefixReader<R> {
    /// Create a reader bound to `source`, capturing its prefix immediately
    pub fn with_source(source: R, capacity: usize) -> Result<Self, PrefixError> {
        let mut reader = Self::new(capacity)?;
        reader.reset(source)?;
        Ok(reader)
    }

    /// Bind a new source, dropping the previous one, and capture its prefix
    ///
    /// Blocks until the prefix is full or the source reaches end of stream.
    /// On failure the bytes captured so far stay readable and the source
    /// stays bound.
    pub fn reset(&mut self, source: R) -> Result<(), PrefixError> {
        self.buffer.clear();
        self.cursor = 0;
        self.exhausted = false;
        self.pending = None;

        let source = self.source.insert(source);
        match fill(source, &mut self.buffer) {
            Ok(exhausted) => {
                self.exhausted = exhausted;
                trace_event!(
                    capacity = self.buffer.capacity(),
                    captured = self.buffer.len(),
                    exhausted,
                    "prefix reader reset"
                );
                Ok(())
            }
            Err(source) => {
                trace_event!(captured = self.buffer.len(), error = %source, "prefix capture failed");
                Err(PrefixError::Fill {
                    captured: self.buffer.len(),
                    source,
                })
            }
        }
    }
}

/// Read from `source` into the buffer until it is full or the source ends
///
/// Returns `true` when the source reported end of stream.
fn fill<R: Read>(source: &mut R, buffer: &mut PrefixBuffer) -> io::Result<bool> {
    while !buffer.is_full() {
        match source.read(buffer.spare_mut()) {
            Ok(0) => return Ok(true),
            Ok(n) => buffer.advance(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(false)
}

fn not_connected() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "prefix reader has no source")
}

impl<R: Read> Read for PrefixReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        let buffered = self.buffered();
        let n = buffered.len().min(buf.len());
        buf[..n].copy_from_slice(&buffered[..n]);
        self.cursor += n;
        if n == buf.len() {
            return Ok(n);
        }

        // Captured region drained; top up from the source.
        if let Some(e) = self.pending.take() {
            if n == 0 {
                return Err(e);
            }
            self.pending = Some(e);
            return Ok(n);
        }
        if self.exhausted {
            return Ok(n);
        }
        let Some(source) = self.source.as_mut() else {
            return if n > 0 { Ok(n) } else { Err(not_connected()) };
        };

        match source.read(&mut buf[n..]) {
            Ok(0) => {
                self.exhausted = true;
                Ok(n)
            }
            Ok(m) => Ok(n + m),
            Err(e) if n == 0 => Err(e),
            Err(e) => {
                // Deliver the captured bytes now, the error on the next call.
                if e.kind() != io::ErrorKind::Interrupted {
                    self.pending = Some(e);
                }
                Ok(n)
            }
        }
    }
}

impl<R: BufRead> BufRead for PrefixReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.cursor < self.buffer.len() {
            return Ok(&self.buffer.as_slice()[self.cursor..]);
        }
        if let Some(e) = self.pending.take() {
            return Err(e);
        }
        if self.exhausted {
            return Ok(&[]);
        }
        match self.source.as_mut() {
            Some(source) => source.fill_buf(),
            None => Err(not_connected()),
        }
    }

    fn consume(&mut self, amt: usize) {
        let from_prefix = amt.min(self.buffer.len() - self.cursor);
        self.cursor += from_prefix;
        let rest = amt - from_prefix;
        if rest > 0 {
            if let Some(source) = self.source.as_mut() {
                source.consume(rest);
            }
        }
    }
}

impl<R: Read> WriteTo for PrefixReader<R> {
    /// Drain undelivered captured bytes, then the rest of the source, into `sink`
    ///
    /// Continues exactly at the current read position.
    fn write_to<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<u64, PrefixError> {
        let mut transferred = 0u64;

        if self.cursor < self.buffer.len() {
            let (n, result) = write_all_counted(&mut *sink, &self.buffer.as_slice()[self.cursor..]);
            self.cursor += n;
            transferred += n as u64;
            if let Err(source) = result {
                return Err(transfer_failed(transferred, source));
            }
        }

        if let Some(source) = self.pending.take() {
            return Err(transfer_failed(transferred, source));
        }

        if !self.exhausted {
            let Some(source) = self.source.as_mut() else {
                return Err(transfer_failed(transferred, not_connected()));
            };
            let (n, result) = copy_loop(source, sink);
            transferred += n;
            if let Err(source) = result {
                return Err(transfer_failed(transferred, source));
            }
            self.exhausted = true;
        }

        trace_event!(transferred, "prefix reader drained");
        Ok(transferred)
    }
}

fn transfer_failed(transferred: u64, source: io::Error) -> PrefixError {
    trace_event!(transferred, error = %source, "prefix reader transfer failed");
    PrefixError::Transfer {
        transferred,
        source,
    }
}

impl<R> Prefixed for PrefixReader<R> {
    fn prefix(&self) -> &[u8] {
        self.buffer.as_slice()
    }
}

impl<R> fmt::Debug for PrefixReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixReader")
            .field("capacity", &self.buffer.capacity())
            .field("filled", &self.buffer.len())
            .field("cursor", &self.cursor)
            .field("exhausted", &self.exhausted)
            .field("bound", &self.source.is_some())
            .finish()
    }
}
