//! Prefix-capturing writer
//!
//! [`PrefixWriter`] forwards every write to its sink and keeps a copy of the
//! first bytes the sink accepted.

use std::fmt;
use std::io::{self, Read, Write};

use super::buffer::PrefixBuffer;
use super::error::PrefixError;
use super::options::PrefixOptions;
use super::transfer::{copy_loop, write_all_counted, Prefixed, ReadFrom};

/// Writer adapter that records the first `capacity` bytes written through it
///
/// Only bytes the sink actually accepted are captured, so a short write never
/// records bytes the caller will submit again.
///
/// # Examples
/// ```
/// use embeddenator_prefix::PrefixWriter;
/// use std::io::Write;
///
/// let mut writer = PrefixWriter::with_sink(Vec::new(), 4).unwrap();
/// writer.write_all(b"HEAD").unwrap();
/// writer.write_all(b" and body").unwrap();
///
/// assert_eq!(writer.prefix(), b"HEAD");
/// assert_eq!(writer.into_inner().unwrap(), b"HEAD and body");
/// ```
pub struct PrefixWriter<W> {
    sink: Option<W>,
    buffer: PrefixBuffer,
}

impl<W> PrefixWriter<W> {
    /// Create an unbound writer; bind a sink with [`reset`](Self::reset)
    pub fn new(capacity: usize) -> Result<Self, PrefixError> {
        Self::with_options(PrefixOptions::with_capacity(capacity))
    }

    /// Create an unbound writer from options
    pub fn with_options(options: PrefixOptions) -> Result<Self, PrefixError> {
        options.validate()?;
        Ok(Self {
            sink: None,
            buffer: PrefixBuffer::with_capacity(options.capacity),
        })
    }

    /// Create a writer bound to `sink`
    pub fn with_sink(sink: W, capacity: usize) -> Result<Self, PrefixError> {
        let mut writer = Self::new(capacity)?;
        writer.reset(sink);
        Ok(writer)
    }

    /// Bind a new sink, dropping the previous one, and forget captured bytes
    pub fn reset(&mut self, sink: W) {
        self.sink = Some(sink);
        self.buffer.clear();
        trace_event!(capacity = self.buffer.capacity(), "prefix writer reset");
    }

    /// First bytes written since the last reset
    pub fn prefix(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// Maximum number of bytes captured per sink
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Whether the prefix is complete and further writes only pass through
    pub fn is_saturated(&self) -> bool {
        self.buffer.is_full()
    }

    /// Whether a sink is currently bound
    pub fn is_bound(&self) -> bool {
        self.sink.is_some()
    }

    /// Shared access to the sink
    pub fn get_ref(&self) -> Option<&W> {
        self.sink.as_ref()
    }

    /// Mutable access to the sink
    ///
    /// Bytes written to the sink directly are not captured.
    pub fn get_mut(&mut self) -> Option<&mut W> {
        self.sink.as_mut()
    }

    /// Consume the writer and return the sink without flushing it
    pub fn into_inner(self) -> Option<W> {
        self.sink
    }
}

impl<W: Write> PrefixWriter<W> {
    /// Flush and release the sink
    ///
    /// The sink is dropped even when the flush fails. The captured prefix is
    /// kept until the next reset.
    pub fn close(&mut self) -> io::Result<()> {
        match self.sink.take() {
            Some(mut sink) => {
                let result = sink.flush();
                trace_event!(captured = self.buffer.len(), ok = result.is_ok(), "prefix writer closed");
                result
            }
            None => Ok(()),
        }
    }
}

fn not_connected() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "prefix writer has no sink")
}

impl<W: Write> Write for PrefixWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let sink = self.sink.as_mut().ok_or_else(not_connected)?;
        let n = sink.write(buf)?;
        let accepted = buf.get(..n).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "sink reported more bytes written than supplied",
            )
        })?;
        self.buffer.capture(accepted);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.sink.as_mut() {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }
}

impl<W: Write> ReadFrom for PrefixWriter<W> {
    /// Copy `source` to exhaustion into the sink, capturing the prefix
    ///
    /// While the prefix has room, bytes are read straight into the prefix
    /// storage and forwarded from there.
    fn read_from<R: Read + ?Sized>(&mut self, source: &mut R) -> Result<u64, PrefixError> {
        let Some(sink) = self.sink.as_mut() else {
            return Err(transfer_failed(0, not_connected()));
        };
        let mut transferred = 0u64;

        while !self.buffer.is_full() {
            let n = match source.read(self.buffer.spare_mut()) {
                Ok(0) => {
                    trace_event!(transferred, "prefix writer filled from source");
                    return Ok(transferred);
                }
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(transfer_failed(transferred, e)),
            };
            let (written, result) = write_all_counted(&mut *sink, &self.buffer.spare_mut()[..n]);
            self.buffer.advance(written);
            transferred += written as u64;
            if let Err(e) = result {
                return Err(transfer_failed(transferred, e));
            }
        }

        let (n, result) = copy_loop(source, sink);
        transferred += n;
        match result {
            Ok(()) => {
                trace_event!(transferred, "prefix writer filled from source");
                Ok(transferred)
            }
            Err(e) => Err(transfer_failed(transferred, e)),
        }
    }
}

fn transfer_failed(transferred: u64, source: io::Error) -> PrefixError {
    trace_event!(transferred, error = %source, "prefix writer transfer failed");
    PrefixError::Transfer {
        transferred,
        source,
    }
}

impl<W> Prefixed for PrefixWriter<W> {
    fn prefix(&self) -> &[u8] {
        self.buffer.as_slice()
    }
}

impl<W> fmt::Debug for PrefixWriter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixWriter")
            .field("capacity", &self.buffer.capacity())
            .field("filled", &self.buffer.len())
            .field("bound", &self.sink.is_some())
            .finish()
    }
}
