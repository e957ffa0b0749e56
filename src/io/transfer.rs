//! Bulk-transfer capabilities and partial-progress aware copy loops
//!
//! [`WriteTo`] and [`ReadFrom`] are the "drain yourself into a sink" and
//! "drain a source into yourself" shapes. Generic copy code can take either
//! bound and let the adapter move bytes without an intermediate buffer of the
//! caller's own.

use std::io::{self, Read, Write};

use super::error::PrefixError;
use super::options::COPY_BUFFER_SIZE;

/// A stream that can drain all of its remaining bytes into a writer
pub trait WriteTo {
    /// Write every remaining byte to `sink`, returning the number transferred
    fn write_to<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<u64, PrefixError>;
}

/// A sink that can pull every remaining byte out of a reader
pub trait ReadFrom {
    /// Read `source` to exhaustion, returning the number transferred
    fn read_from<R: Read + ?Sized>(&mut self, source: &mut R) -> Result<u64, PrefixError>;
}

/// Access to the leading bytes an adapter has captured
pub trait Prefixed {
    fn prefix(&self) -> &[u8];
}

impl<T: WriteTo + ?Sized> WriteTo for &mut T {
    fn write_to<W: Write + ?Sized>(&mut self, sink: &mut W) -> Result<u64, PrefixError> {
        (**self).write_to(sink)
    }
}

impl<T: ReadFrom + ?Sized> ReadFrom for &mut T {
    fn read_from<R: Read + ?Sized>(&mut self, source: &mut R) -> Result<u64, PrefixError> {
        (**self).read_from(source)
    }
}

impl<T: Prefixed + ?Sized> Prefixed for &T {
    fn prefix(&self) -> &[u8] {
        (**self).prefix()
    }
}

/// Copy a reader to exhaustion into a writer
///
/// Behaves like [`std::io::copy`] but reports how many bytes reached the
/// writer when either side fails.
///
/// # Examples
/// ```
/// use embeddenator_prefix::copy_counted;
/// use std::io::Cursor;
///
/// let mut src = Cursor::new(b"some bytes".to_vec());
/// let mut dst = Vec::new();
/// assert_eq!(copy_counted(&mut src, &mut dst).unwrap(), 10);
/// assert_eq!(dst, b"some bytes");
/// ```
pub fn copy_counted<R, W>(reader: &mut R, writer: &mut W) -> Result<u64, PrefixError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    match copy_loop(reader, writer) {
        (transferred, Ok(())) => Ok(transferred),
        (transferred, Err(source)) => Err(PrefixError::Transfer {
            transferred,
            source,
        }),
    }
}

/// Copy loop returning progress alongside the first error
pub(crate) fn copy_loop<R, W>(reader: &mut R, writer: &mut W) -> (u64, io::Result<()>)
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = [0u8; COPY_BUFFER_SIZE];
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => return (total, Ok(())),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return (total, Err(e)),
        };
        let (written, result) = write_all_counted(writer, &buffer[..n]);
        total += written as u64;
        if let Err(e) = result {
            return (total, Err(e));
        }
    }
}

/// Like [`Write::write_all`], but also returns how many bytes were accepted
pub fn write_all_counted<W: Write + ?Sized>(writer: &mut W, data: &[u8]) -> (usize, io::Result<()>) {
    let mut written = 0;
    while written < data.len() {
        match writer.write(&data[written..]) {
            Ok(0) => {
                return (
                    written,
                    Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        "failed to write whole buffer",
                    )),
                )
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return (written, Err(e)),
        }
    }
    (written, Ok(()))
}
