//! Error taxonomy for the prefix adapters
//!
//! Plain stream calls (`Read`, `Write`, `BufRead`) keep returning
//! [`std::io::Error`]. Operations specific to the adapters return
//! [`PrefixError`], which converts into `io::Error` without losing the
//! original cause.

use std::io;

use thiserror::Error;

/// Errors raised by prefix adapter construction, reset and bulk transfer
#[derive(Debug, Error)]
pub enum PrefixError {
    /// Requested prefix capacity is larger than the adapters accept
    #[error("prefix capacity {requested} exceeds the maximum of {max} bytes")]
    CapacityTooLarge { requested: usize, max: usize },

    /// The underlying source failed while the prefix was being captured
    #[error("failed to capture stream prefix after {captured} bytes")]
    Fill {
        captured: usize,
        #[source]
        source: io::Error,
    },

    /// A bulk transfer stopped on an error from either side
    #[error("bulk transfer failed after {transferred} bytes")]
    Transfer {
        transferred: u64,
        #[source]
        source: io::Error,
    },
}

impl PrefixError {
    /// The underlying I/O error, if this is an I/O condition
    pub fn io(&self) -> Option<&io::Error> {
        match self {
            PrefixError::CapacityTooLarge { .. } => None,
            PrefixError::Fill { source, .. } | PrefixError::Transfer { source, .. } => Some(source),
        }
    }

    /// Kind of the underlying failure; `InvalidInput` for argument errors
    pub fn kind(&self) -> io::ErrorKind {
        self.io().map_or(io::ErrorKind::InvalidInput, io::Error::kind)
    }

    /// Bytes moved before a bulk transfer failed (0 for other variants)
    pub fn transferred(&self) -> u64 {
        match self {
            PrefixError::Transfer { transferred, .. } => *transferred,
            _ => 0,
        }
    }

    /// Consume the error and return the underlying I/O error, if any
    pub fn into_io(self) -> Option<io::Error> {
        match self {
            PrefixError::CapacityTooLarge { .. } => None,
            PrefixError::Fill { source, .. } | PrefixError::Transfer { source, .. } => Some(source),
        }
    }
}

impl From<PrefixError> for io::Error {
    fn from(err: PrefixError) -> Self {
        io::Error::new(err.kind(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_capacity_error_maps_to_invalid_input() {
        let err = PrefixError::CapacityTooLarge {
            requested: 10,
            max: 5,
        };
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(err.io().is_none());

        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_transfer_error_keeps_cause() {
        let err = PrefixError::Transfer {
            transferred: 7,
            source: io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"),
        };
        assert_eq!(err.transferred(), 7);
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(err.source().unwrap().to_string(), "pipe closed");

        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::BrokenPipe);
        let inner = io_err.get_ref().unwrap();
        let prefix_err = inner.downcast_ref::<PrefixError>().unwrap();
        assert_eq!(prefix_err.transferred(), 7);
    }

    #[test]
    fn test_display_leaves_cause_to_source_chain() {
        let err = PrefixError::Fill {
            captured: 3,
            source: io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer"),
        };
        assert_eq!(err.to_string(), "failed to capture stream prefix after 3 bytes");
        assert_eq!(err.source().unwrap().to_string(), "reset by peer");

        let err = PrefixError::Transfer {
            transferred: 9,
            source: io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"),
        };
        assert_eq!(err.to_string(), "bulk transfer failed after 9 bytes");
    }
}
