//! # embeddenator-prefix
//!
//! Prefix-capturing stream adapters for Embeddenator.
//!
//! [`PrefixReader`] and [`PrefixWriter`] pass every byte through unchanged
//! while keeping a bounded copy of the first bytes seen, so callers can sniff
//! formats or log headers without buffering the stream themselves.

/// Emits a `tracing` trace event when the `logging` feature is enabled.
macro_rules! trace_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "logging")]
        {
            tracing::trace!($($arg)*);
        }
    };
}

pub mod io;
pub use io::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_loads() {
        let opts = PrefixOptions::default();
        assert_eq!(opts.capacity, DEFAULT_PREFIX_CAPACITY);

        let reader: PrefixReader<std::io::Empty> = PrefixReader::with_options(opts).unwrap();
        assert_eq!(reader.capacity(), DEFAULT_PREFIX_CAPACITY);

        let writer: PrefixWriter<Vec<u8>> = PrefixWriter::with_options(opts).unwrap();
        assert!(writer.prefix().is_empty());
    }
}
