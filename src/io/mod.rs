pub mod buffer;
pub mod error;
pub mod options;
pub mod reader;
pub mod transfer;
pub mod writer;

pub use buffer::*;
pub use error::*;
pub use options::*;
pub use reader::*;
pub use transfer::*;
pub use writer::*;
