//! Explicit-error byte streams over files, memory buffers and
//! forward-only readers or writers.
//!
//! ```no_run
//! use fs_stream::Stream;
//!
//! let mut stream = Stream::from_path("notes.txt", "w+")?;
//! stream.write("Test.")?;
//! stream.rewind()?;
//! assert_eq!(stream.to_text(), "Test.");
//! # Ok::<(), fs_stream::StreamError>(())
//! ```

mod errors;
pub mod meta;
pub mod mode;
pub mod resource;
mod stream;

pub(crate) const LOG_PREFIX: &str = "[stream]";

pub use errors::{Result, StreamError};
pub use meta::Metadata;
pub use mode::Mode;
pub use resource::Resource;
pub use stream::{Stream, Whence};
