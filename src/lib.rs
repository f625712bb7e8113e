//! A fixed-memory extractor for the first file of a `multipart/form-data`
//! stream, for memory constrained environments.
//!
//! The core is [`StreamExtractor`], a finite-state machine which is fed one
//! byte at a time and never allocates. It finds the boundary token by itself,
//! skips everything before the first boundary line and the headers of the
//! first part, and then hands out the payload in small pieces until the
//! boundary shows up again. Its whole state is two buffers of
//! [`DEFAULT_CAPACITY`](constants::DEFAULT_CAPACITY) bytes.
//!
//! Two adapters drive the extractor from common byte sources:
//!
//! - [`copy_payload`] for blocking [`Read`](std::io::Read) sources.
//! - [`FileStream`] for async [`Stream`](futures_util::stream::Stream)s of
//!   [`Bytes`](bytes::Bytes), and tokio's `AsyncRead` with the `tokio-io` feature.
//!
//! # Examples
//!
//! ```
//! use multer_extract::{Event, StreamExtractor};
//!
//! let request = "POST /upload HTTP/1.1\r\n\
//!     Content-Type: multipart/form-data; boundary=X-BOUNDARY\r\n\
//!     \r\n\
//!     --X-BOUNDARY\r\n\
//!     Content-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\n\
//!     \r\n\
//!     Hello world\r\n\
//!     --X-BOUNDARY--\r\n";
//!
//! let mut extractor = StreamExtractor::new();
//! let mut file = Vec::new();
//!
//! for byte in request.bytes() {
//!     match extractor.process(byte) {
//!         Event::DataBufferAvailable => file.extend_from_slice(extractor.data()),
//!         Event::DataStreamCompleted => break,
//!         _ => {}
//!     }
//! }
//!
//! assert_eq!(file, b"Hello world");
//! ```
//!
//! # Features
//!
//! - `json`: adds [`FileStream::json()`].
//! - `tokio-io`: adds [`FileStream::with_reader()`].
//! - `log`: logs phase changes through the [`log`](https://docs.rs/log) crate.

#![cfg_attr(nightly, feature(doc_cfg))]

macro_rules! trace {
    ($($arg:tt)+) => {
        #[cfg(feature = "log")]
        log::trace!($($arg)+);
    };
}

macro_rules! debug {
    ($($arg:tt)+) => {
        #[cfg(feature = "log")]
        log::debug!($($arg)+);
    };
}

pub use bytes;
pub use copy::copy_payload;
pub use error::Error;
pub use event::Event;
pub use extractor::StreamExtractor;
pub use file_stream::FileStream;
pub use size_limit::SizeLimit;
pub use state::ParserPhase;

mod buffer;
pub mod constants;
mod copy;
mod error;
mod event;
mod extractor;
mod file_stream;
mod size_limit;
mod state;

/// A Result type often returned from methods that can have `multer-extract` errors.
pub type Result<T> = std::result::Result<T, Error>;
