use std::fmt::{self, Debug, Display, Formatter};

use derive_more::Display;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A set of errors that can occur while driving a
/// [`StreamExtractor`](crate::StreamExtractor) from a byte source.
///
/// The extractor itself never fails; these errors come from the adapters
/// which feed it and from the limits they enforce.
#[derive(Display)]
#[non_exhaustive]
pub enum Error {
    /// The byte source ended before a boundary line was found.
    #[display(fmt = "multipart boundary not found in stream")]
    BoundaryNotFound,

    /// The byte source ended before the boundary appeared again after the payload.
    #[display(fmt = "incomplete multipart stream")]
    IncompleteStream,

    /// The extractor reported [`Event::Error`](crate::Event::Error).
    #[display(fmt = "multipart stream extractor reached an invalid state")]
    CorruptedStream,

    /// Reading from the byte source failed.
    #[display(fmt = "stream read failed: {}", _0)]
    StreamReadFailed(BoxError),

    /// Writing the payload to the destination failed.
    #[display(fmt = "failed to write payload: {}", _0)]
    WriteFailed(std::io::Error),

    /// The incoming stream size exceeded the maximum limit.
    #[display(fmt = "stream size exceeded the maximum limit: {} bytes", limit)]
    StreamSizeExceeded { limit: u64 },

    /// The extracted payload exceeded the maximum size limit.
    #[display(fmt = "payload exceeded the maximum size limit: {} bytes", limit)]
    PayloadSizeExceeded { limit: u64 },

    /// Failed to decode the payload as `JSON` in
    /// [`FileStream::json()`](crate::FileStream::json).
    #[cfg(feature = "json")]
    #[cfg_attr(nightly, doc(cfg(feature = "json")))]
    #[display(fmt = "failed to decode payload as JSON: {}", _0)]
    DecodeJson(serde_json::Error),
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::StreamReadFailed(e) => Some(e.as_ref()),
            Error::WriteFailed(e) => Some(e),
            #[cfg(feature = "json")]
            Error::DecodeJson(e) => Some(e),
            _ => None,
        }
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string().eq(&other.to_string())
    }
}

impl Eq for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display() {
        assert_eq!(
            Error::PayloadSizeExceeded { limit: 10 }.to_string(),
            "payload exceeded the maximum size limit: 10 bytes"
        );
        assert_eq!(format!("{:?}", Error::IncompleteStream), "incomplete multipart stream");
    }

    #[test]
    fn test_display_every_variant() {
        let io = || std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let cases = vec![
            (Error::BoundaryNotFound, "multipart boundary not found in stream"),
            (Error::IncompleteStream, "incomplete multipart stream"),
            (Error::CorruptedStream, "multipart stream extractor reached an invalid state"),
            (Error::StreamReadFailed(io().into()), "stream read failed: pipe closed"),
            (Error::WriteFailed(io()), "failed to write payload: pipe closed"),
            (
                Error::StreamSizeExceeded { limit: 7 },
                "stream size exceeded the maximum limit: 7 bytes",
            ),
        ];

        for (err, msg) in cases {
            assert_eq!(err.to_string(), msg);
            assert_eq!(format!("{:?}", err), msg);
        }
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_display_decode_json() {
        let err = serde_json::from_str::<u8>("x").unwrap_err();
        let expected = format!("failed to decode payload as JSON: {}", err);
        assert_eq!(Error::DecodeJson(err).to_string(), expected);
    }

    #[test]
    fn test_source() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = Error::WriteFailed(io);
        assert_eq!(err.source().map(|e| e.to_string()), Some("pipe closed".to_owned()));
        assert!(Error::BoundaryNotFound.source().is_none());
    }
}
