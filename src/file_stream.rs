use std::borrow::Cow;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Buf, Bytes, BytesMut};
use encoding_rs::{Encoding, UTF_8};
use futures_util::stream::{Stream, TryStreamExt};
#[cfg(feature = "json")]
use serde::de::DeserializeOwned;
#[cfg(feature = "tokio-io")]
use tokio::io::AsyncRead;
#[cfg(feature = "tokio-io")]
use tokio_util::io::ReaderStream;

use crate::size_limit::SizeLimit;
use crate::{Event, StreamExtractor};

/// The payload of the first part of a `multipart/form-data` stream.
///
/// `FileStream` feeds every byte of the source stream through a
/// [`StreamExtractor`] and yields the payload bytes gathered from each source
/// chunk through its [`Stream`] implementation. The source may carry the
/// whole HTTP request or only its body; the boundary is discovered from the
/// data.
///
/// Once the payload is complete, the rest of the source is left unread.
///
/// # Examples
///
/// ```
/// use multer_extract::FileStream;
/// use bytes::Bytes;
/// use std::convert::Infallible;
/// use futures_util::stream::once;
///
/// # async fn run() {
/// let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_file\"\r\n\r\nabcd\r\n--X-BOUNDARY--\r\n";
/// let stream = once(async move { Result::<Bytes, Infallible>::Ok(Bytes::from(data)) });
/// let file = FileStream::new(stream);
///
/// assert_eq!(file.text().await.unwrap(), "abcd");
/// # }
/// # tokio::runtime::Runtime::new().unwrap().block_on(run());
/// ```
pub struct FileStream<'r> {
    stream: Pin<Box<dyn Stream<Item = crate::Result<Bytes>> + Send + 'r>>,
    extractor: StreamExtractor,
    pending: Bytes,
    out: BytesMut,
    size_limit: SizeLimit,
    consumed: u64,
    received: u64,
    done: bool,
}

impl<'r> FileStream<'r> {
    /// Construct a new `FileStream` instance with the given [`Bytes`] stream.
    pub fn new<S, O, E>(stream: S) -> Self
    where
        S: Stream<Item = Result<O, E>> + Send + 'r,
        O: Into<Bytes> + 'r,
        E: Into<Box<dyn std::error::Error + Send + Sync>> + 'r,
    {
        FileStream::with_size_limit(stream, SizeLimit::default())
    }

    /// Construct a new `FileStream` instance with the given [`Bytes`] stream
    /// and size limits.
    pub fn with_size_limit<S, O, E>(stream: S, size_limit: SizeLimit) -> Self
    where
        S: Stream<Item = Result<O, E>> + Send + 'r,
        O: Into<Bytes> + 'r,
        E: Into<Box<dyn std::error::Error + Send + Sync>> + 'r,
    {
        let stream = stream
            .map_ok(Into::<Bytes>::into)
            .map_err(|err| crate::Error::StreamReadFailed(err.into()));

        FileStream {
            stream: Box::pin(stream),
            extractor: StreamExtractor::new(),
            pending: Bytes::new(),
            out: BytesMut::new(),
            size_limit,
            consumed: 0,
            received: 0,
            done: false,
        }
    }

    /// Construct a new `FileStream` instance with the given [`AsyncRead`] reader.
    ///
    /// # Optional
    ///
    /// This requires the optional `tokio-io` feature to be enabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use multer_extract::FileStream;
    ///
    /// # async fn run() {
    /// let data = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"my_file\"\r\n\r\nabcd\r\n--X-BOUNDARY--\r\n";
    /// let reader = data.as_bytes();
    /// let mut file = FileStream::with_reader(reader);
    ///
    /// while let Some(chunk) = file.chunk().await.unwrap() {
    ///     println!("Chunk: {:?}", chunk);
    /// }
    /// # }
    /// # tokio::runtime::Runtime::new().unwrap().block_on(run());
    /// ```
    #[cfg(feature = "tokio-io")]
    #[cfg_attr(nightly, doc(cfg(feature = "tokio-io")))]
    pub fn with_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'r,
    {
        FileStream::new(ReaderStream::new(reader))
    }

    /// Construct a new `FileStream` instance with the given [`AsyncRead`]
    /// reader and size limits.
    ///
    /// # Optional
    ///
    /// This requires the optional `tokio-io` feature to be enabled.
    #[cfg(feature = "tokio-io")]
    #[cfg_attr(nightly, doc(cfg(feature = "tokio-io")))]
    pub fn with_reader_with_size_limit<R>(reader: R, size_limit: SizeLimit) -> Self
    where
        R: AsyncRead + Unpin + Send + 'r,
    {
        FileStream::with_size_limit(ReaderStream::new(reader), size_limit)
    }

    /// Get the next chunk of the payload, or `None` once the payload is complete.
    pub async fn chunk(&mut self) -> crate::Result<Option<Bytes>> {
        self.try_next().await
    }

    /// Get the full payload as [`Bytes`].
    pub async fn bytes(mut self) -> crate::Result<Bytes> {
        let mut buf = BytesMut::new();

        while let Some(bytes) = self.chunk().await? {
            buf.extend_from_slice(&bytes);
        }

        Ok(buf.freeze())
    }

    /// Get the full payload as text, decoded as UTF-8.
    pub async fn text(self) -> crate::Result<String> {
        self.text_with_charset("utf-8").await
    }

    /// Get the full payload as text, decoded with the encoding named by
    /// `encoding_label`. Unknown labels fall back to UTF-8.
    ///
    /// The part headers are not inspected, so the caller has to know the
    /// charset up front.
    pub async fn text_with_charset(self, encoding_label: &str) -> crate::Result<String> {
        let encoding = Encoding::for_label(encoding_label.as_bytes()).unwrap_or(UTF_8);

        let bytes = self.bytes().await?;

        let (text, _, _) = encoding.decode(&bytes);

        match text {
            Cow::Owned(s) => Ok(s),
            Cow::Borrowed(s) => Ok(String::from(s)),
        }
    }

    /// Try to deserialize the payload as JSON.
    ///
    /// # Optional
    ///
    /// This requires the optional `json` feature to be enabled.
    #[cfg(feature = "json")]
    #[cfg_attr(nightly, doc(cfg(feature = "json")))]
    pub async fn json<T: DeserializeOwned>(self) -> crate::Result<T> {
        let bytes = self.bytes().await?;
        serde_json::from_slice(&bytes).map_err(crate::Error::DecodeJson)
    }

    /// Returns `true` once the payload has been received completely.
    pub fn is_file_received(&self) -> bool {
        self.extractor.is_file_received()
    }

    /// The delimiter discovered in the stream, see [`StreamExtractor::boundary()`].
    pub fn boundary(&self) -> Option<&[u8]> {
        self.extractor.boundary()
    }

    /// Feeds the pending source bytes to the extractor until the payload is
    /// complete or the pending chunk is used up.
    fn drain_pending(&mut self) -> crate::Result<()> {
        while self.pending.has_remaining() {
            let byte = self.pending.get_u8();
            self.consumed += 1;
            self.size_limit.check_whole_stream(self.consumed)?;

            match self.extractor.process(byte) {
                Event::DataBufferAvailable => {
                    let data = self.extractor.data();
                    self.received += data.len() as u64;
                    self.size_limit.check_payload(self.received)?;
                    self.out.extend_from_slice(data);
                }
                Event::DataStreamCompleted => {
                    debug!("payload completed after {} bytes", self.received);
                    self.done = true;
                    return Ok(());
                }
                Event::Error => return Err(crate::Error::CorruptedStream),
                Event::None | Event::FileStreamFound | Event::FileStreamStarting => {}
            }
        }

        Ok(())
    }

    fn take_out(&mut self) -> Option<Bytes> {
        if self.out.is_empty() {
            None
        } else {
            Some(self.out.split().freeze())
        }
    }
}

impl Stream for FileStream<'_> {
    type Item = crate::Result<Bytes>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        loop {
            if this.done {
                return Poll::Ready(this.take_out().map(Ok));
            }

            if let Err(err) = this.drain_pending() {
                this.done = true;
                this.out.clear();
                return Poll::Ready(Some(Err(err)));
            }

            if this.done {
                continue;
            }

            if let Some(chunk) = this.take_out() {
                return Poll::Ready(Some(Ok(chunk)));
            }

            match this.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(data))) => this.pending = data,
                Poll::Ready(Some(Err(err))) => {
                    this.done = true;
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => {
                    debug!("source stream ended in phase {:?}", this.extractor.phase());
                    this.done = true;

                    let err = if this.extractor.phase().is_scanning_preamble() {
                        crate::Error::BoundaryNotFound
                    } else {
                        crate::Error::IncompleteStream
                    };
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn chunked(data: &'static [u8], size: usize) -> impl Stream<Item = crate::Result<Bytes>> + Send {
        stream::iter(data.chunks(size).map(|c| crate::Result::Ok(Bytes::copy_from_slice(c))))
    }

    #[tokio::test]
    async fn test_chunk_per_source_chunk() {
        let data = b"--B\r\n\r\nhello world\r\n--B--\r\n";
        let mut file = FileStream::new(chunked(data, 11));

        let mut chunks = Vec::new();
        while let Some(chunk) = file.chunk().await.unwrap() {
            chunks.push(chunk);
        }

        assert_eq!(chunks.concat(), b"hello world");
        assert!(chunks.len() > 1);
        assert!(file.is_file_received());
        assert_eq!(file.boundary(), Some(&b"\r\n--B"[..]));
        assert_eq!(file.chunk().await, Ok(None));
    }

    #[tokio::test]
    async fn test_rest_of_source_is_not_read() {
        let data = b"--B\r\n\r\nabc\r\n--B--\r\n";
        let trailing = stream::iter(vec![
            crate::Result::Ok(Bytes::from_static(data)),
            Err(crate::Error::CorruptedStream),
        ]);

        let file = FileStream::new(trailing);
        assert_eq!(file.bytes().await, Ok(Bytes::from_static(b"abc")));
    }

    #[tokio::test]
    async fn test_errors_end_the_stream() {
        let mut file = FileStream::with_size_limit(chunked(b"--B\r\n\r\n0123456789", 4), SizeLimit::new().payload(5));

        let mut result = Ok(None);
        for _ in 0..10 {
            result = file.chunk().await;
            if result.is_err() {
                break;
            }
        }

        assert_eq!(result, Err(crate::Error::PayloadSizeExceeded { limit: 5 }));
        assert_eq!(file.chunk().await, Ok(None));
    }
}
