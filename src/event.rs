/// The outcome of feeding one byte to a [`StreamExtractor`](crate::StreamExtractor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Nothing worth reporting happened.
    None,
    /// A boundary line was found and its token captured.
    FileStreamFound,
    /// The part headers ended, the next byte belongs to the payload.
    FileStreamStarting,
    /// Payload bytes are available through
    /// [`data()`](crate::StreamExtractor::data) until the next byte is fed.
    DataBufferAvailable,
    /// The boundary appeared again, the payload is complete.
    DataStreamCompleted,
    /// The extractor reached a state it doesn't model.
    ///
    /// The phase dispatch is exhaustive so this is never produced today, but
    /// callers should abort and treat the input as corrupted if it ever is.
    Error,
}

impl Event {
    /// Returns `true` for [`Event::None`].
    pub fn is_none(self) -> bool {
        self == Event::None
    }
}

impl Default for Event {
    fn default() -> Self {
        Event::None
    }
}
