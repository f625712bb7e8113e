use crate::buffer::BoundedBuffer;
use crate::constants::{self, BOUNDARY_START_MARKER, CR, DEFAULT_CAPACITY, FILE_START_MARKER, HYPHEN, LF};
use crate::event::Event;
use crate::state::ParserPhase;

/// A byte-at-a-time extractor for the first payload of a `multipart/form-data` stream.
///
/// The extractor discovers the boundary token from the stream itself, so it
/// can be fed a complete HTTP request (request line and headers included) or
/// just the body. Everything before the first boundary line and the headers
/// of the first part are skipped; the payload of that part is then handed out
/// in small pieces via [`Event::DataBufferAvailable`] until the boundary shows
/// up again.
///
/// All storage lives inline: two buffers of `CAP` bytes each, where `CAP` is
/// `4` plus the longest boundary token the extractor accepts. The default of
/// [`DEFAULT_CAPACITY`] accepts every token allowed by RFC 2046.
///
/// # Limitation
///
/// The boundary is matched naively: when a partial match fails, the bytes
/// consumed so far are released as payload and matching restarts with the
/// next byte. A boundary whose start overlaps such a failed partial match is
/// not recognized. This keeps the memory footprint constant.
///
/// # Examples
///
/// ```
/// use multer_extract::{Event, StreamExtractor};
///
/// let body = b"--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"file\"\r\n\r\nabcd\r\n--X-BOUNDARY--\r\n";
///
/// let mut extractor = StreamExtractor::new();
/// let mut payload = Vec::new();
///
/// for &byte in body.iter() {
///     match extractor.process(byte) {
///         Event::DataBufferAvailable => payload.extend_from_slice(extractor.data()),
///         Event::DataStreamCompleted => break,
///         _ => {}
///     }
/// }
///
/// assert!(extractor.is_file_received());
/// assert_eq!(payload, b"abcd");
/// ```
#[derive(Debug, Clone)]
pub struct StreamExtractor<const CAP: usize = DEFAULT_CAPACITY> {
    phase: ParserPhase,
    boundary: BoundedBuffer<CAP>,
    data: BoundedBuffer<CAP>,
    data_available: bool,
}

impl StreamExtractor {
    /// Creates an extractor which accepts boundary tokens up to
    /// [`MAX_BOUNDARY_LEN`](crate::constants::MAX_BOUNDARY_LEN) bytes.
    ///
    /// Use [`StreamExtractor::default()`] with an explicit capacity for other sizes.
    pub const fn new() -> Self {
        Self::empty()
    }
}

impl<const CAP: usize> StreamExtractor<CAP> {
    const VALID_CAPACITY: () = assert!(
        CAP > BOUNDARY_START_MARKER.len(),
        "capacity must leave room for at least one boundary character"
    );

    /// The longest boundary token this extractor captures.
    pub const MAX_BOUNDARY_LEN: usize = CAP - BOUNDARY_START_MARKER.len();

    const fn empty() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_CAPACITY;

        StreamExtractor {
            phase: ParserPhase::Initial,
            boundary: BoundedBuffer::new(),
            data: BoundedBuffer::new(),
            data_available: false,
        }
    }

    /// Feeds the next byte of the stream.
    ///
    /// After [`Event::DataBufferAvailable`] the payload bytes must be taken
    /// from [`data()`](Self::data) before the next call, which discards them.
    pub fn process(&mut self, byte: u8) -> Event {
        if self.data_available {
            self.data.clear();
            self.data_available = false;
        }

        match self.phase {
            ParserPhase::Initial => {
                self.phase = match byte {
                    CR => ParserPhase::SawCr,
                    LF => ParserPhase::SawLf,
                    HYPHEN => ParserPhase::SawHyphen,
                    _ => ParserPhase::SkipLine,
                };
                Event::None
            }
            ParserPhase::SkipLine => {
                match byte {
                    CR => self.phase = ParserPhase::SawCr,
                    LF => self.phase = ParserPhase::SawLf,
                    _ => {}
                }
                Event::None
            }
            ParserPhase::SawCr => {
                self.phase = if byte == LF {
                    ParserPhase::SawLf
                } else {
                    ParserPhase::SkipLine
                };
                Event::None
            }
            ParserPhase::SawLf => {
                self.phase = if byte == HYPHEN {
                    ParserPhase::SawHyphen
                } else {
                    ParserPhase::SkipLine
                };
                Event::None
            }
            ParserPhase::SawHyphen => {
                if byte == HYPHEN {
                    self.boundary.clear();
                    self.boundary.extend_from_slice(BOUNDARY_START_MARKER);
                    self.phase = ParserPhase::CapturingBoundary;
                } else {
                    self.phase = ParserPhase::SkipLine;
                }
                Event::None
            }
            ParserPhase::CapturingBoundary => {
                if byte == CR {
                    self.phase = ParserPhase::ConfirmingBoundary;
                } else if !constants::is_boundary_char(byte) || !self.boundary.push(byte) {
                    trace!(
                        "invalid boundary token after {} bytes, restarting boundary search",
                        self.boundary.len() - BOUNDARY_START_MARKER.len()
                    );
                    self.abandon_boundary();
                }
                Event::None
            }
            ParserPhase::ConfirmingBoundary => {
                if byte != LF {
                    trace!("boundary line not terminated by CRLF, restarting boundary search");
                    self.abandon_boundary();
                    return Event::None;
                }

                trace!("boundary found: {:?}", String::from_utf8_lossy(self.boundary.as_slice()));

                // The CRLF ending the boundary line doubles as the first half
                // of the blank line when the part has no headers.
                self.data.clear();
                self.data.extend_from_slice(&FILE_START_MARKER[..2]);
                self.phase = ParserPhase::SkippingHeaders;
                Event::FileStreamFound
            }
            ParserPhase::SkippingHeaders => {
                if FILE_START_MARKER.get(self.data.len()) != Some(&byte) {
                    self.data.clear();
                    return Event::None;
                }

                self.data.push(byte);
                if self.data.len() < FILE_START_MARKER.len() {
                    return Event::None;
                }

                trace!("part headers skipped, payload starting");
                self.data.clear();
                self.phase = ParserPhase::ReadingPayload;
                Event::FileStreamStarting
            }
            ParserPhase::ReadingPayload => {
                let expected = self.boundary.get(self.data.len());
                self.data.push(byte);

                if expected != Some(byte) {
                    self.data_available = true;
                    return Event::DataBufferAvailable;
                }

                if self.data.len() < self.boundary.len() {
                    return Event::None;
                }

                trace!("closing boundary matched, payload complete");
                self.data.clear();
                self.phase = ParserPhase::Eof;
                Event::DataStreamCompleted
            }
            ParserPhase::Eof => Event::None,
        }
    }

    /// The payload bytes announced by the last [`Event::DataBufferAvailable`].
    ///
    /// The content is only meaningful right after that event.
    pub fn data(&self) -> &[u8] {
        if self.data_available {
            self.data.as_slice()
        } else {
            &[]
        }
    }

    pub fn data_len(&self) -> usize {
        self.data().len()
    }

    /// Returns `true` once the closing boundary has been seen.
    pub fn is_file_received(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn phase(&self) -> ParserPhase {
        self.phase
    }

    /// The full delimiter, `"\r\n--"` followed by the boundary token, once a
    /// boundary line has been confirmed.
    pub fn boundary(&self) -> Option<&[u8]> {
        if self.phase.is_scanning_preamble() {
            None
        } else {
            Some(self.boundary.as_slice())
        }
    }

    /// Returns the extractor to its initial state so it can be reused for a new stream.
    pub fn reset(&mut self) {
        *self = Self::empty();
    }

    fn abandon_boundary(&mut self) {
        self.boundary.clear();
        self.data.clear();
        self.phase = ParserPhase::SkipLine;
    }
}

impl<const CAP: usize> Default for StreamExtractor<CAP> {
    fn default() -> Self {
        Self::empty()
    }
}
