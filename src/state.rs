/// The phase a [`StreamExtractor`](crate::StreamExtractor) is in.
///
/// Phases only ever move forward, except for the boundary capture phases
/// which fall back to [`SkipLine`](ParserPhase::SkipLine) when a candidate
/// boundary line turns out to be invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParserPhase {
    /// Nothing received yet.
    Initial,
    /// Discarding the rest of a line which can't start a boundary.
    SkipLine,
    /// A carriage return was seen while searching for a boundary line.
    SawCr,
    /// A line feed was seen while searching for a boundary line.
    SawLf,
    /// The first hyphen of a boundary line was seen.
    SawHyphen,
    /// Collecting the boundary token.
    CapturingBoundary,
    /// The boundary token ended with a carriage return, a line feed is expected.
    ConfirmingBoundary,
    /// Discarding the part headers up to the blank line.
    SkippingHeaders,
    /// Emitting payload while looking out for the boundary.
    ReadingPayload,
    /// The payload has been received completely.
    Eof,
}

impl ParserPhase {
    /// Returns `true` until a boundary line has been confirmed.
    pub fn is_scanning_preamble(self) -> bool {
        matches!(
            self,
            ParserPhase::Initial
                | ParserPhase::SkipLine
                | ParserPhase::SawCr
                | ParserPhase::SawLf
                | ParserPhase::SawHyphen
                | ParserPhase::CapturingBoundary
                | ParserPhase::ConfirmingBoundary
        )
    }

    pub fn is_terminal(self) -> bool {
        self == ParserPhase::Eof
    }
}

impl Default for ParserPhase {
    fn default() -> Self {
        ParserPhase::Initial
    }
}
