use crate::constants;

/// Represents size limits applied while extracting a payload, to keep a
/// misbehaving client from streaming forever.
///
/// # Examples
///
/// ```
/// use multer_extract::SizeLimit;
///
/// // Read at most 1 MiB of request, and keep at most 512 KiB of payload.
/// let limit = SizeLimit::new().whole_stream(1024 * 1024).payload(512 * 1024);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimit {
    pub(crate) whole_stream: u64,
    pub(crate) payload: u64,
}

impl SizeLimit {
    /// Creates a default size limit which is [`u64::MAX`] for the whole
    /// stream and for the payload.
    pub fn new() -> SizeLimit {
        SizeLimit::default()
    }

    /// Sets the limit for the number of bytes read from the source, preamble
    /// and part headers included.
    pub fn whole_stream(mut self, limit: u64) -> SizeLimit {
        self.whole_stream = limit;
        self
    }

    /// Sets the limit for the number of payload bytes handed out.
    pub fn payload(mut self, limit: u64) -> SizeLimit {
        self.payload = limit;
        self
    }

    pub(crate) fn check_whole_stream(&self, consumed: u64) -> crate::Result<()> {
        if consumed > self.whole_stream {
            return Err(crate::Error::StreamSizeExceeded {
                limit: self.whole_stream,
            });
        }
        Ok(())
    }

    pub(crate) fn check_payload(&self, received: u64) -> crate::Result<()> {
        if received > self.payload {
            return Err(crate::Error::PayloadSizeExceeded { limit: self.payload });
        }
        Ok(())
    }
}

impl Default for SizeLimit {
    fn default() -> Self {
        SizeLimit {
            whole_stream: constants::DEFAULT_WHOLE_STREAM_SIZE_LIMIT,
            payload: constants::DEFAULT_PAYLOAD_SIZE_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unbounded() {
        let limit = SizeLimit::new();
        assert_eq!(limit.check_whole_stream(u64::MAX), Ok(()));
        assert_eq!(limit.check_payload(u64::MAX), Ok(()));
    }

    #[test]
    fn test_limits() {
        let limit = SizeLimit::new().whole_stream(100).payload(10);

        assert_eq!(limit.check_whole_stream(100), Ok(()));
        assert_eq!(
            limit.check_whole_stream(101),
            Err(crate::Error::StreamSizeExceeded { limit: 100 })
        );

        assert_eq!(limit.check_payload(10), Ok(()));
        assert_eq!(
            limit.check_payload(11),
            Err(crate::Error::PayloadSizeExceeded { limit: 10 })
        );
    }
}
