use std::io::{ErrorKind, Read, Write};

use crate::buffer::BoundedBuffer;
use crate::constants::{READ_CHUNK_SIZE, WRITE_CHUNK_SIZE};
use crate::{Event, StreamExtractor};

/// Copies the payload of the first part of a `multipart/form-data` stream
/// from `reader` to `writer`, returning the number of payload bytes written.
///
/// Reading stops as soon as the payload is complete; whatever follows in
/// `reader` is left unread, apart from what was already pulled into the
/// fixed-size stack buffer. No heap memory is used.
///
/// Payload chunks are gathered in a second stack buffer and handed to
/// `writer` only when it fills up, when the payload completes, or when
/// `reader` ends early, so an unbuffered `writer` sees few large writes.
///
/// # Examples
///
/// ```
/// let body = "--X-BOUNDARY\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\n\r\nabcd\r\n--X-BOUNDARY--\r\n";
///
/// let mut payload = Vec::new();
/// let written = multer_extract::copy_payload(body.as_bytes(), &mut payload).unwrap();
///
/// assert_eq!(written, 4);
/// assert_eq!(payload, b"abcd");
/// ```
pub fn copy_payload<R: Read, W: Write>(mut reader: R, mut writer: W) -> crate::Result<u64> {
    let mut extractor = StreamExtractor::new();
    let mut buf = [0u8; READ_CHUNK_SIZE];
    let mut out = BoundedBuffer::<WRITE_CHUNK_SIZE>::new();
    let mut written = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(crate::Error::StreamReadFailed(err.into())),
        };

        for &byte in &buf[..n] {
            match extractor.process(byte) {
                Event::DataBufferAvailable => {
                    let data = extractor.data();
                    if !out.extend_from_slice(data) {
                        write_out(&mut writer, &mut out)?;
                        if !out.extend_from_slice(data) {
                            writer.write_all(data).map_err(crate::Error::WriteFailed)?;
                        }
                    }
                    written += data.len() as u64;
                }
                Event::DataStreamCompleted => {
                    write_out(&mut writer, &mut out)?;
                    writer.flush().map_err(crate::Error::WriteFailed)?;
                    debug!("payload of {} bytes copied", written);
                    return Ok(written);
                }
                Event::Error => return Err(crate::Error::CorruptedStream),
                Event::None | Event::FileStreamFound | Event::FileStreamStarting => {}
            }
        }
    }

    debug!("reader ended in phase {:?}", extractor.phase());

    if extractor.phase().is_scanning_preamble() {
        Err(crate::Error::BoundaryNotFound)
    } else {
        write_out(&mut writer, &mut out)?;
        writer.flush().map_err(crate::Error::WriteFailed)?;
        Err(crate::Error::IncompleteStream)
    }
}

fn write_out<W: Write, const N: usize>(writer: &mut W, out: &mut BoundedBuffer<N>) -> crate::Result<()> {
    if out.len() > 0 {
        writer.write_all(out.as_slice()).map_err(crate::Error::WriteFailed)?;
        out.clear();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Hands out one byte per read and interrupts every other call.
    struct Trickle<'a> {
        data: &'a [u8],
        interrupt: bool,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::new(ErrorKind::Interrupted, "interrupted"));
            }
            if self.data.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.data[0];
            self.data = &self.data[1..];
            Ok(1)
        }
    }

    /// Records every `write` call it receives.
    #[derive(Default)]
    struct CountingWriter {
        data: Vec<u8>,
        writes: usize,
    }

    impl Write for CountingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_copy_from_trickling_reader() {
        let reader = Trickle {
            data: b"POST /upload HTTP/1.1\r\nContent-Type: multipart/form-data; boundary=abc\r\n\r\n--abc\r\nContent-Disposition: form-data; name=\"f\"\r\n\r\n\x00\x01\r\n\x02\r\n--abc--\r\n",
            interrupt: false,
        };

        let mut out = Vec::new();
        assert_eq!(copy_payload(reader, &mut out), Ok(5));
        assert_eq!(out, b"\x00\x01\r\n\x02");
    }

    #[test]
    fn test_copy_large_payload() {
        let payload: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let mut body = b"--LARGE\r\nContent-Type: application/octet-stream\r\n\r\n".to_vec();
        body.extend_from_slice(&payload);
        body.extend_from_slice(b"\r\n--LARGE--\r\n");

        let mut out = Vec::new();
        assert_eq!(copy_payload(&body[..], &mut out), Ok(payload.len() as u64));
        assert_eq!(out, payload);
    }

    #[test]
    fn test_payload_writes_are_batched() {
        let payload: Vec<u8> = (0..10_000u32).map(|i| (i % 199) as u8).collect();
        let mut body = b"--BATCH\r\n\r\n".to_vec();
        body.extend_from_slice(&payload);
        body.extend_from_slice(b"\r\n--BATCH--\r\n");

        let reader = Trickle {
            data: &body,
            interrupt: false,
        };
        let mut writer = CountingWriter::default();
        assert_eq!(copy_payload(reader, &mut writer), Ok(payload.len() as u64));

        assert_eq!(writer.data, payload);
        assert!(writer.writes > 1);
        assert!(writer.writes <= payload.len() / (WRITE_CHUNK_SIZE / 2) + 1);
    }

    #[test]
    fn test_missing_boundary() {
        let mut out = Vec::new();
        assert_eq!(
            copy_payload(&b"just some text\r\nwith lines\r\n"[..], &mut out),
            Err(crate::Error::BoundaryNotFound)
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_truncated_payload() {
        let mut out = Vec::new();
        assert_eq!(
            copy_payload(&b"--abc\r\n\r\npartial data\r\n--ab"[..], &mut out),
            Err(crate::Error::IncompleteStream)
        );
        assert_eq!(out, b"partial data");
    }

    #[test]
    fn test_write_failure() {
        let result = copy_payload(&b"--abc\r\n\r\ndata\r\n--abc--"[..], BrokenPipe);
        assert!(matches!(result, Err(crate::Error::WriteFailed(_))));
    }
}
