/// The delimiter prefix which precedes every boundary token inside a body.
pub const BOUNDARY_START_MARKER: &[u8] = b"\r\n--";

/// The blank line which separates a part's headers from its payload.
pub const FILE_START_MARKER: &[u8] = b"\r\n\r\n";

/// The longest boundary token permitted by RFC 2046.
pub const MAX_BOUNDARY_LEN: usize = 70;

/// Default capacity of the boundary and data buffers: room for the
/// [`BOUNDARY_START_MARKER`] plus a [`MAX_BOUNDARY_LEN`] token.
pub const DEFAULT_CAPACITY: usize = BOUNDARY_START_MARKER.len() + MAX_BOUNDARY_LEN;

pub(crate) const DEFAULT_WHOLE_STREAM_SIZE_LIMIT: u64 = u64::MAX;
pub(crate) const DEFAULT_PAYLOAD_SIZE_LIMIT: u64 = u64::MAX;

pub(crate) const CR: u8 = b'\r';
pub(crate) const LF: u8 = b'\n';
pub(crate) const HYPHEN: u8 = b'-';

/// Size of the stack buffer used by the blocking reader adapter.
pub(crate) const READ_CHUNK_SIZE: usize = 512;

/// Size of the stack buffer in which the blocking adapter gathers payload
/// chunks before writing them out.
pub(crate) const WRITE_CHUNK_SIZE: usize = 512;

pub(crate) fn is_boundary_char(byte: u8) -> bool {
    (0x20..=0x7e).contains(&byte)
}
