/// A byte accumulator with a fixed, inline capacity of `N` bytes.
///
/// Appending to a full buffer fails and leaves the content untouched; the
/// buffer never truncates and never grows.
#[derive(Clone)]
pub(crate) struct BoundedBuffer<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> BoundedBuffer<N> {
    pub(crate) const fn new() -> Self {
        BoundedBuffer { buf: [0; N], len: 0 }
    }

    /// Appends a byte, returning `false` if the buffer is already full.
    pub(crate) fn push(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }

        self.buf[self.len] = byte;
        self.len += 1;
        true
    }

    /// Appends all of `bytes` or nothing at all.
    pub(crate) fn extend_from_slice(&mut self, bytes: &[u8]) -> bool {
        let end = self.len + bytes.len();
        if end > N {
            return false;
        }

        self.buf[self.len..end].copy_from_slice(bytes);
        self.len = end;
        true
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    pub(crate) fn get(&self, idx: usize) -> Option<u8> {
        self.as_slice().get(idx).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_full(&self) -> bool {
        self.len == N
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl<const N: usize> std::fmt::Debug for BoundedBuffer<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundedBuffer")
            .field("capacity", &N)
            .field("content", &self.as_slice())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_until_full() {
        let mut buf = BoundedBuffer::<3>::new();
        assert_eq!(buf.len(), 0);

        assert!(buf.push(b'a'));
        assert!(buf.push(b'b'));
        assert!(buf.push(b'c'));
        assert!(buf.is_full());

        assert!(!buf.push(b'd'));
        assert_eq!(buf.as_slice(), b"abc");
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_extend_is_all_or_nothing() {
        let mut buf = BoundedBuffer::<6>::new();
        assert!(buf.extend_from_slice(b"\r\n--"));
        assert!(!buf.extend_from_slice(b"abc"));
        assert_eq!(buf.as_slice(), b"\r\n--");

        assert!(buf.extend_from_slice(b"ab"));
        assert_eq!(buf.as_slice(), b"\r\n--ab");
    }

    #[test]
    fn test_clear_and_get() {
        let mut buf = BoundedBuffer::<4>::new();
        buf.extend_from_slice(b"xyz");
        assert_eq!(buf.get(0), Some(b'x'));
        assert_eq!(buf.get(2), Some(b'z'));
        assert_eq!(buf.get(3), None);

        buf.clear();
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.get(0), None);
        assert_eq!(buf.as_slice(), b"");
    }
}
