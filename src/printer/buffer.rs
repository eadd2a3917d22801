//! Output buffer.
//!
//! Append-only byte accumulator owned by one printer. Each builder call
//! appends one complete command sequence; [`OutputBuffer::take`] hands the
//! whole content over and leaves the buffer empty.

#[derive(Debug, Default, Clone)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn extend(&mut self, data: &[u8]) {
        self.bytes.extend_from_slice(data);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Extract everything appended so far, keeping the allocation.
    pub fn take(&mut self) -> Vec<u8> {
        self.bytes.split_off(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_clears() {
        let mut buf = OutputBuffer::new();
        buf.extend(&[0x1B, 0x40]);
        buf.extend(b"A");
        assert_eq!(buf.as_slice().len(), 3);
        assert_eq!(buf.take(), vec![0x1B, 0x40, b'A']);
        assert!(buf.as_slice().is_empty());
        assert!(buf.take().is_empty());
    }

    #[test]
    fn test_take_keeps_order_across_calls() {
        let mut buf = OutputBuffer::new();
        buf.extend(b"ab");
        assert_eq!(buf.take(), b"ab");
        buf.extend(b"cd");
        buf.extend(b"e");
        assert_eq!(buf.as_slice(), b"cde");
        assert_eq!(buf.take(), b"cde");
    }
}
