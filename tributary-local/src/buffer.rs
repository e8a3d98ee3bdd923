/// Bytes read from a file but not yet carved into records.
#[derive(Debug, Default, Clone)]
pub struct ByteBuffer {
    buf: Vec<u8>,
    pos: usize,
}

impl ByteBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn append(&mut self, bytes: &[u8]) {
        if self.pos > 0 && self.pos == self.buf.len() {
            self.clear();
        }
        self.buf.extend_from_slice(bytes);
    }

    /// Number of unconsumed bytes.
    pub fn size(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// The unconsumed bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[self.pos..]
    }

    /// Position of the first `byte`, relative to the unconsumed bytes.
    pub fn find(&self, byte: u8) -> Option<usize> {
        self.as_slice().iter().position(|b| *b == byte)
    }

    /// Take the first `size` bytes.
    ///
    /// # Panics
    ///
    /// Panics if there are fewer than `size` bytes.
    pub fn consume(&mut self, size: usize) -> Vec<u8> {
        assert!(
            size <= self.size(),
            "Not enough bytes: consuming {}, only got {}",
            size,
            self.size()
        );
        let bytes = self.buf[self.pos..self.pos + size].to_vec();
        self.pos += size;
        if self.pos == self.buf.len() {
            self.clear();
        } else if self.pos >= self.buf.len() / 2 {
            self.buf.drain(..self.pos);
            self.pos = 0;
        }
        bytes
    }

    pub fn clear(&mut self) {
        self.buf.clear();
        self.pos = 0;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_byte_buffer() {
        let mut buffer = ByteBuffer::new();
        assert!(buffer.is_empty());
        buffer.append(b"hello\nwor");
        assert_eq!(buffer.size(), 9);
        assert_eq!(buffer.find(b'\n'), Some(5));
        assert_eq!(buffer.consume(6), b"hello\n");
        assert_eq!(buffer.size(), 3);
        assert_eq!(buffer.find(b'\n'), None);
        buffer.append(b"ld\n");
        assert_eq!(buffer.as_slice(), b"world\n");
        assert_eq!(buffer.consume(6), b"world\n");
        assert!(buffer.is_empty());
        assert_eq!(buffer.consume(0), b"");
    }

    #[test]
    #[should_panic]
    fn test_consume_too_much() {
        let mut buffer = ByteBuffer::new();
        buffer.append(b"abc");
        buffer.consume(4);
    }
}
