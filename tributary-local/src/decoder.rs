use crate::ByteBuffer;

/// Carves records out of the raw bytes of a stream file.
///
/// A decoder sees the bytes of one file at a time, in order. It is reset between files by
/// calling [`RecordDecoder::flush`].
pub trait RecordDecoder: Send + 'static {
    /// Take the next complete record off the front of `buffer`, if there is one.
    /// Incomplete data must be left in the buffer.
    fn decode(&mut self, buffer: &mut ByteBuffer) -> Option<Vec<u8>>;

    /// The file has ended; turn whatever is left into a final record, if it is one.
    fn flush(&mut self, buffer: &mut ByteBuffer) -> Option<Vec<u8>>;
}

#[derive(Debug, Default, Clone, Copy)]
/// Newline delimited records. A trailing `\r` is stripped, and so is the delimiter.
///
/// A partial last line is held back while the file may still grow, and is only
/// delivered once the reader moves on to the next file.
pub struct LineDecoder;

impl LineDecoder {
    fn trim(mut line: Vec<u8>) -> Vec<u8> {
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        line
    }
}

impl RecordDecoder for LineDecoder {
    fn decode(&mut self, buffer: &mut ByteBuffer) -> Option<Vec<u8>> {
        let end = buffer.find(b'\n')?;
        Some(Self::trim(buffer.consume(end + 1)))
    }

    fn flush(&mut self, buffer: &mut ByteBuffer) -> Option<Vec<u8>> {
        if buffer.is_empty() {
            return None;
        }
        let size = buffer.size();
        Some(Self::trim(buffer.consume(size)))
    }
}
