mod reader;
mod slice;

pub use reader::BufReaderSource;
pub use slice::SliceSource;

/// A pull source of single bytes for the
/// [`JsonParser`](crate::JsonParser).
///
/// The parser never peeks and never puts bytes back; when it has to replay a
/// byte it keeps its own copy. Implementations only need to hand out the
/// next byte or report that the stream has ended.
pub trait ByteSource {
    /// Return the next byte, `Ok(None)` at the end of the stream, or an I/O
    /// error. Once `Ok(None)` has been returned, subsequent calls must keep
    /// returning `Ok(None)`.
    fn read_byte(&mut self) -> std::io::Result<Option<u8>>;
}
