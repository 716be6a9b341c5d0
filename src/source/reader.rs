use std::io::{BufRead, BufReader, Read};

use super::ByteSource;

/// A [`ByteSource`] that reads from a [`BufReader`]. This is the source to
/// use when parsing JSON from a file or a network connection: the parser
/// consumes one byte at a time, and the reader's buffer keeps that from
/// turning into one syscall per byte.
pub struct BufReaderSource<'a, T>
where
    T: Read,
{
    reader: &'a mut BufReader<T>,
}

impl<'a, T> BufReaderSource<'a, T>
where
    T: Read,
{
    pub fn new(reader: &'a mut BufReader<T>) -> Self {
        BufReaderSource { reader }
    }
}

impl<'a, T> ByteSource for BufReaderSource<'a, T>
where
    T: Read,
{
    fn read_byte(&mut self) -> std::io::Result<Option<u8>> {
        let buf = self.reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(None);
        }
        let r = buf[0];
        self.reader.consume(1);
        Ok(Some(r))
    }
}
