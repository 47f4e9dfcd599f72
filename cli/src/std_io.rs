use std::io::Read;

use embedded_io::ErrorType;

/// Lets the parser pull from anything implementing [`std::io::Read`].
pub struct StdReader<R> {
    inner: R,
}

impl<R: Read> StdReader<R> {
    pub fn new(inner: R) -> Self {
        StdReader { inner }
    }
}

impl<R> ErrorType for StdReader<R> {
    type Error = std::io::Error;
}

impl<R: Read> embedded_io::Read for StdReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        loop {
            match self.inner.read(buf) {
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                result => return result,
            }
        }
    }
}
