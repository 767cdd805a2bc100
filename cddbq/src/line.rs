/*!
# CDDB Query: Line Reader
*/

use crate::{
	CddbError,
	MAX_LINE_LENGTH,
};
use std::io::{
	ErrorKind,
	Read,
};



#[derive(Debug)]
/// # Line Reader.
///
/// This wraps a connection (or any other byte stream), pulling data in chunks
/// of up to `MAX_LINE_LENGTH` bytes and handing it back one line at a time.
/// Whatever is left over from one chunk is kept for the next call, so there
/// should be exactly one reader per connection.
///
/// The reader owns the stream; use `LineReader::get_mut` to send commands
/// down the same pipe.
pub struct LineReader<R> {
	inner: R,
	buf: [u8; MAX_LINE_LENGTH],
	pos: usize,
	len: usize,
}

impl<R: Read> From<R> for LineReader<R> {
	#[inline]
	fn from(src: R) -> Self { Self::new(src) }
}

impl<R: Read> LineReader<R> {
	#[must_use]
	/// # New.
	pub const fn new(inner: R) -> Self {
		Self {
			inner,
			buf: [0; MAX_LINE_LENGTH],
			pos: 0,
			len: 0,
		}
	}

	/// # Read Line.
	///
	/// Clear `line`, then fill it with bytes up to and including the next
	/// `\n`, or until `MAX_LINE_LENGTH - 1` bytes have been collected,
	/// whichever comes first.
	///
	/// The number of bytes read is returned. Zero means the stream ended
	/// before anything could be read; a stream ending mid-line still returns
	/// the partial line.
	///
	/// ## Errors
	///
	/// Interrupted reads are retried. If the stream times out, `Timeout` is
	/// returned; any other failure is a `Read` error.
	pub fn read_line(&mut self, line: &mut Vec<u8>) -> Result<usize, CddbError> {
		line.clear();
		while line.len() < MAX_LINE_LENGTH - 1 {
			let Some(b) = self.next_byte()? else { break; };
			line.push(b);
			if b == b'\n' { break; }
		}
		Ok(line.len())
	}

	/// # Next Byte.
	///
	/// Return the next buffered byte, refilling the buffer first if it has
	/// run dry. `None` is returned at end-of-stream.
	fn next_byte(&mut self) -> Result<Option<u8>, CddbError> {
		if self.len <= self.pos {
			loop {
				match self.inner.read(&mut self.buf) {
					Ok(0) => return Ok(None),
					Ok(len) => {
						self.pos = 0;
						self.len = len;
						break;
					},
					Err(e) => match e.kind() {
						ErrorKind::Interrupted => {},
						ErrorKind::TimedOut | ErrorKind::WouldBlock => return Err(CddbError::Timeout),
						_ => return Err(CddbError::Read),
					},
				}
			}
		}

		let b = self.buf[self.pos];
		self.pos += 1;
		Ok(Some(b))
	}
}

impl<R> LineReader<R> {
	/// # Inner Stream (Mutable).
	pub fn get_mut(&mut self) -> &mut R { &mut self.inner }

	#[must_use]
	/// # Into Inner.
	///
	/// Return the wrapped stream, dropping any unread buffered data.
	pub fn into_inner(self) -> R { self.inner }
}
