/*!
# CDDB Query: Entry Parser
*/

use crate::{
	CddbError,
	LineReader,
	MAX_TITLE_LENGTH,
	MAX_TRACKS,
};
use dactyl::traits::BytesToUnsigned;
use std::io::Read;
use trimothy::TrimSliceMatches;



#[derive(Debug, Clone, Default, Eq, PartialEq)]
/// # Entry Result.
///
/// The titles parsed from a CDDB entry. Every track is guaranteed to have
/// exactly one title, though it may be empty.
pub struct EntryResult {
	disc_title: Option<String>,
	track_titles: Vec<String>,
}

impl EntryResult {
	#[must_use]
	/// # Disc Title.
	///
	/// By convention this is `Artist / Album`.
	pub fn disc_title(&self) -> Option<&str> { self.disc_title.as_deref() }

	#[must_use]
	/// # Track Title.
	///
	/// Note: `idx` is zero-based.
	pub fn track_title(&self, idx: usize) -> Option<&str> {
		self.track_titles.get(idx).map(String::as_str)
	}

	#[must_use]
	/// # Track Titles.
	pub fn track_titles(&self) -> &[String] { &self.track_titles }
}



#[allow(clippy::cast_possible_truncation)] // Checked.
/// # Parse Entry.
///
/// Read the body of a `210` response up to and including the lone `.`
/// terminator, collecting the disc title (`DTITLE=`) and the track titles
/// (`TTITLE<n>=`, zero-indexed). Everything else is ignored.
///
/// If the disc title appears more than once, the last one wins. Titles are
/// capped at 79 characters.
///
/// ## Errors
///
/// This will return an error if `track_count` is zero or more than 99, if a
/// track title is out of range or repeated, if any tracks are left untitled,
/// or if the stream ends or fails before the terminator is reached.
pub fn parse_entry<R: Read>(reader: &mut LineReader<R>, track_count: usize)
-> Result<EntryResult, CddbError> {
	if track_count == 0 { return Err(CddbError::InvalidGeometry("no tracks")); }
	if MAX_TRACKS < track_count {
		return Err(CddbError::InvalidGeometry("too many tracks"));
	}

	let count = track_count as u8;
	let mut disc_title = None;
	let mut tracks: Vec<Option<String>> = vec![None; track_count];

	let mut line = Vec::new();
	loop {
		if 0 == reader.read_line(&mut line)? { return Err(CddbError::PrematureClose); }
		let raw = line.trim_end_matches(|b| b == b'\r' || b == b'\n');
		if raw == b"." { break; }

		if let Some(rest) = raw.strip_prefix(b"DTITLE=") {
			if ! rest.is_empty() { disc_title = Some(title(rest)); }
		}
		else if let Some(rest) = raw.strip_prefix(b"TTITLE") {
			let Some(eq) = rest.iter().position(|&b| b == b'=') else { continue; };
			let num = &rest[..eq];
			if num.is_empty() || ! num.iter().all(u8::is_ascii_digit) { continue; }

			// Numbers too big to parse are still out of range.
			let idx = u16::btou(num).map_or(usize::MAX, usize::from);

			let slot = tracks.get_mut(idx).ok_or(CddbError::TooManyTitles(count))?;
			if slot.is_some() { return Err(CddbError::DuplicateTitle(idx as u8)); }
			*slot = Some(title(&rest[eq + 1..]));
		}
	}

	let returned = tracks.iter().filter(|t| t.is_some()).count();
	if returned < track_count {
		return Err(CddbError::TooFewTitles(count, returned as u8));
	}

	Ok(EntryResult {
		disc_title,
		track_titles: tracks.into_iter().flatten().collect(),
	})
}

/// # Title.
///
/// Copy up to `MAX_TITLE_LENGTH` characters, stopping at any stray line
/// break.
fn title(src: &[u8]) -> String {
	let end = src.iter().position(|&b| b == b'\r' || b == b'\n').unwrap_or(src.len());
	String::from_utf8_lossy(&src[..end]).chars().take(MAX_TITLE_LENGTH).collect()
}



#[cfg(test)]
mod test {
	use super::*;
	use std::io::Cursor;

	/// # Parse From Bytes.
	fn parse(raw: &[u8], track_count: usize) -> Result<EntryResult, CddbError> {
		let mut reader = LineReader::new(Cursor::new(raw.to_vec()));
		parse_entry(&mut reader, track_count)
	}

	#[test]
	fn t_entry() {
		let entry = parse(
			b"# xmcd\r\nDTITLE=Artist / Album\r\nTTITLE0=One\r\nTTITLE1=Two\r\nEXTD=\r\n.\r\n",
			2,
		).expect("Entry failed.");
		assert_eq!(entry.disc_title(), Some("Artist / Album"));
		assert_eq!(entry.track_titles(), ["One", "Two"]);
		assert_eq!(entry.track_title(1), Some("Two"));
		assert_eq!(entry.track_title(2), None);
	}

	#[test]
	fn t_entry_quirks() {
		// Out of order, empty titles, a repeated disc title, and a bare LF.
		let entry = parse(
			b"DTITLE=First\r\nTTITLE1=Two\nTTITLE0=\r\nDTITLE=\r\nDTITLE=Second\r\n.\n",
			2,
		).expect("Entry failed.");
		assert_eq!(entry.disc_title(), Some("Second"));
		assert_eq!(entry.track_titles(), ["", "Two"]);

		// No disc title at all is fine.
		let entry = parse(b"TTITLE0=Solo\r\n.\r\n", 1).expect("Entry failed.");
		assert_eq!(entry.disc_title(), None);

		// Long titles get cut.
		let raw = format!("TTITLE0={}\r\n.\r\n", "x".repeat(100));
		let entry = parse(raw.as_bytes(), 1).expect("Entry failed.");
		assert_eq!(entry.track_titles()[0].len(), MAX_TITLE_LENGTH);

		// Junk after the terminator is left alone.
		let mut reader = LineReader::new(Cursor::new(b"TTITLE0=A\r\n.\r\n201 more\r\n".to_vec()));
		assert!(parse_entry(&mut reader, 1).is_ok(), "Entry failed.");
		let mut line = Vec::new();
		assert_eq!(reader.read_line(&mut line), Ok(10));
	}

	#[test]
	fn t_entry_errors() {
		assert_eq!(
			parse(b"DTITLE=A / B\r\nTTITLE0=One\r\nTTITLE1=Two\r\n.\r\n", 3),
			Err(CddbError::TooFewTitles(3, 2)),
		);
		assert_eq!(
			parse(b"TTITLE0=One\r\nTTITLE1=Two\r\n.\r\n", 1),
			Err(CddbError::TooManyTitles(1)),
		);
		assert_eq!(
			parse(b"TTITLE0=One\r\nTTITLE0=Uno\r\n.\r\n", 2),
			Err(CddbError::DuplicateTitle(0)),
		);
		assert_eq!(
			parse(b"TTITLE0=One\r\nTTITLE1=Two\r\nTTITLE70000=Three\r\n.\r\n", 2),
			Err(CddbError::TooManyTitles(2)),
		);
		assert_eq!(
			parse(b"DTITLE=A / B\r\nTTITLE0=One\r\n", 1),
			Err(CddbError::PrematureClose),
		);

		// Non-numeric indices are just noise.
		let entry = parse(b"TTITLEx=Huh\r\nTTITLE=Huh\r\nTTITLE0=One\r\n.\r\n", 1)
			.expect("Entry failed.");
		assert_eq!(entry.track_titles(), ["One"]);

		// Track counts have to make sense.
		assert_eq!(parse(b".\r\n", 0), Err(CddbError::InvalidGeometry("no tracks")));
		assert_eq!(
			parse(b".\r\n", 300),
			Err(CddbError::InvalidGeometry("too many tracks")),
		);
	}

	#[test]
	fn t_entry_read_error() {
		/// # Broken Stream.
		///
		/// Hand over the data, then fail instead of ending cleanly.
		struct Broken(Cursor<Vec<u8>>);

		impl Read for Broken {
			fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
				let out = self.0.read(buf)?;
				if out == 0 { Err(std::io::ErrorKind::ConnectionReset.into()) }
				else { Ok(out) }
			}
		}

		let mut reader = LineReader::new(Broken(Cursor::new(b"TTITLE0=One\r\n".to_vec())));
		assert_eq!(parse_entry(&mut reader, 1), Err(CddbError::Read));
	}
}
