/*!
# CDDB Query: Server Responses
*/

use dactyl::traits::BytesToUnsigned;
use trimothy::TrimSliceMatches;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Server Response.
///
/// A single status line from the server: a numeric code followed by free
/// text. The line terminator is not included in the text.
pub(crate) struct Response<'a> {
	code: u16,
	text: &'a [u8],
}

impl<'a> Response<'a> {
	/// # Parse.
	///
	/// Pull the leading numeric code off a line, returning `None` if there
	/// isn't one.
	pub(crate) fn parse(line: &'a [u8]) -> Option<Self> {
		let line = line.trim_end_matches(|b| b == b'\r' || b == b'\n');
		let end = line.iter().position(|b| ! b.is_ascii_digit()).unwrap_or(line.len());
		if end == 0 { return None; }
		let code = u16::btou(&line[..end])?;
		Some(Self {
			code,
			text: line[end..].trim_start_matches(|b| b == b' ' || b == b'\t'),
		})
	}

	/// # Code.
	pub(crate) const fn code(self) -> u16 { self.code }

	/// # Text.
	pub(crate) const fn text(self) -> &'a [u8] { self.text }
}



/// # Response Codes.
///
/// Only the codes this client actually acts on are named here.
pub(crate) mod code {
	/// # OK (read/write), handshake OK, or exact match.
	pub(crate) const OK: u16 = 200;

	/// # OK, read only.
	pub(crate) const OK_READ_ONLY: u16 = 201;

	/// # No match found.
	pub(crate) const NO_MATCH: u16 = 202;

	/// # Entry follows.
	pub(crate) const ENTRY_FOLLOWS: u16 = 210;

	/// # Inexact matches follow.
	pub(crate) const INEXACT: u16 = 211;

	/// # Entry not found.
	pub(crate) const NOT_FOUND: u16 = 401;

	/// # Already shook hands, or server error (depending on context).
	pub(crate) const ALREADY_OR_ERROR: u16 = 402;

	/// # Database entry is corrupt.
	pub(crate) const CORRUPT: u16 = 403;

	/// # No handshake.
	pub(crate) const NO_HANDSHAKE: u16 = 409;

	/// # Handshake not successful.
	pub(crate) const HANDSHAKE_FAILED: u16 = 431;

	/// # No connections allowed: permission denied.
	pub(crate) const DENIED: u16 = 432;

	/// # No connections allowed: too many users.
	pub(crate) const TOO_MANY_USERS: u16 = 433;

	/// # No connections allowed: system load too high.
	pub(crate) const LOAD_TOO_HIGH: u16 = 434;
}
