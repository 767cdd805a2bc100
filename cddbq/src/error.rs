/*!
# CDDB Query: Errors
*/

use fyi_msg::Msg;
use std::{
	error::Error,
	fmt,
};



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Errors.
pub enum CddbError {
	/// # Unable to connect.
	Connect(String),

	/// # Database entry is corrupt (403).
	Corrupt,

	/// # Duplicate track title.
	DuplicateTitle(u8),

	/// # Filename too long.
	FilenameLength(u8),

	/// # Invalid disc geometry.
	InvalidGeometry(&'static str),

	/// # User abort.
	Killed,

	/// # Malformed server response.
	Malformed,

	/// # Negotiation failed.
	///
	/// This holds the response code that killed it: one of the handshake
	/// denials, or 409 if renegotiation was attempted too many times.
	Negotiation(u16),

	/// # No match found (202 or 211).
	NoMatch,

	/// # Entry not found (401).
	NotFound,

	/// # Remote end closed the connection early.
	PrematureClose,

	/// # Unexpected response code.
	Protocol(u16),

	/// # Command too long.
	QueryLength,

	/// # Socket read error.
	Read,

	/// # Hostname/IP lookup failed.
	Resolution(String),

	/// # Socket write error.
	Send,

	/// # Invalid server (host:port).
	Server(String),

	/// # Server error (402 in response to a read).
	ServerError,

	/// # Timed out.
	Timeout,

	/// # Too few titles returned (expected, returned).
	TooFewTitles(u8, u8),

	/// # Too many titles returned.
	TooManyTitles(u8),

	/// # Writing to disk.
	Write(String),
}

impl Error for CddbError {}

impl From<CddbError> for Msg {
	#[inline]
	fn from(src: CddbError) -> Self { Self::error(src.to_string()) }
}

impl fmt::Display for CddbError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Connect(s) => write!(f, "Unable to connect to CDDB server {s}."),
			Self::Corrupt => f.write_str("The database entry is corrupt."),
			Self::DuplicateTitle(n) => write!(f, "Track #{} was titled more than once.", u16::from(*n) + 1),
			Self::FilenameLength(n) => write!(f, "Maximum filename length exceeded for track #{n}."),
			Self::InvalidGeometry(s) => write!(f, "Invalid disc geometry: {s}."),
			Self::Killed => f.write_str("User abort."),
			Self::Malformed => f.write_str("Malformed server response."),
			Self::Negotiation(409) => f.write_str("Too many renegotiation attempts."),
			Self::Negotiation(n) => write!(f, "Session negotiation failed ({n})."),
			Self::NoMatch => f.write_str("No match found."),
			Self::NotFound => f.write_str("The specified CDDB entry was not found."),
			Self::PrematureClose => f.write_str("Session terminated prematurely."),
			Self::Protocol(n) => write!(f, "Unknown server response ({n})."),
			Self::QueryLength => f.write_str("The query string exceeds the maximum line length."),
			Self::Read => f.write_str("Error reading from socket."),
			Self::Resolution(s) => write!(f, "Hostname/IP lookup failed for {s}."),
			Self::Send => f.write_str("Error writing to socket."),
			Self::Server(s) => write!(f, "Invalid CDDB server {s}; expected hostname:port."),
			Self::ServerError => f.write_str("Server error."),
			Self::Timeout => f.write_str("The CDDB server took too long to respond."),
			Self::TooFewTitles(e, r) => write!(f, "Too few titles returned ({e} expected, {r} returned)."),
			Self::TooManyTitles(e) => write!(f, "Too many titles returned ({e} expected)."),
			Self::Write(s) => write!(f, "Unable to write to {s}."),
		}
	}
}

impl CddbError {
	#[must_use]
	/// # Say Goodbye?
	///
	/// Returns `true` if the session reached a clean protocol state before
	/// failing, in which case the `quit` command should be sent before the
	/// connection is closed.
	///
	/// Transport failures, early closes, and the handshake rejections all end
	/// abruptly.
	pub const fn graceful(&self) -> bool {
		match self {
			Self::Negotiation(n) => *n == 409,
			Self::Corrupt |
			Self::DuplicateTitle(_) |
			Self::Malformed |
			Self::NoMatch |
			Self::NotFound |
			Self::Protocol(_) |
			Self::QueryLength |
			Self::ServerError |
			Self::TooFewTitles(_, _) |
			Self::TooManyTitles(_) => true,
			_ => false,
		}
	}
}



#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn t_graceful() {
		assert!(CddbError::Negotiation(409).graceful(), "Renegotiation limit should quit.");
		for code in [431, 432, 433, 434] {
			assert!(
				! CddbError::Negotiation(code).graceful(),
				"Handshake rejection {code} should not quit.",
			);
		}
		assert!(CddbError::NoMatch.graceful(), "No match should quit.");
		assert!(CddbError::TooFewTitles(3, 2).graceful(), "Short entries should quit.");
		assert!(! CddbError::Read.graceful(), "Read errors should not quit.");
		assert!(! CddbError::PrematureClose.graceful(), "Early closes should not quit.");
		assert!(! CddbError::Timeout.graceful(), "Timeouts should not quit.");
	}

	#[test]
	fn t_display() {
		assert_eq!(
			CddbError::TooFewTitles(3, 2).to_string(),
			"Too few titles returned (3 expected, 2 returned).",
		);
		assert_eq!(
			CddbError::Negotiation(409).to_string(),
			"Too many renegotiation attempts.",
		);
		assert_eq!(
			CddbError::DuplicateTitle(0).to_string(),
			"Track #1 was titled more than once.",
		);
	}
}
