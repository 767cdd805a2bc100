/*!
# CDDB Query: Session
*/

use crate::{
	CddbError,
	MAX_LINE_LENGTH,
	MAX_NEGOTIATIONS,
	Response,
	response::code,
};
use std::io::Write;



/// # Maximum Category Length.
const MAX_CATEGORY_LENGTH: usize = 24;

/// # Maximum Disc ID Length.
const MAX_DISC_ID_LENGTH: usize = 8;



#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
/// # Session State.
///
/// What the session is waiting on. Progress is strictly forward, except for
/// the (bounded) return to `Connecting` when the server asks for a new
/// handshake.
pub enum SessionState {
	/// # Waiting for the server banner.
	Connecting,

	/// # Waiting for the handshake reply.
	HelloSent,

	/// # Waiting for the query reply.
	QuerySent,

	/// # Waiting for the read reply.
	ReadSent,
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Session Step.
///
/// The outcome of feeding one server line to `Session::handle`.
pub enum Step {
	/// # Nothing to do; read the next line.
	Ignore,

	/// # Send this command (sans line terminator).
	Send(String),

	/// # Start over with a new handshake.
	///
	/// The caller should follow up with `Session::restart`.
	Renegotiate,

	/// # The entry body follows.
	Entry,

	/// # Give up.
	Fail(CddbError),
}



#[derive(Debug, Clone)]
/// # Session.
///
/// This is the CDDBP conversation, minus the actual I/O: each server line is
/// passed to `Session::handle`, which updates the state and says what to do
/// next.
///
/// ```
/// use cddbq::{Session, SessionState, Step};
///
/// let mut session = Session::new(
///     "cddb hello josh box.local cddbq 0.1.0",
///     "cddb query 00011301 1 0 275",
/// );
/// assert_eq!(
///     session.handle(b"201 localhost CDDBP server ready.\r\n"),
///     Step::Send("cddb hello josh box.local cddbq 0.1.0".to_owned()),
/// );
/// assert_eq!(session.state(), SessionState::HelloSent);
/// ```
pub struct Session {
	state: SessionState,
	attempts: u8,
	hello: String,
	query: String,
	category: String,
	disc_id: String,
}

impl Session {
	#[must_use]
	/// # New.
	///
	/// Both commands should be passed without line terminators.
	pub fn new<S1, S2>(hello: S1, query: S2) -> Self
	where S1: Into<String>, S2: Into<String> {
		Self {
			state: SessionState::Connecting,
			attempts: 1,
			hello: hello.into(),
			query: query.into(),
			category: String::new(),
			disc_id: String::new(),
		}
	}

	/// # Handle Line.
	///
	/// Feed a single line from the server (terminator included) through the
	/// state machine.
	///
	/// Lines without a leading response code are ignored, but lines without
	/// a newline are not; they are the sign of a truncated or overlong
	/// response.
	pub fn handle(&mut self, line: &[u8]) -> Step {
		if line.last() != Some(&b'\n') { return Step::Fail(CddbError::Malformed); }
		let Some(res) = Response::parse(line) else { return Step::Ignore; };

		match (self.state, res.code()) {
			// Banner.
			(SessionState::Connecting, code::OK | code::OK_READ_ONLY) => {
				self.state = SessionState::HelloSent;
				Step::Send(self.hello.clone())
			},
			(
				SessionState::Connecting,
				c @ (code::DENIED | code::TOO_MANY_USERS | code::LOAD_TOO_HIGH)
			) => Step::Fail(CddbError::Negotiation(c)),

			// Handshake. A 402 here means we already shook hands, which is
			// fine too.
			(SessionState::HelloSent, code::OK | code::ALREADY_OR_ERROR) => {
				self.state = SessionState::QuerySent;
				Step::Send(self.query.clone())
			},
			(SessionState::HelloSent, code::HANDSHAKE_FAILED) =>
				Step::Fail(CddbError::Negotiation(code::HANDSHAKE_FAILED)),

			// Query.
			(SessionState::QuerySent, code::OK) => {
				let mut parts = res.text()
					.split(u8::is_ascii_whitespace)
					.filter(|p| ! p.is_empty());
				let (Some(category), Some(disc_id)) = (parts.next(), parts.next())
				else { return Step::Fail(CddbError::Malformed); };

				self.category = field(category, MAX_CATEGORY_LENGTH);
				self.disc_id = field(disc_id, MAX_DISC_ID_LENGTH);
				self.state = SessionState::ReadSent;
				Step::Send(format!("cddb read {} {}", self.category, self.disc_id))
			},
			(SessionState::QuerySent, code::NO_MATCH | code::INEXACT) =>
				Step::Fail(CddbError::NoMatch),
			(SessionState::QuerySent | SessionState::ReadSent, code::CORRUPT) =>
				Step::Fail(CddbError::Corrupt),

			// Read.
			(SessionState::ReadSent, code::ENTRY_FOLLOWS) => Step::Entry,
			(SessionState::ReadSent, code::NOT_FOUND) => Step::Fail(CddbError::NotFound),
			(SessionState::ReadSent, code::ALREADY_OR_ERROR) =>
				Step::Fail(CddbError::ServerError),

			// Start over, within reason.
			(SessionState::QuerySent | SessionState::ReadSent, code::NO_HANDSHAKE) =>
				if MAX_NEGOTIATIONS < self.attempts {
					Step::Fail(CddbError::Negotiation(code::NO_HANDSHAKE))
				}
				else {
					self.attempts += 1;
					self.state = SessionState::Connecting;
					Step::Renegotiate
				},

			(_, c) => Step::Fail(CddbError::Protocol(c)),
		}
	}

	/// # Restart.
	///
	/// Return the handshake command and move to `SessionState::HelloSent`.
	/// This should be called (and the command sent) right after a
	/// `Step::Renegotiate`; the server does not repeat its banner.
	///
	/// Skipping the banner wait is intentional. Servers send the banner
	/// once per connection, so waiting for another after a 409 would only
	/// end in a timeout.
	pub fn restart(&mut self) -> String {
		self.state = SessionState::HelloSent;
		self.hello.clone()
	}
}

impl Session {
	#[must_use]
	/// # Negotiation Attempt.
	///
	/// This starts at one and goes up with each renegotiation.
	pub const fn attempts(&self) -> u8 { self.attempts }

	#[must_use]
	/// # Category.
	///
	/// The category from the server's query reply, if it has been received.
	pub fn category(&self) -> Option<&str> {
		if self.category.is_empty() { None }
		else { Some(&self.category) }
	}

	#[must_use]
	/// # Disc ID.
	///
	/// The disc ID from the server's query reply, if it has been received.
	/// This is taken verbatim, and may differ from the locally computed one.
	pub fn disc_id(&self) -> Option<&str> {
		if self.disc_id.is_empty() { None }
		else { Some(&self.disc_id) }
	}

	#[must_use]
	/// # State.
	pub const fn state(&self) -> SessionState { self.state }
}



/// # Send Command.
///
/// Write a command, adding the CRLF terminator.
///
/// ## Errors
///
/// Commands that would exceed the protocol's line limit are refused; write
/// failures are returned as `Send` errors, or `Timeout` if the connection
/// ran out of time.
pub(crate) fn send_command<W: Write>(writer: &mut W, command: &str)
-> Result<(), CddbError> {
	if MAX_LINE_LENGTH < command.len() + 2 { return Err(CddbError::QueryLength); }

	let mut buf = Vec::with_capacity(command.len() + 2);
	buf.extend_from_slice(command.as_bytes());
	buf.extend_from_slice(b"\r\n");

	writer.write_all(&buf)
		.and_then(|()| writer.flush())
		.map_err(|e|
			if e.kind() == std::io::ErrorKind::TimedOut { CddbError::Timeout }
			else { CddbError::Send }
		)
}

/// # Reply Field.
///
/// Copy up to `max` bytes of a reply token.
fn field(src: &[u8], max: usize) -> String {
	String::from_utf8_lossy(&src[..src.len().min(max)]).into_owned()
}



#[cfg(test)]
mod test {
	use super::*;

	const HELLO: &str = "cddb hello josh box.local cddbq 0.1.0";
	const QUERY: &str = "cddb query 00011301 1 0 275";

	/// # Session Through Query.
	fn queried() -> Session {
		let mut session = Session::new(HELLO, QUERY);
		assert_eq!(session.handle(b"200 ready\r\n"), Step::Send(HELLO.to_owned()));
		assert_eq!(session.handle(b"200 hello and welcome\r\n"), Step::Send(QUERY.to_owned()));
		assert_eq!(session.state(), SessionState::QuerySent);
		session
	}

	#[test]
	fn t_happy() {
		let mut session = queried();
		assert_eq!(
			session.handle(b"200 rock 0a0b0c0d Artist / Album\r\n"),
			Step::Send("cddb read rock 0a0b0c0d".to_owned()),
		);
		assert_eq!(session.state(), SessionState::ReadSent);
		assert_eq!(session.category(), Some("rock"));
		assert_eq!(session.disc_id(), Some("0a0b0c0d"));
		assert_eq!(session.handle(b"210 rock 0a0b0c0d CD database entry follows\r\n"), Step::Entry);
	}

	#[test]
	fn t_read_only() {
		// A 201 banner and a 402 handshake reply are both fine.
		let mut session = Session::new(HELLO, QUERY);
		assert_eq!(session.handle(b"201 read only\r\n"), Step::Send(HELLO.to_owned()));
		assert_eq!(session.handle(b"402 already shook hands\r\n"), Step::Send(QUERY.to_owned()));
	}

	#[test]
	fn t_truncate() {
		let mut session = queried();
		assert_eq!(
			session.handle(b"200 abcdefghijklmnopqrstuvwxyz 0123456789abcdef Title\r\n"),
			Step::Send("cddb read abcdefghijklmnopqrstuvwx 01234567".to_owned()),
		);
	}

	#[test]
	fn t_ignore() {
		let mut session = Session::new(HELLO, QUERY);
		assert_eq!(session.handle(b"Welcome to the server!\r\n"), Step::Ignore);
		assert_eq!(session.handle(b"\r\n"), Step::Ignore);
		assert_eq!(session.state(), SessionState::Connecting);

		// No newline, though, is a problem.
		assert_eq!(session.handle(b"200 ready"), Step::Fail(CddbError::Malformed));
	}

	#[test]
	fn t_rejections() {
		for c in [432_u16, 433, 434] {
			let mut session = Session::new(HELLO, QUERY);
			let line = format!("{c} go away\r\n");
			assert_eq!(session.handle(line.as_bytes()), Step::Fail(CddbError::Negotiation(c)));
		}

		let mut session = Session::new(HELLO, QUERY);
		session.handle(b"200 ready\r\n");
		assert_eq!(
			session.handle(b"431 no\r\n"),
			Step::Fail(CddbError::Negotiation(431)),
		);

		for (line, err) in [
			("202 no match\r\n", CddbError::NoMatch),
			("211 close matches follow\r\n", CddbError::NoMatch),
			("403 corrupt\r\n", CddbError::Corrupt),
			("200 rock\r\n", CddbError::Malformed),
			("500 what\r\n", CddbError::Protocol(500)),
		] {
			let mut session = queried();
			assert_eq!(session.handle(line.as_bytes()), Step::Fail(err), "Wrong result for {line:?}.");
		}

		for (line, err) in [
			("401 not found\r\n", CddbError::NotFound),
			("402 server error\r\n", CddbError::ServerError),
			("403 corrupt\r\n", CddbError::Corrupt),
			("200 huh\r\n", CddbError::Protocol(200)),
		] {
			let mut session = queried();
			session.handle(b"200 rock 0a0b0c0d Artist / Album\r\n");
			assert_eq!(session.handle(line.as_bytes()), Step::Fail(err), "Wrong result for {line:?}.");
		}
	}

	#[test]
	fn t_renegotiate() {
		let mut session = queried();
		assert_eq!(session.attempts(), 1);
		assert_eq!(session.handle(b"409 no handshake\r\n"), Step::Renegotiate);
		assert_eq!(session.state(), SessionState::Connecting);
		assert_eq!(session.attempts(), 2);

		// The restart goes straight to the handshake.
		assert_eq!(session.restart(), HELLO);
		assert_eq!(session.state(), SessionState::HelloSent);

		// Four more are allowed.
		for attempt in 3..=6 {
			assert_eq!(session.handle(b"200 hello\r\n"), Step::Send(QUERY.to_owned()));
			assert_eq!(session.handle(b"409 no handshake\r\n"), Step::Renegotiate);
			assert_eq!(session.attempts(), attempt);
			session.restart();
		}

		// But not a sixth.
		assert_eq!(session.handle(b"200 hello\r\n"), Step::Send(QUERY.to_owned()));
		assert_eq!(
			session.handle(b"409 no handshake\r\n"),
			Step::Fail(CddbError::Negotiation(409)),
		);
		assert_eq!(session.attempts(), 6);
	}

	#[test]
	fn t_renegotiate_read() {
		let mut session = queried();
		session.handle(b"200 rock 0a0b0c0d Artist / Album\r\n");
		assert_eq!(session.state(), SessionState::ReadSent);

		assert_eq!(session.handle(b"409 no handshake\r\n"), Step::Renegotiate);
		assert_eq!(session.state(), SessionState::Connecting);
		assert_eq!(session.attempts(), 2);
	}

	#[test]
	fn t_send_command() {
		let mut out = Vec::new();
		send_command(&mut out, QUERY).expect("Send failed.");
		assert_eq!(out, format!("{QUERY}\r\n").as_bytes());

		// 254 + CRLF fits; 255 doesn't.
		out.clear();
		assert!(send_command(&mut out, &"a".repeat(254)).is_ok(), "Command should fit.");
		assert_eq!(out.len(), MAX_LINE_LENGTH);
		assert_eq!(send_command(&mut out, &"a".repeat(255)), Err(CddbError::QueryLength));
	}
}
