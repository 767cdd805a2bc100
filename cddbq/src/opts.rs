/*!
# CDDB Query: Lookup Options
*/

use crate::{
	CddbError,
	CLIENT_NAME,
	CLIENT_VERSION,
	DEFAULT_HOST,
	DEFAULT_PORT,
};
use dactyl::traits::BytesToUnsigned;
use std::{
	fmt,
	time::Duration,
};



/// # Default Timeout (seconds).
const TIMEOUT_DEFAULT: u64 = 30;

/// # Minimum Timeout (seconds).
const TIMEOUT_MIN: u64 = 1;

/// # Maximum Timeout (seconds).
const TIMEOUT_MAX: u64 = 600;

/// # Fallback Username.
const UNKNOWN_USER: &str = "unknown";

/// # Fallback Hostname.
const UNKNOWN_HOST: &str = "unknown.hostname";



#[derive(Debug, Clone, Eq, PartialEq)]
/// # CDDB Server.
///
/// A host (name or IP) and port.
///
/// ```
/// use cddbq::CddbServer;
///
/// let server = CddbServer::try_from("freedb.example.com:8880").unwrap();
/// assert_eq!(server.host(), "freedb.example.com");
/// assert_eq!(server.port(), 8880);
///
/// // Ports are required, and must be non-zero.
/// assert!(CddbServer::try_from("freedb.example.com").is_err());
/// assert!(CddbServer::try_from("freedb.example.com:0").is_err());
/// ```
pub struct CddbServer {
	host: String,
	port: u16,
}

impl Default for CddbServer {
	fn default() -> Self {
		Self {
			host: DEFAULT_HOST.to_owned(),
			port: DEFAULT_PORT,
		}
	}
}

impl fmt::Display for CddbServer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		// Bracket IPv6 literals so the port stays unambiguous.
		if self.host.contains(':') { write!(f, "[{}]:{}", self.host, self.port) }
		else { write!(f, "{}:{}", self.host, self.port) }
	}
}

impl TryFrom<&str> for CddbServer {
	type Error = CddbError;

	fn try_from(src: &str) -> Result<Self, Self::Error> {
		let src = src.trim();
		let err = || CddbError::Server(src.to_owned());

		// Split on the last colon so IPv6 literals survive.
		let (host, port) = src.rsplit_once(':').ok_or_else(err)?;
		let host = host.trim().trim_start_matches('[').trim_end_matches(']');
		let port = u16::btou(port.trim().as_bytes()).ok_or_else(err)?;

		Self::new(host, port).map_err(|_| err())
	}
}

impl CddbServer {
	/// # New.
	///
	/// ## Errors
	///
	/// This will return an error if the host is empty or contains whitespace,
	/// or the port is zero.
	pub fn new<S>(host: S, port: u16) -> Result<Self, CddbError>
	where S: AsRef<str> {
		let host = host.as_ref();
		if host.is_empty() || host.contains(char::is_whitespace) || port == 0 {
			Err(CddbError::Server(format!("{host}:{port}")))
		}
		else { Ok(Self { host: host.to_owned(), port }) }
	}

	#[must_use]
	/// # Host.
	pub fn host(&self) -> &str { &self.host }

	#[must_use]
	/// # Port.
	pub const fn port(&self) -> u16 { self.port }
}



#[derive(Debug, Clone)]
/// # Lookup Options.
///
/// This holds the connection and handshake settings for a lookup.
///
/// Options are set using builder-style methods, like:
///
/// ```
/// use cddbq::{CddbServer, LookupOptions};
/// use std::time::Duration;
///
/// let opts = LookupOptions::default()
///     .with_server(CddbServer::new("127.0.0.1", 8880).unwrap())
///     .with_timeout(Duration::from_secs(10))
///     .with_user("josh");
///
/// assert_eq!(opts.server().to_string(), "127.0.0.1:8880");
/// assert_eq!(opts.timeout(), Duration::from_secs(10));
/// assert_eq!(opts.user(), "josh");
/// ```
pub struct LookupOptions {
	server: CddbServer,
	timeout: Duration,
	user: String,
	hostname: String,
	client: String,
	version: String,
	verbose: bool,
}

impl Default for LookupOptions {
	fn default() -> Self {
		Self {
			server: CddbServer::default(),
			timeout: Duration::from_secs(TIMEOUT_DEFAULT),
			user: detect_user(),
			hostname: detect_hostname(),
			client: CLIENT_NAME.to_owned(),
			version: CLIENT_VERSION.to_owned(),
			verbose: false,
		}
	}
}

/// ## Setters.
impl LookupOptions {
	#[must_use]
	/// # Client Name and Version.
	///
	/// These are announced to the server during the handshake. Empty values
	/// or values containing whitespace are ignored.
	///
	/// The defaults are this crate's name and version.
	pub fn with_client<S1, S2>(mut self, client: S1, version: S2) -> Self
	where S1: AsRef<str>, S2: AsRef<str> {
		if let Some(client) = token(client.as_ref()) { self.client = client; }
		if let Some(version) = token(version.as_ref()) { self.version = version; }
		self
	}

	#[must_use]
	/// # Local Hostname.
	///
	/// The hostname announced during the handshake. Empty values or values
	/// containing whitespace revert to a generic placeholder.
	///
	/// The default is detected from the environment.
	pub fn with_hostname<S>(mut self, hostname: S) -> Self
	where S: AsRef<str> {
		self.hostname = token(hostname.as_ref())
			.unwrap_or_else(|| UNKNOWN_HOST.to_owned());
		self
	}

	#[must_use]
	/// # Server.
	///
	/// The default is `gnudb.gnudb.org:8880`.
	pub fn with_server(mut self, server: CddbServer) -> Self {
		self.server = server;
		self
	}

	#[must_use]
	/// # Timeout.
	///
	/// The maximum amount of time the whole lookup, connection included, may
	/// take. Values are capped to `1..=600` seconds, with a default of
	/// `30`.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout.clamp(
			Duration::from_secs(TIMEOUT_MIN),
			Duration::from_secs(TIMEOUT_MAX),
		);
		self
	}

	#[must_use]
	/// # Username.
	///
	/// The username announced during the handshake. Empty values or values
	/// containing whitespace revert to `unknown`.
	///
	/// The default is detected from the environment.
	pub fn with_user<S>(mut self, user: S) -> Self
	where S: AsRef<str> {
		self.user = token(user.as_ref()).unwrap_or_else(|| UNKNOWN_USER.to_owned());
		self
	}

	#[must_use]
	/// # Verbose.
	///
	/// When `true`, progress notes are printed to STDERR.
	///
	/// The default is `false`.
	pub fn with_verbose(mut self, verbose: bool) -> Self {
		self.verbose = verbose;
		self
	}
}

/// ## Getters.
impl LookupOptions {
	#[must_use]
	/// # Client Name.
	pub fn client(&self) -> &str { &self.client }

	#[must_use]
	/// # Handshake Command.
	///
	/// Return the `cddb hello` command, sans line terminator.
	pub fn hello(&self) -> String {
		format!(
			"cddb hello {} {} {} {}",
			self.user,
			self.hostname,
			self.client,
			self.version,
		)
	}

	#[must_use]
	/// # Local Hostname.
	pub fn hostname(&self) -> &str { &self.hostname }

	#[must_use]
	/// # Server.
	pub const fn server(&self) -> &CddbServer { &self.server }

	#[must_use]
	/// # Timeout.
	pub const fn timeout(&self) -> Duration { self.timeout }

	#[must_use]
	/// # Username.
	pub fn user(&self) -> &str { &self.user }

	#[must_use]
	/// # Verbose?
	pub const fn verbose(&self) -> bool { self.verbose }

	#[must_use]
	/// # Client Version.
	pub fn version(&self) -> &str { &self.version }
}



/// # Detect Hostname.
fn detect_hostname() -> String {
	std::env::var("HOSTNAME").ok()
		.and_then(|v| token(&v))
		.or_else(|| {
			let raw = std::fs::read_to_string("/etc/hostname").ok()?;
			token(&raw)
		})
		.unwrap_or_else(|| UNKNOWN_HOST.to_owned())
}

/// # Detect Username.
fn detect_user() -> String {
	["USER", "LOGNAME", "USERNAME"].into_iter()
		.find_map(|k| std::env::var(k).ok().and_then(|v| token(&v)))
		.unwrap_or_else(|| UNKNOWN_USER.to_owned())
}

/// # Protocol Token.
///
/// Handshake values are space-separated, so each must be a single non-empty
/// word.
fn token(src: &str) -> Option<String> {
	let src = src.trim();
	if src.is_empty() || src.contains(char::is_whitespace) { None }
	else { Some(src.to_owned()) }
}



#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn t_server() {
		for (raw, host, port) in [
			("localhost:8880", "localhost", 8880),
			(" 10.0.0.1 : 888 ", "10.0.0.1", 888),
			("[::1]:8880", "::1", 8880),
			("gnudb.gnudb.org:65535", "gnudb.gnudb.org", 65535),
		] {
			let server = CddbServer::try_from(raw)
				.unwrap_or_else(|_| panic!("Server failed: {raw}"));
			assert_eq!(server.host(), host, "Wrong host for {raw}.");
			assert_eq!(server.port(), port, "Wrong port for {raw}.");
		}

		for raw in [
			"localhost",
			":8880",
			"localhost:",
			"localhost:0",
			"localhost:65536",
			"localhost:-1",
			"local host:8880",
		] {
			assert!(CddbServer::try_from(raw).is_err(), "Server should have failed: {raw}");
		}

		assert_eq!(
			CddbServer::new("::1", 8880).expect("Server failed.").to_string(),
			"[::1]:8880",
		);
	}

	#[test]
	fn t_hello() {
		let opts = LookupOptions::default()
			.with_user("josh")
			.with_hostname("box.local")
			.with_client("Tester", "1.2.3");
		assert_eq!(opts.hello(), "cddb hello josh box.local Tester 1.2.3");

		// Bad values fall back to placeholders.
		let opts = opts.with_user("").with_hostname("two words");
		assert_eq!(opts.hello(), "cddb hello unknown unknown.hostname Tester 1.2.3");

		// Bad client values are ignored.
		let opts = opts.with_client("", "1 2");
		assert_eq!(opts.client(), "Tester");
		assert_eq!(opts.version(), "1.2.3");
	}

	#[test]
	fn t_timeout() {
		let opts = LookupOptions::default();
		assert_eq!(opts.timeout(), Duration::from_secs(TIMEOUT_DEFAULT));
		assert!(! opts.verbose(), "Verbose should be off by default.");
		assert_eq!(opts.server(), &CddbServer::default());

		let opts = opts.with_timeout(Duration::ZERO);
		assert_eq!(opts.timeout(), Duration::from_secs(TIMEOUT_MIN));
		let opts = opts.with_timeout(Duration::from_secs(100_000));
		assert_eq!(opts.timeout(), Duration::from_secs(TIMEOUT_MAX));
	}
}
