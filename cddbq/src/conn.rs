/*!
# CDDB Query: Connection
*/

use crate::{
	CddbError,
	CddbServer,
	KillSwitch,
};
use std::{
	io::{
		self,
		ErrorKind,
		Read,
		Write,
	},
	net::{
		IpAddr,
		Shutdown,
		SocketAddr,
		TcpStream,
		ToSocketAddrs,
	},
	time::{
		Duration,
		Instant,
	},
};



/// # Read Poll Interval.
///
/// Blocking reads are sliced into chunks this long so the deadline and kill
/// switch get checked regularly.
const POLL: Duration = Duration::from_millis(250);

/// # Quit Timeout.
const QUIT_TIMEOUT: Duration = Duration::from_secs(1);



#[derive(Debug)]
/// # Connection.
///
/// A TCP stream to a CDDB server with an overall deadline. Reads and writes
/// fail with `ErrorKind::TimedOut` once the deadline passes or the kill
/// switch is flipped.
pub(crate) struct Connection {
	stream: TcpStream,
	deadline: Instant,
	killed: KillSwitch,
}

impl Connection {
	/// # Connect.
	///
	/// The host is tried as a literal IP address first, then resolved by
	/// name, taking the first address returned.
	///
	/// ## Errors
	///
	/// This will return an error if the host cannot be resolved or the
	/// connection cannot be established in time.
	pub(crate) fn connect(server: &CddbServer, timeout: Duration, killed: KillSwitch)
	-> Result<Self, CddbError> {
		if killed.killed() { return Err(CddbError::Killed); }
		let deadline = Instant::now() + timeout;

		let addr = resolve(server)?;
		let stream = TcpStream::connect_timeout(&addr, timeout)
			.map_err(|_| CddbError::Connect(server.to_string()))?;

		Ok(Self { stream, deadline, killed })
	}

	/// # Remaining Time.
	///
	/// Return the time left before the deadline, or a `TimedOut` error if
	/// there is none (or the kill switch has been flipped).
	fn remaining(&self) -> io::Result<Duration> {
		if self.killed.killed() { return Err(ErrorKind::TimedOut.into()); }
		self.deadline.checked_duration_since(Instant::now())
			.filter(|d| ! d.is_zero())
			.ok_or_else(|| ErrorKind::TimedOut.into())
	}

	/// # Terminate.
	///
	/// Optionally say goodbye, then shut the socket down. Errors are ignored;
	/// there is nothing useful to do about them at this point.
	pub(crate) fn terminate(mut self, quit: bool) {
		if quit {
			let _res = self.stream.set_write_timeout(Some(QUIT_TIMEOUT));
			let _res = self.stream.write_all(b"quit\r\n")
				.and_then(|()| self.stream.flush());
		}
		let _res = self.stream.shutdown(Shutdown::Both);
	}
}

impl Read for Connection {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		loop {
			let remaining = self.remaining()?;
			self.stream.set_read_timeout(Some(remaining.min(POLL)))?;
			match self.stream.read(buf) {
				Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {},
				res => return res,
			}
		}
	}
}

impl Write for Connection {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		let remaining = self.remaining()?;
		self.stream.set_write_timeout(Some(remaining))?;
		self.stream.write(buf)
	}

	fn flush(&mut self) -> io::Result<()> { self.stream.flush() }
}



/// # Resolve Server.
fn resolve(server: &CddbServer) -> Result<SocketAddr, CddbError> {
	if let Ok(ip) = server.host().parse::<IpAddr>() {
		return Ok(SocketAddr::new(ip, server.port()));
	}

	(server.host(), server.port()).to_socket_addrs()
		.ok()
		.and_then(|mut addrs| addrs.next())
		.ok_or_else(|| CddbError::Resolution(server.host().to_owned()))
}



#[cfg(test)]
mod test {
	use super::*;
	use std::net::TcpListener;

	#[test]
	fn t_resolve() {
		let server = CddbServer::new("127.0.0.1", 8880).expect("Server failed.");
		assert_eq!(
			resolve(&server),
			Ok(SocketAddr::from(([127, 0, 0, 1], 8880))),
		);

		let server = CddbServer::new("::1", 8880).expect("Server failed.");
		assert!(
			resolve(&server).is_ok_and(|a| a.is_ipv6()),
			"IPv6 literals should not need a lookup.",
		);

		let server = CddbServer::new("nowhere.invalid", 8880).expect("Server failed.");
		assert_eq!(
			resolve(&server),
			Err(CddbError::Resolution("nowhere.invalid".to_owned())),
		);
	}

	#[test]
	fn t_deadline() {
		// A server that accepts but never talks.
		let listener = TcpListener::bind("127.0.0.1:0").expect("Bind failed.");
		let port = listener.local_addr().expect("Missing address.").port();
		let server = CddbServer::new("127.0.0.1", port).expect("Server failed.");

		let mut conn = Connection::connect(&server, Duration::from_millis(600), KillSwitch::default())
			.expect("Connection failed.");
		let _peer = listener.accept().expect("Accept failed.");

		let now = Instant::now();
		let mut buf = [0_u8; 16];
		let err = conn.read(&mut buf).expect_err("Read should have timed out.");
		assert_eq!(err.kind(), ErrorKind::TimedOut);
		assert!(Duration::from_millis(500) <= now.elapsed(), "Read gave up too early.");
		conn.terminate(false);
	}

	#[test]
	fn t_killed() {
		let listener = TcpListener::bind("127.0.0.1:0").expect("Bind failed.");
		let port = listener.local_addr().expect("Missing address.").port();
		let server = CddbServer::new("127.0.0.1", port).expect("Server failed.");

		let killed = KillSwitch::default();
		let mut conn = Connection::connect(&server, Duration::from_secs(60), killed.clone())
			.expect("Connection failed.");
		let (mut peer, _) = listener.accept().expect("Accept failed.");

		killed.kill();
		let mut buf = [0_u8; 16];
		let err = conn.read(&mut buf).expect_err("Read should have been killed.");
		assert_eq!(err.kind(), ErrorKind::TimedOut);

		// Quit is best-effort, but should still make it over the wire.
		conn.terminate(true);
		let mut sent = Vec::new();
		peer.read_to_end(&mut sent).expect("Peer read failed.");
		assert_eq!(sent, b"quit\r\n");

		// New connections shouldn't even be attempted.
		assert_eq!(
			Connection::connect(&server, Duration::from_secs(1), killed).map(|_| ()),
			Err(CddbError::Killed),
		);
	}
}
