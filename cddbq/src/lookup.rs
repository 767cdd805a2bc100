/*!
# CDDB Query: Lookup
*/

use crate::{
	CddbError,
	Connection,
	EntryResult,
	generic_filename,
	KillSwitch,
	LineReader,
	LookupOptions,
	MAX_FILENAME_LENGTH,
	parse_entry,
	QueryDescriptor,
	Session,
	session::send_command,
	Step,
	to_filename,
};
use fyi_msg::Msg;
use std::io::{
	Read,
	Write,
};



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Disc Information.
///
/// The result of a successful lookup: where the server filed the disc, and
/// the titles it has for it.
pub struct DiscInfo {
	category: String,
	disc_id: String,
	entry: EntryResult,
}

impl DiscInfo {
	/// # New.
	pub(crate) const fn new(category: String, disc_id: String, entry: EntryResult) -> Self {
		Self { category, disc_id, entry }
	}

	#[must_use]
	/// # Category.
	///
	/// The server's genre bucket for the disc, e.g. `rock`.
	pub fn category(&self) -> &str { &self.category }

	#[must_use]
	/// # Disc ID.
	///
	/// This is the ID the server returned, which may not match the one
	/// computed locally.
	pub fn disc_id(&self) -> &str { &self.disc_id }

	#[must_use]
	/// # Entry.
	pub const fn entry(&self) -> &EntryResult { &self.entry }

	#[allow(clippy::cast_possible_truncation)] // Tracks max out at 99.
	/// # Track Filenames.
	///
	/// Return a `<disc>-<NN>-<track>.wav` filename for each track, built from
	/// the sanitized titles. If the entry has no disc title, generic
	/// `track-NN.wav` names are returned instead.
	///
	/// ## Errors
	///
	/// This will return an error if any of the names would be longer than
	/// 255 bytes.
	pub fn track_filenames(&self) -> Result<Vec<String>, CddbError> {
		let titles = self.entry.track_titles();
		let Some(disc) = self.entry.disc_title() else {
			return Ok((1..=titles.len()).map(|n| generic_filename(n as u8)).collect());
		};

		let disc = to_filename(disc, true);
		titles.iter()
			.enumerate()
			.map(|(idx, title)| {
				let num = (idx + 1) as u8;
				let name = format!("{disc}-{num:02}-{}.wav", to_filename(title, false));
				if MAX_FILENAME_LENGTH < name.len() { Err(CddbError::FilenameLength(num)) }
				else { Ok(name) }
			})
			.collect()
	}
}



impl QueryDescriptor {
	/// # Lookup.
	///
	/// Connect to the server, run through the handshake, query, and read,
	/// and return the parsed entry.
	///
	/// The connection is always closed before returning. If things ended on
	/// speaking terms, a `quit` is sent first.
	///
	/// The lookup as a whole is bounded by `LookupOptions::timeout`. Flipping
	/// the kill switch from another thread ends it early.
	///
	/// ## Errors
	///
	/// Any connection, protocol, or parsing failure is returned as an error.
	/// There are no partial results.
	pub fn lookup(&self, opts: &LookupOptions, killed: &KillSwitch)
	-> Result<DiscInfo, CddbError> {
		let verbose = opts.verbose();
		if verbose {
			Msg::info(format!("Looking up disc {} at {}.", self.disc_id(), opts.server()))
				.eprint();
		}

		let conn = Connection::connect(opts.server(), opts.timeout(), killed.clone())?;
		let mut reader = LineReader::new(conn);
		let mut session = Session::new(opts.hello(), self.query_string());

		let res = exchange(&mut reader, &mut session, self.track_count(), verbose)
			.map_err(|e|
				if e == CddbError::Timeout && killed.killed() { CddbError::Killed }
				else { e }
			);

		let quit = match &res {
			Ok(_) => true,
			Err(e) => e.graceful(),
		};
		reader.into_inner().terminate(quit);

		if verbose {
			if let Ok(info) = &res {
				Msg::success(format!(
					"Found {} {}: {}",
					info.category(),
					info.disc_id(),
					info.entry().disc_title().unwrap_or("(untitled)"),
				)).eprint();
			}
		}

		res
	}
}



/// # Exchange.
///
/// Drive the session over an open stream until the entry has been parsed or
/// something goes wrong. The stream is left open either way.
pub(crate) fn exchange<S: Read + Write>(
	reader: &mut LineReader<S>,
	session: &mut Session,
	track_count: usize,
	verbose: bool,
) -> Result<DiscInfo, CddbError> {
	let mut line = Vec::new();
	loop {
		if 0 == reader.read_line(&mut line)? { return Err(CddbError::PrematureClose); }

		match session.handle(&line) {
			Step::Ignore => {},
			Step::Send(cmd) => {
				if verbose { Msg::custom("CDDB", 199, &cmd).eprint(); }
				send_command(reader.get_mut(), &cmd)?;
			},
			Step::Renegotiate => {
				if verbose {
					Msg::warning(format!(
						"The server wants a new handshake (attempt #{}).",
						session.attempts(),
					)).eprint();
				}
				let cmd = session.restart();
				send_command(reader.get_mut(), &cmd)?;
			},
			Step::Entry => {
				let entry = parse_entry(reader, track_count)?;
				return Ok(DiscInfo::new(
					session.category().unwrap_or_default().to_owned(),
					session.disc_id().unwrap_or_default().to_owned(),
					entry,
				));
			},
			Step::Fail(e) => {
				if verbose && e == CddbError::NoMatch && line.starts_with(b"211") {
					Msg::warning("The server only has inexact matches, which are not supported.")
						.eprint();
				}
				return Err(e);
			},
		}
	}
}
