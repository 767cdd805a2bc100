/*!
# CDDB Query: Library

This crate is a small, synchronous client for the line-oriented CDDB protocol
(CDDBP). Given the geometry of an audio CD, it computes the disc's CDDB ID,
asks a remote server for the matching entry, and parses the album and track
titles out of the reply.

```no_run
use cddbq::{
	DiscGeometry,
	KillSwitch,
	LookupOptions,
	Msf,
	QueryDescriptor,
};

let geometry = DiscGeometry::new(
	vec![Msf::new(0, 2, 0).unwrap(), Msf::new(3, 14, 52).unwrap()],
	Msf::new(7, 40, 11).unwrap(),
).unwrap();
let query = QueryDescriptor::try_from(&geometry).unwrap();

let opts = LookupOptions::default().with_verbose(true);
let info = query.lookup(&opts, &KillSwitch::default()).unwrap();
println!("{:?}", info.entry().disc_title());
```
*/

#![deny(unsafe_code)]

#![warn(
	clippy::filetype_is_file,
	clippy::integer_division,
	clippy::needless_borrow,
	clippy::nursery,
	clippy::pedantic,
	clippy::perf,
	clippy::suboptimal_flops,
	clippy::unneeded_field_pattern,
	macro_use_extern_crate,
	missing_copy_implementations,
	missing_debug_implementations,
	missing_docs,
	non_ascii_idents,
	trivial_casts,
	trivial_numeric_casts,
	unreachable_pub,
	unused_crate_dependencies,
	unused_extern_crates,
	unused_import_braces,
)]

#![allow(
	clippy::doc_markdown,
	clippy::module_name_repetitions,
	clippy::redundant_pub_crate,
)]

mod abort;
mod conn;
mod entry;
mod error;
mod geometry;
mod line;
mod lookup;
mod opts;
mod query;
mod report;
mod response;
mod sanitize;
mod session;

pub use abort::KillSwitch;
pub(crate) use conn::Connection;
pub use entry::{
	EntryResult,
	parse_entry,
};
pub use error::CddbError;
pub use geometry::{
	DiscGeometry,
	Msf,
};
pub use line::LineReader;
pub use lookup::DiscInfo;
pub use opts::{
	CddbServer,
	LookupOptions,
};
pub use query::QueryDescriptor;
pub use report::DiscReport;
pub(crate) use response::Response;
pub use sanitize::{
	alternate_filename,
	generic_filename,
	to_filename,
};
pub use session::{
	Session,
	SessionState,
	Step,
};



/// # Client Name.
///
/// This is sent to the server as part of the handshake.
pub const CLIENT_NAME: &str = "cddbq";

/// # Client Version.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// # Default Server Host.
pub const DEFAULT_HOST: &str = "gnudb.gnudb.org";

/// # Default Server Port.
///
/// This is the conventional CDDBP port.
pub const DEFAULT_PORT: u16 = 8880;

/// # Frames Per Second.
///
/// Audio CD addresses are measured in 1/75 second frames (sectors).
pub const FRAMES_PER_SECOND: u32 = 75;

/// # Lead-in Seconds.
///
/// All discs have a 2-second region at the start before any data. The CDDB
/// disc length includes it.
pub const LEADIN_SECONDS: u32 = 2;

/// # Maximum Line Length.
///
/// The protocol's documented maximum line length, terminator included.
pub const MAX_LINE_LENGTH: usize = 256;

/// # Maximum Negotiation Attempts.
///
/// The number of "no handshake" (409) responses tolerated before giving up.
pub const MAX_NEGOTIATIONS: u8 = 5;

/// # Maximum Title Length.
///
/// Disc and track titles longer than this (in characters) are truncated.
pub const MAX_TITLE_LENGTH: usize = 79;

/// # Maximum Tracks.
pub const MAX_TRACKS: usize = 99;

/// # Maximum Filename Length.
pub const MAX_FILENAME_LENGTH: usize = 255;

/// # Maximum Filename Dupes.
///
/// The most alternate names `alternate_filename` will hand out.
pub const MAX_FILENAME_DUPES: u8 = 10;
