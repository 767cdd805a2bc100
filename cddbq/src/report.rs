/*!
# CDDB Query: Disc Report
*/

use crate::{
	CddbError,
	CLIENT_NAME,
	CLIENT_VERSION,
	DiscInfo,
	QueryDescriptor,
};
use std::{
	fmt,
	path::Path,
};
use utc2k::FmtUtc2k;



#[derive(Debug, Clone)]
/// # Disc Report.
///
/// A plain-text summary of a lookup: the disc totals, the artist and album,
/// and one line per track with its filename, frame offset, play time, and
/// title.
///
/// Use `Display` to render it, or `DiscReport::save` to write it to disk.
pub struct DiscReport<'a> {
	query: &'a QueryDescriptor,
	info: &'a DiscInfo,
	filenames: Vec<String>,
	created: FmtUtc2k,
}

impl fmt::Display for DiscReport<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let (artist, album) = artist_album(self.info.entry().disc_title());

		writeln!(f, "# {CLIENT_NAME} v{CLIENT_VERSION} - CDDB disc information.")?;
		writeln!(f, "#")?;
		writeln!(f, "# Disc information file created on {} UTC", self.created)?;
		writeln!(f, "#\n")?;

		writeln!(f, "Type                 : Audio CD")?;
		writeln!(f, "Total time (seconds) : {}", self.query.total_seconds())?;
		writeln!(f, "Total tracks         : {}", self.query.track_count())?;
		writeln!(f, "Artist               : {artist}")?;
		writeln!(f, "Album                : {album}")?;
		writeln!(f, "CDDB Disc ID         : {}", self.info.disc_id())?;
		writeln!(f, "CDDB Disc Genre      : {}\n", self.info.category())?;

		f.write_str(LEGEND)?;

		let tracks = self.filenames.iter()
			.zip(self.query.frame_offsets())
			.zip(self.query.track_seconds())
			.zip(self.info.entry().track_titles());
		for (idx, (((name, offset), seconds), title)) in tracks.enumerate() {
			writeln!(f, "{:02} {name} {offset} {seconds} {{{title}}}", idx + 1)?;
		}

		writeln!(f, "\n# End of CDDB information.")
	}
}

impl<'a> DiscReport<'a> {
	#[allow(clippy::cast_possible_truncation)] // Tracks max out at 99.
	/// # New.
	///
	/// ## Errors
	///
	/// This will return an error if the lookup doesn't have the same number
	/// of tracks as the query, or if the filenames would be too long.
	pub fn new(query: &'a QueryDescriptor, info: &'a DiscInfo) -> Result<Self, CddbError> {
		let expected = query.track_count();
		let returned = info.entry().track_titles().len();
		if returned < expected {
			return Err(CddbError::TooFewTitles(expected as u8, returned as u8));
		}
		else if expected < returned {
			return Err(CddbError::TooManyTitles(expected as u8));
		}

		Ok(Self {
			query,
			info,
			filenames: info.track_filenames()?,
			created: FmtUtc2k::now(),
		})
	}

	#[must_use]
	/// # With Creation Time.
	///
	/// Override the report timestamp, which otherwise defaults to the time
	/// the report was built.
	pub fn with_created(self, created: FmtUtc2k) -> Self {
		Self { created, ..self }
	}

	#[must_use]
	/// # Filenames.
	pub fn filenames(&self) -> &[String] { &self.filenames }

	/// # Save.
	///
	/// Write the report to `path`. The data is written to a temporary file in
	/// the same directory first, then moved into place, so an existing file
	/// is never left half-written.
	///
	/// ## Errors
	///
	/// This will return an error if the file cannot be written.
	pub fn save<P>(&self, path: P) -> Result<(), CddbError>
	where P: AsRef<Path> {
		let path = path.as_ref();
		write_atomic::write_file(path, self.to_string().as_bytes())
			.map_err(|_| CddbError::Write(path.to_string_lossy().into_owned()))
	}
}



/// # Field Legend.
const LEGEND: &str = "# The data format for the individual tracks is as follows:
#
#   Field 1 ... Track number.
#   Field 2 ... Filename, or would-be filename.
#   Field 3 ... Frame offset. (One frame = 1/75 second)
#   Field 4 ... Play time in seconds.
#   Field 5 ... Title of the track enclosed in braces -- {}.
#
# Field 5 is followed by a newline.
#

";

/// # Artist and Album.
///
/// Split an `Artist / Album` disc title on the first slash. Missing parts
/// come back as `-`.
fn artist_album(title: Option<&str>) -> (&str, &str) {
	let Some(title) = title else { return ("-", "-"); };
	let (artist, album) = title.split_once('/').unwrap_or((title, ""));

	let artist = artist.trim();
	let album = album.trim();
	(
		if artist.is_empty() { "-" } else { artist },
		if album.is_empty() { "-" } else { album },
	)
}
