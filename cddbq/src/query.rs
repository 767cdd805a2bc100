/*!
# CDDB Query: Disc Identity
*/

use crate::{
	CddbError,
	DiscGeometry,
	LEADIN_SECONDS,
};
use std::fmt::{
	self,
	Write,
};



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Query Descriptor.
///
/// Everything derived from the disc geometry that a lookup needs: the CDDB
/// disc ID, the per-track frame offsets and play times, the total play time,
/// and the literal `cddb query` command built from them.
///
/// It is immutable once built.
///
/// ```
/// use cddbq::{DiscGeometry, Msf, QueryDescriptor};
///
/// let geometry = DiscGeometry::new(
///     vec![Msf::new(0, 0, 0).unwrap()],
///     Msf::new(4, 33, 0).unwrap(),
/// ).unwrap();
/// let query = QueryDescriptor::try_from(&geometry).unwrap();
///
/// assert_eq!(query.disc_id(), "00011301");
/// assert_eq!(query.query_string(), "cddb query 00011301 1 0 275");
/// ```
pub struct QueryDescriptor {
	disc_id: String,
	total_seconds: u32,
	frame_offsets: Vec<u32>,
	track_seconds: Vec<u32>,
	query: String,
}

impl fmt::Display for QueryDescriptor {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.query)
	}
}

impl TryFrom<&DiscGeometry> for QueryDescriptor {
	type Error = CddbError;

	#[allow(clippy::cast_possible_truncation)] // Geometry caps tracks at 99.
	/// # Build.
	///
	/// The numbers have to match the server's own computation bit for bit, so
	/// everything is done with plain integer math.
	fn try_from(src: &DiscGeometry) -> Result<Self, Self::Error> {
		let tracks = src.tracks();
		let first = tracks.first().ok_or(CddbError::InvalidGeometry("no tracks"))?;
		let leadout = src.leadout();
		if leadout < *first {
			return Err(CddbError::InvalidGeometry("non-monotonic addresses"));
		}

		// Hash the start of each track.
		let hash: u32 = tracks.iter().map(|t| digit_sum(t.seconds())).sum();

		// The total playing time, plus the lead-in.
		let total_seconds = leadout.seconds() - first.seconds() + LEADIN_SECONDS;
		if 0xFFFF < total_seconds {
			return Err(CddbError::InvalidGeometry("disc too long"));
		}

		let count = tracks.len() as u32;
		let disc_id = format!(
			"{:08x}",
			((hash % 256) << 24) | (total_seconds << 8) | count,
		);

		// Offsets and durations.
		let frame_offsets: Vec<u32> = tracks.iter().map(|t| t.frames()).collect();
		let track_seconds: Vec<u32> = tracks.iter()
			.zip(tracks.iter().skip(1).chain(std::iter::once(&leadout)))
			.map(|(a, b)| b.seconds().saturating_sub(a.seconds()))
			.collect();

		// And finally the query itself.
		let mut query = format!("cddb query {disc_id} {count}");
		for offset in &frame_offsets {
			let _res = write!(query, " {offset}");
		}
		let _res = write!(query, " {total_seconds}");

		Ok(Self {
			disc_id,
			total_seconds,
			frame_offsets,
			track_seconds,
			query,
		})
	}
}

impl QueryDescriptor {
	#[must_use]
	/// # Disc ID.
	///
	/// The locally computed CDDB ID, as eight lowercase hex digits.
	pub fn disc_id(&self) -> &str { &self.disc_id }

	#[must_use]
	/// # Frame Offsets.
	///
	/// The start of each track, in 1/75 second frames.
	pub fn frame_offsets(&self) -> &[u32] { &self.frame_offsets }

	#[must_use]
	/// # Query String.
	///
	/// This is the `cddb query` command, sans line terminator.
	pub fn query_string(&self) -> &str { &self.query }

	#[must_use]
	/// # Total Seconds.
	///
	/// The disc's playing time, including the two-second lead-in.
	pub const fn total_seconds(&self) -> u32 { self.total_seconds }

	#[must_use]
	/// # Track Count.
	pub fn track_count(&self) -> usize { self.frame_offsets.len() }

	#[must_use]
	/// # Track Seconds.
	///
	/// The play time of each track, in whole seconds.
	pub fn track_seconds(&self) -> &[u32] { &self.track_seconds }
}



/// # Digit Sum.
///
/// This is the CDDB track hash: the sum of the decimal digits of the track's
/// start time in seconds.
const fn digit_sum(mut value: u32) -> u32 {
	let mut out = 0;
	while 0 < value {
		out += value % 10;
		value /= 10;
	}
	out
}
