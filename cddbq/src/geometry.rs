/*!
# CDDB Query: Disc Geometry
*/

use cdtoc::Toc;
use crate::{
	CddbError,
	FRAMES_PER_SECOND,
	MAX_TRACKS,
};
use std::fmt;



#[derive(Debug, Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
/// # Minute/Second/Frame.
///
/// An absolute disc address, the way a drive's table of contents reports it.
/// Field order matters: the derived `Ord` compares minutes, then seconds,
/// then frames.
pub struct Msf {
	minute: u8,
	second: u8,
	frame: u8,
}

impl fmt::Display for Msf {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:02}:{:02}.{:02}", self.minute, self.second, self.frame)
	}
}

impl TryFrom<u32> for Msf {
	type Error = CddbError;

	#[allow(clippy::cast_possible_truncation, clippy::integer_division)]
	/// # From Sectors.
	///
	/// Convert an absolute sector (frame) position into MSF. Note that the
	/// position should _include_ the 150-sector lead-in, as CDTOC values do.
	fn try_from(src: u32) -> Result<Self, Self::Error> {
		let minute = src / (FRAMES_PER_SECOND * 60);
		if 255 < minute { return Err(CddbError::InvalidGeometry("address out of range")); }

		Ok(Self {
			minute: minute as u8,
			second: ((src / FRAMES_PER_SECOND) % 60) as u8,
			frame: (src % FRAMES_PER_SECOND) as u8,
		})
	}
}

impl Msf {
	/// # New.
	///
	/// ## Errors
	///
	/// This will return an error if the second is `60+` or the frame `75+`.
	pub fn new(minute: u8, second: u8, frame: u8) -> Result<Self, CddbError> {
		if 60 <= second { Err(CddbError::InvalidGeometry("second out of range")) }
		else if FRAMES_PER_SECOND <= u32::from(frame) {
			Err(CddbError::InvalidGeometry("frame out of range"))
		}
		else { Ok(Self { minute, second, frame }) }
	}

	#[must_use]
	/// # Minute.
	pub const fn minute(self) -> u8 { self.minute }

	#[must_use]
	/// # Second.
	pub const fn second(self) -> u8 { self.second }

	#[must_use]
	/// # Frame.
	pub const fn frame(self) -> u8 { self.frame }

	#[must_use]
	/// # Absolute Seconds.
	///
	/// The frame is dropped.
	pub const fn seconds(self) -> u32 {
		self.minute as u32 * 60 + self.second as u32
	}

	#[must_use]
	/// # Absolute Frames.
	pub const fn frames(self) -> u32 {
		self.seconds() * FRAMES_PER_SECOND + self.frame as u32
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Disc Geometry.
///
/// The start address of each audio track, plus the lead-out marking the end
/// of the last one. This is all the table of contents a CDDB lookup needs.
pub struct DiscGeometry {
	tracks: Vec<Msf>,
	leadout: Msf,
}

impl TryFrom<&Toc> for DiscGeometry {
	type Error = CddbError;

	/// # From CDTOC.
	///
	/// CDTOC sector positions include the 150-sector lead-in, so they map
	/// straight onto MSF addresses.
	fn try_from(src: &Toc) -> Result<Self, Self::Error> {
		Self::from_sectors(src.audio_sectors(), src.audio_leadout())
	}
}

impl DiscGeometry {
	/// # New.
	///
	/// ## Errors
	///
	/// This will return an error if there are no tracks (or more than 99), or
	/// if the addresses ever go backwards.
	pub fn new(tracks: Vec<Msf>, leadout: Msf) -> Result<Self, CddbError> {
		if tracks.is_empty() {
			return Err(CddbError::InvalidGeometry("no tracks"));
		}
		if MAX_TRACKS < tracks.len() {
			return Err(CddbError::InvalidGeometry("too many tracks"));
		}

		// Everything, lead-out included, should be in order.
		if
			tracks.windows(2).any(|pair| pair[1] < pair[0]) ||
			tracks.last().is_some_and(|last| leadout < *last)
		{
			return Err(CddbError::InvalidGeometry("non-monotonic addresses"));
		}

		Ok(Self { tracks, leadout })
	}

	/// # From Sectors.
	///
	/// Build from absolute sector positions (lead-in included).
	///
	/// ## Errors
	///
	/// See `DiscGeometry::new`.
	pub fn from_sectors(tracks: &[u32], leadout: u32) -> Result<Self, CddbError> {
		let tracks = tracks.iter()
			.map(|&s| Msf::try_from(s))
			.collect::<Result<Vec<_>, _>>()?;
		Self::new(tracks, Msf::try_from(leadout)?)
	}

	#[must_use]
	/// # Leadout.
	pub const fn leadout(&self) -> Msf { self.leadout }

	#[must_use]
	/// # Track Count.
	pub fn len(&self) -> usize { self.tracks.len() }

	#[must_use]
	/// # Is Empty?
	///
	/// This is always `false`; construction requires at least one track.
	pub fn is_empty(&self) -> bool { self.tracks.is_empty() }

	#[must_use]
	/// # Track Addresses.
	pub fn tracks(&self) -> &[Msf] { &self.tracks }
}
