/*!
# CDDB Query: Filenames
*/

use crate::MAX_FILENAME_DUPES;



#[must_use]
/// # Title to Filename.
///
/// Convert a CDDB title into something safe to use as (part of) a filename.
///
/// ASCII alphanumerics and `( ) , .` are kept as-is. Any run of other
/// characters collapses into a single `_`.
///
/// When `disc` is `true`, the title is treated as an `Artist / Album` pair:
/// the slash (along with any whitespace around it) becomes a single `-`.
/// Existing dashes are treated the same way, so running a result through
/// again returns it unchanged.
///
/// ```
/// use cddbq::to_filename;
///
/// assert_eq!(to_filename("Guns N' Roses/Appetite", true), "Guns_N_Roses-Appetite");
/// assert_eq!(to_filename("Welcome to the Jungle", false), "Welcome_to_the_Jungle");
/// ```
pub fn to_filename(title: &str, disc: bool) -> String {
	let mut out = String::with_capacity(title.len());
	let mut modified = false;

	for c in title.chars() {
		if disc && matches!(c, '/' | '-') {
			// Swallow the placeholder for whatever came right before.
			if modified { out.pop(); }
			out.push('-');
			modified = true;
		}
		else if c.is_ascii_alphanumeric() || matches!(c, '(' | ')' | ',' | '.') {
			out.push(c);
			modified = false;
		}
		else if ! modified {
			out.push('_');
			modified = true;
		}
	}

	out
}

#[must_use]
/// # Generic Filename.
///
/// The fallback name for a track when there are no titles to work with, e.g.
/// `track-01.wav`. Note: `track` is one-based.
pub fn generic_filename(track: u8) -> String { format!("track-{track:02}.wav") }

#[must_use]
/// # Alternate Filename.
///
/// If a file is already taken, tack on a numeric suffix (`name.1`,
/// `name.2`, etc.). The caller keeps count.
///
/// Returns `None` if `dupes` is zero or greater than ten; at that point it's
/// time to give up.
pub fn alternate_filename(name: &str, dupes: u8) -> Option<String> {
	if (1..=MAX_FILENAME_DUPES).contains(&dupes) { Some(format!("{name}.{dupes}")) }
	else { None }
}
