/*!
# CDDB Query: Kill Switch
*/

use std::sync::{
	Arc,
	atomic::{
		AtomicBool,
		Ordering::{
			Acquire,
			Release,
		},
	},
};



#[derive(Debug, Clone, Default)]
/// # Kill Switch.
///
/// This is a short-circuit for a lookup blocked on a slow or silent server.
/// Clones share the same flag, so one can be handed to e.g. a CTRL-C handler
/// while another is passed to `QueryDescriptor::lookup`.
///
/// The connection checks the flag between read attempts, so a flipped switch
/// is noticed within a fraction of a second.
pub struct KillSwitch(Arc<AtomicBool>);

impl From<Arc<AtomicBool>> for KillSwitch {
	#[inline]
	fn from(src: Arc<AtomicBool>) -> Self { Self(src) }
}

impl KillSwitch {
	/// # Kill.
	pub fn kill(&self) { self.0.store(true, Release); }

	#[must_use]
	/// # Dead?
	pub fn killed(&self) -> bool { self.0.load(Acquire) }
}
