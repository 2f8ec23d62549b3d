//! Ownership stamps checked by detached cursors.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{Result, SoaError};

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

/// Identifies one container's storage and its structural generation.
///
/// Every container, clone and cleared container draws a new owner, so a
/// cursor never validates against storage it was not created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Stamp {
	owner: u64,
	generation: u64,
}

impl Stamp {
	pub(crate) fn fresh() -> Self {
		Self {
			owner: NEXT_OWNER.fetch_add(1, Ordering::Relaxed),
			generation: 0,
		}
	}

	#[inline]
	pub(crate) fn bump(&mut self) {
		self.generation = self.generation.wrapping_add(1);
	}

	/// Fails unless `current` is the stamp this one was copied from.
	#[inline]
	pub(crate) fn check(self, current: Stamp) -> Result<()> {
		if self != current {
			return Err(SoaError::ConcurrentModification);
		}
		Ok(())
	}
}
