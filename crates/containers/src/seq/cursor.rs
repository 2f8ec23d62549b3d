use colonnade_engine::Columnar;

use super::SoaVec;
use crate::error::{Result, SoaError};
use crate::stamp::Stamp;

/// A bidirectional, fail-fast cursor over a [`SoaVec`].
///
/// The cursor does not borrow the sequence; each call takes it as an argument.
/// Any structural change to the sequence after the cursor was created makes the
/// next `next`, `previous` or `set` fail with
/// [`SoaError::ConcurrentModification`], as does passing a sequence other than
/// the one that created the cursor. Replacing the current element through
/// [`set`](Cursor::set) is not structural and keeps the cursor valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
	index: usize,
	last: Option<usize>,
	expected: Stamp,
}

impl Cursor {
	pub(crate) fn new(index: usize, stamp: Stamp) -> Self {
		Self {
			index,
			last: None,
			expected: stamp,
		}
	}

	fn check<L: Columnar>(&self, seq: &SoaVec<L>) -> Result<()> {
		self.expected.check(seq.stamp)
	}

	/// Returns the next element and advances, or `None` at the end.
	pub fn next<L: Columnar>(&mut self, seq: &SoaVec<L>) -> Result<Option<L::Item>> {
		self.check(seq)?;
		if self.index >= seq.len {
			return Ok(None);
		}
		let index = self.index;
		self.index += 1;
		self.last = Some(index);
		Ok(Some(seq.columns.pack(index)))
	}

	/// Steps back and returns that element, or `None` at the start.
	pub fn previous<L: Columnar>(&mut self, seq: &SoaVec<L>) -> Result<Option<L::Item>> {
		self.check(seq)?;
		if self.index == 0 {
			return Ok(None);
		}
		self.index -= 1;
		self.last = Some(self.index);
		Ok(Some(seq.columns.pack(self.index)))
	}

	pub fn has_next<L: Columnar>(&self, seq: &SoaVec<L>) -> bool {
		self.index < seq.len
	}

	pub fn has_previous(&self) -> bool {
		self.index != 0
	}

	/// Index of the element `next` would return.
	pub fn next_index(&self) -> usize {
		self.index
	}

	/// Index of the element `previous` would return.
	pub fn previous_index(&self) -> Option<usize> {
		self.index.checked_sub(1)
	}

	/// Replaces the element last returned by `next` or `previous`.
	///
	/// Fails with [`SoaError::NoCurrentElement`] if nothing was returned since
	/// the cursor was created or since the previous `set`.
	pub fn set<L: Columnar>(&mut self, seq: &mut SoaVec<L>, item: L::Item) -> Result<()> {
		self.check(seq)?;
		let index = self.last.ok_or(SoaError::NoCurrentElement)?;
		seq.set(index, item)?;
		self.last = None;
		Ok(())
	}
}
