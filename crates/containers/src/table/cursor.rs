use colonnade_engine::Columnar;

use super::SoaMap;
use crate::error::{Result, SoaError};
use crate::stamp::Stamp;

/// A fail-fast cursor over the keys of a [`SoaMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCursor {
	index: usize,
	expected: Stamp,
}

impl KeyCursor {
	pub(crate) fn new(stamp: Stamp) -> Self {
		Self {
			index: 0,
			expected: stamp,
		}
	}

	pub fn next<L: Columnar>(&mut self, map: &SoaMap<L>) -> Result<Option<i32>> {
		self.expected.check(map.stamp)?;
		if self.index >= map.len {
			return Ok(None);
		}
		let key = map.keys[self.index];
		self.index += 1;
		Ok(Some(key))
	}

	pub fn has_next<L: Columnar>(&self, map: &SoaMap<L>) -> bool {
		self.index < map.len
	}
}

/// A fail-fast cursor over the entries of a [`SoaMap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryCursor {
	index: usize,
	expected: Stamp,
}

impl EntryCursor {
	pub(crate) fn new(stamp: Stamp) -> Self {
		Self {
			index: 0,
			expected: stamp,
		}
	}

	pub fn next<L: Columnar>(&mut self, map: &SoaMap<L>) -> Result<Option<Entry>> {
		self.expected.check(map.stamp)?;
		if self.index >= map.len {
			return Ok(None);
		}
		let index = self.index;
		self.index += 1;
		Ok(Some(Entry {
			key: map.keys[index],
			index,
			stamp: self.expected,
		}))
	}

	pub fn has_next<L: Columnar>(&self, map: &SoaMap<L>) -> bool {
		self.index < map.len
	}
}

/// One live entry returned by an [`EntryCursor`].
///
/// The value is read from and written to the table on demand. Both fail with
/// [`SoaError::ConcurrentModification`] once the table changed structurally,
/// or when given a table other than the one the entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
	key: i32,
	index: usize,
	stamp: Stamp,
}

impl Entry {
	#[inline]
	pub fn key(&self) -> i32 {
		self.key
	}

	pub fn value<L: Columnar>(&self, map: &SoaMap<L>) -> Result<L::Item> {
		self.check(map)?;
		Ok(map.columns.pack(self.index))
	}

	/// Writes `item` through to the table, returning the previous value.
	///
	/// Not a structural change: this entry and its cursor stay valid.
	pub fn set_value<L: Columnar>(&self, map: &mut SoaMap<L>, item: L::Item) -> Result<L::Item> {
		self.check(map)?;
		map.columns.check_item(&item)?;
		let old = map.columns.pack(self.index);
		map.columns.unpack(self.index, &item);
		Ok(old)
	}

	fn check<L: Columnar>(&self, map: &SoaMap<L>) -> Result<()> {
		self.stamp.check(map.stamp)?;
		if self.index >= map.len {
			return Err(SoaError::ConcurrentModification);
		}
		Ok(())
	}
}
