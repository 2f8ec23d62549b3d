use std::fmt;

use colonnade_engine::Columnar;

use super::Iter;
use crate::error::{Result, SoaError};

/// A read-only view over the first `len` elements of a columnar storage.
///
/// Holds a shared borrow of its owner, so the owner cannot change
/// structurally while the view is alive. [`SoaMap::values`] returns one over
/// the table's value columns.
///
/// [`SoaMap::values`]: crate::SoaMap::values
pub struct SeqView<'a, L: Columnar> {
	columns: &'a L,
	len: usize,
}

impl<'a, L: Columnar> SeqView<'a, L> {
	pub(crate) fn new(columns: &'a L, len: usize) -> Self {
		debug_assert!(len <= columns.capacity());
		Self { columns, len }
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn get(&self, index: usize) -> Result<L::Item> {
		if index >= self.len {
			return Err(SoaError::OutOfRange {
				index,
				len: self.len,
			});
		}
		Ok(self.columns.pack(index))
	}

	pub fn index_of(&self, item: &L::Item) -> Option<usize> {
		self.columns.check_item(item).ok()?;
		(0..self.len).find(|&i| self.columns.equals_at(i, item))
	}

	pub fn last_index_of(&self, item: &L::Item) -> Option<usize> {
		self.columns.check_item(item).ok()?;
		(0..self.len).rev().find(|&i| self.columns.equals_at(i, item))
	}

	pub fn contains(&self, item: &L::Item) -> bool {
		self.index_of(item).is_some()
	}

	pub fn iter(&self) -> Iter<'a, L> {
		Iter::new(self.columns, self.len)
	}

	pub fn to_vec(&self) -> Vec<L::Item> {
		self.iter().collect()
	}
}

impl<L: Columnar> Clone for SeqView<'_, L> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<L: Columnar> Copy for SeqView<'_, L> {}

impl<L: Columnar> PartialEq for SeqView<'_, L> {
	fn eq(&self, other: &Self) -> bool {
		self.len == other.len
			&& (0..self.len).all(|i| {
				let item = self.columns.pack(i);
				other.columns.check_item(&item).is_ok() && other.columns.equals_at(i, &item)
			})
	}
}

impl<L: Columnar> fmt::Debug for SeqView<'_, L>
where
	L::Item: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.iter()).finish()
	}
}

impl<'a, L: Columnar> IntoIterator for SeqView<'a, L> {
	type Item = L::Item;
	type IntoIter = Iter<'a, L>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
