use std::iter::{Copied, FusedIterator};
use std::slice;

use colonnade_engine::Columnar;

/// Keys of a table in storage order.
pub type Keys<'a> = Copied<slice::Iter<'a, i32>>;

/// `(key, value)` pairs of a table in storage order.
pub struct Entries<'a, L: Columnar> {
	keys: &'a [i32],
	columns: &'a L,
	front: usize,
	back: usize,
}

impl<'a, L: Columnar> Entries<'a, L> {
	pub(crate) fn new(keys: &'a [i32], columns: &'a L) -> Self {
		Self {
			keys,
			columns,
			front: 0,
			back: keys.len(),
		}
	}
}

impl<L: Columnar> Iterator for Entries<'_, L> {
	type Item = (i32, L::Item);

	fn next(&mut self) -> Option<Self::Item> {
		if self.front == self.back {
			return None;
		}
		let index = self.front;
		self.front += 1;
		Some((self.keys[index], self.columns.pack(index)))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = self.back - self.front;
		(remaining, Some(remaining))
	}
}

impl<L: Columnar> DoubleEndedIterator for Entries<'_, L> {
	fn next_back(&mut self) -> Option<Self::Item> {
		if self.front == self.back {
			return None;
		}
		self.back -= 1;
		Some((self.keys[self.back], self.columns.pack(self.back)))
	}
}

impl<L: Columnar> ExactSizeIterator for Entries<'_, L> {}

impl<L: Columnar> FusedIterator for Entries<'_, L> {}
