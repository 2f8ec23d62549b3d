use std::iter::FusedIterator;

use colonnade_engine::Columnar;

/// Borrowing iterator over a sequence or view, materializing each element.
pub struct Iter<'a, L: Columnar> {
	columns: &'a L,
	front: usize,
	back: usize,
}

impl<'a, L: Columnar> Iter<'a, L> {
	pub(crate) fn new(columns: &'a L, len: usize) -> Self {
		Self {
			columns,
			front: 0,
			back: len,
		}
	}
}

impl<L: Columnar> Clone for Iter<'_, L> {
	fn clone(&self) -> Self {
		Self {
			columns: self.columns,
			front: self.front,
			back: self.back,
		}
	}
}

impl<L: Columnar> Iterator for Iter<'_, L> {
	type Item = L::Item;

	fn next(&mut self) -> Option<L::Item> {
		if self.front == self.back {
			return None;
		}
		let index = self.front;
		self.front += 1;
		Some(self.columns.pack(index))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = self.back - self.front;
		(remaining, Some(remaining))
	}

	fn nth(&mut self, n: usize) -> Option<L::Item> {
		self.front = self.front.saturating_add(n).min(self.back);
		self.next()
	}
}

impl<L: Columnar> DoubleEndedIterator for Iter<'_, L> {
	fn next_back(&mut self) -> Option<L::Item> {
		if self.front == self.back {
			return None;
		}
		self.back -= 1;
		Some(self.columns.pack(self.back))
	}
}

impl<L: Columnar> ExactSizeIterator for Iter<'_, L> {}

impl<L: Columnar> FusedIterator for Iter<'_, L> {}
