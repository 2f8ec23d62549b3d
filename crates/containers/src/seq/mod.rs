//! Columnar growable sequence.
//!
//! # Role
//!
//! [`SoaVec`] stores its elements as one array per field and keeps them
//! contiguous in `[0, len)`. The control flow (bounds checks, growth, removal)
//! is shared by every layout; the per-field data movement comes from the
//! [`Columnar`] implementation.
//!
//! # Invariants
//!
//! - `len <= capacity`; storage grows to 16 slots first, then by half again,
//!   rounded up.
//! - Slots in `[len, capacity)` hold no live references.
//! - Every structural change (push, remove, clear) bumps the generation that
//!   detached [`Cursor`]s check before each access, together with the owner
//!   stamp that ties a cursor to the sequence it came from.

use std::fmt;

use colonnade_engine::{Columnar, DynColumns, SEQUENCE, ShapeRegistry, StaticLayout};
use colonnade_shape::{Aggregate, Shape};

use crate::error::{Result, SoaError, check_capacity};
use crate::stamp::Stamp;

mod cursor;
mod iter;
mod view;

pub use cursor::Cursor;
pub use iter::Iter;
pub use view::SeqView;

#[cfg(test)]
mod tests;

/// Largest supported sequence capacity.
pub const MAX_CAPACITY: usize = u32::MAX as usize;

const INITIAL_CAPACITY: usize = 16;

/// A growable sequence stored in struct-of-arrays layout.
///
/// `L` defaults to [`DynColumns`], the layout for shapes described at runtime.
/// Derived records use `SoaVec<R::Columns>`, spelled
/// [`RecordVec<R>`](crate::RecordVec).
pub struct SoaVec<L: Columnar = DynColumns> {
	columns: L,
	len: usize,
	stamp: Stamp,
}

impl SoaVec<DynColumns> {
	/// Creates an empty sequence for `shape`, specialized through the global registry.
	pub fn for_shape(shape: &Shape) -> Result<Self> {
		Self::for_shape_with_capacity_in(ShapeRegistry::global(), shape, 0)
	}

	pub fn for_shape_with_capacity(shape: &Shape, capacity: usize) -> Result<Self> {
		Self::for_shape_with_capacity_in(ShapeRegistry::global(), shape, capacity)
	}

	pub fn for_shape_in(registry: &ShapeRegistry, shape: &Shape) -> Result<Self> {
		Self::for_shape_with_capacity_in(registry, shape, 0)
	}

	pub fn for_shape_with_capacity_in(
		registry: &ShapeRegistry,
		shape: &Shape,
		capacity: usize,
	) -> Result<Self> {
		check_capacity(capacity, MAX_CAPACITY)?;
		let spec = registry.specialize(&SEQUENCE, shape)?;
		Ok(Self::from_columns(spec.declare(capacity)))
	}

	/// Creates a sequence holding `items`, in order.
	pub fn from_aggregates<I>(shape: &Shape, items: I) -> Result<Self>
	where
		I: IntoIterator<Item = Aggregate>,
	{
		Self::from_aggregates_in(ShapeRegistry::global(), shape, items)
	}

	pub fn from_aggregates_in<I>(registry: &ShapeRegistry, shape: &Shape, items: I) -> Result<Self>
	where
		I: IntoIterator<Item = Aggregate>,
	{
		let items = items.into_iter();
		let capacity = items.size_hint().0.min(MAX_CAPACITY);
		let mut seq = Self::for_shape_with_capacity_in(registry, shape, capacity)?;
		seq.extend_from(items)?;
		Ok(seq)
	}

	pub fn shape(&self) -> &Shape {
		self.columns.shape()
	}
}

impl<L: StaticLayout> SoaVec<L> {
	pub fn new() -> Self {
		Self::from_columns(L::with_capacity(0))
	}

	pub fn with_capacity(capacity: usize) -> Result<Self> {
		check_capacity(capacity, MAX_CAPACITY)?;
		Ok(Self::from_columns(L::with_capacity(capacity)))
	}
}

impl<L: StaticLayout> Default for SoaVec<L> {
	fn default() -> Self {
		Self::new()
	}
}

impl<L: Columnar> SoaVec<L> {
	fn from_columns(columns: L) -> Self {
		Self {
			columns,
			len: 0,
			stamp: Stamp::fresh(),
		}
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Number of physical slots per field array.
	#[inline]
	pub fn capacity(&self) -> usize {
		self.columns.capacity()
	}

	/// The underlying field arrays.
	pub fn columns(&self) -> &L {
		&self.columns
	}

	/// Read-only view of the live elements.
	#[inline]
	pub fn view(&self) -> SeqView<'_, L> {
		SeqView::new(&self.columns, self.len)
	}

	pub fn get(&self, index: usize) -> Result<L::Item> {
		self.view().get(index)
	}

	/// Overwrites the element at `index`, returning the previous one.
	///
	/// Not a structural change: cursors stay valid.
	pub fn set(&mut self, index: usize, item: L::Item) -> Result<L::Item> {
		self.check_index(index)?;
		self.columns.check_item(&item)?;
		let old = self.columns.pack(index);
		self.columns.unpack(index, &item);
		Ok(old)
	}

	/// Appends `item`, growing the storage when it is full.
	pub fn push(&mut self, item: L::Item) -> Result<()> {
		self.columns.check_item(&item)?;
		if self.len == self.columns.capacity() {
			self.grow()?;
		}
		self.columns.unpack(self.len, &item);
		self.len += 1;
		self.bump();
		Ok(())
	}

	/// Positional insertion is not supported; use [`push`](Self::push).
	pub fn insert(&mut self, index: usize, item: L::Item) -> Result<()> {
		let _ = (index, item);
		Err(SoaError::Unsupported { operation: "insert" })
	}

	/// Removes the element at `index`, shifting later elements down by one.
	pub fn remove(&mut self, index: usize) -> Result<L::Item> {
		self.check_index(index)?;
		Ok(self.remove_at(index))
	}

	/// Removes the element at `index` by moving the last element into its slot.
	///
	/// O(1), but does not preserve order.
	pub fn swap_remove(&mut self, index: usize) -> Result<L::Item> {
		self.check_index(index)?;
		let old = self.columns.pack(index);
		let last = self.len - 1;
		if index != last {
			self.columns.copy_element(index, last);
		}
		self.columns.clear_element(last);
		self.len = last;
		self.bump();
		Ok(old)
	}

	/// Removes the first element equal to `item`. Returns whether one was found.
	pub fn remove_item(&mut self, item: &L::Item) -> bool {
		match self.index_of(item) {
			Some(index) => {
				self.remove_at(index);
				true
			}
			None => false,
		}
	}

	/// Position of the first element equal to `item`.
	///
	/// `None` when absent, or when `item` cannot be stored in this sequence.
	pub fn index_of(&self, item: &L::Item) -> Option<usize> {
		self.view().index_of(item)
	}

	pub fn last_index_of(&self, item: &L::Item) -> Option<usize> {
		self.view().last_index_of(item)
	}

	pub fn contains(&self, item: &L::Item) -> bool {
		self.index_of(item).is_some()
	}

	/// Removes every element and releases the storage.
	pub fn clear(&mut self) {
		self.columns = self.columns.declare(0);
		self.len = 0;
		self.stamp = Stamp::fresh();
	}

	pub fn iter(&self) -> Iter<'_, L> {
		self.view().iter()
	}

	/// A fail-fast cursor positioned before the first element.
	pub fn cursor(&self) -> Cursor {
		Cursor::new(0, self.stamp)
	}

	/// A fail-fast cursor positioned before `index`; `index == len` is allowed.
	pub fn cursor_at(&self, index: usize) -> Result<Cursor> {
		if index > self.len {
			return Err(SoaError::OutOfRange {
				index,
				len: self.len,
			});
		}
		Ok(Cursor::new(index, self.stamp))
	}

	pub fn to_vec(&self) -> Vec<L::Item> {
		self.iter().collect()
	}

	/// Appends every item, stopping at the first rejected one.
	pub fn extend_from<I>(&mut self, items: I) -> Result<()>
	where
		I: IntoIterator<Item = L::Item>,
	{
		for item in items {
			self.push(item)?;
		}
		Ok(())
	}

	fn check_index(&self, index: usize) -> Result<()> {
		if index >= self.len {
			return Err(SoaError::OutOfRange {
				index,
				len: self.len,
			});
		}
		Ok(())
	}

	fn remove_at(&mut self, index: usize) -> L::Item {
		let old = self.columns.pack(index);
		self.columns.shift_left(index, self.len);
		self.len -= 1;
		self.columns.clear_element(self.len);
		self.bump();
		old
	}

	fn grow(&mut self) -> Result<()> {
		let old = self.columns.capacity();
		if old >= MAX_CAPACITY {
			return Err(SoaError::InvalidCapacity {
				requested: old.saturating_add(1),
				max: MAX_CAPACITY,
			});
		}
		let new = if old == 0 {
			INITIAL_CAPACITY
		} else {
			old.saturating_add(old.div_ceil(2)).min(MAX_CAPACITY)
		};
		tracing::trace!(from = old, to = new, "growing sequence");
		self.columns.grow_all(new);
		Ok(())
	}

	#[inline]
	fn bump(&mut self) {
		self.stamp.bump();
	}
}

/// Clones start with a new owner stamp; cursors of the original do not apply.
impl<L: Columnar + Clone> Clone for SoaVec<L> {
	fn clone(&self) -> Self {
		Self {
			columns: self.columns.clone(),
			len: self.len,
			stamp: Stamp::fresh(),
		}
	}
}

impl<L: Columnar> PartialEq for SoaVec<L> {
	fn eq(&self, other: &Self) -> bool {
		self.view() == other.view()
	}
}

impl<L: Columnar> fmt::Debug for SoaVec<L>
where
	L::Item: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(&self.view(), f)
	}
}

impl<'a, L: Columnar> IntoIterator for &'a SoaVec<L> {
	type Item = L::Item;
	type IntoIter = Iter<'a, L>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
