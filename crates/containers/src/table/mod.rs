//! Columnar hash table keyed by `i32`.
//!
//! # Role
//!
//! [`SoaMap`] keeps its values in struct-of-arrays layout, with a parallel key
//! array and an open-addressing index twice as long as the key array.
//!
//! # Invariants
//!
//! - Storage indices are dense: live entries occupy `[0, len)` of both the
//!   key array and the value columns, in lock-step.
//! - Every live key is referenced from exactly one index slot, reachable by
//!   linear probing from its home slot.
//! - At least a quarter of the index slots are empty, so probing terminates.
//!
//! # Data flow
//!
//! 1. `put` probes past tombstones to decide whether the key is live.
//! 2. A new key lands at storage index `len`; a full table first doubles the
//!    index, rebuilding it from the key array, then doubles keys and values.
//! 3. `remove` tombstones the key's slot and moves the last live entry into
//!    the freed storage index, repointing that entry's slot.
//! 4. When tombstones crowd the index, it is rebuilt in place.

use std::fmt;

use colonnade_engine::{Columnar, DynColumns, ShapeRegistry, StaticLayout, TABLE};
use colonnade_shape::{Aggregate, Shape};

use self::index::{IndexArray, Probe};
use crate::error::{Result, SoaError, check_capacity};
use crate::seq::SeqView;
use crate::stamp::Stamp;

mod cursor;
mod index;
mod iter;

pub use cursor::{Entry, EntryCursor, KeyCursor};
pub use iter::{Entries, Keys};

#[cfg(test)]
mod tests;

/// Largest supported table capacity.
pub const MAX_CAPACITY: usize = 1 << 30;

const MIN_CAPACITY: usize = 16;

/// A hash table from `i32` keys to values stored in struct-of-arrays layout.
///
/// Iteration order is storage order: insertion order until a removal moves the
/// last entry into the gap.
pub struct SoaMap<L: Columnar = DynColumns> {
	index: IndexArray,
	keys: Box<[i32]>,
	columns: L,
	len: usize,
	stamp: Stamp,
}

/// Rounds a requested capacity up to a power of two, at least 16.
fn table_capacity(requested: usize) -> Result<usize> {
	check_capacity(requested, MAX_CAPACITY)?;
	Ok(requested.max(MIN_CAPACITY).next_power_of_two())
}

impl SoaMap<DynColumns> {
	/// Creates an empty table for `shape`, specialized through the global registry.
	pub fn for_shape(shape: &Shape) -> Result<Self> {
		Self::for_shape_with_capacity_in(ShapeRegistry::global(), shape, 0)
	}

	pub fn for_shape_with_capacity(shape: &Shape, capacity: usize) -> Result<Self> {
		Self::for_shape_with_capacity_in(ShapeRegistry::global(), shape, capacity)
	}

	pub fn for_shape_in(registry: &ShapeRegistry, shape: &Shape) -> Result<Self> {
		Self::for_shape_with_capacity_in(registry, shape, 0)
	}

	/// Creates an empty table; `capacity` is rounded up to a power of two, at least 16.
	pub fn for_shape_with_capacity_in(
		registry: &ShapeRegistry,
		shape: &Shape,
		capacity: usize,
	) -> Result<Self> {
		let capacity = table_capacity(capacity)?;
		let spec = registry.specialize(&TABLE, shape)?;
		Ok(Self::from_columns(spec.declare(capacity)))
	}

	/// Creates a table holding `entries`; later duplicates of a key win.
	pub fn from_entries<I>(shape: &Shape, entries: I) -> Result<Self>
	where
		I: IntoIterator<Item = (i32, Aggregate)>,
	{
		Self::from_entries_in(ShapeRegistry::global(), shape, entries)
	}

	pub fn from_entries_in<I>(registry: &ShapeRegistry, shape: &Shape, entries: I) -> Result<Self>
	where
		I: IntoIterator<Item = (i32, Aggregate)>,
	{
		let entries = entries.into_iter();
		let capacity = entries.size_hint().0.min(MAX_CAPACITY);
		let mut map = Self::for_shape_with_capacity_in(registry, shape, capacity)?;
		map.extend_from(entries)?;
		Ok(map)
	}

	pub fn shape(&self) -> &Shape {
		self.columns.shape()
	}
}

impl<L: StaticLayout> SoaMap<L> {
	pub fn new() -> Self {
		Self::from_columns(L::with_capacity(MIN_CAPACITY))
	}

	pub fn with_capacity(capacity: usize) -> Result<Self> {
		let capacity = table_capacity(capacity)?;
		Ok(Self::from_columns(L::with_capacity(capacity)))
	}
}

impl<L: StaticLayout> Default for SoaMap<L> {
	fn default() -> Self {
		Self::new()
	}
}

impl<L: Columnar> SoaMap<L> {
	fn from_columns(columns: L) -> Self {
		let capacity = columns.capacity();
		Self {
			index: IndexArray::new(capacity << 1),
			keys: vec![0; capacity].into_boxed_slice(),
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

	/// Number of entries the table holds before it grows.
	#[inline]
	pub fn capacity(&self) -> usize {
		self.keys.len()
	}

	/// The underlying value columns.
	pub fn columns(&self) -> &L {
		&self.columns
	}

	#[inline]
	fn find(&self, key: i32) -> Option<usize> {
		self.index.find(&self.keys[..self.len], key)
	}

	pub fn get(&self, key: i32) -> Option<L::Item> {
		self.find(key).map(|index| self.columns.pack(index))
	}

	pub fn get_or(&self, key: i32, default: L::Item) -> L::Item {
		self.get(key).unwrap_or(default)
	}

	pub fn contains_key(&self, key: i32) -> bool {
		self.find(key).is_some()
	}

	/// Associates `item` with `key`, returning the value it replaced.
	///
	/// Overwriting an existing key is not a structural change.
	pub fn put(&mut self, key: i32, item: L::Item) -> Result<Option<L::Item>> {
		self.columns.check_item(&item)?;
		let slot = match self.index.probe(&self.keys[..self.len], key) {
			Probe::Found { index, .. } => {
				let old = self.columns.pack(index);
				self.columns.unpack(index, &item);
				return Ok(Some(old));
			}
			Probe::Vacant { slot } => slot,
		};

		let slot = if self.len == self.keys.len() {
			self.grow()?;
			self.vacant_slot(key)
		} else if self.index.is_crowded(self.len) {
			self.purge();
			self.vacant_slot(key)
		} else {
			slot
		};

		let index = self.len;
		self.index.occupy(slot, index);
		self.keys[index] = key;
		self.columns.unpack(index, &item);
		self.len += 1;
		self.bump();
		Ok(None)
	}

	/// Like [`put`](Self::put), but never inserts a new key.
	pub fn replace(&mut self, key: i32, item: L::Item) -> Result<Option<L::Item>> {
		self.columns.check_item(&item)?;
		let Some(index) = self.find(key) else {
			return Ok(None);
		};
		let old = self.columns.pack(index);
		self.columns.unpack(index, &item);
		Ok(Some(old))
	}

	/// Removes `key`, returning its value.
	///
	/// The last live entry moves into the freed storage index, so iteration
	/// order changes.
	pub fn remove(&mut self, key: i32) -> Option<L::Item> {
		let Probe::Found { slot, index } = self.index.probe(&self.keys[..self.len], key) else {
			return None;
		};
		let old = self.columns.pack(index);
		self.index.bury(slot);

		let last = self.len - 1;
		if index != last {
			let moved = self.keys[last];
			self.index.repoint(moved, last, index);
			self.keys[index] = moved;
			self.columns.copy_element(index, last);
		}
		self.columns.clear_element(last);
		self.len = last;
		self.bump();
		Some(old)
	}

	/// Returns true if some live value equals `item`.
	pub fn contains_value(&self, item: &L::Item) -> bool {
		self.values().contains(item)
	}

	/// The values in storage order, as a read-only sequence view.
	pub fn values(&self) -> SeqView<'_, L> {
		SeqView::new(&self.columns, self.len)
	}

	/// The keys in storage order.
	pub fn keys(&self) -> Keys<'_> {
		self.keys[..self.len].iter().copied()
	}

	/// `(key, value)` pairs in storage order.
	pub fn iter(&self) -> Entries<'_, L> {
		Entries::new(&self.keys[..self.len], &self.columns)
	}

	/// A fail-fast cursor over the keys.
	pub fn key_cursor(&self) -> KeyCursor {
		KeyCursor::new(self.stamp)
	}

	/// A fail-fast cursor over the entries, whose values can be rewritten in place.
	pub fn entry_cursor(&self) -> EntryCursor {
		EntryCursor::new(self.stamp)
	}

	/// Calls `action` with every live entry, in storage order.
	pub fn for_each<F>(&self, mut action: F)
	where
		F: FnMut(i32, L::Item),
	{
		for index in 0..self.len {
			action(self.keys[index], self.columns.pack(index));
		}
	}

	/// Removes every entry and shrinks back to the minimum capacity.
	pub fn clear(&mut self) {
		self.index = IndexArray::new(MIN_CAPACITY << 1);
		self.keys = vec![0; MIN_CAPACITY].into_boxed_slice();
		self.columns = self.columns.declare(MIN_CAPACITY);
		self.len = 0;
		self.stamp = Stamp::fresh();
	}

	/// Inserts every entry, stopping at the first rejected one.
	pub fn extend_from<I>(&mut self, entries: I) -> Result<()>
	where
		I: IntoIterator<Item = (i32, L::Item)>,
	{
		for (key, item) in entries {
			self.put(key, item)?;
		}
		Ok(())
	}

	/// Slot where an absent `key` goes after the index was rebuilt.
	fn vacant_slot(&self, key: i32) -> usize {
		let probe = self.index.probe(&self.keys[..self.len], key);
		debug_assert!(matches!(probe, Probe::Vacant { .. }), "key {key} appeared during rebuild");
		match probe {
			Probe::Vacant { slot } | Probe::Found { slot, .. } => slot,
		}
	}

	/// Doubles the index, rebuilding it from the live keys, then doubles the
	/// key array and the value columns.
	fn grow(&mut self) -> Result<()> {
		let capacity = self.keys.len();
		if capacity >= MAX_CAPACITY {
			return Err(SoaError::InvalidCapacity {
				requested: capacity << 1,
				max: MAX_CAPACITY,
			});
		}
		let new_capacity = capacity << 1;
		tracing::trace!(from = capacity, to = new_capacity, "growing table");

		self.index = IndexArray::rebuild(&self.keys[..self.len], self.index.len() << 1);
		let mut keys = std::mem::take(&mut self.keys).into_vec();
		keys.resize(new_capacity, 0);
		self.keys = keys.into_boxed_slice();
		self.columns.grow_all(new_capacity);
		Ok(())
	}

	/// Rebuilds the index at its current size, dropping every tombstone.
	fn purge(&mut self) {
		tracing::trace!(
			len = self.len,
			tombstones = self.index.tombstones(),
			"purging tombstones"
		);
		self.index = IndexArray::rebuild(&self.keys[..self.len], self.index.len());
	}

	#[inline]
	fn bump(&mut self) {
		self.stamp.bump();
	}
}

/// Clones start with a new owner stamp; cursors of the original do not apply.
impl<L: Columnar + Clone> Clone for SoaMap<L> {
	fn clone(&self) -> Self {
		Self {
			index: self.index.clone(),
			keys: self.keys.clone(),
			columns: self.columns.clone(),
			len: self.len,
			stamp: Stamp::fresh(),
		}
	}
}

impl<L: Columnar> PartialEq for SoaMap<L> {
	fn eq(&self, other: &Self) -> bool {
		self.len == other.len
			&& (0..self.len).all(|index| match other.find(self.keys[index]) {
				Some(found) => {
					let item = self.columns.pack(index);
					other.columns.check_item(&item).is_ok() && other.columns.equals_at(found, &item)
				}
				None => false,
			})
	}
}

impl<L: Columnar> fmt::Debug for SoaMap<L>
where
	L::Item: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

impl<'a, L: Columnar> IntoIterator for &'a SoaMap<L> {
	type Item = (i32, L::Item);
	type IntoIter = Entries<'a, L>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}
