//! Open-addressing index over dense storage slots.
//!
//! Each index slot holds [`EMPTY`], [`TOMBSTONE`] or the storage index of a
//! live key. A key's home slot is the key itself masked by the slot count;
//! collisions probe linearly.

pub(crate) const EMPTY: i32 = -1;
pub(crate) const TOMBSTONE: i32 = -2;

/// Result of probing for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Probe {
	/// The key is live at `index`, referenced from `slot`.
	Found { slot: usize, index: usize },
	/// The key is absent; `slot` is where it would be inserted.
	Vacant { slot: usize },
}

#[derive(Debug, Clone)]
pub(crate) struct IndexArray {
	slots: Box<[i32]>,
	tombstones: usize,
}

impl IndexArray {
	/// An index of `len` empty slots. `len` is a power of two.
	pub(crate) fn new(len: usize) -> Self {
		debug_assert!(len.is_power_of_two());
		Self {
			slots: vec![EMPTY; len].into_boxed_slice(),
			tombstones: 0,
		}
	}

	/// An index of `len` slots referencing `keys[i]` at storage index `i`.
	pub(crate) fn rebuild(keys: &[i32], len: usize) -> Self {
		let mut index = Self::new(len);
		for (i, &key) in keys.iter().enumerate() {
			let mut slot = index.home(key);
			while index.slots[slot] != EMPTY {
				slot = index.next(slot);
			}
			index.slots[slot] = i as i32;
		}
		index
	}

	#[inline]
	pub(crate) fn len(&self) -> usize {
		self.slots.len()
	}

	pub(crate) fn tombstones(&self) -> usize {
		self.tombstones
	}

	#[inline]
	fn home(&self, key: i32) -> usize {
		(key as u32 as usize) & (self.slots.len() - 1)
	}

	#[inline]
	fn next(&self, slot: usize) -> usize {
		(slot + 1) & (self.slots.len() - 1)
	}

	/// Finds `key`, skipping tombstones, until an empty slot ends the chain.
	///
	/// The vacant slot reported for an absent key is the first tombstone
	/// passed on the way, or the terminating empty slot.
	pub(crate) fn probe(&self, keys: &[i32], key: i32) -> Probe {
		let mut slot = self.home(key);
		let mut reusable = None;
		loop {
			match self.slots[slot] {
				EMPTY => {
					return Probe::Vacant {
						slot: reusable.unwrap_or(slot),
					};
				}
				TOMBSTONE => {
					reusable.get_or_insert(slot);
				}
				stored => {
					let index = stored as usize;
					if keys[index] == key {
						return Probe::Found { slot, index };
					}
				}
			}
			slot = self.next(slot);
		}
	}

	/// Storage index of `key`, if live.
	pub(crate) fn find(&self, keys: &[i32], key: i32) -> Option<usize> {
		match self.probe(keys, key) {
			Probe::Found { index, .. } => Some(index),
			Probe::Vacant { .. } => None,
		}
	}

	/// Points `slot` at storage `index`.
	pub(crate) fn occupy(&mut self, slot: usize, index: usize) {
		if self.slots[slot] == TOMBSTONE {
			self.tombstones -= 1;
		}
		self.slots[slot] = index as i32;
	}

	/// Marks a live slot as deleted.
	pub(crate) fn bury(&mut self, slot: usize) {
		debug_assert!(self.slots[slot] >= 0);
		self.slots[slot] = TOMBSTONE;
		self.tombstones += 1;
	}

	/// Redirects the slot of `key` from storage index `from` to `to`.
	pub(crate) fn repoint(&mut self, key: i32, from: usize, to: usize) {
		let mut slot = self.home(key);
		for _ in 0..self.slots.len() {
			if self.slots[slot] == from as i32 {
				self.slots[slot] = to as i32;
				return;
			}
			debug_assert_ne!(self.slots[slot], EMPTY, "key {key} is not indexed");
			slot = self.next(slot);
		}
	}

	/// Returns true if inserting one more key would leave fewer than a quarter
	/// of the slots empty.
	pub(crate) fn is_crowded(&self, live: usize) -> bool {
		(live + self.tombstones + 1) * 4 > self.slots.len() * 3
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn colliding_keys_probe_linearly() {
		let keys = [1, 17, 33];
		let index = IndexArray::rebuild(&keys, 16);
		assert_eq!(index.probe(&keys, 1), Probe::Found { slot: 1, index: 0 });
		assert_eq!(index.probe(&keys, 17), Probe::Found { slot: 2, index: 1 });
		assert_eq!(index.probe(&keys, 33), Probe::Found { slot: 3, index: 2 });
		assert_eq!(index.probe(&keys, 49), Probe::Vacant { slot: 4 });
	}

	#[test]
	fn negative_keys_mask_their_low_bits() {
		let keys = [-1];
		let index = IndexArray::rebuild(&keys, 16);
		assert_eq!(index.probe(&keys, -1), Probe::Found { slot: 15, index: 0 });
	}

	#[test]
	fn tombstones_are_skipped_and_reused() {
		let keys = [1, 17];
		let mut index = IndexArray::rebuild(&keys, 16);
		index.bury(1);
		assert_eq!(index.tombstones(), 1);
		// 17 lives past the tombstone and must still be found.
		assert_eq!(index.find(&keys, 17), Some(1));
		// An absent key reuses the first tombstone on its chain.
		assert_eq!(index.probe(&keys, 33), Probe::Vacant { slot: 1 });
		index.occupy(1, 0);
		assert_eq!(index.tombstones(), 0);
	}

	#[test]
	fn repoint_moves_a_reference() {
		// 5, 21 and 37 share home slot 5. Drop 21 and move 37 into its storage index.
		let mut index = IndexArray::rebuild(&[5, 21, 37], 16);
		index.bury(6);
		index.repoint(37, 2, 1);
		let keys = [5, 37];
		assert_eq!(index.find(&keys, 5), Some(0));
		assert_eq!(index.find(&keys, 37), Some(1));
		assert_eq!(index.find(&keys, 21), None);
	}

	#[test]
	fn crowding_counts_tombstones() {
		let mut index = IndexArray::new(16);
		assert!(!index.is_crowded(10));
		assert!(index.is_crowded(12));
		index.occupy(0, 0);
		index.bury(0);
		assert!(index.is_crowded(11));
	}
}
