//! Container blueprints and their extension points.
//!
//! # Role
//!
//! The sequence and table algorithms are written once, against [`Columnar`].
//! Every method of that trait is an extension point: the place where per-field
//! code for one concrete shape is substituted. A [`Blueprint`] names the
//! extension points one container kind relies on, so the specializer can check
//! that a kernel set links before anything is published.
//!
//! # Invariants
//!
//! - `grow_all` keeps slots `[0, min(old, new))` intact and fills the rest with
//!   zero or null values.
//! - `clear_element` only touches reference-typed fields.
//! - `equals_at` never reads past the first mismatching field.

use std::fmt;

use colonnade_shape::ShapeError;

/// One place where a blueprint substitutes per-field code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExtensionPoint {
	/// Storage declaration: one typed array per field.
	Declare,
	/// Read k slots at an index and build one element.
	Pack,
	/// Destructure one element into k slot writes.
	Unpack,
	/// Copy k slots from one index to another.
	CopyElement,
	/// Null out the reference-typed slots at an index.
	ClearElement,
	/// Reallocate every array to a new capacity.
	GrowAll,
	/// Compare the stored slots at an index with a probe element.
	EqualsAt,
	/// Close a gap by moving a range of slots down by one.
	ShiftLeft,
}

impl ExtensionPoint {
	pub const ALL: [ExtensionPoint; 8] = [
		ExtensionPoint::Declare,
		ExtensionPoint::Pack,
		ExtensionPoint::Unpack,
		ExtensionPoint::CopyElement,
		ExtensionPoint::ClearElement,
		ExtensionPoint::GrowAll,
		ExtensionPoint::EqualsAt,
		ExtensionPoint::ShiftLeft,
	];

	const fn bit(self) -> u16 {
		1 << self as u16
	}
}

/// A set of extension points, as provided by one kernel.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExtensionSet(u16);

impl ExtensionSet {
	pub const EMPTY: ExtensionSet = ExtensionSet(0);
	pub const ALL: ExtensionSet = ExtensionSet::of(&ExtensionPoint::ALL);

	pub const fn of(points: &[ExtensionPoint]) -> Self {
		let mut bits = 0;
		let mut i = 0;
		while i < points.len() {
			bits |= points[i].bit();
			i += 1;
		}
		ExtensionSet(bits)
	}

	#[inline]
	pub const fn contains(self, point: ExtensionPoint) -> bool {
		self.0 & point.bit() != 0
	}

	pub const fn with(self, point: ExtensionPoint) -> Self {
		ExtensionSet(self.0 | point.bit())
	}

	pub const fn without(self, point: ExtensionPoint) -> Self {
		ExtensionSet(self.0 & !point.bit())
	}

	pub fn iter(self) -> impl Iterator<Item = ExtensionPoint> {
		ExtensionPoint::ALL.into_iter().filter(move |p| self.contains(*p))
	}
}

impl fmt::Debug for ExtensionSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.iter()).finish()
	}
}

/// The extension points one container algorithm is written against.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Blueprint {
	/// Stable name, also used as part of the registry key.
	pub name: &'static str,
	/// Extension points the algorithm calls.
	pub extension_points: &'static [ExtensionPoint],
}

/// Blueprint of the growable sequence.
pub static SEQUENCE: Blueprint = Blueprint {
	name: "sequence",
	extension_points: &[
		ExtensionPoint::Declare,
		ExtensionPoint::Pack,
		ExtensionPoint::Unpack,
		ExtensionPoint::CopyElement,
		ExtensionPoint::ClearElement,
		ExtensionPoint::GrowAll,
		ExtensionPoint::EqualsAt,
		ExtensionPoint::ShiftLeft,
	],
};

/// Blueprint of the integer-keyed hash table.
pub static TABLE: Blueprint = Blueprint {
	name: "table",
	extension_points: &[
		ExtensionPoint::Declare,
		ExtensionPoint::Pack,
		ExtensionPoint::Unpack,
		ExtensionPoint::CopyElement,
		ExtensionPoint::ClearElement,
		ExtensionPoint::GrowAll,
		ExtensionPoint::EqualsAt,
	],
};

/// Columnar storage for one element type.
///
/// Indices are physical slot positions in `[0, capacity())`. Implementations
/// do not track a logical length; the container that owns them does, and only
/// ever passes in-range indices.
pub trait Columnar {
	/// The element materialized by [`pack`](Columnar::pack).
	type Item;

	fn capacity(&self) -> usize;

	/// Rejects an element that cannot be stored here.
	///
	/// Statically typed layouts accept every item. Dynamic layouts reject
	/// aggregates of a different shape.
	fn check_item(&self, item: &Self::Item) -> Result<(), ShapeError> {
		let _ = item;
		Ok(())
	}

	fn pack(&self, index: usize) -> Self::Item;

	/// Stores `item` at `index`.
	///
	/// `item` must have passed [`check_item`](Columnar::check_item).
	/// Implementations panic on items they cannot store.
	fn unpack(&mut self, index: usize, item: &Self::Item);

	fn copy_element(&mut self, to: usize, from: usize);

	fn clear_element(&mut self, index: usize);

	/// Reallocates every field array to `capacity` slots.
	fn grow_all(&mut self, capacity: usize);

	fn equals_at(&self, index: usize, item: &Self::Item) -> bool;

	/// Declares fresh, zeroed storage of the same layout.
	fn declare(&self, capacity: usize) -> Self
	where
		Self: Sized;

	/// Moves slots `[at + 1, len)` to `[at, len - 1)`.
	///
	/// Slot `len - 1` is left holding a stale value; callers clear it.
	fn shift_left(&mut self, at: usize, len: usize) {
		for index in at..len.saturating_sub(1) {
			self.copy_element(index, index + 1);
		}
	}
}

/// A layout whose field list is fixed at compile time.
pub trait StaticLayout: Columnar + Sized {
	fn with_capacity(capacity: usize) -> Self;
}
