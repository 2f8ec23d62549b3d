//! Type-erased field arrays.
//!
//! A [`Lane`] is the storage of one field of a runtime shape: a boxed slice of
//! the field's exact element type behind a trait object, so primitive fields
//! are never boxed per element.

use std::fmt;

use colonnade_shape::{FieldType, Value};

use crate::Scalar;

/// One field array of a dynamically specialized layout.
pub trait Lane: Send + Sync + fmt::Debug {
	fn field_type(&self) -> FieldType;

	/// Number of physical slots.
	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn read(&self, index: usize) -> Value;

	/// Stores `value` at `index`. The value must have this lane's field type.
	fn write(&mut self, index: usize, value: &Value);

	fn copy_slot(&mut self, to: usize, from: usize);

	/// Rotates `[at, len)` left by one.
	fn shift_left(&mut self, at: usize, len: usize);

	/// Resets the slot to its zero or null value.
	fn clear_slot(&mut self, index: usize);

	/// Replaces the array with one of `capacity` slots, keeping the prefix.
	fn regrow(&mut self, capacity: usize);

	fn matches(&self, index: usize, value: &Value) -> bool;

	fn clone_lane(&self) -> Box<dyn Lane>;
}

/// Declares `capacity` zeroed slots.
pub fn declare_slots<T: Default>(capacity: usize) -> Box<[T]> {
	let mut slots = Vec::with_capacity(capacity);
	slots.resize_with(capacity, T::default);
	slots.into_boxed_slice()
}

/// Copy-and-grow: moves `slots` into a new array of `capacity` slots.
///
/// Slots past the old length are zeroed; shrinking drops the tail.
pub fn regrow<T: Default>(slots: &mut Box<[T]>, capacity: usize) {
	let mut grown = std::mem::take(slots).into_vec();
	grown.resize_with(capacity, T::default);
	*slots = grown.into_boxed_slice();
}

/// A lane over `Box<[T]>`.
#[derive(Clone)]
pub struct TypedLane<T: Scalar> {
	slots: Box<[T]>,
}

impl<T: Scalar> TypedLane<T> {
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			slots: declare_slots(capacity),
		}
	}

	pub fn slots(&self) -> &[T] {
		&self.slots
	}
}

impl<T: Scalar> fmt::Debug for TypedLane<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TypedLane")
			.field("type", &T::FIELD_TYPE)
			.field("len", &self.slots.len())
			.finish()
	}
}

impl<T: Scalar> Lane for TypedLane<T> {
	fn field_type(&self) -> FieldType {
		T::FIELD_TYPE
	}

	fn len(&self) -> usize {
		self.slots.len()
	}

	#[inline]
	fn read(&self, index: usize) -> Value {
		self.slots[index].to_value()
	}

	#[inline]
	fn write(&mut self, index: usize, value: &Value) {
		debug_assert_eq!(value.field_type(), T::FIELD_TYPE);
		if let Some(v) = T::from_value(value) {
			self.slots[index] = v;
		}
	}

	#[inline]
	fn copy_slot(&mut self, to: usize, from: usize) {
		self.slots[to] = self.slots[from].clone();
	}

	fn shift_left(&mut self, at: usize, len: usize) {
		if at < len {
			self.slots[at..len].rotate_left(1);
		}
	}

	#[inline]
	fn clear_slot(&mut self, index: usize) {
		self.slots[index] = T::default();
	}

	fn regrow(&mut self, capacity: usize) {
		regrow(&mut self.slots, capacity);
	}

	#[inline]
	fn matches(&self, index: usize, value: &Value) -> bool {
		self.slots[index].same_as_value(value)
	}

	fn clone_lane(&self) -> Box<dyn Lane> {
		Box::new(self.clone())
	}
}
