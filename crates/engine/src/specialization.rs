//! Specialized layouts for runtime shapes.

use std::fmt;
use std::sync::Arc;

use colonnade_shape::{Aggregate, Shape, ShapeError, Value};

use crate::{Blueprint, Columnar, Lane, kernel::DeclareFn};

/// The linked implementation of one blueprint for one shape.
pub struct Specialization {
	blueprint: &'static Blueprint,
	shape: Shape,
	declares: Box<[DeclareFn]>,
}

impl Specialization {
	pub(crate) fn new(blueprint: &'static Blueprint, shape: Shape, declares: Box<[DeclareFn]>) -> Self {
		debug_assert_eq!(shape.len(), declares.len());
		Self {
			blueprint,
			shape,
			declares,
		}
	}

	#[inline]
	pub fn blueprint(&self) -> &'static Blueprint {
		self.blueprint
	}

	#[inline]
	pub fn shape(&self) -> &Shape {
		&self.shape
	}

	/// Default-construction entry point: zeroed storage of `capacity` slots.
	pub fn declare(self: &Arc<Self>, capacity: usize) -> DynColumns {
		DynColumns {
			layout: Arc::clone(self),
			lanes: self.declares.iter().map(|declare| declare(capacity)).collect(),
			capacity,
		}
	}
}

impl fmt::Debug for Specialization {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Specialization")
			.field("blueprint", &self.blueprint.name)
			.field("shape", &self.shape)
			.finish()
	}
}

/// Columnar storage of aggregates of one runtime shape.
///
/// Holds one [`Lane`] per field. A zero-field shape has no lanes and only
/// tracks its capacity.
pub struct DynColumns {
	layout: Arc<Specialization>,
	lanes: Box<[Box<dyn Lane>]>,
	capacity: usize,
}

impl DynColumns {
	#[inline]
	pub fn specialization(&self) -> &Arc<Specialization> {
		&self.layout
	}

	#[inline]
	pub fn shape(&self) -> &Shape {
		&self.layout.shape
	}

	pub fn lanes(&self) -> &[Box<dyn Lane>] {
		&self.lanes
	}
}

impl Clone for DynColumns {
	fn clone(&self) -> Self {
		Self {
			layout: Arc::clone(&self.layout),
			lanes: self.lanes.iter().map(|lane| lane.clone_lane()).collect(),
			capacity: self.capacity,
		}
	}
}

impl fmt::Debug for DynColumns {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DynColumns")
			.field("shape", self.shape())
			.field("capacity", &self.capacity)
			.finish()
	}
}

impl Columnar for DynColumns {
	type Item = Aggregate;

	#[inline]
	fn capacity(&self) -> usize {
		self.capacity
	}

	fn check_item(&self, item: &Aggregate) -> Result<(), ShapeError> {
		if item.shape() == self.shape() {
			Ok(())
		} else {
			Err(ShapeError::Mismatch {
				expected: self.shape().clone(),
				found: item.shape().clone(),
			})
		}
	}

	fn pack(&self, index: usize) -> Aggregate {
		let values: Box<[Value]> = self.lanes.iter().map(|lane| lane.read(index)).collect();
		Aggregate::__assemble(self.shape().clone(), values)
	}

	fn unpack(&mut self, index: usize, item: &Aggregate) {
		assert!(
			item.shape() == self.shape(),
			"aggregate of shape {} stored in columns of shape {}",
			item.shape(),
			self.shape()
		);
		for (lane, value) in self.lanes.iter_mut().zip(item.values()) {
			lane.write(index, value);
		}
	}

	fn copy_element(&mut self, to: usize, from: usize) {
		for lane in self.lanes.iter_mut() {
			lane.copy_slot(to, from);
		}
	}

	fn clear_element(&mut self, index: usize) {
		for &field in self.layout.shape.reference_fields() {
			self.lanes[field].clear_slot(index);
		}
	}

	fn grow_all(&mut self, capacity: usize) {
		for lane in self.lanes.iter_mut() {
			lane.regrow(capacity);
		}
		self.capacity = capacity;
	}

	fn equals_at(&self, index: usize, item: &Aggregate) -> bool {
		self.lanes
			.iter()
			.zip(item.values())
			.all(|(lane, value)| lane.matches(index, value))
	}

	fn declare(&self, capacity: usize) -> Self {
		self.layout.declare(capacity)
	}

	fn shift_left(&mut self, at: usize, len: usize) {
		for lane in self.lanes.iter_mut() {
			lane.shift_left(at, len);
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use colonnade_shape::FieldType;
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::{SEQUENCE, specialize};

	fn person() -> Shape {
		Shape::builder()
			.field("age", FieldType::I32)
			.field("name", FieldType::Str)
			.build()
			.unwrap()
	}

	fn columns(capacity: usize) -> DynColumns {
		Arc::new(specialize(&SEQUENCE, &person()).unwrap()).declare(capacity)
	}

	fn ana() -> Aggregate {
		Aggregate::new(&person(), [Value::from(21), Value::from("Ana")]).unwrap()
	}

	#[test]
	fn pack_after_unpack_is_equal() {
		let mut cols = columns(2);
		cols.unpack(1, &ana());
		assert_eq!(cols.pack(1), ana());
		assert!(cols.equals_at(1, &ana()));
		assert!(!cols.equals_at(0, &ana()));
	}

	#[test]
	fn fresh_slots_are_zero_and_null() {
		let cols = columns(1);
		assert_eq!(cols.pack(0).values(), &[Value::I32(0), Value::Str(None)]);
	}

	#[test]
	fn clear_only_touches_references() {
		let mut cols = columns(1);
		cols.unpack(0, &ana());
		cols.clear_element(0);
		assert_eq!(cols.pack(0).values(), &[Value::I32(21), Value::Str(None)]);
	}

	#[test]
	fn grow_preserves_prefix() {
		let mut cols = columns(1);
		cols.unpack(0, &ana());
		cols.grow_all(4);
		assert_eq!(cols.capacity(), 4);
		assert_eq!(cols.pack(0), ana());
		assert_eq!(cols.lanes()[1].len(), 4);
	}

	#[test]
	fn rejects_other_shapes() {
		let cols = columns(1);
		let other = Shape::builder().field("age", FieldType::I64).build().unwrap();
		let item = Aggregate::new(&other, [Value::from(1i64)]).unwrap();
		assert!(matches!(cols.check_item(&item), Err(ShapeError::Mismatch { .. })));
		assert_eq!(cols.check_item(&ana()), Ok(()));
	}

	#[test]
	#[should_panic(expected = "stored in columns of shape")]
	fn unpack_refuses_other_shapes() {
		let mut cols = columns(1);
		let other = Shape::builder().field("age", FieldType::I64).build().unwrap();
		cols.unpack(0, &Aggregate::new(&other, [Value::from(1i64)]).unwrap());
	}

	#[test]
	fn clones_do_not_share_lanes() {
		let mut cols = columns(1);
		cols.unpack(0, &ana());
		let copy = cols.clone();
		cols.clear_element(0);
		assert_eq!(copy.pack(0), ana());
		assert!(Arc::ptr_eq(copy.specialization(), cols.specialization()));
	}

	#[test]
	fn zero_field_columns_track_capacity() {
		let spec = Arc::new(specialize(&SEQUENCE, &Shape::empty()).unwrap());
		let mut cols = spec.declare(0);
		cols.grow_all(16);
		assert_eq!(cols.capacity(), 16);
		let unit = Aggregate::new(&Shape::empty(), Vec::new()).unwrap();
		assert!(cols.equals_at(3, &unit));
		assert_eq!(cols.pack(15), unit);
	}
}
