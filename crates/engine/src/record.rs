//! Compile-time specialization.
//!
//! A type implementing [`Record`] carries its own columnar layout, generated by
//! `#[derive(Record)]`. The generated `Columns` type plays the part of a
//! specialization: one `Box<[T]>` per field, with every extension point
//! expanded field by field at compile time.

use colonnade_shape::{Aggregate, Shape, ShapeError};

use crate::{Scalar, StaticLayout};

/// An aggregate type with a compile-time field list.
pub trait Record: Sized + 'static {
	/// Struct-of-arrays storage for `Self`.
	type Columns: StaticLayout<Item = Self>;

	/// The runtime description of this record's fields.
	fn shape() -> &'static Shape;

	fn to_aggregate(&self) -> Aggregate;

	/// Rebuilds a record from an aggregate of the same shape.
	fn from_aggregate(aggregate: &Aggregate) -> Result<Self, ShapeError>;
}

/// Reads field `index` of `aggregate` as a `T`.
#[doc(hidden)]
pub fn __extract<T: Scalar>(aggregate: &Aggregate, index: usize) -> Result<T, ShapeError> {
	let field = &aggregate.shape().fields()[index];
	let value = &aggregate.values()[index];
	T::from_value(value).ok_or_else(|| {
		if value.is_null() && value.field_type() == T::FIELD_TYPE {
			ShapeError::NullField(field.name.to_string())
		} else {
			ShapeError::TypeMismatch {
				field: field.name.to_string(),
				expected: T::FIELD_TYPE,
				found: value.field_type(),
			}
		}
	})
}

/// Fails unless `aggregate` has exactly the shape of `R`.
#[doc(hidden)]
pub fn __check_shape<R: Record>(aggregate: &Aggregate) -> Result<(), ShapeError> {
	if aggregate.shape() == R::shape() {
		Ok(())
	} else {
		Err(ShapeError::Mismatch {
			expected: R::shape().clone(),
			found: aggregate.shape().clone(),
		})
	}
}
