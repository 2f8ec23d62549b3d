//! Aggregate values.
//!
//! An [`Aggregate`] is an immutable value with one [`Value`] slot per field of
//! its [`Shape`]. Equality and hashing are structural, so an aggregate read
//! back from columnar storage equals the one written even though it is a
//! freshly materialized value.

use std::fmt;

use crate::{Result, Shape, ShapeError, Value};

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Aggregate {
	shape: Shape,
	values: Box<[Value]>,
}

impl Aggregate {
	/// Builds an aggregate, checking arity and every field's type.
	pub fn new(shape: &Shape, values: impl IntoIterator<Item = Value>) -> Result<Self> {
		let values: Box<[Value]> = values.into_iter().collect();
		if values.len() != shape.len() {
			return Err(ShapeError::ArityMismatch {
				expected: shape.len(),
				found: values.len(),
			});
		}
		for (field, value) in shape.fields().iter().zip(values.iter()) {
			if value.field_type() != field.ty {
				return Err(ShapeError::TypeMismatch {
					field: field.name.to_string(),
					expected: field.ty,
					found: value.field_type(),
				});
			}
		}
		Ok(Self {
			shape: shape.clone(),
			values,
		})
	}

	/// Assembles an aggregate from slots that already conform to `shape`.
	///
	/// Columnar storage uses this when materializing an element: its lanes were
	/// declared from `shape`, so the slots are well-typed by construction.
	#[doc(hidden)]
	pub fn __assemble(shape: Shape, values: Box<[Value]>) -> Self {
		debug_assert_eq!(shape.len(), values.len());
		debug_assert!(shape.types().zip(values.iter()).all(|(ty, v)| v.field_type() == ty));
		Self { shape, values }
	}

	#[inline]
	pub fn shape(&self) -> &Shape {
		&self.shape
	}

	#[inline]
	pub fn values(&self) -> &[Value] {
		&self.values
	}

	pub fn value(&self, index: usize) -> Option<&Value> {
		self.values.get(index)
	}

	/// Slot of the field called `name`.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.shape.position(name).map(|i| &self.values[i])
	}

	/// Returns a copy with the field `name` replaced.
	pub fn with(&self, name: &str, value: impl Into<Value>) -> Result<Self> {
		let index = self
			.shape
			.position(name)
			.ok_or_else(|| ShapeError::UnknownField(name.to_string()))?;
		let value = value.into();
		let expected = self.shape.fields()[index].ty;
		if value.field_type() != expected {
			return Err(ShapeError::TypeMismatch {
				field: name.to_string(),
				expected,
				found: value.field_type(),
			});
		}
		let mut values = self.values.clone();
		values[index] = value;
		Ok(Self {
			shape: self.shape.clone(),
			values,
		})
	}
}

impl fmt::Display for Aggregate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("{")?;
		for (i, (field, value)) in self.shape.fields().iter().zip(self.values.iter()).enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{}: {value}", field.name)?;
		}
		f.write_str("}")
	}
}

impl fmt::Debug for Aggregate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Aggregate{self}")
	}
}
