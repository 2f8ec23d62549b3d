//! Shape descriptors.
//!
//! A [`Shape`] is the ordered `(name, type)` field list of one kind of
//! aggregate. Shapes are immutable and cheap to clone; two shapes are equal
//! when their field lists are equal in order, name and type, regardless of
//! where or how often they were constructed.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{FieldDef, FieldType, Result, ShapeError};

struct ShapeInner {
	fields: Box<[FieldDef]>,
	reference_fields: Box<[usize]>,
}

/// Descriptor of an aggregate's field layout.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "ShapeDef", into = "ShapeDef")]
pub struct Shape(Arc<ShapeInner>);

/// Serialized form of a shape: a bare field list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeDef {
	pub fields: Vec<FieldDef>,
}

impl Shape {
	/// Builds a shape, rejecting empty or duplicate field names.
	pub fn new(fields: impl IntoIterator<Item = FieldDef>) -> Result<Self> {
		let fields: Box<[FieldDef]> = fields.into_iter().collect();
		let mut seen = HashSet::with_capacity(fields.len());
		for (position, field) in fields.iter().enumerate() {
			if field.name.is_empty() {
				return Err(ShapeError::EmptyFieldName { position });
			}
			if !seen.insert(&*field.name) {
				return Err(ShapeError::DuplicateField(field.name.to_string()));
			}
		}
		Ok(Self::from_valid(fields))
	}

	/// Starts a shape from an empty field list.
	pub fn builder() -> ShapeBuilder {
		ShapeBuilder::default()
	}

	/// The zero-field shape.
	pub fn empty() -> Self {
		Self::from_valid(Box::default())
	}

	/// Builds a shape whose field names are already known to be unique.
	///
	/// Used by `#[derive(Record)]`, where the compiler has checked the names.
	#[doc(hidden)]
	pub fn __from_derive(fields: Vec<FieldDef>) -> Self {
		debug_assert!(Self::new(fields.iter().cloned()).is_ok());
		Self::from_valid(fields.into_boxed_slice())
	}

	fn from_valid(fields: Box<[FieldDef]>) -> Self {
		let reference_fields = fields
			.iter()
			.enumerate()
			.filter(|(_, f)| f.ty.is_reference())
			.map(|(i, _)| i)
			.collect();
		Self(Arc::new(ShapeInner {
			fields,
			reference_fields,
		}))
	}

	#[inline]
	pub fn fields(&self) -> &[FieldDef] {
		&self.0.fields
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.0.fields.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.0.fields.is_empty()
	}

	pub fn field(&self, index: usize) -> Option<&FieldDef> {
		self.0.fields.get(index)
	}

	/// Position of the field called `name`.
	pub fn position(&self, name: &str) -> Option<usize> {
		self.0.fields.iter().position(|f| &*f.name == name)
	}

	/// Positions of the reference-typed fields, in declaration order.
	#[inline]
	pub fn reference_fields(&self) -> &[usize] {
		&self.0.reference_fields
	}

	/// Iterates over the declared field types.
	pub fn types(&self) -> impl ExactSizeIterator<Item = FieldType> + '_ {
		self.0.fields.iter().map(|f| f.ty)
	}

	/// Returns true if both handles point at the same allocation.
	#[inline]
	pub fn ptr_eq(&self, other: &Shape) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl PartialEq for Shape {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other) || self.0.fields == other.0.fields
	}
}

impl Eq for Shape {}

impl Hash for Shape {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.0.fields.hash(state);
	}
}

impl fmt::Display for Shape {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("{")?;
		for (i, field) in self.fields().iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			write!(f, "{field}")?;
		}
		f.write_str("}")
	}
}

impl fmt::Debug for Shape {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Shape{self}")
	}
}

impl TryFrom<ShapeDef> for Shape {
	type Error = ShapeError;

	fn try_from(def: ShapeDef) -> Result<Self> {
		Shape::new(def.fields)
	}
}

impl From<Shape> for ShapeDef {
	fn from(shape: Shape) -> Self {
		ShapeDef {
			fields: shape.fields().to_vec(),
		}
	}
}

/// Incremental shape construction.
#[derive(Debug, Default, Clone)]
pub struct ShapeBuilder {
	fields: Vec<FieldDef>,
}

impl ShapeBuilder {
	pub fn field(mut self, name: impl Into<Box<str>>, ty: FieldType) -> Self {
		self.fields.push(FieldDef::new(name, ty));
		self
	}

	pub fn build(self) -> Result<Shape> {
		Shape::new(self.fields)
	}
}
