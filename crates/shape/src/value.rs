use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::FieldType;

/// A single field slot of an aggregate.
///
/// Floating point slots compare bitwise, except that every NaN equals every
/// other NaN, which keeps `Value` a lawful `Eq + Hash` type.
#[derive(Debug, Clone)]
pub enum Value {
	Bool(bool),
	I8(i8),
	I16(i16),
	I32(i32),
	I64(i64),
	F32(f32),
	F64(f64),
	Char(char),
	Str(Option<Arc<str>>),
	Bytes(Option<Arc<[u8]>>),
}

impl Value {
	/// The zero value a freshly declared slot of `ty` holds.
	pub fn default_for(ty: FieldType) -> Self {
		match ty {
			FieldType::Bool => Value::Bool(false),
			FieldType::I8 => Value::I8(0),
			FieldType::I16 => Value::I16(0),
			FieldType::I32 => Value::I32(0),
			FieldType::I64 => Value::I64(0),
			FieldType::F32 => Value::F32(0.0),
			FieldType::F64 => Value::F64(0.0),
			FieldType::Char => Value::Char('\0'),
			FieldType::Str => Value::Str(None),
			FieldType::Bytes => Value::Bytes(None),
		}
	}

	pub fn field_type(&self) -> FieldType {
		match self {
			Value::Bool(_) => FieldType::Bool,
			Value::I8(_) => FieldType::I8,
			Value::I16(_) => FieldType::I16,
			Value::I32(_) => FieldType::I32,
			Value::I64(_) => FieldType::I64,
			Value::F32(_) => FieldType::F32,
			Value::F64(_) => FieldType::F64,
			Value::Char(_) => FieldType::Char,
			Value::Str(_) => FieldType::Str,
			Value::Bytes(_) => FieldType::Bytes,
		}
	}

	/// Returns true for a null reference slot.
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Str(None) | Value::Bytes(None))
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::Str(Some(s)) => Some(s),
			_ => None,
		}
	}
}

/// Float equality used by every columnar comparison.
#[inline]
pub fn same_f32(a: f32, b: f32) -> bool {
	a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}

#[inline]
pub fn same_f64(a: f64, b: f64) -> bool {
	a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::Bool(a), Value::Bool(b)) => a == b,
			(Value::I8(a), Value::I8(b)) => a == b,
			(Value::I16(a), Value::I16(b)) => a == b,
			(Value::I32(a), Value::I32(b)) => a == b,
			(Value::I64(a), Value::I64(b)) => a == b,
			(Value::F32(a), Value::F32(b)) => same_f32(*a, *b),
			(Value::F64(a), Value::F64(b)) => same_f64(*a, *b),
			(Value::Char(a), Value::Char(b)) => a == b,
			(Value::Str(a), Value::Str(b)) => a == b,
			(Value::Bytes(a), Value::Bytes(b)) => a == b,
			_ => false,
		}
	}
}

impl Eq for Value {}

impl Hash for Value {
	fn hash<H: Hasher>(&self, state: &mut H) {
		std::mem::discriminant(self).hash(state);
		match self {
			Value::Bool(v) => v.hash(state),
			Value::I8(v) => v.hash(state),
			Value::I16(v) => v.hash(state),
			Value::I32(v) => v.hash(state),
			Value::I64(v) => v.hash(state),
			Value::F32(v) => {
				let bits = if v.is_nan() { f32::NAN.to_bits() } else { v.to_bits() };
				bits.hash(state)
			}
			Value::F64(v) => {
				let bits = if v.is_nan() { f64::NAN.to_bits() } else { v.to_bits() };
				bits.hash(state)
			}
			Value::Char(v) => v.hash(state),
			Value::Str(v) => v.hash(state),
			Value::Bytes(v) => v.hash(state),
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Bool(v) => write!(f, "{v}"),
			Value::I8(v) => write!(f, "{v}"),
			Value::I16(v) => write!(f, "{v}"),
			Value::I32(v) => write!(f, "{v}"),
			Value::I64(v) => write!(f, "{v}"),
			Value::F32(v) => write!(f, "{v}"),
			Value::F64(v) => write!(f, "{v}"),
			Value::Char(v) => write!(f, "{v:?}"),
			Value::Str(Some(s)) => write!(f, "{s:?}"),
			Value::Bytes(Some(b)) => write!(f, "{b:?}"),
			Value::Str(None) | Value::Bytes(None) => f.write_str("null"),
		}
	}
}

macro_rules! impl_from_primitive {
	($($ty:ty => $variant:ident),* $(,)?) => {
		$(
			impl From<$ty> for Value {
				#[inline]
				fn from(v: $ty) -> Self {
					Value::$variant(v)
				}
			}
		)*
	};
}

impl_from_primitive! {
	bool => Bool,
	i8 => I8,
	i16 => I16,
	i32 => I32,
	i64 => I64,
	f32 => F32,
	f64 => F64,
	char => Char,
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::Str(Some(Arc::from(s)))
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::Str(Some(Arc::from(s)))
	}
}

impl From<Arc<str>> for Value {
	fn from(s: Arc<str>) -> Self {
		Value::Str(Some(s))
	}
}

impl From<Option<&str>> for Value {
	fn from(s: Option<&str>) -> Self {
		Value::Str(s.map(Arc::from))
	}
}

impl From<&[u8]> for Value {
	fn from(b: &[u8]) -> Self {
		Value::Bytes(Some(Arc::from(b)))
	}
}

impl From<Vec<u8>> for Value {
	fn from(b: Vec<u8>) -> Self {
		Value::Bytes(Some(Arc::from(b)))
	}
}
