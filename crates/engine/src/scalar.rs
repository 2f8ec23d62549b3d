//! Element types that can back one field array.

use std::fmt;
use std::sync::Arc;

use colonnade_shape::{FieldType, Value, same_f32, same_f64};

/// A Rust type stored unboxed in one field array.
///
/// `Default` is the value of a freshly declared or cleared slot. Equality via
/// [`same`](Scalar::same) is by value; floats compare bitwise with all NaNs
/// equal.
pub trait Scalar: Clone + Default + fmt::Debug + Send + Sync + 'static {
	/// The field type this element type stores.
	const FIELD_TYPE: FieldType;

	fn to_value(&self) -> Value;

	/// Converts a slot value back, or `None` if it does not fit this type.
	fn from_value(value: &Value) -> Option<Self>;

	fn same(&self, other: &Self) -> bool;

	fn same_as_value(&self, value: &Value) -> bool {
		Self::from_value(value).is_some_and(|v| self.same(&v))
	}
}

macro_rules! primitive_scalar {
	($($ty:ty => $variant:ident),* $(,)?) => {
		$(
			impl Scalar for $ty {
				const FIELD_TYPE: FieldType = FieldType::$variant;

				#[inline]
				fn to_value(&self) -> Value {
					Value::$variant(*self)
				}

				#[inline]
				fn from_value(value: &Value) -> Option<Self> {
					match *value {
						Value::$variant(v) => Some(v),
						_ => None,
					}
				}

				#[inline]
				fn same(&self, other: &Self) -> bool {
					self == other
				}

				#[inline]
				fn same_as_value(&self, value: &Value) -> bool {
					matches!(*value, Value::$variant(v) if v == *self)
				}
			}
		)*
	};
}

primitive_scalar! {
	bool => Bool,
	i8 => I8,
	i16 => I16,
	i32 => I32,
	i64 => I64,
	char => Char,
}

impl Scalar for f32 {
	const FIELD_TYPE: FieldType = FieldType::F32;

	fn to_value(&self) -> Value {
		Value::F32(*self)
	}

	fn from_value(value: &Value) -> Option<Self> {
		match *value {
			Value::F32(v) => Some(v),
			_ => None,
		}
	}

	fn same(&self, other: &Self) -> bool {
		same_f32(*self, *other)
	}

	fn same_as_value(&self, value: &Value) -> bool {
		matches!(*value, Value::F32(v) if same_f32(v, *self))
	}
}

impl Scalar for f64 {
	const FIELD_TYPE: FieldType = FieldType::F64;

	fn to_value(&self) -> Value {
		Value::F64(*self)
	}

	fn from_value(value: &Value) -> Option<Self> {
		match *value {
			Value::F64(v) => Some(v),
			_ => None,
		}
	}

	fn same(&self, other: &Self) -> bool {
		same_f64(*self, *other)
	}

	fn same_as_value(&self, value: &Value) -> bool {
		matches!(*value, Value::F64(v) if same_f64(v, *self))
	}
}

impl Scalar for Option<Arc<str>> {
	const FIELD_TYPE: FieldType = FieldType::Str;

	fn to_value(&self) -> Value {
		Value::Str(self.clone())
	}

	fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::Str(v) => Some(v.clone()),
			_ => None,
		}
	}

	fn same(&self, other: &Self) -> bool {
		self == other
	}

	fn same_as_value(&self, value: &Value) -> bool {
		matches!(value, Value::Str(v) if v == self)
	}
}

impl Scalar for Option<Arc<[u8]>> {
	const FIELD_TYPE: FieldType = FieldType::Bytes;

	fn to_value(&self) -> Value {
		Value::Bytes(self.clone())
	}

	fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::Bytes(v) => Some(v.clone()),
			_ => None,
		}
	}

	fn same(&self, other: &Self) -> bool {
		self == other
	}

	fn same_as_value(&self, value: &Value) -> bool {
		matches!(value, Value::Bytes(v) if v == self)
	}
}

// Non-nullable string and byte fields. Null slot values do not convert back.

impl Scalar for Arc<str> {
	const FIELD_TYPE: FieldType = FieldType::Str;

	fn to_value(&self) -> Value {
		Value::Str(Some(self.clone()))
	}

	fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::Str(Some(v)) => Some(v.clone()),
			_ => None,
		}
	}

	fn same(&self, other: &Self) -> bool {
		self == other
	}

	fn same_as_value(&self, value: &Value) -> bool {
		value.as_str() == Some(&**self)
	}
}

impl Scalar for String {
	const FIELD_TYPE: FieldType = FieldType::Str;

	fn to_value(&self) -> Value {
		Value::Str(Some(Arc::from(self.as_str())))
	}

	fn from_value(value: &Value) -> Option<Self> {
		value.as_str().map(str::to_owned)
	}

	fn same(&self, other: &Self) -> bool {
		self == other
	}

	fn same_as_value(&self, value: &Value) -> bool {
		value.as_str() == Some(self.as_str())
	}
}

impl Scalar for Vec<u8> {
	const FIELD_TYPE: FieldType = FieldType::Bytes;

	fn to_value(&self) -> Value {
		Value::Bytes(Some(Arc::from(self.as_slice())))
	}

	fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::Bytes(Some(v)) => Some(v.to_vec()),
			_ => None,
		}
	}

	fn same(&self, other: &Self) -> bool {
		self == other
	}

	fn same_as_value(&self, value: &Value) -> bool {
		matches!(value, Value::Bytes(Some(v)) if **v == **self)
	}
}
