use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ShapeError;

/// Element type of one field.
///
/// Primitive types are stored unboxed, one plain array per field. `Str` and
/// `Bytes` are reference types: their slots are nullable and are released when
/// an element leaves the live range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum FieldType {
	Bool,
	I8,
	I16,
	I32,
	I64,
	F32,
	F64,
	Char,
	Str,
	Bytes,
}

impl FieldType {
	/// Every supported field type, primitives first.
	pub const ALL: [FieldType; 10] = [
		FieldType::Bool,
		FieldType::I8,
		FieldType::I16,
		FieldType::I32,
		FieldType::I64,
		FieldType::F32,
		FieldType::F64,
		FieldType::Char,
		FieldType::Str,
		FieldType::Bytes,
	];

	/// Canonical configuration name.
	pub const fn name(self) -> &'static str {
		match self {
			FieldType::Bool => "bool",
			FieldType::I8 => "i8",
			FieldType::I16 => "i16",
			FieldType::I32 => "i32",
			FieldType::I64 => "i64",
			FieldType::F32 => "f32",
			FieldType::F64 => "f64",
			FieldType::Char => "char",
			FieldType::Str => "str",
			FieldType::Bytes => "bytes",
		}
	}

	/// Returns true for nullable, heap-backed field types.
	#[inline]
	pub const fn is_reference(self) -> bool {
		matches!(self, FieldType::Str | FieldType::Bytes)
	}
}

impl fmt::Display for FieldType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for FieldType {
	type Err = ShapeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let ty = match s {
			"bool" | "boolean" => FieldType::Bool,
			"i8" | "byte" => FieldType::I8,
			"i16" | "short" => FieldType::I16,
			"i32" | "int" => FieldType::I32,
			"i64" | "long" => FieldType::I64,
			"f32" | "float" => FieldType::F32,
			"f64" | "double" => FieldType::F64,
			"char" => FieldType::Char,
			"str" | "string" => FieldType::Str,
			"bytes" => FieldType::Bytes,
			other => return Err(ShapeError::UnsupportedType(other.to_string())),
		};
		Ok(ty)
	}
}

impl TryFrom<String> for FieldType {
	type Error = ShapeError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl Serialize for FieldType {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.name())
	}
}

/// One named, typed field of a shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDef {
	/// Field name, unique within its shape.
	pub name: Box<str>,
	/// Element type stored for this field.
	#[serde(rename = "type")]
	pub ty: FieldType,
}

impl FieldDef {
	pub fn new(name: impl Into<Box<str>>, ty: FieldType) -> Self {
		Self {
			name: name.into(),
			ty,
		}
	}
}

impl fmt::Display for FieldDef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.name, self.ty)
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case("bool", FieldType::Bool)]
	#[case("boolean", FieldType::Bool)]
	#[case("int", FieldType::I32)]
	#[case("long", FieldType::I64)]
	#[case("double", FieldType::F64)]
	#[case("string", FieldType::Str)]
	#[case("bytes", FieldType::Bytes)]
	fn parses_names_and_aliases(#[case] name: &str, #[case] expected: FieldType) {
		assert_eq!(name.parse::<FieldType>(), Ok(expected));
	}

	#[test]
	fn canonical_names_round_trip() {
		for ty in FieldType::ALL {
			assert_eq!(ty.name().parse::<FieldType>(), Ok(ty));
		}
	}

	#[test]
	fn rejects_unknown_type() {
		assert_eq!(
			"object".parse::<FieldType>(),
			Err(ShapeError::UnsupportedType("object".into()))
		);
	}

	#[test]
	fn only_str_and_bytes_are_references() {
		let refs: Vec<_> = FieldType::ALL.into_iter().filter(|t| t.is_reference()).collect();
		assert_eq!(refs, [FieldType::Str, FieldType::Bytes]);
	}
}
