//! Error types for shape construction and aggregate validation.

use thiserror::Error;

use crate::{FieldType, Shape};

/// Errors raised while describing a shape or building a value of it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
	/// Two fields of one shape share a name.
	#[error("duplicate field name: {0}")]
	DuplicateField(String),

	/// A field was declared with an empty name.
	#[error("field {position} has an empty name")]
	EmptyFieldName {
		/// Position of the offending field.
		position: usize,
	},

	/// A field type name is not one of the supported element types.
	#[error("unsupported field type: {0}")]
	UnsupportedType(String),

	/// An aggregate was given the wrong number of values.
	#[error("expected {expected} values, got {found}")]
	ArityMismatch {
		/// Number of fields in the shape.
		expected: usize,
		/// Number of values supplied.
		found: usize,
	},

	/// A value does not match the declared type of its field.
	#[error("field '{field}' expects {expected}, got {found}")]
	TypeMismatch {
		/// Name of the field.
		field: String,
		/// Declared type of the field.
		expected: FieldType,
		/// Type of the supplied value.
		found: FieldType,
	},

	/// A null reference was read into a field that cannot hold one.
	#[error("field '{0}' is not nullable")]
	NullField(String),

	/// A field name lookup failed.
	#[error("unknown field: {0}")]
	UnknownField(String),

	/// An aggregate of one shape was handed to storage of another.
	#[error("expected an aggregate of shape {expected}, got {found}")]
	Mismatch {
		/// Shape the storage was specialized for.
		expected: Shape,
		/// Shape of the rejected aggregate.
		found: Shape,
	},
}

/// Errors raised while loading a shape catalog from configuration.
#[derive(Debug, Error)]
pub enum CatalogError {
	/// The document is not valid TOML or does not match the catalog layout.
	#[error("invalid shape catalog: {0}")]
	Toml(#[from] toml::de::Error),

	/// A named shape entry failed validation.
	#[error("shape '{name}': {source}")]
	Shape {
		/// Catalog key of the entry.
		name: String,
		/// The validation failure.
		#[source]
		source: ShapeError,
	},

	/// A lookup named a shape the catalog does not define.
	#[error("unknown shape: {0}")]
	UnknownShape(String),
}

/// Result type for shape operations.
pub type Result<T> = std::result::Result<T, ShapeError>;
