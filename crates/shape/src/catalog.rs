//! Shape catalogs loaded from TOML.
//!
//! Shapes known only at runtime are described as named entries under a
//! `shapes` table:
//!
//! ```toml
//! [shapes.person]
//! fields = [
//!     { name = "age", type = "i32" },
//!     { name = "name", type = "str" },
//! ]
//! ```
//!
//! Every entry goes through the same validation as [`Shape::new`].

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::{CatalogError, FieldDef, FieldType, Shape, ShapeError};

/// Catalog file structure.
#[derive(Debug, Deserialize)]
struct CatalogConfig {
	#[serde(default)]
	shapes: BTreeMap<String, ShapeConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShapeConfig {
	#[serde(default)]
	fields: Vec<FieldConfig>,
}

/// Field entry with its type kept as text so that unknown names surface as
/// [`ShapeError::UnsupportedType`] rather than a TOML decoding error.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldConfig {
	name: String,
	#[serde(rename = "type")]
	ty: String,
}

/// Named shapes decoded from configuration, ordered by name.
#[derive(Debug, Clone, Default)]
pub struct ShapeCatalog {
	shapes: BTreeMap<String, Shape>,
}

impl ShapeCatalog {
	pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
		let config: CatalogConfig = toml::from_str(source)?;
		let mut shapes = BTreeMap::new();
		for (name, entry) in config.shapes {
			match build_shape(entry) {
				Ok(shape) => {
					shapes.insert(name, shape);
				}
				Err(source) => return Err(CatalogError::Shape { name, source }),
			}
		}
		Ok(Self { shapes })
	}

	pub fn get(&self, name: &str) -> Option<&Shape> {
		self.shapes.get(name)
	}

	/// Like [`get`](Self::get), failing with [`CatalogError::UnknownShape`].
	pub fn require(&self, name: &str) -> Result<&Shape, CatalogError> {
		self.get(name)
			.ok_or_else(|| CatalogError::UnknownShape(name.to_string()))
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.shapes.keys().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Shape)> {
		self.shapes.iter().map(|(name, shape)| (name.as_str(), shape))
	}

	pub fn len(&self) -> usize {
		self.shapes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.shapes.is_empty()
	}
}

fn build_shape(entry: ShapeConfig) -> Result<Shape, ShapeError> {
	let fields = entry
		.fields
		.into_iter()
		.map(|field| Ok(FieldDef::new(field.name, field.ty.parse::<FieldType>()?)))
		.collect::<Result<Vec<_>, ShapeError>>()?;
	Shape::new(fields)
}
