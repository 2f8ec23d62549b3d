//! Shape descriptors and aggregate values.
//!
//! # Role
//!
//! This crate defines what a columnar container stores: a [`Shape`] lists the
//! fields of one kind of aggregate, an [`Aggregate`] is one value of that
//! shape, and a [`Value`] is one field slot. Shapes can also be decoded from a
//! TOML [`ShapeCatalog`].
//!
//! # Invariants
//!
//! - Field names within a shape are non-empty and unique.
//! - Shape equality and hashing depend only on the ordered field list.
//! - Every aggregate holds exactly one value per field, of the field's type.

mod aggregate;
mod catalog;
mod error;
mod field;
mod shape;
mod value;

pub use aggregate::Aggregate;
pub use catalog::ShapeCatalog;
pub use error::{CatalogError, Result, ShapeError};
pub use field::{FieldDef, FieldType};
pub use shape::{Shape, ShapeBuilder, ShapeDef};
pub use value::{Value, same_f32, same_f64};
