//! Struct-of-arrays containers for fixed-shape aggregates.
//!
//! # Role
//!
//! [`SoaVec`] (a growable sequence) and [`SoaMap`] (an `i32`-keyed hash table)
//! store each field of their elements in its own contiguous array instead of
//! one heap object per element. The layout comes from one of two places:
//!
//! - A [`Shape`] known only at runtime: `SoaVec::for_shape` and
//!   `SoaMap::for_shape` obtain a specialization from the [`ShapeRegistry`]
//!   and store [`Aggregate`] values.
//! - A struct with `#[derive(Record)]`: [`RecordVec<R>`] and [`RecordMap<R>`]
//!   use the layout generated at compile time and store `R` directly.
//!
//! ```ignore
//! let shape = Shape::builder()
//!     .field("age", FieldType::I32)
//!     .field("name", FieldType::Str)
//!     .build()?;
//! let mut people = SoaVec::for_shape(&shape)?;
//! people.push(Aggregate::new(&shape, [Value::from(21), Value::from("Ana")])?)?;
//! ```
//!
//! # Invariants
//!
//! - Elements read back are equal to, never identical with, the ones stored.
//! - Containers are single-owner; only the registry is shared across threads.
//! - Detached cursors report structural changes on their next access.

extern crate self as colonnade;

mod error;
mod seq;
mod stamp;
mod table;

pub use colonnade_engine::{
	Blueprint, Columnar, DynColumns, ExtensionPoint, Kernel, KernelTable, LinkageError, Record,
	SEQUENCE, Scalar, ShapeRegistry, Specialization, Specializer, StaticLayout, TABLE,
};
pub use colonnade_macros::Record;
pub use colonnade_shape::{
	Aggregate, CatalogError, FieldDef, FieldType, Shape, ShapeBuilder, ShapeCatalog, ShapeError,
	Value,
};
pub use error::{Result, SoaError};
pub use seq::{Cursor, Iter, SeqView, SoaVec};
pub use table::{Entries, Entry, EntryCursor, KeyCursor, Keys, SoaMap};

/// Sequence of derived records.
pub type RecordVec<R> = SoaVec<<R as Record>::Columns>;

/// Table of derived records.
pub type RecordMap<R> = SoaMap<<R as Record>::Columns>;

/// Capacity limits.
pub mod limits {
	pub use crate::seq::MAX_CAPACITY as SEQUENCE_MAX_CAPACITY;
	pub use crate::table::MAX_CAPACITY as TABLE_MAX_CAPACITY;
}

#[doc(hidden)]
pub mod __private {
	pub use colonnade_engine::{__check_shape, __extract, declare_slots, regrow};
}
