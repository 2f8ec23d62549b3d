//! Specialization engine for columnar containers.
//!
//! # Role
//!
//! The container algorithms are written once against [`Columnar`]. This crate
//! provides the two ways a concrete layout comes into being:
//!
//! - Runtime shapes: the [`Specializer`] links a [`Blueprint`] against a
//!   [`KernelTable`], producing a [`Specialization`] whose storage is
//!   [`DynColumns`]. The [`ShapeRegistry`] caches one specialization per
//!   (blueprint, shape).
//! - Compile-time shapes: `#[derive(Record)]` expands the extension points
//!   into a dedicated [`StaticLayout`] per record type.
//!
//! # Invariants
//!
//! - Primitive fields are stored unboxed, one array per field.
//! - A [`LinkageError`] never leaves a partial entry in a registry.

mod blueprint;
mod error;
mod kernel;
mod lane;
mod record;
mod registry;
mod scalar;
mod specialization;
mod specializer;

pub use blueprint::{
	Blueprint, Columnar, ExtensionPoint, ExtensionSet, SEQUENCE, StaticLayout, TABLE,
};
pub use error::LinkageError;
pub use kernel::{DeclareFn, Kernel, KernelTable};
pub use lane::{Lane, TypedLane, declare_slots, regrow};
pub use record::{Record, __check_shape, __extract};
pub use registry::ShapeRegistry;
pub use scalar::Scalar;
pub use specialization::{DynColumns, Specialization};
pub use specializer::{Specializer, specialize};
