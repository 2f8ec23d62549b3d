//! Blueprint specialization.
//!
//! # Role
//!
//! Links a [`Blueprint`] against a [`Shape`]: resolves one kernel per field and
//! checks that each kernel provides every extension point the blueprint calls.
//! The result is a [`Specialization`], whose `declare` entry point produces
//! storage laid out as one typed array per field.
//!
//! # Failure modes
//!
//! Linkage either succeeds for every field or produces a [`LinkageError`] and
//! nothing else. Malformed shapes cannot reach this point: [`Shape`] rejects
//! them on construction.

use colonnade_shape::Shape;

use crate::{Blueprint, KernelTable, LinkageError, Specialization};

/// Produces specializations from a kernel table.
#[derive(Debug, Clone)]
pub struct Specializer {
	kernels: KernelTable,
}

impl Default for Specializer {
	fn default() -> Self {
		Self::new(KernelTable::builtin())
	}
}

impl Specializer {
	pub fn new(kernels: KernelTable) -> Self {
		Self { kernels }
	}

	pub fn kernels(&self) -> &KernelTable {
		&self.kernels
	}

	pub fn specialize(
		&self,
		blueprint: &'static Blueprint,
		shape: &Shape,
	) -> Result<Specialization, LinkageError> {
		let mut declares = Vec::with_capacity(shape.len());
		for field in shape.fields() {
			let kernel = self
				.kernels
				.get(field.ty)
				.ok_or_else(|| LinkageError::MissingKernel {
					field: field.name.to_string(),
					field_type: field.ty,
				})?;
			if let Some(&point) = blueprint
				.extension_points
				.iter()
				.find(|p| !kernel.provides().contains(**p))
			{
				return Err(LinkageError::MissingExtension {
					blueprint: blueprint.name,
					point,
					field_type: field.ty,
				});
			}
			declares.push(kernel.declare_fn());
		}

		tracing::debug!(blueprint = blueprint.name, %shape, "specialized");
		Ok(Specialization::new(blueprint, shape.clone(), declares.into_boxed_slice()))
	}
}

/// Specializes `blueprint` for `shape` with the builtin kernels.
pub fn specialize(blueprint: &'static Blueprint, shape: &Shape) -> Result<Specialization, LinkageError> {
	Specializer::default().specialize(blueprint, shape)
}
