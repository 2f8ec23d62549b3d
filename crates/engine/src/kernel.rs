//! Per-type kernels.
//!
//! A [`Kernel`] bundles everything the specializer needs to emit storage for
//! one field type: the lane constructor and the set of extension points its
//! lane implements. The [`KernelTable`] maps every field type to its kernel.

use std::fmt;
use std::sync::Arc;

use colonnade_shape::FieldType;
use rustc_hash::FxHashMap;

use crate::{ExtensionPoint, ExtensionSet, Lane, Scalar, TypedLane};

/// Lane constructor for one field type.
pub type DeclareFn = fn(usize) -> Box<dyn Lane>;

#[derive(Clone, Copy)]
pub struct Kernel {
	field_type: FieldType,
	declare: DeclareFn,
	provides: ExtensionSet,
}

impl Kernel {
	/// The kernel backed by [`TypedLane<T>`], providing every extension point.
	pub fn of<T: Scalar>() -> Self {
		Self {
			field_type: T::FIELD_TYPE,
			declare: declare_lane::<T>,
			provides: ExtensionSet::ALL,
		}
	}

	/// Drops `point` from the advertised extension points.
	pub fn lacking(mut self, point: ExtensionPoint) -> Self {
		self.provides = self.provides.without(point);
		self
	}

	#[inline]
	pub fn field_type(&self) -> FieldType {
		self.field_type
	}

	#[inline]
	pub fn provides(&self) -> ExtensionSet {
		self.provides
	}

	#[inline]
	pub fn declare_fn(&self) -> DeclareFn {
		self.declare
	}

	pub fn declare(&self, capacity: usize) -> Box<dyn Lane> {
		(self.declare)(capacity)
	}
}

impl fmt::Debug for Kernel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Kernel")
			.field("field_type", &self.field_type)
			.field("provides", &self.provides)
			.finish()
	}
}

fn declare_lane<T: Scalar>(capacity: usize) -> Box<dyn Lane> {
	Box::new(TypedLane::<T>::with_capacity(capacity))
}

/// Field type to kernel mapping used by the specializer.
#[derive(Debug, Clone, Default)]
pub struct KernelTable {
	kernels: FxHashMap<FieldType, Kernel>,
}

impl KernelTable {
	/// Kernels for every field type. References are nullable.
	pub fn builtin() -> Self {
		let mut table = Self::default();
		for kernel in [
			Kernel::of::<bool>(),
			Kernel::of::<i8>(),
			Kernel::of::<i16>(),
			Kernel::of::<i32>(),
			Kernel::of::<i64>(),
			Kernel::of::<f32>(),
			Kernel::of::<f64>(),
			Kernel::of::<char>(),
			Kernel::of::<Option<Arc<str>>>(),
			Kernel::of::<Option<Arc<[u8]>>>(),
		] {
			table.insert(kernel);
		}
		table
	}

	/// Installs `kernel` for its field type, returning the one it replaces.
	pub fn insert(&mut self, kernel: Kernel) -> Option<Kernel> {
		self.kernels.insert(kernel.field_type, kernel)
	}

	/// The table without a kernel for `field_type`.
	pub fn without(mut self, field_type: FieldType) -> Self {
		self.kernels.remove(&field_type);
		self
	}

	pub fn get(&self, field_type: FieldType) -> Option<&Kernel> {
		self.kernels.get(&field_type)
	}

	pub fn len(&self) -> usize {
		self.kernels.len()
	}

	pub fn is_empty(&self) -> bool {
		self.kernels.is_empty()
	}
}
