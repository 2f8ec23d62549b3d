//! Linkage errors.

use colonnade_shape::FieldType;
use thiserror::Error;

use crate::ExtensionPoint;

/// The specializer could not link a blueprint against the available kernels.
///
/// This is never caused by the caller's data: it means the blueprint asks for
/// an extension point that the kernel set does not provide, which is a version
/// mismatch inside the library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkageError {
	/// No kernel is registered for a field's element type.
	#[error("no kernel for field '{field}' of type {field_type}")]
	MissingKernel {
		/// Name of the field that could not be linked.
		field: String,
		/// Element type of that field.
		field_type: FieldType,
	},

	/// A kernel exists but does not implement an extension point the blueprint uses.
	#[error("blueprint '{blueprint}' needs {point:?}, which the {field_type} kernel does not provide")]
	MissingExtension {
		/// Name of the blueprint being specialized.
		blueprint: &'static str,
		/// The unresolved extension point.
		point: ExtensionPoint,
		/// Element type whose kernel lacks it.
		field_type: FieldType,
	},
}
