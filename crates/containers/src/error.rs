//! Container errors.

use colonnade_engine::LinkageError;
use colonnade_shape::ShapeError;
use thiserror::Error;

/// Errors surfaced by sequence and table operations.
///
/// Variants fall into four groups: usage errors ([`OutOfRange`],
/// [`InvalidCapacity`], [`Shape`], [`NoCurrentElement`]), unsupported
/// operations ([`Unsupported`]), structural conflicts
/// ([`ConcurrentModification`]) and library faults ([`Linkage`]).
///
/// [`OutOfRange`]: SoaError::OutOfRange
/// [`InvalidCapacity`]: SoaError::InvalidCapacity
/// [`Shape`]: SoaError::Shape
/// [`Unsupported`]: SoaError::Unsupported
/// [`ConcurrentModification`]: SoaError::ConcurrentModification
/// [`NoCurrentElement`]: SoaError::NoCurrentElement
/// [`Linkage`]: SoaError::Linkage
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SoaError {
	/// An index outside `[0, len)`.
	#[error("index {index} out of range for length {len}")]
	OutOfRange {
		/// The rejected index.
		index: usize,
		/// Length at the time of the call.
		len: usize,
	},

	/// A capacity request or growth step beyond the container's limit.
	#[error("capacity {requested} exceeds the maximum of {max}")]
	InvalidCapacity {
		/// Requested number of slots.
		requested: usize,
		/// Largest supported capacity.
		max: usize,
	},

	/// The element or shape does not fit the container.
	#[error(transparent)]
	Shape(#[from] ShapeError),

	/// The container deliberately does not implement this operation.
	#[error("{operation} is not supported")]
	Unsupported {
		/// Name of the rejected operation.
		operation: &'static str,
	},

	/// The container changed structurally after the cursor was created.
	#[error("container was structurally modified since the cursor was created")]
	ConcurrentModification,

	/// `set` was called before `next`/`previous`, or twice in a row.
	#[error("cursor has no current element")]
	NoCurrentElement,

	/// The shape could not be specialized. Indicates a fault in the library.
	#[error("specialization failed: {0}")]
	Linkage(#[from] LinkageError),
}

impl SoaError {
	/// Returns true for errors caused by the caller's arguments.
	pub fn is_usage_error(&self) -> bool {
		matches!(
			self,
			SoaError::OutOfRange { .. }
				| SoaError::InvalidCapacity { .. }
				| SoaError::Shape(_)
				| SoaError::NoCurrentElement
		)
	}

	/// Returns true when a cursor observed a structural change.
	pub fn is_structural_conflict(&self) -> bool {
		matches!(self, SoaError::ConcurrentModification)
	}

	/// Returns true when the library itself failed to link a specialization.
	pub fn is_linkage_error(&self) -> bool {
		matches!(self, SoaError::Linkage(_))
	}
}

/// Result type for container operations.
pub type Result<T> = std::result::Result<T, SoaError>;

pub(crate) fn check_capacity(requested: usize, max: usize) -> Result<()> {
	if requested > max {
		return Err(SoaError::InvalidCapacity { requested, max });
	}
	Ok(())
}
