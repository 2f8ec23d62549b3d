//! Process-wide cache of specializations.
//!
//! # Role
//!
//! Maps each (blueprint, shape) pair to the one [`Specialization`] every
//! container of that kind and shape shares. The specializer runs on a cache
//! miss only.
//!
//! # Invariants
//!
//! - At most one specialization is ever published per key; every caller
//!   observes the same `Arc` for equal keys.
//! - Entries are never evicted or replaced.
//! - A failed specialization publishes nothing.
//!
//! # Concurrency & ordering
//!
//! - Readers are wait-free (`ArcSwap` load + immutable map reads).
//! - Writers specialize outside any lock, then publish through a CAS retry
//!   loop. A writer that finds the key already published discards its own
//!   result and returns the winner, so racing first uses may run the
//!   specializer redundantly but never disagree.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;
use colonnade_shape::Shape;
use rustc_hash::FxHashMap;

use crate::{Blueprint, LinkageError, Specialization, Specializer};

#[derive(Clone, PartialEq, Eq, Hash)]
struct SpeciesKey {
	blueprint: &'static str,
	shape: Shape,
}

impl SpeciesKey {
	fn new(blueprint: &Blueprint, shape: &Shape) -> Self {
		Self {
			blueprint: blueprint.name,
			shape: shape.clone(),
		}
	}
}

#[derive(Default)]
struct Snapshot {
	by_key: FxHashMap<SpeciesKey, Arc<Specialization>>,
}

/// Append-only registry of specializations.
pub struct ShapeRegistry {
	snap: ArcSwap<Snapshot>,
	specializer: Specializer,
	runs: AtomicUsize,
}

static GLOBAL: OnceLock<ShapeRegistry> = OnceLock::new();

impl ShapeRegistry {
	/// The process-wide registry, created on first use with builtin kernels.
	pub fn global() -> &'static ShapeRegistry {
		GLOBAL.get_or_init(ShapeRegistry::new)
	}

	pub fn new() -> Self {
		Self::with_specializer(Specializer::default())
	}

	pub fn with_specializer(specializer: Specializer) -> Self {
		Self {
			snap: ArcSwap::from_pointee(Snapshot::default()),
			specializer,
			runs: AtomicUsize::new(0),
		}
	}

	/// Returns the published specialization, if any.
	pub fn lookup(&self, blueprint: &Blueprint, shape: &Shape) -> Option<Arc<Specialization>> {
		self.snap.load().by_key.get(&SpeciesKey::new(blueprint, shape)).cloned()
	}

	/// Returns the specialization for `(blueprint, shape)`, creating and
	/// publishing it on first use.
	pub fn specialize(
		&self,
		blueprint: &'static Blueprint,
		shape: &Shape,
	) -> Result<Arc<Specialization>, LinkageError> {
		let key = SpeciesKey::new(blueprint, shape);
		if let Some(hit) = self.snap.load().by_key.get(&key) {
			tracing::trace!(blueprint = blueprint.name, %shape, "registry hit");
			return Ok(Arc::clone(hit));
		}

		let candidate = match self.specializer.specialize(blueprint, shape) {
			Ok(spec) => Arc::new(spec),
			Err(err) => {
				tracing::warn!(blueprint = blueprint.name, %shape, %err, "specialization failed");
				return Err(err);
			}
		};
		self.runs.fetch_add(1, Ordering::Relaxed);

		loop {
			let old = self.snap.load_full();
			if let Some(winner) = old.by_key.get(&key) {
				tracing::debug!(blueprint = blueprint.name, %shape, "lost publication race");
				return Ok(Arc::clone(winner));
			}

			let mut by_key = old.by_key.clone();
			by_key.insert(key.clone(), Arc::clone(&candidate));
			let new_arc = Arc::new(Snapshot { by_key });

			let prev = self.snap.compare_and_swap(&old, new_arc);
			if Arc::ptr_eq(&prev, &old) {
				tracing::debug!(blueprint = blueprint.name, %shape, "published specialization");
				return Ok(candidate);
			}
			// Another writer published first; retry against its snapshot.
		}
	}

	/// Number of published specializations.
	pub fn len(&self) -> usize {
		self.snap.load().by_key.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Number of successful specializer runs, including ones that lost a race.
	pub fn specializations_run(&self) -> usize {
		self.runs.load(Ordering::Relaxed)
	}
}

impl Default for ShapeRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for ShapeRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ShapeRegistry")
			.field("len", &self.len())
			.field("specializations_run", &self.specializations_run())
			.finish()
	}
}
