//! Lazily built alternate-form lookup table.
//!
//! # Role
//!
//! A resolver only needs its alternate-form table when a caller asks for
//! alternate-form matching, so the table is built on first use and published
//! through an [`ArcSwapOption`] slot.
//!
//! # Concurrency
//!
//! - **Reads:** Wait-free (atomic load of the slot).
//! - **First use:** Racing callers may each build a table. Publication is a
//!   compare-and-swap from empty, so exactly one build is installed and losers
//!   adopt the winner. Builds are side-effect free and value-equal.
//!
//! # Invariants
//!
//! - Once a table is published it is never replaced.
//! - Readers only ever observe a fully built table.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::lookup::LookupTable;

/// Produces the alternate-form lookup table for a closed set.
pub trait TableBuilder: Send + Sync {
	fn build(&self) -> LookupTable;
}

impl<F> TableBuilder for F
where
	F: Fn() -> LookupTable + Send + Sync,
{
	fn build(&self) -> LookupTable {
		self()
	}
}

/// Write-once cache slot holding the alternate-form table.
pub struct SecondaryTable {
	label: Arc<str>,
	slot: ArcSwapOption<LookupTable>,
	builder: Arc<dyn TableBuilder>,
}

impl SecondaryTable {
	pub fn new(label: Arc<str>, builder: Arc<dyn TableBuilder>) -> Self {
		Self {
			label,
			slot: ArcSwapOption::empty(),
			builder,
		}
	}

	/// Returns the published table, building and publishing it if absent.
	pub fn get_or_build(&self) -> Arc<LookupTable> {
		if let Some(table) = self.slot.load_full() {
			return table;
		}

		let built = Arc::new(self.builder.build());
		tracing::trace!(set = &*self.label, keys = built.len(), "built alternate-form table");

		let prev = self
			.slot
			.compare_and_swap(&None::<Arc<LookupTable>>, Some(Arc::clone(&built)));
		match &*prev {
			None => built,
			Some(winner) => {
				tracing::trace!(set = &*self.label, "alternate-form table already published");
				Arc::clone(winner)
			}
		}
	}

	/// Returns the published table without building it.
	pub fn get(&self) -> Option<Arc<LookupTable>> {
		self.slot.load_full()
	}

	/// Returns true once a table has been published.
	pub fn is_built(&self) -> bool {
		self.slot.load().is_some()
	}
}

impl std::fmt::Debug for SecondaryTable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SecondaryTable")
			.field("label", &self.label)
			.field("built", &self.is_built())
			.finish_non_exhaustive()
	}
}
