//! Ordinal-indexed value storage.

use std::sync::Arc;

use crate::error::TableError;

/// Immutable sequence of closed-set values where index `i` holds ordinal `i`.
pub struct OrdinalTable<V> {
	values: Arc<[V]>,
}

impl<V> Clone for OrdinalTable<V> {
	fn clone(&self) -> Self {
		Self {
			values: Arc::clone(&self.values),
		}
	}
}

impl<V: std::fmt::Debug> std::fmt::Debug for OrdinalTable<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(self.values.iter()).finish()
	}
}

impl<V> OrdinalTable<V> {
	/// Builds the table from values in definition order.
	pub fn new(values: Vec<V>) -> Result<Self, TableError> {
		if u32::try_from(values.len()).is_err() {
			return Err(TableError::TooManyConstants(values.len()));
		}
		Ok(Self {
			values: Arc::from(values),
		})
	}

	/// Returns the value at `index`, or `None` when it is negative or out of range.
	#[inline]
	pub fn get(&self, index: i64) -> Option<&V> {
		usize::try_from(index)
			.ok()
			.and_then(|index| self.values.get(index))
	}

	/// Returns the value with the given ordinal.
	#[inline]
	pub fn get_ordinal(&self, ordinal: u32) -> Option<&V> {
		self.values.get(ordinal as usize)
	}

	pub fn as_slice(&self) -> &[V] {
		&self.values
	}

	pub fn iter(&self) -> impl Iterator<Item = &V> + '_ {
		self.values.iter()
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.values.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn index_lookup_bounds() {
		let table = OrdinalTable::new(vec!["RED", "GREEN", "BLUE"]).unwrap();
		assert_eq!(table.get(0), Some(&"RED"));
		assert_eq!(table.get(2), Some(&"BLUE"));
		assert_eq!(table.get(3), None);
		assert_eq!(table.get(-1), None);
		assert_eq!(table.get(i64::MIN), None);
		assert_eq!(table.get_ordinal(1), Some(&"GREEN"));
		assert_eq!(table.len(), 3);
	}

	#[test]
	fn clones_share_storage() {
		let table = OrdinalTable::new(vec![1u8, 2, 3]).unwrap();
		let clone = table.clone();
		assert!(std::ptr::eq(table.as_slice(), clone.as_slice()));
	}
}
