//! Immutable string-keyed lookup tables.
//!
//! A [`LookupTable`] maps textual keys to ordinals of a closed set. It is built
//! once from `(key, ordinal)` pairs and never mutated afterwards, so it can be
//! shared across threads and read without synchronization.
//!
//! # Invariants
//!
//! - Keys are pairwise distinct. Strict construction rejects duplicates; lenient
//!   construction keeps the first occurrence.
//! - Case-insensitive lookup resolves through a folded-key index computed at build
//!   time. When two keys fold to the same string, the earlier key wins.

use std::borrow::Cow;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::{KnownKeys, TableError};

/// Key-to-ordinal mapping with exact and case-insensitive lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTable {
	by_key: FxHashMap<Box<str>, u32>,
	by_folded: FxHashMap<Box<str>, u32>,
	/// Keys in insertion order, shared with diagnostics.
	keys: Arc<[Box<str>]>,
	/// Ordinals parallel to `keys`.
	ordinals: Box<[u32]>,
}

impl LookupTable {
	/// Builds a table, rejecting duplicate keys.
	pub fn try_from_pairs<I, K>(pairs: I) -> Result<Self, TableError>
	where
		I: IntoIterator<Item = (K, u32)>,
		K: Into<Box<str>>,
	{
		let mut builder = TableBuilderState::default();
		for (key, ordinal) in pairs {
			let key = key.into();
			if let Some(&existing) = builder.by_key.get(&key) {
				return Err(TableError::DuplicateKey {
					key,
					existing,
					incoming: ordinal,
				});
			}
			builder.push(key, ordinal);
		}
		Ok(builder.finish())
	}

	/// Builds a table, keeping the first occurrence of any duplicate key.
	pub fn from_pairs<I, K>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, u32)>,
		K: Into<Box<str>>,
	{
		let mut builder = TableBuilderState::default();
		for (key, ordinal) in pairs {
			let key = key.into();
			if let Some(&existing) = builder.by_key.get(&key) {
				tracing::debug!(
					key = &*key,
					existing,
					incoming = ordinal,
					"duplicate lookup key collapsed; keeping first"
				);
				continue;
			}
			builder.push(key, ordinal);
		}
		builder.finish()
	}

	/// Exact lookup.
	#[inline]
	pub fn find(&self, key: &str) -> Option<u32> {
		self.by_key.get(key).copied()
	}

	/// Lookup ignoring letter case.
	#[inline]
	pub fn find_case_insensitive(&self, key: &str) -> Option<u32> {
		self.by_folded.get(&*fold_case(key)).copied()
	}

	/// Returns the keys in table order.
	pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
		self.keys.iter().map(|key| &**key)
	}

	/// Returns `(key, ordinal)` entries in table order.
	pub fn entries(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
		self.keys().zip(self.ordinals.iter().copied())
	}

	/// Returns the full key set for diagnostics.
	pub fn known_keys(&self) -> KnownKeys {
		KnownKeys(Arc::clone(&self.keys))
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.keys.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}
}

#[derive(Default)]
struct TableBuilderState {
	by_key: FxHashMap<Box<str>, u32>,
	by_folded: FxHashMap<Box<str>, u32>,
	keys: Vec<Box<str>>,
	ordinals: Vec<u32>,
}

impl TableBuilderState {
	fn push(&mut self, key: Box<str>, ordinal: u32) {
		self.by_folded
			.entry(fold_case(&key).into_owned().into_boxed_str())
			.or_insert(ordinal);
		self.by_key.insert(key.clone(), ordinal);
		self.keys.push(key);
		self.ordinals.push(ordinal);
	}

	fn finish(self) -> LookupTable {
		LookupTable {
			by_key: self.by_key,
			by_folded: self.by_folded,
			keys: Arc::from(self.keys),
			ordinals: self.ordinals.into_boxed_slice(),
		}
	}
}

/// Lower-cases `key`, borrowing when it is already ASCII lower-case.
fn fold_case(key: &str) -> Cow<'_, str> {
	if key.bytes().all(|b| b.is_ascii() && !b.is_ascii_uppercase()) {
		Cow::Borrowed(key)
	} else {
		Cow::Owned(key.to_lowercase())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn colors() -> LookupTable {
		LookupTable::try_from_pairs([("RED", 0), ("GREEN", 1), ("BLUE", 2)]).unwrap()
	}

	#[test]
	fn exact_lookup() {
		let table = colors();
		assert_eq!(table.find("GREEN"), Some(1));
		assert_eq!(table.find("green"), None);
		assert_eq!(table.find("PURPLE"), None);
	}

	#[test]
	fn case_insensitive_lookup() {
		let table = colors();
		assert_eq!(table.find_case_insensitive("green"), Some(1));
		assert_eq!(table.find_case_insensitive("gReEn"), Some(1));
		assert_eq!(table.find_case_insensitive("BLUE"), Some(2));
		assert_eq!(table.find_case_insensitive("purple"), None);
	}

	#[test]
	fn case_insensitive_lookup_handles_unicode() {
		let table = LookupTable::try_from_pairs([("ÉTÉ", 0), ("HIVER", 1)]).unwrap();
		assert_eq!(table.find_case_insensitive("été"), Some(0));
		assert_eq!(table.find_case_insensitive("Été"), Some(0));
	}

	#[test]
	fn folded_collision_keeps_first_key() {
		let table = LookupTable::try_from_pairs([("Mixed", 0), ("MIXED", 1)]).unwrap();
		assert_eq!(table.find("MIXED"), Some(1));
		assert_eq!(table.find_case_insensitive("mixed"), Some(0));
	}

	#[test]
	fn strict_construction_rejects_duplicates() {
		let err = LookupTable::try_from_pairs([("A", 0), ("B", 1), ("A", 2)]).unwrap_err();
		assert_eq!(
			err,
			TableError::DuplicateKey {
				key: "A".into(),
				existing: 0,
				incoming: 2,
			}
		);
	}

	#[test]
	fn lenient_construction_keeps_first() {
		let table = LookupTable::from_pairs([("A", 0), ("B", 1), ("A", 2)]);
		assert_eq!(table.len(), 2);
		assert_eq!(table.find("A"), Some(0));
		assert_eq!(table.keys().collect::<Vec<_>>(), ["A", "B"]);
	}

	#[test]
	fn known_keys_preserve_table_order() {
		let keys = colors().known_keys();
		assert_eq!(keys.to_string(), "[RED, GREEN, BLUE]");
		assert!(keys.contains("BLUE"));
		assert!(!keys.contains("blue"));
	}

	#[test]
	fn entries_pair_keys_with_ordinals() {
		let table = colors();
		let entries: Vec<_> = table.entries().collect();
		assert_eq!(entries, [("RED", 0), ("GREEN", 1), ("BLUE", 2)]);
	}

	#[test]
	fn empty_table() {
		let table = LookupTable::from_pairs(std::iter::empty::<(&str, u32)>());
		assert!(table.is_empty());
		assert_eq!(table.find(""), None);
		assert_eq!(table.known_keys().to_string(), "[]");
	}
}
