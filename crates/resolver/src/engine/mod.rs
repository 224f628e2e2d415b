//! Closed-set value resolution engine.
//!
//! # Purpose
//!
//! Given one token and a [`Policy`], deterministically produce a member of the
//! closed set, the null-equivalent, or a typed [`DecodeFailure`].
//!
//! # Precedence Contract
//!
//! String input walks a fixed chain; the first step that decides wins:
//!
//! 1. **Match:** exact lookup in the selected table (alternate-form table when
//!    [`Policy::USE_ALTERNATE_FORM_FOR_LOOKUP`] is set, primary otherwise).
//! 2. **Trim-retry:** exact lookup of the trimmed text, if trimming changed it.
//!    Trimming strips every leading and trailing char at or below `U+0020`
//!    (ASCII controls and space) and nothing else.
//! 3. **Unresolved text** (on the trimmed name), exactly one of:
//!    - empty name: null-equivalent under [`Policy::EMPTY_STRING_AS_NULL`];
//!    - case-insensitive mode: folded lookup in the selected table;
//!    - case-sensitive mode with a digit-leading name that parses as an index:
//!      fails with [`DecodeFailure::CoercionNotAllowed`] unless
//!      [`Policy::ALLOW_SCALAR_COERCION`], otherwise ordinal lookup.
//!      Skipped entirely under [`Policy::DISALLOW_NUMBERS_AS_COERCION`].
//! 4. **Tail:** default value (if configured and
//!    [`Policy::USE_DEFAULT_FOR_UNRESOLVED`]), then null-equivalent (if
//!    [`Policy::TREAT_UNRESOLVED_AS_NULL`]), then
//!    [`DecodeFailure::UnrecognizedValue`].
//!
//! Integer input is rejected outright under
//! [`Policy::DISALLOW_NUMBERS_AS_COERCION`]; otherwise an in-range ordinal
//! resolves directly and anything else goes to the tail.
//!
//! # Concurrency
//!
//! All tables are immutable and shared through `Arc`; resolution takes `&self`
//! and never blocks. The only mutable state is the alternate-form table slot
//! (see [`crate::cache`]).

use std::sync::Arc;

use crate::cache::SecondaryTable;
use crate::error::{Attempted, DecodeFailure};
use crate::lookup::LookupTable;
use crate::ordinal::OrdinalTable;
use crate::policy::Policy;
use crate::token::{Scalar, Token, TokenStream};


/// Successful resolution result.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved<'a, V> {
	/// A member of the closed set.
	Value(&'a V),
	/// The designated "no value" result.
	Null,
}

impl<V> Clone for Resolved<'_, V> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<V> Copy for Resolved<'_, V> {}

impl<'a, V> Resolved<'a, V> {
	/// Returns the resolved value, mapping the null-equivalent to `None`.
	pub fn into_option(self) -> Option<&'a V> {
		match self {
			Self::Value(value) => Some(value),
			Self::Null => None,
		}
	}

	/// Returns true for the null-equivalent.
	pub fn is_null(&self) -> bool {
		matches!(self, Self::Null)
	}
}

/// Outcome of the unresolved-text step.
enum Step<'a, V> {
	Found(&'a V),
	Null,
	/// Continue with the shared tail.
	Unresolved,
}

/// Resolver for one closed set.
///
/// Cloning is cheap: clones share every table and the alternate-form cache.
pub struct Resolver<V> {
	pub(crate) label: Arc<str>,
	pub(crate) primary: Arc<LookupTable>,
	pub(crate) ordinals: OrdinalTable<V>,
	pub(crate) default: Option<u32>,
	pub(crate) secondary: Arc<SecondaryTable>,
	pub(crate) case_insensitive: Option<bool>,
}

impl<V> Clone for Resolver<V> {
	fn clone(&self) -> Self {
		Self {
			label: Arc::clone(&self.label),
			primary: Arc::clone(&self.primary),
			ordinals: self.ordinals.clone(),
			default: self.default,
			secondary: Arc::clone(&self.secondary),
			case_insensitive: self.case_insensitive,
		}
	}
}

impl<V> std::fmt::Debug for Resolver<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Resolver")
			.field("label", &self.label)
			.field("len", &self.ordinals.len())
			.field("default", &self.default)
			.field("case_insensitive", &self.case_insensitive)
			.field("secondary", &self.secondary)
			.finish()
	}
}

impl<V> Resolver<V> {
	/// Resolves the current token of `tokens`.
	///
	/// Object tokens are replaced by their extracted scalar and array tokens by
	/// their single element (when [`Policy::UNWRAP_SINGLE_VALUE_ARRAYS`] is set);
	/// the replacement is resolved as if it were the original token. A scalar
	/// cannot wrap further structure, so this recurses at most one level.
	pub fn resolve<S>(&self, tokens: &mut S, policy: &Policy) -> Result<Resolved<'_, V>, DecodeFailure>
	where
		S: TokenStream + ?Sized,
	{
		match tokens.current() {
			Token::String(text) => self.resolve_text(text, policy),
			Token::Integer(value) => self.resolve_index(value, policy),
			Token::ObjectStart => match tokens.extract_scalar_from_object() {
				Some(scalar) => self.resolve_scalar(&scalar, policy),
				None => Err(self.unexpected(Token::ObjectStart)),
			},
			Token::ArrayStart => {
				if !policy.contains(Policy::UNWRAP_SINGLE_VALUE_ARRAYS) {
					return Err(self.unexpected(Token::ArrayStart));
				}
				match tokens.unwrap_single_element_array() {
					Some(scalar) => self.resolve_scalar(&scalar, policy),
					None => Err(self.unexpected(Token::ArrayStart)),
				}
			}
			other @ Token::Other(_) => Err(self.unexpected(other)),
		}
	}

	/// Resolves an already-extracted scalar.
	pub fn resolve_scalar(&self, scalar: &Scalar, policy: &Policy) -> Result<Resolved<'_, V>, DecodeFailure> {
		match scalar {
			Scalar::String(text) => self.resolve_text(text, policy),
			Scalar::Integer(value) => self.resolve_index(*value, policy),
		}
	}

	/// Resolves textual input.
	pub fn resolve_text(&self, text: &str, policy: &Policy) -> Result<Resolved<'_, V>, DecodeFailure> {
		let table = self.table_for(policy);

		if let Some(value) = self.lookup(table.find(text)) {
			return Ok(Resolved::Value(value));
		}

		let trimmed = trim_control(text);
		if trimmed.len() != text.len()
			&& let Some(value) = self.lookup(table.find(trimmed))
		{
			return Ok(Resolved::Value(value));
		}

		match self.resolve_unmatched_text(&table, trimmed, policy)? {
			Step::Found(value) => Ok(Resolved::Value(value)),
			Step::Null => Ok(Resolved::Null),
			Step::Unresolved => self.unresolved(&table, Attempted::Text(trimmed.into()), policy),
		}
	}

	/// Resolves integer input as an ordinal index.
	pub fn resolve_index(&self, value: i64, policy: &Policy) -> Result<Resolved<'_, V>, DecodeFailure> {
		if policy.contains(Policy::DISALLOW_NUMBERS_AS_COERCION) {
			return Err(DecodeFailure::NumericInputDisallowed {
				target: Arc::clone(&self.label),
				value,
			});
		}
		if let Some(resolved) = self.ordinals.get(value) {
			return Ok(Resolved::Value(resolved));
		}
		self.unresolved(&self.primary, Attempted::Integer(value), policy)
	}

	/// Case-insensitive matching and quoted-index coercion for text that missed
	/// exact lookup. The two branches are exclusive; case-folding wins.
	fn resolve_unmatched_text(
		&self,
		table: &LookupTable,
		name: &str,
		policy: &Policy,
	) -> Result<Step<'_, V>, DecodeFailure> {
		if name.is_empty() {
			return Ok(if policy.contains(Policy::EMPTY_STRING_AS_NULL) {
				Step::Null
			} else {
				Step::Unresolved
			});
		}

		if self.is_case_insensitive(policy) {
			return Ok(self
				.lookup(table.find_case_insensitive(name))
				.map_or(Step::Unresolved, Step::Found));
		}

		if policy.contains(Policy::DISALLOW_NUMBERS_AS_COERCION)
			|| !name.starts_with(|c: char| c.is_ascii_digit())
		{
			return Ok(Step::Unresolved);
		}

		let Ok(index) = name.parse::<i32>() else {
			return Ok(Step::Unresolved);
		};
		if !policy.contains(Policy::ALLOW_SCALAR_COERCION) {
			return Err(DecodeFailure::CoercionNotAllowed {
				target: Arc::clone(&self.label),
				attempted_text: name.into(),
			});
		}
		Ok(self
			.ordinals
			.get(i64::from(index))
			.map_or(Step::Unresolved, Step::Found))
	}

	/// Shared tail: default, then null-equivalent, then failure.
	fn unresolved(
		&self,
		table: &LookupTable,
		attempted: Attempted,
		policy: &Policy,
	) -> Result<Resolved<'_, V>, DecodeFailure> {
		if policy.contains(Policy::USE_DEFAULT_FOR_UNRESOLVED)
			&& let Some(value) = self.default_value()
		{
			return Ok(Resolved::Value(value));
		}
		if policy.contains(Policy::TREAT_UNRESOLVED_AS_NULL) {
			return Ok(Resolved::Null);
		}
		Err(DecodeFailure::UnrecognizedValue {
			target: Arc::clone(&self.label),
			attempted_value: attempted,
			known_keys: table.known_keys(),
			ordinal_count: self.ordinals.len(),
		})
	}

	fn unexpected(&self, token: Token<'_>) -> DecodeFailure {
		DecodeFailure::UnexpectedToken {
			target: Arc::clone(&self.label),
			found: token.describe(),
		}
	}

	fn table_for(&self, policy: &Policy) -> Arc<LookupTable> {
		if policy.contains(Policy::USE_ALTERNATE_FORM_FOR_LOOKUP) {
			self.secondary.get_or_build()
		} else {
			Arc::clone(&self.primary)
		}
	}

	/// Maps a table hit to its value. Ordinals a lazily built table points past
	/// the end of the set are treated as misses.
	#[inline]
	fn lookup(&self, ordinal: Option<u32>) -> Option<&V> {
		ordinal.and_then(|ordinal| self.ordinals.get_ordinal(ordinal))
	}

	fn is_case_insensitive(&self, policy: &Policy) -> bool {
		self.case_insensitive
			.unwrap_or_else(|| policy.contains(Policy::CASE_INSENSITIVE_MATCH))
	}

	/// Returns a resolver sharing every table whose case sensitivity is fixed
	/// to `enabled`, or deferred to the policy when `None`.
	#[must_use]
	pub fn with_case_insensitive(&self, enabled: Option<bool>) -> Self {
		Self {
			case_insensitive: enabled,
			..self.clone()
		}
	}

	/// Name of the closed set, used in failure messages.
	pub fn label(&self) -> &str {
		&self.label
	}

	/// Canonical-name lookup table.
	pub fn primary(&self) -> &LookupTable {
		&self.primary
	}

	/// Returns the alternate-form table, building it on first use.
	pub fn alternate_table(&self) -> Arc<LookupTable> {
		self.secondary.get_or_build()
	}

	/// Returns true once the alternate-form table has been built.
	pub fn is_alternate_table_built(&self) -> bool {
		self.secondary.is_built()
	}

	/// Designated fallback value, if the set has one.
	pub fn default_value(&self) -> Option<&V> {
		self.lookup(self.default)
	}

	/// Fixed case sensitivity, or `None` when the policy decides.
	pub fn case_insensitive_override(&self) -> Option<bool> {
		self.case_insensitive
	}

	/// Number of values in the set.
	pub fn len(&self) -> usize {
		self.ordinals.len()
	}

	/// Returns true if the set has no values.
	pub fn is_empty(&self) -> bool {
		self.ordinals.is_empty()
	}
}

/// Strips leading and trailing chars at or below `U+0020`.
fn trim_control(text: &str) -> &str {
	text.trim_matches(|c: char| c <= ' ')
}
