//! Coercion and fallback policy bundle.
//!
//! A [`Policy`] is an immutable snapshot of every option the resolution engine
//! consults. It is passed by reference into each resolution call and never
//! read from process state.

bitflags::bitflags! {
	/// Set of enabled coercion and fallback options.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct Policy: u16 {
		/// Integers and numeric-looking strings are rejected instead of used as ordinal indices.
		const DISALLOW_NUMBERS_AS_COERCION = 1 << 0;
		/// Unresolved input maps to the configured default value, if one exists.
		const USE_DEFAULT_FOR_UNRESOLVED = 1 << 1;
		/// Unresolved input maps to the null-equivalent instead of failing.
		const TREAT_UNRESOLVED_AS_NULL = 1 << 2;
		/// String matching uses alternate textual forms instead of canonical names.
		const USE_ALTERNATE_FORM_FOR_LOOKUP = 1 << 3;
		/// String matching ignores letter case.
		const CASE_INSENSITIVE_MATCH = 1 << 4;
		/// An empty (post-trim) string maps to the null-equivalent.
		const EMPTY_STRING_AS_NULL = 1 << 5;
		/// Digit-leading strings may be used as ordinal indices.
		const ALLOW_SCALAR_COERCION = 1 << 6;
		/// A single-element array is unwrapped to its element.
		const UNWRAP_SINGLE_VALUE_ARRAYS = 1 << 7;
	}
}

impl Default for Policy {
	/// Numbers allowed, unknown values fail, canonical case-sensitive names,
	/// quoted indices allowed, arrays not unwrapped.
	fn default() -> Self {
		Self::ALLOW_SCALAR_COERCION
	}
}

/// Error returned when parsing policy flag names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown policy flag {0:?}")]
pub struct UnknownPolicyFlag(pub String);

impl Policy {
	/// Returns `self` with `flag` set or cleared.
	#[must_use]
	pub const fn with(self, flag: Policy, enabled: bool) -> Self {
		if enabled {
			self.union(flag)
		} else {
			self.difference(flag)
		}
	}

	/// Looks up a single flag by name.
	///
	/// Names are matched ignoring ASCII case, and `-` is accepted for `_`, so
	/// `case-insensitive-match` names [`Policy::CASE_INSENSITIVE_MATCH`].
	pub fn flag(name: &str) -> Result<Self, UnknownPolicyFlag> {
		let normalized = name.trim().to_ascii_uppercase().replace('-', "_");
		Self::from_name(&normalized).ok_or_else(|| UnknownPolicyFlag(name.trim().to_owned()))
	}

	/// Parses a `,`- or `|`-separated list of flag names.
	pub fn parse_list(list: &str) -> Result<Self, UnknownPolicyFlag> {
		list.split([',', '|'])
			.filter(|part| !part.trim().is_empty())
			.try_fold(Self::empty(), |acc, part| Ok(acc | Self::flag(part)?))
	}
}

/// Field-per-flag view of a [`Policy`], the shape configuration files use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
	feature = "serde",
	derive(serde::Deserialize, serde::Serialize),
	serde(default, deny_unknown_fields)
)]
pub struct PolicyConfig {
	pub disallow_numbers_as_coercion: bool,
	pub use_default_for_unresolved: bool,
	pub treat_unresolved_as_null: bool,
	pub use_alternate_form_for_lookup: bool,
	pub case_insensitive_match: bool,
	pub empty_string_as_null: bool,
	pub allow_scalar_coercion: bool,
	pub unwrap_single_value_arrays: bool,
}

impl Default for PolicyConfig {
	fn default() -> Self {
		Policy::default().into()
	}
}

impl From<PolicyConfig> for Policy {
	fn from(c: PolicyConfig) -> Self {
		Policy::empty()
			.with(Policy::DISALLOW_NUMBERS_AS_COERCION, c.disallow_numbers_as_coercion)
			.with(Policy::USE_DEFAULT_FOR_UNRESOLVED, c.use_default_for_unresolved)
			.with(Policy::TREAT_UNRESOLVED_AS_NULL, c.treat_unresolved_as_null)
			.with(Policy::USE_ALTERNATE_FORM_FOR_LOOKUP, c.use_alternate_form_for_lookup)
			.with(Policy::CASE_INSENSITIVE_MATCH, c.case_insensitive_match)
			.with(Policy::EMPTY_STRING_AS_NULL, c.empty_string_as_null)
			.with(Policy::ALLOW_SCALAR_COERCION, c.allow_scalar_coercion)
			.with(Policy::UNWRAP_SINGLE_VALUE_ARRAYS, c.unwrap_single_value_arrays)
	}
}

impl From<Policy> for PolicyConfig {
	fn from(p: Policy) -> Self {
		Self {
			disallow_numbers_as_coercion: p.contains(Policy::DISALLOW_NUMBERS_AS_COERCION),
			use_default_for_unresolved: p.contains(Policy::USE_DEFAULT_FOR_UNRESOLVED),
			treat_unresolved_as_null: p.contains(Policy::TREAT_UNRESOLVED_AS_NULL),
			use_alternate_form_for_lookup: p.contains(Policy::USE_ALTERNATE_FORM_FOR_LOOKUP),
			case_insensitive_match: p.contains(Policy::CASE_INSENSITIVE_MATCH),
			empty_string_as_null: p.contains(Policy::EMPTY_STRING_AS_NULL),
			allow_scalar_coercion: p.contains(Policy::ALLOW_SCALAR_COERCION),
			unwrap_single_value_arrays: p.contains(Policy::UNWRAP_SINGLE_VALUE_ARRAYS),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_allows_scalar_coercion_only() {
		assert_eq!(Policy::default(), Policy::ALLOW_SCALAR_COERCION);
		assert_eq!(Policy::from(PolicyConfig::default()), Policy::default());
	}

	#[test]
	fn with_sets_and_clears() {
		let p = Policy::default().with(Policy::CASE_INSENSITIVE_MATCH, true);
		assert!(p.contains(Policy::CASE_INSENSITIVE_MATCH | Policy::ALLOW_SCALAR_COERCION));
		let p = p.with(Policy::ALLOW_SCALAR_COERCION, false);
		assert_eq!(p, Policy::CASE_INSENSITIVE_MATCH);
	}

	#[test]
	fn flag_names_are_forgiving() {
		assert_eq!(Policy::flag("CASE_INSENSITIVE_MATCH"), Ok(Policy::CASE_INSENSITIVE_MATCH));
		assert_eq!(Policy::flag(" empty-string-as-null "), Ok(Policy::EMPTY_STRING_AS_NULL));
		assert_eq!(
			Policy::flag("bogus"),
			Err(UnknownPolicyFlag("bogus".to_owned()))
		);
	}

	#[test]
	fn parse_list_unions_flags() {
		let p = Policy::parse_list("treat_unresolved_as_null, use-default-for-unresolved|").unwrap();
		assert_eq!(
			p,
			Policy::TREAT_UNRESOLVED_AS_NULL | Policy::USE_DEFAULT_FOR_UNRESOLVED
		);
		assert_eq!(Policy::parse_list(""), Ok(Policy::empty()));
		assert!(Policy::parse_list("CASE_INSENSITIVE_MATCH,nope").is_err());
	}

	#[test]
	fn config_round_trips_every_flag() {
		let all = Policy::all();
		assert_eq!(Policy::from(PolicyConfig::from(all)), all);
		assert_eq!(Policy::from(PolicyConfig::from(Policy::empty())), Policy::empty());
	}
}
