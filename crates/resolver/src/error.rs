//! Failure types for table construction and value resolution.

use std::fmt;
use std::sync::Arc;

/// Raw input that could not be resolved, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempted {
	/// Textual input, after whitespace trimming.
	Text(Box<str>),
	/// Integer input.
	Integer(i64),
}

impl fmt::Display for Attempted {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(text) => write!(f, "string {text:?}"),
			Self::Integer(value) => write!(f, "integer {value}"),
		}
	}
}

/// Every key of the lookup table consulted by a failed resolution, in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownKeys(pub(crate) Arc<[Box<str>]>);

impl KnownKeys {
	/// Returns an iterator over the keys in table order.
	pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
		self.0.iter().map(|key| &**key)
	}

	/// Returns true if `key` is one of the known keys.
	pub fn contains(&self, key: &str) -> bool {
		self.iter().any(|known| known == key)
	}
}

impl fmt::Display for KnownKeys {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("[")?;
		for (i, key) in self.iter().enumerate() {
			if i > 0 {
				f.write_str(", ")?;
			}
			f.write_str(key)?;
		}
		f.write_str("]")
	}
}

/// Typed failure returned by the resolution engine.
///
/// Every variant names the closed set being decoded (`target`) so callers can
/// surface the failure as a decode error without extra context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeFailure {
	/// Integer token rejected because numbers are disallowed by policy.
	#[error(
		"cannot decode `{target}` from integer {value}: numeric input is disallowed (DISALLOW_NUMBERS_AS_COERCION)"
	)]
	NumericInputDisallowed { target: Arc<str>, value: i64 },

	/// Digit-leading string rejected because scalar coercion is disabled.
	#[error(
		"cannot decode `{target}` from string {attempted_text:?}: value looks like a quoted index, but scalar coercion is disabled (ALLOW_SCALAR_COERCION)"
	)]
	CoercionNotAllowed {
		target: Arc<str>,
		attempted_text: Box<str>,
	},

	/// Nothing matched and no fallback policy applied.
	#[error(
		"cannot decode `{target}` from {attempted_value}: not one of the accepted values {known_keys}{}",
		index_range_hint(.attempted_value, .ordinal_count)
	)]
	UnrecognizedValue {
		target: Arc<str>,
		attempted_value: Attempted,
		known_keys: KnownKeys,
		ordinal_count: usize,
	},

	/// The token kind cannot be interpreted as a closed-set value.
	#[error("cannot decode `{target}` from {found} token")]
	UnexpectedToken { target: Arc<str>, found: &'static str },
}

impl DecodeFailure {
	/// Returns the label of the closed set that failed to decode.
	pub fn target(&self) -> &str {
		match self {
			Self::NumericInputDisallowed { target, .. }
			| Self::CoercionNotAllowed { target, .. }
			| Self::UnrecognizedValue { target, .. }
			| Self::UnexpectedToken { target, .. } => target,
		}
	}

	/// Returns the raw input that failed to resolve, if the failure carries one.
	pub fn attempted(&self) -> Option<Attempted> {
		match self {
			Self::NumericInputDisallowed { value, .. } => Some(Attempted::Integer(*value)),
			Self::CoercionNotAllowed { attempted_text, .. } => {
				Some(Attempted::Text(attempted_text.clone()))
			}
			Self::UnrecognizedValue {
				attempted_value, ..
			} => Some(attempted_value.clone()),
			Self::UnexpectedToken { .. } => None,
		}
	}
}

fn index_range_hint(attempted: &Attempted, ordinal_count: &usize) -> String {
	match (attempted, *ordinal_count) {
		(Attempted::Integer(_), 0) => " (set has no values to index)".to_owned(),
		(Attempted::Integer(_), n) => format!(" (legal index range is [0..{}])", n - 1),
		(Attempted::Text(_), _) => String::new(),
	}
}

/// Construction-time failures for lookup tables and resolvers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
	/// Two entries of a strict table share a key.
	#[error("duplicate key {key:?}: already maps to ordinal {existing}, cannot also map to {incoming}")]
	DuplicateKey {
		key: Box<str>,
		existing: u32,
		incoming: u32,
	},

	/// A key points past the end of the ordinal table.
	#[error("key {key:?} maps to ordinal {ordinal}, but the set has only {len} values")]
	OrdinalOutOfRange { key: Box<str>, ordinal: u32, len: usize },

	/// The configured default is not a member of the set.
	#[error("default value {0} is not a member of the set")]
	UnknownDefault(Box<str>),

	/// The set cannot be indexed by `u32` ordinals.
	#[error("closed set has {0} values; at most {max} are supported", max = u32::MAX)]
	TooManyConstants(usize),
}
