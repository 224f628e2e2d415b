//! Token stream over a parsed [`serde_json::Value`].

use serde_json::Value;

use crate::engine::{Resolved, Resolver};
use crate::error::DecodeFailure;
use crate::policy::Policy;
use crate::token::{Scalar, Token, TokenStream};

/// Exposes a JSON value as a single-token stream.
///
/// - Objects wrapping exactly one string or integer entry yield that scalar.
/// - Arrays holding exactly one string or integer element unwrap to it.
/// - Booleans, floats, and null are reported as other tokens.
#[derive(Debug, Clone, Copy)]
pub struct JsonTokens<'a> {
	value: &'a Value,
}

impl<'a> JsonTokens<'a> {
	pub fn new(value: &'a Value) -> Self {
		Self { value }
	}
}

impl TokenStream for JsonTokens<'_> {
	fn current(&self) -> Token<'_> {
		match self.value {
			Value::String(text) => Token::String(text),
			Value::Number(number) => match number.as_i64() {
				Some(value) => Token::Integer(value),
				None if number.is_u64() => Token::Other("out-of-range integer"),
				None => Token::Other("float"),
			},
			Value::Object(_) => Token::ObjectStart,
			Value::Array(_) => Token::ArrayStart,
			Value::Bool(_) => Token::Other("boolean"),
			Value::Null => Token::Other("null"),
		}
	}

	fn extract_scalar_from_object(&mut self) -> Option<Scalar> {
		let Value::Object(map) = self.value else {
			return None;
		};
		only(map.values()).and_then(scalar_of)
	}

	fn unwrap_single_element_array(&mut self) -> Option<Scalar> {
		let Value::Array(items) = self.value else {
			return None;
		};
		only(items.iter()).and_then(scalar_of)
	}
}

fn only<'a>(mut items: impl Iterator<Item = &'a Value>) -> Option<&'a Value> {
	match (items.next(), items.next()) {
		(Some(item), None) => Some(item),
		_ => None,
	}
}

fn scalar_of(value: &Value) -> Option<Scalar> {
	match value {
		Value::String(text) => Some(Scalar::from(text.as_str())),
		Value::Number(number) => number.as_i64().map(Scalar::Integer),
		_ => None,
	}
}

impl<V> Resolver<V> {
	/// Resolves a parsed JSON value.
	pub fn resolve_json(&self, value: &Value, policy: &Policy) -> Result<Resolved<'_, V>, DecodeFailure> {
		self.resolve(&mut JsonTokens::new(value), policy)
	}
}
