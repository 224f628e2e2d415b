//! Serde integration.
//!
//! [`ConstantSeed`] drives any self-describing [`Deserializer`] through the
//! engine. The current value is buffered into a one-token stream first: maps
//! and sequences keep at most one scalar and the rest is skipped, so the input
//! is always fully consumed regardless of the outcome.

use std::fmt;

use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};

use crate::engine::{Resolved, Resolver};
use crate::policy::Policy;
use crate::token::{Scalar, Token, TokenStream};

/// Deserializes one member of a closed set under a fixed policy.
///
/// The null-equivalent deserializes to `None`. Decode failures surface through
/// [`de::Error::custom`] carrying the failure's message.
pub struct ConstantSeed<'r, V> {
	resolver: &'r Resolver<V>,
	policy: Policy,
}

impl<'r, V> ConstantSeed<'r, V> {
	pub fn new(resolver: &'r Resolver<V>, policy: Policy) -> Self {
		Self { resolver, policy }
	}
}

impl<V> Clone for ConstantSeed<'_, V> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<V> Copy for ConstantSeed<'_, V> {}

impl<V> Resolver<V> {
	/// Returns a seed that decodes values of this set under `policy`.
	pub fn seed(&self, policy: Policy) -> ConstantSeed<'_, V> {
		ConstantSeed::new(self, policy)
	}
}

impl<'de, 'r, V> DeserializeSeed<'de> for ConstantSeed<'r, V> {
	type Value = Option<&'r V>;

	fn deserialize<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
	where
		D: Deserializer<'de>,
	{
		let mut buffered = deserializer.deserialize_any(BufferVisitor)?;
		let resolver: &'r Resolver<V> = self.resolver;
		match resolver.resolve(&mut buffered, &self.policy) {
			Ok(resolved) => Ok(Resolved::into_option(resolved)),
			Err(failure) => {
				tracing::debug!(target_set = resolver.label(), %failure, "decode failed");
				Err(de::Error::custom(failure))
			}
		}
	}
}

/// One buffered token, with the scalar a wrapper held (if exactly one).
#[derive(Debug, PartialEq, Eq)]
enum Buffered {
	String(Box<str>),
	Integer(i64),
	Object(Option<Scalar>),
	Array(Option<Scalar>),
	Other(&'static str),
}

impl TokenStream for Buffered {
	fn current(&self) -> Token<'_> {
		match self {
			Self::String(text) => Token::String(text),
			Self::Integer(value) => Token::Integer(*value),
			Self::Object(_) => Token::ObjectStart,
			Self::Array(_) => Token::ArrayStart,
			Self::Other(kind) => Token::Other(*kind),
		}
	}

	fn extract_scalar_from_object(&mut self) -> Option<Scalar> {
		match self {
			Self::Object(scalar) => scalar.take(),
			_ => None,
		}
	}

	fn unwrap_single_element_array(&mut self) -> Option<Scalar> {
		match self {
			Self::Array(scalar) => scalar.take(),
			_ => None,
		}
	}
}

struct BufferVisitor;

impl<'de> Visitor<'de> for BufferVisitor {
	type Value = Buffered;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("a name, an index, or a wrapper holding one of them")
	}

	fn visit_bool<E: de::Error>(self, _: bool) -> Result<Buffered, E> {
		Ok(Buffered::Other("boolean"))
	}

	fn visit_i64<E: de::Error>(self, v: i64) -> Result<Buffered, E> {
		Ok(Buffered::Integer(v))
	}

	fn visit_u64<E: de::Error>(self, v: u64) -> Result<Buffered, E> {
		Ok(i64::try_from(v).map_or(Buffered::Other("out-of-range integer"), Buffered::Integer))
	}

	fn visit_f64<E: de::Error>(self, _: f64) -> Result<Buffered, E> {
		Ok(Buffered::Other("float"))
	}

	fn visit_char<E: de::Error>(self, v: char) -> Result<Buffered, E> {
		Ok(Buffered::String(v.to_string().into_boxed_str()))
	}

	fn visit_str<E: de::Error>(self, v: &str) -> Result<Buffered, E> {
		Ok(Buffered::String(v.into()))
	}

	fn visit_string<E: de::Error>(self, v: String) -> Result<Buffered, E> {
		Ok(Buffered::String(v.into_boxed_str()))
	}

	fn visit_bytes<E: de::Error>(self, _: &[u8]) -> Result<Buffered, E> {
		Ok(Buffered::Other("bytes"))
	}

	fn visit_unit<E: de::Error>(self) -> Result<Buffered, E> {
		Ok(Buffered::Other("null"))
	}

	fn visit_none<E: de::Error>(self) -> Result<Buffered, E> {
		Ok(Buffered::Other("null"))
	}

	fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Buffered, D::Error> {
		deserializer.deserialize_any(self)
	}

	fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Buffered, A::Error> {
		let first = map.next_entry::<IgnoredAny, MaybeScalar>()?;
		let mut extra = false;
		while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {
			extra = true;
		}
		Ok(Buffered::Object(match first {
			Some((_, MaybeScalar(scalar))) if !extra => scalar,
			_ => None,
		}))
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Buffered, A::Error> {
		let first = seq.next_element::<MaybeScalar>()?;
		let mut extra = false;
		while seq.next_element::<IgnoredAny>()?.is_some() {
			extra = true;
		}
		Ok(Buffered::Array(match first {
			Some(MaybeScalar(scalar)) if !extra => scalar,
			_ => None,
		}))
	}
}

/// Nested value that is kept only if it is a string or an integer.
struct MaybeScalar(Option<Scalar>);

impl<'de> de::Deserialize<'de> for MaybeScalar {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_any(MaybeScalarVisitor).map(MaybeScalar)
	}
}

struct MaybeScalarVisitor;

impl<'de> Visitor<'de> for MaybeScalarVisitor {
	type Value = Option<Scalar>;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("any value")
	}

	fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
		Ok(None)
	}

	fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
		Ok(Some(Scalar::Integer(v)))
	}

	fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
		Ok(i64::try_from(v).ok().map(Scalar::Integer))
	}

	fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
		Ok(None)
	}

	fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
		Ok(Some(Scalar::from(v)))
	}

	fn visit_bytes<E: de::Error>(self, _: &[u8]) -> Result<Self::Value, E> {
		Ok(None)
	}

	fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
		Ok(None)
	}

	fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
		Ok(None)
	}

	fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
		deserializer.deserialize_any(self)
	}

	fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
		while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
		Ok(None)
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
		while seq.next_element::<IgnoredAny>()?.is_some() {}
		Ok(None)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	use super::*;
	use crate::build::ResolverBuilder;

	fn colors() -> Resolver<&'static str> {
		ResolverBuilder::from_constants("Color", vec!["RED", "GREEN", "BLUE"])
			.unwrap()
			.default_key("RED")
			.build()
			.unwrap()
	}

	fn decode(input: &str, policy: Policy) -> Result<Option<&'static str>, String> {
		let resolver = colors();
		let mut de = serde_json::Deserializer::from_str(input);
		resolver
			.seed(policy)
			.deserialize(&mut de)
			.map(|value| value.copied())
			.map_err(|err| err.to_string())
	}

	#[rstest]
	#[case::name(r#""BLUE""#, Policy::default(), Some("BLUE"))]
	#[case::padded(r#"" GREEN ""#, Policy::default(), Some("GREEN"))]
	#[case::index("0", Policy::default(), Some("RED"))]
	#[case::quoted_index(r#""2""#, Policy::default(), Some("BLUE"))]
	#[case::wrapper(r#"{"value": "GREEN"}"#, Policy::default(), Some("GREEN"))]
	#[case::single_array(r#"["BLUE"]"#, Policy::default() | Policy::UNWRAP_SINGLE_VALUE_ARRAYS, Some("BLUE"))]
	#[case::empty_as_null(r#""""#, Policy::EMPTY_STRING_AS_NULL, None)]
	#[case::unknown_as_null(r#""PINK""#, Policy::TREAT_UNRESOLVED_AS_NULL, None)]
	#[case::unknown_to_default(r#""PINK""#, Policy::USE_DEFAULT_FOR_UNRESOLVED, Some("RED"))]
	fn decodes(#[case] input: &str, #[case] policy: Policy, #[case] expected: Option<&'static str>) {
		assert_eq!(decode(input, policy), Ok(expected));
	}

	#[test]
	fn failures_carry_the_decode_message() {
		let err = decode(r#""PINK""#, Policy::default()).unwrap_err();
		assert!(err.starts_with(r#"cannot decode `Color` from string "PINK""#), "{err}");

		let err = decode("7", Policy::default()).unwrap_err();
		assert!(err.contains("legal index range is [0..2]"), "{err}");

		let err = decode("true", Policy::all()).unwrap_err();
		assert!(err.starts_with("cannot decode `Color` from boolean token"), "{err}");
	}

	#[test]
	fn wrappers_with_extra_entries_are_rejected() {
		let err = decode(r#"{"a": "RED", "b": "GREEN"}"#, Policy::all()).unwrap_err();
		assert!(err.starts_with("cannot decode `Color` from object token"), "{err}");

		let err = decode(r#"["RED", "GREEN"]"#, Policy::all()).unwrap_err();
		assert!(err.starts_with("cannot decode `Color` from array token"), "{err}");
	}

	#[test]
	fn wrappers_consume_their_contents() {
		let resolver = colors();
		let policy = Policy::ALLOW_SCALAR_COERCION
			| Policy::TREAT_UNRESOLVED_AS_NULL
			| Policy::UNWRAP_SINGLE_VALUE_ARRAYS;
		let input = r#"[{"v": "GREEN"}, ["BLUE"], {"v": "PINK"}, "PINK", 2]"#;
		let mut de = serde_json::Deserializer::from_str(input);
		let outcomes = (&mut de)
			.deserialize_seq(CollectSeed(resolver.seed(policy)))
			.unwrap();
		de.end().unwrap();
		assert_eq!(outcomes, vec![true, true, false, false, true]);
	}

	#[test]
	fn buffering_keeps_only_single_scalars() {
		let buffer = |input: &str| {
			let mut de = serde_json::Deserializer::from_str(input);
			(&mut de).deserialize_any(BufferVisitor).unwrap()
		};
		assert_eq!(buffer(r#"{"k": 3}"#), Buffered::Object(Some(Scalar::Integer(3))));
		assert_eq!(buffer(r#"{"k": 3.5}"#), Buffered::Object(None));
		assert_eq!(buffer(r#"{}"#), Buffered::Object(None));
		assert_eq!(buffer(r#"[[1]]"#), Buffered::Array(None));
		assert_eq!(buffer("null"), Buffered::Other("null"));
		assert_eq!(buffer("18446744073709551615"), Buffered::Other("out-of-range integer"));
	}

	/// Decodes every element of a sequence, recording which ones resolved to a
	/// value.
	struct CollectSeed<'r>(ConstantSeed<'r, &'static str>);

	impl<'de> Visitor<'de> for CollectSeed<'_> {
		type Value = Vec<bool>;

		fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
			f.write_str("a sequence")
		}

		fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Vec<bool>, A::Error> {
			let mut out = Vec::new();
			while let Some(value) = seq.next_element_seed(self.0)? {
				out.push(value.is_some());
			}
			Ok(out)
		}
	}
}
