//! Token descriptors consumed by the resolution engine.
//!
//! The engine does not tokenize input itself. Callers expose their current token
//! through [`TokenStream`], which also provides the two structural escape hatches
//! the engine may request: extracting a scalar from a wrapper object and
//! unwrapping a single-element array.

/// Current token of a decode stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
	String(&'a str),
	Integer(i64),
	ObjectStart,
	ArrayStart,
	/// Any other token; the payload names its kind for diagnostics.
	Other(&'static str),
}

impl Token<'_> {
	/// Short name of the token kind, as used in failure messages.
	pub fn describe(&self) -> &'static str {
		match self {
			Self::String(_) => "string",
			Self::Integer(_) => "integer",
			Self::ObjectStart => "object",
			Self::ArrayStart => "array",
			Self::Other(kind) => *kind,
		}
	}
}

/// Owned scalar payload obtained from a wrapper object or array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
	String(Box<str>),
	Integer(i64),
}

impl Scalar {
	pub fn as_token(&self) -> Token<'_> {
		match self {
			Self::String(text) => Token::String(text),
			Self::Integer(value) => Token::Integer(*value),
		}
	}
}

impl From<&str> for Scalar {
	fn from(text: &str) -> Self {
		Self::String(text.into())
	}
}

impl From<String> for Scalar {
	fn from(text: String) -> Self {
		Self::String(text.into_boxed_str())
	}
}

impl From<i64> for Scalar {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}

/// Access to the current token of a decode stream.
pub trait TokenStream {
	/// Returns the current token.
	fn current(&self) -> Token<'_>;

	/// Extracts a single scalar from the wrapper object at the current position.
	///
	/// Returns `None` when the object does not wrap exactly one scalar.
	fn extract_scalar_from_object(&mut self) -> Option<Scalar>;

	/// Unwraps the single-element array at the current position.
	///
	/// Returns `None` when the array does not hold exactly one scalar.
	fn unwrap_single_element_array(&mut self) -> Option<Scalar>;
}

/// A bare scalar is a one-token stream with no structure to unwrap.
impl TokenStream for Scalar {
	fn current(&self) -> Token<'_> {
		self.as_token()
	}

	fn extract_scalar_from_object(&mut self) -> Option<Scalar> {
		None
	}

	fn unwrap_single_element_array(&mut self) -> Option<Scalar> {
		None
	}
}

impl TokenStream for Token<'_> {
	fn current(&self) -> Token<'_> {
		*self
	}

	fn extract_scalar_from_object(&mut self) -> Option<Scalar> {
		None
	}

	fn unwrap_single_element_array(&mut self) -> Option<Scalar> {
		None
	}
}
