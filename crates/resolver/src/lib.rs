//! Closed-set value resolution.
//!
//! Maps one input token (a string, an integer, or a wrapper around either) to
//! a member of a fixed, ordered set of named constants, under a configurable
//! [`Policy`] that governs coercion, case folding, and fallback.
//!
//! # Modules
//!
//! - [`lookup`] - immutable string-to-ordinal tables
//! - [`ordinal`] - ordinal-indexed value storage
//! - [`cache`] - lazily published alternate-form table
//! - [`policy`] - feature switches and their serde form
//! - [`token`] - token descriptors and the [`TokenStream`] seam
//! - [`build`] - table construction and validation
//! - [`engine`] - the resolution algorithm
//! - `json` - [`TokenStream`] over `serde_json::Value` (feature `json`)
//! - `de` - `serde::de::DeserializeSeed` adapter (feature `serde`)
//!
//! # Example
//!
//! ```
//! use enumres_resolver::{Policy, Resolved, ResolverBuilder};
//!
//! let colors = ResolverBuilder::from_constants("Color", vec!["RED", "GREEN", "BLUE"])?
//! 	.build()?;
//!
//! assert_eq!(colors.resolve_text("GREEN", &Policy::default())?, Resolved::Value(&"GREEN"));
//! assert_eq!(colors.resolve_index(2, &Policy::default())?, Resolved::Value(&"BLUE"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod build;
pub mod cache;
#[cfg(feature = "serde")]
pub mod de;
pub mod engine;
pub mod error;
#[cfg(feature = "json")]
pub mod json;
pub mod lookup;
pub mod ordinal;
pub mod policy;
pub mod token;

pub use build::{Constant, ResolverBuilder};
pub use cache::{SecondaryTable, TableBuilder};
#[cfg(feature = "serde")]
pub use de::ConstantSeed;
pub use engine::{Resolved, Resolver};
pub use error::{Attempted, DecodeFailure, KnownKeys, TableError};
#[cfg(feature = "json")]
pub use json::JsonTokens;
pub use lookup::LookupTable;
pub use ordinal::OrdinalTable;
pub use policy::{Policy, PolicyConfig, UnknownPolicyFlag};
pub use token::{Scalar, Token, TokenStream};
