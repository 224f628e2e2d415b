//! Resolver construction.
//!
//! # Role
//!
//! Turns a closed set into the tables the engine consults: the primary
//! [`LookupTable`], the [`OrdinalTable`], the optional default, and the builder
//! for the lazily constructed alternate-form table.
//!
//! # Invariants
//!
//! - Every ordinal referenced by the primary table is in range.
//!   - Enforced in: [`ResolverBuilder::build`].
//! - A default value, if present, is a member of the set.
//!   - Enforced in: [`ResolverBuilder::build`].
//! - Every value is reachable from the alternate-form table built by
//!   [`ResolverBuilder::from_constants`] (canonical name stands in for a
//!   missing alternate form).

use std::borrow::Cow;
use std::sync::Arc;

use crate::cache::{SecondaryTable, TableBuilder};
use crate::engine::Resolver;
use crate::error::TableError;
use crate::lookup::LookupTable;
use crate::ordinal::OrdinalTable;

/// A member of a closed set, as seen by table construction.
pub trait Constant {
	/// Canonical declared name.
	fn name(&self) -> &str;

	/// Alternate textual form used by alternate-form lookup.
	fn alternate_form(&self) -> Option<Cow<'_, str>> {
		None
	}

	/// Extra primary keys that resolve to this value.
	fn aliases(&self) -> impl Iterator<Item = &str> {
		std::iter::empty()
	}
}

impl Constant for &'static str {
	fn name(&self) -> &str {
		self
	}
}

/// Designated fallback value, by ordinal or by primary key.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DefaultRef {
	Ordinal(u32),
	Key(Box<str>),
}

/// Staged construction of a [`Resolver`].
pub struct ResolverBuilder<V> {
	label: Arc<str>,
	primary: LookupTable,
	ordinals: OrdinalTable<V>,
	default: Option<DefaultRef>,
	alternate: Option<Arc<dyn TableBuilder>>,
	case_insensitive: Option<bool>,
}

impl<V> ResolverBuilder<V> {
	/// Starts from pre-built primary and ordinal tables.
	pub fn new(label: impl Into<Arc<str>>, primary: LookupTable, ordinals: OrdinalTable<V>) -> Self {
		Self {
			label: label.into(),
			primary,
			ordinals,
			default: None,
			alternate: None,
			case_insensitive: None,
		}
	}

	/// Designates the value with `ordinal` as the default.
	pub fn default_ordinal(mut self, ordinal: u32) -> Self {
		self.default = Some(DefaultRef::Ordinal(ordinal));
		self
	}

	/// Designates the value named by primary key `key` as the default.
	pub fn default_key(mut self, key: impl Into<Box<str>>) -> Self {
		self.default = Some(DefaultRef::Key(key.into()));
		self
	}

	/// Supplies the builder for the alternate-form table.
	///
	/// Without one, alternate-form lookup uses the primary table.
	pub fn alternate(mut self, builder: Arc<dyn TableBuilder>) -> Self {
		self.alternate = Some(builder);
		self
	}

	/// Fixes case sensitivity for this resolver, overriding the policy flag.
	pub fn case_insensitive(mut self, enabled: bool) -> Self {
		self.case_insensitive = Some(enabled);
		self
	}

	/// Validates the tables and produces the resolver.
	pub fn build(self) -> Result<Resolver<V>, TableError> {
		let len = self.ordinals.len();
		if let Some((key, ordinal)) = self
			.primary
			.entries()
			.find(|&(_, ordinal)| ordinal as usize >= len)
		{
			return Err(TableError::OrdinalOutOfRange {
				key: key.into(),
				ordinal,
				len,
			});
		}

		let default = match self.default {
			None => None,
			Some(DefaultRef::Ordinal(ordinal)) if (ordinal as usize) < len => Some(ordinal),
			Some(DefaultRef::Ordinal(ordinal)) => {
				return Err(TableError::UnknownDefault(format!("#{ordinal}").into()));
			}
			Some(DefaultRef::Key(key)) => match self.primary.find(&key) {
				Some(ordinal) => Some(ordinal),
				None => return Err(TableError::UnknownDefault(format!("{key:?}").into())),
			},
		};

		let primary = Arc::new(self.primary);
		let alternate = match self.alternate {
			Some(builder) => builder,
			None => {
				let primary = Arc::clone(&primary);
				Arc::new(move || LookupTable::clone(&primary)) as Arc<dyn TableBuilder>
			}
		};

		Ok(Resolver {
			secondary: Arc::new(SecondaryTable::new(Arc::clone(&self.label), alternate)),
			label: self.label,
			primary,
			ordinals: self.ordinals,
			default,
			case_insensitive: self.case_insensitive,
		})
	}
}

impl<V> ResolverBuilder<V>
where
	V: Constant + Send + Sync + 'static,
{
	/// Derives every table from the values themselves, in definition order.
	///
	/// Primary keys are canonical names followed by aliases; duplicates are an
	/// error. The alternate-form table keys each value by its alternate form,
	/// or by its name when it has none, keeping the first value on collision.
	pub fn from_constants(label: impl Into<Arc<str>>, values: Vec<V>) -> Result<Self, TableError> {
		let ordinals = OrdinalTable::new(values)?;

		let primary = LookupTable::try_from_pairs(ordinals.iter().zip(0u32..).flat_map(
			|(value, ordinal)| {
				std::iter::once(value.name())
					.chain(value.aliases())
					.map(move |key| (key, ordinal))
			},
		))?;

		let source = ordinals.clone();
		let alternate: Arc<dyn TableBuilder> = Arc::new(move || {
			LookupTable::from_pairs(source.iter().zip(0u32..).map(|(value, ordinal)| {
				let key = value
					.alternate_form()
					.unwrap_or(Cow::Borrowed(value.name()));
				(key.into_owned(), ordinal)
			}))
		});

		Ok(Self::new(label, primary, ordinals).alternate(alternate))
	}
}
