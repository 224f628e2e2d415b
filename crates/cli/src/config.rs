//! Set definition files.
//!
//! A set file names the closed set, lists its constants in ordinal order, and
//! carries the base policy:
//!
//! ```toml
//! name = "Color"
//! default = "RED"
//!
//! [policy]
//! case_insensitive_match = true
//!
//! [[constants]]
//! name = "RED"
//! alternate = "crimson"
//! aliases = ["SCARLET"]
//! ```

use std::borrow::Cow;
use std::path::Path;

use anyhow::Context;
use enumres_resolver::{Constant, Policy, PolicyConfig, Resolver, ResolverBuilder};
use serde::Deserialize;

/// Parsed set definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetFile {
	pub name: String,
	/// Canonical name of the default value.
	#[serde(default)]
	pub default: Option<String>,
	/// Fixed case sensitivity, overriding the policy flag.
	#[serde(default)]
	pub case_insensitive: Option<bool>,
	#[serde(default)]
	pub policy: PolicyConfig,
	pub constants: Vec<ConstantDef>,
}

/// One constant of a set file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstantDef {
	pub name: String,
	#[serde(default)]
	pub alternate: Option<String>,
	#[serde(default)]
	pub aliases: Vec<String>,
}

impl Constant for ConstantDef {
	fn name(&self) -> &str {
		&self.name
	}

	fn alternate_form(&self) -> Option<Cow<'_, str>> {
		self.alternate.as_deref().map(Cow::Borrowed)
	}

	fn aliases(&self) -> impl Iterator<Item = &str> {
		self.aliases.iter().map(String::as_str)
	}
}

impl SetFile {
	pub fn parse(text: &str) -> anyhow::Result<Self> {
		toml::from_str(text).context("invalid set definition")
	}

	pub fn load(path: &Path) -> anyhow::Result<Self> {
		let text = std::fs::read_to_string(path)
			.with_context(|| format!("failed to read set file {}", path.display()))?;
		let set = Self::parse(&text).with_context(|| format!("in {}", path.display()))?;
		tracing::debug!(path = %path.display(), name = %set.name, constants = set.constants.len(), "loaded set file");
		Ok(set)
	}

	pub fn policy(&self) -> Policy {
		self.policy.into()
	}

	/// Builds the resolver for this set.
	pub fn into_resolver(self) -> anyhow::Result<Resolver<ConstantDef>> {
		let name = self.name;
		let mut builder = ResolverBuilder::from_constants(name.as_str(), self.constants)
			.with_context(|| format!("invalid constants for set `{name}`"))?;
		if let Some(default) = self.default {
			builder = builder.default_key(default);
		}
		if let Some(enabled) = self.case_insensitive {
			builder = builder.case_insensitive(enabled);
		}
		builder
			.build()
			.with_context(|| format!("invalid set `{name}`"))
	}
}
