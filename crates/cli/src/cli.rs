use std::path::PathBuf;

use clap::Parser;
use enumres_resolver::{Policy, UnknownPolicyFlag};

#[derive(Parser, Debug)]
#[command(name = "enumres")]
#[command(about = "Resolve tokens against a closed set of named constants")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Set definition file (TOML)
	#[arg(long, short = 's', value_name = "PATH")]
	pub set: PathBuf,

	/// Policy flags to enable on top of the set file (e.g. case-insensitive-match)
	#[arg(long, short = 'e', value_name = "FLAGS", value_parser = parse_policy)]
	pub enable: Vec<Policy>,

	/// Policy flags to disable after applying the set file and --enable
	#[arg(long, short = 'd', value_name = "FLAGS", value_parser = parse_policy)]
	pub disable: Vec<Policy>,

	/// Fix case sensitivity for this set, overriding the policy flag
	#[arg(long, value_name = "BOOL")]
	pub case_insensitive: Option<bool>,

	/// Verbose logging
	#[arg(short, long)]
	pub verbose: bool,

	/// Tokens to resolve. Each is read as JSON, or as raw text when it is not valid JSON
	#[arg(required = true)]
	pub tokens: Vec<String>,
}

impl Cli {
	/// Applies `--enable` and then `--disable` to `base`.
	pub fn policy(&self, base: Policy) -> Policy {
		let enabled = self.enable.iter().fold(base, |acc, flags| acc | *flags);
		self.disable.iter().fold(enabled, |acc, flags| acc - *flags)
	}
}

fn parse_policy(list: &str) -> Result<Policy, UnknownPolicyFlag> {
	Policy::parse_list(list)
}
