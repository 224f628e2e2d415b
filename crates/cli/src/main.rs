//! `enumres` binary.
//!
//! Loads a set definition, applies the policy overrides given on the command
//! line, and resolves each token argument, printing one line per token:
//! the canonical name, `null`, or `error: <message>`. Exits non-zero when any
//! token fails to resolve.

mod cli;
mod config;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use config::{ConstantDef, SetFile};
use enumres_resolver::{Policy, Resolved, Resolver};
use serde_json::Value;

fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose);

	let set = SetFile::load(&cli.set)?;
	let mut stdout = std::io::stdout().lock();
	let all_resolved = run(&cli, set, &mut stdout)?;
	stdout.flush()?;

	Ok(if all_resolved {
		ExitCode::SUCCESS
	} else {
		ExitCode::FAILURE
	})
}

/// Resolves every token of `cli` against `set`, writing one line per token.
///
/// Returns false if any token failed.
fn run(cli: &Cli, set: SetFile, out: &mut impl Write) -> anyhow::Result<bool> {
	let policy = cli.policy(set.policy());
	let mut resolver = set.into_resolver()?;
	if let Some(enabled) = cli.case_insensitive {
		resolver = resolver.with_case_insensitive(Some(enabled));
	}
	tracing::debug!(set = resolver.label(), ?policy, "resolving {} token(s)", cli.tokens.len());

	let mut all_resolved = true;
	for raw in &cli.tokens {
		match resolve_one(&resolver, raw, &policy) {
			Ok(line) => writeln!(out, "{line}")?,
			Err(message) => {
				all_resolved = false;
				writeln!(out, "error: {message}")?;
			}
		}
	}
	Ok(all_resolved)
}

fn resolve_one(resolver: &Resolver<ConstantDef>, raw: &str, policy: &Policy) -> Result<String, String> {
	let token = parse_token(raw);
	match resolver.resolve_json(&token, policy) {
		Ok(Resolved::Value(constant)) => Ok(constant.name.clone()),
		Ok(Resolved::Null) => Ok("null".to_owned()),
		Err(failure) => {
			tracing::debug!(token = raw, ?failure, "token did not resolve");
			Err(failure.to_string())
		}
	}
}

/// Reads a token argument as JSON, falling back to the raw text as a string.
fn parse_token(raw: &str) -> Value {
	serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_env("ENUMRES_LOG").unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("enumres=debug,enumres_resolver=trace")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.init();
}
