// crates.io
use clap::{
	Args, Parser, Subcommand, ValueEnum,
	builder::{
		Styles,
		styling::{AnsiColor, Effects},
	},
};

// std
use std::{path::PathBuf, process::ExitCode};

// self
use crate::{
	lint::{self, Policy, RunSummary, SpacingMode},
	prelude::*,
};

/// Command-line interface for the call spacing checker.
#[derive(Debug, Parser)]
#[command(
	version = concat!(
		env!("CARGO_PKG_VERSION"),
		"-",
		env!("VERGEN_GIT_SHA"),
		"-",
		env!("VERGEN_CARGO_TARGET_TRIPLE"),
	),
	rename_all = "kebab",
	styles = styles(),
)]
pub(crate) struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Run the call spacing check and report violations.
	Check {
		/// Optional JavaScript files. Defaults to git-tracked `*.js`-family files.
		files: Vec<PathBuf>,
		#[command(flatten)]
		policy: PolicyArgs,
	},
	/// Apply all safe automatic fixes, then re-check.
	Fix {
		/// Optional JavaScript files. Defaults to git-tracked `*.js`-family files.
		files: Vec<PathBuf>,
		#[command(flatten)]
		policy: PolicyArgs,
	},
	/// Print implemented rule IDs.
	Coverage,
}

#[derive(Args, Debug)]
struct PolicyArgs {
	/// Whitespace requirement between a callee and its opening parenthesis.
	#[arg(long, value_enum, default_value = "never")]
	mode: ModeArg,
	/// Permit line breaks in the gap; only meaningful with `--mode always`.
	#[arg(long)]
	allow_newlines: bool,
}
impl PolicyArgs {
	fn to_policy(&self) -> Policy {
		Policy {
			mode: match self.mode {
				ModeArg::Never => SpacingMode::Never,
				ModeArg::Always => SpacingMode::Always,
			},
			allow_newlines: self.allow_newlines,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
	Never,
	Always,
}

impl Cli {
	pub(crate) fn run(&self) -> Result<ExitCode> {
		match &self.command {
			Command::Check { files, policy } => {
				let summary = lint::run_check(files, &policy.to_policy())?;

				print_summary(&summary, false);

				if summary.violation_count > 0 {
					eprintln!("\nFound {} call spacing violation(s).", summary.violation_count);

					return Ok(ExitCode::FAILURE);
				}
			},
			Command::Fix { files, policy } => {
				let summary = lint::run_fix(files, &policy.to_policy())?;

				print_summary(&summary, true);

				if summary.violation_count > 0 {
					eprintln!(
						"\nFound {} remaining call spacing violation(s) after fix.",
						summary.violation_count
					);

					return Ok(ExitCode::FAILURE);
				}
			},
			Command::Coverage => lint::print_coverage(),
		}

		Ok(ExitCode::SUCCESS)
	}
}

fn print_summary(summary: &RunSummary, fix_mode: bool) {
	for line in &summary.output_lines {
		println!("{line}");
	}

	if fix_mode {
		println!(
			"\nChecked {} file(s). Applied {} fix(es).",
			summary.file_count, summary.applied_fix_count
		);
	} else {
		println!("\nChecked {} file(s).", summary.file_count);
	}

	if summary.unfixable_count > 0 {
		println!("{} violation(s) require manual fixes.", summary.unfixable_count);
	}
}

fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Red.on_default() | Effects::BOLD)
		.usage(AnsiColor::Red.on_default() | Effects::BOLD)
		.literal(AnsiColor::Blue.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parses_check_subcommand() {
		let cli = Cli::parse_from(["app", "check"]);

		assert!(matches!(cli.command, Command::Check { .. }));
	}

	#[test]
	fn parses_policy_flags() {
		let cli = Cli::parse_from(["app", "fix", "--mode", "always", "--allow-newlines"]);
		let Command::Fix { policy, .. } = cli.command else {
			panic!("expected fix subcommand");
		};
		let policy = policy.to_policy();

		assert_eq!(policy.mode, SpacingMode::Always);
		assert!(policy.allow_newlines);
	}
}
