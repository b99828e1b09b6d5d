mod calls;
mod fixes;
mod lexer;
mod shared;
mod spacing;

pub(crate) use shared::{Policy, RunSummary, SpacingMode};

use std::{fs, path::PathBuf};

use rayon::prelude::*;

use crate::prelude::*;
use shared::{Edit, FileContext, Violation};

const FILE_BATCH_SIZE: usize = 64;
const MAX_FIX_PASSES: usize = 8;

#[derive(Debug)]
struct FileFixOutcome {
	path: PathBuf,
	rewritten_text: Option<String>,
	applied_count: usize,
}

pub(crate) fn run_check(requested_files: &[PathBuf], policy: &Policy) -> Result<RunSummary> {
	let files = shared::resolve_files(requested_files)?;
	let mut violations: Vec<Violation> = Vec::new();

	for batch in files.chunks(FILE_BATCH_SIZE) {
		let batch_results = batch
			.par_iter()
			.map(|file| {
				let Some(ctx) = shared::read_file_context(file) else {
					return Vec::new();
				};
				let (found, _edits) = collect_violations(&ctx, policy, false);

				found
			})
			.collect::<Vec<_>>();

		for result in batch_results {
			violations.extend(result);
		}
	}

	violations
		.sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)).then(a.rule.cmp(b.rule)));

	let unfixable_count = violations.iter().filter(|v| !v.fixable).count();
	let output_lines = violations.into_iter().map(|v| v.format()).collect::<Vec<_>>();
	let violation_count = output_lines.len();

	Ok(RunSummary {
		file_count: files.len(),
		violation_count,
		unfixable_count,
		applied_fix_count: 0,
		output_lines,
	})
}

pub(crate) fn run_fix(requested_files: &[PathBuf], policy: &Policy) -> Result<RunSummary> {
	let files = shared::resolve_files(requested_files)?;
	let mut total_applied = 0_usize;

	for batch in files.chunks(FILE_BATCH_SIZE) {
		let outcomes = batch
			.par_iter()
			.map(|file| -> Result<FileFixOutcome> {
				let mut text = match fs::read_to_string(file) {
					Ok(text) => text,
					Err(_) => {
						return Ok(FileFixOutcome {
							path: file.clone(),
							rewritten_text: None,
							applied_count: 0,
						});
					},
				};
				let mut pass = 0_usize;
				let mut applied_count = 0_usize;

				while pass < MAX_FIX_PASSES {
					pass += 1;

					let Some(ctx) = shared::read_file_context_from_text(file, text.clone()) else {
						break;
					};
					let (_violations, edits) = collect_violations(&ctx, policy, true);

					if edits.is_empty() {
						break;
					}

					let applied = fixes::apply_edits(&mut text, edits)?;

					if applied == 0 {
						break;
					}

					applied_count += applied;
				}

				Ok(FileFixOutcome {
					path: file.clone(),
					rewritten_text: if applied_count > 0 { Some(text) } else { None },
					applied_count,
				})
			})
			.collect::<Vec<_>>();

		for outcome in outcomes {
			let outcome = outcome?;

			total_applied += outcome.applied_count;

			if let Some(text) = outcome.rewritten_text {
				fs::write(&outcome.path, text)?;
			}
		}
	}

	let checked = run_check(requested_files, policy)?;

	Ok(RunSummary {
		file_count: checked.file_count,
		violation_count: checked.violation_count,
		unfixable_count: checked.unfixable_count,
		applied_fix_count: total_applied,
		output_lines: checked.output_lines,
	})
}

pub(crate) fn print_coverage() {
	for rule in shared::RULE_IDS {
		println!("{rule}\timplemented");
	}
}

fn collect_violations(
	ctx: &FileContext,
	policy: &Policy,
	with_fixes: bool,
) -> (Vec<Violation>, Vec<Edit>) {
	let mut violations = Vec::new();
	let mut edits = Vec::new();

	spacing::check_call_spacing(ctx, policy, &mut violations, &mut edits, with_fixes);

	(violations, edits)
}
