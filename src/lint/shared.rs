// std
use std::{
	fs,
	path::{Path, PathBuf},
	process::Command,
};

// self
use crate::{
	lint::lexer::{self, Token},
	prelude::*,
};

pub(crate) const RULE_IDS: [&str; 3] =
	["JS-CALL-SPACE-001", "JS-CALL-SPACE-002", "JS-CALL-SPACE-003"];

const SOURCE_EXTENSIONS: [&str; 4] = ["js", "mjs", "cjs", "jsx"];

/// Whitespace requirement between a callee and its opening parenthesis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SpacingMode {
	Never,
	Always,
}

/// Spacing policy resolved once per run.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Policy {
	pub(crate) mode: SpacingMode,
	pub(crate) allow_newlines: bool,
}
impl Default for Policy {
	fn default() -> Self {
		Self { mode: SpacingMode::Never, allow_newlines: false }
	}
}

#[derive(Debug, Clone)]
pub(crate) struct Violation {
	pub(crate) file: PathBuf,
	pub(crate) line: usize,
	pub(crate) column: usize,
	pub(crate) end_line: usize,
	pub(crate) end_column: usize,
	pub(crate) rule: &'static str,
	pub(crate) message: &'static str,
	pub(crate) fixable: bool,
}
impl Violation {
	pub(crate) fn format(&self) -> String {
		let location = if self.end_line > self.line {
			format!(
				"{}:{}:{}-{}:{}",
				self.file.display(),
				self.line,
				self.column,
				self.end_line,
				self.end_column
			)
		} else {
			format!("{}:{}:{}", self.file.display(), self.line, self.column)
		};

		format!(
			"{location}: [{}] {}{}",
			self.rule,
			self.message,
			if self.fixable { " (fixable)" } else { "" }
		)
	}

	#[cfg(test)]
	pub(crate) fn span(&self) -> (usize, usize, usize, usize) {
		(self.line, self.column, self.end_line, self.end_column)
	}
}

#[derive(Debug, Clone)]
pub(crate) struct Edit {
	pub(crate) start: usize,
	pub(crate) end: usize,
	pub(crate) replacement: String,
	pub(crate) rule: &'static str,
}

#[derive(Debug, Clone)]
pub(crate) struct RunSummary {
	pub(crate) file_count: usize,
	pub(crate) violation_count: usize,
	pub(crate) unfixable_count: usize,
	pub(crate) applied_fix_count: usize,
	pub(crate) output_lines: Vec<String>,
}

/// One lexed file plus the offset table used for line/column reporting.
#[derive(Debug)]
pub(crate) struct FileContext {
	pub(crate) path: PathBuf,
	pub(crate) text: String,
	pub(crate) line_starts: Vec<usize>,
	pub(crate) tokens: Vec<Token>,
}

pub(crate) fn read_file_context(path: &Path) -> Option<FileContext> {
	let text = fs::read_to_string(path).ok()?;

	read_file_context_from_text(path, text)
}

pub(crate) fn read_file_context_from_text(path: &Path, text: String) -> Option<FileContext> {
	if text.is_empty() {
		return None;
	}

	let line_starts = build_line_starts(&text);
	let tokens = lexer::tokenize(&text);

	Some(FileContext { path: path.to_path_buf(), text, line_starts, tokens })
}

fn build_line_starts(text: &str) -> Vec<usize> {
	let mut starts = vec![0];

	for (idx, byte) in text.bytes().enumerate() {
		if byte == b'\n' {
			starts.push(idx + 1);
		}
	}

	starts
}

pub(crate) fn line_from_offset(line_starts: &[usize], offset: usize) -> usize {
	match line_starts.binary_search(&offset) {
		Ok(pos) => pos + 1,
		Err(pos) => pos,
	}
}

/// 1-based line and column of a byte offset.
pub(crate) fn position_from_offset(line_starts: &[usize], offset: usize) -> (usize, usize) {
	let line = line_from_offset(line_starts, offset);
	let line_start = line_starts.get(line - 1).copied().unwrap_or(0);

	(line, offset - line_start + 1)
}

pub(crate) fn resolve_files(requested_files: &[PathBuf]) -> Result<Vec<PathBuf>> {
	if !requested_files.is_empty() {
		let mut files = Vec::new();

		for file in requested_files {
			let matches_extension = file
				.extension()
				.is_some_and(|ext| SOURCE_EXTENSIONS.iter().any(|known| ext == *known));

			if matches_extension {
				files.push(file.clone());
			}
		}

		return Ok(files);
	}

	git_ls_source_files()
}

fn git_ls_source_files() -> Result<Vec<PathBuf>> {
	let patterns = SOURCE_EXTENSIONS.map(|ext| format!("*.{ext}"));
	let output = Command::new("git")
		.arg("ls-files")
		.args(&patterns)
		.output()
		.map_err(|err| eyre::eyre!("Failed to run git ls-files: {err}."))?;

	if !output.status.success() {
		return Err(eyre::eyre!("git ls-files failed with status {}.", output.status));
	}

	let stdout = String::from_utf8(output.stdout)?;
	let mut files = Vec::new();

	for line in stdout.lines() {
		if !line.is_empty() {
			files.push(PathBuf::from(line));
		}
	}

	Ok(files)
}
