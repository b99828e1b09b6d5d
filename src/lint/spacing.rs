// crates.io
use once_cell::sync::Lazy;
use regex::Regex;

// self
use crate::lint::{
	calls::{self, CallLike},
	lexer::{Token, TokenKind},
	shared::{Edit, FileContext, Policy, SpacingMode, Violation, position_from_offset},
};

static BLOCK_COMMENT_RE: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("Expected operation to succeed."));
static LINE_TERMINATOR_RE: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"[\r\n\u{2028}\u{2029}]").expect("Expected operation to succeed."));

/// Gap classification. `Newline` implies whitespace by construction, so the
/// decision table cannot be handed a line break without whitespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GapShape {
	Empty,
	Whitespace,
	Newline,
}

#[derive(Debug)]
struct Gap {
	shape: GapShape,
	has_comments: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Verdict {
	UnexpectedWhitespace,
	UnexpectedNewline,
	Missing,
}
impl Verdict {
	fn rule(self) -> &'static str {
		match self {
			Self::UnexpectedWhitespace => "JS-CALL-SPACE-001",
			Self::UnexpectedNewline => "JS-CALL-SPACE-002",
			Self::Missing => "JS-CALL-SPACE-003",
		}
	}

	fn message(self) -> &'static str {
		match self {
			Self::UnexpectedWhitespace => {
				"Do not insert whitespace between a callee and its opening parenthesis."
			},
			Self::UnexpectedNewline => {
				"Do not break the line between a callee and its opening parenthesis."
			},
			Self::Missing => "Insert a single space between a callee and its opening parenthesis.",
		}
	}
}

pub(crate) fn check_call_spacing(
	ctx: &FileContext,
	policy: &Policy,
	violations: &mut Vec<Violation>,
	edits: &mut Vec<Edit>,
	emit_edits: bool,
) {
	for node in calls::scan(&ctx.tokens, &ctx.text) {
		let Some((left, right, optional)) = boundary_tokens(&ctx.tokens, node) else {
			continue;
		};
		let gap = analyze_gap(ctx, left, right);
		let Some(verdict) = decide(policy, gap.shape) else {
			continue;
		};
		let fix = synthesize_fix(ctx, verdict, left, right, optional, &gap);

		violations.push(build_violation(ctx, verdict, left, right, fix.is_some()));

		if emit_edits {
			if let Some(edit) = fix {
				edits.push(edit);
			}
		}
	}
}

/// Resolves the two boundary tokens delimiting the gap.
///
/// The left boundary steps over the `?.` marker so the marker's own spacing
/// lies inside the measured gap; `optional` records that it did.
fn boundary_tokens(tokens: &[Token], node: CallLike) -> Option<(usize, usize, bool)> {
	let (callee_last, paren) = match node {
		CallLike::DynamicImport { keyword, paren } => return Some((keyword, paren, false)),
		CallLike::Construct { paren: None, .. } => return None,
		CallLike::Construct { callee_last, paren: Some(paren) } => (callee_last, paren),
		CallLike::Call { callee_last, paren } => (callee_last, paren),
	};

	if tokens[callee_last].kind == TokenKind::OptionalChain {
		Some((prev_significant(tokens, callee_last)?, paren, true))
	} else {
		Some((callee_last, paren, false))
	}
}

fn prev_significant(tokens: &[Token], idx: usize) -> Option<usize> {
	(0..idx).rev().find(|&prev| !tokens[prev].is_comment())
}

/// Classifies the raw source text strictly between the boundary tokens.
///
/// Block comments are removed before whitespace detection, so a gap holding
/// nothing but a comment counts as empty. Comment presence is answered from
/// the token stream instead, never from the stripped text.
fn analyze_gap(ctx: &FileContext, left: usize, right: usize) -> Gap {
	let raw = &ctx.text[ctx.tokens[left].end..ctx.tokens[right].start];
	let stripped = BLOCK_COMMENT_RE.replace_all(raw, "");
	let has_whitespace = stripped.chars().any(char::is_whitespace);
	let shape = if !has_whitespace {
		GapShape::Empty
	} else if LINE_TERMINATOR_RE.is_match(&stripped) {
		GapShape::Newline
	} else {
		GapShape::Whitespace
	};
	let has_comments = ctx.tokens[left + 1..right].iter().any(Token::is_comment);

	Gap { shape, has_comments }
}

fn decide(policy: &Policy, shape: GapShape) -> Option<Verdict> {
	match (policy.mode, policy.allow_newlines, shape) {
		(SpacingMode::Never, _, GapShape::Empty) => None,
		(SpacingMode::Never, _, GapShape::Whitespace | GapShape::Newline) => {
			Some(Verdict::UnexpectedWhitespace)
		},
		(SpacingMode::Always, _, GapShape::Empty) => Some(Verdict::Missing),
		(SpacingMode::Always, _, GapShape::Whitespace) => None,
		(SpacingMode::Always, false, GapShape::Newline) => Some(Verdict::UnexpectedNewline),
		(SpacingMode::Always, true, GapShape::Newline) => None,
	}
}

/// Computes the repair, or declines when safety cannot be guaranteed.
///
/// Withholding is a valid outcome, not an error; the violation is reported
/// either way. A gap holding comments is never edited.
fn synthesize_fix(
	ctx: &FileContext,
	verdict: Verdict,
	left: usize,
	right: usize,
	optional: bool,
	gap: &Gap,
) -> Option<Edit> {
	if gap.has_comments {
		return None;
	}

	let gap_start = ctx.tokens[left].end;
	let gap_end = ctx.tokens[right].start;
	let rule = verdict.rule();

	match verdict {
		Verdict::UnexpectedWhitespace => {
			if optional {
				// Collapse marker plus whitespace into the marker alone.
				Some(Edit { start: gap_start, end: gap_end, replacement: "?.".to_owned(), rule })
			} else if gap.shape == GapShape::Newline {
				// Removing a line break can change how neighbours parse.
				None
			} else {
				Some(Edit { start: gap_start, end: gap_end, replacement: String::new(), rule })
			}
		},
		Verdict::Missing => {
			if optional {
				// Ambiguous which side of the marker the space belongs on.
				None
			} else {
				Some(Edit { start: gap_end, end: gap_end, replacement: " ".to_owned(), rule })
			}
		},
		Verdict::UnexpectedNewline => {
			if !optional {
				return None;
			}

			let marker = (left + 1..right)
				.find(|&idx| ctx.tokens[idx].kind == TokenKind::OptionalChain)?;
			let replacement = if ctx.tokens[marker].start == gap_start {
				"?. "
			} else if ctx.tokens[marker].end == gap_end {
				" ?."
			} else {
				" ?. "
			};

			Some(Edit { start: gap_start, end: gap_end, replacement: replacement.to_owned(), rule })
		},
	}
}

fn build_violation(
	ctx: &FileContext,
	verdict: Verdict,
	left: usize,
	right: usize,
	fixable: bool,
) -> Violation {
	let (line, column) = position_from_offset(&ctx.line_starts, ctx.tokens[left].end);
	let (mut end_line, mut end_column) =
		position_from_offset(&ctx.line_starts, ctx.tokens[right].start);

	// The whitespace verdicts bracket the gap, not the parenthesis itself.
	if verdict != Verdict::UnexpectedNewline {
		end_column = end_column.saturating_sub(1).max(1);
		end_line = end_line.max(line);
	}

	Violation {
		file: ctx.path.clone(),
		line,
		column,
		end_line,
		end_column,
		rule: verdict.rule(),
		message: verdict.message(),
		fixable,
	}
}
