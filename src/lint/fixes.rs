// self
use crate::{lint::shared::Edit, prelude::*};

/// Applies non-overlapping edits in reverse offset order.
///
/// Edits here always come from token boundaries, so overlap only happens when
/// two passes race on the same gap; the later edit is dropped and picked up
/// on the next fix pass.
pub(crate) fn apply_edits(text: &mut String, mut edits: Vec<Edit>) -> Result<usize> {
	if edits.is_empty() {
		return Ok(0);
	}

	edits.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)).then(a.rule.cmp(b.rule)));

	let mut filtered: Vec<Edit> = Vec::new();
	let mut last_end = 0_usize;

	for edit in edits {
		if edit.start < last_end {
			continue;
		}

		last_end = edit.end;
		filtered.push(edit);
	}

	for edit in filtered.iter().rev() {
		if edit.end > text.len() || edit.start > edit.end {
			return Err(eyre::eyre!(
				"Invalid edit range {}..{} for text length {}.",
				edit.start,
				edit.end,
				text.len()
			));
		}

		text.replace_range(edit.start..edit.end, &edit.replacement);
	}

	Ok(filtered.len())
}
