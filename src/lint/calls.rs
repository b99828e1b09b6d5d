// std
use std::collections::{HashMap, HashSet};

// self
use crate::lint::lexer::{Token, TokenKind};

/// A call-like site found by the scanner. Fields are indices into the token
/// stream; positional lookups only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CallLike {
	/// Ordinary call. `callee_last` is the significant token directly before
	/// the parenthesis and may still be the `?.` marker.
	Call { callee_last: usize, paren: usize },
	/// `new` expression. No parenthesis is valid and analyzed by nobody.
	Construct { callee_last: usize, paren: Option<usize> },
	/// `import(...)`. The keyword itself is the left boundary.
	DynamicImport { keyword: usize, paren: usize },
}

const CONTROL_KEYWORDS: [&str; 6] = ["if", "for", "while", "switch", "catch", "with"];

/// One left-to-right pass over significant tokens.
///
/// No AST is built; the exclusions below (control headers, arrow parameter
/// lists, function and method definitions) are chosen so a synthesized fix
/// can never land on non-call syntax.
pub(crate) fn scan(tokens: &[Token], source: &str) -> Vec<CallLike> {
	let text = |idx: usize| tokens[idx].text(source);
	let sig = tokens
		.iter()
		.enumerate()
		.filter(|(_, token)| !token.is_comment())
		.map(|(idx, _)| idx)
		.collect::<Vec<_>>();
	let mut sig_pos = HashMap::new();

	for (pos, &idx) in sig.iter().enumerate() {
		sig_pos.insert(idx, pos);
	}

	let (open_to_close, close_to_open) = match_parens(tokens, source, &sig);
	let mut control_opens = HashSet::new();

	for (pos, &idx) in sig.iter().enumerate() {
		if tokens[idx].kind != TokenKind::Punct || text(idx) != "(" {
			continue;
		}

		let header = pos.checked_sub(1).map(|prev| sig[prev]).is_some_and(|prev| {
			tokens[prev].kind == TokenKind::Keyword && CONTROL_KEYWORDS.contains(&text(prev))
		});

		if header {
			control_opens.insert(idx);
		}
	}
	let mut claimed = HashSet::new();
	let mut nodes = Vec::new();

	for (pos, &idx) in sig.iter().enumerate() {
		let token = &tokens[idx];

		if token.kind == TokenKind::Keyword && text(idx) == "import" {
			if let Some(&next) = sig.get(pos + 1) {
				if text(next) == "(" {
					claimed.insert(next);
					nodes.push(CallLike::DynamicImport { keyword: idx, paren: next });
				}
			}

			continue;
		}

		if token.kind == TokenKind::Keyword && text(idx) == "new" {
			if let Some(node) = scan_construct(tokens, source, &sig, &sig_pos, &open_to_close, pos) {
				if let CallLike::Construct { paren: Some(paren), .. } = node {
					claimed.insert(paren);
				}

				nodes.push(node);
			}

			continue;
		}

		if token.kind != TokenKind::Punct || text(idx) != "(" {
			continue;
		}
		if claimed.contains(&idx) || control_opens.contains(&idx) {
			continue;
		}

		// Arrow parameter lists and function or method definitions continue
		// with `=>` or `{` after the closing parenthesis; calls never do.
		if let Some(&close) = open_to_close.get(&idx) {
			let close_pos = sig_pos[&close];

			if sig.get(close_pos + 1).is_some_and(|&after| matches!(text(after), "=>" | "{")) {
				continue;
			}
		} else {
			continue;
		}

		let Some(prev_pos) = pos.checked_sub(1) else {
			continue;
		};
		let callee_last = sig[prev_pos];
		let ender_pos = if tokens[callee_last].kind == TokenKind::OptionalChain {
			let Some(before_marker) = prev_pos.checked_sub(1) else {
				continue;
			};

			before_marker
		} else {
			prev_pos
		};
		let ender = sig[ender_pos];
		let is_callee_end = match tokens[ender].kind {
			TokenKind::Ident => true,
			TokenKind::Keyword => text(ender) == "super",
			TokenKind::Punct => match text(ender) {
				")" => close_to_open
					.get(&ender)
					.is_some_and(|open| !control_opens.contains(open)),
				"]" => true,
				_ => false,
			},
			_ => false,
		};

		if is_callee_end {
			nodes.push(CallLike::Call { callee_last, paren: idx });
		}
	}

	nodes
}

fn scan_construct(
	tokens: &[Token],
	source: &str,
	sig: &[usize],
	sig_pos: &HashMap<usize, usize>,
	open_to_close: &HashMap<usize, usize>,
	new_pos: usize,
) -> Option<CallLike> {
	let text = |idx: usize| tokens[idx].text(source);
	let head = *sig.get(new_pos + 1)?;
	let mut cur = match tokens[head].kind {
		TokenKind::Ident => sig_pos[&head],
		TokenKind::Keyword if text(head) == "this" => sig_pos[&head],
		// `new (expr)(args)`: the parenthesized callee ends at its close.
		TokenKind::Punct if text(head) == "(" => sig_pos[open_to_close.get(&head)?],
		_ => return None,
	};

	loop {
		let Some(&next) = sig.get(cur + 1) else {
			break;
		};

		match text(next) {
			"." => {
				let member = *sig.get(cur + 2)?;

				if !matches!(tokens[member].kind, TokenKind::Ident | TokenKind::Keyword) {
					break;
				}

				cur = sig_pos[&member];
			},
			"[" => {
				let close = close_of_bracket(tokens, source, sig, sig_pos[&next])?;

				cur = close;
			},
			_ => break,
		}
	}

	let callee_last = sig[cur];
	let paren = sig.get(cur + 1).copied().filter(|&idx| text(idx) == "(");

	Some(CallLike::Construct { callee_last, paren })
}

fn close_of_bracket(
	tokens: &[Token],
	source: &str,
	sig: &[usize],
	open_pos: usize,
) -> Option<usize> {
	let mut depth = 0_i32;

	for (pos, &idx) in sig.iter().enumerate().skip(open_pos) {
		if tokens[idx].kind != TokenKind::Punct {
			continue;
		}

		match tokens[idx].text(source) {
			"[" => depth += 1,
			"]" => {
				depth -= 1;

				if depth == 0 {
					return Some(pos);
				}
			},
			_ => {},
		}
	}

	None
}

fn match_parens(
	tokens: &[Token],
	source: &str,
	sig: &[usize],
) -> (HashMap<usize, usize>, HashMap<usize, usize>) {
	let mut open_to_close = HashMap::new();
	let mut close_to_open = HashMap::new();
	let mut stack = Vec::new();

	for &idx in sig {
		if tokens[idx].kind != TokenKind::Punct {
			continue;
		}

		match tokens[idx].text(source) {
			"(" => stack.push(idx),
			")" => {
				if let Some(open) = stack.pop() {
					open_to_close.insert(open, idx);
					close_to_open.insert(idx, open);
				}
			},
			_ => {},
		}
	}

	(open_to_close, close_to_open)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::lint::lexer::tokenize;

	fn scan_source(source: &str) -> Vec<CallLike> {
		scan(&tokenize(source), source)
	}

	#[test]
	fn finds_plain_and_method_calls() {
		let nodes = scan_source("foo (1); a.b.c(2);");

		assert_eq!(nodes.len(), 2);
		assert!(matches!(nodes[0], CallLike::Call { .. }));
		assert!(matches!(nodes[1], CallLike::Call { .. }));
	}

	#[test]
	fn finds_chained_and_indexed_callees() {
		let nodes = scan_source("f()(x); arr[0] (y);");

		assert_eq!(nodes.len(), 3);
	}

	#[test]
	fn finds_super_and_optional_chained_calls() {
		let source = "super (a); foo?. (b);";
		let tokens = tokenize(source);
		let nodes = scan(&tokens, source);

		assert_eq!(nodes.len(), 2);

		let CallLike::Call { callee_last, .. } = nodes[1] else {
			panic!("expected a call node");
		};

		assert_eq!(tokens[callee_last].text(source), "?.");
	}

	#[test]
	fn control_headers_are_not_calls() {
		assert!(scan_source("if (x) {} while (y) {} switch (z) {}").is_empty());
		assert!(scan_source("try {} catch (err) {}").is_empty());
	}

	#[test]
	fn definitions_and_arrows_are_not_calls() {
		assert!(scan_source("function foo (a) { return a; }").is_empty());
		assert!(scan_source("const f = async (a) => a;").is_empty());
		assert!(scan_source("class A { constructor (x) {} bar (y) {} }").is_empty());
	}

	#[test]
	fn call_inside_control_header_is_found() {
		let nodes = scan_source("if (foo (1)) {}");

		assert_eq!(nodes.len(), 1);
	}

	#[test]
	fn construct_without_parens_is_recorded_without_one() {
		let nodes = scan_source("const a = new Foo; const b = new Bar (1);");

		assert_eq!(nodes.len(), 2);
		assert!(matches!(nodes[0], CallLike::Construct { paren: None, .. }));
		assert!(matches!(nodes[1], CallLike::Construct { paren: Some(_), .. }));
	}

	#[test]
	fn construct_member_chain_resolves_to_last_callee_token() {
		let source = "new a.b[c] (1);";
		let tokens = tokenize(source);
		let nodes = scan(&tokens, source);
		let CallLike::Construct { callee_last, paren: Some(_) } = nodes[0] else {
			panic!("expected a parenthesized construct");
		};

		assert_eq!(tokens[callee_last].text(source), "]");
	}

	#[test]
	fn construct_paren_is_not_double_reported() {
		let nodes = scan_source("new Foo (1);");

		assert_eq!(nodes.len(), 1);
	}

	#[test]
	fn dynamic_import_is_found_and_static_import_is_not() {
		let nodes = scan_source("import ('mod'); import x from 'mod'; import.meta;");

		assert_eq!(nodes.len(), 1);
		assert!(matches!(nodes[0], CallLike::DynamicImport { .. }));
	}
}
