// crates.io
use once_cell::sync::Lazy;

// std
use std::collections::HashSet;

static KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
	HashSet::from([
		"await",
		"break",
		"case",
		"catch",
		"class",
		"const",
		"continue",
		"debugger",
		"default",
		"delete",
		"do",
		"else",
		"enum",
		"export",
		"extends",
		"false",
		"finally",
		"for",
		"function",
		"if",
		"import",
		"in",
		"instanceof",
		"new",
		"null",
		"return",
		"super",
		"switch",
		"this",
		"throw",
		"true",
		"try",
		"typeof",
		"var",
		"void",
		"while",
		"with",
		"yield",
	])
});

// Longest first so maximal munch falls out of a linear scan.
const PUNCTUATORS: [&str; 24] = [
	">>>=", "===", "!==", "**=", "<<=", ">>=", ">>>", "...", "&&=", "||=", "=>", "==", "!=", "<=",
	">=", "&&", "||", "++", "--", "+=", "-=", "*=", "%=", "**",
];

/// The syntactic category of a lexed token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
	Ident,
	Keyword,
	Number,
	Str,
	Template,
	Regex,
	Punct,
	/// The `?.` optional-chaining marker.
	OptionalChain,
	LineComment,
	BlockComment,
}

/// An immutable byte span of source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Token {
	pub(crate) kind: TokenKind,
	pub(crate) start: usize,
	pub(crate) end: usize,
}
impl Token {
	pub(crate) fn is_comment(&self) -> bool {
		matches!(self.kind, TokenKind::LineComment | TokenKind::BlockComment)
	}

	pub(crate) fn text<'a>(&self, source: &'a str) -> &'a str {
		&source[self.start..self.end]
	}
}

pub(crate) fn is_line_terminator(ch: char) -> bool {
	matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Lenient ES-flavoured scanner.
///
/// Never fails: unterminated literals end at the line or file boundary and
/// unknown characters become single-character punctuators. Whitespace is not
/// tokenized; callers read inter-token text straight from the source.
pub(crate) fn tokenize(source: &str) -> Vec<Token> {
	Lexer::new(source).run()
}

struct Lexer<'a> {
	source: &'a str,
	chars: Vec<(usize, char)>,
	idx: usize,
	tokens: Vec<Token>,
}
impl<'a> Lexer<'a> {
	fn new(source: &'a str) -> Self {
		Self { source, chars: source.char_indices().collect(), idx: 0, tokens: Vec::new() }
	}

	fn peek(&self, ahead: usize) -> Option<char> {
		self.chars.get(self.idx + ahead).map(|(_, ch)| *ch)
	}

	fn offset(&self) -> usize {
		self.chars.get(self.idx).map_or(self.source.len(), |(offset, _)| *offset)
	}

	fn bump(&mut self) -> Option<char> {
		let ch = self.peek(0)?;

		self.idx += 1;

		Some(ch)
	}

	fn rest(&self) -> &'a str {
		&self.source[self.offset()..]
	}

	fn push(&mut self, kind: TokenKind, start: usize) {
		self.tokens.push(Token { kind, start, end: self.offset() });
	}

	fn last_significant(&self) -> Option<&Token> {
		self.tokens.iter().rev().find(|token| !token.is_comment())
	}

	fn regex_allowed(&self) -> bool {
		let Some(token) = self.last_significant() else {
			return true;
		};

		match token.kind {
			TokenKind::Ident
			| TokenKind::Number
			| TokenKind::Str
			| TokenKind::Template
			| TokenKind::Regex
			| TokenKind::OptionalChain => false,
			TokenKind::Keyword => {
				!matches!(token.text(self.source), "this" | "true" | "false" | "null" | "super")
			},
			TokenKind::Punct => {
				!matches!(token.text(self.source), ")" | "]" | "}" | "++" | "--")
			},
			TokenKind::LineComment | TokenKind::BlockComment => true,
		}
	}

	fn run(mut self) -> Vec<Token> {
		while let Some(ch) = self.peek(0) {
			let start = self.offset();

			if ch.is_whitespace() {
				self.idx += 1;

				continue;
			}

			match ch {
				'/' if self.peek(1) == Some('/') => self.scan_line_comment(start),
				'/' if self.peek(1) == Some('*') => self.scan_block_comment(start),
				'/' if self.regex_allowed() => self.scan_regex(start),
				'\'' | '"' => self.scan_string(start, ch),
				'`' => self.scan_template(start),
				'?' => self.scan_question(start),
				'.' if self.peek(1).is_some_and(|next| next.is_ascii_digit()) => {
					self.scan_number(start);
				},
				_ if ch.is_ascii_digit() => self.scan_number(start),
				_ if is_ident_start(ch) => self.scan_ident(start),
				_ => self.scan_punct(start),
			}
		}

		self.tokens
	}

	fn scan_line_comment(&mut self, start: usize) {
		self.idx += 2;

		while let Some(ch) = self.peek(0) {
			if is_line_terminator(ch) {
				break;
			}

			self.idx += 1;
		}

		self.push(TokenKind::LineComment, start);
	}

	fn scan_block_comment(&mut self, start: usize) {
		self.idx += 2;

		while let Some(ch) = self.bump() {
			if ch == '*' && self.peek(0) == Some('/') {
				self.idx += 1;

				break;
			}
		}

		self.push(TokenKind::BlockComment, start);
	}

	fn scan_string(&mut self, start: usize, quote: char) {
		self.idx += 1;

		while let Some(ch) = self.peek(0) {
			if is_line_terminator(ch) {
				break;
			}

			self.idx += 1;

			if ch == '\\' {
				self.idx += 1;
			} else if ch == quote {
				break;
			}
		}

		self.push(TokenKind::Str, start);
	}

	// A whole template literal, substitutions included, becomes one token.
	fn scan_template(&mut self, start: usize) {
		enum State {
			Literal,
			Code(u32),
		}

		self.idx += 1;

		let mut stack = vec![State::Literal];

		while let Some(ch) = self.peek(0) {
			match stack.last_mut() {
				Some(State::Literal) => {
					self.idx += 1;

					match ch {
						'\\' => self.idx += 1,
						'`' => {
							stack.pop();

							if stack.is_empty() {
								break;
							}
						},
						'$' if self.peek(0) == Some('{') => {
							self.idx += 1;

							stack.push(State::Code(0));
						},
						_ => {},
					}
				},
				Some(State::Code(depth)) => match ch {
					'{' => {
						*depth += 1;

						self.idx += 1;
					},
					'}' => {
						if *depth == 0 {
							stack.pop();
						} else {
							*depth -= 1;
						}

						self.idx += 1;
					},
					'`' => {
						self.idx += 1;

						stack.push(State::Literal);
					},
					'\'' | '"' => {
						self.idx += 1;
						self.skip_embedded_string(ch);
					},
					_ => self.idx += 1,
				},
				None => break,
			}
		}

		self.push(TokenKind::Template, start);
	}

	// Strings inside `${...}` may contain braces or backticks.
	fn skip_embedded_string(&mut self, quote: char) {
		while let Some(ch) = self.peek(0) {
			if is_line_terminator(ch) {
				break;
			}

			self.idx += 1;

			if ch == '\\' {
				self.idx += 1;
			} else if ch == quote {
				break;
			}
		}
	}

	fn scan_regex(&mut self, start: usize) {
		self.idx += 1;

		let mut in_class = false;

		while let Some(ch) = self.peek(0) {
			if is_line_terminator(ch) {
				break;
			}

			self.idx += 1;

			match ch {
				'\\' => self.idx += 1,
				'[' => in_class = true,
				']' => in_class = false,
				'/' if !in_class => break,
				_ => {},
			}
		}

		while self.peek(0).is_some_and(is_ident_part) {
			self.idx += 1;
		}

		self.push(TokenKind::Regex, start);
	}

	fn scan_question(&mut self, start: usize) {
		// `?.` followed by a decimal digit lexes as a conditional, per grammar.
		if self.peek(1) == Some('.') && !self.peek(2).is_some_and(|ch| ch.is_ascii_digit()) {
			self.idx += 2;
			self.push(TokenKind::OptionalChain, start);
		} else if self.peek(1) == Some('?') {
			self.idx += if self.peek(2) == Some('=') { 3 } else { 2 };
			self.push(TokenKind::Punct, start);
		} else {
			self.idx += 1;
			self.push(TokenKind::Punct, start);
		}
	}

	fn scan_number(&mut self, start: usize) {
		while let Some(ch) = self.peek(0) {
			if ch.is_ascii_alphanumeric() || ch == '.' || ch == '_' {
				let is_exponent = matches!(ch, 'e' | 'E')
					&& matches!(self.peek(1), Some('+') | Some('-'))
					&& self.peek(2).is_some_and(|next| next.is_ascii_digit());

				self.idx += if is_exponent { 2 } else { 1 };
			} else {
				break;
			}
		}

		self.push(TokenKind::Number, start);
	}

	fn scan_ident(&mut self, start: usize) {
		while self.peek(0).is_some_and(is_ident_part) {
			self.idx += 1;
		}

		let text = &self.source[start..self.offset()];
		let kind = if KEYWORDS.contains(text) { TokenKind::Keyword } else { TokenKind::Ident };

		self.push(kind, start);
	}

	fn scan_punct(&mut self, start: usize) {
		for op in PUNCTUATORS {
			if self.rest().starts_with(op) {
				self.idx += op.len();
				self.push(TokenKind::Punct, start);

				return;
			}
		}

		// Remaining operators and every single-character punctuator; consume
		// one more char when an `=` directly follows an arithmetic/bitwise op.
		let compound = matches!(self.peek(0), Some('+' | '-' | '*' | '/' | '%' | '&' | '|' | '^'))
			&& self.peek(1) == Some('=');

		self.idx += if compound { 2 } else { 1 };
		self.push(TokenKind::Punct, start);
	}
}

fn is_ident_start(ch: char) -> bool {
	ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_part(ch: char) -> bool {
	ch.is_alphanumeric() || ch == '_' || ch == '$'
}
