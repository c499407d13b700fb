use once_cell::sync::Lazy;
use regex::Regex;

/// `{* ... *}` template comments, matched non-greedily across lines.
static TEMPLATE_COMMENT: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"(?s)\{\*.*?\*\}").expect("template comment pattern compiles"));

/// `<!-- ... -->` HTML comments, matched non-greedily across lines.
static HTML_COMMENT: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("html comment pattern compiles"));

/// Find the closing brace that balances the opening brace at `open_pos`.
///
/// The scan keeps a nesting counter and treats quoted string contents as
/// opaque: braces inside a single- or double-quoted literal do not affect
/// the balance, and a quote character preceded by a backslash does not end
/// the literal. Returns `None` when the input ends before the counter
/// returns to zero, which callers must treat as an unparsable tag.
pub fn find_matching_brace(source: &str, open_pos: usize) -> Option<usize> {
	let bytes = source.as_bytes();
	let mut depth: i64 = 0;
	let mut in_string = false;
	let mut delimiter = 0u8;
	let mut index = open_pos;

	while index < bytes.len() {
		let byte = bytes[index];

		if in_string {
			if byte == delimiter && (index == 0 || bytes[index - 1] != b'\\') {
				in_string = false;
			}
			index += 1;
			continue;
		}

		match byte {
			b'"' | b'\'' => {
				in_string = true;
				delimiter = byte;
			}
			b'{' => depth += 1,
			b'}' => {
				depth -= 1;
				if depth == 0 {
					return Some(index);
				}
			}
			_ => {}
		}

		index += 1;
	}

	None
}

/// Produce a copy of `source` with every template comment and HTML comment
/// span erased.
///
/// The result is only ever used for membership tests: a tag present in the
/// original text but absent from the cleaned text was commented out and
/// must be left unannotated.
pub fn strip_comments(source: &str) -> String {
	let without_template = TEMPLATE_COMMENT.replace_all(source, "");
	HTML_COMMENT.replace_all(&without_template, "").into_owned()
}

/// Whether `tag` only occurs inside comments of the original source.
pub fn is_commented_out(tag: &str, clean_source: &str) -> bool {
	!clean_source.contains(tag)
}

/// Make a value safe for embedding in a marker payload.
///
/// Backslash path separators are normalized to forward slashes, and the
/// `--` sequence is replaced with a one-character lookalike because it
/// would otherwise terminate the enclosing HTML comment early.
pub fn sanitize_for_marker(value: &str) -> String {
	value.replace('\\', "/").replace("--", "\u{2014}")
}
