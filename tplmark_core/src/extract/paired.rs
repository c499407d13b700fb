use once_cell::sync::Lazy;
use regex::Captures;
use regex::Regex;

use super::AnnotateContext;
use super::ExtractorKind;
use super::TagExtractor;
use crate::scan;

static SELF_CLOSING: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r#"\{block\s+name=['"]([^'"]+)['"][^}]*\}\s*\{/block\}"#)
		.expect("self-closing block pattern compiles")
});

static OPEN_TAG: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r#"\{block\s+name=['"]([^'"]+)['"][^}]*\}"#).expect("block open pattern compiles")
});

const OPEN_TOKEN: &str = "{block";
const CLOSE_TOKEN: &str = "{/block}";

/// A live open tag awaiting its close.
struct PendingOpen {
	name: String,
	template: String,
}

/// Annotates paired `{block}`/`{/block}` tags, which may nest.
///
/// Two phases: a pattern pass first wraps the self-closing shorthand (an
/// open tag immediately followed by its close), then a stack pass walks
/// the remaining open and close tokens in textual order so start and end
/// markers line up even when blocks nest. A close with no matching open
/// emits a bare, label-less end marker rather than failing.
#[derive(Debug, Default)]
pub struct PairedExtractor;

impl PairedExtractor {
	pub fn new() -> Self {
		Self
	}

	fn annotate_self_closing(&self, source: &str, clean: &str, template: &str) -> String {
		SELF_CLOSING
			.replace_all(source, |caps: &Captures<'_>| {
				let tag = &caps[0];
				if scan::is_commented_out(tag, clean) {
					return tag.to_string();
				}

				let name = scan::sanitize_for_marker(&caps[1]);
				format!(
					"<!-- START BLOCK: {name} (in: {template}) -->\n{tag}\n<!-- END BLOCK: {name} (in: {template}) -->"
				)
			})
			.into_owned()
	}

	fn stack_pass(&self, source: &str, clean: &str, template: &str) -> String {
		let mut stack: Vec<PendingOpen> = Vec::new();
		let mut result = String::with_capacity(source.len());
		let mut offset = 0;

		while offset < source.len() {
			let open_pos = source[offset..].find(OPEN_TOKEN).map(|pos| offset + pos);
			let close_pos = source[offset..].find(CLOSE_TOKEN).map(|pos| offset + pos);

			// Whichever token comes first in the text is handled next.
			let (next, is_open) = match (open_pos, close_pos) {
				(None, None) => {
					result.push_str(&source[offset..]);
					break;
				}
				(Some(open), None) => (open, true),
				(None, Some(close)) => (close, false),
				(Some(open), Some(close)) if open < close => (open, true),
				(_, Some(close)) => (close, false),
			};

			result.push_str(&source[offset..next]);

			if is_open {
				offset = self.handle_open(source, next, clean, template, &mut stack, &mut result);
			} else {
				offset = self.handle_close(next, clean, &mut stack, &mut result);
			}
		}

		result
	}

	/// Process the open token at `next`, returning the offset to resume at.
	fn handle_open(
		&self,
		source: &str,
		next: usize,
		clean: &str,
		template: &str,
		stack: &mut Vec<PendingOpen>,
		result: &mut String,
	) -> usize {
		let caps = OPEN_TAG
			.captures_at(source, next)
			.filter(|caps| caps.get(0).is_some_and(|tag| tag.start() == next));
		let Some(caps) = caps else {
			// The open token is not followed by a well-formed tag. Emit one
			// character and keep scanning.
			result.push_str(&source[next..=next]);
			return next + 1;
		};

		let tag_end = caps.get(0).map_or(next, |tag| tag.end());
		let tag = &source[next..tag_end];

		if scan::is_commented_out(tag, clean) {
			result.push_str(tag);
			return tag_end;
		}

		// A shorthand pair the first phase already wrapped: pass both
		// halves through untouched so the pair is not annotated twice.
		let after = &source[tag_end..];
		let gap = after.len() - after.trim_start().len();
		if after[gap..].starts_with(CLOSE_TOKEN) {
			let close_end = tag_end + gap + CLOSE_TOKEN.len();
			result.push_str(&source[next..close_end]);
			return close_end;
		}

		let name = scan::sanitize_for_marker(&caps[1]);
		result.push_str(&format!("<!-- START BLOCK: {name} (in: {template}) -->\n{tag}"));
		stack.push(PendingOpen {
			name,
			template: template.to_string(),
		});

		tag_end
	}

	/// Process the close token at `next`, returning the offset to resume at.
	fn handle_close(
		&self,
		next: usize,
		clean: &str,
		stack: &mut Vec<PendingOpen>,
		result: &mut String,
	) -> usize {
		if scan::is_commented_out(CLOSE_TOKEN, clean) {
			result.push_str(CLOSE_TOKEN);
			return next + CLOSE_TOKEN.len();
		}

		match stack.pop() {
			Some(open) => {
				result.push_str(&format!(
					"{CLOSE_TOKEN}\n<!-- END BLOCK: {} (in: {}) -->",
					open.name, open.template
				));
			}
			None => {
				// No matching open tag. Emit a label-less end marker so the
				// anomaly stays visible, and keep scanning.
				result.push_str(&format!("{CLOSE_TOKEN}\n<!-- END BLOCK -->"));
			}
		}

		next + CLOSE_TOKEN.len()
	}
}

impl TagExtractor for PairedExtractor {
	fn supported_tags(&self) -> &[&'static str] {
		&["block"]
	}

	fn kind(&self) -> ExtractorKind {
		ExtractorKind::Paired
	}

	fn annotate(&self, source: &str, ctx: &mut AnnotateContext<'_>) -> String {
		let clean = scan::strip_comments(source);
		let template = ctx.engine.safe_template();

		let source = self.annotate_self_closing(source, &clean, &template);
		self.stack_pass(&source, &clean, &template)
	}
}
