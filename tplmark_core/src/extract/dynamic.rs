use once_cell::sync::Lazy;
use regex::Regex;

use super::AnnotateContext;
use super::ExtractorKind;
use super::TagExtractor;
use crate::scan;

static VAR_ATTR_QUOTED: Lazy<Regex> =
	Lazy::new(|| Regex::new(r#"var=['"]([^'"]+)['"]"#).expect("quoted var pattern compiles"));

static VAR_ATTR_BARE: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"var=([^\s}]+)").expect("bare var pattern compiles"));

static WHITESPACE_RUN: Lazy<Regex> =
	Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));

/// Longest label derived from tag content before truncation.
const LABEL_PREFIX_LIMIT: usize = 80;

/// Annotates `{eval ...}` tags, whose body is evaluated at runtime and is
/// therefore opaque at scan time.
///
/// The body is never interpreted or recursed into. A label is derived from
/// the tag itself: the `var=` attribute when present, otherwise a bounded,
/// whitespace-normalized prefix of the inner content.
#[derive(Debug, Default)]
pub struct DynamicExtractor;

impl DynamicExtractor {
	pub fn new() -> Self {
		Self
	}

	fn extract_label(tag: &str) -> String {
		if let Some(caps) = VAR_ATTR_QUOTED.captures(tag) {
			return caps[1].to_string();
		}
		if let Some(caps) = VAR_ATTR_BARE.captures(tag) {
			return caps[1].to_string();
		}

		let inner = tag
			.strip_prefix("{eval")
			.and_then(|rest| rest.strip_suffix('}'))
			.unwrap_or("")
			.trim();
		let normalized = WHITESPACE_RUN.replace_all(inner, " ");
		let label: String = normalized.chars().take(LABEL_PREFIX_LIMIT).collect();

		if label.is_empty() { "eval".to_string() } else { label }
	}
}

impl TagExtractor for DynamicExtractor {
	fn supported_tags(&self) -> &[&'static str] {
		&["eval"]
	}

	fn kind(&self) -> ExtractorKind {
		ExtractorKind::Dynamic
	}

	fn annotate(&self, source: &str, ctx: &mut AnnotateContext<'_>) -> String {
		let clean = scan::strip_comments(source);
		let template = ctx.engine.safe_template();
		let mut result = String::with_capacity(source.len());
		let mut offset = 0;

		while offset < source.len() {
			let Some(found) = source[offset..].find("{eval") else {
				result.push_str(&source[offset..]);
				break;
			};
			let start = offset + found;
			result.push_str(&source[offset..start]);

			let Some(end) = scan::find_matching_brace(source, start) else {
				result.push_str(&source[start..=start]);
				offset = start + 1;
				continue;
			};

			let tag = &source[start..=end];
			offset = end + 1;

			if scan::is_commented_out(tag, &clean) {
				result.push_str(tag);
				continue;
			}

			let label = scan::sanitize_for_marker(&Self::extract_label(tag));
			result.push_str(&format!(
				"<!-- START EVAL: {label} (in: {template}) -->\n{tag}\n<!-- END EVAL: {label} -->"
			));
		}

		result
	}
}
