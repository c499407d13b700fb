use once_cell::sync::Lazy;
use regex::Regex;

use super::AnnotateContext;
use super::ExtractorKind;
use super::TagExtractor;
use crate::scan;

static FILE_ATTR: Lazy<Regex> =
	Lazy::new(|| Regex::new(r#"file=['"]([^'"]+)['"]"#).expect("file attribute pattern compiles"));

/// Annotates single tags whose parameters may contain nested braces or
/// complex expressions, such as `{include file=... vars=[...]}`.
///
/// A single pattern cannot find the end of such a tag, so occurrences are
/// located by their literal opening token and closed with the balanced
/// brace matcher. The referenced file is resolved to a display path
/// through the path resolver before the markers are emitted.
#[derive(Debug, Default)]
pub struct ComplexExtractor;

impl ComplexExtractor {
	pub fn new() -> Self {
		Self
	}

	fn annotate_tag(
		&self,
		source: &str,
		tag_name: &str,
		clean: &str,
		ctx: &AnnotateContext<'_>,
	) -> String {
		let open_token = format!("{{{tag_name}");
		let marker_kind = tag_name.to_uppercase();
		let mut result = String::with_capacity(source.len());
		let mut offset = 0;

		while offset < source.len() {
			let Some(found) = source[offset..].find(&open_token) else {
				result.push_str(&source[offset..]);
				break;
			};
			let start = offset + found;
			result.push_str(&source[offset..start]);

			let Some(end) = scan::find_matching_brace(source, start) else {
				// Unbalanced tag: emit the opening brace alone and resume
				// one character further so the scan always terminates.
				result.push_str(&source[start..=start]);
				offset = start + 1;
				continue;
			};

			let tag = &source[start..=end];
			offset = end + 1;

			if scan::is_commented_out(tag, clean) {
				result.push_str(tag);
				continue;
			}

			let label = FILE_ATTR
				.captures(tag)
				.map_or_else(|| tag_name.to_string(), |caps| caps[1].to_string());
			let resolved = ctx.resolver.resolve(&label);
			let safe_path = scan::sanitize_for_marker(&resolved);

			result.push_str(&format!(
				"<!-- START {marker_kind}: {safe_path} -->\n{tag}\n<!-- END {marker_kind}: {safe_path} -->"
			));
		}

		result
	}
}

impl TagExtractor for ComplexExtractor {
	fn supported_tags(&self) -> &[&'static str] {
		&["include"]
	}

	fn kind(&self) -> ExtractorKind {
		ExtractorKind::Complex
	}

	fn annotate(&self, source: &str, ctx: &mut AnnotateContext<'_>) -> String {
		let clean = scan::strip_comments(source);
		let mut annotated = source.to_string();
		for tag_name in self.supported_tags() {
			annotated = self.annotate_tag(&annotated, tag_name, &clean, ctx);
		}
		annotated
	}
}
