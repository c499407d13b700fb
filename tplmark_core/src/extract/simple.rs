use once_cell::sync::Lazy;
use regex::Captures;
use regex::Regex;

use super::AnnotateContext;
use super::ExtractorKind;
use super::TagExtractor;
use crate::scan;

static EXTENDS_TAG: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r#"\{extends\s+file=['"]([^'"]+)['"][^}]*\}"#).expect("extends pattern compiles")
});

static HOOK_TAG: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r#"\{hook\s+h=['"]([^'"]+)['"][^}]*\}"#).expect("hook pattern compiles")
});

static WIDGET_TAG: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r#"\{widget\s+name=['"]([^'"]+)['"][^}]*\}"#).expect("widget pattern compiles")
});

/// Annotates single, non-paired tags whose parameters are a flat attribute
/// list: the inheritance tag, hook invocations, and widget invocations.
///
/// Hooks and widgets are wrapped in start/end markers. The inheritance tag
/// instead emits a single marker recording the parent and child templates,
/// and records the relationship in the render trace for later chain
/// reconstruction.
#[derive(Debug, Default)]
pub struct SimpleExtractor;

impl SimpleExtractor {
	pub fn new() -> Self {
		Self
	}

	fn annotate_extends(&self, source: &str, clean: &str, ctx: &mut AnnotateContext<'_>) -> String {
		EXTENDS_TAG
			.replace_all(source, |caps: &Captures<'_>| {
				let tag = &caps[0];
				if scan::is_commented_out(tag, clean) {
					return tag.to_string();
				}

				let raw = &caps[1];
				// A leading sigil means the parent is a template variable.
				// Resolve it through the engine bindings when possible,
				// keeping the raw reference otherwise.
				let parent = match raw.strip_prefix('$') {
					Some(var) => ctx.engine.template_var(var).unwrap_or(raw).to_string(),
					None => raw.to_string(),
				};

				ctx.trace
					.record_extends(parent.as_str(), ctx.engine.current_template.as_str());

				format!(
					"<!-- EXTENDS: {} (from: {}) -->\n{tag}",
					scan::sanitize_for_marker(&parent),
					ctx.engine.safe_template(),
				)
			})
			.into_owned()
	}

	fn annotate_start_end(
		&self,
		pattern: &Regex,
		kind: &str,
		source: &str,
		clean: &str,
		ctx: &AnnotateContext<'_>,
	) -> String {
		let template = ctx.engine.safe_template();

		pattern
			.replace_all(source, |caps: &Captures<'_>| {
				let tag = &caps[0];
				if scan::is_commented_out(tag, clean) {
					return tag.to_string();
				}

				let name = scan::sanitize_for_marker(&caps[1]);
				format!(
					"<!-- START {kind}: {name} (in: {template}) -->\n{tag}\n<!-- END {kind}: {name} -->"
				)
			})
			.into_owned()
	}
}

impl TagExtractor for SimpleExtractor {
	fn supported_tags(&self) -> &[&'static str] {
		&["extends", "hook", "widget"]
	}

	fn kind(&self) -> ExtractorKind {
		ExtractorKind::Simple
	}

	fn annotate(&self, source: &str, ctx: &mut AnnotateContext<'_>) -> String {
		let clean = scan::strip_comments(source);
		let source = self.annotate_extends(source, &clean, ctx);
		let source = self.annotate_start_end(&HOOK_TAG, "HOOK", &source, &clean, ctx);
		self.annotate_start_end(&WIDGET_TAG, "WIDGET", &source, &clean, ctx)
	}
}
