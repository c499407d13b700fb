//! Tag extractors and the annotator that orchestrates them.
//!
//! Each extractor implements one matching strategy for one family of
//! template tags. The [`Annotator`] runs them over a source string in a
//! fixed order, each operating on the text produced by the previous one.
//! Markers emitted by earlier extractors are HTML comments and contain no
//! tag-opening tokens, so later extractors treat them as opaque literal
//! text.

use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;

pub use complex::ComplexExtractor;
pub use dynamic::DynamicExtractor;
pub use paired::PairedExtractor;
pub use simple::SimpleExtractor;

use crate::EngineContext;
use crate::PathResolver;
use crate::RenderTrace;

mod complex;
mod dynamic;
mod paired;
mod simple;

/// Which matching strategy an extractor implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExtractorKind {
	/// Single tags matched by one pattern per tag name.
	Simple,
	/// Single tags whose parameters need balanced-brace matching.
	Complex,
	/// Open/close tag pairs matched with a stack.
	Paired,
	/// Tags whose body is opaque until runtime.
	Dynamic,
}

/// Shared state threaded through one annotation pass.
pub struct AnnotateContext<'a> {
	/// The host engine's view of the current render.
	pub engine: &'a EngineContext,
	/// Resolves tag references to display paths.
	pub resolver: &'a PathResolver,
	/// Per-render inheritance edge accumulator.
	pub trace: &'a mut RenderTrace,
}

/// A strategy that finds one family of template tags in source text and
/// wraps each live occurrence in structural markers.
///
/// Implementations must tolerate arbitrarily malformed input: an
/// occurrence that cannot be parsed is passed through unmodified, and
/// every scanning loop advances by at least one character per iteration.
pub trait TagExtractor {
	/// The tag names this extractor annotates.
	fn supported_tags(&self) -> &[&'static str];

	/// The matching strategy this extractor implements.
	fn kind(&self) -> ExtractorKind;

	/// Rewrite `source`, wrapping every live occurrence of a supported tag
	/// in markers. Occurrences inside comments are left untouched.
	fn annotate(&self, source: &str, ctx: &mut AnnotateContext<'_>) -> String;
}

/// The ordered extractor registry and annotation entry point.
///
/// The default set runs simple, complex, paired, then dynamic extraction.
/// Custom extractors can be appended with [`register`](Self::register)
/// without disturbing the defaults.
pub struct Annotator {
	extractors: Vec<Box<dyn TagExtractor>>,
}

impl Default for Annotator {
	fn default() -> Self {
		Self::new()
	}
}

impl Annotator {
	pub fn new() -> Self {
		Self {
			extractors: vec![
				Box::new(SimpleExtractor::new()),
				Box::new(ComplexExtractor::new()),
				Box::new(PairedExtractor::new()),
				Box::new(DynamicExtractor::new()),
			],
		}
	}

	/// Append a custom extractor after the default set.
	pub fn register(&mut self, extractor: Box<dyn TagExtractor>) {
		self.extractors.push(extractor);
	}

	/// Find the extractor responsible for a tag name via a linear lookup
	/// over each extractor's declared supported-tag set.
	pub fn processor_for_tag(&self, tag: &str) -> Option<&dyn TagExtractor> {
		self.extractors
			.iter()
			.find(|extractor| {
				extractor
					.supported_tags()
					.iter()
					.any(|supported| *supported == tag)
			})
			.map(|extractor| extractor.as_ref())
	}

	/// Every tag name with a registered extractor, in registration order.
	pub fn supported_tags(&self) -> Vec<&'static str> {
		let mut tags = Vec::new();
		for extractor in &self.extractors {
			for tag in extractor.supported_tags() {
				if !tags.contains(tag) {
					tags.push(*tag);
				}
			}
		}
		tags
	}

	/// Annotate one template source.
	///
	/// The host page must always render, so the whole pass is wrapped in a
	/// catch boundary: if any extractor panics the failure is logged and
	/// the original source is returned unmodified.
	pub fn annotate(
		&self,
		source: &str,
		engine: &EngineContext,
		resolver: &PathResolver,
		trace: &mut RenderTrace,
	) -> String {
		let outcome = catch_unwind(AssertUnwindSafe(|| {
			let mut ctx = AnnotateContext {
				engine,
				resolver,
				trace,
			};
			let mut annotated = source.to_string();
			for extractor in &self.extractors {
				annotated = extractor.annotate(&annotated, &mut ctx);
			}
			annotated
		}));

		match outcome {
			Ok(annotated) => annotated,
			Err(_) => {
				tracing::error!(
					template = %engine.current_template,
					"annotation pass failed, returning source unmodified"
				);
				source.to_string()
			}
		}
	}
}
