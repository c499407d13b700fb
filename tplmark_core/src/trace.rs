use serde::Deserialize;
use serde::Serialize;

/// A single template-inheritance relationship observed during annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InheritanceEdge {
	/// The template being extended.
	pub parent: String,
	/// The template that declared the inheritance tag.
	pub child: String,
}

/// Per-render accumulator for inheritance edges.
///
/// One trace lives for exactly one page render: the annotation passes fill
/// it, the output phase consumes it with [`take_edges`](Self::take_edges),
/// and nothing is carried over into the next render. Treat it as a
/// single-slot mailbox rather than a growing log.
#[derive(Debug, Default)]
pub struct RenderTrace {
	edges: Vec<InheritanceEdge>,
}

impl RenderTrace {
	pub fn new() -> Self {
		Self::default()
	}

	/// Record one inheritance tag occurrence.
	pub fn record_extends(&mut self, parent: impl Into<String>, child: impl Into<String>) {
		self.edges.push(InheritanceEdge {
			parent: parent.into(),
			child: child.into(),
		});
	}

	/// The edges collected so far.
	pub fn edges(&self) -> &[InheritanceEdge] {
		&self.edges
	}

	/// Hand the collected edges to the output phase, leaving the trace
	/// empty for the next render.
	pub fn take_edges(&mut self) -> Vec<InheritanceEdge> {
		std::mem::take(&mut self.edges)
	}
}
