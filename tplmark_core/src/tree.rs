use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt::Display;
use std::panic::AssertUnwindSafe;
use std::panic::catch_unwind;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

use crate::InheritanceEdge;
use crate::RenderTrace;

/// One pattern over the rendered output captures every marker kind and its
/// payload. The payload group is optional so the label-less `END BLOCK`
/// anomaly marker is still visible as a close event.
static MARKER: Lazy<Regex> = Lazy::new(|| {
	Regex::new(
		r"(?s)<!-- (EXTENDS|START INCLUDE|END INCLUDE|START BLOCK|END BLOCK|START MODULE FETCH|END MODULE FETCH|START HOOK|END HOOK|START WIDGET|END WIDGET|START EVAL|END EVAL)(?::\s*(.*?))?\s*-->",
	)
	.expect("marker pattern compiles")
});

/// `name (in: template)` payloads.
static NAMED_PAYLOAD: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"(?s)^([^(]+?)\s*\(in:\s*([^)]+)\)$").expect("named payload pattern compiles")
});

/// `parent (from: child)` payloads on inheritance markers.
static EXTENDS_PAYLOAD: Lazy<Regex> = Lazy::new(|| {
	Regex::new(r"(?s)^(.+?)\s*\(from:\s*([^)]+)\)$").expect("extends payload pattern compiles")
});

/// The construct kind a structure node records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum NodeKind {
	Include,
	ModuleFetch,
	Block,
	Hook,
	Widget,
	Eval,
}

impl Display for NodeKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Include => write!(f, "include"),
			Self::ModuleFetch => write!(f, "module_fetch"),
			Self::Block => write!(f, "block"),
			Self::Hook => write!(f, "hook"),
			Self::Widget => write!(f, "widget"),
			Self::Eval => write!(f, "eval"),
		}
	}
}

/// A node in the reconstructed template structure forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureNode {
	/// The construct this node records.
	pub kind: NodeKind,
	/// Block/hook/widget/eval name, or the resolved path for includes and
	/// module fetches.
	pub name: String,
	/// Owning template, when the marker payload carried one. Runtime
	/// generated markers may omit it.
	pub template: Option<String>,
	/// Constructs nested inside this one, in order of appearance.
	pub children: Vec<StructureNode>,
}

impl StructureNode {
	fn new(kind: NodeKind, name: impl Into<String>, template: Option<String>) -> Self {
		Self {
			kind,
			name: name.into(),
			template,
			children: Vec::new(),
		}
	}
}

/// The reconstructed output structure: a forest of nodes rooted at markers
/// with no enclosing marker, plus the inheritance edges observed in the
/// output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructureTree {
	pub roots: Vec<StructureNode>,
	pub edges: Vec<InheritanceEdge>,
}

impl StructureTree {
	/// Replace the edges parsed from output markers with the edges recorded
	/// during annotation. The annotation-time record has variable
	/// references already resolved, so it wins when both exist.
	pub fn adopt_trace(&mut self, trace: &mut RenderTrace) {
		let edges = trace.take_edges();
		if !edges.is_empty() {
			self.edges = edges;
		}
	}

	/// Reconstruct the inheritance chain from the collected edges: start at
	/// the template that is not anyone's parent and walk parent links
	/// upward. A repeated template ends the walk so a cyclic edge set
	/// cannot loop.
	pub fn inheritance_chain(&self) -> Vec<String> {
		inheritance_chain(&self.edges)
	}
}

/// Scan rendered output for structural markers and rebuild the forest.
///
/// The debugging layer must never break the page, so the pass is wrapped
/// in a catch boundary: a panic is logged and degrades to an empty tree.
pub fn build_structure(rendered: &str) -> StructureTree {
	match catch_unwind(AssertUnwindSafe(|| build_structure_inner(rendered))) {
		Ok(tree) => {
			let json = serde_json::to_string(&tree).unwrap_or_default();
			tracing::debug!(structure = %json, "reconstructed template structure");
			tree
		}
		Err(_) => {
			tracing::error!("structure reconstruction failed, returning empty tree");
			StructureTree::default()
		}
	}
}

fn build_structure_inner(rendered: &str) -> StructureTree {
	let mut tree = StructureTree::default();
	// Index path from the roots to the currently open node.
	let mut open_path: Vec<usize> = Vec::new();

	for caps in MARKER.captures_iter(rendered) {
		let kind = &caps[1];
		let payload = caps.get(2).map_or("", |m| m.as_str()).trim();

		match kind {
			"EXTENDS" => tree.edges.push(parse_extends_payload(payload)),
			"START INCLUDE" => {
				push_node(
					&mut tree,
					&mut open_path,
					StructureNode::new(NodeKind::Include, payload, None),
				);
			}
			"START MODULE FETCH" => {
				push_node(
					&mut tree,
					&mut open_path,
					StructureNode::new(NodeKind::ModuleFetch, payload, None),
				);
			}
			"START BLOCK" => {
				let (name, template) = parse_named_payload(payload);
				push_node(
					&mut tree,
					&mut open_path,
					StructureNode::new(NodeKind::Block, name, template),
				);
			}
			"START HOOK" => {
				let (name, template) = parse_named_payload(payload);
				push_node(
					&mut tree,
					&mut open_path,
					StructureNode::new(NodeKind::Hook, name, template),
				);
			}
			"START WIDGET" => {
				let (name, template) = parse_named_payload(payload);
				push_node(
					&mut tree,
					&mut open_path,
					StructureNode::new(NodeKind::Widget, name, template),
				);
			}
			"START EVAL" => {
				let (name, template) = parse_named_payload(payload);
				push_node(
					&mut tree,
					&mut open_path,
					StructureNode::new(NodeKind::Eval, name, template),
				);
			}
			_ => {
				// Every remaining kind is an END marker. A pop with nothing
				// open is an orphaned close and is ignored.
				open_path.pop();
			}
		}
	}

	tree
}

/// Append a node as a child of the innermost open node (or as a new root)
/// and make it the innermost open node.
fn push_node(tree: &mut StructureTree, open_path: &mut Vec<usize>, node: StructureNode) {
	if open_path.is_empty() {
		tree.roots.push(node);
		open_path.push(tree.roots.len() - 1);
		return;
	}

	let mut parent = &mut tree.roots[open_path[0]];
	for &index in &open_path[1..] {
		parent = &mut parent.children[index];
	}
	parent.children.push(node);
	let child_index = parent.children.len() - 1;
	open_path.push(child_index);
}

/// Split a `name (in: template)` payload. Payloads without the owning
/// template parenthetical (runtime generated markers) keep the whole
/// payload as the name.
fn parse_named_payload(payload: &str) -> (String, Option<String>) {
	match NAMED_PAYLOAD.captures(payload) {
		Some(caps) => (caps[1].trim().to_string(), Some(caps[2].trim().to_string())),
		None => (payload.to_string(), None),
	}
}

/// Split a `parent (from: child)` payload. The legacy format carried only
/// the parent name, in which case the child is unknown.
fn parse_extends_payload(payload: &str) -> InheritanceEdge {
	match EXTENDS_PAYLOAD.captures(payload) {
		Some(caps) => InheritanceEdge {
			parent: caps[1].trim().to_string(),
			child: caps[2].trim().to_string(),
		},
		None => InheritanceEdge {
			parent: payload.to_string(),
			child: "(unknown)".to_string(),
		},
	}
}

/// Rebuild the inheritance chain from edges collected during one render.
pub fn inheritance_chain(edges: &[InheritanceEdge]) -> Vec<String> {
	let Some(first) = edges.first() else {
		return Vec::new();
	};

	let child_to_parent: HashMap<&str, &str> = edges
		.iter()
		.map(|edge| (edge.child.as_str(), edge.parent.as_str()))
		.collect();
	let parents: HashSet<&str> = edges.iter().map(|edge| edge.parent.as_str()).collect();

	// The rendering root is a child that is not anyone's parent. When every
	// child is also a parent (cyclic input), fall back to the first edge.
	let start = edges
		.iter()
		.map(|edge| edge.child.as_str())
		.find(|child| !parents.contains(child))
		.unwrap_or(first.child.as_str());

	let mut chain = vec![start.to_string()];
	let mut visited: HashSet<&str> = HashSet::from([start]);
	let mut current = start;

	while let Some(&parent) = child_to_parent.get(current) {
		if !visited.insert(parent) {
			break;
		}
		chain.push(parent.to_string());
		current = parent;
	}

	chain
}
