//! `tplmark_core` is the core library for the tplmark template debugging
//! toolkit. It annotates Smarty-style template source with machine-readable
//! HTML comment markers identifying inclusion, inheritance, block, hook,
//! widget, and dynamic-eval constructs, then reconstructs those markers
//! from rendered output into a navigable structure tree.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Template source
//!   → Annotator (simple, complex, paired, dynamic extractors in order)
//!   → Annotated source (compiled and rendered by the host engine)
//!   → Rendered output
//!   → Tree builder (markers → structure forest + inheritance chain)
//! ```
//!
//! ## Modules
//!
//! - [`extract`] — The tag extractors and the [`Annotator`] that runs them.
//! - [`scan`] — Balanced delimiter matching, comment stripping, and marker
//!   payload sanitization shared by every extractor.
//! - [`config`] — Configuration loading from `tplmark.toml`: feature
//!   toggles and the theme/module directory layout.
//!
//! ## Key Types
//!
//! - [`Annotator`](extract::Annotator) — Ordered extractor registry and
//!   the annotation entry point.
//! - [`EngineContext`] — What the host template engine exposes to one
//!   annotation pass.
//! - [`PathResolver`] — Override-aware resolution of tag references to
//!   display paths.
//! - [`RenderTrace`] — Per-render accumulator for inheritance edges.
//! - [`StructureTree`] — The reconstructed forest plus inheritance chain.
//!
//! ## Quick Start
//!
//! ```rust
//! use tplmark_core::EngineContext;
//! use tplmark_core::PathResolver;
//! use tplmark_core::RenderTrace;
//! use tplmark_core::build_structure;
//! use tplmark_core::extract::Annotator;
//!
//! let engine = EngineContext::new("product.tpl");
//! let resolver = PathResolver::from_engine(&engine);
//! let mut trace = RenderTrace::new();
//!
//! let annotator = Annotator::new();
//! let annotated = annotator.annotate(
//! 	"{block name='header'}Hello{/block}",
//! 	&engine,
//! 	&resolver,
//! 	&mut trace,
//! );
//!
//! // ... the host engine renders `annotated` ...
//!
//! let mut tree = build_structure(&annotated);
//! tree.adopt_trace(&mut trace);
//! assert_eq!(tree.roots.len(), 1);
//! ```

pub use config::*;
pub use engine::*;
pub use error::*;
pub use resolver::*;
pub use resource::*;
pub use trace::*;
pub use tree::*;

pub mod config;
mod engine;
mod error;
pub mod extract;
mod resolver;
mod resource;
pub mod scan;
mod trace;
mod tree;
