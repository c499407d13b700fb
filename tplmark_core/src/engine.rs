use std::collections::HashMap;
use std::path::PathBuf;

use crate::scan;

/// Directory layout of the active theme and the module tree, used for
/// override-aware path resolution.
#[derive(Debug, Clone, Default)]
pub struct ThemeLayout {
	/// Root directory of the active theme.
	pub theme_dir: PathBuf,
	/// Root directory of the parent theme, when the active theme has one.
	pub parent_theme_dir: Option<PathBuf>,
	/// Root directory holding every installed module.
	pub modules_dir: PathBuf,
}

/// The interface the host template engine presents to one annotation pass:
/// the template currently being compiled, the variable bindings visible at
/// that point, and the configured template search directories.
#[derive(Debug, Clone, Default)]
pub struct EngineContext {
	/// Identifier of the template currently being compiled. Usually a file
	/// path, but inline sources may carry a synthetic identifier.
	pub current_template: String,
	/// Template variable bindings, used to resolve variable references in
	/// inheritance tags.
	pub vars: HashMap<String, String>,
	/// Template search directories, in priority order.
	pub template_dirs: Vec<PathBuf>,
	/// Theme and module directory layout.
	pub theme: ThemeLayout,
}

impl EngineContext {
	pub fn new(current_template: impl Into<String>) -> Self {
		Self {
			current_template: current_template.into(),
			..Self::default()
		}
	}

	/// Look up a template variable by name (without the leading sigil).
	pub fn template_var(&self, name: &str) -> Option<&str> {
		self.vars.get(name).map(String::as_str)
	}

	/// The current template identifier, safe for marker payloads.
	pub fn safe_template(&self) -> String {
		scan::sanitize_for_marker(&self.current_template)
	}
}
