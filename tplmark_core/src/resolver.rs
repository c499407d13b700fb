use std::path::Path;
use std::path::PathBuf;

use crate::EngineContext;
use crate::ThemeLayout;

/// Resolves raw template references to on-disk paths, honouring theme and
/// parent-theme overrides.
///
/// Resolution is best-effort: every candidate directory is tried in
/// priority order with a blocking existence check, and when nothing
/// matches the raw reference is returned unchanged. Resolution never
/// fails.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
	theme: ThemeLayout,
	search_dirs: Vec<PathBuf>,
}

impl PathResolver {
	pub fn new(theme: ThemeLayout, search_dirs: Vec<PathBuf>) -> Self {
		Self { theme, search_dirs }
	}

	/// Build a resolver from the directories the host engine exposes.
	pub fn from_engine(engine: &EngineContext) -> Self {
		Self::new(engine.theme.clone(), engine.template_dirs.clone())
	}

	/// Resolve a raw tag reference to a display path.
	///
	/// `module:name/template` references go through the module override
	/// lookup. `modules/name/...` paths are located inside the module
	/// tree. Everything else is tried against the theme override
	/// directory, the engine search directories, and finally the parent
	/// theme's `templates/` directory.
	pub fn resolve(&self, raw_ref: &str) -> String {
		if let Some(module_ref) = raw_ref.strip_prefix("module:") {
			return self.resolve_module_ref(raw_ref, module_ref);
		}

		// Theme (then parent theme) overrides of module templates.
		let candidate = self.theme.theme_dir.join("modules").join(raw_ref);
		if candidate.exists() {
			return path_to_string(&candidate);
		}

		if let Some(parent) = &self.theme.parent_theme_dir {
			let candidate = parent.join("modules").join(raw_ref);
			if candidate.exists() {
				return path_to_string(&candidate);
			}
		}

		// References already phrased as modules/<name>/... locate the
		// template inside the module tree directly.
		if let Some(path) = self.resolve_in_module_dirs(raw_ref) {
			return path;
		}

		for dir in &self.search_dirs {
			let candidate = dir.join(raw_ref);
			if candidate.exists() {
				return path_to_string(&candidate);
			}
		}

		if let Some(parent) = &self.theme.parent_theme_dir {
			let candidate = parent.join("templates").join(raw_ref);
			if candidate.exists() {
				return path_to_string(&candidate);
			}
		}

		tracing::debug!(reference = raw_ref, "no candidate path exists on disk");
		raw_ref.to_string()
	}

	/// Resolve a `module:name/template` reference: theme override, parent
	/// theme override, the module's `views/templates/` directory, then the
	/// module root.
	fn resolve_module_ref(&self, raw_ref: &str, module_ref: &str) -> String {
		let Some((module, template)) = module_ref.split_once('/') else {
			return raw_ref.to_string();
		};

		let candidate = self.theme.theme_dir.join("modules").join(module).join(template);
		if candidate.exists() {
			return path_to_string(&candidate);
		}

		if let Some(parent) = &self.theme.parent_theme_dir {
			let candidate = parent.join("modules").join(module).join(template);
			if candidate.exists() {
				return path_to_string(&candidate);
			}
		}

		let module_dir = self.theme.modules_dir.join(module);
		for candidate in [
			module_dir.join("views").join("templates").join(template),
			module_dir.join(template),
		] {
			if candidate.exists() {
				return path_to_string(&candidate);
			}
		}

		raw_ref.to_string()
	}

	/// Locate a `modules/<name>/...` reference inside the module tree.
	fn resolve_in_module_dirs(&self, raw_ref: &str) -> Option<String> {
		let rest = raw_ref.strip_prefix("modules/")?;
		let (module, template) = rest.split_once('/')?;

		let module_dir = self.theme.modules_dir.join(module);
		[
			module_dir.join(template),
			module_dir.join("views").join("templates").join(template),
		]
		.iter()
		.find(|candidate| candidate.exists())
		.map(|candidate| path_to_string(candidate))
	}
}

fn path_to_string(path: &Path) -> String {
	path.to_string_lossy().into_owned()
}
