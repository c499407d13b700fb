use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::EngineContext;
use crate::TplmarkResult;
use crate::scan;

/// A module template fetched through the override-aware loader, with its
/// source already wrapped in `MODULE FETCH` markers.
#[derive(Debug, Clone)]
pub struct FetchedTemplate {
	/// The path the template was loaded from.
	pub path: PathBuf,
	/// The template source, wrapped in start and end markers.
	pub source: String,
	/// Modification time of the file, when the filesystem reports one.
	pub modified: Option<SystemTime>,
}

/// Loads module templates the way the host engine's `module:` resource
/// does, trying each registered directory in priority order and wrapping
/// the winning file's content in `MODULE FETCH` markers so the fetch shows
/// up in the reconstructed structure tree.
#[derive(Debug, Clone, Default)]
pub struct ModuleResourceLoader {
	paths: Vec<PathBuf>,
}

impl ModuleResourceLoader {
	pub fn new(paths: Vec<PathBuf>) -> Self {
		Self { paths }
	}

	/// Priority order from the engine context: theme overrides, parent
	/// theme overrides, then the module tree itself.
	pub fn from_engine(engine: &EngineContext) -> Self {
		let mut paths = vec![engine.theme.theme_dir.join("modules")];
		if let Some(parent) = &engine.theme.parent_theme_dir {
			paths.push(parent.join("modules"));
		}
		paths.push(engine.theme.modules_dir.clone());

		Self { paths }
	}

	/// Fetch a module template by relative name. The first existing file
	/// wins; `None` means no registered directory holds the template.
	pub fn fetch(&self, name: &str) -> TplmarkResult<Option<FetchedTemplate>> {
		for dir in &self.paths {
			let path = dir.join(name);
			if !path.exists() {
				continue;
			}

			let content = fs::read_to_string(&path)?;
			let safe_path = scan::sanitize_for_marker(&path.to_string_lossy());
			let source = format!(
				"<!-- START MODULE FETCH: {safe_path} -->{content}<!-- END MODULE FETCH: {safe_path} -->"
			);
			let modified = fs::metadata(&path).and_then(|meta| meta.modified()).ok();

			return Ok(Some(FetchedTemplate {
				path,
				source,
				modified,
			}));
		}

		Ok(None)
	}
}
