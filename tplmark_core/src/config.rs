use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::ThemeLayout;
use crate::TplmarkError;
use crate::TplmarkResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["tplmark.toml", ".tplmark.toml", ".config/tplmark.toml"];

/// Configuration loaded from a `tplmark.toml` file.
///
/// ```toml
/// enabled = true
///
/// [toggles]
/// comments = true
/// viewer = true
///
/// [paths]
/// theme_dir = "themes/classic"
/// parent_theme_dir = "themes/classic-parent"
/// modules_dir = "modules"
/// template_dirs = ["themes/classic/templates"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TplmarkConfig {
	/// Master switch. When false, annotation and tree building are both
	/// disabled regardless of the individual toggles.
	#[serde(default = "default_enabled")]
	pub enabled: bool,
	/// Per-feature toggles, persisted per browser by the host application.
	#[serde(default)]
	pub toggles: Toggles,
	/// Theme, module, and search directory layout.
	#[serde(default)]
	pub paths: PathsConfig,
}

impl Default for TplmarkConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			toggles: Toggles::default(),
			paths: PathsConfig::default(),
		}
	}
}

/// Feature toggles. The structure viewer consumes the inline comments, so
/// it cannot be on while comments are off.
#[derive(Debug, Clone, Deserialize)]
pub struct Toggles {
	/// Emit inline structural comments during annotation.
	#[serde(default = "default_enabled")]
	pub comments: bool,
	/// Reconstruct and display the structure tree after rendering.
	#[serde(default)]
	pub viewer: bool,
}

impl Default for Toggles {
	fn default() -> Self {
		Self {
			comments: true,
			viewer: false,
		}
	}
}

/// Directory layout section of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
	#[serde(default)]
	pub theme_dir: PathBuf,
	#[serde(default)]
	pub parent_theme_dir: Option<PathBuf>,
	#[serde(default)]
	pub modules_dir: PathBuf,
	#[serde(default)]
	pub template_dirs: Vec<PathBuf>,
}

fn default_enabled() -> bool {
	true
}

impl TplmarkConfig {
	/// Discover and load the config file from `root`, trying each
	/// candidate location in order. Returns `Ok(None)` when no config file
	/// exists; callers fall back to [`TplmarkConfig::default`].
	pub fn load(root: &Path) -> TplmarkResult<Option<Self>> {
		for candidate in CONFIG_FILE_CANDIDATES {
			let path = root.join(candidate);
			if !path.exists() {
				continue;
			}

			let content = fs::read_to_string(&path)?;
			let mut config: Self = toml::from_str(&content)
				.map_err(|error| TplmarkError::ConfigParse(error.to_string()))?;
			config.normalize_toggles();
			return Ok(Some(config));
		}

		Ok(None)
	}

	/// Enforce the toggle dependency rule: enabling the viewer enables
	/// comments, and the master switch turns both off.
	pub fn normalize_toggles(&mut self) {
		if self.toggles.viewer && !self.toggles.comments {
			self.toggles.comments = true;
		}
		if !self.enabled {
			self.toggles.comments = false;
			self.toggles.viewer = false;
		}
	}

	/// Whether the annotation pass should run.
	pub fn annotations_enabled(&self) -> bool {
		self.enabled && self.toggles.comments
	}

	/// Whether the structure tree consumer should run.
	pub fn viewer_enabled(&self) -> bool {
		self.enabled && self.toggles.viewer
	}

	/// The theme layout described by the `[paths]` section, with relative
	/// directories anchored at `root`.
	pub fn theme_layout(&self, root: &Path) -> ThemeLayout {
		ThemeLayout {
			theme_dir: root.join(&self.paths.theme_dir),
			parent_theme_dir: self
				.paths
				.parent_theme_dir
				.as_ref()
				.map(|dir| root.join(dir)),
			modules_dir: root.join(&self.paths.modules_dir),
		}
	}

	/// Template search directories anchored at `root`.
	pub fn template_dirs(&self, root: &Path) -> Vec<PathBuf> {
		self.paths
			.template_dirs
			.iter()
			.map(|dir| root.join(dir))
			.collect()
	}
}
