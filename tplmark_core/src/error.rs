use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum TplmarkError {
	#[error(transparent)]
	#[diagnostic(code(tplmark::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(tplmark::config_parse),
		help("check that tplmark.toml is valid TOML with [toggles] and/or [paths] sections")
	)]
	ConfigParse(String),

	#[error("failed to read template `{path}`: {reason}")]
	#[diagnostic(code(tplmark::template_read))]
	TemplateRead { path: String, reason: String },
}

pub type TplmarkResult<T> = Result<T, TplmarkError>;
