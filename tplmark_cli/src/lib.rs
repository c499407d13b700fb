use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "See inside your Smarty templates: structural markers and a navigable structure tree.",
	long_about = "tplmark annotates Smarty-style template sources with machine-readable HTML \
	              comment markers identifying includes, inheritance, blocks, hooks, widgets, and \
	              dynamic-eval tags. After the host engine renders the annotated templates, the \
	              markers in the output can be rebuilt into a navigable structure \
	              tree.\n\nQuick start:\n  tplmark annotate page.tpl   Annotate one template\n  \
	              tplmark tree rendered.html  Rebuild the structure tree\n  tplmark resolve REF     \
	              Resolve a template reference"
)]
pub struct TplmarkCli {
	#[command(subcommand)]
	pub command: Commands,

	/// Path to the project root directory, used for config discovery and
	/// path resolution.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Annotate a template source file with structural markers.
	///
	/// Runs the full extractor chain (inheritance, hooks, widgets,
	/// includes, blocks, eval) over the file and prints the annotated
	/// source. Tags inside template or HTML comments are left untouched,
	/// and malformed tags pass through unchanged.
	Annotate {
		/// The template file to annotate.
		file: PathBuf,

		/// Owning template identifier recorded in the markers. Defaults to
		/// the file path.
		#[arg(long)]
		template: Option<String>,

		/// Write the annotated source to this file instead of stdout.
		#[arg(long, short)]
		output: Option<PathBuf>,
	},
	/// Rebuild the structure tree from rendered output.
	///
	/// Scans the given file (or stdin) for structural markers and prints
	/// the reconstructed forest together with the inheritance chain. Use
	/// `--format json` for programmatic consumption.
	Tree {
		/// Rendered output to scan. Reads stdin when omitted.
		file: Option<PathBuf>,

		/// Output format for the reconstructed tree.
		#[arg(long, value_enum, default_value_t = TreeFormat::Text)]
		format: TreeFormat,
	},
	/// Resolve a raw template reference against the configured theme and
	/// module directories.
	///
	/// Prints the first existing candidate path, or the reference itself
	/// when nothing matches on disk.
	Resolve {
		/// The reference to resolve, e.g. `module:foo/views/templates/x.tpl`.
		reference: String,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TreeFormat {
	/// Human-readable indented tree.
	Text,
	/// JSON output with the forest and the inheritance chain.
	Json,
}
