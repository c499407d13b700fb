use std::fs;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use miette::Report;
use owo_colors::OwoColorize;
use serde::Serialize;
use tplmark_cli::Commands;
use tplmark_cli::TplmarkCli;
use tplmark_cli::TreeFormat;
use tplmark_core::EngineContext;
use tplmark_core::NodeKind;
use tplmark_core::PathResolver;
use tplmark_core::RenderTrace;
use tplmark_core::StructureNode;
use tplmark_core::StructureTree;
use tplmark_core::TplmarkConfig;
use tplmark_core::TplmarkError;
use tplmark_core::build_structure;
use tplmark_core::extract::Annotator;

fn main() -> miette::Result<()> {
	let cli = TplmarkCli::parse();

	if cli.verbose {
		tracing_subscriber::fmt()
			.with_env_filter(
				tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
					tracing_subscriber::EnvFilter::new("tplmark=debug,tplmark_core=debug")
				}),
			)
			.with_writer(std::io::stderr)
			.init();
	}

	let root = cli.path.clone().unwrap_or_else(|| PathBuf::from("."));
	let config = TplmarkConfig::load(&root)
		.map_err(Report::new)?
		.unwrap_or_default();
	let color = !cli.no_color && supports_color::on(supports_color::Stream::Stdout).is_some();

	match cli.command {
		Commands::Annotate {
			file,
			template,
			output,
		} => run_annotate(&root, &config, &file, template, output),
		Commands::Tree { file, format } => run_tree(file.as_deref(), format, color),
		Commands::Resolve { reference } => {
			let engine = engine_for(&root, &config, String::new());
			let resolver = PathResolver::from_engine(&engine);
			println!("{}", resolver.resolve(&reference));
			Ok(())
		}
	}
}

/// Build the engine context the host would supply for one render.
fn engine_for(root: &Path, config: &TplmarkConfig, current_template: String) -> EngineContext {
	let mut engine = EngineContext::new(current_template);
	engine.theme = config.theme_layout(root);
	engine.template_dirs = config.template_dirs(root);
	engine
}

fn run_annotate(
	root: &Path,
	config: &TplmarkConfig,
	file: &Path,
	template: Option<String>,
	output: Option<PathBuf>,
) -> miette::Result<()> {
	let source = fs::read_to_string(file)
		.map_err(|error| TplmarkError::TemplateRead {
			path: file.display().to_string(),
			reason: error.to_string(),
		})
		.map_err(Report::new)?;

	// With annotations off the host engine compiles the template untouched.
	let annotated = if config.annotations_enabled() {
		let engine = engine_for(root, config, template.unwrap_or_else(|| file.display().to_string()));
		let resolver = PathResolver::from_engine(&engine);
		let mut trace = RenderTrace::new();
		Annotator::new().annotate(&source, &engine, &resolver, &mut trace)
	} else {
		source
	};

	match output {
		Some(path) => {
			fs::write(&path, annotated)
				.map_err(TplmarkError::from)
				.map_err(Report::new)?;
		}
		None => print!("{annotated}"),
	}

	Ok(())
}

/// JSON shape of the `tree --format json` output.
#[derive(Serialize)]
struct TreeReport<'a> {
	roots: &'a [StructureNode],
	inheritance_chain: Vec<String>,
}

fn run_tree(file: Option<&Path>, format: TreeFormat, color: bool) -> miette::Result<()> {
	let rendered = match file {
		Some(path) => fs::read_to_string(path)
			.map_err(TplmarkError::from)
			.map_err(Report::new)?,
		None => {
			let mut buffer = String::new();
			std::io::stdin()
				.read_to_string(&mut buffer)
				.map_err(TplmarkError::from)
				.map_err(Report::new)?;
			buffer
		}
	};

	let tree = build_structure(&rendered);

	match format {
		TreeFormat::Text => print!("{}", render_text_tree(&tree, color)),
		TreeFormat::Json => {
			let report = TreeReport {
				roots: &tree.roots,
				inheritance_chain: tree.inheritance_chain(),
			};
			let json = serde_json::to_string_pretty(&report)
				.map_err(|error| Report::msg(error.to_string()))?;
			println!("{json}");
		}
	}

	Ok(())
}

fn render_text_tree(tree: &StructureTree, color: bool) -> String {
	let mut out = String::new();

	let chain = tree.inheritance_chain();
	if !chain.is_empty() {
		out.push_str("Inheritance chain:\n");
		for (depth, template) in chain.iter().enumerate() {
			out.push_str(&"  ".repeat(depth));
			if depth == 0 {
				out.push_str(template);
			} else {
				out.push_str(&format!("\u{21b3} {template}"));
			}
			out.push('\n');
		}
		out.push('\n');
	}

	for root in &tree.roots {
		render_node(&mut out, root, 0, color);
	}

	out
}

fn render_node(out: &mut String, node: &StructureNode, depth: usize, color: bool) {
	out.push_str(&"  ".repeat(depth));

	let glyph = match node.kind {
		NodeKind::Block => "\u{1f4e6}",
		NodeKind::Include => "\u{1f4c4}",
		NodeKind::ModuleFetch => "\u{1f4cc}",
		NodeKind::Hook => "\u{1f9f7}",
		NodeKind::Widget => "\u{2699}",
		NodeKind::Eval => "\u{1f4ca}",
		_ => "\u{2753}",
	};
	let name = if color {
		node.name.bold().to_string()
	} else {
		node.name.clone()
	};
	out.push_str(&format!("{glyph} {} {name}", node.kind));
	if let Some(template) = &node.template {
		out.push_str(&format!(" (in: {template})"));
	}
	out.push('\n');

	for child in &node.children {
		render_node(out, child, depth + 1, color);
	}
}
