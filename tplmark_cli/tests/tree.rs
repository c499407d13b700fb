use assert_cmd::Command;
use predicates::prelude::*;

const RENDERED: &str = concat!(
	"<!-- EXTENDS: layouts/base.tpl (from: page.tpl) -->",
	"<html><body>",
	"<!-- START BLOCK: header (in: page.tpl) -->",
	"<!-- START HOOK: displayTop (in: page.tpl) --><!-- END HOOK: displayTop -->",
	"<!-- END BLOCK: header (in: page.tpl) -->",
	"</body></html>",
);

fn tplmark() -> Command {
	Command::cargo_bin("tplmark").expect("binary builds")
}

#[test]
fn tree_renders_nested_structure() {
	let dir = tempfile::tempdir().expect("tempdir");
	let file = dir.path().join("rendered.html");
	std::fs::write(&file, RENDERED).expect("write rendered output");

	tplmark()
		.arg("tree")
		.arg(&file)
		.arg("--no-color")
		.assert()
		.success()
		.stdout(predicate::str::contains("Inheritance chain:"))
		.stdout(predicate::str::contains("page.tpl"))
		.stdout(predicate::str::contains("block header (in: page.tpl)"))
		.stdout(predicate::str::contains("hook displayTop (in: page.tpl)"));
}

#[test]
fn tree_reads_stdin_when_no_file_given() {
	tplmark()
		.args(["tree", "--no-color"])
		.write_stdin(RENDERED)
		.assert()
		.success()
		.stdout(predicate::str::contains("block header"));
}

#[test]
fn tree_json_output_is_parseable() {
	let dir = tempfile::tempdir().expect("tempdir");
	let file = dir.path().join("rendered.html");
	std::fs::write(&file, RENDERED).expect("write rendered output");

	let output = tplmark()
		.arg("tree")
		.arg(&file)
		.args(["--format", "json"])
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let report: serde_json::Value = serde_json::from_slice(&output).expect("valid json");
	assert_eq!(report["roots"][0]["kind"], "block");
	assert_eq!(report["roots"][0]["name"], "header");
	assert_eq!(report["roots"][0]["children"][0]["name"], "displayTop");
	assert_eq!(report["inheritance_chain"][0], "page.tpl");
	assert_eq!(report["inheritance_chain"][1], "layouts/base.tpl");
}

#[test]
fn tree_of_plain_html_is_empty() {
	tplmark()
		.args(["tree", "--no-color"])
		.write_stdin("<html><body>nothing here</body></html>")
		.assert()
		.success()
		.stdout(predicate::eq(""));
}

#[test]
fn resolve_prints_raw_reference_when_unresolvable() {
	tplmark()
		.args(["resolve", "module:foo/views/templates/missing.tpl"])
		.assert()
		.success()
		.stdout(predicate::eq("module:foo/views/templates/missing.tpl\n"));
}
