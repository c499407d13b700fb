use assert_cmd::Command;
use predicates::prelude::*;

fn tplmark() -> Command {
	Command::cargo_bin("tplmark").expect("binary builds")
}

#[test]
fn annotate_wraps_block_tags() {
	let dir = tempfile::tempdir().expect("tempdir");
	let file = dir.path().join("page.tpl");
	std::fs::write(&file, "{block name='header'}<h1>Hi</h1>{/block}").expect("write template");

	tplmark()
		.arg("annotate")
		.arg(&file)
		.assert()
		.success()
		.stdout(predicate::str::contains("<!-- START BLOCK: header"))
		.stdout(predicate::str::contains("<!-- END BLOCK: header"));
}

#[test]
fn annotate_respects_template_override() {
	let dir = tempfile::tempdir().expect("tempdir");
	let file = dir.path().join("page.tpl");
	std::fs::write(&file, "{hook h='displayTop'}").expect("write template");

	tplmark()
		.arg("annotate")
		.arg(&file)
		.args(["--template", "theme/page.tpl"])
		.assert()
		.success()
		.stdout(predicate::str::contains(
			"<!-- START HOOK: displayTop (in: theme/page.tpl) -->",
		));
}

#[test]
fn annotate_writes_output_file() {
	let dir = tempfile::tempdir().expect("tempdir");
	let file = dir.path().join("page.tpl");
	let out = dir.path().join("page.annotated.tpl");
	std::fs::write(&file, "{include file='nav.tpl'}").expect("write template");

	tplmark()
		.arg("annotate")
		.arg(&file)
		.arg("--output")
		.arg(&out)
		.assert()
		.success();

	let annotated = std::fs::read_to_string(&out).expect("output written");
	assert!(annotated.contains("<!-- START INCLUDE: nav.tpl -->"));
}

#[test]
fn annotate_is_a_passthrough_when_disabled() {
	let dir = tempfile::tempdir().expect("tempdir");
	std::fs::write(dir.path().join("tplmark.toml"), "enabled = false\n").expect("write config");
	let file = dir.path().join("page.tpl");
	std::fs::write(&file, "{hook h='displayTop'}").expect("write template");

	tplmark()
		.arg("annotate")
		.arg(&file)
		.arg("--path")
		.arg(dir.path())
		.assert()
		.success()
		.stdout(predicate::eq("{hook h='displayTop'}"));
}

#[test]
fn annotate_missing_file_fails() {
	tplmark()
		.args(["annotate", "does-not-exist.tpl"])
		.assert()
		.failure();
}
