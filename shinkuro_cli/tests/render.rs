mod common;

use rstest::rstest;
use shinkuro_core::AnyEmptyResult;

#[rstest]
#[case::required_only(&["--arg", "user=Ann"], "Hello, Ann!\n")]
#[case::override_default(&["--arg", "greeting=Hi", "-a", "user=Bob"], "Hi, Bob!\n")]
#[case::value_with_equals(&["--arg", "user=a=b"], "Hello, a=b!\n")]
#[case::extra_argument_ignored(&["--arg", "user=Ann", "--arg", "unused=x"], "Hello, Ann!\n")]
#[case::no_reexpansion(&["--arg", "user={greeting}"], "Hello, {greeting}!\n")]
fn render_greeting(#[case] extra: &[&str], #[case] expected: &'static str) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_template(tmp.path(), "prompts/greet.md", common::GREET_TEMPLATE)?;

	common::shinkuro_cmd()
		.current_dir(tmp.path())
		.args(["--folder", "prompts", "render", "greet"])
		.args(extra)
		.assert()
		.success()
		.stdout(expected);

	Ok(())
}

#[test]
fn render_reports_missing_arguments() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_template(tmp.path(), "prompts/greet.md", common::GREET_TEMPLATE)?;

	common::shinkuro_cmd()
		.current_dir(tmp.path())
		.args(["--folder", "prompts", "render", "greet"])
		.assert()
		.code(2)
		.stderr(predicates::str::contains(
			"missing required arguments for `greet`: user",
		));

	Ok(())
}

#[test]
fn render_unknown_template() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_template(tmp.path(), "prompts/greet.md", common::GREET_TEMPLATE)?;

	common::shinkuro_cmd()
		.current_dir(tmp.path())
		.args(["--folder", "prompts", "render", "nope"])
		.assert()
		.code(2)
		.stderr(predicates::str::contains("no template named `nope`"));

	Ok(())
}

#[test]
fn render_rejects_malformed_argument() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_template(tmp.path(), "prompts/greet.md", common::GREET_TEMPLATE)?;

	common::shinkuro_cmd()
		.current_dir(tmp.path())
		.args(["--folder", "prompts", "render", "greet", "--arg", "user"])
		.assert()
		.failure()
		.stderr(predicates::str::contains("expected KEY=VALUE"));

	Ok(())
}

#[rstest]
#[case::flag(&["--variable-format", "dollar"], None)]
#[case::environment(&[], Some("shell"))]
fn render_dollar_style(
	#[case] flags: &[&str],
	#[case] environment: Option<&str>,
) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_template(
		tmp.path(),
		"prompts/price.md",
		"---\narguments:\n  - name: user\n  - name: amount\n---\n${user} owes $$$amount\n",
	)?;

	let mut cmd = common::shinkuro_cmd();
	cmd.current_dir(tmp.path()).args(flags);
	if let Some(value) = environment {
		cmd.env("VARIABLE_FORMAT", value);
	}

	cmd.args(["--folder", "prompts", "render", "price"])
		.args(["--arg", "user=Ann", "--arg", "amount=5"])
		.assert()
		.success()
		.stdout("Ann owes $5\n");

	Ok(())
}

#[test]
fn render_skip_frontmatter() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_template(tmp.path(), "prompts/raw.md", "---\nname: custom\n---\nraw body\n")?;

	common::shinkuro_cmd()
		.current_dir(tmp.path())
		.args(["--folder", "prompts", "--skip-frontmatter", "render", "raw"])
		.assert()
		.success()
		.stdout("---\nname: custom\n---\nraw body\n");

	Ok(())
}

#[test]
fn render_auto_discovered_arguments() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_template(tmp.path(), "prompts/pair.md", "{a}-{b}\n")?;

	common::shinkuro_cmd()
		.current_dir(tmp.path())
		.env("AUTO_DISCOVER_ARGS", "true")
		.args(["--folder", "prompts", "render", "pair", "--arg", "b=2", "--arg", "a=1"])
		.assert()
		.success()
		.stdout("1-2\n");

	common::shinkuro_cmd()
		.current_dir(tmp.path())
		.args(["--folder", "prompts", "--auto-discover-args", "render", "pair", "--arg", "a=1"])
		.assert()
		.code(2)
		.stderr(predicates::str::contains("missing required arguments for `pair`: b"));

	Ok(())
}
