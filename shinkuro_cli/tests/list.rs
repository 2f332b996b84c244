mod common;

use shinkuro_core::AnyEmptyResult;

#[test]
fn list_shows_templates() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_template(tmp.path(), "prompts/greet.md", common::GREET_TEMPLATE)?;
	common::write_template(tmp.path(), "prompts/plain.md", "Just text\n")?;

	common::shinkuro_cmd()
		.current_dir(tmp.path())
		.arg("--folder")
		.arg("prompts")
		.arg("list")
		.assert()
		.success()
		.stdout(
			"greet: Greeting\n  Say hello\n  - user (required): Who to greet\n  - greeting \
			 (default: Hello)\n\nplain: plain\n  Prompt from plain.md\n",
		);

	Ok(())
}

#[test]
fn list_as_json() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_template(tmp.path(), "prompts/greet.md", common::GREET_TEMPLATE)?;

	let output = common::shinkuro_cmd()
		.current_dir(tmp.path())
		.args(["--folder", "prompts", "list", "--format", "json"])
		.output()?;
	assert!(output.status.success());

	let templates: serde_json::Value = serde_json::from_slice(&output.stdout)?;
	let templates = templates.as_array().ok_or("expected a JSON array")?;
	assert_eq!(templates.len(), 1);
	assert_eq!(templates[0]["name"], "greet");
	assert_eq!(templates[0]["title"], "Greeting");
	assert_eq!(templates[0]["arguments"][0]["name"], "user");
	assert_eq!(templates[0]["arguments"][0]["required"], true);
	assert_eq!(templates[0]["arguments"][1]["default"], "Hello");
	assert_eq!(templates[0]["arguments"][1]["required"], false);

	Ok(())
}

#[test]
fn list_reads_folder_from_environment() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_template(tmp.path(), "from-env/greet.md", common::GREET_TEMPLATE)?;

	common::shinkuro_cmd()
		.current_dir(tmp.path())
		.env("FOLDER", "from-env")
		.arg("list")
		.assert()
		.success()
		.stdout(predicates::str::contains("greet: Greeting"));

	Ok(())
}

#[test]
fn list_reads_folder_from_config_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_template(tmp.path(), "configured/greet.md", common::GREET_TEMPLATE)?;
	common::write_template(tmp.path(), ".config/shinkuro.toml", "folder = \"configured\"\n")?;

	common::shinkuro_cmd()
		.current_dir(tmp.path())
		.arg("list")
		.assert()
		.success()
		.stdout(predicates::str::contains("greet: Greeting"));

	Ok(())
}

#[test]
fn command_line_overrides_config_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_template(tmp.path(), "configured/greet.md", common::GREET_TEMPLATE)?;
	common::write_template(tmp.path(), "flagged/other.md", "other\n")?;
	common::write_template(tmp.path(), "shinkuro.toml", "folder = \"configured\"\n")?;

	common::shinkuro_cmd()
		.current_dir(tmp.path())
		.args(["--folder", "flagged", "list"])
		.assert()
		.success()
		.stdout("other: other\n  Prompt from other.md\n");

	Ok(())
}

#[test]
fn list_skips_invalid_templates() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_template(tmp.path(), "prompts/good.md", "fine\n")?;
	common::write_template(tmp.path(), "prompts/bad.md", "Hello {unclosed\n")?;

	common::shinkuro_cmd()
		.current_dir(tmp.path())
		.args(["--folder", "prompts", "list"])
		.assert()
		.success()
		.stdout("good: good\n  Prompt from good.md\n")
		.stderr(predicates::str::contains("skipping template"))
		.stderr(predicates::str::contains("bad.md"));

	Ok(())
}

#[test]
fn list_empty_folder() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join("prompts"))?;

	common::shinkuro_cmd()
		.current_dir(tmp.path())
		.args(["--folder", "prompts", "list"])
		.assert()
		.success()
		.stdout("No templates found.\n");

	Ok(())
}

#[test]
fn list_requires_a_folder() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::shinkuro_cmd()
		.current_dir(tmp.path())
		.arg("list")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("no template folder configured"));

	Ok(())
}

#[test]
fn invalid_config_file_is_reported() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_template(tmp.path(), "shinkuro.toml", "variable_format = \"jinja\"\n")?;

	common::shinkuro_cmd()
		.current_dir(tmp.path())
		.arg("list")
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to parse config file"));

	Ok(())
}
