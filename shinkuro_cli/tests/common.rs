use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;
use shinkuro_core::AnyEmptyResult;

const CONFIG_ENV_VARS: [&str; 8] = [
	"FOLDER",
	"GIT_URL",
	"CACHE_DIR",
	"AUTO_PULL",
	"VARIABLE_FORMAT",
	"AUTO_DISCOVER_ARGS",
	"SKIP_FRONTMATTER",
	"RUST_LOG",
];

pub const GREET_TEMPLATE: &str = "---
name: greet
title: Greeting
description: Say hello
arguments:
  - name: user
    description: Who to greet
  - name: greeting
    default: Hello
---
{greeting}, {user}!
";

pub fn shinkuro_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("shinkuro"));
	cmd.env("NO_COLOR", "1");
	for name in CONFIG_ENV_VARS {
		cmd.env_remove(name);
	}
	cmd
}

pub fn write_template(root: &Path, relative: &str, contents: &str) -> AnyEmptyResult {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, contents)?;

	Ok(())
}
