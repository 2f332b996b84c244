use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap::builder::BoolishValueParser;
use shinkuro_core::ConfigLayer;
use shinkuro_core::SubstitutionStyle;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Load markdown prompt templates from a folder or git repository and render them.",
	long_about = "shinkuro loads prompt templates from markdown files with an optional YAML \
	              header, checks that every declared argument is used by the template body, \
	              and renders them with safe, literal substitution.\n\nTemplates come from a \
	              local folder (--folder) or a git repository (--git-url) that is cloned into a \
	              local cache.\n\nQuick start:\n  shinkuro --folder prompts list\n  shinkuro \
	              --folder prompts render greet --arg user=Ann"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct ShinkuroCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Folder containing the template files. With --git-url this is a
	/// subfolder of the repository.
	#[arg(long, global = true, env = "FOLDER")]
	pub folder: Option<PathBuf>,

	/// Git repository to load templates from.
	#[arg(long, global = true, env = "GIT_URL")]
	pub git_url: Option<String>,

	/// Directory where git repositories are cached.
	/// [default: ~/.shinkuro/remote]
	#[arg(long, global = true, env = "CACHE_DIR")]
	pub cache_dir: Option<PathBuf>,

	/// Pull the cached repository before loading templates.
	#[arg(
		long,
		global = true,
		env = "AUTO_PULL",
		num_args = 0..=1,
		require_equals = true,
		default_missing_value = "true",
		value_parser = BoolishValueParser::new()
	)]
	pub auto_pull: Option<bool>,

	/// Reference syntax used in template bodies: `brace` for {name} or
	/// `dollar` for $name and ${name}. [default: brace]
	#[arg(long, global = true, env = "VARIABLE_FORMAT")]
	pub variable_format: Option<SubstitutionStyle>,

	/// Declare every referenced name as a required argument instead of
	/// reading arguments from the header.
	#[arg(
		long,
		global = true,
		env = "AUTO_DISCOVER_ARGS",
		num_args = 0..=1,
		require_equals = true,
		default_missing_value = "true",
		value_parser = BoolishValueParser::new()
	)]
	pub auto_discover_args: Option<bool>,

	/// Treat whole files as template bodies and ignore any YAML header.
	#[arg(
		long,
		global = true,
		env = "SKIP_FRONTMATTER",
		num_args = 0..=1,
		require_equals = true,
		default_missing_value = "true",
		value_parser = BoolishValueParser::new()
	)]
	pub skip_frontmatter: Option<bool>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

impl ShinkuroCli {
	/// The configuration values set on the command line or through the
	/// environment.
	pub fn config_layer(&self) -> ConfigLayer {
		ConfigLayer {
			folder: self.folder.clone(),
			git_url: self.git_url.clone(),
			cache_dir: self.cache_dir.clone(),
			auto_pull: self.auto_pull,
			variable_format: self.variable_format,
			auto_discover_args: self.auto_discover_args,
			skip_frontmatter: self.skip_frontmatter,
		}
	}
}

#[derive(Subcommand)]
pub enum Commands {
	/// List every template that loaded successfully.
	///
	/// Files that fail validation are skipped with a warning on stderr.
	List {
		/// Output format. Use `text` for human-readable output or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Print a template's metadata and its unrendered body.
	Show {
		/// Template name.
		name: String,
	},
	/// Render a template and print the result.
	///
	/// Every argument without a default must be supplied with `--arg`.
	Render {
		/// Template name.
		name: String,

		/// Argument value as `KEY=VALUE`. Repeat for each argument.
		#[arg(long = "arg", short, value_name = "KEY=VALUE", value_parser = parse_key_value)]
		args: Vec<(String, String)>,
	},
	/// Clone or refresh the remote repository and print the template folder.
	Sync,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}

/// Parse a `KEY=VALUE` pair. The value may itself contain `=`.
pub fn parse_key_value(input: &str) -> Result<(String, String), String> {
	match input.split_once('=') {
		Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
		_ => Err(format!("expected KEY=VALUE, got `{input}`")),
	}
}
