use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use serde::Serialize;
use shinkuro_cli::Commands;
use shinkuro_cli::OutputFormat;
use shinkuro_cli::ShinkuroCli;
use shinkuro_core::Config;
use shinkuro_core::GitCli;
use shinkuro_core::ShinkuroError;
use shinkuro_core::TemplateCatalog;
use shinkuro_core::TemplateRecord;
use shinkuro_core::load_templates;
use shinkuro_core::resolve_folder;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
	let args = ShinkuroCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::List { format }) => run_list(&args, *format),
		Some(Commands::Show { name }) => run_show(&args, name),
		Some(Commands::Render { name, args: pairs }) => run_render(&args, name, pairs),
		Some(Commands::Sync) => run_sync(&args),
		None => {
			eprintln!("No subcommand specified. Run `shinkuro --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<ShinkuroError>() {
			Ok(shinkuro_err) => {
				let report: miette::Report = (*shinkuro_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Diagnostics go to stderr so stdout only carries command output.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

fn resolve_config(args: &ShinkuroCli) -> Result<Config, ShinkuroError> {
	let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
	let config = Config::load(&root, args.config_layer())?;
	tracing::debug!(
		folder = ?config.folder,
		cache_dir = %config.cache_dir.display(),
		style = %config.substitution_style,
		"resolved configuration"
	);

	Ok(config)
}

fn load_catalog(args: &ShinkuroCli) -> Result<TemplateCatalog, ShinkuroError> {
	let config = resolve_config(args)?;
	let mut catalog = TemplateCatalog::new();
	load_templates(&config, &GitCli::default(), &mut catalog)?;

	Ok(catalog)
}

#[derive(Serialize)]
struct TemplateSummary<'a> {
	name: &'a str,
	title: &'a str,
	description: &'a str,
	source: &'a Path,
	arguments: Vec<ArgumentSummary<'a>>,
}

#[derive(Serialize)]
struct ArgumentSummary<'a> {
	name: &'a str,
	description: &'a str,
	required: bool,
	default: Option<&'a str>,
}

impl<'a> From<&'a TemplateRecord> for TemplateSummary<'a> {
	fn from(record: &'a TemplateRecord) -> Self {
		Self {
			name: record.name(),
			title: record.title(),
			description: record.description(),
			source: record.source(),
			arguments: record
				.arguments()
				.iter()
				.map(|argument| {
					ArgumentSummary {
						name: &argument.name,
						description: &argument.description,
						required: argument.is_required(),
						default: argument.default.as_deref(),
					}
				})
				.collect(),
		}
	}
}

fn print_arguments(record: &TemplateRecord) {
	for argument in record.arguments() {
		let requirement = match &argument.default {
			Some(default) => format!("(default: {})", colored!(default, green)),
			None => colored!("(required)", yellow),
		};
		if argument.description.is_empty() {
			println!("  - {} {requirement}", argument.name);
		} else {
			println!("  - {} {requirement}: {}", argument.name, argument.description);
		}
	}
}

fn run_list(args: &ShinkuroCli, format: OutputFormat) -> CliResult {
	let catalog = load_catalog(args)?;

	match format {
		OutputFormat::Json => {
			let summaries: Vec<TemplateSummary<'_>> = catalog.iter().map(Into::into).collect();
			println!("{}", serde_json::to_string_pretty(&summaries)?);
		}
		OutputFormat::Text => {
			if catalog.is_empty() {
				println!("No templates found.");
				return Ok(());
			}

			for (index, record) in catalog.iter().enumerate() {
				if index > 0 {
					println!();
				}
				println!("{}: {}", colored!(record.name(), bold), record.title());
				println!("  {}", record.description());
				print_arguments(record);
			}
		}
	}

	Ok(())
}

fn run_show(args: &ShinkuroCli, name: &str) -> CliResult {
	let catalog = load_catalog(args)?;
	let record = catalog
		.get(name)
		.ok_or_else(|| ShinkuroError::UnknownTemplate(name.to_string()))?;

	println!("{}: {}", colored!(record.name(), bold), record.title());
	println!("  {}", record.description());
	println!("  source: {}", record.source().display());
	println!("  format: {}", record.style());
	print_arguments(record);
	println!();
	print!("{}", record.body());
	if !record.body().ends_with('\n') {
		println!();
	}

	Ok(())
}

fn run_render(args: &ShinkuroCli, name: &str, pairs: &[(String, String)]) -> CliResult {
	let catalog = load_catalog(args)?;
	let supplied: HashMap<String, String> = pairs.iter().cloned().collect();
	let rendered = catalog.render(name, &supplied)?;

	print!("{rendered}");
	if !rendered.ends_with('\n') {
		println!();
	}

	Ok(())
}

fn run_sync(args: &ShinkuroCli) -> CliResult {
	let config = resolve_config(args)?;
	let folder = resolve_folder(&config, &GitCli::default())?;
	println!("{}", folder.display());

	Ok(())
}
