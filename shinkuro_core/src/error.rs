use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ShinkuroError {
	#[error(transparent)]
	#[diagnostic(code(shinkuro::io_error))]
	Io(#[from] std::io::Error),

	#[error("unsafe identifier: `{0}`")]
	#[diagnostic(
		code(shinkuro::invalid_identifier),
		help(
			"identifiers must match `[A-Za-z_][A-Za-z0-9_]*`, must not be reserved, and must not \
			 be wrapped in double underscores"
		)
	)]
	InvalidIdentifier(String),

	#[error("path traversal rejected for `{path}`: {reason}")]
	#[diagnostic(code(shinkuro::path_traversal))]
	PathTraversal { path: String, reason: String },

	#[error("malformed metadata header in {file}: {reason}")]
	#[diagnostic(
		code(shinkuro::malformed_metadata),
		help("the header between the leading `---` lines must be a YAML mapping")
	)]
	MalformedMetadata { file: String, reason: String },

	#[error("invalid template syntax: {0}")]
	#[diagnostic(
		code(shinkuro::template_syntax),
		help("escape literal delimiters by doubling them (`{{{{`, `}}}}`, `$$`)")
	)]
	TemplateSyntax(String),

	#[error(
		"parameters referenced in {file} ({}) do not match declared arguments ({})",
		format_names(.referenced),
		format_names(.declared)
	)]
	#[diagnostic(
		code(shinkuro::parameter_mismatch),
		help("declare exactly the parameters the template body references under `arguments`")
	)]
	ParameterMismatch {
		file: String,
		declared: Vec<String>,
		referenced: Vec<String>,
	},

	#[error("missing required arguments for `{template}`: {}", .missing.join(", "))]
	#[diagnostic(
		code(shinkuro::missing_arguments),
		help("supply a value for every argument that has no default")
	)]
	MissingArguments {
		template: String,
		missing: Vec<String>,
	},

	#[error("no value supplied for template parameter `{0}`")]
	#[diagnostic(code(shinkuro::missing_value))]
	MissingValue(String),

	#[error("no template named `{0}`")]
	#[diagnostic(
		code(shinkuro::unknown_template),
		help("run `shinkuro list` to see the loaded templates")
	)]
	UnknownTemplate(String),

	#[error("remote source `{url}` failed: {reason}")]
	#[diagnostic(code(shinkuro::remote_source))]
	RemoteSource { url: String, reason: String },

	#[error("no template folder configured")]
	#[diagnostic(
		code(shinkuro::missing_folder),
		help("set `--folder` (FOLDER) or `--git-url` (GIT_URL)")
	)]
	MissingFolder,

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(shinkuro::config_parse),
		help("check that shinkuro.toml is valid TOML")
	)]
	ConfigParse(String),
}

fn format_names(names: &[String]) -> String {
	if names.is_empty() {
		"none".to_string()
	} else {
		names.join(", ")
	}
}

pub type ShinkuroResult<T> = Result<T, ShinkuroError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
