use std::path::Path;

use serde_yaml_ng::Mapping;
use serde_yaml_ng::Value;

use crate::ShinkuroError;
use crate::ShinkuroResult;
use crate::identifier::is_safe_identifier;
use crate::template::Argument;

/// The line that opens and closes a metadata header.
pub const HEADER_DELIMITER: &str = "---";

/// A template file split into its optional header and its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frontmatter<'a> {
	/// Raw YAML between the delimiter lines, if the file has a header.
	pub header: Option<&'a str>,
	/// Everything after the closing delimiter line, or the whole file when
	/// there is no header.
	pub body: &'a str,
}

/// Split a leading `---` delimited header from `text`.
///
/// The first line must be the delimiter and a later line must close it.
/// Without a closing line the file is treated as having no header at all.
pub fn split_frontmatter(text: &str) -> Frontmatter<'_> {
	let no_header = Frontmatter {
		header: None,
		body: text,
	};
	let mut lines = text.split_inclusive('\n');

	let Some(first) = lines.next() else {
		return no_header;
	};
	if first.trim_end() != HEADER_DELIMITER {
		return no_header;
	}

	let header_start = first.len();
	let mut offset = header_start;
	for line in lines {
		if line.trim_end() == HEADER_DELIMITER {
			return Frontmatter {
				header: Some(&text[header_start..offset]),
				body: &text[offset + line.len()..],
			};
		}
		offset += line.len();
	}

	no_header
}

/// Parse the raw header as a YAML mapping. An empty header is an empty
/// mapping; anything else that is not a mapping is malformed.
pub fn parse_header(header: &str, file: &Path) -> ShinkuroResult<Mapping> {
	if header.trim().is_empty() {
		return Ok(Mapping::new());
	}

	let value: Value = serde_yaml_ng::from_str(header).map_err(|error| {
		ShinkuroError::MalformedMetadata {
			file: file.display().to_string(),
			reason: error.to_string(),
		}
	})?;

	match value {
		Value::Mapping(mapping) => Ok(mapping),
		Value::Null => Ok(Mapping::new()),
		other => {
			Err(ShinkuroError::MalformedMetadata {
				file: file.display().to_string(),
				reason: format!("expected a mapping, found {}", value_kind(&other)),
			})
		}
	}
}

/// The recognised header fields after type coercion. Fields that are absent
/// or unusable are `None` so the caller can apply its own fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
	pub name: Option<String>,
	pub title: Option<String>,
	pub description: Option<String>,
	/// Declared arguments that survived validation, in header order. Names
	/// are unique; later duplicates are dropped.
	pub arguments: Vec<Argument>,
}

impl Metadata {
	/// Read the recognised keys from `header`. Unrecognised keys are ignored.
	///
	/// Problems with individual fields are logged and recovered from: a
	/// non-string scalar is converted, a non-list `arguments` is treated as
	/// empty, and an argument without a safe or unique name is dropped.
	pub fn from_header(header: &Mapping, file: &Path) -> Self {
		Self {
			name: coerce_text(header.get("name"), "name", file),
			title: coerce_text(header.get("title"), "title", file),
			description: coerce_text(header.get("description"), "description", file),
			arguments: read_arguments(header.get("arguments"), file),
		}
	}
}

fn read_arguments(value: Option<&Value>, file: &Path) -> Vec<Argument> {
	let entries = match value {
		None | Some(Value::Null) => return Vec::new(),
		Some(Value::Sequence(entries)) => entries,
		Some(other) => {
			tracing::warn!(
				file = %file.display(),
				found = value_kind(other),
				"`arguments` is not a list, ignoring it"
			);
			return Vec::new();
		}
	};

	let mut arguments: Vec<Argument> = Vec::with_capacity(entries.len());
	for argument in entries.iter().filter_map(|entry| read_argument(entry, file)) {
		if arguments.iter().any(|existing| existing.name == argument.name) {
			tracing::warn!(
				file = %file.display(),
				argument = %argument.name,
				"duplicate argument name, keeping the first declaration"
			);
			continue;
		}
		arguments.push(argument);
	}

	arguments
}

fn read_argument(entry: &Value, file: &Path) -> Option<Argument> {
	let Value::Mapping(fields) = entry else {
		tracing::warn!(
			file = %file.display(),
			found = value_kind(entry),
			"argument entry is not a mapping, skipping it"
		);
		return None;
	};

	let name = coerce_text(fields.get("name"), "arguments.name", file).unwrap_or_default();
	if name.is_empty() {
		tracing::warn!(file = %file.display(), "argument has no name, skipping it");
		return None;
	}
	if !is_safe_identifier(&name) {
		tracing::warn!(file = %file.display(), argument = %name, "unsafe argument name, skipping it");
		return None;
	}

	Some(Argument {
		description: coerce_text(fields.get("description"), "arguments.description", file)
			.unwrap_or_default(),
		default: coerce_text(fields.get("default"), "arguments.default", file),
		name,
	})
}

/// Read a header value as text. Numbers and booleans are converted with a
/// warning; sequences, mappings and tagged values are unusable.
fn coerce_text(value: Option<&Value>, field: &str, file: &Path) -> Option<String> {
	let text = match value? {
		Value::Null => return None,
		Value::String(text) => return Some(text.clone()),
		Value::Bool(flag) => flag.to_string(),
		Value::Number(number) => number.to_string(),
		other => {
			tracing::warn!(
				file = %file.display(),
				field,
				found = value_kind(other),
				"field is not a string, using the default"
			);
			return None;
		}
	};

	tracing::warn!(file = %file.display(), field, "field is not a string, converting it");
	Some(text)
}

fn value_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Sequence(_) => "a list",
		Value::Mapping(_) => "a mapping",
		Value::Tagged(_) => "a tagged value",
	}
}
