use std::collections::BTreeSet;
use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::ShinkuroError;
use crate::ShinkuroResult;
use crate::substitution::ParsedTemplate;
use crate::substitution::SubstitutionStyle;

/// A declared template parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
	pub name: String,
	pub description: String,
	/// Value used when the caller does not supply one. Without a default the
	/// argument is required.
	pub default: Option<String>,
}

impl Argument {
	/// A required argument with an empty description.
	pub fn required(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			description: String::new(),
			default: None,
		}
	}

	pub fn is_required(&self) -> bool {
		self.default.is_none()
	}
}

/// The fields of a template before its body has been checked against the
/// declared arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDraft {
	pub source: PathBuf,
	pub name: String,
	pub title: String,
	pub description: String,
	pub arguments: Vec<Argument>,
	pub body: String,
}

impl TemplateDraft {
	/// Parse the body and require its references to match the declared
	/// arguments exactly.
	pub fn reconcile(self, style: SubstitutionStyle) -> ShinkuroResult<TemplateRecord> {
		let parsed = style.strategy().parse(&self.body)?;
		let referenced = parsed.parameters();
		let declared: BTreeSet<String> = self
			.arguments
			.iter()
			.map(|argument| argument.name.clone())
			.collect();

		if declared != referenced {
			return Err(ShinkuroError::ParameterMismatch {
				file: self.source.display().to_string(),
				declared: declared.into_iter().collect(),
				referenced: referenced.into_iter().collect(),
			});
		}

		Ok(self.into_record(style, parsed))
	}

	/// Parse the body and declare every referenced name as a required
	/// argument, sorted by name. Drafts that already declare arguments are
	/// rejected.
	pub fn discover(mut self, style: SubstitutionStyle) -> ShinkuroResult<TemplateRecord> {
		let parsed = style.strategy().parse(&self.body)?;

		if !self.arguments.is_empty() {
			return Err(ShinkuroError::ParameterMismatch {
				file: self.source.display().to_string(),
				declared: self
					.arguments
					.iter()
					.map(|argument| argument.name.clone())
					.collect(),
				referenced: parsed.parameters().into_iter().collect(),
			});
		}

		self.arguments = parsed
			.parameters()
			.into_iter()
			.map(Argument::required)
			.collect();

		Ok(self.into_record(style, parsed))
	}

	fn into_record(self, style: SubstitutionStyle, parsed: ParsedTemplate) -> TemplateRecord {
		TemplateRecord {
			source: self.source,
			name: self.name,
			title: self.title,
			description: self.description,
			arguments: self.arguments,
			body: self.body,
			style,
			parsed,
		}
	}
}

/// A validated template ready to be rendered.
///
/// The set of names referenced by the body always equals the set of declared
/// argument names. Records are only built through [`TemplateDraft`] and are
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateRecord {
	source: PathBuf,
	name: String,
	title: String,
	description: String,
	arguments: Vec<Argument>,
	body: String,
	style: SubstitutionStyle,
	#[serde(skip)]
	parsed: ParsedTemplate,
}

impl TemplateRecord {
	/// The file this template was read from.
	pub fn source(&self) -> &Path {
		&self.source
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn description(&self) -> &str {
		&self.description
	}

	pub fn arguments(&self) -> &[Argument] {
		&self.arguments
	}

	/// The unrendered body.
	pub fn body(&self) -> &str {
		&self.body
	}

	pub fn style(&self) -> SubstitutionStyle {
		self.style
	}

	/// Names of the arguments without a default.
	pub fn required_arguments(&self) -> BTreeSet<&str> {
		self.arguments
			.iter()
			.filter(|argument| argument.is_required())
			.map(|argument| argument.name.as_str())
			.collect()
	}

	/// Render the body with `supplied` values layered over the declared
	/// defaults.
	///
	/// Fails with [`ShinkuroError::MissingArguments`] naming every required
	/// argument absent from `supplied`. Supplied keys that are not declared
	/// arguments are ignored.
	#[allow(clippy::implicit_hasher)]
	pub fn render(&self, supplied: &HashMap<String, String>) -> ShinkuroResult<String> {
		let missing: Vec<String> = self
			.required_arguments()
			.into_iter()
			.filter(|name| !supplied.contains_key(*name))
			.map(str::to_string)
			.collect();

		if !missing.is_empty() {
			return Err(ShinkuroError::MissingArguments {
				template: self.name.clone(),
				missing,
			});
		}

		let mut values: HashMap<String, String> = self
			.arguments
			.iter()
			.filter_map(|argument| {
				argument
					.default
					.as_ref()
					.map(|default| (argument.name.clone(), default.clone()))
			})
			.collect();
		values.extend(
			supplied
				.iter()
				.map(|(name, value)| (name.clone(), value.clone())),
		);

		self.parsed.substitute(&values)
	}
}
