use std::collections::BTreeSet;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::ShinkuroError;
use crate::ShinkuroResult;
use crate::identifier::is_identifier_shaped;
use crate::identifier::validate_identifier;

/// The reference syntax used inside template bodies.
///
/// ```toml
/// variable_format = "brace"  # {name}
/// variable_format = "dollar" # $name or ${name}
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubstitutionStyle {
	/// `{name}` references, with `{{` and `}}` as literal braces.
	#[default]
	Brace,
	/// `$name` and `${name}` references, with `$$` as a literal dollar sign.
	#[serde(alias = "shell")]
	Dollar,
}

impl SubstitutionStyle {
	/// The strategy implementing this style.
	pub fn strategy(self) -> &'static dyn SubstitutionStrategy {
		match self {
			Self::Brace => &BraceStrategy,
			Self::Dollar => &DollarStrategy,
		}
	}
}

impl fmt::Display for SubstitutionStyle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Brace => write!(f, "brace"),
			Self::Dollar => write!(f, "dollar"),
		}
	}
}

impl FromStr for SubstitutionStyle {
	type Err = String;

	fn from_str(value: &str) -> Result<Self, Self::Err> {
		match value.trim().to_ascii_lowercase().as_str() {
			"brace" => Ok(Self::Brace),
			"dollar" | "shell" => Ok(Self::Dollar),
			other => Err(format!("unknown variable format `{other}` (expected brace or dollar)")),
		}
	}
}

/// A piece of a parsed template body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
	/// Text copied to the output unchanged. Escaped delimiters are already
	/// unescaped here.
	Literal(String),
	/// A parameter reference replaced by its value at render time.
	Reference(String),
}

/// A template body split into literal text and parameter references.
///
/// Parsing happens once; rendering is then plain concatenation. Substituted
/// values are never parsed again, so a value that happens to contain
/// reference syntax is emitted verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTemplate {
	segments: Vec<Segment>,
}

impl ParsedTemplate {
	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	/// The distinct parameter names referenced by this template.
	pub fn parameters(&self) -> BTreeSet<String> {
		self.segments
			.iter()
			.filter_map(|segment| {
				match segment {
					Segment::Reference(name) => Some(name.clone()),
					Segment::Literal(_) => None,
				}
			})
			.collect()
	}

	/// Replace every reference with its value from `values`.
	///
	/// Keys in `values` that the template never references are ignored. A
	/// reference without a value fails with [`ShinkuroError::MissingValue`].
	#[allow(clippy::implicit_hasher)]
	pub fn substitute(&self, values: &HashMap<String, String>) -> ShinkuroResult<String> {
		let mut output = String::new();
		for segment in &self.segments {
			match segment {
				Segment::Literal(text) => output.push_str(text),
				Segment::Reference(name) => {
					let value = values
						.get(name)
						.ok_or_else(|| ShinkuroError::MissingValue(name.clone()))?;
					output.push_str(value);
				}
			}
		}

		Ok(output)
	}

	fn push_literal(&mut self, text: &str) {
		if text.is_empty() {
			return;
		}

		if let Some(Segment::Literal(previous)) = self.segments.last_mut() {
			previous.push_str(text);
		} else {
			self.segments.push(Segment::Literal(text.to_string()));
		}
	}

	fn push_reference(&mut self, name: &str) {
		self.segments.push(Segment::Reference(name.to_string()));
	}
}

/// Shared contract of the reference syntaxes.
///
/// Implementations only parse; they never evaluate anything beyond
/// replacing a reference with literal text.
pub trait SubstitutionStrategy: fmt::Debug + Send + Sync {
	fn style(&self) -> SubstitutionStyle;

	/// Split `text` into literals and references. Fails with
	/// [`ShinkuroError::TemplateSyntax`] for malformed delimiters or
	/// references that are not identifiers, and with
	/// [`ShinkuroError::InvalidIdentifier`] for reserved names.
	fn parse(&self, text: &str) -> ShinkuroResult<ParsedTemplate>;

	/// The set of parameter names referenced in `text`.
	fn extract_parameters(&self, text: &str) -> ShinkuroResult<BTreeSet<String>> {
		Ok(self.parse(text)?.parameters())
	}

	/// Parse `text` and substitute `values` into it.
	#[allow(clippy::implicit_hasher)]
	fn render(&self, text: &str, values: &HashMap<String, String>) -> ShinkuroResult<String> {
		self.parse(text)?.substitute(values)
	}
}

/// `{name}` references in the style of format strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BraceStrategy;

impl SubstitutionStrategy for BraceStrategy {
	fn style(&self) -> SubstitutionStyle {
		SubstitutionStyle::Brace
	}

	fn parse(&self, text: &str) -> ShinkuroResult<ParsedTemplate> {
		let bytes = text.as_bytes();
		let mut parsed = ParsedTemplate::default();
		let mut literal_start = 0;
		let mut index = 0;

		while index < bytes.len() {
			match bytes[index] {
				b'{' | b'}' if bytes.get(index + 1) == Some(&bytes[index]) => {
					// Keep the first delimiter of the pair, drop the second.
					parsed.push_literal(&text[literal_start..=index]);
					index += 2;
					literal_start = index;
				}
				b'{' => {
					parsed.push_literal(&text[literal_start..index]);
					let name_start = index + 1;
					let Some(name_len) = text[name_start..].find('}') else {
						return Err(ShinkuroError::TemplateSyntax(format!(
							"unclosed `{{` at byte {index}"
						)));
					};
					let name = &text[name_start..name_start + name_len];
					check_reference(name, &format!("{{{name}}}"))?;
					parsed.push_reference(name);
					index = name_start + name_len + 1;
					literal_start = index;
				}
				b'}' => {
					return Err(ShinkuroError::TemplateSyntax(format!(
						"single `}}` at byte {index}"
					)));
				}
				_ => index += 1,
			}
		}

		parsed.push_literal(&text[literal_start..]);
		Ok(parsed)
	}
}

/// `$name` and `${name}` references in the style of shell variables.
///
/// A `$` that does not start a reference is literal text.
#[derive(Debug, Clone, Copy, Default)]
pub struct DollarStrategy;

impl SubstitutionStrategy for DollarStrategy {
	fn style(&self) -> SubstitutionStyle {
		SubstitutionStyle::Dollar
	}

	fn parse(&self, text: &str) -> ShinkuroResult<ParsedTemplate> {
		let bytes = text.as_bytes();
		let mut parsed = ParsedTemplate::default();
		let mut literal_start = 0;
		let mut index = 0;

		while index < bytes.len() {
			if bytes[index] != b'$' {
				index += 1;
				continue;
			}

			match bytes.get(index + 1) {
				Some(b'$') => {
					parsed.push_literal(&text[literal_start..=index]);
					index += 2;
					literal_start = index;
				}
				Some(b'{') => {
					parsed.push_literal(&text[literal_start..index]);
					let name_start = index + 2;
					let Some(name_len) = text[name_start..].find('}') else {
						return Err(ShinkuroError::TemplateSyntax(format!(
							"unclosed `${{` at byte {index}"
						)));
					};
					let name = &text[name_start..name_start + name_len];
					check_reference(name, &format!("${{{name}}}"))?;
					parsed.push_reference(name);
					index = name_start + name_len + 1;
					literal_start = index;
				}
				Some(&next) if next.is_ascii_alphabetic() || next == b'_' => {
					parsed.push_literal(&text[literal_start..index]);
					let name_start = index + 1;
					let name_len = bytes[name_start..]
						.iter()
						.take_while(|byte| byte.is_ascii_alphanumeric() || **byte == b'_')
						.count();
					let name = &text[name_start..name_start + name_len];
					validate_identifier(name)?;
					parsed.push_reference(name);
					index = name_start + name_len;
					literal_start = index;
				}
				_ => index += 1,
			}
		}

		parsed.push_literal(&text[literal_start..]);
		Ok(parsed)
	}
}

fn check_reference(name: &str, reference: &str) -> ShinkuroResult<()> {
	if !is_identifier_shaped(name) {
		return Err(ShinkuroError::TemplateSyntax(format!(
			"`{reference}` is not a plain identifier reference"
		)));
	}

	validate_identifier(name)
}
