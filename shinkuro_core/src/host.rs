use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::ShinkuroError;
use crate::ShinkuroResult;
use crate::template::TemplateRecord;

/// Receives the templates accepted by a scan.
///
/// This is the seam to whatever serves templates to clients: each record
/// carries its name, title, description, argument declarations, and a
/// [`TemplateRecord::render`] entrypoint.
pub trait TemplateHost {
	fn register(&mut self, record: TemplateRecord);
}

/// In-memory [`TemplateHost`] keyed by template name.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
	templates: BTreeMap<String, TemplateRecord>,
}

impl TemplateHost for TemplateCatalog {
	fn register(&mut self, record: TemplateRecord) {
		let source = record.source().to_path_buf();
		if let Some(previous) = self.templates.insert(record.name().to_string(), record) {
			tracing::warn!(
				name = previous.name(),
				replaced = %previous.source().display(),
				by = %source.display(),
				"duplicate template name, keeping the later file"
			);
		}
	}
}

impl TemplateCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn len(&self) -> usize {
		self.templates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.templates.is_empty()
	}

	pub fn get(&self, name: &str) -> Option<&TemplateRecord> {
		self.templates.get(name)
	}

	/// Templates ordered by name.
	pub fn iter(&self) -> impl Iterator<Item = &TemplateRecord> {
		self.templates.values()
	}

	/// Render the template called `name`.
	#[allow(clippy::implicit_hasher)]
	pub fn render(&self, name: &str, supplied: &HashMap<String, String>) -> ShinkuroResult<String> {
		self.get(name)
			.ok_or_else(|| ShinkuroError::UnknownTemplate(name.to_string()))?
			.render(supplied)
	}
}
