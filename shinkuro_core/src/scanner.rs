use std::path::Path;
use std::path::PathBuf;

use crate::ShinkuroResult;
use crate::metadata::Metadata;
use crate::metadata::parse_header;
use crate::metadata::split_frontmatter;
use crate::source::FsTemplateSource;
use crate::source::TemplateSource;
use crate::substitution::SubstitutionStyle;
use crate::template::TemplateDraft;
use crate::template::TemplateRecord;

/// Options controlling how template files are interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
	/// Reference syntax used for every template body.
	pub style: SubstitutionStyle,
	/// Treat the whole file as the body and ignore any header.
	pub skip_metadata: bool,
	/// Declare every referenced name as a required argument instead of
	/// checking the body against declared arguments.
	pub auto_discover_args: bool,
}

/// Turns a folder of template files into [`TemplateRecord`]s.
#[derive(Clone, Copy)]
pub struct Scanner<'a> {
	source: &'a dyn TemplateSource,
	options: ScanOptions,
}

impl<'a> Scanner<'a> {
	pub fn new(source: &'a dyn TemplateSource, options: ScanOptions) -> Self {
		Self { source, options }
	}

	pub fn options(&self) -> ScanOptions {
		self.options
	}

	/// Lazily load every valid template below `root`.
	///
	/// A missing root, or a root that is a file, logs one warning and yields
	/// nothing. Files that fail to load are logged and skipped; nothing is
	/// cached between calls.
	pub fn scan(&self, root: &Path) -> Templates<'a> {
		let files = if self.source.is_dir(root) {
			self.source.template_files(root)
		} else {
			tracing::warn!(
				root = %root.display(),
				"template folder does not exist or is not a directory"
			);
			Vec::new()
		};

		Templates {
			scanner: *self,
			root: root.to_path_buf(),
			files: files.into_iter(),
		}
	}

	/// Load a single template file. `root` is only used to describe the file
	/// when the header has no description.
	pub fn load_file(&self, root: &Path, path: &Path) -> ShinkuroResult<TemplateRecord> {
		let text = self.source.read_text(path)?;
		let draft = self.draft(root, path, &text)?;

		if self.options.auto_discover_args {
			draft.discover(self.options.style)
		} else {
			draft.reconcile(self.options.style)
		}
	}

	fn draft(&self, root: &Path, path: &Path, text: &str) -> ShinkuroResult<TemplateDraft> {
		let stem = path
			.file_stem()
			.map(|stem| stem.to_string_lossy().into_owned())
			.unwrap_or_default();
		let relative = path.strip_prefix(root).unwrap_or(path);
		let fallback_description = format!("Prompt from {}", relative.display());

		let (metadata, body) = if self.options.skip_metadata {
			(Metadata::default(), text)
		} else {
			let frontmatter = split_frontmatter(text);
			let metadata = match frontmatter.header {
				Some(header) => Metadata::from_header(&parse_header(header, path)?, path),
				None => Metadata::default(),
			};
			(metadata, frontmatter.body)
		};

		Ok(TemplateDraft {
			source: path.to_path_buf(),
			name: metadata.name.unwrap_or_else(|| stem.clone()),
			title: metadata.title.unwrap_or(stem),
			description: metadata.description.unwrap_or(fallback_description),
			arguments: metadata.arguments,
			body: body.to_string(),
		})
	}
}

/// Scan `root` on the real filesystem.
pub fn scan(root: &Path, options: ScanOptions) -> Templates<'static> {
	Scanner::new(&FsTemplateSource, options).scan(root)
}

/// Iterator over the templates found by [`Scanner::scan`].
pub struct Templates<'a> {
	scanner: Scanner<'a>,
	root: PathBuf,
	files: std::vec::IntoIter<PathBuf>,
}

impl Iterator for Templates<'_> {
	type Item = TemplateRecord;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			let path = self.files.next()?;
			match self.scanner.load_file(&self.root, &path) {
				Ok(record) => {
					tracing::debug!(file = %path.display(), name = record.name(), "loaded template");
					return Some(record);
				}
				Err(error) => {
					tracing::warn!(file = %path.display(), %error, "skipping template");
				}
			}
		}
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(0, Some(self.files.len()))
	}
}
