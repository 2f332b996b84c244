use std::io;
use std::path::Path;
use std::path::PathBuf;

use ignore::WalkBuilder;

use crate::path_guard::validate_contained;

/// File extension recognised as a template, compared case-insensitively.
pub const TEMPLATE_EXTENSION: &str = "md";

/// Read access to a tree of template files.
///
/// The scanner only ever talks to the filesystem through this trait so tests
/// can substitute an in-memory tree.
pub trait TemplateSource {
	/// Whether `path` exists and is a directory.
	fn is_dir(&self, path: &Path) -> bool;

	/// Every template file below `root`, recursively.
	fn template_files(&self, root: &Path) -> Vec<PathBuf>;

	/// The UTF-8 contents of `path`. Invalid UTF-8 is reported as
	/// [`io::ErrorKind::InvalidData`].
	fn read_text(&self, path: &Path) -> io::Result<String>;
}

/// Returns `true` when `path` carries the template extension.
pub fn is_template_file(path: &Path) -> bool {
	path.extension()
		.and_then(|extension| extension.to_str())
		.is_some_and(|extension| extension.eq_ignore_ascii_case(TEMPLATE_EXTENSION))
}

/// [`TemplateSource`] backed by the real filesystem.
///
/// Hidden files are included and ignore files are not consulted: every
/// template in the folder is a candidate. Symbolic links are followed only
/// while they resolve inside the root, and the `.git` directory of a cached
/// working copy is skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsTemplateSource;

impl TemplateSource for FsTemplateSource {
	fn is_dir(&self, path: &Path) -> bool {
		path.is_dir()
	}

	fn template_files(&self, root: &Path) -> Vec<PathBuf> {
		let walker = WalkBuilder::new(root)
			.standard_filters(false)
			.hidden(false)
			.follow_links(true)
			.filter_entry(|entry| entry.file_name() != ".git")
			.build();

		let mut files = Vec::new();
		for entry in walker {
			match entry {
				Ok(entry) => {
					let is_file = entry.file_type().is_some_and(|kind| kind.is_file());
					if !is_file || !is_template_file(entry.path()) {
						continue;
					}
					if let Err(error) = validate_contained(entry.path(), root) {
						tracing::warn!(
							file = %entry.path().display(),
							%error,
							"skipping template outside the folder"
						);
						continue;
					}
					files.push(entry.into_path());
				}
				Err(error) => {
					tracing::warn!(root = %root.display(), %error, "skipping unreadable entry");
				}
			}
		}

		files.sort();
		files
	}

	fn read_text(&self, path: &Path) -> io::Result<String> {
		let bytes = std::fs::read(path)?;
		String::from_utf8(bytes).map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))
	}
}
