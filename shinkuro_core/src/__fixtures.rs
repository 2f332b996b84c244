use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use crate::ShinkuroError;
use crate::ShinkuroResult;
use crate::remote::VersionControlGateway;
use crate::source::TemplateSource;
use crate::source::is_template_file;

/// In-memory template tree. Directories exist implicitly above every file.
#[derive(Debug, Default)]
pub struct MemorySource {
	files: BTreeMap<PathBuf, Result<String, io::ErrorKind>>,
}

impl MemorySource {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_file(mut self, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
		self.files.insert(path.into(), Ok(text.into()));
		self
	}

	/// A file that fails to read with `kind`.
	pub fn with_broken_file(mut self, path: impl Into<PathBuf>, kind: io::ErrorKind) -> Self {
		self.files.insert(path.into(), Err(kind));
		self
	}
}

impl TemplateSource for MemorySource {
	fn is_dir(&self, path: &Path) -> bool {
		self.files
			.keys()
			.any(|file| file != path && file.starts_with(path))
	}

	fn template_files(&self, root: &Path) -> Vec<PathBuf> {
		self.files
			.keys()
			.filter(|file| file.starts_with(root) && is_template_file(file))
			.cloned()
			.collect()
	}

	fn read_text(&self, path: &Path) -> io::Result<String> {
		match self.files.get(path) {
			Some(Ok(text)) => Ok(text.clone()),
			Some(Err(kind)) => Err(io::Error::new(*kind, "simulated read failure")),
			None => Err(io::Error::from(io::ErrorKind::NotFound)),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
	Clone { url: String, destination: PathBuf },
	Pull { repository: PathBuf },
}

/// Gateway that records its calls. Clones create the destination directory
/// so later filesystem checks see a working copy.
#[derive(Debug, Default)]
pub struct RecordingGateway {
	calls: RefCell<Vec<GatewayCall>>,
	failure: Option<String>,
}

impl RecordingGateway {
	pub fn new() -> Self {
		Self::default()
	}

	/// A gateway whose every call fails with `reason`.
	pub fn failing(reason: &str) -> Self {
		Self {
			calls: RefCell::default(),
			failure: Some(reason.to_string()),
		}
	}

	pub fn calls(&self) -> Vec<GatewayCall> {
		self.calls.borrow().clone()
	}

	fn outcome(&self) -> ShinkuroResult<()> {
		match &self.failure {
			Some(reason) => Err(ShinkuroError::Io(io::Error::other(reason.clone()))),
			None => Ok(()),
		}
	}
}

impl VersionControlGateway for RecordingGateway {
	fn clone_shallow(&self, url: &str, destination: &Path) -> ShinkuroResult<()> {
		self.calls.borrow_mut().push(GatewayCall::Clone {
			url: url.to_string(),
			destination: destination.to_path_buf(),
		});
		self.outcome()?;
		std::fs::create_dir_all(destination)?;

		Ok(())
	}

	fn pull(&self, repository: &Path) -> ShinkuroResult<()> {
		self.calls.borrow_mut().push(GatewayCall::Pull {
			repository: repository.to_path_buf(),
		});
		self.outcome()
	}
}

/// A markdown file with a YAML header.
pub fn with_header(header: &str, body: &str) -> String {
	format!("---\n{header}\n---\n{body}")
}

/// The greeting template used across the scanner tests.
pub fn greet_template() -> String {
	with_header(
		"name: greet\ntitle: Greeting\ndescription: Say hello\narguments:\n  - name: user\n    description: Who to greet\n  - name: greeting\n    default: Hello",
		"{greeting}, {user}!",
	)
}

pub fn values(pairs: &[(&str, &str)]) -> std::collections::HashMap<String, String> {
	pairs
		.iter()
		.map(|(name, value)| ((*name).to_string(), (*value).to_string()))
		.collect()
}

pub fn names(items: &[&str]) -> Vec<String> {
	items.iter().map(|item| (*item).to_string()).collect()
}

pub fn write_file(root: &Path, relative: &str, contents: impl AsRef<[u8]>) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create dir: {e}"));
	}
	std::fs::write(&path, contents).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
}
