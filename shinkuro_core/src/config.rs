use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::ShinkuroError;
use crate::ShinkuroResult;
use crate::scanner::ScanOptions;
use crate::substitution::SubstitutionStyle;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"shinkuro.toml",
	".shinkuro.toml",
	".config/shinkuro.toml",
];

/// Cache root used when none is configured, relative to the home directory.
pub const DEFAULT_CACHE_DIR: &str = ".shinkuro/remote";

/// Resolved runtime configuration.
///
/// Built once at startup from defaults, an optional config file, and the
/// command line, then passed by reference to everything that needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
	/// Local template folder, or a subfolder of the remote working copy when
	/// `remote_url` is set.
	pub folder: Option<PathBuf>,
	/// Git URL of a remote template collection.
	pub remote_url: Option<String>,
	/// Root under which remote working copies are kept.
	pub cache_dir: PathBuf,
	/// Pull an existing working copy before scanning.
	pub auto_refresh: bool,
	pub substitution_style: SubstitutionStyle,
	/// Treat whole files as template bodies.
	pub skip_metadata: bool,
	/// Declare referenced names as required arguments.
	pub auto_discover_args: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			folder: None,
			remote_url: None,
			cache_dir: default_cache_dir(),
			auto_refresh: false,
			substitution_style: SubstitutionStyle::default(),
			skip_metadata: false,
			auto_discover_args: false,
		}
	}
}

impl Config {
	/// Overlay every value that `layer` sets. A leading `~` in paths is
	/// expanded to the home directory.
	pub fn apply(&mut self, layer: ConfigLayer) {
		if let Some(folder) = layer.folder {
			self.folder = Some(expand_home(&folder));
		}
		if let Some(git_url) = layer.git_url {
			self.remote_url = Some(git_url);
		}
		if let Some(cache_dir) = layer.cache_dir {
			self.cache_dir = expand_home(&cache_dir);
		}
		if let Some(auto_pull) = layer.auto_pull {
			self.auto_refresh = auto_pull;
		}
		if let Some(variable_format) = layer.variable_format {
			self.substitution_style = variable_format;
		}
		if let Some(skip_frontmatter) = layer.skip_frontmatter {
			self.skip_metadata = skip_frontmatter;
		}
		if let Some(auto_discover_args) = layer.auto_discover_args {
			self.auto_discover_args = auto_discover_args;
		}
	}

	/// Defaults, then the config file found in `root` (if any), then
	/// `overrides`.
	pub fn load(root: &Path, overrides: ConfigLayer) -> ShinkuroResult<Self> {
		let mut config = Self::default();
		if let Some(file) = ConfigLayer::load(root)? {
			config.apply(file);
		}
		config.apply(overrides);

		Ok(config)
	}

	pub fn scan_options(&self) -> ScanOptions {
		ScanOptions {
			style: self.substitution_style,
			skip_metadata: self.skip_metadata,
			auto_discover_args: self.auto_discover_args,
		}
	}
}

/// One source of configuration values. Unset fields leave the value below
/// untouched.
///
/// As a `shinkuro.toml` file:
///
/// ```toml
/// folder = "prompts"
/// git_url = "https://github.com/acme/prompts.git"
/// cache_dir = "~/.cache/shinkuro"
/// auto_pull = true
/// variable_format = "dollar"
/// auto_discover_args = false
/// skip_frontmatter = false
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
	pub folder: Option<PathBuf>,
	pub git_url: Option<String>,
	pub cache_dir: Option<PathBuf>,
	pub auto_pull: Option<bool>,
	pub variable_format: Option<SubstitutionStyle>,
	pub auto_discover_args: Option<bool>,
	pub skip_frontmatter: Option<bool>,
}

impl ConfigLayer {
	/// Resolve the first config file that exists in `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the first discovered config file in `root`. Returns `None` when
	/// there is no config file.
	pub fn load(root: &Path) -> ShinkuroResult<Option<Self>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let layer: Self = toml::from_str(&content)
			.map_err(|e| ShinkuroError::ConfigParse(format!("{}: {e}", config_path.display())))?;
		tracing::debug!(path = %config_path.display(), "loaded config file");

		Ok(Some(layer))
	}
}

/// `~/.shinkuro/remote`, or a relative `.shinkuro/remote` when the home
/// directory is unknown.
pub fn default_cache_dir() -> PathBuf {
	dirs::home_dir().map_or_else(
		|| PathBuf::from(DEFAULT_CACHE_DIR),
		|home| home.join(DEFAULT_CACHE_DIR),
	)
}

/// Replace a leading `~` component with the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
	let mut components = path.components();
	match components.next() {
		Some(Component::Normal(first)) if first == "~" => {
			match dirs::home_dir() {
				Some(home) => home.join(components.as_path()),
				None => path.to_path_buf(),
			}
		}
		_ => path.to_path_buf(),
	}
}
