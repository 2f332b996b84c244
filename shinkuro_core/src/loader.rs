use std::path::PathBuf;

use crate::ShinkuroError;
use crate::ShinkuroResult;
use crate::config::Config;
use crate::host::TemplateHost;
use crate::path_guard::validate_contained;
use crate::remote::VersionControlGateway;
use crate::remote::ensure_local;
use crate::remote::resolve_cache_path;
use crate::remote::strip_auth_from_url;
use crate::scanner::scan;

/// Work out which directory to scan.
///
/// With a remote URL the working copy is cloned or refreshed first, and a
/// configured folder is taken relative to the working copy. It must not
/// resolve outside of it. Without a remote URL the folder is used as is.
pub fn resolve_folder(
	config: &Config,
	gateway: &dyn VersionControlGateway,
) -> ShinkuroResult<PathBuf> {
	let Some(url) = config.remote_url.as_deref() else {
		return config.folder.clone().ok_or(ShinkuroError::MissingFolder);
	};

	let local_path = resolve_cache_path(url, &config.cache_dir)?;
	ensure_local(url, &local_path, config.auto_refresh, gateway)?;

	match &config.folder {
		Some(subfolder) => {
			let folder = local_path.join(subfolder);
			validate_contained(&folder, &local_path)?;
			Ok(folder)
		}
		None => Ok(local_path),
	}
}

/// Resolve the folder, scan it, and register every accepted template with
/// `host`. Returns the number of templates registered.
pub fn load_templates(
	config: &Config,
	gateway: &dyn VersionControlGateway,
	host: &mut dyn TemplateHost,
) -> ShinkuroResult<usize> {
	let folder = resolve_folder(config, gateway)?;

	let mut count = 0;
	for record in scan(&folder, config.scan_options()) {
		host.register(record);
		count += 1;
	}

	tracing::info!(
		folder = %folder.display(),
		remote = ?config.remote_url.as_deref().map(strip_auth_from_url),
		count,
		"loaded templates"
	);

	Ok(count)
}
