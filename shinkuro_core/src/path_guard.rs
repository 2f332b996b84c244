use std::io;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::ShinkuroError;
use crate::ShinkuroResult;

/// Reject a single path segment that could be used to escape the directory
/// it is joined onto.
///
/// A segment is rejected when it is empty, is `.` or `..`, contains a path
/// separator (`/` or `\`), or contains a null byte. The check is purely
/// lexical and does not depend on any base directory.
pub fn validate_path_component(segment: &str) -> ShinkuroResult<()> {
	let reason = if segment.is_empty() {
		Some("path component cannot be empty")
	} else if segment == "." || segment == ".." {
		Some("path component cannot be `.` or `..`")
	} else if segment.contains(['/', '\\']) {
		Some("path component cannot contain separators")
	} else if segment.contains('\0') {
		Some("path component cannot contain null bytes")
	} else {
		None
	};

	match reason {
		Some(reason) => {
			Err(ShinkuroError::PathTraversal {
				path: segment.escape_debug().to_string(),
				reason: reason.to_string(),
			})
		}
		None => Ok(()),
	}
}

/// Resolve `path` to an absolute path with every existing symbolic link
/// followed.
///
/// Unlike [`Path::canonicalize`] the path does not need to exist: components
/// are resolved one at a time, so the longest existing prefix is resolved
/// against the real filesystem and the remainder is applied lexically. A
/// dangling link is replaced by its target in the same way.
pub fn resolve_real_path(path: &Path) -> ShinkuroResult<PathBuf> {
	let absolute = if path.is_absolute() {
		path.to_path_buf()
	} else {
		std::env::current_dir()?.join(path)
	};

	let mut resolved = PathBuf::new();
	for component in absolute.components() {
		match component {
			Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
			Component::CurDir => {}
			Component::ParentDir => {
				resolved.pop();
			}
			Component::Normal(name) => {
				resolved.push(name);
				let Ok(metadata) = resolved.symlink_metadata() else {
					continue;
				};
				match resolved.canonicalize() {
					Ok(real) => resolved = real,
					// Dangling link: resolve its target as far as it exists.
					Err(error)
						if error.kind() == io::ErrorKind::NotFound && metadata.file_type().is_symlink() =>
					{
						let target = std::fs::read_link(&resolved)?;
						resolved.pop();
						resolved = resolve_real_path(&resolved.join(target))?;
					}
					Err(error) => return Err(error.into()),
				}
			}
		}
	}

	Ok(resolved)
}

/// Confirm that `path` is `base` or nested under it once both are resolved
/// through the real filesystem. Returns the resolved `path`.
///
/// Symbolic links are followed before comparing, so a link inside `base`
/// that points elsewhere is rejected.
pub fn validate_contained(path: &Path, base: &Path) -> ShinkuroResult<PathBuf> {
	let resolved_base = resolve_real_path(base)?;
	let resolved = resolve_real_path(path)?;

	if resolved.starts_with(&resolved_base) {
		Ok(resolved)
	} else {
		Err(ShinkuroError::PathTraversal {
			path: path.display().to_string(),
			reason: format!("resolves outside allowed base `{}`", base.display()),
		})
	}
}
