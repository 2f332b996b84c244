use crate::ShinkuroError;
use crate::ShinkuroResult;

/// Names that may never be used as substitution keys, even though they are
/// syntactically valid identifiers. They name interpreter internals, dynamic
/// import, code execution, or object-model traversal hooks in common
/// template hosts.
pub const RESERVED_IDENTIFIERS: [&str; 13] = [
	"__import__",
	"eval",
	"exec",
	"compile",
	"__builtins__",
	"__globals__",
	"__locals__",
	"__dict__",
	"__class__",
	"__bases__",
	"__subclasses__",
	"__init__",
	"__new__",
];

/// Returns `true` when `name` matches `^[A-Za-z_][A-Za-z0-9_]*$`.
///
/// This is the purely syntactic half of [`is_safe_identifier`], used by the
/// substitution strategies to decide where a reference ends.
pub fn is_identifier_shaped(name: &str) -> bool {
	let mut chars = name.chars();
	let Some(first) = chars.next() else {
		return false;
	};

	(first.is_ascii_alphabetic() || first == '_')
		&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Returns `true` when `name` is safe to use as a substitution key.
///
/// A safe name is identifier shaped, is not listed in
/// [`RESERVED_IDENTIFIERS`], and is not wrapped in double underscores
/// (`__name__`).
pub fn is_safe_identifier(name: &str) -> bool {
	is_identifier_shaped(name) && !RESERVED_IDENTIFIERS.contains(&name) && !is_dunder(name)
}

/// Like [`is_safe_identifier`] but returns a [`ShinkuroError::InvalidIdentifier`]
/// for unsafe names.
pub fn validate_identifier(name: &str) -> ShinkuroResult<()> {
	if is_safe_identifier(name) {
		Ok(())
	} else {
		Err(ShinkuroError::InvalidIdentifier(name.to_string()))
	}
}

fn is_dunder(name: &str) -> bool {
	name.starts_with("__") && name.ends_with("__")
}
