//! `shinkuro_core` loads prompt templates from markdown files and renders
//! them with caller-supplied values.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Config
//!   → Remote cache (optional: clone or pull a git working copy)
//!   → Scanner (walks the folder for *.md files)
//!   → Metadata (splits the `---` YAML header from the body)
//!   → Substitution strategy (parses `{name}` or `$name` references)
//!   → Reconciliation (declared arguments == referenced names)
//!   → TemplateRecord, registered with a TemplateHost
//! ```
//!
//! ## Template Files
//!
//! ```markdown
//! ---
//! name: greet
//! title: Greeting
//! description: Say hello
//! arguments:
//!   - name: user
//!     description: Who to greet
//!   - name: greeting
//!     default: Hello
//! ---
//! {greeting}, {user}!
//! ```
//!
//! Rendering is literal text replacement. Reference names must be plain
//! identifiers, and reserved names such as `eval` or `__class__` are
//! rejected wherever they appear.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use std::path::Path;
//!
//! use shinkuro_core::ScanOptions;
//! use shinkuro_core::scan;
//!
//! for template in scan(Path::new("prompts"), ScanOptions::default()) {
//!     let values = HashMap::from([("user".to_string(), "Ann".to_string())]);
//!     match template.render(&values) {
//!         Ok(text) => println!("{}: {text}", template.name()),
//!         Err(error) => eprintln!("{}: {error}", template.name()),
//!     }
//! }
//! ```

pub use config::*;
pub use error::*;
pub use host::*;
pub use identifier::*;
pub use loader::*;
pub use path_guard::*;
pub use remote::*;
pub use scanner::*;
pub use source::*;
pub use substitution::*;
pub use template::*;

pub mod config;
#[allow(unused_assignments)]
mod error;
pub mod host;
mod identifier;
pub mod loader;
pub mod metadata;
mod path_guard;
pub mod remote;
pub mod scanner;
pub mod source;
mod substitution;
mod template;

#[cfg(test)]
mod __fixtures;
