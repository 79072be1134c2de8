//! `tabconv_core` is the library behind the `tabconv` command. It converts
//! documents containing tables between markup formats by running pandoc, then
//! cleans up the generated output.
//!
//! ## Processing Pipeline
//!
//! ```text
//! config groups (relaxed JSON)
//!   → glob expansion ({rootDir} substituted, no deduplication)
//!   → per file: format resolution → ConversionJob
//!   → pandoc (warnings are fatal) → raw text, pre-saved to the output path
//!   → default rules (per target format)
//!   → LaTeX table rewriter (latex targets only)
//!   → final text written to the output path
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Group configuration and the general pandoc defaults.
//! - [`format`]: Mapping between file extensions and pandoc formats.
//! - [`latex`]: Rewriting of `longtable` environments.
//! - [`rules`]: Fixed per-format cleanup rules.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use tabconv_core::RunContext;
//! use tabconv_core::RunOptions;
//! use tabconv_core::load_groups;
//! use tabconv_core::run;
//!
//! let groups = load_groups(Path::new("tables.json")).unwrap();
//! let context = RunContext::load("/repo", "/repo/pandoc", "pandoc").unwrap();
//! let summary = run(&groups, &context, RunOptions::default()).unwrap();
//! println!("{} file(s) converted", summary.converted.len());
//! ```

pub use batch::*;
pub use config::*;
pub use engine::*;
pub use error::*;

mod batch;
pub mod config;
mod engine;
#[allow(unused_assignments)]
mod error;
pub mod format;
pub mod latex;
pub mod rules;

#[cfg(test)]
mod __fixtures;
