use std::path::Path;

use crate::PandocDefaults;
use crate::TabconvError;
use crate::TabconvResult;

/// Source format used for `.html` inputs.
pub const HTML_SOURCE_FORMAT: &str = "html+tex_math_dollars";

/// Source format used for `.tex` inputs.
pub const LATEX_FORMAT: &str = "latex";

/// Infer the pandoc source format of `file` from its extension.
///
/// `.md` files use the default source format declared in the general pandoc
/// defaults so that markdown extensions stay in one place.
pub fn source_format(file: &Path, defaults: &PandocDefaults) -> TabconvResult<String> {
	let extension = file
		.extension()
		.and_then(|e| e.to_str())
		.unwrap_or_default();

	match extension {
		"html" => Ok(HTML_SOURCE_FORMAT.to_string()),
		"tex" => Ok(LATEX_FORMAT.to_string()),
		"md" => defaults.source_format().map(ToString::to_string),
		other => {
			Err(TabconvError::UnsupportedExtension {
				file: file.display().to_string(),
				extension: if other.is_empty() {
					String::new()
				} else {
					format!(".{other}")
				},
			})
		}
	}
}

/// Resolve the source format for `file`, preferring an explicit override.
pub fn resolve_source_format(
	file: &Path,
	from_override: Option<&str>,
	defaults: &PandocDefaults,
) -> TabconvResult<String> {
	match from_override {
		Some(format) => Ok(format.to_string()),
		None => source_format(file, defaults),
	}
}

/// Map a pandoc format name (with optional extensions such as
/// `markdown+pipe_tables`) to the file extension of its output, including the
/// leading dot.
pub fn target_extension(format: &str) -> TabconvResult<&'static str> {
	if format.contains("html") {
		Ok(".html")
	} else if format.contains("latex") {
		Ok(".tex")
	} else if format.contains("markdown") {
		Ok(".md")
	} else {
		Err(TabconvError::UnsupportedFormat(format.to_string()))
	}
}
