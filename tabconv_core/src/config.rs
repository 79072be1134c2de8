use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::TabconvError;
use crate::TabconvResult;

/// Location of the general pandoc defaults inside the data directory.
pub const GENERAL_DEFAULTS_FILE: &str = "defaults/pandoc-general.yaml";

/// Placeholder replaced by the root directory in globs and output directories.
pub const ROOT_DIR_PLACEHOLDER: &str = "{rootDir}";

/// Placeholder replaced by the target extension (without the leading dot) in
/// output directories.
pub const EXT_PLACEHOLDER: &str = "{ext}";

/// Glob patterns of a group. A single string is accepted as shorthand for a
/// one-element list.
///
/// ```json
/// { "globs": "{rootDir}/docs/**/*.md" }
/// { "globs": ["{rootDir}/a/*.md", "{rootDir}/b/*.html"] }
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
#[non_exhaustive]
pub enum Globs {
	One(String),
	Many(Vec<String>),
}

impl Globs {
	/// The patterns in declaration order.
	pub fn patterns(&self) -> &[String] {
		match self {
			Self::One(pattern) => std::slice::from_ref(pattern),
			Self::Many(patterns) => patterns.as_slice(),
		}
	}
}

/// One group of files converted with the same settings.
///
/// ```json
/// {
///   // Tables written in markdown, rendered for the print build.
///   "globs": ["{rootDir}/tables/**/*.md"],
///   "to": "latex",
///   "outputDir": "{rootDir}/build/tables-{ext}",
///   "pandocArgs": ["--columns=200"],
///   "defaultPostProcessing": true,
///   "scaleColumnsToFull": true,
///   "scaleColumnsToFullMargin": 0.05,
///   "columnRatios": [2, 1, 1],
///   "rowSpacing": "0.5em",
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigGroup {
	/// Files to convert; `{rootDir}` is substituted before expansion.
	pub globs: Globs,
	/// Explicit source format. When absent the format is inferred from each
	/// file's extension.
	#[serde(default, rename = "from")]
	pub from_format: Option<String>,
	/// Target format passed to pandoc with `-t`.
	#[serde(rename = "to")]
	pub to_format: String,
	/// Output directory template supporting `{rootDir}` and `{ext}`.
	pub output_dir: String,
	/// Extra arguments inserted before the format flags.
	#[serde(default)]
	pub pandoc_args: Vec<String>,
	/// Whether the fixed per-format cleanup rules run.
	#[serde(default)]
	pub default_post_processing: bool,
	#[serde(flatten)]
	pub latex: LatexOptions,
}

impl ConfigGroup {
	/// Whether the LaTeX table rewriter applies to this group's output.
	pub fn is_latex_target(&self) -> bool {
		self.to_format == "latex"
	}
}

/// Options for rewriting LaTeX `longtable` output.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LatexOptions {
	/// Rescale column widths so they fill the text width.
	#[serde(default)]
	pub scale_columns_to_full: bool,
	/// Fraction of the text width left free when scaling.
	#[serde(default)]
	pub scale_columns_to_full_margin: f64,
	/// Relative column weights replacing the widths pandoc declared.
	#[serde(default)]
	pub column_ratios: Option<Vec<f64>>,
	/// Extra vertical space inserted after each body row, e.g. `"0.5em"`. Only
	/// the length is given; it is wrapped in `\addlinespace[...]`.
	#[serde(default)]
	pub row_spacing: Option<String>,
}

impl LatexOptions {
	/// Configured ratios, treating an empty list as absent.
	pub fn ratios(&self) -> Option<&[f64]> {
		self.column_ratios
			.as_deref()
			.filter(|ratios| !ratios.is_empty())
	}

	/// Configured row spacing, treating an empty string as absent.
	pub fn spacing(&self) -> Option<&str> {
		self.row_spacing
			.as_deref()
			.filter(|spacing| !spacing.is_empty())
	}
}

/// Load the ordered list of groups from a relaxed JSON file.
pub fn load_groups(path: &Path) -> TabconvResult<Vec<ConfigGroup>> {
	let content = std::fs::read_to_string(path)?;
	parse_groups(&content).map_err(|reason| TabconvError::ConfigParse {
		path: path.display().to_string(),
		reason,
	})
}

/// Parse groups from relaxed JSON (comments and trailing commas allowed).
pub fn parse_groups(content: &str) -> Result<Vec<ConfigGroup>, String> {
	json5::from_str(content).map_err(|e| e.to_string())
}

/// The subset of pandoc's general defaults that tabconv reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PandocDefaults {
	/// Default source format, used for `.md` inputs.
	#[serde(default)]
	pub from: Option<String>,
	#[serde(skip)]
	path: PathBuf,
}

impl PandocDefaults {
	/// Load `defaults/pandoc-general.yaml` from the pandoc data directory.
	pub fn load(data_dir: &Path) -> TabconvResult<Self> {
		let path = data_dir.join(GENERAL_DEFAULTS_FILE);
		let content = std::fs::read_to_string(&path).map_err(|e| TabconvError::DefaultsFile {
			path: path.display().to_string(),
			reason: e.to_string(),
		})?;

		let mut defaults: PandocDefaults =
			serde_yaml_ng::from_str(&content).map_err(|e| TabconvError::DefaultsFile {
				path: path.display().to_string(),
				reason: e.to_string(),
			})?;
		defaults.path = path;

		Ok(defaults)
	}

	/// Construct defaults in memory.
	pub fn with_from(from: impl Into<String>) -> Self {
		Self {
			from: Some(from.into()),
			path: PathBuf::from(GENERAL_DEFAULTS_FILE),
		}
	}

	/// The declared default source format.
	pub fn source_format(&self) -> TabconvResult<&str> {
		self.from
			.as_deref()
			.ok_or_else(|| TabconvError::MissingDefaultFormat(self.path.display().to_string()))
	}
}

/// Replace `{rootDir}` in a template.
pub fn substitute_root(template: &str, root_dir: &Path) -> String {
	template.replace(ROOT_DIR_PLACEHOLDER, &root_dir.to_string_lossy())
}

/// Replace `{rootDir}` and `{ext}` in an output directory template.
pub fn substitute_output_dir(template: &str, root_dir: &Path, ext: &str) -> PathBuf {
	PathBuf::from(substitute_root(template, root_dir).replace(EXT_PLACEHOLDER, ext))
}
