use miette::Diagnostic;
use thiserror::Error;

/// Broad category of a [`TabconvError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// Unknown extension or format, malformed configuration, bad glob.
	Configuration,
	/// The conversion engine could not be started or reported a failure.
	Engine,
	/// The engine's output did not have the expected table shape.
	MarkupShape,
	/// Reading or writing files failed.
	Io,
}

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum TabconvError {
	#[error(transparent)]
	#[diagnostic(code(tabconv::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file `{path}`: {reason}")]
	#[diagnostic(
		code(tabconv::config_parse),
		help("the config file must be a JSON array of group objects (comments are allowed)")
	)]
	ConfigParse { path: String, reason: String },

	#[error("failed to load pandoc defaults `{path}`: {reason}")]
	#[diagnostic(code(tabconv::defaults_file))]
	DefaultsFile { path: String, reason: String },

	#[error("pandoc defaults `{0}` do not declare a `from` format")]
	#[diagnostic(
		code(tabconv::missing_default_format),
		help("add `from: markdown` (or similar) to the general defaults, or set `from` in the group")
	)]
	MissingDefaultFormat(String),

	#[error("unsupported input extension `{extension}` for `{file}`")]
	#[diagnostic(
		code(tabconv::unsupported_extension),
		help("supported extensions: .html, .tex, .md; set `from` in the group to override")
	)]
	UnsupportedExtension { file: String, extension: String },

	#[error("unsupported output format: `{0}`")]
	#[diagnostic(
		code(tabconv::unsupported_format),
		help("the `to` format must name html, latex or markdown")
	)]
	UnsupportedFormat(String),

	#[error("invalid glob pattern `{pattern}`: {reason}")]
	#[diagnostic(code(tabconv::invalid_glob))]
	InvalidGlob { pattern: String, reason: String },

	#[error("failed to start conversion engine `{program}`: {reason}")]
	#[diagnostic(
		code(tabconv::engine_spawn),
		help("make sure pandoc is installed or pass `--engine <path>`")
	)]
	EngineSpawn { program: String, reason: String },

	#[error("conversion of `{file}` failed: {reason}")]
	#[diagnostic(
		code(tabconv::engine_failed),
		help("pandoc runs with `--fail-if-warnings`, so any warning aborts the conversion")
	)]
	EngineFailed { file: String, reason: String },

	#[error("conversion engine produced invalid UTF-8 for `{0}`")]
	#[diagnostic(code(tabconv::engine_output_encoding))]
	EngineOutputEncoding(String),

	#[error("no column widths found in table header (pattern `{pattern}`)")]
	#[diagnostic(
		code(tabconv::no_columns),
		help("the table markup has an unexpected shape; check the pandoc version and table filters")
	)]
	NoColumns { pattern: String },

	#[error("column width `{width}` in table header is not a number")]
	#[diagnostic(code(tabconv::invalid_column_width))]
	InvalidColumnWidth { width: String },

	#[error("`columnRatios` has {got} entries but the table declares {expected} column(s)")]
	#[diagnostic(code(tabconv::ratio_count_mismatch))]
	RatioCountMismatch { expected: usize, got: usize },

	#[error("column widths sum to zero, so they cannot be rescaled")]
	#[diagnostic(
		code(tabconv::zero_total_width),
		help("use positive values in `columnRatios`")
	)]
	ZeroTotalWidth,

	#[error("table has no `{marker}` header marker, so `columnRatios` cannot be applied")]
	#[diagnostic(code(tabconv::missing_header))]
	MissingHeader { marker: String },
}

impl TabconvError {
	/// Classify this error into its broad category.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Io(_) => ErrorKind::Io,
			Self::ConfigParse { .. }
			| Self::DefaultsFile { .. }
			| Self::MissingDefaultFormat(_)
			| Self::UnsupportedExtension { .. }
			| Self::UnsupportedFormat(_)
			| Self::InvalidGlob { .. } => ErrorKind::Configuration,
			Self::EngineSpawn { .. } | Self::EngineFailed { .. } | Self::EngineOutputEncoding(_) => {
				ErrorKind::Engine
			}
			Self::NoColumns { .. }
			| Self::InvalidColumnWidth { .. }
			| Self::RatioCountMismatch { .. }
			| Self::ZeroTotalWidth
			| Self::MissingHeader { .. } => ErrorKind::MarkupShape,
		}
	}
}

pub type TabconvResult<T> = Result<T, TabconvError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
