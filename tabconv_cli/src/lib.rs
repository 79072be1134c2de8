use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Convert document tables with pandoc and clean up the generated markup.",
	long_about = "tabconv converts tables embedded in markdown, HTML and LaTeX documents \
	              between formats by running pandoc, then normalizes the output: LaTeX \
	              longtables lose their minipage wrappers and blank lines, optionally gain \
	              row spacing, and have their column widths checked against the configured \
	              ratios.\n\nEach group in the config file selects files by glob and \
	              converts them with shared settings:\n\n  [\n    {\n      \"globs\": \
	              \"{rootDir}/tables/**/*.md\",\n      \"to\": \"latex\",\n      \
	              \"outputDir\": \"{rootDir}/build/{ext}\",\n      \
	              \"defaultPostProcessing\": true\n    }\n  ]"
)]
pub struct TabconvCli {
	/// Pandoc data directory holding `defaults/` and `filters/`.
	#[arg(long)]
	pub data_dir: PathBuf,

	/// Repository root, substituted for `{rootDir}` in globs and output
	/// directories.
	#[arg(long)]
	pub root_dir: PathBuf,

	/// Config file listing the groups of tables to convert.
	#[arg(long)]
	pub config: PathBuf,

	/// Request parallel conversion of groups. Currently ignored: groups are
	/// always converted one after another.
	#[arg(long, default_value_t = false)]
	pub parallel: bool,

	/// Conversion engine to run.
	#[arg(long, env = "TABCONV_ENGINE", default_value = "pandoc")]
	pub engine: PathBuf,

	/// Enable verbose output, including the engine's own log.
	#[arg(long, short, default_value_t = false)]
	pub verbose: bool,
}
