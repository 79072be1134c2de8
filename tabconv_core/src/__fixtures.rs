use std::path::Path;
use std::path::PathBuf;

use crate::ConfigGroup;
use crate::Globs;
use crate::LatexOptions;

/// Three columns declared as `2`, `1`, `1` with minipage-wrapped headers and
/// a blank line inside the body.
pub(crate) const THREE_COLUMN_TABLE: &str = r"\begin{longtable}[]{@{}
  >{\raggedright\arraybackslash}p{(\columnwidth - 4\tabcolsep) * \real{2}}
  >{\centering\arraybackslash}p{(\columnwidth - 4\tabcolsep) * \real{1}}
  >{\raggedleft\arraybackslash}p{(\columnwidth - 4\tabcolsep) * \real{1}}@{}}
\toprule
\begin{minipage}[b]{\linewidth}\raggedright
Name
\end{minipage} & \begin{minipage}[b]{\linewidth}\centering
Kind
\end{minipage} & \begin{minipage}[b]{\linewidth}\raggedleft
Size
\end{minipage} \\
\midrule
\endhead
alpha & a & 1 \tabularnewline

beta & b & 2 \tabularnewline
\bottomrule
\end{longtable}";

/// Two columns declared as `1`, `1`.
pub(crate) const TWO_COLUMN_TABLE: &str = r"\begin{longtable}[]{@{}
  >{\raggedright\arraybackslash}p{(\columnwidth - 2\tabcolsep) * \real{1}}
  >{\raggedright\arraybackslash}p{(\columnwidth - 2\tabcolsep) * \real{1}}@{}}
\toprule
\begin{minipage}[b]{\linewidth}\raggedright
Key
\end{minipage} & \begin{minipage}[b]{\linewidth}\raggedright
Value
\end{minipage} \\
\midrule
\endhead
a & 1 \tabularnewline

b & 2 \tabularnewline
\bottomrule
\end{longtable}";

/// A table whose header has no width declarations.
pub(crate) const UNDECLARED_COLUMNS_TABLE: &str = r"\begin{longtable}[]{@{}ll@{}}
\toprule
Key & Value \\
\midrule
\endhead
a & 1 \tabularnewline
\bottomrule
\end{longtable}";

/// A table without a `\endhead` marker.
pub(crate) const HEADLESS_TABLE: &str = r"\begin{longtable}[]{@{}ll@{}}
a & 1 \tabularnewline

b & 2 \tabularnewline
\end{longtable}";

/// Header block as emitted by pandoc, with a separate first-page header.
pub(crate) const FIRST_HEAD_BLOCK: &str = r"\midrule
\endfirsthead
\toprule
Key & Value \\
\midrule
\endhead";

pub(crate) fn latex_options() -> LatexOptions {
	LatexOptions::default()
}

pub(crate) fn latex_group(output_dir: &str) -> ConfigGroup {
	ConfigGroup {
		globs: Globs::One("{rootDir}/**/*.tex".to_string()),
		from_format: None,
		to_format: "latex".to_string(),
		output_dir: output_dir.to_string(),
		pandoc_args: Vec::new(),
		default_post_processing: true,
		latex: LatexOptions::default(),
	}
}

/// Write `content` to `root/relative`, creating parent directories.
pub(crate) fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create dir: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write {}: {e}", path.display()));
	path
}

/// Write an executable shell script standing in for pandoc.
#[cfg(unix)]
pub(crate) fn write_engine(dir: &Path, body: &str) -> PathBuf {
	use std::os::unix::fs::PermissionsExt;

	let path = write_file(dir, "fake-pandoc", &format!("#!/bin/sh\n{body}\n"));
	std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
		.unwrap_or_else(|e| panic!("chmod: {e}"));
	path
}

/// An engine that prints its last argument (the source file) unchanged.
#[cfg(unix)]
pub(crate) fn write_echo_engine(dir: &Path) -> PathBuf {
	write_engine(dir, "for last; do :; done\ncat \"$last\"")
}
