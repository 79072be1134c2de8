#![allow(dead_code)]

use std::path::Path;
use std::path::PathBuf;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn tabconv_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("tabconv"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd.env_remove("TABCONV_ENGINE");
	cmd
}

pub fn write_file(root: &Path, relative: &str, content: &str) -> std::io::Result<PathBuf> {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(&path, content)?;
	Ok(path)
}

/// Lay out a pandoc data directory and a stand-in engine that prints the
/// source file it is given. Returns `(data_dir, engine)`.
#[cfg(unix)]
pub fn echo_engine_setup(root: &Path) -> std::io::Result<(PathBuf, PathBuf)> {
	use std::os::unix::fs::PermissionsExt;

	write_file(
		root,
		"data/defaults/pandoc-general.yaml",
		"from: markdown+pipe_tables\n",
	)?;
	let engine = write_file(
		root,
		"bin/fake-pandoc",
		"#!/bin/sh\nfor last; do :; done\ncat \"$last\"\n",
	)?;
	std::fs::set_permissions(&engine, std::fs::Permissions::from_mode(0o755))?;

	Ok((root.join("data"), engine))
}

pub const TABLE: &str = r"\begin{longtable}[]{@{}
  >{\raggedright\arraybackslash}p{(\columnwidth - 2\tabcolsep) * \real{0.5000}}
  >{\raggedright\arraybackslash}p{(\columnwidth - 2\tabcolsep) * \real{0.5000}}@{}}
\toprule
\begin{minipage}[b]{\linewidth}\raggedright
Key
\end{minipage} & \begin{minipage}[b]{\linewidth}\raggedright
Value
\end{minipage} \\
\midrule
\endfirsthead
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
\end{longtable}
";
