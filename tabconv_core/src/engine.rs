use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use crate::TabconvError;
use crate::TabconvResult;

/// Program invoked when no engine is configured.
pub const DEFAULT_ENGINE: &str = "pandoc";

/// Flags passed to every invocation: warnings are fatal, logging is verbose.
pub const SAFETY_FLAGS: [&str; 2] = ["--fail-if-warnings", "--verbose"];

/// Defaults files (relative to the data directory) loaded by every
/// invocation.
pub const DEFAULTS_FILES: [&str; 3] = [
	"pandoc-dirs.yaml",
	"pandoc-table.yaml",
	"pandoc-filters.yaml",
];

/// Directory inside the data directory holding lua and python filters.
pub const FILTERS_DIR: &str = "filters";

/// Environment variables handed to the engine.
///
/// Search paths are extended with the filters directory so that lua filters
/// and python filters loaded by pandoc resolve their modules. The values are
/// computed once per run and applied to each subprocess; the current process
/// environment is never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineEnvironment {
	vars: Vec<(String, OsString)>,
}

impl EngineEnvironment {
	/// Build the environment from the current process's search paths.
	pub fn from_process(data_dir: &Path) -> Self {
		Self::with_search_paths(
			data_dir,
			std::env::var_os("LUA_PATH"),
			std::env::var_os("PYTHONPATH"),
		)
	}

	/// Build the environment from explicit previous search paths.
	pub fn with_search_paths(
		data_dir: &Path,
		lua_path: Option<OsString>,
		python_path: Option<OsString>,
	) -> Self {
		let filters = data_dir.join(FILTERS_DIR);
		let filters = filters.to_string_lossy();

		let mut lua = OsString::from(format!("{filters}/?;{filters}/?.lua;"));
		lua.push(lua_path.unwrap_or_default());

		let mut python = OsString::from(format!("{filters}:"));
		python.push(python_path.unwrap_or_default());

		Self {
			vars: vec![
				("LUA_PATH".to_string(), lua),
				("PYTHONPATH".to_string(), python),
			],
		}
	}

	/// Look up a variable.
	pub fn get(&self, key: &str) -> Option<&OsString> {
		self.vars
			.iter()
			.find_map(|(name, value)| (name == key).then_some(value))
	}

	/// All variables in application order.
	pub fn vars(&self) -> &[(String, OsString)] {
		&self.vars
	}
}

/// One file to convert. Built by the batch runner, consumed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
	pub source_path: PathBuf,
	pub source_format: String,
	pub target_format: String,
	/// Extension of the output file, including the leading dot.
	pub target_extension: String,
	pub output_path: PathBuf,
	/// Extra engine arguments inserted before the format flags.
	pub engine_args: Vec<String>,
}

/// The external conversion engine.
#[derive(Debug, Clone)]
pub struct Engine {
	program: PathBuf,
	data_dir: PathBuf,
	environment: EngineEnvironment,
}

impl Engine {
	pub fn new(
		program: impl Into<PathBuf>,
		data_dir: impl Into<PathBuf>,
		environment: EngineEnvironment,
	) -> Self {
		Self {
			program: program.into(),
			data_dir: data_dir.into(),
			environment,
		}
	}

	/// The full argument list for `job`, excluding the program name.
	pub fn args(&self, job: &ConversionJob) -> Vec<OsString> {
		let mut args: Vec<OsString> = SAFETY_FLAGS.iter().map(OsString::from).collect();

		let mut data_dir = OsString::from("--data-dir=");
		data_dir.push(&self.data_dir);
		args.push(data_dir);

		args.extend(
			DEFAULTS_FILES
				.iter()
				.map(|file| OsString::from(format!("--defaults={file}"))),
		);
		args.extend(job.engine_args.iter().map(OsString::from));
		args.extend([
			OsString::from("-f"),
			OsString::from(&job.source_format),
			OsString::from("-t"),
			OsString::from(&job.target_format),
			job.source_path.clone().into_os_string(),
		]);

		args
	}

	/// Run the engine for `job` and return the converted document.
	///
	/// The engine's standard error is logged at debug level. A non-zero exit
	/// fails the job with the captured standard error as the reason.
	pub fn convert(&self, job: &ConversionJob) -> TabconvResult<String> {
		let args = self.args(job);
		tracing::debug!(program = %self.program.display(), ?args, "running conversion engine");

		let mut command = Command::new(&self.program);
		command.args(&args);
		for (key, value) in self.environment.vars() {
			command.env(key, value);
		}

		let output = command.output().map_err(|e| TabconvError::EngineSpawn {
			program: self.program.display().to_string(),
			reason: e.to_string(),
		})?;

		let stderr = String::from_utf8_lossy(&output.stderr);
		for line in stderr.lines().filter(|line| !line.trim().is_empty()) {
			tracing::debug!(target: "tabconv::engine", "{line}");
		}

		if !output.status.success() {
			let stderr = stderr.trim();
			let reason = if stderr.is_empty() {
				format!(
					"engine exited with status {}",
					output
						.status
						.code()
						.map_or_else(|| "unknown".to_string(), |code| code.to_string())
				)
			} else {
				stderr.to_string()
			};

			return Err(TabconvError::EngineFailed {
				file: job.source_path.display().to_string(),
				reason,
			});
		}

		String::from_utf8(output.stdout)
			.map_err(|_| TabconvError::EngineOutputEncoding(job.source_path.display().to_string()))
	}
}
