use std::ffi::OsString;
use std::path::Path;
use std::path::PathBuf;

use globset::GlobBuilder;
use ignore::WalkBuilder;
use rayon::prelude::*;

use crate::ConfigGroup;
use crate::ConversionJob;
use crate::Engine;
use crate::EngineEnvironment;
use crate::PandocDefaults;
use crate::TabconvError;
use crate::TabconvResult;
use crate::config::substitute_output_dir;
use crate::config::substitute_root;
use crate::format::resolve_source_format;
use crate::format::target_extension;
use crate::latex::rewrite_tables;
use crate::rules::apply_default_rules;

const GLOB_META: [char; 4] = ['*', '?', '[', '{'];

/// Everything a run shares between groups. Read-only once built.
#[derive(Debug, Clone)]
pub struct RunContext {
	pub root_dir: PathBuf,
	pub engine: Engine,
	pub defaults: PandocDefaults,
}

impl RunContext {
	/// Load the pandoc defaults from `data_dir` and derive the engine
	/// environment from the current process.
	pub fn load(
		root_dir: impl Into<PathBuf>,
		data_dir: impl Into<PathBuf>,
		program: impl Into<PathBuf>,
	) -> TabconvResult<Self> {
		let data_dir = data_dir.into();
		let defaults = PandocDefaults::load(&data_dir)?;
		let environment = EngineEnvironment::from_process(&data_dir);

		Ok(Self {
			root_dir: root_dir.into(),
			engine: Engine::new(program, data_dir, environment),
			defaults,
		})
	}
}

/// Options controlling how groups are scheduled.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
	/// Convert each group on its own worker. Files within a group are always
	/// converted in order.
	pub parallel: bool,
}

/// A file written by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedFile {
	pub source: PathBuf,
	pub output: PathBuf,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
	/// Converted files, grouped in configuration order.
	pub converted: Vec<ConvertedFile>,
}

/// Expand a single glob pattern against the filesystem.
///
/// `**` spans any number of directories, `*` stays within one path
/// component, and hidden files and directories are never matched. Results are
/// sorted. A pattern without wildcards yields the path itself when it exists.
/// Entries that cannot be read, such as unreadable directories or symlink
/// loops, are skipped with a warning.
pub fn expand_glob(pattern: &str) -> TabconvResult<Vec<PathBuf>> {
	if !pattern.contains(GLOB_META) {
		let path = PathBuf::from(pattern);
		return Ok(if path.exists() { vec![path] } else { Vec::new() });
	}

	let matcher = GlobBuilder::new(pattern)
		.literal_separator(true)
		.build()
		.map_err(|e| TabconvError::InvalidGlob {
			pattern: pattern.to_string(),
			reason: e.to_string(),
		})?
		.compile_matcher();

	let (base, relative) = literal_base(pattern);
	if !base.is_dir() {
		return Ok(Vec::new());
	}

	let walker = WalkBuilder::new(&base)
		.standard_filters(false)
		.hidden(true)
		.follow_links(true)
		.build();

	let mut files = Vec::new();
	for entry in walker {
		let entry = match entry {
			Ok(entry) => entry,
			Err(e) => {
				tracing::warn!(pattern, "skipping unreadable entry: {e}");
				continue;
			}
		};

		if !entry.file_type().is_some_and(|kind| kind.is_file()) {
			continue;
		}

		let path = entry.path();
		let candidate = if relative {
			path.strip_prefix(".").unwrap_or(path)
		} else {
			path
		};

		if matcher.is_match(candidate) {
			files.push(candidate.to_path_buf());
		}
	}

	files.sort();
	Ok(files)
}

/// The directory a pattern's wildcards are resolved under, and whether the
/// pattern is relative to the working directory without a literal prefix.
fn literal_base(pattern: &str) -> (PathBuf, bool) {
	let components: Vec<&str> = pattern.split('/').collect();
	let literal = components
		.iter()
		.take_while(|component| !component.contains(GLOB_META))
		.count();

	if literal == 0 {
		return (PathBuf::from("."), true);
	}

	let base = components[..literal].join("/");
	if base.is_empty() {
		(PathBuf::from("/"), false)
	} else {
		(PathBuf::from(base), false)
	}
}

/// Collect the files of a group, pattern by pattern.
///
/// Overlapping patterns are not deduplicated: a file matched twice is
/// converted twice.
pub fn collect_files(group: &ConfigGroup, root_dir: &Path) -> TabconvResult<Vec<PathBuf>> {
	let mut files = Vec::new();
	for pattern in group.globs.patterns() {
		let pattern = substitute_root(pattern, root_dir);
		let matched = expand_glob(&pattern)?;
		tracing::debug!(pattern = %pattern, matched = matched.len(), "expanded glob");
		files.extend(matched);
	}
	Ok(files)
}

/// Build the conversion job for one matched file.
pub fn build_job(
	file: &Path,
	group: &ConfigGroup,
	root_dir: &Path,
	defaults: &PandocDefaults,
) -> TabconvResult<ConversionJob> {
	let source_format = resolve_source_format(file, group.from_format.as_deref(), defaults)?;
	let extension = target_extension(&group.to_format)?;

	let output_dir =
		substitute_output_dir(&group.output_dir, root_dir, extension.trim_start_matches('.'));
	let mut file_name = file.file_stem().map(OsString::from).unwrap_or_default();
	file_name.push(extension);

	Ok(ConversionJob {
		source_path: file.to_path_buf(),
		source_format,
		target_format: group.to_format.clone(),
		target_extension: extension.to_string(),
		output_path: output_dir.join(file_name),
		engine_args: group.pandoc_args.clone(),
	})
}

/// Apply the group's post-processing to raw engine output.
pub fn post_process(output: &str, group: &ConfigGroup) -> TabconvResult<String> {
	let mut text = if group.default_post_processing {
		tracing::info!("applying default output rules");
		apply_default_rules(&group.to_format, output)
	} else {
		output.to_string()
	};

	if group.is_latex_target() {
		text = rewrite_tables(&text, &group.latex)?.output;
	}

	Ok(text)
}

/// Convert one file and write the result.
///
/// The raw engine output is written before post-processing so a file exists
/// even when a later step fails; it is not removed on failure.
pub fn convert_file(
	job: &ConversionJob,
	group: &ConfigGroup,
	engine: &Engine,
) -> TabconvResult<ConvertedFile> {
	tracing::info!(
		"converting `{}` -> `{}` [{} -> {}]",
		job.source_path.display(),
		job.output_path.display(),
		job.source_format,
		job.target_format
	);

	let output = engine.convert(job)?;

	if let Some(parent) = job
		.output_path
		.parent()
		.filter(|parent| !parent.as_os_str().is_empty())
	{
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(&job.output_path, &output)?;

	let output = post_process(&output, group)?;
	std::fs::write(&job.output_path, output)?;

	Ok(ConvertedFile {
		source: job.source_path.clone(),
		output: job.output_path.clone(),
	})
}

/// Convert every file of a group in order. Stops at the first failure.
pub fn convert_group(
	group: &ConfigGroup,
	context: &RunContext,
) -> TabconvResult<Vec<ConvertedFile>> {
	let files = collect_files(group, &context.root_dir)?;
	if files.is_empty() {
		tracing::warn!(globs = ?group.globs.patterns(), "no files matched");
	}

	files
		.iter()
		.map(|file| {
			let job = build_job(file, group, &context.root_dir, &context.defaults)?;
			convert_file(&job, group, &context.engine)
		})
		.collect()
}

/// Convert all groups.
///
/// Sequential runs process groups in configuration order. Parallel runs give
/// each group its own worker; completion order between groups is undefined
/// but the summary keeps configuration order.
pub fn run(
	groups: &[ConfigGroup],
	context: &RunContext,
	options: RunOptions,
) -> TabconvResult<RunSummary> {
	let converted: Vec<Vec<ConvertedFile>> = if options.parallel {
		groups
			.par_iter()
			.map(|group| convert_group(group, context))
			.collect::<TabconvResult<_>>()?
	} else {
		groups
			.iter()
			.map(|group| convert_group(group, context))
			.collect::<TabconvResult<_>>()?
	};

	Ok(RunSummary {
		converted: converted.into_iter().flatten().collect(),
	})
}
