use std::process;

use clap::Parser;
use tabconv_cli::TabconvCli;
use tabconv_core::RunContext;
use tabconv_core::RunOptions;
use tabconv_core::RunSummary;
use tabconv_core::TabconvResult;
use tabconv_core::load_groups;
use tabconv_core::run;
use tracing_subscriber::EnvFilter;

fn main() {
	let args = TabconvCli::parse();

	let use_color = std::env::var_os("NO_COLOR").is_none();
	init_logging(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	match run_convert(&args) {
		Ok(summary) => {
			println!("Converted {} file(s).", summary.converted.len());
		}
		Err(e) => {
			let report: miette::Report = e.into();
			eprintln!("{report:?}");
			process::exit(2);
		}
	}
}

fn init_logging(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "info" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.init();
}

fn run_convert(args: &TabconvCli) -> TabconvResult<RunSummary> {
	if args.parallel {
		tracing::warn!("`--parallel` is not supported yet, converting groups sequentially");
	}

	let groups = load_groups(&args.config)?;
	let context = RunContext::load(&args.root_dir, &args.data_dir, &args.engine)?;
	tracing::info!(groups = groups.len(), "loaded config");

	run(&groups, &context, RunOptions { parallel: false })
}
