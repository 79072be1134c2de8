//! Fixed cleanup rules for artifacts pandoc always emits.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// A single find/replace rule. The replacement is inserted literally.
#[derive(Debug)]
pub struct Rule {
	pub description: &'static str,
	pub pattern: Regex,
	pub replacement: &'static str,
}

impl Rule {
	fn new(description: &'static str, pattern: &str, replacement: &'static str) -> Self {
		Self {
			description,
			pattern: Regex::new(pattern).expect("default rule: hardcoded regex is valid"),
			replacement,
		}
	}

	/// Apply this rule to every match in `text`.
	pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
		self.pattern
			.replace_all(text, regex::NoExpand(self.replacement))
	}
}

static LATEX_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
	vec![
		Rule::new(
			"remove pandoc inserted strut after itemize",
			r"\\end\{itemize\}\\strut",
			r"\end{itemize}",
		),
		Rule::new(
			"drop the first-page header in favor of the regular one",
			r"(?s)\\endfirsthead.*?\\endhead",
			r"\endhead",
		),
	]
});

/// The default rules for a pandoc target format, in application order.
pub fn rules_for(format: &str) -> &'static [Rule] {
	match format {
		"latex" => LATEX_RULES.as_slice(),
		_ => &[],
	}
}

/// Apply the default rules for `format` to `output`.
///
/// Rules that do not match leave the text unchanged.
pub fn apply_default_rules(format: &str, output: &str) -> String {
	let mut text = output.to_string();
	for rule in rules_for(format) {
		tracing::debug!(format, rule = rule.description, "applying default output rule");
		text = rule.apply(&text).into_owned();
	}
	text
}
