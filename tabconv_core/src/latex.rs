//! Post-processing of pandoc's LaTeX `longtable` output.
//!
//! Every `longtable` environment in the converted text is rewritten on its
//! own; text outside the tables is copied through untouched. For each table:
//!
//! ```text
//! header (up to \endhead)  → column widths + format directives
//!   → ratio override / scale to full width (computed and logged)
//! whole table              → strip minipage wrappers
//! body (\endhead..\bottomrule) → \addlinespace after each row (optional)
//! whole table              → drop blank lines
//! ```
//!
//! The marker strings below are pinned to the shape of pandoc's current
//! `longtable` writer.

use std::sync::LazyLock;

use regex::Regex;

use crate::LatexOptions;
use crate::TabconvError;
use crate::TabconvResult;

pub const TABLE_BEGIN: &str = r"\begin{longtable}";
pub const TABLE_END: &str = r"\end{longtable}";
/// Ends the header region holding the column declarations.
pub const HEADER_END: &str = r"\endhead";
/// Ends the body region.
pub const FOOTER: &str = r"\bottomrule";
pub const ROW_SEPARATOR: &str = r"\tabularnewline";
pub const WRAPPER_BEGIN: &str = r"\begin{minipage}";
pub const WRAPPER_END: &str = r"\end{minipage}";
/// A declared column: `>{<format>}p{(\columnwidth - ...) * \real{<width>}}`.
pub const COLUMN_PATTERN: &str = r">\{(.*)\}.*p\{.*\\real\{([0-9]+(?:\.[0-9]+)?)\}\}";

static TABLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?s)\\begin\{longtable\}.*?\\end\{longtable\}")
		.expect("TABLE_BLOCK: hardcoded regex is valid")
});

static COLUMN_SPEC: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(COLUMN_PATTERN).expect("COLUMN_SPEC: hardcoded regex is valid"));

static DECLARED_WIDTH: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\\real\{([^}]*)\}").expect("DECLARED_WIDTH: hardcoded regex is valid")
});

static NUMERIC_WIDTH: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[0-9]+(?:\.[0-9]+)?$").expect("NUMERIC_WIDTH: hardcoded regex is valid")
});

static WRAPPER_BEGIN_LINE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\\begin\{minipage\}.*").expect("WRAPPER_BEGIN_LINE: hardcoded regex is valid")
});

static BLANK_LINE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?m)^\s*\n").expect("BLANK_LINE: hardcoded regex is valid"));

/// A column declared in a table header.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
	/// Fraction of the available width.
	pub width: f64,
	/// The `>{...}` directive, e.g. `\raggedright\arraybackslash`.
	pub format: String,
}

/// Column widths of one table after overrides were applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
	pub columns: Vec<ColumnSpec>,
}

impl ColumnLayout {
	pub fn widths(&self) -> Vec<f64> {
		self.columns.iter().map(|column| column.width).collect()
	}

	pub fn formats(&self) -> Vec<&str> {
		self.columns
			.iter()
			.map(|column| column.format.as_str())
			.collect()
	}

	pub fn total_width(&self) -> f64 {
		self.columns.iter().map(|column| column.width).sum()
	}
}

/// One rewritten `longtable` environment.
#[derive(Debug, Clone)]
pub struct TableRewrite {
	/// The rewritten table text.
	pub text: String,
	/// Computed layout, or `None` when the table has no header marker.
	pub layout: Option<ColumnLayout>,
}

/// The result of rewriting every table in a document.
#[derive(Debug, Clone)]
pub struct LatexRewrite {
	/// The full document with every table rewritten.
	pub output: String,
	/// One entry per table, in document order.
	pub tables: Vec<TableRewrite>,
}

/// Extract the declared columns from the header region of `table`.
///
/// Returns `Ok(None)` when the table has no [`HEADER_END`] marker. A header
/// without any column declaration, or with a width that is not a number, is an
/// error.
pub fn extract_columns(table: &str) -> TabconvResult<Option<Vec<ColumnSpec>>> {
	let Some(end) = table.find(HEADER_END) else {
		return Ok(None);
	};

	let header = &table[..end];
	if let Some(width) = DECLARED_WIDTH
		.captures_iter(header)
		.map(|captures| captures.get(1).map_or("", |width| width.as_str()))
		.find(|width| !NUMERIC_WIDTH.is_match(width))
	{
		return Err(TabconvError::InvalidColumnWidth {
			width: width.to_string(),
		});
	}

	let mut columns = Vec::new();
	for captures in COLUMN_SPEC.captures_iter(header) {
		let format = &captures[1];
		let width = &captures[2];
		let width = width
			.parse::<f64>()
			.map_err(|_| TabconvError::InvalidColumnWidth {
				width: width.to_string(),
			})?;

		columns.push(ColumnSpec {
			width,
			format: format.to_string(),
		});
	}

	if columns.is_empty() {
		return Err(TabconvError::NoColumns {
			pattern: COLUMN_PATTERN.to_string(),
		});
	}

	Ok(Some(columns))
}

/// Apply the ratio override and full-width scaling to declared columns.
pub fn apply_width_overrides(
	mut columns: Vec<ColumnSpec>,
	options: &LatexOptions,
) -> TabconvResult<Vec<ColumnSpec>> {
	let ratios = options.ratios();

	if let Some(ratios) = ratios {
		if ratios.len() != columns.len() {
			return Err(TabconvError::RatioCountMismatch {
				expected: columns.len(),
				got: ratios.len(),
			});
		}

		let total: f64 = ratios.iter().sum();
		if total.abs() < f64::EPSILON {
			return Err(TabconvError::ZeroTotalWidth);
		}

		for (column, ratio) in columns.iter_mut().zip(ratios) {
			column.width = ratio / total;
		}
		tracing::info!(widths = ?widths_of(&columns), "set column ratios");
	}

	if ratios.is_some() || options.scale_columns_to_full {
		let total: f64 = columns.iter().map(|column| column.width).sum();
		if total.abs() < f64::EPSILON {
			return Err(TabconvError::ZeroTotalWidth);
		}

		let scale = (1.0 - options.scale_columns_to_full_margin) / total;
		tracing::info!(
			margin = options.scale_columns_to_full_margin,
			"scaling columns to full width"
		);
		for column in &mut columns {
			column.width *= scale;
		}
	}

	Ok(columns)
}

/// Extract the columns of `table` and apply the configured overrides.
pub fn compute_layout(table: &str, options: &LatexOptions) -> TabconvResult<Option<ColumnLayout>> {
	let Some(columns) = extract_columns(table)? else {
		if options.ratios().is_some() {
			return Err(TabconvError::MissingHeader {
				marker: HEADER_END.to_string(),
			});
		}

		tracing::warn!("table has no header marker, skipping column widths");
		return Ok(None);
	};

	let layout = ColumnLayout {
		columns: apply_width_overrides(columns, options)?,
	};
	tracing::info!(
		total = layout.total_width(),
		widths = ?layout.widths(),
		formats = ?layout.formats(),
		"found column layout"
	);

	Ok(Some(layout))
}

/// Remove the minipage wrappers pandoc puts around cell content.
///
/// A begin marker is removed together with the rest of its line.
pub fn strip_wrappers(table: &str) -> String {
	let table = table.replace(WRAPPER_END, "");
	WRAPPER_BEGIN_LINE.replace_all(&table, "").into_owned()
}

/// Append `\addlinespace[<spacing>]` to every row separator in the body.
///
/// Only the region between [`HEADER_END`] and [`FOOTER`] is touched. Tables
/// missing either marker are returned unchanged.
pub fn add_row_spacing(table: &str, spacing: &str) -> String {
	let (Some(header), Some(end)) = (table.find(HEADER_END), table.find(FOOTER)) else {
		tracing::warn!("table has no body markers, skipping row spacing");
		return table.to_string();
	};

	let start = header + HEADER_END.len();
	if end < start {
		tracing::warn!("table footer precedes its header, skipping row spacing");
		return table.to_string();
	}

	tracing::debug!(start, end, "found table body");
	let spaced = format!(r"{ROW_SEPARATOR}\addlinespace[{spacing}]");
	let body = table[start..end].replace(ROW_SEPARATOR, &spaced);

	format!("{}{body}{}", &table[..start], &table[end..])
}

/// Delete every empty or whitespace-only line.
pub fn remove_blank_lines(text: &str) -> String {
	BLANK_LINE.replace_all(text, "").into_owned()
}

/// Rewrite a single `longtable` environment.
pub fn rewrite_table(table: &str, options: &LatexOptions) -> TabconvResult<TableRewrite> {
	let layout = compute_layout(table, options)?;

	let mut text = strip_wrappers(table);
	if let Some(spacing) = options.spacing() {
		tracing::info!(spacing, "applying row spacing");
		text = add_row_spacing(&text, spacing);
	}

	Ok(TableRewrite {
		text: remove_blank_lines(&text),
		layout,
	})
}

/// Rewrite every `longtable` environment in `output`, left to right.
///
/// Text outside the tables is kept byte for byte. The first failing table
/// aborts the rewrite.
pub fn rewrite_tables(output: &str, options: &LatexOptions) -> TabconvResult<LatexRewrite> {
	tracing::info!("post-processing latex tables");

	let mut rewritten = String::with_capacity(output.len());
	let mut tables = Vec::new();
	let mut last = 0;

	for block in TABLE_BLOCK.find_iter(output) {
		rewritten.push_str(&output[last..block.start()]);
		let table = rewrite_table(block.as_str(), options)?;
		rewritten.push_str(&table.text);
		tables.push(table);
		last = block.end();
	}
	rewritten.push_str(&output[last..]);

	Ok(LatexRewrite {
		output: rewritten,
		tables,
	})
}

fn widths_of(columns: &[ColumnSpec]) -> Vec<f64> {
	columns.iter().map(|column| column.width).collect()
}
