//! Formatting and reporting for smoke results

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Rows},
};

use super::check::{AggregateStatus, CheckResult, Report};

/// Output format of the rendered report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One aligned line per result
    #[default]
    Plain,
    /// Rounded table
    Table,
    /// JSON document
    Json,
}

/// How a report should be rendered
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportStyle {
    pub format: OutputFormat,
    pub color: bool,
}

/// Aggregate numbers of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub failures: usize,
    pub status: AggregateStatus,
}

/// Counts failures and derives the aggregate status
pub fn summarize(report: &Report) -> Summary {
    Summary {
        total: report.len(),
        failures: report.failures(),
        status: report.status(),
    }
}

fn status_cell(result: &CheckResult, color: bool) -> String {
    let label = result.status_label();
    match (color, result.passed()) {
        (false, _) => label.to_string(),
        (true, true) => label.green().to_string(),
        (true, false) => label.red().bold().to_string(),
    }
}

/// Formats the report as plain aligned lines
pub fn format_report(report: &Report, color: bool) -> String {
    let width = report
        .results()
        .iter()
        .map(|r| r.name().len())
        .max()
        .unwrap_or(0)
        + 2;

    let mut output = String::from("Smoke Test Results:\n\n");
    for result in report.results() {
        // Pad on the raw label so ANSI codes don't skew the column
        let pad = 4 - result.status_label().len();
        output.push_str(&format!(
            "  {:<width$} {}{}  {}\n",
            result.name(),
            status_cell(result, color),
            " ".repeat(pad),
            result.detail(),
            width = width
        ));
    }
    output.push('\n');
    output.push_str(&format_summary(&summarize(report), color));
    output
}

/// Formats the report as a table
pub fn format_table(report: &Report, color: bool) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Check", "Status", "Detail"]);

    for result in report.results() {
        builder.push_record([
            result.name(),
            &status_cell(result, color),
            result.detail(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    let mut output = table.to_string();
    output.push_str("\n\n");
    output.push_str(&format_summary(&summarize(report), color));
    output
}

#[derive(Serialize)]
struct JsonReport<'a> {
    results: &'a [CheckResult],
    #[serde(flatten)]
    summary: Summary,
}

/// Formats the report as a JSON document
pub fn format_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&JsonReport {
        results: report.results(),
        summary: summarize(report),
    })
}

/// Summary line followed by the aggregate status line
fn format_summary(summary: &Summary, color: bool) -> String {
    let counts = if summary.failures > 0 {
        format!("{} check(s) failed.", summary.failures)
    } else {
        format!("All {} checks passed.", summary.total)
    };
    let overall = format!("Overall: {}", summary.status.label());

    if !color {
        return format!("{}\n{}\n", counts, overall);
    }
    match summary.status {
        AggregateStatus::Success => format!("{}\n{}\n", counts.green(), overall.green().bold()),
        AggregateStatus::Failure => format!("{}\n{}\n", counts.red(), overall.red().bold()),
    }
}

/// Renders the report in the requested style
pub fn render(report: &Report, style: &ReportStyle) -> Result<String, serde_json::Error> {
    match style.format {
        OutputFormat::Plain => Ok(format_report(report, style.color)),
        OutputFormat::Table => Ok(format_table(report, style.color)),
        OutputFormat::Json => format_json(report),
    }
}

/// Prints the report to stdout
pub fn print_report(report: &Report, style: &ReportStyle) -> Result<(), serde_json::Error> {
    println!("{}", render(report, style)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Report {
        let mut report = Report::new();
        report.record("import:torch", true, "2.4.0");
        report.record("B", false, "missing dependency");
        report
    }

    #[test]
    fn plain_lines_are_aligned() {
        let text = format_report(&sample(), false);
        assert!(text.contains("  import:torch   PASS  2.4.0\n"));
        assert!(text.contains("  B              FAIL  missing dependency\n"));
        assert!(text.contains("1 check(s) failed."));
        assert!(text.ends_with("Overall: FAILURE\n"));
    }

    #[test]
    fn empty_report_summary() {
        let text = format_report(&Report::new(), false);
        assert!(text.contains("All 0 checks passed."));
        assert!(text.contains("Overall: SUCCESS"));
    }

    #[test]
    fn table_contains_every_result() {
        let text = format_table(&sample(), false);
        assert!(text.contains("import:torch"));
        assert!(text.contains("missing dependency"));
        assert!(text.contains("Overall: FAILURE"));
    }

    #[test]
    fn json_carries_summary() {
        let json = format_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["failures"], 1);
        assert_eq!(value["total"], 2);
        assert_eq!(value["status"], "failure");
        assert_eq!(value["results"][1]["name"], "B");
        assert_eq!(value["results"][1]["passed"], false);
    }
}
