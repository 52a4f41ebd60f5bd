use crate::batch::{BatchReport, CompareError};
use crate::manifest::ComparisonPair;
use crate::similarity::PairScore;
use crate::utils::normalize_display_path;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Format one score with a fixed number of decimal places.
///
/// ```
/// use pyplag::output::format_score;
///
/// assert_eq!(format_score(1.0, 2), "1.00");
/// assert_eq!(format_score(-3.25, 2), "-3.25");
/// ```
#[must_use]
pub fn format_score(score: f64, precision: usize) -> String {
    format!("{score:.precision$}")
}

/// Render a score list as file contents: one score per line, each line
/// newline-terminated.
#[must_use]
pub fn render_scores(scores: &[f64], precision: usize) -> String {
    let mut out = String::with_capacity(scores.len() * (precision + 4));
    for score in scores {
        out.push_str(&format_score(*score, precision));
        out.push('\n');
    }
    out
}

/// Write the score list to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_scores(path: &Path, scores: &[f64], precision: usize) -> std::io::Result<()> {
    fs::write(path, render_scores(scores, precision))
}

/// Create a progress bar over the files of a batch.
///
/// In test mode, returns a hidden progress bar to avoid polluting test output.
#[must_use]
pub fn create_progress_bar(total_files: u64) -> ProgressBar {
    if cfg!(test) {
        return ProgressBar::hidden();
    }

    let pb =
        ProgressBar::with_draw_target(Some(total_files), ProgressDrawTarget::stderr_with_hz(20));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_message("canonicalizing...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.tick();
    pb
}

/// Print the main header with box-drawing characters.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_header(writer: &mut impl Write) -> std::io::Result<()> {
    writeln!(writer)?;
    writeln!(
        writer,
        "{}",
        "╔════════════════════════════════════════╗".cyan()
    )?;
    writeln!(
        writer,
        "{}",
        "║  Source Similarity Results             ║".cyan().bold()
    )?;
    writeln!(
        writer,
        "{}",
        "╚════════════════════════════════════════╝".cyan()
    )?;
    writeln!(writer)?;
    Ok(())
}

fn create_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    table
}

fn score_color(score: f64, highlight: f64) -> Color {
    if score >= highlight {
        Color::Red
    } else if score >= highlight / 2.0 {
        Color::Yellow
    } else {
        Color::Green
    }
}

/// Print scored pairs as a table. Scores at or above `highlight` are red.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_scores(
    writer: &mut impl Write,
    report: &BatchReport,
    precision: usize,
    highlight: f64,
) -> std::io::Result<()> {
    let scored: Vec<(&ComparisonPair, &PairScore)> = report
        .results
        .iter()
        .filter_map(|r| r.outcome.as_ref().ok().map(|s| (&r.pair, s)))
        .collect();
    if scored.is_empty() {
        return Ok(());
    }

    writeln!(writer, "{}", "Scores".bold().underline())?;

    let mut table = create_table(vec!["#", "Line", "File A", "File B", "Distance", "Score"]);
    for (pair, score) in scored {
        table.add_row(vec![
            Cell::new(pair.index + 1),
            Cell::new(pair.line),
            Cell::new(normalize_display_path(&pair.left)).add_attribute(Attribute::Bold),
            Cell::new(normalize_display_path(&pair.right)).add_attribute(Attribute::Bold),
            Cell::new(score.distance).set_alignment(CellAlignment::Right),
            Cell::new(format_score(score.score, precision))
                .fg(score_color(score.score, highlight))
                .set_alignment(CellAlignment::Right),
        ]);
    }

    writeln!(writer, "{table}")?;
    Ok(())
}

/// Print pairs that could not be scored.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_failures(writer: &mut impl Write, report: &BatchReport) -> std::io::Result<()> {
    let failures: Vec<&CompareError> = report.failures().collect();
    if failures.is_empty() {
        return Ok(());
    }

    writeln!(writer, "\n{}", "Failed Pairs".bold().underline().red())?;

    let mut table = create_table(vec!["#", "Line", "File", "Error"]);
    for err in failures {
        table.add_row(vec![
            Cell::new(err.index + 1),
            Cell::new(err.line),
            Cell::new(normalize_display_path(&err.file)).add_attribute(Attribute::Bold),
            Cell::new(&err.source).fg(Color::Red),
        ]);
    }

    writeln!(writer, "{table}")?;
    Ok(())
}

/// Print summary with colored "pills".
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_summary_pills(
    writer: &mut impl Write,
    report: &BatchReport,
    highlight: f64,
) -> std::io::Result<()> {
    fn pill(label: &str, count: usize) -> String {
        if count == 0 {
            format!("{}: {}", label, count.to_string().green())
        } else {
            format!("{}: {}", label, count.to_string().red().bold())
        }
    }

    let flagged = report
        .results
        .iter()
        .filter(|r| r.outcome.as_ref().is_ok_and(|s| s.score >= highlight))
        .count();

    writeln!(writer)?;
    writeln!(
        writer,
        "{}  {}  {}",
        format!("Scored: {}", report.scored().to_string().bold()),
        pill("Flagged", flagged),
        pill("Failed", report.failed()),
    )?;
    writeln!(
        writer,
        "{}",
        format!(
            "Compared {} pairs across {} files",
            report.results.len().to_string().bold(),
            report.files.to_string().bold()
        )
        .dimmed()
    )?;
    Ok(())
}

/// Print the full terminal report.
///
/// # Errors
///
/// Returns an error if writing to the writer fails.
pub fn print_report(
    writer: &mut impl Write,
    report: &BatchReport,
    precision: usize,
    highlight: f64,
) -> std::io::Result<()> {
    print_header(writer)?;

    if report.results.is_empty() {
        writeln!(writer, "{}", "No pairs to compare.".yellow())?;
        return Ok(());
    }

    print_scores(writer, report, precision, highlight)?;
    print_failures(writer, report)?;
    print_summary_pills(writer, report, highlight)?;
    Ok(())
}

/// One pair in the JSON report.
#[derive(Debug, Serialize)]
pub struct JsonPair {
    /// 1-indexed pair number
    pub pair: usize,
    /// Manifest line
    pub line: usize,
    /// First file
    pub left: String,
    /// Second file
    pub right: String,
    /// Score details when the pair was scored
    #[serde(flatten)]
    pub result: Option<PairScore>,
    /// Failure message when it was not
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// File responsible for the failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_file: Option<String>,
}

/// Machine-readable form of a [`BatchReport`].
#[derive(Debug, Serialize)]
pub struct JsonReport {
    /// Every pair in manifest order
    pub pairs: Vec<JsonPair>,
    /// Number of scored pairs
    pub scored: usize,
    /// Number of failed pairs
    pub failed: usize,
    /// Number of distinct files read
    pub files: usize,
}

impl From<&BatchReport> for JsonReport {
    fn from(report: &BatchReport) -> Self {
        let pairs = report
            .results
            .iter()
            .map(|r| {
                let (result, error, error_file) = match &r.outcome {
                    Ok(score) => (Some(*score), None, None),
                    Err(err) => (
                        None,
                        Some(err.source.to_string()),
                        Some(normalize_display_path(&err.file)),
                    ),
                };
                JsonPair {
                    pair: r.pair.index + 1,
                    line: r.pair.line,
                    left: normalize_display_path(&r.pair.left),
                    right: normalize_display_path(&r.pair.right),
                    result,
                    error,
                    error_file,
                }
            })
            .collect();
        Self {
            pairs,
            scored: report.scored(),
            failed: report.failed(),
            files: report.files,
        }
    }
}

/// Serialize a report as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn report_to_json(report: &BatchReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport::from(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{BatchComparer, ErrorPolicy};
    use crate::manifest::Manifest;
    use tempfile::TempDir;

    fn sample_report() -> (TempDir, BatchReport) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.py"), "print(1)\n").unwrap();
        fs::write(dir.path().join("b.py"), "print(1)\n").unwrap();
        fs::write(dir.path().join("bad.py"), "print(\n").unwrap();
        let manifest = Manifest::parse("a.py b.py\na.py bad.py\n")
            .unwrap()
            .resolved_against(dir.path());
        let report = BatchComparer::default().run(&manifest.pairs);
        (dir, report)
    }

    #[test]
    fn test_format_score_rounding() {
        assert_eq!(format_score(1.0, 2), "1.00");
        assert_eq!(format_score(0.866_666, 2), "0.87");
        assert_eq!(format_score(0.75, 0), "1");
        assert_eq!(format_score(0.123_456, 4), "0.1235");
        assert_eq!(format_score(-0.5, 1), "-0.5");
    }

    #[test]
    fn test_render_scores() {
        assert_eq!(render_scores(&[1.0, 0.25], 2), "1.00\n0.25\n");
        assert_eq!(render_scores(&[], 2), "");
    }

    #[test]
    fn test_write_scores() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.txt");
        fs::write(&path, "stale\n").unwrap();
        write_scores(&path, &[0.5, 1.0], 2).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "0.50\n1.00\n");
    }

    #[test]
    fn test_print_report_lists_scores_and_failures() {
        let (_dir, report) = sample_report();
        let mut buffer = Vec::new();
        print_report(&mut buffer, &report, 2, 0.8).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Source Similarity Results"));
        assert!(text.contains("1.00"));
        assert!(text.contains("Failed Pairs"));
        assert!(text.contains("bad.py"));
        assert!(text.contains("pairs across"));
    }

    #[test]
    fn test_print_report_empty() {
        let mut buffer = Vec::new();
        print_report(&mut buffer, &BatchReport::default(), 2, 0.8).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("No pairs to compare."));
    }

    #[test]
    fn test_json_report() {
        let (_dir, report) = sample_report();
        assert!(report.scores(ErrorPolicy::Abort).is_err());

        let json = report_to_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["scored"], 1);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["pairs"][0]["pair"], 1);
        assert_eq!(value["pairs"][0]["score"], 1.0);
        assert_eq!(value["pairs"][0]["distance"], 0);
        assert!(value["pairs"][0].get("error").is_none());
        assert!(value["pairs"][1]["error"]
            .as_str()
            .unwrap()
            .contains("syntax error"));
        assert!(value["pairs"][1]["error_file"]
            .as_str()
            .unwrap()
            .ends_with("bad.py"));
    }
}
