use crate::batch::{BatchComparer, BatchOptions, BatchReport, ErrorPolicy};
use crate::cli::{BatchArgs, Cli, Commands, OutputOptions};
use crate::config::Config;
use crate::constants::{DEFAULT_HIGHLIGHT, DEFAULT_PRECISION};
use crate::manifest::Manifest;
use crate::output;
use crate::similarity::compare;
use crate::utils::{has_text_name, normalize_display_path};

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::Path;

/// Runs pyplag with the given arguments.
///
/// # Errors
///
/// Returns an error if argument parsing fails, or if the command execution fails.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    run_with_args_to(args, &mut std::io::stdout())
}

/// Run pyplag with the given arguments, writing output to the specified writer.
///
/// This is the testable version of `run_with_args` that allows output capture.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn run_with_args_to<W: std::io::Write>(args: Vec<String>, writer: &mut W) -> Result<i32> {
    let mut program_args = vec!["pyplag".to_owned()];
    program_args.extend(args);
    let cli_var = match Cli::try_parse_from(program_args) {
        Ok(c) => c,
        Err(e) => {
            match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    write!(writer, "{e}")?;
                    writer.flush()?;
                    return Ok(0);
                }
                _ => {
                    eprint!("{e}");
                    return Ok(1);
                }
            }
        }
    };

    if cli_var.output.verbose && !cli_var.output.json {
        eprintln!("[VERBOSE] pyplag v{}", env!("CARGO_PKG_VERSION"));
        if let Some(ref command) = cli_var.command {
            eprintln!("[VERBOSE] Executing subcommand: {command:?}");
        }
    }

    match cli_var.command {
        Some(Commands::Dump {
            file,
            no_extension_check,
        }) => run_dump(&file, no_extension_check, writer),
        Some(Commands::Compare {
            left,
            right,
            precision,
            json,
            no_extension_check,
        }) => {
            let config = Config::load();
            let precision = precision
                .or(config.pyplag.precision)
                .unwrap_or(DEFAULT_PRECISION);
            let check_extensions =
                !no_extension_check && config.pyplag.check_extensions.unwrap_or(true);
            run_compare(&left, &right, precision, json, check_extensions, writer)
        }
        None => {
            let (Some(pairs_file), Some(scores_file)) = (cli_var.pairs_file, cli_var.scores_file)
            else {
                eprintln!("{}", "Error: PAIRS_FILE and SCORES_FILE are required.".red());
                return Ok(1);
            };
            run_batch(
                &pairs_file,
                &scores_file,
                &cli_var.batch,
                &cli_var.output,
                writer,
            )
        }
    }
}

/// Effective batch settings after merging CLI flags over the config file.
#[derive(Debug, Clone)]
struct BatchSettings {
    policy: ErrorPolicy,
    precision: usize,
    highlight: f64,
    check_extensions: bool,
    relative_to_manifest: bool,
    max_chars: Option<usize>,
    jobs: Option<usize>,
}

impl BatchSettings {
    fn merge(args: &BatchArgs, config: &Config) -> Self {
        let file = &config.pyplag;
        Self {
            policy: args.on_error.or(file.on_error).unwrap_or_default(),
            precision: args
                .precision
                .or(file.precision)
                .unwrap_or(DEFAULT_PRECISION),
            highlight: args
                .highlight
                .or(file.highlight)
                .unwrap_or(DEFAULT_HIGHLIGHT),
            check_extensions: !args.no_extension_check && file.check_extensions.unwrap_or(true),
            relative_to_manifest: args.relative_to_manifest
                || file.relative_to_manifest.unwrap_or(false),
            max_chars: args.max_chars.or(file.max_chars),
            jobs: args.jobs.or(file.jobs),
        }
    }
}

fn run_batch<W: std::io::Write>(
    pairs_file: &Path,
    scores_file: &Path,
    args: &BatchArgs,
    out: &OutputOptions,
    writer: &mut W,
) -> Result<i32> {
    let config = Config::load_from_path(pairs_file);
    let settings = BatchSettings::merge(args, &config);
    let verbose = out.verbose && !out.json;

    if verbose {
        eprintln!(
            "[VERBOSE] Using {} threads",
            settings.jobs.unwrap_or_else(rayon::current_num_threads)
        );
        if let Some(ref path) = config.config_file_path {
            eprintln!("[VERBOSE] Config file: {}", normalize_display_path(path));
        }
        eprintln!("[VERBOSE] Configuration:");
        eprintln!("   On error: {:?}", settings.policy);
        eprintln!("   Precision: {}", settings.precision);
        eprintln!("   Highlight: {}", settings.highlight);
        eprintln!("   Check extensions: {}", settings.check_extensions);
        eprintln!("   Relative to manifest: {}", settings.relative_to_manifest);
        if let Some(limit) = settings.max_chars {
            eprintln!("   Max chars: {limit}");
        }
        eprintln!();
    }

    if settings.check_extensions {
        for (name, path) in [("PAIRS_FILE", pairs_file), ("SCORES_FILE", scores_file)] {
            if !has_text_name(path) {
                eprintln!(
                    "{} {name} '{}' must be a *.txt file",
                    "Error:".red().bold(),
                    normalize_display_path(path)
                );
                return Ok(1);
            }
        }
    }

    let mut manifest = match Manifest::load(pairs_file) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            return Ok(1);
        }
    };
    if settings.relative_to_manifest {
        if let Some(base) = pairs_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            manifest = manifest.resolved_against(base);
        }
    }

    if verbose {
        eprintln!(
            "[VERBOSE] Loaded {} pairs from {}",
            manifest.len(),
            normalize_display_path(pairs_file)
        );
    }

    let start_time = std::time::Instant::now();
    let comparer = BatchComparer::new(BatchOptions {
        check_extensions: settings.check_extensions,
        max_chars: settings.max_chars,
        jobs: settings.jobs,
        show_progress: !out.quiet && !out.json,
    });
    let report = comparer.run(&manifest.pairs);

    if verbose {
        eprintln!(
            "[VERBOSE] Compared {} pairs ({} files) in {:.2}s",
            report.results.len(),
            report.files,
            start_time.elapsed().as_secs_f64()
        );
        for result in &report.results {
            match &result.outcome {
                Ok(score) => eprintln!(
                    "[VERBOSE]   {} distance={} lengths={}/{}",
                    result.pair.label(),
                    score.distance,
                    score.left_len,
                    score.right_len
                ),
                Err(e) => eprintln!("[VERBOSE]   {} failed: {e}", result.pair.label()),
            }
        }
    }

    let scores = match report.scores(settings.policy) {
        Ok(scores) => scores,
        Err(e) => {
            if !out.quiet && !out.json {
                output::print_header(writer)?;
                output::print_failures(writer, &report)?;
            }
            eprintln!("{} {e}", "Error:".red().bold());
            eprintln!(
                "{}",
                "Batch aborted; no scores were written (use --on-error skip to drop failing pairs)."
                    .dimmed()
            );
            return Ok(1);
        }
    };

    emit_report(writer, &report, &settings, out)?;

    if let Err(e) = output::write_scores(scores_file, &scores, settings.precision) {
        eprintln!(
            "{} cannot write scores to {}: {e}",
            "Error:".red().bold(),
            normalize_display_path(scores_file)
        );
        return Ok(1);
    }

    if out.quiet {
        for failure in report.failures() {
            eprintln!("{} skipped {failure}", "Warning:".yellow().bold());
        }
    } else if !out.json {
        writeln!(
            writer,
            "\n{} {} scores to {}",
            "Wrote".green(),
            scores.len(),
            normalize_display_path(scores_file)
        )?;
    }

    Ok(0)
}

fn emit_report<W: std::io::Write>(
    writer: &mut W,
    report: &BatchReport,
    settings: &BatchSettings,
    out: &OutputOptions,
) -> Result<()> {
    if out.json {
        writeln!(writer, "{}", output::report_to_json(report)?)?;
    } else if !out.quiet {
        output::print_report(writer, report, settings.precision, settings.highlight)?;
    }
    Ok(())
}

fn run_dump<W: std::io::Write>(
    file: &Path,
    no_extension_check: bool,
    writer: &mut W,
) -> Result<i32> {
    let comparer = BatchComparer::new(BatchOptions {
        check_extensions: !no_extension_check,
        ..BatchOptions::default()
    });
    match comparer.canonicalize_file(file) {
        Ok(form) => {
            writeln!(writer, "{form}")?;
            Ok(0)
        }
        Err(e) => {
            eprintln!(
                "{} {}: {e}",
                "Error:".red().bold(),
                normalize_display_path(file)
            );
            Ok(1)
        }
    }
}

fn run_compare<W: std::io::Write>(
    left: &Path,
    right: &Path,
    precision: usize,
    json: bool,
    check_extensions: bool,
    writer: &mut W,
) -> Result<i32> {
    let comparer = BatchComparer::new(BatchOptions {
        check_extensions,
        ..BatchOptions::default()
    });

    let mut forms = Vec::with_capacity(2);
    for path in [left, right] {
        match comparer.canonicalize_file(path) {
            Ok(form) => forms.push(form),
            Err(e) => {
                eprintln!(
                    "{} {}: {e}",
                    "Error:".red().bold(),
                    normalize_display_path(path)
                );
                return Ok(1);
            }
        }
    }

    let result = match compare(&forms[0], &forms[1]) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            return Ok(1);
        }
    };

    if json {
        let value = serde_json::json!({
            "left": normalize_display_path(left),
            "right": normalize_display_path(right),
            "score": result.score,
            "distance": result.distance,
            "left_len": result.left_len,
            "right_len": result.right_len,
        });
        writeln!(writer, "{}", serde_json::to_string_pretty(&value)?)?;
    } else {
        writeln!(writer, "{}", output::format_score(result.score, precision))?;
    }
    Ok(0)
}
