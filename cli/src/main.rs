//! unblank CLI - find and remove empty pages in DOCX documents

mod prompt;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use prompt::{Mode, Prompter};
use unblank::detect::has_docx_extension;
use unblank::{
    clean_file, scan_file, CleanOptions, CleanReport, DetectOptions, JsonFormat, ScanReport,
    Selection,
};

#[derive(Parser)]
#[command(name = "unblank")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Find and remove empty pages in DOCX documents", long_about = None)]
struct Cli {
    /// Input DOCX file (prompted for when missing)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the pages of a document and whether they are empty
    Scan {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Also report runs of at least N empty paragraphs inside pages
        #[arg(long, value_name = "N")]
        min_blank_run: Option<usize>,
    },

    /// Remove empty pages from a document in place
    Clean {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Remove every empty page (default)
        #[arg(long, conflicts_with = "pages")]
        all: bool,

        /// Pages to remove (e.g., "2,4-5")
        #[arg(long)]
        pages: Option<String>,

        /// Do not keep a backup copy of the original
        #[arg(long)]
        no_backup: bool,

        /// Show what would be removed without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Also remove runs of empty paragraphs inside pages with content
        #[arg(long)]
        blank_runs: bool,

        /// Minimum length of a blank run
        #[arg(long, value_name = "N", default_value_t = unblank::detector::DEFAULT_MIN_BLANK_RUN)]
        min_blank_run: usize,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Scan {
            input,
            json,
            min_blank_run,
        }) => cmd_scan(&input, json, min_blank_run),
        Some(Commands::Clean {
            input,
            all: _,
            pages,
            no_backup,
            dry_run,
            blank_runs,
            min_blank_run,
        }) => cmd_clean(
            &input,
            pages.as_deref(),
            no_backup,
            dry_run,
            blank_runs,
            min_blank_run,
        ),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            let stdin = io::stdin();
            let prompter = Prompter::new(stdin.lock(), io::stdout());
            cmd_interactive(cli.input, prompter)
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn check_input(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("File not found: {}", input.display()).into());
    }
    if !has_docx_extension(input) {
        return Err(format!("Not a DOCX file: {}", input.display()).into());
    }
    Ok(())
}

fn cmd_scan(
    input: &Path,
    json: bool,
    min_blank_run: Option<usize>,
) -> Result<(), Box<dyn std::error::Error>> {
    check_input(input)?;

    let mut options = DetectOptions::new();
    if let Some(min) = min_blank_run {
        options = options.with_blank_runs(true).with_min_blank_run(min);
    }

    let report = scan_file(input, &options)?;

    if json {
        println!("{}", unblank::render::to_json(&report, JsonFormat::Pretty)?);
    } else {
        print_scan(input, &report);
    }

    Ok(())
}

fn cmd_clean(
    input: &Path,
    pages: Option<&str>,
    no_backup: bool,
    dry_run: bool,
    blank_runs: bool,
    min_blank_run: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    check_input(input)?;

    let selection = match pages {
        Some(p) => Selection::parse(p).map_err(|e| format!("Invalid page list: {}", e))?,
        None => Selection::All,
    };

    let mut options = CleanOptions::new()
        .with_selection(selection)
        .with_backup(!no_backup)
        .with_detect_options(
            DetectOptions::new()
                .with_blank_runs(blank_runs)
                .with_min_blank_run(min_blank_run),
        );
    if dry_run {
        options = options.dry_run();
    }

    let report = clean_file(input, &options)?;
    print_clean(input, &report, dry_run);

    Ok(())
}

fn cmd_interactive<R: BufRead, W: Write>(
    input: Option<PathBuf>,
    mut prompter: Prompter<R, W>,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "=".repeat(60));
    println!("      {}", "DOCX Empty Page Finder & Remover".cyan().bold());
    println!("{}", "=".repeat(60));

    let input = match input {
        Some(path) => PathBuf::from(prompt::strip_quotes(&path.to_string_lossy())),
        None => prompter.filename()?,
    };
    check_input(&input)?;

    let min_blank_run = prompter.min_blank_run()?;
    let detect = DetectOptions::new()
        .with_blank_runs(true)
        .with_min_blank_run(min_blank_run);

    let report = scan_file(&input, &detect)?;
    print_scan(&input, &report);

    if report.is_clean() {
        println!("\n{}", "No empty pages or blank runs found!".green());
        println!("   (Looking for {}+ consecutive empty paragraphs)", min_blank_run);
        return Ok(());
    }

    let Some((selection, blank_runs)) = choose(&report, &mut prompter)? else {
        println!("Operation cancelled.");
        return Ok(());
    };

    let options = CleanOptions::new()
        .with_selection(selection)
        .with_detect_options(detect.with_blank_runs(blank_runs));
    let result = clean_file(&input, &options)?;
    print_clean(&input, &result, false);

    println!("\nDone!");
    Ok(())
}

/// Ask what to remove. Returns the pages and whether to remove blank runs,
/// or `None` when the user cancels or picks nothing.
fn choose<R: BufRead, W: Write>(
    report: &ScanReport,
    prompter: &mut Prompter<R, W>,
) -> io::Result<Option<(Selection, bool)>> {
    match prompter.mode()? {
        Mode::All => {
            if prompter.confirm_all()? {
                Ok(Some((Selection::All, true)))
            } else {
                Ok(None)
            }
        }
        Mode::Select => {
            let selection = if report.empty_count() > 0 {
                prompter.selection(report.segments.len())?
            } else {
                Selection::Indices(Vec::new())
            };
            let runs = report.blank_runs.len();
            let blank_runs = runs > 0
                && prompter.confirm(&format!("Also delete the {} blank run(s)?", runs))?;

            if selection == Selection::Indices(Vec::new()) && !blank_runs {
                return Ok(None);
            }
            Ok(Some((selection, blank_runs)))
        }
        Mode::Cancel => Ok(None),
    }
}

fn print_scan(input: &Path, report: &ScanReport) {
    println!("\n{}", "Document Pages".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Blocks".bold(), report.block_count);
    println!("{}: {}", "Pages".bold(), report.segments.len());
    println!("{}: {}", "Empty".bold(), report.empty_count());
    println!();
    println!("{}", unblank::render::to_text(report));
}

fn print_clean(input: &Path, report: &CleanReport, dry_run: bool) {
    if !report.changed {
        println!("\n{}", "Nothing to remove.".green());
        return;
    }

    let verb = if dry_run { "Would remove" } else { "Removed" };
    println!(
        "\n{} {} page(s), {} of {} blocks",
        verb.yellow(),
        report.removed_pages.len(),
        report.blocks_before.saturating_sub(report.blocks_after),
        report.blocks_before
    );
    for page in &report.removed_pages {
        println!(
            "  {} #{} ({}, ~page {})",
            "├─".dimmed(),
            page.index + 1,
            page.classification,
            page.page_estimate
        );
    }
    if report.removed_runs > 0 {
        println!("{} {} blank run(s)", verb.yellow(), report.removed_runs);
    }

    if let Some(ref backup) = report.backup {
        println!("{} {}", "Backup created:".green(), backup.display());
    }
    if report.written {
        println!("{} {}", "Saved:".green().bold(), input.display());
    }
}

fn cmd_version() {
    println!("{} {}", "unblank".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("DOCX empty page remover");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/unblank".dimmed());
    println!("License: MIT");
}
