//! CLI binary for uniresolve.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ResolveConfig`, runs one resolution (or a direct name lookup), and
//! prints the result as a human summary or JSON.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use uniresolve::{
    load_reference_table, lookup_ranking, resolve_student, Resolution, ResolveConfig,
    ResolvedInstitution, StudentDocuments,
};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI definition ───────────────────────────────────────────────────────────

/// Resolve an applicant's home institution from their documents and a
/// ranking workbook.
#[derive(Parser, Debug)]
#[command(name = "uniresolve", version, about)]
struct Cli {
    /// Ranking workbook (XLSX/XLS) with a "Name of Institution" column.
    #[arg(long, env = "UNIRESOLVE_TABLE")]
    table: PathBuf,

    /// Worksheet name (defaults to the first sheet).
    #[arg(long, env = "UNIRESOLVE_SHEET")]
    sheet: Option<String>,

    /// Academic transcript (tried first).
    #[arg(long)]
    transcript: Option<PathBuf>,

    /// Curriculum vitae (tried second).
    #[arg(long)]
    cv: Option<PathBuf>,

    /// Reference letter; may be repeated (tried last, in order).
    #[arg(long = "reference")]
    references: Vec<PathBuf>,

    /// Skip the documents and look up an institution name directly.
    #[arg(long, conflicts_with_all = ["transcript", "cv", "references"])]
    lookup: Option<String>,

    /// List every institution name in the table and exit.
    #[arg(long, conflicts_with_all = ["transcript", "cv", "references", "lookup"])]
    names: bool,

    /// Minimum weighted-keyword score to accept a match.
    #[arg(long, default_value_t = 75.0)]
    threshold: f64,

    /// OCR engine executable.
    #[arg(long, default_value = "tesseract", env = "UNIRESOLVE_OCR_CMD")]
    ocr_cmd: String,

    /// OCR language.
    #[arg(long, default_value = "eng")]
    ocr_lang: String,

    /// Print the result as JSON instead of a human summary.
    #[arg(long)]
    json: bool,

    /// Include the retained raw text in the human summary.
    #[arg(long)]
    show_text: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ResolveConfig::builder()
        .accept_threshold(cli.threshold)
        .ocr_command(&cli.ocr_cmd)
        .ocr_language(&cli.ocr_lang)
        .build()
        .context("invalid configuration")?;

    let table = load_reference_table(&cli.table, cli.sheet.as_deref(), &config)
        .with_context(|| format!("loading ranking table '{}'", cli.table.display()))?;

    // ── Directory listing ────────────────────────────────────────────────
    if cli.names {
        for name in table.unique_names() {
            println!("{name}");
        }
        return Ok(());
    }

    // ── Direct lookup ────────────────────────────────────────────────────
    if let Some(ref name) = cli.lookup {
        return match lookup_ranking(name, &table, None, &config) {
            Some(inst) => {
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&inst)?);
                } else {
                    print_institution(&inst);
                }
                Ok(())
            }
            None => bail!("no institution named '{}' in the table", name),
        };
    }

    // ── Full resolution ──────────────────────────────────────────────────
    if cli.transcript.is_none() && cli.cv.is_none() && cli.references.is_empty() {
        bail!("supply at least one document (--transcript / --cv / --reference) or use --lookup");
    }

    let docs = StudentDocuments {
        transcript: cli.transcript.clone(),
        cv: cli.cv.clone(),
        references: cli.references.clone(),
    };

    let candidates = table.candidate_names();
    let result = resolve_student(&docs, &table, &candidates, &config);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_resolution(&result, cli.show_text);
    }

    Ok(())
}

fn print_resolution(result: &Resolution, show_text: bool) {
    match &result.institution {
        Some(inst) => {
            println!(
                "{} {}  {}",
                green("✓"),
                bold(&inst.name),
                dim(&format!("score {:.1}, via {}", result.score, result.source)),
            );
            print_institution(inst);
        }
        None => {
            println!(
                "{} {}  {}",
                red("✗"),
                bold("No match"),
                dim(&format!(
                    "best score {:.1}, last read: {}",
                    result.score, result.source
                )),
            );
        }
    }

    if show_text || result.institution.is_none() {
        if result.raw_text.is_empty() {
            println!("{}", dim("(no text could be extracted)"));
        } else {
            println!("\n{}", dim("── extracted text ──"));
            println!("{}", result.raw_text);
        }
    }
}

fn print_institution(inst: &ResolvedInstitution) {
    if let Some(ref city) = inst.city {
        println!("  City:  {city}");
    }
    if let Some(ref state) = inst.state {
        println!("  State: {state}");
    }
    if let Some(ref tier1) = inst.tier1 {
        println!("  Tier 1:");
        for (col, val) in tier1 {
            println!("    {col}: {val}");
        }
    }
    if let Some(ref tier2) = inst.tier2 {
        println!("  Tier 2:");
        for (col, val) in tier2 {
            println!("    {col}: {val}");
        }
    }
}
