use crate::cli::{Cli, OutputFormat};
use crate::report::render::{render_json, render_text, render_tsv};
use crate::tally::engine::{CountSummary, CountingEngine};

/// Execute a count for the patient named on the command line
///
/// # Errors
///
/// Returns an error if no record files are found, the patient cannot be
/// resolved, or the report cannot be serialized.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let query = cli
        .query()
        .ok_or_else(|| anyhow::anyhow!("Please enter FirstName LastName or ID as args"))?;
    let config = cli.scan_config();

    if cli.verbose {
        eprintln!(
            "Scanning {} for {query} ({:?} matching)",
            config.root.display(),
            config.match_mode
        );
    }

    let summary = CountingEngine::new(&config).run(&query)?;

    if cli.verbose {
        print_stats(&summary);
    }
    if let Some(e) = &summary.identity_warning {
        eprintln!("Warning: patient name unavailable ({e}); counting by ID only.");
    }
    if !summary.warnings.is_empty() {
        eprintln!(
            "Warning: {} file(s) and {} line(s) were skipped; see messages above.",
            summary.stats.files_skipped, summary.stats.malformed_lines
        );
    }

    let identity = &summary.identity;
    match cli.format {
        OutputFormat::Text => print!(
            "{}",
            render_text(&summary.ranked, &identity.id, &identity.display_name)
        ),
        OutputFormat::Json => println!(
            "{}",
            render_json(&summary.ranked, &identity.id, &identity.display_name)?
        ),
        OutputFormat::Tsv => print!("{}", render_tsv(&summary.ranked)),
    }

    Ok(())
}

fn print_stats(summary: &CountSummary) {
    let stats = &summary.stats;
    eprintln!(
        "Scanned {} file(s), {} line(s): {} contained the ID, {} counted",
        stats.files_scanned, stats.lines_read, stats.prefilter_hits, stats.matches
    );
    if stats.rejected_references > 0 {
        eprintln!(
            "{} line(s) mentioned the ID without referencing the patient",
            stats.rejected_references
        );
    }
    for path in &summary.files {
        eprintln!("  {}", path.display());
    }
}
