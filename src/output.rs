//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored
//! output, progress tracking and the end-of-run summary.

use crate::batch::Summary;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
///
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Dry-run lines (yellow, prefixed)
/// - Progress bars and the summary table
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use renfiles::output::OutputFormatter;
    /// OutputFormatter::success("NZZ_20230405.pdf -> nzz/20230405nzz.pdf");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar for a live run over `total` files.
    ///
    /// The bar draws to stderr and stays hidden when that is not a terminal.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints the end-of-run summary table.
    pub fn summary_table(summary: &Summary, dry_run: bool) {
        Self::header(if dry_run { "DRY RUN SUMMARY" } else { "SUMMARY" });

        let processed_label = if dry_run { "Planned" } else { "Moved" };
        let rows = [
            (processed_label, summary.processed.to_string().green()),
            ("Skipped", summary.skipped.to_string().normal()),
            (
                "Failed",
                if summary.failed > 0 {
                    summary.failed.to_string().red()
                } else {
                    summary.failed.to_string().normal()
                },
            ),
        ];

        let width = rows.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        println!("{}", "-".repeat(width + 10));
        for (name, count) in rows {
            println!("{:<width$} | {}", name, count, width = width);
        }
        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {}",
            "Total".bold(),
            summary.total().to_string().bold(),
            width = width
        );
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}
