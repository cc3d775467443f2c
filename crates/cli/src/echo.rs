use owo_colors::OwoColorize;
use retexo_core::{BatchReport, PostInfo};

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Retexo".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Rewrite content store posts from extracted web articles\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Print a post's info summary
pub fn print_post_info(info: &PostInfo) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Post Info".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("  {} {}", "Id:".dimmed(), info.id.to_string().bright_white());
    eprintln!("  {} {}", "Title:".dimmed(), info.title.bright_white());
    eprintln!(
        "  {} {}",
        "Content length:".dimmed(),
        format!("{} chars", info.content_length).bright_white()
    );
    eprintln!(
        "  {} {}",
        "Images:".dimmed(),
        info.images.len().to_string().bright_white()
    );

    for image in &info.images {
        let marker = if image.is_valid() { "✓".green().to_string() } else { "✗".red().to_string() };
        eprintln!("    {} {}", marker, image.src.dimmed());
    }
    eprintln!();
}

/// Print the batch run summary
pub fn print_batch_summary(report: &BatchReport) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Batch Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("  {} {}", "Total:".dimmed(), report.total.to_string().bright_white());
    eprintln!("  {} {}", "Success:".dimmed(), report.success.to_string().bright_green());
    eprintln!("  {} {}", "Failed:".dimmed(), report.failed.to_string().bright_red());

    if report.failed > 0 {
        eprintln!("\n  {}", "Failed jobs:".dimmed());
        for outcome in report.details.iter().filter(|o| !o.success) {
            eprintln!(
                "    {} {} ({})",
                "✗".red(),
                outcome.target_url.bright_white(),
                outcome.mode.dimmed()
            );
            if let Some(error) = &outcome.error {
                eprintln!("      {}", error.dimmed());
            }
        }
    }
    eprintln!();
}
