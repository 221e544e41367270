use std::time::Duration;

use depeche_core::{BlockKind, ContentBlock, PageExtraction};
use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Depeche".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Turn news pages into content blocks\n".dimmed());
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

/// Print timing information with color coding
pub fn print_timing(label: &str, duration: Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    let label = format!("{}:", label);

    if ms < 50.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "fast".dimmed());
    } else if ms < 100.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "slow".bright_red());
    }
}

/// Print the layout and primary block counts of an extracted page
pub fn print_page_details(page: &PageExtraction) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Page Details".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("  {} {}", "Layout:".dimmed(), format!("{:?}", page.layout).bright_white());
    eprintln!("  {} {}", "Blocks:".dimmed(), page.blocks.len().to_string().bright_white());

    if let Some(event_id) = &page.live_event_id {
        eprintln!("  {} {}", "Live event:".dimmed(), event_id.bright_white());
    }
    if let Some(uri) = &page.comments_uri {
        eprintln!("  {} {}", "Comments:".dimmed(), uri.bright_white());
    }
    eprintln!();
}

/// Print the number of blocks of each kind
pub fn print_block_summary(blocks: &[ContentBlock]) {
    const KINDS: [BlockKind; 8] = [
        BlockKind::Text,
        BlockKind::Subtitle,
        BlockKind::Image,
        BlockKind::Tweet,
        BlockKind::Fact,
        BlockKind::Live,
        BlockKind::Comment,
        BlockKind::Blank,
    ];

    for kind in KINDS {
        let count = blocks.iter().filter(|block| block.kind() == kind).count();
        if count > 0 {
            eprintln!("  {} {}", format!("{:?}:", kind).dimmed(), count.to_string().bright_white());
        }
    }
}

/// Print timing summary
pub fn print_timing_summary(total: Duration, timings: &[(&str, Duration)]) {
    eprintln!("{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Timing Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    for (label, duration) in timings {
        print_timing(label, *duration);
    }

    eprintln!(
        "  {} {:>8.2}ms\n",
        format!("{}:", "Total").bold().dimmed(),
        total.as_secs_f64() * 1000.0
    );
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
