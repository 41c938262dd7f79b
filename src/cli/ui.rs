//! Terminal styling shared by the human-readable commands

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

const BOX_WIDTH: usize = 62;

// ANSI color codes from design system
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const PRIMARY: &str = "\x1b[38;2;100;181;246m"; // #64B5F6
    pub const SUCCESS: &str = "\x1b[38;2;165;214;167m"; // #A5D6A7
    pub const WARNING: &str = "\x1b[38;2;255;245;157m"; // #FFF59D
    pub const ERROR: &str = "\x1b[38;2;239;154;154m"; // #EF9A9A
    pub const AI_ACCENT: &str = "\x1b[38;2;255;202;40m"; // #FFCA28
    pub const MUTED: &str = "\x1b[38;2;84;110;122m"; // #546E7A
    pub const FG: &str = "\x1b[38;2;212;212;215m"; // #D4D4D7
}

pub mod symbols {
    pub const LOADING: &str = "󰊍";
    pub const SUCCESS: &str = "󰄂";
    pub const WARNING: &str = "⚠";
    pub const ERROR: &str = "󰅚";
}

/// Opening line of a box, `╭─ icon title ───╮`
pub fn box_top(color: &str, icon: &str, title: &str) {
    let used = 4 + icon.chars().count() + title.chars().count();
    let fill = "─".repeat(BOX_WIDTH.saturating_sub(used));
    println!("{}{}╭─ {} {} {}╮{}", color, colors::BOLD, icon, title, fill, colors::RESET);
}

pub fn box_blank(color: &str) {
    println!("{}│{}{}│{}", color, " ".repeat(BOX_WIDTH), color, colors::RESET);
}

/// A `label: value` row; `value_color` tints the value
pub fn box_row(color: &str, label: &str, value: &str, value_color: &str) {
    let text = format!("  {:<17}{}", format!("{}:", label), value);
    let pad = BOX_WIDTH.saturating_sub(text.chars().count());
    println!(
        "{}│{}  {}{:<17}{}{}{}{}{}{}│{}",
        color,
        colors::RESET,
        colors::MUTED,
        format!("{}:", label),
        colors::RESET,
        value_color,
        value,
        colors::RESET,
        " ".repeat(pad),
        color,
        colors::RESET
    );
}

/// Free text row, truncated to fit
pub fn box_text(color: &str, text_color: &str, text: &str) {
    let text = truncate(text, BOX_WIDTH - 4);
    let pad = BOX_WIDTH.saturating_sub(text.chars().count() + 2);
    println!(
        "{}│{}  {}{}{}{}{}│{}",
        color,
        colors::RESET,
        text_color,
        text,
        colors::RESET,
        " ".repeat(pad),
        color,
        colors::RESET
    );
}

pub fn box_bottom(color: &str) {
    println!("{}╰{}╯{}", color, "─".repeat(BOX_WIDTH), colors::RESET);
}

/// Header printed before a repository is loaded
pub fn print_header(path: &Path, mode: &str) {
    println!();
    box_top(colors::PRIMARY, symbols::LOADING, "nexus-ctx");
    box_blank(colors::PRIMARY);
    box_row(colors::PRIMARY, "Target", &truncate_path(path, 40), colors::FG);
    box_row(colors::PRIMARY, "Mode", mode, colors::MUTED);
    box_blank(colors::PRIMARY);
    box_bottom(colors::PRIMARY);
    println!();
}

pub fn print_warning(message: &str) {
    println!(
        "\n{}  {} {}{}",
        colors::WARNING,
        symbols::WARNING,
        message,
        colors::RESET
    );
}

/// Create a styled progress bar
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);

    let style = ProgressStyle::default_bar()
        .template("{spinner:.cyan} {prefix:.bold} [{bar:40.cyan/dim}] {pos}/{len} {msg:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓░")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
    pb.set_style(style);

    pb.set_prefix("Loading");
    pb.enable_steady_tick(std::time::Duration::from_millis(80));

    pb
}

/// Truncate a path for display, keeping its tail
pub fn truncate_path(path: &Path, max_len: usize) -> String {
    let s = path.display().to_string();
    let len = s.chars().count();
    if len <= max_len {
        s
    } else {
        let tail: String = s.chars().skip(len - max_len + 3).collect();
        format!("...{}", tail)
    }
}

fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
