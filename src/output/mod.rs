//! Styled terminal output for tfimport
//!
//! Status messages go to stdout, warnings and errors to stderr. HCL produced
//! by `render` without `--output` is printed raw by the command, not through
//! these helpers.

use owo_colors::OwoColorize;

type Rgb = (u8, u8, u8);

const GREEN: Rgb = (152, 225, 152);
const RED: Rgb = (255, 160, 160);
const YELLOW: Rgb = (255, 230, 160);
const BLUE: Rgb = (160, 200, 255);
const LAVENDER: Rgb = (181, 174, 254);
const GREY: Rgb = (160, 160, 160);

fn paint(text: &str, (r, g, b): Rgb) -> String {
    text.truecolor(r, g, b).to_string()
}

fn status(symbol: &str, color: Rgb, message: &str) -> String {
    format!("{} {}", paint(symbol, color).bold(), message.bright_white())
}

pub fn success(message: &str) {
    println!("{}", status("✓", GREEN, message));
}

pub fn error(message: &str) {
    eprintln!("{}", status("✗", RED, message));
}

pub fn warning(message: &str) {
    eprintln!("{}", status("⚠", YELLOW, message));
}

pub fn info(message: &str) {
    println!("{}", status("ℹ", BLUE, message));
}

/// Header followed by a rule as wide as the title
pub fn section(title: &str) {
    println!("\n{}", paint(title, LAVENDER).bold());
    println!("{}", paint(&"─".repeat(title.chars().count().max(20)), GREY));
}

pub fn key_value(key: &str, value: &str) {
    println!("  {} {}", paint(&format!("{}:", key), GREY), value.bright_white());
}

/// Planned resource or declaration, one per line
pub fn list_item(text: &str) {
    println!("  {} {}", paint("+", GREEN), text.bright_white());
}

pub fn dimmed(message: &str) {
    println!("{}", paint(message, GREY));
}

pub fn blank() {
    println!();
}
