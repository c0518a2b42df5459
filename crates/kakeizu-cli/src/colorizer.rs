//! Terminal rendering of generation rows
//!
//! One line per generation, names padded to a common display width so CJK
//! text lines up. Colors come from crossterm.

use crossterm::style::{Color, Stylize};
use unicode_width::UnicodeWidthStr;

use kakeizu::tree::{label, Person, Sex};

const CELL_GAP: &str = "  ";

/// Color of a person's name by recorded sex
pub fn sex_color(sex: Sex) -> Option<Color> {
    match sex {
        Sex::Man => Some(Color::Blue),
        Sex::Woman => Some(Color::Red),
        Sex::Unknown => None,
    }
}

/// Pad `text` with spaces up to `width` terminal columns
pub fn pad_to_width(text: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(used)))
}

/// Render rows of people as aligned text, optionally colored
///
/// Trailing padding is trimmed from each line.
pub fn render_rows(rows: &[Vec<&Person>], colored: bool) -> String {
    let labels: Vec<Vec<(String, Sex)>> = rows
        .iter()
        .map(|row| row.iter().map(|p| (label(p), p.sex())).collect())
        .collect();
    let width = labels
        .iter()
        .flatten()
        .map(|(text, _)| UnicodeWidthStr::width(text.as_str()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for row in &labels {
        let last = row.len().saturating_sub(1);
        for (i, (text, sex)) in row.iter().enumerate() {
            let cell = if i == last {
                text.clone()
            } else {
                pad_to_width(text, width)
            };
            match sex_color(*sex).filter(|_| colored) {
                Some(color) => out.push_str(&format!("{}", cell.with(color))),
                None => out.push_str(&cell),
            }
            if i != last {
                out.push_str(CELL_GAP);
            }
        }
        out.push('\n');
    }
    out
}
