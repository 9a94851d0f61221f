//! Console output for `remocon check` and `remocon drain`.

use std::io::IsTerminal;

const DESCRIPTION_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Warn,
    Error,
    Ok,
}

impl Tone {
    fn plain_tag(self) -> &'static str {
        match self {
            Tone::Info => "INFO:",
            Tone::Warn => "WARN:",
            Tone::Error => "ERROR:",
            Tone::Ok => "OK:",
        }
    }

    /// Glyph wrapped in its SGR colour code.
    fn styled_tag(self) -> &'static str {
        match self {
            Tone::Info => "\x1b[1;36mℹ\x1b[0m",
            Tone::Warn => "\x1b[1;33m⚠\x1b[0m",
            Tone::Error => "\x1b[1;31m✗\x1b[0m",
            Tone::Ok => "\x1b[1;32m✓\x1b[0m",
        }
    }
}

/// Colour only when the stream is a terminal and `NO_COLOR` is unset.
fn use_color(is_terminal: bool) -> bool {
    is_terminal && std::env::var_os("NO_COLOR").is_none()
}

fn line(tone: Tone, message: &str, color: bool) -> String {
    let tag = if color { tone.styled_tag() } else { tone.plain_tag() };
    format!("{tag} {message}")
}

/// Print a one-line note. Errors go to stderr.
pub fn note(tone: Tone, message: &str) {
    if tone == Tone::Error {
        eprintln!("{}", line(tone, message, use_color(std::io::stderr().is_terminal())));
    } else {
        println!("{}", line(tone, message, use_color(std::io::stdout().is_terminal())));
    }
}

/// One registry entry as shown by `remocon check`.
pub struct ListingRow {
    pub name: String,
    pub kind: &'static str,
    pub description: String,
}

/// Numbered, column-aligned listing of registry entries in registry order.
/// Descriptions longer than the column are cut with `…`.
pub fn render_listing(rows: &[ListingRow]) -> String {
    let number_width = rows.len().to_string().len();
    let name_width = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0).max(4);
    let kind_width = rows.iter().map(|r| r.kind.len()).max().unwrap_or(0).max(4);

    let mut out = format!(
        "{:>number_width$}  {:<name_width$}  {:<kind_width$}  Description\n",
        "#", "Name", "Kind"
    );
    for (i, row) in rows.iter().enumerate() {
        let entry = format!(
            "{:>number_width$}  {:<name_width$}  {:<kind_width$}  {}",
            i + 1,
            row.name,
            row.kind,
            shorten(&row.description, DESCRIPTION_WIDTH)
        );
        out.push_str(entry.trim_end());
        out.push('\n');
    }
    out
}

fn shorten(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}
