//! Text normalization prior to pattern matching.

/// Normalize raw document text for field extraction.
///
/// Newline runs collapse into a single padded `\n` token so that line-break
/// semantics survive while single-line patterns keep scanning across the
/// document. Characters outside the ASCII range become spaces, and remaining
/// whitespace runs collapse to single spaces.
///
/// Stripping non-ASCII characters removes Arabic script entirely, so any
/// pattern that relies on Arabic labels must run against the raw text
/// instead (the orchestrator does exactly that for currency detection).
pub fn normalize_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    let mut pending_newline = false;

    for ch in text.chars() {
        let ch = if ch.is_ascii() { ch } else { ' ' };

        if ch == '\n' || ch == '\r' {
            pending_newline = true;
            pending_space = false;
        } else if ch.is_ascii_whitespace() {
            pending_space = true;
        } else {
            if pending_newline {
                if !out.is_empty() {
                    out.push_str(" \n ");
                }
                pending_newline = false;
            } else if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(ch);
        }
    }

    out
}
