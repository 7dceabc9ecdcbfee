//! Text normalizer — folds attribute text and queries into a common matching
//! form.
//!
//! Place names in GIS exports vary in case, separators, and punctuation
//! ("Nyanya-Karshi Road" vs "nyanya_karshi road"). Both the index builder and
//! the matcher pass text through [`normalize`] so those variants compare
//! equal. The normalized form is used only for matching; display always shows
//! the raw value.

/// Normalize text for matching.
///
/// Transform, in order: lowercase; replace each `-`/`_` with a space; drop
/// every character outside `[a-z0-9 ]`; collapse runs of spaces; trim.
///
/// Total (never fails) and idempotent: `normalize(normalize(x)) ==
/// normalize(x)` for all `x`.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        let c = match c {
            '-' | '_' => ' ',
            c => c.to_ascii_lowercase(),
        };
        match c {
            ' ' => {
                // Deferred until the next kept character, which both
                // collapses runs and trims the leading edge.
                if !out.is_empty() {
                    pending_space = true;
                }
            }
            'a'..='z' | '0'..='9' => {
                if pending_space {
                    out.push(' ');
                    pending_space = false;
                }
                out.push(c);
            }
            _ => {}
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
