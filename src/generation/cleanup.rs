//! Placeholder cleanup.
//!
//! Safety net behind the injector: known placeholders get canned default
//! prose, anything else shaped like `{{...}}` is deleted outright, and the
//! whitespace left behind is collapsed. The pass is idempotent on purpose
//! since callers run it more than once as defense in depth.

use lazy_static::lazy_static;
use regex::Regex;

use super::templates::DEFAULT_PLACEHOLDER_PROSE;

lazy_static! {
    /// Catch-all for any remaining token, regardless of name.
    static ref PLACEHOLDER_RE: Regex = Regex::new(r"\{\{[^{}]*\}\}").unwrap();
    /// Lines containing only spaces or tabs.
    static ref WHITESPACE_LINE_RE: Regex = Regex::new(r"(?m)^[ \t]+$").unwrap();
    /// Runs of three or more newlines.
    static ref EXCESS_NEWLINES_RE: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Replace known placeholders with default prose, strip every remaining
/// `{{...}}` token, and collapse the resulting whitespace.
///
/// Guaranteed idempotent: `cleanup(cleanup(s)) == cleanup(s)`.
pub fn cleanup(input: &str) -> String {
    let mut output = input.to_string();

    for (name, prose) in DEFAULT_PLACEHOLDER_PROSE {
        let needle = format!("{{{{{}}}}}", name);
        if output.contains(&needle) {
            output = output.replace(&needle, prose);
        }
    }

    // Stripping an inner token can make the surrounding braces form a new
    // one, so the catch-all runs to a fixpoint.
    while PLACEHOLDER_RE.is_match(&output) {
        output = PLACEHOLDER_RE.replace_all(&output, "").into_owned();
    }
    let output = WHITESPACE_LINE_RE.replace_all(&output, "");
    let output = EXCESS_NEWLINES_RE.replace_all(&output, "\n\n");

    output.trim().to_string()
}

/// Unconditional last resort: delete every brace pair that could still
/// render as template syntax. Only invoked after a post-cleanup scan still
/// finds `{{`, which is logged as a warning by the caller.
pub fn force_strip(input: &str) -> String {
    input.replace("{{", "").replace("}}", "").trim().to_string()
}
