//! Text scrubbing for string-valued attributes.
//!
//! Runs over names, font names, and free text before structural validation.
//! Control characters are illegal in the target XML format and some of them
//! crash the consuming editor outright.

use std::borrow::Cow;

/// Remove control characters and trim surrounding whitespace.
///
/// Returns the input unchanged (borrowed) when nothing needs scrubbing.
pub fn scrub_text(text: &str) -> Cow<'_, str> {
    let needs_scrub =
        text.chars().any(|c| c.is_control()) || text != text.trim();
    if !needs_scrub {
        return Cow::Borrowed(text);
    }
    let cleaned: String = text.chars().filter(|c| !c.is_control()).collect();
    Cow::Owned(cleaned.trim().to_string())
}
