//! The element trait shared by every part of the rendered view.

use gridvis_core::{Event, Intent};

/// A renderable, interactive element.
///
/// Rendering must be deterministic: the same element always produces the
/// same HTML.
pub trait Widget {
    /// Generate HTML for this element.
    fn to_html(&self) -> String;

    /// CSS rules scoped to this element's classes.
    fn to_css(&self) -> String {
        String::new()
    }

    /// Map a UI event aimed at this element to an intent.
    ///
    /// Returns `None` when the event targets something else or carries a
    /// value the element does not offer.
    fn event(&self, event: &Event) -> Option<Intent> {
        let _ = event;
        None
    }

    /// Get the test ID for DOM queries.
    fn test_id(&self) -> Option<&str> {
        None
    }
}

/// Escape text for use in HTML content and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
