//! Formatting utilities used by the HTML pages.

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Small colored label for a tag or group.
pub fn chip(name: &str, color: &str) -> String {
    format!(
        r#"<span class="tag-chip" style="background:{}">{}</span>"#,
        html_escape(color),
        html_escape(name)
    )
}
