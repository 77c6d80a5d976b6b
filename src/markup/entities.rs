/*!
 * Character escaping for markup output.
 */

/// Escape text so it cannot be read back as markup.
///
/// `&` is escaped as well so that literal reference text in an utterance
/// survives a decode.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape an attribute value for use inside double quotes
pub fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
