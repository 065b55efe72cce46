/// Escapes text for a Markdown table cell or inline position.
pub fn markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '|' | '*' | '_' | '`' | '[' | ']' | '<' | '>' | '#' => {
                out.push('\\');
                out.push(c);
            }
            '\r' => {}
            '\n' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

/// Text inside backticks cannot be escaped, so backticks are swapped for quotes.
pub fn code_span(text: &str) -> String {
    text.replace('`', "'")
}

/// Escapes a string for use in DOT HTML-like labels.
pub fn html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Quotes a string as a DOT identifier or attribute value.
pub fn dot_quoted(text: &str) -> String {
    format!(
        "\"{}\"",
        text.replace('\\', "\\\\")
            .replace('"', "\\\"")
            .replace('\n', "\\n")
    )
}

/// Backtick-quotes a label or relationship type for interpolation into Cypher.
pub fn cypher_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
