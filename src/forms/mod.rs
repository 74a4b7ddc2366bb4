pub mod admin;
pub mod auth;
pub mod cart;
pub mod products;

/// Collapses runs of whitespace and strips control characters.
pub(crate) fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());

    for word in input.split_whitespace() {
        if !sanitized.is_empty() {
            sanitized.push(' ');
        }
        sanitized.extend(word.chars().filter(|ch| !ch.is_control()));
    }

    sanitized
}

/// Trims each line and drops leading/trailing blank lines.
pub(crate) fn sanitize_multiline_text(input: &str) -> String {
    let lines: Vec<String> = input.lines().map(sanitize_inline_text).collect();

    let start = lines.iter().position(|line| !line.is_empty());
    let end = lines.iter().rposition(|line| !line.is_empty());

    match (start, end) {
        (Some(start), Some(end)) => lines[start..=end].join("\n"),
        _ => String::new(),
    }
}
