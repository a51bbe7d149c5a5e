//! Greedy word wrap against a caller-supplied width metric.

/// Break `text` into lines no wider than `max_width` as measured by
/// `measure`.
///
/// Tokens are separated by single spaces; no hyphenation and no Unicode
/// line-breaking rules.  A token that alone is wider than `max_width`
/// still gets its own line and overflows it.
pub fn wrap<F>(text: &str, max_width: u32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> u32,
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for token in text.split(' ') {
        let candidate = if current.is_empty() {
            token.to_string()
        } else {
            format!("{current} {token}")
        };

        if measure(&candidate) <= max_width {
            current = candidate;
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = token.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
