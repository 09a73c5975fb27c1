//! Search-phrase derivation from ticket subjects.

/// Derive the drive search phrase from a ticket subject.
///
/// Drops a fixed-length leading token (the alerting system's tag, e.g.
/// `NETXP`), strips a trailing marker such as `[UPDATED]` and an optional
/// leading marker, and trims the remainder.
pub fn derive_search_phrase(
    subject: &str,
    prefix_len: usize,
    trailing_marker: &str,
    leading_marker: Option<&str>,
) -> String {
    let rest: String = subject.chars().skip(prefix_len).collect();
    let rest = rest.trim();
    let rest = if !trailing_marker.is_empty() {
        rest.strip_suffix(trailing_marker).unwrap_or(rest)
    } else {
        rest
    };
    let rest = match leading_marker {
        Some(marker) if !marker.is_empty() => rest.strip_prefix(marker).unwrap_or(rest),
        _ => rest,
    };
    rest.trim().to_string()
}
