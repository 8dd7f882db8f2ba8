//! String utilities for the domain layer.

/// Truncate a string to a maximum length with ellipsis (UTF-8 safe)
///
/// Uses byte length for max_len but ensures truncation occurs at valid
/// UTF-8 character boundaries.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let target = max_len.saturating_sub(3);
        let mut end = target.min(s.len());
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &s[..end])
    }
}

/// Check that `bytes` decode as UTF-8 and that re-encoding the decoded text
/// reproduces the input byte-for-byte.
///
/// Generalized encodings of unpaired surrogates (`ED A0 80` ..= `ED BF BF`)
/// are rejected by the decoder, so text that originated as ill-formed UTF-16
/// never passes.
pub fn is_round_trip_utf8(bytes: &[u8]) -> bool {
    match std::str::from_utf8(bytes) {
        Ok(decoded) => decoded.as_bytes() == bytes,
        Err(_) => false,
    }
}

/// Check that already-decoded text carries no decoding scars.
///
/// U+FFFD marks a lossy decode somewhere upstream; U+FFFE and U+FFFF are
/// noncharacters that must not appear in interchange text.
pub fn is_clean_text(s: &str) -> bool {
    !s.chars()
        .any(|c| matches!(c, '\u{FFFD}' | '\u{FFFE}' | '\u{FFFF}'))
}
