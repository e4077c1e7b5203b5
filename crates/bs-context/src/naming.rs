/// Display name for an artifact file name.
///
/// Drops the extension, a leading `YYYYMMDD_HHMMSS_` timestamp and turns
/// underscores into spaces.
pub fn pretty_artifact_name(raw: &str) -> String {
    let stem = strip_extension(raw);
    let stem = strip_timestamp(stem);
    stem.replace('_', " ").trim().to_string()
}

fn strip_extension(raw: &str) -> &str {
    match raw.rfind('.') {
        Some(dot) if dot + 1 < raw.len() && !raw[dot + 1..].contains('/') => &raw[..dot],
        _ => raw,
    }
}

fn strip_timestamp(s: &str) -> &str {
    let b = s.as_bytes();
    let digits = |r: std::ops::Range<usize>| b[r].iter().all(u8::is_ascii_digit);
    if b.len() >= 16 && digits(0..8) && b[8] == b'_' && digits(9..15) && b[15] == b'_' {
        &s[16..]
    } else {
        s
    }
}
