//! Output delta resolution.

/// Extract the slot delta encoded in a run folder name (`..._D15_...`).
///
/// A `D<digits>` token delimited by `_`, `-` or the string edges wins;
/// otherwise the first `D<digits>` anywhere is used. Matching is
/// case-insensitive and only positive values are returned.
pub fn parse_delta_from_run_id(run_id: &str) -> Option<u32> {
    let bytes = run_id.as_bytes();
    let is_delim = |b: u8| b == b'_' || b == b'-';
    let mut first_loose: Option<&str> = None;

    for (i, b) in bytes.iter().enumerate() {
        if !b.eq_ignore_ascii_case(&b'D') {
            continue;
        }
        let start = i + 1;
        let end = bytes[start..]
            .iter()
            .position(|c| !c.is_ascii_digit())
            .map_or(bytes.len(), |p| start + p);
        if end == start {
            continue;
        }

        let digits = &run_id[start..end];
        let before = i == 0 || is_delim(bytes[i - 1]);
        let after = end == bytes.len() || is_delim(bytes[end]);
        if before && after {
            return positive(digits);
        }
        first_loose.get_or_insert(digits);
    }

    first_loose.and_then(positive)
}

fn positive(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().filter(|n| *n > 0)
}

/// Delta used for output addressing. Advanced users may override the input
/// delta; the override only applies when it is a positive integer.
pub fn effective_output_delta(input_delta: u32, advanced: bool, override_text: &str) -> u32 {
    if !advanced {
        return input_delta;
    }
    match override_text.trim().parse::<u32>() {
        Ok(v) if v > 0 => v,
        _ => input_delta,
    }
}
