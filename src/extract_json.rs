use memchr::memchr;
use simd_json::OwnedValue;
use tracing::debug;

/// Outcome of looking for the player record inside a finished stream buffer.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// The buffer never contained a `{`.
    NoCandidate,
    /// At least one `{` was seen but nothing from it parsed as a JSON object.
    Unparseable,
    Parsed(OwnedValue),
}

/// Returns the first balanced `{...}` span at or after the first `{`, and the
/// number of bytes consumed up to the end of that span.
pub fn extract_json(bytes: &[u8]) -> Option<(&[u8], usize)> {
    let start = memchr(b'{', bytes)?;
    let (json, consumed) = balanced_object(&bytes[start..])?;
    Some((json, start + consumed))
}

/// Scans `text` for top-level JSON objects, starting at the first `{`.
///
/// Every balanced span is tried in order; the last one that parses wins.
/// Spans that fail to parse are skipped whole, so a broken outer object never
/// yields one of its nested objects. A `{` that never closes is passed over and
/// the scan resumes at the next byte, so a stray brace in the preamble cannot
/// hide a record after it.
pub fn find_player_json(text: &str) -> Extraction {
    let bytes = text.as_bytes();
    let Some(mut cursor) = memchr(b'{', bytes) else {
        return Extraction::NoCandidate;
    };

    let mut last = None;
    while let Some(offset) = memchr(b'{', &bytes[cursor..]) {
        let start = cursor + offset;
        let Some((span, len)) = balanced_object(&bytes[start..]) else {
            debug!(offset = start, "unterminated JSON object, skipping brace");
            cursor = start + 1;
            continue;
        };
        match parse_candidate(span) {
            Ok(value) => last = Some(value),
            Err(e) => debug!(offset = start, error = %e, "skipping unparseable JSON candidate"),
        }
        cursor = start + len;
    }

    match last {
        Some(value) => Extraction::Parsed(value),
        None => Extraction::Unparseable,
    }
}

fn parse_candidate(span: &[u8]) -> Result<OwnedValue, simd_json::Error> {
    // simd_json parses in place
    let mut candidate = span.to_vec();
    simd_json::to_owned_value(&mut candidate)
}

fn balanced_object(bytes: &[u8]) -> Option<(&[u8], usize)> {
    if bytes.first() != Some(&b'{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape = false;

    for (i, &c) in bytes.iter().enumerate() {
        match (in_string, escape, c) {
            (true, false, b'\\') => escape = true,
            (true, true, _) => escape = false,
            (true, false, b'"') => in_string = false,
            (false, _, b'"') => in_string = true,
            (false, _, b'{') => depth += 1,
            (false, _, b'}') => {
                depth -= 1;
                if depth == 0 {
                    return Some((&bytes[..=i], i + 1));
                }
            }
            _ => {}
        }
    }

    None
}
