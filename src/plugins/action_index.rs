// Action index extraction from rendered error text
//
// The rendered code frame marks the failing line as ` > N |` (see the
// `div code-line-num-base` decoration), so the `|` sits four or five
// characters after the `>` for one- and two-digit line numbers. The index
// itself is read after the product token that prefixes recorded steps.

/// Rendered call that opens every recorded script.
pub const CALL_MARKER: &str = ".maximizeWindow()";

/// Token that precedes the step number in recorded scripts.
pub const PRODUCT_MARKER: &str = "ReadyTest";

/// Read the failing step's index out of a rendered error.
///
/// Returns `Some(0)` when no code-frame marker follows the opening call, and
/// `None` when a marker was found but the two characters after
/// [`PRODUCT_MARKER`] are not a number.
///
/// Positions are counted in characters (Unicode scalar values), not in
/// the UTF-16 code units a JavaScript runner counts; the two disagree only
/// when an astral-plane character such as an emoji precedes the marker.
/// If [`CALL_MARKER`] is missing the scan starts at `CALL_MARKER.len() - 1`,
/// as if the marker sat at -1.
pub fn extract_action_index(error: &str) -> Option<i64> {
    let chars: Vec<char> = error.chars().collect();
    let marker_len = CALL_MARKER.chars().count();

    let start = match index_of(&chars, CALL_MARKER, 0) {
        Some(found) => found + marker_len,
        None => marker_len - 1,
    };

    for i in start..=chars.len() {
        let is_frame_marker = chars.get(i) == Some(&'>')
            && (chars.get(i + 5) == Some(&'|') || chars.get(i + 4) == Some(&'|'));

        if !is_frame_marker {
            continue;
        }

        let from = match index_of(&chars, PRODUCT_MARKER, i) {
            Some(found) => found + PRODUCT_MARKER.chars().count(),
            None => PRODUCT_MARKER.chars().count() - 1,
        };
        let digits: String = chars.iter().skip(from).take(2).collect();
        return parse_int(digits.trim());
    }

    Some(0)
}

/// First line and third line of `error`, separated by a blank line.
pub fn two_line_message(error: &str) -> String {
    let lines: Vec<&str> = error.split('\n').collect();
    let first = lines.first().copied().unwrap_or_default();
    let third = lines.get(2).copied().unwrap_or_default();
    format!("{first}\n\n{third}\n")
}

fn index_of(haystack: &[char], needle: &str, from: usize) -> Option<usize> {
    let needle: Vec<char> = needle.chars().collect();
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle.as_slice())
        .map(|pos| pos + from)
}

/// Lenient integer parse: optional sign, then leading digits, ignoring
/// anything after them. A `0x` prefix selects hexadecimal.
fn parse_int(text: &str) -> Option<i64> {
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let (radix, digits) = if rest.starts_with("0x") || rest.starts_with("0X") {
        (16, &rest[2..])
    } else {
        (10, rest)
    };

    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map_or(digits.len(), |(idx, _)| idx);

    if end == 0 {
        return None;
    }

    let value = i64::from_str_radix(&digits[..end], radix).ok()?;
    Some(if negative { -value } else { value })
}
