// Plain-string formatting primitives: indentation, word wrap, escaping

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+[ \t]+|\S+\n|\n").expect("valid token regex"));

/// Width of `text` as it appears on a terminal, ignoring ANSI escape sequences.
pub fn visible_width(text: &str) -> usize {
    console::measure_text_width(text)
}

/// Strip ANSI styling sequences.
pub fn remove_tty_colors(text: &str) -> Cow<'_, str> {
    console::strip_ansi_codes(text)
}

/// Prefix every non-blank line of `text` with `width` spaces.
///
/// Blank and whitespace-only lines are left as they are, so indenting an
/// empty string yields an empty string.
pub fn indent_string(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    let pad = " ".repeat(width);
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reflow `text` so that no line is wider than `width` visible columns,
/// counting the `indent` spaces each line is prefixed with.
///
/// Text that already fits is only indented. Otherwise it is split into
/// tokens that keep their trailing whitespace and packed greedily, so
/// alignment inside a line survives. A token wider than the available
/// space occupies its own line. Existing line breaks are kept.
pub fn word_wrap(text: &str, indent: usize, width: usize) -> String {
    let available = width.saturating_sub(indent);
    if measured_len(text) <= available {
        return indent_string(text, indent);
    }

    let normalized = text.replace("\r\n", "\n");
    let mut wrapped = String::with_capacity(normalized.len());
    let mut current = String::new();

    for token in tokens(&normalized) {
        if current.ends_with('\n') {
            wrapped.push_str(&current);
            current.clear();
        }

        if !current.is_empty() && measured_len(&current) + measured_len(token) > available {
            wrapped.push_str(&current);
            wrapped.push('\n');
            current.clear();
        }
        current.push_str(token);
    }
    wrapped.push_str(&current);

    indent_string(&wrapped, indent)
}

/// Split `text` into consecutive tokens: a word with its trailing blanks,
/// a word ending a line, a bare line break, or a run of leading blanks.
/// The tokens concatenate back to `text`.
fn tokens(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut last = 0;

    for m in TOKEN_RE.find_iter(text) {
        if m.start() > last {
            out.push(&text[last..m.start()]);
        }
        out.push(m.as_str());
        last = m.end();
    }
    if last < text.len() {
        out.push(&text[last..]);
    }

    out
}

/// Visible width with each line break counted as one column.
fn measured_len(text: &str) -> usize {
    text.split('\n').map(visible_width).sum::<usize>() + text.matches('\n').count()
}

/// Escape the characters that are significant in HTML markup.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_string_zero_is_noop() {
        assert_eq!(indent_string("a\nb", 0), "a\nb");
    }

    #[test]
    fn test_indent_string_skips_blank_lines() {
        assert_eq!(indent_string("a\n\nb", 2), "  a\n\n  b");
        assert_eq!(indent_string("", 4), "");
    }

    #[test]
    fn test_word_wrap_breaks_on_words() {
        let wrapped = word_wrap("the quick brown fox", 0, 10);
        assert_eq!(wrapped, "the quick \nbrown fox");
    }

    #[test]
    fn test_word_wrap_counts_indent() {
        let wrapped = word_wrap("aaa bbb ccc", 2, 9);
        assert_eq!(wrapped, "  aaa \n  bbb ccc");
    }

    #[test]
    fn test_word_wrap_long_word_overflows() {
        let wrapped = word_wrap("a verylongword b", 0, 5);
        assert_eq!(wrapped, "a \nverylongword \nb");
    }

    #[test]
    fn test_word_wrap_ignores_ansi_in_width() {
        let styled = console::Style::new().red().force_styling(true);
        let text = format!("{} {}", styled.apply_to("abc"), styled.apply_to("def"));
        let wrapped = word_wrap(&text, 0, 7);
        assert!(!wrapped.contains('\n'));
    }

    #[test]
    fn test_word_wrap_keeps_fitting_text() {
        let frame = "   11 |    await t.click('#a')";
        assert_eq!(word_wrap(frame, 0, 80), frame);
        assert_eq!(word_wrap(frame, 2, 80), format!("  {frame}"));
    }

    #[test]
    fn test_word_wrap_keeps_alignment_when_wrapping() {
        let text = "    a  b\n  c d";
        assert_eq!(word_wrap(text, 0, 8), "    a  \nb\n  c d");
    }

    #[test]
    fn test_tokens_concatenate_back() {
        let text = "  lead  double\tword\n\nlast";
        assert_eq!(tokens(text).concat(), text);
        assert_eq!(
            tokens(text),
            vec!["  ", "lead  ", "double\t", "word\n", "\n", "last"]
        );
    }

    #[test]
    fn test_word_wrap_empty() {
        assert_eq!(word_wrap("", 3, 10), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">Tom & Jerry's</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_remove_tty_colors() {
        let styled = console::Style::new().bold().force_styling(true);
        let text = styled.apply_to("hi").to_string();
        assert_ne!(text, "hi");
        assert_eq!(remove_tty_colors(&text), "hi");
        assert_eq!(visible_width(&text), 2);
    }
}
