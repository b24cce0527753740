//! Emoji to text replacement
//!
//! Each emoji is rewritten as `:cldr_name:` (😀 becomes `:grinning_face:`) so
//! that its meaning survives the letters-only filter further down the
//! pipeline as ordinary words.

use std::borrow::Cow;

/// Longest emoji sequence in code points (ZWJ families with skin tones)
const MAX_EMOJI_CHARS: usize = 10;

/// Replace every emoji in `text` with its bracketed CLDR name
pub fn demojize(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }

    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_count = boundaries.len() - 1;

    let mut out = String::with_capacity(text.len() + 16);
    let mut i = 0;

    while i < char_count {
        let start = boundaries[i];
        let next = boundaries[i + 1];

        // Keycap sequences start with an ASCII char, so only skip the lookup
        // when the following char is ASCII too.
        let ascii_run = text.as_bytes()[start].is_ascii()
            && (next == text.len() || text.as_bytes()[next].is_ascii());
        if ascii_run {
            out.push_str(&text[start..next]);
            i += 1;
            continue;
        }

        let longest = (i + MAX_EMOJI_CHARS).min(char_count);
        let found = (i + 1..=longest)
            .rev()
            .find_map(|j| emojis::get(&text[start..boundaries[j]]).map(|emoji| (j, emoji)));

        match found {
            Some((end, emoji)) => {
                push_alias(&mut out, emoji.name());
                i = end;
            }
            None => {
                out.push_str(&text[start..next]);
                i += 1;
            }
        }
    }

    Cow::Owned(out)
}

/// Flags are named after the region alone, without the CLDR `flag: ` prefix
fn push_alias(out: &mut String, name: &str) {
    let name = name.strip_prefix("flag: ").unwrap_or(name);
    out.push(':');
    for c in name.chars() {
        out.push(if c.is_whitespace() { '_' } else { c });
    }
    out.push(':');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passthrough() {
        let text = "No emoji here: 100% plain <b>text</b>";
        assert!(matches!(demojize(text), Cow::Borrowed(_)));
        assert_eq!(demojize(text), text);
    }

    #[test]
    fn test_single_emoji() {
        assert_eq!(demojize("hi 😀"), "hi :grinning_face:");
    }

    #[test]
    fn test_adjacent_emoji_and_text() {
        let out = demojize("win💰now🔥");
        assert!(out.starts_with("win:"));
        assert!(out.contains("now:"));
        assert!(!out.contains('💰'));
        assert!(!out.contains('🔥'));
    }

    #[test]
    fn test_skin_tone_sequence_is_one_emoji() {
        let out = demojize("👍🏽");
        assert!(out.starts_with(":thumbs_up"), "got {out}");
        assert!(out.ends_with(':'));
        assert!(out.is_ascii());
    }

    #[test]
    fn test_flag_uses_region_name() {
        assert_eq!(demojize("🇺🇸"), ":United_States:");
        assert_eq!(demojize("go 🇫🇷!"), "go :France:!");
    }

    #[test]
    fn test_non_emoji_unicode_kept() {
        assert_eq!(demojize("café naïve"), "café naïve");
    }
}
