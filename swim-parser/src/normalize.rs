//! Repairs whitespace artifacts left behind by PDF text extraction.
//!
//! Some calendar layouts emit one glyph per token, so `"JUN2"` arrives as
//! `"J U N 2"` and `"6:30"` as `"6 : 3 0"`. [`normalize`] folds those runs
//! back together while keeping spaces between real words; [`compact`]
//! drops every space and is meant for short identifiers only.

use std::borrow::Cow;

/// Canonical form of a single line of text. Idempotent.
pub fn normalize(text: &str) -> String {
    let dashed = unify_dashes(text);
    let merged = merge_glyph_runs(&dashed);

    regex!(r"\s*([:\-])\s*")
        .replace_all(&merged, "$1")
        .into_owned()
}

/// Removes all whitespace.
pub fn compact(text: &str) -> String {
    unify_dashes(text)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// True when the text (after compaction) is a bare one- or two-digit number.
pub fn is_day_number(text: &str) -> bool {
    day_number(text).is_some()
}

pub fn day_number(text: &str) -> Option<u32> {
    let compact = compact(text);
    if compact.is_empty() || compact.len() > 2 || !compact.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    compact.parse().ok()
}

fn is_dash(c: char) -> bool {
    matches!(c, '\u{2010}'..='\u{2014}' | '\u{2212}')
}

fn unify_dashes(text: &str) -> Cow<'_, str> {
    if text.contains(is_dash) {
        Cow::Owned(
            text.chars()
                .map(|c| if is_dash(c) { '-' } else { c })
                .collect(),
        )
    } else {
        Cow::Borrowed(text)
    }
}

// Two or more consecutive single-glyph tokens are one word split apart.
fn merge_glyph_runs(text: &str) -> String {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut words: Vec<String> = Vec::with_capacity(tokens.len());

    let mut idx = 0;
    while idx < tokens.len() {
        let run = tokens[idx..]
            .iter()
            .take_while(|token| token.chars().count() == 1)
            .count();

        if run >= 2 {
            words.push(tokens[idx..idx + run].concat());
            idx += run;
        } else {
            words.push(tokens[idx].to_string());
            idx += 1;
        }
    }

    words.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_spaced_glyphs() {
        assert_eq!(normalize("J U N 2  6 - 7 : 3 0 P M"), "JUN26-7:30PM");
        assert_eq!(normalize("M I C C"), "MICC");
    }

    #[test]
    fn keeps_real_word_boundaries() {
        assert_eq!(
            normalize("JUN1 R 11-12:30P MW"),
            "JUN1 R 11-12:30P MW"
        );
        assert_eq!(normalize("  Mary   Wayte Pool "), "Mary Wayte Pool");
    }

    #[test]
    fn tightens_time_separators() {
        assert_eq!(normalize("6 : 30 PM"), "6:30 PM");
        assert_eq!(normalize("6:30 - 8"), "6:30-8");
        assert_eq!(normalize("6 - 8"), normalize("6-8"));
        assert_eq!(normalize("6 – 8"), "6-8");
    }

    #[test]
    fn normalize_is_idempotent() {
        let samples = [
            "J U N 2  6 - 7 : 3 0 P M  M I C C",
            "JUN1 R 11-12:30P MW",
            "AB - C D",
            "Monday , Feb 9 ,  2026",
            "x - y z",
            "",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "input: {sample:?}");
        }
    }

    #[test]
    fn compact_removes_all_whitespace() {
        assert_eq!(compact("JUN1 R 11 - 12:30 P MW"), "JUN1R11-12:30PMW");
        assert_eq!(compact("6\u{2013}7"), "6-7");
    }

    #[test]
    fn recognizes_day_numbers() {
        assert_eq!(day_number(" 7 "), Some(7));
        assert_eq!(day_number("3 1"), Some(31));
        assert_eq!(day_number("2026"), None);
        assert_eq!(day_number("6PM"), None);
        assert!(!is_day_number(""));
    }
}
