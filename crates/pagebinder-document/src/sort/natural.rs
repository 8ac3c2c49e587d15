// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Natural sort key — orders `img2` before `img10` by splitting identifiers into
// numeric and text runs.

use std::cmp::Ordering;

/// A maximal run of ASCII digits, compared by numeric value.
///
/// Only `0`-`9` form numbers. Other Unicode decimal digits (full-width,
/// Arabic-Indic, ...) stay part of the surrounding text run.
///
/// The value is kept as its decimal digits with leading zeros stripped, so
/// runs of any length compare correctly without overflow: a shorter run is a
/// smaller number, equal lengths compare digit by digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericRun {
    digits: String,
}

impl NumericRun {
    fn new(raw: &str) -> Self {
        Self {
            digits: raw.trim_start_matches('0').to_string(),
        }
    }
}

impl Ord for NumericRun {
    fn cmp(&self, other: &Self) -> Ordering {
        self.digits
            .len()
            .cmp(&other.digits.len())
            .then_with(|| self.digits.cmp(&other.digits))
    }
}

impl PartialOrd for NumericRun {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One segment of a natural key.
///
/// Variant order is the cross-kind rule: at the same position a numeric
/// segment always sorts before a text segment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Segment {
    Number(NumericRun),
    /// Lowercased text.
    Text(String),
}

/// Ordering key for natural sorting. Keys compare segment by segment; a key
/// that is a prefix of another sorts first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Segment>);

impl NaturalKey {
    /// Build the key for `s`.
    pub fn new(s: &str) -> Self {
        let mut segments = Vec::new();
        let mut start = 0;
        let mut in_digits: Option<bool> = None;

        for (idx, ch) in s.char_indices() {
            let is_digit = ch.is_ascii_digit();
            match in_digits {
                Some(current) if current != is_digit => {
                    segments.push(make_segment(&s[start..idx], current));
                    start = idx;
                }
                _ => {}
            }
            in_digits = Some(is_digit);
        }
        if let Some(current) = in_digits {
            segments.push(make_segment(&s[start..], current));
        }

        Self(segments)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }
}

fn make_segment(run: &str, digits: bool) -> Segment {
    if digits {
        Segment::Number(NumericRun::new(run))
    } else {
        Segment::Text(run.to_lowercase())
    }
}

/// Compare two strings in natural order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    NaturalKey::new(a).cmp(&NaturalKey::new(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_runs_compare_by_value() {
        assert!(NaturalKey::new("img2") < NaturalKey::new("img10"));
        assert!(NaturalKey::new("img10") < NaturalKey::new("img100"));
        // Plain lexical order would say the opposite.
        assert!("img10" < "img2");
    }

    #[test]
    fn text_is_case_folded() {
        assert_eq!(natural_cmp("IMG2.PNG", "img2.png"), Ordering::Equal);
        assert_eq!(natural_cmp("Beta", "alpha"), Ordering::Greater);
    }

    #[test]
    fn leading_zeros_do_not_change_value() {
        assert_eq!(natural_cmp("p007", "p7"), Ordering::Equal);
        assert!(NaturalKey::new("p007") < NaturalKey::new("p8"));
    }

    #[test]
    fn numbers_sort_before_text_at_same_position() {
        assert!(NaturalKey::new("2a") < NaturalKey::new("a2"));
        assert!(NaturalKey::new("100") < NaturalKey::new("_1"));
        // Mismatched structure still compares text first: "img" > "image".
        assert!(NaturalKey::new("img2") > NaturalKey::new("image"));
    }

    #[test]
    fn prefix_sorts_first() {
        assert!(NaturalKey::new("scan") < NaturalKey::new("scan1"));
        assert!(NaturalKey::new("") < NaturalKey::new("a"));
    }

    #[test]
    fn very_long_digit_runs_do_not_overflow() {
        let big = "f99999999999999999999999999999";
        let bigger = "f100000000000000000000000000000";
        assert!(NaturalKey::new(big) < NaturalKey::new(bigger));
    }

    #[test]
    fn segments_follow_input_order() {
        let key = NaturalKey::new("Page12b3");
        assert_eq!(key.segments().len(), 4);
        assert_eq!(key.segments()[0], Segment::Text("page".into()));
        assert!(matches!(key.segments()[1], Segment::Number(_)));
        assert_eq!(key.segments()[2], Segment::Text("b".into()));
    }

    #[test]
    fn non_ascii_digits_are_text() {
        let key = NaturalKey::new("img２");
        assert_eq!(key.segments(), &[Segment::Text("img２".into())]);
        // "img２" is one text run, which sorts after the shorter "img".
        assert_eq!(natural_cmp("img２", "img10"), Ordering::Greater);
    }

    #[test]
    fn non_ascii_text_is_kept() {
        let mut names = vec!["été10", "été2", "Été1"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, vec!["Été1", "été2", "été10"]);
    }
}
