//! Natural (numeric-aware) string ordering
//!
//! Bill line items and product listings are displayed sorted by product code.
//! Codes mix letters and numbers ("F9", "F10", "F100"), so a plain
//! lexicographic sort puts "F10" before "F9". This module compares digit runs
//! by numeric value and everything else case-insensitively, which matches the
//! display order operators expect.

use std::cmp::Ordering;

/// Compares two strings in natural ascending order
///
/// Consecutive ASCII digits are grouped and compared as whole numbers;
/// other characters compare case-insensitively. Ties (e.g. "f1" vs "F01")
/// fall back to plain byte order so the comparison stays total and
/// consistent with string equality.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ai = a.char_indices().peekable();
    let mut bi = b.char_indices().peekable();

    loop {
        match (ai.peek().copied(), bi.peek().copied()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some((ap, ac)), Some((bp, bc))) => {
                if ac.is_ascii_digit() && bc.is_ascii_digit() {
                    let an = take_digit_run(a, ap, &mut ai);
                    let bn = take_digit_run(b, bp, &mut bi);
                    match cmp_digit_runs(an, bn) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                } else {
                    match ac
                        .to_ascii_lowercase()
                        .cmp(&bc.to_ascii_lowercase())
                    {
                        Ordering::Equal => {
                            ai.next();
                            bi.next();
                        }
                        other => return other,
                    }
                }
            }
        }
    }
}

/// Consumes a run of consecutive ASCII digits and returns it as a slice
fn take_digit_run<'s>(
    source: &'s str,
    start: usize,
    iter: &mut std::iter::Peekable<std::str::CharIndices<'s>>,
) -> &'s str {
    let mut end = start;
    while let Some(&(pos, ch)) = iter.peek() {
        if ch.is_ascii_digit() {
            end = pos + ch.len_utf8();
            iter.next();
        } else {
            break;
        }
    }
    &source[start..end]
}

/// Compares two digit runs by numeric value
fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');

    // More significant digits means a larger number
    match a_trimmed.len().cmp(&b_trimmed.len()) {
        Ordering::Equal => a_trimmed.cmp(b_trimmed),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut items: Vec<&str>) -> Vec<&str> {
        items.sort_by(|a, b| natural_cmp(a, b));
        items
    }

    #[test]
    fn test_numeric_runs_compare_by_value() {
        assert_eq!(
            sorted(vec!["F100", "F9", "F10"]),
            vec!["F9", "F10", "F100"]
        );
    }

    #[test]
    fn test_plain_strings_sort_case_insensitively() {
        assert_eq!(
            sorted(vec!["banana", "Apple", "cherry"]),
            vec!["Apple", "banana", "cherry"]
        );
    }

    #[test]
    fn test_leading_zeros() {
        // Equal numeric value falls back to byte order, never Equal
        assert_ne!(natural_cmp("A01", "A1"), Ordering::Equal);
        assert_eq!(sorted(vec!["A2", "A01", "A10"]), vec!["A01", "A2", "A10"]);
    }

    #[test]
    fn test_mixed_prefixes() {
        assert_eq!(
            sorted(vec!["B1", "A10", "A2", "B02"]),
            vec!["A2", "A10", "B1", "B02"]
        );
    }

    #[test]
    fn test_equal_only_for_identical() {
        assert_eq!(natural_cmp("F100", "F100"), Ordering::Equal);
        assert_ne!(natural_cmp("f100", "F100"), Ordering::Equal);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn ordering_is_total_and_consistent(a in "[A-Za-z0-9]{0,12}", b in "[A-Za-z0-9]{0,12}") {
            let ab = natural_cmp(&a, &b);
            let ba = natural_cmp(&b, &a);
            prop_assert_eq!(ab, ba.reverse());
            prop_assert_eq!(ab == Ordering::Equal, a == b);
        }

        #[test]
        fn sort_is_idempotent(mut items in proptest::collection::vec("[A-Za-z0-9]{0,8}", 0..20)) {
            items.sort_by(|a, b| natural_cmp(a, b));
            let once = items.clone();
            items.sort_by(|a, b| natural_cmp(a, b));
            prop_assert_eq!(once, items);
        }
    }
}
