//! Page range parsing for the page pickers
//!
//! Free-text input such as `"1-3, 5, 8-10"` is turned into a sorted,
//! deduplicated list of 0-based page indices. Parsing is lenient: tokens that
//! are malformed or out of range contribute nothing and never produce an error.

use std::collections::BTreeSet;

/// Parse a page range string into sorted, deduplicated 0-based page indices.
///
/// # Arguments
/// * `input` - Range string like "1-3, 5, 8-10" (1-based, inclusive), or "all"
/// * `max_pages` - Total pages in the document
///
/// # Examples
/// ```
/// use field_geometry::page_ranges::parse_page_range;
///
/// assert_eq!(parse_page_range("1-3", 10), vec![0, 1, 2]);
/// assert_eq!(parse_page_range("1-3, 2, 5, 999", 6), vec![0, 1, 2, 4]);
/// assert_eq!(parse_page_range("all", 3), vec![0, 1, 2]);
/// ```
pub fn parse_page_range(input: &str, max_pages: usize) -> Vec<usize> {
    let normalized = input.trim().to_lowercase();
    if normalized.is_empty() || normalized == "all" {
        return (0..max_pages).collect();
    }

    let mut pages = BTreeSet::new();

    for part in normalized.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            // Range like "1-3"
            if let (Some(start), Some(end)) = (parse_page_number(start), parse_page_number(end)) {
                let start = start.max(1);
                let end = end.min(max_pages);
                for page in start..=end {
                    pages.insert(page - 1);
                }
            }
        } else if let Some(page) = parse_page_number(part) {
            // Single page like "5"
            if page >= 1 && page <= max_pages {
                pages.insert(page - 1);
            }
        }
    }

    pages.into_iter().collect()
}

/// Collapse 0-based indices into the compact 1-based form, e.g.
/// `[0, 1, 2, 4]` becomes `"1-3, 5"`. Input order and duplicates don't matter.
pub fn format_page_range(indices: &[usize]) -> String {
    let unique: BTreeSet<usize> = indices.iter().copied().collect();
    let mut runs: Vec<(usize, usize)> = Vec::new();

    for index in unique {
        if let Some((_, end)) = runs.last_mut() {
            // Ascending and unique, so `*end < index` and `*end + 1` cannot overflow
            if index == *end + 1 {
                *end = index;
                continue;
            }
        }
        runs.push((index, index));
    }

    runs.iter()
        .map(|&(start, end)| {
            let (first, last) = (start.saturating_add(1), end.saturating_add(1));
            if start == end {
                first.to_string()
            } else {
                format!("{}-{}", first, last)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Digits only; `+5` or `5a` are rejected. Values too large for `usize`
/// saturate so that open-ended ranges like "3-99999999999999999999" still clamp.
fn parse_page_number(token: &str) -> Option<usize> {
    let token = token.trim();
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(token.parse::<usize>().unwrap_or(usize::MAX))
}
