//! `###SNIPPET_<id>###` markers embedded in rendered output

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

// Non-greedy so that two markers on one line stay separate
static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"###SNIPPET_(.+?)###").expect("marker pattern is valid"));

/// One marker occurrence in a rendered string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatch<'t> {
    /// Referenced snippet id (case-sensitive)
    pub id: &'t str,
    /// Byte range of the whole marker
    pub range: Range<usize>,
}

/// Find all markers in `text`, left to right
pub fn find_markers(text: &str) -> Vec<MarkerMatch<'_>> {
    MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let id = caps.get(1)?;
            Some(MarkerMatch {
                id: id.as_str(),
                range: whole.range(),
            })
        })
        .collect()
}
