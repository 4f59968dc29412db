//! Year disambiguation for schedule documents.
//!
//! The rosters rarely state their year reliably: filenames carry one year,
//! the path another, the page text a third (sometimes mangled, "2.025"),
//! and season rosters that start in December are labelled with the year
//! they *end* in. Resolution consults three signals in priority order and
//! always produces a best-guess year, never a hard failure.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::warn;

/// Which signal produced the resolved year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum YearSource {
    Url,
    PageText,
    CurrentDate,
}

/// Outcome of year resolution. `valid` is false only when no in-range
/// signal was found and the current year stood in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearResolution {
    pub year: i32,
    pub source: YearSource,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Plain 4-digit year, 2020-2039. A span like "2024-2025" yields its first
/// year for page text (leftmost match) and its last for URLs.
static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"20[23][0-9]").expect("YEAR regex to compile"));

/// Tolerant variant for corrupted encodings where arbitrary non-digit
/// separators land between the digits: "2.025", "2 0 2 5".
static YEAR_LOOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"2[^\d]?0[^\d]?[23][^\d]?[0-9]").expect("YEAR_LOOSE regex to compile")
});

/// December day token near the document start marks a season roster that
/// begins in the prior December.
static DECEMBER_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d{1,2}\s?[-‐–]\s?dic\b").expect("DECEMBER_TOKEN regex to compile")
});

/// How far the leading December check looks, in characters.
const DECEMBER_WINDOW: usize = 500;

/// Accepted distance from the current year.
const YEAR_TOLERANCE: i32 = 2;

/// Resolve the operative starting year for a document page.
///
/// `today` anchors the plausibility window and the fallback; callers pass
/// the real current date (see [`crate::parse_schedules`]) or a fixed one
/// under test. Resolution is pure: the same text, URL and `today` always
/// produce the same result.
pub fn resolve_year(page_text: &str, source_url: Option<&str>, today: NaiveDate) -> YearResolution {
    let current_year = today.year();
    let in_range = |y: i32| (y - current_year).abs() <= YEAR_TOLERANCE;

    let (mut year, source, valid) = if let Some(y) = year_from_url(source_url, &in_range) {
        (y, YearSource::Url, true)
    } else if let Some(y) = year_from_text(page_text, &in_range) {
        (y, YearSource::PageText, true)
    } else {
        (current_year, YearSource::CurrentDate, false)
    };

    let mut warning = if valid {
        None
    } else {
        Some(format!(
            "no plausible year found in document or URL; assuming {current_year}"
        ))
    };

    // Rosters labelled with the year a season ends in, but starting with
    // December dates, actually begin the year before. Applied after
    // selection regardless of which signal won.
    if leading_december_token(page_text) {
        year -= 1;
        let note = format!("year adjusted to {year} due to December date at document start");
        warn!("{note}");
        warning = Some(match warning {
            Some(prev) => format!("{prev}; {note}"),
            None => note,
        });
    }

    YearResolution {
        year,
        source,
        valid,
        warning,
    }
}

/// URL signal: rightmost in-range 4-digit token wins, so a filename year
/// outranks a path year ("/2026/01/RURALES-2025.pdf" resolves to 2025).
fn year_from_url(url: Option<&str>, in_range: &dyn Fn(i32) -> bool) -> Option<i32> {
    let url = url?;
    YEAR.find_iter(url)
        .filter_map(|m| m.as_str().parse::<i32>().ok())
        .filter(|y| in_range(*y))
        .last()
}

/// Text signal: first in-range match of the strict pattern, then the
/// tolerant pattern for mangled digits.
fn year_from_text(text: &str, in_range: &dyn Fn(i32) -> bool) -> Option<i32> {
    if let Some(y) = YEAR
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<i32>().ok())
        .find(|y| in_range(*y))
    {
        return Some(y);
    }

    YEAR_LOOSE
        .find_iter(text)
        .filter_map(|m| {
            let digits: String = m.as_str().chars().filter(|c| c.is_ascii_digit()).collect();
            digits.parse::<i32>().ok()
        })
        .find(|y| in_range(*y))
}

fn leading_december_token(text: &str) -> bool {
    let head: String = text.chars().take(DECEMBER_WINDOW).collect();
    DECEMBER_TOKEN.is_match(&head)
}
