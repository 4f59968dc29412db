//! Geometric column scanner.
//!
//! The Segovia capital and rural rosters encode their tables purely by
//! absolute glyph positioning, so recovery works on rectangular page
//! regions: a vertical band is swept top to bottom and the text falling
//! inside each window is reassembled into lines.
//!
//! Malformed geometry (zero-sized or out-of-page regions) always yields
//! empty text, never an error; callers treat empty extraction as "no data".

use crate::extraction::{PageContent, PositionedChar};

/// A vertical band of the page: all y, a fixed x-range.
#[derive(Debug, Clone, Copy)]
pub struct ColumnBand {
    pub x: f32,
    pub width: f32,
}

impl ColumnBand {
    pub fn new(x: f32, width: f32) -> ColumnBand {
        ColumnBand { x, width }
    }

    fn contains(&self, c: &PositionedChar) -> bool {
        c.x >= self.x && c.x < self.x + self.width
    }
}

/// One window of a column sweep: the window's top y plus the text found.
#[derive(Debug, Clone)]
pub struct ScannedRow {
    pub y: f32,
    pub text: String,
}

/// Vertical distance within which glyphs are considered one text line.
const LINE_TOLERANCE: f32 = 3.0;

/// Sweep a window of `row_height` down the page in steps of
/// `scan_increment`, extracting the text intersecting the window at each
/// step. Rows come back in document order (top first). Overlapping windows
/// may repeat text; callers deduplicate by position or content.
pub fn scan_column(
    page: &PageContent,
    band: ColumnBand,
    row_height: f32,
    scan_increment: f32,
) -> Vec<ScannedRow> {
    if row_height <= 0.0 || scan_increment <= 0.0 || !band_on_page(page, band) {
        return Vec::new();
    }

    let mut rows = Vec::new();
    let mut y = 0.0f32;
    while y < page.height {
        let text = text_in_rect(page, band, y, row_height);
        if !text.is_empty() {
            rows.push(ScannedRow { y, text });
        }
        y += scan_increment;
    }
    rows
}

/// Single-shot extraction of an entire column, rows separated by newlines.
pub fn extract_full_column(page: &PageContent, band: ColumnBand) -> String {
    if !band_on_page(page, band) {
        return String::new();
    }
    text_in_rect(page, band, 0.0, page.height)
}

/// Scan downward from `search_from` until `validator` accepts the texts
/// simultaneously extracted from `cells` at that height. Used to skip
/// title/header rows whose height varies between documents. Returns the
/// accepted window's top y, or None when no coherent row exists within the
/// search range; callers treat that as "no data on this page".
pub fn find_first_coherent_row(
    page: &PageContent,
    cells: &[ColumnBand],
    search_from: f32,
    search_to: f32,
    row_height: f32,
    scan_increment: f32,
    validator: &dyn Fn(&[String]) -> bool,
) -> Option<f32> {
    if cells.is_empty() || row_height <= 0.0 || scan_increment <= 0.0 {
        return None;
    }

    let mut y = search_from.max(0.0);
    let limit = search_to.min(page.height);
    while y < limit {
        let texts: Vec<String> = cells
            .iter()
            .map(|band| text_in_rect(page, *band, y, row_height))
            .collect();
        if validator(&texts) {
            return Some(y);
        }
        y += scan_increment;
    }
    None
}

/// Text confined to `band` between `y` and `y + height`, reassembled into
/// lines by glyph position: clustered by y, ordered by x, a space inserted
/// wherever the horizontal gap exceeds one average glyph advance.
pub fn text_in_rect(page: &PageContent, band: ColumnBand, y: f32, height: f32) -> String {
    if height <= 0.0 || !band_on_page(page, band) {
        return String::new();
    }

    let mut hits: Vec<&PositionedChar> = page
        .chars
        .iter()
        .filter(|c| band.contains(c) && c.y >= y && c.y < y + height)
        .collect();
    if hits.is_empty() {
        return String::new();
    }

    hits.sort_by(|a, b| {
        a.y.partial_cmp(&b.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<Vec<&PositionedChar>> = Vec::new();
    for c in hits {
        match lines.last_mut() {
            Some(line) if (c.y - line[0].y).abs() <= LINE_TOLERANCE => line.push(c),
            _ => lines.push(vec![c]),
        }
    }

    let mut out = String::new();
    for line in &mut lines {
        line.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        if !out.is_empty() {
            out.push('\n');
        }
        let mut last_end: Option<f32> = None;
        for c in line.iter() {
            if let Some(end) = last_end {
                if c.x - end > c.width.max(1.0) {
                    out.push(' ');
                }
            }
            out.push_str(&c.text);
            last_end = Some(c.x + c.width);
        }
    }
    out.trim().to_string()
}

fn band_on_page(page: &PageContent, band: ColumnBand) -> bool {
    band.width > 0.0 && band.x < page.width && band.x + band.width > 0.0
}
