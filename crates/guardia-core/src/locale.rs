use regex::Regex;
use std::sync::LazyLock;

/// Spanish month abbreviations as printed in the rosters, in calendar order.
///
/// This is the single month table shared by every strategy and the year
/// engine; no other module may carry its own month names.
pub const MONTH_ABBREVS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

/// Full Spanish month names, in calendar order.
pub const MONTH_NAMES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Spanish weekday names, Monday first (matches `chrono::Weekday` ordering).
pub const WEEKDAY_NAMES: [&str; 7] = [
    "lunes",
    "martes",
    "miércoles",
    "jueves",
    "viernes",
    "sábado",
    "domingo",
];

/// `dd-mmm` date token as printed in the Cuéllar/El Espinar/rural rosters.
///
/// Tolerates the hyphen variants and stray inner spaces that show up in
/// malformed exports ("01 - ene").
pub static DATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s?[-‐–]\s?(ene|feb|mar|abr|may|jun|jul|ago|sep|oct|nov|dic)\b")
        .expect("DATE_TOKEN regex to compile")
});

/// Long-form day reference: "31 DE AGOSTO", "1 de septiembre".
pub static LONG_DATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})\s+de\s+([a-záéíóúñ]+)").expect("LONG_DATE_TOKEN regex to compile")
});

/// Month number (1-12) for a three-letter abbreviation, case-insensitive.
pub fn month_from_abbrev(abbrev: &str) -> Option<u32> {
    let lower = abbrev.to_lowercase();
    MONTH_ABBREVS
        .iter()
        .position(|m| *m == lower)
        .map(|i| i as u32 + 1)
}

/// Month number (1-12) for a full Spanish month name, accent-insensitive.
pub fn month_from_name(name: &str) -> Option<u32> {
    let folded = fold_ascii(name);
    MONTH_NAMES
        .iter()
        .position(|m| fold_ascii(m) == folded)
        .map(|i| i as u32 + 1)
}

pub fn month_abbrev(month: u32) -> Option<&'static str> {
    MONTH_ABBREVS.get(month.checked_sub(1)? as usize).copied()
}

pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

/// Spanish name for a weekday.
pub fn weekday_name(weekday: chrono::Weekday) -> &'static str {
    WEEKDAY_NAMES[weekday.num_days_from_monday() as usize]
}

/// Collapse all Unicode whitespace (non-breaking spaces included) to single
/// ASCII spaces. The municipal PDFs are full of NBSP and figure-space
/// artifacts that break naive token matching.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Uppercase and strip Spanish diacritics, for key-fragment matching.
///
/// Printed rosters are inconsistent about accents ("MARQUÉS" vs "MARQUES"),
/// so all substring lookups go through this fold.
pub fn fold_ascii(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'Á' => 'A',
            'é' | 'É' => 'E',
            'í' | 'Í' => 'I',
            'ó' | 'Ó' => 'O',
            'ú' | 'Ú' | 'ü' | 'Ü' => 'U',
            'ñ' | 'Ñ' => 'N',
            _ => c.to_ascii_uppercase(),
        })
        .collect()
}
