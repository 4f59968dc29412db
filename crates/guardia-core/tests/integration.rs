//! Integration tests for the parse_schedules() end-to-end pipeline.
//!
//! Uses a MockExtractor that returns pre-built PageContent without opening
//! a real PDF, so these tests exercise strategy selection, year
//! resolution, parsing and assembly deterministically.

use chrono::NaiveDate;
use guardia_core::error::GuardiaError;
use guardia_core::extraction::{PageContent, PdfExtractor, PositionedChar};
use guardia_core::model::{DutyLocation, DutyRegion, DutyTimeSpan};
use guardia_core::parse_schedules_at;
use guardia_core::year::YearSource;

struct MockExtractor {
    pages: Vec<PageContent>,
}

impl PdfExtractor for MockExtractor {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageContent>, GuardiaError> {
        Ok(self.pages.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

/// Extractor simulating a PDF that cannot be opened at all.
struct FailingExtractor;

impl PdfExtractor for FailingExtractor {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageContent>, GuardiaError> {
        Err(GuardiaError::Extraction("failed to open PDF".into()))
    }

    fn backend_name(&self) -> &str {
        "failing"
    }
}

fn text_page(number: usize, text: &str) -> PageContent {
    PageContent {
        page_number: number,
        width: 595.0,
        height: 842.0,
        text: text.to_string(),
        chars: Vec::new(),
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

// ---------------------------------------------------------------------------
// Test 1: Cuéllar range line expands to seven full-day schedules
// ---------------------------------------------------------------------------
#[test]
fn cuellar_week_range_expands_to_seven_schedules() {
    let extractor = MockExtractor {
        pages: vec![text_page(
            1,
            "FARMACIAS DE GUARDIA CUELLAR 2025\n01-ene al 07-ene Av C.J. CELA\n",
        )],
    };

    let outcome = parse_schedules_at(DutyRegion::Cuellar, &[], None, &extractor, today());

    let schedules = &outcome.schedules[&DutyLocation::Cuellar];
    assert_eq!(schedules.len(), 7);
    for (i, schedule) in schedules.iter().enumerate() {
        assert_eq!(schedule.date.day, i as u32 + 1);
        assert_eq!(schedule.date.year, Some(2025));
        // Full-day duty answers for both the day and the night shift.
        assert_eq!(
            schedule.on_duty(DutyTimeSpan::DayCapital)[0].name,
            "Farmacia Fernando Redondo"
        );
        assert_eq!(
            schedule.on_duty(DutyTimeSpan::NightCapital)[0].name,
            "Farmacia Fernando Redondo"
        );
    }
}

// ---------------------------------------------------------------------------
// Test 2: schedules come out strictly sorted with no duplicate dates
// ---------------------------------------------------------------------------
#[test]
fn schedules_sorted_and_deduplicated() {
    let extractor = MockExtractor {
        pages: vec![text_page(
            1,
            "GUARDIAS 2025\n\
             10-mar Av C.J. CELA\n\
             02-mar C/ San Francisco\n\
             10-mar C/ San Francisco\n",
        )],
    };

    let outcome = parse_schedules_at(DutyRegion::Cuellar, &[], None, &extractor, today());

    let schedules = &outcome.schedules[&DutyLocation::Cuellar];
    assert_eq!(schedules.len(), 2);
    assert_eq!(schedules[0].date.day, 2);
    assert_eq!(schedules[1].date.day, 10);
    // First occurrence of the duplicated date wins.
    assert_eq!(
        schedules[1].on_duty(DutyTimeSpan::FullDay)[0].name,
        "Farmacia Fernando Redondo"
    );
}

// ---------------------------------------------------------------------------
// Test 3: document crossing New Year carries the running year forward
// ---------------------------------------------------------------------------
#[test]
fn new_year_rollover_threads_running_year() {
    let extractor = MockExtractor {
        pages: vec![text_page(
            1,
            "GUARDIAS 2025-2026\n30-dic al 02-ene Av C.J. CELA\n",
        )],
    };

    let outcome = parse_schedules_at(DutyRegion::Cuellar, &[], None, &extractor, today());

    let schedules = &outcome.schedules[&DutyLocation::Cuellar];
    assert_eq!(schedules.len(), 4);
    assert_eq!(schedules[0].date.year, Some(2025));
    assert_eq!(schedules[3].date.year, Some(2026));
    assert_eq!(schedules[3].date.day, 2);
}

// ---------------------------------------------------------------------------
// Test 4: Segovia capital text pass produces split day/night shifts
// ---------------------------------------------------------------------------
#[test]
fn segovia_capital_day_and_night_shifts() {
    let extractor = MockExtractor {
        pages: vec![text_page(
            1,
            "FARMACIAS DE GUARDIA SEGOVIA 2025\n\
             Viernes, 7 de marzo de 2025\n\
             FARMACIA SAENZ DE BURUAGA FARMACIA DEL CARMEN\n\
             C/ José Zorrilla, 117 C/ San Agustín, 4\n\
             921 442 477 921 460 217\n",
        )],
    };

    let outcome = parse_schedules_at(DutyRegion::SegoviaCapital, &[], None, &extractor, today());

    let schedules = &outcome.schedules[&DutyLocation::SegoviaCapital];
    assert_eq!(schedules.len(), 1);
    let schedule = &schedules[0];
    assert_eq!(schedule.shifts.len(), 2);
    assert_eq!(
        schedule.on_duty(DutyTimeSpan::DayCapital)[0].name,
        "FARMACIA SAENZ DE BURUAGA"
    );
    assert_eq!(
        schedule.on_duty(DutyTimeSpan::NightCapital)[0].name,
        "FARMACIA DEL CARMEN"
    );
}

// ---------------------------------------------------------------------------
// Test 5: Segovia rural zones map to their own locations, Cantalejo dual
// ---------------------------------------------------------------------------
#[test]
fn segovia_rural_zones_and_cantalejo_dual() {
    fn put(chars: &mut Vec<PositionedChar>, x: f32, y: f32, text: &str) {
        for (i, ch) in text.chars().enumerate() {
            if ch != ' ' {
                chars.push(PositionedChar {
                    x: x + i as f32 * 4.0,
                    y,
                    width: 4.0,
                    text: ch.to_string(),
                });
            }
        }
    }

    let mut chars = Vec::new();
    put(&mut chars, 25.0, 100.0, "03-may");
    put(&mut chars, 100.0, 100.0, "CARBONERO");
    put(&mut chars, 180.0, 100.0, "CANTALEJO");
    put(&mut chars, 260.0, 100.0, "RIAZA");
    put(&mut chars, 345.0, 100.0, "SEPULVEDA");
    put(&mut chars, 425.0, 100.0, "VILLACASTIN");
    put(&mut chars, 510.0, 100.0, "COCA");
    let extractor = MockExtractor {
        pages: vec![PageContent {
            page_number: 1,
            width: 595.0,
            height: 842.0,
            text: "GUARDIAS ZONAS RURALES 2025".to_string(),
            chars,
        }],
    };

    let outcome = parse_schedules_at(DutyRegion::SegoviaRural, &[], None, &extractor, today());

    assert_eq!(outcome.schedules.len(), 6);
    let cantalejo = &outcome.schedules[&DutyLocation::Cantalejo];
    assert_eq!(cantalejo.len(), 1);
    assert_eq!(cantalejo[0].on_duty(DutyTimeSpan::FullDay).len(), 2);

    let navas = &outcome.schedules[&DutyLocation::Navas];
    assert_eq!(
        navas[0].on_duty(DutyTimeSpan::FullDay)[0].name,
        "Farmacia Fernández Mateo"
    );
}

// ---------------------------------------------------------------------------
// Test 6: year resolution prefers the URL and reports its source
// ---------------------------------------------------------------------------
#[test]
fn url_year_signal_reported() {
    let extractor = MockExtractor {
        pages: vec![text_page(1, "GUARDIAS\n05-feb Av C.J. CELA\n")],
    };

    let outcome = parse_schedules_at(
        DutyRegion::Cuellar,
        &[],
        Some("https://cuellar.es/2026/01/guardias-2025.pdf"),
        &extractor,
        today(),
    );

    let year = outcome.year.unwrap();
    assert_eq!(year.year, 2025);
    assert_eq!(year.source, YearSource::Url);
    assert!(year.valid);
}

// ---------------------------------------------------------------------------
// Test 7: malformed lines produce skips, never failures
// ---------------------------------------------------------------------------
#[test]
fn malformed_lines_skipped_not_fatal() {
    let extractor = MockExtractor {
        pages: vec![text_page(
            1,
            "GUARDIAS 2025\n\
             ESTE TEXTO NO ES NADA\n\
             ????\n\
             03-abr Av C.J. CELA\n",
        )],
    };

    let outcome = parse_schedules_at(DutyRegion::Cuellar, &[], None, &extractor, today());

    assert_eq!(outcome.entry_count(), 1);
    assert!(outcome.skipped_lines >= 2);
}

// ---------------------------------------------------------------------------
// Test 8: an unopenable document yields an empty outcome with a warning
// ---------------------------------------------------------------------------
#[test]
fn unopenable_document_is_absorbed() {
    let outcome = parse_schedules_at(
        DutyRegion::Cuellar,
        b"%PDF-garbage",
        None,
        &FailingExtractor,
        today(),
    );

    assert!(outcome.schedules.is_empty());
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("failed to open"));
}

// ---------------------------------------------------------------------------
// Test 9: serialized outcome keeps the stable field names
// ---------------------------------------------------------------------------
#[test]
fn serialized_shape_is_stable() {
    let extractor = MockExtractor {
        pages: vec![text_page(1, "GUARDIAS 2025\n05-feb Av C.J. CELA\n")],
    };

    let outcome = parse_schedules_at(DutyRegion::Cuellar, &[], None, &extractor, today());
    let json = serde_json::to_value(&outcome).unwrap();

    let entry = &json["schedules"]["cuellar"][0];
    assert_eq!(entry["date"]["day"], 5);
    assert_eq!(entry["date"]["month"], 2);
    assert_eq!(entry["date"]["year"], 2025);
    let pharmacy = &entry["shifts"]["full-day"][0];
    assert_eq!(pharmacy["name"], "Farmacia Fernando Redondo");
    assert!(pharmacy["address"].is_string());
    assert!(pharmacy["phone"].is_string());
}
