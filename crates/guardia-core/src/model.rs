use crate::locale;
use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Version of the serialized schedule shape. Downstream caches persist the
/// assembled output verbatim keyed by this integer; bump it whenever the
/// serialized field names or types of [`DutyDate`], [`Pharmacy`] or
/// [`PharmacySchedule`] change, so stale caches are invalidated.
pub const CACHE_SCHEMA_VERSION: u32 = 3;

/// A calendar date on the duty roster. The year may be unresolved while a
/// strategy is still mid-parse; the weekday is always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyDate {
    pub day: u32,
    pub month: u32,
    pub year: Option<i32>,
}

impl DutyDate {
    pub fn new(day: u32, month: u32, year: i32) -> DutyDate {
        DutyDate {
            day,
            month,
            year: Some(year),
        }
    }

    /// The proleptic Gregorian calendar date, if the fields form one.
    pub fn to_naive(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year?, self.month, self.day)
    }

    /// Derived weekday. None while the year is unresolved or the fields
    /// don't form a real date.
    pub fn weekday(&self) -> Option<Weekday> {
        self.to_naive().map(|d| d.weekday())
    }

    /// Sort key with a fallback year for entries still unresolved.
    pub fn sort_key(&self, fallback_year: i32) -> (i32, u32, u32) {
        (self.year.unwrap_or(fallback_year), self.month, self.day)
    }
}

impl fmt::Display for DutyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = locale::month_name(self.month).unwrap_or("?");
        match (self.weekday(), self.year) {
            (Some(wd), Some(year)) => write!(
                f,
                "{}, {} de {} de {}",
                locale::weekday_name(wd),
                self.day,
                month,
                year
            ),
            (None, Some(year)) => write!(f, "{} de {} de {}", self.day, month, year),
            _ => write!(f, "{} de {}", self.day, month),
        }
    }
}

/// A pharmacy identity. Value object; equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pharmacy {
    pub name: String,
    pub address: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub extra_info: String,
}

pub const PHONE_NOT_AVAILABLE: &str = "No disponible";

impl Pharmacy {
    pub fn new(name: &str, address: &str, phone: &str) -> Pharmacy {
        Pharmacy {
            name: name.to_string(),
            address: address.to_string(),
            phone: phone.to_string(),
            extra_info: String::new(),
        }
    }

    /// Synthetic record for a roster key missing from the static tables:
    /// the raw key stands in for the name and the address is marked
    /// unavailable. Keeps unknown pharmacies visible instead of dropping
    /// the whole duty entry.
    pub fn unlisted(raw_key: &str) -> Pharmacy {
        Pharmacy {
            name: raw_key.trim().to_string(),
            address: "Dirección no disponible".to_string(),
            phone: PHONE_NOT_AVAILABLE.to_string(),
            extra_info: String::new(),
        }
    }
}

/// A named duty shift window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DutyTimeSpan {
    /// 24-hour duty, used by every roster outside the capital.
    FullDay,
    /// Daytime duty in Segovia capital.
    DayCapital,
    /// Overnight duty in Segovia capital, runs into the next calendar day.
    NightCapital,
}

impl DutyTimeSpan {
    pub fn start(&self) -> NaiveTime {
        match self {
            DutyTimeSpan::FullDay => NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
            DutyTimeSpan::DayCapital => NaiveTime::from_hms_opt(10, 15, 0).unwrap(),
            DutyTimeSpan::NightCapital => NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
        }
    }

    pub fn end(&self) -> NaiveTime {
        match self {
            DutyTimeSpan::FullDay => NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
            DutyTimeSpan::DayCapital => NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            DutyTimeSpan::NightCapital => NaiveTime::from_hms_opt(10, 15, 0).unwrap(),
        }
    }

    /// Whether the window crosses midnight into the next calendar day.
    pub fn ends_next_day(&self) -> bool {
        matches!(self, DutyTimeSpan::FullDay | DutyTimeSpan::NightCapital)
    }
}

impl fmt::Display for DutyTimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DutyTimeSpan::FullDay => write!(f, "Todo el día"),
            DutyTimeSpan::DayCapital => write!(f, "Diurno"),
            DutyTimeSpan::NightCapital => write!(f, "Nocturno"),
        }
    }
}

/// One assembled roster entry: a date plus the pharmacies on duty per shift.
/// The map guarantees each shift span appears at most once; several
/// pharmacies may share one span (Cantalejo prints two for every date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PharmacySchedule {
    pub date: DutyDate,
    pub shifts: BTreeMap<DutyTimeSpan, Vec<Pharmacy>>,
}

impl PharmacySchedule {
    pub fn new(date: DutyDate) -> PharmacySchedule {
        PharmacySchedule {
            date,
            shifts: BTreeMap::new(),
        }
    }

    /// Pharmacies covering the given span. A full-day entry answers for the
    /// day and night shifts too, so "who is on duty tonight" works the same
    /// in Cuéllar (full-day rosters) as in the capital (split shifts).
    pub fn on_duty(&self, span: DutyTimeSpan) -> &[Pharmacy] {
        if let Some(list) = self.shifts.get(&span) {
            return list;
        }
        if span != DutyTimeSpan::FullDay {
            if let Some(list) = self.shifts.get(&DutyTimeSpan::FullDay) {
                return list;
            }
        }
        &[]
    }
}

/// A geographic area with its own independent duty roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DutyLocation {
    Cuellar,
    ElEspinar,
    SegoviaCapital,
    Carbonero,
    Cantalejo,
    Riaza,
    Sepulveda,
    Villacastin,
    Navas,
}

impl fmt::Display for DutyLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DutyLocation::Cuellar => "Cuéllar",
            DutyLocation::ElEspinar => "El Espinar",
            DutyLocation::SegoviaCapital => "Segovia capital",
            DutyLocation::Carbonero => "Carbonero el Mayor",
            DutyLocation::Cantalejo => "Cantalejo",
            DutyLocation::Riaza => "Riaza",
            DutyLocation::Sepulveda => "Sepúlveda",
            DutyLocation::Villacastin => "Villacastín",
            DutyLocation::Navas => "Navas de Oro",
        };
        write!(f, "{name}")
    }
}

/// The four source roster formats, one per publishing municipality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DutyRegion {
    Cuellar,
    ElEspinar,
    SegoviaCapital,
    SegoviaRural,
}

impl DutyRegion {
    pub const ALL: [DutyRegion; 4] = [
        DutyRegion::Cuellar,
        DutyRegion::ElEspinar,
        DutyRegion::SegoviaCapital,
        DutyRegion::SegoviaRural,
    ];

    /// Loose textual lookup for CLI/config input.
    pub fn from_str_loose(s: &str) -> Option<DutyRegion> {
        let folded = locale::fold_ascii(s.trim());
        if folded.contains("CUELLAR") {
            Some(DutyRegion::Cuellar)
        } else if folded.contains("ESPINAR") {
            Some(DutyRegion::ElEspinar)
        } else if folded.contains("RURAL") {
            Some(DutyRegion::SegoviaRural)
        } else if folded.contains("SEGOVIA") || folded.contains("CAPITAL") {
            Some(DutyRegion::SegoviaCapital)
        } else {
            None
        }
    }

    /// The duty locations this region's PDF feeds.
    pub fn locations(&self) -> &'static [DutyLocation] {
        match self {
            DutyRegion::Cuellar => &[DutyLocation::Cuellar],
            DutyRegion::ElEspinar => &[DutyLocation::ElEspinar],
            DutyRegion::SegoviaCapital => &[DutyLocation::SegoviaCapital],
            DutyRegion::SegoviaRural => &[
                DutyLocation::Carbonero,
                DutyLocation::Cantalejo,
                DutyLocation::Riaza,
                DutyLocation::Sepulveda,
                DutyLocation::Villacastin,
                DutyLocation::Navas,
            ],
        }
    }
}

impl fmt::Display for DutyRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DutyRegion::Cuellar => write!(f, "Cuéllar"),
            DutyRegion::ElEspinar => write!(f, "El Espinar"),
            DutyRegion::SegoviaCapital => write!(f, "Segovia capital"),
            DutyRegion::SegoviaRural => write!(f, "Segovia rural"),
        }
    }
}

/// The canonical pipeline output: per-location, date-ordered schedules.
pub type ScheduleMap = BTreeMap<DutyLocation, Vec<PharmacySchedule>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_derived_for_every_month() {
        // 2025-01-01 was a Wednesday; walk the first of each month.
        let expected = [
            Weekday::Wed, // ene
            Weekday::Sat, // feb
            Weekday::Sat, // mar
            Weekday::Tue, // abr
            Weekday::Thu, // may
            Weekday::Sun, // jun
            Weekday::Tue, // jul
            Weekday::Fri, // ago
            Weekday::Mon, // sep
            Weekday::Wed, // oct
            Weekday::Sat, // nov
            Weekday::Mon, // dic
        ];
        for (i, wd) in expected.iter().enumerate() {
            let date = DutyDate::new(1, i as u32 + 1, 2025);
            assert_eq!(date.weekday(), Some(*wd), "month {}", i + 1);
        }
    }

    #[test]
    fn test_unresolved_year_has_no_weekday() {
        let date = DutyDate {
            day: 1,
            month: 1,
            year: None,
        };
        assert_eq!(date.weekday(), None);
    }

    #[test]
    fn test_invalid_date_has_no_weekday() {
        assert_eq!(DutyDate::new(31, 2, 2025).weekday(), None);
    }

    #[test]
    fn test_display_full_date() {
        let date = DutyDate::new(1, 1, 2025);
        assert_eq!(date.to_string(), "miércoles, 1 de enero de 2025");
    }

    #[test]
    fn test_span_windows() {
        assert!(DutyTimeSpan::NightCapital.ends_next_day());
        assert!(!DutyTimeSpan::DayCapital.ends_next_day());
        assert_eq!(
            DutyTimeSpan::DayCapital.start(),
            NaiveTime::from_hms_opt(10, 15, 0).unwrap()
        );
    }

    #[test]
    fn test_on_duty_full_day_answers_for_night() {
        let mut schedule = PharmacySchedule::new(DutyDate::new(5, 3, 2025));
        let pharmacy = Pharmacy::new("Farmacia Test", "C/ Mayor, 1", "921 000 000");
        schedule
            .shifts
            .insert(DutyTimeSpan::FullDay, vec![pharmacy.clone()]);

        assert_eq!(schedule.on_duty(DutyTimeSpan::NightCapital), &[pharmacy.clone()][..]);
        assert_eq!(schedule.on_duty(DutyTimeSpan::DayCapital), &[pharmacy][..]);
    }

    #[test]
    fn test_on_duty_split_shifts_do_not_cross() {
        let mut schedule = PharmacySchedule::new(DutyDate::new(5, 3, 2025));
        let day = Pharmacy::new("Farmacia Día", "C/ Real, 2", "921 111 111");
        schedule.shifts.insert(DutyTimeSpan::DayCapital, vec![day]);

        assert!(schedule.on_duty(DutyTimeSpan::NightCapital).is_empty());
    }

    #[test]
    fn test_unlisted_pharmacy_fallback() {
        let pharmacy = Pharmacy::unlisted(" AV DESCONOCIDA ");
        assert_eq!(pharmacy.name, "AV DESCONOCIDA");
        assert_eq!(pharmacy.phone, PHONE_NOT_AVAILABLE);
    }

    #[test]
    fn test_region_from_str_loose() {
        assert_eq!(DutyRegion::from_str_loose("cuellar"), Some(DutyRegion::Cuellar));
        assert_eq!(DutyRegion::from_str_loose("Cuéllar"), Some(DutyRegion::Cuellar));
        assert_eq!(
            DutyRegion::from_str_loose("segovia-rural"),
            Some(DutyRegion::SegoviaRural)
        );
        assert_eq!(
            DutyRegion::from_str_loose("SEGOVIA CAPITAL"),
            Some(DutyRegion::SegoviaCapital)
        );
        assert_eq!(DutyRegion::from_str_loose("madrid"), None);
    }

    #[test]
    fn test_location_serialization_is_kebab_case() {
        let json = serde_json::to_string(&DutyLocation::SegoviaCapital).unwrap();
        assert_eq!(json, "\"segovia-capital\"");
    }
}
