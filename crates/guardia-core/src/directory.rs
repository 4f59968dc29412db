//! Static pharmacy tables, keyed by the short textual fragments the rosters
//! actually print (a street fragment, a town name, a location code).
//!
//! Lookups fold case and accents before matching. A key with no table entry
//! falls back to a synthetic [`Pharmacy::unlisted`] record so the duty
//! entry survives with whatever the PDF printed.

use crate::locale::fold_ascii;
use crate::model::{DutyLocation, Pharmacy};
use std::sync::LazyLock;

/// Cuéllar roster: lines name the pharmacy by a street fragment.
static CUELLAR: LazyLock<Vec<(&'static str, Pharmacy)>> = LazyLock::new(|| {
    vec![
        (
            "C.J. CELA",
            Pharmacy::new(
                "Farmacia Fernando Redondo",
                "Avda. Camilo José Cela, 10, Cuéllar",
                "921 142 122",
            ),
        ),
        (
            "SAN FRANCISCO",
            Pharmacy::new(
                "Farmacia César Cabrerizo",
                "C/ San Francisco, 1, Cuéllar",
                "921 140 043",
            ),
        ),
        (
            "STA. MARINA",
            Pharmacy::new(
                "Farmacia Alcaraz Gª de la Barrera",
                "C/ Santa Marina, 5, Cuéllar",
                "921 140 281",
            ),
        ),
        (
            "CTRA. BAHABON",
            Pharmacy::new(
                "Farmacia Grande Mínguez",
                "Ctra. Bahabón, 9, Cuéllar",
                "921 143 065",
            ),
        ),
        (
            "RESINA",
            Pharmacy::new(
                "Farmacia Valle Calvo",
                "C/ La Resina, 14, Cuéllar",
                "921 144 312",
            ),
        ),
    ]
});

/// El Espinar roster: pharmacy identity comes from an address fragment or
/// the San Rafael town suffix, because the printed label flips between a
/// street name and a town name across document versions.
static EL_ESPINAR: LazyLock<Vec<(&'static str, Pharmacy)>> = LazyLock::new(|| {
    vec![
        (
            "HONTANILLA",
            Pharmacy::new(
                "Farmacia Mirón Sanz",
                "C/ Hontanilla, 2, El Espinar",
                "921 181 021",
            ),
        ),
        (
            "MARQUES PERALES",
            Pharmacy::new(
                "Farmacia Aguado Burgos",
                "C/ Marqués de Perales, 16, El Espinar",
                "921 181 962",
            ),
        ),
        (
            "SAN RAFAEL",
            Pharmacy::new(
                "Farmacia de San Rafael",
                "Travesía Alto del León, 4, San Rafael",
                "921 171 533",
            ),
        ),
    ]
});

/// Rural zone tables, one per duty location sharing the rural PDF.
static CARBONERO: LazyLock<Vec<(&'static str, Pharmacy)>> = LazyLock::new(|| {
    vec![
        (
            "CARBONERO",
            Pharmacy::new(
                "Farmacia Sanz Herranz",
                "Plaza Mayor, 8, Carbonero el Mayor",
                "921 560 262",
            ),
        ),
        (
            "NAVALMANZANO",
            Pharmacy::new(
                "Farmacia Pascual Cuesta",
                "Plaza de la Constitución, 2, Navalmanzano",
                "921 575 043",
            ),
        ),
        (
            "ZARZUELA DEL PINAR",
            Pharmacy::new(
                "Farmacia Hernanz Sancho",
                "C/ Caño, 1, Zarzuela del Pinar",
                "921 574 541",
            ),
        ),
        (
            "MOZONCILLO",
            Pharmacy::new(
                "Farmacia de la Calle Peña",
                "C/ Real, 28, Mozoncillo",
                "921 577 133",
            ),
        ),
    ]
});

static CANTALEJO: LazyLock<Vec<(&'static str, Pharmacy)>> = LazyLock::new(|| {
    vec![
        (
            "CANTALEJO",
            Pharmacy::new(
                "Farmacia Torquemada Lobo",
                "C/ Frontón, 12, Cantalejo",
                "921 520 053",
            ),
        ),
        (
            "CANTALEJO",
            Pharmacy::new(
                "Farmacia Barrio Arranz",
                "Plaza España, 14, Cantalejo",
                "921 520 174",
            ),
        ),
    ]
});

static RIAZA: LazyLock<Vec<(&'static str, Pharmacy)>> = LazyLock::new(|| {
    vec![
        (
            "RIAZA",
            Pharmacy::new(
                "Farmacia Bernabé Bravo",
                "C/ Ricardo Provencio, 16, Riaza",
                "921 550 131",
            ),
        ),
        (
            "AYLLON",
            Pharmacy::new(
                "Farmacia Gil Ayuso",
                "Plaza Mayor, 21, Ayllón",
                "921 553 006",
            ),
        ),
        (
            "CEREZO DE ABAJO",
            Pharmacy::new(
                "Farmacia Martín de Frutos",
                "Ctra. N-110, 2, Cerezo de Abajo",
                "921 557 110",
            ),
        ),
    ]
});

static SEPULVEDA: LazyLock<Vec<(&'static str, Pharmacy)>> = LazyLock::new(|| {
    vec![
        (
            "SEPULVEDA",
            Pharmacy::new(
                "Farmacia Casado Cuerdo",
                "Plaza España, 10, Sepúlveda",
                "921 540 018",
            ),
        ),
        (
            "PRADENA",
            Pharmacy::new(
                "Farmacia Lázaro Postigo",
                "C/ Plaza, 18, Prádena",
                "921 507 050",
            ),
        ),
        (
            "NAVAFRIA",
            Pharmacy::new(
                "Farmacia Sacristán Galindo",
                "C/ Reoyo, 3, Navafría",
                "921 506 025",
            ),
        ),
    ]
});

static VILLACASTIN: LazyLock<Vec<(&'static str, Pharmacy)>> = LazyLock::new(|| {
    vec![
        (
            "VILLACASTIN",
            Pharmacy::new(
                "Farmacia Llorente Pinar",
                "Plaza Mayor, 1, Villacastín",
                "921 198 024",
            ),
        ),
        (
            "ZARZUELA DEL MONTE",
            Pharmacy::new(
                "Farmacia Esteban Bravo",
                "C/ Iglesia, 7, Zarzuela del Monte",
                "921 198 545",
            ),
        ),
        (
            "NAVAS DE SAN ANTONIO",
            Pharmacy::new(
                "Farmacia Soto Yagüe",
                "Plaza de la Villa, 5, Navas de San Antonio",
                "921 193 076",
            ),
        ),
    ]
});

static NAVAS: LazyLock<Vec<(&'static str, Pharmacy)>> = LazyLock::new(|| {
    vec![
        (
            "NAVAS DE ORO",
            Pharmacy::new(
                "Farmacia Herrero Gozalo",
                "C/ Grande, 21, Navas de Oro",
                "921 591 025",
            ),
        ),
        (
            "NAVA DE LA ASUNCION",
            Pharmacy::new(
                "Farmacia Galicia Pérez",
                "C/ Eresma, 9, Nava de la Asunción",
                "921 580 533",
            ),
        ),
        (
            "COCA",
            Pharmacy::new(
                "Farmacia Fernández Mateo",
                "Plaza Arco, 2, Coca",
                "921 586 034",
            ),
        ),
        (
            "SANTIUSTE",
            Pharmacy::new(
                "Farmacia Rincón Velasco",
                "C/ Obispo Fray Sebastián, 11, Santiuste de San Juan Bautista",
                "921 596 081",
            ),
        ),
    ]
});

/// Find the Cuéllar pharmacy whose key fragment occurs in `line`.
pub fn find_cuellar(line: &str) -> Option<&'static Pharmacy> {
    find_in(&CUELLAR, line)
}

/// All Cuéllar key fragments, for line classification.
pub fn cuellar_keys() -> impl Iterator<Item = &'static str> {
    CUELLAR.iter().map(|(k, _)| *k)
}

/// Find the El Espinar pharmacy whose key fragment occurs in `line`.
pub fn find_el_espinar(line: &str) -> Option<&'static Pharmacy> {
    find_in(&EL_ESPINAR, line)
}

/// Pharmacies on duty for a rural zone cell. Cantalejo deliberately returns
/// *both* of its pharmacies for every date: the printed roster does not say
/// which of the two actually rotates, so downstream surfaces show both.
/// Everything else resolves by key fragment with an unlisted fallback.
pub fn zone_pharmacies(zone: DutyLocation, cell_text: &str) -> Vec<Pharmacy> {
    if zone == DutyLocation::Cantalejo {
        return CANTALEJO.iter().map(|(_, p)| p.clone()).collect();
    }

    let table: &[(&str, Pharmacy)] = match zone {
        DutyLocation::Carbonero => &CARBONERO,
        DutyLocation::Riaza => &RIAZA,
        DutyLocation::Sepulveda => &SEPULVEDA,
        DutyLocation::Villacastin => &VILLACASTIN,
        DutyLocation::Navas => &NAVAS,
        _ => &[],
    };

    match find_in(table, cell_text) {
        Some(p) => vec![p.clone()],
        None => vec![Pharmacy::unlisted(cell_text)],
    }
}

fn find_in<'a>(table: &'a [(&str, Pharmacy)], line: &str) -> Option<&'a Pharmacy> {
    let folded = fold_ascii(line);
    table
        .iter()
        .find(|(key, _)| folded.contains(&fold_ascii(key)))
        .map(|(_, p)| p)
}
