//! Regex tables for brochure and label extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // First signed decimal token, after commas were turned into dots
    pub static ref NUMBER_TOKEN: Regex = Regex::new(
        r"[-+]?\d+(\.\d+)?"
    ).unwrap();

    // Unsigned numbers inside a dimension string ("1500 x 800 x 1200 mm")
    pub static ref DIMENSION_NUMBER: Regex = Regex::new(
        r"\d+(?:[.,]\d+)?"
    ).unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // Device section anchors in AGILOX brochures, in anchor priority order
    pub static ref AGILOX_SECTIONS: Vec<(&'static str, Regex)> = vec![
        (
            "AGILOX Narrowfork (NFK)",
            Regex::new(r"(?i)\bNFK\b|\bNarrowfork\b").unwrap(),
        ),
        (
            "AGILOX ONE",
            Regex::new(r"(?i)\bAGILOX\s*ONE\b|\bONE\b").unwrap(),
        ),
    ];

    // German brochure labels; group 1 is the value including the imperial alternative
    pub static ref AGILOX_PATTERNS: Vec<(&'static str, Regex)> = vec![
        (
            "abmasse",
            Regex::new(r"(?i)ABMASSE\s*\(L\s*X\s*B\s*X\s*H\)\s*([0-9\.\sxX]+MM\s*\([0-9\.\sxX]+in\))").unwrap(),
        ),
        (
            "eigengewicht",
            Regex::new(r"(?i)EIGENGEWICHT\s*([0-9]+KG\s*\([0-9]+\s*lbs\))").unwrap(),
        ),
        (
            "max_last",
            Regex::new(r"(?i)MAX\.?\s*LAST\s*([0-9\s,\.]+KG\s*\([0-9\s,\.]+\s*lbs\))").unwrap(),
        ),
        (
            "max_hubhoehe",
            Regex::new(r"(?i)MAX\.?\s*HUBH[ÖO]HE\s*([0-9\s,\.]+MM\s*\([0-9\s,\.]+in\))").unwrap(),
        ),
        (
            "max_stationshoehe_epal",
            Regex::new(r"(?i)MAX\.?\s*STATIONSH[ÖO]HE\s*\(EPAL\)\s*([0-9\s,\.]+MM\s*\([0-9\s,\.]+in\))").unwrap(),
        ),
        (
            "drehkreis",
            Regex::new(r"(?i)DREHKREIS\s*([0-9\s,\.]+MM\s*\([0-9\s,\.]+in\))").unwrap(),
        ),
        (
            "min_gangbreite",
            Regex::new(r"(?i)MIN\.?\s*GANGBREITE\s*([0-9\s,\.]+MM\s*\([0-9\s,\.]+in\))").unwrap(),
        ),
        (
            "min_durchfahrtsbreite",
            Regex::new(r"(?i)MIN\.?\s*DURCHFAHRTSBREITE\s*([0-9\s,\.]+MM\s*\([0-9\s,\.]+in\))").unwrap(),
        ),
        (
            "ladezeit",
            Regex::new(r"(?i)LADEZEIT\s*([0-9\s\.]+Min\.\s*laden\s*=\s*[0-9]+\s*h\s*Betrieb)").unwrap(),
        ),
    ];

    // FTS Move brochure labels (line-bounded)
    pub static ref FTS_MOVE_PATTERNS: Vec<(&'static str, Regex)> = vec![
        (
            "abmessungen",
            Regex::new(r"(?i)Abmessungen:\s*([0-9\sxX]+mm\s*\(LxBxH\))").unwrap(),
        ),
        (
            "tragfaehigkeit",
            Regex::new(r"(?i)Tragf[aä]higkeit:\s*([0-9]+\s*kg.*)").unwrap(),
        ),
        (
            "hubhoehe",
            Regex::new(r"(?i)Hubh[öo]he\s*(?:von)?\s*([0-9]+\s*mm)").unwrap(),
        ),
        (
            "hoechstgeschwindigkeit",
            Regex::new(r"(?i)H[öo]chstgeschwindigkeit:\s*([0-9\.,]+\s*m/s.*)").unwrap(),
        ),
        (
            "navigation",
            Regex::new(r"(?i)(nat[üu]rlicher\s+Navigation)").unwrap(),
        ),
        (
            "batterie_management",
            Regex::new(r"(?i)(Autonomes\s+Batterie-Management)").unwrap(),
        ),
        (
            "lithium_ionen_akkus",
            Regex::new(r"(?i)Lithium-Ionen-Akkus.*\(([^\)]*)\)").unwrap(),
        ),
        (
            "sicherheitsscanner",
            Regex::new(r"(?i)Sicherheitsscanner.*?([0-9\-]+\s*Grad.*)").unwrap(),
        ),
        (
            "ladestation",
            Regex::new(r"(?i)Ladestation.*?(autonom(?:en)?\s+Aufladen.*)").unwrap(),
        ),
        (
            "zertifizierung",
            Regex::new(r"(?i)Zertifizierung:\s*([A-Za-z0-9\-]+)").unwrap(),
        ),
    ];

    // Text mentions the FTS Move product line
    pub static ref FTS_TRIGGER: Regex = Regex::new(
        r"(?i)\bFTS\b|\bMove\b|WEWO"
    ).unwrap();

    // Model replies: outermost-looking JSON object
    pub static ref JSON_BLOCK: Regex = Regex::new(r"(?s)\{.*\}").unwrap();
}
