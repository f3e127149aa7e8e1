#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Parsing of free-text Colombian urban addresses.
//!
//! The directory inventory provides addresses in many shapes:
//! - Calle with plate: `"CL 20 24-65"`, `"CALLE 20 NO 24-65"`
//! - Carrera with plate: `"CR 23 NRO. 20-20"`, `"CRA 23 # 20-20"`
//! - Cross references: `"CL 20 CON CR 25"`, `"CR 23 CON CL 20"`
//! - Free text with embedded numbers: `"LOCAL 2 CL 20 24"`
//!
//! Parsing tries an ordered list of shape rules and falls back to a
//! best-effort numeric-token heuristic when none match.

use std::sync::LazyLock;

use barrio_map_geo_models::{ParsedAddress, WayType};
use regex::Regex;

/// The recognized address shapes, one per pattern rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleShape {
    /// `CL 20 CON CR 25`: calle crossed with an explicit carrera.
    CalleCrossCarrera,
    /// `CR 23 CON CL 20`: carrera crossed with an explicit calle.
    CarreraCrossCalle,
    /// `CL 20 24-65`: calle, cross-street number, optional plate.
    CalleWithPlate,
    /// `CR 23 NRO. 20-20`: carrera, cross-street number, optional plate.
    CarreraWithPlate,
}

/// The ordered rule list. Rules run most-specific first and the FIRST
/// match wins, so the cross-reference shapes must precede the plate
/// shapes; reordering changes results for ambiguous strings.
static RULES: LazyLock<Vec<(RuleShape, Regex)>> = LazyLock::new(|| {
    vec![
        (
            RuleShape::CalleCrossCarrera,
            Regex::new(
                r"^(?:CL|CALLE)\s*\.?\s*(\d+)[A-Z]?\s*(?:CON|X|Y)\s*(?:CR|CRA|CARRERA|KR|KRA)\s*\.?\s*(\d+)[A-Z]?",
            )
            .expect("valid regex"),
        ),
        (
            RuleShape::CarreraCrossCalle,
            Regex::new(
                r"^(?:CR|CRA|CARRERA|KR|KRA)\s*\.?\s*(\d+)[A-Z]?\s*(?:CON|X|Y)\s*(?:CL|CALLE)\s*\.?\s*(\d+)[A-Z]?",
            )
            .expect("valid regex"),
        ),
        (
            RuleShape::CalleWithPlate,
            Regex::new(
                r"^(?:CL|CALLE)\s*\.?\s*(\d+)[A-Z]?\s*(?:NRO\.?|NO\.?|#)?\s*(\d+)[A-Z]?(?:[-\s]\s*(\d+))?",
            )
            .expect("valid regex"),
        ),
        (
            RuleShape::CarreraWithPlate,
            Regex::new(
                r"^(?:CR|CRA|CARRERA|KR|KRA)\s*\.?\s*(\d+)[A-Z]?\s*(?:NRO\.?|NO\.?|#)?\s*(\d+)[A-Z]?(?:[-\s]\s*(\d+))?",
            )
            .expect("valid regex"),
        ),
    ]
});

/// Regex for bare numeric tokens, used by the last-resort fallback.
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Parses a free-text Colombian urban address.
///
/// The input is trimmed and uppercased once; the caller's string is not
/// mutated. Returns `None` for empty input, and for input where no rule
/// matches and fewer than two numeric tokens are present. Never panics
/// on malformed input.
#[must_use]
pub fn parse(raw: &str) -> Option<ParsedAddress> {
    let clean = raw.trim().to_uppercase();
    if clean.is_empty() {
        return None;
    }

    for (shape, regex) in RULES.iter() {
        let Some(caps) = regex.captures(&clean) else {
            continue;
        };

        let primary_number = parse_number(caps.get(1)?.as_str())?;
        let secondary_number = parse_number(caps.get(2)?.as_str())?;

        let parsed = match shape {
            RuleShape::CalleCrossCarrera => ParsedAddress {
                primary_way: WayType::Calle,
                primary_number,
                secondary_way: Some(WayType::Carrera),
                secondary_number: Some(secondary_number),
                plate_number: None,
                raw: clean,
            },
            RuleShape::CarreraCrossCalle => ParsedAddress {
                primary_way: WayType::Carrera,
                primary_number,
                secondary_way: Some(WayType::Calle),
                secondary_number: Some(secondary_number),
                plate_number: None,
                raw: clean,
            },
            RuleShape::CalleWithPlate | RuleShape::CarreraWithPlate => ParsedAddress {
                primary_way: if *shape == RuleShape::CalleWithPlate {
                    WayType::Calle
                } else {
                    WayType::Carrera
                },
                primary_number,
                secondary_way: None,
                secondary_number: Some(secondary_number),
                plate_number: caps.get(3).and_then(|m| parse_number(m.as_str())),
                raw: clean,
            },
        };

        return Some(parsed);
    }

    parse_fallback(clean)
}

/// Last-resort heuristic for strings no rule recognized.
///
/// Takes the first two numeric tokens as primary/secondary (and a third
/// as plate), inferring the way type from carrera/calle substrings. This
/// may mis-assign the way type for noisy input; it is intentional
/// degraded behavior, not a parse guarantee.
fn parse_fallback(clean: String) -> Option<ParsedAddress> {
    let numbers: Vec<u32> = NUMBER_RE
        .find_iter(&clean)
        .filter_map(|m| parse_number(m.as_str()))
        .collect();

    if numbers.len() < 2 {
        return None;
    }

    let is_carrera =
        clean.contains("CR") || clean.contains("KR") || clean.contains("CARRERA");

    Some(ParsedAddress {
        primary_way: if is_carrera {
            WayType::Carrera
        } else {
            WayType::Calle
        },
        primary_number: numbers[0],
        secondary_way: None,
        secondary_number: Some(numbers[1]),
        plate_number: numbers.get(2).copied(),
        raw: clean,
    })
}

/// Parses a digits-only capture into a number. Returns `None` on
/// overflow rather than panicking.
fn parse_number(digits: &str) -> Option<u32> {
    digits.parse().ok()
}
