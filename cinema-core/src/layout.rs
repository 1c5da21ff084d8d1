//! Hall seat-layout generator.
//!
//! Admins describe a hall with a handful of sparse text fields. Those fields
//! are parsed into a validated [`LayoutConfig`], which resolves every seat's
//! type with the same priority the backend uses when it regenerates seats:
//!
//! 1. a per-seat override (`A1:VIP`)
//! 2. VIP rows
//! 3. couple rows
//! 4. wheelchair rows
//! 5. rows `A` and `B` are VIP
//! 6. standard
//!
//! Grammar of the text fields (whitespace around tokens is ignored, empty
//! tokens are skipped):
//!
//! ```text
//! rows        := row ("," row)*            e.g. "A,B"
//! overrides   := seat ":" type ("," ...)*   e.g. "A1:VIP, C7:wheelchair"
//! row_aisles  := row "-" row ("," ...)*     e.g. "B-C"  (rows must be adjacent)
//! col_aisles  := number ("," number)*       e.g. "4,10" (aisle after that seat)
//! ```

use crate::models::SeatType;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

pub const MAX_ROWS: u32 = 26;
pub const MAX_SEATS_PER_ROW: u32 = 50;

const VIP_ROWS_KEY: &str = "VIP_Rows";
const COUPLE_ROWS_KEY: &str = "COUPLE_Rows";
const WHEELCHAIR_ROWS_KEY: &str = "WHEELCHAIR_Rows";
const ROW_AISLES_KEY: &str = "aisles";
const COLUMN_AISLES_KEY: &str = "columnAisles";

static SEAT_KEY: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^([A-Za-z])(\d{1,2})$").ok());

/// Split `C12` into its row and number parts.
fn split_seat_key(token: &str) -> Option<(&str, &str)> {
    let caps = SEAT_KEY.as_ref()?.captures(token)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("a hall needs between 1 and 26 rows, got {0}")]
    RowCount(u32),
    #[error("a row needs between 1 and 50 seats, got {0}")]
    SeatsPerRow(u32),
    #[error("`{0}` is not a row letter")]
    InvalidRow(String),
    #[error("row {row} is outside A-{last}")]
    RowOutOfRange { row: char, last: char },
    #[error("`{0}` is not a seat like A12")]
    InvalidSeatKey(String),
    #[error("`{0}` needs a seat and a type separated by `:`")]
    InvalidOverride(String),
    #[error("seat {0} is outside the hall")]
    SeatOutOfRange(String),
    #[error("unknown seat type `{0}`")]
    UnknownSeatType(String),
    #[error("`{0}` must join two adjacent rows like B-C")]
    InvalidAisle(String),
    #[error("`{0}` is not a seat number inside the row")]
    InvalidColumn(String),
}

/// Row letter for a zero-based row index.
#[must_use]
pub fn row_letter(index: u32) -> Option<char> {
    if index < MAX_ROWS {
        char::from_u32(u32::from(b'A') + index)
    } else {
        None
    }
}

fn row_index(row: char) -> u32 {
    u32::from(row) - u32::from('A')
}

/// Raw form fields of the hall layout editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSpec {
    pub rows: u32,
    pub seats_per_row: u32,
    #[serde(default)]
    pub vip_rows: String,
    #[serde(default)]
    pub couple_rows: String,
    #[serde(default)]
    pub wheelchair_rows: String,
    #[serde(default)]
    pub seat_overrides: String,
    #[serde(default)]
    pub row_aisles: String,
    #[serde(default)]
    pub column_aisles: String,
}

impl Default for LayoutSpec {
    fn default() -> Self {
        Self {
            rows: 10,
            seats_per_row: 12,
            vip_rows: String::new(),
            couple_rows: String::new(),
            wheelchair_rows: String::new(),
            seat_overrides: String::new(),
            row_aisles: String::new(),
            column_aisles: String::new(),
        }
    }
}

impl LayoutSpec {
    /// Validate every field and build the typed configuration.
    ///
    /// # Errors
    /// The first [`LayoutError`] found, checking dimensions first.
    pub fn parse(&self) -> Result<LayoutConfig, LayoutError> {
        if !(1..=MAX_ROWS).contains(&self.rows) {
            return Err(LayoutError::RowCount(self.rows));
        }
        if !(1..=MAX_SEATS_PER_ROW).contains(&self.seats_per_row) {
            return Err(LayoutError::SeatsPerRow(self.seats_per_row));
        }
        let bounds = Bounds {
            rows: self.rows,
            seats_per_row: self.seats_per_row,
        };
        Ok(LayoutConfig {
            rows: self.rows,
            seats_per_row: self.seats_per_row,
            vip_rows: bounds.row_list(&self.vip_rows)?,
            couple_rows: bounds.row_list(&self.couple_rows)?,
            wheelchair_rows: bounds.row_list(&self.wheelchair_rows)?,
            overrides: bounds.overrides(&self.seat_overrides)?,
            row_aisles: bounds.row_aisles(&self.row_aisles)?,
            column_aisles: bounds.column_aisles(&self.column_aisles)?,
        })
    }

    /// Rebuild editor fields from a stored `seatLayout` map.
    ///
    /// Unknown keys are ignored. Values are not range-checked here; call
    /// [`LayoutSpec::parse`] afterwards.
    #[must_use]
    pub fn from_seat_layout(rows: u32, seats_per_row: u32, layout: Option<&Value>) -> Self {
        let mut spec = Self {
            rows,
            seats_per_row,
            ..Self::default()
        };
        let Some(map) = layout.and_then(Value::as_object) else {
            return spec;
        };
        let joined = |key: &str| {
            map.get(key)
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
                        .collect::<Vec<_>>()
                        .join(",")
                })
                .unwrap_or_default()
        };
        spec.vip_rows = joined(VIP_ROWS_KEY);
        spec.couple_rows = joined(COUPLE_ROWS_KEY);
        spec.wheelchair_rows = joined(WHEELCHAIR_ROWS_KEY);
        spec.row_aisles = joined(ROW_AISLES_KEY);
        spec.column_aisles = joined(COLUMN_AISLES_KEY);
        spec.seat_overrides = map
            .iter()
            .filter(|(key, _)| split_seat_key(key).is_some())
            .filter_map(|(key, v)| v.as_str().map(|t| format!("{key}:{t}")))
            .collect::<Vec<_>>()
            .join(",");
        spec
    }
}

#[derive(Clone, Copy)]
struct Bounds {
    rows: u32,
    seats_per_row: u32,
}

fn tokens(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|t| !t.is_empty())
}

impl Bounds {
    fn last_row(self) -> char {
        row_letter(self.rows - 1).unwrap_or('Z')
    }

    fn row(self, token: &str) -> Result<char, LayoutError> {
        let mut chars = token.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return Err(LayoutError::InvalidRow(token.to_string()));
        };
        if !c.is_ascii_alphabetic() {
            return Err(LayoutError::InvalidRow(token.to_string()));
        }
        let row = c.to_ascii_uppercase();
        if row_index(row) >= self.rows {
            return Err(LayoutError::RowOutOfRange {
                row,
                last: self.last_row(),
            });
        }
        Ok(row)
    }

    fn row_list(self, raw: &str) -> Result<BTreeSet<char>, LayoutError> {
        tokens(raw).map(|t| self.row(t)).collect()
    }

    fn seat_key(self, token: &str) -> Result<SeatKey, LayoutError> {
        let (row, number) = split_seat_key(token)
            .ok_or_else(|| LayoutError::InvalidSeatKey(token.to_string()))?;
        let row = self.row(row)?;
        let number: u32 = number
            .parse()
            .map_err(|_| LayoutError::InvalidSeatKey(token.to_string()))?;
        if number == 0 || number > self.seats_per_row {
            return Err(LayoutError::SeatOutOfRange(token.to_ascii_uppercase()));
        }
        Ok(SeatKey { row, number })
    }

    fn overrides(self, raw: &str) -> Result<BTreeMap<SeatKey, SeatType>, LayoutError> {
        tokens(raw)
            .map(|token| -> Result<(SeatKey, SeatType), LayoutError> {
                let (key, kind) = token
                    .split_once(':')
                    .ok_or_else(|| LayoutError::InvalidOverride(token.to_string()))?;
                let key = self.seat_key(key.trim())?;
                let kind = SeatType::parse(kind)
                    .ok_or_else(|| LayoutError::UnknownSeatType(kind.trim().to_string()))?;
                Ok((key, kind))
            })
            .collect()
    }

    fn row_aisles(self, raw: &str) -> Result<BTreeSet<char>, LayoutError> {
        tokens(raw)
            .map(|token| -> Result<char, LayoutError> {
                let invalid = || LayoutError::InvalidAisle(token.to_string());
                let (front, back) = token.split_once('-').ok_or_else(invalid)?;
                let front = self.row(front.trim())?;
                let back = self.row(back.trim())?;
                if row_index(back) != row_index(front) + 1 {
                    return Err(invalid());
                }
                Ok(front)
            })
            .collect()
    }

    fn column_aisles(self, raw: &str) -> Result<BTreeSet<u32>, LayoutError> {
        tokens(raw)
            .map(|token| {
                token
                    .parse::<u32>()
                    .ok()
                    .filter(|n| (1..self.seats_per_row).contains(n))
                    .ok_or_else(|| LayoutError::InvalidColumn(token.to_string()))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeatKey {
    pub row: char,
    pub number: u32,
}

impl std::fmt::Display for SeatKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.row, self.number)
    }
}

/// Validated layout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutConfig {
    pub rows: u32,
    pub seats_per_row: u32,
    pub vip_rows: BTreeSet<char>,
    pub couple_rows: BTreeSet<char>,
    pub wheelchair_rows: BTreeSet<char>,
    pub overrides: BTreeMap<SeatKey, SeatType>,
    /// Rows followed by an aisle.
    pub row_aisles: BTreeSet<char>,
    /// Seat numbers followed by an aisle.
    pub column_aisles: BTreeSet<u32>,
}

impl LayoutConfig {
    /// Resolve one seat's type.
    #[must_use]
    pub fn seat_type(&self, row: char, number: u32) -> SeatType {
        if let Some(kind) = self.overrides.get(&SeatKey { row, number }) {
            return *kind;
        }
        if self.vip_rows.contains(&row) {
            SeatType::Vip
        } else if self.couple_rows.contains(&row) {
            SeatType::Couple
        } else if self.wheelchair_rows.contains(&row) {
            SeatType::Wheelchair
        } else if matches!(row, 'A' | 'B') {
            SeatType::Vip
        } else {
            SeatType::Standard
        }
    }

    /// Expand into the full seat grid.
    #[must_use]
    pub fn generate(&self) -> SeatGrid {
        let rows = (0..self.rows)
            .filter_map(row_letter)
            .map(|row| LayoutRow {
                row,
                aisle_after: self.row_aisles.contains(&row),
                seats: (1..=self.seats_per_row)
                    .map(|number| LayoutSeat {
                        label: format!("{row}{number}"),
                        row,
                        number,
                        seat_type: self.seat_type(row, number),
                        aisle_after: self.column_aisles.contains(&number),
                    })
                    .collect(),
            })
            .collect();
        SeatGrid { rows }
    }

    /// Backend `seatLayout` map for this configuration. Empty sections are
    /// omitted, so a plain hall serializes to `{}`.
    #[must_use]
    pub fn to_seat_layout(&self) -> Value {
        let mut map = Map::new();
        let letters = |set: &BTreeSet<char>| {
            Value::Array(set.iter().map(|c| Value::String(c.to_string())).collect())
        };
        for (key, set) in [
            (VIP_ROWS_KEY, &self.vip_rows),
            (COUPLE_ROWS_KEY, &self.couple_rows),
            (WHEELCHAIR_ROWS_KEY, &self.wheelchair_rows),
        ] {
            if !set.is_empty() {
                map.insert(key.to_string(), letters(set));
            }
        }
        if !self.row_aisles.is_empty() {
            let aisles = self
                .row_aisles
                .iter()
                .filter_map(|&front| {
                    row_letter(row_index(front) + 1)
                        .map(|back| Value::String(format!("{front}-{back}")))
                })
                .collect();
            map.insert(ROW_AISLES_KEY.to_string(), Value::Array(aisles));
        }
        if !self.column_aisles.is_empty() {
            map.insert(
                COLUMN_AISLES_KEY.to_string(),
                Value::Array(self.column_aisles.iter().map(|&n| Value::from(n)).collect()),
            );
        }
        for (key, kind) in &self.overrides {
            map.insert(key.to_string(), Value::String(kind.as_str().to_string()));
        }
        Value::Object(map)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSeat {
    pub label: String,
    pub row: char,
    pub number: u32,
    pub seat_type: SeatType,
    pub aisle_after: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRow {
    pub row: char,
    pub seats: Vec<LayoutSeat>,
    pub aisle_after: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SeatGrid {
    pub rows: Vec<LayoutRow>,
}

impl SeatGrid {
    #[must_use]
    pub fn total_seats(&self) -> usize {
        self.rows.iter().map(|r| r.seats.len()).sum()
    }

    #[must_use]
    pub fn counts(&self) -> BTreeMap<SeatType, usize> {
        let mut counts = BTreeMap::new();
        for seat in self.rows.iter().flat_map(|r| &r.seats) {
            *counts.entry(seat.seat_type).or_insert(0) += 1;
        }
        counts
    }

    #[must_use]
    pub fn count(&self, seat_type: SeatType) -> usize {
        self.counts().get(&seat_type).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn seat(&self, row: char, number: u32) -> Option<&LayoutSeat> {
        self.rows
            .iter()
            .find(|r| r.row == row)
            .and_then(|r| r.seats.iter().find(|s| s.number == number))
    }
}

/// Whether an aisle follows `row` in a stored `seatLayout` map (`"B-C"`
/// places an aisle after row B).
#[must_use]
pub fn aisle_after_row(layout: Option<&Value>, row: &str) -> bool {
    layout
        .and_then(|l| l.get(ROW_AISLES_KEY))
        .and_then(Value::as_array)
        .is_some_and(|aisles| {
            aisles
                .iter()
                .filter_map(Value::as_str)
                .any(|a| a.split('-').next().is_some_and(|front| front.trim() == row))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(rows: u32, seats: u32) -> LayoutSpec {
        LayoutSpec {
            rows,
            seats_per_row: seats,
            ..LayoutSpec::default()
        }
    }

    #[test]
    fn plain_hall_defaults_front_rows_to_vip() {
        let grid = spec(4, 5).parse().expect("valid").generate();
        assert_eq!(grid.total_seats(), 20);
        assert_eq!(grid.count(SeatType::Vip), 10);
        assert_eq!(grid.count(SeatType::Standard), 10);
        assert_eq!(grid.rows[0].seats[0].label, "A1");
    }

    #[test]
    fn resolution_priority_matches_seat_generation() {
        let config = LayoutSpec {
            vip_rows: "e".into(),
            couple_rows: "E, F".into(),
            wheelchair_rows: "G".into(),
            seat_overrides: "E1:couple, A2:STANDARD, G3:premium".into(),
            ..spec(8, 6)
        }
        .parse()
        .expect("valid");

        assert_eq!(config.seat_type('E', 1), SeatType::Couple);
        assert_eq!(config.seat_type('E', 2), SeatType::Vip);
        assert_eq!(config.seat_type('F', 2), SeatType::Couple);
        assert_eq!(config.seat_type('G', 1), SeatType::Wheelchair);
        assert_eq!(config.seat_type('G', 3), SeatType::Vip);
        assert_eq!(config.seat_type('A', 2), SeatType::Standard);
        assert_eq!(config.seat_type('A', 1), SeatType::Vip);
        assert_eq!(config.seat_type('C', 1), SeatType::Standard);
    }

    #[test]
    fn aisles_mark_rows_and_columns() {
        let grid = LayoutSpec {
            row_aisles: "B-C".into(),
            column_aisles: "3".into(),
            ..spec(4, 6)
        }
        .parse()
        .expect("valid")
        .generate();
        assert!(grid.rows[1].aisle_after);
        assert!(!grid.rows[2].aisle_after);
        assert!(grid.seat('A', 3).is_some_and(|s| s.aisle_after));
        assert!(grid.seat('A', 4).is_some_and(|s| !s.aisle_after));
    }

    #[test]
    fn invalid_fields_are_rejected() {
        assert_eq!(spec(0, 5).parse(), Err(LayoutError::RowCount(0)));
        assert_eq!(spec(27, 5).parse(), Err(LayoutError::RowCount(27)));
        assert_eq!(spec(5, 51).parse(), Err(LayoutError::SeatsPerRow(51)));

        let err = |spec: LayoutSpec| spec.parse().expect_err("invalid");
        assert_eq!(
            err(LayoutSpec { vip_rows: "AA".into(), ..spec(5, 5) }),
            LayoutError::InvalidRow("AA".into())
        );
        assert_eq!(
            err(LayoutSpec { vip_rows: "H".into(), ..spec(5, 5) }),
            LayoutError::RowOutOfRange { row: 'H', last: 'E' }
        );
        assert_eq!(
            err(LayoutSpec { seat_overrides: "A1".into(), ..spec(5, 5) }),
            LayoutError::InvalidOverride("A1".into())
        );
        assert_eq!(
            err(LayoutSpec { seat_overrides: "A9:VIP".into(), ..spec(5, 5) }),
            LayoutError::SeatOutOfRange("A9".into())
        );
        assert_eq!(
            err(LayoutSpec { seat_overrides: "A1:balcony".into(), ..spec(5, 5) }),
            LayoutError::UnknownSeatType("balcony".into())
        );
        assert_eq!(
            err(LayoutSpec { row_aisles: "B-D".into(), ..spec(5, 5) }),
            LayoutError::InvalidAisle("B-D".into())
        );
        assert_eq!(
            err(LayoutSpec { column_aisles: "5".into(), ..spec(5, 5) }),
            LayoutError::InvalidColumn("5".into())
        );
    }

    #[test]
    fn seat_layout_map_round_trips_through_editor_fields() {
        let original = LayoutSpec {
            vip_rows: "D".into(),
            row_aisles: "B-C".into(),
            column_aisles: "4".into(),
            seat_overrides: "C2:WHEELCHAIR".into(),
            ..spec(6, 8)
        };
        let config = original.parse().expect("valid");
        let stored = config.to_seat_layout();
        assert_eq!(stored["VIP_Rows"], json!(["D"]));
        assert_eq!(stored["aisles"], json!(["B-C"]));
        assert_eq!(stored["C2"], json!("WHEELCHAIR"));

        let restored = LayoutSpec::from_seat_layout(6, 8, Some(&stored))
            .parse()
            .expect("valid");
        assert_eq!(restored, config);
        assert!(aisle_after_row(Some(&stored), "B"));
        assert!(!aisle_after_row(Some(&stored), "C"));
    }

    #[test]
    fn empty_config_serializes_to_empty_map() {
        let stored = spec(3, 3).parse().expect("valid").to_seat_layout();
        assert_eq!(stored, json!({}));
        assert!(!aisle_after_row(None, "A"));
    }
}
