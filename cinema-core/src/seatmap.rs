//! Seat map presentation: row grouping, per-seat styling and selectability,
//! plus the deterministic demo map used by the customer preview.

use crate::layout::SeatGrid;
use crate::models::{Seat, SeatStatus, SeatType};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::hash::Hasher;
use twox_hash::XxHash64;

/// Share of demo seats shown as already booked, in percent.
const DEMO_BOOKED_PCT: u32 = 15;
/// Share of demo seats shown as held by someone else, in percent.
const DEMO_HELD_PCT: u32 = 5;

/// Visual class of a seat cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatClass {
    Selected,
    Booked,
    Held,
    Vip,
    Couple,
    Wheelchair,
    Available,
}

impl SeatClass {
    #[must_use]
    pub const fn css(self) -> &'static str {
        match self {
            Self::Selected => "seat seat-selected",
            Self::Booked => "seat seat-booked",
            Self::Held => "seat seat-held",
            Self::Vip => "seat seat-vip",
            Self::Couple => "seat seat-couple",
            Self::Wheelchair => "seat seat-wheelchair",
            Self::Available => "seat seat-available",
        }
    }
}

/// Why a seat cannot be picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatBlock {
    Booked,
    HeldByOther,
}

impl SeatBlock {
    #[must_use]
    pub const fn i18n_key(self) -> &'static str {
        match self {
            Self::Booked => "seats.already_booked",
            Self::HeldByOther => "seats.held_by_other",
        }
    }
}

/// A seat held by `own_session` stays selectable for its holder.
///
/// # Errors
/// The reason the seat is blocked for this viewer.
pub fn check_selectable(seat: &Seat, own_session: Option<&str>) -> Result<(), SeatBlock> {
    match seat.status {
        SeatStatus::Available => Ok(()),
        SeatStatus::Booked => Err(SeatBlock::Booked),
        SeatStatus::Held => {
            let ours = own_session.is_some_and(|own| seat.session_id.as_deref() == Some(own));
            if ours { Ok(()) } else { Err(SeatBlock::HeldByOther) }
        }
    }
}

#[must_use]
pub fn classify(seat: &Seat, own_session: Option<&str>, selected: bool) -> SeatClass {
    if selected {
        return SeatClass::Selected;
    }
    match check_selectable(seat, own_session) {
        Err(SeatBlock::Booked) => SeatClass::Booked,
        Err(SeatBlock::HeldByOther) => SeatClass::Held,
        Ok(()) => match seat.seat_type {
            SeatType::Vip => SeatClass::Vip,
            SeatType::Couple => SeatClass::Couple,
            SeatType::Wheelchair => SeatClass::Wheelchair,
            SeatType::Standard => SeatClass::Available,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatRow {
    pub row: String,
    pub seats: Vec<Seat>,
}

/// Group seats by row letter, rows in order and seats by number.
#[must_use]
pub fn group_by_row(seats: &[Seat]) -> Vec<SeatRow> {
    let mut rows: BTreeMap<&str, Vec<Seat>> = BTreeMap::new();
    for seat in seats {
        rows.entry(seat.seat_row.as_str())
            .or_default()
            .push(seat.clone());
    }
    rows.into_iter()
        .map(|(row, mut seats)| {
            seats.sort_by_key(|s| s.seat_number);
            SeatRow {
                row: row.to_string(),
                seats,
            }
        })
        .collect()
}

/// Stable seed for a showtime's demo map.
#[must_use]
pub fn demo_seed(showtime_key: &str) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(showtime_key.as_bytes());
    hasher.finish()
}

/// Demo seat statuses laid over a generated grid. The same key always yields
/// the same map, so a page refresh does not reshuffle it.
#[must_use]
pub fn demo_seats(showtime_key: &str, grid: &SeatGrid) -> Vec<Seat> {
    let mut rng = ChaCha8Rng::seed_from_u64(demo_seed(showtime_key));
    let mut next_id = 1_i64;
    let mut seats = Vec::with_capacity(grid.total_seats());
    for row in &grid.rows {
        for cell in &row.seats {
            let roll = rng.gen_range(0..100_u32);
            let status = if roll < DEMO_BOOKED_PCT {
                SeatStatus::Booked
            } else if roll < DEMO_BOOKED_PCT + DEMO_HELD_PCT {
                SeatStatus::Held
            } else {
                SeatStatus::Available
            };
            seats.push(Seat {
                seat_id: next_id,
                seat_row: row.row.to_string(),
                seat_number: cell.number,
                seat_type: cell.seat_type,
                status,
                session_id: None,
            });
            next_id += 1;
        }
    }
    seats
}
