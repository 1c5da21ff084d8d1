//! Seat holds: session ids, the selection, and the hold countdown.
//!
//! A hold is requested from the backend with a client-generated session id
//! and comes back with an absolute expiry. [`HoldCoordinator`] owns the
//! selection, the session id and the countdown together so that expiry
//! clears all three in one step, exactly once.

use chrono::{DateTime, Datelike, NaiveDate};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::models::{Seat, SeatType};

/// Most seats one customer may hold at once.
pub const MAX_SELECTED_SEATS: usize = 10;
/// Remaining seconds at which the customer flow asks for more time.
pub const EXTEND_THRESHOLD_SECS: u64 = 60;
/// Minutes requested per extension.
pub const EXTEND_MINUTES: u32 = 5;
/// Length of a fresh customer hold, used before the backend answers.
pub const DEFAULT_HOLD_SECS: u64 = 300;

const SUFFIX_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

static SESSION_ID: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^UUID-\d{8}-HOLD-[A-Z0-9]{6}$").ok());

/// Opaque hold token, `UUID-YYYYMMDD-HOLD-XXXXXX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    #[must_use]
    pub fn generate<R: Rng + ?Sized>(date: NaiveDate, rng: &mut R) -> Self {
        let suffix: String = (0..6)
            .map(|_| char::from(SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())]))
            .collect();
        Self(format!(
            "UUID-{:04}{:02}{:02}-HOLD-{suffix}",
            date.year(),
            date.month(),
            date.day()
        ))
    }

    /// Accept a token only when it has the generated shape.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        SESSION_ID
            .as_ref()
            .is_some_and(|re| re.is_match(raw))
            .then(|| Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `POST /seats/hold`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldRequest {
    pub showtime_id: i64,
    pub seat_ids: Vec<i64>,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

/// Hold confirmation. Only the expiry matters to the client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldGrant {
    #[serde(deserialize_with = "epoch_millis")]
    pub hold_expires_at: i64,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// Expiry as epoch milliseconds, or an RFC 3339 instant.
fn epoch_millis<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Float(f64),
        Text(String),
    }
    match Raw::deserialize(d)? {
        Raw::Millis(ms) => Ok(ms),
        Raw::Float(ms) => Ok(crate::numbers::round_f64_to_i64(ms)),
        Raw::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|t| t.timestamp_millis())
            .map_err(serde::de::Error::custom),
    }
}

/// A picked seat, kept small enough to live inline in the selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedSeat {
    pub seat_id: i64,
    pub label: String,
    pub seat_type: SeatType,
}

impl From<&Seat> for SelectedSeat {
    fn from(seat: &Seat) -> Self {
        Self {
            seat_id: seat.seat_id,
            label: seat.label(),
            seat_type: seat.seat_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    /// The selection already holds [`MAX_SELECTED_SEATS`].
    LimitReached,
    /// Seats are locked while a hold is running.
    HoldActive,
}

impl SelectionError {
    #[must_use]
    pub const fn i18n_key(self) -> &'static str {
        match self {
            Self::LimitReached => "seats.limit_reached",
            Self::HoldActive => "seats.hold_active",
        }
    }
}

/// Ordered set of picked seats, capped at [`MAX_SELECTED_SEATS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatSelection {
    seats: SmallVec<[SelectedSeat; MAX_SELECTED_SEATS]>,
}

impl SeatSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the seat, or remove it when already picked.
    ///
    /// # Errors
    /// `LimitReached` when adding beyond the cap.
    pub fn toggle(&mut self, seat: SelectedSeat) -> Result<Toggle, SelectionError> {
        if let Some(pos) = self.seats.iter().position(|s| s.seat_id == seat.seat_id) {
            self.seats.remove(pos);
            return Ok(Toggle::Removed);
        }
        if self.seats.len() >= MAX_SELECTED_SEATS {
            return Err(SelectionError::LimitReached);
        }
        self.seats.push(seat);
        Ok(Toggle::Added)
    }

    pub fn remove(&mut self, seat_id: i64) -> bool {
        let before = self.seats.len();
        self.seats.retain(|s| s.seat_id != seat_id);
        before != self.seats.len()
    }

    pub fn clear(&mut self) {
        self.seats.clear();
    }

    #[must_use]
    pub fn contains(&self, seat_id: i64) -> bool {
        self.seats.iter().any(|s| s.seat_id == seat_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    #[must_use]
    pub fn seat_ids(&self) -> Vec<i64> {
        self.seats.iter().map(|s| s.seat_id).collect()
    }

    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.seats.iter().map(|s| s.label.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectedSeat> {
        self.seats.iter()
    }
}

/// Whole seconds left before `expires_at`, never negative.
#[must_use]
pub fn remaining_secs(expires_at_ms: i64, now_ms: i64) -> u64 {
    let left = expires_at_ms.saturating_sub(now_ms).max(0) / 1000;
    u64::try_from(left).unwrap_or(0)
}

/// `m:ss` rendering of a countdown.
#[must_use]
pub fn format_remaining(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// No hold is running.
    Idle,
    Remaining(u64),
    /// Emitted once; the countdown is idle afterwards.
    Expired,
}

/// One-second countdown towards a hold expiry. Time is passed in so the
/// state machine stays deterministic under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoldCountdown {
    expires_at: Option<i64>,
}

impl HoldCountdown {
    /// Start, or replace, the running countdown.
    pub fn start(&mut self, expires_at_ms: i64) {
        self.expires_at = Some(expires_at_ms);
    }

    pub fn stop(&mut self) {
        self.expires_at = None;
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.expires_at.is_some()
    }

    #[must_use]
    pub const fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }

    pub fn tick(&mut self, now_ms: i64) -> Tick {
        let Some(expires_at) = self.expires_at else {
            return Tick::Idle;
        };
        if expires_at.saturating_sub(now_ms) <= 0 {
            self.expires_at = None;
            return Tick::Expired;
        }
        Tick::Remaining(remaining_secs(expires_at, now_ms))
    }
}

/// How seat clicks interact with a running hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoldPolicy {
    /// Storefront: every change re-holds the selection; the hold is extended
    /// once near the end.
    #[default]
    Rehold,
    /// Box-office counter: seats are locked while the hold runs.
    LockWhileHeld,
}

/// Seats to give back to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub session_id: SessionId,
    pub seat_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldEvent {
    Idle,
    Remaining { secs: u64, extend: bool },
    /// Selection and session were cleared; the seat map must be refetched.
    Expired { release: Option<Release> },
}

/// Selection + session id + countdown, moved together.
#[derive(Debug, Clone, Default)]
pub struct HoldCoordinator {
    policy: HoldPolicy,
    selection: SeatSelection,
    session: Option<SessionId>,
    countdown: HoldCountdown,
    extended: bool,
}

impl HoldCoordinator {
    #[must_use]
    pub fn new(policy: HoldPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn policy(&self) -> HoldPolicy {
        self.policy
    }

    #[must_use]
    pub const fn selection(&self) -> &SeatSelection {
        &self.selection
    }

    #[must_use]
    pub const fn session(&self) -> Option<&SessionId> {
        self.session.as_ref()
    }

    #[must_use]
    pub const fn is_holding(&self) -> bool {
        self.countdown.is_running()
    }

    #[must_use]
    pub const fn expires_at(&self) -> Option<i64> {
        self.countdown.expires_at()
    }

    /// Current session id, minting one with `mint` when there is none.
    pub fn ensure_session(&mut self, mint: impl FnOnce() -> SessionId) -> SessionId {
        self.session.get_or_insert_with(mint).clone()
    }

    /// Toggle a seat subject to the cap and the hold policy.
    ///
    /// # Errors
    /// `HoldActive` under [`HoldPolicy::LockWhileHeld`] while holding, or
    /// `LimitReached` from the selection.
    pub fn toggle(&mut self, seat: SelectedSeat) -> Result<Toggle, SelectionError> {
        if self.policy == HoldPolicy::LockWhileHeld && self.is_holding() {
            return Err(SelectionError::HoldActive);
        }
        self.selection.toggle(seat)
    }

    /// Build the hold request for the current selection.
    #[must_use]
    pub fn hold_request(&self, showtime_id: i64, customer_email: Option<String>) -> Option<HoldRequest> {
        let session = self.session.as_ref()?;
        if self.selection.is_empty() {
            return None;
        }
        Some(HoldRequest {
            showtime_id,
            seat_ids: self.selection.seat_ids(),
            session_id: session.to_string(),
            customer_email,
        })
    }

    /// Record a granted hold. Replaces any running countdown.
    ///
    /// Returns `false`, leaving the countdown alone, when every seat was
    /// dropped while the request was in flight.
    pub fn hold_granted(&mut self, grant: &HoldGrant) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.countdown.start(grant.hold_expires_at);
        self.extended = false;
        true
    }

    /// Record an extension granted by the backend.
    pub fn hold_extended(&mut self, grant: &HoldGrant) {
        self.countdown.start(grant.hold_expires_at);
    }

    /// Drive the countdown.
    pub fn tick(&mut self, now_ms: i64) -> HoldEvent {
        match self.countdown.tick(now_ms) {
            Tick::Idle => HoldEvent::Idle,
            Tick::Remaining(secs) => {
                let extend = self.policy == HoldPolicy::Rehold
                    && !self.extended
                    && secs <= EXTEND_THRESHOLD_SECS;
                if extend {
                    self.extended = true;
                }
                HoldEvent::Remaining { secs, extend }
            }
            Tick::Expired => HoldEvent::Expired {
                release: self.reset(),
            },
        }
    }

    /// Drop one seat after the backend released it.
    pub fn seat_released(&mut self, seat_id: i64) {
        self.selection.remove(seat_id);
        if self.selection.is_empty() {
            self.countdown.stop();
        }
    }

    /// Clear selection, session and countdown, returning what was held.
    pub fn reset(&mut self) -> Option<Release> {
        self.countdown.stop();
        self.extended = false;
        let seat_ids = self.selection.seat_ids();
        self.selection.clear();
        let session_id = self.session.take()?;
        (!seat_ids.is_empty()).then_some(Release {
            session_id,
            seat_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn session() -> SessionId {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).expect("date");
        SessionId::generate(date, &mut ChaCha8Rng::seed_from_u64(7))
    }

    fn pick(id: i64) -> SelectedSeat {
        SelectedSeat {
            seat_id: id,
            label: format!("A{id}"),
            seat_type: SeatType::Standard,
        }
    }

    #[test]
    fn session_ids_have_the_hold_shape() {
        let id = session();
        assert!(id.as_str().starts_with("UUID-20240601-HOLD-"));
        assert_eq!(id.as_str().len(), "UUID-20240601-HOLD-".len() + 6);
        assert_eq!(SessionId::parse(id.as_str()), Some(id));
        assert_eq!(SessionId::parse("UUID-2024-HOLD-x"), None);
    }

    #[test]
    fn selection_caps_at_ten_and_toggles_off() {
        let mut selection = SeatSelection::new();
        for id in 1..=10 {
            assert_eq!(selection.toggle(pick(id)), Ok(Toggle::Added));
        }
        assert_eq!(selection.toggle(pick(11)), Err(SelectionError::LimitReached));
        assert_eq!(selection.toggle(pick(3)), Ok(Toggle::Removed));
        assert_eq!(selection.len(), 9);
        assert!(!selection.contains(3));
    }

    #[test]
    fn countdown_reports_whole_seconds_and_formats() {
        assert_eq!(remaining_secs(10_999, 1_000), 9);
        assert_eq!(remaining_secs(1_000, 5_000), 0);
        assert_eq!(format_remaining(300), "5:00");
        assert_eq!(format_remaining(61), "1:01");
        assert_eq!(format_remaining(9), "0:09");
    }

    #[test]
    fn expiry_clears_selection_and_session_exactly_once() {
        let mut hold = HoldCoordinator::new(HoldPolicy::Rehold);
        let sid = hold.ensure_session(session);
        hold.toggle(pick(1)).expect("pick");
        hold.toggle(pick(2)).expect("pick");
        let now = 1_700_000_000_000_i64;
        hold.hold_granted(&HoldGrant {
            hold_expires_at: now + 2_000,
            session_id: None,
        });

        assert_eq!(
            hold.tick(now + 1_000),
            HoldEvent::Remaining {
                secs: 1,
                extend: true
            }
        );
        let expired = hold.tick(now + 2_000);
        assert_eq!(
            expired,
            HoldEvent::Expired {
                release: Some(Release {
                    session_id: sid,
                    seat_ids: vec![1, 2]
                })
            }
        );
        assert!(hold.selection().is_empty());
        assert!(hold.session().is_none());
        assert_eq!(hold.tick(now + 3_000), HoldEvent::Idle);
        assert_eq!(hold.tick(now + 4_000), HoldEvent::Idle);
    }

    #[test]
    fn late_grant_for_an_emptied_selection_is_ignored() {
        let mut hold = HoldCoordinator::new(HoldPolicy::Rehold);
        hold.ensure_session(session);
        hold.toggle(pick(3)).expect("pick");
        hold.seat_released(3);
        let applied = hold.hold_granted(&HoldGrant {
            hold_expires_at: 300_000,
            session_id: None,
        });
        assert!(!applied);
        assert!(!hold.is_holding());
        assert_eq!(hold.tick(1_000), HoldEvent::Idle);
    }

    #[test]
    fn extension_is_requested_once() {
        let mut hold = HoldCoordinator::new(HoldPolicy::Rehold);
        hold.ensure_session(session);
        hold.toggle(pick(1)).expect("pick");
        hold.hold_granted(&HoldGrant {
            hold_expires_at: 61_000,
            session_id: None,
        });
        assert_eq!(
            hold.tick(0),
            HoldEvent::Remaining {
                secs: 61,
                extend: false
            }
        );
        assert_eq!(
            hold.tick(1_000),
            HoldEvent::Remaining {
                secs: 60,
                extend: true
            }
        );
        assert_eq!(
            hold.tick(2_000),
            HoldEvent::Remaining {
                secs: 59,
                extend: false
            }
        );
        hold.hold_extended(&HoldGrant {
            hold_expires_at: 360_000,
            session_id: None,
        });
        assert_eq!(
            hold.tick(3_000),
            HoldEvent::Remaining {
                secs: 357,
                extend: false
            }
        );
    }

    #[test]
    fn counter_policy_locks_seats_while_holding() {
        let mut hold = HoldCoordinator::new(HoldPolicy::LockWhileHeld);
        hold.ensure_session(session);
        hold.toggle(pick(4)).expect("pick");
        let request = hold.hold_request(42, None).expect("request");
        assert_eq!(request.seat_ids, vec![4]);
        hold.hold_granted(&HoldGrant {
            hold_expires_at: 10_000,
            session_id: None,
        });
        assert_eq!(hold.toggle(pick(5)), Err(SelectionError::HoldActive));
        assert_eq!(
            hold.tick(0),
            HoldEvent::Remaining {
                secs: 10,
                extend: false
            }
        );
    }

    #[test]
    fn new_grant_replaces_running_countdown() {
        let mut hold = HoldCoordinator::new(HoldPolicy::Rehold);
        hold.ensure_session(session);
        hold.toggle(pick(1)).expect("pick");
        hold.hold_granted(&HoldGrant {
            hold_expires_at: 5_000,
            session_id: None,
        });
        hold.hold_granted(&HoldGrant {
            hold_expires_at: 300_000,
            session_id: None,
        });
        assert!(matches!(hold.tick(6_000), HoldEvent::Remaining { .. }));
    }

    #[test]
    fn grant_accepts_millis_or_instants() {
        let grant: HoldGrant =
            serde_json::from_str(r#"{"holdExpiresAt":1717236000000}"#).expect("millis");
        assert_eq!(grant.hold_expires_at, 1_717_236_000_000);
        let grant: HoldGrant =
            serde_json::from_str(r#"{"holdExpiresAt":"2024-06-01T10:00:00Z"}"#).expect("instant");
        assert_eq!(grant.hold_expires_at, 1_717_236_000_000);
    }

    #[test]
    fn releasing_last_seat_stops_the_countdown() {
        let mut hold = HoldCoordinator::new(HoldPolicy::Rehold);
        hold.ensure_session(session);
        hold.toggle(pick(1)).expect("pick");
        hold.hold_granted(&HoldGrant {
            hold_expires_at: 50_000,
            session_id: None,
        });
        hold.seat_released(1);
        assert!(!hold.is_holding());
        assert_eq!(hold.tick(1_000), HoldEvent::Idle);
    }
}
