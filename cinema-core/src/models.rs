//! Wire-facing data model shared by the storefront and the admin console.
//!
//! Every entity here is owned by the backend. The client only keeps
//! short-lived, denormalized copies, so most descriptive fields are optional
//! and default when absent.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lenient money decoding.
///
/// The backend serializes `BigDecimal` values, which arrive either as JSON
/// integers, JSON floats (`100000.00`) or occasionally as strings. Amounts are
/// whole currency units, so every shape is rounded into an `i64`.
pub mod money {
    use crate::numbers::round_f64_to_i64;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    struct MoneyVisitor;

    impl Visitor<'_> for MoneyVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a monetary amount as a number or numeric string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::custom("amount out of range"))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            Ok(round_f64_to_i64(v))
        }

        fn visit_unit<E: de::Error>(self) -> Result<i64, E> {
            Ok(0)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
            v.trim()
                .parse::<f64>()
                .map(round_f64_to_i64)
                .map_err(|_| E::custom(format!("invalid amount `{v}`")))
        }
    }

    /// # Errors
    /// Fails when the value is neither numeric nor a numeric string.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        d.deserialize_any(MoneyVisitor)
    }

    /// # Errors
    /// Propagates serializer failures.
    pub fn serialize<S: Serializer>(value: &i64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(*value)
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};

        #[derive(Deserialize)]
        struct Wrapped(#[serde(with = "super")] i64);

        /// # Errors
        /// Fails when a present value is not a valid amount.
        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
            Ok(Option::<Wrapped>::deserialize(d)?.map(|Wrapped(v)| v))
        }

        /// # Errors
        /// Propagates serializer failures.
        pub fn serialize<S: Serializer>(value: &Option<i64>, s: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => s.serialize_some(v),
                None => s.serialize_none(),
            }
        }
    }
}

/// Staff and customer roles. Unrecognized role names decode as `Unknown`
/// and never grant access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Customer,
    CinemaStaff,
    CinemaManager,
    SystemAdmin,
    #[serde(other)]
    Unknown,
}

impl Role {
    pub const ALL: [Self; 4] = [
        Self::Customer,
        Self::CinemaStaff,
        Self::CinemaManager,
        Self::SystemAdmin,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "CUSTOMER",
            Self::CinemaStaff => "CINEMA_STAFF",
            Self::CinemaManager => "CINEMA_MANAGER",
            Self::SystemAdmin => "SYSTEM_ADMIN",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Translation key for the role's display name.
    #[must_use]
    pub const fn i18n_key(self) -> &'static str {
        match self {
            Self::Customer => "roles.customer",
            Self::CinemaStaff => "roles.cinema_staff",
            Self::CinemaManager => "roles.cinema_manager",
            Self::SystemAdmin => "roles.system_admin",
            Self::Unknown => "roles.unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed-in profile as cached in local storage under the `user` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i64,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_tier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_points: Option<i64>,
}

/// Credentials posted to `/auth/login`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token pair and profile returned by a successful login.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub movie_id: i64,
    pub title: String,
    #[serde(default)]
    pub title_en: Option<String>,
    #[serde(default)]
    pub age_rating: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CinemaChain {
    pub chain_id: i64,
    pub chain_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cinema {
    pub cinema_id: i64,
    #[serde(default)]
    pub chain_id: Option<i64>,
    pub cinema_name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CinemaHall {
    pub hall_id: i64,
    pub cinema_id: i64,
    pub hall_name: String,
    #[serde(default)]
    pub hall_type: Option<String>,
    #[serde(default)]
    pub total_seats: Option<u32>,
    #[serde(default)]
    pub rows_count: Option<u32>,
    #[serde(default)]
    pub seats_per_row: Option<u32>,
    #[serde(default)]
    pub screen_type: Option<String>,
    #[serde(default)]
    pub sound_system: Option<String>,
    /// Free-form layout map; see [`crate::layout`] for the grammar.
    #[serde(default)]
    pub seat_layout: Option<serde_json::Value>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Showtime lifecycle. `SELLING` and `SOLD_OUT` are the backend's spellings
/// of `AVAILABLE` and `FULL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShowtimeStatus {
    Scheduled,
    #[serde(alias = "SELLING")]
    Available,
    #[serde(alias = "SOLD_OUT")]
    Full,
    Cancelled,
    Completed,
}

impl ShowtimeStatus {
    /// Whether seats can still be picked for this showtime.
    #[must_use]
    pub const fn is_bookable(self) -> bool {
        matches!(self, Self::Scheduled | Self::Available)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Showtime {
    pub showtime_id: i64,
    pub movie_id: i64,
    #[serde(default, alias = "movieTitle")]
    pub movie_name: String,
    pub cinema_id: i64,
    #[serde(default)]
    pub cinema_name: String,
    pub hall_id: i64,
    #[serde(default)]
    pub hall_name: String,
    /// `YYYY-MM-DD`
    pub show_date: String,
    /// `HH:MM` or `HH:MM:SS`
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub format_type: Option<String>,
    #[serde(default)]
    pub subtitle_language: Option<String>,
    #[serde(with = "money")]
    pub price: i64,
    #[serde(default)]
    pub available_seats: Option<u32>,
    pub status: ShowtimeStatus,
}

impl Showtime {
    /// Start time trimmed to minute precision.
    #[must_use]
    pub fn start_hhmm(&self) -> &str {
        self.start_time.get(..5).unwrap_or(&self.start_time)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatType {
    #[serde(alias = "NORMAL")]
    Standard,
    #[serde(alias = "PREMIUM")]
    Vip,
    Couple,
    #[serde(alias = "DISABLED")]
    Wheelchair,
}

impl SeatType {
    pub const ALL: [Self; 4] = [Self::Standard, Self::Vip, Self::Couple, Self::Wheelchair];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::Vip => "VIP",
            Self::Couple => "COUPLE",
            Self::Wheelchair => "WHEELCHAIR",
        }
    }

    /// Parse a layout token, accepting the backend's aliases.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "STANDARD" | "NORMAL" => Some(Self::Standard),
            "VIP" | "PREMIUM" => Some(Self::Vip),
            "COUPLE" => Some(Self::Couple),
            "WHEELCHAIR" | "DISABLED" => Some(Self::Wheelchair),
            _ => None,
        }
    }
}

impl fmt::Display for SeatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Available,
    Held,
    #[serde(alias = "SOLD")]
    Booked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub seat_id: i64,
    pub seat_row: String,
    pub seat_number: u32,
    pub seat_type: SeatType,
    pub status: SeatStatus,
    /// Holder session while the seat is `HELD`.
    #[serde(default)]
    pub session_id: Option<String>,
}

impl Seat {
    /// Display label such as `C7`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}{}", self.seat_row, self.seat_number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    #[default]
    BankTransfer,
    EWallet,
    Cash,
    Points,
    Voucher,
}

impl PaymentMethod {
    pub const ALL: [Self; 7] = [
        Self::CreditCard,
        Self::DebitCard,
        Self::BankTransfer,
        Self::EWallet,
        Self::Cash,
        Self::Points,
        Self::Voucher,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCard => "CREDIT_CARD",
            Self::DebitCard => "DEBIT_CARD",
            Self::BankTransfer => "BANK_TRANSFER",
            Self::EWallet => "E_WALLET",
            Self::Cash => "CASH",
            Self::Points => "POINTS",
            Self::Voucher => "VOUCHER",
        }
    }

    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == token)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    #[serde(default)]
    pub ticket_id: Option<i64>,
    #[serde(default)]
    pub ticket_code: Option<String>,
    pub seat_id: i64,
    #[serde(default)]
    pub seat_row: String,
    #[serde(default, deserialize_with = "seat_number_text")]
    pub seat_number: String,
    #[serde(default)]
    pub seat_type: Option<String>,
    #[serde(default, with = "money::option")]
    pub final_price: Option<i64>,
}

fn seat_number_text<'de, D: serde::Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub booking_id: i64,
    pub booking_code: String,
    #[serde(default)]
    pub showtime_id: Option<i64>,
    #[serde(default)]
    pub movie_title: Option<String>,
    #[serde(default)]
    pub tickets: Vec<Ticket>,
    #[serde(default)]
    pub voucher_code: Option<String>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, with = "money")]
    pub subtotal: i64,
    #[serde(default, with = "money")]
    pub service_fee: i64,
    #[serde(default, with = "money")]
    pub tax_amount: i64,
    #[serde(default, with = "money")]
    pub discount_amount: i64,
    #[serde(with = "money")]
    pub total_amount: i64,
    #[serde(default)]
    pub points_used: Option<i64>,
    pub status: BookingStatus,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub payment_reference: Option<String>,
    /// Epoch milliseconds, when the backend still holds seats for this booking.
    #[serde(default)]
    pub hold_expires_at: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcessionCategory {
    pub category_id: i64,
    pub category_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcessionItem {
    pub item_id: i64,
    pub item_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, with = "money")]
    pub default_price: i64,
    #[serde(default, with = "money::option")]
    pub cinema_price: Option<i64>,
    #[serde(default, with = "money::option")]
    pub effective_price: Option<i64>,
    #[serde(default)]
    pub stock_quantity: Option<i32>,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

const fn default_true() -> bool {
    true
}

impl ConcessionItem {
    /// Effective price, else the cinema override, else the default price.
    #[must_use]
    pub fn unit_price(&self) -> i64 {
        self.effective_price
            .or(self.cinema_price)
            .unwrap_or(self.default_price)
    }

    /// Sellable right now: marked available and not explicitly out of stock.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.is_available && self.stock_quantity.is_none_or(|q| q > 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyBalance {
    #[serde(default)]
    pub available_points: i64,
    #[serde(default)]
    pub total_earned: i64,
    #[serde(default)]
    pub total_redeemed: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsTransaction {
    pub transaction_id: i64,
    pub transaction_type: String,
    pub points_amount: i64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub balance_after: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Body of `POST /payments/process`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub booking_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub booking_code: Option<String>,
    pub status: String,
    #[serde(default, with = "money::option")]
    pub amount: Option<i64>,
    #[serde(default)]
    pub qr_code_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn showtime_reads_backend_status_spellings() {
        let raw = json!({
            "showtimeId": 11, "movieId": 3, "movieName": "Dune",
            "cinemaId": 2, "cinemaName": "Central", "hallId": 5, "hallName": "Hall 1",
            "showDate": "2024-06-01", "startTime": "19:30:00",
            "price": 100000.00, "status": "SELLING"
        });
        let showtime: Showtime = serde_json::from_value(raw).expect("showtime");
        assert_eq!(showtime.status, ShowtimeStatus::Available);
        assert_eq!(showtime.price, 100_000);
        assert_eq!(showtime.start_hhmm(), "19:30");

        let full: ShowtimeStatus = serde_json::from_value(json!("SOLD_OUT")).expect("status");
        assert_eq!(full, ShowtimeStatus::Full);
        assert!(!full.is_bookable());
    }

    #[test]
    fn seat_aliases_map_to_canonical_variants() {
        let seat: Seat = serde_json::from_value(json!({
            "seatId": 1, "seatRow": "A", "seatNumber": 4,
            "seatType": "PREMIUM", "status": "SOLD"
        }))
        .expect("seat");
        assert_eq!(seat.seat_type, SeatType::Vip);
        assert_eq!(seat.status, SeatStatus::Booked);
        assert_eq!(seat.label(), "A4");
        assert_eq!(SeatType::parse("disabled"), Some(SeatType::Wheelchair));
        assert_eq!(SeatType::parse("balcony"), None);
    }

    #[test]
    fn unknown_roles_do_not_break_user_parsing() {
        let user: User = serde_json::from_value(json!({
            "userId": 9, "fullName": "Linh", "email": "linh@example.com",
            "roles": ["CUSTOMER", "AUDITOR"]
        }))
        .expect("user");
        assert_eq!(user.roles, vec![Role::Customer, Role::Unknown]);
    }

    #[test]
    fn concession_price_prefers_effective_then_cinema_then_default() {
        let mut item: ConcessionItem = serde_json::from_value(json!({
            "itemId": 1, "itemName": "Popcorn", "defaultPrice": "45000",
            "cinemaPrice": 50000, "effectivePrice": null
        }))
        .expect("item");
        assert_eq!(item.unit_price(), 50_000);
        item.effective_price = Some(48_000);
        assert_eq!(item.unit_price(), 48_000);
        item.effective_price = None;
        item.cinema_price = None;
        assert_eq!(item.unit_price(), 45_000);
        assert!(item.in_stock());
        item.stock_quantity = Some(0);
        assert!(!item.in_stock());
    }

    #[test]
    fn booking_accepts_numeric_seat_numbers_in_tickets() {
        let booking: Booking = serde_json::from_value(json!({
            "bookingId": 7, "bookingCode": "BK7", "status": "PENDING",
            "totalAmount": 230000,
            "tickets": [{"seatId": 3, "seatRow": "B", "seatNumber": 12}]
        }))
        .expect("booking");
        assert_eq!(booking.tickets[0].seat_number, "12");
        assert_eq!(booking.subtotal, 0);
    }
}
