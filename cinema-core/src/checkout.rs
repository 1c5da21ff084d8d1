//! Checkout: the ticket gate, the concession cart, the booking request and
//! the bank-transfer QR instruction shown after a booking is created.

use crate::config::QrConfig;
use crate::hold::SeatSelection;
use crate::models::{ConcessionItem, PaymentMethod};
use crate::pricing;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Tickets requested per category. Categories only feed the seat-count gate;
/// prices come from the showtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TicketCounts {
    pub adult: u32,
    pub student: u32,
    pub senior: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketKind {
    Adult,
    Student,
    Senior,
}

impl TicketKind {
    pub const ALL: [Self; 3] = [Self::Adult, Self::Student, Self::Senior];

    #[must_use]
    pub const fn i18n_key(self) -> &'static str {
        match self {
            Self::Adult => "tickets.adult",
            Self::Student => "tickets.student",
            Self::Senior => "tickets.senior",
        }
    }
}

impl TicketCounts {
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.adult.saturating_add(self.student).saturating_add(self.senior)
    }

    /// Trim counts read from outside (a link, a stored draft) so the total is
    /// at most `max`, filling adults first.
    #[must_use]
    pub fn capped(self, max: u32) -> Self {
        let mut out = Self::default();
        for kind in TicketKind::ALL {
            out.set(kind, self.get(kind), max);
        }
        out
    }

    #[must_use]
    pub const fn get(&self, kind: TicketKind) -> u32 {
        match kind {
            TicketKind::Adult => self.adult,
            TicketKind::Student => self.student,
            TicketKind::Senior => self.senior,
        }
    }

    /// Set one category, keeping the total within `max`.
    pub fn set(&mut self, kind: TicketKind, count: u32, max: u32) {
        let others = self.total().saturating_sub(self.get(kind));
        let count = count.min(max.saturating_sub(others));
        match kind {
            TicketKind::Adult => self.adult = count,
            TicketKind::Student => self.student = count,
            TicketKind::Senior => self.senior = count,
        }
    }
}

/// Client-side gate: checkout needs at least one ticket and exactly one
/// selected seat per ticket.
#[must_use]
pub const fn checkout_enabled(selected_seats: usize, tickets_requested: u32) -> bool {
    tickets_requested > 0 && selected_seats == tickets_requested as usize
}

/// One concession line on the booking request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcessionLine {
    pub item_id: i64,
    pub quantity: u32,
    pub price: i64,
}

/// `itemId -> quantity`. Lives only as long as the checkout page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConcessionCart {
    quantities: BTreeMap<i64, u32>,
}

impl ConcessionCart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `qty` of an item. Returns the new quantity.
    pub fn add(&mut self, item_id: i64, qty: u32) -> u32 {
        let entry = self.quantities.entry(item_id).or_insert(0);
        *entry = entry.saturating_add(qty);
        *entry
    }

    /// Remove up to `qty` of an item, dropping the line at zero. Returns the
    /// new quantity.
    pub fn remove(&mut self, item_id: i64, qty: u32) -> u32 {
        let Some(entry) = self.quantities.get_mut(&item_id) else {
            return 0;
        };
        *entry = entry.saturating_sub(qty);
        let left = *entry;
        if left == 0 {
            self.quantities.remove(&item_id);
        }
        left
    }

    #[must_use]
    pub fn quantity(&self, item_id: i64) -> u32 {
        self.quantities.get(&item_id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    pub fn clear(&mut self) {
        self.quantities.clear();
    }

    /// Priced lines for items still present in the catalog.
    #[must_use]
    pub fn lines(&self, items: &[ConcessionItem]) -> Vec<ConcessionLine> {
        self.quantities
            .iter()
            .filter_map(|(&item_id, &quantity)| {
                items
                    .iter()
                    .find(|i| i.item_id == item_id)
                    .map(|item| ConcessionLine {
                        item_id,
                        quantity,
                        price: item.unit_price(),
                    })
            })
            .collect()
    }

    #[must_use]
    pub fn subtotal(&self, items: &[ConcessionItem]) -> i64 {
        pricing::concession_subtotal(self.lines(items).iter().map(|l| (l.price, l.quantity)))
    }
}

/// Body of `POST /bookings` (and `/bookings/admin` at the counter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub showtime_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    pub seat_ids: Vec<i64>,
    pub session_id: String,
    pub voucher_code: Option<String>,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub concession_items: Vec<ConcessionLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_to_use: Option<i64>,
}

/// Contact details for a booking without an account.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuestContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Customer {
    Member { user_id: i64 },
    Guest(GuestContact),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("no seats selected")]
    NoSeats,
    #[error("selected seats do not match the tickets chosen")]
    TicketMismatch,
    #[error("guest bookings need a name")]
    MissingName,
    #[error("guest bookings need an email")]
    MissingEmail,
    #[error("guest bookings need a phone number")]
    MissingPhone,
}

impl CheckoutError {
    #[must_use]
    pub const fn i18n_key(self) -> &'static str {
        match self {
            Self::NoSeats => "checkout.error_no_seats",
            Self::TicketMismatch => "checkout.error_ticket_mismatch",
            Self::MissingName => "checkout.error_guest_name",
            Self::MissingEmail => "checkout.error_guest_email",
            Self::MissingPhone => "checkout.error_guest_phone",
        }
    }
}

/// Everything the checkout page gathered.
#[derive(Debug, Clone)]
pub struct BookingDraft<'a> {
    pub showtime_id: i64,
    pub session_id: &'a str,
    pub selection: &'a SeatSelection,
    pub tickets: TicketCounts,
    pub customer: Customer,
    pub voucher_code: &'a str,
    pub payment_method: PaymentMethod,
    pub concessions: Vec<ConcessionLine>,
    pub points_to_use: i64,
}

impl BookingDraft<'_> {
    /// Validate the draft and build the request.
    ///
    /// # Errors
    /// A [`CheckoutError`] naming the first problem found.
    pub fn into_request(self) -> Result<CreateBookingRequest, CheckoutError> {
        if self.selection.is_empty() {
            return Err(CheckoutError::NoSeats);
        }
        if !checkout_enabled(self.selection.len(), self.tickets.total()) {
            return Err(CheckoutError::TicketMismatch);
        }
        let (user_id, name, email, phone) = match self.customer {
            Customer::Member { user_id } => (Some(user_id), None, None, None),
            Customer::Guest(contact) => {
                let field = |v: String, err| {
                    let v = v.trim().to_string();
                    if v.is_empty() { Err(err) } else { Ok(v) }
                };
                (
                    None,
                    Some(field(contact.name, CheckoutError::MissingName)?),
                    Some(field(contact.email, CheckoutError::MissingEmail)?),
                    Some(field(contact.phone, CheckoutError::MissingPhone)?),
                )
            }
        };
        let voucher = self.voucher_code.trim();
        Ok(CreateBookingRequest {
            user_id,
            showtime_id: self.showtime_id,
            customer_name: name,
            customer_email: email,
            customer_phone: phone,
            seat_ids: self.selection.seat_ids(),
            session_id: self.session_id.to_string(),
            voucher_code: (!voucher.is_empty()).then(|| voucher.to_string()),
            payment_method: self.payment_method,
            concession_items: self.concessions,
            points_to_use: (user_id.is_some() && self.points_to_use > 0)
                .then_some(self.points_to_use),
        })
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    text.char_indices()
        .nth(max)
        .map_or(text, |(idx, _)| &text[..idx])
}

/// Transfer memo: the payment reference when the backend returned one,
/// otherwise a booking summary with the seat labels.
#[must_use]
pub fn payment_description(reference: Option<&str>, movie_title: &str, seat_labels: &[String]) -> String {
    match reference.map(str::trim).filter(|r| !r.is_empty()) {
        Some(reference) => format!("{reference} {}", truncate_chars(movie_title, 15)),
        None => format!(
            "BOOKING {} GHE {}",
            truncate_chars(movie_title, 20),
            seat_labels.join(" ")
        ),
    }
}

/// Image URL of the bank-transfer QR for `amount`.
///
/// Spaces are encoded as `%20`.
#[must_use]
pub fn payment_qr_url(qr: &QrConfig, amount: i64, description: &str) -> String {
    // The serializer only emits `+` for spaces; a literal plus is `%2B`.
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("amount", &amount.to_string())
        .append_pair("addInfo", description)
        .append_pair("accountName", &qr.account_name)
        .finish()
        .replace('+', "%20");
    format!(
        "https://img.vietqr.io/image/{}-{}-{}.png?{query}",
        qr.bank_id, qr.account_number, qr.template
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hold::SelectedSeat;
    use crate::models::SeatType;

    fn selection(ids: &[i64]) -> SeatSelection {
        let mut selection = SeatSelection::new();
        for &id in ids {
            selection
                .toggle(SelectedSeat {
                    seat_id: id,
                    label: format!("C{id}"),
                    seat_type: SeatType::Standard,
                })
                .expect("toggle");
        }
        selection
    }

    fn item(id: i64, price: i64) -> ConcessionItem {
        ConcessionItem {
            item_id: id,
            item_name: format!("item {id}"),
            description: None,
            category_id: None,
            category_name: None,
            image_url: None,
            default_price: price,
            cinema_price: None,
            effective_price: None,
            stock_quantity: None,
            is_available: true,
        }
    }

    #[test]
    fn gate_requires_matching_non_zero_counts() {
        assert!(!checkout_enabled(0, 0));
        assert!(!checkout_enabled(2, 3));
        assert!(!checkout_enabled(3, 2));
        assert!(checkout_enabled(2, 2));
    }

    #[test]
    fn ticket_counts_respect_the_cap() {
        let mut counts = TicketCounts::default();
        counts.set(TicketKind::Adult, 7, 10);
        counts.set(TicketKind::Student, 5, 10);
        assert_eq!(counts.student, 3);
        assert_eq!(counts.total(), 10);
        counts.set(TicketKind::Adult, 1, 10);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn oversized_counts_from_a_link_saturate_and_cap() {
        let counts: TicketCounts =
            serde_json::from_str(r#"{"adult":4294967295,"student":1,"senior":0}"#).expect("counts");
        assert_eq!(counts.total(), u32::MAX);
        assert!(!checkout_enabled(1, counts.total()));

        let capped = counts.capped(10);
        assert_eq!(capped, TicketCounts { adult: 10, student: 0, senior: 0 });

        let mut counts = counts;
        counts.set(TicketKind::Senior, 3, 10);
        assert_eq!(counts.senior, 0);
    }

    #[test]
    fn cart_tracks_quantities_and_prices() {
        let items = vec![item(1, 45_000), item(2, 25_000)];
        let mut cart = ConcessionCart::new();
        assert_eq!(cart.add(1, 1), 1);
        assert_eq!(cart.add(2, 3), 3);
        assert_eq!(cart.remove(2, 1), 2);
        assert_eq!(cart.subtotal(&items), 95_000);
        assert_eq!(cart.remove(1, 5), 0);
        assert_eq!(cart.quantity(1), 0);
        assert_eq!(cart.lines(&items).len(), 1);
        cart.add(99, 1);
        assert_eq!(cart.lines(&items).len(), 1);
    }

    #[test]
    fn member_request_skips_guest_fields() {
        let seats = selection(&[4, 5]);
        let request = BookingDraft {
            showtime_id: 42,
            session_id: "UUID-20240601-HOLD-ABC123",
            selection: &seats,
            tickets: TicketCounts {
                adult: 1,
                student: 1,
                senior: 0,
            },
            customer: Customer::Member { user_id: 9 },
            voucher_code: "  ",
            payment_method: PaymentMethod::BankTransfer,
            concessions: vec![],
            points_to_use: 20,
        }
        .into_request()
        .expect("request");

        let json = serde_json::to_value(&request).expect("json");
        assert_eq!(json["userId"], 9);
        assert_eq!(json["seatIds"], serde_json::json!([4, 5]));
        assert_eq!(json["paymentMethod"], "BANK_TRANSFER");
        assert_eq!(json["pointsToUse"], 20);
        assert!(json["voucherCode"].is_null());
        assert!(json.get("customerName").is_none());
        assert!(json.get("concessionItems").is_none());
    }

    #[test]
    fn guest_request_needs_full_contact() {
        let seats = selection(&[1]);
        let draft = |contact: GuestContact| BookingDraft {
            showtime_id: 1,
            session_id: "S",
            selection: &seats,
            tickets: TicketCounts {
                adult: 1,
                ..TicketCounts::default()
            },
            customer: Customer::Guest(contact),
            voucher_code: "",
            payment_method: PaymentMethod::Cash,
            concessions: vec![],
            points_to_use: 50,
        };
        let missing_phone = GuestContact {
            name: "An".into(),
            email: "an@example.com".into(),
            phone: " ".into(),
        };
        assert_eq!(
            draft(missing_phone).into_request(),
            Err(CheckoutError::MissingPhone)
        );
        let ok = draft(GuestContact {
            name: "An".into(),
            email: "an@example.com".into(),
            phone: "0900000000".into(),
        })
        .into_request()
        .expect("guest");
        assert_eq!(ok.user_id, None);
        assert_eq!(ok.points_to_use, None);
    }

    #[test]
    fn mismatched_tickets_block_the_request() {
        let seats = selection(&[1, 2]);
        let result = BookingDraft {
            showtime_id: 1,
            session_id: "S",
            selection: &seats,
            tickets: TicketCounts::default(),
            customer: Customer::Member { user_id: 1 },
            voucher_code: "",
            payment_method: PaymentMethod::BankTransfer,
            concessions: vec![],
            points_to_use: 0,
        }
        .into_request();
        assert_eq!(result, Err(CheckoutError::TicketMismatch));
    }

    #[test]
    fn description_prefers_reference_and_truncates_titles() {
        assert_eq!(
            payment_description(Some("PAY123"), "Godzilla x Kong: The New Empire", &[]),
            "PAY123 Godzilla x Kong"
        );
        assert_eq!(
            payment_description(None, "Inside Out 2", &["A1".into(), "A2".into()]),
            "BOOKING Inside Out 2 GHE A1 A2"
        );
        assert_eq!(
            payment_description(Some(""), "Caf\u{e9} Society Revisited", &["B3".into()]),
            "BOOKING Caf\u{e9} Society Revisit GHE B3"
        );
    }

    #[test]
    fn qr_url_encodes_memo_and_account_name() {
        let url = payment_qr_url(&QrConfig::default(), 230_000, "BK1 Dune: Part Two");
        assert_eq!(
            url,
            "https://img.vietqr.io/image/970422-0915232119-compact2.png?amount=230000&addInfo=BK1%20Dune%3A%20Part%20Two&accountName=CINEMA%20BOOKING"
        );
    }

    #[test]
    fn qr_url_keeps_literal_plus_distinct_from_spaces() {
        let url = payment_qr_url(&QrConfig::default(), 1, "A+B C");
        assert!(url.contains("addInfo=A%2BB%20C"), "{url}");
    }
}
