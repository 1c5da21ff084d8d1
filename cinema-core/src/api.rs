//! Response envelope, error classification and the REST endpoint table.
//!
//! Paths returned by [`endpoints`] are relative to the configured API base
//! (see [`crate::config::ClientConfig::url_for`]). Query strings are encoded
//! with `url::form_urlencoded` so repeated keys such as `seatIds` survive.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `{success, message, data}` wrapper used by every backend response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload of a successful envelope.
    ///
    /// # Errors
    /// `Rejected` when `success` is false, `MissingData` when a successful
    /// envelope carries no payload.
    pub fn into_result(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected(
                self.message.unwrap_or_else(|| String::from("request rejected")),
            ));
        }
        self.data.ok_or(ApiError::MissingData)
    }
}

/// Server-side page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page + 1 < self.total_pages
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current_page > 0
    }
}

/// Bare payload of `GET /seats/availability/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatAvailability {
    #[serde(default)]
    pub seats: Vec<crate::models::Seat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("session expired")]
    Unauthorized,
    #[error("HTTP {code}: {message}")]
    Status { code: u16, message: String },
    #[error("{0}")]
    Rejected(String),
    #[error("response carried no data")]
    MissingData,
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Toast text for this failure: the backend's own message when it sent
    /// one, otherwise `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected(msg) | Self::Status { message: msg, .. } if !msg.trim().is_empty() => {
                msg.clone()
            }
            _ => fallback.to_string(),
        }
    }

    /// Map a non-2xx status and its body onto an error.
    #[must_use]
    pub fn from_status(code: u16, body: &str) -> Self {
        if code == 401 {
            return Self::Unauthorized;
        }
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
            .unwrap_or_default();
        Self::Status { code, message }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Decode an enveloped response body.
///
/// # Errors
/// Decoding failures and unsuccessful envelopes.
pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str::<Envelope<T>>(body)?.into_result()
}

/// Decode a body that may or may not be wrapped in an envelope. Concession
/// lists and seat availability come back bare.
///
/// # Errors
/// Decoding failures and unsuccessful envelopes.
pub fn decode_flexible<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let enveloped = value
        .as_object()
        .is_some_and(|obj| obj.get("success").is_some_and(serde_json::Value::is_boolean));
    if enveloped {
        serde_json::from_value::<Envelope<T>>(value)?.into_result()
    } else {
        Ok(serde_json::from_value(value)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// A method plus a base-relative path (query string included).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCall {
    pub method: Method,
    pub path: String,
}

impl ApiCall {
    fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
        }
    }

    fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
        }
    }

    fn put(path: impl Into<String>) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
        }
    }

    fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
        }
    }

    /// What a 401 on this call should do.
    #[must_use]
    pub fn unauthorized_policy(&self) -> UnauthorizedPolicy {
        unauthorized_policy(&self.path)
    }
}

const PUBLIC_PREFIXES: &[&str] = &[
    "/movies",
    "/cinemas",
    "/showtimes",
    "/concessions",
    "/auth/login",
    "/auth/register",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthorizedPolicy {
    /// Clear tokens and cached profile, then send the user to `/login`.
    Logout,
    /// Public or admin endpoint: the calling screen handles the error.
    Surface,
}

/// Classify a base-relative path for 401 handling.
#[must_use]
pub fn unauthorized_policy(path: &str) -> UnauthorizedPolicy {
    let path = path.split('?').next().unwrap_or(path);
    let public = PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p));
    let admin = path.contains("/admin");
    if public || admin {
        UnauthorizedPolicy::Surface
    } else {
        UnauthorizedPolicy::Logout
    }
}

fn with_query<'a>(path: &str, pairs: impl IntoIterator<Item = (&'a str, String)>) -> String {
    let mut ser = url::form_urlencoded::Serializer::new(String::new());
    for (k, v) in pairs {
        ser.append_pair(k, &v);
    }
    let query = ser.finish();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

fn hold_query(session_id: &str, showtime_id: i64, seat_ids: &[i64]) -> Vec<(&'static str, String)> {
    let mut pairs = vec![
        ("sessionId", session_id.to_string()),
        ("showtimeId", showtime_id.to_string()),
    ];
    pairs.extend(seat_ids.iter().map(|id| ("seatIds", id.to_string())));
    pairs
}

/// Endpoint table. One function per backend route.
pub mod endpoints {
    use super::{ApiCall, hold_query, with_query};

    #[must_use]
    pub fn login() -> ApiCall {
        ApiCall::post("/auth/login")
    }
    #[must_use]
    pub fn register() -> ApiCall {
        ApiCall::post("/auth/register")
    }

    #[must_use]
    pub fn movies() -> ApiCall {
        ApiCall::get("/movies")
    }
    #[must_use]
    pub fn movie(movie_id: i64) -> ApiCall {
        ApiCall::get(format!("/movies/{movie_id}"))
    }

    #[must_use]
    pub fn chains() -> ApiCall {
        ApiCall::get("/cinema-chains")
    }
    #[must_use]
    pub fn admin_chains() -> ApiCall {
        ApiCall::get("/cinema-chains/admin/all")
    }
    #[must_use]
    pub fn admin_create_chain() -> ApiCall {
        ApiCall::post("/cinema-chains/admin")
    }
    #[must_use]
    pub fn admin_update_chain(chain_id: i64) -> ApiCall {
        ApiCall::put(format!("/cinema-chains/admin/{chain_id}"))
    }
    #[must_use]
    pub fn admin_delete_chain(chain_id: i64) -> ApiCall {
        ApiCall::delete(format!("/cinema-chains/admin/{chain_id}"))
    }

    #[must_use]
    pub fn cinema(cinema_id: i64) -> ApiCall {
        ApiCall::get(format!("/cinemas/{cinema_id}"))
    }
    #[must_use]
    pub fn cinemas_by_chain(chain_id: i64) -> ApiCall {
        ApiCall::get(format!("/cinemas/chain/{chain_id}"))
    }
    #[must_use]
    pub fn admin_cinemas() -> ApiCall {
        ApiCall::get("/cinemas/admin/all")
    }
    #[must_use]
    pub fn admin_create_cinema() -> ApiCall {
        ApiCall::post("/cinemas/admin")
    }
    #[must_use]
    pub fn admin_update_cinema(cinema_id: i64) -> ApiCall {
        ApiCall::put(format!("/cinemas/admin/{cinema_id}"))
    }
    #[must_use]
    pub fn admin_delete_cinema(cinema_id: i64) -> ApiCall {
        ApiCall::delete(format!("/cinemas/admin/{cinema_id}"))
    }

    #[must_use]
    pub fn halls_by_cinema(cinema_id: i64) -> ApiCall {
        ApiCall::get(format!("/cinema-halls/cinema/{cinema_id}"))
    }
    #[must_use]
    pub fn admin_create_hall() -> ApiCall {
        ApiCall::post("/cinema-halls/admin")
    }
    #[must_use]
    pub fn admin_update_hall(hall_id: i64) -> ApiCall {
        ApiCall::put(format!("/cinema-halls/admin/{hall_id}"))
    }
    #[must_use]
    pub fn admin_delete_hall(hall_id: i64) -> ApiCall {
        ApiCall::delete(format!("/cinema-halls/admin/{hall_id}"))
    }
    #[must_use]
    pub fn admin_regenerate_seats(hall_id: i64) -> ApiCall {
        ApiCall::post(format!("/cinema-halls/admin/{hall_id}/regenerate-seats"))
    }

    #[must_use]
    pub fn showtime(showtime_id: i64) -> ApiCall {
        ApiCall::get(format!("/showtimes/{showtime_id}"))
    }
    #[must_use]
    pub fn showtimes_by_cinema(cinema_id: i64) -> ApiCall {
        ApiCall::get(format!("/showtimes/cinema/{cinema_id}"))
    }
    #[must_use]
    pub fn admin_showtimes(page: u32, size: u32) -> ApiCall {
        ApiCall::get(with_query(
            "/showtimes/admin/all",
            [("page", page.to_string()), ("size", size.to_string())],
        ))
    }
    #[must_use]
    pub fn admin_create_showtime() -> ApiCall {
        ApiCall::post("/showtimes/admin")
    }
    #[must_use]
    pub fn admin_update_showtime(showtime_id: i64) -> ApiCall {
        ApiCall::put(format!("/showtimes/admin/{showtime_id}"))
    }
    #[must_use]
    pub fn admin_delete_showtime(showtime_id: i64) -> ApiCall {
        ApiCall::delete(format!("/showtimes/admin/{showtime_id}"))
    }

    /// Live seat statuses for the counter flow.
    #[must_use]
    pub fn seats_for_showtime(showtime_id: i64) -> ApiCall {
        ApiCall::get(format!("/seats/showtime/{showtime_id}"))
    }
    #[must_use]
    pub fn seat_availability(showtime_id: i64, session_id: &str) -> ApiCall {
        ApiCall::get(with_query(
            &format!("/seats/availability/{showtime_id}"),
            [("sessionId", session_id.to_string())],
        ))
    }
    #[must_use]
    pub fn hold_seats() -> ApiCall {
        ApiCall::post("/seats/hold")
    }
    #[must_use]
    pub fn release_seats(session_id: &str, showtime_id: i64, seat_ids: &[i64]) -> ApiCall {
        ApiCall::post(with_query(
            "/seats/release",
            hold_query(session_id, showtime_id, seat_ids),
        ))
    }
    #[must_use]
    pub fn extend_hold(
        session_id: &str,
        showtime_id: i64,
        seat_ids: &[i64],
        additional_minutes: u32,
    ) -> ApiCall {
        let mut pairs = hold_query(session_id, showtime_id, seat_ids);
        pairs.push(("additionalMinutes", additional_minutes.to_string()));
        ApiCall::post(with_query("/seats/extend-hold", pairs))
    }
    #[must_use]
    pub fn verify_hold(session_id: &str, showtime_id: i64, seat_ids: &[i64]) -> ApiCall {
        ApiCall::get(with_query(
            "/seats/verify-hold",
            hold_query(session_id, showtime_id, seat_ids),
        ))
    }

    #[must_use]
    pub fn create_booking() -> ApiCall {
        ApiCall::post("/bookings")
    }
    #[must_use]
    pub fn admin_create_booking() -> ApiCall {
        ApiCall::post("/bookings/admin")
    }
    #[must_use]
    pub fn booking(booking_id: i64) -> ApiCall {
        ApiCall::get(format!("/bookings/{booking_id}"))
    }
    #[must_use]
    pub fn bookings_for_user(user_id: i64) -> ApiCall {
        ApiCall::get(format!("/bookings/user/{user_id}"))
    }
    #[must_use]
    pub fn cancel_booking(booking_id: i64) -> ApiCall {
        ApiCall::post(format!("/bookings/{booking_id}/cancel"))
    }
    #[must_use]
    pub fn admin_bookings(page: u32, size: u32, search: Option<&str>) -> ApiCall {
        let mut pairs = vec![("page", page.to_string()), ("size", size.to_string())];
        if let Some(term) = search.map(str::trim).filter(|s| !s.is_empty()) {
            pairs.push(("search", term.to_string()));
        }
        ApiCall::get(with_query("/bookings/admin/all", pairs))
    }

    #[must_use]
    pub fn process_payment() -> ApiCall {
        ApiCall::post("/payments/process")
    }
    #[must_use]
    pub fn payment_status(transaction_id: &str) -> ApiCall {
        let encoded: String = url::form_urlencoded::byte_serialize(transaction_id.as_bytes()).collect();
        ApiCall::get(format!("/payments/status/{encoded}"))
    }

    #[must_use]
    pub fn concession_categories() -> ApiCall {
        ApiCall::get("/concessions/categories")
    }
    #[must_use]
    pub fn cinema_concessions(cinema_id: i64) -> ApiCall {
        ApiCall::get(format!("/cinemas/{cinema_id}/concessions"))
    }

    #[must_use]
    pub fn loyalty_balance(user_id: i64) -> ApiCall {
        ApiCall::get(format!("/loyalty/points/balance/{user_id}"))
    }
    #[must_use]
    pub fn loyalty_history(user_id: i64) -> ApiCall {
        ApiCall::get(format!("/loyalty/points/history/{user_id}"))
    }
}
