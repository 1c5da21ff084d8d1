//! Cinema Booking Core
//!
//! Platform-agnostic booking logic for the cinema storefront and admin
//! console. This crate holds the pricing rules, seat holds, hall layouts and
//! API shapes without any browser or network dependencies.

pub mod access;
pub mod api;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod hold;
pub mod layout;
pub mod models;
pub mod numbers;
pub mod pricing;
pub mod seatmap;
pub mod session;

// Re-export commonly used types
pub use access::{AccessDecision, check_access, dashboard_path, highest_role, is_admin, is_staff_member};
pub use api::{ApiCall, ApiError, Envelope, Method, Page, SeatAvailability, UnauthorizedPolicy, endpoints};
pub use catalog::{BookingContext, BookingQuery, CatalogError, QueryError, pick_showtime, resolve};
pub use checkout::{
    BookingDraft, CheckoutError, ConcessionCart, ConcessionLine, CreateBookingRequest, Customer,
    GuestContact, TicketCounts, TicketKind, checkout_enabled, payment_description, payment_qr_url,
};
pub use config::{ClientConfig, ConfigOverrides, QrConfig};
pub use hold::{
    HoldCoordinator, HoldCountdown, HoldEvent, HoldGrant, HoldPolicy, HoldRequest, Release,
    SeatSelection, SelectedSeat, SelectionError, SessionId, Tick, Toggle,
};
pub use layout::{LayoutConfig, LayoutError, LayoutSpec, SeatGrid, SeatKey};
pub use models::{
    AuthPayload, Booking, BookingStatus, Cinema, CinemaChain, CinemaHall, ConcessionCategory,
    ConcessionItem, LoginRequest, LoyaltyBalance, Movie, PaymentMethod, PaymentRequest,
    PaymentResponse, PointsTransaction, Role, Seat, SeatStatus, SeatType, Showtime,
    ShowtimeStatus, Ticket, User,
};
pub use pricing::{CheckoutPreview, PointsRedemption, PricePreview, calculate_booking_price, redeem_points};
pub use seatmap::{SeatBlock, SeatClass, SeatRow, check_selectable, classify, group_by_row};
pub use session::{
    KeyValueStore, MemoryStore, SessionEvent, SessionHub, StorageError, StoredUser, Subscription,
};
