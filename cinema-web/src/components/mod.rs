pub mod checkout_gate;
pub mod concession_picker;
pub mod countdown;
pub mod header;
pub mod layout_preview;
pub mod payment_qr;
pub mod price_summary;
pub mod protected_route;
pub mod seat_map;
pub mod ticket_picker;
pub mod toast;

pub use checkout_gate::CheckoutGate;
pub use concession_picker::ConcessionPicker;
pub use countdown::HoldTimer;
pub use header::Header;
pub use layout_preview::LayoutPreview;
pub use payment_qr::PaymentQr;
pub use price_summary::PriceSummary;
pub use protected_route::ProtectedRoute;
pub use seat_map::{Legend, SeatMap};
pub use ticket_picker::TicketPicker;
pub use toast::{ToastHost, ToastKind, Toaster, use_toaster};
