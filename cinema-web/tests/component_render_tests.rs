use cinema_core::checkout::{ConcessionCart, TicketCounts};
use cinema_core::config::QrConfig;
use cinema_core::layout::LayoutSpec;
use cinema_core::models::{ConcessionItem, Seat, SeatStatus, SeatType};
use cinema_core::pricing::CheckoutPreview;
use cinema_core::seatmap::group_by_row;
use cinema_web::components::{
    ConcessionPicker, HoldTimer, LayoutPreview, PaymentQr, PriceSummary, SeatMap, TicketPicker,
};
use futures::executor::block_on;
use yew::{AttrValue, Callback, LocalServerRenderer};

fn seat(id: i64, row: &str, number: u32, seat_type: SeatType, status: SeatStatus, session: Option<&str>) -> Seat {
    Seat {
        seat_id: id,
        seat_row: row.to_string(),
        seat_number: number,
        seat_type,
        status,
        session_id: session.map(str::to_string),
    }
}

#[test]
fn price_summary_shows_the_worked_example() {
    cinema_web::i18n::set_lang("en");
    let props = cinema_web::components::price_summary::Props {
        preview: CheckoutPreview::compute(100_000, 2, 0, 0, 0),
        seats: 2,
    };
    let html = block_on(LocalServerRenderer::<PriceSummary>::with_props(props).render());
    assert!(html.contains("200.000 ₫"), "{html}");
    assert!(html.contains("10.000 ₫"));
    assert!(html.contains("20.000 ₫"));
    assert!(html.contains("230.000 ₫"));
    assert!(html.contains("2 seats"));
    assert!(!html.contains("Points discount"));
}

#[test]
fn price_summary_uses_singular_note_for_one_seat() {
    cinema_web::i18n::set_lang("en");
    let props = cinema_web::components::price_summary::Props {
        preview: CheckoutPreview::compute(90_000, 1, 0, 0, 0),
        seats: 1,
    };
    let html = block_on(LocalServerRenderer::<PriceSummary>::with_props(props).render());
    assert!(html.contains("1 seat."), "{html}");
}

#[test]
fn hold_timer_renders_only_while_holding() {
    cinema_web::i18n::set_lang("en");
    let idle = cinema_web::components::countdown::Props { remaining: None };
    let html = block_on(LocalServerRenderer::<HoldTimer>::with_props(idle).render());
    assert!(!html.contains("hold-timer"));

    let running = cinema_web::components::countdown::Props {
        remaining: Some(125),
    };
    let html = block_on(LocalServerRenderer::<HoldTimer>::with_props(running).render());
    assert!(html.contains("Seats held for 2:05"), "{html}");
    assert!(!html.contains("hold-timer-low"));

    let low = cinema_web::components::countdown::Props { remaining: Some(30) };
    let html = block_on(LocalServerRenderer::<HoldTimer>::with_props(low).render());
    assert!(html.contains("hold-timer-low"));
}

#[test]
fn seat_map_marks_selected_held_and_booked_seats() {
    cinema_web::i18n::set_lang("en");
    let seats = vec![
        seat(1, "A", 1, SeatType::Vip, SeatStatus::Available, None),
        seat(2, "A", 2, SeatType::Vip, SeatStatus::Booked, None),
        seat(3, "B", 1, SeatType::Standard, SeatStatus::Held, Some("other-session")),
        seat(4, "B", 2, SeatType::Standard, SeatStatus::Held, Some("mine")),
    ];
    let props = cinema_web::components::seat_map::Props {
        rows: group_by_row(&seats),
        selected: vec![4],
        on_toggle: Callback::noop(),
        own_session: Some(AttrValue::from("mine")),
        base_price: 100_000,
        row_aisles: vec!["A".to_string()],
        column_aisles: vec![1],
        disabled: false,
    };
    let html = block_on(LocalServerRenderer::<SeatMap>::with_props(props).render());
    assert!(html.contains("seat seat-vip"));
    assert!(html.contains("seat seat-booked"));
    assert!(html.contains("seat seat-held"));
    assert!(html.contains("seat seat-selected"));
    assert!(html.contains("data-seat=\"B2\""));
    assert!(html.contains("row-aisle"));
    assert!(html.contains("column-aisle"));
    assert!(html.contains("Screen"));
}

#[test]
fn ticket_picker_lists_every_ticket_kind() {
    cinema_web::i18n::set_lang("en");
    let props = cinema_web::components::ticket_picker::Props {
        counts: TicketCounts {
            adult: 2,
            student: 1,
            senior: 0,
        },
        on_change: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<TicketPicker>::with_props(props).render());
    for label in ["Adult", "Student", "Senior"] {
        assert!(html.contains(label), "{label} missing");
    }
    assert!(html.contains(">2<"));
}

#[test]
fn layout_preview_counts_seat_types() {
    cinema_web::i18n::set_lang("en");
    let config = LayoutSpec {
        rows: 4,
        seats_per_row: 5,
        couple_rows: "D".to_string(),
        row_aisles: "B-C".to_string(),
        ..LayoutSpec::default()
    }
    .parse()
    .expect("valid layout");
    let props = cinema_web::components::layout_preview::Props {
        grid: config.generate(),
    };
    let html = block_on(LocalServerRenderer::<LayoutPreview>::with_props(props).render());
    assert!(html.contains("layout-grid"));
    assert!(html.contains("seat-couple"));
    assert!(html.contains("VIP: 10"), "{html}");
    assert!(html.contains("Couple: 5"));
    assert!(html.contains("Total seats: 20"));
}

#[test]
fn payment_qr_prefers_the_booking_reference() {
    cinema_web::i18n::set_lang("en");
    let props = cinema_web::components::payment_qr::Props {
        qr: QrConfig::default(),
        amount: 230_000,
        movie_title: AttrValue::from("Dune Part Two"),
        seat_labels: vec!["A1".to_string(), "A2".to_string()],
        reference: Some(AttrValue::from("BK2024")),
    };
    let html = block_on(LocalServerRenderer::<PaymentQr>::with_props(props).render());
    assert!(html.contains("img.vietqr.io/image/970422-0915232119-compact2.png"));
    assert!(html.contains("BK2024 Dune Part Two"));
    assert!(html.contains("230.000 ₫"));
}

#[test]
fn payment_qr_falls_back_to_seat_summary() {
    cinema_web::i18n::set_lang("en");
    let props = cinema_web::components::payment_qr::Props {
        qr: QrConfig::default(),
        amount: 115_000,
        movie_title: AttrValue::from("Dune Part Two"),
        seat_labels: vec!["C7".to_string()],
        reference: None,
    };
    let html = block_on(LocalServerRenderer::<PaymentQr>::with_props(props).render());
    assert!(html.contains("BOOKING Dune Part Two GHE C7"), "{html}");
}

#[test]
fn concession_picker_handles_empty_and_sold_out() {
    cinema_web::i18n::set_lang("en");
    let empty = cinema_web::components::concession_picker::Props {
        items: Vec::new(),
        cart: ConcessionCart::new(),
        on_add: Callback::noop(),
        on_remove: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<ConcessionPicker>::with_props(empty).render());
    assert!(html.contains("No concessions"));

    let items: Vec<ConcessionItem> = serde_json::from_value(serde_json::json!([
        {"itemId": 1, "itemName": "Popcorn", "defaultPrice": 50000, "cinemaPrice": 45000},
        {"itemId": 2, "itemName": "Cola", "defaultPrice": 30000, "stockQuantity": 0}
    ]))
    .expect("concession fixture");
    let mut cart = ConcessionCart::new();
    cart.add(1, 2);
    let props = cinema_web::components::concession_picker::Props {
        items,
        cart,
        on_add: Callback::noop(),
        on_remove: Callback::noop(),
    };
    let html = block_on(LocalServerRenderer::<ConcessionPicker>::with_props(props).render());
    assert!(html.contains("Popcorn"));
    assert!(html.contains("45.000 ₫"));
    assert!(html.contains("sold-out"));
}
