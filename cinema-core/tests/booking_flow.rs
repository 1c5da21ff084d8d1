use cinema_core::api::{self, SeatAvailability};
use cinema_core::checkout::{BookingDraft, Customer, TicketCounts};
use cinema_core::hold::{HoldEvent, HoldGrant, HoldPolicy, SelectedSeat, SessionId};
use cinema_core::layout::LayoutSpec;
use cinema_core::seatmap::{check_selectable, demo_seats, group_by_row};
use cinema_core::session::{MemoryStore, SessionEvent, SessionHub, StoredUser, read_user, save_user};
use cinema_core::{
    AccessDecision, BookingQuery, CheckoutPreview, HoldCoordinator, PaymentMethod, QrConfig, Role,
    SeatStatus, User, check_access, payment_description, payment_qr_url,
};
use chrono::NaiveDate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::cell::Cell;
use std::rc::Rc;

fn customer() -> User {
    User {
        user_id: 11,
        full_name: "Tran Thi B".into(),
        email: "b@example.com".into(),
        phone: Some("0900000001".into()),
        roles: vec![Role::Customer],
        membership_tier: Some("SILVER".into()),
        available_points: Some(80),
    }
}

#[test]
fn demo_booking_reaches_a_payable_request() {
    let query = BookingQuery::parse("?cinema=2&movie=3&date=2024-06-01&time=19:30").expect("query");
    let grid = LayoutSpec::default().parse().expect("layout").generate();
    let seats = demo_seats(&query.showtime_key(), &grid);
    let rows = group_by_row(&seats);
    assert_eq!(rows.len(), 10);

    let free: Vec<_> = seats
        .iter()
        .filter(|s| check_selectable(s, None).is_ok())
        .take(3)
        .collect();
    assert_eq!(free.len(), 3);

    let mut hold = HoldCoordinator::new(HoldPolicy::Rehold);
    let session = hold.ensure_session(|| {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).expect("date");
        SessionId::generate(date, &mut ChaCha8Rng::seed_from_u64(1))
    });
    for seat in &free {
        hold.toggle(SelectedSeat::from(*seat)).expect("toggle");
    }

    let tickets = TicketCounts {
        adult: 2,
        student: 1,
        senior: 0,
    };
    let preview = CheckoutPreview::compute(90_000, 3, 0, 80, 80);
    assert_eq!(preview.tickets.total, 90_000 * 3 + 15_000 + 27_000);
    assert_eq!(preview.points.points_used, 80);

    let request = BookingDraft {
        showtime_id: 42,
        session_id: session.as_str(),
        selection: hold.selection(),
        tickets,
        customer: Customer::Member { user_id: 11 },
        voucher_code: "",
        payment_method: PaymentMethod::BankTransfer,
        concessions: vec![],
        points_to_use: preview.points.points_used,
    }
    .into_request()
    .expect("request");
    assert_eq!(request.seat_ids.len(), 3);
    assert_eq!(request.session_id, session.as_str());

    let memo = payment_description(None, "Dune: Part Two", &hold.selection().labels());
    assert!(memo.starts_with("BOOKING Dune: Part Two GHE "));
    let qr = payment_qr_url(&QrConfig::default(), preview.grand_total, &memo);
    assert!(qr.contains(&format!("amount={}", preview.grand_total)));
}

#[test]
fn hold_grant_drives_extension_and_expiry() {
    let mut hold = HoldCoordinator::new(HoldPolicy::Rehold);
    hold.ensure_session(|| SessionId::parse("UUID-20240601-HOLD-ABC123").expect("session id"));
    hold.toggle(SelectedSeat {
        seat_id: 5,
        label: "C5".into(),
        seat_type: cinema_core::SeatType::Standard,
    })
    .expect("toggle");

    let grant: HoldGrant = serde_json::from_str(r#"{"holdExpiresAt": 300000}"#).expect("grant");
    hold.hold_granted(&grant);

    assert_eq!(
        hold.tick(0),
        HoldEvent::Remaining {
            secs: 300,
            extend: false
        }
    );
    assert_eq!(
        hold.tick(240_000),
        HoldEvent::Remaining {
            secs: 60,
            extend: true
        }
    );
    assert_eq!(
        hold.tick(241_000),
        HoldEvent::Remaining {
            secs: 59,
            extend: false
        }
    );
    match hold.tick(300_000) {
        HoldEvent::Expired { release: Some(release) } => {
            assert_eq!(release.seat_ids, vec![5]);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(hold.tick(301_000), HoldEvent::Idle);
    assert!(hold.selection().is_empty());
}

#[test]
fn seat_availability_marks_other_sessions_held() {
    let body = r#"{"seats":[
        {"seatId":1,"seatRow":"A","seatNumber":1,"seatType":"STANDARD","status":"AVAILABLE"},
        {"seatId":2,"seatRow":"A","seatNumber":2,"seatType":"VIP","status":"HELD","sessionId":"mine"},
        {"seatId":3,"seatRow":"A","seatNumber":3,"seatType":"VIP","status":"HELD","sessionId":"theirs"},
        {"seatId":4,"seatRow":"A","seatNumber":4,"seatType":"COUPLE","status":"BOOKED"}
    ]}"#;
    let availability: SeatAvailability = api::decode_flexible(body).expect("availability");
    let pickable: Vec<i64> = availability
        .seats
        .iter()
        .filter(|s| check_selectable(s, Some("mine")).is_ok())
        .map(|s| s.seat_id)
        .collect();
    assert_eq!(pickable, vec![1, 2]);
    assert_eq!(availability.seats[3].status, SeatStatus::Booked);
}

#[test]
fn login_publishes_and_guards_routes() {
    let store = MemoryStore::new();
    let hub = SessionHub::new();
    let changes = Rc::new(Cell::new(0));
    let seen = Rc::clone(&changes);
    let _sub = hub.subscribe(move |event| {
        if let SessionEvent::UserChanged(Some(_)) = event {
            seen.set(seen.get() + 1);
        }
    });

    assert_eq!(
        check_access(&read_user(&store), &[Role::Customer]),
        AccessDecision::Login { clear_user: false }
    );

    save_user(&store, &customer()).expect("save");
    hub.publish(&SessionEvent::UserChanged(Some(customer())));
    assert_eq!(changes.get(), 1);

    let stored = read_user(&store);
    assert!(matches!(stored, StoredUser::Present(_)));
    assert_eq!(check_access(&stored, &[Role::Customer]), AccessDecision::Granted);
    assert_eq!(
        check_access(&stored, &[Role::SystemAdmin, Role::CinemaManager]),
        AccessDecision::Redirect("/")
    );
}
