//! Seeded property checks over `cinema-core`. Each check draws its inputs
//! from the iteration's RNG so a failing seed replays exactly.

use anyhow::{Result, bail, ensure};
use chrono::NaiveDate;
use cinema_core::access::{AccessDecision, check_access};
use cinema_core::checkout::{TicketCounts, TicketKind, checkout_enabled};
use cinema_core::hold::{
    HoldCoordinator, HoldEvent, HoldGrant, HoldPolicy, SelectedSeat, SelectionError, SessionId,
};
use cinema_core::layout::{LayoutError, LayoutSpec, row_letter};
use cinema_core::models::{Role, SeatType, User};
use cinema_core::pricing::{PricePreview, SERVICE_FEE_PER_TICKET, calculate_booking_price};
use cinema_core::session::{KeyValueStore, MemoryStore, StoredUser, USER_KEY, load_user, read_user};
use rand::Rng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

pub type Check = fn(&mut ChaCha8Rng) -> Result<()>;

/// Draws per check and iteration.
const SAMPLES: usize = 16;

pub fn pricing(rng: &mut ChaCha8Rng) -> Result<()> {
    let worked = calculate_booking_price(100_000, 2, 0);
    ensure!(
        worked
            == PricePreview {
                subtotal: 200_000,
                service_fee: 10_000,
                tax: 20_000,
                discount: 0,
                total: 230_000,
            },
        "worked example drifted: {worked:?}"
    );

    for _ in 0..SAMPLES {
        let base = rng.gen_range(1..=500_i64) * 1_000;
        let seats = rng.gen_range(1..=10_i64);
        let discount = rng.gen_range(0..=base);
        let p = calculate_booking_price(base, seats, discount);
        ensure!(p.subtotal == base * seats, "subtotal for {base}x{seats}: {p:?}");
        ensure!(p.service_fee == SERVICE_FEE_PER_TICKET * seats, "service fee for {seats}: {p:?}");
        ensure!(p.tax == p.subtotal / 10, "tax on {}: {p:?}", p.subtotal);
        ensure!(
            p.total == p.subtotal + p.service_fee + p.tax - discount,
            "total for {base}x{seats} less {discount}: {p:?}"
        );

        let bad_base = -rng.gen_range(0..=100_000_i64);
        let bad_seats = -rng.gen_range(0..=5_i64);
        for (b, s) in [(bad_base, seats), (base, bad_seats)] {
            let zero = calculate_booking_price(b, s, discount);
            ensure!(zero == PricePreview::default(), "{b}x{s} should price to zero: {zero:?}");
        }
    }
    Ok(())
}

fn seats(rng: &mut ChaCha8Rng, count: usize) -> Vec<SelectedSeat> {
    let mut ids: Vec<i64> = (1..=60).collect();
    ids.shuffle(rng);
    ids.into_iter()
        .take(count)
        .map(|id| SelectedSeat {
            seat_id: id,
            label: format!("{}{}", char::from(b'A' + u8::try_from(id / 12).unwrap_or(0)), id % 12 + 1),
            seat_type: SeatType::Standard,
        })
        .collect()
}

pub fn hold_expiry(rng: &mut ChaCha8Rng) -> Result<()> {
    let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap_or_default();
    let now = rng.gen_range(1_700_000_000_000_i64..1_800_000_000_000);
    let count = rng.gen_range(1..=4);

    let mut hold = HoldCoordinator::new(HoldPolicy::Rehold);
    let session = hold.ensure_session(|| SessionId::generate(today, rng));
    ensure!(SessionId::parse(session.as_str()).is_some(), "minted id {session} has the wrong shape");
    for seat in seats(rng, count) {
        hold.toggle(seat)
            .map_err(|e| anyhow::anyhow!("toggle rejected before any hold: {e:?}"))?;
    }
    ensure!(hold.hold_request(7, None).is_some(), "a selection with a session must build a hold request");

    hold.hold_granted(&HoldGrant {
        hold_expires_at: now + 2_000,
        session_id: Some(session.to_string()),
    });
    match hold.tick(now + 1_000) {
        HoldEvent::Remaining { secs: 1, .. } => {}
        other => bail!("one second in, expected 1s remaining, got {other:?}"),
    }
    match hold.tick(now + 2_000) {
        HoldEvent::Expired { release: Some(release) } => {
            ensure!(release.session_id == session, "released under another session");
            ensure!(release.seat_ids.len() == count, "released {} of {count} seats", release.seat_ids.len());
        }
        other => bail!("hold should expire at its deadline, got {other:?}"),
    }
    ensure!(hold.selection().is_empty(), "selection survived expiry");
    ensure!(hold.session().is_none(), "session survived expiry");
    ensure!(hold.tick(now + 3_000) == HoldEvent::Idle, "expiry fired twice");

    let mut counter = HoldCoordinator::new(HoldPolicy::LockWhileHeld);
    counter.ensure_session(|| SessionId::generate(today, rng));
    let picked = seats(rng, 2);
    counter
        .toggle(picked[0].clone())
        .map_err(|e| anyhow::anyhow!("counter toggle rejected: {e:?}"))?;
    counter.hold_granted(&HoldGrant {
        hold_expires_at: now + 300_000,
        session_id: None,
    });
    ensure!(
        counter.toggle(picked[1].clone()) == Err(SelectionError::HoldActive),
        "counter seats must lock while held"
    );
    Ok(())
}

pub fn layout(rng: &mut ChaCha8Rng) -> Result<()> {
    for _ in 0..SAMPLES {
        let rows = rng.gen_range(1..=26_u32);
        let per_row = rng.gen_range(1..=50_u32);
        let vip = row_letter(rng.gen_range(0..rows)).unwrap_or('A');
        let spec = LayoutSpec {
            rows,
            seats_per_row: per_row,
            vip_rows: vip.to_string(),
            ..LayoutSpec::default()
        };
        let config = spec.parse().map_err(|e| anyhow::anyhow!("{rows}x{per_row} rejected: {e}"))?;
        let grid = config.generate();
        let expected = usize::try_from(rows * per_row)?;
        ensure!(grid.total_seats() == expected, "{rows}x{per_row} generated {}", grid.total_seats());
        ensure!(
            grid.count(SeatType::Vip) == usize::try_from(per_row)?,
            "row {vip} should be all VIP in {rows}x{per_row}"
        );
        ensure!(config.seat_type(vip, 1) == SeatType::Vip, "seat {vip}1 should be VIP");

        let reparsed = LayoutSpec::from_seat_layout(rows, per_row, Some(&config.to_seat_layout())).parse()?;
        ensure!(reparsed == config, "stored layout for {rows}x{per_row} does not reload");
    }

    let cases = [
        (LayoutSpec { rows: 0, ..LayoutSpec::default() }, LayoutError::RowCount(0)),
        (LayoutSpec { rows: 27, ..LayoutSpec::default() }, LayoutError::RowCount(27)),
        (LayoutSpec { seats_per_row: 51, ..LayoutSpec::default() }, LayoutError::SeatsPerRow(51)),
        (
            LayoutSpec { rows: 3, vip_rows: "E".to_string(), ..LayoutSpec::default() },
            LayoutError::RowOutOfRange { row: 'E', last: 'C' },
        ),
        (
            LayoutSpec { vip_rows: "7".to_string(), ..LayoutSpec::default() },
            LayoutError::InvalidRow("7".to_string()),
        ),
    ];
    for (spec, expected) in cases {
        match spec.parse() {
            Err(err) if err == expected => {}
            other => bail!("expected {expected:?}, got {other:?}"),
        }
    }
    Ok(())
}

pub fn checkout_gate(rng: &mut ChaCha8Rng) -> Result<()> {
    ensure!(!checkout_enabled(0, 0), "zero tickets must never check out");
    for _ in 0..SAMPLES {
        let selected = rng.gen_range(0..=10_usize);
        let tickets = rng.gen_range(0..=10_u32);
        let expected = tickets > 0 && selected == usize::try_from(tickets)?;
        ensure!(
            checkout_enabled(selected, tickets) == expected,
            "gate for {selected} seats / {tickets} tickets"
        );

        let max = rng.gen_range(1..=10_u32);
        let mut counts = TicketCounts::default();
        for kind in TicketKind::ALL {
            counts.set(kind, rng.gen_range(0..=10), max);
        }
        ensure!(counts.total() <= max, "ticket counts {counts:?} exceed {max}");
    }
    Ok(())
}

fn user(roles: Vec<Role>) -> User {
    User {
        user_id: 1,
        full_name: "QA".to_string(),
        email: "qa@example.com".to_string(),
        phone: None,
        roles,
        membership_tier: None,
        available_points: None,
    }
}

pub fn access(rng: &mut ChaCha8Rng) -> Result<()> {
    let store = MemoryStore::new();
    ensure!(read_user(&store) == StoredUser::Missing, "empty store should read as missing");
    for junk in ["undefined", "null", "", "{not json"] {
        store.set(USER_KEY, junk)?;
        ensure!(read_user(&store) == StoredUser::Corrupt, "`{junk}` should read as corrupt");
        ensure!(load_user(&store).is_none(), "`{junk}` loaded as a profile");
        ensure!(store.get(USER_KEY).is_none(), "`{junk}` was not cleared");
    }

    let customer = StoredUser::Present(user(vec![Role::Customer]));
    ensure!(
        check_access(&customer, &[Role::CinemaManager]) == AccessDecision::Redirect("/"),
        "customer should bounce to the storefront"
    );
    ensure!(
        check_access(&StoredUser::Missing, &[]) == AccessDecision::Login { clear_user: false },
        "guests must sign in"
    );
    ensure!(
        check_access(&StoredUser::Corrupt, &[]) == AccessDecision::Login { clear_user: true },
        "corrupt profiles must be cleared before sign-in"
    );

    for _ in 0..SAMPLES {
        let mut roles = Role::ALL.to_vec();
        roles.shuffle(rng);
        let held: Vec<Role> = roles.iter().copied().take(rng.gen_range(1..=2)).collect();
        let allowed: Vec<Role> = roles.iter().copied().skip(rng.gen_range(0..=3)).take(2).collect();
        let decision = check_access(&StoredUser::Present(user(held.clone())), &allowed);
        let overlaps = allowed.is_empty() || held.iter().any(|r| allowed.contains(r));
        match decision {
            AccessDecision::Granted if overlaps => {}
            AccessDecision::Redirect(_) if !overlaps => {}
            other => bail!("roles {held:?} against {allowed:?} gave {other:?}"),
        }
    }
    Ok(())
}

/// Every check, keyed by the scenario name that runs it alone.
pub const ALL: [(&str, Check); 5] = [
    ("pricing", pricing),
    ("hold-expiry", hold_expiry),
    ("layout", layout),
    ("checkout-gate", checkout_gate),
    ("access", access),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn every_check_passes_for_a_spread_of_seeds() {
        for seed in [0_u64, 1, 42, 1337, u64::MAX] {
            for (name, check) in ALL {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                if let Err(err) = check(&mut rng) {
                    panic!("{name} failed for seed {seed}: {err:#}");
                }
            }
        }
    }

    #[test]
    fn generated_seats_are_distinct() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let picked = seats(&mut rng, 4);
        let mut ids: Vec<i64> = picked.iter().map(|s| s.seat_id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }
}
