//! Client-side price preview.
//!
//! Mirrors the backend's booking arithmetic so the checkout page can show a
//! total before the booking exists. The backend recomputes everything on
//! submit; nothing here is authoritative.

use crate::models::SeatType;
use crate::numbers::{floor_f64_to_i64, i64_to_f64, round_f64_to_i64};
use serde::{Deserialize, Serialize};

/// Flat service fee charged per ticket.
pub const SERVICE_FEE_PER_TICKET: i64 = 5_000;
/// VAT applied to the ticket subtotal only.
pub const TAX_RATE: f64 = 0.10;
/// Currency value of one loyalty point.
pub const POINT_VALUE: i64 = 1_000;
/// Largest share of an order that points may pay for.
pub const MAX_POINTS_SHARE: f64 = 0.5;

/// Ticket-side breakdown shown in the checkout summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePreview {
    pub subtotal: i64,
    pub service_fee: i64,
    pub tax: i64,
    pub discount: i64,
    pub total: i64,
}

/// Preview the ticket price for `seats` seats at `base_price` each.
///
/// Any non-positive base price or seat count yields an all-zero preview.
#[must_use]
pub fn calculate_booking_price(base_price: i64, seats: i64, discount: i64) -> PricePreview {
    if base_price <= 0 || seats <= 0 {
        return PricePreview::default();
    }
    let subtotal = base_price.saturating_mul(seats);
    let service_fee = SERVICE_FEE_PER_TICKET.saturating_mul(seats);
    let tax = round_f64_to_i64(i64_to_f64(subtotal) * TAX_RATE);
    PricePreview {
        subtotal,
        service_fee,
        tax,
        discount,
        total: subtotal
            .saturating_add(service_fee)
            .saturating_add(tax)
            .saturating_sub(discount),
    }
}

/// Per-seat price hint for the seat map. Zero for a non-positive base.
#[must_use]
pub fn seat_price(base_price: i64, seat_type: SeatType) -> i64 {
    if base_price <= 0 {
        return 0;
    }
    let factor = match seat_type {
        SeatType::Standard => 1.0,
        SeatType::Vip => 1.5,
        SeatType::Couple => 2.0,
        SeatType::Wheelchair => 0.8,
    };
    round_f64_to_i64(i64_to_f64(base_price) * factor)
}

/// Sum of [`seat_price`] over a selection.
#[must_use]
pub fn seats_total(base_price: i64, seat_types: impl IntoIterator<Item = SeatType>) -> i64 {
    seat_types
        .into_iter()
        .map(|t| seat_price(base_price, t))
        .fold(0, i64::saturating_add)
}

/// Concession subtotal from `(unit_price, quantity)` pairs. Concession prices
/// already include tax.
#[must_use]
pub fn concession_subtotal(lines: impl IntoIterator<Item = (i64, u32)>) -> i64 {
    lines
        .into_iter()
        .map(|(price, qty)| price.saturating_mul(i64::from(qty)))
        .fold(0, i64::saturating_add)
}

/// Outcome of applying loyalty points to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsRedemption {
    pub points_used: i64,
    pub discount: i64,
}

/// Redeem up to `requested` points against `order_total`.
///
/// The discount is capped at half the order, then converted back to whole
/// points (rounding down) and capped at what the member holds.
#[must_use]
pub fn redeem_points(requested: i64, available: i64, order_total: i64) -> PointsRedemption {
    if requested <= 0 || available <= 0 || order_total <= 0 {
        return PointsRedemption::default();
    }
    let wanted = i64_to_f64(requested.saturating_mul(POINT_VALUE));
    let ceiling = i64_to_f64(order_total) * MAX_POINTS_SHARE;
    let allowed = wanted.min(ceiling);
    let points_used = floor_f64_to_i64(allowed / i64_to_f64(POINT_VALUE)).min(available);
    PointsRedemption {
        points_used,
        discount: points_used.saturating_mul(POINT_VALUE),
    }
}

/// Full checkout preview: tickets, concessions and points combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPreview {
    pub tickets: PricePreview,
    pub concessions: i64,
    pub points: PointsRedemption,
    pub grand_total: i64,
}

impl CheckoutPreview {
    #[must_use]
    pub fn compute(
        base_price: i64,
        seats: i64,
        concessions: i64,
        requested_points: i64,
        available_points: i64,
    ) -> Self {
        let tickets = calculate_booking_price(base_price, seats, 0);
        let before_discount = tickets.total.saturating_add(concessions);
        let points = redeem_points(requested_points, available_points, before_discount);
        Self {
            tickets,
            concessions,
            points,
            grand_total: before_discount.saturating_sub(points.discount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worked_example_two_seats() {
        let p = calculate_booking_price(100_000, 2, 0);
        assert_eq!(p.subtotal, 200_000);
        assert_eq!(p.service_fee, 10_000);
        assert_eq!(p.tax, 20_000);
        assert_eq!(p.total, 230_000);
    }

    #[test]
    fn non_positive_inputs_zero_everything() {
        assert_eq!(calculate_booking_price(0, 3, 0), PricePreview::default());
        assert_eq!(calculate_booking_price(90_000, 0, 0), PricePreview::default());
        assert_eq!(calculate_booking_price(-5, 2, 1_000), PricePreview::default());
        assert_eq!(calculate_booking_price(90_000, -1, 0), PricePreview::default());
    }

    #[test]
    fn formula_holds_over_a_grid() {
        for base in [1, 999, 45_000, 75_500, 120_000] {
            for seats in 1..=10 {
                for discount in [0, 2_000] {
                    let p = calculate_booking_price(base, seats, discount);
                    assert_eq!(p.subtotal, base * seats);
                    assert_eq!(p.service_fee, 5_000 * seats);
                    assert_eq!(p.tax, round_f64_to_i64(i64_to_f64(base * seats) * 0.1));
                    assert_eq!(p.total, p.subtotal + p.service_fee + p.tax - discount);
                }
            }
        }
    }

    #[test]
    fn huge_inputs_saturate_instead_of_overflowing() {
        let p = calculate_booking_price(i64::MAX / 2, 3, 0);
        assert_eq!(p.subtotal, i64::MAX);
        assert_eq!(p.total, i64::MAX);

        let p = calculate_booking_price(100_000, 2, i64::MIN);
        assert_eq!(p.total, i64::MAX);

        let p = calculate_booking_price(100_000, 2, i64::MAX);
        assert_eq!(p.total, 230_000 - i64::MAX);

        assert_eq!(concession_subtotal([(i64::MAX, 1), (1, 1)]), i64::MAX);
        assert_eq!(CheckoutPreview::compute(100_000, 2, i64::MAX, 0, 0).grand_total, i64::MAX);
    }

    #[test]
    fn tax_rounds_to_nearest_unit() {
        assert_eq!(calculate_booking_price(75_005, 1, 0).tax, 7_501);
        assert_eq!(calculate_booking_price(75_004, 1, 0).tax, 7_500);
    }

    #[test]
    fn seat_type_multipliers() {
        assert_eq!(seat_price(100_000, SeatType::Standard), 100_000);
        assert_eq!(seat_price(100_000, SeatType::Vip), 150_000);
        assert_eq!(seat_price(100_000, SeatType::Couple), 200_000);
        assert_eq!(seat_price(100_000, SeatType::Wheelchair), 80_000);
        assert_eq!(
            seats_total(80_000, [SeatType::Vip, SeatType::Standard]),
            200_000
        );
    }

    #[test]
    fn seat_hints_are_zero_without_a_price() {
        assert_eq!(seat_price(0, SeatType::Vip), 0);
        assert_eq!(seat_price(-90_000, SeatType::Couple), 0);
        assert_eq!(seats_total(-1, [SeatType::Standard, SeatType::Vip]), 0);
    }

    #[test]
    fn points_are_capped_by_half_the_order_and_balance() {
        assert_eq!(
            redeem_points(500, 1_000, 230_000),
            PointsRedemption {
                points_used: 115,
                discount: 115_000
            }
        );
        assert_eq!(redeem_points(50, 20, 230_000).points_used, 20);
        assert_eq!(redeem_points(10, 100, 230_000).discount, 10_000);
        assert_eq!(redeem_points(10, 0, 230_000), PointsRedemption::default());
    }

    #[test]
    fn checkout_preview_adds_untaxed_concessions() {
        let preview = CheckoutPreview::compute(100_000, 2, 95_000, 0, 0);
        assert_eq!(preview.tickets.total, 230_000);
        assert_eq!(preview.grand_total, 325_000);
        assert_eq!(concession_subtotal([(45_000, 1), (25_000, 2)]), 95_000);

        let with_points = CheckoutPreview::compute(100_000, 2, 95_000, 30, 100);
        assert_eq!(with_points.points.discount, 30_000);
        assert_eq!(with_points.grand_total, 295_000);
    }
}
