use crate::i18n::{fmt_currency, t};
use cinema_core::models::Seat;
use cinema_core::pricing::seat_price;
use cinema_core::seatmap::{SeatClass, SeatRow, check_selectable, classify};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub rows: Vec<SeatRow>,
    pub selected: Vec<i64>,
    pub on_toggle: Callback<Seat>,
    #[prop_or_default]
    pub own_session: Option<AttrValue>,
    /// Showtime base price, for per-seat hints.
    #[prop_or_default]
    pub base_price: i64,
    /// Rows followed by a walkway.
    #[prop_or_default]
    pub row_aisles: Vec<String>,
    /// Seat numbers followed by a walkway.
    #[prop_or_default]
    pub column_aisles: Vec<u32>,
    #[prop_or_default]
    pub disabled: bool,
}

#[function_component(SeatMap)]
pub fn seat_map(props: &Props) -> Html {
    let own = props.own_session.as_deref();
    html! {
        <section class="seat-map" aria-label={t("seats.map_label")}>
            <div class="screen" aria-hidden="true">{ t("seats.screen") }</div>
            <div class="seat-rows" role="grid">
                { for props.rows.iter().map(|row| {
                    let aisle = props.row_aisles.iter().any(|r| *r == row.row);
                    html! {
                        <>
                            <div class="seat-row" role="row">
                                <span class="row-label" role="rowheader">{ row.row.clone() }</span>
                                { for row.seats.iter().map(|seat| seat_button(props, seat, own)) }
                            </div>
                            if aisle {
                                <div class="row-aisle" aria-hidden="true"></div>
                            }
                        </>
                    }
                }) }
            </div>
            <Legend />
        </section>
    }
}

fn seat_button(props: &Props, seat: &Seat, own: Option<&str>) -> Html {
    let selected = props.selected.contains(&seat.seat_id);
    let class = classify(seat, own, selected);
    let blocked = check_selectable(seat, own).is_err();
    let label = seat.label();
    let hint = format!(
        "{label} · {} · {}",
        t(&format!("seat_types.{}", seat.seat_type.as_str().to_lowercase())),
        fmt_currency(seat_price(props.base_price, seat.seat_type))
    );
    let onclick = {
        let cb = props.on_toggle.clone();
        let seat = seat.clone();
        Callback::from(move |_| cb.emit(seat.clone()))
    };
    let aisle = props.column_aisles.contains(&seat.seat_number);
    html! {
        <>
            <button
                type="button"
                class={classes!(class.css(), props.disabled.then_some("seat-locked"))}
                role="gridcell"
                title={hint.clone()}
                aria-label={hint}
                aria-pressed={selected.to_string()}
                aria-disabled={(blocked || props.disabled).to_string()}
                data-seat={label}
                {onclick}
            >
                { seat.seat_number.to_string() }
            </button>
            if aisle {
                <span class="column-aisle" aria-hidden="true"></span>
            }
        </>
    }
}

#[function_component(Legend)]
pub fn legend() -> Html {
    let entries = [
        (SeatClass::Available, "seats.legend.available"),
        (SeatClass::Vip, "seats.legend.vip"),
        (SeatClass::Couple, "seats.legend.couple"),
        (SeatClass::Wheelchair, "seats.legend.wheelchair"),
        (SeatClass::Selected, "seats.legend.selected"),
        (SeatClass::Held, "seats.legend.held"),
        (SeatClass::Booked, "seats.legend.booked"),
    ];
    html! {
        <ul class="seat-legend">
            { for entries.iter().map(|(class, key)| html! {
                <li><span class={class.css()} aria-hidden="true"></span>{ t(key) }</li>
            }) }
        </ul>
    }
}
