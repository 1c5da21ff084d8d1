use crate::i18n::t;
use cinema_core::layout::SeatGrid;
use cinema_core::models::SeatType;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub grid: SeatGrid,
}

fn type_class(seat_type: SeatType) -> &'static str {
    match seat_type {
        SeatType::Standard => "seat seat-available",
        SeatType::Vip => "seat seat-vip",
        SeatType::Couple => "seat seat-couple",
        SeatType::Wheelchair => "seat seat-wheelchair",
    }
}

/// Read-only rendering of a generated hall layout.
#[function_component(LayoutPreview)]
pub fn layout_preview(props: &Props) -> Html {
    html! {
        <section class="layout-preview" aria-label={t("layout.preview")}>
            <div class="screen" aria-hidden="true">{ t("seats.screen") }</div>
            <div class="seat-rows" data-testid="layout-grid">
                { for props.grid.rows.iter().map(|row| html! {
                    <>
                        <div class="seat-row">
                            <span class="row-label">{ row.row.to_string() }</span>
                            { for row.seats.iter().map(|seat| html! {
                                <>
                                    <span class={type_class(seat.seat_type)} title={seat.label.clone()}>
                                        { seat.number.to_string() }
                                    </span>
                                    if seat.aisle_after {
                                        <span class="column-aisle" aria-hidden="true"></span>
                                    }
                                </>
                            }) }
                        </div>
                        if row.aisle_after {
                            <div class="row-aisle" aria-hidden="true"></div>
                        }
                    </>
                }) }
            </div>
            <ul class="layout-counts">
                <li>{ format!("{}: {}", t("layout.total"), props.grid.total_seats()) }</li>
                { for SeatType::ALL.iter().map(|ty| html! {
                    <li>{ format!("{}: {}", t(&format!("seat_types.{}", ty.as_str().to_lowercase())), props.grid.count(*ty)) }</li>
                }) }
            </ul>
        </section>
    }
}
