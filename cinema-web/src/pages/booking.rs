//! `/booking?cinema=&movie=&date=&time=`: resolve the screening, preview the
//! hall with demo availability and pick ticket counts.

use super::{EmptyState, Loading, aisles, hall_config, load_hall};
use crate::api;
use crate::components::toast::use_toaster;
use crate::components::{CheckoutGate, PriceSummary, SeatMap, TicketPicker};
use crate::i18n::{fmt_currency, fmt_show_date, t};
use crate::router::Route;
use cinema_core::api::endpoints;
use cinema_core::catalog::{self, BookingContext, BookingQuery, CatalogError};
use cinema_core::checkout::TicketCounts;
use cinema_core::hold::{SeatSelection, SelectedSeat};
use cinema_core::layout::LayoutConfig;
use cinema_core::models::{Cinema, Movie, Seat, Showtime};
use cinema_core::numbers::usize_to_i64;
use cinema_core::pricing::{CheckoutPreview, seats_total};
use cinema_core::seatmap::{check_selectable, demo_seats, group_by_row};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Resolved {
    context: BookingContext,
    layout: Option<LayoutConfig>,
}

#[allow(clippy::future_not_send)]
async fn resolve(query: BookingQuery) -> Result<Resolved, CatalogError> {
    // Each lookup short-circuits the next.
    let movie = api::get::<Movie>(endpoints::movie(query.movie_id))
        .await
        .inspect_err(|err| log::warn!("movie {}: {err}", query.movie_id))
        .ok();
    if movie.is_none() {
        return Err(CatalogError::MovieNotFound(query.movie_id));
    }
    let cinema = api::get::<Cinema>(endpoints::cinema(query.cinema_id))
        .await
        .inspect_err(|err| log::warn!("cinema {}: {err}", query.cinema_id))
        .ok();
    if cinema.is_none() {
        return Err(CatalogError::CinemaNotFound(query.cinema_id));
    }
    let showtimes = api::get::<Vec<Showtime>>(endpoints::showtimes_by_cinema(query.cinema_id))
        .await
        .inspect_err(|err| log::warn!("showtimes for cinema {}: {err}", query.cinema_id))
        .unwrap_or_default();
    let context = catalog::resolve(&query, movie, cinema, &showtimes)?;
    let hall = load_hall(context.showtime.cinema_id, context.showtime.hall_id).await;
    Ok(Resolved {
        layout: hall_config(hall.as_ref()),
        context,
    })
}

#[function_component(BookingPage)]
pub fn booking_page() -> Html {
    let location = use_location();
    let navigator = use_navigator();
    let toaster = use_toaster();
    let query = BookingQuery::parse(location.as_ref().map_or("", |l| l.query_str()));
    let resolved = use_state(|| None::<Result<Resolved, CatalogError>>);

    {
        let resolved = resolved.clone();
        let navigator = navigator.clone();
        let toaster = toaster.clone();
        use_effect_with(query.clone(), move |query| {
            match query {
                Ok(query) => {
                    let query = *query;
                    resolved.set(None);
                    spawn_local(async move {
                        resolved.set(Some(resolve(query).await));
                    });
                }
                Err(err) => {
                    log::warn!("booking query rejected: {err}");
                    toaster.error(t("booking.invalid_query"));
                    if let Some(nav) = navigator.as_ref() {
                        nav.push(&Route::Home);
                    }
                }
            }
            || {}
        });
    }

    let Ok(query) = query else {
        return html! { <main id="main" class="page"><EmptyState message={t("booking.invalid_query")} /></main> };
    };

    html! {
        <main id="main" class="page booking-page">
            { match resolved.as_ref() {
                None => html! { <Loading /> },
                Some(Err(err)) => html! {
                    <EmptyState message={t(err.i18n_key())}>
                        <Link<Route> to={Route::Home} classes="btn">{ t("booking.back_home") }</Link<Route>>
                    </EmptyState>
                },
                Some(Ok(resolved)) => html! {
                    <BookingPreview
                        context={resolved.context.clone()}
                        layout={resolved.layout.clone()}
                        showtime_key={AttrValue::from(query.showtime_key())}
                    />
                },
            } }
        </main>
    }
}

#[derive(Properties, PartialEq)]
pub struct PreviewProps {
    pub context: BookingContext,
    pub layout: Option<LayoutConfig>,
    pub showtime_key: AttrValue,
}

/// Demo seat map, ticket counts and price for a resolved screening.
#[function_component(BookingPreview)]
pub fn booking_preview(props: &PreviewProps) -> Html {
    let navigator = use_navigator();
    let toaster = use_toaster();
    let selection = use_state(SeatSelection::new);
    let tickets = use_state(TicketCounts::default);

    let seats = use_memo(
        (props.showtime_key.clone(), props.layout.clone()),
        |(key, layout)| {
            layout
                .as_ref()
                .map(|l| demo_seats(key, &l.generate()))
                .unwrap_or_default()
        },
    );
    let rows = group_by_row(&seats);
    let (row_aisles, column_aisles) = aisles(props.layout.as_ref());
    let showtime = &props.context.showtime;

    let on_toggle = {
        let selection = selection.clone();
        let toaster = toaster.clone();
        Callback::from(move |seat: Seat| {
            if let Err(block) = check_selectable(&seat, None) {
                toaster.warning(t(block.i18n_key()));
                return;
            }
            let mut next = (*selection).clone();
            match next.toggle(SelectedSeat::from(&seat)) {
                Ok(_) => selection.set(next),
                Err(err) => toaster.warning(t(err.i18n_key())),
            }
        })
    };

    let on_tickets = {
        let tickets = tickets.clone();
        Callback::from(move |counts: TicketCounts| tickets.set(counts))
    };

    let preview = CheckoutPreview::compute(showtime.price, usize_to_i64(selection.len()), 0, 0, 0);
    let seat_estimate = seats_total(showtime.price, selection.iter().map(|s| s.seat_type));

    let on_continue = {
        let counts = *tickets;
        let showtime_id = showtime.showtime_id;
        Callback::from(move |_: MouseEvent| {
            if let Some(nav) = navigator.as_ref()
                && let Err(err) = nav.push_with_query(&Route::Seats { showtime_id }, &counts)
            {
                log::error!("navigating to seats failed: {err}");
            }
        })
    };

    html! {
        <>
            <header class="booking-header">
                <h1>{ props.context.movie.title.clone() }</h1>
                <p class="booking-meta">
                    <span>{ props.context.cinema.cinema_name.clone() }</span>
                    <span>{ showtime.hall_name.clone() }</span>
                    <span>{ fmt_show_date(&showtime.show_date) }</span>
                    <span>{ showtime.start_hhmm().to_string() }</span>
                    <span>{ fmt_currency(showtime.price) }</span>
                </p>
            </header>
            <div class="booking-layout">
                <SeatMap
                    {rows}
                    selected={selection.seat_ids()}
                    {on_toggle}
                    base_price={showtime.price}
                    {row_aisles}
                    {column_aisles}
                />
                <aside class="booking-side">
                    <TicketPicker counts={*tickets} on_change={on_tickets} />
                    <p class="selected-seats">
                        { format!("{}: {}", t("seats.selected"), selection.labels().join(", ")) }
                    </p>
                    <PriceSummary {preview} seats={selection.len()} />
                    <CheckoutGate
                        selected={selection.len()}
                        tickets={tickets.total()}
                        seat_estimate={Some(seat_estimate)}
                        label={t("booking.continue")}
                        {on_continue}
                    />
                </aside>
            </div>
        </>
    }
}
