//! `/seats/:showtime_id`: live availability with a backend hold that follows
//! the selection.
//!
//! Every added seat re-holds the whole selection under one session id. The
//! hold is extended once near the end; on expiry the selection and session
//! are dropped and the map is refetched. Seats still held when the page goes
//! away are released, by `sendBeacon` if the tab is closing.

use super::live_hold::{TICK_MS, use_hold_view};
use super::{EmptyState, Loading, aisles, hall_config, load_hall};
use crate::api;
use crate::app::session::use_session;
use crate::app::state::{CheckoutDraft, use_checkout_draft};
use crate::components::toast::use_toaster;
use crate::components::ticket_picker::max_tickets;
use crate::components::{CheckoutGate, HoldTimer, PriceSummary, SeatMap, TicketPicker};
use crate::dom::{self, Interval, WindowListener};
use crate::i18n::{fmt_currency, fmt_show_date, t};
use crate::router::Route;
use cinema_core::api::endpoints;
use cinema_core::checkout::TicketCounts;
use cinema_core::hold::{HoldPolicy, Toggle};
use cinema_core::layout::LayoutConfig;
use cinema_core::models::{Seat, Showtime};
use cinema_core::numbers::usize_to_i64;
use cinema_core::pricing::{CheckoutPreview, seats_total};
use cinema_core::seatmap::group_by_row;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub showtime_id: i64,
}

#[function_component(SeatsPage)]
pub fn seats_page(props: &Props) -> Html {
    let showtime_id = props.showtime_id;
    let session = use_session();
    let toaster = use_toaster();
    let navigator = use_navigator();
    let location = use_location();
    let draft = use_checkout_draft();

    let view = use_hold_view(showtime_id, HoldPolicy::Rehold, toaster.clone());
    let handed_off = use_mut_ref(|| false);
    let showtime = use_state(|| None::<Showtime>);
    let layout = use_state(|| None::<LayoutConfig>);
    let tickets = use_state(|| {
        location
            .as_ref()
            .and_then(|l| l.query::<TicketCounts>().ok())
            .map(|counts| counts.capped(max_tickets()))
            .unwrap_or_default()
    });

    {
        let view = view.clone();
        let showtime = showtime.clone();
        let layout = layout.clone();
        let handed_off = handed_off.clone();
        use_effect_with(showtime_id, move |&showtime_id| {
            view.load_seats();
            view.sync();
            {
                let view = view.clone();
                spawn_local(async move {
                    match api::get::<Showtime>(endpoints::showtime(showtime_id)).await {
                        Ok(found) => {
                            let hall = load_hall(found.cinema_id, found.hall_id).await;
                            layout.set(hall_config(hall.as_ref()));
                            showtime.set(Some(found));
                        }
                        Err(err) => {
                            log::error!("showtime {showtime_id}: {err}");
                            view.toaster
                                .error(err.user_message(&t("seats.showtime_failed")));
                        }
                    }
                });
            }

            let ticker = {
                let view = view.clone();
                Interval::new(TICK_MS, move || view.tick())
            };

            let on_pagehide = {
                let view = view.clone();
                let handed_off = handed_off.clone();
                WindowListener::new("pagehide", move |_| {
                    if *handed_off.borrow() {
                        return;
                    }
                    if let Some(url) = view.beacon_url()
                        && !dom::send_beacon(&url)
                    {
                        log::warn!("release beacon for showtime {showtime_id} was not queued");
                    }
                })
            };

            move || {
                drop(ticker);
                drop(on_pagehide);
                if !*handed_off.borrow() {
                    view.release_all();
                }
            }
        });
    }

    let on_toggle = {
        let view = view.clone();
        let email = session.user.as_ref().map(|u| u.email.clone());
        Callback::from(move |seat: Seat| {
            if view.toggle(&seat) == Some(Toggle::Added) {
                view.request_hold(email.clone());
            }
        })
    };

    let on_tickets = {
        let tickets = tickets.clone();
        Callback::from(move |counts: TicketCounts| tickets.set(counts))
    };

    let Some(current) = (*showtime).clone() else {
        return html! { <main id="main" class="page"><Loading /></main> };
    };

    let selected_count = view.selected.len();
    let holding = view.remaining.is_some();
    let seat_estimate = seats_total(current.price, view.selected.iter().map(|s| s.seat_type));
    let preview = CheckoutPreview::compute(current.price, usize_to_i64(selected_count), 0, 0, 0);

    let on_continue = {
        let coordinator = view.coordinator.clone();
        let handed_off = handed_off.clone();
        let toaster = toaster.clone();
        let counts = *tickets;
        let current = current.clone();
        Callback::from(move |_: MouseEvent| {
            let next = {
                let coordinator = coordinator.borrow();
                coordinator.session().cloned().map(|session_id| CheckoutDraft {
                    showtime: current.clone(),
                    session_id,
                    selection: coordinator.selection().clone(),
                    tickets: counts,
                    hold_expires_at: coordinator.expires_at(),
                })
            };
            let (Some(next), Some(slot)) = (next, draft.as_ref()) else {
                toaster.error(t("seats.hold_failed"));
                return;
            };
            *handed_off.borrow_mut() = true;
            slot.set(Some(next));
            if let Some(nav) = navigator.as_ref() {
                nav.push(&Route::Checkout);
            }
        })
    };

    let (row_aisles, column_aisles) = aisles(layout.as_ref());
    let labels: Vec<String> = view.selected.iter().map(|s| s.label.clone()).collect();

    html! {
        <main id="main" class="page seats-page">
            <header class="booking-header">
                <h1>{ current.movie_name.clone() }</h1>
                <p class="booking-meta">
                    <span>{ current.cinema_name.clone() }</span>
                    <span>{ current.hall_name.clone() }</span>
                    <span>{ fmt_show_date(&current.show_date) }</span>
                    <span>{ current.start_hhmm().to_string() }</span>
                    <span>{ fmt_currency(current.price) }</span>
                </p>
                <HoldTimer remaining={*view.remaining} />
            </header>
            <div class="booking-layout">
                { match view.seats.as_ref() {
                    None => html! { <Loading /> },
                    Some(list) if list.is_empty() => html! { <EmptyState message={t("seats.none")} /> },
                    Some(list) => html! {
                        <SeatMap
                            rows={group_by_row(list)}
                            selected={view.selected.iter().map(|s| s.seat_id).collect::<Vec<_>>()}
                            {on_toggle}
                            own_session={(*view.own_session).clone().map(AttrValue::from)}
                            base_price={current.price}
                            {row_aisles}
                            {column_aisles}
                        />
                    },
                } }
                <aside class="booking-side">
                    <TicketPicker counts={*tickets} on_change={on_tickets} />
                    <p class="selected-seats">{ format!("{}: {}", t("seats.selected"), labels.join(", ")) }</p>
                    <PriceSummary {preview} seats={selected_count} />
                    <CheckoutGate
                        selected={selected_count}
                        tickets={tickets.total()}
                        held={holding}
                        seat_estimate={Some(seat_estimate)}
                        label={t("seats.to_checkout")}
                        {on_continue}
                    />
                </aside>
            </div>
        </main>
    }
}
