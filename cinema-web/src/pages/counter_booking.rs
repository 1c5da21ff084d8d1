//! `/admin/bookings`: box-office sales. Staff pick a showtime, select seats
//! on the live map, hold them, take the customer's details and book.
//!
//! Unlike the storefront the selection is frozen while the hold runs; staff
//! release first to change seats.

use super::live_hold::{TICK_MS, use_hold_view};
use super::{EmptyState, Loading, bind_input, bind_select};
use crate::api;
use crate::components::toast::use_toaster;
use crate::components::{HoldTimer, PriceSummary, SeatMap};
use crate::dom::Interval;
use crate::i18n::{fmt_currency, fmt_show_date, t};
use cinema_core::api::{Page, endpoints};
use cinema_core::checkout::{BookingDraft, Customer, GuestContact, TicketCounts};
use cinema_core::hold::HoldPolicy;
use cinema_core::models::{Booking, PaymentMethod, Seat, Showtime};
use cinema_core::numbers::usize_to_i64;
use cinema_core::pricing::CheckoutPreview;
use cinema_core::seatmap::group_by_row;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

const SHOWTIME_PAGE_SIZE: u32 = 50;
const COUNTER_METHODS: [PaymentMethod; 3] = [
    PaymentMethod::Cash,
    PaymentMethod::CreditCard,
    PaymentMethod::BankTransfer,
];

#[function_component(CounterBookingPage)]
pub fn counter_booking_page() -> Html {
    let toaster = use_toaster();
    let showtimes = use_state(|| None::<Vec<Showtime>>);
    let picked = use_state(String::new);

    {
        let showtimes = showtimes.clone();
        use_effect_with((), move |()| {
            spawn_local(async move {
                let page = api::get::<Page<Showtime>>(endpoints::admin_showtimes(0, SHOWTIME_PAGE_SIZE)).await;
                match page {
                    Ok(page) => {
                        let open = page.data.into_iter().filter(|s| s.status.is_bookable()).collect();
                        showtimes.set(Some(open));
                    }
                    Err(err) => {
                        log::error!("counter showtimes: {err}");
                        toaster.error(err.user_message(&t("counter.showtimes_failed")));
                        showtimes.set(Some(Vec::new()));
                    }
                }
            });
            || {}
        });
    }

    let current = picked
        .parse::<i64>()
        .ok()
        .and_then(|id| showtimes.as_ref()?.iter().find(|s| s.showtime_id == id).cloned());

    html! {
        <main id="main" class="page counter-page">
            <h1>{ t("counter.title") }</h1>
            { match showtimes.as_ref() {
                None => html! { <Loading /> },
                Some(list) if list.is_empty() => html! { <EmptyState message={t("counter.no_showtimes")} /> },
                Some(list) => html! {
                    <select class="select" aria-label={t("counter.pick_showtime")} onchange={bind_select(&picked)}>
                        <option value="" selected={picked.is_empty()}>{ t("counter.pick_showtime") }</option>
                        { for list.iter().map(|s| html! {
                            <option value={s.showtime_id.to_string()}>
                                { format!("{} · {} · {} {}", s.movie_name, s.hall_name, fmt_show_date(&s.show_date), s.start_hhmm()) }
                            </option>
                        }) }
                    </select>
                },
            } }
            if let Some(showtime) = current {
                <CounterDesk key={showtime.showtime_id} showtime={showtime.clone()} />
            }
        </main>
    }
}

#[derive(Properties, PartialEq)]
pub struct DeskProps {
    pub showtime: Showtime,
}

/// Live map, hold controls and the sale form for one showtime.
#[function_component(CounterDesk)]
pub fn counter_desk(props: &DeskProps) -> Html {
    let showtime = &props.showtime;
    let showtime_id = showtime.showtime_id;
    let toaster = use_toaster();
    let view = use_hold_view(showtime_id, HoldPolicy::LockWhileHeld, toaster.clone());
    let name = use_state(String::new);
    let email = use_state(String::new);
    let phone = use_state(String::new);
    let method = use_state(|| PaymentMethod::Cash.as_str().to_string());
    let submitting = use_state(|| false);

    {
        let view = view.clone();
        use_effect_with(showtime_id, move |_| {
            view.load_seats();
            view.sync();
            let ticker = {
                let view = view.clone();
                Interval::new(TICK_MS, move || view.tick())
            };
            move || {
                drop(ticker);
                view.release_all();
            }
        });
    }

    let on_toggle = {
        let view = view.clone();
        Callback::from(move |seat: Seat| {
            let _ = view.toggle(&seat);
        })
    };

    let on_hold = {
        let view = view.clone();
        let email = email.clone();
        Callback::from(move |_: MouseEvent| {
            let contact = email.trim().to_string();
            view.request_hold((!contact.is_empty()).then_some(contact));
        })
    };

    let on_release = {
        let view = view.clone();
        Callback::from(move |_: MouseEvent| {
            view.release_all();
            view.load_seats();
            view.sync();
        })
    };

    let selected_count = view.selected.len();
    let holding = view.remaining.is_some();
    let preview = CheckoutPreview::compute(showtime.price, usize_to_i64(selected_count), 0, 0, 0);

    let on_submit = {
        let view = view.clone();
        let name = name.clone();
        let email = email.clone();
        let phone = phone.clone();
        let method = method.clone();
        let submitting = submitting.clone();
        let toaster = toaster.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *submitting {
                return;
            }
            let (session, selection) = {
                let coordinator = view.coordinator.borrow();
                (coordinator.session().cloned(), coordinator.selection().clone())
            };
            let Some(session) = session.filter(|_| view.coordinator.borrow().is_holding()) else {
                toaster.warning(t("counter.hold_first"));
                return;
            };
            let request = BookingDraft {
                showtime_id,
                session_id: session.as_str(),
                selection: &selection,
                tickets: TicketCounts {
                    adult: u32::try_from(selection.len()).unwrap_or(u32::MAX),
                    ..TicketCounts::default()
                },
                customer: Customer::Guest(GuestContact {
                    name: (*name).clone(),
                    email: (*email).clone(),
                    phone: (*phone).clone(),
                }),
                voucher_code: "",
                payment_method: PaymentMethod::parse(&method).unwrap_or(PaymentMethod::Cash),
                concessions: Vec::new(),
                points_to_use: 0,
            }
            .into_request();
            let request = match request {
                Ok(request) => request,
                Err(err) => {
                    toaster.warning(t(err.i18n_key()));
                    return;
                }
            };
            submitting.set(true);
            let view = view.clone();
            let submitting = submitting.clone();
            let toaster = toaster.clone();
            let (name, email, phone) = (name.clone(), email.clone(), phone.clone());
            spawn_local(async move {
                match api::post::<_, Booking>(endpoints::admin_create_booking(), &request).await {
                    Ok(booking) => {
                        log::info!("counter booking {} for showtime {showtime_id}", booking.booking_code);
                        toaster.success(format!("{} {}", t("counter.booked"), booking.booking_code));
                        name.set(String::new());
                        email.set(String::new());
                        phone.set(String::new());
                        view.settle();
                    }
                    Err(err) => {
                        log::error!("counter booking for showtime {showtime_id} failed: {err}");
                        toaster.error(err.user_message(&t("checkout.failed")));
                    }
                }
                submitting.set(false);
            });
        })
    };

    html! {
        <div class="booking-layout counter-desk">
            <section class="counter-map">
                <p class="booking-meta">
                    <span>{ showtime.cinema_name.clone() }</span>
                    <span>{ showtime.hall_name.clone() }</span>
                    <span>{ fmt_currency(showtime.price) }</span>
                    if let Some(left) = showtime.available_seats {
                        <span>{ format!("{left} {}", t("counter.seats_left")) }</span>
                    }
                </p>
                { match view.seats.as_ref() {
                    None => html! { <Loading /> },
                    Some(list) if list.is_empty() => html! { <EmptyState message={t("seats.none")} /> },
                    Some(list) => html! {
                        <SeatMap
                            rows={group_by_row(list)}
                            selected={view.selected.iter().map(|s| s.seat_id).collect::<Vec<_>>()}
                            {on_toggle}
                            own_session={(*view.own_session).clone().map(AttrValue::from)}
                            base_price={showtime.price}
                        />
                    },
                } }
            </section>
            <aside class="booking-side">
                <HoldTimer remaining={*view.remaining} />
                <p class="selected-seats">
                    { format!("{}: {}", t("seats.selected"), view.selected.iter().map(|s| s.label.as_str()).collect::<Vec<_>>().join(", ")) }
                </p>
                <PriceSummary {preview} seats={selected_count} />
                <div class="counter-hold-actions">
                    <button type="button" class="btn" disabled={holding || selected_count == 0} onclick={on_hold}>
                        { t("counter.hold") }
                    </button>
                    <button type="button" class="btn btn-ghost" disabled={!holding} onclick={on_release}>
                        { t("counter.release") }
                    </button>
                </div>
                <form class="checkout-form" onsubmit={on_submit}>
                    <h2>{ t("counter.customer") }</h2>
                    <input type="text" placeholder={t("checkout.name")} value={(*name).clone()} oninput={bind_input(&name)} />
                    <input type="email" placeholder={t("checkout.email")} value={(*email).clone()} oninput={bind_input(&email)} />
                    <input type="tel" placeholder={t("checkout.phone")} value={(*phone).clone()} oninput={bind_input(&phone)} />
                    <select class="select" aria-label={t("checkout.payment")} onchange={bind_select(&method)}>
                        { for COUNTER_METHODS.iter().map(|m| html! {
                            <option value={m.as_str()} selected={*method == m.as_str()}>
                                { t(&format!("payment_methods.{}", m.as_str().to_lowercase())) }
                            </option>
                        }) }
                    </select>
                    <button type="submit" class="btn btn-primary" disabled={!holding || *submitting}>
                        { if *submitting { t("checkout.submitting") } else { t("counter.book") } }
                    </button>
                </form>
            </aside>
        </div>
    }
}
