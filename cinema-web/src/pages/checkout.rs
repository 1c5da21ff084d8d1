//! `/booking/confirm`: concessions, points, contact details and the booking
//! itself, then the transfer QR and the "I have paid" confirmation.

use super::{EmptyState, bind_input, bind_select};
use crate::api;
use crate::app::session::{SessionContext, use_session};
use crate::app::state::{CheckoutDraft, use_checkout_draft};
use crate::components::toast::{Toaster, use_toaster};
use crate::components::{ConcessionPicker, HoldTimer, PaymentQr, PriceSummary};
use crate::dom::{self, Interval};
use crate::i18n::{fmt_currency, t};
use crate::router::Route;
use cinema_core::api::endpoints;
use cinema_core::checkout::{BookingDraft, ConcessionCart, Customer, GuestContact};
use cinema_core::hold::{HoldCountdown, Tick};
use cinema_core::models::{
    Booking, ConcessionItem, LoyaltyBalance, PaymentMethod, PaymentRequest, PaymentResponse,
};
use cinema_core::numbers::usize_to_i64;
use cinema_core::pricing::CheckoutPreview;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

fn method_label(method: PaymentMethod) -> String {
    t(&format!("payment_methods.{}", method.as_str().to_lowercase()))
}

#[allow(clippy::future_not_send)]
async fn refresh_points(session: SessionContext, user_id: i64) {
    match api::get::<LoyaltyBalance>(endpoints::loyalty_balance(user_id)).await {
        Ok(balance) => session.points_changed(balance.available_points),
        Err(err) => log::warn!("loyalty balance for {user_id}: {err}"),
    }
}

#[function_component(CheckoutPage)]
pub fn checkout_page() -> Html {
    let draft = use_checkout_draft();
    match draft.as_ref().and_then(|slot| (**slot).clone()) {
        Some(current) => html! { <CheckoutForm draft={current} /> },
        None => html! {
            <main id="main" class="page">
                <EmptyState message={t("checkout.no_draft")}>
                    <Link<Route> to={Route::Home} classes="btn">{ t("booking.back_home") }</Link<Route>>
                </EmptyState>
            </main>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct FormProps {
    pub draft: CheckoutDraft,
}

#[function_component(CheckoutForm)]
pub fn checkout_form(props: &FormProps) -> Html {
    let draft = &props.draft;
    let session = use_session();
    let toaster = use_toaster();
    let navigator = use_navigator();
    let slot = use_checkout_draft();

    let items = use_state(Vec::<ConcessionItem>::new);
    let cart = use_state(ConcessionCart::new);
    let balance = use_state(|| None::<LoyaltyBalance>);
    let points = use_state(String::new);
    let name = use_state(String::new);
    let email = use_state(String::new);
    let phone = use_state(String::new);
    let voucher = use_state(String::new);
    let method = use_state(|| PaymentMethod::default().as_str().to_string());
    let submitting = use_state(|| false);
    let placed = use_state(|| None::<(Booking, i64)>);
    let remaining = use_state(|| None::<u64>);
    let countdown = use_mut_ref(HoldCountdown::default);
    let booked = use_mut_ref(|| false);

    {
        let items = items.clone();
        let balance = balance.clone();
        let user_id = session.user_id();
        let cinema_id = draft.showtime.cinema_id;
        use_effect_with(cinema_id, move |&cinema_id| {
            spawn_local(async move {
                match api::get::<Vec<ConcessionItem>>(endpoints::cinema_concessions(cinema_id)).await {
                    Ok(list) => items.set(list.into_iter().filter(|i| i.is_available).collect()),
                    Err(err) => log::warn!("concessions for cinema {cinema_id}: {err}"),
                }
                if let Some(user_id) = user_id {
                    match api::get::<LoyaltyBalance>(endpoints::loyalty_balance(user_id)).await {
                        Ok(found) => balance.set(Some(found)),
                        Err(err) => log::warn!("loyalty balance for {user_id}: {err}"),
                    }
                }
            });
            || {}
        });
    }

    {
        let countdown = countdown.clone();
        let booked = booked.clone();
        let remaining = remaining.clone();
        let toaster = toaster.clone();
        let navigator = navigator.clone();
        let slot = slot.clone();
        let draft = draft.clone();
        use_effect_with(draft.session_id.clone(), move |_| {
            if let Some(expires_at) = draft.hold_expires_at {
                countdown.borrow_mut().start(expires_at);
            }
            let showtime_id = draft.showtime.showtime_id;
            let ticker = {
                let countdown = countdown.clone();
                let slot = slot.clone();
                Interval::new(1_000, move || {
                    let tick = countdown.borrow_mut().tick(dom::now_ms());
                    match tick {
                        Tick::Idle => {}
                        Tick::Remaining(secs) => remaining.set(Some(secs)),
                        Tick::Expired => {
                            remaining.set(None);
                            toaster.warning(t("seats.hold_expired"));
                            if let Some(slot) = slot.as_ref() {
                                slot.set(None);
                            }
                            if let Some(nav) = navigator.as_ref() {
                                nav.push(&Route::Seats { showtime_id });
                            }
                        }
                    }
                })
            };
            move || {
                drop(ticker);
                if !*booked.borrow() {
                    let call = endpoints::release_seats(
                        draft.session_id.as_str(),
                        showtime_id,
                        &draft.selection.seat_ids(),
                    );
                    spawn_local(async move {
                        if let Err(err) = api::fire(call).await {
                            log::warn!("releasing abandoned checkout failed: {err}");
                        }
                    });
                }
                if let Some(slot) = slot.as_ref() {
                    slot.set(None);
                }
            }
        });
    }

    let seats = draft.seat_count();
    let available_points = (*balance).map_or(0, |b| b.available_points);
    let requested_points = points.trim().parse::<i64>().unwrap_or(0).max(0);
    let preview = CheckoutPreview::compute(
        draft.showtime.price,
        usize_to_i64(seats),
        cart.subtotal(&items),
        requested_points,
        available_points,
    );

    let on_add = {
        let cart = cart.clone();
        Callback::from(move |item_id: i64| {
            let mut next = (*cart).clone();
            next.add(item_id, 1);
            cart.set(next);
        })
    };
    let on_remove = {
        let cart = cart.clone();
        Callback::from(move |item_id: i64| {
            let mut next = (*cart).clone();
            next.remove(item_id, 1);
            cart.set(next);
        })
    };

    let on_submit = {
        let draft = draft.clone();
        let session = session.clone();
        let toaster = toaster.clone();
        let submitting = submitting.clone();
        let placed = placed.clone();
        let countdown = countdown.clone();
        let booked = booked.clone();
        let guest = GuestContact {
            name: (*name).clone(),
            email: (*email).clone(),
            phone: (*phone).clone(),
        };
        let voucher = (*voucher).clone();
        let method = PaymentMethod::parse(&method).unwrap_or_default();
        let lines = cart.lines(&items);
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *submitting {
                return;
            }
            let customer = session.user.as_ref().map_or_else(
                || Customer::Guest(guest.clone()),
                |user| Customer::Member {
                    user_id: user.user_id,
                },
            );
            let request = BookingDraft {
                showtime_id: draft.showtime.showtime_id,
                session_id: draft.session_id.as_str(),
                selection: &draft.selection,
                tickets: draft.tickets,
                customer,
                voucher_code: &voucher,
                payment_method: method,
                concessions: lines.clone(),
                points_to_use: preview.points.points_used,
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
            let verify = endpoints::verify_hold(
                draft.session_id.as_str(),
                draft.showtime.showtime_id,
                &draft.selection.seat_ids(),
            );
            let session = session.clone();
            let toaster = toaster.clone();
            let submitting = submitting.clone();
            let placed = placed.clone();
            let countdown = countdown.clone();
            let booked = booked.clone();
            let amount = preview.grand_total;
            spawn_local(async move {
                if let Err(err) = api::fire(verify).await {
                    log::warn!("hold verification skipped: {err}");
                }
                match api::post::<_, Booking>(endpoints::create_booking(), &request).await {
                    Ok(booking) => {
                        log::info!("booking {} created", booking.booking_code);
                        *booked.borrow_mut() = true;
                        countdown.borrow_mut().stop();
                        toaster.success(t("checkout.created"));
                        placed.set(Some((booking, amount)));
                        if let Some(user_id) = request.user_id {
                            refresh_points(session, user_id).await;
                        }
                    }
                    Err(err) => {
                        log::error!("creating booking failed: {err}");
                        toaster.error(err.user_message(&t("checkout.failed")));
                    }
                }
                submitting.set(false);
            });
        })
    };

    if let Some((booking, amount)) = (*placed).clone() {
        return html! {
            <BookingPlaced
                {booking}
                {amount}
                movie_title={AttrValue::from(draft.showtime.movie_name.clone())}
                seat_labels={draft.selection.labels()}
            />
        };
    }

    let member = session.user.is_some();
    html! {
        <main id="main" class="page checkout-page">
            <header class="booking-header">
                <h1>{ t("checkout.title") }</h1>
                <p class="booking-meta">
                    <span>{ draft.showtime.movie_name.clone() }</span>
                    <span>{ draft.showtime.cinema_name.clone() }</span>
                    <span>{ draft.selection.labels().join(", ") }</span>
                </p>
                <HoldTimer remaining={*remaining} />
            </header>
            <form class="checkout-form" onsubmit={on_submit}>
                <ConcessionPicker items={(*items).clone()} cart={(*cart).clone()} {on_add} {on_remove} />
                if member {
                    <fieldset class="points">
                        <legend>{ t("checkout.points") }</legend>
                        <p class="muted">{ format!("{}: {}", t("checkout.points_available"), available_points) }</p>
                        <input
                            type="number"
                            min="0"
                            max={available_points.to_string()}
                            value={(*points).clone()}
                            oninput={bind_input(&points)}
                            aria-label={t("checkout.points")}
                        />
                    </fieldset>
                } else {
                    <fieldset class="guest">
                        <legend>{ t("checkout.guest") }</legend>
                        <input type="text" placeholder={t("checkout.name")} value={(*name).clone()} oninput={bind_input(&name)} />
                        <input type="email" placeholder={t("checkout.email")} value={(*email).clone()} oninput={bind_input(&email)} />
                        <input type="tel" placeholder={t("checkout.phone")} value={(*phone).clone()} oninput={bind_input(&phone)} />
                    </fieldset>
                }
                <fieldset class="payment">
                    <legend>{ t("checkout.payment") }</legend>
                    <select aria-label={t("checkout.payment")} onchange={bind_select(&method)}>
                        { for PaymentMethod::ALL.iter().map(|m| html! {
                            <option value={m.as_str()} selected={*method == m.as_str()}>{ method_label(*m) }</option>
                        }) }
                    </select>
                    <input type="text" placeholder={t("checkout.voucher")} value={(*voucher).clone()} oninput={bind_input(&voucher)} />
                </fieldset>
                <PriceSummary {preview} {seats} />
                <button type="submit" class="btn btn-primary" disabled={*submitting}>
                    { if *submitting { t("checkout.submitting") } else { t("checkout.submit") } }
                </button>
            </form>
        </main>
    }
}

#[derive(Properties, PartialEq)]
pub struct PlacedProps {
    pub booking: Booking,
    pub amount: i64,
    pub movie_title: AttrValue,
    pub seat_labels: Vec<String>,
}

/// Transfer instructions for a created booking.
#[function_component(BookingPlaced)]
pub fn booking_placed(props: &PlacedProps) -> Html {
    let session = use_session();
    let toaster = use_toaster();
    let navigator = use_navigator();
    let paying = use_state(|| false);
    let status = use_state(|| None::<String>);
    let booking = &props.booking;
    let reference = booking
        .payment_reference
        .clone()
        .or_else(|| Some(booking.booking_code.clone()))
        .filter(|r| !r.is_empty())
        .map(AttrValue::from);

    let on_paid = {
        let paying = paying.clone();
        let status = status.clone();
        let member = session.user.is_some();
        let booking_id = booking.booking_id;
        Callback::from(move |_: MouseEvent| {
            paying.set(true);
            confirm_payment(booking_id, member, paying.clone(), status.clone(), toaster.clone(), navigator.clone());
        })
    };

    html! {
        <main id="main" class="page checkout-page placed">
            <header class="booking-header">
                <h1>{ t("checkout.created") }</h1>
                <p class="booking-meta">
                    <span data-testid="booking-code">{ booking.booking_code.clone() }</span>
                    <span>{ props.seat_labels.join(", ") }</span>
                    <span>{ fmt_currency(props.amount) }</span>
                </p>
            </header>
            <PaymentQr
                qr={api::config().qr.clone()}
                amount={props.amount}
                movie_title={props.movie_title.clone()}
                seat_labels={props.seat_labels.clone()}
                {reference}
            />
            if let Some(status) = (*status).clone() {
                <p class="payment-status" role="status">{ format!("{}: {status}", t("payment.status")) }</p>
            }
            <button type="button" class="btn btn-primary" disabled={*paying} onclick={on_paid}>
                { t("payment.i_have_paid") }
            </button>
        </main>
    }
}

fn confirm_payment(
    booking_id: i64,
    member: bool,
    paying: UseStateHandle<bool>,
    status: UseStateHandle<Option<String>>,
    toaster: Toaster,
    navigator: Option<Navigator>,
) {
    spawn_local(async move {
        let body = PaymentRequest { booking_id };
        match api::post::<_, PaymentResponse>(endpoints::process_payment(), &body).await {
            Ok(response) => {
                log::info!("payment for booking {booking_id}: {}", response.status);
                status.set(Some(response.status));
                toaster.success(t("payment.confirmed"));
                let next = if member { Route::MyBookings } else { Route::Home };
                if let Some(nav) = navigator.as_ref() {
                    nav.push(&next);
                }
            }
            Err(err) => {
                log::error!("payment for booking {booking_id} failed: {err}");
                toaster.error(err.user_message(&t("payment.failed")));
            }
        }
        paying.set(false);
    });
}
