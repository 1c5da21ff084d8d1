//! `/bookings`: the signed-in customer's bookings, with cancellation.

use super::{EmptyState, Loading};
use crate::api;
use crate::app::session::use_session;
use crate::components::toast::{Toaster, use_toaster};
use crate::i18n::{fmt_currency, t};
use cinema_core::api::endpoints;
use cinema_core::models::{Booking, BookingStatus};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

pub(crate) const fn status_key(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Pending => "bookings.status.pending",
        BookingStatus::Confirmed => "bookings.status.confirmed",
        BookingStatus::Cancelled => "bookings.status.cancelled",
        BookingStatus::Completed => "bookings.status.completed",
    }
}

const fn cancellable(status: BookingStatus) -> bool {
    matches!(status, BookingStatus::Pending | BookingStatus::Confirmed)
}

fn load(user_id: i64, bookings: UseStateHandle<Option<Vec<Booking>>>, toaster: Toaster) {
    spawn_local(async move {
        match api::get::<Vec<Booking>>(endpoints::bookings_for_user(user_id)).await {
            Ok(list) => bookings.set(Some(list)),
            Err(err) => {
                log::error!("bookings for user {user_id}: {err}");
                toaster.error(err.user_message(&t("bookings.load_failed")));
                bookings.set(Some(Vec::new()));
            }
        }
    });
}

#[function_component(MyBookingsPage)]
pub fn my_bookings_page() -> Html {
    let session = use_session();
    let toaster = use_toaster();
    let bookings = use_state(|| None::<Vec<Booking>>);
    let user_id = session.user_id();

    {
        let bookings = bookings.clone();
        let toaster = toaster.clone();
        use_effect_with(user_id, move |&user_id| {
            if let Some(user_id) = user_id {
                load(user_id, bookings, toaster);
            }
            || {}
        });
    }

    let on_cancel = {
        let bookings = bookings.clone();
        Callback::from(move |booking_id: i64| {
            let bookings = bookings.clone();
            let toaster = toaster.clone();
            spawn_local(async move {
                match api::fire(endpoints::cancel_booking(booking_id)).await {
                    Ok(()) => {
                        toaster.success(t("bookings.cancelled"));
                        if let Some(user_id) = user_id {
                            load(user_id, bookings, toaster);
                        }
                    }
                    Err(err) => {
                        log::error!("cancelling booking {booking_id}: {err}");
                        toaster.error(err.user_message(&t("bookings.cancel_failed")));
                    }
                }
            });
        })
    };

    html! {
        <main id="main" class="page bookings-page">
            <h1>{ t("bookings.title") }</h1>
            { match bookings.as_ref() {
                None => html! { <Loading /> },
                Some(list) if list.is_empty() => html! { <EmptyState message={t("bookings.empty")} /> },
                Some(list) => html! {
                    <BookingTable bookings={list.clone()} on_cancel={Some(on_cancel)} />
                },
            } }
        </main>
    }
}

#[derive(Properties, PartialEq)]
pub struct TableProps {
    pub bookings: Vec<Booking>,
    /// Offer cancellation for open bookings.
    #[prop_or_default]
    pub on_cancel: Option<Callback<i64>>,
}

#[function_component(BookingTable)]
pub fn booking_table(props: &TableProps) -> Html {
    html! {
        <table class="table booking-table">
            <thead>
                <tr>
                    <th>{ t("bookings.code") }</th>
                    <th>{ t("bookings.movie") }</th>
                    <th>{ t("bookings.seats") }</th>
                    <th>{ t("bookings.total") }</th>
                    <th>{ t("bookings.status_label") }</th>
                    if props.on_cancel.is_some() {
                        <th></th>
                    }
                </tr>
            </thead>
            <tbody>
                { for props.bookings.iter().map(|b| {
                    let seats: Vec<String> = b.tickets.iter().map(|tk| format!("{}{}", tk.seat_row, tk.seat_number)).collect();
                    let cancel = props.on_cancel.as_ref().filter(|_| cancellable(b.status)).map(|cb| {
                        let id = b.booking_id;
                        cb.reform(move |_: MouseEvent| id)
                    });
                    html! {
                        <tr key={b.booking_id}>
                            <td>{ b.booking_code.clone() }</td>
                            <td>{ b.movie_title.clone().unwrap_or_default() }</td>
                            <td>{ seats.join(", ") }</td>
                            <td>{ fmt_currency(b.total_amount) }</td>
                            <td>{ t(status_key(b.status)) }</td>
                            if props.on_cancel.is_some() {
                                <td>
                                    if let Some(onclick) = cancel {
                                        <button type="button" class="btn btn-ghost btn-xs" {onclick}>{ t("bookings.cancel") }</button>
                                    }
                                </td>
                            }
                        </tr>
                    }
                }) }
            </tbody>
        </table>
    }
}
