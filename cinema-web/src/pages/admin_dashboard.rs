//! `/admin/dashboard`: upcoming showtimes at a glance with shortcuts into the
//! counter and the layout editor.

use super::{EmptyState, Loading};
use crate::api;
use crate::components::toast::use_toaster;
use crate::i18n::{fmt_currency, fmt_show_date, t};
use crate::router::Route;
use cinema_core::api::{Page, endpoints};
use cinema_core::models::{Showtime, ShowtimeStatus};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

const PAGE_SIZE: u32 = 20;

pub(crate) const fn showtime_status_key(status: ShowtimeStatus) -> &'static str {
    match status {
        ShowtimeStatus::Scheduled => "admin.status.scheduled",
        ShowtimeStatus::Available => "admin.status.available",
        ShowtimeStatus::Full => "admin.status.full",
        ShowtimeStatus::Cancelled => "admin.status.cancelled",
        ShowtimeStatus::Completed => "admin.status.completed",
    }
}

#[function_component(AdminDashboardPage)]
pub fn admin_dashboard_page() -> Html {
    let toaster = use_toaster();
    let page_no = use_state(|| 0_u32);
    let page = use_state(|| None::<Page<Showtime>>);

    {
        let page = page.clone();
        use_effect_with(*page_no, move |&page_no| {
            spawn_local(async move {
                match api::get::<Page<Showtime>>(endpoints::admin_showtimes(page_no, PAGE_SIZE)).await {
                    Ok(found) => page.set(Some(found)),
                    Err(err) => {
                        log::error!("admin showtimes page {page_no}: {err}");
                        toaster.error(err.user_message(&t("admin.showtimes_failed")));
                        page.set(Some(Page {
                            data: Vec::new(),
                            total_elements: 0,
                            total_pages: 0,
                            current_page: page_no,
                            page_size: Some(PAGE_SIZE),
                        }));
                    }
                }
            });
            || {}
        });
    }

    let step = |delta: i64| {
        let page_no = page_no.clone();
        Callback::from(move |_: MouseEvent| {
            let next = i64::from(*page_no) + delta;
            if let Ok(next) = u32::try_from(next) {
                page_no.set(next);
            }
        })
    };

    html! {
        <main id="main" class="page admin-page">
            <h1>{ t("admin.title") }</h1>
            <nav class="admin-shortcuts">
                <Link<Route> to={Route::CounterBooking} classes="btn">{ t("nav.counter") }</Link<Route>>
                <Link<Route> to={Route::HallLayout} classes="btn">{ t("nav.layout") }</Link<Route>>
                <Link<Route> to={Route::StaffDashboard} classes="btn btn-ghost">{ t("nav.staff") }</Link<Route>>
            </nav>
            <h2>{ t("admin.showtimes") }</h2>
            { match page.as_ref() {
                None => html! { <Loading /> },
                Some(found) if found.data.is_empty() => html! { <EmptyState message={t("admin.no_showtimes")} /> },
                Some(found) => html! {
                    <>
                        <table class="table showtime-table">
                            <thead>
                                <tr>
                                    <th>{ t("admin.movie") }</th>
                                    <th>{ t("admin.cinema") }</th>
                                    <th>{ t("admin.when") }</th>
                                    <th>{ t("admin.price") }</th>
                                    <th>{ t("admin.seats_left") }</th>
                                    <th>{ t("admin.status_label") }</th>
                                </tr>
                            </thead>
                            <tbody>
                                { for found.data.iter().map(|s| html! {
                                    <tr key={s.showtime_id}>
                                        <td>{ s.movie_name.clone() }</td>
                                        <td>{ format!("{} · {}", s.cinema_name, s.hall_name) }</td>
                                        <td>{ format!("{} {}", fmt_show_date(&s.show_date), s.start_hhmm()) }</td>
                                        <td>{ fmt_currency(s.price) }</td>
                                        <td>{ s.available_seats.map(|n| n.to_string()).unwrap_or_default() }</td>
                                        <td>{ t(showtime_status_key(s.status)) }</td>
                                    </tr>
                                }) }
                            </tbody>
                        </table>
                        <div class="pager">
                            <button type="button" class="btn btn-sm" disabled={!found.has_previous()} onclick={step(-1)}>
                                { t("ui.previous") }
                            </button>
                            <span>{ format!("{} / {}", found.current_page + 1, found.total_pages.max(1)) }</span>
                            <button type="button" class="btn btn-sm" disabled={!found.has_next()} onclick={step(1)}>
                                { t("ui.next") }
                            </button>
                        </div>
                    </>
                },
            } }
        </main>
    }
}
