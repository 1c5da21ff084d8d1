//! `/staff/dashboard`: booking lookup for the box office.

use super::my_bookings::BookingTable;
use super::{EmptyState, Loading, bind_input};
use crate::api;
use crate::components::toast::use_toaster;
use crate::i18n::t;
use crate::router::Route;
use cinema_core::api::{Page, endpoints};
use cinema_core::models::Booking;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

const PAGE_SIZE: u32 = 20;

#[function_component(StaffDashboardPage)]
pub fn staff_dashboard_page() -> Html {
    let toaster = use_toaster();
    let draft = use_state(String::new);
    let query = use_state(|| (0_u32, String::new()));
    let page = use_state(|| None::<Page<Booking>>);

    {
        let page = page.clone();
        use_effect_with((*query).clone(), move |(page_no, search)| {
            let (page_no, search) = (*page_no, search.clone());
            page.set(None);
            spawn_local(async move {
                let call = endpoints::admin_bookings(page_no, PAGE_SIZE, Some(search.as_str()));
                match api::get::<Page<Booking>>(call).await {
                    Ok(found) => page.set(Some(found)),
                    Err(err) => {
                        log::error!("staff bookings page {page_no} `{search}`: {err}");
                        toaster.error(err.user_message(&t("staff.bookings_failed")));
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

    let on_search = {
        let draft = draft.clone();
        let query = query.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            query.set((0, draft.trim().to_string()));
        })
    };

    let step = |delta: i64| {
        let query = query.clone();
        Callback::from(move |_: MouseEvent| {
            let (page_no, search) = (*query).clone();
            if let Ok(next) = u32::try_from(i64::from(page_no) + delta) {
                query.set((next, search));
            }
        })
    };

    html! {
        <main id="main" class="page staff-page">
            <h1>{ t("staff.title") }</h1>
            <nav class="admin-shortcuts">
                <Link<Route> to={Route::CounterBooking} classes="btn btn-primary">{ t("nav.counter") }</Link<Route>>
            </nav>
            <form class="search-form" onsubmit={on_search}>
                <input
                    type="search"
                    placeholder={t("staff.search_hint")}
                    aria-label={t("staff.search")}
                    value={(*draft).clone()}
                    oninput={bind_input(&draft)}
                />
                <button type="submit" class="btn">{ t("staff.search") }</button>
            </form>
            { match page.as_ref() {
                None => html! { <Loading /> },
                Some(found) if found.data.is_empty() => html! { <EmptyState message={t("staff.no_bookings")} /> },
                Some(found) => html! {
                    <>
                        <p class="muted">{ format!("{} {}", found.total_elements, t("staff.results")) }</p>
                        <BookingTable bookings={found.data.clone()} />
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
