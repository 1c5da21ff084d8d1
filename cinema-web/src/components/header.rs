use crate::app::session::use_session;
use crate::i18n::{fmt_grouped, locales, set_lang, t};
use crate::router::Route;
use cinema_core::access::{highest_role, is_admin, is_staff_member};
use wasm_bindgen::JsCast;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct Props {
    pub current_lang: AttrValue,
    pub on_lang_change: Callback<String>,
}

#[function_component(Header)]
pub fn header(p: &Props) -> Html {
    let session = use_session();
    let navigator = use_navigator();

    let on_change = {
        let cb = p.on_lang_change.clone();
        Callback::from(move |e: web_sys::Event| {
            if let Some(sel) = e
                .target()
                .and_then(|t| t.dyn_into::<web_sys::HtmlSelectElement>().ok())
            {
                set_lang(&sel.value());
                cb.emit(sel.value());
            }
        })
    };

    let on_logout = {
        let session = session.clone();
        Callback::from(move |_| {
            session.sign_out();
            if let Some(nav) = navigator.as_ref() {
                nav.push(&Route::Login);
            }
        })
    };

    let account = session.user.as_ref().map_or_else(
        || {
            html! {
                <Link<Route> to={Route::Login} classes="btn btn-primary btn-sm">{ t("nav.login") }</Link<Route>>
            }
        },
        |user| {
            let role = highest_role(&user.roles).map(|r| t(r.i18n_key()));
            html! {
                <div class="account">
                    <span class="account-name">{ user.full_name.clone() }</span>
                    if let Some(role) = role {
                        <span class="badge">{ role }</span>
                    }
                    if let Some(points) = user.available_points {
                        <Link<Route> to={Route::Loyalty} classes="account-points">
                            <span data-testid="header-points">{ format!("{} {}", fmt_grouped(points), t("nav.points")) }</span>
                        </Link<Route>>
                    }
                    <button type="button" class="btn btn-ghost btn-sm" onclick={on_logout}>{ t("nav.logout") }</button>
                </div>
            }
        },
    );

    let staff = session.user.as_ref().is_some_and(is_staff_member);
    let admin = session.user.as_ref().is_some_and(is_admin);

    html! {
        <header role="banner" class="site-header">
            <a href="#main" class="sr-only">{ t("ui.skip_to_content") }</a>
            <div class="header-content">
                <Link<Route> to={Route::Home} classes="brand">{ t("app.brand") }</Link<Route>>
                <nav aria-label={t("nav.main")} class="header-nav">
                    <Link<Route> to={Route::Home}>{ t("nav.movies") }</Link<Route>>
                    if session.user.is_some() {
                        <Link<Route> to={Route::MyBookings}>{ t("nav.my_bookings") }</Link<Route>>
                        <Link<Route> to={Route::Loyalty}>{ t("nav.loyalty") }</Link<Route>>
                    }
                    if staff {
                        <Link<Route> to={Route::StaffDashboard}>{ t("nav.staff") }</Link<Route>>
                        <Link<Route> to={Route::CounterBooking}>{ t("nav.counter") }</Link<Route>>
                    }
                    if admin {
                        <Link<Route> to={Route::AdminDashboard}>{ t("nav.admin") }</Link<Route>>
                        <Link<Route> to={Route::HallLayout}>{ t("nav.layout") }</Link<Route>>
                    }
                </nav>
                <div class="header-right">
                    <label for="lang-select" class="sr-only">{ t("nav.language") }</label>
                    <select id="lang-select" onchange={on_change} aria-label={t("nav.language")}>
                        { for locales().iter().map(|meta| html! {
                            <option value={meta.code} selected={p.current_lang == meta.code}>{ meta.name }</option>
                        }) }
                    </select>
                    { account }
                </div>
            </div>
        </header>
    }
}
