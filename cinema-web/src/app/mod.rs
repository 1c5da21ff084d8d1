use crate::app::session::{SessionProvider, use_session};
use crate::app::state::DraftProvider;
use crate::components::toast::{ToastHost, use_toaster};
use crate::components::{Header, ProtectedRoute};
use crate::i18n::{current_lang, t};
use crate::pages::admin_dashboard::AdminDashboardPage;
use crate::pages::booking::BookingPage;
use crate::pages::checkout::CheckoutPage;
use crate::pages::counter_booking::CounterBookingPage;
use crate::pages::hall_layout::HallLayoutPage;
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::pages::loyalty::LoyaltyPage;
use crate::pages::my_bookings::MyBookingsPage;
use crate::pages::not_found::NotFound;
use crate::pages::seats::SeatsPage;
use crate::pages::staff_dashboard::StaffDashboardPage;
use crate::router::Route;
use yew::prelude::*;
use yew_router::prelude::*;

pub mod session;
pub mod state;

#[cfg(target_arch = "wasm32")]
#[function_component(App)]
pub fn app() -> Html {
    let router_base = crate::paths::router_base().map(AttrValue::from);
    html! {
        <BrowserRouter basename={router_base}>
            <AppShell />
        </BrowserRouter>
    }
}

/// Providers and chrome around the routed page. Needs a router above it.
#[function_component(AppShell)]
pub fn app_shell() -> Html {
    html! {
        <ToastHost>
            <SessionProvider>
                <DraftProvider>
                    <Chrome />
                </DraftProvider>
            </SessionProvider>
        </ToastHost>
    }
}

#[function_component(Chrome)]
fn chrome() -> Html {
    let lang = use_state(current_lang);
    let session = use_session();
    let toaster = use_toaster();
    let navigator = use_navigator();

    {
        let session = session.clone();
        use_effect_with((), move |()| {
            crate::api::set_unauthorized_handler(move || {
                session.sign_out();
                toaster.warning(t("auth.session_expired"));
                if let Some(nav) = navigator.as_ref() {
                    nav.push(&Route::Login);
                }
            });
            || {}
        });
    }

    let on_lang_change = {
        let lang = lang.clone();
        Callback::from(move |next: String| lang.set(next))
    };

    html! {
        <>
            <Header current_lang={AttrValue::from((*lang).clone())} {on_lang_change} />
            // Keyed on the language so every page re-renders its strings.
            <div key={(*lang).clone()} class="app-content">
                <Switch<Route> render={switch} />
            </div>
        </>
    }
}

fn guarded(route: &Route, page: Html) -> Html {
    match route.allowed_roles() {
        None => page,
        Some(roles) => html! {
            <ProtectedRoute allowed={roles.to_vec()}>{ page }</ProtectedRoute>
        },
    }
}

/// Page for a route, wrapped in the access check it needs.
#[must_use]
pub fn switch(route: Route) -> Html {
    use crate::router::Route as R;
    let page = match &route {
        R::Home => html! { <HomePage /> },
        R::Booking => html! { <BookingPage /> },
        R::Seats { showtime_id } => html! { <SeatsPage showtime_id={*showtime_id} /> },
        R::Checkout => html! { <CheckoutPage /> },
        R::MyBookings => html! { <MyBookingsPage /> },
        R::Login => html! { <LoginPage /> },
        R::Loyalty => html! { <LoyaltyPage /> },
        R::StaffDashboard => html! { <StaffDashboardPage /> },
        R::AdminDashboard => html! { <AdminDashboardPage /> },
        R::CounterBooking => html! { <CounterBookingPage /> },
        R::HallLayout => html! { <HallLayoutPage /> },
        R::NotFound => html! { <NotFound /> },
    };
    guarded(&route, page)
}
