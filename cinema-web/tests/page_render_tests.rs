use cinema_core::models::{LoyaltyBalance, PointsTransaction, Role, User};
use cinema_core::session::SessionHub;
use cinema_web::app::AppShell;
use cinema_web::app::session::SessionContext;
use cinema_web::components::{CheckoutGate, Header, ProtectedRoute};
use cinema_web::pages::loyalty::{LoyaltyPage, PointsCard, PointsHistory};
use cinema_web::pages::not_found::NotFound;
use futures::executor::block_on;
use std::collections::BTreeMap;
use yew::prelude::*;
use yew::LocalServerRenderer;
use yew_router::history::{AnyHistory, History, MemoryHistory};
use yew_router::Router;

#[derive(Properties, PartialEq)]
struct ShellProps {
    history: AnyHistory,
}

#[function_component(Shell)]
fn shell(props: &ShellProps) -> Html {
    html! {
        <Router history={props.history.clone()}>
            <AppShell />
        </Router>
    }
}

#[derive(Properties, PartialEq)]
struct RoutedProps {
    history: AnyHistory,
    #[prop_or_default]
    children: Children,
}

#[function_component(Routed)]
fn routed(props: &RoutedProps) -> Html {
    html! {
        <Router history={props.history.clone()}>
            { for props.children.iter() }
        </Router>
    }
}

#[derive(Properties, PartialEq)]
struct SignedInProps {
    history: AnyHistory,
    user: User,
    #[prop_or_default]
    children: Children,
}

#[function_component(SignedIn)]
fn signed_in(props: &SignedInProps) -> Html {
    let context = SessionContext {
        user: Some(props.user.clone()),
        hub: SessionHub::new(),
    };
    html! {
        <Router history={props.history.clone()}>
            <ContextProvider<SessionContext> {context}>
                { for props.children.iter() }
            </ContextProvider<SessionContext>>
        </Router>
    }
}

fn user_with(roles: Vec<Role>, points: Option<i64>) -> User {
    User {
        user_id: 7,
        full_name: "Lan Pham".to_string(),
        email: "lan@example.com".to_string(),
        phone: None,
        roles,
        membership_tier: None,
        available_points: points,
    }
}

fn render_signed_in(user: User, path: &str, page: Html) -> String {
    cinema_web::i18n::set_lang("en");
    block_on(
        LocalServerRenderer::<SignedIn>::with_props(SignedInProps {
            history: history_at(path),
            user,
            children: Children::new(vec![page]),
        })
        .render(),
    )
}

fn manager_only() -> Html {
    html! {
        <ProtectedRoute allowed={vec![Role::CinemaManager]}>
            <p class="manager-panel">{ "Manager tools" }</p>
        </ProtectedRoute>
    }
}

fn render_gate(selected: usize, tickets: u32, held: bool) -> String {
    cinema_web::i18n::set_lang("en");
    let props = cinema_web::components::checkout_gate::Props {
        selected,
        tickets,
        held,
        seat_estimate: None,
        label: AttrValue::from("Go to checkout"),
        on_continue: Callback::noop(),
    };
    block_on(LocalServerRenderer::<CheckoutGate>::with_props(props).render())
}

fn history_at(path: &str) -> AnyHistory {
    let history = AnyHistory::from(MemoryHistory::new());
    history.push(path);
    history
}

fn render_path(path: &str) -> String {
    cinema_web::i18n::set_lang("en");
    block_on(LocalServerRenderer::<Shell>::with_props(ShellProps { history: history_at(path) }).render())
}

#[test]
fn home_renders_picker_and_movie_list() {
    let html = render_path("/");
    assert!(html.contains("Quick booking"), "{html}");
    assert!(html.contains("Now showing"));
    assert!(html.contains("aria-busy=\"true\""));
}

#[test]
fn booking_without_query_explains_the_link_is_incomplete() {
    let html = render_path("/booking");
    assert!(html.contains("That booking link is incomplete."), "{html}");
}

#[test]
fn booking_with_full_query_starts_loading() {
    cinema_web::i18n::set_lang("en");
    let history = AnyHistory::from(MemoryHistory::new());
    let query: BTreeMap<&str, &str> = [
        ("cinema", "1"),
        ("movie", "2"),
        ("date", "2030-01-15"),
        ("time", "19:30"),
    ]
    .into_iter()
    .collect();
    history
        .push_with_query("/booking", query)
        .expect("query serializes");
    let html = block_on(LocalServerRenderer::<Shell>::with_props(ShellProps { history }).render());
    assert!(!html.contains("That booking link is incomplete."), "{html}");
    assert!(html.contains("loading-spinner"));
}

#[test]
fn checkout_without_draft_sends_people_back() {
    let html = render_path("/booking/confirm");
    assert!(html.contains("There is nothing to check out"), "{html}");
    assert!(html.contains("Back to movies"));
}

#[test]
fn protected_pages_hold_until_access_is_known() {
    for path in ["/admin/dashboard", "/admin/halls/layout", "/staff/dashboard", "/bookings"] {
        let html = render_path(path);
        assert!(html.contains("Checking access…"), "{path}: {html}");
        assert!(!html.contains("showtime-table"));
    }
}

#[test]
fn login_page_renders_the_form() {
    let html = render_path("/login");
    assert!(html.contains("login-email"), "{html}");
    assert!(html.contains("type=\"password\""));
    assert!(html.contains("Sign in"));
}

#[test]
fn unknown_paths_fall_through_to_not_found() {
    let html = render_path("/definitely/not/here");
    assert!(html.contains("Page not found"), "{html}");
}

#[test]
fn not_found_links_home() {
    cinema_web::i18n::set_lang("en");
    let history = history_at("/404");
    let html = block_on(
        LocalServerRenderer::<Routed>::with_props(RoutedProps {
            history,
            children: Children::new(vec![html! { <NotFound /> }]),
        })
        .render(),
    );
    assert!(html.contains("The page you asked for does not exist."));
    assert!(html.contains("href=\"/\""));
}

#[test]
fn header_shows_sign_in_for_guests() {
    cinema_web::i18n::set_lang("en");
    let header = html! {
        <Header current_lang={AttrValue::from("en")} on_lang_change={Callback::noop()} />
    };
    let html = block_on(
        LocalServerRenderer::<Routed>::with_props(RoutedProps {
            history: history_at("/"),
            children: Children::new(vec![header]),
        })
        .render(),
    );
    assert!(html.contains("lang-select"), "{html}");
    assert!(html.contains("href=\"#main\""));
    assert!(!html.contains("My bookings"));
    assert!(!html.contains("Hall layout"));
}

#[test]
fn customers_are_sent_home_from_manager_pages() {
    let html = render_signed_in(user_with(vec![Role::Customer], None), "/admin/dashboard", manager_only());
    assert!(!html.contains("Manager tools"), "{html}");
    assert!(html.contains("Checking access…"));
    assert!(html.contains("data-redirect=\"/\""), "{html}");
}

#[test]
fn staff_are_sent_to_their_desk_from_manager_pages() {
    let html = render_signed_in(user_with(vec![Role::CinemaStaff], None), "/admin/dashboard", manager_only());
    assert!(!html.contains("Manager tools"));
    assert!(html.contains("data-redirect=\"/staff/dashboard\""), "{html}");
}

#[test]
fn managers_see_manager_pages() {
    let html = render_signed_in(user_with(vec![Role::CinemaManager], None), "/admin/dashboard", manager_only());
    assert!(html.contains("Manager tools"), "{html}");
    assert!(!html.contains("data-redirect"));
}

#[test]
fn continue_is_disabled_until_every_ticket_has_a_seat() {
    let short = render_gate(2, 3, true);
    assert!(short.contains("disabled"), "{short}");
    assert!(short.contains("data-testid=\"checkout-gate\""));

    let none = render_gate(0, 0, true);
    assert!(none.contains("disabled"), "{none}");

    let matched = render_gate(3, 3, true);
    assert!(!matched.contains("disabled"), "{matched}");
    assert!(!matched.contains("data-testid=\"checkout-gate\""));
    assert!(matched.contains("Go to checkout"));
}

#[test]
fn continue_waits_for_the_hold_on_live_maps() {
    let html = render_gate(2, 2, false);
    assert!(html.contains("disabled"), "{html}");
}

#[test]
fn loyalty_page_shows_the_cached_balance() {
    let html = render_signed_in(user_with(vec![Role::Customer], Some(1_250)), "/loyalty", html! { <LoyaltyPage /> });
    assert!(html.contains("My points"), "{html}");
    assert!(html.contains("1.250"));
    assert!(html.contains("Show history"));
    assert!(!html.contains("points-table"));
}

#[test]
fn points_card_lists_earned_and_redeemed() {
    cinema_web::i18n::set_lang("en");
    let props = cinema_web::pages::loyalty::CardProps {
        balance: LoyaltyBalance {
            available_points: 800,
            total_earned: 12_000,
            total_redeemed: 11_200,
        },
    };
    let html = block_on(LocalServerRenderer::<PointsCard>::with_props(props).render());
    assert!(html.contains("12.000 points"), "{html}");
    assert!(html.contains("11.200 points"));
}

#[test]
fn points_history_signs_amounts_and_handles_empty() {
    cinema_web::i18n::set_lang("en");
    let empty = cinema_web::pages::loyalty::HistoryProps { transactions: Vec::new() };
    let html = block_on(LocalServerRenderer::<PointsHistory>::with_props(empty).render());
    assert!(html.contains("No points activity yet."), "{html}");

    let transactions: Vec<PointsTransaction> = serde_json::from_value(serde_json::json!([
        {"transactionId": 1, "transactionType": "EARN", "pointsAmount": 230, "balanceAfter": 1230, "description": "Booking BK2024"},
        {"transactionId": 2, "transactionType": "REDEEM", "pointsAmount": -100, "balanceAfter": 1130}
    ]))
    .expect("transactions fixture");
    let props = cinema_web::pages::loyalty::HistoryProps { transactions };
    let html = block_on(LocalServerRenderer::<PointsHistory>::with_props(props).render());
    assert!(html.contains("+230"), "{html}");
    assert!(html.contains("-100"));
    assert!(html.contains("Redeemed"));
    assert!(html.contains("1.230"));
    assert!(html.contains("Booking BK2024"));
}

#[test]
fn header_links_members_to_their_points() {
    let header = html! {
        <Header current_lang={AttrValue::from("en")} on_lang_change={Callback::noop()} />
    };
    let html = render_signed_in(user_with(vec![Role::Customer], Some(40)), "/", header);
    assert!(html.contains("href=\"/loyalty\""), "{html}");
    assert!(html.contains("My bookings"));
    assert!(!html.contains("Hall layout"));
}
