pub mod admin_dashboard;
pub mod booking;
pub mod checkout;
pub mod counter_booking;
pub mod hall_layout;
pub mod home;
pub mod live_hold;
pub mod login;
pub mod loyalty;
pub mod my_bookings;
pub mod not_found;
pub mod seats;
pub mod staff_dashboard;

use cinema_core::hold::SessionId;
use cinema_core::layout::{LayoutConfig, LayoutSpec};
use cinema_core::models::CinemaHall;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use yew::prelude::*;

/// Fresh hold token for today.
pub(crate) fn mint_session() -> SessionId {
    let mut rng = ChaCha8Rng::seed_from_u64(crate::dom::entropy_seed());
    SessionId::generate(crate::dom::today(), &mut rng)
}

/// Layout of a hall as configured, or the default hall when it has none or
/// its stored layout does not validate.
pub(crate) fn hall_config(hall: Option<&CinemaHall>) -> Option<LayoutConfig> {
    let fallback = LayoutSpec::default();
    let spec = hall.map_or_else(LayoutSpec::default, |h| {
        LayoutSpec::from_seat_layout(
            h.rows_count.unwrap_or(fallback.rows),
            h.seats_per_row.unwrap_or(fallback.seats_per_row),
            h.seat_layout.as_ref(),
        )
    });
    spec.parse()
        .or_else(|err| {
            log::warn!("stored hall layout rejected, using default: {err}");
            fallback.parse()
        })
        .ok()
}

/// Row letters and seat numbers followed by a walkway.
pub(crate) fn aisles(config: Option<&LayoutConfig>) -> (Vec<String>, Vec<u32>) {
    config.map_or_else(Default::default, |c| {
        (
            c.row_aisles.iter().map(char::to_string).collect(),
            c.column_aisles.iter().copied().collect(),
        )
    })
}

/// The hall a showtime plays in, looked up through its cinema.
#[allow(clippy::future_not_send)]
pub(crate) async fn load_hall(cinema_id: i64, hall_id: i64) -> Option<CinemaHall> {
    match crate::api::get::<Vec<CinemaHall>>(cinema_core::api::endpoints::halls_by_cinema(cinema_id)).await {
        Ok(halls) => halls.into_iter().find(|h| h.hall_id == hall_id),
        Err(err) => {
            log::warn!("halls for cinema {cinema_id}: {err}");
            None
        }
    }
}

/// Callback writing an `<input>`'s value into a state handle.
pub(crate) fn bind_input(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |e: InputEvent| {
        if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
            state.set(input.value());
        }
    })
}

/// Callback writing a `<select>`'s value into a state handle.
pub(crate) fn bind_select(state: &UseStateHandle<String>) -> Callback<Event> {
    let state = state.clone();
    Callback::from(move |e: Event| {
        if let Some(select) = e.target_dyn_into::<web_sys::HtmlSelectElement>() {
            state.set(select.value());
        }
    })
}

#[derive(Properties, PartialEq)]
pub struct EmptyStateProps {
    pub message: AttrValue,
    #[prop_or_default]
    pub children: Children,
}

#[function_component(EmptyState)]
pub fn empty_state(props: &EmptyStateProps) -> Html {
    html! {
        <section class="panel empty-state" role="status">
            <p>{ props.message.clone() }</p>
            { for props.children.iter() }
        </section>
    }
}

#[function_component(Loading)]
pub fn loading() -> Html {
    html! {
        <section class="panel loading" aria-busy="true">
            <span class="loading loading-spinner"></span>
            <span class="sr-only">{ crate::i18n::t("ui.loading") }</span>
        </section>
    }
}
