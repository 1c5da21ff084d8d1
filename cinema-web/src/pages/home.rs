//! Landing page: what is showing, plus a chain → cinema → showtime picker.

use super::{EmptyState, Loading, bind_select};
use crate::api;
use crate::components::toast::use_toaster;
use crate::i18n::{fmt_currency, fmt_show_date, t};
use crate::router::Route;
use cinema_core::api::endpoints;
use cinema_core::catalog::BookingQuery;
use cinema_core::models::{Cinema, CinemaChain, Movie, Showtime};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(HomePage)]
pub fn home_page() -> Html {
    let toaster = use_toaster();
    let movies = use_state(|| None::<Vec<Movie>>);
    let chains = use_state(Vec::<CinemaChain>::new);

    {
        let movies = movies.clone();
        let chains = chains.clone();
        let toaster = toaster.clone();
        use_effect_with((), move |()| {
            spawn_local(async move {
                match api::get::<Vec<Movie>>(endpoints::movies()).await {
                    Ok(list) => movies.set(Some(list)),
                    Err(err) => {
                        log::error!("loading movies failed: {err}");
                        toaster.error(err.user_message(&t("home.movies_failed")));
                        movies.set(Some(Vec::new()));
                    }
                }
                match api::get::<Vec<CinemaChain>>(endpoints::chains()).await {
                    Ok(list) => chains.set(list),
                    Err(err) => log::warn!("loading chains failed: {err}"),
                }
            });
            || {}
        });
    }

    html! {
        <main id="main" class="page home-page">
            <QuickBooking chains={(*chains).clone()} movies={(*movies).clone().unwrap_or_default()} />
            <section class="now-showing">
                <h2>{ t("home.now_showing") }</h2>
                { match movies.as_ref() {
                    None => html! { <Loading /> },
                    Some(list) if list.is_empty() => html! { <EmptyState message={t("home.no_movies")} /> },
                    Some(list) => html! {
                        <ul class="movie-grid">
                            { for list.iter().map(movie_card) }
                        </ul>
                    },
                } }
            </section>
        </main>
    }
}

fn movie_card(movie: &Movie) -> Html {
    html! {
        <li key={movie.movie_id} class="movie-card">
            if let Some(poster) = movie.poster_url.clone() {
                <img src={poster} alt={movie.title.clone()} loading="lazy" />
            }
            <h3>{ movie.title.clone() }</h3>
            <p class="movie-meta">
                if let Some(rating) = movie.age_rating.clone() {
                    <span class="badge">{ rating }</span>
                }
                if let Some(minutes) = movie.duration {
                    <span>{ format!("{minutes} {}", t("home.minutes")) }</span>
                }
            </p>
        </li>
    }
}

#[derive(Properties, PartialEq)]
pub struct QuickBookingProps {
    pub chains: Vec<CinemaChain>,
    pub movies: Vec<Movie>,
}

#[function_component(QuickBooking)]
pub fn quick_booking(props: &QuickBookingProps) -> Html {
    let navigator = use_navigator();
    let chain = use_state(String::new);
    let cinema = use_state(String::new);
    let movie = use_state(String::new);
    let cinemas = use_state(Vec::<Cinema>::new);
    let showtimes = use_state(Vec::<Showtime>::new);

    {
        let cinemas = cinemas.clone();
        let cinema = cinema.clone();
        use_effect_with((*chain).clone(), move |chain| {
            cinemas.set(Vec::new());
            cinema.set(String::new());
            if let Ok(chain_id) = chain.parse::<i64>() {
                spawn_local(async move {
                    match api::get::<Vec<Cinema>>(endpoints::cinemas_by_chain(chain_id)).await {
                        Ok(list) => cinemas.set(list),
                        Err(err) => log::warn!("cinemas for chain {chain_id}: {err}"),
                    }
                });
            }
            || {}
        });
    }

    {
        let showtimes = showtimes.clone();
        use_effect_with((*cinema).clone(), move |cinema| {
            showtimes.set(Vec::new());
            if let Ok(cinema_id) = cinema.parse::<i64>() {
                spawn_local(async move {
                    match api::get::<Vec<Showtime>>(endpoints::showtimes_by_cinema(cinema_id)).await {
                        Ok(list) => showtimes.set(list),
                        Err(err) => log::warn!("showtimes for cinema {cinema_id}: {err}"),
                    }
                });
            }
            || {}
        });
    }

    let movie_id = movie.parse::<i64>().ok();
    let matching: Vec<&Showtime> = showtimes
        .iter()
        .filter(|s| s.status.is_bookable() && movie_id.is_none_or(|id| s.movie_id == id))
        .collect();

    let open = |query: BookingQuery| {
        let navigator = navigator.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(nav) = navigator.as_ref()
                && let Err(err) = nav.push_with_query(&Route::Booking, &query.query_pairs())
            {
                log::error!("navigating to booking failed: {err}");
            }
        })
    };

    html! {
        <section class="quick-booking panel" aria-label={t("home.quick_booking")}>
            <h2>{ t("home.quick_booking") }</h2>
            <div class="quick-booking-fields">
                <select aria-label={t("home.pick_chain")} onchange={bind_select(&chain)}>
                    <option value="" selected={chain.is_empty()}>{ t("home.pick_chain") }</option>
                    { for props.chains.iter().map(|c| html! {
                        <option value={c.chain_id.to_string()}>{ c.chain_name.clone() }</option>
                    }) }
                </select>
                <select aria-label={t("home.pick_cinema")} onchange={bind_select(&cinema)} disabled={cinemas.is_empty()}>
                    <option value="" selected={cinema.is_empty()}>{ t("home.pick_cinema") }</option>
                    { for cinemas.iter().map(|c| html! {
                        <option value={c.cinema_id.to_string()}>{ c.cinema_name.clone() }</option>
                    }) }
                </select>
                <select aria-label={t("home.pick_movie")} onchange={bind_select(&movie)}>
                    <option value="">{ t("home.any_movie") }</option>
                    { for props.movies.iter().map(|m| html! {
                        <option value={m.movie_id.to_string()}>{ m.title.clone() }</option>
                    }) }
                </select>
            </div>
            if !cinema.is_empty() && matching.is_empty() {
                <p class="muted">{ t("home.no_showtimes") }</p>
            }
            <ul class="showtime-list">
                { for matching.iter().filter_map(|s| {
                    let query = BookingQuery::for_showtime(s)?;
                    Some(html! {
                        <li key={s.showtime_id}>
                            <button type="button" class="btn btn-outline btn-sm" onclick={open(query)}>
                                <strong>{ s.start_hhmm().to_string() }</strong>
                                <span>{ fmt_show_date(&s.show_date) }</span>
                                <span>{ s.movie_name.clone() }</span>
                                <span>{ fmt_currency(s.price) }</span>
                            </button>
                        </li>
                    })
                }) }
            </ul>
        </section>
    }
}
