//! `/admin/halls/layout`: edit a hall's seat configuration with a live
//! preview, then store it and regenerate the hall's seats.

use super::{EmptyState, Loading, bind_input, bind_select};
use crate::api;
use crate::components::LayoutPreview;
use crate::components::toast::{Toaster, use_toaster};
use crate::i18n::t;
use cinema_core::api::endpoints;
use cinema_core::layout::{LayoutConfig, LayoutError, LayoutSpec};
use cinema_core::models::{Cinema, CinemaHall};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Editor text fields, kept as typed so a half-entered value still shows.
#[derive(Clone)]
struct Fields {
    rows: UseStateHandle<String>,
    seats_per_row: UseStateHandle<String>,
    vip_rows: UseStateHandle<String>,
    couple_rows: UseStateHandle<String>,
    wheelchair_rows: UseStateHandle<String>,
    seat_overrides: UseStateHandle<String>,
    row_aisles: UseStateHandle<String>,
    column_aisles: UseStateHandle<String>,
}

impl Fields {
    fn spec(&self) -> LayoutSpec {
        LayoutSpec {
            rows: self.rows.trim().parse().unwrap_or(0),
            seats_per_row: self.seats_per_row.trim().parse().unwrap_or(0),
            vip_rows: (*self.vip_rows).clone(),
            couple_rows: (*self.couple_rows).clone(),
            wheelchair_rows: (*self.wheelchair_rows).clone(),
            seat_overrides: (*self.seat_overrides).clone(),
            row_aisles: (*self.row_aisles).clone(),
            column_aisles: (*self.column_aisles).clone(),
        }
    }

    fn fill(&self, spec: &LayoutSpec) {
        self.rows.set(spec.rows.to_string());
        self.seats_per_row.set(spec.seats_per_row.to_string());
        self.vip_rows.set(spec.vip_rows.clone());
        self.couple_rows.set(spec.couple_rows.clone());
        self.wheelchair_rows.set(spec.wheelchair_rows.clone());
        self.seat_overrides.set(spec.seat_overrides.clone());
        self.row_aisles.set(spec.row_aisles.clone());
        self.column_aisles.set(spec.column_aisles.clone());
    }
}

#[hook]
fn use_fields() -> Fields {
    let spec = LayoutSpec::default();
    Fields {
        rows: use_state(|| spec.rows.to_string()),
        seats_per_row: use_state(|| spec.seats_per_row.to_string()),
        vip_rows: use_state(String::new),
        couple_rows: use_state(String::new),
        wheelchair_rows: use_state(String::new),
        seat_overrides: use_state(String::new),
        row_aisles: use_state(String::new),
        column_aisles: use_state(String::new),
    }
}

fn editor_spec(hall: &CinemaHall) -> LayoutSpec {
    let fallback = LayoutSpec::default();
    LayoutSpec::from_seat_layout(
        hall.rows_count.unwrap_or(fallback.rows),
        hall.seats_per_row.unwrap_or(fallback.seats_per_row),
        hall.seat_layout.as_ref(),
    )
}

/// The hall as it should be stored for `config`.
fn updated_hall(hall: &CinemaHall, config: &LayoutConfig) -> CinemaHall {
    let grid = config.generate();
    CinemaHall {
        rows_count: Some(config.rows),
        seats_per_row: Some(config.seats_per_row),
        total_seats: u32::try_from(grid.total_seats()).ok(),
        seat_layout: Some(config.to_seat_layout()),
        ..hall.clone()
    }
}

#[allow(clippy::future_not_send)]
async fn save(hall: CinemaHall, toaster: Toaster) -> bool {
    let hall_id = hall.hall_id;
    if let Err(err) = api::send::<_, CinemaHall>(endpoints::admin_update_hall(hall_id), Some(&hall)).await {
        log::error!("updating hall {hall_id}: {err}");
        toaster.error(err.user_message(&t("layout.save_failed")));
        return false;
    }
    match api::fire(endpoints::admin_regenerate_seats(hall_id)).await {
        Ok(()) => {
            log::info!("hall {hall_id} layout stored, seats regenerated");
            toaster.success(t("layout.saved"));
            true
        }
        Err(err) => {
            log::error!("regenerating seats for hall {hall_id}: {err}");
            toaster.error(err.user_message(&t("layout.regenerate_failed")));
            false
        }
    }
}

#[function_component(HallLayoutPage)]
pub fn hall_layout_page() -> Html {
    let toaster = use_toaster();
    let cinemas = use_state(|| None::<Vec<Cinema>>);
    let cinema = use_state(String::new);
    let halls = use_state(Vec::<CinemaHall>::new);
    let hall = use_state(String::new);
    let saving = use_state(|| false);
    let fields = use_fields();

    {
        let cinemas = cinemas.clone();
        let toaster = toaster.clone();
        use_effect_with((), move |()| {
            spawn_local(async move {
                match api::get::<Vec<Cinema>>(endpoints::admin_cinemas()).await {
                    Ok(list) => cinemas.set(Some(list)),
                    Err(err) => {
                        log::error!("admin cinemas: {err}");
                        toaster.error(err.user_message(&t("layout.cinemas_failed")));
                        cinemas.set(Some(Vec::new()));
                    }
                }
            });
            || {}
        });
    }

    {
        let halls = halls.clone();
        let hall = hall.clone();
        use_effect_with((*cinema).clone(), move |cinema| {
            halls.set(Vec::new());
            hall.set(String::new());
            if let Ok(cinema_id) = cinema.parse::<i64>() {
                spawn_local(async move {
                    match api::get::<Vec<CinemaHall>>(endpoints::halls_by_cinema(cinema_id)).await {
                        Ok(list) => halls.set(list),
                        Err(err) => log::warn!("halls for cinema {cinema_id}: {err}"),
                    }
                });
            }
            || {}
        });
    }

    let current = hall
        .parse::<i64>()
        .ok()
        .and_then(|id| halls.iter().find(|h| h.hall_id == id).cloned());

    {
        let fields = fields.clone();
        use_effect_with(current.clone(), move |current| {
            fields.fill(&current.as_ref().map_or_else(LayoutSpec::default, editor_spec));
            || {}
        });
    }

    let parsed: Result<LayoutConfig, LayoutError> = fields.spec().parse();

    let on_save = {
        let parsed = parsed.clone();
        let current = current.clone();
        let saving = saving.clone();
        let halls = halls.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let (Some(hall), Ok(config)) = (current.as_ref(), parsed.as_ref()) else {
                return;
            };
            let stored = updated_hall(hall, config);
            saving.set(true);
            let saving = saving.clone();
            let halls = halls.clone();
            let toaster = toaster.clone();
            spawn_local(async move {
                if save(stored.clone(), toaster).await {
                    let next = halls
                        .iter()
                        .map(|h| if h.hall_id == stored.hall_id { stored.clone() } else { h.clone() })
                        .collect();
                    halls.set(next);
                }
                saving.set(false);
            });
        })
    };

    let text_field = |label: &'static str, hint: &'static str, state: &UseStateHandle<String>| {
        html! {
            <label class="form-control">
                <span class="label-text">{ t(label) }</span>
                <input type="text" placeholder={t(hint)} value={(**state).clone()} oninput={bind_input(state)} />
            </label>
        }
    };

    html! {
        <main id="main" class="page layout-page">
            <h1>{ t("layout.title") }</h1>
            { match cinemas.as_ref() {
                None => html! { <Loading /> },
                Some(list) if list.is_empty() => html! { <EmptyState message={t("layout.no_cinemas")} /> },
                Some(list) => html! {
                    <div class="layout-pickers">
                        <select class="select" aria-label={t("layout.pick_cinema")} onchange={bind_select(&cinema)}>
                            <option value="" selected={cinema.is_empty()}>{ t("layout.pick_cinema") }</option>
                            { for list.iter().map(|c| html! {
                                <option value={c.cinema_id.to_string()}>{ c.cinema_name.clone() }</option>
                            }) }
                        </select>
                        <select class="select" aria-label={t("layout.pick_hall")} onchange={bind_select(&hall)} disabled={halls.is_empty()}>
                            <option value="" selected={hall.is_empty()}>{ t("layout.pick_hall") }</option>
                            { for halls.iter().map(|h| html! {
                                <option value={h.hall_id.to_string()}>{ h.hall_name.clone() }</option>
                            }) }
                        </select>
                    </div>
                },
            } }
            <div class="layout-editor">
                <form class="layout-form" onsubmit={on_save}>
                    <label class="form-control">
                        <span class="label-text">{ t("layout.rows") }</span>
                        <input type="number" min="1" max="26" value={(*fields.rows).clone()} oninput={bind_input(&fields.rows)} />
                    </label>
                    <label class="form-control">
                        <span class="label-text">{ t("layout.seats_per_row") }</span>
                        <input type="number" min="1" max="50" value={(*fields.seats_per_row).clone()} oninput={bind_input(&fields.seats_per_row)} />
                    </label>
                    { text_field("layout.vip_rows", "layout.rows_hint", &fields.vip_rows) }
                    { text_field("layout.couple_rows", "layout.rows_hint", &fields.couple_rows) }
                    { text_field("layout.wheelchair_rows", "layout.rows_hint", &fields.wheelchair_rows) }
                    { text_field("layout.seat_overrides", "layout.overrides_hint", &fields.seat_overrides) }
                    { text_field("layout.row_aisles", "layout.row_aisles_hint", &fields.row_aisles) }
                    { text_field("layout.column_aisles", "layout.column_aisles_hint", &fields.column_aisles) }
                    if let Err(err) = &parsed {
                        <p class="alert alert-error" role="alert" data-testid="layout-error">{ err.to_string() }</p>
                    }
                    <button
                        type="submit"
                        class="btn btn-primary"
                        disabled={current.is_none() || parsed.is_err() || *saving}
                    >
                        { if *saving { t("layout.saving") } else { t("layout.save") } }
                    </button>
                    <p class="muted">{ t("layout.save_hint") }</p>
                </form>
                if let Ok(config) = &parsed {
                    <LayoutPreview grid={config.generate()} />
                }
            </div>
        </main>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hall() -> CinemaHall {
        serde_json::from_value(serde_json::json!({
            "hallId": 3,
            "cinemaId": 1,
            "hallName": "Hall 3",
            "rowsCount": 8,
            "seatsPerRow": 10,
            "seatLayout": {"VIP_Rows": ["C", "D"]}
        }))
        .expect("hall fixture")
    }

    #[test]
    fn editor_starts_from_the_stored_layout() {
        let spec = editor_spec(&hall());
        assert_eq!(spec.rows, 8);
        assert_eq!(spec.seats_per_row, 10);
        assert_eq!(spec.vip_rows, "C,D");
    }

    #[test]
    fn saved_hall_carries_dimensions_and_seat_count() {
        let config = LayoutSpec {
            rows: 5,
            seats_per_row: 6,
            ..LayoutSpec::default()
        }
        .parse()
        .expect("valid layout");
        let stored = updated_hall(&hall(), &config);
        assert_eq!(stored.hall_id, 3);
        assert_eq!(stored.rows_count, Some(5));
        assert_eq!(stored.seats_per_row, Some(6));
        assert_eq!(stored.total_seats, Some(30));
        assert!(stored.seat_layout.is_some());
    }
}
