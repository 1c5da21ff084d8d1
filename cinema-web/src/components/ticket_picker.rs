use crate::i18n::t;
use cinema_core::checkout::{TicketCounts, TicketKind};
use cinema_core::hold::MAX_SELECTED_SEATS;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub counts: TicketCounts,
    pub on_change: Callback<TicketCounts>,
}

/// Ticket cap, one per selectable seat.
#[must_use]
pub fn max_tickets() -> u32 {
    u32::try_from(MAX_SELECTED_SEATS).unwrap_or(u32::MAX)
}

#[function_component(TicketPicker)]
pub fn ticket_picker(props: &Props) -> Html {
    let step = |kind: TicketKind, delta: i32| {
        let counts = props.counts;
        let cb = props.on_change.clone();
        Callback::from(move |_| {
            let mut next = counts;
            let current = next.get(kind);
            let target = if delta < 0 {
                current.saturating_sub(1)
            } else {
                current.saturating_add(1)
            };
            next.set(kind, target, max_tickets());
            cb.emit(next);
        })
    };
    html! {
        <fieldset class="ticket-picker">
            <legend>{ t("tickets.title") }</legend>
            { for TicketKind::ALL.iter().map(|&kind| html! {
                <div class="ticket-row">
                    <span class="ticket-kind">{ t(kind.i18n_key()) }</span>
                    <button type="button" class="btn btn-sm" aria-label={t("tickets.less")} onclick={step(kind, -1)}>{ "−" }</button>
                    <output class="ticket-count">{ props.counts.get(kind).to_string() }</output>
                    <button type="button" class="btn btn-sm" aria-label={t("tickets.more")} onclick={step(kind, 1)}>{ "+" }</button>
                </div>
            }) }
        </fieldset>
    }
}
