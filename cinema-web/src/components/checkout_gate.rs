use crate::i18n::{fmt_currency, t};
use cinema_core::checkout::checkout_enabled;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub selected: usize,
    pub tickets: u32,
    /// Live maps also need the seats held before moving on.
    #[prop_or(true)]
    pub held: bool,
    /// Seat-type weighted hint; checkout still charges the flat price.
    #[prop_or_default]
    pub seat_estimate: Option<i64>,
    pub label: AttrValue,
    pub on_continue: Callback<MouseEvent>,
}

/// Continue button that stays disabled until every ticket has a seat.
#[function_component(CheckoutGate)]
pub fn checkout_gate(props: &Props) -> Html {
    let ready = props.held && checkout_enabled(props.selected, props.tickets);
    let estimate = props.seat_estimate.filter(|amount| *amount > 0);

    html! {
        <div class="checkout-gate">
            if let Some(amount) = estimate {
                <p class="muted seat-estimate">
                    { format!("{}: {}", t("price.seat_estimate"), fmt_currency(amount)) }
                </p>
            }
            if !ready {
                <p class="muted" data-testid="checkout-gate">{ t("booking.gate_hint") }</p>
            }
            <button
                type="button"
                class="btn btn-primary"
                data-testid="checkout-continue"
                disabled={!ready}
                onclick={props.on_continue.clone()}
            >
                { props.label.clone() }
            </button>
        </div>
    }
}
