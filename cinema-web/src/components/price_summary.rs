use crate::i18n::{fmt_currency, t, tr};
use cinema_core::pricing::CheckoutPreview;
use std::collections::BTreeMap;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub preview: CheckoutPreview,
    pub seats: usize,
}

/// Advisory price breakdown. The booking response carries the real total.
#[function_component(PriceSummary)]
pub fn price_summary(props: &Props) -> Html {
    let p = &props.preview;
    let line = |key: &str, amount: i64| {
        html! {
            <div class="price-line">
                <dt>{ t(key) }</dt>
                <dd>{ fmt_currency(amount) }</dd>
            </div>
        }
    };
    let seats = props.seats.to_string();
    let mut args = BTreeMap::new();
    args.insert("count", seats.as_str());
    html! {
        <section class="price-summary" aria-live="polite">
            <h3>{ t("price.title") }</h3>
            <dl>
                { line("price.tickets", p.tickets.subtotal) }
                { line("price.service_fee", p.tickets.service_fee) }
                { line("price.tax", p.tickets.tax) }
                if p.concessions > 0 {
                    { line("price.concessions", p.concessions) }
                }
                if p.points.discount > 0 {
                    { line("price.points_discount", -p.points.discount) }
                }
                <div class="price-line price-total">
                    <dt>{ t("price.total") }</dt>
                    <dd data-testid="price-total">{ fmt_currency(p.grand_total) }</dd>
                </div>
            </dl>
            <p class="price-note">
                { tr("price.note", Some(&args)) }
            </p>
        </section>
    }
}
