use crate::i18n::{fmt_currency, t};
use cinema_core::checkout::{payment_description, payment_qr_url};
use cinema_core::config::QrConfig;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub qr: QrConfig,
    pub amount: i64,
    pub movie_title: AttrValue,
    pub seat_labels: Vec<String>,
    #[prop_or_default]
    pub reference: Option<AttrValue>,
}

/// Bank-transfer instruction for a created booking.
#[function_component(PaymentQr)]
pub fn payment_qr(props: &Props) -> Html {
    let memo = payment_description(props.reference.as_deref(), &props.movie_title, &props.seat_labels);
    let src = payment_qr_url(&props.qr, props.amount, &memo);
    html! {
        <section class="payment-qr">
            <h3>{ t("payment.title") }</h3>
            <img src={src} alt={t("payment.qr_alt")} width="280" height="280" />
            <dl>
                <dt>{ t("payment.account") }</dt>
                <dd>{ format!("{} · {}", props.qr.account_number, props.qr.account_name) }</dd>
                <dt>{ t("payment.amount") }</dt>
                <dd>{ fmt_currency(props.amount) }</dd>
                <dt>{ t("payment.memo") }</dt>
                <dd class="payment-memo">{ memo }</dd>
            </dl>
        </section>
    }
}
