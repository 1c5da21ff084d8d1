use crate::i18n::{fmt_currency, t};
use cinema_core::checkout::ConcessionCart;
use cinema_core::models::ConcessionItem;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub items: Vec<ConcessionItem>,
    pub cart: ConcessionCart,
    pub on_add: Callback<i64>,
    pub on_remove: Callback<i64>,
}

#[function_component(ConcessionPicker)]
pub fn concession_picker(props: &Props) -> Html {
    if props.items.is_empty() {
        return html! {
            <p class="concessions-empty">{ t("concessions.empty") }</p>
        };
    }
    html! {
        <section class="concessions">
            <h3>{ t("concessions.title") }</h3>
            <ul>
                { for props.items.iter().map(|item| {
                    let id = item.item_id;
                    let qty = props.cart.quantity(id);
                    let add = props.on_add.reform(move |_: MouseEvent| id);
                    let remove = props.on_remove.reform(move |_: MouseEvent| id);
                    let sellable = item.in_stock();
                    html! {
                        <li class={classes!("concession", (!sellable).then_some("sold-out"))}>
                            <span class="concession-name">{ item.item_name.clone() }</span>
                            <span class="concession-price">{ fmt_currency(item.unit_price()) }</span>
                            <button type="button" class="btn btn-sm" disabled={qty == 0} onclick={remove}>{ "−" }</button>
                            <output>{ qty.to_string() }</output>
                            <button type="button" class="btn btn-sm" disabled={!sellable} onclick={add}>{ "+" }</button>
                        </li>
                    }
                }) }
            </ul>
        </section>
    }
}
