//! `/loyalty`: the member's points balance and transaction history.
//!
//! The session's cached balance shows first; the fetched balance replaces it
//! and is published so the header badge follows.

use super::{EmptyState, Loading};
use crate::api;
use crate::app::session::use_session;
use crate::components::toast::use_toaster;
use crate::i18n::{fmt_date_iso, fmt_grouped, t};
use cinema_core::api::endpoints;
use cinema_core::models::{LoyaltyBalance, PointsTransaction};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

fn type_key(transaction_type: &str) -> Option<&'static str> {
    match transaction_type {
        "EARN" => Some("loyalty.types.earn"),
        "REDEEM" => Some("loyalty.types.redeem"),
        "EXPIRE" => Some("loyalty.types.expire"),
        "ADJUST" => Some("loyalty.types.adjust"),
        "GIFT" => Some("loyalty.types.gift"),
        _ => None,
    }
}

fn type_label(transaction_type: &str) -> String {
    type_key(transaction_type).map_or_else(|| transaction_type.to_string(), t)
}

fn signed_points(points: i64) -> String {
    if points > 0 {
        format!("+{}", fmt_grouped(points))
    } else {
        fmt_grouped(points)
    }
}

#[function_component(LoyaltyPage)]
pub fn loyalty_page() -> Html {
    let session = use_session();
    let toaster = use_toaster();
    let balance = use_state(|| None::<LoyaltyBalance>);
    let history = use_state(|| None::<Vec<PointsTransaction>>);
    let show_history = use_state(|| false);
    let user_id = session.user_id();

    {
        let balance = balance.clone();
        let history = history.clone();
        let session = session.clone();
        use_effect_with(user_id, move |&user_id| {
            if let Some(user_id) = user_id {
                spawn_local(async move {
                    match api::get::<LoyaltyBalance>(endpoints::loyalty_balance(user_id)).await {
                        Ok(found) => {
                            session.points_changed(found.available_points);
                            balance.set(Some(found));
                        }
                        Err(err) => {
                            log::error!("points balance for user {user_id}: {err}");
                            toaster.error(err.user_message(&t("loyalty.load_failed")));
                        }
                    }
                    match api::get::<Vec<PointsTransaction>>(endpoints::loyalty_history(user_id)).await {
                        Ok(list) => history.set(Some(list)),
                        Err(err) => {
                            log::warn!("points history for user {user_id}: {err}");
                            history.set(Some(Vec::new()));
                        }
                    }
                });
            }
            || {}
        });
    }

    let cached = session
        .user
        .as_ref()
        .and_then(|u| u.available_points)
        .map(|available_points| LoyaltyBalance {
            available_points,
            ..LoyaltyBalance::default()
        });
    let shown = (*balance).or(cached);

    let on_toggle = {
        let show_history = show_history.clone();
        Callback::from(move |_: MouseEvent| show_history.set(!*show_history))
    };

    html! {
        <main id="main" class="page loyalty-page">
            <h1>{ t("loyalty.title") }</h1>
            { match shown {
                None => html! { <Loading /> },
                Some(found) => html! { <PointsCard balance={found} /> },
            } }
            <button type="button" class="btn btn-ghost" aria-expanded={(*show_history).to_string()} onclick={on_toggle}>
                { if *show_history { t("loyalty.hide_history") } else { t("loyalty.show_history") } }
            </button>
            if *show_history {
                { match history.as_ref() {
                    None => html! { <Loading /> },
                    Some(list) => html! { <PointsHistory transactions={list.clone()} /> },
                } }
            }
        </main>
    }
}

#[derive(Properties, PartialEq)]
pub struct CardProps {
    pub balance: LoyaltyBalance,
}

#[function_component(PointsCard)]
pub fn points_card(props: &CardProps) -> Html {
    let b = props.balance;
    let unit = t("loyalty.unit");
    html! {
        <section class="panel points-card" aria-label={t("loyalty.available")}>
            <p class="points-available">
                <span class="label">{ t("loyalty.available") }</span>
                <span class="points-value" data-testid="points-available">{ fmt_grouped(b.available_points) }</span>
                <span class="points-unit">{ unit.clone() }</span>
            </p>
            <dl class="points-stats">
                <dt>{ t("loyalty.earned") }</dt>
                <dd>{ format!("{} {unit}", fmt_grouped(b.total_earned)) }</dd>
                <dt>{ t("loyalty.redeemed") }</dt>
                <dd>{ format!("{} {unit}", fmt_grouped(b.total_redeemed)) }</dd>
            </dl>
        </section>
    }
}

#[derive(Properties, PartialEq)]
pub struct HistoryProps {
    pub transactions: Vec<PointsTransaction>,
}

#[function_component(PointsHistory)]
pub fn points_history(props: &HistoryProps) -> Html {
    if props.transactions.is_empty() {
        return html! { <EmptyState message={t("loyalty.history_empty")} /> };
    }
    html! {
        <section class="points-history">
            <h2>{ t("loyalty.history_title") }</h2>
            <table class="table points-table">
                <thead>
                    <tr>
                        <th>{ t("loyalty.date") }</th>
                        <th>{ t("loyalty.type") }</th>
                        <th>{ t("loyalty.points") }</th>
                        <th>{ t("loyalty.description") }</th>
                        <th>{ t("loyalty.balance") }</th>
                    </tr>
                </thead>
                <tbody>
                    { for props.transactions.iter().map(|tx| {
                        let class = if tx.points_amount < 0 { "points-negative" } else { "points-positive" };
                        html! {
                            <tr key={tx.transaction_id}>
                                <td>{ tx.created_at.as_deref().map(fmt_date_iso).unwrap_or_default() }</td>
                                <td>{ type_label(&tx.transaction_type) }</td>
                                <td class={class}>{ signed_points(tx.points_amount) }</td>
                                <td>{ tx.description.clone().unwrap_or_default() }</td>
                                <td>{ tx.balance_after.map(fmt_grouped).unwrap_or_default() }</td>
                            </tr>
                        }
                    }) }
                </tbody>
            </table>
        </section>
    }
}
