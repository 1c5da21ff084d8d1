use crate::i18n::{fmt_countdown, tr};
use cinema_core::hold::EXTEND_THRESHOLD_SECS;
use std::collections::BTreeMap;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    /// Seconds left on the hold; nothing renders without one.
    pub remaining: Option<u64>,
}

#[function_component(HoldTimer)]
pub fn hold_timer(props: &Props) -> Html {
    let Some(secs) = props.remaining else {
        return Html::default();
    };
    let time = fmt_countdown(secs);
    let mut args = BTreeMap::new();
    args.insert("time", time.as_str());
    html! {
        <div
            class={classes!("hold-timer", (secs <= EXTEND_THRESHOLD_SECS).then_some("hold-timer-low"))}
            role="timer"
            aria-live="off"
        >
            { tr("seats.hold_remaining", Some(&args)) }
        </div>
    }
}
