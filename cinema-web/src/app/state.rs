//! Hand-off between the seat page and the checkout page.

use cinema_core::checkout::TicketCounts;
use cinema_core::hold::{SeatSelection, SessionId};
use cinema_core::models::Showtime;
use yew::prelude::*;

/// Seats held on `/seats/:id`, waiting to be paid for on `/booking/confirm`.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutDraft {
    pub showtime: Showtime,
    pub session_id: SessionId,
    pub selection: SeatSelection,
    pub tickets: TicketCounts,
    pub hold_expires_at: Option<i64>,
}

impl CheckoutDraft {
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.selection.len()
    }
}

pub type DraftHandle = UseStateHandle<Option<CheckoutDraft>>;

/// The draft slot, or `None` outside [`DraftProvider`].
#[hook]
pub fn use_checkout_draft() -> Option<DraftHandle> {
    use_context::<DraftHandle>()
}

#[derive(Properties, PartialEq)]
pub struct DraftProviderProps {
    #[prop_or_default]
    pub children: Children,
}

#[function_component(DraftProvider)]
pub fn draft_provider(props: &DraftProviderProps) -> Html {
    let draft = use_state(|| None::<CheckoutDraft>);
    html! {
        <ContextProvider<DraftHandle> context={draft}>
            { for props.children.iter() }
        </ContextProvider<DraftHandle>>
    }
}
