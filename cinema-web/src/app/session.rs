//! Signed-in user shared through a Yew context.

use crate::storage::BrowserStore;
use cinema_core::models::User;
use cinema_core::session::{self, SessionEvent, SessionHub};
use yew::prelude::*;

#[derive(Clone, PartialEq)]
pub struct SessionContext {
    pub user: Option<User>,
    pub hub: SessionHub,
}

impl SessionContext {
    #[must_use]
    pub fn user_id(&self) -> Option<i64> {
        self.user.as_ref().map(|u| u.user_id)
    }

    /// Persist a fresh login and tell every subscriber.
    pub fn sign_in(&self, user: User) {
        if let Err(err) = session::save_user(&BrowserStore, &user) {
            log::warn!("could not cache profile: {err}");
        }
        self.hub.publish(&SessionEvent::UserChanged(Some(user)));
    }

    pub fn sign_out(&self) {
        crate::api::clear_credentials();
        self.hub.publish(&SessionEvent::UserChanged(None));
    }

    pub fn points_changed(&self, available: i64) {
        self.hub.publish(&SessionEvent::PointsChanged { available });
    }
}

#[hook]
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().unwrap_or_else(|| SessionContext {
        user: session::load_user(&BrowserStore),
        hub: SessionHub::new(),
    })
}

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    #[prop_or_default]
    pub children: Children,
}

/// Owns the hub and mirrors its events into render state.
#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    let hub = use_memo((), |()| SessionHub::new());
    let user = use_state(|| {
        session::sanitize_user(&BrowserStore);
        session::load_user(&BrowserStore)
    });

    {
        let hub = (*hub).clone();
        let user = user.clone();
        use_effect_with((), move |()| {
            let subscription = hub.subscribe(move |event| match event {
                SessionEvent::UserChanged(next) => user.set(next.clone()),
                SessionEvent::PointsChanged { available } => {
                    match session::update_points(&BrowserStore, *available) {
                        Ok(updated) => user.set(updated),
                        Err(err) => log::warn!("could not cache points: {err}"),
                    }
                }
            });
            move || drop(subscription)
        });
    }

    let context = SessionContext {
        user: (*user).clone(),
        hub: (*hub).clone(),
    };
    html! {
        <ContextProvider<SessionContext> {context}>
            { for props.children.iter() }
        </ContextProvider<SessionContext>>
    }
}
