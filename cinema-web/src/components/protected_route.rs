use crate::app::session::use_session;
use crate::components::toast::use_toaster;
use crate::i18n::t;
use crate::router::Route;
use crate::storage::BrowserStore;
use cinema_core::access::{AccessDecision, check_access};
use cinema_core::models::Role;
use cinema_core::session::{StoredUser, read_user};
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    /// Empty means any signed-in user.
    #[prop_or_default]
    pub allowed: Vec<Role>,
    #[prop_or_default]
    pub children: Children,
}

/// Renders its children only for users holding one of `allowed`.
#[function_component(ProtectedRoute)]
pub fn protected_route(props: &Props) -> Html {
    let session = use_session();
    let navigator = use_navigator();
    let toaster = use_toaster();

    // Without a context user, storage decides so corrupt entries are caught.
    let stored = match session.user.clone() {
        Some(user) => StoredUser::Present(user),
        None => read_user(&BrowserStore),
    };
    let decision = check_access(&stored, &props.allowed);

    {
        let decision = decision.clone();
        use_effect_with(decision, move |decision| {
            match decision {
                AccessDecision::Granted => {}
                AccessDecision::Login { clear_user } => {
                    if *clear_user {
                        cinema_core::session::clear_session(&BrowserStore);
                    }
                    toaster.info(t("auth.login_required"));
                    if let Some(nav) = navigator.as_ref() {
                        nav.push(&Route::Login);
                    }
                }
                AccessDecision::Redirect(path) => {
                    toaster.warning(t("auth.forbidden"));
                    if let Some(nav) = navigator.as_ref() {
                        nav.push(&Route::from_dashboard_path(path));
                    }
                }
            }
            || {}
        });
    }

    let target = match &decision {
        AccessDecision::Granted => return html! { <>{ for props.children.iter() }</> },
        AccessDecision::Login { .. } => Route::Login.to_path(),
        AccessDecision::Redirect(path) => Route::from_dashboard_path(path).to_path(),
    };
    html! {
        <section class="panel access-check" aria-busy="true" data-redirect={target}>
            <p>{ t("auth.checking") }</p>
        </section>
    }
}
