use super::bind_input;
use crate::api;
use crate::app::session::use_session;
use crate::components::toast::use_toaster;
use crate::i18n::t;
use crate::router::Route;
use cinema_core::access::dashboard_path;
use cinema_core::api::endpoints;
use cinema_core::models::{AuthPayload, LoginRequest};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let session = use_session();
    let toaster = use_toaster();
    let navigator = use_navigator();
    let email = use_state(String::new);
    let password = use_state(String::new);
    let remember = use_state(|| true);
    let busy = use_state(|| false);

    let on_remember = {
        let remember = remember.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<web_sys::HtmlInputElement>() {
                remember.set(input.checked());
            }
        })
    };

    let on_submit = {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: (*password).clone(),
        };
        let keep = *remember;
        let busy = busy.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *busy {
                return;
            }
            if request.email.is_empty() || request.password.is_empty() {
                toaster.warning(t("login.missing_fields"));
                return;
            }
            busy.set(true);
            let request = request.clone();
            let session = session.clone();
            let toaster = toaster.clone();
            let navigator = navigator.clone();
            let busy = busy.clone();
            spawn_local(async move {
                match api::post::<_, AuthPayload>(endpoints::login(), &request).await {
                    Ok(auth) => {
                        api::store_tokens(
                            &auth.access_token,
                            auth.refresh_token.as_deref().unwrap_or_default(),
                            keep,
                        );
                        let target = Route::from_dashboard_path(dashboard_path(&auth.user.roles));
                        log::info!("signed in as user {}", auth.user.user_id);
                        session.sign_in(auth.user);
                        toaster.success(t("login.welcome"));
                        if let Some(nav) = navigator.as_ref() {
                            nav.push(&target);
                        }
                    }
                    Err(err) => {
                        log::warn!("login failed: {err}");
                        toaster.error(err.user_message(&t("login.failed")));
                    }
                }
                busy.set(false);
            });
        })
    };

    html! {
        <main id="main" class="page login-page">
            <form class="panel login-form" onsubmit={on_submit}>
                <h1>{ t("login.title") }</h1>
                <label for="login-email">{ t("login.email") }</label>
                <input id="login-email" type="email" autocomplete="username" value={(*email).clone()} oninput={bind_input(&email)} />
                <label for="login-password">{ t("login.password") }</label>
                <input id="login-password" type="password" autocomplete="current-password" value={(*password).clone()} oninput={bind_input(&password)} />
                <label class="remember">
                    <input type="checkbox" checked={*remember} onchange={on_remember} />
                    { t("login.remember") }
                </label>
                <button type="submit" class="btn btn-primary" disabled={*busy}>{ t("login.submit") }</button>
            </form>
        </main>
    }
}
