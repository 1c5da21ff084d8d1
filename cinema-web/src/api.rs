//! Browser HTTP client for the booking backend.
//!
//! Requests carry the bearer token from the `accessToken` cookie. Responses
//! are decoded with [`cinema_core::api::decode_flexible`], so enveloped and
//! bare bodies are both accepted.

use crate::dom;
use cinema_core::api::{self, ApiCall, ApiError, Method, UnauthorizedPolicy};
use cinema_core::config::ClientConfig;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

static CONFIG: Lazy<ClientConfig> = Lazy::new(ClientConfig::from_build_env);

thread_local! {
    static ON_UNAUTHORIZED: RefCell<Option<Rc<dyn Fn()>>> = const { RefCell::new(None) };
}

/// Build-time client configuration.
#[must_use]
pub fn config() -> &'static ClientConfig {
    &CONFIG
}

/// Register what happens after a 401 forces a logout.
pub fn set_unauthorized_handler(handler: impl Fn() + 'static) {
    ON_UNAUTHORIZED.with(|slot| *slot.borrow_mut() = Some(Rc::new(handler)));
}

fn notify_unauthorized() {
    let handler = ON_UNAUTHORIZED.with(|slot| slot.borrow().clone());
    if let Some(handler) = handler {
        handler();
    }
}

/// Absolute URL for an endpoint.
#[must_use]
pub fn url_for(call: &ApiCall) -> String {
    config().url_for(&call.path)
}

fn js_err(err: &JsValue) -> ApiError {
    ApiError::Network(dom::js_error_message(err))
}

fn build_request(call: &ApiCall, body: Option<String>) -> Result<Request, ApiError> {
    let headers = Headers::new().map_err(|e| js_err(&e))?;
    headers
        .set("Accept", "application/json")
        .map_err(|e| js_err(&e))?;
    if let Some(token) = dom::get_cookie(ACCESS_TOKEN_COOKIE) {
        headers
            .set("Authorization", &format!("Bearer {token}"))
            .map_err(|e| js_err(&e))?;
    }

    let init = RequestInit::new();
    init.set_method(call.method.as_str());
    if let Some(json) = body {
        headers
            .set("Content-Type", "application/json")
            .map_err(|e| js_err(&e))?;
        init.set_body(&JsValue::from_str(&json));
    }
    init.set_headers(&headers);
    Request::new_with_str_and_init(&url_for(call), &init).map_err(|e| js_err(&e))
}

#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
async fn execute(call: &ApiCall, body: Option<String>) -> Result<String, ApiError> {
    let request = build_request(call, body)?;
    let win = dom::window().ok_or_else(|| ApiError::Network("window unavailable".into()))?;
    let response: Response = JsFuture::from(win.fetch_with_request(&request))
        .await
        .map_err(|e| js_err(&e))?
        .dyn_into()
        .map_err(|e| js_err(&e))?;
    let text_promise = response.text().map_err(|e| js_err(&e))?;
    let text = JsFuture::from(text_promise)
        .await
        .map_err(|e| js_err(&e))?
        .as_string()
        .unwrap_or_default();

    if response.ok() {
        return Ok(text);
    }
    let err = ApiError::from_status(response.status(), &text);
    if err == ApiError::Unauthorized && call.unauthorized_policy() == UnauthorizedPolicy::Logout {
        log::warn!("{} {} returned 401, signing out", call.method.as_str(), call.path);
        notify_unauthorized();
    }
    Err(err)
}

/// Send `call` with an optional JSON body and decode the reply.
///
/// # Errors
/// Network failures, non-2xx statuses, rejected envelopes and decode errors.
#[allow(clippy::future_not_send)]
pub async fn send<B: Serialize, T: DeserializeOwned>(call: ApiCall, body: Option<&B>) -> Result<T, ApiError> {
    let json = body.map(serde_json::to_string).transpose()?;
    let text = execute(&call, json).await?;
    api::decode_flexible(&text).inspect_err(|err| {
        log::error!("{} {} failed to decode: {err}", call.method.as_str(), call.path);
    })
}

/// # Errors
/// See [`send`].
#[allow(clippy::future_not_send)]
pub async fn get<T: DeserializeOwned>(call: ApiCall) -> Result<T, ApiError> {
    debug_assert_eq!(call.method, Method::Get);
    send::<(), T>(call, None).await
}

/// # Errors
/// See [`send`].
#[allow(clippy::future_not_send)]
pub async fn post<B: Serialize, T: DeserializeOwned>(call: ApiCall, body: &B) -> Result<T, ApiError> {
    send(call, Some(body)).await
}

/// Send a call whose reply body is ignored.
///
/// # Errors
/// Network failures and non-2xx statuses.
#[allow(clippy::future_not_send)]
pub async fn fire(call: ApiCall) -> Result<(), ApiError> {
    execute(&call, None).await.map(|_| ())
}

/// Drop tokens and cached profile.
pub fn clear_credentials() {
    dom::delete_cookie(ACCESS_TOKEN_COOKIE);
    dom::delete_cookie(REFRESH_TOKEN_COOKIE);
    cinema_core::session::clear_session(&crate::storage::BrowserStore);
}

/// Persist tokens after login. `remember` keeps the access token for a week.
pub fn store_tokens(access: &str, refresh: &str, remember: bool) {
    dom::set_cookie(ACCESS_TOKEN_COOKIE, access, remember.then_some(7));
    dom::set_cookie(REFRESH_TOKEN_COOKIE, refresh, Some(30));
}
