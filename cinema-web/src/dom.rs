use chrono::NaiveDate;
use js_sys::{Function, Promise};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Event, HtmlDocument, Storage, Window};

/// The global `window`, absent outside a browser.
#[must_use]
pub fn window() -> Option<Window> {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

#[must_use]
pub fn document() -> Option<Document> {
    window().and_then(|w| w.document())
}

fn html_document() -> Option<HtmlDocument> {
    document().and_then(|d| d.dyn_into::<HtmlDocument>().ok())
}

/// Convert a JavaScript value into a readable string for error reporting.
#[must_use]
pub fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|err| err.message().into())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Milliseconds since the Unix epoch, from the browser clock.
#[must_use]
pub fn now_ms() -> i64 {
    #[cfg(target_arch = "wasm32")]
    {
        cinema_core::numbers::round_f64_to_i64(js_sys::Date::now())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Today's local calendar date.
#[must_use]
pub fn today() -> NaiveDate {
    #[cfg(target_arch = "wasm32")]
    {
        let now = js_sys::Date::new_0();
        NaiveDate::from_ymd_opt(
            i32::try_from(now.get_full_year()).unwrap_or(1970),
            now.get_month() + 1,
            now.get_date(),
        )
        .unwrap_or_default()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        chrono::Local::now().date_naive()
    }
}

/// Seed material for client-side RNGs: the clock mixed with `Math.random`.
#[must_use]
pub fn entropy_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    let noise = js_sys::Math::random().to_bits();
    #[cfg(not(target_arch = "wasm32"))]
    let noise = rand::random::<u64>();
    now_ms().unsigned_abs() ^ noise
}

/// Yield execution for the requested number of milliseconds.
///
/// # Errors
/// Returns an error if the timer cannot be scheduled or the underlying JavaScript promise rejects.
#[allow(clippy::future_not_send)] // Wasm futures rely on `JsFuture`, which is not `Send`.
pub async fn sleep_ms(duration_ms: i32) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("window unavailable"))?;
    let mut resolve_slot: Option<Function> = None;
    let promise = Promise::new(&mut |resolve, _reject| {
        resolve_slot = Some(resolve);
    });

    let resolve =
        resolve_slot.ok_or_else(|| JsValue::from_str("resolve function should be set"))?;
    let closure = Closure::once(move || {
        if let Err(err) = resolve.call0(&JsValue::UNDEFINED) {
            log::debug!("sleep did not resolve: {}", js_error_message(&err));
        }
    });

    let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
        closure.as_ref().unchecked_ref(),
        duration_ms,
    )?;
    closure.forget();

    JsFuture::from(promise).await?;
    Ok(())
}

/// A repeating browser timer, cleared when dropped.
pub struct Interval {
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Interval {
    /// Schedule `tick` every `period_ms`. `None` outside a browser.
    pub fn new(period_ms: i32, tick: impl FnMut() + 'static) -> Option<Self> {
        let callback = Closure::<dyn FnMut()>::new(tick);
        let id = window()?
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                period_ms,
            )
            .ok()?;
        Some(Self {
            id,
            _callback: callback,
        })
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        if let Some(win) = window() {
            win.clear_interval_with_handle(self.id);
        }
    }
}

/// A `window` event listener, removed when dropped.
pub struct WindowListener {
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl WindowListener {
    pub fn new(event: &'static str, handler: impl FnMut(Event) + 'static) -> Option<Self> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        window()?
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .ok()?;
        Some(Self { event, callback })
    }
}

impl Drop for WindowListener {
    fn drop(&mut self) {
        if let Some(win) = window() {
            if let Err(err) = win
                .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
            {
                log::debug!("{} listener not removed: {}", self.event, js_error_message(&err));
            }
        }
    }
}

/// Access the browser `localStorage` handle.
#[must_use]
pub fn local_storage() -> Option<Storage> {
    window().and_then(|w| w.local_storage().ok().flatten())
}

/// Read one cookie by name.
#[must_use]
pub fn get_cookie(name: &str) -> Option<String> {
    let jar = html_document()?.cookie().ok()?;
    jar.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name && !value.is_empty()).then(|| value.to_string())
    })
}

/// Write a root-path cookie. `max_age_days` of `None` makes it a session cookie.
pub fn set_cookie(name: &str, value: &str, max_age_days: Option<u32>) {
    let Some(doc) = html_document() else {
        return;
    };
    let expiry = max_age_days
        .map(|days| format!("; max-age={}", u64::from(days) * 86_400))
        .unwrap_or_default();
    if let Err(err) = doc.set_cookie(&format!("{name}={value}; path=/; SameSite=Lax{expiry}")) {
        log::debug!("cookie {name} not written: {}", js_error_message(&err));
    }
}

pub fn delete_cookie(name: &str) {
    if let Some(doc) = html_document() {
        if let Err(err) = doc.set_cookie(&format!("{name}=; path=/; max-age=0")) {
            log::debug!("cookie {name} not cleared: {}", js_error_message(&err));
        }
    }
}

/// Queue a fire-and-forget POST that survives page unload.
pub fn send_beacon(url: &str) -> bool {
    window()
        .and_then(|w| w.navigator().send_beacon(url).ok())
        .unwrap_or(false)
}
