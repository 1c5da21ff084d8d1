#[cfg(target_arch = "wasm32")]
use crate::i18n::bundle::with_bundle;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

/// Whole number with dot thousands separators, e.g. `1.250`.
#[must_use]
pub fn fmt_grouped(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

/// Vietnamese đồng with dot thousands separators, e.g. `230.000 ₫`.
#[must_use]
pub fn fmt_currency(amount: i64) -> String {
    format!("{} ₫", fmt_grouped(amount))
}

/// Hold countdown as `m:ss`.
#[must_use]
pub fn fmt_countdown(secs: u64) -> String {
    cinema_core::hold::format_remaining(secs)
}

/// Format an ISO 8601 date string using the current locale (browser-side).
#[must_use]
pub fn fmt_date_iso(date_iso: &str) -> String {
    #[cfg(target_arch = "wasm32")]
    {
        with_bundle(|bundle| {
            let date = js_sys::Date::new(&JsValue::from_str(date_iso));
            date.to_locale_date_string(&bundle.lang, &JsValue::UNDEFINED)
                .as_string()
                .unwrap_or_else(|| date_iso.to_string())
        })
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        date_iso.to_string()
    }
}

/// `YYYY-MM-DD` shown as `DD/MM/YYYY`; anything else is returned unchanged.
#[must_use]
pub fn fmt_show_date(date: &str) -> String {
    chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_or_else(|_| date.to_string(), |d| d.format("%d/%m/%Y").to_string())
}
