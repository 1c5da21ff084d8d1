mod bundle;
mod format;
mod locales;
mod render;

pub use bundle::{I18nBundle, current_lang, set_lang};
pub use format::{fmt_countdown, fmt_currency, fmt_date_iso, fmt_grouped, fmt_show_date};
pub use locales::{LocaleMeta, locales};
pub use render::{t, tr};
