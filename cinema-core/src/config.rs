//! Client configuration resolved from build-time environment variables.
//!
//! The storefront ships as static files, so configuration is baked in at
//! compile time with `option_env!`, the same way `PUBLIC_URL` is handled for
//! asset paths. Blank or malformed values fall back to the defaults.

use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Bank account details rendered into the transfer QR image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrConfig {
    pub bank_id: String,
    pub account_number: String,
    pub account_name: String,
    pub template: String,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            bank_id: String::from("970422"),
            account_number: String::from("0915232119"),
            account_name: String::from("CINEMA BOOKING"),
            template: String::from("compact2"),
        }
    }
}

/// Optional overrides, one per environment variable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigOverrides<'a> {
    pub api_base_url: Option<&'a str>,
    pub qr_bank_id: Option<&'a str>,
    pub qr_account_number: Option<&'a str>,
    pub qr_account_name: Option<&'a str>,
    pub qr_template: Option<&'a str>,
}

impl ConfigOverrides<'static> {
    /// Values captured when the crate was compiled.
    #[must_use]
    pub const fn from_build_env() -> Self {
        Self {
            api_base_url: option_env!("CINEMA_API_URL"),
            qr_bank_id: option_env!("CINEMA_QR_BANK_ID"),
            qr_account_number: option_env!("CINEMA_QR_ACCOUNT"),
            qr_account_name: option_env!("CINEMA_QR_ACCOUNT_NAME"),
            qr_template: option_env!("CINEMA_QR_TEMPLATE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash.
    pub api_base_url: String,
    pub qr: QrConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_overrides(ConfigOverrides::default())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl ClientConfig {
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::from_overrides(ConfigOverrides::from_build_env())
    }

    #[must_use]
    pub fn from_overrides(overrides: ConfigOverrides<'_>) -> Self {
        let api_base_url = non_blank(overrides.api_base_url)
            .filter(|raw| Url::parse(raw).is_ok_and(|u| matches!(u.scheme(), "http" | "https")))
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        let defaults = QrConfig::default();
        let pick = |value: Option<&str>, fallback: String| {
            non_blank(value).map_or(fallback, str::to_string)
        };
        let qr = QrConfig {
            bank_id: pick(overrides.qr_bank_id, defaults.bank_id),
            account_number: pick(overrides.qr_account_number, defaults.account_number),
            account_name: pick(overrides.qr_account_name, defaults.account_name),
            template: pick(overrides.qr_template, defaults.template),
        };

        Self { api_base_url, qr }
    }

    /// Absolute URL for a base-relative API path.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        let rel = path.trim_start_matches('/');
        format!("{}/{rel}", self.api_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.api_base_url, "http://localhost:8080/api");
        assert_eq!(cfg.qr.bank_id, "970422");
        assert_eq!(cfg.url_for("/movies"), "http://localhost:8080/api/movies");
    }

    #[test]
    fn overrides_are_trimmed_and_validated() {
        let cfg = ClientConfig::from_overrides(ConfigOverrides {
            api_base_url: Some(" https://tickets.example.com/api/ "),
            qr_template: Some("print"),
            qr_bank_id: Some("   "),
            ..ConfigOverrides::default()
        });
        assert_eq!(cfg.api_base_url, "https://tickets.example.com/api");
        assert_eq!(cfg.qr.template, "print");
        assert_eq!(cfg.qr.bank_id, "970422");
        assert_eq!(
            cfg.url_for("seats/hold"),
            "https://tickets.example.com/api/seats/hold"
        );
    }

    #[test]
    fn malformed_base_url_falls_back() {
        let cfg = ClientConfig::from_overrides(ConfigOverrides {
            api_base_url: Some("not a url"),
            ..ConfigOverrides::default()
        });
        assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
    }
}
