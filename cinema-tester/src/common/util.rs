use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thirtyfour::prelude::*;

/// `base/browser/scenario/timestamp`, with the scenario name made path-safe.
pub fn artifacts_dir(base: &str, browser: &str, scenario: &str) -> PathBuf {
    let scenario: String = scenario
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    let ts = Utc::now().format("%Y%m%dT%H%M%S");
    Path::new(base).join(browser).join(scenario).join(ts.to_string())
}

/// Browser state at the moment a scenario failed.
#[derive(Debug, Default)]
pub struct FailureCapture {
    pub url: Option<String>,
    pub screenshot: Option<Vec<u8>>,
    pub dom: Option<String>,
    pub storage: Option<Value>,
    pub error: String,
}

impl FailureCapture {
    /// Collect whatever the driver still answers; missing pieces stay `None`.
    pub async fn take(driver: &WebDriver, err: &anyhow::Error) -> Self {
        let storage = driver
            .execute(
                "return Object.fromEntries(Object.entries(window.localStorage || {}))",
                vec![],
            )
            .await
            .ok()
            .map(|ret| expand_json_entries(ret.json().clone()));
        Self {
            url: driver.current_url().await.ok().map(|u| u.to_string()),
            screenshot: driver.screenshot_as_png().await.ok(),
            dom: driver.source().await.ok(),
            storage,
            error: format!("{err:#}"),
        }
    }

    /// Write every captured piece under `dir` and return the files written.
    /// A piece that fails to write is logged and skipped.
    pub fn save(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

        let mut report = self.error.clone();
        if let Some(url) = &self.url {
            report = format!("url: {url}\n\n{report}");
        }
        let storage = self
            .storage
            .as_ref()
            .and_then(|v| serde_json::to_vec_pretty(v).ok());

        let pieces: [(&str, Option<&[u8]>); 4] = [
            ("screenshot.png", self.screenshot.as_deref()),
            ("dom.html", self.dom.as_deref().map(str::as_bytes)),
            ("local-storage.json", storage.as_deref()),
            ("error.txt", Some(report.as_bytes())),
        ];
        let mut written = Vec::new();
        for (name, bytes) in pieces {
            let Some(bytes) = bytes else { continue };
            let path = dir.join(name);
            match fs::write(&path, bytes) {
                Ok(()) => written.push(path),
                Err(err) => log::warn!("could not write {}: {err}", path.display()),
            }
        }
        Ok(written)
    }
}

/// Stored values are strings; show JSON ones (the cached profile) as objects.
fn expand_json_entries(storage: Value) -> Value {
    match storage {
        Value::Object(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, value)| {
                    let parsed = value
                        .as_str()
                        .and_then(|raw| serde_json::from_str::<Value>(raw).ok())
                        .filter(|v| v.is_object() || v.is_array());
                    (key, parsed.unwrap_or(value))
                })
                .collect::<Map<_, _>>(),
        ),
        other => other,
    }
}

/// Capture the failing page into `dir`.
pub async fn capture_artifacts(driver: &WebDriver, dir: &Path, err: &anyhow::Error) -> Result<Vec<PathBuf>> {
    FailureCapture::take(driver, err).await.save(dir)
}

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "cinema-{tag}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" pricing, ,layout,  access ");
        assert_eq!(parts, vec!["pricing", "layout", "access"]);
    }

    #[test]
    fn artifacts_dir_nests_browser_and_safe_scenario_name() {
        let dir = artifacts_dir("target/out", "chrome", "hall layout/admin");
        assert!(dir.starts_with("target/out/chrome/hall_layout_admin"), "{}", dir.display());
        assert_eq!(dir.components().count(), 5);
    }

    #[test]
    fn stored_profile_is_expanded_and_plain_values_kept() {
        let expanded = expand_json_entries(json!({
            "user": "{\"userId\":7,\"roles\":[\"CUSTOMER\"]}",
            "cinema.locale": "vi",
            "count": "3"
        }));
        assert_eq!(expanded["user"]["userId"], 7);
        assert_eq!(expanded["cinema.locale"], "vi");
        assert_eq!(expanded["count"], "3");
    }

    #[test]
    fn save_writes_only_captured_pieces() {
        let dir = scratch_dir("artifacts");
        let capture = FailureCapture {
            url: Some("http://localhost:8080/booking".to_string()),
            screenshot: Some(vec![1, 2, 3]),
            dom: None,
            storage: Some(json!({ "cinema.locale": "vi" })),
            error: "seat map missing".to_string(),
        };
        let written = capture.save(&dir).expect("save artifacts");

        assert_eq!(written.len(), 3);
        assert!(dir.join("screenshot.png").exists());
        assert!(!dir.join("dom.html").exists());
        assert!(dir.join("local-storage.json").exists());
        let report = fs::read_to_string(dir.join("error.txt")).expect("error file");
        assert!(report.starts_with("url: http://localhost:8080/booking"));
        assert!(report.ends_with("seat map missing"));
    }
}
