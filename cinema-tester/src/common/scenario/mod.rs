use anyhow::Result;
use thirtyfour::prelude::*;

use crate::browser::StorefrontPage;
use crate::logic::checks::{self, Check};

pub mod booking;
pub mod hall_layout;
pub mod smoke;

#[derive(Debug, Clone)]
pub struct ScenarioCtx<'a> {
    pub page: StorefrontPage<'a>,
    /// Query string for a screening the backend under test knows about.
    pub booking_query: String,
    pub verbose: bool,
}

// Logic test scenario
#[derive(Debug, Clone)]
pub struct LogicScenario {
    pub name: String,
    pub checks: Vec<(&'static str, Check)>,
}

impl LogicScenario {
    #[must_use]
    pub fn new(name: impl Into<String>, checks: Vec<(&'static str, Check)>) -> Self {
        Self {
            name: name.into(),
            checks,
        }
    }
}

// Browser test scenario
#[async_trait::async_trait]
pub trait BrowserScenario {
    async fn run_browser(&self, driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()>;
}

// Combined scenario that can run both logic and browser tests
pub trait CombinedScenario: BrowserScenario {
    fn as_logic_scenario(&self) -> Option<LogicScenario>;
}

/// A single seeded check with no browser counterpart.
#[derive(Clone)]
pub struct CheckScenario {
    name: &'static str,
    check_key: &'static str,
    check: Check,
}

#[async_trait::async_trait]
impl BrowserScenario for CheckScenario {
    async fn run_browser(&self, _driver: &WebDriver, _ctx: &ScenarioCtx<'_>) -> Result<()> {
        anyhow::bail!("{} has no browser run", self.name)
    }
}

impl CombinedScenario for CheckScenario {
    fn as_logic_scenario(&self) -> Option<LogicScenario> {
        Some(LogicScenario::new(self.name, vec![(self.check_key, self.check)]))
    }
}

fn check_scenario(key: &str) -> Option<CheckScenario> {
    let (check_key, check) = checks::ALL.into_iter().find(|(k, _)| *k == key)?;
    let name = list_scenarios()
        .into_iter()
        .find(|(k, _)| *k == check_key)
        .map_or(check_key, |(_, description)| description);
    Some(CheckScenario {
        name,
        check_key,
        check,
    })
}

pub fn get_scenario(name: &str) -> Option<Box<dyn CombinedScenario + Send + Sync>> {
    match name.to_lowercase().as_str() {
        "smoke" | "all" => Some(Box::new(smoke::SmokeScenario)),
        "booking-page" | "booking" => Some(Box::new(booking::BookingPageScenario)),
        "hall-layout" | "admin-layout" => Some(Box::new(hall_layout::HallLayoutScenario)),
        "hold" => check_scenario("hold-expiry").map(|s| Box::new(s) as _),
        "gate" => check_scenario("checkout-gate").map(|s| Box::new(s) as _),
        other => check_scenario(other).map(|s| Box::new(s) as _),
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("smoke", "Smoke Test"),
        ("pricing", "Price Preview Properties"),
        ("hold-expiry", "Seat Hold Expiry"),
        ("layout", "Hall Layout Parsing"),
        ("checkout-gate", "Checkout Gate"),
        ("access", "Role Access and Stored Profile"),
        ("booking-page", "Booking Page Render"),
        ("hall-layout", "Admin Hall Layout Preview"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_scenario_resolves() {
        for (key, _) in list_scenarios() {
            let scenario = get_scenario(key).unwrap_or_else(|| panic!("{key} is listed but unknown"));
            assert!(scenario.as_logic_scenario().is_some(), "{key} has no logic run");
        }
    }

    #[test]
    fn aliases_and_case_are_accepted() {
        assert!(get_scenario("HOLD").is_some());
        assert!(get_scenario("gate").is_some());
        assert!(get_scenario("booking").is_some());
        assert!(get_scenario("seat-maps").is_none());
    }

    #[test]
    fn single_check_scenarios_use_listed_names() {
        let scenario = get_scenario("access").and_then(|s| s.as_logic_scenario()).expect("access");
        assert_eq!(scenario.name, "Role Access and Stored Profile");
        assert_eq!(scenario.checks.len(), 1);
        assert_eq!(scenario.checks[0].0, "access");
    }

    #[test]
    fn smoke_runs_every_check() {
        let scenario = get_scenario("smoke").and_then(|s| s.as_logic_scenario()).expect("smoke");
        assert_eq!(scenario.checks.len(), checks::ALL.len());
    }
}
