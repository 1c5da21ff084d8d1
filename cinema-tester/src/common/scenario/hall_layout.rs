use anyhow::{Result, ensure};
use cinema_core::layout::LayoutSpec;
use cinema_core::models::{Role, User};
use thirtyfour::prelude::*;

use super::{BrowserScenario, CombinedScenario, LogicScenario, ScenarioCtx};
use crate::logic::checks;

/// Admin layout editor: the live preview renders from the default fields
/// before any hall is picked.
pub struct HallLayoutScenario;

fn qa_user(role: Role) -> User {
    User {
        user_id: 9_001,
        full_name: "QA Runner".to_string(),
        email: "qa@cinema.test".to_string(),
        phone: None,
        roles: vec![role],
        membership_tier: None,
        available_points: None,
    }
}

#[async_trait::async_trait]
impl BrowserScenario for HallLayoutScenario {
    async fn run_browser(&self, _driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        let page = &ctx.page;
        page.open("/").await?;
        page.sign_in_as(&qa_user(Role::SystemAdmin)).await?;

        page.open("/admin/halls/layout").await?;
        page.expect_path("/admin/halls/layout").await?;
        page.wait_for("[data-testid='layout-grid']").await?;
        let defaults = LayoutSpec::default();
        let expected = usize::try_from(defaults.rows * defaults.seats_per_row)?;
        let seats = page.count("[data-testid='layout-grid'] span[title]").await?;
        ensure!(seats == expected, "preview shows {seats} seats, expected {expected}");
        if ctx.verbose {
            println!("  🪑 Layout preview rendered {seats} seats");
        }

        // A customer is sent back to the storefront.
        page.sign_in_as(&qa_user(Role::Customer)).await?;
        page.open("/admin/halls/layout").await?;
        page.wait_for(".home-page").await?;

        page.sign_out().await?;
        Ok(())
    }
}

impl CombinedScenario for HallLayoutScenario {
    fn as_logic_scenario(&self) -> Option<LogicScenario> {
        Some(LogicScenario::new("Admin Hall Layout Preview", vec![("layout", checks::layout)]))
    }
}
