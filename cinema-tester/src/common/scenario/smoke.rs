use anyhow::{Result, ensure};
use thirtyfour::prelude::*;

use super::{BrowserScenario, CombinedScenario, LogicScenario, ScenarioCtx};
use crate::logic::checks;

pub struct SmokeScenario;

#[async_trait::async_trait]
impl BrowserScenario for SmokeScenario {
    async fn run_browser(&self, _driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        let page = &ctx.page;
        page.sign_out().await?;

        page.open("/").await?;
        page.wait_for("a[href='#main']").await?;
        page.wait_for(".quick-booking").await?;
        page.wait_for("#lang-select").await?;
        if ctx.verbose {
            println!("  🏠 Storefront home rendered");
        }

        page.open("/definitely-not-a-page").await?;
        page.wait_for(".not-found").await?;

        // Guests are bounced to sign-in by the route guard.
        page.open("/admin/dashboard").await?;
        page.wait_for(".login-form").await?;
        page.expect_path("/login").await?;
        if ctx.verbose {
            println!("  🔒 Admin route redirected a guest to /login");
        }

        let guarded = page.count(".showtime-table").await?;
        ensure!(guarded == 0, "admin table leaked to a guest");
        Ok(())
    }
}

impl CombinedScenario for SmokeScenario {
    fn as_logic_scenario(&self) -> Option<LogicScenario> {
        Some(LogicScenario::new("Smoke Test", checks::ALL.to_vec()))
    }
}
