use anyhow::{Result, ensure};
use thirtyfour::prelude::*;

use super::{BrowserScenario, CombinedScenario, LogicScenario, ScenarioCtx};
use crate::logic::checks;

/// Storefront booking screen: seat map, ticket counts and the price preview.
pub struct BookingPageScenario;

#[async_trait::async_trait]
impl BrowserScenario for BookingPageScenario {
    async fn run_browser(&self, _driver: &WebDriver, ctx: &ScenarioCtx<'_>) -> Result<()> {
        let page = &ctx.page;
        page.open(&format!("/booking?{}", ctx.booking_query.trim_start_matches('?')))
            .await?;

        page.wait_for(".seat-map").await?;
        let seats = page.count(".seat-map [data-seat]").await?;
        ensure!(seats > 0, "seat map rendered without seats");
        page.wait_for(".price-summary").await?;
        // Nothing picked yet, so the gate explains why checkout is disabled.
        page.wait_for("[data-testid='checkout-gate']").await?;

        if ctx.verbose {
            println!("  🎟️  Booking page shows {seats} seats and a price summary");
        }

        page.open("/booking").await?;
        page.wait_for(".empty-state, .home-page").await?;
        Ok(())
    }
}

impl CombinedScenario for BookingPageScenario {
    fn as_logic_scenario(&self) -> Option<LogicScenario> {
        Some(LogicScenario::new(
            "Booking Page Render",
            vec![("pricing", checks::pricing), ("checkout-gate", checks::checkout_gate)],
        ))
    }
}
