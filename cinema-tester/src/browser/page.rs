use anyhow::{Context, Result, bail};
use cinema_core::models::User;
use cinema_core::session::USER_KEY;
use thirtyfour::prelude::*;

/// Thin helpers over a driver pointed at the storefront.
#[derive(Debug, Clone)]
pub struct StorefrontPage<'a> {
    driver: &'a WebDriver,
    base_url: String,
}

impl<'a> StorefrontPage<'a> {
    pub fn new(driver: &'a WebDriver, base_url: &str) -> Self {
        Self {
            driver,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path_and_query: &str) -> String {
        format!("{}{path_and_query}", self.base_url)
    }

    pub async fn open(&self, path_and_query: &str) -> Result<()> {
        let url = self.url(path_and_query);
        self.driver
            .goto(&url)
            .await
            .with_context(|| format!("opening {url}"))?;
        self.driver
            .find(By::Css("main#main"))
            .await
            .with_context(|| format!("{url} rendered no main landmark"))?;
        Ok(())
    }

    /// Store `user` the way a sign-in does, so guarded routes open.
    pub async fn sign_in_as(&self, user: &User) -> Result<()> {
        let profile = serde_json::to_string(user).context("encoding profile")?;
        self.driver
            .execute(
                "window.localStorage.setItem(arguments[0], arguments[1])",
                vec![USER_KEY.into(), profile.into()],
            )
            .await?;
        Ok(())
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.driver
            .execute("window.localStorage.clear()", vec![])
            .await?;
        Ok(())
    }

    pub async fn wait_for(&self, css: &str) -> Result<WebElement> {
        match self.driver.find(By::Css(css)).await {
            Ok(element) => Ok(element),
            Err(err) => {
                let path = self.current_path().await;
                Err(err).with_context(|| format!("expected `{css}` on {path}"))
            }
        }
    }

    pub async fn count(&self, css: &str) -> Result<usize> {
        Ok(self.driver.find_all(By::Css(css)).await?.len())
    }

    pub async fn expect_path(&self, expected: &str) -> Result<()> {
        let path = self.current_path().await;
        if !path.ends_with(expected) {
            bail!("expected to land on {expected}, got {path}");
        }
        Ok(())
    }

    async fn current_path(&self) -> String {
        self.driver
            .current_url()
            .await
            .map(|url| url.path().to_string())
            .unwrap_or_default()
    }
}
