use std::path::{Path, PathBuf};

use crate::app::{ClaimlensError, Result};
use crate::auth::{AuthStrategy, Authenticator};
use crate::client::HttpSessionClient;
use crate::config::Config;
use crate::domain::{AuthResult, PageExtract, SummaryResult};
use crate::export;
use crate::extract::PageExtractor;
use crate::summarize::Summarizer;

/// One UI session's pipeline state: the cookie-bearing client plus the
/// latest result of each stage. Handlers receive this explicitly; there are
/// no process-wide singletons, and nothing is shared across sessions.
///
/// Each stage result is a snapshot: stored once on success, replaced
/// wholesale on the next run, never mutated in place.
pub struct SessionContext {
    pub config: Config,
    client: HttpSessionClient,
    authenticator: Authenticator,
    extractor: PageExtractor,
    summarizer: Summarizer,
    pub auth: Option<AuthResult>,
    pub extract: Option<PageExtract>,
    pub summary: Option<SummaryResult>,
}

impl SessionContext {
    pub fn new(config: Config) -> Self {
        let client = HttpSessionClient::new(config.site.timeout());
        let authenticator = Authenticator::new(config.site.clone());
        let summarizer = Summarizer::new(config.summarizer.clone());

        Self {
            config,
            client,
            authenticator,
            extractor: PageExtractor::new(),
            summarizer,
            auth: None,
            extract: None,
            summary: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.as_ref().is_some_and(|a| a.success)
    }

    /// Submit the configured credentials through the login form.
    pub async fn login(&mut self) -> Result<AuthResult> {
        let result = self
            .authenticator
            .authenticate(&self.client, AuthStrategy::FormPost)
            .await?;
        self.auth = Some(result.clone());
        Ok(result)
    }

    /// Probe the protected URL, assuming out-of-band login.
    pub async fn check_session(&mut self) -> Result<AuthResult> {
        let result = self
            .authenticator
            .authenticate(&self.client, AuthStrategy::ExternalCheck)
            .await?;
        self.auth = Some(result.clone());
        Ok(result)
    }

    /// Extract the dashboard page. Requires a prior successful login.
    pub async fn scrape(&mut self) -> Result<PageExtract> {
        if !self.is_authenticated() {
            return Err(ClaimlensError::Auth(
                "not authenticated; run login first".into(),
            ));
        }

        let extract = self
            .extractor
            .extract(&self.client, &self.config.site.dashboard_url)
            .await?;
        self.extract = Some(extract.clone());
        Ok(extract)
    }

    /// Summarize the scraped text. Requires a non-empty extract from this
    /// session.
    pub async fn analyze(&mut self) -> Result<SummaryResult> {
        if !self.is_authenticated() {
            return Err(ClaimlensError::Auth(
                "not authenticated; run login first".into(),
            ));
        }
        let extract = self
            .extract
            .as_ref()
            .ok_or_else(|| ClaimlensError::Other("no page content; run scrape first".into()))?;
        if extract.is_empty() {
            return Err(ClaimlensError::Other(
                "scraped page was empty; nothing to summarize".into(),
            ));
        }

        let summary = self.summarizer.summarize(&extract.raw_text).await?;
        self.summary = Some(summary.clone());
        Ok(summary)
    }

    /// Write the latest extract/summary into `dir`.
    pub fn export(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        export::export_session(dir, self.extract.as_ref(), self.summary.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_scrape_before_login_is_auth_error() {
        let mut ctx = SessionContext::new(Config::default());
        let err = ctx.scrape().await.unwrap_err();
        assert!(matches!(err, ClaimlensError::Auth(_)));
    }

    #[tokio::test]
    async fn test_analyze_requires_scrape() {
        let mut ctx = SessionContext::new(Config::default());
        ctx.auth = Some(AuthResult::ok());

        let err = ctx.analyze().await.unwrap_err();
        assert!(matches!(err, ClaimlensError::Other(_)));
    }

    #[tokio::test]
    async fn test_analyze_rejects_empty_extract() {
        let mut ctx = SessionContext::new(Config::default());
        ctx.auth = Some(AuthResult::ok());
        ctx.extract = Some(PageExtract {
            url: "https://claims.example.com".into(),
            raw_text: String::new(),
            tables: Vec::new(),
            fetched_at: Utc::now(),
            frame_count: 0,
            script_count: 0,
        });

        let err = ctx.analyze().await.unwrap_err();
        assert!(matches!(err, ClaimlensError::Other(_)));
    }

    #[tokio::test]
    async fn test_failed_auth_does_not_authenticate() {
        let mut ctx = SessionContext::new(Config::default());
        ctx.auth = Some(AuthResult::failed("login prompt still present: login"));
        assert!(!ctx.is_authenticated());

        let err = ctx.scrape().await.unwrap_err();
        assert!(matches!(err, ClaimlensError::Auth(_)));
    }
}
