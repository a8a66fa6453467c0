//! Login strategies and the success-classification heuristic.
//!
//! Two strategies exist: submitting the credential form directly, or probing
//! a protected URL after the operator authenticated out-of-band (e.g. in a
//! separate browser tab). Both classify the landing response with the same
//! substring heuristic.
//!
//! The heuristic is known to be weak: a page that merely mentions "login" in
//! unrelated text will misclassify. It is kept best-effort by design; tune
//! the indicator lists in the config instead of expecting smarter inference
//! here.

use reqwest::Method;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::app::{ClaimlensError, Result};
use crate::client::SessionClient;
use crate::config::SiteConfig;
use crate::domain::AuthResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Fetch the login page, fill the credential form, submit it.
    FormPost,
    /// No submission; assume out-of-band login and probe the protected URL.
    ExternalCheck,
}

/// Parsed credential form: the field names to POST and where to POST them.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LoginForm {
    username_field: String,
    password_field: String,
    action: Option<String>,
}

pub struct Authenticator {
    config: SiteConfig,
}

impl Authenticator {
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    pub async fn authenticate(
        &self,
        client: &dyn SessionClient,
        strategy: AuthStrategy,
    ) -> Result<AuthResult> {
        match strategy {
            AuthStrategy::FormPost => self.form_login(client).await,
            AuthStrategy::ExternalCheck => self.external_check(client).await,
        }
    }

    /// Form POST strategy: locate the credential inputs by the configured
    /// selector candidates, submit, classify the landing response.
    async fn form_login(&self, client: &dyn SessionClient) -> Result<AuthResult> {
        let login_page = client
            .fetch(&self.config.login_url, Method::GET, &[])
            .await?;

        if !login_page.is_success() {
            return Err(ClaimlensError::Fetch {
                url: self.config.login_url.clone(),
                status: login_page.status,
            });
        }

        let form = self.parse_login_form(&login_page.body)?;
        let submit_url = self.resolve_action(&login_page.final_url, form.action.as_deref())?;

        tracing::debug!(%submit_url, username_field = %form.username_field, "submitting credentials");

        let params = vec![
            (form.username_field, self.config.username.clone()),
            (form.password_field, self.config.password.clone()),
        ];
        let landing = client.fetch(&submit_url, Method::POST, &params).await?;

        let result = self.classify(&landing.final_url, &landing.body);
        tracing::info!(success = result.success, final_url = %landing.final_url, "form login classified");
        Ok(result)
    }

    /// External-login-check strategy: fetch the protected page and apply the
    /// same classification heuristic.
    async fn external_check(&self, client: &dyn SessionClient) -> Result<AuthResult> {
        let response = client
            .fetch(&self.config.dashboard_url, Method::GET, &[])
            .await?;

        if !response.is_success() {
            return Ok(AuthResult::failed(format!(
                "protected resource returned HTTP {}",
                response.status
            )));
        }

        let result = self.classify(&response.final_url, &response.body);
        tracing::info!(success = result.success, "external session check classified");
        Ok(result)
    }

    /// Locate the credential inputs. Ranked candidates, first match wins;
    /// if nothing matches a required field the attempt fails rather than
    /// guessing.
    fn parse_login_form(&self, body: &str) -> Result<LoginForm> {
        let document = Html::parse_document(body);

        let username_input = first_matching_input(&document, &self.config.username_selectors)
            .ok_or_else(|| ClaimlensError::FieldNotFound("username".into()))?;
        let password_input = first_matching_input(&document, &self.config.password_selectors)
            .ok_or_else(|| ClaimlensError::FieldNotFound("password".into()))?;

        Ok(LoginForm {
            username_field: field_name(username_input, "username"),
            password_field: field_name(password_input, "password"),
            action: enclosing_form_action(password_input),
        })
    }

    /// A form action may be absent or relative; fall back to posting back to
    /// the page we landed on.
    fn resolve_action(&self, page_url: &str, action: Option<&str>) -> Result<String> {
        match action {
            None | Some("") => Ok(page_url.to_string()),
            Some(action) => {
                let base = Url::parse(page_url)?;
                Ok(base.join(action)?.to_string())
            }
        }
    }

    /// Classify a landing response as authenticated or not.
    ///
    /// Explicit error messages beat positive indicators, which beat the
    /// login-prompt check; a page showing neither a prompt nor an error is
    /// treated as logged in.
    pub fn classify(&self, final_url: &str, body: &str) -> AuthResult {
        let url = final_url.to_lowercase();
        let body = body.to_lowercase();

        for marker in &self.config.error_indicators {
            if body.contains(marker.as_str()) {
                return AuthResult::failed(format!("error message present: {marker}"));
            }
        }

        for marker in &self.config.success_indicators {
            if url.contains(marker.as_str()) || body.contains(marker.as_str()) {
                return AuthResult::ok();
            }
        }

        for marker in &self.config.login_prompt_indicators {
            if url.contains(marker.as_str()) || body.contains(marker.as_str()) {
                return AuthResult::failed(format!("login prompt still present: {marker}"));
            }
        }

        AuthResult::ok()
    }
}

/// Try each selector candidate in order and return the first matching
/// input element. `None` means no candidate matched at all.
fn first_matching_input<'a>(document: &'a Html, candidates: &[String]) -> Option<ElementRef<'a>> {
    for candidate in candidates {
        let selector = match Selector::parse(candidate) {
            Ok(selector) => selector,
            Err(_) => {
                tracing::warn!(%candidate, "skipping invalid selector candidate");
                continue;
            }
        };
        if let Some(element) = document.select(&selector).next() {
            tracing::debug!(%candidate, "selector candidate matched");
            return Some(element);
        }
    }
    None
}

/// The input's `name` attribute, falling back to `default_name` for inputs
/// matched by id or type.
fn field_name(input: ElementRef<'_>, default_name: &str) -> String {
    input.value().attr("name").unwrap_or(default_name).to_string()
}

/// Action of the form enclosing the credential input. Login pages can carry
/// other forms (search, newsletter) before the login form, so the first
/// `<form>` on the page is not necessarily the right one.
fn enclosing_form_action(input: ElementRef<'_>) -> Option<String> {
    input
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "form")
        .and_then(|form| form.value().attr("action"))
        .map(String::from)
}
