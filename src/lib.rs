//! # Claimlens
//!
//! A terminal dashboard for a claims-workflow web application: log in,
//! scrape the protected dashboard page, summarize it with a hosted model,
//! review the result interactively.
//!
//! ## Architecture
//!
//! One pipeline, run per user action:
//!
//! ```text
//! Authenticator → Extractor → Summarizer → Presenter (TUI/CLI)
//! ```
//!
//! - [`client`]: cookie-persisting HTTP session against the target site
//! - [`auth`]: form-POST and external-check login strategies with a
//!   substring success heuristic
//! - [`extract`]: page markup → plain text + tables + diagnostics
//! - [`summarize`]: one chat-completion call, JSON-or-raw result
//! - [`tui`]: interactive three-pane view over the latest results
//!
//! ## Quick start
//!
//! ```bash
//! # Verify configuration
//! claimlens check
//!
//! # One-shot pipeline on the command line
//! claimlens analyze
//!
//! # Interactive view
//! claimlens tui
//! ```

/// Session context and error handling.
///
/// [`SessionContext`](app::SessionContext) owns the session client and the
/// latest result of each pipeline stage, and enforces stage ordering:
/// login before scrape, scrape before analyze.
pub mod app;

/// Login strategies and success classification.
pub mod auth;

/// Command-line interface using clap.
///
/// - `check` — preflight required configuration
/// - `login` / `scrape` / `analyze` / `export` — one-shot pipeline stages
/// - `tui` — launch the interactive view
pub mod cli;

/// Cookie-persisting HTTP session client.
pub mod client;

/// Configuration from `~/.config/claimlens/config.toml` with environment
/// variable overrides.
pub mod config;

/// Core domain models: [`AuthResult`](domain::AuthResult),
/// [`PageExtract`](domain::PageExtract), [`SummaryResult`](domain::SummaryResult).
pub mod domain;

/// File export: `summary.json` plus one CSV per table.
pub mod export;

/// Page content extraction (text, tables, diagnostics).
pub mod extract;

/// Hosted-model summarization.
pub mod summarize;

/// Terminal user interface.
///
/// Three panes (content, tables, summary) plus a status bar. Keybindings:
/// l login, c check session, s scrape, a analyze, e export, j/k scroll,
/// Tab cycles panes, q quits.
pub mod tui;
