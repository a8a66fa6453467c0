use std::path::Path;

use crate::app::{ClaimlensError, Result, SessionContext};
use crate::config::Config;
use crate::domain::SummaryResult;
use crate::tui::layout::summary_lines;

/// Preflight: report each required setting and whether it is present.
/// Returns false when anything required is missing, so the caller can exit
/// non-zero before starting the interactive process.
pub fn check(config: &Config, external: bool) -> bool {
    let missing = config.missing_required(external);

    let mut items = vec![("dashboard URL", !config.site.dashboard_url.is_empty())];
    // Login URL and credentials are not required when login happens
    // out-of-band, so don't report them as missing then.
    if !external {
        items.push(("login URL", !config.site.login_url.is_empty()));
        items.push((
            "credentials",
            !config.site.username.is_empty() && !config.site.password.is_empty(),
        ));
    }
    items.push(("model API key", !config.summarizer.api_key.is_empty()));
    items.push(("model endpoint", !config.summarizer.api_url.is_empty()));

    for (name, present) in items {
        println!("  {} {}", if present { "ok     " } else { "MISSING" }, name);
    }

    if missing.is_empty() {
        println!("Configuration complete");
        true
    } else {
        println!("\nMissing required settings:");
        for item in &missing {
            println!("  - {item}");
        }
        false
    }
}

async fn authenticate(ctx: &mut SessionContext, external: bool) -> Result<()> {
    let result = if external {
        ctx.check_session().await?
    } else {
        ctx.login().await?
    };

    if result.success {
        println!("Authenticated");
        Ok(())
    } else {
        let reason = result.reason.unwrap_or_else(|| "unknown".into());
        Err(ClaimlensError::Auth(reason))
    }
}

pub async fn login(ctx: &mut SessionContext, external: bool) -> Result<()> {
    let result = if external {
        ctx.check_session().await?
    } else {
        ctx.login().await?
    };

    if result.success {
        println!("Login successful");
    } else {
        println!(
            "Login failed: {}",
            result.reason.unwrap_or_else(|| "unknown".into())
        );
    }
    Ok(())
}

pub async fn scrape(ctx: &mut SessionContext, external: bool) -> Result<()> {
    authenticate(ctx, external).await?;

    let extract = ctx.scrape().await?;

    if extract.is_empty() {
        println!("Page fetched but contained no content");
        return Ok(());
    }

    let preview: String = extract.raw_text.chars().take(500).collect();
    println!("Fetched {} at {}", extract.url, extract.fetched_at.format("%Y-%m-%d %H:%M:%S"));
    println!("\n{preview}");
    if extract.raw_text.chars().count() > 500 {
        println!("... ({} chars total)", extract.raw_text.chars().count());
    }

    println!("\n{} table(s) extracted", extract.tables.len());
    for (index, table) in extract.tables.iter().enumerate() {
        println!("  Table {}: {} rows", index + 1, table.len());
    }
    println!(
        "{} frame(s), {} script block(s)",
        extract.frame_count, extract.script_count
    );

    Ok(())
}

pub async fn analyze(ctx: &mut SessionContext, external: bool) -> Result<()> {
    authenticate(ctx, external).await?;
    ctx.scrape().await?;

    let summary = ctx.analyze().await?;

    if matches!(summary, SummaryResult::Raw(_)) {
        println!("Model reply was not valid JSON; showing raw text:\n");
    }
    for line in summary_lines(&summary) {
        println!("{line}");
    }

    Ok(())
}

pub async fn export(ctx: &mut SessionContext, external: bool, output: &Path) -> Result<()> {
    authenticate(ctx, external).await?;
    ctx.scrape().await?;
    ctx.analyze().await?;

    let written = ctx.export(output)?;
    for path in written {
        println!("Wrote {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_fails_on_empty_config() {
        assert!(!check(&Config::default(), false));
        // The model API key is still required for the external workflow
        assert!(!check(&Config::default(), true));
    }

    #[test]
    fn test_check_external_needs_no_credentials() {
        let mut config = Config::default();
        config.site.dashboard_url = "https://claims.example.com/cases".into();
        config.summarizer.api_key = "sk-test".into();

        assert!(check(&config, true));
        assert!(!check(&config, false));
    }
}
