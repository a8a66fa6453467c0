//! End-to-end pipeline scenarios against a mock site and model endpoint.

use claimlens::app::{ClaimlensError, SessionContext};
use claimlens::config::Config;
use claimlens::domain::SummaryResult;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DASHBOARD_BODY: &str =
    "<html><body><h1>Claims</h1><table><tr><td>A</td></tr></table></body></html>";

fn config_for(site: &MockServer, model: &MockServer) -> Config {
    let mut config = Config::default();
    config.site.base_url = site.uri();
    config.site.dashboard_url = format!("{}/cases/workflow/2", site.uri());
    config.site.login_url = format!("{}/auth/login", site.uri());
    config.site.username = "admin".into();
    config.site.password = "secret".into();
    config.summarizer.api_url = format!("{}/v1/chat/completions", model.uri());
    config.summarizer.api_key = "sk-test".into();
    config
}

fn completion_reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
}

#[tokio::test]
async fn external_check_scrape_analyze_export() {
    let site = MockServer::start().await;
    let model = MockServer::start().await;

    // Protected page: 200, one table, no login prompt text
    Mock::given(method("GET"))
        .and(path("/cases/workflow/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DASHBOARD_BODY))
        .mount(&site)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_reply(
            r#"{"total_claims": 1, "ready_claims": [{"id": "A", "status": "ready"}]}"#,
        )))
        .mount(&model)
        .await;

    let mut ctx = SessionContext::new(config_for(&site, &model));

    let auth = ctx.check_session().await.unwrap();
    assert!(auth.success);

    let extract = ctx.scrape().await.unwrap();
    assert_eq!(extract.tables, vec![vec![vec!["A".to_string()]]]);
    assert!(extract.raw_text.contains("Claims"));

    let summary = ctx.analyze().await.unwrap();
    match &summary {
        SummaryResult::Structured(summary) => {
            assert_eq!(summary.total_claims, 1);
            assert_eq!(summary.ready_claims.len(), 1);
        }
        SummaryResult::Raw(_) => panic!("expected structured summary"),
    }

    let dir = tempfile::tempdir().unwrap();
    let written = ctx.export(dir.path()).unwrap();
    assert_eq!(written.len(), 2); // summary.json + table-1.csv
}

#[tokio::test]
async fn form_login_rejection_blocks_the_pipeline() {
    let site = MockServer::start().await;
    let model = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<form action="/auth/session" method="post">
                 <input name="username" type="text" />
                 <input name="password" type="password" />
               </form>"#,
        ))
        .mount(&site)
        .await;

    // Credentials rejected: site re-renders the login page with an error
    Mock::given(method("POST"))
        .and(path("/auth/session"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>Login failed. Please sign in.</body></html>"),
        )
        .mount(&site)
        .await;

    let mut ctx = SessionContext::new(config_for(&site, &model));

    let auth = ctx.login().await.unwrap();
    assert!(!auth.success);
    assert!(auth.reason.is_some());

    // The failed attempt does not unlock the rest of the pipeline
    let err = ctx.scrape().await.unwrap_err();
    assert!(matches!(err, ClaimlensError::Auth(_)));
    assert!(ctx.extract.is_none());
    assert!(ctx.summary.is_none());
}

#[tokio::test]
async fn raw_model_reply_still_completes_the_run() {
    let site = MockServer::start().await;
    let model = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cases/workflow/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DASHBOARD_BODY))
        .mount(&site)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_reply("One claim, looks ready to me.")),
        )
        .mount(&model)
        .await;

    let mut ctx = SessionContext::new(config_for(&site, &model));
    ctx.check_session().await.unwrap();
    ctx.scrape().await.unwrap();

    let summary = ctx.analyze().await.unwrap();
    assert_eq!(
        summary,
        SummaryResult::Raw("One claim, looks ready to me.".into())
    );
}
