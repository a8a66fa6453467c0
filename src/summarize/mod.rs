//! Hosted-model summarization of extracted page text.
//!
//! One chat-completion call with a fixed instruction and low temperature.
//! Input is silently cut to `max_input_chars` before submission since the
//! hosted model bounds input size. The reply is expected to contain JSON;
//! when it doesn't parse, the verbatim text is returned as the unstructured
//! variant instead of failing the pipeline.

mod api;

use crate::app::{ClaimlensError, Result};
use crate::config::SummarizerConfig;
use crate::domain::{ClaimsSummary, SummaryResult};

use api::{ApiMessage, ApiRequest, ApiResponse};

const SYSTEM_PROMPT: &str =
    "You are a claims processing expert. Analyze dashboard data and identify actionable claims.";

const INSTRUCTION: &str = "Analyze the following claims dashboard content. \
Identify claims and their statuses, and highlight claims that can move forward \
(approved, ready, pending review, and similar). Respond with a single JSON object:\n\
{\"total_claims\": <number>, \
\"ready_claims\": [{\"id\": \"...\", \"status\": \"...\", \"next_step\": \"...\"}], \
\"attention_items\": [\"...\"], \
\"notes\": \"...\"}";

pub struct Summarizer {
    config: SummarizerConfig,
    client: reqwest::Client,
}

impl Summarizer {
    pub fn new(config: SummarizerConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Submit page text to the model and parse the reply.
    ///
    /// Network or endpoint failures are `Summarization` errors; an
    /// unparseable reply is not a failure and downgrades to raw text.
    pub async fn summarize(&self, text: &str) -> Result<SummaryResult> {
        let request = self.build_request(text);

        let response = self
            .client
            .post(&self.config.api_url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| ClaimlensError::Summarization(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ClaimlensError::Summarization(format!(
                "model endpoint returned HTTP {status}: {body}"
            )));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| ClaimlensError::Summarization(e.to_string()))?;

        let reply = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ClaimlensError::Summarization("model reply had no content".into()))?;

        Ok(parse_reply(&reply))
    }

    fn build_request(&self, text: &str) -> ApiRequest {
        let truncated = truncate_chars(text, self.config.max_input_chars);
        tracing::debug!(
            submitted_chars = truncated.chars().count(),
            original_chars = text.chars().count(),
            "building summarization request"
        );

        ApiRequest {
            model: self.config.model.clone(),
            messages: vec![
                ApiMessage::system(SYSTEM_PROMPT),
                ApiMessage::user(format!("{INSTRUCTION}\n\nDashboard content:\n{truncated}")),
            ],
            max_tokens: Some(self.config.max_tokens),
            temperature: Some(self.config.temperature),
        }
    }
}

/// Character-based cut, safe on multi-byte input.
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Parse a model reply into a structured summary. Tries the verbatim reply
/// first, then the first fenced code block; anything else is kept raw.
pub fn parse_reply(reply: &str) -> SummaryResult {
    if let Ok(summary) = serde_json::from_str::<ClaimsSummary>(reply.trim()) {
        return SummaryResult::Structured(summary);
    }

    if let Some(block) = fenced_block(reply) {
        if let Ok(summary) = serde_json::from_str::<ClaimsSummary>(block) {
            return SummaryResult::Structured(summary);
        }
    }

    SummaryResult::Raw(reply.to_string())
}

fn fenced_block(reply: &str) -> Option<&str> {
    let start = reply.find("```")?;
    let rest = &reply[start + 3..];
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> SummarizerConfig {
        SummarizerConfig {
            api_url: format!("{}/v1/chat/completions", server.uri()),
            api_key: "sk-test".into(),
            ..SummarizerConfig::default()
        }
    }

    fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
    }

    #[test]
    fn test_truncation_to_exact_maximum() {
        let long = "x".repeat(5000);
        assert_eq!(truncate_chars(&long, 4000).chars().count(), 4000);

        let short = "short";
        assert_eq!(truncate_chars(short, 4000), "short");
    }

    #[test]
    fn test_request_embeds_exactly_max_chars() {
        let summarizer = Summarizer::new(SummarizerConfig::default());
        let request = summarizer.build_request(&"x".repeat(5000));

        let user_message = &request.messages[1].content;
        assert!(user_message.contains(&"x".repeat(4000)));
        assert!(!user_message.contains(&"x".repeat(4001)));
        assert_eq!(request.temperature, Some(0.3));
    }

    #[test]
    fn test_parse_reply_structured() {
        let reply = r#"{"total_claims": 5, "ready_claims": [{"id": "CLM-1", "status": "approved"}]}"#;
        match parse_reply(reply) {
            SummaryResult::Structured(summary) => {
                assert_eq!(summary.total_claims, 5);
                assert_eq!(summary.ready_claims.len(), 1);
            }
            SummaryResult::Raw(_) => panic!("expected structured summary"),
        }
    }

    #[test]
    fn test_parse_reply_fenced() {
        let reply = "Here is the breakdown:\n```json\n{\"total_claims\": 2}\n```\nLet me know.";
        match parse_reply(reply) {
            SummaryResult::Structured(summary) => assert_eq!(summary.total_claims, 2),
            SummaryResult::Raw(_) => panic!("expected structured summary"),
        }
    }

    #[test]
    fn test_parse_reply_invalid_json_kept_verbatim() {
        let reply = "The dashboard shows 5 claims, 2 ready to move.";
        match parse_reply(reply) {
            SummaryResult::Raw(text) => assert_eq!(text, reply),
            SummaryResult::Structured(_) => panic!("expected raw fallback"),
        }
    }

    #[tokio::test]
    async fn test_summarize_parses_model_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_string_contains("gpt-3.5-turbo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
                r#"{"total_claims": 3, "ready_claims": [], "attention_items": ["CLM-9 missing docs"]}"#,
            )))
            .mount(&server)
            .await;

        let summarizer = Summarizer::new(config_for(&server));
        let result = summarizer.summarize("claims page text").await.unwrap();

        match result {
            SummaryResult::Structured(summary) => {
                assert_eq!(summary.total_claims, 3);
                assert_eq!(summary.attention_items, vec!["CLM-9 missing docs"]);
            }
            SummaryResult::Raw(_) => panic!("expected structured summary"),
        }
    }

    #[tokio::test]
    async fn test_summarize_downgrades_non_json_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body("I could not find any claims.")),
            )
            .mount(&server)
            .await;

        let summarizer = Summarizer::new(config_for(&server));
        let result = summarizer.summarize("claims page text").await.unwrap();

        assert_eq!(result, SummaryResult::Raw("I could not find any claims.".into()));
    }

    #[tokio::test]
    async fn test_summarize_endpoint_failure_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let summarizer = Summarizer::new(config_for(&server));
        let err = summarizer.summarize("claims page text").await.unwrap_err();

        assert!(matches!(err, ClaimlensError::Summarization(_)));
    }
}
