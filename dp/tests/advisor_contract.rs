//! Provider contract tests
//!
//! Verify each client's HTTP request shape against a local mock server, and
//! the full advisor flow from agenda to parsed recommendations.

use chrono::NaiveDate;
use dayplanner::advisor::{AdvisorError, AdvisorSettings, PriorityAdvisor, Suggestion};
use dayplanner::config::AdvisorConfig;
use dayplanner::domain::{NewTask, PriorityLabel, Schedule, Task};
use dayplanner::llm::{
    AnthropicClient, CompletionRequest, GoogleClient, LlmClient, LlmError, Message, OpenAIClient, Provider, StopReason,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RECOMMENDATIONS: &str =
    r#"{"recommendations":[{"taskName":"Feature work","priority":"High Long task, start early"}]}"#;

fn request() -> CompletionRequest {
    CompletionRequest {
        system_prompt: "Answer with JSON".to_string(),
        messages: vec![Message::user("Prioritize")],
        max_tokens: 512,
        json_output: true,
    }
}

fn config_for(provider: Provider, base_url: &str) -> AdvisorConfig {
    let mut config = AdvisorConfig {
        provider: provider.to_string(),
        ..Default::default()
    };
    let slot = match provider {
        Provider::Google => &mut config.providers.google,
        Provider::OpenAi => &mut config.providers.openai,
        Provider::Anthropic => &mut config.providers.anthropic,
    };
    slot.base_url = Some(base_url.to_string());
    config
}

fn agenda() -> Vec<Task> {
    let day = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
    let mut coffee = Task::scheduled(
        NewTask::new("Morning coffee", "15 minutes"),
        Schedule::at(day.and_hms_opt(9, 0, 0).unwrap()),
    );
    coffee.is_completed = true;
    vec![
        coffee,
        Task::scheduled(
            NewTask::new("Feature work", "3 hours"),
            Schedule::at(day.and_hms_opt(10, 0, 0).unwrap()),
        ),
    ]
}

// =============================================================================
// Google
// =============================================================================

#[tokio::test]
async fn test_google_request_shape() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-1.5-flash:generateContent"))
        .and(header("x-goog-api-key", "g-key"))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "Prioritize"}]}],
            "generationConfig": {"maxOutputTokens": 512, "responseMimeType": "application/json"},
            "systemInstruction": {"parts": [{"text": "Answer with JSON"}]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"recommendations\": []}"}], "role": "model"},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 4}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolved = config_for(Provider::Google, &server.uri()).resolve(Provider::Google, "g-key".to_string());
    let client = GoogleClient::from_config(&resolved).unwrap();
    let response = client.complete(request()).await.unwrap();

    assert_eq!(response.content.as_deref(), Some("{\"recommendations\": []}"));
    assert_eq!(response.stop_reason, StopReason::EndTurn);
    assert_eq!(response.usage.total(), 16);
}

#[tokio::test]
async fn test_google_blocked_prompt_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&server)
        .await;

    let resolved = config_for(Provider::Google, &server.uri()).resolve(Provider::Google, "g-key".to_string());
    let client = GoogleClient::from_config(&resolved).unwrap();
    let err = client.complete(request()).await.unwrap_err();
    assert!(matches!(err, LlmError::InvalidResponse(ref m) if m.contains("SAFETY")));
}

// =============================================================================
// OpenAI
// =============================================================================

#[tokio::test]
async fn test_openai_request_shape() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer o-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "max_tokens": 512,
            "response_format": {"type": "json_object"},
            "messages": [
                {"role": "system", "content": "Answer with JSON"},
                {"role": "user", "content": "Prioritize"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "{}"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 20, "completion_tokens": 2}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolved = config_for(Provider::OpenAi, &server.uri()).resolve(Provider::OpenAi, "o-key".to_string());
    let client = OpenAIClient::from_config(&resolved).unwrap();
    let response = client.complete(request()).await.unwrap();

    assert_eq!(response.content.as_deref(), Some("{}"));
    assert_eq!(response.usage.total(), 22);
}

#[tokio::test]
async fn test_openai_unauthorized_is_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .expect(1)
        .mount(&server)
        .await;

    let resolved = config_for(Provider::OpenAi, &server.uri()).resolve(Provider::OpenAi, "bad".to_string());
    let client = OpenAIClient::from_config(&resolved).unwrap();
    let err = client.complete(request()).await.unwrap_err();
    assert!(err.is_auth_error());
}

// =============================================================================
// Anthropic
// =============================================================================

#[tokio::test]
async fn test_anthropic_request_shape() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "a-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-3-haiku-20240307",
            "max_tokens": 512,
            "system": "Answer with JSON",
            "messages": [{"role": "user", "content": "Prioritize"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "{}"}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 8, "output_tokens": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resolved =
        config_for(Provider::Anthropic, &server.uri()).resolve(Provider::Anthropic, "a-key".to_string());
    let client = AnthropicClient::from_config(&resolved).unwrap();
    let response = client.complete(request()).await.unwrap();

    assert_eq!(response.content.as_deref(), Some("{}"));
    assert_eq!(response.stop_reason, StopReason::EndTurn);
}

#[tokio::test]
async fn test_anthropic_rate_limited_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .expect(1)
        .mount(&server)
        .await;

    let resolved =
        config_for(Provider::Anthropic, &server.uri()).resolve(Provider::Anthropic, "a-key".to_string());
    let client = AnthropicClient::from_config(&resolved).unwrap();
    let err = client.complete(request()).await.unwrap_err();
    assert!(err.is_rate_limit());
    assert_eq!(err.retry_after().map(|d| d.as_secs()), Some(7));
}

// =============================================================================
// Advisor flow
// =============================================================================

#[tokio::test]
async fn test_advisor_end_to_end_with_fenced_output() {
    let server = MockServer::start().await;
    let fenced = format!("```json\n{}\n```", RECOMMENDATIONS);

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": fenced}, "finish_reason": "stop"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(Provider::OpenAi, &server.uri());
    let mut settings = AdvisorSettings::from_config_with(&config, |_| None);
    settings.set_credential(Provider::OpenAi, "sk-live-secret");

    let advisor = PriorityAdvisor::new();
    let suggestion = advisor.suggest(&agenda(), &settings).await.unwrap();
    let Suggestion::Recommendations(recs) = suggestion else {
        panic!("expected recommendations");
    };
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].task_name, "Feature work");
    assert_eq!(recs[0].label(), Some(PriorityLabel::High));
    assert_eq!(recs[0].reasoning(), "Long task, start early");

    // The prompt lists pending work only and never carries the key
    let received = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&received[0].body).to_string();
    assert!(body.contains("Feature work"));
    assert!(!body.contains("Morning coffee"));
    assert!(!body.contains("sk-live-secret"));
}

#[tokio::test]
async fn test_advisor_schema_failure_is_all_or_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "{\"recommendations\": [{\"taskName\": \"Feature work\"}]}"}],
            "stop_reason": "end_turn"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(Provider::Anthropic, &server.uri());
    let mut settings = AdvisorSettings::from_config_with(&config, |_| None);
    settings.set_credential(Provider::Anthropic, "a-key");

    let err = PriorityAdvisor::new().suggest(&agenda(), &settings).await.unwrap_err();
    assert!(matches!(err, AdvisorError::Schema(_)));
}

#[tokio::test]
async fn test_advisor_nothing_pending_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = config_for(Provider::Google, &server.uri());
    let mut settings = AdvisorSettings::from_config_with(&config, |_| None);
    settings.set_credential(Provider::Google, "g-key");

    let done: Vec<Task> = agenda()
        .into_iter()
        .map(|mut t| {
            t.is_completed = true;
            t
        })
        .collect();
    let suggestion = PriorityAdvisor::new().suggest(&done, &settings).await.unwrap();
    assert_eq!(suggestion, Suggestion::NothingToPrioritize);
}

#[tokio::test]
async fn test_advisor_rate_limit_reports_wait() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "12"))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(Provider::OpenAi, &server.uri());
    let mut settings = AdvisorSettings::from_config_with(&config, |_| None);
    settings.set_credential(Provider::OpenAi, "o-key");

    let err = PriorityAdvisor::new().suggest(&agenda(), &settings).await.unwrap_err();
    assert!(matches!(err, AdvisorError::Provider(ref e) if e.is_rate_limit()));
    assert_eq!(err.retry_after().map(|d| d.as_secs()), Some(12));
    assert!(!err.needs_credential());
}
