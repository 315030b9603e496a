// SPDX-FileCopyrightText: 2026 FinDeus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI Chat Completions API.

use std::time::Duration;

use findeus_core::FinDeusError;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse};

/// HTTP client for OpenAI API communication.
///
/// Sends bearer-authenticated requests to `{base_url}/chat/completions`.
/// Failures are returned as-is, without retry.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OpenAiClient {
    /// Creates a client for the API rooted at `base_url` (e.g. `https://api.openai.com/v1`).
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, FinDeusError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| FinDeusError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| FinDeusError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends a chat completion request and returns the decoded response.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, FinDeusError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| FinDeusError::Provider {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, "openai response received");

        let body = response.text().await.map_err(|e| FinDeusError::Provider {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => {
                    let kind = api_err
                        .error
                        .type_
                        .or(api_err.error.code)
                        .unwrap_or_else(|| status.as_u16().to_string());
                    format!("OpenAI API error ({kind}): {}", api_err.error.message)
                }
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(FinDeusError::provider(message));
        }

        serde_json::from_str(&body).map_err(|e| FinDeusError::Provider {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::types::ChatMessage;

    fn test_client(base_url: &str) -> OpenAiClient {
        OpenAiClient::new("sk-test-key", base_url, Duration::from_secs(5)).unwrap()
    }

    fn test_request() -> ChatRequest {
        ChatRequest {
            model: "gpt-4".into(),
            messages: vec![
                ChatMessage::system("You are a financial AI assistant."),
                ChatMessage::user("What is an ETF?"),
            ],
            max_tokens: 500,
            temperature: 0.7,
        }
    }

    fn success_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "model": "gpt-4-0613",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": text}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 21, "completion_tokens": 7, "total_tokens": 28}
        })
    }

    #[test]
    fn endpoint_joins_base_url_without_double_slash() {
        let client = OpenAiClient::new("k", "https://api.openai.com/v1/", Duration::from_secs(1))
            .unwrap();
        assert_eq!(client.endpoint(), "https://api.openai.com/v1/chat/completions");
    }

    #[tokio::test]
    async fn chat_success() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4",
                "max_tokens": 500,
                "messages": [
                    {"role": "system", "content": "You are a financial AI assistant."},
                    {"role": "user", "content": "What is an ETF?"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(success_body("A basket fund.")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.chat(&test_request()).await.unwrap();
        assert_eq!(result.first_content(), Some("A basket fund."));
        assert_eq!(result.model, "gpt-4-0613");
        assert_eq!(result.usage.unwrap().prompt_tokens, 21);
    }

    #[tokio::test]
    async fn chat_fails_on_401_with_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"message": "Incorrect API key provided", "type": "invalid_request_error", "code": "invalid_api_key"}
            })))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.chat(&test_request()).await.unwrap_err().to_string();
        assert!(err.contains("invalid_request_error"), "got: {err}");
        assert!(err.contains("Incorrect API key provided"), "got: {err}");
    }

    #[tokio::test]
    async fn chat_does_not_retry_on_429() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client.chat(&test_request()).await.unwrap_err().to_string();
        assert!(err.contains("429"), "got: {err}");
        assert!(err.contains("slow down"), "got: {err}");
    }

    #[tokio::test]
    async fn connection_refused_is_provider_error() {
        // Nothing listens on port 9 on test hosts.
        let client = test_client("http://127.0.0.1:9");
        let err = client.chat(&test_request()).await.unwrap_err();
        assert!(matches!(err, FinDeusError::Provider { .. }));
    }
}
