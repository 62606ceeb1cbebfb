/// HTTP chat completion backend
///
/// Talks to an OpenAI-compatible `/chat/completions` endpoint. The endpoint
/// URL, bearer key, and model name come from
/// [`AssistantConfig`](crate::config::AssistantConfig).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{AssistantError, ChatTurn, CompletionModel};

/// Request body for the completions endpoint
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatTurn],
    max_tokens: u32,
    temperature: f32,
}

/// Response body from the completions endpoint
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

/// Completion backend over HTTP
pub struct HttpCompletionModel {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl HttpCompletionModel {
    /// Creates a backend for an OpenAI-compatible endpoint
    pub fn new(api_url: String, api_key: Option<String>, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_url,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl CompletionModel for HttpCompletionModel {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, AssistantError> {
        let body = CompletionRequest {
            model: &self.model,
            messages: turns,
            max_tokens: 512,
            temperature: 0.7,
        };

        let mut request = self.client.post(&self.api_url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AssistantError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AssistantError::RequestFailed(format!(
                "Endpoint returned {}: {}",
                status, text
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::BadResponse(e.to_string()))?;

        let reply = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AssistantError::BadResponse("No choices in response".to_string()))?;

        let reply = reply.trim().to_string();
        if reply.is_empty() {
            return Err(AssistantError::BadResponse(
                "Empty completion content".to_string(),
            ));
        }

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::Role;

    #[test]
    fn test_request_body_shape() {
        let turns = vec![
            ChatTurn::new(Role::System, "persona"),
            ChatTurn::new(Role::User, "@crew hi"),
        ];
        let body = CompletionRequest {
            model: "gpt-4o-mini",
            messages: &turns,
            max_tokens: 512,
            temperature: 0.7,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "@crew hi");
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"on it"}}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "on it");
    }
}
