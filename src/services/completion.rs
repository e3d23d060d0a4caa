//! # 텍스트 생성(Completion) 클라이언트
//!
//! 생성 오케스트레이터는 `TextCompletion` 포트에만 의존하고,
//! 실제 구현인 `OpenAiClient`는 OpenAI 호환 chat-completions API를 호출합니다.
//!
//! 응답은 JSON 객체 하나여야 하므로 `response_format = json_object`로 요청합니다.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CompletionConfig;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("no choices in response")]
    NoChoices,

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// 시스템 지시문과 사용자 지시문을 받아 텍스트 하나를 돌려주는 외부 협력자
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// `timeout` 안에 끝나지 않으면 `CompletionError::Timeout`
    async fn complete(
        &self,
        system: &str,
        user: &str,
        timeout: Duration,
    ) -> Result<String, CompletionError>;
}

// ── OpenAI chat-completions 요청/응답 형식 ──

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(config: &CompletionConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl TextCompletion for OpenAiClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        timeout: Duration,
    ) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: 1.0,
        };

        let map_send_error = |e: reqwest::Error| {
            if e.is_timeout() {
                CompletionError::Timeout(timeout)
            } else {
                CompletionError::Request(e.to_string())
            }
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        let body = response.text().await.map_err(map_send_error)?;

        // 에러 응답도 본문에 `error.message`가 있으면 그 메시지를 우선 사용합니다.
        let parsed = serde_json::from_str::<ChatResponse>(&body);
        if let Ok(ChatResponse {
            error: Some(detail),
            ..
        }) = &parsed
        {
            return Err(CompletionError::Api(detail.message.clone()));
        }
        if !status.is_success() {
            return Err(CompletionError::Api(format!("HTTP {}: {}", status, body)));
        }

        let parsed = parsed.map_err(|e| CompletionError::Parse(e.to_string()))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(CompletionError::NoChoices)
    }
}
