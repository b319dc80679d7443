use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::clients::traits::{ChatRequest, InferenceBackend, InferenceError};
use crate::config::InferenceConfig;
use crate::error::{Result, TextProcessorError};
use crate::keyphrase::TaggingRecord;

#[derive(Debug, Deserialize)]
struct SummaryItem {
    summary_text: String,
}

/// Summarization answers with a list on most backends, a bare object on some
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SummaryResponse {
    Many(Vec<SummaryItem>),
    One(SummaryItem),
}

impl SummaryResponse {
    fn into_first(self) -> Option<SummaryItem> {
        match self {
            SummaryResponse::Many(items) => items.into_iter().next(),
            SummaryResponse::One(item) => Some(item),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for the Hugging Face hosted inference router
#[derive(Clone, Debug)]
pub struct HfInferenceClient {
    base_url: String,
    token: String,
    aggregation_strategy: Option<String>,
    client: Client,
}

impl HfInferenceClient {
    pub fn new(config: &InferenceConfig, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| TextProcessorError::Config {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: token.into(),
            aggregation_strategy: config.aggregation_strategy.clone(),
            client,
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/hf-inference/models/{}", self.base_url, model)
    }

    fn chat_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    async fn post_json<B, T>(&self, url: &str, body: &B) -> std::result::Result<T, InferenceError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        debug!("POST {}", url);
        let res = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let body = res.text().await.unwrap_or_default();
            return Err(InferenceError::Http { status, body });
        }

        let bytes = res.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| InferenceError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl InferenceBackend for HfInferenceClient {
    async fn summarize(
        &self,
        model: &str,
        text: &str,
    ) -> std::result::Result<String, InferenceError> {
        let body = json!({ "inputs": text });
        let response: SummaryResponse = self.post_json(&self.model_url(model), &body).await?;
        response
            .into_first()
            .map(|item| item.summary_text.trim().to_string())
            .ok_or(InferenceError::EmptyResponse("summarization"))
    }

    async fn classify_tokens(
        &self,
        model: &str,
        text: &str,
    ) -> std::result::Result<Vec<TaggingRecord>, InferenceError> {
        let body = match &self.aggregation_strategy {
            Some(strategy) => json!({
                "inputs": text,
                "parameters": { "aggregation_strategy": strategy }
            }),
            None => json!({ "inputs": text }),
        };
        let records: Vec<TaggingRecord> = self.post_json(&self.model_url(model), &body).await?;
        debug!("Token classification returned {} records", records.len());
        Ok(records)
    }

    async fn chat_completion(
        &self,
        request: &ChatRequest,
    ) -> std::result::Result<String, InferenceError> {
        let response: ChatResponse = self.post_json(&self.chat_url(), request).await?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or(InferenceError::EmptyResponse("chat completion"))
    }
}
