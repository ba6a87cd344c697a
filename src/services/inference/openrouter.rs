/// OpenRouter completion provider
///
/// Sends one OpenAI-compatible chat completion per preference set and parses
/// the reply into candidate titles. Failures are never retried here.
use crate::{
    error::{AppError, AppResult},
    models::PreferenceSet,
    services::inference::{build_prompt, parse_candidates, CandidateParse, TitleRecommender},
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone)]
pub struct OpenRouterProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
    site_url: String,
}

impl OpenRouterProvider {
    pub fn new(
        http_client: HttpClient,
        api_key: String,
        api_url: String,
        model: String,
        site_url: String,
    ) -> Self {
        Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            model,
            site_url,
        }
    }

    /// Sends the prompt and returns the raw completion text
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        let url = format!("{}/chat/completions", self.api_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.site_url)
            .json(&body)
            .send()
            .await
            .map_err(AppError::inference)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::InferenceUnavailable(format!(
                "OpenRouter returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await.map_err(AppError::inference)?;
        tracing::debug!(response = %response_text, "Raw OpenRouter response");

        let completion: ChatCompletion = serde_json::from_str(&response_text)
            .map_err(|e| AppError::InferenceMalformed(format!("Unreadable completion: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::InferenceMalformed("Completion has no content".to_string()))
    }
}

#[async_trait::async_trait]
impl TitleRecommender for OpenRouterProvider {
    async fn infer(&self, prefs: &PreferenceSet) -> AppResult<CandidateParse> {
        let prompt = build_prompt(prefs);

        let text = match self.complete(&prompt).await {
            Ok(text) => text,
            Err(AppError::InferenceMalformed(reason)) => {
                tracing::warn!(reason = %reason, model = %self.model, "No usable completion");
                return Ok(CandidateParse::Empty);
            }
            Err(e) => return Err(e),
        };

        let parsed = parse_candidates(&text);

        tracing::info!(
            model = %self.model,
            parse = ?parsed.kind(),
            candidates = parsed.titles().len(),
            provider = "openrouter",
            "Candidate titles inferred"
        );

        Ok(parsed)
    }

    fn name(&self) -> &'static str {
        "openrouter"
    }
}
