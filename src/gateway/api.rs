use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use crate::config::GatewaySettings;
use crate::gateway::{GatewayError, InspirationGateway};

const VERBAL_HINT_MAX_TOKENS: u32 = 50;
const VERBAL_HINT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone)]
pub struct HttpInspirationGateway {
    agent: ureq::Agent,
    api_base: String,
    api_key: String,
    completion_model: String,
    image_size: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionData {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ImageGenerationData {
    #[serde(default)]
    data: Vec<ImageItem>,
}

#[derive(Debug, Clone, Deserialize)]
struct ImageItem {
    url: String,
}

impl HttpInspirationGateway {
    pub fn new(settings: &GatewaySettings, api_key: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build();
        Self {
            agent,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            completion_model: settings.completion_model.clone(),
            image_size: settings.image_size.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, GatewayError> {
        let url = self.endpoint(path);
        let response = self
            .agent
            .post(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(body);
        match response {
            Ok(response) => response
                .into_json::<T>()
                .map_err(|err| GatewayError::Request(err.to_string())),
            Err(ureq::Error::Status(code, response)) => {
                let detail = response
                    .into_json::<ApiErrorEnvelope>()
                    .map(|envelope| envelope.error.message)
                    .unwrap_or_else(|_| format!("http status {code}"));
                Err(GatewayError::Service(detail))
            }
            Err(err) => Err(GatewayError::Request(err.to_string())),
        }
    }
}

impl InspirationGateway for HttpInspirationGateway {
    fn request_verbal_hint(&self, caption: &str) -> Result<String, GatewayError> {
        let prompt = format!(
            "Provide a creative suggestion for a drawing based on this caption: '{caption}'."
        );
        let data: ChatCompletionData = self.post_json(
            "chat/completions",
            json!({
                "model": self.completion_model,
                "messages": [{"role": "user", "content": prompt}],
                "max_tokens": VERBAL_HINT_MAX_TOKENS,
                "temperature": VERBAL_HINT_TEMPERATURE,
            }),
        )?;
        data.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(GatewayError::EmptyResponse)
    }

    fn request_visual_hint(&self, caption: &str) -> Result<String, GatewayError> {
        let data: ImageGenerationData = self.post_json(
            "images/generations",
            json!({
                "prompt": caption,
                "n": 1,
                "size": self.image_size,
            }),
        )?;
        data.data
            .into_iter()
            .next()
            .map(|item| item.url)
            .filter(|url| !url.is_empty())
            .ok_or(GatewayError::EmptyResponse)
    }
}
