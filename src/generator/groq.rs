//! Blocking client for an OpenAI-compatible chat-completions endpoint
//! (Groq in the demo configuration).
use std::time::Duration;

use serde_json::{Value, json};
use tracing::debug;

use super::{Generator, GeneratorError};
use crate::config::GenerationConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct GroqGenerator {
    client: reqwest::blocking::Client,
    url: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    top_p: f64,
}

impl GroqGenerator {
    pub fn new(api_key: String, cfg: &GenerationConfig) -> Result<Self, GeneratorError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("treerag/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: format!("{}/chat/completions", cfg.api_url.trim_end_matches('/')),
            api_key,
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
            top_p: cfg.top_p,
        })
    }
}

impl Generator for GroqGenerator {
    fn complete(&self, prompt: &str) -> Result<String, GeneratorError> {
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": prompt}],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "top_p": self.top_p,
            "stream": false,
        });

        debug!(model = %self.model, prompt_len = prompt.len(), "sending completion request");

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = resp.json()?;
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(GeneratorError::MalformedResponse)?;

        Ok(content.to_string())
    }
}
