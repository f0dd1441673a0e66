/// Generator boundary: a single blocking prompt-in, text-out call.
pub mod groq;

use thiserror::Error;

/// Errors crossing the generation boundary.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("response missing message content")]
    MalformedResponse,
}

/// Language-model boundary. No streaming, no structured output; sampling
/// knobs live in the implementation and are forwarded verbatim.
pub trait Generator: Send + Sync {
    fn complete(&self, prompt: &str) -> Result<String, GeneratorError>;
}
