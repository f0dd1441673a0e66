/// Embedder trait and the deterministic demo implementation.
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbedderError {
    #[error("inference failed: {0}")]
    InferenceFailed(String),
}

/// Text-to-vector boundary. `Send + Sync` so implementations can be shared
/// behind `Arc` by a concurrent caller.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError>;

    /// Dimensionality of every vector this embedder produces.
    fn dimensions(&self) -> usize;
}

/// Deterministic embedder seeded from the SHA-256 digest of the text.
///
/// Stands in for a sentence-transformer in the demo and in tests: identical
/// text always maps to the same unit vector, different text almost surely
/// does not. Carries no semantic signal.
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    #[must_use]
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self { dimensions: 384 }
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedderError> {
        let digest: [u8; 32] = Sha256::digest(text.as_bytes()).into();

        // Cycle the digest bytes, mixing in the position so dimensions
        // beyond 32 are not plain repetitions.
        let mut embedding = Vec::with_capacity(self.dimensions);
        for i in 0..self.dimensions {
            let byte = digest[i % 32];
            let mixed = byte.wrapping_add((i / 32) as u8).wrapping_mul(31);
            embedding.push(f32::from(mixed) / 255.0 - 0.5);
        }

        // L2 normalize so cosine distance behaves.
        let norm_sq: f32 = embedding.iter().map(|v| v * v).sum();
        if norm_sq > 0.0 {
            let inv = 1.0 / norm_sq.sqrt();
            for v in &mut embedding {
                *v *= inv;
            }
        }

        Ok(embedding)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
