/// Content-addressed passage corpus.
///
/// Every passage is identified by the SHA-256 digest of its exact text,
/// so identical passages collapse to a single identity.
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// SHA-256 digest of a passage's exact byte content. The passage's identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash the given text. Pure function of the bytes.
    #[must_use]
    pub fn of(text: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        Self(hasher.finalize().into())
    }

    /// Full lowercase hex rendering (64 chars).
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Truncated hex for logs and prompt fallbacks.
    #[must_use]
    pub fn short(&self) -> String {
        format!("{}…", &self.to_hex()[..10])
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.short())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// An immutable unit of retrievable text plus free-form metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub content: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Passage {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The passage's identity: `ContentHash::of(content)`.
    #[must_use]
    pub fn hash(&self) -> ContentHash {
        ContentHash::of(&self.content)
    }
}

/// Read-only mapping from content hash to passage.
///
/// Built once at startup; inserting the same text twice is a no-op
/// (deduplication by identity).
#[derive(Debug, Default, Clone)]
pub struct Corpus {
    passages: BTreeMap<ContentHash, Passage>,
}

impl Corpus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a passage, returning its hash. Identical text collapses.
    pub fn insert(&mut self, passage: Passage) -> ContentHash {
        let hash = passage.hash();
        self.passages.entry(hash).or_insert(passage);
        hash
    }

    #[must_use]
    pub fn get(&self, hash: &ContentHash) -> Option<&Passage> {
        self.passages.get(hash)
    }

    /// Resolve a hash back to its passage text, if present.
    #[must_use]
    pub fn resolve(&self, hash: &ContentHash) -> Option<&str> {
        self.passages.get(hash).map(|p| p.content.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ContentHash, &Passage)> {
        self.passages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_stable() {
        let a = ContentHash::of("healthcare data privacy");
        let b = ContentHash::of("healthcare data privacy");
        assert_eq!(a, b, "same bytes must produce same digest");
    }

    #[test]
    fn test_hash_known_vector() {
        // SHA-256 of the empty string
        assert_eq!(
            ContentHash::of("").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_hash_distinct_inputs() {
        assert_ne!(ContentHash::of("HIPAA"), ContentHash::of("GDPR"));
    }

    #[test]
    fn test_short_is_truncated_hex() {
        let h = ContentHash::of("x");
        assert!(h.short().starts_with(&h.to_hex()[..10]));
    }

    #[test]
    fn test_corpus_dedup() {
        let mut corpus = Corpus::new();
        let h1 = corpus.insert(Passage::new("same text"));
        let h2 = corpus.insert(Passage::new("same text").with_metadata("source", "other"));
        assert_eq!(h1, h2);
        assert_eq!(corpus.len(), 1, "identical text must collapse to one entry");
        // First insert wins
        assert!(corpus.get(&h1).unwrap().metadata.is_empty());
    }

    #[test]
    fn test_corpus_resolve() {
        let mut corpus = Corpus::new();
        let h = corpus.insert(Passage::new("resolvable"));
        assert_eq!(corpus.resolve(&h), Some("resolvable"));
        assert_eq!(corpus.resolve(&ContentHash::of("absent")), None);
    }
}
